use std::path::{Path, PathBuf};

/// POST endpoint for the USGS Landsat STAC search API.
pub const DEFAULT_SEARCH_URL: &str = "https://landsatlook.usgs.gov/sat-api/stac/search";

/// Resolves the search endpoint using (in order of precedence):
/// - an explicit `url` argument
/// - the `LANDSAT_STAC_URL` environment variable
/// - a `url:` entry in a `.landsatstacrc` file (path from `LANDSAT_STAC_RC`,
///   then the current directory, then the home directory)
/// - the built-in USGS endpoint
pub(crate) fn resolve_endpoint(url: Option<String>) -> String {
    if let Some(url) = url {
        return url;
    }
    if let Ok(url) = std::env::var("LANDSAT_STAC_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }

    for rc_path in rc_candidates() {
        if !rc_path.exists() {
            continue;
        }
        match read_rc(&rc_path) {
            Ok(Some(url)) => return url,
            Ok(None) => {}
            Err(e) => {
                log::warn!(
                    "ignoring unreadable configuration file {}: {}",
                    rc_path.display(),
                    e
                );
            }
        }
        break;
    }

    DEFAULT_SEARCH_URL.to_string()
}

/// Reads the `url:` entry from an rc file. Lines starting with `#` are
/// comments; a bare `url:` takes its value from the following line.
fn read_rc(path: &Path) -> std::io::Result<Option<String>> {
    let text = std::fs::read_to_string(path)?;
    let mut url = None;
    let mut pending_url = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if pending_url {
            // Continuation value line (no colon)
            if !line.contains(':') || line.starts_with("http") {
                url = Some(strip_quotes(line).to_string());
                pending_url = false;
                continue;
            }
            pending_url = false;
        }

        if let Some((k, v)) = line.split_once(':') {
            if k.trim() == "url" {
                let v = strip_quotes(v.trim());
                if !v.is_empty() {
                    url = Some(v.to_string());
                } else {
                    pending_url = true;
                }
            }
        }
    }

    Ok(url)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) LANDSAT_STAC_RC (explicit)
    // 2) ./.landsatstacrc (current working directory)
    // 3) ~/.landsatstacrc
    if let Ok(p) = std::env::var("LANDSAT_STAC_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".landsatstacrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".landsatstacrc"));
    }
    v
}
