use anyhow::Result;
use landsat_stac::{SceneQuery, SearchClient, SortOrder};

fn main() -> Result<()> {
    // Example program that calls the library API.
    // The endpoint can be overridden via env vars or a `.landsatstacrc` file.
    let mut query = SceneQuery::new();
    query
        .limit(5)
        .cloud_cover_max(50)?
        .wrs_path("116")?
        .wrs_row("050")?
        .collection("landsat-c2l1")?
        .platform("LANDSAT_9")?
        .sort_field("eo:cloud_cover")
        .sort_order(SortOrder::Ascending);

    let client = SearchClient::new(query)?;
    let scenes = client.search()?.scenes()?;

    println!("found {} scene(s)", scenes.len());
    for scene in &scenes {
        println!(
            "{}  cloud={:5.2}%  thumbnail={}",
            scene.id,
            scene.cloud_cover.unwrap_or(f64::NAN),
            scene.thumbnail.as_deref().unwrap_or("-")
        );
        for (band, url) in &scene.s3_band_urls {
            let common = scene
                .band_common_names
                .get(band)
                .map(String::as_str)
                .unwrap_or("-");
            println!("    {band:>4} ({common}): {url}");
        }
    }

    Ok(())
}
