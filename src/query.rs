use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::bbox;
use crate::error::{Error, Result};

/// Landsat collections the search endpoint recognizes.
const COLLECTIONS: [&str; 2] = ["landsat-c1l1", "landsat-c2l1"];

/// Platform identifiers the catalog indexes. `LANDSAT-7` carries a hyphen
/// upstream; every other platform uses an underscore.
const PLATFORMS: [&str; 9] = [
    "LANDSAT_1",
    "LANDSAT_2",
    "LANDSAT_3",
    "LANDSAT_4",
    "LANDSAT_5",
    "LANDSAT_6",
    "LANDSAT-7",
    "LANDSAT_8",
    "LANDSAT_9",
];

// Exclusive ceilings for the zero-padded WRS grid numbers.
const WRS_PATH_LIMIT: u16 = 255;
const WRS_ROW_LIMIT: u16 = 248;

/// Sort direction for the `sort` clause of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire form expected by the search endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(Error::validation(
                "sort_order",
                format!("expected \"asc\" or \"desc\", got {other:?}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Lt,
}

impl CmpOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Lt => "lt",
        }
    }
}

/// One stored filter entry.
#[derive(Debug, Clone, PartialEq)]
enum Filter {
    /// Single-operator comparison. A `None` value marks a filter that was
    /// explicitly disabled; rendering omits the key entirely.
    Cmp(CmpOp, Option<Value>),
    /// Plain JSON value forwarded as-is (list filters such as `proj:shape`).
    Raw(Value),
}

/// Builder for the JSON body of a `POST /stac/search` request.
///
/// Typed setters validate their input before storing it under the STAC
/// property key the endpoint filters on; a rejected value leaves the builder
/// unchanged. Arbitrary filters can be merged in with [`set_metadata`], and
/// win over typed setters on key collisions.
///
/// [`set_metadata`]: SceneQuery::set_metadata
///
/// ```
/// use landsat_stac::{SceneQuery, SortOrder};
///
/// let mut query = SceneQuery::new();
/// query
///     .limit(5)
///     .cloud_cover_max(20)?
///     .wrs_path("116")?
///     .wrs_row("50")?
///     .sort_field("eo:cloud_cover")
///     .sort_order(SortOrder::Ascending);
/// let body = query.generate()?;
/// assert_eq!(body["query"]["landsat:wrs_row"]["eq"], "050");
/// # Ok::<(), landsat_stac::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SceneQuery {
    limit: u32,
    filters: BTreeMap<String, Filter>,
    manual: BTreeMap<String, Value>,
    bbox: Option<[f64; 4]>,
    date_range: Option<String>,
    sort_field: Option<String>,
    sort_order: Option<SortOrder>,
}

impl SceneQuery {
    /// Creates an empty query capped at 10 scenes.
    pub fn new() -> Self {
        Self {
            limit: 10,
            filters: BTreeMap::new(),
            manual: BTreeMap::new(),
            bbox: None,
            date_range: None,
            sort_field: None,
            sort_order: None,
        }
    }

    /// Maximum number of scenes the search may return.
    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Filters on overall cloud cover below `pct` percent. `100` disables
    /// the filter; values above 100 are rejected.
    pub fn cloud_cover_max(&mut self, pct: u8) -> Result<&mut Self> {
        self.cloud_cover("cloud_cover_max", "eo:cloud_cover", pct)
    }

    /// Filters on cloud cover over land below `pct` percent, with the same
    /// sentinel convention as [`cloud_cover_max`](SceneQuery::cloud_cover_max).
    pub fn cloud_cover_land_max(&mut self, pct: u8) -> Result<&mut Self> {
        self.cloud_cover("cloud_cover_land_max", "landsat:cloud_cover_land", pct)
    }

    fn cloud_cover(&mut self, field: &'static str, key: &str, pct: u8) -> Result<&mut Self> {
        if pct > 100 {
            return Err(Error::validation(
                field,
                format!("{pct} is not a percentage in 0..=100"),
            ));
        }
        let value = (pct < 100).then(|| json!(pct));
        self.filters.insert(key.to_string(), Filter::Cmp(CmpOp::Lt, value));
        Ok(self)
    }

    /// Filters on a WRS path, zero-padded to three digits.
    pub fn wrs_path(&mut self, path: &str) -> Result<&mut Self> {
        let padded = checked_wrs("wrs_path", path, WRS_PATH_LIMIT)?;
        self.filters.insert(
            "landsat:wrs_path".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(padded))),
        );
        Ok(self)
    }

    /// Filters on a WRS row, zero-padded to three digits.
    pub fn wrs_row(&mut self, row: &str) -> Result<&mut Self> {
        let padded = checked_wrs("wrs_row", row, WRS_ROW_LIMIT)?;
        self.filters.insert(
            "landsat:wrs_row".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(padded))),
        );
        Ok(self)
    }

    /// Filters on a Landsat collection (`landsat-c1l1` or `landsat-c2l1`).
    pub fn collection(&mut self, collection: &str) -> Result<&mut Self> {
        if !COLLECTIONS.contains(&collection) {
            return Err(Error::validation(
                "collection",
                format!("{collection:?} is not a valid collection"),
            ));
        }
        self.filters.insert(
            "collection".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(collection))),
        );
        Ok(self)
    }

    /// Filters on a platform identifier (`LANDSAT_1` through `LANDSAT_9`).
    pub fn platform(&mut self, platform: &str) -> Result<&mut Self> {
        if !PLATFORMS.contains(&platform) {
            return Err(Error::validation(
                "platform",
                format!("{platform:?} is not a valid platform"),
            ));
        }
        self.filters.insert(
            "platform".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(platform))),
        );
        Ok(self)
    }

    /// Filters on a Landsat scene identifier.
    pub fn scene_id(&mut self, scene_id: &str) -> &mut Self {
        self.filters.insert(
            "landsat:scene_id".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(scene_id))),
        );
        self
    }

    /// Filters on a STAC item identifier.
    pub fn id(&mut self, id: &str) -> &mut Self {
        self.filters
            .insert("id".to_string(), Filter::Cmp(CmpOp::Eq, Some(json!(id))));
        self
    }

    /// Filters on a correction level (e.g. `L1TP`).
    pub fn correction(&mut self, level: &str) -> &mut Self {
        self.filters.insert(
            "landsat:correction".to_string(),
            Filter::Cmp(CmpOp::Eq, Some(json!(level))),
        );
        self
    }

    /// Filters on the projected image shape, `[rows, columns]`.
    pub fn image_shape(&mut self, shape: [u32; 2]) -> &mut Self {
        self.filters
            .insert("proj:shape".to_string(), Filter::Raw(json!(shape)));
        self
    }

    /// Restricts the search to a bounding box, `[min_x, min_y, max_x, max_y]`.
    pub fn bbox(&mut self, bbox: [f64; 4]) -> &mut Self {
        self.bbox = Some(bbox);
        self
    }

    /// Restricts the search to the bounding box of the first geometry in a
    /// vector file.
    pub fn bbox_from_file(&mut self, path: &Path) -> Result<&mut Self> {
        self.bbox = Some(bbox::bbox_from_file(path)?);
        Ok(self)
    }

    /// Restricts the search to a date range such as `"2018-03-05/2018-03-07"`.
    /// The string is forwarded verbatim.
    pub fn date_range(&mut self, range: &str) -> &mut Self {
        self.date_range = Some(range.to_string());
        self
    }

    /// Property to sort results on (server-side).
    pub fn sort_field(&mut self, field: &str) -> &mut Self {
        self.sort_field = Some(field.to_string());
        self
    }

    /// Sort direction; only emitted together with a sort field.
    pub fn sort_order(&mut self, order: SortOrder) -> &mut Self {
        self.sort_order = Some(order);
        self
    }

    /// Merges arbitrary filter entries into the query in a single batch.
    ///
    /// No validation happens at store time; entries are checked when the
    /// query is rendered, and take precedence over typed setters for the
    /// same key.
    pub fn set_metadata<I, K>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in entries {
            self.manual.insert(key.into(), value);
        }
        self
    }

    /// Renders the POST body. Rendering never mutates the builder, so two
    /// consecutive calls produce identical documents.
    pub fn generate(&self) -> Result<Value> {
        let mut doc = Map::new();
        doc.insert("limit".to_string(), json!(self.limit));
        if let Some(bbox) = self.bbox {
            doc.insert("bbox".to_string(), json!(bbox));
        }
        if let Some(time) = &self.date_range {
            doc.insert("time".to_string(), json!(time));
        }

        let mut query = Map::new();
        for (key, filter) in &self.filters {
            match filter {
                Filter::Cmp(op, Some(value)) => {
                    let mut cmp = Map::new();
                    cmp.insert(op.as_str().to_string(), value.clone());
                    query.insert(key.clone(), Value::Object(cmp));
                }
                Filter::Cmp(_, None) => {}
                Filter::Raw(value) => {
                    query.insert(key.clone(), value.clone());
                }
            }
        }
        // Manual entries win on key collisions.
        for (key, value) in &self.manual {
            if let Some(value) = rendered_filter(key, value)? {
                query.insert(key.clone(), value);
            }
        }
        doc.insert("query".to_string(), Value::Object(query));

        if let Some(field) = &self.sort_field {
            let mut entry = Map::new();
            entry.insert("field".to_string(), json!(field));
            if let Some(order) = self.sort_order {
                entry.insert("direction".to_string(), json!(order.as_str()));
            }
            doc.insert("sort".to_string(), json!([entry]));
        }

        Ok(Value::Object(doc))
    }
}

impl Default for SceneQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a manual override for rendering. Multi-key objects cannot be
/// expressed as sat-api filters; a single-operator object holding null
/// disables the filter and is omitted.
fn rendered_filter(key: &str, value: &Value) -> Result<Option<Value>> {
    let Some(obj) = value.as_object() else {
        return Ok(Some(value.clone()));
    };
    if obj.len() > 1 {
        return Err(Error::UnsupportedFilter {
            key: key.to_string(),
        });
    }
    if obj.values().next().is_some_and(Value::is_null) {
        return Ok(None);
    }
    Ok(Some(value.clone()))
}

fn checked_wrs(field: &'static str, val: &str, limit: u16) -> Result<String> {
    let padded = format!("{val:0>3}");
    let in_range = !val.is_empty()
        && padded.len() == 3
        && padded.bytes().all(|b| b.is_ascii_digit())
        && padded.parse::<u16>().is_ok_and(|n| n < limit);
    if !in_range {
        return Err(Error::validation(
            field,
            format!("{val:?} is not a grid number below {limit}"),
        ));
    }
    Ok(padded)
}
