//! Navigation of STAC search results into typed scene objects.
//!
//! Serde models cover the subset of the GeoJSON-like response the client
//! needs: the `features` array, per-feature `properties`, and the `assets`
//! mapping with its `alternate.s3` mirror locations and `eo:bands` entries.

use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Asset names holding per-pixel solar/sensor angle coefficients.
const COEFF_FILES: [&str; 4] = ["VAA", "VZA", "SAA", "SZA"];

/// Asset names holding scene metadata documents.
const METADATA_FILES: [&str; 4] = ["MTL.txt", "MTL.json", "MTL.xml", "ANG.txt"];

/// Band identifiers of the OLI/TIRS instrument pair.
const OLI_TIRS_BANDS: [&str; 11] = [
    "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "B10", "B11",
];

/// Returns the fixed band identifier list for a platform code.
///
/// Only the OLI/TIRS platforms (`LANDSAT_8`, `LANDSAT_9`) have a known
/// layout; every other code fails with [`Error::UnrecognizedPlatform`].
pub fn platform_bands(platform: &str) -> Result<&'static [&'static str]> {
    match platform {
        "LANDSAT_8" | "LANDSAT_9" => Ok(&OLI_TIRS_BANDS),
        other => Err(Error::UnrecognizedPlatform(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Wire models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    meta: Option<Value>,
}

/// One GeoJSON-like record of the response, as sent by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
}

/// A named file attached to a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub alternate: Option<AssetAlternate>,
    #[serde(rename = "eo:bands", default)]
    pub bands: Vec<Band>,
}

impl Asset {
    /// Object-storage location of the asset, when the response carries one.
    pub fn s3_href(&self) -> Option<&str> {
        self.alternate
            .as_ref()?
            .s3
            .as_ref()
            .map(|s3| s3.href.as_str())
    }
}

/// Alternate access locations for an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetAlternate {
    #[serde(default)]
    pub s3: Option<AlternateHref>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternateHref {
    pub href: String,
}

/// One entry of an asset's `eo:bands` list.
#[derive(Debug, Clone, Deserialize)]
pub struct Band {
    pub name: String,
    #[serde(default)]
    pub common_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The typed view of one feature. Every property is optional: a field the
/// response does not carry is `None`, never a parse failure.
///
/// The `landsatlook_*` maps point at the landsatlook.usgs.gov mirror (the
/// asset's primary `href`); the `s3_*` maps point at the `alternate.s3`
/// object-storage location.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub id: String,
    pub description: Option<String>,
    pub bbox: Option<Vec<f64>>,
    pub geometry: Option<Value>,

    pub timestamp: Option<String>,
    pub cloud_cover: Option<f64>,
    pub cloud_cover_land: Option<f64>,
    pub sun_azimuth: Option<f64>,
    pub sun_elevation: Option<f64>,
    pub off_nadir: Option<f64>,
    pub platform: Option<String>,
    pub instruments: Option<Vec<String>>,
    pub wrs_type: Option<String>,
    pub wrs_path: Option<String>,
    pub wrs_row: Option<String>,
    pub scene_id: Option<String>,
    pub collection_category: Option<String>,
    pub collection_number: Option<String>,
    pub correction: Option<String>,
    pub epsg: Option<u32>,
    pub shape: Option<Vec<u32>>,

    pub thumbnail: Option<String>,
    /// Band identifier → common name (`"B4"` → `"red"`).
    pub band_common_names: BTreeMap<String, String>,
    pub s3_band_urls: BTreeMap<String, String>,
    pub landsatlook_band_urls: BTreeMap<String, String>,
    pub s3_metadata_urls: BTreeMap<String, String>,
    pub landsatlook_metadata_urls: BTreeMap<String, String>,
    /// QA asset name → title.
    pub qa_titles: BTreeMap<String, String>,
    pub s3_qa_urls: BTreeMap<String, String>,
    pub landsatlook_qa_urls: BTreeMap<String, String>,
    /// Coefficient asset name → title.
    pub coefficient_titles: BTreeMap<String, String>,
    pub s3_coefficient_urls: BTreeMap<String, String>,
    pub landsatlook_coefficient_urls: BTreeMap<String, String>,
}

impl Scene {
    /// Builds a scene from one response feature.
    pub fn from_feature(feature: Feature) -> Self {
        let Feature {
            id,
            bbox,
            geometry,
            description,
            properties,
            assets,
        } = feature;
        let props = &properties;
        let mut scene = Scene {
            id,
            description,
            bbox,
            geometry,
            timestamp: prop_string(props, "datetime"),
            cloud_cover: prop_f64(props, "eo:cloud_cover"),
            cloud_cover_land: prop_f64(props, "landsat:cloud_cover_land"),
            sun_azimuth: prop_f64(props, "view:sun_azimuth"),
            sun_elevation: prop_f64(props, "view:sun_elevation"),
            off_nadir: prop_f64(props, "view:off_nadir"),
            platform: prop_string(props, "platform"),
            instruments: prop_string_list(props, "instruments"),
            wrs_type: prop_string(props, "landsat:wrs_type"),
            wrs_path: prop_string(props, "landsat:wrs_path"),
            wrs_row: prop_string(props, "landsat:wrs_row"),
            scene_id: prop_string(props, "landsat:scene_id"),
            collection_category: prop_string(props, "landsat:collection_category"),
            collection_number: prop_string(props, "landsat:collection_number"),
            correction: prop_string(props, "landsat:correction"),
            epsg: prop_u32(props, "proj:epsg"),
            shape: prop_u32_list(props, "proj:shape"),
            ..Scene::default()
        };
        scene.load_assets(&assets);
        scene
    }

    /// Classifies the feature's assets into band/metadata/QA/coefficient
    /// groupings. The rules are not mutually exclusive: an asset can land in
    /// more than one bucket.
    fn load_assets(&mut self, assets: &BTreeMap<String, Asset>) {
        for (name, asset) in assets {
            let s3 = asset.s3_href();

            if COEFF_FILES.contains(&name.as_str()) {
                if let Some(title) = &asset.title {
                    self.coefficient_titles.insert(name.clone(), title.clone());
                }
                if let Some(s3) = s3 {
                    self.s3_coefficient_urls.insert(name.clone(), s3.to_string());
                }
                self.landsatlook_coefficient_urls
                    .insert(name.clone(), asset.href.clone());
            }

            if METADATA_FILES.contains(&name.as_str()) {
                if let Some(s3) = s3 {
                    self.s3_metadata_urls.insert(name.clone(), s3.to_string());
                }
                self.landsatlook_metadata_urls
                    .insert(name.clone(), asset.href.clone());
            }

            if name.contains("qa_") {
                if let Some(title) = &asset.title {
                    self.qa_titles.insert(name.clone(), title.clone());
                }
                if let Some(s3) = s3 {
                    self.s3_qa_urls.insert(name.clone(), s3.to_string());
                }
                self.landsatlook_qa_urls
                    .insert(name.clone(), asset.href.clone());
            }

            if name == "thumbnail" {
                self.thumbnail = Some(asset.href.clone());
            }

            if let Some(band) = asset.bands.first() {
                if let Some(common) = &band.common_name {
                    self.band_common_names
                        .insert(band.name.clone(), common.clone());
                }
                if let Some(s3) = s3 {
                    self.s3_band_urls.insert(band.name.clone(), s3.to_string());
                }
                self.landsatlook_band_urls
                    .insert(band.name.clone(), asset.href.clone());
            }
        }
    }

    /// The fixed band list for this scene's platform.
    pub fn expected_bands(&self) -> Result<&'static [&'static str]> {
        platform_bands(self.platform.as_deref().unwrap_or_default())
    }
}

fn prop_string(props: &HashMap<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn prop_f64(props: &HashMap<String, Value>, key: &str) -> Option<f64> {
    let value = props.get(key)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn prop_u32(props: &HashMap<String, Value>, key: &str) -> Option<u32> {
    props.get(key)?.as_u64().map(|n| n as u32)
}

fn prop_string_list(props: &HashMap<String, Value>, key: &str) -> Option<Vec<String>> {
    let list = props.get(key)?.as_array()?;
    Some(
        list.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

fn prop_u32_list(props: &HashMap<String, Value>, key: &str) -> Option<Vec<u32>> {
    let list = props.get(key)?.as_array()?;
    Some(list.iter().filter_map(|v| v.as_u64().map(|n| n as u32)).collect())
}

// ---------------------------------------------------------------------------
// SceneCollection
// ---------------------------------------------------------------------------

/// An ordered, immutable sequence of [`Scene`]s built from one search
/// response. Order is preserved from the response; the client never
/// re-sorts.
#[derive(Debug, Clone)]
pub struct SceneCollection {
    scenes: Vec<Scene>,
    ids: Vec<String>,
    scene_ids: Vec<String>,
    cloud_cover: Vec<f64>,
    cloud_cover_land: Vec<f64>,
    meta: Option<Value>,
}

impl SceneCollection {
    /// Parses a search response body into scenes.
    pub fn from_response(body: &Value) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_value(body.clone())?;
        let scenes: Vec<Scene> = collection
            .features
            .into_iter()
            .map(Scene::from_feature)
            .collect();
        log::debug!("parsed {} scene(s) from search response", scenes.len());

        let ids = scenes.iter().map(|s| s.id.clone()).collect();
        let scene_ids = scenes.iter().filter_map(|s| s.scene_id.clone()).collect();
        let cloud_cover = scenes.iter().filter_map(|s| s.cloud_cover).collect();
        let cloud_cover_land = scenes.iter().filter_map(|s| s.cloud_cover_land).collect();

        Ok(Self {
            scenes,
            ids,
            scene_ids,
            cloud_cover,
            cloud_cover_land,
            meta: collection.meta,
        })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Feature IDs, in response order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// `landsat:scene_id` of every feature that carries one, in response
    /// order.
    pub fn scene_ids(&self) -> &[String] {
        &self.scene_ids
    }

    /// `eo:cloud_cover` of every feature that carries one, in response
    /// order.
    pub fn cloud_cover(&self) -> &[f64] {
        &self.cloud_cover
    }

    /// `landsat:cloud_cover_land` of every feature that carries one, in
    /// response order.
    pub fn cloud_cover_land(&self) -> &[f64] {
        &self.cloud_cover_land
    }

    /// The response's `meta` object, when present.
    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }
}

impl Index<usize> for SceneCollection {
    type Output = Scene;

    fn index(&self, index: usize) -> &Scene {
        &self.scenes[index]
    }
}

impl<'a> IntoIterator for &'a SceneCollection {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
