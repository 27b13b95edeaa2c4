//! End-to-end tests for query building and result navigation.
//!
//! Tests marked `#[ignore]` require network access to the USGS catalog.
//! Run with: `cargo test -- --ignored live`

use landsat_stac::{SceneCollection, SceneQuery, SearchClient, SortOrder};
use serde_json::{Value, json};

/// Response of a search sorted ascending on `eo:cloud_cover`, trimmed to the
/// fields the client navigates.
const SORTED_RESPONSE: &str = r#"{
  "type": "FeatureCollection",
  "meta": { "found": 2, "returned": 2, "limit": 10, "page": 1 },
  "features": [
    {
      "type": "Feature",
      "id": "LC09_L1TP_116050_20220512_20220512_02_T1",
      "bbox": [119.71, 13.35, 121.83, 15.47],
      "properties": {
        "datetime": "2022-05-12T02:21:43.812Z",
        "eo:cloud_cover": 11.84,
        "platform": "LANDSAT_9",
        "landsat:scene_id": "LC91160502022132LGN00",
        "landsat:wrs_path": "116",
        "landsat:wrs_row": "050"
      },
      "assets": {
        "thumbnail": { "href": "https://landsatlook.usgs.gov/2022132/thumb.jpeg" }
      }
    },
    {
      "type": "Feature",
      "id": "LC08_L1TP_116050_20180306_20180306_02_T1",
      "bbox": [119.75, 13.36, 121.86, 15.48],
      "properties": {
        "datetime": "2018-03-06T02:22:01.000Z",
        "eo:cloud_cover": 57.84,
        "platform": "LANDSAT_8",
        "landsat:scene_id": "LC81160502018065LGN00",
        "landsat:wrs_path": "116",
        "landsat:wrs_row": "050"
      },
      "assets": {
        "thumbnail": { "href": "https://landsatlook.usgs.gov/2018065/thumb.jpeg" }
      }
    }
  ]
}"#;

fn wrs_query() -> SceneQuery {
    let mut query = SceneQuery::new();
    query
        .cloud_cover_max(90)
        .expect("valid cloud cover")
        .wrs_path("116")
        .expect("valid path")
        .wrs_row("050")
        .expect("valid row")
        .sort_field("eo:cloud_cover")
        .sort_order(SortOrder::Ascending);
    query
}

#[test]
fn rendered_query_matches_the_wire_contract() {
    let body = wrs_query().generate().unwrap();
    assert_eq!(
        body,
        json!({
            "limit": 10,
            "query": {
                "eo:cloud_cover": { "lt": 90 },
                "landsat:wrs_path": { "eq": "116" },
                "landsat:wrs_row": { "eq": "050" }
            },
            "sort": [{ "field": "eo:cloud_cover", "direction": "asc" }]
        })
    );
}

#[test]
fn sorted_response_is_navigated_in_server_order() {
    let body: Value = serde_json::from_str(SORTED_RESPONSE).unwrap();
    let scenes = SceneCollection::from_response(&body).unwrap();

    assert_eq!(scenes.len(), 2);
    // The server applied the ascending sort; the client must not re-sort.
    assert_eq!(scenes.cloud_cover(), [11.84, 57.84]);
    assert_eq!(
        scenes.scene_ids(),
        ["LC91160502022132LGN00", "LC81160502018065LGN00"]
    );
    assert_eq!(
        scenes.ids(),
        [
            "LC09_L1TP_116050_20220512_20220512_02_T1",
            "LC08_L1TP_116050_20180306_20180306_02_T1"
        ]
    );

    let first = &scenes[0];
    assert_eq!(first.platform.as_deref(), Some("LANDSAT_9"));
    assert_eq!(
        first.thumbnail.as_deref(),
        Some("https://landsatlook.usgs.gov/2022132/thumb.jpeg")
    );
    // Not in the trimmed response, so it resolves to the missing marker.
    assert_eq!(first.sun_azimuth, None);

    assert_eq!(scenes.iter().count(), 2);
    assert_eq!(scenes.meta().unwrap()["found"], 2);
}

#[test]
fn client_renders_the_same_document_it_posts() {
    let client = SearchClient::with_url(
        wrs_query(),
        Some("https://stac.invalid/search".to_string()),
    )
    .unwrap();
    assert_eq!(client.endpoint(), "https://stac.invalid/search");
    assert_eq!(client.parameters().unwrap(), wrs_query().generate().unwrap());
}

/// Search for a specific scene by its Landsat scene ID.
#[test]
#[ignore]
fn live_search_by_scene_id() {
    let mut query = SceneQuery::new();
    query.scene_id("LC91160502022132LGN00");

    let client = SearchClient::new(query).expect("failed to create client");
    let response = client.search().expect("search failed");
    assert_eq!(response.status, 200);

    let scenes = response.scenes().expect("malformed response");
    assert_eq!(scenes.scene_ids(), ["LC91160502022132LGN00"]);
}

/// Search for the scene covering Pasig City, Philippines, in a narrow
/// date window.
#[test]
#[ignore]
fn live_search_by_bbox_and_date_range() {
    let mut query = SceneQuery::new();
    query
        .bbox([
            121.06985628604887,
            14.553459827553915,
            121.07029080390929,
            14.553885595183766,
        ])
        .date_range("2018-03-05/2018-03-07");

    let client = SearchClient::new(query).expect("failed to create client");
    let scenes = client
        .search()
        .expect("search failed")
        .scenes()
        .expect("malformed response");

    assert_eq!(scenes.scene_ids(), ["LC81160502018065LGN00"]);
}
