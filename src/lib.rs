//! A small Rust client for the USGS Landsat STAC search API.
//!
//! This crate implements a `landsatpystac`-style flow:
//! build a validated search query, POST it to the catalog, then navigate the
//! returned feature collection as typed scenes.
//!
//! ## Quick start
//! - Optionally override the endpoint via the `LANDSAT_STAC_URL` environment
//!   variable or a `.landsatstacrc` file (supported in the current directory
//!   and in your home directory); the built-in USGS URL is used otherwise.
//! - Configure a [`SceneQuery`], hand it to a [`SearchClient`], and parse the
//!   response into a [`SceneCollection`].
//!
//! ```no_run
//! use landsat_stac::{SceneQuery, SearchClient, SortOrder};
//!
//! fn main() -> landsat_stac::Result<()> {
//!     let mut query = SceneQuery::new();
//!     query
//!         .limit(5)
//!         .cloud_cover_max(20)?
//!         .wrs_path("116")?
//!         .wrs_row("050")?
//!         .collection("landsat-c2l1")?
//!         .platform("LANDSAT_9")?
//!         .sort_field("eo:cloud_cover")
//!         .sort_order(SortOrder::Ascending);
//!
//!     let client = SearchClient::new(query)?;
//!     let scenes = client.search()?.scenes()?;
//!     for scene in &scenes {
//!         println!(
//!             "{} cloud={:?} thumbnail={:?}",
//!             scene.id, scene.cloud_cover, scene.thumbnail
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For full usage and configuration details, see the crate README.

#![forbid(unsafe_code)]

mod bbox;
mod client;
mod config;
mod error;
mod query;
mod scene;

pub use bbox::bbox_from_file;
pub use client::{SearchClient, SearchResponse};
pub use config::DEFAULT_SEARCH_URL;
pub use error::{Error, Result};
pub use query::{SceneQuery, SortOrder};
pub use scene::{
    AlternateHref, Asset, AssetAlternate, Band, Feature, Scene, SceneCollection, platform_bands,
};
