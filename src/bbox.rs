//! Bounding box extraction from vector files.

use std::path::Path;

use geo_types::Coord;
use shapefile::Shape;

use crate::error::{Error, Result};

/// Reads a shapefile and returns the bounding box of its first geometry as
/// `[min_x, min_y, max_x, max_y]`. Null shapes at the front of the file are
/// skipped.
pub fn bbox_from_file(path: &Path) -> Result<[f64; 4]> {
    let mut reader = shapefile::ShapeReader::from_path(path).map_err(|e| Error::Vector {
        path: path.to_path_buf(),
        source: e,
    })?;

    for shape in reader.iter_shapes() {
        let shape = shape.map_err(|e| Error::Vector {
            path: path.to_path_buf(),
            source: e,
        })?;

        match &shape {
            Shape::NullShape => continue,
            Shape::Multipatch(_) => {
                return Err(Error::UnsupportedShape {
                    path: path.to_path_buf(),
                    kind: "multipatch".to_string(),
                });
            }
            _ => {}
        }

        let coords = shape_coords(&shape);
        log::debug!(
            "read {} vertex(es) from first geometry of {}",
            coords.len(),
            path.display()
        );
        return bounds_of(&coords).ok_or_else(|| Error::EmptyVector {
            path: path.to_path_buf(),
        });
    }

    Err(Error::EmptyVector {
        path: path.to_path_buf(),
    })
}

/// Collects the vertices of a shape. Null and multipatch shapes are handled
/// by the caller and yield no vertices here.
fn shape_coords(shape: &Shape) -> Vec<Coord> {
    match shape {
        Shape::Point(p) => vec![Coord { x: p.x, y: p.y }],
        Shape::PointM(p) => vec![Coord { x: p.x, y: p.y }],
        Shape::PointZ(p) => vec![Coord { x: p.x, y: p.y }],
        Shape::Multipoint(mp) => mp
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::MultipointM(mp) => mp
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::MultipointZ(mp) => mp
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::Polyline(pl) => pl
            .parts()
            .iter()
            .flatten()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::PolylineM(pl) => pl
            .parts()
            .iter()
            .flatten()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::PolylineZ(pl) => pl
            .parts()
            .iter()
            .flatten()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::Polygon(poly) => poly
            .rings()
            .iter()
            .flat_map(|ring| ring.points())
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::PolygonM(poly) => poly
            .rings()
            .iter()
            .flat_map(|ring| ring.points())
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::PolygonZ(poly) => poly
            .rings()
            .iter()
            .flat_map(|ring| ring.points())
            .map(|p| Coord { x: p.x, y: p.y })
            .collect(),
        Shape::NullShape | Shape::Multipatch(_) => Vec::new(),
    }
}

fn bounds_of(coords: &[Coord]) -> Option<[f64; 4]> {
    let mut bounds: Option<[f64; 4]> = None;
    for c in coords {
        match &mut bounds {
            None => bounds = Some([c.x, c.y, c.x, c.y]),
            Some(b) => {
                b[0] = b[0].min(c.x);
                b[1] = b[1].min(c.y);
                b[2] = b[2].max(c.x);
                b[3] = b[3].max(c.y);
            }
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_vertices() {
        let coords = [
            Coord { x: 121.07, y: 14.55 },
            Coord { x: 121.06, y: 14.56 },
            Coord { x: 121.08, y: 14.54 },
        ];
        assert_eq!(bounds_of(&coords), Some([121.06, 14.54, 121.08, 14.56]));
    }

    #[test]
    fn bounds_of_single_point_degenerate_box() {
        let coords = [Coord { x: 1.0, y: 2.0 }];
        assert_eq!(bounds_of(&coords), Some([1.0, 2.0, 1.0, 2.0]));
    }

    #[test]
    fn bounds_of_nothing_is_none() {
        assert_eq!(bounds_of(&[]), None);
    }

    #[test]
    fn missing_file_is_a_vector_error() {
        let err = bbox_from_file(Path::new("/nonexistent/area.shp")).unwrap_err();
        assert!(matches!(err, Error::Vector { .. }));
    }
}
