//! Boundary shapefile reading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{Reader, Shape, dbase::{FieldValue, Record}};

use crate::region::{AdminCode, RegionLayer};

/// Reads every shape of a `.shp` file with its code field, preserving file order.
/// Null shapes become empty multipolygons and blank codes become `AdminCode::blank()`,
/// so every record still takes part in joins.
pub(crate) fn read_regions(path: &Path, code_field: &str, code_width: usize) -> Result<RegionLayer> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut codes = Vec::new();
    let mut shapes = Vec::new();
    let mut blank = 0;
    for (row, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record {row} of {}", path.display()))?;
        let code = record_code(&record, code_field, code_width)
            .with_context(|| format!("[io::shp] Bad code in record {row} of {}", path.display()))?;
        codes.push(code.unwrap_or_else(|| {
            blank += 1;
            AdminCode::blank()
        }));
        shapes.push(shape_to_multipolygon(shape)
            .with_context(|| format!("[io::shp] Bad shape in record {row} of {}", path.display()))?);
    }

    if blank > 0 {
        eprintln!("[io::shp] warning: {blank} records in {} have an empty {code_field}; they stay on the map without data",
            path.display());
    }

    RegionLayer::new(codes, shapes)
}

/// Extract and normalize the code field. dBASE files may type it as text or number.
/// A present but empty field gives None.
fn record_code(record: &Record, field: &str, width: usize) -> Result<Option<AdminCode>> {
    Ok(match record.get(field) {
        Some(FieldValue::Character(Some(s))) => AdminCode::normalize(s, width),
        Some(FieldValue::Numeric(Some(n))) => AdminCode::from_float(*n, width),
        Some(FieldValue::Integer(n)) => AdminCode::from_integer(i64::from(*n), width),
        Some(FieldValue::Character(None) | FieldValue::Numeric(None)) => None,
        Some(other) => bail!("field {field} has unsupported type: {other:?}"),
        None => bail!("missing field: {field}"),
    })
}

/// Coerce a shape into an owned multipolygon, raising error on non-areal shapes.
fn shape_to_multipolygon(shape: Shape) -> Result<MultiPolygon<f64>> {
    fn xy(points: impl Iterator<Item = (f64, f64)>) -> Vec<Coord<f64>> {
        points.map(|(x, y)| Coord { x, y }).collect()
    }

    let rings: Vec<Vec<Coord<f64>>> = match shape {
        Shape::NullShape => return Ok(MultiPolygon(vec![])),
        Shape::Polygon(p) => p.rings().iter().map(|r| xy(r.points().iter().map(|pt| (pt.x, pt.y)))).collect(),
        Shape::PolygonM(p) => p.rings().iter().map(|r| xy(r.points().iter().map(|pt| (pt.x, pt.y)))).collect(),
        Shape::PolygonZ(p) => p.rings().iter().map(|r| xy(r.points().iter().map(|pt| (pt.x, pt.y)))).collect(),
        other => bail!("found non-Polygon shape: {:?}", other.shapetype()),
    };
    Ok(rings_to_multipolygon(rings))
}

/// Group shapefile rings into polygons. Shapefiles store each exterior ring clockwise,
/// followed by its counter-clockwise holes.
pub(crate) fn rings_to_multipolygon(rings: Vec<Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    /// Get the signed area of a closed coord list (negative for clockwise)
    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    let mut polygons = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for mut coords in rings {
        if coords.len() < 3 { continue }
        if coords.first() != coords.last() { coords.push(coords[0]) }

        let is_exterior = signed_area(&coords) < 0.0 || exterior.is_none();
        let ring = LineString(coords);
        if is_exterior {
            if let Some(ext) = exterior.take() {
                polygons.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ring);
        } else {
            holes.push(ring);
        }
    }
    if let Some(ext) = exterior {
        polygons.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polygons)
}

#[cfg(test)]
mod tests {
    use shapefile::{Point, PolygonRing, Writer, dbase::{FieldName, TableWriterBuilder}};

    use super::*;

    fn square(x: f64) -> shapefile::Polygon {
        shapefile::Polygon::new(PolygonRing::Outer(vec![
            Point::new(x, 0.0), Point::new(x, 1.0), Point::new(x + 1.0, 1.0), Point::new(x + 1.0, 0.0), Point::new(x, 0.0),
        ]))
    }

    /// Write one unit square per value, side by side, with `JPT_KOD_JE` set to the value.
    fn write_fixture(path: &Path, table: TableWriterBuilder, values: Vec<FieldValue>) {
        let mut writer = Writer::from_path(path, table).unwrap();
        for (i, value) in values.into_iter().enumerate() {
            let mut record = Record::default();
            record.insert("JPT_KOD_JE".to_string(), value);
            writer.write_shape_and_record(&square(i as f64), &record).unwrap();
        }
    }

    fn field() -> FieldName { FieldName::try_from("JPT_KOD_JE").unwrap() }

    #[test]
    fn character_codes_are_read_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powiaty.shp");
        write_fixture(&path, TableWriterBuilder::new().add_character_field(field(), 10), vec![
            FieldValue::Character(Some("1465".to_string())),
            FieldValue::Character(Some("201".to_string())),
        ]);

        let layer = read_regions(&path, "JPT_KOD_JE", 4).unwrap();
        let codes = layer.codes().iter().map(AdminCode::as_str).collect::<Vec<_>>();
        assert_eq!(codes, ["1465", "0201"]);
        assert_eq!(layer.shapes()[1].0.len(), 1);
        assert_eq!(layer.bounds().unwrap().max().x, 2.0);
    }

    #[test]
    fn numeric_codes_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powiaty.shp");
        write_fixture(&path, TableWriterBuilder::new().add_numeric_field(field(), 10, 0), vec![
            FieldValue::Numeric(Some(206.0)),
        ]);

        let layer = read_regions(&path, "JPT_KOD_JE", 4).unwrap();
        assert_eq!(layer.codes()[0].as_str(), "0206");
    }

    #[test]
    fn empty_code_keeps_the_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powiaty.shp");
        write_fixture(&path, TableWriterBuilder::new().add_character_field(field(), 10), vec![
            FieldValue::Character(Some("0201".to_string())),
            FieldValue::Character(None),
        ]);

        let layer = read_regions(&path, "JPT_KOD_JE", 4).unwrap();
        assert_eq!(layer.len(), 2);
        assert!(layer.codes()[1].is_blank());
        assert_eq!(layer.row_of(&AdminCode::normalize("201", 4).unwrap()), Some(0));
    }

    #[test]
    fn missing_code_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powiaty.shp");
        write_fixture(&path, TableWriterBuilder::new().add_character_field(field(), 10), vec![
            FieldValue::Character(Some("0201".to_string())),
        ]);

        let err = read_regions(&path, "KOD", 4).unwrap_err();
        assert!(format!("{err:#}").contains("missing field: KOD"));
    }

    #[test]
    fn null_shape_becomes_empty_multipolygon() {
        assert!(shape_to_multipolygon(Shape::NullShape).unwrap().0.is_empty());
        assert!(shape_to_multipolygon(Shape::Point(Point::new(0.0, 0.0))).is_err());
    }

    fn ring(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn clockwise_rings_start_polygons_and_holes_attach() {
        let outer_a = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);   // clockwise
        let hole_a = ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);    // counter-clockwise
        let outer_b = ring(&[(10.0, 0.0), (10.0, 1.0), (11.0, 1.0), (11.0, 0.0)]);

        let mp = rings_to_multipolygon(vec![outer_a, hole_a, outer_b]);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_eq!(mp.0[1].interiors().len(), 0);
        assert_eq!(mp.0[0].exterior().0.first(), mp.0[0].exterior().0.last());
    }

    #[test]
    fn degenerate_rings_are_skipped() {
        let mp = rings_to_multipolygon(vec![ring(&[(0.0, 0.0), (1.0, 1.0)])]);
        assert!(mp.0.is_empty());
    }
}
