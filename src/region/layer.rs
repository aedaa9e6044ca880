use ahash::AHashMap;
use anyhow::{Context, Result, anyhow, ensure};
use geo::{BoundingRect, MultiPolygon, Rect, coord};
use polars::{frame::DataFrame, prelude::{Column, DataType}};

use super::code::AdminCode;

/// Name of the key column in every frame built by this crate.
pub const CODE_COLUMN: &str = "JPT_KOD_JE";

/// A set of regions loaded from a boundary file, with one data row per region.
/// Geometry and codes are fixed at load time; joins and classification only add columns.
#[derive(Debug, Clone)]
pub struct RegionLayer {
    codes: Vec<AdminCode>,
    shapes: Vec<MultiPolygon<f64>>,
    data: DataFrame,
    index: AHashMap<AdminCode, u32>, // first row holding each code
}

impl RegionLayer {
    /// Build a layer from parallel lists of codes and shapes.
    pub fn new(codes: Vec<AdminCode>, shapes: Vec<MultiPolygon<f64>>) -> Result<Self> {
        ensure!(codes.len() == shapes.len(),
            "[region::layer] {} codes for {} shapes", codes.len(), shapes.len());

        let data = DataFrame::new(vec![
            Column::new(CODE_COLUMN.into(), codes.iter()
                .map(|code| (!code.is_blank()).then(|| code.as_str()))
                .collect::<Vec<_>>()),
        ])?;

        let mut index = AHashMap::with_capacity(codes.len());
        for (i, code) in codes.iter().enumerate() {
            if code.is_blank() { continue }
            index.entry(code.clone()).or_insert(i as u32);
        }

        Ok(Self { codes, shapes, data, index })
    }

    #[inline] pub fn len(&self) -> usize { self.codes.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.codes.is_empty() }
    #[inline] pub fn codes(&self) -> &[AdminCode] { &self.codes }
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    /// Row index of the first region carrying `code`.
    pub fn row_of(&self, code: &AdminCode) -> Option<usize> {
        self.index.get(code).map(|&i| i as usize)
    }

    /// Bounding box of all shapes, or None if every shape is empty.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|shape| shape.bounding_rect())
            .reduce(|a, b| Rect::new(
                coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
    }

    /// Add (or replace) a nullable float column aligned to region order.
    pub fn set_measure(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        ensure!(values.len() == self.len(),
            "[region::layer] column {name:?} has {} values for {} regions", values.len(), self.len());
        self.data.with_column(Column::new(name.into(), values))
            .with_context(|| format!("[region::layer] Failed to add column {name:?}"))?;
        Ok(())
    }

    /// Add (or replace) a nullable label column aligned to region order.
    pub fn set_labels(&mut self, name: &str, labels: Vec<Option<&str>>) -> Result<()> {
        ensure!(labels.len() == self.len(),
            "[region::layer] column {name:?} has {} labels for {} regions", labels.len(), self.len());
        self.data.with_column(Column::new(name.into(), labels))
            .with_context(|| format!("[region::layer] Failed to add column {name:?}"))?;
        Ok(())
    }

    /// Read a float column back as region-ordered options.
    pub fn measure(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.data.column(name)
            .with_context(|| format!("[region::layer] missing column {name:?}"))?;
        let column = if column.dtype() != &DataType::Float64 {
            column.cast(&DataType::Float64)?
        } else {
            column.clone()
        };
        let values = column.f64()
            .map_err(|e| anyhow!("[region::layer] column {name:?} is not numeric: {e}"))?;
        Ok(values.into_iter().collect())
    }

    /// Read a label column back as region-ordered options.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.data.column(name)
            .with_context(|| format!("[region::layer] missing column {name:?}"))?;
        let labels = column.str()
            .map_err(|e| anyhow!("[region::layer] column {name:?} is not a string column: {e}"))?;
        Ok(labels.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y),
        ]])
    }

    fn layer(codes: &[&str]) -> RegionLayer {
        let codes = codes.iter().map(|c| AdminCode::normalize(c, 4).unwrap()).collect::<Vec<_>>();
        let shapes = (0..codes.len()).map(|i| square(i as f64, 0.0)).collect();
        RegionLayer::new(codes, shapes).unwrap()
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let codes = vec![AdminCode::normalize("1", 4).unwrap()];
        assert!(RegionLayer::new(codes, vec![]).is_err());
    }

    #[test]
    fn frame_starts_with_code_column() {
        let layer = layer(&["201", "1465"]);
        assert_eq!(layer.data().height(), 2);
        assert_eq!(layer.data().get_column_names()[0].as_str(), CODE_COLUMN);
        assert_eq!(layer.row_of(&AdminCode::normalize("0201", 4).unwrap()), Some(0));
    }

    #[test]
    fn blank_codes_keep_their_row_but_are_not_indexed() {
        let codes = vec![AdminCode::normalize("201", 4).unwrap(), AdminCode::blank()];
        let layer = RegionLayer::new(codes, vec![square(0.0, 0.0), square(1.0, 0.0)]).unwrap();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.data().height(), 2);
        assert_eq!(layer.row_of(&AdminCode::blank()), None);
        assert_eq!(layer.data().column(CODE_COLUMN).unwrap().null_count(), 1);
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let bounds = layer(&["1", "2", "3"]).bounds().unwrap();
        assert_eq!(bounds.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(bounds.max(), coord! { x: 3.0, y: 1.0 });
    }

    #[test]
    fn measure_and_labels_round_trip_through_frame() {
        let mut layer = layer(&["1", "2"]);
        layer.set_measure("support", vec![Some(12.5), None]).unwrap();
        layer.set_labels("bucket", vec![Some("10 do 15"), None]).unwrap();
        assert_eq!(layer.measure("support").unwrap(), vec![Some(12.5), None]);
        assert_eq!(layer.labels("bucket").unwrap(), vec![Some("10 do 15".to_string()), None]);
        assert!(layer.set_measure("bad", vec![None]).is_err());
    }
}
