use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use geo::{CoordsIter, LineString, MultiPolygon};
use polars::prelude::DataType;
use serde_json::{Map, Value, json};

use crate::region::RegionLayer;

impl RegionLayer {
    /// Export the joined layer as a GeoJSON FeatureCollection.
    /// Every frame column becomes a feature property; nulls stay null.
    pub fn to_geojson(&self) -> Result<Value> {
        let columns = self.data().get_columns();

        let features = self.shapes().iter().enumerate()
            .map(|(idx, shape)| -> Result<Value> {
                let mut properties = Map::new();
                for column in columns {
                    let value = match column.dtype() {
                        DataType::String => column.str()?.get(idx).map(|s| json!(s)),
                        DataType::Float64 => column.f64()?.get(idx).map(|v| json!(v)),
                        _ => None,
                    };
                    properties.insert(column.name().to_string(), value.unwrap_or(Value::Null));
                }

                Ok(json!({
                    "type": "Feature",
                    "id": self.codes()[idx].as_str(),
                    "geometry": multipolygon_to_geojson(shape),
                    "properties": properties,
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
    }

    /// Write `to_geojson` output to a file.
    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("[io::geojson] Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.to_geojson()?)
            .with_context(|| format!("[io::geojson] Failed to write {}", path.display()))
    }
}

fn multipolygon_to_geojson(shape: &MultiPolygon<f64>) -> Value {
    fn ring(ls: &LineString<f64>) -> Value {
        Value::Array(ls.coords_iter().map(|c| json!([c.x, c.y])).collect())
    }

    let polygons = shape.0.iter()
        .map(|polygon| {
            let mut rings = vec![ring(polygon.exterior())];
            rings.extend(polygon.interiors().iter().map(ring));
            Value::Array(rings)
        })
        .collect::<Vec<_>>();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use crate::region::AdminCode;
    use super::*;

    #[test]
    fn features_carry_frame_columns() {
        let shape = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)]]);
        let codes = vec![AdminCode::normalize("201", 4).unwrap(), AdminCode::normalize("202", 4).unwrap()];
        let mut layer = RegionLayer::new(codes, vec![shape.clone(), shape]).unwrap();
        layer.set_measure("support", vec![Some(12.5), None]).unwrap();

        let geojson = layer.to_geojson().unwrap();
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["id"], "0201");
        assert_eq!(features[0]["properties"]["JPT_KOD_JE"], "0201");
        assert_eq!(features[0]["properties"]["support"], 12.5);
        assert!(features[1]["properties"]["support"].is_null());
        assert_eq!(features[0]["geometry"]["coordinates"][0][0].as_array().unwrap().len(), 4);
    }
}
