use std::{io::Write, path::Path};

use anyhow::{Result, anyhow};

use crate::{io::{csv, svg}, region::RegionLayer};
use super::choropleth::{Choropleth, Legend, NO_DATA_LABEL};

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy)]
pub struct CanvasSize {
    pub width: u32,
    pub margin: u32,
}

impl Default for CanvasSize {
    fn default() -> Self { Self { width: 1200, margin: 10 } }
}

impl Choropleth {
    /// Render the map as an SVG file.
    pub fn to_svg(&self, path: &Path, size: CanvasSize) -> Result<()> {
        let mut writer = svg::SvgWriter::new(path)?;
        self.write_svg(&mut writer, size)?;
        writer.flush()?;
        Ok(())
    }

    /// Render the map as an SVG string.
    pub fn to_svg_string(&self, size: CanvasSize) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_svg(&mut buffer, size)?;
        String::from_utf8(buffer).map_err(|e| anyhow!("[maps::render] SVG output is not valid UTF-8: {e}"))
    }

    /// Draw regions filled by class, then title and legend to the right of the map.
    pub fn write_svg<W: Write>(&self, writer: &mut W, size: CanvasSize) -> Result<()> {
        let bounds = self.layer.bounds()
            .ok_or_else(|| anyhow!("[maps::render] Could not determine bounds; nothing to draw."))?;
        let map_width = size.width as f64;
        let project = svg::Projection::fit(bounds, map_width, size.margin as f64);

        let width = map_width + svg::LEGEND_WIDTH;
        let height = project.height() + svg::TITLE_HEIGHT;

        let fills = self.fills()?;

        svg::write_svg_header(writer, width, height.max(360.0))?;
        svg::write_svg_title(writer, &self.title, map_width / 2.0)?;

        writeln!(writer, r#"<g transform="translate(0,{:.1})">"#, svg::TITLE_HEIGHT)?;
        for ((shape, fill), code) in self.layer.shapes().iter().zip(&fills).zip(self.layer.codes()) {
            if shape.0.is_empty() { continue }
            writeln!(writer, r#"<path class="region" data-code="{code}" d="{}" style="fill:{fill}"/>"#,
                svg::multipolygon_to_path(shape, &project))?;
        }
        writeln!(writer, "</g>")?;

        let (x, y) = (map_width, svg::TITLE_HEIGHT + size.margin as f64);
        match &self.legend {
            Legend::Classes { title, scale, .. } => {
                let colors = svg::class_colors(scale.buckets().len());
                let mut entries = scale.buckets().iter()
                    .zip(colors)
                    .map(|(bucket, color)| (bucket.label.as_str(), color))
                    .collect::<Vec<_>>();
                if fills.contains(&svg::NO_DATA) {
                    entries.push((NO_DATA_LABEL, svg::NO_DATA));
                }
                svg::write_categorical_legend(writer, title, &entries, x, y)?;
            }
            Legend::Range { title, min, max } => {
                svg::write_gradient_legend(writer, title, *min, *max, x, y)?;
            }
        }

        svg::write_svg_footer(writer)
    }
}

impl RegionLayer {
    /// Write the joined frame to a CSV file.
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        csv::write_csv(&mut self.data().clone(), path)
    }

    /// Write the joined frame to a CSV string.
    pub fn to_csv_string(&self) -> Result<String> {
        csv::write_csv_string(&mut self.data().clone())
    }

    /// Render region boundaries only, without data.
    pub fn outline_svg(&self, path: &Path, size: CanvasSize) -> Result<()> {
        let mut writer = svg::SvgWriter::new(path)?;
        self.write_outline_svg(&mut writer, size)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_outline_svg<W: Write>(&self, writer: &mut W, size: CanvasSize) -> Result<()> {
        let bounds = self.bounds()
            .ok_or_else(|| anyhow!("[maps::render] Could not determine bounds; nothing to draw."))?;
        let project = svg::Projection::fit(bounds, size.width as f64, size.margin as f64);

        svg::write_svg_header(writer, size.width as f64, project.height())?;
        for (shape, code) in self.shapes().iter().zip(self.codes()) {
            if shape.0.is_empty() { continue }
            writeln!(writer, r#"<path class="outline" data-code="{code}" d="{}"/>"#,
                svg::multipolygon_to_path(shape, &project))?;
        }
        svg::write_svg_footer(writer)
    }
}
