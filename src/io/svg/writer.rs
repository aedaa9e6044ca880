//! SVG writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

use super::color::{Rgb, coolwarm};

/// Width reserved to the right of the map for the legend.
pub(crate) const LEGEND_WIDTH: f64 = 220.0;
/// Height reserved above the map for the title.
pub(crate) const TITLE_HEIGHT: f64 = 40.0;

const SWATCH: f64 = 14.0;
const ROW: f64 = 20.0;

pub(crate) struct SvgWriter {
    writer: BufWriter<File>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl SvgWriter {
    /// Create a new SVG writer to a file path
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[io::svg] Failed to create {}", path.display()))?;

        Ok(Self { writer: BufWriter::new(file) })
    }
}

/// Escape text content for XML.
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Write the XML declaration, opening <svg> tag, background and styles.
pub(crate) fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"##)?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    writeln!(writer, r##"<defs>
<style>
    .region {{ stroke: #000000; stroke-width: 0.4; fill-rule: evenodd; }}
    .outline {{ fill: none; stroke: #000000; stroke-width: 1; }}
    .title {{ font: bold 18px sans-serif; }}
    .legend {{ font: 12px sans-serif; }}
    .legend-title {{ font: bold 13px sans-serif; }}
</style>
</defs>"##)?;
    Ok(())
}

/// Write a centered title line.
pub(crate) fn write_svg_title<W: Write>(writer: &mut W, title: &str, x: f64) -> Result<()> {
    writeln!(writer, r#"<text class="title" x="{x:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        TITLE_HEIGHT * 0.65, escape(title))?;
    Ok(())
}

/// Write a legend with one swatch per class, top-left corner at (x, y).
pub(crate) fn write_categorical_legend<W: Write>(
    writer: &mut W,
    title: &str,
    entries: &[(&str, Rgb)],
    x: f64,
    y: f64,
) -> Result<()> {
    writeln!(writer, r#"<g class="legend" transform="translate({x:.1},{y:.1})">"#)?;
    let offset = write_legend_title(writer, title)?;
    for (i, (label, color)) in entries.iter().enumerate() {
        let top = offset + ROW * i as f64;
        writeln!(writer, r##"<rect x="0" y="{top:.1}" width="{SWATCH}" height="{SWATCH}" fill="{color}" stroke="#000000" stroke-width="0.4"/>"##)?;
        writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{}</text>"#, SWATCH + 6.0, top + SWATCH - 2.0, escape(label))?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

/// Write a vertical color bar for a continuous value range, top-left corner at (x, y).
pub(crate) fn write_gradient_legend<W: Write>(
    writer: &mut W,
    title: &str,
    min: f64,
    max: f64,
    x: f64,
    y: f64,
) -> Result<()> {
    const BAR: f64 = 200.0;
    const STOPS: usize = 11;

    writeln!(writer, r#"<g class="legend" transform="translate({x:.1},{y:.1})">"#)?;
    let offset = write_legend_title(writer, title)?;
    writeln!(writer, r#"<linearGradient id="ramp" x1="0" y1="1" x2="0" y2="0">"#)?;
    for i in 0..STOPS {
        let t = i as f64 / (STOPS - 1) as f64;
        writeln!(writer, r#"<stop offset="{t:.2}" stop-color="{}"/>"#, coolwarm(t))?;
    }
    writeln!(writer, "</linearGradient>")?;
    writeln!(writer, r##"<rect x="0" y="{offset:.1}" width="{SWATCH}" height="{BAR}" fill="url(#ramp)" stroke="#000000" stroke-width="0.4"/>"##)?;
    writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{max}</text>"#, SWATCH + 6.0, offset + 10.0)?;
    writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{min}</text>"#, SWATCH + 6.0, offset + BAR)?;
    writeln!(writer, "</g>")?;
    Ok(())
}

/// One text line per title line; returns the vertical space used.
fn write_legend_title<W: Write>(writer: &mut W, title: &str) -> Result<f64> {
    let mut used = 0.0;
    for line in title.lines() {
        used += 16.0;
        writeln!(writer, r#"<text class="legend-title" x="0" y="{used:.1}">{}</text>"#, escape(line))?;
    }
    Ok(used + 8.0)
}

/// Write the closing </svg> tag.
pub(crate) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<-20 & >12"), "&lt;-20 &amp; &gt;12");
    }

    #[test]
    fn categorical_legend_lists_every_entry() {
        let mut out = Vec::new();
        let entries = [("0 do 5", coolwarm(0.0)), ("brak danych", Rgb { r: 200, g: 200, b: 200 })];
        write_categorical_legend(&mut out, "Poparcie", &entries, 0.0, 0.0).unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains(">0 do 5</text>"));
        assert!(svg.contains("rgb(200,200,200)"));
    }
}
