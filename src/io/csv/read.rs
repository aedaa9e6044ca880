//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result, anyhow};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader}};

use crate::data::{AttributeTable, ColumnLayout};

/// Build reader options for a layout: every column is read as text so that codes keep
/// their leading zeros and decimal commas survive until coercion.
fn layout_options(layout: &ColumnLayout) -> Result<CsvReadOptions> {
    let separator = u8::try_from(layout.separator)
        .map_err(|_| anyhow!("[io::csv::read] separator {:?} is not a single-byte character", layout.separator))?;

    Ok(CsvReadOptions::default()
        .with_has_header(layout.has_header)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po
            .with_separator(separator)
            .with_truncate_ragged_lines(true)))
}

/// Reads a delimited attribute table from `path` with all columns as strings.
pub(crate) fn read_table(path: &Path, layout: &ColumnLayout) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open table: {}", path.display()))?;
    layout_options(layout)?
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read table from {:?}", path))
}

/// Reads a delimited attribute table from a string (fixtures and in-memory sources).
pub(crate) fn read_table_string(csv: &str, layout: &ColumnLayout) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(csv.as_bytes()))
        .with_options(layout_options(layout)?)
        .finish()
        .context("[io::csv::read] Failed to read table from string")
}

impl AttributeTable {
    /// Read a delimited file and select the layout's code and value columns.
    pub fn read_csv(name: &str, path: &Path, layout: &ColumnLayout, code_width: usize) -> Result<Self> {
        let df = read_table(path, layout)?;
        Self::from_frame(name, &df, layout, code_width)
            .with_context(|| format!("[io::csv::read] Failed to select columns from {}", path.display()))
    }

    /// Same as `read_csv`, from an in-memory string.
    pub fn read_csv_str(name: &str, csv: &str, layout: &ColumnLayout, code_width: usize) -> Result<Self> {
        Self::from_frame(name, &read_table_string(csv, layout)?, layout, code_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_keep_leading_zeros() {
        let layout = ColumnLayout { has_header: true, skip_rows: 0, code_column: 0, value_column: 1, separator: ';' };
        let df = read_table_string("kod;wartosc\n0201;12,5\n0202;\n", &layout).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.get_columns()[0].str().unwrap().get(0), Some("0201"));
        assert_eq!(df.get_columns()[1].str().unwrap().get(0), Some("12,5"));
    }

    #[test]
    fn growth_layout_skips_preamble() {
        let mut csv = String::new();
        csv.push_str(&(0..19).map(|i| format!("c{i}")).collect::<Vec<_>>().join(";"));
        csv.push('\n');
        for i in 0..9 {
            csv.push_str(&format!("uwagi {i}"));
            csv.push_str(&";".repeat(18));
            csv.push('\n');
        }
        csv.push_str(";201");
        csv.push_str(&";".repeat(16));
        csv.push_str(";-3,2\n");

        let table = AttributeTable::read_csv_str("przyrost", &csv, &ColumnLayout::growth(), 4).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].code.as_str(), "0201");
        assert_eq!(table.rows[0].value, Some(-3.2));
    }

    #[test]
    fn multibyte_separator_is_rejected() {
        let layout = ColumnLayout { separator: 'ś', ..ColumnLayout::election(1) };
        assert!(read_table_string("a;b\n", &layout).is_err());
    }
}
