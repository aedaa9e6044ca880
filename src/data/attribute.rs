use anyhow::{Result, anyhow, ensure};
use polars::frame::DataFrame;

use crate::region::AdminCode;
use super::coerce::coerce_column;

const DEFAULT_SEPARATOR: char = ';';

/// Position of the code and value columns inside a source table.
/// Indices count from zero over the columns of the file; `skip_rows` counts data rows after the header.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub has_header: bool,
    pub skip_rows: usize,
    pub code_column: usize,
    pub value_column: usize,
    pub separator: char,
}

impl ColumnLayout {
    /// Layout of the natural-growth table (GUS "Tabela III"): nine preamble rows after the header,
    /// code in the second column, growth per 1000 residents in the nineteenth.
    pub fn growth() -> Self {
        Self { has_header: true, skip_rows: 9, code_column: 1, value_column: 18, separator: DEFAULT_SEPARATOR }
    }

    /// Layout of the election table for one party column.
    pub fn election(value_column: usize) -> Self {
        Self { has_header: true, skip_rows: 0, code_column: 0, value_column, separator: DEFAULT_SEPARATOR }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRow {
    pub code: AdminCode,
    pub value: Option<f64>,
}

/// One measure keyed by administrative code, after normalization and coercion.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    pub name: String,
    pub rows: Vec<AttributeRow>,
    /// Rows dropped because the code cell was blank.
    pub missing_codes: usize,
    /// Non-blank value cells that failed to parse and were nulled.
    pub rejected_values: usize,
}

impl AttributeTable {
    /// Build a table from plain (code, value) cells.
    pub fn from_cells<'a>(
        name: &str,
        cells: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
        code_width: usize,
    ) -> Self {
        let (codes, values): (Vec<_>, Vec<_>) = cells.into_iter().unzip();
        let (values, rejected_values) = coerce_column(values);

        let mut missing_codes = 0;
        let rows = codes.into_iter()
            .zip(values)
            .filter_map(|(code, value)| {
                let code = code.and_then(|c| AdminCode::normalize(c, code_width));
                if code.is_none() { missing_codes += 1 }
                Some(AttributeRow { code: code?, value })
            })
            .collect();

        Self { name: name.to_string(), rows, missing_codes, rejected_values }
    }

    /// Select the layout's columns from a frame whose columns were all read as strings.
    pub fn from_frame(name: &str, df: &DataFrame, layout: &ColumnLayout, code_width: usize) -> Result<Self> {
        let width = df.width();
        for (what, index) in [("code", layout.code_column), ("value", layout.value_column)] {
            ensure!(index < width,
                "[data::attribute] {name}: {what} column index {index} is out of range for a table with {width} columns");
        }

        let df = df.slice(layout.skip_rows as i64, df.height().saturating_sub(layout.skip_rows));
        let columns = df.get_columns();
        let codes = columns[layout.code_column].str()
            .map_err(|e| anyhow!("[data::attribute] {name}: code column is not text: {e}"))?;
        let values = columns[layout.value_column].str()
            .map_err(|e| anyhow!("[data::attribute] {name}: value column is not text: {e}"))?;

        Ok(Self::from_cells(name, codes.into_iter().zip(values.into_iter()), code_width))
    }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
