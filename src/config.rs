use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{data::{ColumnLayout, KeyMismatchPolicy}, party::PartyColumns, region::DEFAULT_CODE_WIDTH};

fn default_code_field() -> String { "JPT_KOD_JE".to_string() }
fn default_code_width() -> usize { DEFAULT_CODE_WIDTH }
fn default_party() -> String { "KO".to_string() }
fn default_growth_skip_rows() -> usize { ColumnLayout::growth().skip_rows }
fn default_growth_code_column() -> usize { ColumnLayout::growth().code_column }
fn default_growth_value_column() -> usize { ColumnLayout::growth().value_column }

/// Everything a map run needs, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub boundaries: BoundaryConfig,
    pub election: ElectionConfig,
    pub growth: GrowthConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default = "default_party")]
    pub default_party: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoundaryConfig {
    pub path: PathBuf,
    #[serde(default = "default_code_field")]
    pub code_field: String,
    #[serde(default = "default_code_width")]
    pub code_width: usize,
}

/// Election results table. Party vote shares sit in one column per committee.
#[derive(Debug, Deserialize, Clone)]
pub struct ElectionConfig {
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub has_header: bool,
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default)]
    pub code_column: usize,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default)]
    pub party_columns: PartyColumns,
}

fn default_true() -> bool { true }
fn default_separator() -> char { ';' }

impl ElectionConfig {
    /// Layout for reading one party's column.
    pub fn layout(&self, value_column: usize) -> ColumnLayout {
        ColumnLayout {
            has_header: self.has_header,
            skip_rows: self.skip_rows,
            code_column: self.code_column,
            value_column,
            separator: self.separator,
        }
    }
}

/// Natural-growth table (per 1000 residents).
#[derive(Debug, Deserialize, Clone)]
pub struct GrowthConfig {
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub has_header: bool,
    #[serde(default = "default_growth_skip_rows")]
    pub skip_rows: usize,
    #[serde(default = "default_growth_code_column")]
    pub code_column: usize,
    #[serde(default = "default_growth_value_column")]
    pub value_column: usize,
    #[serde(default = "default_separator")]
    pub separator: char,
}

impl GrowthConfig {
    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            has_header: self.has_header,
            skip_rows: self.skip_rows,
            code_column: self.code_column,
            value_column: self.value_column,
            separator: self.separator,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub margin: u32,
    /// Year printed in map titles.
    pub year: u16,
}

impl Default for RenderConfig {
    fn default() -> Self { Self { width: 1200, margin: 10, year: 2023 } }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ValidationConfig {
    pub on_key_mismatch: KeyMismatchPolicy,
}

impl Config {
    /// Parse a TOML configuration string. Relative paths are kept as written.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| "[config] Failed to parse TOML configuration")
    }

    /// Load a configuration file; relative input paths resolve against its directory.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.boundaries.path, &mut self.election.path, &mut self.growth.path] {
            if path.is_relative() { *path = base.join(&*path) }
        }
    }
}
