use std::path::Path;

use anyhow::Result;

use crate::{
    common,
    config::Config,
    data::{AttributeTable, ColumnLayout},
    io,
    party::Party,
    region::RegionLayer,
};
use super::{choropleth::{Choropleth, MapOptions}, render::CanvasSize};

/// Loads boundaries and attribute tables named by a `Config` and assembles choropleths.
/// Every map call re-reads its inputs, so one builder can serve several maps
/// without sharing state between them.
#[derive(Debug, Clone)]
pub struct MapBuilder {
    config: Config,
    verbose: u8,
}

impl MapBuilder {
    pub fn new(config: Config, verbose: u8) -> Self {
        Self { config, verbose }
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Party named by `default_party` in the configuration.
    pub fn default_party(&self) -> Result<Party> {
        Ok(Party::from_name(&self.config.default_party)?)
    }

    pub fn options(&self) -> MapOptions {
        MapOptions {
            year: self.config.render.year,
            on_key_mismatch: self.config.validation.on_key_mismatch,
            verbose: self.verbose,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize { width: self.config.render.width, margin: self.config.render.margin }
    }

    /// Read the boundary shapefile with normalized codes.
    pub fn load_regions(&self) -> Result<RegionLayer> {
        let boundaries = &self.config.boundaries;
        common::require_file_exists(&boundaries.path)?;
        if self.verbose > 0 {
            eprintln!("[maps] loading boundaries from {}", boundaries.path.display());
        }

        let layer = io::shp::read_regions(&boundaries.path, &boundaries.code_field, boundaries.code_width)?;
        if self.verbose > 0 {
            eprintln!("[maps] loaded {} regions", layer.len());
        }
        if self.verbose > 1 {
            if let Some(bounds) = layer.bounds() {
                eprintln!("[maps] bounds: ({:.1}, {:.1}) .. ({:.1}, {:.1})",
                    bounds.min().x, bounds.min().y, bounds.max().x, bounds.max().y);
            }
        }
        Ok(layer)
    }

    /// Read one party's vote share from the election table.
    pub fn load_support(&self, party: Party) -> Result<AttributeTable> {
        let election = &self.config.election;
        let layout = election.layout(election.party_columns.get(party));
        self.load_table(&format!("poparcie {party}"), &election.path, &layout)
    }

    /// Read natural growth per 1000 residents.
    pub fn load_growth(&self) -> Result<AttributeTable> {
        self.load_table("przyrost naturalny", &self.config.growth.path, &self.config.growth.layout())
    }

    fn load_table(&self, name: &str, path: &Path, layout: &ColumnLayout) -> Result<AttributeTable> {
        common::require_file_exists(path)?;
        if self.verbose > 0 {
            eprintln!("[maps] loading {name} from {} (columns {}/{}, skipping {} rows)",
                path.display(), layout.code_column, layout.value_column, layout.skip_rows);
        }

        let table = AttributeTable::read_csv(name, path, layout, self.config.boundaries.code_width)?;

        if self.verbose > 0 {
            eprintln!("[maps] {name}: {} rows, {} without code, {} unparseable values",
                table.len(), table.missing_codes, table.rejected_values);
        }
        Ok(table)
    }

    pub fn support_map(&self, party: Party) -> Result<Choropleth> {
        let layer = self.load_regions()?;
        let support = self.load_support(party)?;
        Choropleth::support(layer, &support, party, self.options())
    }

    pub fn growth_map(&self) -> Result<Choropleth> {
        let layer = self.load_regions()?;
        let growth = self.load_growth()?;
        Choropleth::growth(layer, &growth, self.options())
    }

    pub fn product_map(&self, party: Party) -> Result<Choropleth> {
        let layer = self.load_regions()?;
        let support = self.load_support(party)?;
        let growth = self.load_growth()?;
        Choropleth::product(layer, &support, &growth, party, self.options())
    }
}
