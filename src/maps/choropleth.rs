use anyhow::Result;

use crate::{
    data::{AttributeTable, BinScale, INDEX_MAX, INDEX_MIN, JoinReport, KeyMismatchPolicy, divergence, left_join, product_index},
    io::svg::{NO_DATA, Rgb, class_colors, coolwarm},
    party::Party,
    region::RegionLayer,
};

pub const SUPPORT_COLUMN: &str = "Poparcie polityczne";
pub const SUPPORT_CLASS_COLUMN: &str = "Poparcie polityczne przedziały";
pub const GROWTH_COLUMN: &str = "Przyrost naturalny";
pub const GROWTH_CLASS_COLUMN: &str = "Przyrost naturalny przedział";
pub const PRODUCT_COLUMN: &str = "Indeks iloczynowy";

/// Legend label for regions without a classified value.
pub const NO_DATA_LABEL: &str = "brak danych";

/// Knobs shared by all map kinds.
#[derive(Debug, Clone, Copy)]
pub struct MapOptions {
    pub year: u16,
    pub on_key_mismatch: KeyMismatchPolicy,
    pub verbose: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self { year: 2023, on_key_mismatch: KeyMismatchPolicy::Warn, verbose: 0 }
    }
}

/// How values translate to colors.
#[derive(Debug, Clone)]
pub enum Legend {
    /// Fixed buckets; the label column holds each region's bucket.
    Classes { title: String, scale: BinScale, label_column: String },
    /// Continuous ramp over a fixed range.
    Range { title: String, min: f64, max: f64 },
}

impl Legend {
    pub fn title(&self) -> &str {
        match self {
            Legend::Classes { title, .. } | Legend::Range { title, .. } => title,
        }
    }
}

/// A joined layer ready to render: one value column plus how to color it.
#[derive(Debug, Clone)]
pub struct Choropleth {
    pub layer: RegionLayer,
    pub title: String,
    pub value_column: String,
    pub legend: Legend,
    pub reports: Vec<JoinReport>,
}

impl Choropleth {
    /// Vote share of `party`, classified into 5-point buckets over [0, 60).
    pub fn support(mut layer: RegionLayer, table: &AttributeTable, party: Party, options: MapOptions) -> Result<Self> {
        let report = left_join(&mut layer, table, SUPPORT_COLUMN, options.on_key_mismatch, options.verbose)?;

        let scale = BinScale::support();
        let unclassified = scale.classify_column(&mut layer, SUPPORT_COLUMN, SUPPORT_CLASS_COLUMN)?;
        log_unclassified(unclassified, layer.len(), options.verbose);

        Ok(Self {
            layer,
            title: format!("Mapa poparcia politycznego dla {party}, {}", options.year),
            value_column: SUPPORT_COLUMN.to_string(),
            legend: Legend::Classes {
                title: format!("Poparcie polityczne ({party}) w %"),
                scale,
                label_column: SUPPORT_CLASS_COLUMN.to_string(),
            },
            reports: vec![report],
        })
    }

    /// Natural growth per 1000 residents, classified on the open-ended growth scale.
    pub fn growth(mut layer: RegionLayer, table: &AttributeTable, options: MapOptions) -> Result<Self> {
        let report = left_join(&mut layer, table, GROWTH_COLUMN, options.on_key_mismatch, options.verbose)?;

        let scale = BinScale::growth();
        let unclassified = scale.classify_column(&mut layer, GROWTH_COLUMN, GROWTH_CLASS_COLUMN)?;
        log_unclassified(unclassified, layer.len(), options.verbose);

        Ok(Self {
            layer,
            title: format!("Mapa przyrostu naturalnego, rok {}", options.year),
            value_column: GROWTH_COLUMN.to_string(),
            legend: Legend::Classes {
                title: "Przyrost naturalny\nna 1000 mieszkańców".to_string(),
                scale,
                label_column: GROWTH_CLASS_COLUMN.to_string(),
            },
            reports: vec![report],
        })
    }

    /// Support x growth product index on a continuous [-100, 100] ramp.
    /// Both sources join the regions independently; rows matched by only one source are reported.
    pub fn product(
        mut layer: RegionLayer,
        support: &AttributeTable,
        growth: &AttributeTable,
        party: Party,
        options: MapOptions,
    ) -> Result<Self> {
        let support_report = left_join(&mut layer, support, SUPPORT_COLUMN, options.on_key_mismatch, options.verbose)?;
        let growth_report = left_join(&mut layer, growth, GROWTH_COLUMN, options.on_key_mismatch, options.verbose)?;

        let diverging = divergence(&support_report, &growth_report);
        if diverging > 0 {
            eprintln!("[maps] warning: {diverging} regions are matched by only one of {:?} and {:?}",
                support_report.table, growth_report.table);
        }

        let index = product_index(&layer.measure(SUPPORT_COLUMN)?, &layer.measure(GROWTH_COLUMN)?);
        if index.is_degenerate() {
            eprintln!("[maps] warning: all support x growth products are equal; product index set to 0");
        }
        if options.verbose > 0 {
            if let Some((min, max)) = index.range {
                eprintln!("[maps] product range before rescale: {min:.3} .. {max:.3}");
            }
        }
        layer.set_measure(PRODUCT_COLUMN, index.values)?;

        Ok(Self {
            layer,
            title: format!("Indeks iloczynowy: {party} x przyrost naturalny, {}", options.year),
            value_column: PRODUCT_COLUMN.to_string(),
            legend: Legend::Range {
                title: "Iloczyn poparcia i przyrostu\n(-100 do 100)".to_string(),
                min: INDEX_MIN,
                max: INDEX_MAX,
            },
            reports: vec![support_report, growth_report],
        })
    }

    /// One fill per region, in region order. Unclassified regions get `NO_DATA`.
    pub fn fills(&self) -> Result<Vec<Rgb>> {
        let values = self.layer.measure(&self.value_column)?;
        Ok(match &self.legend {
            Legend::Classes { scale, .. } => {
                let colors = class_colors(scale.buckets().len());
                values.into_iter()
                    .map(|v| scale.bucket_index(v).map_or(NO_DATA, |i| colors[i]))
                    .collect()
            }
            Legend::Range { min, max, .. } => values.into_iter()
                .map(|v| v.map_or(NO_DATA, |v| coolwarm((v - min) / (max - min))))
                .collect(),
        })
    }

    /// Number of regions with no color class.
    pub fn unclassified(&self) -> Result<usize> {
        Ok(self.fills()?.iter().filter(|&&c| c == NO_DATA).count())
    }
}

fn log_unclassified(unclassified: usize, total: usize, verbose: u8) {
    if verbose > 0 && unclassified > 0 {
        eprintln!("[maps] {unclassified} of {total} regions are unclassified");
    }
}

#[cfg(test)]
mod tests {
    use geo::MultiPolygon;

    use crate::region::AdminCode;
    use super::*;

    fn layer(codes: &[&str]) -> RegionLayer {
        let codes = codes.iter().map(|c| AdminCode::normalize(c, 4).unwrap()).collect::<Vec<_>>();
        RegionLayer::new(codes.clone(), vec![MultiPolygon(vec![]); codes.len()]).unwrap()
    }

    fn table(name: &str, cells: &[(&str, &str)]) -> AttributeTable {
        AttributeTable::from_cells(name, cells.iter().map(|(c, v)| (Some(*c), Some(*v))), 4)
    }

    #[test]
    fn support_map_classifies_and_titles() {
        let support = table("wyniki", &[("201", "12,5"), ("202", "61"), ("203", "x")]);
        let map = Choropleth::support(layer(&["201", "202", "203", "204"]), &support, Party::Ko, MapOptions::default()).unwrap();

        assert_eq!(map.title, "Mapa poparcia politycznego dla KO, 2023");
        assert_eq!(map.legend.title(), "Poparcie polityczne (KO) w %");
        assert_eq!(map.layer.labels(SUPPORT_CLASS_COLUMN).unwrap(), vec![Some("10 do 15".to_string()), None, None, None]);
        assert_eq!(map.unclassified().unwrap(), 3);
        assert_eq!(map.reports[0].matched, 3);
    }

    #[test]
    fn growth_map_uses_open_scale() {
        let growth = table("tabela", &[("1", "-25"), ("2", "6"), ("3", "0,5")]);
        let map = Choropleth::growth(layer(&["1", "2", "3"]), &growth, MapOptions::default()).unwrap();

        let labels = map.layer.labels(GROWTH_CLASS_COLUMN).unwrap();
        assert_eq!(labels, vec![Some("<-20".to_string()), Some("5 do 7".to_string()), Some("0 do 1".to_string())]);
        let fills = map.fills().unwrap();
        assert_eq!(fills[0], coolwarm(0.0));
        assert_ne!(fills[2], NO_DATA);
    }

    #[test]
    fn product_map_rescales_and_reports_divergence() {
        let support = table("wyniki", &[("1", "10"), ("2", "20"), ("3", "40")]);
        let growth = table("tabela", &[("1", "-2"), ("2", "1"), ("3", "2"), ("4", "5")]);
        let map = Choropleth::product(layer(&["1", "2", "3", "4"]), &support, &growth, Party::Pis, MapOptions::default()).unwrap();

        assert_eq!(map.layer.measure(PRODUCT_COLUMN).unwrap(), vec![Some(-100.0), Some(-20.0), Some(100.0), None]);
        assert_eq!(divergence(&map.reports[0], &map.reports[1]), 1);
        let fills = map.fills().unwrap();
        assert_eq!(fills[0], coolwarm(0.0));
        assert_eq!(fills[2], coolwarm(1.0));
        assert_eq!(fills[3], NO_DATA);
    }

    #[test]
    fn mismatched_keys_fail_under_error_policy() {
        let support = table("wyniki", &[("2010000", "10")]);
        let options = MapOptions { on_key_mismatch: KeyMismatchPolicy::Error, ..MapOptions::default() };
        assert!(Choropleth::support(layer(&["201"]), &support, Party::Ko, options).is_err());
    }
}
