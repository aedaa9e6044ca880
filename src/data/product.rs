//! Support x growth product index.
//!
//! This is a visualization transform, not a correlation coefficient: each region's
//! support share is multiplied by its natural growth rate, and the products are
//! min-max rescaled onto [-100, 100] using only the current map's own extremes.
//! Values are therefore not comparable between maps built from different inputs.

/// Outcome of a product-index computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductIndex {
    pub values: Vec<Option<f64>>,
    /// Extremes of the raw products, if any product was defined.
    pub range: Option<(f64, f64)>,
}

impl ProductIndex {
    /// True when every defined product was equal and the rescale collapsed to 0.
    pub fn is_degenerate(&self) -> bool {
        matches!(self.range, Some((min, max)) if min == max)
    }
}

pub const INDEX_MIN: f64 = -100.0;
pub const INDEX_MAX: f64 = 100.0;

/// Pointwise product of two aligned measures, rescaled to [-100, 100].
/// A region missing either measure stays null. If all products are equal they map to 0.
pub fn product_index(support: &[Option<f64>], growth: &[Option<f64>]) -> ProductIndex {
    let products = support.iter()
        .zip(growth)
        .map(|(s, g)| Some((*s)? * (*g)?))
        .collect::<Vec<_>>();

    let range = products.iter()
        .flatten()
        .fold(None, |acc: Option<(f64, f64)>, &p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        });

    let values = match range {
        None => products,
        Some((min, max)) if min == max => products.iter().map(|p| p.map(|_| 0.0)).collect(),
        Some((min, max)) => products.iter()
            .map(|p| p.map(|p| (INDEX_MAX - INDEX_MIN) * (p - min) / (max - min) + INDEX_MIN))
            .collect(),
    };

    ProductIndex { values, range }
}
