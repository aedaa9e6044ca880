use std::fmt;

use anyhow::Result;

use crate::region::RegionLayer;

/// Rejected bin definition.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidBinScale {
    TooFewEdges(usize),
    LabelCount { edges: usize, labels: usize },
    NotAscending { index: usize },
}

impl fmt::Display for InvalidBinScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewEdges(n) => write!(f, "bin scale needs at least 2 edges, got {n}"),
            Self::LabelCount { edges, labels } =>
                write!(f, "{edges} edges need {} labels, got {labels}", edges - 1),
            Self::NotAscending { index } =>
                write!(f, "bin edges must be strictly ascending (edge {index} is not)"),
        }
    }
}

impl std::error::Error for InvalidBinScale {}

/// Labeled half-open interval `[lo, hi)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lo: f64,
    pub hi: f64,
    pub label: String,
}

impl Bucket {
    #[inline]
    pub fn contains(&self, value: f64) -> bool { self.lo <= value && value < self.hi }
}

/// A fixed partition of (part of) the real line into labeled buckets.
/// Values outside the outermost edges stay unclassified, so use infinite sentinels for total coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct BinScale {
    buckets: Vec<Bucket>,
}

impl BinScale {
    pub fn new<S: Into<String>>(edges: &[f64], labels: impl IntoIterator<Item = S>) -> Result<Self, InvalidBinScale> {
        if edges.len() < 2 { return Err(InvalidBinScale::TooFewEdges(edges.len())) }

        let labels = labels.into_iter().map(Into::into).collect::<Vec<String>>();
        if labels.len() != edges.len() - 1 {
            return Err(InvalidBinScale::LabelCount { edges: edges.len(), labels: labels.len() })
        }

        if let Some(index) = edges.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(InvalidBinScale::NotAscending { index: index + 1 })
        }

        let buckets = edges.windows(2)
            .zip(labels)
            .map(|(w, label)| Bucket { lo: w[0], hi: w[1], label })
            .collect();

        Ok(Self { buckets })
    }

    /// Vote share in percent: twelve 5-point buckets over [0, 60).
    pub fn support() -> Self {
        let edges = (0..=12).map(|i| i as f64 * 5.0).collect::<Vec<_>>();
        let labels = edges.windows(2).map(|w| format!("{} do {}", w[0], w[1]));
        Self::new(&edges, labels).expect("support scale is well-formed")
    }

    /// Natural growth per 1000 residents, open at both ends.
    pub fn growth() -> Self {
        const EDGES: [f64; 21] = [
            f64::NEG_INFINITY, -20.0, -15.0, -13.0, -10.0, -8.0, -5.0, -3.0, -1.0, 0.0,
            1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 8.0, 9.0, 11.0, 12.0, f64::INFINITY,
        ];
        const LABELS: [&str; 20] = [
            "<-20", "-20 do -15", "-15 do -13", "-13 do -10", "-10 do -8", "-8 do -5",
            "-5 do -3", "-3 do -1", "-1 do 0", "0 do 1", "1 do 2", "2 do 3",
            "3 do 4", "4 do 5", "5 do 7", "7 do 8", "8 do 9", "9 do 11", "11 do 12", ">12",
        ];
        Self::new(&EDGES, LABELS).expect("growth scale is well-formed")
    }

    #[inline] pub fn buckets(&self) -> &[Bucket] { &self.buckets }

    /// Index of the bucket holding `value`, or None for null, NaN, or out-of-range values.
    pub fn bucket_index(&self, value: Option<f64>) -> Option<usize> {
        let value = value?;
        // buckets are sorted, so binary search on the upper edge
        let i = self.buckets.partition_point(|b| b.hi <= value);
        self.buckets.get(i).filter(|b| b.contains(value)).map(|_| i)
    }

    pub fn classify(&self, value: Option<f64>) -> Option<&str> {
        self.bucket_index(value).map(|i| self.buckets[i].label.as_str())
    }

    /// Classify the float column `source` of `layer` into a new label column `target`.
    /// Returns the number of regions left unclassified.
    pub fn classify_column(&self, layer: &mut RegionLayer, source: &str, target: &str) -> Result<usize> {
        let values = layer.measure(source)?;
        let labels = values.iter()
            .map(|&value| self.classify(value))
            .collect::<Vec<_>>();
        let unclassified = labels.iter().filter(|label| label.is_none()).count();
        layer.set_labels(target, labels)?;
        Ok(unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_scale_labels() {
        let scale = BinScale::support();
        assert_eq!(scale.buckets().len(), 12);
        assert_eq!(scale.buckets()[0].label, "0 do 5");
        assert_eq!(scale.buckets()[11].label, "55 do 60");
        assert_eq!(scale.classify(Some(12.5)), Some("10 do 15"));
    }

    #[test]
    fn support_scale_is_bounded() {
        let scale = BinScale::support();
        assert_eq!(scale.classify(Some(0.0)), Some("0 do 5"));
        assert_eq!(scale.classify(Some(5.0)), Some("5 do 10"));
        assert_eq!(scale.classify(Some(59.99)), Some("55 do 60"));
        assert_eq!(scale.classify(Some(60.0)), None);
        assert_eq!(scale.classify(Some(-0.1)), None);
        assert_eq!(scale.classify(None), None);
    }

    #[test]
    fn growth_scale_examples() {
        let scale = BinScale::growth();
        assert_eq!(scale.classify(Some(-25.0)), Some("<-20"));
        assert_eq!(scale.classify(Some(6.0)), Some("5 do 7"));
        assert_eq!(scale.classify(Some(-8.0)), Some("-8 do -5"));
        assert_eq!(scale.classify(Some(-20.0)), Some("-20 do -15"));
        assert_eq!(scale.classify(Some(-20.001)), Some("<-20"));
        assert_eq!(scale.classify(Some(12.0)), Some(">12"));
        assert_eq!(scale.classify(Some(f64::NAN)), None);
    }

    #[test]
    fn growth_scale_is_total_and_non_overlapping() {
        let scale = BinScale::growth();
        let mut v = -40.0;
        while v <= 40.0 {
            let hits = scale.buckets().iter().filter(|b| b.contains(v)).count();
            assert_eq!(hits, 1, "value {v} fell in {hits} buckets");
            assert!(scale.classify(Some(v)).is_some());
            v += 0.25;
        }
        assert!(scale.classify(Some(f64::MAX)).is_some());
        assert!(scale.classify(Some(f64::MIN)).is_some());
    }

    #[test]
    fn rejects_malformed_scales() {
        assert_eq!(BinScale::new(&[1.0], Vec::<String>::new()), Err(InvalidBinScale::TooFewEdges(1)));
        assert_eq!(
            BinScale::new(&[0.0, 1.0, 2.0], ["a"]),
            Err(InvalidBinScale::LabelCount { edges: 3, labels: 1 }),
        );
        assert_eq!(
            BinScale::new(&[0.0, 2.0, 2.0], ["a", "b"]),
            Err(InvalidBinScale::NotAscending { index: 2 }),
        );
    }
}
