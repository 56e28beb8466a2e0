//! Min-max scaling of numeric attributes into `[0, 1]`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Learned range of one numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// Scale a finite `x` into `[0, 1]`, clipping values outside the fitted
    /// range. A constant feature maps everything to 0.
    #[inline]
    pub fn scale(&self, x: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((x - self.min) / span).clamp(0.0, 1.0) as f32
    }
}

/// Per-feature min-max normalizer.
///
/// Missing values are imputed to 0 both when fitting and when transforming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    ranges: Vec<FeatureRange>,
}

impl MinMaxNormalizer {
    /// Fit over rows of `n_features` optional values each.
    pub fn fit(rows: &[Vec<Option<f64>>], n_features: usize) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut ranges = vec![
            FeatureRange {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            };
            n_features
        ];

        for row in rows {
            if row.len() != n_features {
                return Err(Error::InvalidArgument(format!(
                    "expected {} numeric features, got {}",
                    n_features,
                    row.len()
                )));
            }
            for (range, value) in ranges.iter_mut().zip(row.iter()) {
                let x = impute(*value);
                range.min = range.min.min(x);
                range.max = range.max.max(x);
            }
        }

        Ok(Self { ranges })
    }

    /// Scale one row. Never fails: missing or out-of-range inputs are imputed
    /// and clipped, extra values are ignored and short rows padded with 0.
    pub fn transform(&self, row: &[Option<f64>]) -> Vec<f32> {
        self.ranges
            .iter()
            .enumerate()
            .map(|(i, range)| range.scale(impute(row.get(i).copied().flatten())))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[FeatureRange] {
        &self.ranges
    }
}

#[inline]
fn impute(value: Option<f64>) -> f64 {
    match value {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}
