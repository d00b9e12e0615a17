//! Level bookkeeping shared by the categorical encoders.

use super::FitInput;
use crate::error::EncodeError;
use crate::frame::ColumnData;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

/// Level name given to missing categorical values.
pub const NA_LEVEL: &str = "_NA_";

/// Level key of `row`, with missing values mapped to [`NA_LEVEL`].
pub fn level_key(data: &ColumnData, row: usize) -> Cow<'_, str> {
    data.level_at(row).unwrap_or(Cow::Borrowed(NA_LEVEL))
}

/// Outcome sums for one level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LevelStats {
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl LevelStats {
    pub fn push(&mut self, y: f64) {
        self.count += 1;
        self.sum += y;
        self.sum_sq += y * y;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Population variance of the outcome within the level.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let m = self.mean();
        (self.sum_sq / self.count as f64 - m * m).max(0.0)
    }
}

/// Per-level outcome statistics over the fit rows, plus the totals.
#[derive(Clone, Debug, Default)]
pub struct LevelTable {
    pub levels: BTreeMap<String, LevelStats>,
    pub total: LevelStats,
}

impl LevelTable {
    /// Tabulate `input.rows`, failing when more than `max_levels` distinct
    /// levels are observed.
    pub fn collect(input: &FitInput<'_>, max_levels: usize) -> Result<Self, EncodeError> {
        let y = input.outcome.values();
        let mut table = LevelTable::default();
        for &row in input.rows {
            let key = level_key(input.data, row);
            if let Some(stats) = table.levels.get_mut(key.as_ref()) {
                stats.push(y[row]);
            } else {
                let mut stats = LevelStats::default();
                stats.push(y[row]);
                table.levels.insert(key.into_owned(), stats);
            }
            table.total.push(y[row]);
        }
        if table.levels.len() > max_levels {
            return Err(EncodeError::TooManyLevels {
                levels: table.levels.len(),
                limit: max_levels,
            });
        }
        Ok(table)
    }
}

/// Make a level usable inside a column name.
///
/// Characters other than ASCII alphanumerics become `_`.
pub fn sanitize_level(level: &str) -> String {
    let cleaned: String = level
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Append `_2`, `_3`, ... to names already taken.
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Smoothed level estimate centered on the grand mean.
///
/// Regression: `(sum + m * grand) / (n + m) - grand`.
/// Classification: `logit(p_hat) - logit(grand)` with
/// `p_hat = (sum + m * grand) / (n + m)`, probabilities clamped to
/// `[1e-6, 1 - 1e-6]`.
pub fn centered_estimate(
    stats: &LevelStats,
    grand: f64,
    smoothing: f64,
    classification: bool,
) -> f64 {
    let n = stats.count as f64;
    if n + smoothing <= 0.0 {
        return 0.0;
    }
    let shrunk = (stats.sum + smoothing * grand) / (n + smoothing);
    if classification {
        logit(shrunk) - logit(grand)
    } else {
        shrunk - grand
    }
}

const PROB_FLOOR: f64 = 1e-6;

fn logit(p: f64) -> f64 {
    let p = p.clamp(PROB_FLOOR, 1.0 - PROB_FLOOR);
    (p / (1.0 - p)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Outcome;

    #[test]
    fn test_level_key_maps_missing() {
        let data = ColumnData::categorical(vec![Some("a"), None]);
        assert_eq!(level_key(&data, 0), "a");
        assert_eq!(level_key(&data, 1), NA_LEVEL);
    }

    #[test]
    fn test_collect_counts_and_cap() {
        let data = ColumnData::categorical(vec![Some("a"), Some("b"), Some("a"), None]);
        let outcome = Outcome::regression("y", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let rows = [0, 1, 2, 3];
        let input = FitInput::new("c", &data, &outcome, &rows);

        let table = LevelTable::collect(&input, 10).unwrap();
        assert_eq!(table.levels["a"].count, 2);
        assert_eq!(table.levels["a"].sum, 4.0);
        assert_eq!(table.levels[NA_LEVEL].count, 1);
        assert_eq!(table.total.count, 4);

        let err = LevelTable::collect(&input, 2).unwrap_err();
        assert_eq!(err, EncodeError::TooManyLevels { levels: 3, limit: 2 });
    }

    #[test]
    fn test_sanitize_and_dedup() {
        assert_eq!(sanitize_level("new york"), "new_york");
        assert_eq!(sanitize_level(""), "_");
        let names = dedup_names(vec!["x_a_b".into(), "x_a_b".into(), "x_c".into()]);
        assert_eq!(names, vec!["x_a_b", "x_a_b_2", "x_c"]);
    }

    #[test]
    fn test_centered_estimate_regression() {
        let stats = LevelStats {
            count: 4,
            sum: 12.0,
            sum_sq: 40.0,
        };
        // (12 + 1 * 2) / 5 - 2 = 0.8
        let v = centered_estimate(&stats, 2.0, 1.0, false);
        assert!((v - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_centered_estimate_classification_is_finite() {
        let stats = LevelStats {
            count: 3,
            sum: 3.0,
            sum_sq: 3.0,
        };
        let v = centered_estimate(&stats, 0.5, 0.0, true);
        assert!(v.is_finite());
        assert!(v > 0.0);
    }

    #[test]
    fn test_level_variance() {
        let mut stats = LevelStats::default();
        for y in [1.0, 3.0] {
            stats.push(y);
        }
        assert_eq!(stats.mean(), 2.0);
        assert!((stats.variance() - 1.0).abs() < 1e-12);
    }
}
