use crossframe::{Column, ColumnData, Frame, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Shape of a generated dataset.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub rows: usize,
    pub categorical_columns: usize,
    /// Distinct levels per categorical column.
    pub levels: usize,
    pub numeric_columns: usize,
    /// Probability that a cell is missing.
    pub missing_rate: f64,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            rows: 10_000,
            categorical_columns: 4,
            levels: 50,
            numeric_columns: 4,
            missing_rate: 0.05,
            seed: 7,
        }
    }
}

/// Generated frame with a regression outcome and a binary label.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub frame: Frame,
    pub regression_outcome: &'static str,
    pub binary_outcome: &'static str,
}

impl SyntheticData {
    /// Generate a frame where half the columns carry signal.
    ///
    /// Columns are named `cat_{i}` and `num_{i}`; the outcomes are `y` and
    /// `label` (`"yes"` / `"no"`).
    pub fn generate(spec: &SyntheticSpec) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
        let n = spec.rows;
        let mut y = vec![0.0; n];
        let mut columns = Vec::new();

        for c in 0..spec.categorical_columns {
            let effects: Vec<f64> = (0..spec.levels)
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect();
            let informative = c % 2 == 0;
            let mut values = Vec::with_capacity(n);
            for (row, target) in y.iter_mut().enumerate() {
                let level = rng.gen_range(0..spec.levels.max(1));
                if informative {
                    *target += effects[level];
                }
                values.push(if rng.gen_bool(spec.missing_rate) {
                    None
                } else {
                    Some(format!("L{level}_{}", row % 3))
                });
            }
            columns.push(Column::new(format!("cat_{c}"), ColumnData::Categorical(values)));
        }

        for c in 0..spec.numeric_columns {
            let weight = if c % 2 == 0 { 0.5 } else { 0.0 };
            let mut values = Vec::with_capacity(n);
            for target in y.iter_mut() {
                let x: f64 = rng.gen_range(-3.0..3.0);
                *target += weight * x;
                values.push(if rng.gen_bool(spec.missing_rate) {
                    None
                } else {
                    Some(x)
                });
            }
            columns.push(Column::new(format!("num_{c}"), ColumnData::Numeric(values)));
        }

        for target in y.iter_mut() {
            *target += rng.gen_range(-0.5..0.5);
        }
        let labels: Vec<Option<String>> = y
            .iter()
            .map(|&v| Some(if v > 0.0 { "yes" } else { "no" }.to_string()))
            .collect();
        columns.push(Column::new("y", ColumnData::from_f64(&y)));
        columns.push(Column::new("label", ColumnData::Categorical(labels)));

        Ok(Self {
            frame: Frame::new(columns)?,
            regression_outcome: "y",
            binary_outcome: "label",
        })
    }
}
