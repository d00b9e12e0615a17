//! Fold plans: seeded partitions of training rows into disjoint groups.
//!
//! A plan assigns every row `0..n` to exactly one of `k` folds. Encoders fit
//! for fold `f` see only `complement(f)` and are applied only to `rows_in(f)`.

use crate::error::{Result, TreatmentError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How rows are balanced across folds.
#[derive(Clone, Copy, Debug, Default)]
pub enum Stratification<'a> {
    /// Seeded shuffle dealt round-robin.
    #[default]
    None,
    /// Keep label proportions per fold as equal as integer division allows.
    ByLabel(&'a [f64]),
    /// Spread the outcome range evenly: sort by value, deal blocks of `k`.
    ByOrder(&'a [f64]),
}

/// Partition of row positions into `k` non-empty, disjoint, exhaustive folds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldPlan {
    k: usize,
    assignment: Vec<usize>,
    folds: Vec<Vec<usize>>,
}

impl FoldPlan {
    /// Build a seeded plan over `row_count` rows.
    ///
    /// # Errors
    /// - [`TreatmentError::InvalidConfig`] when `k < 2`.
    /// - [`TreatmentError::Precondition`] when `row_count < k` or the
    ///   stratification vector length differs from `row_count`.
    pub fn build(
        row_count: usize,
        k: usize,
        stratification: Stratification<'_>,
        seed: u64,
    ) -> Result<Self> {
        if k < 2 {
            return Err(TreatmentError::InvalidConfig(format!(
                "fold count must be at least 2, got {k}"
            )));
        }
        if row_count < k {
            return Err(TreatmentError::Precondition(format!(
                "{row_count} rows cannot be split into {k} folds"
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let assignment = match stratification {
            Stratification::None => {
                let mut order: Vec<usize> = (0..row_count).collect();
                order.shuffle(&mut rng);
                deal_round_robin(row_count, k, std::iter::once(order))
            }
            Stratification::ByLabel(labels) => {
                check_len(labels, row_count)?;
                let mut groups: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
                for (row, label) in labels.iter().enumerate() {
                    groups.entry(label.to_bits()).or_default().push(row);
                }
                let groups: Vec<Vec<usize>> = groups
                    .into_values()
                    .map(|mut rows| {
                        rows.shuffle(&mut rng);
                        rows
                    })
                    .collect();
                deal_round_robin(row_count, k, groups)
            }
            Stratification::ByOrder(values) => {
                check_len(values, row_count)?;
                let mut order: Vec<usize> = (0..row_count).collect();
                order.shuffle(&mut rng);
                // stable sort keeps the shuffled order among ties
                order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

                let mut assignment = vec![0; row_count];
                let mut fold_ids: Vec<usize> = (0..k).collect();
                for block in order.chunks(k) {
                    fold_ids.shuffle(&mut rng);
                    for (&row, &fold) in block.iter().zip(&fold_ids) {
                        assignment[row] = fold;
                    }
                }
                assignment
            }
        };

        let plan = Self::from_parts(k, assignment);
        tracing::debug!(k, rows = row_count, sizes = ?plan.fold_sizes(), "built fold plan");
        Ok(plan)
    }

    /// Wrap a caller-supplied assignment (`assignment[row] = fold`).
    ///
    /// # Errors
    /// [`TreatmentError::InvalidConfig`] when `k < 2`, a fold id is out of
    /// range, or a fold is empty.
    pub fn from_assignment(assignment: Vec<usize>, k: usize) -> Result<Self> {
        if k < 2 {
            return Err(TreatmentError::InvalidConfig(format!(
                "fold count must be at least 2, got {k}"
            )));
        }
        if let Some((row, fold)) = assignment.iter().enumerate().find(|&(_, &f)| f >= k) {
            return Err(TreatmentError::InvalidConfig(format!(
                "row {row} assigned to fold {fold}, but only {k} folds exist"
            )));
        }
        let plan = Self::from_parts(k, assignment);
        if let Some(empty) = plan.folds.iter().position(Vec::is_empty) {
            return Err(TreatmentError::InvalidConfig(format!(
                "fold {empty} has no rows"
            )));
        }
        Ok(plan)
    }

    fn from_parts(k: usize, assignment: Vec<usize>) -> Self {
        let mut folds = vec![Vec::new(); k];
        for (row, &fold) in assignment.iter().enumerate() {
            folds[fold].push(row);
        }
        Self {
            k,
            assignment,
            folds,
        }
    }

    /// Number of folds.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of rows covered.
    pub fn n_rows(&self) -> usize {
        self.assignment.len()
    }

    /// Fold of `row`.
    pub fn fold_of(&self, row: usize) -> usize {
        self.assignment[row]
    }

    /// Fold id per row.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Rows held out in `fold`, ascending.
    pub fn rows_in(&self, fold: usize) -> &[usize] {
        &self.folds[fold]
    }

    /// Rows outside `fold`, ascending.
    pub fn complement(&self, fold: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f != fold)
            .map(|(row, _)| row)
            .collect()
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        self.folds.iter().map(Vec::len).collect()
    }
}

fn check_len(values: &[f64], row_count: usize) -> Result<()> {
    if values.len() != row_count {
        return Err(TreatmentError::Precondition(format!(
            "stratification vector has {} entries for {row_count} rows",
            values.len()
        )));
    }
    Ok(())
}

/// Deal rows to folds in turn, carrying the fold counter across groups.
fn deal_round_robin<I>(row_count: usize, k: usize, groups: I) -> Vec<usize>
where
    I: IntoIterator<Item = Vec<usize>>,
{
    let mut assignment = vec![0; row_count];
    let mut next = 0;
    for group in groups {
        for row in group {
            assignment[row] = next % k;
            next += 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_partition(plan: &FoldPlan, n: usize) {
        let mut seen = HashSet::new();
        for f in 0..plan.k() {
            assert!(!plan.rows_in(f).is_empty(), "fold {f} empty");
            for &r in plan.rows_in(f) {
                assert!(seen.insert(r), "row {r} in two folds");
                assert_eq!(plan.fold_of(r), f);
            }
        }
        assert_eq!(seen.len(), n);
    }

    #[test]
    fn test_plain_plan_is_balanced_partition() {
        let plan = FoldPlan::build(103, 5, Stratification::None, 7).unwrap();
        assert_partition(&plan, 103);
        let sizes = plan.fold_sizes();
        assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
    }

    #[test]
    fn test_plan_is_deterministic_per_seed() {
        let a = FoldPlan::build(50, 4, Stratification::None, 11).unwrap();
        let b = FoldPlan::build(50, 4, Stratification::None, 11).unwrap();
        let c = FoldPlan::build(50, 4, Stratification::None, 12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.assignment(), c.assignment());
    }

    #[test]
    fn test_complement_excludes_fold() {
        let plan = FoldPlan::build(20, 4, Stratification::None, 1).unwrap();
        for f in 0..4 {
            let comp = plan.complement(f);
            assert_eq!(comp.len() + plan.rows_in(f).len(), 20);
            assert!(comp.iter().all(|&r| plan.fold_of(r) != f));
        }
    }

    #[test]
    fn test_by_label_keeps_proportions() {
        // 30 positives, 70 negatives
        let labels: Vec<f64> = (0..100).map(|i| if i < 30 { 1.0 } else { 0.0 }).collect();
        let plan = FoldPlan::build(100, 5, Stratification::ByLabel(&labels), 3).unwrap();
        assert_partition(&plan, 100);
        for f in 0..5 {
            let positives = plan.rows_in(f).iter().filter(|&&r| labels[r] > 0.5).count();
            assert_eq!(positives, 6);
            assert_eq!(plan.rows_in(f).len(), 20);
        }
    }

    #[test]
    fn test_by_order_spreads_range() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let plan = FoldPlan::build(50, 5, Stratification::ByOrder(&values), 9).unwrap();
        assert_partition(&plan, 50);
        // every block of 5 consecutive values hits each fold once
        for block in 0..10 {
            let folds: HashSet<usize> =
                (block * 5..block * 5 + 5).map(|r| plan.fold_of(r)).collect();
            assert_eq!(folds.len(), 5);
        }
    }

    #[test]
    fn test_too_few_rows() {
        let result = FoldPlan::build(3, 5, Stratification::None, 0);
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));
    }

    #[test]
    fn test_k_below_two() {
        let result = FoldPlan::build(10, 1, Stratification::None, 0);
        assert!(matches!(result, Err(TreatmentError::InvalidConfig(_))));
    }

    #[test]
    fn test_stratification_length_mismatch() {
        let labels = [1.0, 0.0];
        let result = FoldPlan::build(10, 2, Stratification::ByLabel(&labels), 0);
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));
    }

    #[test]
    fn test_from_assignment_validation() {
        let plan = FoldPlan::from_assignment(vec![0, 1, 0, 1], 2).unwrap();
        assert_eq!(plan.rows_in(1), &[1, 3]);

        let out_of_range = FoldPlan::from_assignment(vec![0, 2], 2);
        assert!(matches!(out_of_range, Err(TreatmentError::InvalidConfig(_))));

        let empty_fold = FoldPlan::from_assignment(vec![0, 0, 0], 2);
        assert!(matches!(empty_fold, Err(TreatmentError::InvalidConfig(_))));
    }
}
