//! Enumeration of word-length plans.
//!
//! A plan is a non-decreasing list of word lengths whose sum is the number of
//! letters left to place. Lengths may repeat, so `[2, 2, 3]` and `[3, 4]` are
//! both plans for seven letters.

use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LengthPlan(Vec<usize>);

impl LengthPlan {
    pub fn new(lengths: Vec<usize>) -> Self {
        LengthPlan(lengths)
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Deref for LengthPlan {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for LengthPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for length in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", length)?;
            first = false;
        }
        Ok(())
    }
}

/// Every multiset of `k` values from `values`, for `k` in `min_k..=max_k`,
/// summing to exactly `target`.
///
/// Plans come out grouped by cardinality, each in non-decreasing order.
/// `values` must be non-empty and positive, as must `target`, `min_k` and
/// `max_k`.
pub fn generate(target: usize, min_k: usize, max_k: usize, values: &[usize]) -> Vec<LengthPlan> {
    debug_assert!(target > 0 && min_k > 0 && max_k > 0 && !values.is_empty());
    debug_assert!(values.iter().all(|&v| v > 0));

    let mut values = values.to_vec();
    values.sort_unstable();
    values.dedup();

    let mut plans = Vec::new();
    let mut current = Vec::with_capacity(max_k);
    for k in min_k..=max_k {
        combine(&values, k, target, 0, 0, &mut current, &mut plans);
    }
    plans
}

fn combine(
    values: &[usize],
    k: usize,
    target: usize,
    start: usize,
    sum: usize,
    current: &mut Vec<usize>,
    plans: &mut Vec<LengthPlan>,
) {
    if current.len() == k {
        if sum == target {
            plans.push(LengthPlan(current.clone()));
        }
        return;
    }

    for (i, &value) in values.iter().enumerate().skip(start) {
        // Values are sorted, so every later value overshoots too
        if sum + value > target {
            break;
        }
        current.push(value);
        combine(values, k, target, i, sum + value, current, plans);
        current.pop();
    }
}
