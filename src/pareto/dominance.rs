//! Pareto dominance and non-dominated sorting
//!
//! All objectives are minimized. Functions take any slice of objective vectors
//! (`Vec<f64>`, `&[f64]`, arrays) through `AsRef<[f64]>` and return indices
//! into that slice.
//!
//! Reference: Deb, K., Pratap, A., Agarwal, S., & Meyarivan, T. (2002).
//! A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II.
//! IEEE Transactions on Evolutionary Computation, 6(2).

use super::diversity::crowding_distance;

/// Check if `a` Pareto-dominates `b`
///
/// True iff `a` is no worse than `b` in every objective and strictly better in
/// at least one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut strictly_better = false;
    for (&av, &bv) in a.iter().zip(b.iter()) {
        if av > bv {
            return false;
        }
        if av < bv {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Check if `a` is component-wise `<=` `b` (equal vectors included)
pub fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).all(|(av, bv)| av <= bv)
}

/// Fast non-dominated sort
///
/// Returns fronts where `front[0]` holds every index not dominated by any
/// other point. Within a front, indices keep their input order.
pub fn non_dominated_sort<O: AsRef<[f64]>>(objectives: &[O]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    if n == 0 {
        return vec![];
    }

    // domination_count[i] = number of points that dominate i
    let mut domination_count = vec![0usize; n];
    // dominated_set[i] = points that i dominates
    let mut dominated_set: Vec<Vec<usize>> = vec![vec![]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (objectives[i].as_ref(), objectives[j].as_ref());
            if dominates(a, b) {
                dominated_set[i].push(j);
                domination_count[j] += 1;
            } else if dominates(b, a) {
                dominated_set[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts: Vec<Vec<usize>> = vec![];
    let mut current_front: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current_front.is_empty() {
        let mut next_front = vec![];
        for &i in &current_front {
            for &j in &dominated_set[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }
        next_front.sort_unstable();

        fronts.push(current_front);
        current_front = next_front;
    }

    fronts
}

/// Indices of the points not dominated by any other point, in input order
pub fn non_dominated_filter<O: AsRef<[f64]>>(objectives: &[O]) -> Vec<usize> {
    (0..objectives.len())
        .filter(|&i| {
            let candidate = objectives[i].as_ref();
            !objectives
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other.as_ref(), candidate))
        })
        .collect()
}

/// Select `n` indices by front rank, breaking the overflowing front by
/// crowding distance (larger first)
///
/// Returns all indices when `objectives.len() <= n`. The result always has
/// length `min(objectives.len(), n)`.
pub fn select_n<O: AsRef<[f64]>>(objectives: &[O], n: usize) -> Vec<usize> {
    if objectives.len() <= n {
        return (0..objectives.len()).collect();
    }

    let mut selected = Vec::with_capacity(n);
    for front in non_dominated_sort(objectives) {
        if selected.len() + front.len() <= n {
            selected.extend_from_slice(&front);
            if selected.len() == n {
                break;
            }
        } else {
            let remaining = n - selected.len();
            selected.extend(crowding_order(objectives, &front).into_iter().take(remaining));
            break;
        }
    }
    selected
}

/// Front members ordered by crowding distance, most isolated first.
///
/// The sort is stable, so equal distances keep front order.
pub(crate) fn crowding_order<O: AsRef<[f64]>>(objectives: &[O], front: &[usize]) -> Vec<usize> {
    let distances = crowding_distance(objectives, front);
    let mut ranked: Vec<(usize, f64)> = front.iter().copied().zip(distances).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 4.0],
            vec![2.0, 3.0],
            vec![3.0, 2.0],
            vec![4.0, 1.0],
            vec![2.0, 2.0],
        ]
    }

    #[test]
    fn test_domination() {
        assert!(dominates(&[1.0, 2.0], &[2.0, 3.0]));
        assert!(!dominates(&[2.0, 3.0], &[1.0, 2.0]));
        assert!(!dominates(&[1.0, 2.0], &[1.5, 1.5]));
        assert!(!dominates(&[1.5, 1.5], &[1.0, 2.0]));
        // One strictly better, one equal
        assert!(dominates(&[2.0, 2.0], &[2.0, 3.0]));
    }

    #[test]
    fn test_equal_vectors_do_not_dominate() {
        assert!(!dominates(&[1.0, 1.0], &[1.0, 1.0]));
        assert!(weakly_dominates(&[1.0, 1.0], &[1.0, 1.0]));
    }

    #[test]
    fn test_non_dominated_sort_scenario() {
        let fronts = non_dominated_sort(&scenario());
        assert_eq!(fronts, vec![vec![0, 3, 4], vec![1, 2]]);
    }

    #[test]
    fn test_non_dominated_sort_chain() {
        let objs = vec![vec![3.0, 3.0], vec![2.0, 2.0], vec![1.0, 1.0]];
        let fronts = non_dominated_sort(&objs);
        assert_eq!(fronts, vec![vec![2], vec![1], vec![0]]);
    }

    #[test]
    fn test_non_dominated_sort_empty() {
        let objs: Vec<Vec<f64>> = vec![];
        assert!(non_dominated_sort(&objs).is_empty());
    }

    #[test]
    fn test_non_dominated_filter() {
        assert_eq!(non_dominated_filter(&scenario()), vec![0, 3, 4]);
    }

    #[test]
    fn test_select_n_takes_whole_fronts_first() {
        let selected = select_n(&scenario(), 3);
        let mut sorted = selected.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 3, 4]);
    }

    #[test]
    fn test_select_n_truncates_by_crowding() {
        // Front 0 is {0, 3, 4}; only two fit, the extremes win
        let mut selected = select_n(&scenario(), 2);
        selected.sort_unstable();
        assert_eq!(selected, vec![0, 3]);
    }

    #[test]
    fn test_select_n_partial_second_front() {
        let selected = select_n(&scenario(), 4);
        assert_eq!(selected.len(), 4);
        assert_eq!(&selected[..3], &[0, 3, 4]);
        assert!(selected[3] == 1 || selected[3] == 2);
    }

    #[test]
    fn test_select_n_returns_all_when_small() {
        assert_eq!(select_n(&scenario(), 10), vec![0, 1, 2, 3, 4]);
        assert!(select_n(&scenario(), 0).is_empty());
    }
}
