//! Bounded external archive of non-dominated solutions
//!
//! The archive is the elitist memory of the search. After every call to
//! [`BoundedArchive::try_insert`] two invariants hold: no member dominates
//! another, and the size never exceeds `max_size`.

use rand::seq::index::sample;
use rand::Rng;
use tracing::trace;

use crate::archive::pruning::PruningStrategy;
use crate::error::{MogwoError, MogwoResult};
use crate::population::solution::Solution;

/// Bounded set of mutually non-dominated solutions
#[derive(Clone, Debug)]
pub struct BoundedArchive {
    solutions: Vec<Solution>,
    max_size: usize,
    strategy: PruningStrategy,
}

impl BoundedArchive {
    /// Create an empty archive
    ///
    /// Fails with [`MogwoError::DegenerateArchive`] when `max_size` is zero,
    /// since every pruning pass would then empty the archive.
    pub fn new(max_size: usize, strategy: PruningStrategy) -> MogwoResult<Self> {
        if max_size == 0 {
            return Err(MogwoError::DegenerateArchive(
                "archive max_size must be at least 1".to_string(),
            ));
        }
        strategy.validate()?;
        Ok(Self {
            solutions: Vec::with_capacity(max_size + 1),
            max_size,
            strategy,
        })
    }

    /// Attempt to insert a candidate
    ///
    /// Returns `false` (archive unchanged) when an existing member dominates
    /// the candidate. Otherwise every member dominated by the candidate, or
    /// carrying an identical objective vector, is removed, the candidate is
    /// added, and the archive is pruned back to `max_size` if needed. The
    /// candidate itself may be the member pruned away.
    pub fn try_insert(&mut self, candidate: Solution) -> bool {
        if self
            .solutions
            .iter()
            .any(|member| member.dominates(&candidate))
        {
            return false;
        }

        self.solutions.retain(|member| {
            !candidate.dominates(member) && member.objectives() != candidate.objectives()
        });
        self.solutions.push(candidate);

        if self.solutions.len() > self.max_size {
            self.prune();
        }
        true
    }

    /// Insert every candidate in order, returning how many were accepted
    pub fn try_insert_all<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = Solution>,
    {
        candidates
            .into_iter()
            .map(|c| self.try_insert(c))
            .filter(|&accepted| accepted)
            .count()
    }

    fn prune(&mut self) {
        let before = self.solutions.len();
        let kept = self.strategy.select(&self.solutions, self.max_size);
        let mut slots: Vec<Option<Solution>> = self.solutions.drain(..).map(Some).collect();
        self.solutions = kept.into_iter().filter_map(|i| slots[i].take()).collect();
        trace!(
            before,
            after = self.solutions.len(),
            strategy = ?self.strategy,
            "archive pruned"
        );
    }

    /// Sample `k` members as default leaders
    ///
    /// Without replacement when the archive holds at least `k` members,
    /// otherwise with replacement. Empty for an empty archive.
    pub fn get_leaders<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<&Solution> {
        let n = self.solutions.len();
        if n == 0 {
            return vec![];
        }
        if n >= k {
            sample(rng, n, k)
                .into_iter()
                .map(|i| &self.solutions[i])
                .collect()
        } else {
            (0..k)
                .map(|_| &self.solutions[rng.gen_range(0..n)])
                .collect()
        }
    }

    /// Current number of members
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Check if the archive is empty
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Capacity bound
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Configured pruning strategy
    pub fn strategy(&self) -> PruningStrategy {
        self.strategy
    }

    /// Members in insertion order
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Objective vectors of all members
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.objectives().to_vec())
            .collect()
    }

    /// Decision vectors of all members
    pub fn decisions(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.decision().to_vec())
            .collect()
    }

    /// Consume the archive into parallel `(decisions, objectives)` sequences
    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        self.solutions.into_iter().map(Solution::into_parts).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sol(objectives: [f64; 2]) -> Solution {
        Solution::new(objectives.to_vec(), objectives.to_vec())
    }

    fn scenario() -> Vec<Solution> {
        [[1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0], [2.0, 2.0]]
            .into_iter()
            .map(sol)
            .collect()
    }

    fn assert_invariants(archive: &BoundedArchive) {
        assert!(archive.len() <= archive.max_size());
        for a in archive.solutions() {
            for b in archive.solutions() {
                assert!(!a.dominates(b));
            }
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            BoundedArchive::new(0, PruningStrategy::Crowding),
            Err(MogwoError::DegenerateArchive(_))
        ));
    }

    #[test]
    fn test_rejects_dominated_candidate() {
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        assert!(archive.try_insert(sol([1.0, 1.0])));
        assert!(!archive.try_insert(sol([2.0, 2.0])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_removes_newly_dominated_members() {
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        let inserted = archive.try_insert_all(scenario());
        assert_eq!(inserted, 5);
        let mut objs = archive.objectives();
        objs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(objs, vec![vec![1.0, 4.0], vec![2.0, 2.0], vec![4.0, 1.0]]);
        assert_invariants(&archive);
    }

    #[test]
    fn test_identical_objectives_replace_earlier_copy() {
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        assert!(archive.try_insert(Solution::new(vec![0.0], vec![1.0, 1.0])));
        assert!(archive.try_insert(Solution::new(vec![5.0], vec![1.0, 1.0])));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.solutions()[0].decision(), &[5.0]);
    }

    #[test]
    fn test_capacity_two_keeps_extremes() {
        let mut archive = BoundedArchive::new(2, PruningStrategy::Crowding).unwrap();
        archive.try_insert_all(scenario());
        let mut objs = archive.objectives();
        objs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(objs, vec![vec![1.0, 4.0], vec![4.0, 1.0]]);
        assert_invariants(&archive);
    }

    #[test]
    fn test_every_strategy_respects_capacity() {
        let strategies = [
            PruningStrategy::Crowding,
            PruningStrategy::sigma_sharing(),
            PruningStrategy::clustering(),
        ];
        for strategy in strategies {
            let mut archive = BoundedArchive::new(5, strategy).unwrap();
            for i in 0..50 {
                let x = i as f64 / 49.0;
                archive.try_insert(Solution::new(vec![x], vec![x, 1.0 - x.sqrt()]));
                assert_invariants(&archive);
            }
            assert_eq!(archive.len(), 5);
        }
    }

    #[test]
    fn test_get_leaders_without_replacement() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        archive.try_insert_all(scenario());
        let leaders = archive.get_leaders(3, &mut rng);
        assert_eq!(leaders.len(), 3);
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert_ne!(leaders[i], leaders[j]);
            }
        }
    }

    #[test]
    fn test_get_leaders_with_replacement_and_empty() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        assert!(archive.get_leaders(3, &mut rng).is_empty());
        archive.try_insert(sol([1.0, 1.0]));
        let leaders = archive.get_leaders(3, &mut rng);
        assert_eq!(leaders.len(), 3);
        assert!(leaders.iter().all(|s| s.objectives() == [1.0, 1.0]));
    }

    #[test]
    fn test_into_parts_is_parallel() {
        let mut archive = BoundedArchive::new(10, PruningStrategy::Crowding).unwrap();
        archive.try_insert(Solution::new(vec![0.3, 0.4], vec![1.0, 2.0]));
        let (decisions, objectives) = archive.into_parts();
        assert_eq!(decisions, vec![vec![0.3, 0.4]]);
        assert_eq!(objectives, vec![vec![1.0, 2.0]]);
    }
}
