//! Diagnostics and statistics
//!
//! This module provides the convergence history and per-generation statistics
//! of a run, and the final optimization result. Nothing here is read back by
//! the search itself.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Append-only hypervolume record, one entry per generation plus the initial
/// value
///
/// `raw` holds the value computed each generation; `reported` holds the
/// optionally smoothed value `β·raw + (1 - β)·previous`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceHistory {
    raw: Vec<f64>,
    reported: Vec<f64>,
}

impl ConvergenceHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw value, smoothing it against the previous reported value
    /// when `smoothing` is given, and return the reported value
    pub fn record(&mut self, raw: f64, smoothing: Option<f64>) -> f64 {
        let reported = match (smoothing, self.reported.last()) {
            (Some(beta), Some(&previous)) => beta * raw + (1.0 - beta) * previous,
            _ => raw,
        };
        self.raw.push(raw);
        self.reported.push(reported);
        reported
    }

    /// Reported values
    pub fn values(&self) -> &[f64] {
        &self.reported
    }

    /// Unsmoothed values
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Latest reported value
    pub fn last(&self) -> Option<f64> {
        self.reported.last().copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.reported.len()
    }

    /// Check if nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }
}

/// Statistics for a single generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 is the initial population)
    pub generation: usize,
    /// Total objective evaluations so far
    pub evaluations: usize,
    /// Archive size after the update
    pub archive_size: usize,
    /// Hypervolume before smoothing
    pub hypervolume_raw: f64,
    /// Reported hypervolume
    pub hypervolume: f64,
    /// Reference point used for this generation
    pub reference_point: Vec<f64>,
    /// Exploration coefficient `a`
    pub decay: f64,
    /// Mean pairwise decision-space distance in the population
    pub diversity: f64,
    /// Timing information
    pub timing: TimingStats,
}

/// Timing statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent on objective evaluation (ms)
    pub evaluation_ms: f64,
    /// Time spent updating the archive (ms)
    pub archive_ms: f64,
    /// Time spent computing hypervolume and selecting leaders (ms)
    pub leader_ms: f64,
    /// Time spent on position updates (ms)
    pub update_ms: f64,
    /// Total generation time (ms)
    pub total_ms: f64,
}

impl TimingStats {
    /// Create new timing stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set evaluation time
    pub fn with_evaluation(mut self, duration: Duration) -> Self {
        self.evaluation_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set archive update time
    pub fn with_archive(mut self, duration: Duration) -> Self {
        self.archive_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set leader selection time
    pub fn with_leaders(mut self, duration: Duration) -> Self {
        self.leader_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set position update time
    pub fn with_update(mut self, duration: Duration) -> Self {
        self.update_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set total time
    pub fn with_total(mut self, duration: Duration) -> Self {
        self.total_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

/// Statistics collector for an entire run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl RunStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Largest reported hypervolume
    pub fn best_hypervolume(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.hypervolume)
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Archive size per generation
    pub fn archive_size_history(&self) -> Vec<usize> {
        self.generations.iter().map(|g| g.archive_size).collect()
    }

    /// Population diversity per generation
    pub fn diversity_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.diversity).collect()
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        let last = self.generations.last();
        format!(
            "Search Summary:\n\
             - Generations: {}\n\
             - Final hypervolume: {:.6}\n\
             - Best hypervolume: {:.6}\n\
             - Archive size: {}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            last.map_or(0, |g| g.generation),
            last.map_or(0.0, |g| g.hypervolume),
            self.best_hypervolume().unwrap_or(0.0),
            last.map_or(0, |g| g.archive_size),
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

/// Result of a search run
///
/// `decisions[i]` and `objectives[i]` describe the same archive member.
/// `hypervolume_history` has one entry per executed generation plus the
/// initial value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Decision vectors of the final archive
    pub decisions: Vec<Vec<f64>>,
    /// Objective vectors of the final archive
    pub objectives: Vec<Vec<f64>>,
    /// Reported hypervolume per generation
    pub hypervolume_history: Vec<f64>,
    /// Unsmoothed hypervolume per generation
    pub raw_hypervolume_history: Vec<f64>,
    /// Generations executed
    pub generations: usize,
    /// Total objective evaluations
    pub evaluations: usize,
    /// Statistics for the run
    pub stats: RunStats,
}

impl OptimizationResult {
    /// Number of archive members
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Check if the final archive is empty
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Last reported hypervolume
    pub fn final_hypervolume(&self) -> Option<f64> {
        self.hypervolume_history.last().copied()
    }

    /// Iterate over `(decision, objectives)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.decisions
            .iter()
            .zip(&self.objectives)
            .map(|(d, o)| (d.as_slice(), o.as_slice()))
    }
}

pub mod prelude {
    pub use super::{ConvergenceHistory, GenerationStats, OptimizationResult, RunStats, TimingStats};
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn generation(generation: usize, hypervolume: f64, archive_size: usize) -> GenerationStats {
        GenerationStats {
            generation,
            evaluations: generation * 10,
            archive_size,
            hypervolume_raw: hypervolume,
            hypervolume,
            reference_point: vec![1.1, 1.1],
            decay: 2.0,
            diversity: 1.0 / (generation + 1) as f64,
            timing: TimingStats::default(),
        }
    }

    #[test]
    fn test_history_without_smoothing() {
        let mut history = ConvergenceHistory::new();
        assert!(history.is_empty());
        history.record(1.0, None);
        history.record(2.0, None);
        assert_eq!(history.values(), &[1.0, 2.0]);
        assert_eq!(history.raw(), history.values());
    }

    #[test]
    fn test_history_with_smoothing() {
        let mut history = ConvergenceHistory::new();
        // First value is never smoothed
        assert_relative_eq!(history.record(1.0, Some(0.7)), 1.0);
        assert_relative_eq!(history.record(2.0, Some(0.7)), 0.7 * 2.0 + 0.3 * 1.0);
        assert_eq!(history.raw(), &[1.0, 2.0]);
        assert_eq!(history.len(), 2);
        assert_relative_eq!(history.last().unwrap(), 1.7);
    }

    #[test]
    fn test_run_stats_record() {
        let mut stats = RunStats::new();
        for (i, hv) in [0.2, 0.5, 0.4].into_iter().enumerate() {
            stats.record(generation(i, hv, i + 3));
        }
        assert_eq!(stats.num_generations(), 3);
        assert_eq!(stats.best_hypervolume(), Some(0.5));
        assert_eq!(stats.archive_size_history(), vec![3, 4, 5]);
        assert_eq!(stats.diversity_history().len(), 3);
    }

    #[test]
    fn test_run_stats_summary() {
        let mut stats = RunStats::new();
        stats.record(generation(4, 0.75, 12));
        stats.set_termination_reason("Target hypervolume reached");
        stats.set_runtime(Duration::from_millis(1234));

        let summary = stats.summary();
        assert!(summary.contains("Generations: 4"));
        assert!(summary.contains("Final hypervolume: 0.75"));
        assert!(summary.contains("Target hypervolume reached"));
    }

    #[test]
    fn test_timing_stats() {
        let timing = TimingStats::new()
            .with_evaluation(Duration::from_millis(100))
            .with_archive(Duration::from_millis(20))
            .with_leaders(Duration::from_millis(30))
            .with_update(Duration::from_millis(10))
            .with_total(Duration::from_millis(160));

        assert!((timing.evaluation_ms - 100.0).abs() < 0.1);
        assert!((timing.archive_ms - 20.0).abs() < 0.1);
        assert!((timing.leader_ms - 30.0).abs() < 0.1);
        assert!((timing.update_ms - 10.0).abs() < 0.1);
        assert!((timing.total_ms - 160.0).abs() < 0.1);
    }

    #[test]
    fn test_result_accessors() {
        let result = OptimizationResult {
            decisions: vec![vec![0.1], vec![0.9]],
            objectives: vec![vec![0.1, 0.9], vec![0.9, 0.1]],
            hypervolume_history: vec![0.1, 0.3],
            raw_hypervolume_history: vec![0.1, 0.3],
            generations: 1,
            evaluations: 20,
            stats: RunStats::new(),
        };
        assert_eq!(result.len(), 2);
        assert_eq!(result.final_hypervolume(), Some(0.3));
        let pairs: Vec<_> = result.iter().collect();
        assert_eq!(pairs[1], (&[0.9][..], &[0.9, 0.1][..]));
    }
}
