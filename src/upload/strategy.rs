//! Pluggable sources of simulated progress and node placement.

use crate::nodes::node_label;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of the randomized parts of an upload
pub trait SimulationStrategy: Send + Sync {
    /// Percentage points to add on the next tick
    fn progress_increment(&self) -> f64;

    /// Label of a storage node to place a copy on
    fn node_label(&self) -> String;
}

/// Uniform increments in `[0, max_increment)` and nodes drawn uniformly from
/// `node-1 ..= node-{node_count}`. Primary and replica draws are independent,
/// so a replica may land on the primary's node.
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
    max_increment: f64,
    node_count: u32,
}

impl RandomStrategy {
    pub fn new(max_increment: f64, node_count: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), max_increment, node_count)
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64, max_increment: f64, node_count: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max_increment, node_count)
    }

    fn with_rng(rng: StdRng, max_increment: f64, node_count: u32) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_increment,
            node_count: node_count.max(1),
        }
    }
}

impl SimulationStrategy for RandomStrategy {
    fn progress_increment(&self) -> f64 {
        if self.max_increment.is_nan() || self.max_increment <= 0.0 {
            return 0.0;
        }
        self.rng.lock().gen_range(0.0..self.max_increment)
    }

    fn node_label(&self) -> String {
        let index = self.rng.lock().gen_range(1..=self.node_count);
        node_label(index)
    }
}

/// Replays fixed sequences; once exhausted, repeats the fallback values.
pub struct ScriptedStrategy {
    increments: Mutex<VecDeque<f64>>,
    labels: Mutex<VecDeque<String>>,
    fallback_increment: f64,
    fallback_label: String,
}

impl ScriptedStrategy {
    pub fn new(increments: Vec<f64>, labels: Vec<String>) -> Self {
        Self {
            increments: Mutex::new(increments.into()),
            labels: Mutex::new(labels.into()),
            fallback_increment: 10.0,
            fallback_label: node_label(1),
        }
    }

    /// Every tick adds `increment`; every placement lands on `label`
    pub fn constant(increment: f64, label: &str) -> Self {
        Self {
            increments: Mutex::new(VecDeque::new()),
            labels: Mutex::new(VecDeque::new()),
            fallback_increment: increment,
            fallback_label: label.to_string(),
        }
    }
}

impl SimulationStrategy for ScriptedStrategy {
    fn progress_increment(&self) -> f64 {
        self.increments
            .lock()
            .pop_front()
            .unwrap_or(self.fallback_increment)
    }

    fn node_label(&self) -> String {
        self.labels
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback_label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_increments_stay_in_range() {
        let strategy = RandomStrategy::seeded(7, 15.0, 5);
        for _ in 0..1000 {
            let inc = strategy.progress_increment();
            assert!((0.0..15.0).contains(&inc), "increment out of range: {inc}");
        }
    }

    #[test]
    fn test_random_labels_cover_catalog_only() {
        let strategy = RandomStrategy::seeded(11, 15.0, 5);
        let valid: Vec<String> = (1..=5).map(node_label).collect();
        for _ in 0..500 {
            assert!(valid.contains(&strategy.node_label()));
        }
    }

    #[test]
    fn test_seeded_strategies_agree() {
        let a = RandomStrategy::seeded(42, 15.0, 5);
        let b = RandomStrategy::seeded(42, 15.0, 5);
        for _ in 0..20 {
            assert_eq!(a.progress_increment(), b.progress_increment());
            assert_eq!(a.node_label(), b.node_label());
        }
    }

    #[test]
    fn test_zero_max_increment_never_progresses() {
        let strategy = RandomStrategy::seeded(1, 0.0, 5);
        assert_eq!(strategy.progress_increment(), 0.0);
    }

    #[test]
    fn test_scripted_replays_then_falls_back() {
        let strategy = ScriptedStrategy::new(
            vec![40.0, 70.0],
            vec!["node-3".to_string(), "node-4".to_string()],
        );
        assert_eq!(strategy.progress_increment(), 40.0);
        assert_eq!(strategy.progress_increment(), 70.0);
        assert_eq!(strategy.progress_increment(), 10.0);
        assert_eq!(strategy.node_label(), "node-3");
        assert_eq!(strategy.node_label(), "node-4");
        assert_eq!(strategy.node_label(), "node-1");
    }
}
