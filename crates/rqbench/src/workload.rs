//! Random query synthesis
//!
//! Workloads mix a small pool of "hot" ranges, which a cache should serve
//! repeatedly, with uniformly random ranges and occasional point updates.

use anyhow::{ensure, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// A single workload step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Sum over `[left, right]`
    Range { left: usize, right: usize },
    /// Set `array[index] = value`
    Update { index: usize, value: i64 },
}

/// Shape of a generated workload
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Array length
    pub n: usize,
    /// Number of queries
    pub queries: usize,
    /// Number of distinct hot ranges
    pub hot_pool: usize,
    /// Probability that a range query picks a hot range
    pub p_hot: f64,
    /// Probability that a query is an update
    pub p_update: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            n: 100_000,
            queries: 50_000,
            hot_pool: 30,
            p_hot: 0.95,
            p_update: 0.03,
        }
    }
}

impl WorkloadConfig {
    /// Reject shapes that cannot produce valid queries
    pub fn validate(&self) -> Result<()> {
        ensure!(self.n > 0, "array size must be greater than 0");
        ensure!(
            (0.0..=1.0).contains(&self.p_hot),
            "p_hot must be within [0, 1], got {}",
            self.p_hot
        );
        ensure!(
            (0.0..=1.0).contains(&self.p_update),
            "p_update must be within [0, 1], got {}",
            self.p_update
        );
        Ok(())
    }
}

/// Random array of `n` values drawn from `1..=max(n / 10, 1)`
pub fn make_array<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<i64> {
    let max = (n as i64 / 10).max(1);
    (0..n).map(|_| rng.gen_range(1..=max)).collect()
}

/// Generate `config.queries` queries
pub fn make_queries<R: Rng + ?Sized>(config: &WorkloadConfig, rng: &mut R) -> Result<Vec<Query>> {
    config.validate()?;

    let n = config.n;
    let hot: Vec<(usize, usize)> = (0..config.hot_pool)
        .map(|_| (rng.gen_range(0..=n / 2), rng.gen_range(n / 2..n)))
        .collect();

    let mut queries = Vec::with_capacity(config.queries);
    for _ in 0..config.queries {
        if rng.gen_bool(config.p_update) {
            queries.push(Query::Update {
                index: rng.gen_range(0..n),
                value: rng.gen_range(1..=100),
            });
            continue;
        }

        let hot_pick = if rng.gen_bool(config.p_hot) {
            hot.choose(rng).copied()
        } else {
            None
        };

        let (left, right) = match hot_pick {
            Some(range) => range,
            None => {
                let left = rng.gen_range(0..n);
                (left, rng.gen_range(left..n))
            }
        };
        queries.push(Query::Range { left, right });
    }

    Ok(queries)
}
