//! Workload execution with and without the range cache

use std::time::{Duration, Instant};
use anyhow::{Context, Result};
use rangecache::{range_sum_uncached, update_uncached, CacheStats, RangeQueryCache};

use crate::workload::Query;

/// Result of replaying a workload once
#[derive(Debug)]
pub struct RunReport {
    /// Wall-clock time spent replaying
    pub elapsed: Duration,
    /// Answers to the range queries, in order
    pub answers: Vec<i64>,
    /// Cache counters, absent for the uncached run
    pub stats: Option<CacheStats>,
}

/// Replay `queries` on a copy of `array`, scanning on every range query
pub fn run_no_cache(array: &[i64], queries: &[Query]) -> Result<RunReport> {
    let mut arr = array.to_vec();
    let mut answers = Vec::with_capacity(queries.len());

    let start = Instant::now();
    for (step, query) in queries.iter().enumerate() {
        match *query {
            Query::Range { left, right } => answers.push(
                range_sum_uncached(&arr, left, right)
                    .with_context(|| format!("range query #{step} failed"))?,
            ),
            Query::Update { index, value } => update_uncached(&mut arr, index, value)
                .with_context(|| format!("update #{step} failed"))?,
        }
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        answers,
        stats: None,
    })
}

/// Replay `queries` on a copy of `array` through a range cache of `capacity`
pub fn run_with_cache(array: &[i64], queries: &[Query], capacity: usize) -> Result<RunReport> {
    let mut arr = array.to_vec();
    let mut cache = RangeQueryCache::new(capacity)?;
    let mut answers = Vec::with_capacity(queries.len());

    let start = Instant::now();
    for (step, query) in queries.iter().enumerate() {
        match *query {
            Query::Range { left, right } => answers.push(
                cache
                    .range_sum(&arr, left, right)
                    .with_context(|| format!("range query #{step} failed"))?,
            ),
            Query::Update { index, value } => cache
                .update(&mut arr, index, value)
                .with_context(|| format!("update #{step} failed"))?,
        }
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        answers,
        stats: Some(cache.stats()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{make_array, make_queries, WorkloadConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cached_and_uncached_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = WorkloadConfig {
            n: 500,
            queries: 3_000,
            hot_pool: 5,
            p_hot: 0.9,
            p_update: 0.1,
        };
        let array = make_array(config.n, &mut rng);
        let queries = make_queries(&config, &mut rng).unwrap();

        let plain = run_no_cache(&array, &queries).unwrap();
        let cached = run_with_cache(&array, &queries, 16).unwrap();

        assert_eq!(plain.answers, cached.answers);
        assert!(plain.stats.is_none());

        let stats = cached.stats.unwrap();
        assert_eq!(stats.lookups() as usize, cached.answers.len());
        assert!(stats.hits > 0);
        assert!(stats.updates > 0);
    }

    #[test]
    fn test_runs_do_not_mutate_input() {
        let array = vec![1, 2, 3];
        let queries = vec![
            Query::Update { index: 0, value: 10 },
            Query::Range { left: 0, right: 2 },
        ];

        let report = run_with_cache(&array, &queries, 4).unwrap();
        assert_eq!(report.answers, vec![15]);
        assert_eq!(array, vec![1, 2, 3]);
    }

    #[test]
    fn test_bad_query_reports_step() {
        let queries = vec![
            Query::Range { left: 0, right: 0 },
            Query::Range { left: 0, right: 9 },
        ];

        let err = run_no_cache(&[1, 2], &queries).unwrap_err();
        assert!(err.to_string().contains("#1"));
        assert!(run_with_cache(&[1, 2], &queries, 0).is_err());
    }
}
