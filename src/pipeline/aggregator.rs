use crate::rows::{LevelRow, ObjectRow};
use std::sync::{Mutex, MutexGuard};

/// Thread-safe accumulator for the run-wide row collections.
///
/// Archive tasks append their per-archive batches through [`merge`];
/// both batches of one call land under a single lock acquisition, so one
/// archive's rows are never interleaved with another's and keep their
/// task-produced order.
///
/// [`merge`]: ResultAggregator::merge
#[derive(Debug, Default)]
pub struct ResultAggregator {
    collections: Mutex<Collections>,
}

#[derive(Debug, Default)]
struct Collections {
    level_rows: Vec<LevelRow>,
    object_rows: Vec<ObjectRow>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one archive's batches to the run-wide collections.
    pub fn merge(&self, level_rows: Vec<LevelRow>, object_rows: Vec<ObjectRow>) {
        let mut collections = self.lock();
        collections.level_rows.extend(level_rows);
        collections.object_rows.extend(object_rows);
    }

    /// Move the accumulated collections out, leaving the aggregator empty.
    ///
    /// Meant for the point where every task has completed.
    pub fn take_results(&self) -> (Vec<LevelRow>, Vec<ObjectRow>) {
        let mut collections = self.lock();
        (
            std::mem::take(&mut collections.level_rows),
            std::mem::take(&mut collections.object_rows),
        )
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // A poisoned lock means some task panicked mid-merge; the batches
        // already appended are still wanted as partial results.
        match self.collections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn level(id: &str, level: &str) -> LevelRow {
        LevelRow {
            id: id.to_string(),
            level: level.to_string(),
        }
    }

    fn object(id: &str, name: &str) -> ObjectRow {
        ObjectRow {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_merge_appends_both_collections() {
        let aggregator = ResultAggregator::new();

        aggregator.merge(vec![level("A1", "5")], vec![object("A1", "x"), object("A1", "y")]);
        aggregator.merge(vec![level("B1", "10")], vec![]);

        let (level_rows, object_rows) = aggregator.take_results();
        assert_eq!(level_rows.len(), 2);
        assert_eq!(object_rows.len(), 2);
    }

    #[test]
    fn test_batch_order_is_preserved() {
        let aggregator = ResultAggregator::new();

        aggregator.merge(
            vec![level("A1", "1"), level("A2", "2"), level("A3", "3")],
            vec![object("A1", "first"), object("A1", "second")],
        );

        let (level_rows, object_rows) = aggregator.take_results();
        let ids: Vec<_> = level_rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);

        let names: Vec<_> = object_rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_take_results_drains() {
        let aggregator = ResultAggregator::new();
        aggregator.merge(vec![level("A1", "1")], vec![]);

        let (first, _) = aggregator.take_results();
        assert_eq!(first.len(), 1);

        let (second, _) = aggregator.take_results();
        assert!(second.is_empty());
    }

    #[test]
    fn test_concurrent_merges_keep_batches_contiguous() {
        let aggregator = Arc::new(ResultAggregator::new());
        let batch_size = 25;

        let handles: Vec<_> = (0..8)
            .map(|task| {
                let aggregator = Arc::clone(&aggregator);
                std::thread::spawn(move || {
                    let levels: Vec<_> = (0..batch_size)
                        .map(|i| level(&format!("t{}-{}", task, i), "1"))
                        .collect();
                    aggregator.merge(levels, vec![]);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let (level_rows, _) = aggregator.take_results();
        assert_eq!(level_rows.len(), 8 * batch_size);

        // Each task's batch must occupy one contiguous run, in order.
        let mut index = 0;
        while index < level_rows.len() {
            let task_prefix = level_rows[index].id.split('-').next().unwrap().to_string();
            for offset in 0..batch_size {
                assert_eq!(
                    level_rows[index + offset].id,
                    format!("{}-{}", task_prefix, offset)
                );
            }
            index += batch_size;
        }
    }
}
