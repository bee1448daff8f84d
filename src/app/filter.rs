//! Composable task filters
//!
//! Each predicate is independent; a chain keeps a record only if every
//! predicate accepts it. The chain is rebuilt from `RuntimeConfig` every
//! cycle since the task population changes between samples.

use super::{DeltaRecord, RuntimeConfig};

/// A single filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Owned by this uid
    User(u32),
    /// This task id
    Task(u32),
    /// Any displayed activity field nonzero
    Active { accumulated: bool },
}

impl Predicate {
    pub fn matches(&self, record: &DeltaRecord) -> bool {
        match *self {
            Predicate::User(uid) => record.task.uid == uid,
            Predicate::Task(tid) => record.task.tid == tid,
            Predicate::Active { accumulated } => record.is_active(accumulated),
        }
    }
}

/// Logical AND of predicates
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    predicates: Vec<Predicate>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the chain for the toggles currently enabled
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut chain = Self::new();
        if let Some(uid) = config.user_filter {
            chain.push(Predicate::User(uid));
        }
        if let Some(tid) = config.task_filter {
            chain.push(Predicate::Task(tid));
        }
        if config.only_active {
            chain.push(Predicate::Active { accumulated: config.accumulated });
        }
        chain
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn matches(&self, record: &DeltaRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Keeps the records every predicate accepts, preserving order
    pub fn apply<'a, I>(&self, records: I) -> Vec<DeltaRecord>
    where
        I: IntoIterator<Item = &'a DeltaRecord>,
    {
        records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::system::task::fixtures::record;

    fn delta(tid: u32, uid: u32, read_rate: f64) -> DeltaRecord {
        let mut task = record(tid, 0, 0, Instant::now());
        task.uid = uid;
        DeltaRecord { read_rate, ..DeltaRecord::idle(task) }
    }

    fn sample() -> Vec<DeltaRecord> {
        vec![
            delta(1, 0, 0.0),
            delta(2, 1000, 10.0),
            delta(3, 1000, 0.0),
            delta(4, 0, 5.0),
        ]
    }

    fn tids(records: &[DeltaRecord]) -> Vec<u32> {
        records.iter().map(|r| r.task.tid).collect()
    }

    #[test]
    fn test_empty_chain_keeps_everything() {
        assert_eq!(FilterChain::new().apply(&sample()).len(), 4);
    }

    #[test]
    fn test_individual_predicates() {
        let records = sample();
        assert!(Predicate::User(1000).matches(&records[1]));
        assert!(!Predicate::User(1000).matches(&records[0]));
        assert!(Predicate::Task(3).matches(&records[2]));
        assert!(Predicate::Active { accumulated: false }.matches(&records[3]));
        assert!(!Predicate::Active { accumulated: false }.matches(&records[2]));
    }

    #[test]
    fn test_composition_order_does_not_matter() {
        let records = sample();

        let mut user_then_task = FilterChain::new();
        user_then_task.push(Predicate::User(1000));
        user_then_task.push(Predicate::Task(2));

        let mut task_then_user = FilterChain::new();
        task_then_user.push(Predicate::Task(2));
        task_then_user.push(Predicate::User(1000));

        let mut only_user = FilterChain::new();
        only_user.push(Predicate::User(1000));
        let mut only_task = FilterChain::new();
        only_task.push(Predicate::Task(2));
        let nested = only_task.apply(&only_user.apply(&records));

        assert_eq!(tids(&user_then_task.apply(&records)), vec![2]);
        assert_eq!(tids(&task_then_user.apply(&records)), vec![2]);
        assert_eq!(tids(&nested), vec![2]);
    }

    #[test]
    fn test_chain_from_config() {
        let config = RuntimeConfig {
            user_filter: Some(0),
            only_active: true,
            ..RuntimeConfig::default()
        };
        let chain = FilterChain::from_config(&config);
        assert_eq!(tids(&chain.apply(&sample())), vec![4]);
    }

    #[test]
    fn test_user_matching_nobody_is_empty() {
        let config = RuntimeConfig { user_filter: Some(4242), ..RuntimeConfig::default() };
        assert!(FilterChain::from_config(&config).apply(&sample()).is_empty());
    }
}
