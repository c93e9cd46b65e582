use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::StoreError;

/// Best completion times in whole seconds, keyed by difficulty label.
pub trait ScoreStore {
    fn best(&self, label: &str) -> Result<Option<u32>, StoreError>;
    fn set_best(&mut self, label: &str, secs: u32) -> Result<(), StoreError>;
}

/// In-memory store, for headless play and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    best: BTreeMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best(&self, label: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.best.get(label).copied())
    }

    fn set_best(&mut self, label: &str, secs: u32) -> Result<(), StoreError> {
        self.best.insert(label.into(), secs);
        Ok(())
    }
}
