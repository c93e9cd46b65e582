use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use neonsweep_core::{ScoreStore, StoreError};

/// Best times kept in the browser's local storage, one key per difficulty.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct LocalScoreStore;

impl LocalScoreStore {
    pub(crate) const PREFIX: &'static str = "neonsweep:best:";

    pub(crate) fn key(label: &str) -> String {
        format!("{}{}", Self::PREFIX, label)
    }
}

impl ScoreStore for LocalScoreStore {
    fn best(&self, label: &str) -> Result<Option<u32>, StoreError> {
        match LocalStorage::get::<u32>(Self::key(label)) {
            Ok(secs) => Ok(Some(secs)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(err)) => Err(StoreError::Corrupt(err.to_string())),
            Err(err) => Err(StoreError::Unavailable(err.to_string())),
        }
    }

    fn set_best(&mut self, label: &str, secs: u32) -> Result<(), StoreError> {
        LocalStorage::set(Self::key(label), secs)
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_label() {
        assert_eq!(LocalScoreStore::key("hard"), "neonsweep:best:hard");
    }
}
