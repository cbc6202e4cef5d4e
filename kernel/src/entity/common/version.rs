use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Row version used for optimistic concurrency. A freshly created row is
/// version 0 and every persisted mutation advances it by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version<T>(i64, #[serde(skip)] PhantomData<T>);

impl<T> Version<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    pub fn initial() -> Self {
        Self::new(0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.0 + 1)
    }

    /// Version the stored row must have for this one to be written over it.
    pub fn expected_previous(&self) -> Self {
        Self::new(self.0 - 1)
    }
}

impl<T> From<i64> for Version<T> {
    fn from(version: i64) -> Self {
        Self::new(version)
    }
}

impl<T> AsRef<i64> for Version<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}
