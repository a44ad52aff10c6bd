use thiserror::Error;

use crate::timeline::EntryCategory;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("No tokio runtime available to start the monitor")]
    NoRuntime,

    #[error("Subscription for {0} entries has been detached")]
    Detached(EntryCategory),

    #[error("Batch of {actual} entries delivered to the {expected} sink")]
    CategoryMismatch {
        expected: EntryCategory,
        actual: EntryCategory,
    },

    #[error("Collector task has stopped")]
    CollectorGone,
}
