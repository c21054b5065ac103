use thiserror::Error;

use super::feed::record::RecordId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("record id {id} is already present in the store")]
    DuplicateId { id: RecordId },

    #[error("notification store accessed outside of a provider scope; wrap the caller in feed::provider::provide")]
    ProviderMissing,

    #[error("unknown map view: {value} (expected traffic, environment or infrastructure)")]
    UnknownMapView { value: String },

    #[error("invalid command: {input}")]
    InvalidCommand { input: String },
}
