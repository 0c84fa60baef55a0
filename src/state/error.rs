use super::store::SubscriptionId;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown subscription {id:?}")]
    UnknownSubscription { id: SubscriptionId },
}
