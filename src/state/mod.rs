//! Process-wide UI state (theme, scroll position) with explicit subscriptions.

pub mod error;
pub mod event;
pub mod model;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use event::{StateTransition, UiEvent};
pub use model::{ThemeMode, UiState, HEADER_CONDENSE_OFFSET};
pub use store::{SubscriptionId, UiStore, TRANSITION_HISTORY_LIMIT};
