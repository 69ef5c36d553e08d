//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::campaigns::{DispatchService, DraftStore};

/// Global application state
#[derive(Clone)]
pub struct AppState<D: DraftStore, S: DispatchService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The current campaign draft
    pub drafts: Arc<D>,

    /// Dispatch service
    pub dispatcher: Arc<S>,
}

/// Implementation of the application state
impl<D, S> AppState<D, S>
where
    D: DraftStore,
    S: DispatchService,
{
    /// Create a new application state
    pub fn new(drafts: Arc<D>, dispatcher: S) -> Self {
        Self {
            start_time: Utc::now(),
            drafts,
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl<D, S> fmt::Debug for AppState<D, S>
where
    D: DraftStore,
    S: DispatchService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("drafts", &"DraftStore")
            .field("dispatcher", &"DispatchService")
            .finish()
    }
}
