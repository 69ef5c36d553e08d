//! Campaign drafts and their dispatch to recipients.

mod dispatch;
mod draft;
mod plain_text;
mod recipients;
mod store;

pub mod errors;

pub use dispatch::{
    DispatchReport, DispatchService, DispatchServiceImpl, DEFAULT_SEND_TIMEOUT, SENT_MESSAGE,
};
pub use draft::{Draft, NewDraft};
pub use plain_text::strip_tags;
pub use recipients::RecipientList;
pub use store::{DraftStore, InMemoryDraftStore};
