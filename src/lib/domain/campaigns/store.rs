//! Draft store module

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    campaigns::{Draft, NewDraft},
    communication::transport::TransportIdentity,
};

/// Holds the single process-wide draft
pub trait DraftStore: Clone + Send + Sync + 'static {
    /// Replaces the current draft wholesale.
    ///
    /// The stored sender is always the transport-bound identity; the sender the
    /// caller asked for is discarded.
    ///
    /// # Arguments
    /// * `draft` - The [`NewDraft`] to stage.
    ///
    /// # Returns
    /// The [`Draft`] that is now current.
    fn load(&self, draft: &NewDraft) -> Arc<Draft>;

    /// Returns a snapshot of the current draft, which may be the empty initial one.
    fn get(&self) -> Arc<Draft>;
}

#[cfg(test)]
mock! {
    pub DraftStore {}

    impl Clone for DraftStore {
        fn clone(&self) -> Self;
    }

    impl DraftStore for DraftStore {
        fn load(&self, draft: &NewDraft) -> Arc<Draft>;
        fn get(&self) -> Arc<Draft>;
    }
}

/// Draft store backed by a single replace-on-write slot.
///
/// Readers clone the [`Arc`] under the read lock, so they see either the old
/// draft or the new one in full.
#[derive(Debug, Clone)]
pub struct InMemoryDraftStore {
    current: Arc<RwLock<Arc<Draft>>>,
    identity: Option<TransportIdentity>,
}

impl InMemoryDraftStore {
    /// Creates an empty store bound to `identity`.
    ///
    /// Without an identity every loaded draft has no sender, which blocks dispatch.
    pub fn new(identity: Option<TransportIdentity>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(Draft::default()))),
            identity,
        }
    }
}

impl DraftStore for InMemoryDraftStore {
    fn load(&self, draft: &NewDraft) -> Arc<Draft> {
        let sender = self.identity.as_ref().map(|identity| identity.address.clone());

        if let Some(requested) = draft.requested_sender().filter(|s| !s.trim().is_empty()) {
            if sender.as_ref().map(|s| s.as_str()) != Some(requested.trim()) {
                warn!(
                    requested,
                    bound = ?sender.as_ref().map(|s| s.as_str()),
                    "ignoring caller-supplied sender"
                );
            }
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let loaded = Arc::new(Draft {
            subject: draft.subject().to_string(),
            message: draft.message().to_string(),
            sender,
            version: current.version + 1,
            loaded_at: Some(Utc::now()),
        });

        *current = Arc::clone(&loaded);

        debug!(version = loaded.version, "draft loaded");

        loaded
    }

    fn get(&self) -> Arc<Draft> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(&current)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use testresult::TestResult;

    use crate::domain::communication::email_addresses::EmailAddress;

    use super::*;

    fn identity(address: &str) -> TestResult<TransportIdentity> {
        Ok(TransportIdentity::new(EmailAddress::new(address)?))
    }

    #[test]
    fn test_get_before_load_returns_empty_draft() {
        let store = InMemoryDraftStore::new(None);

        assert_eq!(*store.get(), Draft::default());
    }

    #[test]
    fn test_load_binds_transport_identity() -> TestResult {
        let store = InMemoryDraftStore::new(Some(identity("bot@relay.test")?));

        store.load(&NewDraft::new(
            "Reset your password",
            "<p>Click here</p>",
            Some("attacker@evil.test"),
        ));

        let draft = store.get();

        assert_eq!(draft.subject, "Reset your password");
        assert_eq!(draft.message, "<p>Click here</p>");
        assert_eq!(draft.sender, Some(EmailAddress::new("bot@relay.test")?));
        assert!(draft.loaded_at.is_some());

        Ok(())
    }

    #[test]
    fn test_load_without_identity_leaves_sender_empty() {
        let store = InMemoryDraftStore::new(None);

        let draft = store.load(&NewDraft::new("Hi", "<p>Body</p>", Some("me@x.com")));

        assert_eq!(draft.sender, None);
    }

    #[test]
    fn test_load_replaces_previous_draft_and_bumps_version() -> TestResult {
        let store = InMemoryDraftStore::new(Some(identity("bot@relay.test")?));

        let first = store.load(&NewDraft::new("First", "<p>One</p>", None));
        let second = store.load(&NewDraft::new("Second", "", None));

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(store.get().subject, "Second");
        assert_eq!(store.get().message, "");

        Ok(())
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_loads() -> TestResult {
        let store = InMemoryDraftStore::new(Some(identity("bot@relay.test")?));
        store.load(&NewDraft::new("Before", "<p>Before</p>", None));

        let snapshot = store.get();
        store.load(&NewDraft::new("After", "<p>After</p>", None));

        assert_eq!(snapshot.subject, "Before");
        assert_eq!(store.get().subject, "After");

        Ok(())
    }

    #[test]
    fn test_clones_share_the_same_slot() {
        let store = InMemoryDraftStore::new(None);
        let clone = store.clone();

        clone.load(&NewDraft::new("Shared", "<p>Shared</p>", None));

        assert_eq!(store.get().subject, "Shared");
    }

    #[test]
    fn test_concurrent_loads_never_mix_fields() {
        let store = InMemoryDraftStore::new(None);

        let writers: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let tag = format!("{n}-{i}");
                        store.load(&NewDraft::new(&tag, &format!("<p>{tag}</p>"), None));
                    }
                })
            })
            .collect();

        for _ in 0..1_000 {
            let draft = store.get();
            if draft.version > 0 {
                assert_eq!(draft.message, format!("<p>{}</p>", draft.subject));
            }
        }

        for writer in writers {
            writer.join().expect("writer thread panicked");
        }

        assert_eq!(store.get().version, 8 * 200);
    }
}
