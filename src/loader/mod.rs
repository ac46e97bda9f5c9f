//! Generic fetch-backed view state.
//!
//! A [`ResourceLoader`] owns the [`FetchState`] of one view and the generation
//! counter that guards it. Every request starts with [`ResourceLoader::begin`],
//! which hands out a [`Ticket`]; the response is committed with
//! [`ResourceLoader::resolve`] only while that ticket is still the newest one.
//! Responses for superseded keys, or arriving after an unmount, are dropped.
//!
//! What is fetched and how failures are worded is supplied by a [`Resource`]
//! implementation, so the listing and detail views share one state machine.

pub mod state;

pub use state::{FetchState, Phase};

use crate::store::{FetchError, StoreApi};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, warn};

/// Request and result shape of a fetch-backed view.
#[async_trait]
pub trait Resource: Clone + Send + Sync + 'static {
    /// Identifies one request (`()` for the collection, the id for details).
    type Key: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Value exposed in the Ready phase.
    type Output: Send + 'static;

    /// Performs the request for `key`.
    async fn fetch(&self, api: &dyn StoreApi, key: &Self::Key)
        -> Result<Self::Output, FetchError>;

    /// User-facing message for a failed request. Never derived from the cause.
    fn failure_message(&self, key: &Self::Key) -> String;
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    /// The key this request was issued for.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Monotonic request number within its loader.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State machine for one fetch-backed view.
pub struct ResourceLoader<R: Resource> {
    resource: R,
    key: Option<R::Key>,
    generation: u64,
    state: FetchState<R::Output>,
}

impl<R: Resource> ResourceLoader<R> {
    /// Creates a loader with no target.
    pub fn new(resource: R) -> Self {
        Self { resource, key: None, generation: 0, state: FetchState::NoTarget }
    }

    /// The resource backing this loader.
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Current view state.
    pub fn state(&self) -> &FetchState<R::Output> {
        &self.state
    }

    /// Key of the current (or last) request, if any.
    pub fn key(&self) -> Option<&R::Key> {
        self.key.as_ref()
    }

    /// Starts a request for `key`, superseding any earlier one.
    pub fn begin(&mut self, key: R::Key) -> Ticket<R::Key> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.state = FetchState::Loading;

        debug!("Request #{} started for {:?}", self.generation, key);
        Ticket { generation: self.generation, key }
    }

    /// Drops the target and state; outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.key = None;
        self.state = FetchState::NoTarget;
    }

    /// True if `ticket` belongs to the newest request and it has not settled.
    pub fn is_pending(&self, ticket: &Ticket<R::Key>) -> bool {
        self.is_current(ticket) && self.state.is_loading()
    }

    /// True if `ticket` belongs to the newest request.
    pub fn is_current(&self, ticket: &Ticket<R::Key>) -> bool {
        ticket.generation == self.generation && self.key.as_ref() == Some(&ticket.key)
    }

    /// Commits the outcome of `ticket`'s request. Returns false, leaving the
    /// state untouched, when the ticket is stale or already settled.
    pub fn resolve(
        &mut self,
        ticket: &Ticket<R::Key>,
        outcome: Result<R::Output, FetchError>,
    ) -> bool {
        if !self.is_pending(ticket) {
            debug!(
                "Dropping stale response #{} for {:?} (current #{})",
                ticket.generation, ticket.key, self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(value) => FetchState::Ready { value },
            Err(e) => {
                warn!("Request for {:?} failed: {}", ticket.key, e);
                FetchState::Error { message: self.resource.failure_message(&ticket.key) }
            }
        };

        true
    }

    /// Begins, performs and commits a request in one step.
    pub async fn load(&mut self, api: &dyn StoreApi, key: R::Key) -> &FetchState<R::Output> {
        let ticket = self.begin(key);
        let outcome = self.resource.fetch(api, ticket.key()).await;
        self.resolve(&ticket, outcome);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Product;

    /// Echoes the key back; fails for keys starting with "bad".
    #[derive(Clone)]
    struct Echo;

    #[async_trait]
    impl Resource for Echo {
        type Key = String;
        type Output = String;

        async fn fetch(
            &self,
            _api: &dyn StoreApi,
            key: &Self::Key,
        ) -> Result<Self::Output, FetchError> {
            if key.starts_with("bad") {
                Err(FetchError::Status(404))
            } else {
                Ok(key.to_uppercase())
            }
        }

        fn failure_message(&self, key: &Self::Key) -> String {
            format!("failed {}", key)
        }
    }

    struct NoApi;

    #[async_trait]
    impl StoreApi for NoApi {
        async fn products(&self) -> Result<Vec<Product>, FetchError> {
            Err(FetchError::Transport("unused".to_string()))
        }

        async fn product(&self, _id: &str) -> Result<Product, FetchError> {
            Err(FetchError::Transport("unused".to_string()))
        }

        async fn probe_image(&self, _url: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_new_loader_has_no_target() {
        let loader = ResourceLoader::new(Echo);
        assert_eq!(loader.state().phase(), Phase::NoTarget);
        assert!(loader.key().is_none());
    }

    #[test]
    fn test_begin_enters_loading() {
        let mut loader = ResourceLoader::new(Echo);
        let ticket = loader.begin("a".to_string());

        assert_eq!(loader.state().phase(), Phase::Loading);
        assert_eq!(loader.key(), Some(&"a".to_string()));
        assert_eq!(ticket.key(), "a");
        assert!(loader.is_pending(&ticket));
    }

    #[test]
    fn test_resolve_success() {
        let mut loader = ResourceLoader::new(Echo);
        let ticket = loader.begin("a".to_string());

        assert!(loader.resolve(&ticket, Ok("A".to_string())));
        assert_eq!(loader.state().value(), Some(&"A".to_string()));
        assert!(loader.state().error_message().is_none());
    }

    #[test]
    fn test_resolve_failure_uses_resource_message() {
        let mut loader = ResourceLoader::new(Echo);
        let ticket = loader.begin("x".to_string());

        assert!(loader.resolve(&ticket, Err(FetchError::Transport("dns".to_string()))));
        assert_eq!(loader.state().error_message(), Some("failed x"));
        assert!(loader.state().value().is_none());
    }

    #[test]
    fn test_resolve_settles_only_once() {
        let mut loader = ResourceLoader::new(Echo);
        let ticket = loader.begin("a".to_string());

        assert!(loader.resolve(&ticket, Ok("first".to_string())));
        assert!(!loader.resolve(&ticket, Err(FetchError::Status(500))));
        assert_eq!(loader.state().value(), Some(&"first".to_string()));
    }

    #[test]
    fn test_out_of_order_responses_keep_newest() {
        let mut loader = ResourceLoader::new(Echo);
        let a = loader.begin("a".to_string());
        let b = loader.begin("b".to_string());

        // B resolves first, then A's late response arrives
        assert!(loader.resolve(&b, Ok("B".to_string())));
        assert!(!loader.resolve(&a, Ok("A".to_string())));

        assert_eq!(loader.state().value(), Some(&"B".to_string()));
        assert_eq!(loader.key(), Some(&"b".to_string()));
    }

    #[test]
    fn test_in_order_responses_keep_newest() {
        let mut loader = ResourceLoader::new(Echo);
        let a = loader.begin("a".to_string());
        let b = loader.begin("b".to_string());

        assert!(!loader.resolve(&a, Err(FetchError::Status(404))));
        assert_eq!(loader.state().phase(), Phase::Loading);

        assert!(loader.resolve(&b, Ok("B".to_string())));
        assert_eq!(loader.state().value(), Some(&"B".to_string()));
    }

    #[test]
    fn test_same_key_reissued_is_distinct_request() {
        let mut loader = ResourceLoader::new(Echo);
        let first = loader.begin("a".to_string());
        let second = loader.begin("a".to_string());

        assert_ne!(first.generation(), second.generation());
        assert!(!loader.resolve(&first, Ok("old".to_string())));
        assert!(loader.resolve(&second, Ok("new".to_string())));
        assert_eq!(loader.state().value(), Some(&"new".to_string()));
    }

    #[test]
    fn test_clear_makes_pending_ticket_stale() {
        let mut loader = ResourceLoader::new(Echo);
        let ticket = loader.begin("a".to_string());
        loader.clear();

        assert!(!loader.resolve(&ticket, Ok("A".to_string())));
        assert_eq!(loader.state().phase(), Phase::NoTarget);
        assert!(loader.key().is_none());
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut loader = ResourceLoader::new(Echo);
        let state = loader.load(&NoApi, "hello".to_string()).await;
        assert_eq!(state.value(), Some(&"HELLO".to_string()));
    }

    #[tokio::test]
    async fn test_load_failure() {
        let mut loader = ResourceLoader::new(Echo);
        let state = loader.load(&NoApi, "bad-id".to_string()).await;
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error_message(), Some("failed bad-id"));
    }
}
