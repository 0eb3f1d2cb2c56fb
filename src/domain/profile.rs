//! Resource profiles and environment settings
//!
//! Threading, pooling and queue profiles tune how a component or connector
//! uses threads, pooled instances and event queues. They can be declared
//! once in `mule-environment-properties` and overridden per descriptor.

use super::node::Node;
use super::properties::PropertyMap;
use super::typed;
use crate::schema::{ExhaustedAction, InitialisationPolicy, PoolExhaustedAction, ThreadingProfileId};

#[derive(Debug, Clone, Copy)]
pub struct ThreadingProfileView<'a>(&'a Node);

impl<'a> ThreadingProfileView<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self(node)
    }

    pub fn id(&self) -> ThreadingProfileId {
        typed(self.0, "id").unwrap_or(ThreadingProfileId::Default)
    }

    pub fn max_buffer_size(&self) -> Option<i64> {
        self.0.get_integer("maxBufferSize")
    }

    pub fn max_threads_active(&self) -> Option<i64> {
        self.0.get_integer("maxThreadsActive")
    }

    pub fn max_threads_idle(&self) -> Option<i64> {
        self.0.get_integer("maxThreadsIdle")
    }

    /// Idle thread time to live, in milliseconds.
    pub fn thread_ttl(&self) -> Option<i64> {
        self.0.get_integer("threadTTL")
    }

    pub fn thread_wait_timeout(&self) -> Option<i64> {
        self.0.get_integer("threadWaitTimeout")
    }

    pub fn pool_exhausted_action(&self) -> PoolExhaustedAction {
        typed(self.0, "poolExhaustedAction").unwrap_or(PoolExhaustedAction::Run)
    }

    pub fn do_threading(&self) -> bool {
        self.0.get_bool("doThreading").unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoolingProfileView<'a>(&'a Node);

impl<'a> PoolingProfileView<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self(node)
    }

    pub fn exhausted_action(&self) -> ExhaustedAction {
        typed(self.0, "exhaustedAction").unwrap_or(ExhaustedAction::Grow)
    }

    pub fn max_active(&self) -> Option<i64> {
        self.0.get_integer("maxActive")
    }

    pub fn max_idle(&self) -> Option<i64> {
        self.0.get_integer("maxIdle")
    }

    pub fn max_wait(&self) -> Option<i64> {
        self.0.get_integer("maxWait")
    }

    pub fn factory(&self) -> Option<&'a str> {
        self.0.get_str("factory")
    }

    pub fn initialisation_policy(&self) -> InitialisationPolicy {
        typed(self.0, "initialisationPolicy").unwrap_or(InitialisationPolicy::InitialiseFirst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueueProfileView<'a>(&'a Node);

impl<'a> QueueProfileView<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self(node)
    }

    pub fn max_outstanding_messages(&self) -> Option<i64> {
        self.0.get_integer("maxOutstandingMessages")
    }

    pub fn is_persistent(&self) -> bool {
        self.0.get_bool("persistent").unwrap_or(false)
    }

    pub fn properties(&self) -> PropertyMap {
        PropertyMap::of(self.0)
    }
}

/// The `mule-environment-properties` element.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentView<'a>(&'a Node);

impl<'a> EnvironmentView<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self(node)
    }

    pub fn node(&self) -> &'a Node {
        self.0
    }

    pub fn is_synchronous(&self) -> bool {
        self.0.get_bool("synchronous").unwrap_or(false)
    }

    pub fn is_remote_sync(&self) -> bool {
        self.0.get_bool("remoteSync").unwrap_or(false)
    }

    pub fn server_url(&self) -> Option<&'a str> {
        self.0.get_str("serverUrl")
    }

    pub fn synchronous_event_timeout(&self) -> Option<i64> {
        self.0.get_integer("synchronousEventTimeout")
    }

    pub fn transaction_timeout(&self) -> Option<i64> {
        self.0.get_integer("transactionTimeout")
    }

    pub fn working_directory(&self) -> Option<&'a str> {
        self.0.get_str("workingDirectory")
    }

    pub fn encoding(&self) -> Option<&'a str> {
        self.0.get_str("encoding")
    }

    pub fn model_type(&self) -> Option<&'a str> {
        self.0.get_str("model")
    }

    pub fn is_client_mode(&self) -> bool {
        self.0.get_bool("clientMode").unwrap_or(false)
    }

    pub fn is_embedded(&self) -> bool {
        self.0.get_bool("embedded").unwrap_or(false)
    }

    pub fn message_events_enabled(&self) -> bool {
        self.0.get_bool("enableMessageEvents").unwrap_or(false)
    }

    pub fn is_recoverable_mode(&self) -> bool {
        self.0.get_bool("recoverableMode").unwrap_or(false)
    }

    pub fn threading_profiles(&self) -> Vec<ThreadingProfileView<'a>> {
        self.0.children("threading-profile").iter().map(ThreadingProfileView::new).collect()
    }

    /// Threading profile for one pool. Falls back to the `default` profile.
    pub fn threading_profile(&self, id: ThreadingProfileId) -> Option<ThreadingProfileView<'a>> {
        let profiles = self.threading_profiles();
        profiles
            .iter()
            .find(|profile| profile.id() == id)
            .or_else(|| profiles.iter().find(|profile| profile.id() == ThreadingProfileId::Default))
            .copied()
    }

    pub fn pooling_profile(&self) -> Option<PoolingProfileView<'a>> {
        self.0.child("pooling-profile").map(PoolingProfileView::new)
    }

    pub fn queue_profile(&self) -> Option<QueueProfileView<'a>> {
        self.0.child("queue-profile").map(QueueProfileView::new)
    }

    pub fn persistence_strategy(&self) -> Option<&'a str> {
        self.0.child("persistence-strategy").and_then(|node| node.get_str("className"))
    }

    pub fn connection_strategy(&self) -> Option<&'a str> {
        self.0.child("connection-strategy").and_then(|node| node.get_str("className"))
    }
}
