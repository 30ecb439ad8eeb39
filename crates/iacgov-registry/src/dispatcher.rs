// SPDX-License-Identifier: MIT OR Apache-2.0
//! Routes a request to an agent by id (or the registry default), guarding
//! against an orchestrator re-entering itself.

use crate::registry::AgentRegistry;
use iacgov_core::{AgentRequest, Emitter};
use iacgov_error::{ErrorCode, IacGovError};
use std::sync::Arc;
use tracing::debug;

/// Request-metadata key used to thread the set of already-visited agent
/// ids through a dispatch chain. Not part of any public wire contract.
const VISITED_KEY: &str = "__dispatch_visited";

/// Dispatches requests against a sealed [`AgentRegistry`].
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
}

impl Dispatcher {
    /// Build a dispatcher over an already-sealed registry.
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    /// Borrow the underlying registry, e.g. to list agents for a transport.
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Dispatch to `agent_id`, or the registry default when `None`.
    ///
    /// Returns [`ErrorCode::RegistryUnknownAgent`] / [`ErrorCode::RegistryNoDefaultAgent`]
    /// for lookup failures, or [`ErrorCode::RegistryDispatchCycle`] if the
    /// resolved agent has already appeared earlier in this dispatch chain
    /// (e.g. the orchestrator attempting to invoke itself).
    pub async fn dispatch(
        &self,
        agent_id: Option<&str>,
        req: &AgentRequest,
        emit: &dyn Emitter,
    ) -> Result<(), IacGovError> {
        let agent = match agent_id {
            Some(id) => self.registry.get(id).ok_or_else(|| {
                IacGovError::new(ErrorCode::RegistryUnknownAgent, format!("unknown agent '{id}'"))
            })?,
            None => self.registry.default_agent().ok_or_else(|| {
                IacGovError::new(ErrorCode::RegistryNoDefaultAgent, "no default agent configured")
            })?,
        };

        let id = agent.id().to_string();
        let visited = req.metadata.get(VISITED_KEY).cloned().unwrap_or_default();
        if visited.split(',').any(|v| v == id) {
            return Err(IacGovError::new(
                ErrorCode::RegistryDispatchCycle,
                format!("cycle detected: agent '{id}' would re-enter itself"),
            ));
        }

        let mut next_req = req.clone();
        let mut next_visited = visited;
        if !next_visited.is_empty() {
            next_visited.push(',');
        }
        next_visited.push_str(&id);
        next_req.metadata.insert(VISITED_KEY.to_string(), next_visited);

        debug!(agent = %id, "dispatching request");
        agent.handle(&next_req, emit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AgentRegistryBuilder;
    use async_trait::async_trait;
    use iacgov_core::{AgentCapabilities, AgentMetadata};

    struct EchoAgent(&'static str);

    #[async_trait]
    impl iacgov_core::Agent for EchoAgent {
        fn id(&self) -> &str {
            self.0
        }
        fn metadata(&self) -> AgentMetadata {
            AgentMetadata {
                id: self.0.to_string(),
                name: self.0.to_string(),
                description: String::new(),
            }
        }
        fn capabilities(&self) -> AgentCapabilities {
            AgentCapabilities::default()
        }
        async fn handle(&self, _req: &AgentRequest, emit: &dyn Emitter) -> Result<(), IacGovError> {
            emit.message("ok").await;
            Ok(())
        }
    }

    struct RecordingEmitter;

    #[async_trait]
    impl Emitter for RecordingEmitter {
        async fn message(&self, _text: &str) {}
        async fn references(&self, _refs: Vec<iacgov_core::Reference>) {}
        async fn confirmation(&self, _c: iacgov_core::Confirmation) {}
        async fn error(&self, _text: &str) {}
        async fn done(&self) {}
    }

    #[tokio::test]
    async fn unknown_agent_is_an_error() {
        let registry = Arc::new(AgentRegistryBuilder::new().build());
        let dispatcher = Dispatcher::new(registry);
        let req = AgentRequest::default();
        let err = dispatcher
            .dispatch(Some("nope"), &req, &RecordingEmitter)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistryUnknownAgent);
    }

    #[tokio::test]
    async fn no_default_is_an_error() {
        let registry = Arc::new(AgentRegistryBuilder::new().build());
        let dispatcher = Dispatcher::new(registry);
        let req = AgentRequest::default();
        let err = dispatcher.dispatch(None, &req, &RecordingEmitter).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistryNoDefaultAgent);
    }

    #[tokio::test]
    async fn dispatch_succeeds_for_known_agent() {
        let registry = Arc::new(AgentRegistryBuilder::new().register(EchoAgent("policy")).build());
        let dispatcher = Dispatcher::new(registry);
        let req = AgentRequest::default();
        dispatcher.dispatch(Some("policy"), &req, &RecordingEmitter).await.unwrap();
    }

    #[tokio::test]
    async fn re_entering_the_same_agent_is_a_cycle() {
        let registry = Arc::new(AgentRegistryBuilder::new().register(EchoAgent("orchestrator")).build());
        let dispatcher = Dispatcher::new(registry);
        let mut req = AgentRequest::default();
        req.metadata.insert(VISITED_KEY.to_string(), "orchestrator".to_string());
        let err = dispatcher
            .dispatch(Some("orchestrator"), &req, &RecordingEmitter)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistryDispatchCycle);
    }
}
