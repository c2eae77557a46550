// ABOUTME: Session registry and per-session transports for the Streamable HTTP protocol path
// ABOUTME: Deregistration is message-passing: transports announce closure on a channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! # Session Registry
//!
//! In-memory store mapping session identifiers to live transports. A session
//! is created only as a side effect of a successful `initialize` call with no
//! prior session id; it is destroyed when its transport signals closure
//! (explicit close or idle eviction). Entries are removed exclusively by the
//! close listener consuming the transports' close channel, never by request
//! handlers directly, so every removal path is the same auditable one.
//!
//! Invariant: every registry entry holds a live, non-closed transport. A
//! transport that has signalled closure is removed before its id can be
//! routed to again.

use crate::mcp::dispatcher::ProtocolDispatcher;
use crate::mcp::protocol::{McpRequest, McpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One session's bidirectional channel to the protocol dispatcher.
///
/// Owned exclusively by its registry entry; closing it emits the session id
/// on the close channel, which the registry's listener consumes to remove
/// the entry.
pub struct SessionTransport {
    session_id: String,
    dispatcher: Arc<dyn ProtocolDispatcher>,
    close_tx: mpsc::UnboundedSender<String>,
}

impl SessionTransport {
    /// The session identifier this transport is bound to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Forward one request to the protocol dispatcher
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        self.dispatcher.handle(request).await
    }

    /// Signal closure; the registry's close listener removes the entry
    pub fn close(&self) {
        if self.close_tx.send(self.session_id.clone()).is_err() {
            warn!(
                "close channel gone; session {} cannot be deregistered",
                self.session_id
            );
        }
    }
}

/// Session metadata tracked alongside the transport
struct SessionEntry {
    transport: Arc<SessionTransport>,
    created_at: chrono::DateTime<chrono::Utc>,
    last_seen_at: chrono::DateTime<chrono::Utc>,
}

/// Concurrent-safe store of active sessions
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    close_tx: mpsc::UnboundedSender<String>,
}

impl SessionRegistry {
    /// Create a registry plus the close-event receiver to hand to
    /// [`Self::spawn_close_listener`]
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (close_tx, close_rx) = mpsc::unbounded_channel();
        let registry = Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            close_tx,
        });
        (registry, close_rx)
    }

    /// Consume close events and deregister the named sessions
    pub fn spawn_close_listener(
        registry: Arc<Self>,
        mut close_rx: mpsc::UnboundedReceiver<String>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(session_id) = close_rx.recv().await {
                registry.remove(&session_id).await;
            }
            debug!("session close channel drained, listener exiting");
        })
    }

    /// Create a fresh session bound to the given dispatcher.
    ///
    /// The id is an unpredictable UUIDv4, never reused; the entry is inserted
    /// before the transport is handed back, so a follow-up request bearing
    /// the returned id routes immediately.
    pub async fn create_session(
        &self,
        dispatcher: Arc<dyn ProtocolDispatcher>,
    ) -> Arc<SessionTransport> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let transport = Arc::new(SessionTransport {
            session_id: session_id.clone(),
            dispatcher,
            close_tx: self.close_tx.clone(),
        });

        let now = chrono::Utc::now();
        let entry = SessionEntry {
            transport: transport.clone(),
            created_at: now,
            last_seen_at: now,
        };

        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session_id.clone(), entry);
        }

        info!("session created: {}", session_id);
        transport
    }

    /// Look up an active session's transport, bumping its activity timestamp
    pub async fn get_transport(&self, session_id: &str) -> Option<Arc<SessionTransport>> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(session_id).map(|entry| {
            entry.last_seen_at = chrono::Utc::now();
            entry.transport.clone()
        })
    }

    /// Number of active sessions
    pub async fn active_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    async fn remove(&self, session_id: &str) {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };
        if let Some(entry) = removed {
            let lifetime = chrono::Utc::now() - entry.created_at;
            info!(
                "session closed: {} (lived {}s)",
                session_id,
                lifetime.num_seconds()
            );
        }
    }

    /// Close sessions idle for longer than the given window.
    ///
    /// Eviction goes through each transport's own close signal so removal
    /// follows the same path as every other teardown. Returns the ids closed.
    pub async fn cleanup_idle_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let timeout = i64::try_from(idle_timeout_secs).unwrap_or(i64::MAX);
        let cutoff = chrono::Utc::now() - chrono::Duration::seconds(timeout);

        let idle: Vec<Arc<SessionTransport>> = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .filter(|entry| entry.last_seen_at < cutoff)
                .map(|entry| entry.transport.clone())
                .collect()
        };

        let mut closed = Vec::with_capacity(idle.len());
        for transport in idle {
            info!("evicting idle session: {}", transport.session_id());
            transport.close();
            closed.push(transport.session_id().to_owned());
        }
        closed
    }

    /// Periodically sweep idle sessions
    pub fn spawn_sweeper(
        registry: Arc<Self>,
        idle_timeout_secs: u64,
        sweep_interval_secs: u64,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(sweep_interval_secs));
            // First tick fires immediately; skip it so a fresh server does
            // no work at startup.
            interval.tick().await;
            loop {
                interval.tick().await;
                let closed = registry.cleanup_idle_sessions(idle_timeout_secs).await;
                if !closed.is_empty() {
                    debug!("idle sweep closed {} session(s)", closed.len());
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{McpRequest, McpResponse};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoDispatcher;

    #[async_trait]
    impl ProtocolDispatcher for EchoDispatcher {
        async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
            let id = request.id.unwrap_or(serde_json::Value::Null);
            Some(McpResponse::success(id, json!({ "method": request.method })))
        }
    }

    fn dispatcher() -> Arc<dyn ProtocolDispatcher> {
        Arc::new(EchoDispatcher)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (registry, _close_rx) = SessionRegistry::new();
        let transport = registry.create_session(dispatcher()).await;
        let id = transport.session_id().to_owned();

        assert_eq!(registry.active_count().await, 1);
        let found = registry.get_transport(&id).await;
        assert!(found.is_some());
        assert!(registry.get_transport("never-issued").await.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (registry, _close_rx) = SessionRegistry::new();
        let a = registry.create_session(dispatcher()).await;
        let b = registry.create_session(dispatcher()).await;
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(registry.active_count().await, 2);
    }

    #[tokio::test]
    async fn test_close_deregisters_via_listener() {
        let (registry, close_rx) = SessionRegistry::new();
        let listener = SessionRegistry::spawn_close_listener(registry.clone(), close_rx);

        let transport = registry.create_session(dispatcher()).await;
        let id = transport.session_id().to_owned();
        transport.close();

        // The listener runs on the same runtime; yield until it drains.
        for _ in 0..50 {
            if registry.active_count().await == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(registry.active_count().await, 0);
        assert!(registry.get_transport(&id).await.is_none());
        listener.abort();
    }

    #[tokio::test]
    async fn test_registry_returns_to_zero_after_cycles() {
        let (registry, close_rx) = SessionRegistry::new();
        let listener = SessionRegistry::spawn_close_listener(registry.clone(), close_rx);

        for _ in 0..100 {
            let transport = registry.create_session(dispatcher()).await;
            transport.close();
        }

        for _ in 0..100 {
            if registry.active_count().await == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(registry.active_count().await, 0);
        listener.abort();
    }

    #[tokio::test]
    async fn test_closing_one_session_leaves_others() {
        let (registry, close_rx) = SessionRegistry::new();
        let listener = SessionRegistry::spawn_close_listener(registry.clone(), close_rx);

        let a = registry.create_session(dispatcher()).await;
        let b = registry.create_session(dispatcher()).await;
        a.close();

        for _ in 0..50 {
            if registry.active_count().await == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(registry.active_count().await, 1);
        assert!(registry.get_transport(b.session_id()).await.is_some());
        listener.abort();
    }

    #[tokio::test]
    async fn test_idle_cleanup_closes_stale_sessions() {
        let (registry, close_rx) = SessionRegistry::new();
        let listener = SessionRegistry::spawn_close_listener(registry.clone(), close_rx);

        let stale = registry.create_session(dispatcher()).await;
        let fresh = registry.create_session(dispatcher()).await;

        // Backdate the stale session's activity.
        {
            let mut sessions = registry.sessions.write().await;
            let entry = sessions.get_mut(stale.session_id()).unwrap();
            entry.last_seen_at = chrono::Utc::now() - chrono::Duration::seconds(3600);
        }

        let closed = registry.cleanup_idle_sessions(1800).await;
        assert_eq!(closed, vec![stale.session_id().to_owned()]);

        for _ in 0..50 {
            if registry.active_count().await == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(registry.get_transport(fresh.session_id()).await.is_some());
        assert!(registry.get_transport(stale.session_id()).await.is_none());
        listener.abort();
    }

    #[tokio::test]
    async fn test_transport_dispatches() {
        let (registry, _close_rx) = SessionRegistry::new();
        let transport = registry.create_session(dispatcher()).await;

        let response = transport
            .handle_request(McpRequest {
                jsonrpc: "2.0".into(),
                method: "ping".into(),
                params: None,
                id: Some(json!(9)),
            })
            .await
            .expect("echo dispatcher always responds");
        assert_eq!(response.id, json!(9));
    }
}
