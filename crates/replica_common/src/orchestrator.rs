//! Orchestrator - registry lookup, resolution, execution, classification.
//!
//! Setup and Break on the same unordered node pair are serialised within
//! this process. Other processes driving the same pair are not excluded.

use crate::action::TopologyAction;
use crate::config::{ReplicaConfig, ReplicationDefaults};
use crate::error::ReplicaError;
use crate::gateway::ExecutorGateway;
use crate::prober::Prober;
use crate::registry::NodeRegistry;
use crate::resolver::{resolve, ActionOptions};
use crate::result::ExecutionResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// A topology request as the caller phrases it: registry ids, not profiles
#[derive(Debug, Clone)]
pub struct TopologyCommand {
    pub node_a_id: String,
    pub node_b_id: String,
    pub action: TopologyAction,
    pub options: ActionOptions,
}

type PairKey = (String, String);

/// Per-pair advisory locks, keyed by the unordered pair of node ids.
/// An entry lives only while someone holds or waits on it.
#[derive(Debug, Default)]
struct PairLocks {
    inner: Mutex<HashMap<PairKey, Arc<AsyncMutex<()>>>>,
}

/// Held pair lock; releasing it drops the map entry when nobody else waits
struct PairGuard<'a> {
    locks: &'a PairLocks,
    key: PairKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PairGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&self.key);
        }
    }
}

impl PairLocks {
    fn key(a: &str, b: &str) -> PairKey {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    async fn acquire(&self, a: &str, b: &str) -> PairGuard<'_> {
        let key = Self::key(a, b);
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.clone()).or_default().clone()
        };
        PairGuard {
            locks: self,
            key,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct Orchestrator {
    registry: NodeRegistry,
    gateway: ExecutorGateway,
    prober: Prober,
    repl_defaults: ReplicationDefaults,
    locks: PairLocks,
}

impl Orchestrator {
    pub fn new(config: &ReplicaConfig) -> Self {
        Self {
            registry: NodeRegistry::new(&config.data_file),
            gateway: ExecutorGateway::new(config.executor.clone(), config.tooling.clone()),
            prober: Prober::new(config.tooling.clone(), config.probe.clone()),
            repl_defaults: config.replication.clone(),
            locks: PairLocks::default(),
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Run a topology action end to end.
    ///
    /// Unknown node ids are `Err(NodeNotFound)` and nothing else runs.
    /// Validation failures come back as a `ResolutionError` result.
    pub async fn run(&self, command: TopologyCommand) -> Result<ExecutionResult, ReplicaError> {
        let node_a = self.registry.require(&command.node_a_id)?;
        let node_b = self.registry.require(&command.node_b_id)?;

        let mut options = command.options;
        if options.repl_user.as_deref().map_or(true, str::is_empty) {
            options.repl_user = Some(self.repl_defaults.user.clone());
        }
        if options.repl_pass.as_deref().map_or(true, str::is_empty) {
            options.repl_pass = Some(self.repl_defaults.password.clone());
        }

        let resolved = match resolve(Some(&node_a), Some(&node_b), command.action, &options) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{} rejected: {}", command.action, e);
                return Ok(ExecutionResult::rejected(e.to_string()));
            }
        };
        let warnings: Vec<String> = resolved.warnings.iter().map(|w| w.to_string()).collect();

        let result = if command.action.is_mutating() {
            let _guard = self.locks.acquire(&node_a.id, &node_b.id).await;
            debug!("Holding pair lock {} / {}", node_a.id, node_b.id);
            self.gateway.execute(&resolved).await
        } else {
            self.gateway.execute(&resolved).await
        };

        info!("{} {} <-> {}: {}", command.action, node_a.name, node_b.name, result.classification);
        Ok(result.with_warnings(warnings))
    }

    /// Connectivity test for a registered node
    pub async fn test_node(&self, id: &str) -> Result<ExecutionResult, ReplicaError> {
        let node = self.registry.require(id)?;
        Ok(self.prober.probe(&node).await)
    }
}
