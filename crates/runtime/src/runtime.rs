//! High-level runtime orchestrator.
//!
//! The runtime owns the playback worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use macrogame_core::{
    EngineConfig, MethodOracle, MethodTable, PlaybackScript, PlaybackState, SessionState,
};

use crate::api::{ModuleRegistry, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::{Command, PlaybackWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates one playback session
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Tear the session down and stop the worker.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.teardown().await?;
        self.handle.shutdown().await?;
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    script: Option<PlaybackScript>,
    session: Option<SessionState>,
    methods: Option<Arc<dyn MethodOracle>>,
    modules: ModuleRegistry,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            script: None,
            session: None,
            methods: None,
            modules: ModuleRegistry::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the hydrated macrogame to play (required)
    pub fn script(mut self, script: PlaybackScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Continue an existing session (score and completions) instead of a fresh one
    pub fn session(mut self, session: SessionState) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the conversion method catalog used by the gating resolver
    ///
    /// Without one, every offer slot resolves as missing and is dropped.
    pub fn methods(mut self, methods: impl MethodOracle + 'static) -> Self {
        self.methods = Some(Arc::new(methods));
        self
    }

    /// Set the modules that play each microgame
    pub fn modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    /// Build the runtime and spawn the playback worker
    pub async fn build(self) -> Result<Runtime> {
        let script = self.script.ok_or(RuntimeError::MissingScript)?;
        let methods: Arc<dyn MethodOracle> = match self.methods {
            Some(methods) => methods,
            None => Arc::new(MethodTable::new()),
        };
        let state = PlaybackState::with_session(self.session.unwrap_or_default());

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = PlaybackWorker::new(
            state,
            script,
            self.config.engine,
            methods,
            self.modules,
            command_rx,
            command_tx.downgrade(),
            event_bus.clone(),
        );
        let handle = RuntimeHandle::new(command_tx, event_bus);

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
