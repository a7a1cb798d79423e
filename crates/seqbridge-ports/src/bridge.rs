//! Worker thread ownership: start, wake, cooperative stop.

use crate::classify::DirectionMasks;
use crate::config::BridgeConfig;
use crate::endpoints::RealtimeEndpoints;
use crate::source::{PortFactory, PortQuery};
use crate::worker::PortWorker;
use seqbridge_core::{Error, PortCaps, Result, Waker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Owns the port worker thread. Stops it when dropped.
pub struct PortBridge {
    running: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    export_hw_ports: Arc<AtomicBool>,
    waker: Option<Waker>,
    thread_handle: Option<JoinHandle<Result<()>>>,
}

impl PortBridge {
    pub fn builder() -> PortBridgeBuilder {
        PortBridgeBuilder::default()
    }

    /// Validate `config`, wire the channels, and spawn the worker thread.
    pub fn start<Q, F>(
        config: BridgeConfig,
        query: Q,
        factory: F,
    ) -> Result<(Self, RealtimeEndpoints<F::Handle>)>
    where
        Q: PortQuery,
        F: PortFactory,
    {
        let (worker, endpoints) = PortWorker::new(config, query, factory)?;
        let running = Arc::new(AtomicBool::new(true));
        let failed = Arc::new(AtomicBool::new(false));
        let export_hw_ports = worker.export_hw_ports();

        let thread_running = Arc::clone(&running);
        let thread_failed = Arc::clone(&failed);
        let handle = thread::Builder::new()
            .name("seqbridge-ports".into())
            .spawn(move || {
                let result = worker.run(&thread_running);
                if result.is_err() {
                    thread_running.store(false, Ordering::Release);
                    thread_failed.store(true, Ordering::Release);
                }
                result
            })
            .map_err(Error::Spawn)?;

        tracing::debug!(client_id = config.client_id, "port bridge started");

        let bridge = Self {
            running,
            failed,
            export_hw_ports,
            waker: Some(endpoints.waker().clone()),
            thread_handle: Some(handle),
        };
        Ok((bridge, endpoints))
    }

    /// Wake the worker, e.g. after an out-of-band change in the sequencer.
    pub fn wake(&self) -> bool {
        self.waker.as_ref().is_some_and(Waker::post)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self
                .thread_handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// True once the worker stopped on a fatal error.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Takes effect from the next announced port.
    pub fn set_export_hw_ports(&self, export: bool) {
        self.export_hw_ports.store(export, Ordering::Relaxed);
    }

    /// Clear the running flag, wake the worker so it observes it, and join.
    ///
    /// The worker marks every port dead and waits, up to
    /// [`BridgeConfig::shutdown_timeout`], for the realtime side to retire or
    /// drop the ports it holds; dropping the [`RealtimeEndpoints`] ends the wait.
    /// Call this off the realtime side's thread when it still holds ports.
    ///
    /// Returns the worker's fatal error, if it had one. Calling again is a no-op.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.thread_handle.take() else {
            return Ok(());
        };

        self.running.store(false, Ordering::Release);
        // our waker goes too, so the worker notices when the endpoints are dropped
        if let Some(waker) = self.waker.take() {
            waker.post();
        }

        let result = handle.join().map_err(|_| Error::WorkerPanicked)?;
        tracing::debug!("port bridge stopped");
        result
    }
}

impl Drop for PortBridge {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::error!(%err, "port worker failed");
        }
    }
}

impl std::fmt::Debug for PortBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortBridge")
            .field("running", &self.is_running())
            .field("failed", &self.has_failed())
            .finish()
    }
}

/// Builder over [`BridgeConfig`].
#[derive(Debug, Default, Clone)]
pub struct PortBridgeBuilder {
    config: BridgeConfig,
}

impl PortBridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client_id(mut self, client_id: u8) -> Self {
        self.config.client_id = client_id;
        self
    }

    pub fn export_hw_ports(mut self, export: bool) -> Self {
        self.config.export_hw_ports = export;
        self
    }

    pub fn address_capacity(mut self, capacity: usize) -> Self {
        self.config.address_capacity = capacity;
        self
    }

    pub fn deletion_capacity(mut self, capacity: usize) -> Self {
        self.config.deletion_capacity = capacity;
        self
    }

    pub fn announcement_capacity(mut self, capacity: usize) -> Self {
        self.config.announcement_capacity = capacity;
        self
    }

    pub fn input_mask(mut self, mask: PortCaps) -> Self {
        self.config.masks.input = mask;
        self
    }

    pub fn output_mask(mut self, mask: PortCaps) -> Self {
        self.config.masks.output = mask;
        self
    }

    pub fn masks(mut self, masks: DirectionMasks) -> Self {
        self.config.masks = masks;
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn build_config(&self) -> Result<BridgeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    pub fn start<Q, F>(
        self,
        query: Q,
        factory: F,
    ) -> Result<(PortBridge, RealtimeEndpoints<F::Handle>)>
    where
        Q: PortQuery,
        F: PortFactory,
    {
        PortBridge::start(self.config, query, factory)
    }
}
