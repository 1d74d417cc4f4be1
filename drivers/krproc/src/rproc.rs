// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Lifecycle control for one R5 core and the deferred IPI drain.

use alloc::{
    boxed::Box,
    sync::{Arc, Weak},
};
use core::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use driver_base::{DeviceKind, DriverOps, DriverResult};
use spin::Mutex;

use crate::{
    config::RprocConfig,
    ctrl::{self, ControlBackend, RpuCtrlOps},
    hal::HalOps,
    ipi::{self, IpiOps},
    registry::InstanceRegistry,
    transport::{DrainResult, TransportOps},
    work::{WorkFn, WorkqueueOps},
};

/// Time for the asserted reset and halt bits to propagate before release.
pub const HALT_SETTLE_DELAY: Duration = Duration::from_micros(500);

/// Lifecycle states of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RprocState {
    /// Core held in reset, notification channel quiet.
    Stopped,
    /// Boot sequence in flight on the control path.
    Configuring,
    /// Core released and the notification channel armed.
    Running,
}

/// Controller for one R5 core.
///
/// Owns the control and notification strategies selected at construction
/// and the deferred-drain machinery behind the IPI line. `start`/`stop` run
/// on the serialized control path; `kick` and the interrupt path only issue
/// single-register writes through the strategies.
pub struct RprocController {
    cfg: RprocConfig,
    rpu_ops: Box<dyn RpuCtrlOps>,
    ipi_ops: Box<dyn IpiOps>,
    hal: Arc<dyn HalOps>,
    workqueue: Arc<dyn WorkqueueOps>,
    transport: Arc<dyn TransportOps>,
    registry: &'static InstanceRegistry,
    state: Mutex<RprocState>,
    drain_pending: AtomicBool,
    drain_work: WorkFn,
    this: Weak<RprocController>,
}

impl RprocController {
    /// Builds the controller for `cfg` over the selected backend.
    ///
    /// The instance does not receive interrupts until [`start`](Self::start)
    /// has registered it.
    pub fn new(
        cfg: RprocConfig,
        backend: ControlBackend,
        hal: Arc<dyn HalOps>,
        workqueue: Arc<dyn WorkqueueOps>,
        transport: Arc<dyn TransportOps>,
        registry: &'static InstanceRegistry,
    ) -> Arc<Self> {
        info!(
            "rpu{}: mode {:?}, bootmem {:?}, method {:?}, ipi_dest_mask {:#x}",
            cfg.rpu_id,
            cfg.mode,
            cfg.bootmem,
            backend.method(),
            cfg.ipi_dest_mask
        );
        let rpu_ops = ctrl::select_ctrl_ops(&backend, cfg.rpu_id, cfg.mode, cfg.bootmem);
        let ipi_ops = ipi::select_ipi_ops(&backend, hal.clone(), cfg.rpu_id, cfg.ipi_dest_mask);
        Self::with_ops(cfg, rpu_ops, ipi_ops, hal, workqueue, transport, registry)
    }

    /// Builds the controller over already-selected strategies.
    pub fn with_ops(
        cfg: RprocConfig,
        rpu_ops: Box<dyn RpuCtrlOps>,
        ipi_ops: Box<dyn IpiOps>,
        hal: Arc<dyn HalOps>,
        workqueue: Arc<dyn WorkqueueOps>,
        transport: Arc<dyn TransportOps>,
        registry: &'static InstanceRegistry,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let weak = this.clone();
            let drain_work = WorkFn::new(move || {
                if let Some(inst) = weak.upgrade() {
                    inst.drain_vring();
                }
            });
            Self {
                cfg,
                rpu_ops,
                ipi_ops,
                hal,
                workqueue,
                transport,
                registry,
                state: Mutex::new(RprocState::Stopped),
                drain_pending: AtomicBool::new(false),
                drain_work,
                this: this.clone(),
            }
        })
    }

    /// Boots the core.
    ///
    /// Registers the instance for interrupt dispatch, applies the mode and
    /// boot-device configuration under asserted reset and halt, waits for
    /// the bits to settle, releases the core (reset strictly before halt)
    /// and arms the notification channel. A backend failure aborts the
    /// remaining steps and leaves the controller stopped; `stop` followed by
    /// `start` is always a safe re-issue.
    pub fn start(&self) -> DriverResult {
        debug!("rpu{}: start", self.cfg.rpu_id);
        *self.state.lock() = RprocState::Configuring;
        let res = self.boot_sequence();
        match res {
            Ok(()) => *self.state.lock() = RprocState::Running,
            Err(e) => {
                warn!("rpu{}: start aborted: {e:?}", self.cfg.rpu_id);
                *self.state.lock() = RprocState::Stopped;
            }
        }
        res
    }

    fn boot_sequence(&self) -> DriverResult {
        // Shared vring pages must be clean before the core starts fetching.
        self.hal.flush_dcache();
        self.registry.register(self.cfg.rpu_id, self.this.clone());

        self.rpu_ops.core_conf()?;
        self.rpu_ops.en_reset(true)?;
        self.rpu_ops.halt(true)?;
        self.rpu_ops.bootdev()?;
        // Mode and boot bits are latched by the reset logic; they need real
        // time to propagate before release.
        self.hal.busy_wait(HALT_SETTLE_DELAY);
        self.rpu_ops.en_reset(false)?;
        self.rpu_ops.halt(false)?;

        self.ipi_init()
    }

    fn ipi_init(&self) -> DriverResult {
        debug!("rpu{}: ipi_init", self.cfg.rpu_id);
        self.ipi_ops.reset()?;
        self.ipi_ops.set_mask()
    }

    /// Powers the core back down: reset and halt asserted, notification
    /// channel quiesced.
    ///
    /// Safe to call without a preceding [`start`](Self::start); the writes
    /// are redundant then.
    pub fn stop(&self) -> DriverResult {
        debug!("rpu{}: stop", self.cfg.rpu_id);
        let res = (|| {
            self.rpu_ops.en_reset(true)?;
            self.rpu_ops.halt(true)?;
            self.ipi_ops.reset()
        })();
        *self.state.lock() = RprocState::Stopped;
        res
    }

    /// Signals the remote firmware that `vqid` has new buffers.
    ///
    /// Only one vring exists in this topology, so `vqid` does not select a
    /// destination; the fixed channel mask is always raised. No lifecycle
    /// precondition is enforced here; the owner sequences kicks against
    /// start/stop.
    pub fn kick(&self, vqid: u32) {
        debug!("rpu{}: kick firmware, vqid {vqid}", self.cfg.rpu_id);
        if let Err(e) = self.ipi_ops.trigger() {
            warn!("rpu{}: kick failed: {e:?}", self.cfg.rpu_id);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RprocState {
        *self.state.lock()
    }

    /// The configuration this controller was built with.
    pub fn config(&self) -> &RprocConfig {
        &self.cfg
    }

    /// Removes this instance from its registry.
    ///
    /// The interrupt source for the core must be disabled first; the
    /// interrupt path reads the registry without locking against teardown.
    pub fn unregister(&self) {
        self.registry.unregister(self.cfg.rpu_id);
    }

    /// Interrupt-context entry for the per-core IPI line.
    ///
    /// Schedules the deferred drain, coalescing repeats while one is
    /// already pending, then acknowledges the source. The line stays
    /// asserted until cleared, so the acknowledgment happens even when
    /// scheduling fails; that failure is reported, never retried here.
    pub(crate) fn on_ipi(&self) {
        debug!("rpu{}: pending message from remote", self.cfg.rpu_id);
        if self
            .drain_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            && !self.workqueue.schedule(self.drain_work.clone())
        {
            self.drain_pending.store(false, Ordering::Release);
            error!("rpu{}: failed to schedule vring drain", self.cfg.rpu_id);
        }
        if let Err(e) = self.ipi_ops.clear() {
            error!("rpu{}: IPI clear failed: {e:?}", self.cfg.rpu_id);
        }
    }

    /// Deferred drain pass over vring 0.
    fn drain_vring(&self) {
        // Clear before draining: an interrupt landing mid-drain must be able
        // to schedule the next pass.
        self.drain_pending.store(false, Ordering::Release);
        self.hal.flush_dcache();
        if self.transport.notify_queue_readable(0) == DrainResult::Empty {
            debug!("rpu{}: no message found in vqid 0", self.cfg.rpu_id);
        }
    }
}

impl DriverOps for RprocController {
    fn device_kind(&self) -> DeviceKind {
        DeviceKind::RemoteProc
    }

    fn name(&self) -> &str {
        match self.cfg.rpu_id {
            0 => "zynqmp-r5-rpu0",
            _ => "zynqmp-r5-rpu1",
        }
    }
}
