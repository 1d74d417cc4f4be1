// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Registry mapping core identifiers to live controller instances.
//!
//! The platform's interrupt binding carries no context pointer, so the
//! interrupt path recovers its instance here by core id. Slots are written
//! only from the serialized control path while the interrupt source is
//! quiet (before enable, or after disable on teardown); interrupt delivery
//! only reads them.

use alloc::sync::{Arc, Weak};

use spin::Mutex;

use crate::rproc::RprocController;

/// Up to two RPU cores per SoC.
pub const MAX_INSTANCES: usize = 2;

/// Outcome reported to the interrupt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqStatus {
    /// The interrupt was consumed.
    Handled,
    /// The interrupt was not for this subsystem.
    None,
}

/// Fixed-size table of controller handles keyed by core id.
///
/// Holds weak handles only; the owning subsystem keeps the instances alive
/// and drops them after unregistering.
pub struct InstanceRegistry {
    slots: [Mutex<Option<Weak<RprocController>>>; MAX_INSTANCES],
}

impl InstanceRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            slots: [const { Mutex::new(None) }; MAX_INSTANCES],
        }
    }

    /// Binds `inst` to `rpu_id`, replacing any previous binding.
    ///
    /// Only call while the interrupt source for the core is quiet.
    pub fn register(&self, rpu_id: u32, inst: Weak<RprocController>) {
        *self.slots[rpu_id as usize].lock() = Some(inst);
    }

    /// Clears the binding for `rpu_id`.
    ///
    /// Only call after the interrupt source for the core is disabled.
    pub fn unregister(&self, rpu_id: u32) {
        if let Some(slot) = self.slots.get(rpu_id as usize) {
            *slot.lock() = None;
        }
    }

    /// Looks up the live instance bound to `rpu_id`.
    pub fn get(&self, rpu_id: u32) -> Option<Arc<RprocController>> {
        self.slots
            .get(rpu_id as usize)?
            .lock()
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Routes a pending-message interrupt for `rpu_id` to its controller.
    pub fn dispatch(&self, rpu_id: u32) -> IrqStatus {
        match self.get(rpu_id) {
            Some(inst) => inst.on_ipi(),
            None => warn!("no rproc instance registered for rpu{rpu_id}"),
        }
        IrqStatus::Handled
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: InstanceRegistry = InstanceRegistry::new();

/// The process-wide instance registry.
pub fn registry() -> &'static InstanceRegistry {
    &REGISTRY
}

/// Hardware interrupt entry point for the per-core IPI line.
pub fn on_interrupt(rpu_id: u32) -> IrqStatus {
    REGISTRY.dispatch(rpu_id)
}
