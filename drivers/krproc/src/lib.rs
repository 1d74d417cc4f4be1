// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! ZynqMP Cortex-R5 remote processor control.
//!
//! This crate brings an auxiliary R5 core out of reset into a known
//! configuration, releases it, and wires the core's inter-processor
//! interrupt (IPI) channel into a deferred drain of the shared message
//! transport. Up to two cores are supported; each one is driven by its own
//! [`RprocController`].
//!
//! The same control sequence can be issued through three privilege
//! mechanisms (direct register access, secure monitor call, hypervisor
//! call), selected once at construction via [`ControlBackend`]. Discovery,
//! register mapping, interrupt-line acquisition and the message transport
//! itself belong to the surrounding kernel and are reached through the
//! collaborator traits in [`hal`], [`work`] and [`transport`].

#![no_std]

extern crate alloc;
#[macro_use]
extern crate log;

pub mod config;
pub mod ctrl;
pub mod hal;
pub mod ipi;
pub mod regs;
pub mod registry;
pub mod rproc;
pub mod transport;
pub mod work;

pub use crate::{
    config::{ConfigError, ControlMethod, RprocConfig, RpuBootMem, RpuMode},
    ctrl::{ControlBackend, RpuCtrlOps},
    hal::HalOps,
    ipi::IpiOps,
    regs::{MmioRegs, RegBanks, RegIo},
    registry::{InstanceRegistry, IrqStatus, MAX_INSTANCES, on_interrupt, registry},
    rproc::{RprocController, RprocState},
    transport::{DrainResult, TransportOps},
    work::{WorkFn, WorkqueueOps},
};
