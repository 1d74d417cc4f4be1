// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! IPI notification strategies: direct register access, SMC and HVC.

use alloc::{boxed::Box, sync::Arc};
use core::time::Duration;

use driver_base::{DriverError, DriverResult};

use crate::{
    ctrl::ControlBackend,
    hal::HalOps,
    regs::{self, RegBanks},
};

/// Time for the IPI block to settle after a channel reset.
pub const IPI_SETTLE_DELAY: Duration = Duration::from_micros(10);

/// Operations every notification strategy provides.
///
/// `clear` and `trigger` are single-register writes and are safe from
/// interrupt context. `reset` busy-waits and is not.
pub trait IpiOps: Send + Sync {
    /// Acknowledges a pending IPI from this channel's source.
    fn clear(&self) -> DriverResult;

    /// Disables every source, clears latched state and lets the block settle.
    fn reset(&self) -> DriverResult;

    /// Enables exactly the configured destination mask.
    fn set_mask(&self) -> DriverResult;

    /// Raises the IPI towards the remote core.
    fn trigger(&self) -> DriverResult;
}

/// Direct-access notification strategy.
pub struct HwIpi {
    banks: Arc<RegBanks>,
    hal: Arc<dyn HalOps>,
    rpu_id: u32,
    ipi_dest_mask: u32,
}

impl HwIpi {
    /// Creates the strategy over already-mapped register blocks.
    pub fn new(
        banks: Arc<RegBanks>,
        hal: Arc<dyn HalOps>,
        rpu_id: u32,
        ipi_dest_mask: u32,
    ) -> Self {
        Self {
            banks,
            hal,
            rpu_id,
            ipi_dest_mask,
        }
    }
}

impl IpiOps for HwIpi {
    fn clear(&self) -> DriverResult {
        debug!(
            "rpu{}: irq issuer {:#010x} clear IPI",
            self.rpu_id, self.ipi_dest_mask
        );
        self.banks.ipi.write(regs::ISR_OFFSET, self.ipi_dest_mask);
        Ok(())
    }

    fn reset(&self) -> DriverResult {
        self.banks.ipi.write(regs::IDR_OFFSET, regs::IPI_ALL_MASK);
        self.banks.ipi.write(regs::ISR_OFFSET, regs::IPI_ALL_MASK);
        // Latched state must drain before any source is re-enabled.
        self.hal.busy_wait(IPI_SETTLE_DELAY);
        debug!("rpu{}: IPI reset done", self.rpu_id);
        Ok(())
    }

    fn set_mask(&self) -> DriverResult {
        debug!("rpu{}: set IPI mask {:#010x}", self.rpu_id, self.ipi_dest_mask);
        self.banks.ipi.write(regs::IER_OFFSET, self.ipi_dest_mask);
        Ok(())
    }

    fn trigger(&self) -> DriverResult {
        debug!("rpu{}: trigger IPI dest {:#010x}", self.rpu_id, self.ipi_dest_mask);
        self.banks.ipi.write(regs::TRIG_OFFSET, self.ipi_dest_mask);
        Ok(())
    }
}

/// Secure-monitor notification strategy.
///
/// The ATF call path is not implemented; every operation reports
/// `Unsupported` and leaves the hardware untouched.
pub struct SmcIpi {
    rpu_id: u32,
}

impl SmcIpi {
    /// Creates the SMC placeholder strategy.
    pub fn new(rpu_id: u32) -> Self {
        Self { rpu_id }
    }

    fn unimplemented(&self, op: &str) -> DriverResult {
        error!("rpu{}: atf smc ipi {op} not implemented", self.rpu_id);
        Err(DriverError::Unsupported)
    }
}

impl IpiOps for SmcIpi {
    fn clear(&self) -> DriverResult {
        self.unimplemented("clear")
    }

    fn reset(&self) -> DriverResult {
        self.unimplemented("reset")
    }

    fn set_mask(&self) -> DriverResult {
        self.unimplemented("set_mask")
    }

    fn trigger(&self) -> DriverResult {
        self.unimplemented("trigger")
    }
}

/// Hypervisor notification strategy.
///
/// The HVC call path is not implemented; every operation reports
/// `Unsupported` and leaves the hardware untouched.
pub struct HvcIpi {
    rpu_id: u32,
}

impl HvcIpi {
    /// Creates the HVC placeholder strategy.
    pub fn new(rpu_id: u32) -> Self {
        Self { rpu_id }
    }

    fn unimplemented(&self, op: &str) -> DriverResult {
        error!("rpu{}: hypervisor hvc ipi {op} not implemented", self.rpu_id);
        Err(DriverError::Unsupported)
    }
}

impl IpiOps for HvcIpi {
    fn clear(&self) -> DriverResult {
        self.unimplemented("clear")
    }

    fn reset(&self) -> DriverResult {
        self.unimplemented("reset")
    }

    fn set_mask(&self) -> DriverResult {
        self.unimplemented("set_mask")
    }

    fn trigger(&self) -> DriverResult {
        self.unimplemented("trigger")
    }
}

/// Builds the notification strategy for `backend`. Selected once per
/// instance, never reassigned.
pub fn select_ipi_ops(
    backend: &ControlBackend,
    hal: Arc<dyn HalOps>,
    rpu_id: u32,
    ipi_dest_mask: u32,
) -> Box<dyn IpiOps> {
    match backend {
        ControlBackend::Direct(banks) => {
            Box::new(HwIpi::new(banks.clone(), hal, rpu_id, ipi_dest_mask))
        }
        ControlBackend::SecureMonitor => Box::new(SmcIpi::new(rpu_id)),
        ControlBackend::Hypervisor => Box::new(HvcIpi::new(rpu_id)),
    }
}
