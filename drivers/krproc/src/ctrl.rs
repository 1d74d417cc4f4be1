// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! RPU control strategies: direct register access, SMC and HVC.

use alloc::{boxed::Box, sync::Arc};

use driver_base::{DriverError, DriverResult};

use crate::{
    config::{ControlMethod, RpuBootMem, RpuMode},
    regs::{self, GlblCntl, RegBanks, RpuCfg},
};

/// Backend selection, together with the resources that variant owns.
///
/// Only the direct variant touches memory-mapped registers, so only it
/// carries the register blocks.
pub enum ControlBackend {
    /// Direct register access from the application processor.
    Direct(Arc<RegBanks>),
    /// Control routed through the secure monitor (ATF).
    SecureMonitor,
    /// Control routed through a hypervisor.
    Hypervisor,
}

impl ControlBackend {
    /// The control method this backend realizes.
    pub fn method(&self) -> ControlMethod {
        match self {
            ControlBackend::Direct(_) => ControlMethod::Direct,
            ControlBackend::SecureMonitor => ControlMethod::Smc,
            ControlBackend::Hypervisor => ControlMethod::Hvc,
        }
    }
}

/// Operations every control strategy provides.
///
/// The direct variant performs one register read-modify-write per call and
/// cannot fail; the privileged variants cross a call boundary that can.
pub trait RpuCtrlOps: Send + Sync {
    /// Sets the core pair to split or lock-step mode.
    fn core_conf(&self) -> DriverResult;

    /// Selects the boot memory (TCM or OCM) for this core.
    fn bootdev(&self) -> DriverResult;

    /// Holds the core at its reset vector (`true`) or releases it (`false`).
    fn halt(&self, do_halt: bool) -> DriverResult;

    /// Asserts (`true`) or deasserts (`false`) this core's reset line.
    fn en_reset(&self, do_reset: bool) -> DriverResult;
}

/// Direct-access control strategy.
pub struct HwRpuCtrl {
    banks: Arc<RegBanks>,
    rpu_id: u32,
    mode: RpuMode,
    bootmem: RpuBootMem,
}

impl HwRpuCtrl {
    /// Creates the strategy over already-mapped register blocks.
    pub fn new(banks: Arc<RegBanks>, rpu_id: u32, mode: RpuMode, bootmem: RpuBootMem) -> Self {
        Self {
            banks,
            rpu_id,
            mode,
            bootmem,
        }
    }
}

impl RpuCtrlOps for HwRpuCtrl {
    fn core_conf(&self) -> DriverResult {
        debug!("rpu{}: core_conf {:?}", self.rpu_id, self.mode);
        let mut cntl = GlblCntl::from_bits_retain(self.banks.rpu.read(regs::RPU_GLBL_CNTL_OFFSET));
        match self.mode {
            RpuMode::Split => {
                cntl.insert(GlblCntl::SLSPLIT);
                cntl.remove(GlblCntl::TCM_COMB);
                cntl.remove(GlblCntl::SLCLAMP);
            }
            RpuMode::LockStep => {
                cntl.remove(GlblCntl::SLSPLIT);
                cntl.insert(GlblCntl::TCM_COMB);
                cntl.insert(GlblCntl::SLCLAMP);
            }
        }
        self.banks.rpu.write(regs::RPU_GLBL_CNTL_OFFSET, cntl.bits());
        Ok(())
    }

    fn bootdev(&self) -> DriverResult {
        debug!("rpu{}: bootdev {:?}", self.rpu_id, self.bootmem);
        let offset = regs::rpu_cfg_offset(self.rpu_id);
        let mut cfg = RpuCfg::from_bits_retain(self.banks.rpu.read(offset));
        match self.bootmem {
            RpuBootMem::Ocm => cfg.insert(RpuCfg::VINITHI),
            RpuBootMem::Tcm => cfg.remove(RpuCfg::VINITHI),
        }
        self.banks.rpu.write(offset, cfg.bits());
        Ok(())
    }

    fn halt(&self, do_halt: bool) -> DriverResult {
        debug!("rpu{}: halt {}", self.rpu_id, do_halt);
        let offset = regs::rpu_cfg_offset(self.rpu_id);
        let mut cfg = RpuCfg::from_bits_retain(self.banks.rpu.read(offset));
        if do_halt {
            cfg.remove(RpuCfg::NCPUHALT);
        } else {
            cfg.insert(RpuCfg::NCPUHALT);
        }
        self.banks.rpu.write(offset, cfg.bits());
        Ok(())
    }

    fn en_reset(&self, do_reset: bool) -> DriverResult {
        debug!("rpu{}: reset {}", self.rpu_id, do_reset);
        let mut rst = self.banks.crl_apb.read(regs::RST_LPD_TOP_OFFSET);
        let bit = regs::RPU0_RESET_BIT << self.rpu_id;
        if do_reset {
            rst |= bit;
        } else {
            rst &= !bit;
        }
        self.banks.crl_apb.write(regs::RST_LPD_TOP_OFFSET, rst);
        Ok(())
    }
}

/// Secure-monitor control strategy.
///
/// The ATF call path is not implemented; every operation reports
/// `Unsupported` and leaves the hardware untouched.
pub struct SmcRpuCtrl {
    rpu_id: u32,
}

impl SmcRpuCtrl {
    /// Creates the SMC placeholder strategy.
    pub fn new(rpu_id: u32) -> Self {
        Self { rpu_id }
    }

    fn unimplemented(&self, op: &str) -> DriverResult {
        error!("rpu{}: atf smc {op} not implemented", self.rpu_id);
        Err(DriverError::Unsupported)
    }
}

impl RpuCtrlOps for SmcRpuCtrl {
    fn core_conf(&self) -> DriverResult {
        self.unimplemented("core_conf")
    }

    fn bootdev(&self) -> DriverResult {
        self.unimplemented("bootdev")
    }

    fn halt(&self, _do_halt: bool) -> DriverResult {
        self.unimplemented("halt")
    }

    fn en_reset(&self, _do_reset: bool) -> DriverResult {
        self.unimplemented("reset")
    }
}

/// Hypervisor control strategy.
///
/// The HVC call path is not implemented; every operation reports
/// `Unsupported` and leaves the hardware untouched.
pub struct HvcRpuCtrl {
    rpu_id: u32,
}

impl HvcRpuCtrl {
    /// Creates the HVC placeholder strategy.
    pub fn new(rpu_id: u32) -> Self {
        Self { rpu_id }
    }

    fn unimplemented(&self, op: &str) -> DriverResult {
        error!("rpu{}: hypervisor hvc {op} not implemented", self.rpu_id);
        Err(DriverError::Unsupported)
    }
}

impl RpuCtrlOps for HvcRpuCtrl {
    fn core_conf(&self) -> DriverResult {
        self.unimplemented("core_conf")
    }

    fn bootdev(&self) -> DriverResult {
        self.unimplemented("bootdev")
    }

    fn halt(&self, _do_halt: bool) -> DriverResult {
        self.unimplemented("halt")
    }

    fn en_reset(&self, _do_reset: bool) -> DriverResult {
        self.unimplemented("reset")
    }
}

/// Builds the control strategy for `backend`. Selected once per instance,
/// never reassigned.
pub fn select_ctrl_ops(
    backend: &ControlBackend,
    rpu_id: u32,
    mode: RpuMode,
    bootmem: RpuBootMem,
) -> Box<dyn RpuCtrlOps> {
    match backend {
        ControlBackend::Direct(banks) => {
            Box::new(HwRpuCtrl::new(banks.clone(), rpu_id, mode, bootmem))
        }
        ControlBackend::SecureMonitor => Box::new(SmcRpuCtrl::new(rpu_id)),
        ControlBackend::Hypervisor => Box::new(HvcRpuCtrl::new(rpu_id)),
    }
}
