// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Register-level access to the RPU control, CRL_APB reset and IPI blocks.

use alloc::sync::Arc;

use bitflags::bitflags;

/// RPU global control register, shared by both cores.
pub const RPU_GLBL_CNTL_OFFSET: usize = 0x0000;
/// RPU core 0 configuration register.
pub const RPU_0_CFG_OFFSET: usize = 0x0100;
/// RPU core 1 configuration register.
pub const RPU_1_CFG_OFFSET: usize = 0x0200;

/// Low-power-domain reset control register inside CRL_APB.
pub const RST_LPD_TOP_OFFSET: usize = 0x023C;
/// Reset bit for RPU core 0; core 1 uses the next bit up.
pub const RPU0_RESET_BIT: u32 = 1 << 0;

/// IPI trigger register.
pub const TRIG_OFFSET: usize = 0x00;
/// IPI observation register.
pub const OBS_OFFSET: usize = 0x04;
/// IPI interrupt status/clear register.
pub const ISR_OFFSET: usize = 0x10;
/// IPI interrupt mask register.
pub const IMR_OFFSET: usize = 0x14;
/// IPI interrupt enable register.
pub const IER_OFFSET: usize = 0x18;
/// IPI interrupt disable register.
pub const IDR_OFFSET: usize = 0x1C;
/// Every IPI source on the channel.
pub const IPI_ALL_MASK: u32 = 0x0F0F_0301;

bitflags! {
    /// Fields of the RPU global control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlblCntl: u32 {
        /// High: split mode. Low: lock-step mode.
        const SLSPLIT = 1 << 3;
        /// High: clamp the redundant core outputs (lock-step mode).
        const SLCLAMP = 1 << 4;
        /// High: combine both TCM banks. Low: split TCMs between the cores.
        const TCM_COMB = 1 << 6;
    }

    /// Fields of the per-core RPU configuration registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RpuCfg: u32 {
        /// High: core runs. Low: core held at the reset vector.
        const NCPUHALT = 1 << 0;
        /// Boot memory select. High: OCM. Low: TCM.
        const VINITHI = 1 << 2;
    }
}

/// Returns the configuration register offset for the given core.
pub const fn rpu_cfg_offset(rpu_id: u32) -> usize {
    if rpu_id == 0 {
        RPU_0_CFG_OFFSET
    } else {
        RPU_1_CFG_OFFSET
    }
}

/// Raw 32-bit access to one memory-mapped register block.
///
/// There is no error return: an out-of-range offset is a programming error,
/// not a runtime condition. Callers own any settling delay a write needs.
pub trait RegIo: Send + Sync {
    /// Reads the register at `offset` bytes from the block base.
    fn read(&self, offset: usize) -> u32;

    /// Writes the register at `offset` bytes from the block base.
    fn write(&self, offset: usize, value: u32);
}

/// A register block mapped at a fixed virtual address.
pub struct MmioRegs {
    base: *mut u8,
}

impl MmioRegs {
    /// Wraps the block mapped at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be a device mapping that stays valid for the life of the
    /// returned value, and every register accessed through it must lie
    /// inside that mapping.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self { base }
    }
}

unsafe impl Send for MmioRegs {}
unsafe impl Sync for MmioRegs {}

impl RegIo for MmioRegs {
    fn read(&self, offset: usize) -> u32 {
        unsafe { core::ptr::read_volatile(self.base.add(offset) as *const u32) }
    }

    fn write(&self, offset: usize, value: u32) {
        unsafe { core::ptr::write_volatile(self.base.add(offset) as *mut u32, value) }
    }
}

/// The three register blocks the direct backend drives.
pub struct RegBanks {
    /// RPU control block (global control and per-core configuration).
    pub rpu: Arc<dyn RegIo>,
    /// CRL_APB clock/reset controller block.
    pub crl_apb: Arc<dyn RegIo>,
    /// IPI channel block.
    pub ipi: Arc<dyn RegIo>,
}
