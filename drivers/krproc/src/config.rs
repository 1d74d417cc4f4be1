// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Construction-time configuration for an RPU instance.
//!
//! Decodes the device-tree property strings the discovery code hands over
//! (`core_conf`, `method`, `bootmem`, `ipi_dest_mask`) and validates them
//! before a controller is built. The controller itself treats a
//! [`RprocConfig`] as a precondition and never re-validates it.

use core::str::FromStr;

use crate::registry::MAX_INSTANCES;

/// `ipi_dest_mask` used when the device tree does not provide one.
pub const DEFAULT_IPI_DEST_MASK: u32 = 0x100;

/// R5 core pair configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpuMode {
    /// Both cores run the same code in lock step; only core 0 is visible.
    LockStep,
    /// The cores run independently.
    Split,
}

/// Memory the core fetches its reset vector from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpuBootMem {
    /// Tightly-coupled memory.
    Tcm,
    /// On-chip RAM.
    Ocm,
}

/// Privilege mechanism used to reach the RPU and IPI control registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMethod {
    /// Direct register access from the application processor.
    Direct,
    /// Secure monitor call into ATF.
    Smc,
    /// Hypervisor call.
    Hvc,
}

/// Errors produced while decoding configuration properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown `core_conf` property string.
    InvalidCoreConf,
    /// Unknown `method` property string.
    InvalidMethod,
    /// Unknown `bootmem` property string.
    InvalidBootMem,
    /// Core identifier outside the supported range, or core 1 in lock-step.
    InvalidRpuId,
}

/// Decodes a `core_conf` property into a mode and the core it addresses.
///
/// Lock-step mode leaves only core 0 independently addressable, so the
/// property carries both pieces of information at once.
pub fn parse_core_conf(prop: &str) -> Result<(RpuMode, u32), ConfigError> {
    match prop {
        "split0" => Ok((RpuMode::Split, 0)),
        "split1" => Ok((RpuMode::Split, 1)),
        "lock-step" => Ok((RpuMode::LockStep, 0)),
        _ => Err(ConfigError::InvalidCoreConf),
    }
}

impl FromStr for ControlMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "direct" => Ok(ControlMethod::Direct),
            "smc" => Ok(ControlMethod::Smc),
            "hvc" => Ok(ControlMethod::Hvc),
            _ => Err(ConfigError::InvalidMethod),
        }
    }
}

impl ControlMethod {
    /// Decodes an optional `method` property, defaulting to SMC.
    pub fn from_property(prop: Option<&str>) -> Result<Self, ConfigError> {
        let prop = prop.unwrap_or_else(|| {
            warn!("default method used: smc");
            "smc"
        });
        info!("IPI/RPU control method: {prop}");
        prop.parse()
    }
}

impl FromStr for RpuBootMem {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "tcm" => Ok(RpuBootMem::Tcm),
            "ocm" => Ok(RpuBootMem::Ocm),
            _ => Err(ConfigError::InvalidBootMem),
        }
    }
}

/// Validated configuration for one RPU instance.
#[derive(Debug, Clone)]
pub struct RprocConfig {
    /// Core identifier, 0 or 1. Selects register offsets and the reset bit.
    pub rpu_id: u32,
    /// Core pair configuration.
    pub mode: RpuMode,
    /// Boot memory for the reset vector.
    pub bootmem: RpuBootMem,
    /// Destination mask identifying this core on the IPI fabric.
    pub ipi_dest_mask: u32,
}

impl RprocConfig {
    /// Builds a configuration, rejecting out-of-range or contradictory
    /// core identifiers.
    pub fn new(
        rpu_id: u32,
        mode: RpuMode,
        bootmem: RpuBootMem,
        ipi_dest_mask: u32,
    ) -> Result<Self, ConfigError> {
        if rpu_id as usize >= MAX_INSTANCES {
            return Err(ConfigError::InvalidRpuId);
        }
        if mode == RpuMode::LockStep && rpu_id != 0 {
            return Err(ConfigError::InvalidRpuId);
        }
        Ok(Self {
            rpu_id,
            mode,
            bootmem,
            ipi_dest_mask,
        })
    }

    /// Builds a configuration from raw property strings, applying the
    /// defaults the device tree may omit.
    pub fn from_properties(
        core_conf: Option<&str>,
        bootmem: Option<&str>,
        ipi_dest_mask: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let core_conf = core_conf.unwrap_or_else(|| {
            warn!("default core_conf used: lock-step");
            "lock-step"
        });
        info!("RPU core_conf: {core_conf}");
        let (mode, rpu_id) = parse_core_conf(core_conf)?;

        let bootmem = bootmem.unwrap_or_else(|| {
            warn!("default bootmem property used: tcm");
            "tcm"
        });
        info!("RPU bootmem: {bootmem}");
        let bootmem = bootmem.parse()?;

        let ipi_dest_mask = ipi_dest_mask.unwrap_or_else(|| {
            warn!("default ipi_dest_mask used: {DEFAULT_IPI_DEST_MASK:#x}");
            DEFAULT_IPI_DEST_MASK
        });
        info!("ipi_dest_mask: {ipi_dest_mask:#x}");

        Self::new(rpu_id, mode, bootmem, ipi_dest_mask)
    }
}
