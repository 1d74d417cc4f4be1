//! Unit tests for property-string configuration decoding

#![cfg(test)]


use krproc::config::{
    ConfigError, ControlMethod, DEFAULT_IPI_DEST_MASK, RprocConfig, RpuBootMem, RpuMode,
    parse_core_conf,
};
use test_helpers::init_logging;

// ========== Property String Tests ==========

#[test]
fn test_parse_core_conf_strings() {
    assert_eq!(parse_core_conf("split0"), Ok((RpuMode::Split, 0)));
    assert_eq!(parse_core_conf("split1"), Ok((RpuMode::Split, 1)));
    assert_eq!(parse_core_conf("lock-step"), Ok((RpuMode::LockStep, 0)));
    assert_eq!(parse_core_conf("split2"), Err(ConfigError::InvalidCoreConf));
    assert_eq!(parse_core_conf(""), Err(ConfigError::InvalidCoreConf));
}

#[test]
fn test_parse_method_strings() {
    assert_eq!("direct".parse(), Ok(ControlMethod::Direct));
    assert_eq!("smc".parse(), Ok(ControlMethod::Smc));
    assert_eq!("hvc".parse(), Ok(ControlMethod::Hvc));
    assert_eq!(
        "psci".parse::<ControlMethod>(),
        Err(ConfigError::InvalidMethod)
    );
}

#[test]
fn test_method_property_defaults_to_smc() {
    init_logging();
    assert_eq!(ControlMethod::from_property(None), Ok(ControlMethod::Smc));
    assert_eq!(
        ControlMethod::from_property(Some("direct")),
        Ok(ControlMethod::Direct)
    );
}

#[test]
fn test_parse_bootmem_strings() {
    assert_eq!("tcm".parse(), Ok(RpuBootMem::Tcm));
    assert_eq!("ocm".parse(), Ok(RpuBootMem::Ocm));
    assert_eq!(
        "ddr".parse::<RpuBootMem>(),
        Err(ConfigError::InvalidBootMem)
    );
}

// ========== Configuration Validation Tests ==========

#[test]
fn test_config_rejects_out_of_range_core() {
    assert_eq!(
        RprocConfig::new(2, RpuMode::Split, RpuBootMem::Tcm, 0x100).unwrap_err(),
        ConfigError::InvalidRpuId
    );
}

#[test]
fn test_config_rejects_lockstep_core1() {
    // Only core 0 is independently addressable in lock-step mode.
    assert_eq!(
        RprocConfig::new(1, RpuMode::LockStep, RpuBootMem::Tcm, 0x100).unwrap_err(),
        ConfigError::InvalidRpuId
    );
}

#[test]
fn test_from_properties_applies_defaults() {
    init_logging();
    let cfg = RprocConfig::from_properties(None, None, None).unwrap();
    assert_eq!(cfg.rpu_id, 0);
    assert_eq!(cfg.mode, RpuMode::LockStep);
    assert_eq!(cfg.bootmem, RpuBootMem::Tcm);
    assert_eq!(cfg.ipi_dest_mask, DEFAULT_IPI_DEST_MASK);
}

#[test]
fn test_from_properties_decodes_explicit_values() {
    init_logging();
    let cfg = RprocConfig::from_properties(Some("split1"), Some("ocm"), Some(0x200)).unwrap();
    assert_eq!(cfg.rpu_id, 1);
    assert_eq!(cfg.mode, RpuMode::Split);
    assert_eq!(cfg.bootmem, RpuBootMem::Ocm);
    assert_eq!(cfg.ipi_dest_mask, 0x200);
}

#[test]
fn test_from_properties_rejects_unknown_strings() {
    init_logging();
    assert_eq!(
        RprocConfig::from_properties(Some("dual"), None, None).unwrap_err(),
        ConfigError::InvalidCoreConf
    );
    assert_eq!(
        RprocConfig::from_properties(None, Some("flash"), None).unwrap_err(),
        ConfigError::InvalidBootMem
    );
}
