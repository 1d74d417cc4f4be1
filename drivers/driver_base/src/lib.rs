// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Common interfaces for all kinds of device drivers.

#![no_std]

/// Categories of devices a driver can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Block storage device.
    Block,
    /// Network interface device.
    Net,
    /// Graphics display device.
    Display,
    /// Input device (keyboard, mouse, ...).
    Input,
    /// Virtio socket device.
    Vsock,
    /// Auxiliary remote processor core.
    RemoteProc,
}

/// Errors shared by all driver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The entity already exists.
    AlreadyExists,
    /// The device is in a state that forbids the operation.
    BadState,
    /// A parameter was outside the accepted range.
    InvalidInput,
    /// A hardware or transfer error occurred.
    Io,
    /// Memory for the operation could not be allocated.
    NoMemory,
    /// The underlying resource is held by someone else.
    ResourceBusy,
    /// The operation is not supported by this driver.
    Unsupported,
    /// The operation would block; retry later.
    WouldBlock,
}

/// Convenience result type used throughout the driver crates.
pub type DriverResult<T = ()> = Result<T, DriverError>;

/// Operations common to every device driver.
pub trait DriverOps: Send + Sync {
    /// The category this device belongs to.
    fn device_kind(&self) -> DeviceKind;

    /// The name of the device driver.
    fn name(&self) -> &str;
}
