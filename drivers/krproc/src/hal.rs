// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Platform services borrowed from the surrounding kernel.

use core::time::Duration;

/// Delay and cache-maintenance hooks the controller needs from the platform.
///
/// `busy_wait` must block the calling thread until at least `dur` of real
/// time has elapsed; the boot sequence depends on wall-clock settling, not
/// on scheduler progress. Neither hook is called from interrupt context.
pub trait HalOps: Send + Sync {
    /// Busy-waits for at least `dur`.
    fn busy_wait(&self, dur: Duration);

    /// Makes shared-memory writes visible to the remote core.
    fn flush_dcache(&self);
}
