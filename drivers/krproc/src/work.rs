// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Deferred-work callback handed to the kernel work-dispatch layer.

use alloc::sync::Arc;

/// A callback scheduled from interrupt context and run later in a
/// blocking-capable context.
///
/// Cloning only bumps a reference count, so a pre-built callback can be
/// re-submitted from an interrupt handler without allocating.
#[derive(Clone)]
pub struct WorkFn(Arc<dyn Fn() + Send + Sync>);

impl WorkFn {
    /// Creates a new callback from the given function.
    pub fn new<F: Fn() + Send + Sync + 'static>(f: F) -> Self {
        Self(Arc::new(f))
    }

    /// Runs the callback.
    pub fn call(&self) {
        (self.0)()
    }
}

impl<F: Fn() + Send + Sync + 'static> From<F> for WorkFn {
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Work-dispatch collaborator that runs callbacks outside interrupt context.
pub trait WorkqueueOps: Send + Sync {
    /// Queues `work` to run later in a blocking-capable context.
    ///
    /// Returns `false` when the work could not be queued; the caller decides
    /// how to report that.
    fn schedule(&self, work: WorkFn) -> bool;
}
