// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Interface to the shared-memory message transport fed by the IPI channel.

/// Outcome of one queue drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainResult {
    /// At least one message was consumed.
    Drained,
    /// The queue held no pending message.
    Empty,
}

/// Message-transport collaborator notified when a virtqueue may hold data.
pub trait TransportOps: Send + Sync {
    /// Checks and drains virtqueue `vqid`, reporting whether anything was
    /// found. Runs in blocking-capable context.
    fn notify_queue_readable(&self, vqid: u32) -> DrainResult;
}
