// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Graceful shutdown coordination.
//!
//! Handles OS signals (SIGTERM, SIGINT on Unix; Ctrl+C elsewhere) and fans
//! the notification out to every component that subscribed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

// =============================================================================
// ShutdownCoordinator
// =============================================================================

/// Fans a single shutdown decision out to all subscribers.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    sender: broadcast::Sender<()>,
    initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Creates a coordinator.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribes to the shutdown notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Initiates shutdown. Idempotent.
    pub fn initiate(&self) {
        if self
            .initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("shutdown initiated");
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` once shutdown has been initiated.
    pub fn is_initiated(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    /// Waits for an OS signal and initiates shutdown when one arrives.
    ///
    /// Returns immediately if shutdown was already initiated.
    pub async fn wait_for_signal(&self) {
        if self.is_initiated() {
            return;
        }

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM"),
                _ = sigint.recv() => info!("received SIGINT"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to register Ctrl+C handler");
            info!("received Ctrl+C");
        }

        self.initiate();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let coordinator = ShutdownCoordinator::new();
        let mut first = coordinator.subscribe();
        let mut second = coordinator.subscribe();

        assert!(!coordinator.is_initiated());
        coordinator.initiate();

        assert!(coordinator.is_initiated());
        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_initiate_is_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate();
        coordinator.initiate();
        assert!(coordinator.is_initiated());
    }

    #[tokio::test]
    async fn test_wait_returns_once_initiated() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate();
        // Must not hang on signal registration.
        tokio::time::timeout(std::time::Duration::from_secs(1), coordinator.wait_for_signal())
            .await
            .expect("wait should return immediately");
    }
}
