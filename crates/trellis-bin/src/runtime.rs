// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Runtime wiring: address space, service layer, shutdown.

use std::sync::Arc;

use tracing::{error, info};

use trellis_net::NetServer;
use trellis_space::Server;

use crate::config::Settings;
use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// Run
// =============================================================================

/// Builds the server and serves until a shutdown signal arrives.
pub async fn run(settings: Settings) -> BinResult<()> {
    let server = Arc::new(Server::with_application_uri(&settings.application_uri));
    info!(
        application_uri = %settings.application_uri,
        nodes = server.node_count(),
        "address space bootstrapped"
    );

    let net = NetServer::bind(settings.net.clone(), server).await?;
    let coordinator = ShutdownCoordinator::new();
    let shutdown_rx = coordinator.subscribe();

    let mut serve_task = tokio::spawn(async move { net.serve(shutdown_rx).await });

    tokio::select! {
        _ = coordinator.wait_for_signal() => {
            // The accept loop observes the same notification; wait for it to
            // wind down.
            match (&mut serve_task).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => error!(%error, "service layer failed during shutdown"),
                Err(join_error) => error!(%join_error, "serve task panicked"),
            }
        }
        result = &mut serve_task => {
            coordinator.initiate();
            match result {
                Ok(Ok(())) => {}
                Ok(Err(error)) => return Err(error.into()),
                Err(join_error) => {
                    return Err(BinError::runtime(format!("serve task panicked: {}", join_error)))
                }
            }
        }
    }

    info!("server stopped");
    Ok(())
}

// =============================================================================
// Validate
// =============================================================================

/// Loads and validates the configuration, printing a short summary.
pub fn validate(settings: &Settings, show_config: bool) -> BinResult<()> {
    settings.validate()?;
    println!("configuration OK");
    println!("  application_uri: {}", settings.application_uri);
    println!("  bind_address:    {}", settings.net.bind_address);
    println!("  max_sessions:    {}", settings.net.max_sessions);
    if show_config {
        match serde_yaml::to_string(settings) {
            Ok(rendered) => println!("\n{}", rendered),
            Err(error) => println!("(could not render configuration: {})", error),
        }
    }
    Ok(())
}

/// Prints version information for all components.
pub fn print_version() {
    println!("trellisd {}", crate::VERSION);
    println!("  trellis-core  {}", trellis_core::VERSION);
    println!("  trellis-space {}", trellis_space::VERSION);
    println!("  trellis-net   {}", trellis_net::VERSION);
}
