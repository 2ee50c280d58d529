// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trellis-net
//!
//! The framed TCP service layer of the Trellis OPC UA server.
//!
//! The address-space core never performs I/O; this crate is the collaborator
//! that delivers requests to it and transmits responses. The wire surface is
//! deliberately small:
//!
//! - **Messages**: tagged [`message::Request`]/[`message::Response`] records
//!   covering the node-management, browse, read, and write services
//! - **Codec**: 4-byte big-endian length prefix + JSON body, with an
//!   enforced maximum frame size
//! - **Session**: one task per connection running a sequential
//!   read-dispatch-respond loop, which gives per-session ordering for free
//! - **Listener**: a tokio accept loop with a session cap and graceful
//!   shutdown
//!
//! The layer only calls the public `Server` service methods; node internals
//! stay private to the core.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod listener;
pub mod message;
pub mod session;

pub use codec::FrameCodec;
pub use config::NetConfig;
pub use error::{NetError, NetResult};
pub use listener::NetServer;
pub use message::{Request, Response};
pub use session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
