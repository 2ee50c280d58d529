// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trellis-space
//!
//! The address space core of the Trellis OPC UA server.
//!
//! The address space is a typed, referenced, multi-namespace graph: every
//! node is both data and metadata, references are typed edges whose types are
//! themselves nodes, and the type hierarchy drives browsing and
//! instantiation. This crate owns that graph and the rules that govern it:
//!
//! - **Node representation**: [`node::Node`] with a common header and a
//!   class-specific payload; adjacency lists live inside each node
//! - **Node store**: [`store::NodeStore`], the arena keyed by `NodeId`
//! - **Reference pairs**: bidirectional edges installed and removed
//!   atomically, with subtype-aware neighbor queries
//! - **Type hierarchy**: subtype resolution, type definitions, and member
//!   enumeration with most-derived-wins semantics
//! - **Instantiation**: materializing the mandatory sub-structure of a type
//!   with constructor invocation and full rollback on failure
//! - **Services**: AddNode, AddReference, DeleteNode, DeleteReference,
//!   Browse, Read, and Write with validation-first, transactional semantics
//! - **Namespace 0**: the standard bootstrap nodes every server starts with
//! - **Server**: the explicitly constructed value tying it all together
//!   behind a reader-writer capability
//!
//! ## Example
//!
//! ```rust
//! use trellis_core::attributes::VariableAttributes;
//! use trellis_core::ids::{NodeId, QualifiedName};
//! use trellis_core::variant::Variant;
//! use trellis_space::{ns0, Server};
//!
//! let server = Server::new();
//! let attributes = VariableAttributes::default()
//!     .with_display_name("the answer")
//!     .with_value(Variant::Int32(42));
//!
//! let id = server
//!     .add_variable_node(
//!         NodeId::string(1, "the.answer"),
//!         &ns0::OBJECTS_FOLDER,
//!         &ns0::ORGANIZES,
//!         QualifiedName::new(1, "the answer"),
//!         NodeId::NULL,
//!         attributes,
//!     )
//!     .unwrap();
//! assert_eq!(id, NodeId::string(1, "the.answer"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod browse;
pub mod hierarchy;
pub mod instantiate;
pub mod lifecycle;
pub mod node;
pub mod ns0;
pub mod server;
pub mod space;
pub mod store;

mod attr;
mod service;

pub use browse::{BrowseDescription, BrowseDirection, BrowseResult, ReferenceDescription};
pub use hierarchy::{ModellingRule, TypeMember};
pub use instantiate::InstantiationCallback;
pub use lifecycle::{Constructor, Destructor, LifecycleHandle, LifecycleRegistry, NodeLifecycle};
pub use node::{MethodHandler, Node, Reference};
pub use server::Server;
pub use space::{AddressSpace, NamespaceTable};
pub use store::NodeStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
