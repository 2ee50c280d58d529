// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trellis-core
//!
//! Core types for the Trellis OPC UA server address space.
//!
//! This crate provides the foundational, I/O-free vocabulary shared by every
//! Trellis component:
//!
//! - **Identifiers**: `NodeId`, `ExpandedNodeId`, `QualifiedName`, `LocalizedText`
//! - **Values**: the `Variant` tagged union over the OPC UA built-in types and
//!   the timestamped `DataValue` wrapper
//! - **Status**: the `StatusCode` enumeration aligned with the OPC UA code space
//! - **Attributes**: `NodeClass`, `AttributeId`, and the per-class attribute
//!   bundles consumed by the node-management services
//!
//! ## Example
//!
//! ```rust
//! use trellis_core::ids::{NodeId, QualifiedName};
//! use trellis_core::variant::Variant;
//!
//! let id = NodeId::string(1, "the.answer");
//! assert_eq!(id.to_string(), "ns=1;s=the.answer");
//!
//! let name = QualifiedName::new(1, "the answer");
//! let value = Variant::Int32(42);
//! assert_eq!(value.as_i64(), Some(42));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod attributes;
pub mod ids;
pub mod status;
pub mod variant;

pub use attributes::{
    AttributeId, DataTypeAttributes, MethodAttributes, NodeAttributes, NodeClass,
    ObjectAttributes, ObjectTypeAttributes, ReferenceTypeAttributes, VariableAttributes,
    VariableTypeAttributes, ViewAttributes,
};
pub use ids::{ExpandedNodeId, Identifier, LocalizedText, NodeId, QualifiedName};
pub use status::{ServiceResult, StatusCode};
pub use variant::{DataValue, Variant};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
