// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The request/response vocabulary of the service layer.
//!
//! Each request is a tagged record carrying the arguments of one core
//! service call; each response carries either the success payload or the
//! [`StatusCode`] the core reported. The records are what crosses the frame
//! codec; nothing else does.

use serde::{Deserialize, Serialize};

use trellis_core::attributes::{AttributeId, NodeAttributes};
use trellis_core::ids::{ExpandedNodeId, NodeId, QualifiedName};
use trellis_core::status::StatusCode;
use trellis_core::variant::{DataValue, Variant};
use trellis_space::browse::{BrowseDescription, BrowseResult};

// =============================================================================
// Request
// =============================================================================

/// A service request delivered by the network layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum Request {
    /// Add a node to the address space.
    AddNode {
        /// Requested identifier; `NULL` asks the server to assign one.
        #[serde(default)]
        requested_id: NodeId,
        /// Parent node.
        parent: NodeId,
        /// Reference type linking the parent to the new node.
        reference_type: NodeId,
        /// Browse name of the new node.
        browse_name: QualifiedName,
        /// Type definition for objects and variables.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        type_definition: Option<NodeId>,
        /// Attributes of the new node; the variant fixes the node class.
        attributes: NodeAttributes,
    },

    /// Add a reference between two nodes.
    AddReference {
        /// Source node.
        source: NodeId,
        /// Reference type.
        reference_type: NodeId,
        /// Target node.
        target: ExpandedNodeId,
        /// Direction as seen from the source.
        is_forward: bool,
    },

    /// Delete a node.
    DeleteNode {
        /// The node to delete.
        node_id: NodeId,
        /// Also remove references held by other nodes targeting it.
        #[serde(default)]
        delete_target_references: bool,
    },

    /// Delete a reference.
    DeleteReference {
        /// Source node.
        source: NodeId,
        /// Reference type.
        reference_type: NodeId,
        /// Target node.
        target: ExpandedNodeId,
        /// Direction as seen from the source.
        is_forward: bool,
        /// Also remove the counterpart at the target.
        #[serde(default)]
        delete_bidirectional: bool,
    },

    /// Browse the references of a node.
    Browse {
        /// Result size bound; 0 means unbounded.
        #[serde(default)]
        max_references: u32,
        /// What to browse.
        description: BrowseDescription,
    },

    /// Read one attribute of a node.
    Read {
        /// The node to read from.
        node_id: NodeId,
        /// The attribute to read.
        attribute: AttributeId,
    },

    /// Write the Value attribute of a variable.
    Write {
        /// The variable to write.
        node_id: NodeId,
        /// The new value.
        value: Variant,
    },

    /// Liveness probe.
    Ping,
}

impl Request {
    /// Returns the service name, for logging.
    pub const fn service_name(&self) -> &'static str {
        match self {
            Request::AddNode { .. } => "add_node",
            Request::AddReference { .. } => "add_reference",
            Request::DeleteNode { .. } => "delete_node",
            Request::DeleteReference { .. } => "delete_reference",
            Request::Browse { .. } => "browse",
            Request::Read { .. } => "read",
            Request::Write { .. } => "write",
            Request::Ping => "ping",
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// A service response returned to the network layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum Response {
    /// Outcome of an AddNode request.
    AddNode {
        /// Status of the call.
        status: StatusCode,
        /// The assigned identifier on success.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        node_id: Option<NodeId>,
    },

    /// Outcome of an AddReference request.
    AddReference {
        /// Status of the call.
        status: StatusCode,
    },

    /// Outcome of a DeleteNode request.
    DeleteNode {
        /// Status of the call.
        status: StatusCode,
    },

    /// Outcome of a DeleteReference request.
    DeleteReference {
        /// Status of the call.
        status: StatusCode,
    },

    /// Outcome of a Browse request.
    Browse {
        /// The browse result, including its own status code.
        result: BrowseResult,
    },

    /// Outcome of a Read request.
    Read {
        /// Status of the call.
        status: StatusCode,
        /// The value on success.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        value: Option<DataValue>,
    },

    /// Outcome of a Write request.
    Write {
        /// Status of the call.
        status: StatusCode,
    },

    /// Answer to a Ping.
    Pong,

    /// The request could not be understood at all.
    Error {
        /// Status of the call.
        status: StatusCode,
    },
}

impl Response {
    /// Returns the status the response carries.
    pub fn status(&self) -> StatusCode {
        match self {
            Response::AddNode { status, .. } => *status,
            Response::AddReference { status } => *status,
            Response::DeleteNode { status } => *status,
            Response::DeleteReference { status } => *status,
            Response::Browse { result } => result.status_code,
            Response::Read { status, .. } => *status,
            Response::Write { status } => *status,
            Response::Pong => StatusCode::Good,
            Response::Error { status } => *status,
        }
    }

    /// Returns `true` if the response reports success.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status().is_good()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::attributes::VariableAttributes;

    #[test]
    fn test_request_serde_roundtrip() {
        let request = Request::AddNode {
            requested_id: NodeId::string(1, "the.answer"),
            parent: NodeId::numeric(0, 85),
            reference_type: NodeId::numeric(0, 35),
            browse_name: QualifiedName::new(1, "the answer"),
            type_definition: None,
            attributes: NodeAttributes::Variable(
                VariableAttributes::default().with_value(Variant::Int32(42)),
            ),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(request, back);
        assert_eq!(request.service_name(), "add_node");
    }

    #[test]
    fn test_response_status() {
        let response = Response::AddNode {
            status: StatusCode::Good,
            node_id: Some(NodeId::numeric(1, 50_000)),
        };
        assert!(response.is_good());

        let response = Response::Write {
            status: StatusCode::BadNotWritable,
        };
        assert!(!response.is_good());
        assert_eq!(response.status(), StatusCode::BadNotWritable);
    }

    #[test]
    fn test_ping_is_tiny_on_the_wire() {
        let json = serde_json::to_string(&Request::Ping).unwrap();
        assert_eq!(json, r#"{"service":"ping"}"#);
    }
}
