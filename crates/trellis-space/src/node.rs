// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node representation: common header, class-specific payload, references.
//!
//! A node is a tagged variant: every class shares the header (identifier,
//! browse name, display name, description, write masks, reference list) and
//! carries a class-specific payload. Service operations pattern-match on the
//! payload tag. Ownership is the store's; the reference graph only carries
//! `NodeId` pairs and never owns nodes.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use trellis_core::attributes::{NodeAttributes, NodeClass};
use trellis_core::ids::{ExpandedNodeId, LocalizedText, NodeId, QualifiedName};
use trellis_core::status::ServiceResult;
use trellis_core::variant::Variant;

// =============================================================================
// Reference
// =============================================================================

/// A typed, directed edge to another node.
///
/// Each logical reference is stored twice, once in each endpoint with
/// opposing `is_forward` flags. The pair is created and destroyed atomically
/// by the store-level operations; a half-installed pair is never observable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// The reference type; must name a `ReferenceType` node in the store.
    pub reference_type: NodeId,

    /// The other endpoint. Non-local targets get no inverse bookkeeping.
    pub target: ExpandedNodeId,

    /// Direction of this half of the pair.
    pub is_forward: bool,
}

impl Reference {
    /// Creates a reference.
    pub fn new(reference_type: NodeId, target: ExpandedNodeId, is_forward: bool) -> Self {
        Self {
            reference_type,
            target,
            is_forward,
        }
    }

    /// Returns `true` if this entry matches the given tuple.
    #[inline]
    pub fn matches(&self, reference_type: &NodeId, target: &ExpandedNodeId, is_forward: bool) -> bool {
        self.is_forward == is_forward
            && self.reference_type == *reference_type
            && self.target == *target
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.is_forward { "->" } else { "<-" };
        write!(f, "{} {} {}", self.reference_type, arrow, self.target)
    }
}

// =============================================================================
// Class payloads
// =============================================================================

/// Payload of an Object node.
#[derive(Debug, Clone, Default)]
pub struct ObjectNode {
    /// Event notifier bits.
    pub event_notifier: u8,
}

/// Payload of a Variable node.
#[derive(Debug, Clone)]
pub struct VariableNode {
    /// The current value.
    pub value: Variant,
    /// Data type of the value.
    pub data_type: NodeId,
    /// Value rank: −1 scalar, ≥0 array dimensionality.
    pub value_rank: i32,
    /// Length of each array dimension.
    pub array_dimensions: Vec<u32>,
    /// Access level bits.
    pub access_level: u8,
    /// Access level bits for the current user.
    pub user_access_level: u8,
    /// Fastest supported sampling interval in milliseconds.
    pub minimum_sampling_interval: f64,
    /// Whether value history is recorded.
    pub historizing: bool,
    /// When the current value was produced, if known.
    pub source_timestamp: Option<DateTime<Utc>>,
}

/// Payload of a Method node.
#[derive(Clone)]
pub struct MethodNode {
    /// Whether the method may be invoked.
    pub executable: bool,
    /// Whether the current user may invoke the method.
    pub user_executable: bool,
    /// Invocation handler, if one is attached.
    pub handler: Option<MethodHandler>,
}

impl fmt::Debug for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodNode")
            .field("executable", &self.executable)
            .field("user_executable", &self.user_executable)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// Invocation handler attached to a Method node.
///
/// Receives the object the method is invoked on, the method node id, and the
/// input arguments. Handlers must not call back into the server.
pub type MethodHandler =
    Arc<dyn Fn(&NodeId, &NodeId, &[Variant]) -> ServiceResult<Vec<Variant>> + Send + Sync>;

/// Payload of an ObjectType node.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeNode {
    /// Whether the type can be instantiated.
    pub is_abstract: bool,
}

/// Payload of a VariableType node.
#[derive(Debug, Clone)]
pub struct VariableTypeNode {
    /// Default value for instances.
    pub value: Variant,
    /// Data type of instance values.
    pub data_type: NodeId,
    /// Value rank: −1 scalar, ≥0 array dimensionality.
    pub value_rank: i32,
    /// Length of each array dimension.
    pub array_dimensions: Vec<u32>,
    /// Whether the type can be instantiated.
    pub is_abstract: bool,
}

/// Payload of a ReferenceType node.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTypeNode {
    /// Whether references of this type can exist.
    pub is_abstract: bool,
    /// Whether the reference reads the same in both directions.
    pub symmetric: bool,
    /// Name of the inverse direction.
    pub inverse_name: LocalizedText,
}

/// Payload of a DataType node.
#[derive(Debug, Clone, Default)]
pub struct DataTypeNode {
    /// Whether values of this type can exist.
    pub is_abstract: bool,
}

/// Payload of a View node.
#[derive(Debug, Clone, Default)]
pub struct ViewNode {
    /// Whether the view is loop-free.
    pub contains_no_loops: bool,
    /// Event notifier bits.
    pub event_notifier: u8,
}

/// The class-specific payload of a node.
#[derive(Debug, Clone)]
pub enum NodeBody {
    /// Object payload.
    Object(ObjectNode),
    /// Variable payload.
    Variable(VariableNode),
    /// Method payload.
    Method(MethodNode),
    /// ObjectType payload.
    ObjectType(ObjectTypeNode),
    /// VariableType payload.
    VariableType(VariableTypeNode),
    /// ReferenceType payload.
    ReferenceType(ReferenceTypeNode),
    /// DataType payload.
    DataType(DataTypeNode),
    /// View payload.
    View(ViewNode),
}

// =============================================================================
// Node
// =============================================================================

/// A node in the address space.
///
/// Every node has a common header and a class-specific payload. The header
/// includes the node's reference list; adjacency lives inside nodes, not in a
/// separate index.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node identifier; immutable once the node is inserted.
    pub id: NodeId,
    /// Browse name within the parent.
    pub browse_name: QualifiedName,
    /// Display name shown to clients.
    pub display_name: LocalizedText,
    /// Optional description.
    pub description: LocalizedText,
    /// Which attributes may be modified.
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    pub user_write_mask: u32,
    /// References held by this node, both halves of each pair.
    pub references: Vec<Reference>,
    /// Class-specific payload.
    pub body: NodeBody,
}

impl Node {
    /// Builds a node from an attribute bundle.
    ///
    /// The attribute bundle determines the node class. For variables with a
    /// `NULL` data type, the data type is derived from the initial value.
    pub fn from_attributes(
        id: NodeId,
        browse_name: QualifiedName,
        attributes: NodeAttributes,
    ) -> Self {
        let (display_name, description, write_mask, user_write_mask, body) = match attributes {
            NodeAttributes::Object(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::Object(ObjectNode {
                    event_notifier: a.event_notifier,
                }),
            ),
            NodeAttributes::Variable(a) => {
                let data_type = if a.data_type.is_null() {
                    a.value.data_type_id()
                } else {
                    a.data_type
                };
                (
                    a.display_name,
                    a.description,
                    a.write_mask,
                    a.user_write_mask,
                    NodeBody::Variable(VariableNode {
                        value: a.value,
                        data_type,
                        value_rank: a.value_rank,
                        array_dimensions: a.array_dimensions,
                        access_level: a.access_level,
                        user_access_level: a.user_access_level,
                        minimum_sampling_interval: a.minimum_sampling_interval,
                        historizing: a.historizing,
                        source_timestamp: None,
                    }),
                )
            }
            NodeAttributes::Method(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::Method(MethodNode {
                    executable: a.executable,
                    user_executable: a.user_executable,
                    handler: None,
                }),
            ),
            NodeAttributes::ObjectType(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::ObjectType(ObjectTypeNode {
                    is_abstract: a.is_abstract,
                }),
            ),
            NodeAttributes::VariableType(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::VariableType(VariableTypeNode {
                    value: a.value,
                    data_type: a.data_type,
                    value_rank: a.value_rank,
                    array_dimensions: a.array_dimensions,
                    is_abstract: a.is_abstract,
                }),
            ),
            NodeAttributes::ReferenceType(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::ReferenceType(ReferenceTypeNode {
                    is_abstract: a.is_abstract,
                    symmetric: a.symmetric,
                    inverse_name: a.inverse_name,
                }),
            ),
            NodeAttributes::DataType(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::DataType(DataTypeNode {
                    is_abstract: a.is_abstract,
                }),
            ),
            NodeAttributes::View(a) => (
                a.display_name,
                a.description,
                a.write_mask,
                a.user_write_mask,
                NodeBody::View(ViewNode {
                    contains_no_loops: a.contains_no_loops,
                    event_notifier: a.event_notifier,
                }),
            ),
        };

        Self {
            id,
            browse_name,
            display_name,
            description,
            write_mask,
            user_write_mask,
            references: Vec::new(),
            body,
        }
    }

    /// Returns the class of this node.
    pub const fn node_class(&self) -> NodeClass {
        match self.body {
            NodeBody::Object(_) => NodeClass::Object,
            NodeBody::Variable(_) => NodeClass::Variable,
            NodeBody::Method(_) => NodeClass::Method,
            NodeBody::ObjectType(_) => NodeClass::ObjectType,
            NodeBody::VariableType(_) => NodeClass::VariableType,
            NodeBody::ReferenceType(_) => NodeClass::ReferenceType,
            NodeBody::DataType(_) => NodeClass::DataType,
            NodeBody::View(_) => NodeClass::View,
        }
    }

    /// Returns the abstract flag for type nodes, `false` otherwise.
    pub const fn is_abstract(&self) -> bool {
        match &self.body {
            NodeBody::ObjectType(t) => t.is_abstract,
            NodeBody::VariableType(t) => t.is_abstract,
            NodeBody::ReferenceType(t) => t.is_abstract,
            NodeBody::DataType(t) => t.is_abstract,
            _ => false,
        }
    }

    /// Returns the variable payload, if this is a Variable node.
    pub fn as_variable(&self) -> Option<&VariableNode> {
        match &self.body {
            NodeBody::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the mutable variable payload, if this is a Variable node.
    pub fn as_variable_mut(&mut self) -> Option<&mut VariableNode> {
        match &mut self.body {
            NodeBody::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the method payload, if this is a Method node.
    pub fn as_method(&self) -> Option<&MethodNode> {
        match &self.body {
            NodeBody::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` if this node holds the given reference half.
    pub fn has_reference(
        &self,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
    ) -> bool {
        self.references
            .iter()
            .any(|r| r.matches(reference_type, target, is_forward))
    }

    /// Appends a reference half. The caller is responsible for the pair
    /// discipline and for duplicate checks.
    pub(crate) fn push_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    /// Removes a reference half; returns `true` if an entry was removed.
    pub(crate) fn remove_reference(
        &mut self,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
    ) -> bool {
        let before = self.references.len();
        self.references
            .retain(|r| !r.matches(reference_type, target, is_forward));
        self.references.len() != before
    }

    /// Iterates the forward references of this node.
    pub fn forward_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.is_forward)
    }

    /// Clones this node as an instance template copy.
    ///
    /// The copy gets the given identifier and an empty reference list; the
    /// header attributes and class payload (including variable values) are
    /// carried over. Modelling-rule references are not copied because no
    /// references are.
    pub(crate) fn instantiate_copy(&self, id: NodeId) -> Node {
        let mut copy = self.clone();
        copy.id = id;
        copy.references.clear();
        copy
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {} ({})",
            self.node_class(),
            self.display_name,
            self.id
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::attributes::{ObjectTypeAttributes, VariableAttributes};

    fn variable_node() -> Node {
        let attrs = VariableAttributes::default()
            .with_display_name("speed")
            .with_value(Variant::Double(12.5));
        Node::from_attributes(
            NodeId::string(1, "speed"),
            QualifiedName::new(1, "speed"),
            NodeAttributes::Variable(attrs),
        )
    }

    #[test]
    fn test_from_attributes_classes() {
        let node = variable_node();
        assert_eq!(node.node_class(), NodeClass::Variable);
        assert_eq!(node.as_variable().unwrap().value.as_f64(), Some(12.5));

        let node = Node::from_attributes(
            NodeId::numeric(1, 1),
            QualifiedName::new(1, "T"),
            NodeAttributes::ObjectType(ObjectTypeAttributes::default().abstract_type()),
        );
        assert_eq!(node.node_class(), NodeClass::ObjectType);
        assert!(node.is_abstract());
    }

    #[test]
    fn test_variable_data_type_derived_from_value() {
        let node = variable_node();
        // Double is i=11 in the standard namespace.
        assert_eq!(node.as_variable().unwrap().data_type, NodeId::numeric(0, 11));
    }

    #[test]
    fn test_reference_bookkeeping() {
        let mut node = variable_node();
        let target = ExpandedNodeId::numeric(0, 85);
        let reference_type = NodeId::numeric(0, 47);

        node.push_reference(Reference::new(reference_type.clone(), target.clone(), false));
        assert!(node.has_reference(&reference_type, &target, false));
        assert!(!node.has_reference(&reference_type, &target, true));

        assert!(node.remove_reference(&reference_type, &target, false));
        assert!(!node.has_reference(&reference_type, &target, false));
        assert!(!node.remove_reference(&reference_type, &target, false));
    }

    #[test]
    fn test_instantiate_copy_clears_references() {
        let mut node = variable_node();
        node.push_reference(Reference::new(
            NodeId::numeric(0, 37),
            ExpandedNodeId::numeric(0, 78),
            true,
        ));

        let copy = node.instantiate_copy(NodeId::numeric(1, 4711));
        assert_eq!(copy.id, NodeId::numeric(1, 4711));
        assert!(copy.references.is_empty());
        assert_eq!(copy.browse_name, node.browse_name);
        assert_eq!(copy.as_variable().unwrap().value.as_f64(), Some(12.5));
    }
}
