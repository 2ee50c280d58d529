// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Browse semantics over the reference graph.
//!
//! A browse call enumerates the references of one node, filtered by
//! direction, reference type (with optional subtype expansion), and node
//! class. The result mask selects which fields of each
//! [`ReferenceDescription`] are filled in; unselected fields keep their
//! neutral defaults so the records stay fixed-shape on the wire.

use serde::{Deserialize, Serialize};

use trellis_core::attributes::NodeClass;
use trellis_core::ids::{ExpandedNodeId, LocalizedText, NodeId, QualifiedName};
use trellis_core::status::StatusCode;

use crate::node::NodeBody;
use crate::space::AddressSpace;

// =============================================================================
// BrowseDirection
// =============================================================================

/// Direction filter for a browse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrowseDirection {
    /// Follow forward references only.
    #[default]
    Forward,
    /// Follow inverse references only.
    Inverse,
    /// Follow references in both directions.
    Both,
}

impl BrowseDirection {
    /// Returns `true` if a reference with the given direction flag matches.
    #[inline]
    pub const fn matches(&self, is_forward: bool) -> bool {
        match self {
            BrowseDirection::Forward => is_forward,
            BrowseDirection::Inverse => !is_forward,
            BrowseDirection::Both => true,
        }
    }
}

// =============================================================================
// Result mask
// =============================================================================

/// Bit constants selecting the fields of a [`ReferenceDescription`].
pub mod result_mask {
    /// Include the reference type id.
    pub const REFERENCE_TYPE: u32 = 0x01;
    /// Include the direction flag.
    pub const IS_FORWARD: u32 = 0x02;
    /// Include the target node class.
    pub const NODE_CLASS: u32 = 0x04;
    /// Include the target browse name.
    pub const BROWSE_NAME: u32 = 0x08;
    /// Include the target display name.
    pub const DISPLAY_NAME: u32 = 0x10;
    /// Include the target type definition.
    pub const TYPE_DEFINITION: u32 = 0x20;
    /// All fields.
    pub const ALL: u32 = 0x3F;
}

// =============================================================================
// BrowseDescription
// =============================================================================

/// Arguments of a browse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseDescription {
    /// The node whose references are enumerated.
    pub node_id: NodeId,

    /// Reference type filter; `NULL` accepts every reference type.
    #[serde(default)]
    pub reference_type_id: NodeId,

    /// Expand the filter to transitive subtypes of the reference type.
    #[serde(default = "default_true")]
    pub include_subtypes: bool,

    /// Direction filter.
    #[serde(default)]
    pub browse_direction: BrowseDirection,

    /// Node class bit mask; 0 accepts every class.
    #[serde(default)]
    pub node_class_mask: u32,

    /// Field selection for the result records.
    #[serde(default = "default_result_mask")]
    pub result_mask: u32,
}

fn default_true() -> bool {
    true
}

fn default_result_mask() -> u32 {
    result_mask::ALL
}

impl BrowseDescription {
    /// Creates a description browsing every forward reference of a node.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            reference_type_id: NodeId::NULL,
            include_subtypes: true,
            browse_direction: BrowseDirection::Forward,
            node_class_mask: 0,
            result_mask: result_mask::ALL,
        }
    }

    /// Restricts the browse to one reference type (and its subtypes).
    pub fn with_reference_type(mut self, reference_type_id: NodeId) -> Self {
        self.reference_type_id = reference_type_id;
        self
    }

    /// Sets the direction filter.
    pub fn with_direction(mut self, direction: BrowseDirection) -> Self {
        self.browse_direction = direction;
        self
    }

    /// Sets the node class mask.
    pub fn with_node_class_mask(mut self, mask: u32) -> Self {
        self.node_class_mask = mask;
        self
    }

    /// Sets the result mask.
    pub fn with_result_mask(mut self, mask: u32) -> Self {
        self.result_mask = mask;
        self
    }
}

// =============================================================================
// ReferenceDescription
// =============================================================================

/// One reference of the browsed node.
///
/// Fields not selected by the result mask keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    /// Type of the reference.
    #[serde(default)]
    pub reference_type_id: NodeId,
    /// Direction of the reference as seen from the browsed node.
    #[serde(default)]
    pub is_forward: bool,
    /// The target node.
    pub node_id: ExpandedNodeId,
    /// Browse name of the target.
    #[serde(default)]
    pub browse_name: QualifiedName,
    /// Display name of the target.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Class of the target, when known and selected.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub node_class: Option<NodeClass>,
    /// Type definition of the target, for object and variable targets.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_definition: Option<ExpandedNodeId>,
}

// =============================================================================
// BrowseResult
// =============================================================================

/// Result of a browse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseResult {
    /// Outcome of the call; the reference list is meaningful only on `Good`.
    pub status_code: StatusCode,
    /// The matching references.
    pub references: Vec<ReferenceDescription>,
}

impl BrowseResult {
    /// Creates a failed result with no references.
    pub fn error(status_code: StatusCode) -> Self {
        Self {
            status_code,
            references: Vec::new(),
        }
    }

    /// Returns `true` if the call succeeded.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status_code.is_good()
    }

    /// Counts references pointing at the given node.
    pub fn references_to(&self, target: &NodeId) -> usize {
        self.references
            .iter()
            .filter(|r| r.node_id.as_local() == Some(target))
            .count()
    }
}

// =============================================================================
// Browse operation
// =============================================================================

impl AddressSpace {
    /// Enumerates the references of one node.
    ///
    /// `max_references` bounds the result size; 0 means unbounded. Errors
    /// are reported in the result's status code, mirroring the wire-level
    /// browse service.
    pub fn browse(&self, max_references: u32, description: &BrowseDescription) -> BrowseResult {
        let Ok(node) = self.store.get(&description.node_id) else {
            return BrowseResult::error(StatusCode::BadNodeIdUnknown);
        };

        let filter_type = if description.reference_type_id.is_null() {
            None
        } else {
            match self.store.get(&description.reference_type_id) {
                Ok(type_node) if type_node.node_class() == NodeClass::ReferenceType => {
                    Some(&description.reference_type_id)
                }
                _ => return BrowseResult::error(StatusCode::BadReferenceTypeIdInvalid),
            }
        };

        let mut references = Vec::new();
        for reference in &node.references {
            if !description.browse_direction.matches(reference.is_forward) {
                continue;
            }
            if let Some(filter) = filter_type {
                let matches = if description.include_subtypes {
                    self.is_subtype_of(&reference.reference_type, filter)
                } else {
                    reference.reference_type == *filter
                };
                if !matches {
                    continue;
                }
            }

            let target_node = reference
                .target
                .as_local()
                .and_then(|id| self.store.get(id).ok());

            if let Some(target) = target_node {
                if !target.node_class().matches_mask(description.node_class_mask) {
                    continue;
                }
            }

            let mask = description.result_mask;
            let mut record = ReferenceDescription {
                reference_type_id: NodeId::NULL,
                is_forward: false,
                node_id: reference.target.clone(),
                browse_name: QualifiedName::default(),
                display_name: LocalizedText::default(),
                node_class: None,
                type_definition: None,
            };
            if mask & result_mask::REFERENCE_TYPE != 0 {
                record.reference_type_id = reference.reference_type.clone();
            }
            if mask & result_mask::IS_FORWARD != 0 {
                record.is_forward = reference.is_forward;
            }
            if let Some(target) = target_node {
                if mask & result_mask::NODE_CLASS != 0 {
                    record.node_class = Some(target.node_class());
                }
                if mask & result_mask::BROWSE_NAME != 0 {
                    record.browse_name = target.browse_name.clone();
                }
                if mask & result_mask::DISPLAY_NAME != 0 {
                    record.display_name = target.display_name.clone();
                }
                if mask & result_mask::TYPE_DEFINITION != 0
                    && matches!(target.body, NodeBody::Object(_) | NodeBody::Variable(_))
                {
                    record.type_definition = self
                        .type_definition(&target.id)
                        .ok()
                        .map(ExpandedNodeId::local);
                }
            }

            references.push(record);
            if max_references != 0 && references.len() as u32 >= max_references {
                break;
            }
        }

        BrowseResult {
            status_code: StatusCode::Good,
            references,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
