// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Type hierarchy resolution.
//!
//! Inheritance of type members is not modeled as language-level inheritance;
//! it is resolved dynamically by walking `HasSubtype` edges. This module
//! provides the three resolver operations the services build on:
//!
//! - [`AddressSpace::is_subtype_of`]: reflexive, transitive subtype test
//! - [`AddressSpace::type_definition`]: the unique `HasTypeDefinition` target
//!   of an instance
//! - [`AddressSpace::type_children`]: the aggregated members of a type,
//!   accumulated along the subtype chain with most-derived-wins semantics on
//!   BrowseName collisions

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::status::{ServiceResult, StatusCode};

use crate::ns0;
use crate::space::AddressSpace;

// =============================================================================
// ModellingRule
// =============================================================================

/// Modelling rule of a type member.
///
/// Read from the member's outgoing `HasModellingRule` reference. The rule
/// decides whether the member must (`Mandatory`) or may (`Optional`) appear
/// on instances; the placeholder variants mark members that stand in for
/// client-defined sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModellingRule {
    /// The member must appear on every instance.
    Mandatory,
    /// The member may appear on instances.
    Optional,
    /// Placeholder for a mandatory set of instance-defined members.
    MandatoryPlaceholder,
    /// Placeholder for an optional set of instance-defined members.
    OptionalPlaceholder,
}

impl ModellingRule {
    /// Returns the namespace-0 node representing this rule.
    pub const fn node_id(&self) -> NodeId {
        match self {
            ModellingRule::Mandatory => ns0::MODELLING_RULE_MANDATORY,
            ModellingRule::Optional => ns0::MODELLING_RULE_OPTIONAL,
            ModellingRule::MandatoryPlaceholder => ns0::MODELLING_RULE_MANDATORY_PLACEHOLDER,
            ModellingRule::OptionalPlaceholder => ns0::MODELLING_RULE_OPTIONAL_PLACEHOLDER,
        }
    }

    /// Maps a namespace-0 node back to the rule it represents.
    pub fn from_node_id(id: &NodeId) -> Option<Self> {
        match id.as_numeric() {
            Some(78) if id.namespace == 0 => Some(ModellingRule::Mandatory),
            Some(80) if id.namespace == 0 => Some(ModellingRule::Optional),
            Some(11_510) if id.namespace == 0 => Some(ModellingRule::MandatoryPlaceholder),
            Some(11_508) if id.namespace == 0 => Some(ModellingRule::OptionalPlaceholder),
            _ => None,
        }
    }
}

// =============================================================================
// TypeMember
// =============================================================================

/// A member of a type, as seen by the instantiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    /// The template node defining the member.
    pub node_id: NodeId,
    /// Browse name of the member.
    pub browse_name: QualifiedName,
    /// The aggregation reference linking the type to the member.
    pub reference_type: NodeId,
    /// The member's modelling rule, if it carries one.
    pub modelling_rule: Option<ModellingRule>,
}

// =============================================================================
// Resolver operations
// =============================================================================

impl AddressSpace {
    /// Returns `true` iff `sub` is `sup` or a transitive subtype of it.
    ///
    /// Implemented as a breadth-first walk over forward `HasSubtype`
    /// references starting at `sup`. The walk keeps a visited set, so it
    /// terminates even on graphs that violate the no-cycle invariant.
    pub fn is_subtype_of(&self, sub: &NodeId, sup: &NodeId) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(sup.clone());
        visited.insert(sup.clone());

        while let Some(current) = queue.pop_front() {
            let Ok(node) = self.store.get(&current) else {
                continue;
            };
            for reference in node.forward_references() {
                if reference.reference_type != ns0::HAS_SUBTYPE {
                    continue;
                }
                let Some(target) = reference.target.as_local() else {
                    continue;
                };
                if target == sub {
                    return true;
                }
                if visited.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
        }
        false
    }

    /// Resolves the type definition of an instance node.
    ///
    /// Follows the unique forward `HasTypeDefinition` reference; untyped
    /// instances yield [`StatusCode::BadNotFound`].
    pub fn type_definition(&self, instance: &NodeId) -> ServiceResult<NodeId> {
        let node = self.store.get(instance)?;
        node.forward_references()
            .find(|r| r.reference_type == ns0::HAS_TYPE_DEFINITION)
            .and_then(|r| r.target.as_local().cloned())
            .ok_or(StatusCode::BadNotFound)
    }

    /// Returns the subtype chain of a type, most-derived first.
    ///
    /// The chain starts at `type_id` and follows inverse `HasSubtype`
    /// references toward the root of the type forest. A visited set bounds
    /// the walk on malformed graphs.
    pub fn subtype_chain(&self, type_id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut current = type_id.clone();

        loop {
            if !visited.insert(current.clone()) {
                break;
            }
            chain.push(current.clone());
            let Ok(node) = self.store.get(&current) else {
                break;
            };
            let supertype = node
                .references
                .iter()
                .find(|r| !r.is_forward && r.reference_type == ns0::HAS_SUBTYPE)
                .and_then(|r| r.target.as_local().cloned());
            match supertype {
                Some(parent) => current = parent,
                None => break,
            }
        }
        chain
    }

    /// Reads the modelling rule attached to a node, if any.
    pub fn modelling_rule_of(&self, id: &NodeId) -> Option<ModellingRule> {
        let node = self.store.get(id).ok()?;
        node.forward_references()
            .find(|r| r.reference_type == ns0::HAS_MODELLING_RULE)
            .and_then(|r| r.target.as_local())
            .and_then(ModellingRule::from_node_id)
    }

    /// Enumerates the aggregated members of a type.
    ///
    /// Members are the targets of forward references whose type is a subtype
    /// of `Aggregates` (`HasComponent`, `HasProperty`, ...), accumulated
    /// along the whole subtype chain. If the same BrowseName occurs at
    /// multiple levels, the most-derived definition wins and ancestor entries
    /// are suppressed. `filter` restricts the result to members carrying the
    /// given modelling rule.
    pub fn type_children(
        &self,
        type_id: &NodeId,
        filter: Option<ModellingRule>,
    ) -> Vec<TypeMember> {
        let mut members: Vec<TypeMember> = Vec::new();
        let mut seen: HashSet<QualifiedName> = HashSet::new();

        for level in self.subtype_chain(type_id) {
            let Ok(node) = self.store.get(&level) else {
                continue;
            };
            for reference in node.forward_references() {
                if !self.is_subtype_of(&reference.reference_type, &ns0::AGGREGATES) {
                    continue;
                }
                let Some(target) = reference.target.as_local() else {
                    continue;
                };
                let Ok(child) = self.store.get(target) else {
                    continue;
                };
                if !seen.insert(child.browse_name.clone()) {
                    // A more derived level already defined this member.
                    continue;
                }
                members.push(TypeMember {
                    node_id: target.clone(),
                    browse_name: child.browse_name.clone(),
                    reference_type: reference.reference_type.clone(),
                    modelling_rule: self.modelling_rule_of(target),
                });
            }
        }

        match filter {
            Some(rule) => members
                .into_iter()
                .filter(|m| m.modelling_rule == Some(rule))
                .collect(),
            None => members,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
