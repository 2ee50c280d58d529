// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Instantiation of objects and variables from their type definitions.
//!
//! Given a validated type definition and a target parent, the instantiator
//! materializes the instance together with the mandatory sub-structure of
//! the type: every `Mandatory` member along the subtype chain is copied into
//! a fresh node under the instance, recursively for members that are
//! themselves typed. The walk is depth-first so that parents exist before
//! their mandatory children and constructors observe a complete subtree of
//! their own instance but never state beyond it.
//!
//! Every created node and installed reference pair is recorded in a rollback
//! log. Any failure triggers reverse-order undo, including destructor
//! invocation for sub-instances whose constructors had already run; the
//! caller observes either the full subtree or an unchanged address space.

use tracing::{debug, warn};

use trellis_core::attributes::NodeAttributes;
use trellis_core::ids::{ExpandedNodeId, NodeId, QualifiedName};
use trellis_core::status::{ServiceResult, StatusCode};

use crate::hierarchy::ModellingRule;
use crate::node::Node;
use crate::ns0;
use crate::space::AddressSpace;

/// Per-child notification invoked while an instance subtree is materialized.
///
/// Receives the identifier of the new node and the template node it was
/// copied from, in depth-first order of the template walk. Captured closure
/// state replaces the raw context pointer of classic C callback APIs.
pub type InstantiationCallback<'a> = &'a mut dyn FnMut(&NodeId, &NodeId);

/// Bound on nested typed members. A type graph that reaches this depth is
/// self-referential and cannot be materialized.
const MAX_INSTANTIATION_DEPTH: usize = 64;

// =============================================================================
// Rollback log
// =============================================================================

/// A single undoable step of an instantiation.
#[derive(Debug)]
enum UndoOp {
    /// A node was inserted into the store.
    NodeInserted(NodeId),
    /// A reference pair was installed.
    ReferencePair {
        source: NodeId,
        reference_type: NodeId,
        target: ExpandedNodeId,
        is_forward: bool,
    },
    /// A constructor ran successfully for this instance.
    Constructed(NodeId),
}

// =============================================================================
// Instantiator
// =============================================================================

impl AddressSpace {
    /// Materializes an instance of `type_definition` under `parent`.
    ///
    /// The caller has already validated the arguments (parent and reference
    /// type exist, the type definition names a non-abstract type of the
    /// matching class, the browse name is free). On failure the rollback log
    /// restores the address space to its pre-call state and the original
    /// error is returned.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn instantiate_node(
        &mut self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: &NodeId,
        attributes: NodeAttributes,
        mut callback: Option<InstantiationCallback<'_>>,
    ) -> ServiceResult<NodeId> {
        let mut log: Vec<UndoOp> = Vec::new();
        match self.instantiate_root(
            requested_id,
            parent,
            reference_type,
            browse_name,
            type_definition,
            attributes,
            &mut log,
            &mut callback,
        ) {
            Ok(id) => {
                debug!(instance = %id, type_definition = %type_definition, "instance materialized");
                Ok(id)
            }
            Err(code) => {
                debug!(status = code.name(), "instantiation failed, rolling back");
                self.rollback(log);
                Err(code)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn instantiate_root(
        &mut self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: &NodeId,
        attributes: NodeAttributes,
        log: &mut Vec<UndoOp>,
        callback: &mut Option<InstantiationCallback<'_>>,
    ) -> ServiceResult<NodeId> {
        let node = Node::from_attributes(requested_id, browse_name, attributes);
        let new_id = self.store.insert(node)?;
        log.push(UndoOp::NodeInserted(new_id.clone()));

        self.install_reference(parent, reference_type, &new_id, log)?;
        self.install_reference(&new_id, &ns0::HAS_TYPE_DEFINITION, type_definition, log)?;

        if let Some(cb) = callback.as_mut() {
            cb(&new_id, type_definition);
        }

        self.instantiate_members(&new_id, type_definition, 0, log, callback)?;

        // The root constructor runs once its whole subtree exists.
        self.run_constructor(&new_id, type_definition, log);

        Ok(new_id)
    }

    /// Copies every mandatory member of `type_id` (and its ancestors) under
    /// `instance`, depth-first.
    fn instantiate_members(
        &mut self,
        instance: &NodeId,
        type_id: &NodeId,
        depth: usize,
        log: &mut Vec<UndoOp>,
        callback: &mut Option<InstantiationCallback<'_>>,
    ) -> ServiceResult<()> {
        if depth >= MAX_INSTANTIATION_DEPTH {
            warn!(type_id = %type_id, "type graph too deep to instantiate");
            return Err(StatusCode::BadInternalError);
        }
        for member in self.type_children(type_id, Some(ModellingRule::Mandatory)) {
            let template = self
                .store
                .get(&member.node_id)
                .map_err(|_| StatusCode::BadInternalError)?;

            // Fresh id in the server namespace; attributes and value are
            // copied, modelling-rule references are not.
            let copy = template.instantiate_copy(NodeId::NULL);
            let child_id = self.store.insert(copy)?;
            log.push(UndoOp::NodeInserted(child_id.clone()));

            self.install_reference(instance, &member.reference_type, &child_id, log)?;

            if let Some(cb) = callback.as_mut() {
                cb(&child_id, &member.node_id);
            }

            // A typed member is an instance in its own right: link it to its
            // type and recurse into that type's mandatory structure.
            if let Ok(child_type) = self.type_definition(&member.node_id) {
                self.install_reference(&child_id, &ns0::HAS_TYPE_DEFINITION, &child_type, log)?;
                self.instantiate_members(&child_id, &child_type, depth + 1, log, callback)?;
                self.run_constructor(&child_id, &child_type, log);
            }
        }
        Ok(())
    }

    fn install_reference(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &NodeId,
        log: &mut Vec<UndoOp>,
    ) -> ServiceResult<()> {
        let expanded = target.clone().into_expanded();
        self.add_reference_pair(source, reference_type, &expanded, true)?;
        log.push(UndoOp::ReferencePair {
            source: source.clone(),
            reference_type: reference_type.clone(),
            target: expanded,
            is_forward: true,
        });
        Ok(())
    }

    /// Runs the most-derived registered constructor for `type_id`, if any.
    ///
    /// A failing constructor is reported through logging and does not roll
    /// back the instantiation.
    fn run_constructor(&mut self, instance: &NodeId, type_id: &NodeId, log: &mut Vec<UndoOp>) {
        let chain = self.subtype_chain(type_id);
        let Some(constructor) = self.lifecycle.resolve_constructor(&chain) else {
            return;
        };
        match constructor(instance) {
            Ok(handle) => {
                if let Some(handle) = handle {
                    self.lifecycle.store_handle(instance.clone(), handle);
                }
                log.push(UndoOp::Constructed(instance.clone()));
            }
            Err(code) => {
                warn!(
                    instance = %instance,
                    type_id = %type_id,
                    status = code.name(),
                    "constructor failed; instance is kept"
                );
            }
        }
    }

    /// Runs the most-derived registered destructor for an instance, handing
    /// it the stored handle. Invoked at most once per instance.
    pub(crate) fn run_destructor(&mut self, instance: &NodeId) {
        let Ok(type_id) = self.type_definition(instance) else {
            return;
        };
        let chain = self.subtype_chain(&type_id);
        let handle = self.lifecycle.take_handle(instance);
        if let Some(destructor) = self.lifecycle.resolve_destructor(&chain) {
            destructor(instance, handle);
        }
    }

    /// Undoes the recorded steps in reverse order.
    fn rollback(&mut self, log: Vec<UndoOp>) {
        for op in log.into_iter().rev() {
            match op {
                UndoOp::Constructed(instance) => self.run_destructor(&instance),
                UndoOp::ReferencePair {
                    source,
                    reference_type,
                    target,
                    is_forward,
                } => {
                    // The pair may already be gone if its endpoint was
                    // removed earlier in the undo sequence.
                    let _ = self.remove_reference_pair(
                        &source,
                        &reference_type,
                        &target,
                        is_forward,
                        true,
                    );
                }
                UndoOp::NodeInserted(id) => {
                    let _ = self.store.remove(&id);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
