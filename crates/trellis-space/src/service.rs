// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node-management service operations.
//!
//! AddNode, AddReference, DeleteNode, and DeleteReference with the
//! validation-first discipline: every argument is checked before the first
//! mutation, the first failing check returns immediately, and a call either
//! applies completely or leaves the address space bit-identical to its
//! pre-call state.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use trellis_core::attributes::{NodeAttributes, NodeClass};
use trellis_core::ids::{ExpandedNodeId, NodeId, QualifiedName};
use trellis_core::status::{ServiceResult, StatusCode};

use crate::instantiate::InstantiationCallback;
use crate::lifecycle::NodeLifecycle;
use crate::node::Node;
use crate::ns0;
use crate::space::AddressSpace;

impl AddressSpace {
    // =========================================================================
    // AddNode
    // =========================================================================

    /// Adds a node to the address space.
    ///
    /// Validations run in order; the first failure returns without mutating
    /// anything:
    ///
    /// 1. `parent` exists (`BadParentNodeIdInvalid`)
    /// 2. `reference_type` exists and is a ReferenceType
    ///    (`BadReferenceTypeIdInvalid`)
    /// 3. a non-NULL `requested_id` is not taken (`BadNodeIdExists`)
    /// 4. objects and variables get a non-abstract type definition of the
    ///    matching class (`BadTypeDefinitionInvalid`); `None` or `NULL`
    ///    defaults to `BaseObjectType` / `BaseDataVariableType`
    /// 5. the browse name is unique among siblings reached from `parent`
    ///    through the same hierarchical reference type
    ///    (`BadBrowseNameDuplicated`)
    ///
    /// Objects and variables are delegated to the instantiator, which also
    /// materializes the type's mandatory members; every other class inserts
    /// a single node plus its parent reference atomically.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &mut self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: Option<NodeId>,
        attributes: NodeAttributes,
        callback: Option<InstantiationCallback<'_>>,
    ) -> ServiceResult<NodeId> {
        if !self.store.contains(parent) {
            return Err(StatusCode::BadParentNodeIdInvalid);
        }
        match self.store.get(reference_type) {
            Ok(node) if node.node_class() == NodeClass::ReferenceType => {}
            _ => return Err(StatusCode::BadReferenceTypeIdInvalid),
        }
        if !requested_id.is_null() && self.store.contains(&requested_id) {
            return Err(StatusCode::BadNodeIdExists);
        }

        let node_class = attributes.node_class();
        let type_definition = match node_class {
            NodeClass::Object => Some(self.checked_type_definition(
                type_definition,
                ns0::BASE_OBJECT_TYPE,
                NodeClass::ObjectType,
            )?),
            NodeClass::Variable => Some(self.checked_type_definition(
                type_definition,
                ns0::BASE_DATA_VARIABLE_TYPE,
                NodeClass::VariableType,
            )?),
            _ => None,
        };

        self.check_browse_name_free(parent, reference_type, &browse_name)?;

        let assigned = match type_definition {
            Some(type_id) => self.instantiate_node(
                requested_id,
                parent,
                reference_type,
                browse_name,
                &type_id,
                attributes,
                callback,
            )?,
            None => {
                let node = Node::from_attributes(requested_id, browse_name, attributes);
                let id = self.store.insert(node)?;
                if let Err(code) = self.add_reference_pair(
                    parent,
                    reference_type,
                    &id.clone().into_expanded(),
                    true,
                ) {
                    // Keep the call atomic: take the fresh node back out.
                    let _ = self.store.remove(&id);
                    return Err(code);
                }
                id
            }
        };

        debug!(node = %assigned, parent = %parent, class = ?node_class, "node added");
        Ok(assigned)
    }

    /// Resolves and validates a type definition argument.
    fn checked_type_definition(
        &self,
        requested: Option<NodeId>,
        default: NodeId,
        expected_class: NodeClass,
    ) -> ServiceResult<NodeId> {
        let type_id = match requested {
            Some(id) if !id.is_null() => id,
            _ => default,
        };
        let node = self
            .store
            .get(&type_id)
            .map_err(|_| StatusCode::BadTypeDefinitionInvalid)?;
        if node.node_class() != expected_class || node.is_abstract() {
            return Err(StatusCode::BadTypeDefinitionInvalid);
        }
        Ok(type_id)
    }

    /// Checks browse-name uniqueness among siblings reached through the same
    /// hierarchical reference type.
    fn check_browse_name_free(
        &self,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: &QualifiedName,
    ) -> ServiceResult<()> {
        if !self.is_subtype_of(reference_type, &ns0::HIERARCHICAL_REFERENCES) {
            return Ok(());
        }
        let parent_node = self.store.get(parent)?;
        for reference in parent_node.forward_references() {
            if reference.reference_type != *reference_type {
                continue;
            }
            let Some(target) = reference.target.as_local() else {
                continue;
            };
            if let Ok(sibling) = self.store.get(target) {
                if sibling.browse_name == *browse_name {
                    return Err(StatusCode::BadBrowseNameDuplicated);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // AddReference
    // =========================================================================

    /// Adds a reference between two existing nodes.
    ///
    /// Both endpoints and the reference type are validated first; the pair
    /// is then installed atomically. A second add of the same tuple fails
    /// with `BadDuplicateReferenceNotAllowed` and leaves the single existing
    /// pair in place. `HasSubtype` references that would close a cycle in
    /// the type forest are rejected with `BadReferenceNotAllowed`.
    pub fn add_reference(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
    ) -> ServiceResult<()> {
        if !self.store.contains(source) {
            return Err(StatusCode::BadSourceNodeIdInvalid);
        }
        match self.store.get(reference_type) {
            Ok(node) if node.node_class() == NodeClass::ReferenceType => {}
            _ => return Err(StatusCode::BadReferenceTypeIdInvalid),
        }
        if let Some(local) = target.as_local() {
            if !self.store.contains(local) {
                return Err(StatusCode::BadTargetNodeIdInvalid);
            }
            // Subtyping must stay a forest: reject an edge that would make a
            // type an ancestor of itself.
            if self.is_subtype_of(reference_type, &ns0::HAS_SUBTYPE) {
                let (supertype, subtype) = if is_forward {
                    (source, local)
                } else {
                    (local, source)
                };
                if self.is_subtype_of(supertype, subtype) {
                    return Err(StatusCode::BadReferenceNotAllowed);
                }
            }
        }

        self.add_reference_pair(source, reference_type, target, is_forward)
    }

    // =========================================================================
    // DeleteNode
    // =========================================================================

    /// Deletes a node.
    ///
    /// The registered destructor (if any) runs first; then every reference
    /// pair touching the node is unlinked — inverse halves at the targets of
    /// outgoing references always, forward halves at the sources of incoming
    /// references only with `delete_target_references` — and the node is
    /// removed. Aggregated children (`HasComponent`/`HasProperty`) that are
    /// left unreachable from the root folder are deleted recursively.
    pub fn delete_node(
        &mut self,
        id: &NodeId,
        delete_target_references: bool,
    ) -> ServiceResult<()> {
        if !self.store.contains(id) {
            return Err(StatusCode::BadNodeIdUnknown);
        }

        self.run_destructor(id);

        // Snapshot before unlinking; the reference list shrinks underneath
        // us otherwise.
        let references = self.store.get(id)?.references.clone();
        let mut owned_children: Vec<NodeId> = Vec::new();

        for reference in &references {
            let Some(other) = reference.target.as_local().cloned() else {
                continue;
            };
            if reference.is_forward {
                if self.is_subtype_of(&reference.reference_type, &ns0::AGGREGATES) {
                    owned_children.push(other.clone());
                }
                if let Ok(other_node) = self.store.get_mut(&other) {
                    other_node.remove_reference(
                        &reference.reference_type,
                        &id.clone().into_expanded(),
                        false,
                    );
                }
            } else if delete_target_references {
                if let Ok(other_node) = self.store.get_mut(&other) {
                    other_node.remove_reference(
                        &reference.reference_type,
                        &id.clone().into_expanded(),
                        true,
                    );
                }
            }
        }

        self.store.remove(id)?;
        debug!(node = %id, "node deleted");

        // Cascade over aggregated children that lost their last hierarchical
        // path from the root.
        for child in owned_children {
            if self.store.contains(&child) && !self.reachable_from_root(&child) {
                let _ = self.delete_node(&child, delete_target_references);
            }
        }

        Ok(())
    }

    /// Breadth-first reachability from the root folder over forward
    /// hierarchical references.
    fn reachable_from_root(&self, target: &NodeId) -> bool {
        if *target == ns0::ROOT_FOLDER {
            return true;
        }
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        visited.insert(ns0::ROOT_FOLDER);
        queue.push_back(ns0::ROOT_FOLDER);

        while let Some(current) = queue.pop_front() {
            let Ok(node) = self.store.get(&current) else {
                continue;
            };
            for reference in node.forward_references() {
                if !self.is_subtype_of(&reference.reference_type, &ns0::HIERARCHICAL_REFERENCES) {
                    continue;
                }
                let Some(next) = reference.target.as_local() else {
                    continue;
                };
                if next == target {
                    return true;
                }
                if visited.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
            }
        }
        false
    }

    // =========================================================================
    // DeleteReference
    // =========================================================================

    /// Deletes a reference.
    ///
    /// Removes the half held by `source`; with `delete_bidirectional` the
    /// counterpart at a local target is removed in the same call.
    pub fn delete_reference(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
        delete_bidirectional: bool,
    ) -> ServiceResult<()> {
        self.remove_reference_pair(source, reference_type, target, is_forward, delete_bidirectional)
    }

    // =========================================================================
    // Lifecycle registration
    // =========================================================================

    /// Attaches constructor/destructor hooks to an object or variable type.
    pub fn set_lifecycle(
        &mut self,
        type_id: &NodeId,
        lifecycle: NodeLifecycle,
    ) -> ServiceResult<()> {
        let node = self.store.get(type_id)?;
        if !matches!(
            node.node_class(),
            NodeClass::ObjectType | NodeClass::VariableType
        ) {
            return Err(StatusCode::BadNodeClassInvalid);
        }
        self.lifecycle.set(type_id.clone(), lifecycle);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::attributes::{ObjectAttributes, ObjectTypeAttributes, VariableAttributes};
    use trellis_core::variant::Variant;

    fn space() -> AddressSpace {
        AddressSpace::new("urn:test").expect("bootstrap")
    }

    fn add_object(space: &mut AddressSpace, id: NodeId, name: &str) -> ServiceResult<NodeId> {
        space.add_node(
            id,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, name),
            None,
            ObjectAttributes::default().with_display_name(name).into(),
            None,
        )
    }

    #[test]
    fn test_add_node_validation_order() {
        let mut space = space();

        // Unknown parent wins over everything else.
        let result = space.add_node(
            NodeId::NULL,
            &NodeId::numeric(9, 9),
            &NodeId::numeric(9, 9),
            QualifiedName::new(1, "x"),
            None,
            ObjectAttributes::default().into(),
            None,
        );
        assert_eq!(result, Err(StatusCode::BadParentNodeIdInvalid));

        // A parent that exists but a reference type that is not one.
        let result = space.add_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::BASE_OBJECT_TYPE,
            QualifiedName::new(1, "x"),
            None,
            ObjectAttributes::default().into(),
            None,
        );
        assert_eq!(result, Err(StatusCode::BadReferenceTypeIdInvalid));
    }

    #[test]
    fn test_add_node_rejects_taken_id() {
        let mut space = space();
        add_object(&mut space, NodeId::numeric(1, 10), "first").unwrap();
        let result = add_object(&mut space, NodeId::numeric(1, 10), "second");
        assert_eq!(result, Err(StatusCode::BadNodeIdExists));
    }

    #[test]
    fn test_add_node_rejects_abstract_type_definition() {
        let mut space = space();
        // BaseVariableType is abstract; instantiating it must fail.
        let result = space.add_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "v"),
            Some(ns0::BASE_VARIABLE_TYPE),
            VariableAttributes::default().into(),
            None,
        );
        assert_eq!(result, Err(StatusCode::BadTypeDefinitionInvalid));

        // A type of the wrong class fails the same way.
        let result = space.add_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "o"),
            Some(ns0::BASE_DATA_VARIABLE_TYPE),
            ObjectAttributes::default().into(),
            None,
        );
        assert_eq!(result, Err(StatusCode::BadTypeDefinitionInvalid));
    }

    #[test]
    fn test_add_node_rejects_duplicate_browse_name() {
        let mut space = space();
        add_object(&mut space, NodeId::NULL, "pump").unwrap();
        let result = add_object(&mut space, NodeId::NULL, "pump");
        assert_eq!(result, Err(StatusCode::BadBrowseNameDuplicated));

        // The same name through a different hierarchical reference type is
        // allowed.
        let result = space.add_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "pump"),
            None,
            ObjectAttributes::default().into(),
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_failed_add_leaves_space_unchanged() {
        let mut space = space();
        add_object(&mut space, NodeId::numeric(1, 20), "taken").unwrap();
        let nodes = space.store.len();
        let folder_references = space.store.get(&ns0::OBJECTS_FOLDER).unwrap().references.len();

        let result = add_object(&mut space, NodeId::numeric(1, 20), "other");
        assert_eq!(result, Err(StatusCode::BadNodeIdExists));
        assert_eq!(space.store.len(), nodes);
        assert_eq!(
            space.store.get(&ns0::OBJECTS_FOLDER).unwrap().references.len(),
            folder_references
        );
    }

    #[test]
    fn test_add_reference_duplicate_rejected() {
        let mut space = space();
        let a = add_object(&mut space, NodeId::NULL, "a").unwrap();
        let b = add_object(&mut space, NodeId::NULL, "b").unwrap();

        space
            .add_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true)
            .unwrap();
        let result = space.add_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true);
        assert_eq!(result, Err(StatusCode::BadDuplicateReferenceNotAllowed));

        // Exactly one pair exists.
        let node = space.store.get(&a).unwrap();
        let count = node
            .references
            .iter()
            .filter(|r| r.matches(&ns0::ORGANIZES, &b.clone().into_expanded(), true))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_add_reference_rejects_subtype_cycle() {
        let mut space = space();
        let parent_type = space
            .add_node(
                NodeId::NULL,
                &ns0::BASE_OBJECT_TYPE,
                &ns0::HAS_SUBTYPE,
                QualifiedName::new(1, "ParentType"),
                None,
                ObjectTypeAttributes::default().into(),
                None,
            )
            .unwrap();
        let child_type = space
            .add_node(
                NodeId::NULL,
                &parent_type,
                &ns0::HAS_SUBTYPE,
                QualifiedName::new(1, "ChildType"),
                None,
                ObjectTypeAttributes::default().into(),
                None,
            )
            .unwrap();

        // child -> parent would close the loop, as would self-subtyping.
        let result = space.add_reference(
            &child_type,
            &ns0::HAS_SUBTYPE,
            &parent_type.clone().into_expanded(),
            true,
        );
        assert_eq!(result, Err(StatusCode::BadReferenceNotAllowed));
        let result = space.add_reference(
            &parent_type,
            &ns0::HAS_SUBTYPE,
            &parent_type.clone().into_expanded(),
            true,
        );
        assert_eq!(result, Err(StatusCode::BadReferenceNotAllowed));
    }

    #[test]
    fn test_delete_node_removes_all_mentions() {
        let mut space = space();
        let a = add_object(&mut space, NodeId::NULL, "a").unwrap();
        let b = add_object(&mut space, NodeId::NULL, "b").unwrap();
        space
            .add_reference(&b, &ns0::ORGANIZES, &a.clone().into_expanded(), true)
            .unwrap();

        space.delete_node(&a, true).unwrap();

        assert!(!space.store.contains(&a));
        for node in space.store.iter() {
            for reference in &node.references {
                assert_ne!(reference.target.as_local(), Some(&a));
            }
        }
    }

    #[test]
    fn test_delete_node_cascades_owned_children() {
        let mut space = space();
        let parent = add_object(&mut space, NodeId::NULL, "rig").unwrap();
        let child = space
            .add_node(
                NodeId::NULL,
                &parent,
                &ns0::HAS_COMPONENT,
                QualifiedName::new(1, "sensor"),
                None,
                VariableAttributes::default().with_value(Variant::Int32(1)).into(),
                None,
            )
            .unwrap();

        space.delete_node(&parent, true).unwrap();
        // The component child lost its only hierarchical path and is gone.
        assert!(!space.store.contains(&child));
    }

    #[test]
    fn test_delete_node_spares_children_reachable_elsewhere() {
        let mut space = space();
        let parent = add_object(&mut space, NodeId::NULL, "rig").unwrap();
        let child = space
            .add_node(
                NodeId::NULL,
                &parent,
                &ns0::HAS_COMPONENT,
                QualifiedName::new(1, "sensor"),
                None,
                VariableAttributes::default().into(),
                None,
            )
            .unwrap();
        // A second hierarchical path keeps the child alive.
        space
            .add_reference(
                &ns0::OBJECTS_FOLDER,
                &ns0::ORGANIZES,
                &child.clone().into_expanded(),
                true,
            )
            .unwrap();

        space.delete_node(&parent, true).unwrap();
        assert!(space.store.contains(&child));
    }

    #[test]
    fn test_delete_reference() {
        let mut space = space();
        let a = add_object(&mut space, NodeId::NULL, "a").unwrap();
        let b = add_object(&mut space, NodeId::NULL, "b").unwrap();
        space
            .add_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true)
            .unwrap();

        space
            .delete_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true, true)
            .unwrap();
        assert!(!space
            .store
            .get(&a)
            .unwrap()
            .has_reference(&ns0::ORGANIZES, &b.clone().into_expanded(), true));
        assert!(!space
            .store
            .get(&b)
            .unwrap()
            .has_reference(&ns0::ORGANIZES, &a.clone().into_expanded(), false));

        let result =
            space.delete_reference(&a, &ns0::ORGANIZES, &b.into_expanded(), true, true);
        assert_eq!(result, Err(StatusCode::BadNotFound));
    }

    #[test]
    fn test_set_lifecycle_requires_type_node() {
        let mut space = space();
        let object = add_object(&mut space, NodeId::NULL, "o").unwrap();
        let result = space.set_lifecycle(&object, NodeLifecycle::default());
        assert_eq!(result, Err(StatusCode::BadNodeClassInvalid));

        assert!(space
            .set_lifecycle(&ns0::BASE_OBJECT_TYPE, NodeLifecycle::default())
            .is_ok());
    }

    #[test]
    fn test_add_then_delete_restores_structure() {
        let mut space = space();
        let nodes = space.store.len();
        let folder_refs = space.store.get(&ns0::OBJECTS_FOLDER).unwrap().references.len();

        let id = add_object(&mut space, NodeId::NULL, "ephemeral").unwrap();
        space.delete_node(&id, true).unwrap();

        assert_eq!(space.store.len(), nodes);
        assert_eq!(
            space.store.get(&ns0::OBJECTS_FOLDER).unwrap().references.len(),
            folder_refs
        );
    }
}