// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address space value: store, lifecycle registry, namespace table.
//!
//! [`AddressSpace`] is the single mutable state of the server. It is never a
//! global: the [`crate::server::Server`] value owns it behind a
//! reader-writer capability, and every service call operates on it through
//! that capability for the duration of the call.
//!
//! This module also carries the reference-pair discipline: both halves of a
//! reference are installed and removed together, and a half-installed pair is
//! never observable through any query.

use trellis_core::ids::{ExpandedNodeId, NodeId};
use trellis_core::status::{ServiceResult, StatusCode};

use crate::browse::BrowseDirection;
use crate::lifecycle::LifecycleRegistry;
use crate::node::Reference;
use crate::ns0;
use crate::store::NodeStore;

/// URI of the OPC UA standard namespace (index 0).
pub const STANDARD_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// Namespace index used for server-assigned node identifiers.
pub const SERVER_NAMESPACE_INDEX: u16 = 1;

// =============================================================================
// NamespaceTable
// =============================================================================

/// The ordered table of namespace URIs.
///
/// Index 0 is always the OPC UA standard namespace; index 1 is the server's
/// application namespace. Adding a URI that is already present returns its
/// existing index.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl NamespaceTable {
    /// Creates a table holding the standard and application namespaces.
    pub fn new(application_uri: impl Into<String>) -> Self {
        Self {
            uris: vec![STANDARD_NAMESPACE_URI.to_string(), application_uri.into()],
        }
    }

    /// Adds a namespace URI, returning its index. Idempotent per URI.
    pub fn add(&mut self, uri: impl Into<String>) -> u16 {
        let uri = uri.into();
        if let Some(index) = self.index(&uri) {
            return index;
        }
        self.uris.push(uri);
        (self.uris.len() - 1) as u16
    }

    /// Returns the index of a URI, if present.
    pub fn index(&self, uri: &str) -> Option<u16> {
        self.uris.iter().position(|u| u == uri).map(|i| i as u16)
    }

    /// Returns the URI at an index, if present.
    pub fn uri(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(String::as_str)
    }

    /// Number of namespaces in the table.
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Always `false`: the standard namespace is always present.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// =============================================================================
// AddressSpace
// =============================================================================

/// The in-memory information model of the server.
///
/// Holds the node store, the per-type lifecycle registry, and the namespace
/// table. All mutation goes through the service methods implemented across
/// this crate; the invariants of the reference graph (pairs installed
/// atomically, targets resolvable or external) are maintained here.
#[derive(Debug)]
pub struct AddressSpace {
    pub(crate) store: NodeStore,
    pub(crate) lifecycle: LifecycleRegistry,
    namespaces: NamespaceTable,
}

impl AddressSpace {
    /// Creates an address space populated with the namespace-0 bootstrap.
    pub fn new(application_uri: impl Into<String>) -> ServiceResult<Self> {
        let mut space = Self::bare(application_uri);
        ns0::bootstrap(&mut space)?;
        Ok(space)
    }

    /// Creates an address space without the namespace-0 bootstrap.
    ///
    /// Only meaningful for unit tests that build their own miniature type
    /// graph; everything else wants [`AddressSpace::new`].
    pub(crate) fn bare(application_uri: impl Into<String>) -> Self {
        Self {
            store: NodeStore::new(SERVER_NAMESPACE_INDEX),
            lifecycle: LifecycleRegistry::new(),
            namespaces: NamespaceTable::new(application_uri),
        }
    }

    /// The node store.
    #[inline]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The namespace table.
    #[inline]
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// The namespace table, mutably.
    #[inline]
    pub fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    // =========================================================================
    // Reference pairs
    // =========================================================================

    /// Installs both halves of a reference atomically.
    ///
    /// The source must exist. A local target must exist as well; a non-local
    /// target gets no inverse half. Duplicate pairs are rejected with
    /// [`StatusCode::BadDuplicateReferenceNotAllowed`] without touching
    /// either endpoint.
    pub fn add_reference_pair(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
    ) -> ServiceResult<()> {
        // Validate both endpoints before mutating either.
        let source_node = self
            .store
            .get(source)
            .map_err(|_| StatusCode::BadSourceNodeIdInvalid)?;
        if source_node.has_reference(reference_type, target, is_forward) {
            return Err(StatusCode::BadDuplicateReferenceNotAllowed);
        }

        let local_target = match target.as_local() {
            Some(local) => {
                let target_node = self
                    .store
                    .get(local)
                    .map_err(|_| StatusCode::BadTargetNodeIdInvalid)?;
                let back = ExpandedNodeId::local(source.clone());
                if target_node.has_reference(reference_type, &back, !is_forward) {
                    return Err(StatusCode::BadDuplicateReferenceNotAllowed);
                }
                Some(local.clone())
            }
            None => None,
        };

        self.store
            .get_mut(source)
            .map_err(|_| StatusCode::BadInternalError)?
            .push_reference(Reference::new(
                reference_type.clone(),
                target.clone(),
                is_forward,
            ));

        if let Some(local) = local_target {
            self.store
                .get_mut(&local)
                .map_err(|_| StatusCode::BadInternalError)?
                .push_reference(Reference::new(
                    reference_type.clone(),
                    ExpandedNodeId::local(source.clone()),
                    !is_forward,
                ));
        }

        Ok(())
    }

    /// Removes a reference half and, optionally, its inverse counterpart.
    ///
    /// Returns [`StatusCode::BadNotFound`] when the source does not hold the
    /// given half. With `delete_bidirectional`, a resolvable local target has
    /// its counterpart removed in the same step.
    pub fn remove_reference_pair(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
        delete_bidirectional: bool,
    ) -> ServiceResult<()> {
        let source_node = self
            .store
            .get_mut(source)
            .map_err(|_| StatusCode::BadSourceNodeIdInvalid)?;
        if !source_node.remove_reference(reference_type, target, is_forward) {
            return Err(StatusCode::BadNotFound);
        }

        if delete_bidirectional {
            if let Some(local) = target.as_local() {
                let back = ExpandedNodeId::local(source.clone());
                if let Ok(target_node) = self.store.get_mut(local) {
                    target_node.remove_reference(reference_type, &back, !is_forward);
                }
            }
        }

        Ok(())
    }

    /// Yields the target identifiers reachable from `source` over references
    /// of the given type and direction.
    ///
    /// With `include_subtypes`, every reference type that is a transitive
    /// subtype of `reference_type` matches as well.
    pub fn neighbors(
        &self,
        source: &NodeId,
        reference_type: &NodeId,
        direction: BrowseDirection,
        include_subtypes: bool,
    ) -> ServiceResult<Vec<ExpandedNodeId>> {
        let node = self.store.get(source)?;
        let mut targets = Vec::new();
        for reference in &node.references {
            if !direction.matches(reference.is_forward) {
                continue;
            }
            let type_matches = if include_subtypes {
                self.is_subtype_of(&reference.reference_type, reference_type)
            } else {
                reference.reference_type == *reference_type
            };
            if type_matches {
                targets.push(reference.target.clone());
            }
        }
        Ok(targets)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::attributes::{NodeAttributes, ObjectAttributes};
    use trellis_core::ids::QualifiedName;

    use crate::node::Node;

    fn space_with(ids: &[u32]) -> AddressSpace {
        let mut space = AddressSpace::bare("urn:test");
        for id in ids {
            space
                .store
                .insert(Node::from_attributes(
                    NodeId::numeric(1, *id),
                    QualifiedName::new(1, format!("n{}", id)),
                    NodeAttributes::Object(ObjectAttributes::default()),
                ))
                .unwrap();
        }
        space
    }

    fn reference_type() -> NodeId {
        NodeId::numeric(0, 47)
    }

    #[test]
    fn test_namespace_table() {
        let mut table = NamespaceTable::new("urn:trellis:server");
        assert_eq!(table.index(STANDARD_NAMESPACE_URI), Some(0));
        assert_eq!(table.index("urn:trellis:server"), Some(1));

        let index = table.add("urn:factory:line4");
        assert_eq!(index, 2);
        // Idempotent.
        assert_eq!(table.add("urn:factory:line4"), 2);
        assert_eq!(table.uri(2), Some("urn:factory:line4"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_reference_pair_installed_on_both_endpoints() {
        let mut space = space_with(&[1, 2]);
        let (a, b) = (NodeId::numeric(1, 1), NodeId::numeric(1, 2));

        space
            .add_reference_pair(&a, &reference_type(), &b.clone().into_expanded(), true)
            .unwrap();

        let source = space.store.get(&a).unwrap();
        let target = space.store.get(&b).unwrap();
        assert!(source.has_reference(&reference_type(), &b.clone().into_expanded(), true));
        assert!(target.has_reference(&reference_type(), &a.clone().into_expanded(), false));
    }

    #[test]
    fn test_duplicate_pair_rejected_without_mutation() {
        let mut space = space_with(&[1, 2]);
        let (a, b) = (NodeId::numeric(1, 1), NodeId::numeric(1, 2));

        space
            .add_reference_pair(&a, &reference_type(), &b.clone().into_expanded(), true)
            .unwrap();
        let result =
            space.add_reference_pair(&a, &reference_type(), &b.clone().into_expanded(), true);
        assert_eq!(result, Err(StatusCode::BadDuplicateReferenceNotAllowed));

        // Exactly one half on each endpoint.
        assert_eq!(space.store.get(&a).unwrap().references.len(), 1);
        assert_eq!(space.store.get(&b).unwrap().references.len(), 1);
    }

    #[test]
    fn test_missing_target_leaves_source_untouched() {
        let mut space = space_with(&[1]);
        let a = NodeId::numeric(1, 1);
        let missing = ExpandedNodeId::numeric(1, 99);

        let result = space.add_reference_pair(&a, &reference_type(), &missing, true);
        assert_eq!(result, Err(StatusCode::BadTargetNodeIdInvalid));
        assert!(space.store.get(&a).unwrap().references.is_empty());
    }

    #[test]
    fn test_external_target_gets_no_inverse() {
        let mut space = space_with(&[1]);
        let a = NodeId::numeric(1, 1);
        let external = ExpandedNodeId {
            node_id: NodeId::numeric(2, 7),
            namespace_uri: Some("urn:other:server".into()),
            server_index: 1,
        };

        space
            .add_reference_pair(&a, &reference_type(), &external, true)
            .unwrap();
        assert_eq!(space.store.get(&a).unwrap().references.len(), 1);
    }

    #[test]
    fn test_remove_pair_bidirectional() {
        let mut space = space_with(&[1, 2]);
        let (a, b) = (NodeId::numeric(1, 1), NodeId::numeric(1, 2));
        space
            .add_reference_pair(&a, &reference_type(), &b.clone().into_expanded(), true)
            .unwrap();

        space
            .remove_reference_pair(&a, &reference_type(), &b.clone().into_expanded(), true, true)
            .unwrap();
        assert!(space.store.get(&a).unwrap().references.is_empty());
        assert!(space.store.get(&b).unwrap().references.is_empty());

        let result =
            space.remove_reference_pair(&a, &reference_type(), &b.into_expanded(), true, true);
        assert_eq!(result, Err(StatusCode::BadNotFound));
    }
}
