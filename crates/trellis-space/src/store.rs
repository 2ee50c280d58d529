// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The node store: an arena of nodes keyed by identifier.
//!
//! The store owns every node in the address space. Insertion of a node with
//! the `NULL` identifier assigns a fresh numeric identifier in the server
//! namespace from a monotonically increasing counter; the counter shares the
//! exclusive mutation capability of the store, so allocation never races.

use std::collections::HashMap;

use trellis_core::ids::NodeId;
use trellis_core::status::{ServiceResult, StatusCode};

use crate::node::Node;

/// First numeric identifier handed out for server-assigned node ids.
const FIRST_ASSIGNED_ID: u32 = 50_000;

// =============================================================================
// NodeStore
// =============================================================================

/// Owns the set of nodes, keyed by [`NodeId`].
///
/// Every successful insert is visible to subsequent lookups within the same
/// mutation transaction. Iteration order is unspecified.
#[derive(Debug)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
    /// Namespace index used for server-assigned identifiers.
    server_namespace: u16,
    /// Next numeric identifier to try for server-assigned ids.
    next_id: u32,
}

impl NodeStore {
    /// Creates an empty store assigning fresh ids in the given namespace.
    pub fn new(server_namespace: u16) -> Self {
        Self {
            nodes: HashMap::new(),
            server_namespace,
            next_id: FIRST_ASSIGNED_ID,
        }
    }

    /// Inserts a node and returns its identifier.
    ///
    /// A node carrying the `NULL` identifier gets a fresh numeric identifier
    /// in the server namespace. Inserting an identifier that is already
    /// present fails with [`StatusCode::BadNodeIdExists`] and leaves the
    /// store unchanged.
    pub fn insert(&mut self, mut node: Node) -> ServiceResult<NodeId> {
        if node.id.is_null() {
            node.id = self.allocate_id();
        } else if self.nodes.contains_key(&node.id) {
            return Err(StatusCode::BadNodeIdExists);
        }
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Returns a fresh, unused identifier in the server namespace.
    pub fn allocate_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::numeric(self.server_namespace, self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Looks up a node.
    #[inline]
    pub fn get(&self, id: &NodeId) -> ServiceResult<&Node> {
        self.nodes.get(id).ok_or(StatusCode::BadNodeIdUnknown)
    }

    /// Looks up a node mutably.
    #[inline]
    pub fn get_mut(&mut self, id: &NodeId) -> ServiceResult<&mut Node> {
        self.nodes.get_mut(id).ok_or(StatusCode::BadNodeIdUnknown)
    }

    /// Removes and returns a node.
    pub fn remove(&mut self, id: &NodeId) -> ServiceResult<Node> {
        self.nodes.remove(id).ok_or(StatusCode::BadNodeIdUnknown)
    }

    /// Returns `true` if the identifier resolves to a node.
    #[inline]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// The namespace index used for server-assigned identifiers.
    #[inline]
    pub fn server_namespace(&self) -> u16 {
        self.server_namespace
    }
}

// =============================================================================
// Tests
// =============================================================================
