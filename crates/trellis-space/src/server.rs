// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The server value.
//!
//! [`Server`] owns the [`AddressSpace`] behind a reader-writer capability:
//! mutations take the exclusive capability for the duration of a service
//! call, reads (Browse, Read) take the shared capability and may proceed
//! concurrently with other readers. Service calls never suspend; I/O lives
//! entirely outside this crate.
//!
//! There are no process-wide singletons: a server is an explicitly
//! constructed value holding the store, the lifecycle registry, the
//! namespace table, and the identifier counter.

use parking_lot::RwLock;

use trellis_core::attributes::{
    AttributeId, MethodAttributes, NodeAttributes, ObjectAttributes, ObjectTypeAttributes,
    ReferenceTypeAttributes, VariableAttributes, VariableTypeAttributes,
};
use trellis_core::ids::{ExpandedNodeId, NodeId, QualifiedName};
use trellis_core::status::ServiceResult;
use trellis_core::variant::{DataValue, Variant};

use crate::browse::{BrowseDescription, BrowseResult};
use crate::instantiate::InstantiationCallback;
use crate::lifecycle::{Constructor, Destructor, NodeLifecycle};
use crate::node::MethodHandler;
use crate::space::AddressSpace;

/// Default application URI used when none is configured.
const DEFAULT_APPLICATION_URI: &str = "urn:trellis:server";

// =============================================================================
// Server
// =============================================================================

/// An OPC UA server address space behind a single-writer capability.
///
/// # Examples
///
/// ```
/// use trellis_core::attributes::ObjectAttributes;
/// use trellis_core::ids::{NodeId, QualifiedName};
/// use trellis_space::{ns0, Server};
///
/// let server = Server::new();
/// let id = server
///     .add_object_node(
///         NodeId::NULL,
///         &ns0::OBJECTS_FOLDER,
///         &ns0::ORGANIZES,
///         QualifiedName::new(1, "Plant"),
///         NodeId::NULL,
///         ObjectAttributes::default().with_display_name("Plant"),
///     )
///     .unwrap();
/// assert!(server.node_exists(&id));
/// ```
#[derive(Debug)]
pub struct Server {
    space: RwLock<AddressSpace>,
}

impl Server {
    /// Creates a server with the namespace-0 bootstrap and the default
    /// application URI.
    pub fn new() -> Self {
        Self::with_application_uri(DEFAULT_APPLICATION_URI)
    }

    /// Creates a server with an explicit application namespace URI.
    pub fn with_application_uri(uri: impl Into<String>) -> Self {
        let space =
            AddressSpace::new(uri).expect("namespace 0 bootstrap is internally consistent");
        Self {
            space: RwLock::new(space),
        }
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// Registers a namespace URI and returns its index. Idempotent per URI.
    pub fn add_namespace(&self, uri: impl Into<String>) -> u16 {
        self.space.write().namespaces_mut().add(uri)
    }

    /// Returns the index of a namespace URI, if registered.
    pub fn namespace_index(&self, uri: &str) -> Option<u16> {
        self.space.read().namespaces().index(uri)
    }

    /// Returns the URI registered at a namespace index.
    pub fn namespace_uri(&self, index: u16) -> Option<String> {
        self.space.read().namespaces().uri(index).map(str::to_string)
    }

    // =========================================================================
    // Node management
    // =========================================================================

    /// Adds a node; see [`AddressSpace::add_node`] for the contract.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: Option<NodeId>,
        attributes: NodeAttributes,
        callback: Option<InstantiationCallback<'_>>,
    ) -> ServiceResult<NodeId> {
        self.space.write().add_node(
            requested_id,
            parent,
            reference_type,
            browse_name,
            type_definition,
            attributes,
            callback,
        )
    }

    /// Adds an object node, instantiating `type_definition` (or
    /// `BaseObjectType` when `NULL`).
    pub fn add_object_node(
        &self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: NodeId,
        attributes: ObjectAttributes,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            parent,
            reference_type,
            browse_name,
            Some(type_definition),
            NodeAttributes::Object(attributes),
            None,
        )
    }

    /// Adds an object node and reports every materialized node to
    /// `callback`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_object_node_with_callback(
        &self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: NodeId,
        attributes: ObjectAttributes,
        callback: InstantiationCallback<'_>,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            parent,
            reference_type,
            browse_name,
            Some(type_definition),
            NodeAttributes::Object(attributes),
            Some(callback),
        )
    }

    /// Adds a variable node, instantiating `type_definition` (or
    /// `BaseDataVariableType` when `NULL`).
    pub fn add_variable_node(
        &self,
        requested_id: NodeId,
        parent: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        type_definition: NodeId,
        attributes: VariableAttributes,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            parent,
            reference_type,
            browse_name,
            Some(type_definition),
            NodeAttributes::Variable(attributes),
            None,
        )
    }

    /// Adds an object type node under a supertype.
    pub fn add_object_type_node(
        &self,
        requested_id: NodeId,
        supertype: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        attributes: ObjectTypeAttributes,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            supertype,
            reference_type,
            browse_name,
            None,
            NodeAttributes::ObjectType(attributes),
            None,
        )
    }

    /// Adds a variable type node under a supertype.
    pub fn add_variable_type_node(
        &self,
        requested_id: NodeId,
        supertype: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        attributes: VariableTypeAttributes,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            supertype,
            reference_type,
            browse_name,
            None,
            NodeAttributes::VariableType(attributes),
            None,
        )
    }

    /// Adds a reference type node under a supertype.
    pub fn add_reference_type_node(
        &self,
        requested_id: NodeId,
        supertype: &NodeId,
        reference_type: &NodeId,
        browse_name: QualifiedName,
        attributes: ReferenceTypeAttributes,
    ) -> ServiceResult<NodeId> {
        self.add_node(
            requested_id,
            supertype,
            reference_type,
            browse_name,
            None,
            NodeAttributes::ReferenceType(attributes),
            None,
        )
    }

    /// Adds a method node under an object, optionally with a handler.
    #[allow(clippy::too_many_arguments)]
    pub fn add_method_node(
        &self,
        requested_id: NodeId,
        parent: &NodeId,
        browse_name: QualifiedName,
        attributes: MethodAttributes,
        handler: Option<MethodHandler>,
    ) -> ServiceResult<NodeId> {
        let mut space = self.space.write();
        let id = space.add_node(
            requested_id,
            parent,
            &crate::ns0::HAS_COMPONENT,
            browse_name,
            None,
            NodeAttributes::Method(attributes),
            None,
        )?;
        if let Some(handler) = handler {
            space.set_method_handler(&id, handler)?;
        }
        Ok(id)
    }

    /// Adds a reference between two nodes.
    pub fn add_reference(
        &self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
    ) -> ServiceResult<()> {
        self.space
            .write()
            .add_reference(source, reference_type, target, is_forward)
    }

    /// Deletes a node; see [`AddressSpace::delete_node`].
    pub fn delete_node(&self, id: &NodeId, delete_target_references: bool) -> ServiceResult<()> {
        self.space.write().delete_node(id, delete_target_references)
    }

    /// Deletes a reference; see [`AddressSpace::delete_reference`].
    pub fn delete_reference(
        &self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &ExpandedNodeId,
        is_forward: bool,
        delete_bidirectional: bool,
    ) -> ServiceResult<()> {
        self.space.write().delete_reference(
            source,
            reference_type,
            target,
            is_forward,
            delete_bidirectional,
        )
    }

    // =========================================================================
    // View and attribute services
    // =========================================================================

    /// Browses the references of a node. `max_references` of 0 means
    /// unbounded.
    pub fn browse(&self, max_references: u32, description: &BrowseDescription) -> BrowseResult {
        self.space.read().browse(max_references, description)
    }

    /// Reads one attribute of a node.
    pub fn read_attribute(&self, id: &NodeId, attribute: AttributeId) -> ServiceResult<DataValue> {
        self.space.read().read_attribute(id, attribute)
    }

    /// Writes the Value attribute of a variable.
    pub fn write_value(&self, id: &NodeId, value: Variant) -> ServiceResult<()> {
        self.space.write().write_value(id, value)
    }

    /// Calls a method on an object.
    ///
    /// The handler runs outside the address-space capability; it must not
    /// call back into this server.
    pub fn call_method(
        &self,
        object: &NodeId,
        method: &NodeId,
        arguments: &[Variant],
    ) -> ServiceResult<Vec<Variant>> {
        let handler = self.space.read().resolve_method(object, method)?;
        handler(object, method, arguments)
    }

    /// Attaches an invocation handler to a method node.
    pub fn set_method_handler(
        &self,
        method: &NodeId,
        handler: MethodHandler,
    ) -> ServiceResult<()> {
        self.space.write().set_method_handler(method, handler)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Registers constructor/destructor hooks for an object or variable
    /// type. Either hook may be absent; a later call replaces both.
    pub fn set_lifecycle(
        &self,
        type_id: &NodeId,
        constructor: Option<Constructor>,
        destructor: Option<Destructor>,
    ) -> ServiceResult<()> {
        self.space
            .write()
            .set_lifecycle(type_id, NodeLifecycle::new(constructor, destructor))
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Returns `true` if the identifier resolves to a node.
    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.space.read().store().contains(id)
    }

    /// Number of nodes in the address space.
    pub fn node_count(&self) -> usize {
        self.space.read().store().len()
    }

    /// Runs a closure with shared access to the address space.
    ///
    /// Escape hatch for embedders that need read-only queries beyond the
    /// service surface. The closure must not block on this server.
    pub fn with_space<R>(&self, f: impl FnOnce(&AddressSpace) -> R) -> R {
        f(&self.space.read())
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
