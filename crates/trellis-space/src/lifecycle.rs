// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-type constructor/destructor hooks.
//!
//! Object and variable types may carry a lifecycle: a constructor invoked
//! when an instance of the type is materialized, and a destructor invoked
//! when the instance is destroyed. Constructors return an opaque handle of
//! embedder-chosen type; the registry owns the handle between construction
//! and destruction and hands it to the destructor, which consumes it. No
//! untyped pointers cross the API surface.
//!
//! When a type chain carries several registered lifecycles, only the
//! most-derived one is chosen; ancestors' hooks are not invoked implicitly.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trellis_core::ids::NodeId;
use trellis_core::status::ServiceResult;

// =============================================================================
// Hook signatures
// =============================================================================

/// Opaque per-instance payload produced by a constructor.
pub type LifecycleHandle = Box<dyn Any + Send + Sync>;

/// Constructor hook: receives the identifier of the newly materialized
/// instance and may return a handle stored until destruction.
///
/// A constructor error is reported through logging but does not roll back
/// the instantiation.
pub type Constructor =
    Arc<dyn Fn(&NodeId) -> ServiceResult<Option<LifecycleHandle>> + Send + Sync>;

/// Destructor hook: receives the instance identifier and the handle stored
/// by the constructor, if there was one.
pub type Destructor = Arc<dyn Fn(&NodeId, Option<LifecycleHandle>) + Send + Sync>;

/// The lifecycle attached to a type: either hook may be absent.
#[derive(Clone, Default)]
pub struct NodeLifecycle {
    /// Constructor invoked when an instance is materialized.
    pub constructor: Option<Constructor>,
    /// Destructor invoked when an instance is destroyed.
    pub destructor: Option<Destructor>,
}

impl NodeLifecycle {
    /// Creates a lifecycle from optional hooks.
    pub fn new(constructor: Option<Constructor>, destructor: Option<Destructor>) -> Self {
        Self {
            constructor,
            destructor,
        }
    }
}

impl fmt::Debug for NodeLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeLifecycle")
            .field("constructor", &self.constructor.as_ref().map(|_| "<fn>"))
            .field("destructor", &self.destructor.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// =============================================================================
// LifecycleRegistry
// =============================================================================

/// Maps type identifiers to lifecycles and instances to stored handles.
#[derive(Default)]
pub struct LifecycleRegistry {
    hooks: HashMap<NodeId, NodeLifecycle>,
    handles: HashMap<NodeId, LifecycleHandle>,
}

impl LifecycleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a lifecycle to a type, replacing any previous one.
    pub fn set(&mut self, type_id: NodeId, lifecycle: NodeLifecycle) {
        self.hooks.insert(type_id, lifecycle);
    }

    /// Detaches the lifecycle of a type.
    pub fn remove(&mut self, type_id: &NodeId) -> Option<NodeLifecycle> {
        self.hooks.remove(type_id)
    }

    /// Returns the lifecycle registered for a type, if any.
    pub fn get(&self, type_id: &NodeId) -> Option<&NodeLifecycle> {
        self.hooks.get(type_id)
    }

    /// Resolves the constructor for a type chain.
    ///
    /// The chain must be ordered most-derived first; the first registered
    /// constructor wins.
    pub fn resolve_constructor(&self, chain: &[NodeId]) -> Option<Constructor> {
        chain
            .iter()
            .find_map(|t| self.hooks.get(t).and_then(|l| l.constructor.clone()))
    }

    /// Resolves the destructor for a type chain, most-derived first.
    pub fn resolve_destructor(&self, chain: &[NodeId]) -> Option<Destructor> {
        chain
            .iter()
            .find_map(|t| self.hooks.get(t).and_then(|l| l.destructor.clone()))
    }

    /// Stores the handle a constructor returned for an instance.
    pub fn store_handle(&mut self, instance: NodeId, handle: LifecycleHandle) {
        self.handles.insert(instance, handle);
    }

    /// Removes and returns the handle stored for an instance.
    pub fn take_handle(&mut self, instance: &NodeId) -> Option<LifecycleHandle> {
        self.handles.remove(instance)
    }

    /// Number of types with a registered lifecycle.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if no lifecycle is registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for LifecycleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleRegistry")
            .field("types", &self.hooks.len())
            .field("handles", &self.handles.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
