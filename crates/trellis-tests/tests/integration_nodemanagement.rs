// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Node Management Integration Tests
//!
//! End-to-end scenarios for AddNode, AddReference, DeleteNode, and
//! DeleteReference through the public `Server` surface:
//!
//! - variable creation under the objects folder
//! - duplicate node ids
//! - constructor and destructor hooks
//! - reference cleanup on deletion and re-adding

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use trellis_core::attributes::{ObjectAttributes, VariableAttributes};
use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::status::StatusCode;
use trellis_core::variant::Variant;
use trellis_space::browse::BrowseDescription;
use trellis_space::{ns0, Server};

use trellis_tests::common::assertions::{browse_objects_folder, BrowseResultAssertions};
use trellis_tests::common::fixtures::add_object_type;

// =============================================================================
// AddNode
// =============================================================================

#[test]
fn test_add_variable_node() {
    let server = Server::new();
    let the_answer = NodeId::string(1, "the.answer");

    let assigned = server
        .add_variable_node(
            the_answer.clone(),
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "the answer"),
            NodeId::NULL,
            VariableAttributes::default()
                .with_display_name("the answer")
                .with_description("the answer")
                .with_value(Variant::Int32(42)),
        )
        .unwrap();
    assert_eq!(assigned, the_answer);

    browse_objects_folder(&server)
        .assert_good()
        .assert_references_to(&the_answer, 1);
}

#[test]
fn test_add_node_twice_gives_error() {
    let server = Server::new();
    let the_answer = NodeId::string(1, "the.answer");
    let attributes = VariableAttributes::default().with_value(Variant::Int32(42));

    server
        .add_variable_node(
            the_answer.clone(),
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "the answer"),
            NodeId::NULL,
            attributes.clone(),
        )
        .unwrap();

    let result = server.add_variable_node(
        the_answer.clone(),
        &ns0::OBJECTS_FOLDER,
        &ns0::ORGANIZES,
        QualifiedName::new(1, "the answer 2"),
        NodeId::NULL,
        attributes,
    );
    assert_eq!(result, Err(StatusCode::BadNodeIdExists));

    // The browse result is unchanged from after the first add.
    browse_objects_folder(&server)
        .assert_good()
        .assert_references_to(&the_answer, 1);
}

#[test]
fn test_add_node_with_server_assigned_id() {
    let server = Server::new();
    let assigned = server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "anonymous"),
            NodeId::NULL,
            ObjectAttributes::default(),
        )
        .unwrap();

    assert!(!assigned.is_null());
    assert!(server.node_exists(&assigned));
}

// =============================================================================
// Lifecycle hooks
// =============================================================================

#[test]
fn test_constructor_fires_on_add() {
    let server = Server::new();
    let object_type = add_object_type(&server, NodeId::numeric(1, 13_371_337), &ns0::BASE_OBJECT_TYPE, "MyObjectType");

    let constructed = Arc::new(AtomicU32::new(0));
    let counter = constructed.clone();
    server
        .set_lifecycle(
            &object_type,
            Some(Arc::new(move |_instance| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        )
        .unwrap();

    server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "my object"),
            object_type,
            ObjectAttributes::default().with_display_name("my object"),
        )
        .unwrap();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_destructor_fires_on_delete() {
    let server = Server::new();
    let object_type = add_object_type(&server, NodeId::numeric(1, 13_371_337), &ns0::BASE_OBJECT_TYPE, "MyObjectType");

    let destructed = Arc::new(AtomicU32::new(0));
    let counter = destructed.clone();
    server
        .set_lifecycle(
            &object_type,
            None,
            Some(Arc::new(move |_instance, _handle| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .unwrap();

    let object_id = NodeId::numeric(1, 23_372_337);
    server
        .add_object_node(
            object_id.clone(),
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "my object"),
            object_type,
            ObjectAttributes::default().with_display_name("my object"),
        )
        .unwrap();

    server.delete_node(&object_id, true).unwrap();

    assert_eq!(destructed.load(Ordering::SeqCst), 1);
    let result = server.browse(
        0,
        &BrowseDescription::new(ns0::OBJECTS_FOLDER).with_reference_type(ns0::HAS_COMPONENT),
    );
    result.assert_good().assert_references_to(&object_id, 0);
}

#[test]
fn test_destructor_receives_constructor_handle() {
    let server = Server::new();
    let object_type = add_object_type(&server, NodeId::NULL, &ns0::BASE_OBJECT_TYPE, "HandleType");

    let seen = Arc::new(AtomicU32::new(0));
    let sink = seen.clone();
    server
        .set_lifecycle(
            &object_type,
            Some(Arc::new(|_instance| Ok(Some(Box::new(0xC0FFEE_u32))))),
            Some(Arc::new(move |_instance, handle| {
                let handle = handle.expect("handle must be passed to the destructor");
                sink.store(*handle.downcast::<u32>().unwrap(), Ordering::SeqCst);
            })),
        )
        .unwrap();

    let id = server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "carrier"),
            object_type,
            ObjectAttributes::default(),
        )
        .unwrap();
    server.delete_node(&id, true).unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 0xC0FFEE);
}

// =============================================================================
// Delete semantics
// =============================================================================

#[test]
fn test_delete_object_and_references() {
    let server = Server::new();
    let object_id = NodeId::numeric(1, 23_372_337);
    let description =
        BrowseDescription::new(ns0::OBJECTS_FOLDER).with_reference_type(ns0::HAS_COMPONENT);

    let add = |name: &str| {
        server.add_object_node(
            object_id.clone(),
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, name),
            NodeId::NULL,
            ObjectAttributes::default().with_display_name("my object"),
        )
    };

    add("my object").unwrap();
    server
        .browse(0, &description)
        .assert_good()
        .assert_references_to(&object_id, 1);

    // Delete, expect the reference gone.
    server.delete_node(&object_id, true).unwrap();
    server
        .browse(0, &description)
        .assert_good()
        .assert_references_to(&object_id, 0);

    // Add a second time; exactly one reference again.
    add("my object").unwrap();
    server
        .browse(0, &description)
        .assert_good()
        .assert_references_to(&object_id, 1);
}

#[test]
fn test_delete_missing_node() {
    let server = Server::new();
    let result = server.delete_node(&NodeId::numeric(1, 424_242), true);
    assert_eq!(result, Err(StatusCode::BadNodeIdUnknown));
}

// =============================================================================
// References
// =============================================================================

#[test]
fn test_add_reference_is_not_idempotent() {
    let server = Server::new();
    let a = server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "a"),
            NodeId::NULL,
            ObjectAttributes::default(),
        )
        .unwrap();
    let b = server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "b"),
            NodeId::NULL,
            ObjectAttributes::default(),
        )
        .unwrap();

    server
        .add_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true)
        .unwrap();
    let result = server.add_reference(&a, &ns0::ORGANIZES, &b.clone().into_expanded(), true);
    assert_eq!(result, Err(StatusCode::BadDuplicateReferenceNotAllowed));

    // Exactly one reference pair resulted from the two calls.
    let browse = server.browse(
        0,
        &BrowseDescription::new(a).with_reference_type(ns0::ORGANIZES),
    );
    browse.assert_good().assert_references_to(&b, 1);
}

#[test]
fn test_delete_reference_bidirectional() {
    let server = Server::new();
    let a = server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "a"),
            NodeId::NULL,
            ObjectAttributes::default(),
        )
        .unwrap();
    server
        .add_reference(
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            &a.clone().into_expanded(),
            true,
        )
        .unwrap();

    server
        .delete_reference(
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            &a.clone().into_expanded(),
            true,
            true,
        )
        .unwrap();

    browse_objects_folder(&server)
        .assert_good()
        .assert_references_to(&a, 0);
    // The inverse half at the target is gone as well.
    let inverse = server.browse(
        0,
        &BrowseDescription::new(a)
            .with_reference_type(ns0::ORGANIZES)
            .with_direction(trellis_space::BrowseDirection::Inverse),
    );
    inverse
        .assert_good()
        .assert_references_to(&ns0::OBJECTS_FOLDER, 0);
}

// =============================================================================
// Transactionality
// =============================================================================

#[test]
fn test_failed_add_node_leaves_space_unchanged() {
    let server = Server::new();
    let node_count = server.node_count();
    let before = browse_objects_folder(&server);

    // An abstract type definition fails validation.
    let result = server.add_variable_node(
        NodeId::NULL,
        &ns0::OBJECTS_FOLDER,
        &ns0::ORGANIZES,
        QualifiedName::new(1, "v"),
        ns0::BASE_VARIABLE_TYPE,
        VariableAttributes::default(),
    );
    assert_eq!(result, Err(StatusCode::BadTypeDefinitionInvalid));

    assert_eq!(server.node_count(), node_count);
    assert_eq!(browse_objects_folder(&server), before);
}

#[test]
fn test_add_then_delete_round_trip() {
    let server = Server::new();
    let node_count = server.node_count();

    let id = server
        .add_variable_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "ephemeral"),
            NodeId::NULL,
            VariableAttributes::default().with_value(Variant::Int32(1)),
        )
        .unwrap();
    server.delete_node(&id, true).unwrap();

    assert_eq!(server.node_count(), node_count);
    assert!(!server.node_exists(&id));
}
