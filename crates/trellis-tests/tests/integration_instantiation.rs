// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Type Instantiation Integration Tests
//!
//! Scenarios around materializing instances from object-type hierarchies:
//! mandatory member propagation along the subtype chain, optional members
//! staying absent, most-derived-wins on browse-name collisions, and the
//! per-child instantiation callback.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use trellis_core::attributes::ObjectAttributes;
use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::variant::Variant;
use trellis_space::browse::BrowseDescription;
use trellis_space::{ns0, ModellingRule, Server};

use trellis_tests::common::assertions::BrowseResultAssertions;
use trellis_tests::common::fixtures::{
    add_member_variable, add_object_type, device_pump_types, mark_rule,
};

fn instantiate_pump(server: &Server, types: &NodeId, name: &str) -> NodeId {
    server
        .add_object_node(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, name),
            types.clone(),
            ObjectAttributes::default().with_display_name(name),
        )
        .unwrap()
}

fn component_browse(server: &Server, node: &NodeId) -> trellis_space::BrowseResult {
    server.browse(
        0,
        &BrowseDescription::new(node.clone()).with_reference_type(ns0::HAS_COMPONENT),
    )
}

// =============================================================================
// Mandatory propagation
// =============================================================================

#[test]
fn test_instantiate_pump_type_with_inherited_members() {
    let server = Server::new();
    let types = device_pump_types(&server);

    let pump = instantiate_pump(&server, &types.pump_type, "MyPump");

    // The instance is typed to PumpType.
    let type_definition = server.browse(
        0,
        &BrowseDescription::new(pump.clone()).with_reference_type(ns0::HAS_TYPE_DEFINITION),
    );
    type_definition
        .assert_good()
        .assert_references_to(&types.pump_type, 1);

    // Mandatory members from both levels are present, nothing else.
    let members = component_browse(&server, &pump);
    members
        .assert_good()
        .assert_has_browse_name("ManufacturerName")
        .assert_has_browse_name("Status")
        .assert_lacks_browse_name("MotorRPM")
        .assert_lacks_browse_name("ModelName");
    assert_eq!(members.references.len(), 2);
}

#[test]
fn test_instantiated_members_are_fresh_copies() {
    let server = Server::new();
    let types = device_pump_types(&server);

    let first = instantiate_pump(&server, &types.pump_type, "PumpA");
    let second = instantiate_pump(&server, &types.pump_type, "PumpB");

    let members_of = |pump: &NodeId| -> Vec<NodeId> {
        component_browse(&server, pump)
            .references
            .iter()
            .filter_map(|r| r.node_id.as_local().cloned())
            .collect()
    };

    let first_members = members_of(&first);
    let second_members = members_of(&second);
    for member in &first_members {
        assert!(!second_members.contains(member), "members must not be shared");
        assert_ne!(member, &types.manufacturer_name);
        assert_ne!(member, &types.status);
    }

    // Writing one instance's member does not affect the other.
    let first_status = component_browse(&server, &first)
        .references
        .iter()
        .find(|r| r.browse_name.name == "Status")
        .and_then(|r| r.node_id.as_local().cloned())
        .unwrap();
    server
        .write_value(&first_status, Variant::Boolean(true))
        .unwrap();

    let second_status = component_browse(&server, &second)
        .references
        .iter()
        .find(|r| r.browse_name.name == "Status")
        .and_then(|r| r.node_id.as_local().cloned())
        .unwrap();
    let value = server
        .read_attribute(&second_status, trellis_core::attributes::AttributeId::Value)
        .unwrap();
    assert_eq!(value.value, Variant::Boolean(false));
}

// =============================================================================
// Most-derived wins
// =============================================================================

#[test]
fn test_most_derived_member_suppresses_ancestor() {
    let server = Server::new();
    let types = device_pump_types(&server);

    // PumpType redefines ManufacturerName with its own default value.
    let override_member = add_member_variable(
        &server,
        &types.pump_type,
        "ManufacturerName",
        Variant::String("ACME Pumps".into()),
    );
    mark_rule(&server, &override_member, ModellingRule::Mandatory);

    let pump = instantiate_pump(&server, &types.pump_type, "OverridingPump");
    let members = component_browse(&server, &pump);
    members.assert_good();

    let manufacturer_ids: Vec<NodeId> = members
        .references
        .iter()
        .filter(|r| r.browse_name.name == "ManufacturerName")
        .filter_map(|r| r.node_id.as_local().cloned())
        .collect();
    assert_eq!(manufacturer_ids.len(), 1, "exactly one ManufacturerName");

    // The copy carries the derived default, not the ancestor's.
    let value = server
        .read_attribute(
            &manufacturer_ids[0],
            trellis_core::attributes::AttributeId::Value,
        )
        .unwrap();
    assert_eq!(value.value, Variant::String("ACME Pumps".into()));
}

// =============================================================================
// Nested typed members
// =============================================================================

#[test]
fn test_typed_member_instantiates_recursively() {
    let server = Server::new();

    // MotorType with a mandatory Rpm variable.
    let motor_type = add_object_type(&server, NodeId::NULL, &ns0::BASE_OBJECT_TYPE, "MotorType");
    let rpm = add_member_variable(&server, &motor_type, "Rpm", Variant::Double(0.0));
    mark_rule(&server, &rpm, ModellingRule::Mandatory);

    // RigType with a mandatory Motor member typed to MotorType.
    let rig_type = add_object_type(&server, NodeId::NULL, &ns0::BASE_OBJECT_TYPE, "RigType");
    let motor_member = server
        .add_object_node(
            NodeId::NULL,
            &rig_type,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(1, "Motor"),
            motor_type.clone(),
            ObjectAttributes::default().with_display_name("Motor"),
        )
        .unwrap();
    mark_rule(&server, &motor_member, ModellingRule::Mandatory);

    let rig = instantiate_pump(&server, &rig_type, "Rig1");

    // The rig got a Motor, and the motor got an Rpm.
    let rig_members = component_browse(&server, &rig);
    rig_members.assert_good().assert_has_browse_name("Motor");
    let motor_instance = rig_members
        .references
        .iter()
        .find(|r| r.browse_name.name == "Motor")
        .and_then(|r| r.node_id.as_local().cloned())
        .unwrap();
    assert_ne!(motor_instance, motor_member);

    component_browse(&server, &motor_instance)
        .assert_good()
        .assert_has_browse_name("Rpm");
}

// =============================================================================
// Instantiation callback
// =============================================================================

#[test]
fn test_instantiation_callback_counts_children() {
    let server = Server::new();
    let types = device_pump_types(&server);

    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let mut callback = move |_new: &NodeId, _template: &NodeId| {
        counter.fetch_add(1, Ordering::SeqCst);
    };

    server
        .add_object_node_with_callback(
            NodeId::NULL,
            &ns0::OBJECTS_FOLDER,
            &ns0::ORGANIZES,
            QualifiedName::new(1, "CountedPump"),
            types.pump_type.clone(),
            ObjectAttributes::default(),
            &mut callback,
        )
        .unwrap();

    // Root + ManufacturerName + Status.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Lifecycle along the chain
// =============================================================================

#[test]
fn test_most_derived_constructor_wins_for_instances() {
    let server = Server::new();
    let types = device_pump_types(&server);

    let device_calls = Arc::new(AtomicU32::new(0));
    let pump_calls = Arc::new(AtomicU32::new(0));
    let device_counter = device_calls.clone();
    let pump_counter = pump_calls.clone();
    server
        .set_lifecycle(
            &types.device_type,
            Some(Arc::new(move |_| {
                device_counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        )
        .unwrap();
    server
        .set_lifecycle(
            &types.pump_type,
            Some(Arc::new(move |_| {
                pump_counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        )
        .unwrap();

    instantiate_pump(&server, &types.pump_type, "LifecyclePump");

    assert_eq!(pump_calls.load(Ordering::SeqCst), 1);
    assert_eq!(device_calls.load(Ordering::SeqCst), 0, "ancestor hook must not fire");

    // A plain DeviceType instance still uses the DeviceType hook.
    instantiate_pump(&server, &types.device_type, "PlainDevice");
    assert_eq!(device_calls.load(Ordering::SeqCst), 1);
}
