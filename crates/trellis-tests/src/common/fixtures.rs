// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Reusable address-space fixtures.
//!
//! The device/pump hierarchy mirrors the classic object-type tutorial: a
//! `DeviceType` with a mandatory `ManufacturerName` and an unconstrained
//! `ModelName`, and a `PumpType` subtype adding a mandatory `Status` and an
//! optional `MotorRPM`.

use trellis_core::attributes::{ObjectTypeAttributes, VariableAttributes};
use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::variant::Variant;
use trellis_space::{ns0, ModellingRule, Server};

/// Namespace index used for fixture nodes.
pub const TEST_NAMESPACE: u16 = 1;

// =============================================================================
// Device / pump type hierarchy
// =============================================================================

/// Node ids of the device/pump fixture types.
#[derive(Debug, Clone)]
pub struct DevicePumpTypes {
    /// `DeviceType`, subtype of `BaseObjectType`.
    pub device_type: NodeId,
    /// Mandatory variable member of `DeviceType`.
    pub manufacturer_name: NodeId,
    /// Unconstrained variable member of `DeviceType`.
    pub model_name: NodeId,
    /// `PumpType`, subtype of `DeviceType`.
    pub pump_type: NodeId,
    /// Mandatory variable member of `PumpType`.
    pub status: NodeId,
    /// Optional variable member of `PumpType`.
    pub motor_rpm: NodeId,
}

/// Builds the device/pump type hierarchy on the given server.
pub fn device_pump_types(server: &Server) -> DevicePumpTypes {
    let device_type = add_object_type(server, NodeId::NULL, &ns0::BASE_OBJECT_TYPE, "DeviceType");
    let manufacturer_name =
        add_member_variable(server, &device_type, "ManufacturerName", Variant::String("".into()));
    mark_rule(server, &manufacturer_name, ModellingRule::Mandatory);
    let model_name =
        add_member_variable(server, &device_type, "ModelName", Variant::String("".into()));

    let pump_type = add_object_type(server, NodeId::NULL, &device_type, "PumpType");
    let status = add_member_variable(server, &pump_type, "Status", Variant::Boolean(false));
    mark_rule(server, &status, ModellingRule::Mandatory);
    let motor_rpm = add_member_variable(server, &pump_type, "MotorRPM", Variant::Double(0.0));
    mark_rule(server, &motor_rpm, ModellingRule::Optional);

    DevicePumpTypes {
        device_type,
        manufacturer_name,
        model_name,
        pump_type,
        status,
        motor_rpm,
    }
}

// =============================================================================
// Building blocks
// =============================================================================

/// Adds an object type under a supertype.
pub fn add_object_type(
    server: &Server,
    requested_id: NodeId,
    supertype: &NodeId,
    name: &str,
) -> NodeId {
    server
        .add_object_type_node(
            requested_id,
            supertype,
            &ns0::HAS_SUBTYPE,
            QualifiedName::new(TEST_NAMESPACE, name),
            ObjectTypeAttributes::default().with_display_name(name),
        )
        .unwrap_or_else(|status| panic!("failed to add object type '{}': {}", name, status))
}

/// Adds a variable member to a type through `HasComponent`.
pub fn add_member_variable(
    server: &Server,
    type_id: &NodeId,
    name: &str,
    value: Variant,
) -> NodeId {
    server
        .add_variable_node(
            NodeId::NULL,
            type_id,
            &ns0::HAS_COMPONENT,
            QualifiedName::new(TEST_NAMESPACE, name),
            NodeId::NULL,
            VariableAttributes::default()
                .with_display_name(name)
                .with_value(value)
                .writable(),
        )
        .unwrap_or_else(|status| panic!("failed to add member '{}': {}", name, status))
}

/// Attaches a modelling rule to a type member.
pub fn mark_rule(server: &Server, member: &NodeId, rule: ModellingRule) {
    server
        .add_reference(
            member,
            &ns0::HAS_MODELLING_RULE,
            &rule.node_id().into_expanded(),
            true,
        )
        .unwrap_or_else(|status| panic!("failed to attach modelling rule: {}", status));
}
