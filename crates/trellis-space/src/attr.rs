// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute read and write services.
//!
//! Reads cover the common header attributes of every class plus the
//! class-specific attributes; asking a node for an attribute its class does
//! not carry yields `BadAttributeIdInvalid`. Writes are restricted to the
//! Value attribute of variables whose access level admits writing.

use chrono::Utc;
use tracing::debug;

use trellis_core::attributes::{access_level, AttributeId};
use trellis_core::ids::NodeId;
use trellis_core::status::{ServiceResult, StatusCode};
use trellis_core::variant::{DataValue, Variant};

use trellis_core::attributes::NodeClass;

use crate::node::NodeBody;
use crate::ns0;
use crate::space::AddressSpace;

impl AddressSpace {
    // =========================================================================
    // Read
    // =========================================================================

    /// Reads one attribute of a node as a timestamped data value.
    pub fn read_attribute(
        &self,
        id: &NodeId,
        attribute: AttributeId,
    ) -> ServiceResult<DataValue> {
        let node = self.store.get(id)?;

        // Common header attributes first.
        let value = match attribute {
            AttributeId::NodeId => Some(Variant::NodeId(node.id.clone())),
            AttributeId::NodeClass => Some(Variant::Int32(node.node_class().value() as i32)),
            AttributeId::BrowseName => Some(Variant::QualifiedName(node.browse_name.clone())),
            AttributeId::DisplayName => Some(Variant::LocalizedText(node.display_name.clone())),
            AttributeId::Description => Some(Variant::LocalizedText(node.description.clone())),
            AttributeId::WriteMask => Some(Variant::UInt32(node.write_mask)),
            AttributeId::UserWriteMask => Some(Variant::UInt32(node.user_write_mask)),
            _ => None,
        };
        if let Some(value) = value {
            return Ok(DataValue::new(value));
        }

        // Class-specific attributes.
        match (&node.body, attribute) {
            (NodeBody::Variable(v), AttributeId::Value) => {
                if v.access_level & access_level::CURRENT_READ == 0 {
                    return Err(StatusCode::BadNotReadable);
                }
                Ok(match v.source_timestamp {
                    Some(ts) => DataValue::with_source_timestamp(v.value.clone(), ts),
                    None => DataValue::new(v.value.clone()),
                })
            }
            (NodeBody::Variable(v), AttributeId::DataType) => {
                Ok(DataValue::new(Variant::NodeId(v.data_type.clone())))
            }
            (NodeBody::Variable(v), AttributeId::ValueRank) => {
                Ok(DataValue::new(Variant::Int32(v.value_rank)))
            }
            (NodeBody::Variable(v), AttributeId::ArrayDimensions) => Ok(DataValue::new(
                Variant::Array(v.array_dimensions.iter().map(|d| Variant::UInt32(*d)).collect()),
            )),
            (NodeBody::Variable(v), AttributeId::AccessLevel) => {
                Ok(DataValue::new(Variant::Byte(v.access_level)))
            }
            (NodeBody::Variable(v), AttributeId::UserAccessLevel) => {
                Ok(DataValue::new(Variant::Byte(v.user_access_level)))
            }
            (NodeBody::Variable(v), AttributeId::MinimumSamplingInterval) => {
                Ok(DataValue::new(Variant::Double(v.minimum_sampling_interval)))
            }
            (NodeBody::Variable(v), AttributeId::Historizing) => {
                Ok(DataValue::new(Variant::Boolean(v.historizing)))
            }

            (NodeBody::VariableType(t), AttributeId::Value) => {
                Ok(DataValue::new(t.value.clone()))
            }
            (NodeBody::VariableType(t), AttributeId::DataType) => {
                Ok(DataValue::new(Variant::NodeId(t.data_type.clone())))
            }
            (NodeBody::VariableType(t), AttributeId::ValueRank) => {
                Ok(DataValue::new(Variant::Int32(t.value_rank)))
            }
            (NodeBody::VariableType(t), AttributeId::IsAbstract) => {
                Ok(DataValue::new(Variant::Boolean(t.is_abstract)))
            }

            (NodeBody::ObjectType(t), AttributeId::IsAbstract) => {
                Ok(DataValue::new(Variant::Boolean(t.is_abstract)))
            }
            (NodeBody::DataType(t), AttributeId::IsAbstract) => {
                Ok(DataValue::new(Variant::Boolean(t.is_abstract)))
            }
            (NodeBody::ReferenceType(t), AttributeId::IsAbstract) => {
                Ok(DataValue::new(Variant::Boolean(t.is_abstract)))
            }
            (NodeBody::ReferenceType(t), AttributeId::Symmetric) => {
                Ok(DataValue::new(Variant::Boolean(t.symmetric)))
            }
            (NodeBody::ReferenceType(t), AttributeId::InverseName) => {
                Ok(DataValue::new(Variant::LocalizedText(t.inverse_name.clone())))
            }

            (NodeBody::Method(m), AttributeId::Executable) => {
                Ok(DataValue::new(Variant::Boolean(m.executable)))
            }
            (NodeBody::Method(m), AttributeId::UserExecutable) => {
                Ok(DataValue::new(Variant::Boolean(m.user_executable)))
            }

            (NodeBody::Object(o), AttributeId::EventNotifier) => {
                Ok(DataValue::new(Variant::Byte(o.event_notifier)))
            }
            (NodeBody::View(v), AttributeId::EventNotifier) => {
                Ok(DataValue::new(Variant::Byte(v.event_notifier)))
            }
            (NodeBody::View(v), AttributeId::ContainsNoLoops) => {
                Ok(DataValue::new(Variant::Boolean(v.contains_no_loops)))
            }

            _ => Err(StatusCode::BadAttributeIdInvalid),
        }
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Writes the Value attribute of a variable.
    ///
    /// Requires the CurrentWrite access bit. When the variable declares a
    /// concrete data type, the new value must carry that type or a subtype
    /// of it; `BadTypeMismatch` otherwise. The source timestamp is stamped
    /// with the write time.
    pub fn write_value(&mut self, id: &NodeId, value: Variant) -> ServiceResult<()> {
        // Type admissibility is checked against the store before borrowing
        // the variable mutably.
        let declared = {
            let node = self.store.get(id)?;
            let Some(variable) = node.as_variable() else {
                return Err(StatusCode::BadAttributeIdInvalid);
            };
            if variable.access_level & access_level::CURRENT_WRITE == 0 {
                return Err(StatusCode::BadNotWritable);
            }
            variable.data_type.clone()
        };

        if !value.is_empty() && !declared.is_null() && declared != ns0::BASE_DATA_TYPE {
            let actual = value.data_type_id();
            if !self.is_subtype_of(&actual, &declared) {
                return Err(StatusCode::BadTypeMismatch);
            }
        }

        let variable = self
            .store
            .get_mut(id)?
            .as_variable_mut()
            .ok_or(StatusCode::BadInternalError)?;
        variable.value = value;
        variable.source_timestamp = Some(Utc::now());
        debug!(node = %id, "value written");
        Ok(())
    }

    // =========================================================================
    // Call
    // =========================================================================

    /// Validates a method call and returns the handler to invoke.
    ///
    /// The method must be a component of the object and executable, and must
    /// carry a handler. Handler invocation happens outside the address-space
    /// capability, so this only resolves.
    pub(crate) fn resolve_method(
        &self,
        object: &NodeId,
        method: &NodeId,
    ) -> ServiceResult<crate::node::MethodHandler> {
        if !self.store.contains(object) {
            return Err(StatusCode::BadNodeIdUnknown);
        }
        let method_node = self.store.get(method)?;
        let Some(body) = method_node.as_method() else {
            return Err(StatusCode::BadNodeClassInvalid);
        };
        let object_node = self.store.get(object)?;
        if !object_node.has_reference(
            &ns0::HAS_COMPONENT,
            &method.clone().into_expanded(),
            true,
        ) {
            return Err(StatusCode::BadNotFound);
        }
        if !body.executable || !body.user_executable {
            return Err(StatusCode::BadNotExecutable);
        }
        body.handler.clone().ok_or(StatusCode::BadInternalError)
    }

    /// Attaches an invocation handler to a method node.
    pub fn set_method_handler(
        &mut self,
        method: &NodeId,
        handler: crate::node::MethodHandler,
    ) -> ServiceResult<()> {
        let node = self.store.get_mut(method)?;
        match &mut node.body {
            NodeBody::Method(m) => {
                m.handler = Some(handler);
                Ok(())
            }
            _ => Err(StatusCode::BadNodeClassInvalid),
        }
    }

    /// Returns whether a node exists and what class it has, for callers that
    /// only need a cheap probe.
    pub fn node_class_of(&self, id: &NodeId) -> Option<NodeClass> {
        self.store.get(id).ok().map(|n| n.node_class())
    }
}

// =============================================================================
// Tests
// =============================================================================
