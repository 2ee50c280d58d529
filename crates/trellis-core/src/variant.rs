// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute values as tagged variants.
//!
//! This module provides [`Variant`], the tagged union over the OPC UA
//! built-in types that carries every Value attribute in the address space,
//! and [`DataValue`], the timestamped wrapper returned by the read service.
//!
//! Scalars and one-dimensional arrays are supported; a scalar has value rank
//! −1, an array value rank ≥ 0.
//!
//! # Examples
//!
//! ```
//! use trellis_core::variant::Variant;
//!
//! let answer = Variant::Int32(42);
//! assert_eq!(answer.as_i64(), Some(42));
//! assert_eq!(answer.type_name(), "Int32");
//! assert!(!answer.is_array());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{ExpandedNodeId, LocalizedText, NodeId, QualifiedName};
use crate::status::StatusCode;

// =============================================================================
// Variant
// =============================================================================

/// A value drawn from the OPC UA built-in types.
///
/// `Variant` is the payload of every Value attribute. The `Empty` variant
/// represents the absence of a value (a freshly created variable without an
/// initial value reads as `Empty`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    /// No value.
    #[default]
    Empty,

    /// Two-state logical value.
    Boolean(bool),

    /// Signed 8-bit integer.
    SByte(i8),

    /// Unsigned 8-bit integer.
    Byte(u8),

    /// Signed 16-bit integer.
    Int16(i16),

    /// Unsigned 16-bit integer.
    UInt16(u16),

    /// Signed 32-bit integer.
    Int32(i32),

    /// Unsigned 32-bit integer.
    UInt32(u32),

    /// Signed 64-bit integer.
    Int64(i64),

    /// Unsigned 64-bit integer.
    UInt64(u64),

    /// IEEE 754 single-precision value.
    Float(f32),

    /// IEEE 754 double-precision value.
    Double(f64),

    /// UTF-8 string.
    String(String),

    /// Instant in time.
    DateTime(DateTime<Utc>),

    /// 128-bit globally unique identifier.
    Guid(Uuid),

    /// Raw byte sequence.
    ByteString(Vec<u8>),

    /// Status code value.
    StatusCode(StatusCode),

    /// Node identifier value.
    NodeId(NodeId),

    /// Expanded node identifier value.
    ExpandedNodeId(ExpandedNodeId),

    /// Qualified name value.
    QualifiedName(QualifiedName),

    /// Localized text value.
    LocalizedText(LocalizedText),

    /// One-dimensional array of variants.
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns the OPC UA type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Empty => "Empty",
            Variant::Boolean(_) => "Boolean",
            Variant::SByte(_) => "SByte",
            Variant::Byte(_) => "Byte",
            Variant::Int16(_) => "Int16",
            Variant::UInt16(_) => "UInt16",
            Variant::Int32(_) => "Int32",
            Variant::UInt32(_) => "UInt32",
            Variant::Int64(_) => "Int64",
            Variant::UInt64(_) => "UInt64",
            Variant::Float(_) => "Float",
            Variant::Double(_) => "Double",
            Variant::String(_) => "String",
            Variant::DateTime(_) => "DateTime",
            Variant::Guid(_) => "Guid",
            Variant::ByteString(_) => "ByteString",
            Variant::StatusCode(_) => "StatusCode",
            Variant::NodeId(_) => "NodeId",
            Variant::ExpandedNodeId(_) => "ExpandedNodeId",
            Variant::QualifiedName(_) => "QualifiedName",
            Variant::LocalizedText(_) => "LocalizedText",
            Variant::Array(_) => "Array",
        }
    }

    /// Returns the node id of the data type this value carries.
    ///
    /// For arrays, the element type of the first element is reported; an
    /// empty array or an empty variant reports `BaseDataType`.
    pub fn data_type_id(&self) -> NodeId {
        let numeric = match self {
            Variant::Boolean(_) => 1,
            Variant::SByte(_) => 2,
            Variant::Byte(_) => 3,
            Variant::Int16(_) => 4,
            Variant::UInt16(_) => 5,
            Variant::Int32(_) => 6,
            Variant::UInt32(_) => 7,
            Variant::Int64(_) => 8,
            Variant::UInt64(_) => 9,
            Variant::Float(_) => 10,
            Variant::Double(_) => 11,
            Variant::String(_) => 12,
            Variant::DateTime(_) => 13,
            Variant::Guid(_) => 14,
            Variant::ByteString(_) => 15,
            Variant::NodeId(_) => 17,
            Variant::ExpandedNodeId(_) => 18,
            Variant::StatusCode(_) => 19,
            Variant::QualifiedName(_) => 20,
            Variant::LocalizedText(_) => 21,
            Variant::Array(elements) => {
                return elements
                    .first()
                    .map(Variant::data_type_id)
                    .unwrap_or(NodeId::numeric(0, 24));
            }
            // BaseDataType
            Variant::Empty => 24,
        };
        NodeId::numeric(0, numeric)
    }

    /// Returns `true` if this is the empty variant.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Returns `true` if this is an array value.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    /// Returns `true` if this is a numeric scalar.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Variant::SByte(_)
                | Variant::Byte(_)
                | Variant::Int16(_)
                | Variant::UInt16(_)
                | Variant::Int32(_)
                | Variant::UInt32(_)
                | Variant::Int64(_)
                | Variant::UInt64(_)
                | Variant::Float(_)
                | Variant::Double(_)
        )
    }

    /// The value rank of this value: −1 for scalars, 1 for arrays.
    #[inline]
    pub fn value_rank(&self) -> i32 {
        if self.is_array() {
            1
        } else {
            -1
        }
    }

    /// Attempts to read this value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to convert this value to an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Variant::SByte(v) => Some(*v as i64),
            Variant::Byte(v) => Some(*v as i64),
            Variant::Int16(v) => Some(*v as i64),
            Variant::UInt16(v) => Some(*v as i64),
            Variant::Int32(v) => Some(*v as i64),
            Variant::UInt32(v) => Some(*v as i64),
            Variant::Int64(v) => Some(*v),
            Variant::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Attempts to convert this value to an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Float(v) => Some(*v as f64),
            Variant::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Attempts to read this value as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to read this value as an array slice.
    #[inline]
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to read this value as a node id.
    #[inline]
    pub fn as_node_id(&self) -> Option<&NodeId> {
        match self {
            Variant::NodeId(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty => write!(f, "(empty)"),
            Variant::Boolean(v) => write!(f, "{}", v),
            Variant::SByte(v) => write!(f, "{}", v),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int16(v) => write!(f, "{}", v),
            Variant::UInt16(v) => write!(f, "{}", v),
            Variant::Int32(v) => write!(f, "{}", v),
            Variant::UInt32(v) => write!(f, "{}", v),
            Variant::Int64(v) => write!(f, "{}", v),
            Variant::UInt64(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::String(v) => write!(f, "{}", v),
            Variant::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Variant::Guid(v) => write!(f, "{}", v),
            Variant::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Variant::StatusCode(v) => write!(f, "{}", v.name()),
            Variant::NodeId(v) => write!(f, "{}", v),
            Variant::ExpandedNodeId(v) => write!(f, "{}", v),
            Variant::QualifiedName(v) => write!(f, "{}", v),
            Variant::LocalizedText(v) => write!(f, "{}", v),
            Variant::Array(v) => write!(f, "[{} elements]", v.len()),
        }
    }
}

macro_rules! impl_from_for_variant {
    ($variant:ident, $type:ty) => {
        impl From<$type> for Variant {
            fn from(v: $type) -> Self {
                Variant::$variant(v)
            }
        }
    };
}

impl_from_for_variant!(Boolean, bool);
impl_from_for_variant!(SByte, i8);
impl_from_for_variant!(Byte, u8);
impl_from_for_variant!(Int16, i16);
impl_from_for_variant!(UInt16, u16);
impl_from_for_variant!(Int32, i32);
impl_from_for_variant!(UInt32, u32);
impl_from_for_variant!(Int64, i64);
impl_from_for_variant!(UInt64, u64);
impl_from_for_variant!(Float, f32);
impl_from_for_variant!(Double, f64);
impl_from_for_variant!(String, String);
impl_from_for_variant!(NodeId, NodeId);
impl_from_for_variant!(QualifiedName, QualifiedName);
impl_from_for_variant!(LocalizedText, LocalizedText);

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// A value with quality and timestamps, as returned by the read service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    /// The value itself.
    pub value: Variant,

    /// Quality of the value.
    #[serde(default)]
    pub status: StatusCode,

    /// When the source produced the value, if known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_timestamp: Option<DateTime<Utc>>,

    /// When the server observed the value.
    pub server_timestamp: DateTime<Utc>,
}

impl DataValue {
    /// Creates a good-quality data value stamped with the current time.
    pub fn new(value: Variant) -> Self {
        Self {
            value,
            status: StatusCode::Good,
            source_timestamp: None,
            server_timestamp: Utc::now(),
        }
    }

    /// Creates a data value with an explicit source timestamp.
    pub fn with_source_timestamp(value: Variant, source_timestamp: DateTime<Utc>) -> Self {
        Self {
            value,
            status: StatusCode::Good,
            source_timestamp: Some(source_timestamp),
            server_timestamp: Utc::now(),
        }
    }

    /// Returns `true` if the value has good quality.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }
}

impl From<Variant> for DataValue {
    fn from(value: Variant) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
