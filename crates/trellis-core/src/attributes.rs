// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node classes, attribute identifiers, and per-class attribute bundles.
//!
//! The node-management services take the attributes of a new node as one of
//! the bundles in this module, wrapped into [`NodeAttributes`]. The bundles
//! mirror the OPC UA per-class attribute sets; builder-style `with_*` methods
//! keep call sites compact.
//!
//! # Examples
//!
//! ```
//! use trellis_core::attributes::{NodeAttributes, VariableAttributes};
//! use trellis_core::variant::Variant;
//!
//! let attributes = VariableAttributes::default()
//!     .with_display_name("the answer")
//!     .with_value(Variant::Int32(42));
//!
//! let wrapped = NodeAttributes::Variable(attributes);
//! assert_eq!(wrapped.node_class().value(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::{LocalizedText, NodeId};
use crate::variant::Variant;

// =============================================================================
// NodeClass
// =============================================================================

/// The class of a node, with the Part 3 bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// An object instance.
    Object,
    /// A variable holding a value.
    Variable,
    /// A callable method.
    Method,
    /// A type for objects.
    ObjectType,
    /// A type for variables.
    VariableType,
    /// A type defining reference semantics.
    ReferenceType,
    /// A data type.
    DataType,
    /// A view over the address space.
    View,
}

impl NodeClass {
    /// Returns the Part 3 bit value of this class.
    pub const fn value(&self) -> u32 {
        match self {
            NodeClass::Object => 1,
            NodeClass::Variable => 2,
            NodeClass::Method => 4,
            NodeClass::ObjectType => 8,
            NodeClass::VariableType => 16,
            NodeClass::ReferenceType => 32,
            NodeClass::DataType => 64,
            NodeClass::View => 128,
        }
    }

    /// Creates a node class from its bit value.
    pub const fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(NodeClass::Object),
            2 => Some(NodeClass::Variable),
            4 => Some(NodeClass::Method),
            8 => Some(NodeClass::ObjectType),
            16 => Some(NodeClass::VariableType),
            32 => Some(NodeClass::ReferenceType),
            64 => Some(NodeClass::DataType),
            128 => Some(NodeClass::View),
            _ => None,
        }
    }

    /// Returns `true` if this class matches a node-class mask (0 = all).
    #[inline]
    pub const fn matches_mask(&self, mask: u32) -> bool {
        mask == 0 || (mask & self.value()) != 0
    }

    /// Returns `true` if this is one of the type-defining classes.
    #[inline]
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            NodeClass::ObjectType
                | NodeClass::VariableType
                | NodeClass::ReferenceType
                | NodeClass::DataType
        )
    }
}

// =============================================================================
// AttributeId
// =============================================================================

/// Identifier of a node attribute, with the Part 6 numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AttributeId {
    NodeId,
    NodeClass,
    BrowseName,
    DisplayName,
    Description,
    WriteMask,
    UserWriteMask,
    IsAbstract,
    Symmetric,
    InverseName,
    ContainsNoLoops,
    EventNotifier,
    Value,
    DataType,
    ValueRank,
    ArrayDimensions,
    AccessLevel,
    UserAccessLevel,
    MinimumSamplingInterval,
    Historizing,
    Executable,
    UserExecutable,
}

impl AttributeId {
    /// Returns the numeric attribute id.
    pub const fn value(&self) -> u32 {
        match self {
            AttributeId::NodeId => 1,
            AttributeId::NodeClass => 2,
            AttributeId::BrowseName => 3,
            AttributeId::DisplayName => 4,
            AttributeId::Description => 5,
            AttributeId::WriteMask => 6,
            AttributeId::UserWriteMask => 7,
            AttributeId::IsAbstract => 8,
            AttributeId::Symmetric => 9,
            AttributeId::InverseName => 10,
            AttributeId::ContainsNoLoops => 11,
            AttributeId::EventNotifier => 12,
            AttributeId::Value => 13,
            AttributeId::DataType => 14,
            AttributeId::ValueRank => 15,
            AttributeId::ArrayDimensions => 16,
            AttributeId::AccessLevel => 17,
            AttributeId::UserAccessLevel => 18,
            AttributeId::MinimumSamplingInterval => 19,
            AttributeId::Historizing => 20,
            AttributeId::Executable => 21,
            AttributeId::UserExecutable => 22,
        }
    }

    /// Creates an attribute id from its numeric value.
    pub const fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(AttributeId::NodeId),
            2 => Some(AttributeId::NodeClass),
            3 => Some(AttributeId::BrowseName),
            4 => Some(AttributeId::DisplayName),
            5 => Some(AttributeId::Description),
            6 => Some(AttributeId::WriteMask),
            7 => Some(AttributeId::UserWriteMask),
            8 => Some(AttributeId::IsAbstract),
            9 => Some(AttributeId::Symmetric),
            10 => Some(AttributeId::InverseName),
            11 => Some(AttributeId::ContainsNoLoops),
            12 => Some(AttributeId::EventNotifier),
            13 => Some(AttributeId::Value),
            14 => Some(AttributeId::DataType),
            15 => Some(AttributeId::ValueRank),
            16 => Some(AttributeId::ArrayDimensions),
            17 => Some(AttributeId::AccessLevel),
            18 => Some(AttributeId::UserAccessLevel),
            19 => Some(AttributeId::MinimumSamplingInterval),
            20 => Some(AttributeId::Historizing),
            21 => Some(AttributeId::Executable),
            22 => Some(AttributeId::UserExecutable),
            _ => None,
        }
    }
}

// =============================================================================
// Access Levels
// =============================================================================

/// Bit constants for the AccessLevel and UserAccessLevel attributes.
pub mod access_level {
    /// The current value may be read.
    pub const CURRENT_READ: u8 = 0x01;
    /// The current value may be written.
    pub const CURRENT_WRITE: u8 = 0x02;
    /// History of the value may be read.
    pub const HISTORY_READ: u8 = 0x04;
}

// =============================================================================
// Attribute bundles
// =============================================================================

/// Attributes for an Object node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Event notifier bits.
    #[serde(default)]
    pub event_notifier: u8,
}

impl ObjectAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = LocalizedText::english(description);
        self
    }
}

/// Attributes for a Variable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// The value of the variable.
    #[serde(default)]
    pub value: Variant,
    /// Data type of the value; `NULL` derives it from the value.
    #[serde(default)]
    pub data_type: NodeId,
    /// Value rank: −1 scalar, ≥0 array dimensionality.
    #[serde(default = "default_scalar_rank")]
    pub value_rank: i32,
    /// Length of each array dimension, when the value rank is ≥ 0.
    #[serde(default)]
    pub array_dimensions: Vec<u32>,
    /// Access level bits, see [`access_level`].
    #[serde(default = "default_access_level")]
    pub access_level: u8,
    /// Access level bits for the current user.
    #[serde(default = "default_access_level")]
    pub user_access_level: u8,
    /// Fastest supported sampling interval in milliseconds.
    #[serde(default)]
    pub minimum_sampling_interval: f64,
    /// Whether the server records value history.
    #[serde(default)]
    pub historizing: bool,
}

fn default_scalar_rank() -> i32 {
    -1
}

fn default_access_level() -> u8 {
    access_level::CURRENT_READ
}

impl Default for VariableAttributes {
    fn default() -> Self {
        Self {
            display_name: LocalizedText::default(),
            description: LocalizedText::default(),
            write_mask: 0,
            user_write_mask: 0,
            value: Variant::Empty,
            data_type: NodeId::NULL,
            value_rank: -1,
            array_dimensions: Vec::new(),
            access_level: access_level::CURRENT_READ,
            user_access_level: access_level::CURRENT_READ,
            minimum_sampling_interval: 0.0,
            historizing: false,
        }
    }
}

impl VariableAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = LocalizedText::english(description);
        self
    }

    /// Sets the value. The value rank is kept as configured.
    pub fn with_value(mut self, value: impl Into<Variant>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the data type explicitly.
    pub fn with_data_type(mut self, data_type: NodeId) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the value rank.
    pub fn with_value_rank(mut self, rank: i32) -> Self {
        self.value_rank = rank;
        self
    }

    /// Marks the variable writable by clients.
    pub fn writable(mut self) -> Self {
        self.access_level |= access_level::CURRENT_WRITE;
        self.user_access_level |= access_level::CURRENT_WRITE;
        self
    }
}

/// Attributes for an ObjectType node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Whether the type can be instantiated.
    #[serde(default)]
    pub is_abstract: bool,
}

impl ObjectTypeAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }

    /// Marks the type abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Attributes for a VariableType node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableTypeAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Default value for instances.
    #[serde(default)]
    pub value: Variant,
    /// Data type of instance values.
    #[serde(default)]
    pub data_type: NodeId,
    /// Value rank: −1 scalar, ≥0 array dimensionality.
    #[serde(default = "default_scalar_rank")]
    pub value_rank: i32,
    /// Length of each array dimension, when the value rank is ≥ 0.
    #[serde(default)]
    pub array_dimensions: Vec<u32>,
    /// Whether the type can be instantiated.
    #[serde(default)]
    pub is_abstract: bool,
}

impl Default for VariableTypeAttributes {
    fn default() -> Self {
        Self {
            display_name: LocalizedText::default(),
            description: LocalizedText::default(),
            write_mask: 0,
            user_write_mask: 0,
            value: Variant::Empty,
            data_type: NodeId::NULL,
            value_rank: -1,
            array_dimensions: Vec::new(),
            is_abstract: false,
        }
    }
}

impl VariableTypeAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }

    /// Marks the type abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Attributes for a ReferenceType node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTypeAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Whether references of this type can exist.
    #[serde(default)]
    pub is_abstract: bool,
    /// Whether the reference reads the same in both directions.
    #[serde(default)]
    pub symmetric: bool,
    /// Name of the inverse direction, for asymmetric types.
    #[serde(default)]
    pub inverse_name: LocalizedText,
}

impl ReferenceTypeAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }

    /// Sets the inverse name.
    pub fn with_inverse_name(mut self, name: impl Into<String>) -> Self {
        self.inverse_name = LocalizedText::english(name);
        self
    }

    /// Marks the type abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Attributes for a DataType node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTypeAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Whether values of this type can exist.
    #[serde(default)]
    pub is_abstract: bool,
}

impl DataTypeAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }
}

/// Attributes for a Method node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Whether the method may be invoked.
    #[serde(default = "default_executable")]
    pub executable: bool,
    /// Whether the current user may invoke the method.
    #[serde(default = "default_executable")]
    pub user_executable: bool,
}

fn default_executable() -> bool {
    true
}

impl Default for MethodAttributes {
    fn default() -> Self {
        Self {
            display_name: LocalizedText::default(),
            description: LocalizedText::default(),
            write_mask: 0,
            user_write_mask: 0,
            executable: true,
            user_executable: true,
        }
    }
}

impl MethodAttributes {
    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = LocalizedText::english(name);
        self
    }
}

/// Attributes for a View node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewAttributes {
    /// Display name shown to clients.
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Optional description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Which attributes may be modified.
    #[serde(default)]
    pub write_mask: u32,
    /// Which attributes the current user may modify.
    #[serde(default)]
    pub user_write_mask: u32,
    /// Whether the view is loop-free.
    #[serde(default)]
    pub contains_no_loops: bool,
    /// Event notifier bits.
    #[serde(default)]
    pub event_notifier: u8,
}

// =============================================================================
// NodeAttributes
// =============================================================================

/// Attribute bundle for any node class.
///
/// The node-management services receive the attributes of a new node as this
/// tagged union; the variant determines the class of the created node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_class")]
pub enum NodeAttributes {
    /// Attributes of an Object node.
    Object(ObjectAttributes),
    /// Attributes of a Variable node.
    Variable(VariableAttributes),
    /// Attributes of a Method node.
    Method(MethodAttributes),
    /// Attributes of an ObjectType node.
    ObjectType(ObjectTypeAttributes),
    /// Attributes of a VariableType node.
    VariableType(VariableTypeAttributes),
    /// Attributes of a ReferenceType node.
    ReferenceType(ReferenceTypeAttributes),
    /// Attributes of a DataType node.
    DataType(DataTypeAttributes),
    /// Attributes of a View node.
    View(ViewAttributes),
}

impl NodeAttributes {
    /// Returns the node class this bundle belongs to.
    pub const fn node_class(&self) -> NodeClass {
        match self {
            NodeAttributes::Object(_) => NodeClass::Object,
            NodeAttributes::Variable(_) => NodeClass::Variable,
            NodeAttributes::Method(_) => NodeClass::Method,
            NodeAttributes::ObjectType(_) => NodeClass::ObjectType,
            NodeAttributes::VariableType(_) => NodeClass::VariableType,
            NodeAttributes::ReferenceType(_) => NodeClass::ReferenceType,
            NodeAttributes::DataType(_) => NodeClass::DataType,
            NodeAttributes::View(_) => NodeClass::View,
        }
    }

    /// Returns the display name of the bundle.
    pub fn display_name(&self) -> &LocalizedText {
        match self {
            NodeAttributes::Object(a) => &a.display_name,
            NodeAttributes::Variable(a) => &a.display_name,
            NodeAttributes::Method(a) => &a.display_name,
            NodeAttributes::ObjectType(a) => &a.display_name,
            NodeAttributes::VariableType(a) => &a.display_name,
            NodeAttributes::ReferenceType(a) => &a.display_name,
            NodeAttributes::DataType(a) => &a.display_name,
            NodeAttributes::View(a) => &a.display_name,
        }
    }
}

impl From<ObjectAttributes> for NodeAttributes {
    fn from(a: ObjectAttributes) -> Self {
        NodeAttributes::Object(a)
    }
}

impl From<VariableAttributes> for NodeAttributes {
    fn from(a: VariableAttributes) -> Self {
        NodeAttributes::Variable(a)
    }
}

impl From<ObjectTypeAttributes> for NodeAttributes {
    fn from(a: ObjectTypeAttributes) -> Self {
        NodeAttributes::ObjectType(a)
    }
}

impl From<VariableTypeAttributes> for NodeAttributes {
    fn from(a: VariableTypeAttributes) -> Self {
        NodeAttributes::VariableType(a)
    }
}

impl From<ReferenceTypeAttributes> for NodeAttributes {
    fn from(a: ReferenceTypeAttributes) -> Self {
        NodeAttributes::ReferenceType(a)
    }
}

impl From<DataTypeAttributes> for NodeAttributes {
    fn from(a: DataTypeAttributes) -> Self {
        NodeAttributes::DataType(a)
    }
}

impl From<MethodAttributes> for NodeAttributes {
    fn from(a: MethodAttributes) -> Self {
        NodeAttributes::Method(a)
    }
}

impl From<ViewAttributes> for NodeAttributes {
    fn from(a: ViewAttributes) -> Self {
        NodeAttributes::View(a)
    }
}

// =============================================================================
// Tests
// =============================================================================
