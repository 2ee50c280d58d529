// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The standard namespace (namespace 0) bootstrap.
//!
//! On construction the server populates a read-only standard namespace with
//! the base reference types, the base node types, the base data types, and
//! the folder skeleton. The numeric identifiers follow the published OPC UA
//! Part 6 bindings, so browsers that know the standard namespace can
//! navigate a Trellis server without translation.

use trellis_core::attributes::{
    DataTypeAttributes, NodeAttributes, ObjectAttributes, ObjectTypeAttributes,
    ReferenceTypeAttributes, VariableTypeAttributes,
};
use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::status::ServiceResult;

use crate::node::Node;
use crate::space::AddressSpace;

// =============================================================================
// Reference types
// =============================================================================

/// `References` (i=31): abstract root of all reference types.
pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
/// `NonHierarchicalReferences` (i=32).
pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 32);
/// `HierarchicalReferences` (i=33).
pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
/// `HasChild` (i=34).
pub const HAS_CHILD: NodeId = NodeId::numeric(0, 34);
/// `Organizes` (i=35).
pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
/// `HasModellingRule` (i=37).
pub const HAS_MODELLING_RULE: NodeId = NodeId::numeric(0, 37);
/// `HasTypeDefinition` (i=40).
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
/// `Aggregates` (i=44).
pub const AGGREGATES: NodeId = NodeId::numeric(0, 44);
/// `HasSubtype` (i=45): forms the type hierarchy.
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
/// `HasProperty` (i=46).
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
/// `HasComponent` (i=47).
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);

// =============================================================================
// Object and variable types
// =============================================================================

/// `BaseObjectType` (i=58).
pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
/// `FolderType` (i=61).
pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
/// `ModellingRuleType` (i=77).
pub const MODELLING_RULE_TYPE: NodeId = NodeId::numeric(0, 77);
/// `BaseVariableType` (i=62): abstract.
pub const BASE_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 62);
/// `BaseDataVariableType` (i=63).
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
/// `PropertyType` (i=68).
pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);

// =============================================================================
// Modelling rules
// =============================================================================

/// `ModellingRule_Mandatory` (i=78).
pub const MODELLING_RULE_MANDATORY: NodeId = NodeId::numeric(0, 78);
/// `ModellingRule_Optional` (i=80).
pub const MODELLING_RULE_OPTIONAL: NodeId = NodeId::numeric(0, 80);
/// `ModellingRule_OptionalPlaceholder` (i=11508).
pub const MODELLING_RULE_OPTIONAL_PLACEHOLDER: NodeId = NodeId::numeric(0, 11_508);
/// `ModellingRule_MandatoryPlaceholder` (i=11510).
pub const MODELLING_RULE_MANDATORY_PLACEHOLDER: NodeId = NodeId::numeric(0, 11_510);

// =============================================================================
// Data types
// =============================================================================

/// `BaseDataType` (i=24): abstract root of the data type hierarchy.
pub const BASE_DATA_TYPE: NodeId = NodeId::numeric(0, 24);
/// `Number` (i=26).
pub const NUMBER: NodeId = NodeId::numeric(0, 26);
/// `Integer` (i=27).
pub const INTEGER: NodeId = NodeId::numeric(0, 27);
/// `UInteger` (i=28).
pub const UINTEGER: NodeId = NodeId::numeric(0, 28);
/// `Enumeration` (i=29).
pub const ENUMERATION: NodeId = NodeId::numeric(0, 29);
/// `Structure` (i=22).
pub const STRUCTURE: NodeId = NodeId::numeric(0, 22);
/// `Boolean` (i=1).
pub const BOOLEAN: NodeId = NodeId::numeric(0, 1);
/// `Double` (i=11).
pub const DOUBLE: NodeId = NodeId::numeric(0, 11);
/// `Int32` (i=6).
pub const INT32: NodeId = NodeId::numeric(0, 6);
/// `String` (i=12).
pub const STRING: NodeId = NodeId::numeric(0, 12);

// =============================================================================
// Folders and well-known objects
// =============================================================================

/// `RootFolder` (i=84).
pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);
/// `ObjectsFolder` (i=85).
pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);
/// `TypesFolder` (i=86).
pub const TYPES_FOLDER: NodeId = NodeId::numeric(0, 86);
/// `ViewsFolder` (i=87).
pub const VIEWS_FOLDER: NodeId = NodeId::numeric(0, 87);
/// `ObjectTypesFolder` (i=88).
pub const OBJECT_TYPES_FOLDER: NodeId = NodeId::numeric(0, 88);
/// `VariableTypesFolder` (i=89).
pub const VARIABLE_TYPES_FOLDER: NodeId = NodeId::numeric(0, 89);
/// `DataTypesFolder` (i=90).
pub const DATA_TYPES_FOLDER: NodeId = NodeId::numeric(0, 90);
/// `ReferenceTypesFolder` (i=91).
pub const REFERENCE_TYPES_FOLDER: NodeId = NodeId::numeric(0, 91);
/// The `Server` object (i=2253).
pub const SERVER: NodeId = NodeId::numeric(0, 2253);

// =============================================================================
// Bootstrap
// =============================================================================

/// Populates the standard namespace.
///
/// Called once from [`AddressSpace::new`]; failures indicate an internal
/// inconsistency, never caller error.
pub(crate) fn bootstrap(space: &mut AddressSpace) -> ServiceResult<()> {
    add_reference_types(space)?;
    add_node_types(space)?;
    add_data_types(space)?;
    add_folders(space)?;
    add_modelling_rules(space)?;
    add_server_object(space)?;
    Ok(())
}

fn insert(space: &mut AddressSpace, id: NodeId, name: &str, attributes: NodeAttributes) -> ServiceResult<()> {
    let node = Node::from_attributes(id, QualifiedName::standard(name), attributes);
    space.store.insert(node)?;
    Ok(())
}

fn subtype(space: &mut AddressSpace, supertype: &NodeId, subtype: &NodeId) -> ServiceResult<()> {
    space.add_reference_pair(supertype, &HAS_SUBTYPE, &subtype.clone().into_expanded(), true)
}

fn organize(space: &mut AddressSpace, parent: &NodeId, child: &NodeId) -> ServiceResult<()> {
    space.add_reference_pair(parent, &ORGANIZES, &child.clone().into_expanded(), true)
}

fn type_definition(space: &mut AddressSpace, instance: &NodeId, type_id: &NodeId) -> ServiceResult<()> {
    space.add_reference_pair(
        instance,
        &HAS_TYPE_DEFINITION,
        &type_id.clone().into_expanded(),
        true,
    )
}

fn add_reference_types(space: &mut AddressSpace) -> ServiceResult<()> {
    let abstract_type = |name: &str| {
        NodeAttributes::ReferenceType(
            ReferenceTypeAttributes::default()
                .with_display_name(name)
                .abstract_type(),
        )
    };
    let concrete = |name: &str, inverse: &str| {
        NodeAttributes::ReferenceType(
            ReferenceTypeAttributes::default()
                .with_display_name(name)
                .with_inverse_name(inverse),
        )
    };

    insert(space, REFERENCES, "References", abstract_type("References"))?;
    insert(
        space,
        HIERARCHICAL_REFERENCES,
        "HierarchicalReferences",
        abstract_type("HierarchicalReferences"),
    )?;
    insert(
        space,
        NON_HIERARCHICAL_REFERENCES,
        "NonHierarchicalReferences",
        abstract_type("NonHierarchicalReferences"),
    )?;
    insert(space, HAS_CHILD, "HasChild", abstract_type("HasChild"))?;
    insert(space, AGGREGATES, "Aggregates", abstract_type("Aggregates"))?;
    insert(space, ORGANIZES, "Organizes", concrete("Organizes", "OrganizedBy"))?;
    insert(space, HAS_SUBTYPE, "HasSubtype", concrete("HasSubtype", "SubtypeOf"))?;
    insert(space, HAS_PROPERTY, "HasProperty", concrete("HasProperty", "PropertyOf"))?;
    insert(space, HAS_COMPONENT, "HasComponent", concrete("HasComponent", "ComponentOf"))?;
    insert(
        space,
        HAS_MODELLING_RULE,
        "HasModellingRule",
        concrete("HasModellingRule", "ModellingRuleOf"),
    )?;
    insert(
        space,
        HAS_TYPE_DEFINITION,
        "HasTypeDefinition",
        concrete("HasTypeDefinition", "TypeDefinitionOf"),
    )?;

    subtype(space, &REFERENCES, &HIERARCHICAL_REFERENCES)?;
    subtype(space, &REFERENCES, &NON_HIERARCHICAL_REFERENCES)?;
    subtype(space, &HIERARCHICAL_REFERENCES, &HAS_CHILD)?;
    subtype(space, &HIERARCHICAL_REFERENCES, &ORGANIZES)?;
    subtype(space, &HAS_CHILD, &AGGREGATES)?;
    subtype(space, &HAS_CHILD, &HAS_SUBTYPE)?;
    subtype(space, &AGGREGATES, &HAS_PROPERTY)?;
    subtype(space, &AGGREGATES, &HAS_COMPONENT)?;
    subtype(space, &NON_HIERARCHICAL_REFERENCES, &HAS_MODELLING_RULE)?;
    subtype(space, &NON_HIERARCHICAL_REFERENCES, &HAS_TYPE_DEFINITION)?;
    Ok(())
}

fn add_node_types(space: &mut AddressSpace) -> ServiceResult<()> {
    let object_type = |name: &str, is_abstract: bool| {
        let mut attributes = ObjectTypeAttributes::default().with_display_name(name);
        if is_abstract {
            attributes = attributes.abstract_type();
        }
        NodeAttributes::ObjectType(attributes)
    };
    let variable_type = |name: &str, is_abstract: bool| {
        let mut attributes = VariableTypeAttributes::default().with_display_name(name);
        if is_abstract {
            attributes = attributes.abstract_type();
        }
        NodeAttributes::VariableType(attributes)
    };

    insert(space, BASE_OBJECT_TYPE, "BaseObjectType", object_type("BaseObjectType", false))?;
    insert(space, FOLDER_TYPE, "FolderType", object_type("FolderType", false))?;
    insert(
        space,
        MODELLING_RULE_TYPE,
        "ModellingRuleType",
        object_type("ModellingRuleType", false),
    )?;
    subtype(space, &BASE_OBJECT_TYPE, &FOLDER_TYPE)?;
    subtype(space, &BASE_OBJECT_TYPE, &MODELLING_RULE_TYPE)?;

    insert(
        space,
        BASE_VARIABLE_TYPE,
        "BaseVariableType",
        variable_type("BaseVariableType", true),
    )?;
    insert(
        space,
        BASE_DATA_VARIABLE_TYPE,
        "BaseDataVariableType",
        variable_type("BaseDataVariableType", false),
    )?;
    insert(space, PROPERTY_TYPE, "PropertyType", variable_type("PropertyType", false))?;
    subtype(space, &BASE_VARIABLE_TYPE, &BASE_DATA_VARIABLE_TYPE)?;
    subtype(space, &BASE_VARIABLE_TYPE, &PROPERTY_TYPE)?;
    Ok(())
}

fn add_data_types(space: &mut AddressSpace) -> ServiceResult<()> {
    let data_type = |name: &str, is_abstract: bool| {
        let mut attributes = DataTypeAttributes::default().with_display_name(name);
        attributes.is_abstract = is_abstract;
        NodeAttributes::DataType(attributes)
    };

    insert(space, BASE_DATA_TYPE, "BaseDataType", data_type("BaseDataType", true))?;

    // Leaves directly under BaseDataType.
    let leaves: &[(u32, &str)] = &[
        (1, "Boolean"),
        (12, "String"),
        (13, "DateTime"),
        (14, "Guid"),
        (15, "ByteString"),
        (16, "XmlElement"),
        (17, "NodeId"),
        (18, "ExpandedNodeId"),
        (19, "StatusCode"),
        (20, "QualifiedName"),
        (21, "LocalizedText"),
    ];
    for &(id, name) in leaves {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, false))?;
        subtype(space, &BASE_DATA_TYPE, &node_id)?;
    }

    // Abstract groupings.
    for (id, name) in [(22, "Structure"), (26, "Number"), (29, "Enumeration")] {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, true))?;
        subtype(space, &BASE_DATA_TYPE, &node_id)?;
    }
    for (id, name) in [(27, "Integer"), (28, "UInteger")] {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, true))?;
        subtype(space, &NUMBER, &node_id)?;
    }

    // Concrete numerics.
    for (id, name) in [(10, "Float"), (11, "Double")] {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, false))?;
        subtype(space, &NUMBER, &node_id)?;
    }
    for (id, name) in [(2, "SByte"), (4, "Int16"), (6, "Int32"), (8, "Int64")] {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, false))?;
        subtype(space, &INTEGER, &node_id)?;
    }
    for (id, name) in [(3, "Byte"), (5, "UInt16"), (7, "UInt32"), (9, "UInt64")] {
        let node_id = NodeId::numeric(0, id);
        insert(space, node_id.clone(), name, data_type(name, false))?;
        subtype(space, &UINTEGER, &node_id)?;
    }
    Ok(())
}

fn add_folders(space: &mut AddressSpace) -> ServiceResult<()> {
    let folders: &[(NodeId, &str)] = &[
        (ROOT_FOLDER, "Root"),
        (OBJECTS_FOLDER, "Objects"),
        (TYPES_FOLDER, "Types"),
        (VIEWS_FOLDER, "Views"),
        (OBJECT_TYPES_FOLDER, "ObjectTypes"),
        (VARIABLE_TYPES_FOLDER, "VariableTypes"),
        (DATA_TYPES_FOLDER, "DataTypes"),
        (REFERENCE_TYPES_FOLDER, "ReferenceTypes"),
    ];
    for (id, name) in folders {
        insert(
            space,
            id.clone(),
            name,
            NodeAttributes::Object(ObjectAttributes::default().with_display_name(*name)),
        )?;
        type_definition(space, id, &FOLDER_TYPE)?;
    }

    organize(space, &ROOT_FOLDER, &OBJECTS_FOLDER)?;
    organize(space, &ROOT_FOLDER, &TYPES_FOLDER)?;
    organize(space, &ROOT_FOLDER, &VIEWS_FOLDER)?;
    organize(space, &TYPES_FOLDER, &OBJECT_TYPES_FOLDER)?;
    organize(space, &TYPES_FOLDER, &VARIABLE_TYPES_FOLDER)?;
    organize(space, &TYPES_FOLDER, &DATA_TYPES_FOLDER)?;
    organize(space, &TYPES_FOLDER, &REFERENCE_TYPES_FOLDER)?;

    // Anchor the type forests under their folders.
    organize(space, &OBJECT_TYPES_FOLDER, &BASE_OBJECT_TYPE)?;
    organize(space, &VARIABLE_TYPES_FOLDER, &BASE_VARIABLE_TYPE)?;
    organize(space, &DATA_TYPES_FOLDER, &BASE_DATA_TYPE)?;
    organize(space, &REFERENCE_TYPES_FOLDER, &REFERENCES)?;
    Ok(())
}

fn add_modelling_rules(space: &mut AddressSpace) -> ServiceResult<()> {
    let rules: &[(NodeId, &str)] = &[
        (MODELLING_RULE_MANDATORY, "Mandatory"),
        (MODELLING_RULE_OPTIONAL, "Optional"),
        (MODELLING_RULE_MANDATORY_PLACEHOLDER, "MandatoryPlaceholder"),
        (MODELLING_RULE_OPTIONAL_PLACEHOLDER, "OptionalPlaceholder"),
    ];
    for (id, name) in rules {
        insert(
            space,
            id.clone(),
            name,
            NodeAttributes::Object(ObjectAttributes::default().with_display_name(*name)),
        )?;
        type_definition(space, id, &MODELLING_RULE_TYPE)?;
        // Keep the rule objects hierarchically reachable.
        organize(space, &TYPES_FOLDER, id)?;
    }
    Ok(())
}

fn add_server_object(space: &mut AddressSpace) -> ServiceResult<()> {
    insert(
        space,
        SERVER,
        "Server",
        NodeAttributes::Object(ObjectAttributes::default().with_display_name("Server")),
    )?;
    type_definition(space, &SERVER, &BASE_OBJECT_TYPE)?;
    organize(space, &OBJECTS_FOLDER, &SERVER)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
