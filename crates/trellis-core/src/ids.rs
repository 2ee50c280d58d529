// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Namespaced identifiers for the address space.
//!
//! This module provides the identifier types every node and reference in the
//! address space is keyed by:
//!
//! - **NodeId**: namespace index plus a numeric, string, GUID, or opaque
//!   identifier; total equality, hashing, and ordering
//! - **ExpandedNodeId**: a NodeId optionally qualified by a namespace URI and
//!   a server index, used for reference targets that may live outside the
//!   local server
//! - **QualifiedName**: namespace-qualified browse name
//! - **LocalizedText**: locale-tagged human-readable text
//!
//! # Examples
//!
//! ```
//! use trellis_core::ids::NodeId;
//!
//! let numeric = NodeId::numeric(0, 85);
//! assert_eq!(numeric.to_string(), "ns=0;i=85");
//!
//! let parsed: NodeId = "ns=1;s=Pump.Status".parse().unwrap();
//! assert_eq!(parsed, NodeId::string(1, "Pump.Status"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::StatusCode;

// =============================================================================
// NodeId
// =============================================================================

/// A namespaced node identifier.
///
/// A `NodeId` uniquely identifies a node within the address space. It pairs a
/// namespace index with one of four identifier variants. The distinguished
/// [`NodeId::NULL`] value (`ns=0;i=0`) means "server-assigned": services that
/// receive it allocate a fresh identifier in the server namespace.
///
/// Identifiers are immutable once a node is inserted into the store.
///
/// # Examples
///
/// ```
/// use trellis_core::ids::NodeId;
///
/// let id = NodeId::string(1, "the.answer");
/// assert!(id.is_string());
/// assert!(!id.is_null());
/// assert_eq!(NodeId::NULL.to_string(), "ns=0;i=0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace: u16,

    /// The identifier within the namespace.
    pub identifier: Identifier,
}

impl NodeId {
    /// The null node identifier (`ns=0;i=0`), meaning "server-assigned".
    pub const NULL: NodeId = NodeId::numeric(0, 0);

    /// Creates a numeric node identifier.
    #[inline]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Creates a string node identifier.
    #[inline]
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// Creates a GUID node identifier.
    #[inline]
    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node identifier.
    #[inline]
    pub fn opaque(namespace: u16, value: Vec<u8>) -> Self {
        Self {
            namespace,
            identifier: Identifier::Opaque(value),
        }
    }

    /// Returns `true` if this is the null identifier (`ns=0;i=0`).
    ///
    /// The null identifier is only equal to itself.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && matches!(self.identifier, Identifier::Numeric(0))
    }

    /// Returns `true` if this identifier lives in the standard namespace.
    #[inline]
    pub const fn is_standard(&self) -> bool {
        self.namespace == 0
    }

    /// Returns `true` if this is a numeric identifier.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.identifier, Identifier::Numeric(_))
    }

    /// Returns `true` if this is a string identifier.
    #[inline]
    pub const fn is_string(&self) -> bool {
        matches!(self.identifier, Identifier::String(_))
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            Identifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Wraps this identifier into a local [`ExpandedNodeId`].
    #[inline]
    pub fn into_expanded(self) -> ExpandedNodeId {
        ExpandedNodeId::local(self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for NodeId {
    /// Formats as `ns=<n>;<tag>=<value>`, always including the namespace part.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns={};{}", self.namespace, self.identifier)
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    /// Lexicographic order: namespace, then variant tag, then variant payload.
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl FromStr for NodeId {
    type Err = StatusCode;

    /// Parses the textual form `ns=<n>;<tag>=<value>`.
    ///
    /// The namespace part may be omitted, in which case namespace 0 is
    /// assumed. Supported tags: `i` (numeric), `s` (string), `g` (GUID),
    /// `b` (opaque, base64).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, id_str) = rest
                    .split_once(';')
                    .ok_or(StatusCode::BadNodeIdInvalid)?;
                let ns: u16 = ns_str.parse().map_err(|_| StatusCode::BadNodeIdInvalid)?;
                (ns, id_str)
            }
            None => (0, s),
        };

        let identifier = if let Some(v) = identifier_part.strip_prefix("i=") {
            Identifier::Numeric(v.parse().map_err(|_| StatusCode::BadNodeIdInvalid)?)
        } else if let Some(v) = identifier_part.strip_prefix("s=") {
            Identifier::String(v.to_string())
        } else if let Some(v) = identifier_part.strip_prefix("g=") {
            Identifier::Guid(Uuid::parse_str(v).map_err(|_| StatusCode::BadNodeIdInvalid)?)
        } else if let Some(v) = identifier_part.strip_prefix("b=") {
            Identifier::Opaque(BASE64.decode(v).map_err(|_| StatusCode::BadNodeIdInvalid)?)
        } else {
            return Err(StatusCode::BadNodeIdInvalid);
        };

        Ok(Self { namespace, identifier })
    }
}

// =============================================================================
// Identifier
// =============================================================================

/// The identifier variant of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Identifier {
    /// Numeric identifier (used by the standard namespace).
    Numeric(u32),

    /// String identifier (human-readable).
    String(String),

    /// 128-bit GUID identifier.
    Guid(Uuid),

    /// Opaque byte-string identifier.
    Opaque(Vec<u8>),
}

impl Identifier {
    /// Rank of the variant tag, used for total ordering.
    const fn tag_rank(&self) -> u8 {
        match self {
            Identifier::Numeric(_) => 0,
            Identifier::String(_) => 1,
            Identifier::Guid(_) => 2,
            Identifier::Opaque(_) => 3,
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::String(a), Identifier::String(b)) => a.cmp(b),
            (Identifier::Guid(a), Identifier::Guid(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Identifier::Opaque(a), Identifier::Opaque(b)) => a.cmp(b),
            (a, b) => a.tag_rank().cmp(&b.tag_rank()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", v),
            Identifier::String(v) => write!(f, "s={}", v),
            Identifier::Guid(v) => write!(f, "g={}", v),
            Identifier::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// ExpandedNodeId
// =============================================================================

/// A node identifier that may point outside the local server.
///
/// Reference targets are stored as expanded identifiers: a plain [`NodeId`]
/// optionally qualified by a namespace URI and a server index. Targets with a
/// URI or a non-zero server index are *external*; the store does not maintain
/// inverse references for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedNodeId {
    /// The identifier within the addressed server.
    pub node_id: NodeId,

    /// Namespace URI, set when the namespace index is not meaningful locally.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub namespace_uri: Option<String>,

    /// Index into the server table; 0 addresses the local server.
    #[serde(default)]
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// Creates an expanded identifier addressing the local server.
    #[inline]
    pub fn local(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }

    /// Creates a numeric expanded identifier addressing the local server.
    #[inline]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            node_id: NodeId::numeric(namespace, value),
            namespace_uri: None,
            server_index: 0,
        }
    }

    /// Returns `true` if this identifier addresses a node on the local server.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.namespace_uri.is_none() && self.server_index == 0
    }

    /// Returns the local [`NodeId`] if this identifier addresses this server.
    #[inline]
    pub fn as_local(&self) -> Option<&NodeId> {
        if self.is_local() {
            Some(&self.node_id)
        } else {
            None
        }
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::local(node_id)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        if let Some(ref uri) = self.namespace_uri {
            write!(f, "nsu={};{}", uri, self.node_id.identifier)
        } else {
            write!(f, "{}", self.node_id)
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// A namespace-qualified name.
///
/// Qualified names carry the browse name of a node within its parent. The
/// browse name must be unique among siblings reached through the same
/// hierarchical reference type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index of the name.
    pub namespace: u16,

    /// The name itself.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    #[inline]
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// Creates a qualified name in the standard namespace.
    #[inline]
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }

    /// Returns `true` if the name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace, self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    /// Parses `<ns>:<name>`, defaulting to namespace 0 when no prefix parses.
    fn from(s: &str) -> Self {
        if let Some((ns, name)) = s.split_once(':') {
            if let Ok(index) = ns.parse::<u16>() {
                return Self::new(index, name);
            }
        }
        Self::standard(s)
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Human-readable text tagged with a locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale identifier, e.g. `en-US`. Empty means unspecified.
    #[serde(default)]
    pub locale: String,

    /// The text content.
    pub text: String,
}

impl LocalizedText {
    /// Creates localized text with an explicit locale.
    #[inline]
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Creates English (`en-US`) localized text.
    #[inline]
    pub fn english(text: impl Into<String>) -> Self {
        Self::new("en-US", text)
    }

    /// Returns `true` if the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        Self {
            locale: String::new(),
            text: s.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
