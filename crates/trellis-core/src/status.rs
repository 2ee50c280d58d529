// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Status codes aligned with the OPC UA code space.
//!
//! Every service operation reports its outcome as a [`StatusCode`]. The
//! enumeration carries the subset of the OPC UA Part 6 code space the address
//! space core can produce, with the published numeric values preserved so the
//! codes can cross the wire unchanged.
//!
//! The taxonomy follows three groups:
//!
//! - **Validation failures**: caller errors that leave the address space
//!   untouched (`BadNodeIdExists`, `BadParentNodeIdInvalid`, ...)
//! - **Resource failures**: transient conditions (`BadOutOfMemory`)
//! - **Invariant violations**: bugs, reported and logged (`BadInternalError`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// StatusCode
// =============================================================================

/// Outcome of a service operation.
///
/// `StatusCode` is both the error type of the service layer (it derives
/// [`std::error::Error`] through `thiserror`) and a wire value: [`Self::code`]
/// yields the numeric OPC UA status code.
///
/// # Examples
///
/// ```
/// use trellis_core::status::StatusCode;
///
/// assert!(StatusCode::Good.is_good());
/// assert_eq!(StatusCode::BadNodeIdExists.code(), 0x805E_0000);
/// assert_eq!(StatusCode::from_code(0x805E_0000), Some(StatusCode::BadNodeIdExists));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error, Default,
)]
pub enum StatusCode {
    /// The operation succeeded.
    #[default]
    #[error("The operation succeeded")]
    Good,

    /// An unexpected error occurred.
    #[error("An unexpected error occurred")]
    BadUnexpectedError,

    /// An internal error occurred as a result of a programming or
    /// configuration error.
    #[error("An internal error occurred")]
    BadInternalError,

    /// Not enough memory to complete the operation.
    #[error("Not enough memory to complete the operation")]
    BadOutOfMemory,

    /// The operation timed out.
    #[error("The operation timed out")]
    BadTimeout,

    /// The request message size exceeds limits set by the server.
    #[error("The request message size exceeds limits set by the server")]
    BadRequestTooLarge,

    /// The node id syntax is invalid.
    #[error("The node id is invalid")]
    BadNodeIdInvalid,

    /// The node id refers to a node that does not exist.
    #[error("The node id refers to a node that does not exist")]
    BadNodeIdUnknown,

    /// The requested node id is already used by another node.
    #[error("The requested node id is already used by another node")]
    BadNodeIdExists,

    /// The node class is not valid for the operation.
    #[error("The node class is not valid")]
    BadNodeClassInvalid,

    /// The browse name is invalid.
    #[error("The browse name is invalid")]
    BadBrowseNameInvalid,

    /// The browse name is not unique among nodes that share the same
    /// relationship with the parent.
    #[error("The browse name is not unique among siblings")]
    BadBrowseNameDuplicated,

    /// The node attributes are not valid for the node class.
    #[error("The node attributes are not valid for the node class")]
    BadNodeAttributesInvalid,

    /// The type definition node id does not reference an appropriate type
    /// node.
    #[error("The type definition node id is not valid")]
    BadTypeDefinitionInvalid,

    /// The parent node id does not reference a valid node.
    #[error("The parent node id does not reference a valid node")]
    BadParentNodeIdInvalid,

    /// The reference could not be created because it violates constraints
    /// imposed by the data model.
    #[error("The reference is not allowed by the information model")]
    BadReferenceNotAllowed,

    /// The reference type id does not reference a valid reference type node.
    #[error("The reference type id does not reference a valid reference type")]
    BadReferenceTypeIdInvalid,

    /// The browse direction is not valid.
    #[error("The browse direction is not valid")]
    BadBrowseDirectionInvalid,

    /// The reference already exists; duplicates are not permitted.
    #[error("A duplicate reference is not permitted")]
    BadDuplicateReferenceNotAllowed,

    /// The source node id does not reference a valid node.
    #[error("The source node id does not reference a valid node")]
    BadSourceNodeIdInvalid,

    /// The target node id does not reference a valid node.
    #[error("The target node id does not reference a valid node")]
    BadTargetNodeIdInvalid,

    /// The attribute is not supported for the specified node.
    #[error("The attribute is not supported for the specified node")]
    BadAttributeIdInvalid,

    /// The access level does not allow writing to the node.
    #[error("The access level does not allow writing to the node")]
    BadNotWritable,

    /// The access level does not allow reading the node.
    #[error("The access level does not allow reading the node")]
    BadNotReadable,

    /// The value supplied for the attribute is not of the same type as the
    /// attribute's value.
    #[error("The value is not of the same type as the attribute")]
    BadTypeMismatch,

    /// The method is not executable.
    #[error("The method is not executable")]
    BadNotExecutable,

    /// The requested item was not found.
    #[error("The requested item was not found")]
    BadNotFound,
}

impl StatusCode {
    /// Returns the numeric OPC UA status code (Part 6 binding).
    pub const fn code(&self) -> u32 {
        match self {
            StatusCode::Good => 0x0000_0000,
            StatusCode::BadUnexpectedError => 0x8001_0000,
            StatusCode::BadInternalError => 0x8002_0000,
            StatusCode::BadOutOfMemory => 0x8003_0000,
            StatusCode::BadTimeout => 0x800A_0000,
            StatusCode::BadRequestTooLarge => 0x80B8_0000,
            StatusCode::BadNodeIdInvalid => 0x8033_0000,
            StatusCode::BadNodeIdUnknown => 0x8034_0000,
            StatusCode::BadNodeIdExists => 0x805E_0000,
            StatusCode::BadNodeClassInvalid => 0x805F_0000,
            StatusCode::BadBrowseNameInvalid => 0x8060_0000,
            StatusCode::BadBrowseNameDuplicated => 0x8061_0000,
            StatusCode::BadNodeAttributesInvalid => 0x8062_0000,
            StatusCode::BadTypeDefinitionInvalid => 0x8063_0000,
            StatusCode::BadParentNodeIdInvalid => 0x805B_0000,
            StatusCode::BadReferenceNotAllowed => 0x805C_0000,
            StatusCode::BadReferenceTypeIdInvalid => 0x804C_0000,
            StatusCode::BadBrowseDirectionInvalid => 0x804D_0000,
            StatusCode::BadDuplicateReferenceNotAllowed => 0x8066_0000,
            StatusCode::BadSourceNodeIdInvalid => 0x8064_0000,
            StatusCode::BadTargetNodeIdInvalid => 0x8065_0000,
            StatusCode::BadAttributeIdInvalid => 0x8035_0000,
            StatusCode::BadNotWritable => 0x803B_0000,
            StatusCode::BadNotReadable => 0x803A_0000,
            StatusCode::BadTypeMismatch => 0x8074_0000,
            StatusCode::BadNotExecutable => 0x8111_0000,
            StatusCode::BadNotFound => 0x803E_0000,
        }
    }

    /// Creates a status code from its numeric value, if known.
    pub fn from_code(code: u32) -> Option<Self> {
        const ALL: &[StatusCode] = &[
            StatusCode::Good,
            StatusCode::BadUnexpectedError,
            StatusCode::BadInternalError,
            StatusCode::BadOutOfMemory,
            StatusCode::BadTimeout,
            StatusCode::BadRequestTooLarge,
            StatusCode::BadNodeIdInvalid,
            StatusCode::BadNodeIdUnknown,
            StatusCode::BadNodeIdExists,
            StatusCode::BadNodeClassInvalid,
            StatusCode::BadBrowseNameInvalid,
            StatusCode::BadBrowseNameDuplicated,
            StatusCode::BadNodeAttributesInvalid,
            StatusCode::BadTypeDefinitionInvalid,
            StatusCode::BadParentNodeIdInvalid,
            StatusCode::BadReferenceNotAllowed,
            StatusCode::BadReferenceTypeIdInvalid,
            StatusCode::BadBrowseDirectionInvalid,
            StatusCode::BadDuplicateReferenceNotAllowed,
            StatusCode::BadSourceNodeIdInvalid,
            StatusCode::BadTargetNodeIdInvalid,
            StatusCode::BadAttributeIdInvalid,
            StatusCode::BadNotWritable,
            StatusCode::BadNotReadable,
            StatusCode::BadTypeMismatch,
            StatusCode::BadNotExecutable,
            StatusCode::BadNotFound,
        ];
        ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Returns `true` if this code reports success.
    #[inline]
    pub const fn is_good(&self) -> bool {
        matches!(self, StatusCode::Good)
    }

    /// Returns `true` if this code reports failure.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        !self.is_good()
    }

    /// Returns the symbolic name of the code.
    pub const fn name(&self) -> &'static str {
        match self {
            StatusCode::Good => "Good",
            StatusCode::BadUnexpectedError => "BadUnexpectedError",
            StatusCode::BadInternalError => "BadInternalError",
            StatusCode::BadOutOfMemory => "BadOutOfMemory",
            StatusCode::BadTimeout => "BadTimeout",
            StatusCode::BadRequestTooLarge => "BadRequestTooLarge",
            StatusCode::BadNodeIdInvalid => "BadNodeIdInvalid",
            StatusCode::BadNodeIdUnknown => "BadNodeIdUnknown",
            StatusCode::BadNodeIdExists => "BadNodeIdExists",
            StatusCode::BadNodeClassInvalid => "BadNodeClassInvalid",
            StatusCode::BadBrowseNameInvalid => "BadBrowseNameInvalid",
            StatusCode::BadBrowseNameDuplicated => "BadBrowseNameDuplicated",
            StatusCode::BadNodeAttributesInvalid => "BadNodeAttributesInvalid",
            StatusCode::BadTypeDefinitionInvalid => "BadTypeDefinitionInvalid",
            StatusCode::BadParentNodeIdInvalid => "BadParentNodeIdInvalid",
            StatusCode::BadReferenceNotAllowed => "BadReferenceNotAllowed",
            StatusCode::BadReferenceTypeIdInvalid => "BadReferenceTypeIdInvalid",
            StatusCode::BadBrowseDirectionInvalid => "BadBrowseDirectionInvalid",
            StatusCode::BadDuplicateReferenceNotAllowed => "BadDuplicateReferenceNotAllowed",
            StatusCode::BadSourceNodeIdInvalid => "BadSourceNodeIdInvalid",
            StatusCode::BadTargetNodeIdInvalid => "BadTargetNodeIdInvalid",
            StatusCode::BadAttributeIdInvalid => "BadAttributeIdInvalid",
            StatusCode::BadNotWritable => "BadNotWritable",
            StatusCode::BadNotReadable => "BadNotReadable",
            StatusCode::BadTypeMismatch => "BadTypeMismatch",
            StatusCode::BadNotExecutable => "BadNotExecutable",
            StatusCode::BadNotFound => "BadNotFound",
        }
    }
}

/// Result of a service operation.
pub type ServiceResult<T> = Result<T, StatusCode>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_is_default() {
        assert_eq!(StatusCode::default(), StatusCode::Good);
        assert!(StatusCode::Good.is_good());
        assert!(!StatusCode::Good.is_bad());
    }

    #[test]
    fn test_code_roundtrip() {
        for code in [
            StatusCode::Good,
            StatusCode::BadNodeIdExists,
            StatusCode::BadParentNodeIdInvalid,
            StatusCode::BadReferenceTypeIdInvalid,
            StatusCode::BadTypeDefinitionInvalid,
            StatusCode::BadBrowseNameDuplicated,
            StatusCode::BadDuplicateReferenceNotAllowed,
            StatusCode::BadNotFound,
            StatusCode::BadOutOfMemory,
            StatusCode::BadInternalError,
        ] {
            assert_eq!(StatusCode::from_code(code.code()), Some(code));
        }
    }

    #[test]
    fn test_bad_bit_is_set() {
        assert_eq!(StatusCode::BadNodeIdExists.code() & 0x8000_0000, 0x8000_0000);
        assert_eq!(StatusCode::Good.code() & 0x8000_0000, 0);
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(StatusCode::from_code(0xDEAD_BEEF), None);
    }

    #[test]
    fn test_error_message() {
        let error = StatusCode::BadNodeIdExists;
        assert!(error.to_string().contains("already used"));
        assert_eq!(error.name(), "BadNodeIdExists");
    }
}
