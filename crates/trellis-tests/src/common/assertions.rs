// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain-specific assertion helpers.

use trellis_core::ids::NodeId;
use trellis_space::browse::{BrowseDescription, BrowseResult};
use trellis_space::{ns0, Server};

// =============================================================================
// BrowseResult assertions
// =============================================================================

/// Assertion extensions for [`BrowseResult`].
pub trait BrowseResultAssertions {
    /// Asserts that the browse succeeded.
    fn assert_good(&self) -> &Self;

    /// Asserts the number of references pointing at `target`.
    fn assert_references_to(&self, target: &NodeId, expected: usize) -> &Self;

    /// Asserts that a reference with the given browse name is present.
    fn assert_has_browse_name(&self, name: &str) -> &Self;

    /// Asserts that no reference carries the given browse name.
    fn assert_lacks_browse_name(&self, name: &str) -> &Self;
}

impl BrowseResultAssertions for BrowseResult {
    fn assert_good(&self) -> &Self {
        assert!(
            self.is_good(),
            "expected a good browse result, got {}",
            self.status_code.name()
        );
        self
    }

    fn assert_references_to(&self, target: &NodeId, expected: usize) -> &Self {
        let actual = self.references_to(target);
        assert_eq!(
            actual, expected,
            "expected {} reference(s) to {}, found {}",
            expected, target, actual
        );
        self
    }

    fn assert_has_browse_name(&self, name: &str) -> &Self {
        assert!(
            self.references.iter().any(|r| r.browse_name.name == name),
            "expected a reference with browse name '{}', got {:?}",
            name,
            self.references
                .iter()
                .map(|r| r.browse_name.name.as_str())
                .collect::<Vec<_>>()
        );
        self
    }

    fn assert_lacks_browse_name(&self, name: &str) -> &Self {
        assert!(
            self.references.iter().all(|r| r.browse_name.name != name),
            "expected no reference with browse name '{}'",
            name
        );
        self
    }
}

// =============================================================================
// Server helpers
// =============================================================================

/// Browses the children of a node over a reference type with subtype
/// expansion.
pub fn browse_children(server: &Server, node: &NodeId, reference_type: &NodeId) -> BrowseResult {
    server.browse(
        0,
        &BrowseDescription::new(node.clone()).with_reference_type(reference_type.clone()),
    )
}

/// Browses the `Organizes` children of the objects folder.
pub fn browse_objects_folder(server: &Server) -> BrowseResult {
    browse_children(server, &ns0::OBJECTS_FOLDER, &ns0::ORGANIZES)
}
