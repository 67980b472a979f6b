//! Assertion helpers for identity checks.
//!
//! `assert_eq!` on snapshots compares values. These helpers compare
//! allocations, which is what sharing is about.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

/// Assert that two handles point at the same allocation.
pub fn assert_shared<T: Debug>(left: &Arc<T>, right: &Arc<T>) {
    assert!(
        Arc::ptr_eq(left, right),
        "Expected one shared allocation.\nLeft:  {left:?} at {:p}\nRight: {right:?} at {:p}",
        Arc::as_ptr(left),
        Arc::as_ptr(right),
    );
}

/// Assert that two handles point at different allocations.
pub fn assert_not_shared<T: Debug>(left: &Arc<T>, right: &Arc<T>) {
    assert!(
        !Arc::ptr_eq(left, right),
        "Expected distinct allocations, both are {left:?} at {:p}",
        Arc::as_ptr(left),
    );
}

/// Assert that a file contains specific text.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    assert!(
        content.contains(expected),
        "File {} does not contain expected text.\nExpected to find: {}\nActual content:\n{}",
        path.display(),
        expected,
        content
    );
}
