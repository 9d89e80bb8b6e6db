//! Builders for synthetic WADs and lumps used across the unit tests.

use crate::wad::{Entry, LumpName};

pub use wad_test_utils::*;

pub fn entry(name: &str, size: i32) -> Entry {
    Entry {
        offset: 12,
        size,
        name: LumpName::from_bytes(name.as_bytes()),
    }
}

pub fn marker(name: &str) -> Entry {
    entry(name, 0)
}
