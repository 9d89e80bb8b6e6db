//! Marker delimited lump groups.
//!
//! Sprites, flats and patches are not listed anywhere by name. They sit
//! between a pair of zero sized marker lumps (`S_START`/`S_END` and so on), and
//! a level's lumps follow a marker carrying the level name. Resolving a group
//! is a single pass over the directory.

use crate::error::{Result, WadError};
use crate::wad::lumps::Entry;

/// Well known marker pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Flats,
    Sprites,
    Patches,
}

impl Namespace {
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            Namespace::Flats => ("F_START", "F_END"),
            Namespace::Sprites => ("S_START", "S_END"),
            Namespace::Patches => ("P_START", "P_END"),
        }
    }
}

pub fn markers(entries: &[Entry]) -> Vec<&Entry> {
    entries.iter().filter(|e| e.is_marker()).collect()
}

/// Returns the entries strictly between the `start` marker and its end.
///
/// With an empty `end` the range stops at the first marker of any name after
/// the start; otherwise it stops at the marker called `end`, and markers with
/// other names inside the range are part of it. Only zero sized entries take
/// part in the matching. The scan runs to the end of the directory so that a
/// repeated start marker, or a repeated named end marker, is reported.
pub fn resolve_range<'a>(entries: &'a [Entry], start: &str, end: &str) -> Result<&'a [Entry]> {
    let mut range_begin: Option<usize> = None;
    let mut range_end: Option<usize> = None;

    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_marker() {
            continue;
        }

        if entry.name == start {
            if range_begin.is_some() {
                return Err(WadError::DuplicateStartMarker(start.to_owned()));
            }
            range_begin = Some(index + 1);
            continue;
        }

        if range_begin.is_none() {
            continue;
        }

        if end.is_empty() {
            range_end.get_or_insert(index);
        } else if entry.name == end {
            if range_end.is_some() {
                return Err(WadError::DuplicateEndMarker(end.to_owned()));
            }
            range_end = Some(index);
        }
    }

    let range_begin = range_begin.ok_or_else(|| WadError::StartMarkerNotFound(start.to_owned()))?;
    let range_end = range_end.ok_or_else(|| WadError::EndMarkerNotFound(end.to_owned()))?;

    log::debug!(
        "Resolved {}..{} to {} lumps ({}..{})",
        start,
        end,
        range_end - range_begin,
        range_begin,
        range_end
    );

    Ok(&entries[range_begin..range_end])
}
