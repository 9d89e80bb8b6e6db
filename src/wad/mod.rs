//! The WAD container: directory, name lookup and lump materialization.

pub mod blob;
pub mod lumps;
pub mod markers;
pub mod name;
pub mod source;

use std::path::Path;

use crate::error::{Result, WadError};

pub use blob::{Blob, LeValue};
pub use lumps::{Entry, Header, WadKind};
pub use markers::Namespace;
pub use name::LumpName;
pub use source::{FileSource, Source};

/// An opened WAD.
///
/// The directory is read once when the handle is created and never changes.
/// Lumps are read from the source on demand and handed out as independent
/// [`Blob`]s, so a `Wad` over a `Sync` source can be shared between threads.
#[derive(Debug)]
pub struct Wad<S: Source = FileSource> {
    source: S,
    header: Header,
    entries: Vec<Entry>,
}

impl Wad<FileSource> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Opening WAD {}", path.display());

        Wad::from_source(FileSource::open(path)?)
    }
}

impl<S: Source> Wad<S> {
    pub fn from_source(source: S) -> Result<Self> {
        let (header, entries) = lumps::load(&source)?;

        Ok(Wad {
            source,
            header,
            entries,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Size 0 entries, in directory order.
    pub fn markers(&self) -> Vec<&Entry> {
        markers::markers(&self.entries)
    }

    /// The one entry called `name`. Names that occur more than once (every
    /// level has its own `THINGS`) are an error here and have to be reached
    /// through a marker range instead.
    pub fn find_unique(&self, name: &str) -> Result<&Entry> {
        self.find_unique_index(name).map(|index| &self.entries[index])
    }

    pub fn find_unique_index(&self, name: &str) -> Result<usize> {
        find_unique_in(&self.entries, name)
    }

    /// Reads the payload of `entry` into a fresh blob.
    pub fn materialize(&self, entry: &Entry) -> Result<Blob> {
        if entry.is_marker() {
            return Err(WadError::EmptyEntry(entry.name.to_string()));
        }

        let len = self.source.len();
        if entry.offset < 0 || entry.size < 0 || entry.offset as u64 > len {
            return Err(WadError::OutOfRange {
                offset: entry.offset.into(),
                len: len as usize,
            });
        }

        let available = len - entry.offset as u64;
        if entry.size as u64 > available {
            return Err(WadError::Truncated {
                offset: entry.offset as usize,
                wanted: entry.size as usize,
                available: available as usize,
            });
        }

        let mut data = vec![0u8; entry.size as usize];
        self.source.read_at(entry.offset as u64, &mut data)?;

        log::debug!("Read lump {} ({} bytes at {})", entry.name, entry.size, entry.offset);

        Ok(Blob::from_bytes(data))
    }

    /// Materializes the uniquely named lump `name`.
    pub fn blob(&self, name: &str) -> Result<Blob> {
        self.materialize(self.find_unique(name)?)
    }

    pub fn entries_for_markers(&self, start: &str, end: &str) -> Result<&[Entry]> {
        markers::resolve_range(&self.entries, start, end)
    }

    pub fn namespace(&self, namespace: Namespace) -> Result<&[Entry]> {
        let (start, end) = namespace.markers();
        self.entries_for_markers(start, end)
    }

    /// The one lump called `name` inside a namespace. Lumps of the same name
    /// elsewhere in the WAD do not count.
    pub fn namespace_lump(&self, namespace: Namespace, name: &str) -> Result<&Entry> {
        let entries = self.namespace(namespace)?;
        find_unique_in(entries, name).map(|index| &entries[index])
    }
}

fn find_unique_in(entries: &[Entry], name: &str) -> Result<usize> {
    let mut matches = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.name == name)
        .map(|(index, _)| index);

    let index = matches.next().ok_or_else(|| WadError::NotFound(name.to_owned()))?;

    let others = matches.count();
    if others > 0 {
        return Err(WadError::Ambiguous {
            name: name.to_owned(),
            count: others + 1,
        });
    }

    Ok(index)
}
