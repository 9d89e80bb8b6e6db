use crate::error::{Result, WadError};
use crate::wad::blob::Blob;
use crate::wad::name::LumpName;
use crate::wad::source::Source;

pub const HEADER_SIZE: usize = 12;
pub const ENTRY_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    /// A complete game data file.
    Iwad,
    /// A patch WAD loaded on top of an IWAD.
    Pwad,
}

impl WadKind {
    pub fn signature(self) -> &'static [u8; 4] {
        match self {
            WadKind::Iwad => b"IWAD",
            WadKind::Pwad => b"PWAD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: WadKind,
    pub entry_count: i32,
    pub directory_offset: i32,
}

impl Header {
    pub fn read(blob: &mut Blob) -> Result<Header> {
        let mut signature = [0u8; 4];
        signature.copy_from_slice(blob.read_bytes(4)?);

        let kind = match &signature {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => return Err(WadError::InvalidFormat(signature)),
        };

        Ok(Header {
            kind,
            entry_count: blob.read()?,
            directory_offset: blob.read()?,
        })
    }
}

/// One directory record. Entries with a size of zero are markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub offset: i32,
    pub size: i32,
    pub name: LumpName,
}

impl Entry {
    pub fn read(blob: &mut Blob) -> Result<Entry> {
        Ok(Entry {
            offset: blob.read()?,
            size: blob.read()?,
            name: blob.read_name()?,
        })
    }

    pub fn is_marker(&self) -> bool {
        self.size == 0
    }
}

/// Reads the header and the whole directory, keeping the on-disk order.
pub fn load<S: Source + ?Sized>(source: &S) -> Result<(Header, Vec<Entry>)> {
    let len = source.len();
    log::info!("Read WAD. File size in bytes: {}", len);

    if len < HEADER_SIZE as u64 {
        return Err(WadError::Truncated {
            offset: 0,
            wanted: HEADER_SIZE,
            available: len as usize,
        });
    }

    let mut header_bytes = vec![0u8; HEADER_SIZE];
    source.read_at(0, &mut header_bytes)?;
    let header = Header::read(&mut Blob::from_bytes(header_bytes))?;

    if header.entry_count < 0 {
        return Err(WadError::OutOfRange {
            offset: header.entry_count.into(),
            len: len as usize,
        });
    }

    let directory_offset = header.directory_offset as i64;
    if directory_offset < 0 || directory_offset as u64 > len {
        return Err(WadError::OutOfRange {
            offset: directory_offset,
            len: len as usize,
        });
    }

    let directory_len = header.entry_count as usize * ENTRY_SIZE;
    let available = len - directory_offset as u64;
    if directory_len as u64 > available {
        return Err(WadError::Truncated {
            offset: directory_offset as usize,
            wanted: directory_len,
            available: available as usize,
        });
    }

    let mut directory = vec![0u8; directory_len];
    source.read_at(directory_offset as u64, &mut directory)?;

    let mut blob = Blob::from_bytes(directory);
    let entries = (0..header.entry_count)
        .map(|_| Entry::read(&mut blob))
        .collect::<Result<Vec<Entry>>>()?;

    log::info!("Loaded {} lumps from {:?} directory at {}", entries.len(), header.kind, directory_offset);

    Ok((header, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::WadBuilder;

    #[test]
    fn loads_entries_in_file_order() {
        let bytes = WadBuilder::iwad()
            .lump("PLAYPAL", vec![1, 2, 3])
            .marker("S_START")
            .lump("TROOA1", vec![4; 10])
            .marker("S_END")
            .build();

        let (header, entries) = load(&bytes).unwrap();

        assert_eq!(header.kind, WadKind::Iwad);
        assert_eq!(header.entry_count, 4);
        assert_eq!(entries.len(), 4);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["PLAYPAL", "S_START", "TROOA1", "S_END"]);

        assert_eq!(entries[0].offset, HEADER_SIZE as i32);
        assert_eq!(entries[0].size, 3);
        assert!(entries[1].is_marker());
        assert_eq!(entries[2].size, 10);
    }

    #[test]
    fn rejects_unknown_signature() {
        let mut bytes = WadBuilder::pwad().lump("A", vec![0]).build();
        bytes[..4].copy_from_slice(b"WAD2");

        assert!(matches!(load(&bytes), Err(WadError::InvalidFormat(sig)) if &sig == b"WAD2"));
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes = b"PWAD\x01\x00".to_vec();
        assert!(matches!(load(&bytes), Err(WadError::Truncated { offset: 0, .. })));
    }

    #[test]
    fn directory_past_end_is_truncated() {
        let mut bytes = WadBuilder::pwad().lump("A", vec![0]).lump("B", vec![0]).build();
        bytes.truncate(bytes.len() - 1);

        assert!(matches!(load(&bytes), Err(WadError::Truncated { .. })));
    }

    #[test]
    fn directory_offset_outside_file() {
        let mut bytes = WadBuilder::pwad().lump("A", vec![0]).build();
        let bogus = (bytes.len() as i32 + 100).to_le_bytes();
        bytes[8..12].copy_from_slice(&bogus);

        assert!(matches!(load(&bytes), Err(WadError::OutOfRange { .. })));

        bytes[8..12].copy_from_slice(&(-4i32).to_le_bytes());
        assert!(matches!(load(&bytes), Err(WadError::OutOfRange { offset: -4, .. })));
    }

    #[test]
    fn empty_directory() {
        let bytes = WadBuilder::pwad().build();
        let (header, entries) = load(&bytes).unwrap();

        assert_eq!(header.kind, WadKind::Pwad);
        assert!(entries.is_empty());
    }
}
