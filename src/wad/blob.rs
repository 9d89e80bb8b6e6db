use std::mem::size_of;
use std::path::Path;

use crate::error::{Result, WadError};
use crate::wad::name::{LumpName, NAME_LEN};

/// A fixed-width value stored little-endian.
pub trait LeValue: Sized {
    const SIZE: usize;

    /// `bytes` is exactly `SIZE` long.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! le_value {
    ($($t:ty),*) => {
        $(
            impl LeValue for $t {
                const SIZE: usize = size_of::<$t>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

le_value!(u8, i8, u16, i16, u32, i32);

/// The bytes of one lump plus a read cursor.
///
/// The data never changes after construction; only the cursor moves. Every
/// read is bounds checked and reports `Truncated` instead of panicking, so
/// decoders can run over untrusted lumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
    position: usize,
}

impl Blob {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Blob {
        Blob {
            data: data.into(),
            position: 0,
        }
    }

    /// Loads a standalone lump dumped to disk (e.g. a `.lmp` file).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Blob> {
        Ok(Blob::from_bytes(std::fs::read(path)?))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Moves the cursor to an absolute offset. Seeking to the very end is
    /// allowed, any read from there is `Truncated`.
    pub fn seek(&mut self, offset: i64) -> Result<()> {
        if offset < 0 || offset as u64 > self.data.len() as u64 {
            return Err(WadError::OutOfRange {
                offset,
                len: self.data.len(),
            });
        }

        self.position = offset as usize;
        Ok(())
    }

    pub fn read<T: LeValue>(&mut self) -> Result<T> {
        let bytes = self.read_bytes(T::SIZE)?;
        Ok(T::from_le_slice(bytes))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if count > available {
            return Err(WadError::Truncated {
                offset: self.position,
                wanted: count,
                available,
            });
        }

        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    pub fn read_name(&mut self) -> Result<LumpName> {
        self.read_bytes(NAME_LEN).map(LumpName::from_bytes)
    }

    pub fn read_array<T: LeValue>(&mut self, count: usize) -> Result<Vec<T>> {
        // Check the whole span up front so a bogus count can't trigger a huge allocation.
        let wanted = count.checked_mul(T::SIZE).unwrap_or(usize::MAX);
        let bytes = self.read_bytes(wanted)?;

        Ok(bytes.chunks_exact(T::SIZE).map(T::from_le_slice).collect())
    }
}
