use crate::error::Result;
use crate::wad::{Blob, Namespace, Source, Wad};
use crate::wad_graphics::{Image, ImageHeader};

pub const FLAT_SIZE: usize = 64;
pub const FLAT_BYTES: usize = FLAT_SIZE * FLAT_SIZE;

/// A floor or ceiling texture: 64x64 raw palette indices with no header,
/// first byte at the north west corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    pub pixels: Vec<u8>,
}

impl Flat {
    pub fn read(blob: &mut Blob) -> Result<Flat> {
        Ok(Flat {
            pixels: blob.read_bytes(FLAT_BYTES)?.to_vec(),
        })
    }

    pub fn to_image(&self) -> Image {
        Image {
            header: ImageHeader {
                width: FLAT_SIZE as i16,
                height: FLAT_SIZE as i16,
                x_offset: 0,
                y_offset: 0,
            },
            pixels: self.pixels.clone(),
        }
    }
}

impl<S: Source> Wad<S> {
    /// A flat from between `F_START` and `F_END`.
    pub fn flat(&self, name: &str) -> Result<Flat> {
        let entry = self.namespace_lump(Namespace::Flats, name)?;
        Flat::read(&mut self.materialize(entry)?)
    }
}
