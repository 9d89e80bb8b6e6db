//! Reader for Doom WAD archives.
//!
//! [`Wad`] parses the directory and hands out lumps as [`Blob`]s. On top of
//! that sit the decoders for pictures, flats, palettes, texture definitions
//! and level geometry, plus PNG and SVG writers for their output.

pub mod colors;
pub mod error;
pub mod map_svg;
pub mod maps;
pub mod png_dump;
pub mod wad;
pub mod wad_graphics;

#[cfg(test)]
pub(crate) mod test_utils;

pub use colors::{render, Colormaps, Palette, Playpal};
pub use error::{Result, WadError};
pub use maps::Map;
pub use wad::{Blob, Entry, FileSource, Header, LumpName, Namespace, Source, Wad, WadKind};
pub use wad_graphics::{Flat, Image, ImageHeader, PatchRef, Texture, TextureHeader};
