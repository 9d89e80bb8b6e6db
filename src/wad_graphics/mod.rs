//! Graphics lumps: pictures, flats and wall texture definitions.

pub mod flat;
pub mod picture;
pub mod texture;

pub use flat::Flat;
pub use picture::{Image, ImageHeader};
pub use texture::{read_patch_names, read_textures, PatchRef, Texture, TextureHeader};
