use crate::error::{Result, WadError};
use crate::wad::{Blob, LumpName, Source, Wad};

pub const TEXTURE_HEADER_SIZE: usize = 22;
pub const PATCH_REF_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHeader {
    pub name: LumpName,
    /// Two reserved words ahead of the size. Vanilla reads them together as
    /// a 32-bit "masked" flag.
    pub reserved_head: [i16; 2],
    pub width: i16,
    pub height: i16,
    /// Two reserved words after the size, once a 32-bit column directory
    /// pointer. Obsolete.
    pub reserved_tail: [i16; 2],
    pub patch_count: i16,
}

impl TextureHeader {
    pub fn read(blob: &mut Blob) -> Result<TextureHeader> {
        Ok(TextureHeader {
            name: blob.read_name()?,
            reserved_head: [blob.read()?, blob.read()?],
            width: blob.read()?,
            height: blob.read()?,
            reserved_tail: [blob.read()?, blob.read()?],
            patch_count: blob.read()?,
        })
    }
}

/// Where one patch goes in a composite texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRef {
    pub origin_x: i16,
    pub origin_y: i16,
    /// Index into PNAMES.
    pub patch: i16,
    pub step_dir: i16,
    pub colormap: i16,
}

impl PatchRef {
    pub fn read(blob: &mut Blob) -> Result<PatchRef> {
        Ok(PatchRef {
            origin_x: blob.read()?,
            origin_y: blob.read()?,
            patch: blob.read()?,
            step_dir: blob.read()?,
            colormap: blob.read()?,
        })
    }

    pub fn name<'a>(&self, patch_names: &'a [LumpName]) -> Option<&'a LumpName> {
        usize::try_from(self.patch).ok().and_then(|index| patch_names.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub header: TextureHeader,
    pub patches: Vec<PatchRef>,
}

fn read_count(blob: &mut Blob, what: &str) -> Result<usize> {
    let count = blob.read::<i32>()?;
    usize::try_from(count).map_err(|_| WadError::MalformedLump(format!("negative {} count {}", what, count)))
}

/// Reads a TEXTURE1/TEXTURE2 lump. Only the metadata is read; patches are not
/// looked up or drawn.
pub fn read_textures(blob: &mut Blob) -> Result<Vec<Texture>> {
    let count = read_count(blob, "texture")?;
    let offsets = blob.read_array::<i32>(count)?;

    let mut textures = Vec::with_capacity(count);
    for offset in offsets {
        blob.seek(offset.into())?;

        let header = TextureHeader::read(blob)?;
        if header.patch_count < 0 {
            return Err(WadError::MalformedLump(format!(
                "texture {} has a negative patch count {}",
                header.name, header.patch_count
            )));
        }

        let patches = (0..header.patch_count)
            .map(|_| PatchRef::read(blob))
            .collect::<Result<Vec<PatchRef>>>()?;

        textures.push(Texture { header, patches });
    }

    log::debug!("Read {} textures", textures.len());

    Ok(textures)
}

/// Reads PNAMES: a count followed by that many 8-byte patch names.
pub fn read_patch_names(blob: &mut Blob) -> Result<Vec<LumpName>> {
    let count = read_count(blob, "patch name")?;
    (0..count).map(|_| blob.read_name()).collect()
}

impl<S: Source> Wad<S> {
    pub fn textures(&self, name: &str) -> Result<Vec<Texture>> {
        read_textures(&mut self.blob(name)?)
    }

    pub fn patch_names(&self, name: &str) -> Result<Vec<LumpName>> {
        read_patch_names(&mut self.blob(name)?)
    }
}
