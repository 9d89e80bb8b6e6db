use std::ops::Index;

use bytemuck::{Pod, Zeroable};
use image::{Rgba, RgbaImage};

use crate::error::{Result, WadError};
use crate::wad::{Blob, Source, Wad};
use crate::wad_graphics::Image;

pub const PALETTE_COLORS: usize = 256;
pub const PALETTE_SIZE: usize = PALETTE_COLORS * 3;
pub const PLAYPAL_PALETTES: usize = 14;
pub const PLAYPAL_SIZE: usize = PLAYPAL_PALETTES * PALETTE_SIZE;
pub const COLORMAP_SIZE: usize = 256;

/// Palette index that pictures use for pixels no post ever wrote.
pub const TRANSPARENT_INDEX: u8 = 255;

/// Fill for transparent pixels. A contrasting cyan, never taken from the palette.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 255, 255, 255]);

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteColor {
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(pub [PaletteColor; PALETTE_COLORS]);

impl Palette {
    fn from_colors(colors: &[PaletteColor]) -> Palette {
        let mut palette = [PaletteColor::default(); PALETTE_COLORS];
        palette.copy_from_slice(colors);
        Palette(palette)
    }

    /// Reads a single 768 byte palette.
    pub fn read(blob: &mut Blob) -> Result<Palette> {
        let bytes = blob.read_bytes(PALETTE_SIZE)?;
        Ok(Palette::from_colors(bytemuck::cast_slice(bytes)))
    }
}

impl Index<u8> for Palette {
    type Output = PaletteColor;

    fn index(&self, index: u8) -> &PaletteColor {
        &self.0[index as usize]
    }
}

/// The PLAYPAL lump: the normal palette followed by the red (damage),
/// gold (item pickup) and green (radiation suit) tints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playpal(Box<[Palette; PLAYPAL_PALETTES]>);

impl Playpal {
    pub fn read(blob: &mut Blob) -> Result<Playpal> {
        let bytes = blob.read_bytes(PLAYPAL_SIZE)?;
        let colors: &[PaletteColor] = bytemuck::cast_slice(bytes);

        let palettes = std::array::from_fn(|p| Palette::from_colors(&colors[p * PALETTE_COLORS..][..PALETTE_COLORS]));

        if blob.remaining() > 0 {
            log::warn!("Ignoring {} bytes after the last PLAYPAL palette", blob.remaining());
        }

        Ok(Playpal(Box::new(palettes)))
    }

    pub fn palettes(&self) -> &[Palette; PLAYPAL_PALETTES] {
        &self.0
    }

    pub fn palette(&self, index: usize) -> Option<&Palette> {
        self.0.get(index)
    }
}

impl Index<usize> for Playpal {
    type Output = Palette;

    fn index(&self, index: usize) -> &Palette {
        &self.0[index]
    }
}

/// The COLORMAP lump: light level remapping tables, 256 entries each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormaps(Vec<[u8; COLORMAP_SIZE]>);

impl Colormaps {
    pub fn read(blob: &mut Blob) -> Result<Colormaps> {
        let len = blob.remaining();
        if len == 0 || len % COLORMAP_SIZE != 0 {
            return Err(WadError::MalformedLump(format!(
                "COLORMAP size {} is not a positive multiple of {}",
                len, COLORMAP_SIZE
            )));
        }

        let maps = blob
            .read_bytes(len)?
            .chunks_exact(COLORMAP_SIZE)
            .map(|chunk| {
                let mut map = [0u8; COLORMAP_SIZE];
                map.copy_from_slice(chunk);
                map
            })
            .collect();

        Ok(Colormaps(maps))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn map(&self, index: usize) -> Option<&[u8; COLORMAP_SIZE]> {
        self.0.get(index)
    }
}

/// Expands an indexed image to true color. Transparent pixels, and any the
/// buffer is too short to hold, get [`BACKGROUND`].
pub fn render(image: &Image, palette: &Palette) -> RgbaImage {
    RgbaImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        match image.pixel(x as usize, y as usize) {
            None | Some(TRANSPARENT_INDEX) => BACKGROUND,
            Some(index) => palette[index].to_rgba(),
        }
    })
}

impl<S: Source> Wad<S> {
    pub fn playpal(&self, name: &str) -> Result<Playpal> {
        Playpal::read(&mut self.blob(name)?)
    }

    pub fn colormaps(&self, name: &str) -> Result<Colormaps> {
        Colormaps::read(&mut self.blob(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::playpal_bytes;
    use crate::wad_graphics::ImageHeader;

    fn image(width: i16, height: i16, pixels: Vec<u8>) -> Image {
        Image {
            header: ImageHeader {
                width,
                height,
                x_offset: 0,
                y_offset: 0,
            },
            pixels,
        }
    }

    #[test]
    fn playpal_of_exact_size() {
        let mut blob = Blob::from_bytes(playpal_bytes());
        let playpal = Playpal::read(&mut blob).unwrap();

        assert_eq!(playpal.palettes().len(), 14);
        assert_eq!(playpal[0][10], PaletteColor { r: 10, g: 0, b: 245 });
        assert_eq!(playpal[13][255], PaletteColor { r: 255, g: 13, b: 0 });
        assert!(playpal.palette(14).is_none());
    }

    #[test]
    fn playpal_one_byte_short() {
        let mut bytes = playpal_bytes();
        bytes.pop();

        let err = Playpal::read(&mut Blob::from_bytes(bytes)).unwrap_err();
        assert!(matches!(err, WadError::Truncated { wanted: PLAYPAL_SIZE, .. }));
    }

    #[test]
    fn single_palette() {
        let mut blob = Blob::from_bytes(playpal_bytes());
        blob.seek(PALETTE_SIZE as i64).unwrap();

        let palette = Palette::read(&mut blob).unwrap();
        assert_eq!(palette[3], PaletteColor { r: 3, g: 1, b: 252 });
    }

    #[test]
    fn transparent_image_is_all_background() {
        let palette = Palette([PaletteColor { r: 1, g: 2, b: 3 }; 256]);
        let raster = render(&image(3, 2, vec![TRANSPARENT_INDEX; 6]), &palette);

        assert_eq!(raster.dimensions(), (3, 2));
        assert!(raster.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn render_looks_up_palette() {
        let playpal = Playpal::read(&mut Blob::from_bytes(playpal_bytes())).unwrap();
        let raster = render(&image(2, 2, vec![0, 255, 7, 200]), &playpal[2]);

        assert_eq!(*raster.get_pixel(0, 0), Rgba([0, 2, 255, 255]));
        assert_eq!(*raster.get_pixel(1, 0), BACKGROUND);
        assert_eq!(*raster.get_pixel(0, 1), Rgba([7, 2, 248, 255]));
        assert_eq!(*raster.get_pixel(1, 1), Rgba([200, 2, 55, 255]));
    }

    #[test]
    fn short_pixel_buffer_renders_background() {
        let palette = Palette([PaletteColor { r: 1, g: 2, b: 3 }; 256]);
        let raster = render(&image(2, 2, vec![0, 0, 0]), &palette);

        assert_eq!(*raster.get_pixel(0, 1), Rgba([1, 2, 3, 255]));
        assert_eq!(*raster.get_pixel(1, 1), BACKGROUND);
    }

    #[test]
    fn colormaps_split_into_tables() {
        let mut bytes = vec![0u8; COLORMAP_SIZE * 34];
        bytes[COLORMAP_SIZE + 5] = 9;

        let maps = Colormaps::read(&mut Blob::from_bytes(bytes)).unwrap();
        assert_eq!(maps.len(), 34);
        assert_eq!(maps.map(1).unwrap()[5], 9);
        assert!(maps.map(34).is_none());
    }

    #[test]
    fn colormap_with_partial_table() {
        let err = Colormaps::read(&mut Blob::from_bytes(vec![0u8; 300])).unwrap_err();
        assert!(matches!(err, WadError::MalformedLump(_)));
    }
}
