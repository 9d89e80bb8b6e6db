use crate::colors::TRANSPARENT_INDEX;
use crate::error::{Result, WadError};
use crate::wad::{Blob, Namespace, Source, Wad};

/// Marks the end of a column's posts where a row start would be.
const END_OF_COLUMN: u8 = 0xFF;

/// Largest pixel buffer a picture may declare, 4096x4096. The header alone
/// decides the allocation, so a tiny lump could otherwise ask for a gigabyte.
pub const MAX_PICTURE_PIXELS: usize = 4096 * 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: i16,
    pub height: i16,
    /// Sprite anchor, relative to the top left corner. Not used for decoding.
    pub x_offset: i16,
    pub y_offset: i16,
}

impl ImageHeader {
    pub fn read(blob: &mut Blob) -> Result<ImageHeader> {
        Ok(ImageHeader {
            width: blob.read()?,
            height: blob.read()?,
            x_offset: blob.read()?,
            y_offset: blob.read()?,
        })
    }
}

/// A decoded picture: one palette index per pixel, row-major.
/// [`TRANSPARENT_INDEX`] marks pixels that no post covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub header: ImageHeader,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn width(&self) -> usize {
        self.header.width.max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.header.height.max(0) as usize
    }

    /// `None` outside the image, or when `pixels` is shorter than the header says.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixels.get(y * self.width() + x).copied()
    }

    pub fn column(&self, x: usize) -> impl Iterator<Item = u8> + '_ {
        self.pixels.iter().skip(x).step_by(self.width().max(1)).copied()
    }

    /// Applies a light table from COLORMAP. Transparent pixels stay transparent.
    pub fn remap(&self, table: &[u8; 256]) -> Image {
        let pixels = self
            .pixels
            .iter()
            .map(|&index| match index {
                TRANSPARENT_INDEX => TRANSPARENT_INDEX,
                index => table[index as usize],
            })
            .collect();

        Image {
            header: self.header,
            pixels,
        }
    }

    /// Decodes a picture lump (patch, sprite or full screen graphic).
    ///
    /// After the header comes one absolute offset per column. Each column is a
    /// list of posts, `row_start, length, pad, length indices, pad`, ended by a
    /// 0xFF row start. Row arithmetic is done in `usize`; a post reaching past
    /// the image height is malformed rather than wrapped.
    pub fn read(blob: &mut Blob) -> Result<Image> {
        blob.seek(0)?;

        let header = ImageHeader::read(blob).map_err(|err| picture_error("header", err))?;
        if header.width < 0 || header.height < 0 {
            return Err(WadError::MalformedPicture(format!(
                "negative dimensions {}x{}",
                header.width, header.height
            )));
        }

        let width = header.width as usize;
        let height = header.height as usize;
        if width * height > MAX_PICTURE_PIXELS {
            return Err(WadError::MalformedPicture(format!(
                "{}x{} is larger than {} pixels",
                width, height, MAX_PICTURE_PIXELS
            )));
        }

        let offsets = blob
            .read_array::<i32>(width)
            .map_err(|err| picture_error("column offsets", err))?;

        let mut pixels = vec![TRANSPARENT_INDEX; width * height];
        let mut posts = 0;

        for (column, &offset) in offsets.iter().enumerate() {
            posts += decode_column(blob, offset, column, width, height, &mut pixels)
                .map_err(|err| picture_error(&format!("column {}", column), err))?;
        }

        log::debug!("Decoded {}x{} picture from {} posts", width, height, posts);

        Ok(Image { header, pixels })
    }
}

fn picture_error(context: &str, err: WadError) -> WadError {
    match err {
        WadError::MalformedPicture(_) => err,
        other => WadError::MalformedPicture(format!("{}: {}", context, other)),
    }
}

/// Writes the posts of one column into `pixels` and returns how many there were.
fn decode_column(
    blob: &mut Blob,
    offset: i32,
    column: usize,
    width: usize,
    height: usize,
    pixels: &mut [u8],
) -> Result<usize> {
    blob.seek(offset.into())?;

    let mut posts = 0;
    loop {
        let row_start = blob.read::<u8>()?;
        if row_start == END_OF_COLUMN {
            return Ok(posts);
        }

        let run_length = blob.read::<u8>()? as usize;
        blob.skip(1)?;

        let row_start = row_start as usize;
        if run_length > 0 && row_start + run_length > height {
            return Err(WadError::MalformedPicture(format!(
                "column {}: post of {} pixels at row {} overruns height {}",
                column, run_length, row_start, height
            )));
        }

        let run = blob.read_bytes(run_length)?;
        for (k, &index) in run.iter().enumerate() {
            pixels[(row_start + k) * width + column] = index;
        }

        blob.skip(1)?;
        posts += 1;
    }
}

impl<S: Source> Wad<S> {
    pub fn picture(&self, name: &str) -> Result<Image> {
        Image::read(&mut self.blob(name)?)
    }

    /// A sprite frame from between `S_START` and `S_END`.
    pub fn sprite(&self, name: &str) -> Result<Image> {
        let entry = self.namespace_lump(Namespace::Sprites, name)?;
        Image::read(&mut self.materialize(entry)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::picture_bytes;

    fn decode(bytes: Vec<u8>) -> Result<Image> {
        Image::read(&mut Blob::from_bytes(bytes))
    }

    #[test]
    fn single_post_lands_on_its_rows() {
        let image = decode(picture_bytes(1, 10, &[vec![(2, vec![7, 8, 9])]])).unwrap();

        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 10);
        assert_eq!(image.header.x_offset, 3);
        assert_eq!(image.header.y_offset, -5);
        assert_eq!(image.pixels, [255, 255, 7, 8, 9, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn several_posts_and_columns() {
        let columns = [
            vec![(0, vec![1]), (3, vec![2, 3])],
            vec![],
            vec![(1, vec![4, 5, 6, 7])],
        ];
        let image = decode(picture_bytes(3, 5, &columns)).unwrap();

        assert_eq!(image.column(0).collect::<Vec<_>>(), [1, 255, 255, 2, 3]);
        assert_eq!(image.column(1).collect::<Vec<_>>(), [255; 5]);
        assert_eq!(image.column(2).collect::<Vec<_>>(), [255, 4, 5, 6, 7]);
        assert_eq!(image.pixel(2, 4), Some(7));
        assert_eq!(image.pixel(3, 0), None);
        assert_eq!(image.pixel(0, 5), None);
    }

    #[test]
    fn terminator_only_column_reads_one_byte() {
        // The column offset points at the very last byte of the lump.
        let mut bytes = Vec::new();
        bytes.extend(1i16.to_le_bytes());
        bytes.extend(4i16.to_le_bytes());
        bytes.extend([0u8; 4]);
        bytes.extend(12i32.to_le_bytes());
        bytes.push(0xFF);

        let image = decode(bytes).unwrap();
        assert_eq!(image.pixels, [255; 4]);
    }

    #[test]
    fn empty_run_writes_nothing() {
        let image = decode(picture_bytes(1, 3, &[vec![(1, vec![]), (2, vec![9])]])).unwrap();
        assert_eq!(image.pixels, [255, 255, 9]);
    }

    #[test]
    fn empty_run_below_image_is_ignored() {
        let image = decode(picture_bytes(1, 4, &[vec![(9, vec![]), (1, vec![5])]])).unwrap();
        assert_eq!(image.pixels, [255, 5, 255, 255]);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let mut bytes = picture_bytes(1, 2, &[vec![]]);
        bytes[0..2].copy_from_slice(&32767i16.to_le_bytes());
        bytes[2..4].copy_from_slice(&32767i16.to_le_bytes());

        let err = decode(bytes).unwrap_err();
        assert!(matches!(err, WadError::MalformedPicture(msg) if msg.contains("32767x32767")));
    }

    #[test]
    fn pixel_of_short_buffer() {
        let image = Image {
            header: ImageHeader {
                width: 2,
                height: 2,
                x_offset: 0,
                y_offset: 0,
            },
            pixels: vec![1, 2, 3],
        };

        assert_eq!(image.pixel(0, 1), Some(3));
        assert_eq!(image.pixel(1, 1), None);
    }

    #[test]
    fn post_past_height_is_malformed() {
        let err = decode(picture_bytes(1, 4, &[vec![(2, vec![1, 2, 3])]])).unwrap_err();
        assert!(matches!(err, WadError::MalformedPicture(_)));
    }

    #[test]
    fn post_reaching_byte_limit_does_not_wrap() {
        // 250 + 10 would wrap to row 4 with 8-bit arithmetic.
        let err = decode(picture_bytes(1, 255, &[vec![(250, vec![1; 10])]])).unwrap_err();
        assert!(matches!(err, WadError::MalformedPicture(_)));
    }

    #[test]
    fn column_offset_outside_blob() {
        let mut bytes = picture_bytes(1, 2, &[vec![(0, vec![1, 2])]]);
        bytes[8..12].copy_from_slice(&500i32.to_le_bytes());

        let err = decode(bytes).unwrap_err();
        assert!(matches!(err, WadError::MalformedPicture(msg) if msg.contains("column 0")));
    }

    #[test]
    fn missing_terminator_is_malformed() {
        let mut bytes = picture_bytes(1, 2, &[vec![(0, vec![1, 2])]]);
        bytes.pop();

        assert!(matches!(decode(bytes), Err(WadError::MalformedPicture(_))));
    }

    #[test]
    fn short_offset_table() {
        let mut bytes = Vec::new();
        bytes.extend(4i16.to_le_bytes());
        bytes.extend(4i16.to_le_bytes());
        bytes.extend([0u8; 4]);
        bytes.extend(16i32.to_le_bytes());

        assert!(matches!(decode(bytes), Err(WadError::MalformedPicture(_))));
    }

    #[test]
    fn negative_dimensions() {
        let mut bytes = picture_bytes(1, 2, &[vec![]]);
        bytes[2..4].copy_from_slice(&(-2i16).to_le_bytes());

        assert!(matches!(decode(bytes), Err(WadError::MalformedPicture(_))));
    }

    #[test]
    fn remap_keeps_transparency() {
        let image = decode(picture_bytes(1, 3, &[vec![(0, vec![1, 2])]])).unwrap();
        let mut table = [0u8; 256];
        table[1] = 100;
        table[2] = 101;
        table[255] = 7;

        assert_eq!(image.remap(&table).pixels, [100, 101, 255]);
    }
}
