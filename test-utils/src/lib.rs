//! Byte builders for synthetic WADs and lumps, shared by the unit and
//! integration tests of `doom-wad`.

pub fn name_bytes(name: &str) -> [u8; 8] {
    let mut raw = [0u8; 8];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    raw
}

/// Lays lumps out back to back after the header, followed by the directory.
pub struct WadBuilder {
    signature: &'static [u8; 4],
    lumps: Vec<(String, Vec<u8>)>,
}

impl WadBuilder {
    pub fn iwad() -> Self {
        WadBuilder {
            signature: b"IWAD",
            lumps: Vec::new(),
        }
    }

    pub fn pwad() -> Self {
        WadBuilder {
            signature: b"PWAD",
            lumps: Vec::new(),
        }
    }

    pub fn lump(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.lumps.push((name.to_owned(), data.into()));
        self
    }

    pub fn marker(self, name: &str) -> Self {
        self.lump(name, Vec::new())
    }

    pub fn build(self) -> Vec<u8> {
        let data_len: usize = self.lumps.iter().map(|(_, data)| data.len()).sum();
        let directory_offset = 12 + data_len;

        let mut wad = Vec::new();
        wad.extend(self.signature);
        wad.extend((self.lumps.len() as i32).to_le_bytes());
        wad.extend((directory_offset as i32).to_le_bytes());

        let mut directory = Vec::new();
        for (name, data) in &self.lumps {
            let offset = if data.is_empty() { 0 } else { wad.len() as i32 };
            directory.extend(offset.to_le_bytes());
            directory.extend((data.len() as i32).to_le_bytes());
            directory.extend(name_bytes(name));
            wad.extend(data);
        }

        wad.extend(directory);
        wad
    }
}

/// Encodes a picture lump. Each column is a list of `(row_start, pixels)` posts.
pub fn picture_bytes(width: i16, height: i16, columns: &[Vec<(u8, Vec<u8>)>]) -> Vec<u8> {
    assert_eq!(columns.len(), width as usize);

    let mut posts = Vec::new();
    let mut offsets = Vec::new();
    let table_end = 8 + 4 * columns.len();

    for column in columns {
        offsets.push((table_end + posts.len()) as i32);
        for (row_start, pixels) in column {
            posts.push(*row_start);
            posts.push(pixels.len() as u8);
            posts.push(0);
            posts.extend(pixels);
            posts.push(0);
        }
        posts.push(0xff);
    }

    let mut lump = Vec::new();
    lump.extend(width.to_le_bytes());
    lump.extend(height.to_le_bytes());
    lump.extend(3i16.to_le_bytes());
    lump.extend((-5i16).to_le_bytes());
    for offset in offsets {
        lump.extend(offset.to_le_bytes());
    }
    lump.extend(posts);
    lump
}

/// 14 palettes where palette `p`, color `i` is `(i, p, 255 - i)`.
pub fn playpal_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(14 * 256 * 3);
    for p in 0..14u8 {
        for i in 0..=255u8 {
            bytes.extend([i, p, 255 - i]);
        }
    }
    bytes
}

pub fn texture_lump_bytes(textures: &[(&str, i16, i16, Vec<[i16; 5]>)]) -> Vec<u8> {
    let mut bodies = Vec::new();
    let mut offsets = Vec::new();
    let table_end = 4 + 4 * textures.len();

    for (name, width, height, patches) in textures {
        offsets.push((table_end + bodies.len()) as i32);
        bodies.extend(name_bytes(name));
        bodies.extend(0i32.to_le_bytes());
        bodies.extend(width.to_le_bytes());
        bodies.extend(height.to_le_bytes());
        bodies.extend(0i32.to_le_bytes());
        bodies.extend((patches.len() as i16).to_le_bytes());
        for patch in patches {
            for field in patch {
                bodies.extend(field.to_le_bytes());
            }
        }
    }

    let mut lump = Vec::new();
    lump.extend((textures.len() as i32).to_le_bytes());
    for offset in offsets {
        lump.extend(offset.to_le_bytes());
    }
    lump.extend(bodies);
    lump
}

pub fn pnames_bytes(names: &[&str]) -> Vec<u8> {
    let mut lump = Vec::new();
    lump.extend((names.len() as i32).to_le_bytes());
    for name in names {
        lump.extend(name_bytes(name));
    }
    lump
}

/// Little-endian 16-bit values back to back, the layout of every level record.
pub fn words(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
