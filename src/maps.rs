//! Level geometry. Every level is a marker named `ExMy` or `MAPxx` followed by
//! fixed-stride record lumps (THINGS, LINEDEFS, ...). All fields are 16-bit.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, WadError};
use crate::map_svg::MapCenterer;
use crate::wad::{Blob, Entry, LumpName, Source, Wad};

/// Lumps that belong to a level, in the order the engine expects them.
pub const LEVEL_LUMPS: [&str; 10] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS", "REJECT", "BLOCKMAP",
];

static LEVEL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^(E[0-9]M[0-9]|MAP[0-9][0-9])$").expect("level marker pattern"));

pub fn is_level_marker(name: &str) -> bool {
    LEVEL_MARKER.is_match(name)
}

/// A fixed size record inside a level lump.
pub trait Record: Sized {
    const SIZE: usize;
    const LUMP: &'static str;

    fn read(blob: &mut Blob) -> Result<Self>;
}

/// Reads every record of a lump. The count comes from the lump size, which
/// has to be a whole number of records.
pub fn read_records<R: Record>(blob: &mut Blob) -> Result<Vec<R>> {
    let len = blob.remaining();
    if len % R::SIZE != 0 {
        return Err(WadError::MalformedLump(format!(
            "{} is {} bytes, not a multiple of {}",
            R::LUMP,
            len,
            R::SIZE
        )));
    }

    (0..len / R::SIZE).map(|_| R::read(blob)).collect()
}

const NO_SIDEDEF: u16 = 0xFFFF;

fn option_wrap_sidedef(sidedef_index: u16) -> Option<usize> {
    if sidedef_index == NO_SIDEDEF {
        None
    } else {
        Some(sidedef_index as usize)
    }
}

fn option_wrap_texture_name(texture_name: LumpName) -> Option<LumpName> {
    if texture_name == "-" || texture_name.is_empty() {
        None
    } else {
        Some(texture_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub kind: i16,
    pub flags: i16,
}

impl Record for Thing {
    const SIZE: usize = 10;
    const LUMP: &'static str = "THINGS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(Thing {
            x: blob.read()?,
            y: blob.read()?,
            angle: blob.read()?,
            kind: blob.read()?,
            flags: blob.read()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapVertex {
    pub x: i16,
    pub y: i16,
}

impl Record for MapVertex {
    const SIZE: usize = 4;
    const LUMP: &'static str = "VERTEXES";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(MapVertex {
            x: blob.read()?,
            y: blob.read()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDef {
    pub start_vertex: usize,
    pub end_vertex: usize,
    pub flags: i16,
    pub special: i16,
    pub tag: i16,
    pub front_sidedef_index: Option<usize>,
    pub back_sidedef_index: Option<usize>,
}

impl Record for LineDef {
    const SIZE: usize = 14;
    const LUMP: &'static str = "LINEDEFS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(LineDef {
            start_vertex: blob.read::<u16>()? as usize,
            end_vertex: blob.read::<u16>()? as usize,
            flags: blob.read()?,
            special: blob.read()?,
            tag: blob.read()?,
            front_sidedef_index: option_wrap_sidedef(blob.read()?),
            back_sidedef_index: option_wrap_sidedef(blob.read()?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideDef {
    pub x_offset: i16,
    pub y_offset: i16,
    pub name_of_upper_texture: Option<LumpName>,
    pub name_of_lower_texture: Option<LumpName>,
    pub name_of_middle_texture: Option<LumpName>,
    pub sector_facing: usize,
}

impl Record for SideDef {
    const SIZE: usize = 30;
    const LUMP: &'static str = "SIDEDEFS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(SideDef {
            x_offset: blob.read()?,
            y_offset: blob.read()?,
            name_of_upper_texture: option_wrap_texture_name(blob.read_name()?),
            name_of_lower_texture: option_wrap_texture_name(blob.read_name()?),
            name_of_middle_texture: option_wrap_texture_name(blob.read_name()?),
            sector_facing: blob.read::<u16>()? as usize,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seg {
    pub start_vertex: u16,
    pub end_vertex: u16,
    pub angle: i16,
    pub linedef: u16,
    /// 0 when the seg runs along the linedef, 1 when it runs against it.
    pub direction: i16,
    pub offset: i16,
}

impl Record for Seg {
    const SIZE: usize = 12;
    const LUMP: &'static str = "SEGS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(Seg {
            start_vertex: blob.read()?,
            end_vertex: blob.read()?,
            angle: blob.read()?,
            linedef: blob.read()?,
            direction: blob.read()?,
            offset: blob.read()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSector {
    pub seg_count: u16,
    pub first_seg: u16,
}

impl Record for SubSector {
    const SIZE: usize = 4;
    const LUMP: &'static str = "SSECTORS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(SubSector {
            seg_count: blob.read()?,
            first_seg: blob.read()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: i16,
    pub bottom: i16,
    pub left: i16,
    pub right: i16,
}

impl BoundingBox {
    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(BoundingBox {
            top: blob.read()?,
            bottom: blob.read()?,
            left: blob.read()?,
            right: blob.read()?,
        })
    }
}

/// A BSP partition line with the bounds and children of both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    pub bounding_boxes: [BoundingBox; 2],
    /// High bit set means the child is a subsector.
    pub children: [u16; 2],
}

impl Record for Node {
    const SIZE: usize = 28;
    const LUMP: &'static str = "NODES";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(Node {
            x: blob.read()?,
            y: blob.read()?,
            dx: blob.read()?,
            dy: blob.read()?,
            bounding_boxes: [BoundingBox::read(blob)?, BoundingBox::read(blob)?],
            children: [blob.read()?, blob.read()?],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    pub floor_height: i16,
    pub ceiling_height: i16,
    pub name_of_floor_texture: LumpName,
    pub name_of_ceiling_texture: LumpName,
    pub light_level: i16,
    pub sector_type: i16,
    pub tag_number: i16,
}

impl Record for Sector {
    const SIZE: usize = 26;
    const LUMP: &'static str = "SECTORS";

    fn read(blob: &mut Blob) -> Result<Self> {
        Ok(Sector {
            floor_height: blob.read()?,
            ceiling_height: blob.read()?,
            name_of_floor_texture: blob.read_name()?,
            name_of_ceiling_texture: blob.read_name()?,
            light_level: blob.read()?,
            sector_type: blob.read()?,
            tag_number: blob.read()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Map {
    pub name: String,
    pub things: Vec<Thing>,
    pub vertexes: Vec<MapVertex>,
    pub linedefs: Vec<LineDef>,
    pub sidedefs: Vec<SideDef>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<SubSector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
    pub map_centerer: MapCenterer,
}

fn read_level_lump<R: Record, S: Source>(wad: &Wad<S>, level: &str, lumps: &[Entry]) -> Result<Vec<R>> {
    let entry = lumps
        .iter()
        .find(|e| e.name == R::LUMP)
        .ok_or_else(|| WadError::NotFound(format!("{}/{}", level, R::LUMP)))?;

    // A level without any records of a kind stores an empty lump.
    if entry.is_marker() {
        return Ok(Vec::new());
    }

    read_records(&mut wad.materialize(entry)?)
}

impl Map {
    pub fn load<S: Source>(wad: &Wad<S>, name: &str) -> Result<Map> {
        let lumps = wad.level_lumps(name)?;

        let vertexes: Vec<MapVertex> = read_level_lump(wad, name, lumps)?;

        let mut map_centerer = MapCenterer::new();
        for vertex in &vertexes {
            map_centerer.record_x(vertex.x);
            map_centerer.record_y(vertex.y);
        }

        let map = Map {
            name: name.to_owned(),
            things: read_level_lump(wad, name, lumps)?,
            vertexes,
            linedefs: read_level_lump(wad, name, lumps)?,
            sidedefs: read_level_lump(wad, name, lumps)?,
            segs: read_level_lump(wad, name, lumps)?,
            subsectors: read_level_lump(wad, name, lumps)?,
            nodes: read_level_lump(wad, name, lumps)?,
            sectors: read_level_lump(wad, name, lumps)?,
            map_centerer,
        };

        log::info!(
            "Loaded {}: {} vertexes, {} linedefs, {} sidedefs, {} sectors, {} things",
            map.name,
            map.vertexes.len(),
            map.linedefs.len(),
            map.sidedefs.len(),
            map.sectors.len(),
            map.things.len()
        );

        Ok(map)
    }
}

impl<S: Source> Wad<S> {
    /// Names of all level markers, in directory order.
    pub fn levels(&self) -> Vec<&LumpName> {
        self.markers()
            .into_iter()
            .filter(|e| is_level_marker(e.name.as_str()))
            .map(|e| &e.name)
            .collect()
    }

    /// The lumps directly following the level marker `name` that carry level
    /// lump names. The first lump with any other name ends the level.
    pub fn level_lumps(&self, name: &str) -> Result<&[Entry]> {
        let index = self.find_unique_index(name)?;
        let following = &self.entries()[index + 1..];

        let count = following
            .iter()
            .take_while(|e| LEVEL_LUMPS.contains(&e.name.as_str()))
            .count();

        Ok(&following[..count])
    }

    pub fn map(&self, name: &str) -> Result<Map> {
        Map::load(self, name)
    }
}
