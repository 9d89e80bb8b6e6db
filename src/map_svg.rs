use std::cmp;
use std::path::Path;

use svg::node::element::path::Data;
use svg::node::element::Path as SvgPath;
use svg::Document;

use crate::error::Result;
use crate::maps::Map;

// ORIGIN is top-left. y axis grows downward (as in, subtract to go up).

/// Running bounds of a level's vertexes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapCenterer {
    pub left_most_x: i16,
    pub right_most_x: i16,
    pub lower_most_y: i16,
    pub upper_most_y: i16,
}

impl Default for MapCenterer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapCenterer {
    pub fn new() -> MapCenterer {
        MapCenterer {
            left_most_x: i16::MAX,
            right_most_x: i16::MIN,
            lower_most_y: i16::MAX,
            upper_most_y: i16::MIN,
        }
    }

    pub fn record_x(&mut self, x: i16) {
        self.left_most_x = cmp::min(self.left_most_x, x);
        self.right_most_x = cmp::max(self.right_most_x, x);
    }

    pub fn record_y(&mut self, y: i16) {
        self.lower_most_y = cmp::min(self.lower_most_y, y);
        self.upper_most_y = cmp::max(self.upper_most_y, y);
    }

    pub fn is_empty(&self) -> bool {
        self.left_most_x > self.right_most_x
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.right_most_x as i32 - self.left_most_x as i32
        }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.upper_most_y as i32 - self.lower_most_y as i32
        }
    }
}

/// Builds the automap style line drawing of a level.
pub fn map_document(map: &Map) -> Document {
    let mut document = Document::new();

    // Offsets are done in i32; i16 coordinates can span more than i16::MAX.
    let map_x_offset = -(map.map_centerer.left_most_x as i32);
    let map_y_offset = -(map.map_centerer.upper_most_y as i32);

    for line in &map.linedefs {
        let (Some(v1), Some(v2)) = (map.vertexes.get(line.start_vertex), map.vertexes.get(line.end_vertex)) else {
            log::warn!(
                "{}: linedef references missing vertex {} or {}",
                map.name,
                line.start_vertex,
                line.end_vertex
            );
            continue;
        };

        let v1_x = v1.x as i32 + map_x_offset;
        let v2_x = v2.x as i32 + map_x_offset;
        let v1_y = v1.y as i32 + map_y_offset;
        let v2_y = v2.y as i32 + map_y_offset;

        let stroke = if line.back_sidedef_index.is_some() { "gray" } else { "black" };

        let path = SvgPath::new()
            .set("fill", "none")
            .set("stroke", stroke)
            .set("stroke-width", 10)
            .set(
                "d",
                Data::new()
                    .move_to((v1_x, -v1_y)) // flipping y axis at the last moment to account for SVG convention
                    .line_to((v2_x, -v2_y))
                    .close(),
            );

        document = document.add(path);
    }

    let width = map.map_centerer.width();
    let height = map.map_centerer.height();

    document
        .set("viewBox", (-10, -10, width + 20, height + 20))
        .set("width", width)
        .set("height", height)
}

pub fn draw_map_svg<P: AsRef<Path>>(map: &Map, path: P) -> Result<()> {
    let path = path.as_ref();
    svg::save(path, &map_document(map))?;

    log::info!("Wrote {} ({} lines) to {}", map.name, map.linedefs.len(), path.display());
    Ok(())
}
