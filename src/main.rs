use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use doomwad::colors::{self, Palette};
use doomwad::map_svg::draw_map_svg;
use doomwad::png_dump::dump_picture;
use doomwad::{Entry, Image, Wad};

#[derive(Parser)]
#[command(name = "wad", about = "Inspect and extract Doom WAD files")]
struct Cli {
    /// WAD file to read.
    #[arg(long, env = "DOOM_WAD", default_value = "doom.wad")]
    wad: PathBuf,

    /// PLAYPAL palette used when rendering pictures and flats.
    #[arg(long, default_value_t = 0)]
    palette: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every directory entry in order.
    Entries,
    /// List the zero sized marker entries.
    Markers,
    /// List the entries between two markers. Without END the range stops at
    /// the next marker of any name.
    Range {
        start: String,
        #[arg(default_value = "")]
        end: String,
    },
    /// List the levels and their lumps.
    Levels,
    /// Render a picture lump (patch, sprite, menu graphic) to PNG.
    Picture {
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a flat from the F_START/F_END range to PNG.
    Flat {
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the texture definitions of TEXTURE1 or TEXTURE2.
    Textures {
        #[arg(default_value = "TEXTURE1")]
        lump: String,
    },
    /// Draw the linedefs of a level to SVG.
    Map {
        level: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn print_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) {
    for entry in entries {
        println!("{:<8} {:>10} {:>8}", entry.name, entry.offset, entry.size);
    }
}

fn palette(wad: &Wad, index: usize) -> Result<Palette> {
    let playpal = wad.playpal("PLAYPAL").context("failed to read PLAYPAL")?;
    let palette = playpal
        .palette(index)
        .with_context(|| format!("PLAYPAL has no palette {}", index))?;

    Ok(palette.clone())
}

fn write_png(image: &Image, palette: &Palette, out: Option<PathBuf>, name: &str) -> Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
    let raster = colors::render(image, palette);

    dump_picture(&raster, &out).with_context(|| format!("failed to write {}", out.display()))
}

fn open(path: &Path) -> Result<Wad> {
    Wad::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let wad = open(&cli.wad)?;

    match cli.command {
        Command::Entries => {
            let header = wad.header();
            println!("{:?}, {} entries", header.kind, header.entry_count);
            print_entries(wad.entries());
        }
        Command::Markers => print_entries(wad.markers()),
        Command::Range { start, end } => {
            let range = wad
                .entries_for_markers(&start, &end)
                .with_context(|| format!("failed to resolve range {}..{}", start, end))?;
            print_entries(range);
        }
        Command::Levels => {
            for level in wad.levels() {
                let lumps = wad.level_lumps(level.as_str())?;
                let names: Vec<&str> = lumps.iter().map(|entry| entry.name.as_str()).collect();
                println!("{:<8} {}", level, names.join(" "));
            }
        }
        Command::Picture { name, out } => {
            let image = wad.picture(&name).with_context(|| format!("failed to decode {}", name))?;
            log::info!(
                "{}: {}x{}, offset ({}, {})",
                name,
                image.width(),
                image.height(),
                image.header.x_offset,
                image.header.y_offset
            );

            write_png(&image, &palette(&wad, cli.palette)?, out, &name)?;
        }
        Command::Flat { name, out } => {
            let flat = wad.flat(&name).with_context(|| format!("failed to read flat {}", name))?;

            write_png(&flat.to_image(), &palette(&wad, cli.palette)?, out, &name)?;
        }
        Command::Textures { lump } => {
            let textures = wad.textures(&lump).with_context(|| format!("failed to read {}", lump))?;
            let patch_names = wad.patch_names("PNAMES").context("failed to read PNAMES")?;

            for texture in &textures {
                let header = &texture.header;
                println!("{:<8} {}x{}", header.name, header.width, header.height);

                for patch in &texture.patches {
                    let patch_name = patch.name(&patch_names).map_or("?", |name| name.as_str());
                    println!("    {:<8} at ({}, {})", patch_name, patch.origin_x, patch.origin_y);
                }
            }
        }
        Command::Map { level, out } => {
            let map = wad.map(&level).with_context(|| format!("failed to load level {}", level))?;
            println!(
                "{}: {} things, {} linedefs, {} sectors",
                map.name,
                map.things.len(),
                map.linedefs.len(),
                map.sectors.len()
            );

            let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.svg", level)));
            draw_map_svg(&map, &out).with_context(|| format!("failed to write {}", out.display()))?;
        }
    }

    Ok(())
}
