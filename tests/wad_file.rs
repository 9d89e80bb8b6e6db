//! Reads a WAD from disk and writes its graphics and a level back out.

use std::fs;
use std::path::PathBuf;

use doomwad::colors::BACKGROUND;
use doomwad::map_svg::draw_map_svg;
use doomwad::png_dump::dump_picture;
use doomwad::{render, Namespace, Wad, WadError, WadKind};
use tempfile::TempDir;
use wad_test_utils::{picture_bytes, playpal_bytes, words, WadBuilder};

fn sample_wad() -> Vec<u8> {
    WadBuilder::iwad()
        .lump("PLAYPAL", playpal_bytes())
        .marker("E1M1")
        .lump("THINGS", words(&[0, 0, 90, 1, 7]))
        .lump("LINEDEFS", words(&[0, 1, 1, 0, 0, 0, -1]))
        .marker("SIDEDEFS")
        .lump("VERTEXES", words(&[-64, 32, 128, -96]))
        .marker("SEGS")
        .marker("SSECTORS")
        .marker("NODES")
        .marker("SECTORS")
        .lump("TITLEPIC", picture_bytes(2, 4, &[vec![(1, vec![7, 8, 9])], vec![]]))
        .marker("F_START")
        .lump("FLOOR0_1", vec![4u8; 4096])
        .marker("F_END")
        .build()
}

fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sample.wad");
    fs::write(&path, sample_wad()).unwrap();
    path
}

#[test]
fn opens_file_backed_wad() {
    let dir = TempDir::new().unwrap();
    let wad = Wad::open(write_sample(&dir)).unwrap();

    assert_eq!(wad.header().kind, WadKind::Iwad);
    assert_eq!(wad.entries().len(), 14);
    assert_eq!(wad.levels().len(), 1);
    assert_eq!(wad.level_lumps("E1M1").unwrap().len(), 8);

    let flats = wad.namespace(Namespace::Flats).unwrap();
    assert_eq!(flats.len(), 1);
    assert_eq!(flats[0].name, "FLOOR0_1");
}

#[test]
fn missing_file_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let err = Wad::open(dir.path().join("missing.wad")).unwrap_err();

    assert!(matches!(err, WadError::IoFailure(_)));
}

#[test]
fn picture_renders_to_png() {
    let dir = TempDir::new().unwrap();
    let wad = Wad::open(write_sample(&dir)).unwrap();

    let image = wad.picture("TITLEPIC").unwrap();
    assert_eq!(image.column(0).collect::<Vec<_>>(), [255, 7, 8, 9]);
    assert!(image.column(1).all(|index| index == 255));

    let playpal = wad.playpal("PLAYPAL").unwrap();
    let raster = render(&image, &playpal[0]);
    assert_eq!(raster.get_pixel(0, 2).0, [8, 0, 247, 255]);
    assert_eq!(*raster.get_pixel(1, 2), BACKGROUND);

    let out = dir.path().join("titlepic.png");
    dump_picture(&raster, &out).unwrap();

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn flat_renders_opaque() {
    let dir = TempDir::new().unwrap();
    let wad = Wad::open(write_sample(&dir)).unwrap();

    let flat = wad.flat("FLOOR0_1").unwrap();
    let playpal = wad.playpal("PLAYPAL").unwrap();
    let raster = render(&flat.to_image(), &playpal[1]);

    assert_eq!(raster.dimensions(), (64, 64));
    assert!(raster.pixels().all(|p| p.0 == [4, 1, 251, 255]));
}

#[test]
fn level_draws_to_svg() {
    let dir = TempDir::new().unwrap();
    let wad = Wad::open(write_sample(&dir)).unwrap();

    let map = wad.map("E1M1").unwrap();
    assert_eq!(map.things.len(), 1);
    assert_eq!(map.vertexes.len(), 2);
    assert_eq!(map.linedefs[0].back_sidedef_index, None);
    assert!(map.sidedefs.is_empty());
    assert_eq!(map.map_centerer.width(), 192);
    assert_eq!(map.map_centerer.height(), 128);

    let out = dir.path().join("e1m1.svg");
    draw_map_svg(&map, &out).unwrap();

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<path"));
}

#[test]
fn file_source_reads_from_many_threads() {
    let names: Vec<String> = (0..8).map(|i| format!("LUMP{}", i)).collect();
    let builder = names.iter().enumerate().fold(WadBuilder::pwad(), |builder, (i, name)| {
        builder.lump(name, vec![i as u8; 1000 + i * 37])
    });

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("threads.wad");
    fs::write(&path, builder.build()).unwrap();
    let wad = Wad::open(&path).unwrap();

    std::thread::scope(|scope| {
        for thread in 0..4 {
            let wad = &wad;
            let names = &names;
            scope.spawn(move || {
                for round in 0..50 {
                    let i = (thread * 3 + round) % names.len();
                    let blob = wad.blob(&names[i]).unwrap();

                    assert_eq!(blob.len(), 1000 + i * 37);
                    assert!(blob.bytes().iter().all(|&b| b == i as u8));
                }
            });
        }
    });
}
