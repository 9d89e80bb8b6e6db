use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::RgbaImage;

/// Writes a rendered picture as an 8-bit RGBA PNG.
pub fn dump_picture<P: AsRef<Path>>(raster: &RgbaImage, path: P) -> Result<(), png::EncodingError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(raster.as_raw())?;
    writer.finish()?;

    log::info!("Wrote {}x{} picture to {}", raster.width(), raster.height(), path.display());
    Ok(())
}
