//! Image encoding for finished renders.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::ImageBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match {width}x{height} RGB")]
    BufferSize { width: u32, height: u32 },
}

/// Write the image as ASCII PPM (P3), one pixel per line.
pub fn write_ppm<W: Write>(mut writer: W, image: &ImageBuffer) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for pixel in image.as_bytes().chunks_exact(ImageBuffer::CHANNELS) {
        writeln!(writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }

    writer.flush()
}

/// Save the image, choosing the format from the file extension.
///
/// `.ppm` is written as ASCII P3; anything else goes through the `image`
/// crate (PNG, JPEG, BMP, ...).
pub fn save<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        write_ppm(BufWriter::new(File::create(path)?), image)?;
    } else {
        to_rgb_image(image)?.save(path)?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

/// Save the image as PNG regardless of the file extension.
pub fn save_png<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> Result<(), OutputError> {
    to_rgb_image(image)?.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

fn to_rgb_image(image: &ImageBuffer) -> Result<image::RgbImage, OutputError> {
    image::RgbImage::from_raw(image.width, image.height, image.as_bytes().to_vec()).ok_or(
        OutputError::BufferSize {
            width: image.width,
            height: image.height,
        },
    )
}
