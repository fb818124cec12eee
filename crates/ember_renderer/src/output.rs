//! Hand-off from the frame buffer to an image encoder.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::{ColorType, ImageFormat};
use thiserror::Error;

use crate::FrameBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format for {0} (expected .bmp or .png)")]
    UnsupportedFormat(String),
}

/// Encode the buffer as RGBA8 in `format`.
pub fn write_image<W: Write + Seek>(
    buffer: &FrameBuffer,
    writer: &mut W,
    format: ImageFormat,
) -> Result<(), OutputError> {
    let rgba = buffer.to_rgba8();
    image::write_buffer_with_format(
        writer,
        &rgba,
        buffer.width(),
        buffer.height(),
        ColorType::Rgba8,
        format,
    )?;
    Ok(())
}

/// Save the buffer to `path`, choosing BMP or PNG from the extension.
pub fn save_image(buffer: &FrameBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Bmp | ImageFormat::Png)) => format,
        _ => return Err(OutputError::UnsupportedFormat(path.display().to_string())),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    write_image(buffer, &mut writer, format)?;
    writer.flush()?;

    log::info!("Saved {}x{} image to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}
