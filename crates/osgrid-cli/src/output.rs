//! Encoders for surfaces and textures.

use crate::error::{CliError, Result};
use clap::ValueEnum;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageBuffer, Luma, RgbaImage};
use osgrid_model::{RowOrder, Surface};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Output path meaning standard output.
pub const STDOUT: &str = "-";

/// Quality used for JPEG textures.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceFormat {
    /// Text, values joined with --sep
    Txt,
    Csv,
    Tsv,
    /// Space separated
    Dat,
    /// 16-bit greyscale height map
    Png,
}

impl SurfaceFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "dat" => Some(Self::Dat),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// The format given, else the one named by `outfile`'s extension. Text
    /// when writing to stdout.
    pub fn resolve(format: Option<Self>, outfile: &str) -> Result<Self> {
        if let Some(format) = format {
            return Ok(format);
        }
        if outfile == STDOUT {
            return Ok(Self::Txt);
        }
        extension(outfile)
            .and_then(Self::from_extension)
            .ok_or_else(|| unknown_format(outfile))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextureFormat {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
}

impl TextureFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn resolve(format: Option<Self>, outfile: &str) -> Result<Self> {
        if let Some(format) = format {
            return Ok(format);
        }
        extension(outfile)
            .and_then(Self::from_extension)
            .ok_or_else(|| unknown_format(outfile))
    }
}

fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

fn unknown_format(outfile: &str) -> CliError {
    CliError::InvalidArgument(format!(
        "can't tell the format of '{outfile}' from its extension, use --format"
    ))
}

/// Stdout for [`STDOUT`], otherwise a newly created file.
pub fn open(outfile: &str) -> Result<Box<dyn Write>> {
    if outfile == STDOUT {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(outfile)?)))
    }
}

/// How [`write_surface`] renders values.
#[derive(Debug, Clone)]
pub struct SurfaceStyle {
    /// Separator for [`SurfaceFormat::Txt`].
    pub separator: String,
    /// Gamma encode greyscale output.
    pub srgb: bool,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
            srgb: false,
        }
    }
}

pub fn write_surface<W: Write>(
    out: &mut W,
    surface: &Surface,
    format: SurfaceFormat,
    style: &SurfaceStyle,
) -> Result<()> {
    match format {
        SurfaceFormat::Txt => write_separated(out, surface, &style.separator)?,
        SurfaceFormat::Csv => write_separated(out, surface, ",")?,
        SurfaceFormat::Tsv => write_separated(out, surface, "\t")?,
        SurfaceFormat::Dat => write_separated(out, surface, " ")?,
        SurfaceFormat::Png => {
            let image = DynamicImage::ImageLuma16(height_map(surface, style.srgb));
            let mut buf = Vec::new();
            image.write_with_encoder(PngEncoder::new(&mut buf))?;
            out.write_all(&buf)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// One line per row, in the surface's row order.
fn write_separated<W: Write>(out: &mut W, surface: &Surface, sep: &str) -> io::Result<()> {
    for row in surface.iter_rows() {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        writeln!(out, "{}", line.join(sep))?;
    }
    Ok(())
}

/// Greyscale image of `surface` with north at the top, scaled so the lowest
/// sample is black and the highest white.
pub fn height_map(surface: &Surface, srgb: bool) -> ImageBuffer<Luma<u16>, Vec<u16>> {
    let (min, max) = (surface.min(), surface.max());
    let range = max - min;
    let width = u32::try_from(surface.cols()).unwrap_or(u32::MAX);
    let height = u32::try_from(surface.rows()).unwrap_or(u32::MAX);

    ImageBuffer::from_fn(width, height, |x, y| {
        let row = match surface.row_order() {
            RowOrder::NorthToSouth => y as usize,
            RowOrder::SouthToNorth => surface.rows() - 1 - y as usize,
        };
        let value = surface.get(row, x as usize).unwrap_or(min);
        let mut level = if range > 0.0 { (value - min) / range } else { 0.0 };
        if srgb {
            level = srgb_encode(level);
        }
        Luma([(level * f64::from(u16::MAX)).round() as u16])
    })
}

/// Linear light to the sRGB transfer curve, both in `[0, 1]`.
fn srgb_encode(linear: f64) -> f64 {
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

pub fn write_texture<W: Write>(out: &mut W, image: RgbaImage, format: TextureFormat) -> Result<()> {
    let mut buf = Vec::new();
    match format {
        TextureFormat::Png => {
            DynamicImage::ImageRgba8(image).write_with_encoder(PngEncoder::new(&mut buf))?;
        }
        TextureFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
            DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
        }
    }
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}
