use std::{fmt, io::Cursor, str::FromStr};

use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder, codecs::png::PngEncoder};

use crate::{
    foundation::error::{StitchError, StitchResult},
    render::surface::Surface,
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Encoded output format.
pub enum OutputFormat {
    /// Lossless PNG; quality is ignored.
    #[default]
    Png,
    /// Lossy JPEG at the configured quality.
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(StitchError::validation(format!(
                "unknown output format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// Lossy encoding quality in percent, `0..=100`.
pub struct Quality(u8);

impl Quality {
    /// Default quality for lossy output.
    pub const DEFAULT: Self = Self(92);

    /// Validate a percentage.
    pub fn new(percent: u8) -> StitchResult<Self> {
        if percent > 100 {
            return Err(StitchError::validation(format!(
                "quality must be within 0..=100 (got {percent})"
            )));
        }
        Ok(Self(percent))
    }

    /// Percentage value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = StitchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quality {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: u8 = s
            .trim()
            .trim_end_matches('%')
            .parse()
            .map_err(|_| StitchError::validation(format!("invalid quality '{s}'")))?;
        Self::new(v)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Format and quality used when encoding a composed surface.
pub struct ExportOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Quality for lossy formats.
    pub quality: Quality,
}

/// Encode `surface` according to `options`.
///
/// JPEG carries no alpha channel, so the surface is flattened to RGB; composed outputs are
/// opaque already because they start from a white background.
pub fn encode_surface(surface: &Surface, options: &ExportOptions) -> StitchResult<Vec<u8>> {
    let (w, h) = (surface.width(), surface.height());
    if w == 0 || h == 0 {
        return Err(StitchError::encode("cannot encode an empty surface"));
    }

    let rgba = surface.to_rgba_image();
    let mut buf = Vec::new();
    match options.format {
        OutputFormat::Png => PngEncoder::new(Cursor::new(&mut buf))
            .write_image(rgba.as_raw(), w, h, ExtendedColorType::Rgba8)
            .map_err(|e| StitchError::encode(format!("png: {e}")))?,
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            // The JPEG encoder works in 1..=100.
            let quality = options.quality.get().max(1);
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
                .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(|e| StitchError::encode(format!("jpeg: {e}")))?
        }
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
