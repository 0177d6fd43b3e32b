use image::ImageError;

use crate::{
    assets::{decoded::DecodedImage, source::ImageSource},
    foundation::error::DecodeError,
};

/// Decode encoded raster bytes into a [`DecodedImage`] tagged with `origin`.
pub fn decode_image(bytes: &[u8], origin: &str) -> Result<DecodedImage, DecodeError> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| classify(origin, e))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::Corrupt {
            name: origin.to_string(),
            message: "image has zero width or height".to_string(),
        });
    }
    Ok(DecodedImage::from_rgba(rgba, origin))
}

/// Read and decode one source. Runs on a blocking thread under [`crate::Decoder`].
pub fn decode_source(source: &dyn ImageSource) -> Result<DecodedImage, DecodeError> {
    let name = source.name();
    let bytes = source.read_bytes().map_err(|e| DecodeError::Read {
        name: name.to_string(),
        message: format!("{e:#}"),
    })?;
    decode_image(&bytes, name)
}

fn classify(origin: &str, err: ImageError) -> DecodeError {
    let name = origin.to_string();
    let message = err.to_string();
    match err {
        ImageError::Unsupported(_) => DecodeError::Unsupported { name, message },
        ImageError::IoError(_) => DecodeError::Read { name, message },
        _ => DecodeError::Corrupt { name, message },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
