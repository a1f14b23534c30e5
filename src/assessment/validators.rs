//! Cheap local checks on incoming image payloads
//!
//! These run before any upstream call. They only look at the data URI
//! header and length; the image bytes are never decoded.

use super::prompts::MIN_IMAGE_LENGTH;

const DATA_URI_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = "base64,";

/// Image subtypes accepted in a data URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl ImageFormat {
    fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }
}

/// Parse `data:image/<subtype>;base64,<payload>` and return the subtype
///
/// The scheme and subtype are matched case-sensitively. Length is not
/// checked here.
pub fn parse_image_data_uri(candidate: &str) -> Option<ImageFormat> {
    let rest = candidate.strip_prefix(DATA_URI_PREFIX)?;
    let (subtype, rest) = rest.split_once(';')?;
    let format = ImageFormat::from_subtype(subtype)?;
    let payload = rest.strip_prefix(BASE64_MARKER)?;
    if payload.is_empty() {
        return None;
    }
    Some(format)
}

/// Image payload validator with a configurable minimum length
#[derive(Debug, Clone, Copy)]
pub struct ImageValidator {
    min_length: usize,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new(MIN_IMAGE_LENGTH)
    }
}

impl ImageValidator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns true if the candidate looks like a usable image data URI
    ///
    /// The minimum length is measured in characters.
    pub fn validate(&self, candidate: &str) -> bool {
        if candidate.is_empty() || candidate.chars().count() < self.min_length {
            return false;
        }
        parse_image_data_uri(candidate).is_some()
    }
}

/// Validate with the default minimum length
pub fn validate_image_data(candidate: &str) -> bool {
    ImageValidator::default().validate(candidate)
}
