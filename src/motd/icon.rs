//! Server-list icons.
//!
//! Icons are decoded once at load time and re-encoded to PNG, the only format
//! the status response carries. Nothing here runs while answering a query.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};

/// Edge length, in pixels, the status protocol expects.
pub const ICON_SIZE: u32 = 64;

static DECODER_SUFFIXES: OnceLock<BTreeSet<String>> = OnceLock::new();

/// File-name suffixes (with leading dot) of every format the linked `image`
/// build can decode. Computed on first use and cached for the process.
pub fn decoder_suffixes() -> &'static BTreeSet<String> {
    DECODER_SUFFIXES.get_or_init(|| {
        ImageFormat::all()
            .filter(|format| format.reading_enabled())
            .flat_map(|format| format.extensions_str().iter())
            .map(|ext| format!(".{ext}"))
            .collect()
    })
}

/// A decoded icon together with its PNG encoding.
#[derive(Clone)]
pub struct Icon {
    name: String,
    image: RgbaImage,
    png: Vec<u8>,
}

impl Icon {
    /// Decode any supported format; the format is sniffed from the bytes.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_image(name, decoded)
    }

    /// Decode a file, sniffing the format from its bytes and falling back to
    /// the extension for formats without a signature (TGA).
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = match image::guess_format(&bytes) {
            Ok(format) => format,
            Err(_) => ImageFormat::from_path(path)?,
        };
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        Self::from_image(name, decoded)
    }

    pub fn from_image(name: impl Into<String>, image: DynamicImage) -> Result<Self, ImageError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            name: name.into(),
            image: image.to_rgba8(),
            png,
        })
    }

    /// File name the icon was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn has_protocol_size(&self) -> bool {
        self.width() == ICON_SIZE && self.height() == ICON_SIZE
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...`, the favicon form of a status response.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("png_len", &self.png.len())
            .finish()
    }
}
