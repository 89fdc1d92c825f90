/// Icon sizes offered in the options dialog. The ICO container itself caps
/// variants at 256 pixels.
pub const ICO_SIZES: [u32; 5] = [16, 32, 64, 128, 256];

#[derive(Clone, PartialEq)]
pub enum TargetFormat {
    Jpeg(JpegSettings),
    Png,
    WebP(WebpSettings),
    Bmp,
    Gif,
    Tiff,
    Ico(IcoSettings),
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg(_) => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP(_) => "webp",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Gif => "gif",
            TargetFormat::Tiff => "tiff",
            TargetFormat::Ico(_) => "ico",
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetFormat::Jpeg(_) => write!(f, "JPG"),
            TargetFormat::Png => write!(f, "PNG"),
            TargetFormat::WebP(_) => write!(f, "WEBP"),
            TargetFormat::Bmp => write!(f, "BMP"),
            TargetFormat::Gif => write!(f, "GIF"),
            TargetFormat::Tiff => write!(f, "TIFF"),
            TargetFormat::Ico(_) => write!(f, "ICO"),
        }
    }
}

// Jpeg settings
#[derive(Clone, PartialEq)]
pub struct JpegSettings {
    pub quality: u8,
}

impl Default for JpegSettings {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

// Webp settings
#[derive(Clone, PartialEq)]
pub struct WebpSettings {
    pub quality: u8,
    pub lossless: bool,
}

impl Default for WebpSettings {
    fn default() -> Self {
        Self {
            quality: 90,
            lossless: false,
        }
    }
}

// Ico settings
#[derive(Clone, PartialEq)]
pub struct IcoSettings {
    pub size: u32,
}

impl Default for IcoSettings {
    fn default() -> Self {
        Self { size: 256 }
    }
}
