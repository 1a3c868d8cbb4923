#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Ico,
    Avif,
    Svg,
    Unknown,
}

impl ImageFormat {
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::WebP => Some("image/webp"),
            Self::Bmp => Some("image/bmp"),
            Self::Ico => Some("image/x-icon"),
            Self::Avif => Some("image/avif"),
            Self::Svg => Some("image/svg+xml"),
            Self::Unknown => None,
        }
    }
}

/// How many leading bytes are inspected when sniffing text formats.
const SVG_SNIFF_BYTES: usize = 1024;

/// Detect image format from the first bytes of a response body.
pub fn detect_image_format(header: &[u8]) -> ImageFormat {
    if header.starts_with(b"\x89PNG\r\n\x1a\n") {
        return ImageFormat::Png;
    }

    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return ImageFormat::Jpeg;
    }

    if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
        return ImageFormat::Gif;
    }

    // RIFF container: "RIFF" <size:4> "WEBP"
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return ImageFormat::WebP;
    }

    if is_bmp(header) {
        return ImageFormat::Bmp;
    }

    // ICONDIR: reserved=0, type=1
    if header.len() >= 6 && header[0..4] == [0x00, 0x00, 0x01, 0x00] && header[4..6] != [0, 0] {
        return ImageFormat::Ico;
    }

    if is_avif(header) {
        return ImageFormat::Avif;
    }

    if is_svg(header) {
        return ImageFormat::Svg;
    }

    ImageFormat::Unknown
}

/// BITMAPFILEHEADER ("BM", size, two zero reserved words) followed by a DIB
/// header whose size field is one of the known variants.
fn is_bmp(header: &[u8]) -> bool {
    if header.len() < 18 || &header[0..2] != b"BM" {
        return false;
    }
    if header[6..10] != [0, 0, 0, 0] {
        return false;
    }

    let dib_size = u32::from_le_bytes([header[14], header[15], header[16], header[17]]);
    matches!(dib_size, 12 | 16 | 40 | 52 | 56 | 64 | 108 | 124)
}

/// ISO-BMFF `ftyp` box whose major or compatible brands include `avif`/`avis`.
fn is_avif(header: &[u8]) -> bool {
    if header.len() < 16 || &header[4..8] != b"ftyp" {
        return false;
    }

    let box_size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let end = box_size.clamp(16, header.len());

    // Major brand at 8..12, minor version at 12..16, compatible brands after.
    let is_avif_brand = |brand: &[u8]| brand == b"avif" || brand == b"avis";
    if is_avif_brand(&header[8..12]) {
        return true;
    }
    header[16..end].chunks_exact(4).any(is_avif_brand)
}

fn is_svg(header: &[u8]) -> bool {
    let window = &header[..header.len().min(SVG_SNIFF_BYTES)];
    let text = String::from_utf8_lossy(window);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with("<svg") {
        return true;
    }
    (trimmed.starts_with("<?xml") || trimmed.starts_with("<!DOCTYPE svg")) && trimmed.contains("<svg")
}
