use std::{fs::File, io::BufReader, path::Path};

use image::{codecs::gif::GifDecoder, AnimationDecoder, DynamicImage, ImageBuffer, ImageFormat, ImageReader};
use tiff::{decoder::DecodingResult, ColorType};

use crate::error::ConvertError;

/// Decodes `path` into its frames. Animated GIFs and multi-page TIFFs yield
/// one image per frame/page; every other container yields exactly one.
pub fn load_frames(path: &Path) -> Result<Vec<DynamicImage>, ConvertError> {
    if has_heic_extension(path) {
        return decode_heic(path).map(|image| vec![image]);
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;

    match reader.format() {
        Some(ImageFormat::Gif) => gif_frames(path),
        Some(ImageFormat::Tiff) => tiff_frames(path),
        _ => Ok(vec![reader.decode()?]),
    }
}

fn has_heic_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ext == "heic" || ext == "heif")
}

fn gif_frames(path: &Path) -> Result<Vec<DynamicImage>, ConvertError> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    let frames = decoder.into_frames().collect_frames()?;

    if frames.is_empty() {
        return Err(ConvertError::Unsupported("GIF with no frames".to_owned()));
    }

    Ok(frames
        .into_iter()
        .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
        .collect())
}

fn tiff_frames(path: &Path) -> Result<Vec<DynamicImage>, ConvertError> {
    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(File::open(path)?))?;
    let mut frames = Vec::new();

    loop {
        frames.push(tiff_page(&mut decoder)?);
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    Ok(frames)
}

fn tiff_page(
    decoder: &mut tiff::decoder::Decoder<BufReader<File>>,
) -> Result<DynamicImage, ConvertError> {
    let (width, height) = decoder.dimensions()?;
    let color = decoder.colortype()?;
    let data = decoder.read_image()?;

    let image = match (color, data) {
        (ColorType::Gray(8), DecodingResult::U8(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageLuma8)
        }
        (ColorType::GrayA(8), DecodingResult::U8(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageLumaA8)
        }
        (ColorType::RGB(8), DecodingResult::U8(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageRgb8)
        }
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageRgba8)
        }
        (ColorType::Gray(16), DecodingResult::U16(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageLuma16)
        }
        (ColorType::RGB(16), DecodingResult::U16(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageRgb16)
        }
        (ColorType::RGBA(16), DecodingResult::U16(buf)) => {
            ImageBuffer::from_raw(width, height, buf).map(DynamicImage::ImageRgba16)
        }
        (other, _) => {
            return Err(ConvertError::Unsupported(format!(
                "TIFF color type {other:?}"
            )))
        }
    };

    image.ok_or_else(|| ConvertError::Unsupported("truncated TIFF page".to_owned()))
}

#[cfg(feature = "heif")]
fn decode_heic(path: &Path) -> Result<DynamicImage, ConvertError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let heic = |e: String| ConvertError::Unsupported(format!("HEIC: {e}"));

    let lib_heif = LibHeif::new();
    let context =
        HeifContext::read_from_file(&path.to_string_lossy()).map_err(|e| heic(e.to_string()))?;
    let handle = context
        .primary_image_handle()
        .map_err(|e| heic(e.to_string()))?;
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(|e| heic(e.to_string()))?;

    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| heic("no interleaved plane".to_owned()))?;

    // Rows may be padded; copy out stride by stride.
    let row_bytes = plane.width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * plane.height as usize);
    for row in plane.data.chunks(plane.stride) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }

    image::RgbaImage::from_raw(plane.width, plane.height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| heic("malformed pixel buffer".to_owned()))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_path: &Path) -> Result<DynamicImage, ConvertError> {
    Err(ConvertError::Unsupported(
        "HEIC input requires a build with the 'heif' feature".to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::codecs::gif::GifEncoder;
    use image::{Frame, Rgba, RgbaImage};
    use tempfile::tempdir;
    use tiff::encoder::{colortype, TiffEncoder};

    use super::*;

    #[test]
    fn plain_png_is_a_single_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.png");
        RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!((frames[0].width(), frames[0].height()), (6, 4));
    }

    #[test]
    fn animated_gif_yields_every_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.gif");

        let mut encoder = GifEncoder::new(File::create(&path).unwrap());
        for color in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
            let buffer = RgbaImage::from_pixel(8, 8, Rgba(color));
            encoder.encode_frame(Frame::new(buffer)).unwrap();
        }
        drop(encoder);

        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn multi_page_tiff_yields_every_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.tiff");

        let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
        let page: Vec<u8> = vec![120; 5 * 3 * 3];
        encoder.write_image::<colortype::RGB8>(5, 3, &page).unwrap();
        encoder.write_image::<colortype::RGB8>(5, 3, &page).unwrap();

        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!((frames[0].width(), frames[0].height()), (5, 3));
    }

    #[test]
    fn sixteen_bit_tiff_page_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep.tiff");

        let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
        let page: Vec<u16> = vec![40_000; 4 * 4];
        encoder
            .write_image::<colortype::Gray16>(4, 4, &page)
            .unwrap();

        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0], DynamicImage::ImageLuma16(_)));
    }

    #[test]
    fn corrupt_input_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"this is not an image").unwrap();

        assert!(load_frames(&path).is_err());
    }

    #[cfg(not(feature = "heif"))]
    #[test]
    fn heic_without_feature_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.heic");
        fs::write(&path, b"").unwrap();

        match load_frames(&path) {
            Err(ConvertError::Unsupported(_)) => {}
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }
}
