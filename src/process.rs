use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc,
    },
    time::Instant,
};

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ImageFormat};
use log::{info, warn};

use crate::{
    error::ConvertError,
    frames::load_frames,
    structs::{file_type::TargetFormat, settings::Settings, update::Update},
    util::files::output_path,
};

/// Worker entry point. Converts each file in order, skipping the rest of the
/// queue when the stop flag is raised; the in-flight file always completes.
pub fn convert_images(
    sender: Sender<Update>,
    stop_flag: Arc<AtomicBool>,
    files: Vec<PathBuf>,
    settings: Settings,
) {
    let queue_start = Instant::now();
    info!("processing {} files", files.len());

    let _ = sender.send(Update::Message(format!(
        "Processing {} file(s)...",
        files.len()
    )));

    for file in files {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        let start_time = Instant::now();
        if sender.send(Update::StartProcessing(file.clone())).is_err() {
            return;
        }

        let result = convert_file(&file, &settings);
        if let Err(e) = &result {
            warn!("failed to process '{}': {}", file.display(), e);
        }

        let update = Update::FinishedProcessing(file, result, start_time.elapsed());
        if sender.send(update).is_err() {
            return;
        }
    }

    let _ = sender.send(Update::QueueCompleted(queue_start.elapsed()));
}

/// Converts every frame of one file. Returns the number of outputs written.
pub fn convert_file(path: &Path, settings: &Settings) -> Result<usize, ConvertError> {
    if let TargetFormat::Ico(options) = &settings.target {
        if !(16..=256).contains(&options.size) {
            return Err(ConvertError::Unsupported(format!(
                "ICO size {} out of range",
                options.size
            )));
        }
    }

    let frames = load_frames(path)?;
    let frame_count = frames.len();

    for (frame_index, frame) in frames.into_iter().enumerate() {
        let frame = prepare_frame(frame, &settings.target);
        let data = encode_frame(&frame, &settings.target)?;

        let target = output_path(path, settings.target.extension(), frame_index, frame_count);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&target, &data)?;
    }

    Ok(frame_count)
}

/// Resizes for ICO targets and normalizes the pixel format to what the
/// target encoder accepts.
fn prepare_frame(image: DynamicImage, target: &TargetFormat) -> DynamicImage {
    let image = match target {
        TargetFormat::Ico(options) => {
            image.resize_exact(options.size, options.size, FilterType::Lanczos3)
        }
        _ => image,
    };

    match target {
        // JPEG carries neither alpha nor 16-bit samples.
        TargetFormat::Jpeg(_) => DynamicImage::ImageRgb8(image.to_rgb8()),

        TargetFormat::WebP(_) | TargetFormat::Bmp | TargetFormat::Gif | TargetFormat::Ico(_) => {
            match image {
                DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
                other => DynamicImage::ImageRgba8(other.to_rgba8()),
            }
        }

        // PNG and TIFF encoders take the full 8/16-bit gray and color range.
        TargetFormat::Png | TargetFormat::Tiff => match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        },
    }
}

fn encode_frame(image: &DynamicImage, target: &TargetFormat) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();

    match target {
        TargetFormat::Jpeg(options) => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, options.quality))?;
        }

        TargetFormat::WebP(options) => {
            let encoder = webp::Encoder::from_image(image)
                .map_err(|e| ConvertError::Encode("WebP", e.to_string()))?;

            let memory = match options.lossless {
                true => encoder.encode_lossless(),
                false => encoder.encode(options.quality as f32),
            };
            buf = memory.to_vec();
        }

        TargetFormat::Png => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?,
        TargetFormat::Bmp => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)?,
        TargetFormat::Gif => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif)?,
        TargetFormat::Tiff => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff)?,
        TargetFormat::Ico(_) => image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Ico)?,
    }

    Ok(buf)
}
