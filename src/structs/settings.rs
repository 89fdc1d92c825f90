use super::file_type::{JpegSettings, TargetFormat};

/// One conversion run's options. Cloned into the worker thread when the run
/// starts; the UI keeps its own copy for the next run.
#[derive(Clone)]
pub struct Settings {
    pub target: TargetFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: TargetFormat::Jpeg(JpegSettings::default()),
        }
    }
}
