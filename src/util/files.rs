use std::path::{Path, PathBuf};

/// Outputs land in a `pic` folder next to each source file.
pub static PIC_FOLDER: &str = "pic";

/// Everything the decoders can take. HEIC needs the `heif` build feature but
/// is always offered in the picker so the user gets a per-file error instead
/// of silently filtered selections.
pub const INPUT_EXTENSIONS: &[&str] = &[
    "heic", "jpg", "jpeg", "jfif", "png", "bmp", "gif", "tiff", "tif", "webp", "ico", "tga",
];

pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.as_str()))
}

/// Native multi-select picker. Returns `None` when the user cancels or picks
/// nothing usable.
pub fn pick_input_files() -> Option<Vec<PathBuf>> {
    let files = rfd::FileDialog::new()
        .add_filter("Image files", INPUT_EXTENSIONS)
        .pick_files()?;

    let files: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| is_supported_input(path))
        .collect();

    if files.is_empty() {
        None
    } else {
        Some(files)
    }
}

/// Derives where frame `frame_index` of `source` goes.
///
/// Single-frame sources map to `pic/<stem>.<ext>`; multi-frame sources get a
/// per-file subfolder, `pic/<stem>/<stem>_page<k>.<ext>` with k starting at 1.
/// Unique per (source, frame index).
pub fn output_path(source: &Path, extension: &str, frame_index: usize, frame_count: usize) -> PathBuf {
    let base = source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(PIC_FOLDER);

    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());

    if frame_count > 1 {
        base.join(&stem)
            .join(format!("{}_page{}.{}", stem, frame_index + 1, extension))
    } else {
        base.join(format!("{}.{}", stem, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame_lands_in_pic_folder() {
        let path = output_path(Path::new("/photos/cat.heic"), "jpg", 0, 1);
        assert_eq!(path, Path::new("/photos/pic/cat.jpg"));
    }

    #[test]
    fn multi_frame_gets_subfolder_and_page_numbers() {
        let first = output_path(Path::new("/photos/anim.gif"), "png", 0, 3);
        let last = output_path(Path::new("/photos/anim.gif"), "png", 2, 3);
        assert_eq!(first, Path::new("/photos/pic/anim/anim_page1.png"));
        assert_eq!(last, Path::new("/photos/pic/anim/anim_page3.png"));
    }

    #[test]
    fn paths_are_unique_per_frame() {
        let source = Path::new("doc.tiff");
        let a = output_path(source, "png", 0, 2);
        let b = output_path(source, "png", 1, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(is_supported_input(Path::new("a.TIFF")));
        assert!(is_supported_input(Path::new("b.JfIf")));
        assert!(!is_supported_input(Path::new("c.txt")));
        assert!(!is_supported_input(Path::new("noext")));
    }
}
