use egui::Ui;

use crate::structs::{
    file_type::{IcoSettings, JpegSettings, TargetFormat, WebpSettings, ICO_SIZES},
    settings::Settings,
};

pub fn format_input(ui: &mut Ui, settings: &mut Settings) {
    egui::ComboBox::from_label("Output format")
        .selected_text(format!("{}", settings.target))
        .show_ui(ui, |ui| {
            ui.selectable_value(
                &mut settings.target,
                TargetFormat::Jpeg(JpegSettings::default()),
                "JPG",
            );
            ui.selectable_value(&mut settings.target, TargetFormat::Png, "PNG");
            ui.selectable_value(
                &mut settings.target,
                TargetFormat::WebP(WebpSettings::default()),
                "WEBP",
            );
            ui.selectable_value(&mut settings.target, TargetFormat::Bmp, "BMP");
            ui.selectable_value(&mut settings.target, TargetFormat::Gif, "GIF");
            ui.selectable_value(&mut settings.target, TargetFormat::Tiff, "TIFF");
            ui.selectable_value(
                &mut settings.target,
                TargetFormat::Ico(IcoSettings::default()),
                "ICO",
            );
        });

    match &mut settings.target {
        TargetFormat::Jpeg(options) => {
            ui.add(egui::Slider::new(&mut options.quality, 5..=100).text("Quality"));
        }

        TargetFormat::WebP(options) => {
            ui.add(egui::Checkbox::new(&mut options.lossless, "Lossless"));
            ui.add_enabled(
                !options.lossless,
                egui::Slider::new(&mut options.quality, 5..=100).text("Quality"),
            );
        }

        TargetFormat::Ico(options) => {
            egui::ComboBox::from_label("Icon size")
                .selected_text(format!("{0}x{0}", options.size))
                .show_ui(ui, |ui| {
                    for size in ICO_SIZES {
                        ui.selectable_value(&mut options.size, size, format!("{size}x{size}"));
                    }
                });
        }

        TargetFormat::Png | TargetFormat::Bmp | TargetFormat::Gif | TargetFormat::Tiff => {}
    }
}
