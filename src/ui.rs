use std::path::{Path, PathBuf};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver},
        Arc,
    },
    thread,
    time::Duration,
};

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::components::options::format_input;
use crate::process::convert_images;
use crate::structs::{settings::Settings, update::Update};
use crate::types::Progress;
use crate::util::files::pick_input_files;

const LOG_LENGTH: usize = 10;

struct FileOutcome {
    path: PathBuf,
    frames: Option<usize>,
    error: Option<String>,
    elapsed: Duration,
}

pub struct App {
    settings: Settings,

    files: Vec<PathBuf>,
    show_options: bool,

    // Communication
    stop_flag: Arc<AtomicBool>,
    receiver: Option<Receiver<Update>>,

    progress: Progress,
    messages: Vec<String>,
    outcomes: Vec<FileOutcome>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            settings: Settings::default(),

            files: Vec::new(),
            show_options: false,

            // Communication
            stop_flag: Arc::new(AtomicBool::new(false)),
            receiver: None,

            progress: Progress::new(0),
            messages: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl App {
    fn select_files(&mut self) {
        if let Some(files) = pick_input_files() {
            self.files = files;
            self.show_options = true;
        }
    }

    fn start_processing(&mut self) {
        self.stop_flag.store(false, Ordering::Relaxed);
        let (sender, receiver) = channel::<Update>();
        self.receiver = Some(receiver);

        self.messages.clear();
        self.outcomes.clear();
        self.progress = Progress::new(self.files.len() as u32);

        let settings = self.settings.clone();
        let files = std::mem::take(&mut self.files);
        let stop_flag = Arc::clone(&self.stop_flag);

        thread::spawn(move || {
            convert_images(sender, stop_flag, files, settings);
        });
    }

    fn stop_processing(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    fn handle_completion(&mut self) {
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    fn handle_messages(&mut self) {
        let Some(receiver) = self.receiver.take() else {
            return;
        };

        let mut completed = false;
        while let Ok(update) = receiver.try_recv() {
            match update {
                Update::Message(message) => self.push_message(message),

                Update::StartProcessing(path) => {
                    self.push_message(format!("Processing '{}'...", display_name(&path)));
                }

                Update::FinishedProcessing(path, result, elapsed) => {
                    let name = display_name(&path);
                    match result {
                        Ok(frames) => {
                            self.progress.increment_success();
                            self.push_message(format!(
                                "Processed '{}' ({} frame(s), {:.2?})",
                                name, frames, elapsed
                            ));
                            self.outcomes.push(FileOutcome {
                                path,
                                frames: Some(frames),
                                error: None,
                                elapsed,
                            });
                        }
                        Err(e) => {
                            self.progress.increment_failed();
                            self.push_message(format!("Failed to process '{}': {}", name, e));
                            self.outcomes.push(FileOutcome {
                                path,
                                frames: None,
                                error: Some(e.to_string()),
                                elapsed,
                            });
                        }
                    }
                }

                Update::QueueCompleted(duration) => {
                    let message = match self.stop_flag.load(Ordering::Relaxed) {
                        true => "Stopped".to_owned(),
                        false => format!(
                            "Completed {} of {} file(s) in {:.2?}. Outputs are in each 'pic' folder.",
                            self.progress.success, self.progress.total, duration
                        ),
                    };
                    self.push_message(message);
                    completed = true;
                }
            }
        }

        if completed {
            self.handle_completion();
        } else {
            self.receiver = Some(receiver);
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);

        if self.messages.len() > LOG_LENGTH {
            self.messages.remove(0);
        }
    }

    fn options_modal(&mut self, ctx: &egui::Context) {
        let modal = egui::Modal::new(egui::Id::new("output_options")).show(ctx, |ui| {
            ui.set_width(280.0);

            ui.heading("Output options");
            ui.label(format!("You have selected {} file(s).", self.files.len()));
            ui.add_space(8.0);

            format_input(ui, &mut self.settings);

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Convert").clicked() {
                    self.show_options = false;
                    self.start_processing();
                }
                if ui.button("Cancel").clicked() {
                    self.show_options = false;
                    self.files.clear();
                    self.push_message("Conversion canceled.".to_owned());
                }
            });
        });

        if modal.should_close() {
            self.show_options = false;
            self.files.clear();
        }
    }

    fn results_table(&self, ui: &mut egui::Ui) {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto().at_least(56.0))
            .column(Column::remainder())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("File");
                });
                header.col(|ui| {
                    ui.strong("Frames");
                });
                header.col(|ui| {
                    ui.strong("Status");
                });
            })
            .body(|mut body| {
                for outcome in &self.outcomes {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(display_name(&outcome.path));
                        });
                        row.col(|ui| {
                            let frames = outcome
                                .frames
                                .map(|n| n.to_string())
                                .unwrap_or_else(|| "-".to_owned());
                            ui.label(frames);
                        });
                        row.col(|ui| match &outcome.error {
                            Some(error) => {
                                ui.colored_label(egui::Color32::LIGHT_RED, error);
                            }
                            None => {
                                ui.label(format!("done in {:.2?}", outcome.elapsed));
                            }
                        });
                    });
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // State
        self.handle_messages();

        let running = self.receiver.is_some();
        let percentage = self.progress.fraction();

        // Render
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.add_enabled_ui(!running, |ui| {
                    if ui.button("Select image files").clicked() {
                        self.select_files();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Max), |ui| {
                    ui.add_space(10.0);
                    if running {
                        // Stop button (disabled once the stop flag is set)
                        ui.add_enabled_ui(!self.stop_flag.load(Ordering::Relaxed), |ui| {
                            if ui.button("Stop").clicked() {
                                self.stop_processing();
                            }
                        });
                    }

                    if self.progress.total > 0 {
                        ui.label(format!("{:.0}%", percentage * 100.0));
                    }
                });
            });

            ui.add_space(8.0);

            ui.add(egui::ProgressBar::new(percentage).desired_height(8.0));

            ui.add_space(8.0);

            ui.heading("Log");
            ui.label(self.messages.join("\n"));

            if !self.outcomes.is_empty() {
                ui.add_space(8.0);
                ui.heading("Results");
                self.results_table(ui);
            }
        });

        if self.show_options {
            self.options_modal(ctx);
        }

        // Keep draining worker updates while a conversion is running.
        if running {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
