use crate::app::export::ExportOptions;
use crate::app::file_dialogs;
use crate::app::image_processing;
use crate::app::{App, Notice};
use egui::{Color32, Frame, ProgressBar, RichText, Rounding, Stroke};
use std::sync::mpsc::channel;

pub fn render(app: &mut App, ctx: &egui::Context) {
    let frame = Frame {
        fill: Color32::from_rgb(30, 30, 40),
        rounding: Rounding::same(10.0),
        stroke: Stroke::new(1.0, Color32::from_rgb(100, 200, 250)),
        inner_margin: egui::style::Margin::same(20.0),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        ui.heading(
            RichText::new("Image Converter & Load File Generator")
                .size(26.0)
                .color(Color32::from_rgb(100, 200, 250)),
        );
        ui.add_space(20.0);

        let busy = app.batch_receiver.is_some();
        let button_width = 200.0;

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.add_enabled_ui(!busy, |ui| {
                    if ui
                        .add_sized([button_width, 30.0], egui::Button::new("Select Images"))
                        .clicked()
                    {
                        if let Some(files) = file_dialogs::select_images() {
                            app.input_files = file_dialogs::dedup_selection(files);
                            app.log_messages.lock().push(format!(
                                "[{}] {} images selected.",
                                chrono::Local::now().format("%H:%M:%S"),
                                app.input_files.len()
                            ));
                        }
                    }
                    ui.add_space(5.0);
                    if ui
                        .add_sized([button_width, 30.0], egui::Button::new("Convert & Export"))
                        .clicked()
                    {
                        if app.input_files.is_empty() {
                            app.notices.push(Notice::warning("No images selected."));
                        } else {
                            app.log_messages.lock().push(format!(
                                "[{}] Starting conversion...",
                                chrono::Local::now().format("%H:%M:%S")
                            ));
                            start_batch(app);
                        }
                    }
                });

                ui.add_space(10.0);

                // SQL script options
                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(
                        RichText::new("Options")
                            .size(16.0)
                            .color(Color32::from_rgb(100, 200, 250)),
                    );
                    ui.checkbox(&mut app.comment_triggers, "Comment out ALTER TABLE");
                    ui.checkbox(&mut app.include_delete, "Include DELETE FROM img_product;");
                });

                ui.add_space(10.0);

                ui.label(
                    RichText::new(format!("Images selected: {}", app.input_files.len()))
                        .color(Color32::from_rgb(200, 200, 200)),
                );
            });

            ui.add_space(10.0);

            // Selected images list
            ui.vertical(|ui| {
                ui.group(|ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(220.0);
                    ui.label(
                        RichText::new("Selected Images:")
                            .size(16.0)
                            .color(Color32::from_rgb(100, 200, 250)),
                    );
                    egui::ScrollArea::vertical()
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            for path in &app.input_files {
                                ui.label(path.to_string_lossy());
                            }
                        });
                });
            });
        });

        ui.add_space(20.0);

        // Conversion log with progress bar
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                RichText::new("Conversion Log")
                    .size(16.0)
                    .color(Color32::from_rgb(100, 200, 250)),
            );

            let progress = app.conversion_progress.lock();
            if progress.total > 0 {
                let progress_ratio = progress.completed as f32 / progress.total as f32;
                ui.add(ProgressBar::new(progress_ratio).text(format!(
                    "{} / {}",
                    progress.completed, progress.total
                )));
                if !progress.status.is_empty() {
                    ui.label(&progress.status);
                }
            }
            drop(progress);

            egui::ScrollArea::vertical()
                .max_height(160.0)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let logs = app.log_messages.lock();
                    for log in logs.iter() {
                        if log.contains("error") || log.contains("Failed") {
                            ui.label(RichText::new(log).color(Color32::RED));
                        } else {
                            ui.label(log);
                        }
                    }
                });
        });
    });

    show_front_notice(app, ctx);
}

/// Renders the oldest queued notice as a modal-style window; the rest of
/// the queue waits until OK is clicked.
fn show_front_notice(app: &mut App, ctx: &egui::Context) {
    if let Some(notice) = app.notices.first().cloned() {
        let mut dismissed = false;
        egui::Window::new(notice.kind.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.add_sized([60.0, 25.0], egui::Button::new("OK")).clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            app.notices.remove(0);
        }
    }
}

fn start_batch(app: &mut App) {
    let input_files = app.input_files.clone();
    let options = ExportOptions {
        comment_triggers: app.comment_triggers,
        include_delete: app.include_delete,
    };
    let log_messages = app.log_messages.clone();

    let (sender, receiver) = channel();
    app.batch_receiver = Some(receiver);

    std::thread::spawn(move || {
        image_processing::run_batch(input_files, options, log_messages, sender);
    });
}
