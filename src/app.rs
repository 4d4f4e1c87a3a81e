// app.rs
pub mod export;
pub mod file_dialogs;
pub mod gui;
pub mod image_processing;

use eframe::egui;
use eframe::App as EframeApp;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub struct App {
    // Application state
    pub input_files: Vec<PathBuf>,
    pub comment_triggers: bool,
    pub include_delete: bool,
    pub conversion_progress: Arc<Mutex<ConversionProgress>>,
    pub log_messages: Arc<Mutex<Vec<String>>>,
    pub notices: Vec<Notice>,
    pub batch_receiver: Option<Receiver<BatchUpdate>>,
}

/// Messages sent from the batch worker thread back to the GUI thread.
pub enum BatchUpdate {
    Progress(usize, usize), // (processed, total)
    Notice(Notice),
    Completed,
}

pub struct ConversionProgress {
    pub total: usize,
    pub completed: usize,
    pub status: String,
}

/// One successfully converted image: original base name plus the name
/// of the .webp file written to the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePair {
    pub original_base: String,
    pub webp_name: String,
}

/// A queued modal dialog. Shown one at a time, dismissed with OK.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn title(self) -> &'static str {
        match self {
            NoticeKind::Success => "Success",
            NoticeKind::Info => "Information",
            NoticeKind::Warning => "Warning",
            NoticeKind::Error => "Error",
        }
    }
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Error, message: message.into() }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            comment_triggers: false,
            include_delete: false,
            conversion_progress: Arc::new(Mutex::new(ConversionProgress {
                total: 0,
                completed: 0,
                status: String::new(),
            })),
            log_messages: Arc::new(Mutex::new(Vec::new())),
            notices: Vec::new(),
            batch_receiver: None,
        }
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut completed = false;

        if let Some(receiver) = &self.batch_receiver {
            while let Ok(update) = receiver.try_recv() {
                match update {
                    BatchUpdate::Progress(processed, total) => {
                        let mut progress = self.conversion_progress.lock();
                        progress.completed = processed;
                        progress.total = total;
                        progress.status = format!("Processing image {} of {}", processed, total);
                        drop(progress); // Release the lock as soon as possible
                    }
                    BatchUpdate::Notice(notice) => {
                        self.notices.push(notice);
                    }
                    BatchUpdate::Completed => {
                        completed = true;
                    }
                }
            }
        }

        if completed {
            self.batch_receiver = None;
            // Reset the progress bar to idle
            let mut progress = self.conversion_progress.lock();
            progress.total = 0;
            progress.completed = 0;
            progress.status.clear();
        }

        // Render the GUI
        gui::render(self, ctx);

        // Keep draining worker updates while a batch is running
        if self.batch_receiver.is_some() {
            ctx.request_repaint();
        }
    }
}
