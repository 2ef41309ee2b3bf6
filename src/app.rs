/// Main application state and eframe::App implementation
///
/// Turns UI events into `ReviewAction`s on the session, keeps the local CSV in
/// step with the label mapping, and drives the export/submission actions.

use std::path::Path;

use eframe::egui;

use crate::config::LabelerConfig;
use crate::data::item;
use crate::data::render;
use crate::export::{self, table::ExportTable, upload::{ExportSink, GitHubUploader, NullSink}};
use crate::gui::label_panel;
use crate::gui::theme::{self, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction};
use crate::gui::viewer::{self, ViewerState};
use crate::log::activity::ActivityLog;
use crate::session::{ReviewAction, Session, SessionSave};

pub struct LabelerApp {
    config: LabelerConfig,
    session: Option<Session>,
    /// Why no session could be started (shown instead of the viewer)
    startup_error: Option<String>,

    viewer: ViewerState,
    activity: ActivityLog,
    sink: Box<dyn ExportSink>,

    status_message: String,
    show_log_window: bool,
    show_about: bool,

    current_theme: AppTheme,
    theme_colors: ThemeColors,
}

impl LabelerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: LabelerConfig) -> Self {
        let default_theme = AppTheme::Light;
        theme::apply_theme(&cc.egui_ctx, default_theme);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        let mut app = Self::with_config(config);
        app.current_theme = default_theme;
        app.theme_colors = ThemeColors::from_theme(default_theme);
        app
    }

    /// Everything except the egui context setup
    fn with_config(config: LabelerConfig) -> Self {
        let mut activity = ActivityLog::new();
        activity.set_data_dir(&config.data_dir.to_string_lossy());
        let sink = build_sink(&config, &activity.session_tag());

        let (session, startup_error) =
            match item::list_items(&config.data_dir, config.item_limit) {
                Ok(items) => (Session::new(items), None),
                Err(e) => {
                    log::error!("Cannot start session: {}", e);
                    (None, Some(e.to_string()))
                }
            };

        let status_message = match &session {
            Some(s) => format!(
                "{} images from {}",
                s.items().len(),
                config.data_dir.display()
            ),
            None => "No images to label".to_string(),
        };

        let mut app = Self {
            config,
            session,
            startup_error,
            viewer: ViewerState {
                show_grid: true,
                ..Default::default()
            },
            activity,
            sink,
            status_message,
            show_log_window: false,
            show_about: false,
            current_theme: AppTheme::Light,
            theme_colors: ThemeColors::from_theme(AppTheme::Light),
        };
        // header-only file until the first label arrives
        app.refresh_local_csv();
        app
    }

    fn export_table(&self) -> ExportTable {
        self.session
            .as_ref()
            .map(|s| ExportTable::from_labels(s.labels()))
            .unwrap_or_default()
    }

    fn refresh_local_csv(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if let Err(e) = export::refresh_local(session.labels(), &self.config.output_csv) {
            self.status_message = format!(
                "Could not write {}: {}",
                self.config.output_csv.display(),
                e
            );
            log::error!("Local CSV write failed: {}", e);
        }
    }

    fn handle_review(&mut self, action: ReviewAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        log::debug!("Review action: {}", action);
        let outcome = session.apply(action);
        let current = session.current().id;
        let label = session.current_label();

        if outcome.labels_changed {
            if let Some(label) = label {
                self.activity
                    .add_entry("Label", &format!("{} → {}", current, label));
            }
            self.refresh_local_csv();
            self.status_message = format!("Labelled {}", current);
        } else if outcome.cursor_moved {
            self.status_message = format!("Viewing {}", current);
        }
    }

    fn download_csv(&mut self) {
        let Some(path) = toolbar::save_csv_dialog() else {
            return;
        };
        let table = self.export_table();
        match export::write_csv(&table, &path) {
            Ok(()) => {
                self.status_message = format!("Labels saved: {}", path.display());
                self.activity.add_entry(
                    "Download",
                    &format!("{} rows → {}", table.len(), path.display()),
                );
            }
            Err(e) => self.status_message = format!("Save failed: {}", e),
        }
    }

    fn submit_labels(&mut self) {
        let table = self.export_table();
        match self.sink.submit_export(&table) {
            Ok(()) => {
                self.status_message = if table.is_empty() {
                    "Submitted header only, nothing labelled yet".to_string()
                } else {
                    format!("Submitted {} labels", table.len())
                };
                self.activity
                    .add_entry("Submit", &format!("{} rows uploaded", table.len()));
            }
            Err(e) => {
                self.status_message = format!("Submission failed: {}", e);
                self.activity.add_entry("Submit failed", &e.to_string());
            }
        }
    }

    fn save_session(&mut self, path: &Path) {
        let Some(session) = &self.session else {
            return;
        };
        let save = session.to_save(&self.activity.session_id);
        match save.save(path) {
            Ok(()) => {
                self.status_message = format!("Session saved: {}", path.display());
                self.activity
                    .add_entry("Save session", &path.display().to_string());
            }
            Err(e) => self.status_message = format!("Session save failed: {}", e),
        }
    }

    fn load_session(&mut self, path: &Path) {
        let save = match SessionSave::load(path) {
            Ok(save) => save,
            Err(e) => {
                self.status_message = format!("Session load failed: {}", e);
                return;
            }
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let kept = session.restore(&save);
        self.status_message = format!("Restored {} labels from {}", kept, path.display());
        self.activity.add_entry(
            "Load session",
            &format!("{} labels from session {}", kept, save.session_id),
        );
        self.refresh_local_csv();
    }

    fn export_image(&mut self) {
        let (Some(image), Some(id)) = (&self.viewer.image, self.viewer.loaded_for) else {
            self.status_message = "No image loaded".to_string();
            return;
        };
        let default_name = format!("storm_{}_frame_{}.png", id.storm_id, id.frame_no);
        let Some(path) = toolbar::save_image_dialog(&default_name) else {
            return;
        };
        match render::save_png(image, &path, 4) {
            Ok(()) => {
                self.status_message = format!("Image exported: {}", path.display());
                self.activity
                    .add_entry("Export image", &path.display().to_string());
            }
            Err(e) => self.status_message = format!("Image export failed: {}", e),
        }
    }

    fn export_log(&mut self) {
        let Some(path) = toolbar::save_log_dialog() else {
            return;
        };
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let result = if ext == "json" {
            self.activity.save_json(&path)
        } else {
            self.activity.save_text(&path)
        };
        self.status_message = match result {
            Ok(()) => format!("Log exported: {}", path.display()),
            Err(e) => format!("Log export failed: {}", e),
        };
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::SaveSession => {
                if let Some(path) = toolbar::save_session_dialog() {
                    self.save_session(&path);
                }
            }
            ToolbarAction::LoadSession => {
                if let Some(path) = toolbar::open_session_dialog() {
                    self.load_session(&path);
                }
            }
            ToolbarAction::DownloadCsv => self.download_csv(),
            ToolbarAction::SubmitLabels => self.submit_labels(),
            ToolbarAction::ExportImage => self.export_image(),
            ToolbarAction::ExportLog => self.export_log(),
            ToolbarAction::Previous => self.handle_review(ReviewAction::Previous),
            ToolbarAction::Next => self.handle_review(ReviewAction::Next),
            ToolbarAction::JumpToUnlabelled => self.handle_review(ReviewAction::JumpToUnlabelled),
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
            }
            ToolbarAction::ShowLog => self.show_log_window = !self.show_log_window,
            ToolbarAction::ShowAbout => self.show_about = true,
        }
    }
}

/// Remote sink when upload is enabled and configured, otherwise a no-op sink
fn build_sink(config: &LabelerConfig, session_tag: &str) -> Box<dyn ExportSink> {
    if !config.remote.is_usable() {
        if config.remote.enabled {
            log::warn!("Remote upload enabled but token/owner/repo incomplete; disabled");
        }
        return Box::new(NullSink);
    }
    match GitHubUploader::new(config.remote.clone(), session_tag) {
        Ok(uploader) => {
            log::info!(
                "Remote upload to {}/{} enabled",
                config.remote.owner,
                config.remote.repo
            );
            Box::new(uploader)
        }
        Err(e) => {
            log::error!("Could not create upload client: {}", e);
            Box::new(NullSink)
        }
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx, self.current_theme);

        // ── Toolbar ──
        let toolbar_action =
            toolbar::show_toolbar(ctx, self.current_theme.label(), self.sink.is_enabled());
        if toolbar_action != ToolbarAction::None {
            self.handle_toolbar_action(toolbar_action);
        }

        if let Some(action) = label_panel::shortcut_action(ctx) {
            self.handle_review(action);
        }

        // ── Status Bar ──
        let tc = self.theme_colors.clone();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new()
                .fill(tc.status_bar_bg)
                .inner_margin(egui::Margin::symmetric(12, 4)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.5)
                            .color(tc.status_text),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.sink.is_enabled() {
                            ui.colored_label(tc.success, egui::RichText::new("● upload").size(11.0));
                        } else {
                            ui.colored_label(tc.warning, egui::RichText::new("○ local only").size(11.0));
                        }
                        ui.separator();
                        if ui.small_button("📋 Log").clicked() {
                            self.show_log_window = !self.show_log_window;
                        }
                        ui.label(
                            egui::RichText::new(format!("{} events", self.activity.len()))
                                .size(11.0)
                                .color(tc.text_muted),
                        );
                    });
                });
            });

        // ── Left Panel: paging, selector, progress ──
        let mut review_action = None;
        let mut download_requested = false;
        if let Some(session) = &self.session {
            egui::SidePanel::left("label_panel")
                .resizable(true)
                .default_width(240.0)
                .min_width(200.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            review_action = label_panel::show_label_panel(ui, session, &tc);
                            ui.add_space(12.0);
                            if ui.button("⬇ Download Labels as CSV").clicked() {
                                download_requested = true;
                            }
                        });
                });
        }
        if let Some(action) = review_action {
            self.handle_review(action);
        }
        if download_requested {
            self.download_csv();
        }

        // ── Central Panel: storm image ──
        egui::CentralPanel::default().show(ctx, |ui| {
            match &self.session {
                Some(session) => {
                    let current = session.current().clone();
                    let label = session.current_label();
                    self.viewer.ensure_loaded(ctx, &current);
                    viewer::show_viewer(ui, &self.viewer, &current.id, label, self.config.km_per_pixel);
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        let msg = self
                            .startup_error
                            .as_deref()
                            .unwrap_or("No images to label");
                        ui.colored_label(tc.error, msg);
                    });
                }
            }
        });

        // ── Windows ──
        if self.show_log_window {
            let mut open = true;
            egui::Window::new("📋 Session Log")
                .open(&mut open)
                .default_width(520.0)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("Session {}", self.activity.session_id))
                            .color(tc.text_muted),
                    );
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                        if self.activity.is_empty() {
                            ui.label("No events yet");
                        }
                        for entry in &self.activity.entries {
                            ui.monospace(entry.to_text());
                        }
                    });
                });
            self.show_log_window = open;
        }

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("MCS Storm Classification");
                    ui.label(format!("storm-labeler v{}", env!("CARGO_PKG_VERSION")));
                    ui.label(format!("Local CSV: {}", self.config.output_csv.display()));
                    ui.label("Keys: ←/→ page, 1–6 select a storm type");
                    if ui.button("Close").clicked() {
                        self.show_about = false;
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::npy::tests::{f4_payload, npy_bytes};
    use crate::session::label::StormLabel;

    fn config_with_items(n: usize) -> (tempfile::TempDir, LabelerConfig) {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("storm_images_cleaned");
        std::fs::create_dir(&images).unwrap();
        for i in 0..n {
            let bytes = npy_bytes("<f4", false, "(2, 2)", &f4_payload(&[0.0, 1.0, 2.0, 3.0]));
            std::fs::write(images.join(format!("storm_{}_frame_{}.npy", 10 + i, i)), bytes).unwrap();
        }
        let config = LabelerConfig {
            data_dir: images,
            output_csv: dir.path().join("storm_labels.csv"),
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn test_startup_writes_header_only_csv() {
        let (_dir, config) = config_with_items(5);
        let app = LabelerApp::with_config(config.clone());
        assert!(app.session.is_some());
        assert!(!app.sink.is_enabled());
        let text = std::fs::read_to_string(&config.output_csv).unwrap();
        assert_eq!(text, "storm_ID,frame_no,user_label\n");
    }

    #[test]
    fn test_label_change_rewrites_csv_and_logs() {
        let (_dir, config) = config_with_items(5);
        let mut app = LabelerApp::with_config(config.clone());
        app.handle_review(ReviewAction::Next);
        app.handle_review(ReviewAction::Next);
        app.handle_review(ReviewAction::Select(StormLabel::LargeCircular));

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.labels().len(), 1);
        assert!((session.progress() - 0.2).abs() < f32::EPSILON);
        assert_eq!(app.activity.len(), 1);

        let text = std::fs::read_to_string(&config.output_csv).unwrap();
        assert_eq!(text.lines().nth(1), Some("12,2,Large Circular"));
    }

    #[test]
    fn test_missing_data_dir_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = LabelerConfig {
            data_dir: dir.path().join("nope"),
            output_csv: dir.path().join("storm_labels.csv"),
            ..Default::default()
        };
        let app = LabelerApp::with_config(config);
        assert!(app.session.is_none());
        assert!(app.startup_error.is_some());
    }

    #[test]
    fn test_submit_without_remote_reports_failure() {
        let (_dir, config) = config_with_items(1);
        let mut app = LabelerApp::with_config(config);
        app.submit_labels();
        assert!(app.status_message.starts_with("Submission failed"));
    }

    #[test]
    fn test_submit_reports_empty_and_labelled_tables() {
        use crate::export::upload::tests::RecordingSink;

        let (_dir, config) = config_with_items(2);
        let mut app = LabelerApp::with_config(config);
        app.sink = Box::new(RecordingSink::default());

        app.submit_labels();
        assert_eq!(app.status_message, "Submitted header only, nothing labelled yet");

        app.handle_review(ReviewAction::Select(StormLabel::NoOrganisation));
        app.submit_labels();
        assert_eq!(app.status_message, "Submitted 1 labels");
        assert_eq!(app.activity.len(), 3);
    }
}
