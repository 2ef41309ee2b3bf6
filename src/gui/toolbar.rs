/// Toolbar — top menu bar with session, export and view actions

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    SaveSession,
    LoadSession,
    DownloadCsv,
    SubmitLabels,
    ExportImage,
    ExportLog,
    Previous,
    Next,
    JumpToUnlabelled,
    ThemeToggle,
    ShowLog,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context, theme_label: &str, upload_enabled: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("📁 File", |ui| {
                if ui.button("💾 Save Session…").clicked() {
                    action = ToolbarAction::SaveSession;
                    ui.close_menu();
                }
                if ui.button("📂 Load Session…").clicked() {
                    action = ToolbarAction::LoadSession;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("⬇ Download Labels as CSV…").clicked() {
                    action = ToolbarAction::DownloadCsv;
                    ui.close_menu();
                }
                if upload_enabled && ui.button("⬆ Submit Labels").clicked() {
                    action = ToolbarAction::SubmitLabels;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("🖼 Export Image…").clicked() {
                    action = ToolbarAction::ExportImage;
                    ui.close_menu();
                }
                if ui.button("📋 Export Session Log…").clicked() {
                    action = ToolbarAction::ExportLog;
                    ui.close_menu();
                }
            });

            ui.menu_button("🧭 Navigate", |ui| {
                if ui.button("◀ Previous").clicked() {
                    action = ToolbarAction::Previous;
                    ui.close_menu();
                }
                if ui.button("▶ Next").clicked() {
                    action = ToolbarAction::Next;
                    ui.close_menu();
                }
                if ui.button("⏭ Next Unlabelled").clicked() {
                    action = ToolbarAction::JumpToUnlabelled;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔍 View", |ui| {
                if ui.button(format!("🎨 Theme: {}", theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
                if ui.button("📋 Session Log").clicked() {
                    action = ToolbarAction::ShowLog;
                    ui.close_menu();
                }
            });

            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new(theme_label).size(12.0)).corner_radius(12.0))
                    .clicked()
                {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("MCS Storm Classification")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Save dialog for the labels CSV
pub fn save_csv_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Download Labels as CSV")
        .set_file_name("storm_labels.csv")
        .add_filter("CSV (text/csv)", &["csv"])
        .save_file()
}

pub fn save_session_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save Labeling Session")
        .set_file_name("storm_session.json")
        .add_filter("JSON", &["json"])
        .save_file()
}

pub fn open_session_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Load Labeling Session")
        .add_filter("JSON", &["json"])
        .pick_file()
}

pub fn save_image_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Storm Image")
        .set_file_name(default_name)
        .add_filter("PNG Image", &["png"])
        .save_file()
}

pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Session Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}
