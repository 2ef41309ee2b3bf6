/// Left panel: paging buttons, storm type selector and progress

use crate::gui::theme::ThemeColors;
use crate::session::label::StormLabel;
use crate::session::{ReviewAction, Session};

/// Render the panel and return the reviewer's interaction, if any
pub fn show_label_panel(
    ui: &mut egui::Ui,
    session: &Session,
    colors: &ThemeColors,
) -> Option<ReviewAction> {
    let mut action = None;

    ui.add_space(4.0);
    ui.columns(2, |cols| {
        let width = cols[0].available_width();
        if cols[0]
            .add_sized([width, 28.0], egui::Button::new("◀ Previous"))
            .clicked()
        {
            action = Some(ReviewAction::Previous);
        }
        if cols[1]
            .add_sized([width, 28.0], egui::Button::new("Next ▶"))
            .clicked()
        {
            action = Some(ReviewAction::Next);
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.label(egui::RichText::new("Storm Type:").strong());
    ui.add_space(2.0);

    // Radio group shows the recorded label, nothing when unlabelled
    let mut selected = session.current_label();
    for label in StormLabel::ALL.iter() {
        let response = ui
            .radio_value(&mut selected, Some(*label), label.label())
            .on_hover_text(format!("Shortcut: {}", label.index() + 1));
        if response.clicked() {
            action = Some(ReviewAction::Select(*label));
        }
    }

    ui.add_space(8.0);
    ui.separator();

    let total = session.items().len();
    let done = session.labelled_count();
    ui.add(egui::ProgressBar::new(session.progress()).show_percentage());
    ui.label(format!("Labelled: {}/{}", done, total));
    if done < total && ui.small_button("⏭ Next unlabelled").clicked() {
        action = Some(ReviewAction::JumpToUnlabelled);
    }

    ui.add_space(8.0);
    ui.separator();
    ui.label(egui::RichText::new("Items").strong());
    for (i, item) in session.items().iter().enumerate() {
        let marker = match session.label_of(&item.id) {
            Some(_) => egui::RichText::new("●").color(colors.labelled_marker),
            None => egui::RichText::new("○").color(colors.text_muted),
        };
        ui.horizontal(|ui| {
            ui.label(marker);
            let text = egui::RichText::new(item.id.to_string());
            let text = if i == session.cursor() {
                text.strong().color(colors.accent)
            } else {
                text.color(colors.text_secondary)
            };
            ui.label(text).on_hover_text(item.file_name());
        });
    }

    action
}

/// Keyboard shortcuts: arrows page, 1-6 select a storm type
pub fn shortcut_action(ctx: &egui::Context) -> Option<ReviewAction> {
    ctx.input(|i| {
        if i.key_pressed(egui::Key::ArrowRight) {
            return Some(ReviewAction::Next);
        }
        if i.key_pressed(egui::Key::ArrowLeft) {
            return Some(ReviewAction::Previous);
        }
        let digits = [
            egui::Key::Num1,
            egui::Key::Num2,
            egui::Key::Num3,
            egui::Key::Num4,
            egui::Key::Num5,
            egui::Key::Num6,
        ];
        digits
            .iter()
            .position(|k| i.key_pressed(*k))
            .map(|idx| ReviewAction::Select(StormLabel::ALL[idx]))
    })
}
