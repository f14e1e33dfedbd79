//! Widgets shared by the panels.

use egui::{Color32, RichText};

pub const SEARCH_HINT: &str = "Поиск... (имя/ID)";
pub const NO_ANSWER: &str = "нет ответа";

/// Draws the blocking alert: a dimmed backdrop that swallows clicks, and the message on top.
///
/// Returns true when the alert was dismissed this frame (OK, Enter or Escape).
pub fn draw_alert(ctx: &egui::Context, text: &str) -> bool {
    let screen = ctx.screen_rect();

    egui::Area::new(egui::Id::new("alert_backdrop"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.allocate_rect(screen, egui::Sense::click());
            ui.painter()
                .rect_filled(screen, 0.0, Color32::from_black_alpha(160));
        });

    let mut dismissed = ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape));

    egui::Window::new("alert")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Tooltip)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(240.0);
            ui.label(text);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    dismissed
}

/// Pane title with an optional right-hand note (load line, stale marker).
pub fn pane_header(ui: &mut egui::Ui, title: &str, right: Option<&str>) {
    ui.horizontal(|ui| {
        ui.strong(title);
        if let Some(right) = right {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(right);
            });
        }
    });
}

pub fn search_field(ui: &mut egui::Ui, query: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(query)
            .hint_text(SEARCH_HINT)
            .desired_width(f32::INFINITY),
    )
}

pub fn empty_marker(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).italics().weak());
}

pub fn stale_marker(ui: &mut egui::Ui) {
    ui.colored_label(Color32::LIGHT_RED, NO_ANSWER);
}

/// Framed list row, highlighted when `selected`.
pub fn row_frame<R>(
    ui: &mut egui::Ui,
    selected: bool,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    let fill = if selected {
        ui.visuals().selection.bg_fill.gamma_multiply(0.4)
    } else {
        ui.visuals().faint_bg_color
    };

    egui::Frame::group(ui.style())
        .fill(fill)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

/// Row title that reacts to clicks, so a row can be double-clicked.
pub fn row_title(ui: &mut egui::Ui, title: &str, dimmed: bool) -> egui::Response {
    let text = if dimmed {
        RichText::new(title).strong().weak()
    } else {
        RichText::new(title).strong()
    };
    ui.add(egui::Label::new(text).sense(egui::Sense::click()))
}
