/// Theme system — Light and Night color themes

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppTheme {
    Light,
    Night,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Night => "🌙 Night",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Night,
            AppTheme::Night => AppTheme::Light,
        }
    }
}

/// Colors the labeler paints with
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub faint_bg: egui::Color32,

    pub widget_bg: egui::Color32,
    pub widget_bg_stroke: egui::Color32,
    pub widget_inactive_bg: egui::Color32,
    pub widget_hovered_bg: egui::Color32,
    pub widget_hovered_stroke: egui::Color32,
    pub widget_active_bg: egui::Color32,

    pub selection_bg: egui::Color32,
    pub selection_stroke: egui::Color32,

    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,
    pub text_muted: egui::Color32,

    pub accent: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    /// Dot shown next to labelled items in the item list
    pub labelled_marker: egui::Color32,

    pub status_bar_bg: egui::Color32,
    pub status_text: egui::Color32,

    pub is_dark: bool,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Self::light(),
            AppTheme::Night => Self::night(),
        }
    }

    fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xF7, 0xF7, 0xF8),
            window_fill: egui::Color32::from_rgb(0xFF, 0xFF, 0xFF),
            faint_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),

            widget_bg: egui::Color32::from_rgb(0xEB, 0xEC, 0xEE),
            widget_bg_stroke: egui::Color32::from_rgb(0xD0, 0xD2, 0xD6),
            widget_inactive_bg: egui::Color32::from_rgb(0xE3, 0xE5, 0xE8),
            widget_hovered_bg: egui::Color32::from_rgb(0xD8, 0xDD, 0xE6),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x40),
            selection_stroke: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            text_primary: egui::Color32::from_rgb(0x2A, 0x2E, 0x36),
            text_secondary: egui::Color32::from_rgb(0x44, 0x48, 0x52),
            text_muted: egui::Color32::from_rgb(0x88, 0x8C, 0x94),

            accent: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            success: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),
            warning: egui::Color32::from_rgb(0xB8, 0x8B, 0x00),
            error: egui::Color32::from_rgb(0xD0, 0x30, 0x30),

            labelled_marker: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),

            status_bar_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),
            status_text: egui::Color32::from_rgb(0x44, 0x48, 0x52),

            is_dark: false,
        }
    }

    fn night() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x16, 0x18, 0x1D),
            window_fill: egui::Color32::from_rgb(0x1C, 0x1F, 0x26),
            faint_bg: egui::Color32::from_rgb(0x20, 0x23, 0x2B),

            widget_bg: egui::Color32::from_rgb(0x24, 0x27, 0x30),
            widget_bg_stroke: egui::Color32::from_rgb(0x3A, 0x3F, 0x4B),
            widget_inactive_bg: egui::Color32::from_rgb(0x2A, 0x2E, 0x38),
            widget_hovered_bg: egui::Color32::from_rgb(0x33, 0x39, 0x47),
            widget_hovered_stroke: egui::Color32::from_rgb(0x6C, 0xA8, 0xE0),
            widget_active_bg: egui::Color32::from_rgb(0x4A, 0x8C, 0xD0),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x4A, 0x8C, 0xD0, 0x50),
            selection_stroke: egui::Color32::from_rgb(0x6C, 0xA8, 0xE0),

            text_primary: egui::Color32::from_rgb(0xE2, 0xE4, 0xE9),
            text_secondary: egui::Color32::from_rgb(0xB0, 0xB4, 0xBE),
            text_muted: egui::Color32::from_rgb(0x76, 0x7B, 0x88),

            accent: egui::Color32::from_rgb(0x6C, 0xA8, 0xE0),
            success: egui::Color32::from_rgb(0x4C, 0xC3, 0x7A),
            warning: egui::Color32::from_rgb(0xE0, 0xB8, 0x40),
            error: egui::Color32::from_rgb(0xF0, 0x5A, 0x5A),

            labelled_marker: egui::Color32::from_rgb(0x4C, 0xC3, 0x7A),

            status_bar_bg: egui::Color32::from_rgb(0x11, 0x13, 0x17),
            status_text: egui::Color32::from_rgb(0xB0, 0xB4, 0xBE),

            is_dark: true,
        }
    }
}

/// Apply a theme to the egui context
pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    let c = ThemeColors::from_theme(theme);

    let mut visuals = if c.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.panel_fill = c.panel_fill;
    visuals.window_fill = c.window_fill;
    visuals.faint_bg_color = c.faint_bg;

    visuals.widgets.noninteractive.bg_fill = c.widget_bg;
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(0.5, c.widget_bg_stroke);
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, c.text_secondary);

    visuals.widgets.inactive.bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);

    visuals.widgets.hovered.bg_fill = c.widget_hovered_bg;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, c.widget_hovered_stroke);

    visuals.widgets.active.bg_fill = c.widget_active_bg;

    visuals.selection.bg_fill = c.selection_bg;
    visuals.selection.stroke = egui::Stroke::new(1.5, c.selection_stroke);

    visuals.override_text_color = Some(c.text_primary);

    ctx.set_visuals(visuals);
}
