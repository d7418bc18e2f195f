use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use serde::{Deserialize, Serialize};

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Lab Light".to_string(),
            dark_mode: false,
        }
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Lab Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Point sizes of the built-in text styles; plot tick labels use `Small`
const TEXT_SIZES: [(TextStyle, f32); 5] = [
    (TextStyle::Small, 10.0),
    (TextStyle::Body, 13.0),
    (TextStyle::Button, 13.0),
    (TextStyle::Heading, 16.0),
    (TextStyle::Monospace, 12.0),
];

struct Palette {
    bg: Color32,
    panel_bg: Color32,
    widget_bg: Color32,
    hover: Color32,
    active: Color32,
    border: Color32,
    text: Color32,
}

impl Palette {
    fn for_theme(theme: &Theme) -> Self {
        if theme.dark_mode {
            Self {
                bg: Color32::from_rgb(23, 23, 23),
                panel_bg: Color32::from_rgb(31, 31, 31),
                widget_bg: Color32::from_rgb(40, 40, 40),
                hover: Color32::from_rgb(50, 50, 50),
                active: Color32::from_rgb(60, 60, 60),
                border: Color32::from_rgb(70, 70, 70),
                text: Color32::from_rgb(220, 220, 220),
            }
        } else {
            Self {
                bg: Color32::from_rgb(255, 255, 255),
                panel_bg: Color32::from_rgb(248, 248, 250),
                // Plot area background of the gradient views
                widget_bg: Color32::from_rgb(240, 240, 245),
                hover: Color32::from_rgb(228, 228, 236),
                active: Color32::from_rgb(214, 214, 224),
                border: Color32::from_rgb(221, 221, 221),
                text: Color32::from_rgb(34, 34, 34),
            }
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };
    let palette = Palette::for_theme(theme);
    let accent = accent_color();

    visuals.window_fill = palette.panel_bg;
    visuals.panel_fill = palette.panel_bg;
    visuals.extreme_bg_color = palette.bg;
    visuals.faint_bg_color = palette.widget_bg;

    let widgets = [
        (&mut visuals.widgets.noninteractive, palette.widget_bg, palette.border),
        (&mut visuals.widgets.inactive, palette.widget_bg, palette.border),
        (&mut visuals.widgets.hovered, palette.hover, palette.border),
        (&mut visuals.widgets.active, palette.active, accent),
    ];
    for (widget, fill, stroke) in widgets {
        widget.bg_fill = fill;
        widget.bg_stroke = Stroke::new(1.0, stroke);
        widget.fg_stroke = Stroke::new(1.0, palette.text);
        widget.rounding = Rounding::same(4.0);
    }

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    visuals.window_shadow.extrusion = 6.0;
    visuals.popup_shadow.extrusion = 3.0;

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.spacing.menu_margin = egui::Margin::same(6.0);
    style.text_styles = TEXT_SIZES
        .iter()
        .map(|(text_style, size)| {
            let family = if *text_style == TextStyle::Monospace { FontFamily::Monospace } else { FontFamily::Proportional };
            (text_style.clone(), FontId::new(*size, family))
        })
        .collect();

    tracing::debug!("Applying theme {}", theme.name);
    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Brush outline and active widgets
pub fn accent_color() -> Color32 {
    Color32::from_rgb(70, 130, 180)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(200, 40, 40)
}

pub fn warning_color() -> Color32 {
    Color32::from_rgb(204, 136, 0)
}

/// Secondary text such as hints below plots
pub fn hint_color() -> Color32 {
    Color32::from_rgb(102, 102, 102)
}
