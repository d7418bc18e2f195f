//! Clickable condition legend
//!
//! Each entry shows a checkbox filled with the condition color while the
//! condition is visible, a swatch, and the label. Clicking an entry reports
//! the condition; the caller turns that into a visibility gesture.

use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Shape, Stroke, Ui};
use wd_core::{Condition, VisibilityToggles};

/// Swatch drawn next to a legend label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchShape {
    Circle,
    Triangle,
    Square,
    /// Short horizontal bar, for line plots
    Bar,
}

/// One legend entry
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub condition: Condition,
    pub label: String,
    pub color: Color32,
    pub shape: SwatchShape,
}

const ROW_HEIGHT: f32 = 24.0;
const BOX_SIZE: f32 = 14.0;

/// Draw the legend vertically; returns the condition whose entry was clicked
pub fn condition_legend(ui: &mut Ui, title: &str, items: &[LegendItem], toggles: &VisibilityToggles) -> Option<Condition> {
    let mut clicked = None;

    ui.vertical(|ui| {
        ui.strong(title);
        for item in items {
            let visible = toggles.is_visible(item.condition);
            if legend_row(ui, item, visible).clicked() {
                tracing::debug!("Legend clicked: {}", item.condition);
                clicked = Some(item.condition);
            }
        }
    });

    clicked
}

fn legend_row(ui: &mut Ui, item: &LegendItem, visible: bool) -> egui::Response {
    let text_color = ui.visuals().text_color();
    let width = BOX_SIZE + 40.0 + ui.fonts(|f| label_width(f, &item.label));
    let (rect, response) = ui.allocate_exact_size(vec2(width, ROW_HEIGHT), Sense::click());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let center_y = rect.center().y;

        let check = Rect::from_min_size(pos2(rect.left(), center_y - BOX_SIZE / 2.0), vec2(BOX_SIZE, BOX_SIZE));
        let fill = if visible { item.color } else { Color32::WHITE };
        painter.rect(check, 0.0, fill, Stroke::new(2.0, Color32::from_rgb(51, 51, 51)));

        let swatch_opacity = if visible { 1.0 } else { 0.3 };
        let swatch_center = pos2(check.right() + 16.0, center_y);
        paint_swatch(painter, item.shape, swatch_center, item.color.gamma_multiply(swatch_opacity));

        let label_opacity = if visible { 1.0 } else { 0.5 };
        painter.text(
            pos2(swatch_center.x + 16.0, center_y),
            Align2::LEFT_CENTER,
            &item.label,
            FontId::proportional(13.0),
            text_color.gamma_multiply(label_opacity),
        );
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn label_width(fonts: &egui::epaint::Fonts, label: &str) -> f32 {
    fonts
        .layout_no_wrap(label.to_string(), FontId::proportional(13.0), Color32::WHITE)
        .size()
        .x
}

fn paint_swatch(painter: &egui::Painter, shape: SwatchShape, center: egui::Pos2, color: Color32) {
    let r = 5.0;
    match shape {
        SwatchShape::Circle => {
            painter.circle_filled(center, r, color);
        }
        SwatchShape::Square => {
            painter.rect_filled(Rect::from_center_size(center, vec2(2.0 * r, 2.0 * r)), 0.0, color);
        }
        SwatchShape::Triangle => {
            let points = vec![
                pos2(center.x, center.y - r),
                pos2(center.x + r, center.y + r),
                pos2(center.x - r, center.y + r),
            ];
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }
        SwatchShape::Bar => {
            painter.rect_filled(Rect::from_center_size(center, vec2(20.0, 12.0)), 0.0, color);
        }
    }
}
