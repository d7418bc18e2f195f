//! Condition colors and marker shapes

use egui::Color32;
use egui_plot::MarkerShape;
use wd_core::{Condition, Emphasis};
use wd_ui::{LegendItem, SwatchShape};

/// Marker color of the scatter and landmark views
pub fn condition_color(condition: Condition) -> Color32 {
    match condition {
        Condition::Standard => Color32::from_rgb(0xd9, 0x5f, 0x02),
        Condition::Hypoxia => Color32::from_rgb(0x75, 0x70, 0xb3),
        Condition::Cold => Color32::from_rgb(0x1b, 0x9e, 0x77),
    }
}

/// Line color of the gradient profile view
pub fn profile_color(condition: Condition) -> Color32 {
    match condition {
        Condition::Standard => Color32::from_rgb(0xff, 0x99, 0x00),
        Condition::Hypoxia => Color32::from_rgb(0xa5, 0x6c, 0xc1),
        Condition::Cold => Color32::from_rgb(0x4a, 0xb8, 0xa1),
    }
}

pub fn marker_shape(condition: Condition) -> MarkerShape {
    match condition {
        Condition::Standard => MarkerShape::Circle,
        Condition::Hypoxia => MarkerShape::Up,
        Condition::Cold => MarkerShape::Square,
    }
}

fn swatch_shape(condition: Condition) -> SwatchShape {
    match condition {
        Condition::Standard => SwatchShape::Circle,
        Condition::Hypoxia => SwatchShape::Triangle,
        Condition::Cold => SwatchShape::Square,
    }
}

/// Apply an emphasis opacity to a color
pub fn emphasize(color: Color32, emphasis: Emphasis) -> Color32 {
    color.gamma_multiply(emphasis.opacity)
}

/// Legend entries for marker views, labelled with the raw condition names
pub fn marker_legend(conditions: &[Condition]) -> Vec<LegendItem> {
    conditions
        .iter()
        .map(|&condition| LegendItem {
            condition,
            label: condition.as_str().to_string(),
            color: condition_color(condition),
            shape: swatch_shape(condition),
        })
        .collect()
}

/// Legend entries for the profile view, always all three conditions
pub fn profile_legend() -> Vec<LegendItem> {
    Condition::ALL
        .iter()
        .map(|&condition| LegendItem {
            condition,
            label: condition.profile_label().to_string(),
            color: profile_color(condition),
            shape: SwatchShape::Bar,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_colors() {
        assert_eq!(condition_color(Condition::Standard), Color32::from_rgb(217, 95, 2));
        assert_eq!(profile_color(Condition::Cold), Color32::from_rgb(74, 184, 161));
        assert_eq!(marker_shape(Condition::Hypoxia), MarkerShape::Up);
    }

    #[test]
    fn test_legends() {
        let labels: Vec<String> = profile_legend().into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Normoxia", "Hypoxia", "LowTemp"]);

        let items = marker_legend(&[Condition::Cold]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "cold");
        assert_eq!(items[0].shape, SwatchShape::Square);
    }

    #[test]
    fn test_emphasize_keeps_full_opacity() {
        let color = condition_color(Condition::Hypoxia);
        assert_eq!(emphasize(color, Emphasis::new(1.0, 3.0)), color);
        assert!(emphasize(color, Emphasis::new(0.1, 1.0)).a() < color.a());
    }
}
