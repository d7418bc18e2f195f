//! Table of the currently selected discs

use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wd_core::{Gesture, Selection};
use wd_data::DiscRecord;

use crate::plots::palette;
use crate::space_view::{decode_config, encode_config};
use crate::{empty_hint, loading_placeholder, SpaceView, SpaceViewId, ViewerContext};

const VIEW_TYPE: &str = "selection_table";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionTableConfig {
    pub striped: bool,
    pub resizable: bool,
}

impl Default for SelectionTableConfig {
    fn default() -> Self {
        Self {
            striped: true,
            resizable: true,
        }
    }
}

/// Selected discs in table order
fn selected_rows<'a>(records: &'a [DiscRecord], selection: &Selection) -> Vec<&'a DiscRecord> {
    records.iter().filter(|r| selection.contains(&r.disc)).collect()
}

pub struct SelectionTableView {
    id: SpaceViewId,
    title: String,
    pub config: SelectionTableConfig,
}

impl SelectionTableView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Selection".to_string(),
            config: SelectionTableConfig::default(),
        }
    }
}

impl Default for SelectionTableView {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceView for SelectionTableView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        VIEW_TYPE
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let Some(records) = ctx.datasets.morphometrics.get() else {
            loading_placeholder(ui, "Loading data...");
            return;
        };

        let selection = ctx.discs.selection();
        let rows = selected_rows(&records, &selection);
        if rows.is_empty() {
            empty_hint(ui, "No discs selected", "Brush the scatter plot or click a point to select discs");
            return;
        }

        ui.label(format!("{} selected", rows.len()));
        ui.separator();

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let mut clicked: Option<String> = None;

        TableBuilder::new(ui)
            .striped(self.config.striped)
            .resizable(self.config.resizable)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(120.0).at_least(60.0).clip(true))
            .column(Column::initial(100.0).at_least(60.0))
            .column(Column::initial(80.0).at_least(50.0))
            .column(Column::remainder().at_least(50.0))
            .min_scrolled_height(0.0)
            .vscroll(true)
            .header(20.0, |mut header| {
                for title in ["Disc", "Condition", "Area", "Lambda"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |row_index, mut row| {
                    let record = rows[row_index];
                    let focused = selection.focus() == Some(record.disc.as_str());
                    row.col(|ui| {
                        let text = if focused { RichText::new(&record.disc).strong() } else { RichText::new(&record.disc) };
                        if ui.link(text).on_hover_text("Click to toggle focus").clicked() {
                            clicked = Some(record.disc.clone());
                        }
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&record.condition_label).color(palette::condition_color(record.condition)));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", record.area));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", record.lambda));
                    });
                });
            });

        if let Some(disc) = clicked {
            ctx.discs.dispatch(Gesture::PointClicked(disc), records.as_slice());
        }
    }

    fn save_config(&self) -> serde_json::Value {
        encode_config(&self.config)
    }

    fn load_config(&mut self, config: serde_json::Value) {
        decode_config(VIEW_TYPE, config, &mut self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, disc};
    use wd_core::{AxisRange, Condition, MeasurementAxis};

    #[test]
    fn test_rows_follow_range_and_focus() {
        let ctx = context();
        let records = vec![
            disc("d1", Condition::Standard, 4.2, 0.1),
            disc("d2", Condition::Hypoxia, 4.8, 0.2),
            disc("d3", Condition::Cold, 5.6, 0.3),
        ];
        assert!(selected_rows(&records, &ctx.discs.selection()).is_empty());

        ctx.discs.dispatch(
            Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(4.0, 5.0) },
            &records,
        );
        ctx.discs.dispatch(Gesture::PointClicked("d3".to_string()), &records);

        let ids: Vec<&str> = selected_rows(&records, &ctx.discs.selection())
            .into_iter()
            .map(|r| r.disc.as_str())
            .collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);

        // Clicking the focused id again removes it
        ctx.discs.dispatch(Gesture::PointClicked("d3".to_string()), &records);
        assert_eq!(selected_rows(&records, &ctx.discs.selection()).len(), 2);
    }

    #[test]
    fn test_view_type_and_config() {
        let mut view = SelectionTableView::new();
        assert_eq!(view.view_type(), "selection_table");
        view.load_config(serde_json::json!({"striped": false}));
        assert!(!view.config.striped);
        assert!(view.config.resizable);
    }
}
