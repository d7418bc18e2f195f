//! Wing disc area vs lambda scatter with marginal histograms
//!
//! The scatter is the disc view that owns the brush: a primary drag over the
//! plot selects discs by area, a click on a marker focuses that disc.
//! Marginal histograms sit in bands above and to the right of the data, one
//! per visible condition, binned over the rounded domain of all discs.

use egui::{Color32, PointerButton, Pos2, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotUi, Points, VLine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wd_core::selection::derive_emphasis;
use wd_core::{Condition, EmphasisStyle, Gesture, MeasurementAxis, Selection, VisibilityToggles};
use wd_data::DiscRecord;
use wd_ui::{condition_legend, theme, WidgetId};

use crate::plots::{self, palette, Bin, BrushTracker};
use crate::space_view::{decode_config, encode_config};
use crate::{loading_placeholder, SpaceView, SpaceViewId, ViewerContext};

const VIEW_TYPE: &str = "morphometry_scatter";

/// Configuration for the morphometry scatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphometryConfig {
    pub show_histograms: bool,

    /// Histogram threshold count on the area axis
    pub area_thresholds: usize,

    /// Histogram threshold count on the lambda axis
    pub lambda_thresholds: usize,

    /// Height of the histogram bands relative to the data range
    pub histogram_fraction: f64,

    pub point_radius: f32,
}

impl Default for MorphometryConfig {
    fn default() -> Self {
        Self {
            show_histograms: true,
            area_thresholds: 20,
            lambda_thresholds: 15,
            histogram_fraction: 0.15,
            point_radius: 4.0,
        }
    }
}

/// Pointer input collected inside the plot closure
#[derive(Debug, Default)]
struct PlotInput {
    pointer: Option<(PlotPoint, Pos2)>,
    /// Where the primary button went down; a drag is only reported once
    /// the pointer has left the click threshold
    press_origin: Option<(PlotPoint, Pos2)>,
    hit: Option<usize>,
    drag_started: bool,
    dragged: bool,
    drag_released: bool,
    clicked: bool,
}

/// Rounded plot domains of both axes
#[derive(Debug, Clone, Copy, PartialEq)]
struct Domains {
    area: (f64, f64),
    lambda: (f64, f64),
}

impl Domains {
    fn of(records: &[DiscRecord]) -> Option<Self> {
        let area = plots::finite_extent(records.iter().map(|r| r.area))?;
        let lambda = plots::finite_extent(records.iter().map(|r| r.lambda))?;
        Some(Self {
            area: plots::nice_domain(area.0, area.1, 10),
            lambda: plots::nice_domain(lambda.0, lambda.1, 10),
        })
    }
}

/// Marginal histogram of one condition
#[derive(Debug, Clone)]
struct Marginal {
    condition: Condition,
    bins: Vec<Bin>,
    max_count: usize,
}

fn marginals<F>(records: &[&DiscRecord], visibility: &VisibilityToggles, domain: (f64, f64), thresholds: usize, value: F) -> Vec<Marginal>
where
    F: Fn(&DiscRecord) -> f64,
{
    Condition::ALL
        .iter()
        .filter(|&&c| visibility.is_visible(c))
        .filter_map(|&condition| {
            let subset: Vec<f64> = records
                .iter()
                .filter(|r| r.condition == condition)
                .map(|r| value(*r))
                .collect();
            if subset.is_empty() {
                return None;
            }
            let bins = plots::bin(subset, domain, thresholds);
            let max_count = plots::binning::max_count(&bins);
            Some(Marginal { condition, bins, max_count })
        })
        .collect()
}

/// Conditions in order of first appearance in the table
fn conditions_in_data(records: &[DiscRecord]) -> Vec<Condition> {
    let mut found = Vec::new();
    for record in records {
        if !found.contains(&record.condition) {
            found.push(record.condition);
        }
    }
    found
}

/// Area vs lambda scatter view
pub struct MorphometryView {
    id: SpaceViewId,
    title: String,
    pub config: MorphometryConfig,
    brush: BrushTracker,
}

impl MorphometryView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Area vs Lambda".to_string(),
            config: MorphometryConfig::default(),
            brush: BrushTracker::new(MeasurementAxis::Area),
        }
    }

    fn draw_histograms(&self, plot_ui: &mut PlotUi, visible: &[&DiscRecord], visibility: &VisibilityToggles, domains: Domains) {
        let band_y = (domains.lambda.1 - domains.lambda.0) * self.config.histogram_fraction;
        let band_x = (domains.area.1 - domains.area.0) * self.config.histogram_fraction;

        let top = marginals(visible, visibility, domains.area, self.config.area_thresholds, |r| r.area);
        for marginal in top {
            let color = palette::condition_color(marginal.condition).gamma_multiply(0.5);
            let bars: Vec<Bar> = marginal
                .bins
                .iter()
                .filter(|b| b.width() > 0.0 && marginal.max_count > 0)
                .map(|b| {
                    let height = b.count as f64 / marginal.max_count as f64 * band_y;
                    Bar::new(b.center(), height)
                        .width(b.width())
                        .base_offset(domains.lambda.1)
                        .fill(color)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        }

        let right = marginals(visible, visibility, domains.lambda, self.config.lambda_thresholds, |r| r.lambda);
        for marginal in right {
            let color = palette::condition_color(marginal.condition).gamma_multiply(0.5);
            let bars: Vec<Bar> = marginal
                .bins
                .iter()
                .filter(|b| b.width() > 0.0 && marginal.max_count > 0)
                .map(|b| {
                    let length = b.count as f64 / marginal.max_count as f64 * band_x;
                    Bar::new(b.center(), length)
                        .width(b.width())
                        .base_offset(domains.area.1)
                        .fill(color)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).color(color).horizontal());
        }
    }

    fn draw_brush(plot_ui: &mut PlotUi, selection: &Selection, domains: Domains) {
        let Some((MeasurementAxis::Area, range)) = selection.brush else {
            return;
        };
        let accent = theme::accent_color();
        let height = domains.lambda.1 - domains.lambda.0;
        if range.width() > 0.0 {
            let shade = Bar::new((range.min + range.max) / 2.0, height)
                .width(range.width())
                .base_offset(domains.lambda.0)
                .fill(accent.gamma_multiply(0.15));
            plot_ui.bar_chart(BarChart::new(vec![shade]).color(accent.gamma_multiply(0.15)));
        }
        plot_ui.vline(VLine::new(range.min).color(accent).width(1.0));
        plot_ui.vline(VLine::new(range.max).color(accent).width(1.0));
    }

    fn draw_points(&self, plot_ui: &mut PlotUi, visible: &[&DiscRecord], selection: &Selection) {
        let style = EmphasisStyle::default();

        // Selected markers last so they stay on top
        let mut ordered: Vec<&DiscRecord> = visible.to_vec();
        ordered.sort_by_key(|r| selection.contains(&r.disc));

        for record in ordered {
            let emphasis = derive_emphasis(record, selection, &style);
            let shape = palette::marker_shape(record.condition);
            let point = vec![[record.area, record.lambda]];

            if emphasis.stroke_width > 1.0 {
                let outline = if selection.focus() == Some(record.disc.as_str()) {
                    Color32::BLACK
                } else {
                    Color32::WHITE
                };
                plot_ui.points(
                    Points::new(point.clone())
                        .shape(shape)
                        .radius(self.config.point_radius + emphasis.stroke_width)
                        .filled(true)
                        .color(outline),
                );
            }

            plot_ui.points(
                Points::new(point)
                    .shape(shape)
                    .radius(self.config.point_radius)
                    .filled(true)
                    .color(palette::emphasize(palette::condition_color(record.condition), emphasis)),
            );
        }
    }

    /// Turn the collected pointer input into gestures
    fn gestures(&mut self, input: &PlotInput, visible: &[&DiscRecord], selection: &Selection) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        let Some((plot_pos, screen_pos)) = input.pointer else {
            if input.drag_released {
                self.brush.reset();
            }
            return gestures;
        };

        if input.drag_started {
            let (origin_plot, origin_screen) = input.press_origin.unwrap_or((plot_pos, screen_pos));
            self.brush.begin(origin_plot.x, origin_screen.x);
        }

        if input.clicked {
            // A click also ends the press that began a drag
            self.brush.reset();
            match input.hit.and_then(|idx| visible.get(idx)) {
                Some(record) => gestures.push(Gesture::PointClicked(record.disc.clone())),
                None => {
                    let active = selection.brush.map(|(_, range)| range);
                    gestures.extend(self.brush.click(plot_pos.x, active));
                }
            }
            return gestures;
        }

        if input.dragged {
            gestures.extend(self.brush.update(plot_pos.x, screen_pos.x));
        }

        if input.drag_released {
            gestures.extend(self.brush.finish(screen_pos.x));
        }

        gestures
    }
}

impl Default for MorphometryView {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceView for MorphometryView {
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
        let Some(domains) = Domains::of(&records) else {
            crate::empty_hint(ui, "Wing Disc Area vs Lambda", "The morphometrics table has no plottable discs");
            return;
        };

        let state = ctx.discs.state();
        let selection = &state.selection;
        let visible: Vec<&DiscRecord> = state.visibility.filter(records.as_slice()).collect();

        let legend_id = WidgetId::view(VIEW_TYPE, self.id).part("legend");
        let mut legend_click = None;
        egui::SidePanel::right(legend_id.id())
            .resizable(false)
            .show_inside(ui, |ui| {
                ui.add_space(8.0);
                let items = palette::marker_legend(&conditions_in_data(&records));
                legend_click = condition_legend(ui, "Condition", &items, &state.visibility);
            });

        ui.vertical_centered(|ui| ui.heading("Wing Disc Area vs Lambda"));
        ui.horizontal(|ui| {
            ui.label(format!("Discs: {}", visible.len()));
            if !selection.is_empty() {
                ui.separator();
                ui.label(format!("Selected: {}", selection.len()));
            }
            if let Some((_, range)) = selection.brush {
                ui.separator();
                ui.label(format!("Area: {:.2} to {:.2}", range.min, range.max));
            }
        });

        let band = if self.config.show_histograms { 1.0 + self.config.histogram_fraction } else { 1.0 };
        let x_max = domains.area.0 + (domains.area.1 - domains.area.0) * band;
        let y_max = domains.lambda.0 + (domains.lambda.1 - domains.lambda.0) * band;

        let plot = Plot::new(WidgetId::view(VIEW_TYPE, self.id).id())
            .x_axis_label("Area")
            .y_axis_label("Lambda")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_x(false)
            .show_y(false)
            .include_x(domains.area.0)
            .include_x(x_max)
            .include_y(domains.lambda.0)
            .include_y(y_max);

        let response = plot.show(ui, |plot_ui| {
            if self.config.show_histograms {
                self.draw_histograms(plot_ui, &visible, &state.visibility, domains);
            }
            Self::draw_brush(plot_ui, selection, domains);
            self.draw_points(plot_ui, &visible, selection);

            let response = plot_ui.response();
            let mut input = PlotInput {
                drag_started: response.drag_started_by(PointerButton::Primary),
                dragged: response.dragged_by(PointerButton::Primary),
                drag_released: response.drag_released_by(PointerButton::Primary),
                clicked: response.clicked(),
                ..PlotInput::default()
            };

            if input.drag_started {
                if let Some(origin) = plot_ui.ctx().input(|i| i.pointer.press_origin()) {
                    input.press_origin = Some((plot_ui.plot_from_screen(origin), origin));
                }
            }

            if let Some(screen) = plot_ui.ctx().input(|i| i.pointer.interact_pos()) {
                input.pointer = Some((plot_ui.plot_from_screen(screen), screen));
                let positions = visible
                    .iter()
                    .enumerate()
                    .map(|(idx, r)| (idx, plot_ui.screen_from_plot(PlotPoint::new(r.area, r.lambda))));
                input.hit = plots::nearest_within(positions, screen, plots::HIT_RADIUS);
            }
            input
        });

        let input = response.inner;
        let hovered = if response.response.hovered() && !self.brush.is_dragging() {
            input.hit.and_then(|idx| visible.get(idx).copied())
        } else {
            None
        };
        if let Some(record) = hovered {
            response.response.on_hover_ui_at_pointer(|ui| {
                ui.label(format!("Disc: {}", record.disc));
                ui.label(format!("Area: {:.2}", record.area));
                ui.label(format!("Lambda: {:.2}", record.lambda));
                ui.label(format!("Condition: {}", record.condition_label));
            });
        }

        let mut gestures = self.gestures(&input, &visible, selection);
        gestures.extend(legend_click.map(Gesture::LegendClicked));
        for gesture in gestures {
            ctx.discs.dispatch(gesture, records.as_slice());
        }
    }

    fn save_config(&self) -> serde_json::Value {
        encode_config(&self.config)
    }

    fn load_config(&mut self, config: serde_json::Value) {
        decode_config(VIEW_TYPE, config, &mut self.config);
    }

    fn on_remount(&mut self) {
        self.brush.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::disc;
    use wd_core::AxisRange;

    fn records() -> Vec<DiscRecord> {
        vec![
            disc("d1", Condition::Standard, 4.2, 0.12),
            disc("d2", Condition::Hypoxia, 4.8, 0.25),
            disc("d3", Condition::Cold, 5.6, 0.31),
            disc("d4", Condition::Standard, 5.1, 0.18),
        ]
    }

    fn pointer(x: f64, screen_x: f32) -> Option<(PlotPoint, Pos2)> {
        Some((PlotPoint::new(x, 0.2), egui::pos2(screen_x, 100.0)))
    }

    #[test]
    fn test_domains_are_rounded() {
        let domains = Domains::of(&records()).unwrap();
        assert!(domains.area.0 <= 4.2 && domains.area.1 >= 5.6);
        assert!(domains.lambda.0 <= 0.12 && domains.lambda.1 >= 0.31);
        assert!(domains.lambda.1 < 0.4);
        assert!(Domains::of(&[]).is_none());
    }

    #[test]
    fn test_conditions_in_order_of_appearance() {
        let mut data = records();
        data.swap(0, 2);
        assert_eq!(conditions_in_data(&data), vec![Condition::Cold, Condition::Hypoxia, Condition::Standard]);
    }

    #[test]
    fn test_marginals_follow_visibility() {
        let data = records();
        let refs: Vec<&DiscRecord> = data.iter().collect();
        let visibility = wd_core::selection::toggle_visibility(Condition::Hypoxia, &VisibilityToggles::default());

        let top = marginals(&refs, &visibility, (4.0, 6.0), 20, |r| r.area);
        let conditions: Vec<Condition> = top.iter().map(|m| m.condition).collect();
        assert_eq!(conditions, vec![Condition::Standard, Condition::Cold]);

        let standard_total: usize = top[0].bins.iter().map(|b| b.count).sum();
        assert_eq!(standard_total, 2);
        assert_eq!(top[0].max_count, 1);
    }

    #[test]
    fn test_drag_then_release_brushes() {
        let data = records();
        let visible: Vec<&DiscRecord> = data.iter().collect();
        let selection = Selection::default();
        let mut view = MorphometryView::new();

        let press = PlotInput { pointer: pointer(4.5, 100.0), drag_started: true, dragged: true, ..Default::default() };
        assert!(view.gestures(&press, &visible, &selection).is_empty());

        let drag = PlotInput { pointer: pointer(5.2, 180.0), dragged: true, ..Default::default() };
        assert_eq!(
            view.gestures(&drag, &visible, &selection),
            vec![Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(4.5, 5.2) }]
        );

        let release = PlotInput { pointer: pointer(5.2, 180.0), drag_released: true, ..Default::default() };
        assert!(view.gestures(&release, &visible, &selection).is_empty());
    }

    #[test]
    fn test_brush_anchors_at_press_origin() {
        let data = records();
        let visible: Vec<&DiscRecord> = data.iter().collect();
        let selection = Selection::default();
        let mut view = MorphometryView::new();

        // The drag is reported a few pixels after the button went down
        let started = PlotInput {
            pointer: pointer(4.6, 106.0),
            press_origin: pointer(4.5, 100.0),
            drag_started: true,
            dragged: true,
            ..Default::default()
        };
        assert_eq!(
            view.gestures(&started, &visible, &selection),
            vec![Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(4.5, 4.6) }]
        );

        let drag = PlotInput { pointer: pointer(5.2, 180.0), dragged: true, ..Default::default() };
        assert_eq!(
            view.gestures(&drag, &visible, &selection),
            vec![Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(4.5, 5.2) }]
        );
    }

    #[test]
    fn test_click_on_marker_focuses() {
        let data = records();
        let visible: Vec<&DiscRecord> = data.iter().collect();
        let mut view = MorphometryView::new();

        let click = PlotInput {
            pointer: pointer(4.8, 100.0),
            hit: Some(1),
            drag_started: true,
            drag_released: true,
            clicked: true,
            ..Default::default()
        };
        assert_eq!(
            view.gestures(&click, &visible, &Selection::default()),
            vec![Gesture::PointClicked("d2".to_string())]
        );
    }

    #[test]
    fn test_click_outside_brush_cancels() {
        let data = records();
        let visible: Vec<&DiscRecord> = data.iter().collect();
        let mut view = MorphometryView::new();
        let selection = Selection {
            brush: Some((MeasurementAxis::Area, AxisRange::new(4.5, 5.0).unwrap())),
            ..Selection::default()
        };

        let outside = PlotInput { pointer: pointer(5.5, 300.0), clicked: true, ..Default::default() };
        assert_eq!(view.gestures(&outside, &visible, &selection), vec![Gesture::BrushCancelled]);

        let inside = PlotInput { pointer: pointer(4.7, 150.0), clicked: true, ..Default::default() };
        assert!(view.gestures(&inside, &visible, &selection).is_empty());
    }

    #[test]
    fn test_zero_width_drag_cancels() {
        let data = records();
        let visible: Vec<&DiscRecord> = data.iter().collect();
        let mut view = MorphometryView::new();
        let selection = Selection::default();

        let press = PlotInput { pointer: pointer(4.5, 100.0), drag_started: true, ..Default::default() };
        view.gestures(&press, &visible, &selection);
        let release = PlotInput { pointer: pointer(4.5, 100.0), drag_released: true, ..Default::default() };
        assert_eq!(view.gestures(&release, &visible, &selection), vec![Gesture::BrushCancelled]);
    }

    #[test]
    fn test_config_round_trip() {
        let mut view = MorphometryView::new();
        view.load_config(serde_json::json!({"area_thresholds": 10, "show_histograms": false}));
        assert_eq!(view.config.area_thresholds, 10);
        assert!(!view.config.show_histograms);
        assert_eq!(view.config.lambda_thresholds, 15);

        view.load_config(serde_json::json!("not an object"));
        assert_eq!(view.config.area_thresholds, 10);
        assert_eq!(view.save_config()["area_thresholds"], serde_json::json!(10));
    }
}
