//! Normalized gradient profiles, one line per disc

use egui::Ui;
use egui_plot::{Line, Plot, PlotPoint, PlotPoints};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wd_core::selection::derive_emphasis;
use wd_core::{Condition, EmphasisStyle, Gesture, Selection};
use wd_data::Curve;
use wd_ui::{condition_legend, WidgetId};

use crate::plots::{self, palette};
use crate::space_view::{decode_config, encode_config};
use crate::{loading_placeholder, SpaceView, SpaceViewId, ViewerContext};

const VIEW_TYPE: &str = "gradient_profiles";

/// Legend click on the profiles. An active brush is re-evaluated over the
/// morphometrics table it was drawn on, not over the curves.
fn toggle_condition(ctx: &ViewerContext, condition: Condition) {
    let records = ctx.datasets.morphometrics.get().unwrap_or_default();
    ctx.discs.dispatch(Gesture::LegendClicked(condition), records.as_slice());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientProfilesConfig {
    /// Width multiplier applied on top of the emphasis stroke width
    pub line_width: f32,

    /// Show the disc under the pointer
    pub show_tooltips: bool,
}

impl Default for GradientProfilesConfig {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            show_tooltips: true,
        }
    }
}

/// Split curves into the background and the selected foreground.
///
/// Selected curves are drawn last so they are never hidden behind the rest.
fn draw_order<'a>(curves: &[&'a Curve], selection: &Selection) -> Vec<&'a Curve> {
    let (selected, rest): (Vec<&Curve>, Vec<&Curve>) = curves
        .iter()
        .copied()
        .partition(|c| selection.contains(&c.disc));
    rest.into_iter().chain(selected).collect()
}

pub struct GradientProfilesView {
    id: SpaceViewId,
    title: String,
    pub config: GradientProfilesConfig,
}

impl GradientProfilesView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Gradient Profiles".to_string(),
            config: GradientProfilesConfig::default(),
        }
    }
}

impl Default for GradientProfilesView {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceView for GradientProfilesView {
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
        let Some(table) = ctx.datasets.profiles.get() else {
            loading_placeholder(ui, "Loading gradient profiles...");
            return;
        };

        let state = ctx.discs.state();
        let visible: Vec<&Curve> = state.visibility.filter(table.curves.as_slice()).collect();

        let mut legend_click = None;
        egui::SidePanel::right(WidgetId::view(VIEW_TYPE, self.id).part("legend").id())
            .resizable(false)
            .show_inside(ui, |ui| {
                ui.add_space(8.0);
                legend_click = condition_legend(ui, "Condition", &palette::profile_legend(), &state.visibility);
            });

        ui.vertical_centered(|ui| ui.heading("Raw Gradient Profiles"));

        let (x_min, x_max) = table
            .distance_extent()
            .map(|(lo, hi)| plots::nice_domain(lo, hi, 10))
            .unwrap_or((0.0, 1.0));

        let style = EmphasisStyle::profile_curves();
        let plot = Plot::new(WidgetId::view(VIEW_TYPE, self.id).id())
            .x_axis_label("Distance along wing")
            .y_axis_label("Relative intensity")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_x(false)
            .show_y(false)
            .include_x(x_min)
            .include_x(x_max)
            .include_y(0.0)
            .include_y(1.0);

        let response = plot.show(ui, |plot_ui| {
            for curve in draw_order(&visible, &state.selection) {
                let emphasis = derive_emphasis(curve, &state.selection, &style);
                let points: PlotPoints = curve.points.iter().map(|p| [p.distance, p.intensity]).collect();
                plot_ui.line(
                    Line::new(points)
                        .color(palette::emphasize(palette::profile_color(curve.condition), emphasis))
                        .width(emphasis.stroke_width * self.config.line_width),
                );
            }

            let pointer = plot_ui.ctx().input(|i| i.pointer.interact_pos())?;
            let plot_ui = &*plot_ui;
            let positions = visible.iter().enumerate().flat_map(|(idx, curve)| {
                curve
                    .points
                    .iter()
                    .map(move |p| (idx, plot_ui.screen_from_plot(PlotPoint::new(p.distance, p.intensity))))
            });
            plots::nearest_within(positions, pointer, plots::HIT_RADIUS)
        });

        let hit = response.inner.and_then(|idx| visible.get(idx).copied());
        let clicked = response.response.clicked();
        let show_tooltip = self.config.show_tooltips && response.response.hovered();
        if let Some(curve) = hit.filter(|_| show_tooltip) {
            response.response.on_hover_ui_at_pointer(|ui| {
                ui.label(format!("Disc: {}", curve.disc));
                ui.label(format!("Condition: {}", curve.condition.profile_label()));
            });
        }

        if clicked {
            if let Some(curve) = hit {
                ctx.discs.dispatch(Gesture::PointClicked(curve.disc.clone()), table.curves.as_slice());
            }
        }
        if let Some(condition) = legend_click {
            toggle_condition(ctx, condition);
        }
    }

    fn save_config(&self) -> serde_json::Value {
        encode_config(&self.config)
    }

    fn load_config(&mut self, config: serde_json::Value) {
        decode_config(VIEW_TYPE, config, &mut self.config);
    }
}
