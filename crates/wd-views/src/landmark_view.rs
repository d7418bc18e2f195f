//! Landmark map of adult wings
//!
//! Every landmark of every visible specimen is drawn as one marker. Hovering
//! a landmark previews its specimen and the same landmark on the other
//! wings; clicking focuses the specimen, which reveals its vein connections
//! and landmark letters.

use std::collections::BTreeMap;

use egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotUi, Points, Text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wd_core::selection::{emphasis::landmark_hover_level, emphasis_level};
use wd_core::{Condition, EmphasisLevel, EmphasisStyle, Gesture, Selection};
use wd_data::{Landmark, LandmarkSpecimen};
use wd_ui::{condition_legend, theme, WidgetId};

use crate::plots::{self, palette};
use crate::space_view::{decode_config, encode_config};
use crate::{empty_hint, loading_placeholder, SpaceView, SpaceViewId, ViewerContext};

const VIEW_TYPE: &str = "landmark_map";

/// Opacity of the focused specimen's connection lines
const CONNECTION_OPACITY: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Label the landmarks of the focused or hovered specimen
    pub show_letters: bool,
    pub point_radius: f32,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            show_letters: true,
            point_radius: 3.0,
        }
    }
}

/// A landmark together with the specimen it belongs to
#[derive(Debug, Clone, Copy)]
struct MapPoint<'a> {
    specimen: &'a LandmarkSpecimen,
    landmark: Landmark,
}

/// Finite landmarks of the given specimens, in specimen order
fn map_points<'a>(specimens: &[&'a LandmarkSpecimen]) -> Vec<MapPoint<'a>> {
    specimens
        .iter()
        .flat_map(|&specimen| {
            specimen
                .landmarks
                .iter()
                .filter(|l| l.is_finite())
                .map(move |&landmark| MapPoint { specimen, landmark })
        })
        .collect()
}

/// Emphasis level of one marker; a hover preview overrides the selection
fn point_level(point: &MapPoint<'_>, hover: Option<&MapPoint<'_>>, selection: &Selection) -> EmphasisLevel {
    match hover {
        Some(h) => landmark_hover_level(&point.specimen.id, point.landmark.index, &h.specimen.id, h.landmark.index),
        None => emphasis_level(point.specimen, selection),
    }
}

fn status_line(point_count: usize, focus: Option<&str>) -> String {
    match focus {
        Some(id) => format!("Loaded {} landmark points • Showing connections for: {}", point_count, id),
        None => format!("Loaded {} landmark points", point_count),
    }
}

fn conditions_in_data(specimens: &[LandmarkSpecimen]) -> Vec<Condition> {
    let mut found: Vec<Condition> = Vec::new();
    for specimen in specimens {
        if !found.contains(&specimen.condition) {
            found.push(specimen.condition);
        }
    }
    found
}

pub struct LandmarkView {
    id: SpaceViewId,
    title: String,
    pub config: LandmarkConfig,
}

impl LandmarkView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Wing Landmarks".to_string(),
            config: LandmarkConfig::default(),
        }
    }

    fn draw_connections(plot_ui: &mut PlotUi, specimen: &LandmarkSpecimen) {
        let color = palette::condition_color(specimen.condition).gamma_multiply(CONNECTION_OPACITY);
        for (from, to) in specimen.connection_segments() {
            plot_ui.line(Line::new(vec![from, to]).color(color).width(2.0));
        }
    }

    fn draw_markers(&self, plot_ui: &mut PlotUi, points: &[MapPoint<'_>], hover: Option<&MapPoint<'_>>, selection: &Selection) {
        let style = EmphasisStyle::default();

        // Grouped by level first so emphasized markers are drawn on top
        let mut groups: BTreeMap<(EmphasisLevel, Condition), Vec<[f64; 2]>> = BTreeMap::new();
        for point in points {
            let level = point_level(point, hover, selection);
            groups
                .entry((level, point.specimen.condition))
                .or_default()
                .push([point.landmark.x, point.landmark.y]);
        }

        for ((level, condition), coords) in groups {
            let emphasis = style.resolve(level);
            if emphasis.stroke_width > 1.0 {
                plot_ui.points(
                    Points::new(coords.clone())
                        .shape(palette::marker_shape(condition))
                        .radius(self.config.point_radius + emphasis.stroke_width / 2.0)
                        .filled(true)
                        .color(Color32::BLACK),
                );
            }
            plot_ui.points(
                Points::new(coords)
                    .shape(palette::marker_shape(condition))
                    .radius(self.config.point_radius)
                    .filled(true)
                    .color(palette::emphasize(palette::condition_color(condition), emphasis)),
            );
        }
    }

    fn draw_letters(plot_ui: &mut PlotUi, specimen: &LandmarkSpecimen) {
        for landmark in specimen.landmarks.iter().filter(|l| l.is_finite()) {
            plot_ui.text(
                Text::new(
                    PlotPoint::new(landmark.x, landmark.y),
                    RichText::new(landmark.letter.to_string()).strong().size(11.0),
                )
                .anchor(Align2::LEFT_BOTTOM),
            );
        }
    }
}

impl Default for LandmarkView {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceView for LandmarkView {
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
        let Some(specimens) = ctx.datasets.landmarks.get() else {
            loading_placeholder(ui, "Loading wing coordinates...");
            return;
        };
        if specimens.is_empty() {
            empty_hint(ui, "Wing Landmarks", "The landmark table has no specimens");
            return;
        }

        let state = ctx.specimens.state();
        let selection = &state.selection;
        let visible: Vec<&LandmarkSpecimen> = state.visibility.filter(specimens.as_slice()).collect();
        let points = map_points(&visible);
        let focused = selection
            .focus()
            .and_then(|id| visible.iter().copied().find(|s| s.id == id));

        let mut legend_click = None;
        egui::SidePanel::right(WidgetId::view(VIEW_TYPE, self.id).part("legend").id())
            .resizable(false)
            .show_inside(ui, |ui| {
                ui.add_space(8.0);
                let items = palette::marker_legend(&conditions_in_data(&specimens));
                legend_click = condition_legend(ui, "Condition", &items, &state.visibility);
            });

        ui.vertical_centered(|ui| ui.heading("Wing Landmarks"));
        ui.label(
            RichText::new(status_line(points.len(), focused.map(|s| s.id.as_str())))
                .color(theme::hint_color()),
        );

        let plot = Plot::new(WidgetId::view(VIEW_TYPE, self.id).id())
            .data_aspect(1.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_x(false)
            .show_y(false);

        let hovered_plot = ui.ui_contains_pointer();
        let response = plot.show(ui, |plot_ui| {
            let hit = plot_ui.ctx().input(|i| i.pointer.interact_pos()).and_then(|pointer| {
                let positions = points.iter().enumerate().map(|(idx, p)| {
                    (idx, plot_ui.screen_from_plot(PlotPoint::new(p.landmark.x, p.landmark.y)))
                });
                plots::nearest_within(positions, pointer, plots::HIT_RADIUS)
            });
            let hover = hit.filter(|_| hovered_plot).and_then(|idx| points.get(idx));

            if let Some(specimen) = focused {
                Self::draw_connections(plot_ui, specimen);
            }
            self.draw_markers(plot_ui, &points, hover, selection);

            if self.config.show_letters {
                if let Some(specimen) = focused {
                    Self::draw_letters(plot_ui, specimen);
                }
                if let Some(h) = hover.filter(|h| Some(h.specimen.id.as_str()) != selection.focus()) {
                    Self::draw_letters(plot_ui, h.specimen);
                }
            }
            hit
        });

        let hit = response.inner.and_then(|idx| points.get(idx).copied());
        let clicked = response.response.clicked();
        if let Some(point) = hit.filter(|_| response.response.hovered()) {
            response.response.on_hover_ui_at_pointer(|ui| {
                let specimen = point.specimen;
                ui.label(format!("ID: {}", specimen.id));
                ui.label(format!("Point: {} ({})", point.landmark.letter, point.landmark.index));
                ui.label(format!("Condition: {}", specimen.condition_label));
                ui.label(format!("Sex: {}", specimen.sex));
                ui.label(format!("X: {:.2}, Y: {:.2}", point.landmark.x, point.landmark.y));
                ui.label(format!("Centroid Size: {:.4}", specimen.centroid_size));
            });
        }

        if clicked {
            if let Some(point) = hit {
                ctx.specimens
                    .dispatch(Gesture::PointClicked(point.specimen.id.clone()), specimens.as_slice());
            }
        }
        if let Some(condition) = legend_click {
            ctx.specimens.dispatch(Gesture::LegendClicked(condition), specimens.as_slice());
        }
    }

    fn save_config(&self) -> serde_json::Value {
        encode_config(&self.config)
    }

    fn load_config(&mut self, config: serde_json::Value) {
        decode_config(VIEW_TYPE, config, &mut self.config);
    }
}
