//! Raw profile of the focused disc

use egui::{RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use wd_data::{DiscRecord, ProfileSample, ProfileTable};
use wd_ui::{theme, WidgetId};

use crate::plots::{self, palette};
use crate::space_view::{decode_config, encode_config};
use crate::{empty_hint, loading_placeholder, SpaceView, SpaceViewId, ViewerContext};

const VIEW_TYPE: &str = "profile_detail";

const HINT: &str = "Click on a point again to hide the profile, or click another point to see its profile";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetailConfig {
    pub line_width: f32,

    /// Headroom above the largest sample, as a factor of it
    pub y_headroom: f64,
}

impl Default for ProfileDetailConfig {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            y_headroom: 1.1,
        }
    }
}

/// What the detail panel has to show for the current focus
#[derive(Debug, PartialEq)]
enum Detail<'a> {
    NoFocus,
    /// Focused disc is unknown to one of the tables
    Missing(&'a str),
    Ready {
        record: &'a DiscRecord,
        samples: &'a [ProfileSample],
    },
}

fn resolve_detail<'a>(focus: Option<&'a str>, records: &'a [DiscRecord], table: &'a ProfileTable) -> Detail<'a> {
    let Some(disc) = focus else {
        return Detail::NoFocus;
    };
    let Some(record) = records.iter().find(|r| r.disc == disc) else {
        return Detail::Missing(disc);
    };
    let samples = table.raw_profile(disc);
    if samples.is_empty() {
        return Detail::Missing(disc);
    }
    Detail::Ready { record, samples }
}

pub struct ProfileDetailView {
    id: SpaceViewId,
    title: String,
    pub config: ProfileDetailConfig,
    /// Last focus a missing-data warning was logged for
    warned_for: Option<String>,
}

impl ProfileDetailView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Profile Detail".to_string(),
            config: ProfileDetailConfig::default(),
            warned_for: None,
        }
    }

    fn warn_missing(&mut self, disc: &str) {
        if self.warned_for.as_deref() != Some(disc) {
            warn!("No profile data for focused disc {}", disc);
            self.warned_for = Some(disc.to_string());
        }
    }

    fn plot_profile(&self, ui: &mut Ui, record: &DiscRecord, samples: &[ProfileSample]) {
        ui.vertical_centered(|ui| {
            ui.heading(format!("Profile for {} ({})", record.disc, record.condition_label));
        });

        let y_max = samples.iter().map(|s| s.value).fold(0.0_f64, f64::max) * self.config.y_headroom;
        let (x_min, x_max) = plots::finite_extent(samples.iter().map(|s| s.distance)).unwrap_or((0.0, 1.0));
        let color = palette::condition_color(record.condition);

        let plot_height = (ui.available_height() - 24.0).max(80.0);
        Plot::new(WidgetId::view(VIEW_TYPE, self.id).id())
            .height(plot_height)
            .x_axis_label("Relative Distance")
            .y_axis_label("Intensity Value")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .include_x(x_min)
            .include_x(x_max)
            .include_y(0.0)
            .include_y(y_max)
            .show(ui, |plot_ui| {
                let points: PlotPoints = samples.iter().map(|s| [s.distance, s.value]).collect();
                plot_ui.line(Line::new(points).color(color).width(self.config.line_width));
            });

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(HINT).italics().color(theme::hint_color()));
        });
    }
}

impl Default for ProfileDetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceView for ProfileDetailView {
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
        let (Some(records), Some(table)) = (ctx.datasets.morphometrics.get(), ctx.datasets.profiles.get()) else {
            loading_placeholder(ui, "Loading profiles...");
            return;
        };

        let focus = ctx.discs.focus();
        match resolve_detail(focus.as_deref(), &records, &table) {
            Detail::NoFocus => {
                self.warned_for = None;
                empty_hint(ui, "Profile Detail", "Click on a point in the scatter plot to see its profile");
            }
            Detail::Missing(disc) => {
                self.warn_missing(disc);
                empty_hint(ui, "Profile Detail", &format!("No profile data for {}", disc));
            }
            Detail::Ready { record, samples } => {
                self.warned_for = None;
                self.plot_profile(ui, record, samples);
            }
        }
    }

    fn save_config(&self) -> serde_json::Value {
        encode_config(&self.config)
    }

    fn load_config(&mut self, config: serde_json::Value) {
        decode_config(VIEW_TYPE, config, &mut self.config);
    }

    fn on_remount(&mut self) {
        self.warned_for = None;
    }
}
