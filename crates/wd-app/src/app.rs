//! Dashboard application state and frame loop

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Context};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use wd_core::events::events::{DataSourceError, DataSourceLoaded, SelectionChanged};
use wd_core::EventBus;
use wd_data::{DashboardConfig, LandmarkSource, MorphometricsSource, ProfileSource};
use wd_ui::{ShellAction, StatusLevel, StatusLog, Theme};
use wd_views::{
    GradientProfilesView, LandmarkView, MorphometryView, ProfileDetailView, SelectionTableView, SpaceView,
    ViewerContext, Viewport,
};

/// eframe storage key of the per-view settings
const VIEW_SETTINGS_KEY: &str = "wingdisc_view_settings";

const STATUS_CAPACITY: usize = 8;
const STATUS_RETENTION: Duration = Duration::from_secs(10);

pub struct DashboardApp {
    config: DashboardConfig,

    viewport: Viewport,

    /// Shared with every view
    viewer_context: ViewerContext,

    /// Filled by event bus handlers on the loader threads
    status: Arc<Mutex<StatusLog>>,

    runtime: tokio::runtime::Runtime,

    /// Loads started by the last `load_tables`
    loads: Vec<JoinHandle<()>>,

    egui_ctx: Context,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, runtime: tokio::runtime::Runtime) -> Self {
        let theme = if config.dark_mode { Theme::dark() } else { Theme::default() };
        wd_ui::apply_theme(&cc.egui_ctx, &theme);

        let event_bus = Arc::new(EventBus::new());
        let status = Arc::new(Mutex::new(StatusLog::new(STATUS_CAPACITY, STATUS_RETENTION)));
        subscribe_status(&event_bus, &status);

        let viewer_context = ViewerContext::new(event_bus);

        let mut viewport = Viewport::new();
        viewport.create_grid_layout(default_views());
        viewport.load_view_settings(&config.view_settings);

        // Settings saved by the last session win over the config file
        if let Some(storage) = cc.storage {
            if let Some(saved) = eframe::get_value::<HashMap<String, serde_json::Value>>(storage, VIEW_SETTINGS_KEY) {
                viewport.load_view_settings(&saved);
            }
        }

        let mut app = Self {
            config,
            viewport,
            viewer_context,
            status,
            runtime,
            loads: Vec::new(),
            egui_ctx: cc.egui_ctx.clone(),
        };
        app.load_tables();
        app
    }

    /// Start the three background loads
    fn load_tables(&mut self) {
        info!("Loading tables from {}", self.config.data_dir.display());
        let handle = self.runtime.handle();
        let datasets = &self.viewer_context.datasets;
        let bus = &self.viewer_context.event_bus;

        let ctx = self.egui_ctx.clone();
        let morphometrics = datasets.morphometrics.spawn_load(
            handle,
            MorphometricsSource::new(self.config.morphometrics_path()),
            bus.clone(),
            move || ctx.request_repaint(),
        );

        let ctx = self.egui_ctx.clone();
        let profiles = datasets.profiles.spawn_load(
            handle,
            ProfileSource::new(self.config.profiles_path()),
            bus.clone(),
            move || ctx.request_repaint(),
        );

        let ctx = self.egui_ctx.clone();
        let landmarks = datasets.landmarks.spawn_load(
            handle,
            LandmarkSource::new(self.config.landmarks_path()),
            bus.clone(),
            move || ctx.request_repaint(),
        );

        self.loads = vec![morphometrics, profiles, landmarks];
    }

    /// Drop the loaded tables and every selection, then load again
    fn reload(&mut self) {
        for load in self.loads.drain(..) {
            load.abort();
        }
        self.viewer_context.datasets.reset();
        self.reset_views();
        self.status.lock().clear();
        self.load_tables();
    }

    fn reset_views(&mut self) {
        self.viewer_context.remount();
        self.viewport.remount();
    }

    fn handle_action(&mut self, ctx: &Context, action: ShellAction) {
        match action {
            ShellAction::OpenDataFolder => {
                let picked = rfd::FileDialog::new()
                    .set_directory(&self.config.data_dir)
                    .pick_folder();
                if let Some(dir) = picked {
                    info!("Switching data folder to {}", dir.display());
                    self.config.data_dir = dir;
                    self.reload();
                }
            }
            ShellAction::ReloadData => self.reload(),
            ShellAction::ResetViews => self.reset_views(),
            ShellAction::ResetLayout => self.viewport.reset_layout(),
            ShellAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn summary(&self) -> String {
        let datasets = &self.viewer_context.datasets;
        let count = |loaded: Option<usize>| loaded.map_or_else(|| "loading".to_string(), |n| n.to_string());

        let mut parts = vec![
            format!("Discs: {}", count(datasets.morphometrics.get().map(|t| t.len()))),
            format!("Profiles: {}", count(datasets.profiles.get().map(|t| t.curves.len()))),
            format!("Wings: {}", count(datasets.landmarks.get().map(|t| t.len()))),
        ];
        let selected = self.viewer_context.discs.selection().len();
        if selected > 0 {
            parts.push(format!("Selected: {}", selected));
        }
        parts.join(" • ")
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let data_dir = self.config.data_dir.display().to_string();
        if let Some(action) = wd_ui::menu_bar(ctx, &data_dir) {
            self.handle_action(ctx, action);
        }

        {
            let mut status = self.status.lock();
            status.prune(Instant::now());
            wd_ui::status_bar(ctx, &status, &self.summary());
            if status.latest().is_some() {
                ctx.request_repaint_after(Duration::from_secs(1));
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.ui(ui, &self.viewer_context);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, VIEW_SETTINGS_KEY, &self.viewport.save_view_settings());
    }
}

/// Views in grid order: scatter, profiles, landmarks, then detail and table
/// sharing the last cell
fn default_views() -> Vec<Box<dyn SpaceView>> {
    vec![
        Box::new(MorphometryView::new()),
        Box::new(GradientProfilesView::new()),
        Box::new(LandmarkView::new()),
        Box::new(ProfileDetailView::new()),
        Box::new(SelectionTableView::new()),
    ]
}

/// Mirror load results and focus changes into the status bar
fn subscribe_status(bus: &EventBus, status: &Arc<Mutex<StatusLog>>) {
    let log = status.clone();
    bus.subscribe(move |loaded: &DataSourceLoaded| {
        log.lock().push(
            StatusLevel::Info,
            format!("Loaded {} rows from {}", loaded.row_count, loaded.source_name),
        );
    });

    let log = status.clone();
    bus.subscribe(move |failed: &DataSourceError| {
        warn!("Table {} stays unavailable", failed.source_name);
        log.lock().push(StatusLevel::Error, format!("{}: {}", failed.source_name, failed.error));
    });

    // Brushing fires on every pointer move, so only clicks are reported
    let log = status.clone();
    bus.subscribe(move |changed: &SelectionChanged| {
        if changed.gesture != "point_clicked" {
            return;
        }
        let text = match &changed.focus {
            Some(id) => format!("Focused {} ({} selected {})", id, changed.selected, changed.space),
            None => format!("Focus cleared ({} selected {})", changed.selected, changed.space),
        };
        log.lock().push(StatusLevel::Info, text);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wd_core::IdentifierSpace;

    #[test]
    fn test_status_follows_load_events() {
        let bus = EventBus::new();
        let status = Arc::new(Mutex::new(StatusLog::new(STATUS_CAPACITY, STATUS_RETENTION)));
        subscribe_status(&bus, &status);

        bus.publish(DataSourceLoaded {
            source_name: "data/mergedRawGrad.csv".to_string(),
            row_count: 12,
        });
        assert_eq!(status.lock().latest().map(|m| m.level), Some(StatusLevel::Info));

        bus.publish(DataSourceError {
            source_name: "data/mergedWingCoords.csv".to_string(),
            error: "No such file".to_string(),
        });
        let status = status.lock();
        let latest = status.latest().unwrap();
        assert_eq!(latest.level, StatusLevel::Error);
        assert_eq!(latest.text, "data/mergedWingCoords.csv: No such file");
    }

    #[test]
    fn test_default_views_cover_every_view_type() {
        let types: Vec<String> = default_views().iter().map(|v| v.view_type().to_string()).collect();
        assert_eq!(
            types,
            vec!["morphometry_scatter", "gradient_profiles", "landmark_map", "profile_detail", "selection_table"]
        );
    }

    #[test]
    fn test_status_reports_focus_changes_only() {
        let bus = EventBus::new();
        let status = Arc::new(Mutex::new(StatusLog::new(STATUS_CAPACITY, STATUS_RETENTION)));
        subscribe_status(&bus, &status);

        bus.publish(SelectionChanged {
            space: IdentifierSpace::Discs,
            gesture: "brush_dragged",
            selected: 4,
            focus: None,
        });
        assert!(status.lock().latest().is_none());

        bus.publish(SelectionChanged {
            space: IdentifierSpace::Discs,
            gesture: "point_clicked",
            selected: 5,
            focus: Some("disc_07".to_string()),
        });
        assert_eq!(
            status.lock().latest().map(|m| m.text.clone()),
            Some("Focused disc_07 (5 selected discs)".to_string())
        );

        bus.publish(SelectionChanged {
            space: IdentifierSpace::Specimens,
            gesture: "point_clicked",
            selected: 0,
            focus: None,
        });
        assert_eq!(
            status.lock().latest().map(|m| m.text.clone()),
            Some("Focus cleared (0 selected specimens)".to_string())
        );
    }
}
