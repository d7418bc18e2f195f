//! Viewport - manages dockable space views

use std::collections::HashMap;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use serde_json::Value;

use crate::{SpaceView, SpaceViewId, ViewerContext};

/// The main viewport that manages dockable space views
pub struct Viewport {
    dock_state: DockState<SpaceViewId>,
    space_views: HashMap<SpaceViewId, Box<dyn SpaceView>>,
    /// Views in layout order, used to rebuild the grid
    order: Vec<SpaceViewId>,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            dock_state: DockState::new(vec![]),
            space_views: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Lay the views out in a 2x2 grid.
    ///
    /// The first three views take the top-left, top-right and bottom-left
    /// cells; any further views share the bottom-right cell as tabs.
    pub fn create_grid_layout(&mut self, views: Vec<Box<dyn SpaceView>>) {
        self.space_views.clear();
        self.order = views.iter().map(|v| v.id()).collect();
        for view in views {
            self.space_views.insert(view.id(), view);
        }
        self.reset_layout();
    }

    /// Restore the grid, reopening closed tabs
    pub fn reset_layout(&mut self) {
        self.dock_state = grid_dock_state(&self.order);
        tracing::info!("Viewport layout with {} views", self.order.len());
    }

    /// Feed stored settings to every view whose type has an entry
    pub fn load_view_settings(&mut self, settings: &HashMap<String, Value>) {
        for view in self.space_views.values_mut() {
            if let Some(config) = settings.get(view.view_type()) {
                view.load_config(config.clone());
            }
        }
    }

    /// Current settings of every view, keyed by view type
    pub fn save_view_settings(&self) -> HashMap<String, Value> {
        self.space_views
            .values()
            .map(|view| (view.view_type().to_string(), view.save_config()))
            .collect()
    }

    /// Drop transient interaction state in every view
    pub fn remount(&mut self) {
        for view in self.space_views.values_mut() {
            view.on_remount();
        }
    }

    pub fn view_count(&self) -> usize {
        self.space_views.len()
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        DockArea::new(&mut self.dock_state)
            .show_close_buttons(true)
            .draggable_tabs(true)
            .show_tab_name_on_hover(true)
            .show_inside(
                ui,
                &mut ViewportTabViewer {
                    space_views: &mut self.space_views,
                    viewer_context,
                },
            );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    space_views: &'a mut HashMap<SpaceViewId, Box<dyn SpaceView>>,
    viewer_context: &'a ViewerContext,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = SpaceViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        match self.space_views.get(tab) {
            Some(view) => view.display_name().into(),
            None => "Unknown".into(),
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.space_views.get_mut(tab) {
            view.ui(self.viewer_context, ui);
        }
    }

    /// Closed views stay registered so a layout reset can reopen them
    fn on_close(&mut self, _tab: &mut Self::Tab) -> bool {
        true
    }
}

fn grid_dock_state(ids: &[SpaceViewId]) -> DockState<SpaceViewId> {
    let Some((&first, rest)) = ids.split_first() else {
        return DockState::new(vec![]);
    };

    let mut dock_state = DockState::new(vec![first]);
    let surface = dock_state.main_surface_mut();

    let Some((&second, rest)) = rest.split_first() else {
        return dock_state;
    };
    let [left, right] = surface.split_right(NodeIndex::root(), 0.5, vec![second]);

    let Some((&third, rest)) = rest.split_first() else {
        return dock_state;
    };
    surface.split_below(left, 0.55, vec![third]);

    if !rest.is_empty() {
        surface.split_below(right, 0.55, rest.to_vec());
    }

    dock_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionTableView;

    #[test]
    fn test_grid_layout_keeps_all_views() {
        let views: Vec<Box<dyn SpaceView>> = (0..5)
            .map(|_| Box::new(SelectionTableView::new()) as Box<dyn SpaceView>)
            .collect();

        let mut viewport = Viewport::new();
        viewport.create_grid_layout(views);
        assert_eq!(viewport.view_count(), 5);
        assert_eq!(viewport.dock_state.main_surface().num_tabs(), 5);
    }

    #[test]
    fn test_view_settings_round_trip() {
        let mut viewport = Viewport::new();
        viewport.create_grid_layout(vec![Box::new(SelectionTableView::new())]);

        let mut settings = HashMap::new();
        settings.insert("selection_table".to_string(), serde_json::json!({"striped": false}));
        viewport.load_view_settings(&settings);

        let saved = viewport.save_view_settings();
        assert_eq!(saved["selection_table"]["striped"], serde_json::json!(false));
    }
}
