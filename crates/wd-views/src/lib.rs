//! View system for the wing-disc dashboard
//!
//! Every view reads the loaded tables from [`Datasets`] and the selection of
//! its identifier space from a [`SelectionCoordinator`]. Views never mutate
//! selection state directly; they dispatch gestures.

mod gradient_profiles_view;
mod landmark_view;
mod morphometry_view;
pub mod plots;
mod profile_detail_view;
mod selection_table;
mod space_view;
mod viewport;

pub use gradient_profiles_view::{GradientProfilesConfig, GradientProfilesView};
pub use landmark_view::{LandmarkConfig, LandmarkView};
pub use morphometry_view::{MorphometryConfig, MorphometryView};
pub use profile_detail_view::{ProfileDetailConfig, ProfileDetailView};
pub use selection_table::{SelectionTableConfig, SelectionTableView};
pub use space_view::{SpaceView, SpaceViewId};
pub use viewport::Viewport;

use std::sync::Arc;
use wd_core::{DatasetSlot, EventBus, IdentifierSpace, SelectionCoordinator};
use wd_data::{schema, DiscRecord, LandmarkSpecimen, ProfileTable};

/// Slots for the three input tables
#[derive(Clone)]
pub struct Datasets {
    pub morphometrics: Arc<DatasetSlot<Vec<DiscRecord>>>,
    pub profiles: Arc<DatasetSlot<ProfileTable>>,
    pub landmarks: Arc<DatasetSlot<Vec<LandmarkSpecimen>>>,
}

impl Datasets {
    pub fn new() -> Self {
        Self {
            morphometrics: Arc::new(DatasetSlot::new(schema::MORPHOMETRICS_TABLE)),
            profiles: Arc::new(DatasetSlot::new(schema::PROFILES_TABLE)),
            landmarks: Arc::new(DatasetSlot::new(schema::LANDMARKS_TABLE)),
        }
    }

    /// Put every slot back into the loading state
    pub fn reset(&self) {
        self.morphometrics.reset();
        self.profiles.reset();
        self.landmarks.reset();
    }

    /// True while any table is still loading
    pub fn any_loading(&self) -> bool {
        self.morphometrics.is_loading() || self.profiles.is_loading() || self.landmarks.is_loading()
    }
}

impl Default for Datasets {
    fn default() -> Self {
        Self::new()
    }
}

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Selection over wing discs (scatter, profiles, detail, table)
    pub discs: Arc<SelectionCoordinator>,

    /// Selection over adult wing specimens (landmark map)
    pub specimens: Arc<SelectionCoordinator>,

    pub datasets: Datasets,

    pub event_bus: Arc<EventBus>,
}

impl ViewerContext {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            discs: Arc::new(SelectionCoordinator::new(IdentifierSpace::Discs, event_bus.clone())),
            specimens: Arc::new(SelectionCoordinator::new(IdentifierSpace::Specimens, event_bus.clone())),
            datasets: Datasets::new(),
            event_bus,
        }
    }

    /// Reset the selection and visibility of both identifier spaces
    pub fn remount(&self) {
        self.discs.remount();
        self.specimens.remount();
    }
}

/// Placeholder shown while a view's table is loading
pub(crate) fn loading_placeholder(ui: &mut egui::Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(egui::RichText::new(text).color(wd_ui::theme::hint_color()));
    });
}

/// Centered hint for views with nothing to show
pub(crate) fn empty_hint(ui: &mut egui::Ui, title: &str, hint: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(egui::RichText::new(title).strong());
        ui.label(egui::RichText::new(hint).color(wd_ui::theme::hint_color()));
    });
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use wd_core::Condition;

    pub fn disc(id: &str, condition: Condition, area: f64, lambda: f64) -> DiscRecord {
        DiscRecord {
            disc: id.to_string(),
            area,
            shape_a: f64::NAN,
            shape_b: f64::NAN,
            shape_c: f64::NAN,
            lambda,
            condition,
            condition_label: condition.as_str().to_string(),
        }
    }

    pub fn context() -> ViewerContext {
        ViewerContext::new(Arc::new(EventBus::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wd_core::{Condition, Gesture};

    #[test]
    fn test_datasets_reset() {
        let datasets = Datasets::new();
        assert!(datasets.any_loading());

        datasets.morphometrics.set_ready(vec![test_support::disc("d1", Condition::Cold, 4.5, 0.2)]);
        datasets.profiles.set_ready(ProfileTable::default());
        datasets.landmarks.set_ready(Vec::new());
        assert!(!datasets.any_loading());

        datasets.reset();
        assert!(datasets.morphometrics.get().is_none());
    }

    #[test]
    fn test_remount_clears_both_spaces() {
        let ctx = test_support::context();
        let records = vec![test_support::disc("d1", Condition::Cold, 4.5, 0.2)];
        assert!(ctx.discs.dispatch(Gesture::PointClicked("d1".to_string()), &records));
        assert!(ctx.specimens.dispatch(Gesture::LegendClicked(Condition::Cold), &records));

        ctx.remount();
        assert!(ctx.discs.focus().is_none());
        assert!(ctx.specimens.visibility().is_visible(Condition::Cold));
    }
}
