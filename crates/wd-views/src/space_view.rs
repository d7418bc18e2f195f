//! Space view abstraction - base trait for all dockable views

use egui::Ui;
use serde_json::Value;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a space view
pub type SpaceViewId = Uuid;

/// Base trait for all space views (plots, tables)
pub trait SpaceView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> SpaceViewId;

    /// Tab title
    fn display_name(&self) -> &str;

    /// Key of this view's entry in the per-view settings
    fn view_type(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// Save configuration
    fn save_config(&self) -> Value;

    /// Load configuration; unknown or malformed settings are ignored
    fn load_config(&mut self, config: Value);

    /// Drop transient interaction state (hover, unfinished drags)
    fn on_remount(&mut self) {}
}

/// Decode a view config, keeping `current` when the value does not fit
pub(crate) fn decode_config<T>(view_type: &str, config: Value, current: &mut T)
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_value(config) {
        Ok(decoded) => *current = decoded,
        Err(e) => tracing::warn!("Ignoring settings for {}: {}", view_type, e),
    }
}

/// Encode a view config for the settings map
pub(crate) fn encode_config<T: serde::Serialize>(config: &T) -> Value {
    serde_json::to_value(config).unwrap_or_default()
}
