//! User interface components for the wing-disc dashboard
//!
//! Theme, condition legend, menu and status bars, and widget id helpers
//! shared by the views and the application shell.

pub mod legend;
pub mod shell;
pub mod theme;
pub mod widget_utils;

/// Re-export commonly used types
pub use legend::{condition_legend, LegendItem, SwatchShape};
pub use shell::{menu_bar, status_bar, ShellAction, StatusLevel, StatusLog, StatusMessage};
pub use theme::{apply_theme, Theme};
pub use widget_utils::WidgetId;
