//! Widget id helpers
//!
//! Several views render the same kind of plot, so every plot, panel and
//! scroll area id is derived from the owning view's type and id.

use egui::Id;
use std::fmt::Display;

/// Path-like widget id, `view_type/instance/part/...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetId {
    path: String,
}

impl WidgetId {
    /// Root id of one view instance
    pub fn view(view_type: &str, instance: impl Display) -> Self {
        Self {
            path: format!("{}/{}", view_type, instance),
        }
    }

    /// Id of a part inside this widget
    pub fn part(&self, name: impl Display) -> Self {
        Self {
            path: format!("{}/{}", self.path, name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> Id {
        Id::new(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_extend_the_view_path() {
        let root = WidgetId::view("landmark_map", 7);
        let legend = root.part("legend");
        assert_eq!(legend.as_str(), "landmark_map/7/legend");
        assert_eq!(root.as_str(), "landmark_map/7");
        assert_ne!(root.id(), legend.id());
        assert_eq!(legend.id(), Id::new("landmark_map/7/legend"));
    }
}
