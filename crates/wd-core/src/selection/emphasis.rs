//! Emphasis derived from selection membership
//!
//! There is one rule, [`emphasis_level`], shared by every view. Views only
//! choose the numbers behind each level through an [`EmphasisStyle`].

use super::{SelectableRecord, Selection};

/// Visual weight level of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmphasisLevel {
    /// Not selected while something else is
    Low,
    /// Nothing is selected
    Baseline,
    /// Shares a landmark with the hovered specimen
    Related,
    /// Member of the selection
    High,
}

/// Opacity and stroke width applied by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emphasis {
    pub opacity: f32,
    pub stroke_width: f32,
}

impl Emphasis {
    pub const fn new(opacity: f32, stroke_width: f32) -> Self {
        Self { opacity, stroke_width }
    }
}

/// Numeric values for each emphasis level of one view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmphasisStyle {
    pub baseline: Emphasis,
    pub high: Emphasis,
    pub related: Emphasis,
    pub low: Emphasis,
}

impl Default for EmphasisStyle {
    /// Marker style of the scatter and landmark views
    fn default() -> Self {
        Self {
            baseline: Emphasis::new(0.7, 1.0),
            high: Emphasis::new(1.0, 3.0),
            related: Emphasis::new(0.5, 1.0),
            low: Emphasis::new(0.1, 1.0),
        }
    }
}

impl EmphasisStyle {
    /// Line style of the gradient profile view
    pub fn profile_curves() -> Self {
        Self {
            baseline: Emphasis::new(0.25, 1.0),
            high: Emphasis::new(0.9, 2.0),
            related: Emphasis::new(0.5, 1.0),
            low: Emphasis::new(0.1, 1.0),
        }
    }

    pub fn resolve(&self, level: EmphasisLevel) -> Emphasis {
        match level {
            EmphasisLevel::Low => self.low,
            EmphasisLevel::Baseline => self.baseline,
            EmphasisLevel::Related => self.related,
            EmphasisLevel::High => self.high,
        }
    }
}

/// Emphasis level of a record under the current selection
pub fn emphasis_level<R: SelectableRecord + ?Sized>(record: &R, selection: &Selection) -> EmphasisLevel {
    if selection.is_empty() {
        EmphasisLevel::Baseline
    } else if selection.contains(record.record_id()) {
        EmphasisLevel::High
    } else {
        EmphasisLevel::Low
    }
}

/// Emphasis of a record, resolved through the view's style
pub fn derive_emphasis<R: SelectableRecord + ?Sized>(record: &R, selection: &Selection, style: &EmphasisStyle) -> Emphasis {
    style.resolve(emphasis_level(record, selection))
}

/// Transient emphasis while hovering landmark `landmark` of `specimen`.
///
/// Points of the hovered specimen are high, the same landmark on other
/// specimens is related, everything else is low.
pub fn landmark_hover_level(point_specimen: &str, point_landmark: u8, specimen: &str, landmark: u8) -> EmphasisLevel {
    if point_specimen == specimen {
        EmphasisLevel::High
    } else if point_landmark == landmark {
        EmphasisLevel::Related
    } else {
        EmphasisLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::samples;
    use crate::selection::{reduce, AxisRange, DashboardState, Gesture, MeasurementAxis};

    #[test]
    fn test_empty_selection_is_baseline() {
        let records = samples();
        let selection = Selection::default();
        for record in &records {
            assert_eq!(emphasis_level(record, &selection), EmphasisLevel::Baseline);
            assert_eq!(derive_emphasis(record, &selection, &EmphasisStyle::default()), Emphasis::new(0.7, 1.0));
        }
    }

    #[test]
    fn test_members_get_higher_opacity() {
        let records = samples();
        let state = reduce(
            DashboardState::default(),
            &Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(100.0, 150.0) },
            &records,
        );

        for style in [EmphasisStyle::default(), EmphasisStyle::profile_curves()] {
            let member = derive_emphasis(&records[1], &state.selection, &style);
            let other = derive_emphasis(&records[0], &state.selection, &style);
            assert!(member.opacity > other.opacity);
            assert!(member.stroke_width >= other.stroke_width);
        }
    }

    #[test]
    fn test_clear_restores_baseline() {
        let records = samples();
        let state = reduce(
            DashboardState::default(),
            &Gesture::BrushDragged { axis: MeasurementAxis::Area, range: AxisRange::new(0.0, 100.0) },
            &records,
        );
        let cleared = reduce(
            state,
            &Gesture::BrushDragged { axis: MeasurementAxis::Area, range: None },
            &records,
        );
        for record in &records {
            assert_eq!(emphasis_level(record, &cleared.selection), EmphasisLevel::Baseline);
        }
    }

    #[test]
    fn test_emphasis_is_deterministic() {
        let records = samples();
        let mut selection = Selection::default();
        selection.focus = Some("d3".to_string());
        let style = EmphasisStyle::profile_curves();
        let first = derive_emphasis(&records[2], &selection, &style);
        let second = derive_emphasis(&records[2], &selection, &style);
        assert_eq!(first, second);
        assert_eq!(first, style.high);
    }

    #[test]
    fn test_landmark_hover_level() {
        assert_eq!(landmark_hover_level("s1", 3, "s1", 7), EmphasisLevel::High);
        assert_eq!(landmark_hover_level("s2", 7, "s1", 7), EmphasisLevel::Related);
        assert_eq!(landmark_hover_level("s2", 3, "s1", 7), EmphasisLevel::Low);
    }
}
