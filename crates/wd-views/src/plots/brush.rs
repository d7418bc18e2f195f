//! One-dimensional brush over a measurement axis
//!
//! The tracker turns raw pointer input into selection gestures. It keeps
//! only the drag anchor; the active interval lives in the coordinator's
//! selection so that a remount also clears what is drawn.

use wd_core::{AxisRange, Gesture, MeasurementAxis};

/// Drags narrower than this many pixels count as a click
pub const MIN_BRUSH_PIXELS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    plot: f64,
    screen: f32,
}

/// Pointer state machine for a brush on one axis
#[derive(Debug, Clone, PartialEq)]
pub struct BrushTracker {
    axis: MeasurementAxis,
    anchor: Option<Anchor>,
}

impl BrushTracker {
    pub fn new(axis: MeasurementAxis) -> Self {
        Self { axis, anchor: None }
    }

    pub fn axis(&self) -> MeasurementAxis {
        self.axis
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// A drag started at the given plot and screen coordinates
    pub fn begin(&mut self, plot: f64, screen: f32) {
        self.anchor = Some(Anchor { plot, screen });
    }

    /// The pointer moved while dragging; yields the interval gesture.
    ///
    /// Nothing is emitted while the drag is narrower than
    /// [`MIN_BRUSH_PIXELS`], so pressing on a marker leaves the brush alone.
    pub fn update(&self, plot: f64, screen: f32) -> Option<Gesture> {
        let anchor = self.anchor?;
        if (screen - anchor.screen).abs() < MIN_BRUSH_PIXELS {
            return None;
        }
        Some(Gesture::BrushDragged {
            axis: self.axis,
            range: AxisRange::new(anchor.plot, plot),
        })
    }

    /// The drag ended; a zero-width drag cancels the brush
    pub fn finish(&mut self, screen: f32) -> Option<Gesture> {
        let anchor = self.anchor.take()?;
        if (screen - anchor.screen).abs() < MIN_BRUSH_PIXELS {
            Some(Gesture::BrushCancelled)
        } else {
            None
        }
    }

    /// A click that hit no mark; clicking outside the active interval
    /// cancels the brush
    pub fn click(&self, plot: f64, active: Option<AxisRange>) -> Option<Gesture> {
        match active {
            Some(range) if !range.contains(plot) => Some(Gesture::BrushCancelled),
            _ => None,
        }
    }

    /// Forget an unfinished drag
    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_emits_interval() {
        let mut brush = BrushTracker::new(MeasurementAxis::Area);
        assert!(brush.update(1.0, 10.0).is_none());

        brush.begin(5.0, 200.0);
        assert!(brush.is_dragging());
        let gesture = brush.update(4.0, 150.0).unwrap();
        assert_eq!(
            gesture,
            Gesture::BrushDragged {
                axis: MeasurementAxis::Area,
                range: AxisRange::new(4.0, 5.0),
            }
        );

        assert_eq!(brush.finish(150.0), None);
        assert!(!brush.is_dragging());
    }

    #[test]
    fn test_zero_width_drag_cancels() {
        let mut brush = BrushTracker::new(MeasurementAxis::Area);
        brush.begin(5.0, 200.0);
        assert_eq!(brush.update(5.001, 200.4), None);
        assert_eq!(brush.finish(200.4), Some(Gesture::BrushCancelled));
        assert_eq!(brush.finish(200.4), None);
    }

    #[test]
    fn test_click_outside_active_interval_cancels() {
        let brush = BrushTracker::new(MeasurementAxis::Area);
        let active = AxisRange::new(4.0, 5.0);

        assert_eq!(brush.click(6.0, active), Some(Gesture::BrushCancelled));
        assert_eq!(brush.click(4.5, active), None);
        assert_eq!(brush.click(5.0, active), None);
        assert_eq!(brush.click(6.0, None), None);
    }

    #[test]
    fn test_reset() {
        let mut brush = BrushTracker::new(MeasurementAxis::Lambda);
        brush.begin(0.1, 10.0);
        brush.reset();
        assert_eq!(brush.finish(10.0), None);
        assert_eq!(brush.axis(), MeasurementAxis::Lambda);
    }
}
