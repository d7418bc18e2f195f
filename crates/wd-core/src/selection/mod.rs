//! Linked selection state and the reducers that update it
//!
//! Every update is a pure function from the previous state and a gesture to
//! the next state. The [`crate::sync::SelectionCoordinator`] applies them and
//! broadcasts the result; views only ever read.

pub mod emphasis;

use ahash::AHashSet;
use std::collections::BTreeMap;

use crate::condition::Condition;

pub use emphasis::{derive_emphasis, emphasis_level, Emphasis, EmphasisLevel, EmphasisStyle};

/// Record identifier shared between tables of the same identifier space
pub type RecordId = String;

/// Numeric measurements a range selection can be made over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementAxis {
    /// Log-transformed disc area
    Area,
    /// Fitted shape coefficient `A`
    ShapeA,
    /// Fitted shape coefficient `B`
    ShapeB,
    /// Fitted shape coefficient `C`
    ShapeC,
    /// Fitted decay length (column `D`)
    Lambda,
    CentroidSize,
    LogCentroidSize,
}

impl MeasurementAxis {
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementAxis::Area => "Area",
            MeasurementAxis::ShapeA => "A",
            MeasurementAxis::ShapeB => "B",
            MeasurementAxis::ShapeC => "C",
            MeasurementAxis::Lambda => "Lambda",
            MeasurementAxis::CentroidSize => "Centroid Size",
            MeasurementAxis::LogCentroidSize => "Log Centroid Size",
        }
    }
}

/// A record that can take part in linked selection
pub trait SelectableRecord {
    /// Identifier shared with the other tables of the same space
    fn record_id(&self) -> &str;

    /// Experimental condition of the record
    fn condition(&self) -> Condition;

    /// Value on the given axis, `None` when this table has no such column
    fn measurement(&self, axis: MeasurementAxis) -> Option<f64>;
}

impl<T: SelectableRecord + ?Sized> SelectableRecord for &T {
    fn record_id(&self) -> &str {
        (**self).record_id()
    }

    fn condition(&self) -> Condition {
        (**self).condition()
    }

    fn measurement(&self, axis: MeasurementAxis) -> Option<f64> {
        (**self).measurement(axis)
    }
}

/// Closed interval on a measurement axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Build an interval from two endpoints in any order.
    ///
    /// Returns `None` when either endpoint is NaN, which callers treat as an
    /// empty interval.
    pub fn new(a: f64, b: f64) -> Option<Self> {
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Identifiers whose measurement on `axis` lies inside `range`.
///
/// `None` is the empty interval and matches nothing. Records without the
/// measurement, or with a NaN value, never match.
pub fn set_range_selection<R: SelectableRecord>(
    range: Option<AxisRange>,
    records: &[R],
    axis: MeasurementAxis,
) -> AHashSet<RecordId> {
    let Some(range) = range else {
        return AHashSet::new();
    };

    records
        .iter()
        .filter(|record| {
            record
                .measurement(axis)
                .map(|value| range.contains(value))
                .unwrap_or(false)
        })
        .map(|record| record.record_id().to_string())
        .collect()
}

/// Click-to-select: clicking the focused id again clears the focus
pub fn toggle_focus(id: &str, current: Option<&str>) -> Option<RecordId> {
    if current == Some(id) {
        None
    } else {
        Some(id.to_string())
    }
}

/// Per-condition visibility used by the renderers as a filter
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityToggles {
    visible: BTreeMap<Condition, bool>,
}

impl Default for VisibilityToggles {
    fn default() -> Self {
        Self {
            visible: Condition::ALL.iter().map(|&c| (c, true)).collect(),
        }
    }
}

impl VisibilityToggles {
    pub fn is_visible(&self, condition: Condition) -> bool {
        self.visible.get(&condition).copied().unwrap_or(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Condition, bool)> + '_ {
        self.visible.iter().map(|(&c, &v)| (c, v))
    }

    /// Keep only the records whose condition is currently shown
    pub fn filter<'a, R: SelectableRecord>(&'a self, records: &'a [R]) -> impl Iterator<Item = &'a R> + 'a {
        records.iter().filter(move |r| self.is_visible(r.condition()))
    }
}

/// Flip the visibility of one condition
pub fn toggle_visibility(condition: Condition, toggles: &VisibilityToggles) -> VisibilityToggles {
    let mut next = toggles.clone();
    let shown = next.is_visible(condition);
    next.visible.insert(condition, !shown);
    next
}

/// Current selection of one identifier space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Active brush interval and the axis it was drawn on
    pub brush: Option<(MeasurementAxis, AxisRange)>,

    /// Identifiers matched by the brush
    pub range_ids: AHashSet<RecordId>,

    /// Single clicked identifier
    pub focus: Option<RecordId>,
}

impl Selection {
    /// True when neither the brush nor a click selects anything
    pub fn is_empty(&self) -> bool {
        self.range_ids.is_empty() && self.focus.is_none()
    }

    /// Membership in the union of range set and focus
    pub fn contains(&self, id: &str) -> bool {
        self.range_ids.contains(id) || self.focus.as_deref() == Some(id)
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Number of distinct selected identifiers
    pub fn len(&self) -> usize {
        match &self.focus {
            Some(id) if !self.range_ids.contains(id) => self.range_ids.len() + 1,
            _ => self.range_ids.len(),
        }
    }
}

/// Everything a view needs to derive its emphasis and filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub selection: Selection,
    pub visibility: VisibilityToggles,
}

/// User gestures understood by the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Brush dragged over an axis; sent continuously while dragging
    BrushDragged {
        axis: MeasurementAxis,
        range: Option<AxisRange>,
    },
    /// Brush cancelled by a click outside it or a zero-width drag
    BrushCancelled,
    /// A plotted mark was clicked
    PointClicked(RecordId),
    /// A legend swatch was clicked
    LegendClicked(Condition),
    /// The views were (re)mounted
    Remount,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::BrushDragged { .. } => "brush_dragged",
            Gesture::BrushCancelled => "brush_cancelled",
            Gesture::PointClicked(_) => "point_clicked",
            Gesture::LegendClicked(_) => "legend_clicked",
            Gesture::Remount => "remount",
        }
    }
}

/// Apply one gesture to the state
pub fn reduce<R: SelectableRecord>(state: DashboardState, gesture: &Gesture, records: &[R]) -> DashboardState {
    match gesture {
        Gesture::BrushDragged { axis, range } => reduce_brush(state, *axis, *range, records),
        Gesture::BrushCancelled => reduce_brush_cancel(state),
        Gesture::PointClicked(id) => reduce_click(state, id),
        Gesture::LegendClicked(condition) => reduce_legend(state, *condition, records),
        Gesture::Remount => DashboardState::default(),
    }
}

fn reduce_brush<R: SelectableRecord>(
    mut state: DashboardState,
    axis: MeasurementAxis,
    range: Option<AxisRange>,
    records: &[R],
) -> DashboardState {
    // Hidden conditions cannot be brushed
    let visible: Vec<&R> = state.visibility.filter(records).collect();
    state.selection.range_ids = set_range_selection(range, &visible, axis);
    state.selection.brush = range.map(|r| (axis, r));
    state
}

fn reduce_brush_cancel(mut state: DashboardState) -> DashboardState {
    state.selection.brush = None;
    state.selection.range_ids.clear();
    state
}

fn reduce_click(mut state: DashboardState, id: &str) -> DashboardState {
    state.selection.focus = toggle_focus(id, state.selection.focus());
    state
}

fn reduce_legend<R: SelectableRecord>(mut state: DashboardState, condition: Condition, records: &[R]) -> DashboardState {
    state.visibility = toggle_visibility(condition, &state.visibility);
    // An active brush follows the newly visible records
    if let Some((axis, range)) = state.selection.brush {
        let visible: Vec<&R> = state.visibility.filter(records).collect();
        state.selection.range_ids = set_range_selection(Some(range), &visible, axis);
    }
    state
}
