use std::fmt;
use std::sync::Arc;
use parking_lot::RwLock;

use crate::events::{events::SelectionChanged, EventBus};
use crate::selection::{reduce, DashboardState, Gesture, SelectableRecord, Selection, VisibilityToggles};

/// Family of tables whose records share identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierSpace {
    /// Wing discs: morphometrics and gradient profiles
    Discs,
    /// Adult wing specimens: landmark coordinates
    Specimens,
}

impl fmt::Display for IdentifierSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierSpace::Discs => f.write_str("discs"),
            IdentifierSpace::Specimens => f.write_str("specimens"),
        }
    }
}

/// Owns the selection and visibility state of one identifier space and
/// broadcasts changes to every view rendering that space
pub struct SelectionCoordinator {
    space: IdentifierSpace,

    /// Shared dashboard state, written only through `dispatch`
    state: RwLock<DashboardState>,

    event_bus: Arc<EventBus>,
}

impl SelectionCoordinator {
    /// Create a coordinator in its initial (mounted) state
    pub fn new(space: IdentifierSpace, event_bus: Arc<EventBus>) -> Self {
        Self {
            space,
            state: RwLock::new(DashboardState::default()),
            event_bus,
        }
    }

    pub fn space(&self) -> IdentifierSpace {
        self.space
    }

    /// Snapshot of the full state
    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Snapshot of the current selection
    pub fn selection(&self) -> Selection {
        self.state.read().selection.clone()
    }

    /// Snapshot of the visibility toggles
    pub fn visibility(&self) -> VisibilityToggles {
        self.state.read().visibility.clone()
    }

    /// Currently focused identifier
    pub fn focus(&self) -> Option<String> {
        self.state.read().selection.focus.clone()
    }

    /// Apply a gesture against the records of the dispatching view.
    ///
    /// Returns true when the state changed; only then is a
    /// `SelectionChanged` event published.
    pub fn dispatch<R: SelectableRecord>(&self, gesture: Gesture, records: &[R]) -> bool {
        let changed = {
            let mut state = self.state.write();
            let next = reduce(state.clone(), &gesture, records);
            if next == *state {
                None
            } else {
                *state = next;
                Some((state.selection.len(), state.selection.focus.clone()))
            }
        };

        match changed {
            Some((selected, focus)) => {
                tracing::debug!(
                    space = %self.space,
                    gesture = gesture.name(),
                    selected,
                    focus = ?focus,
                    "Selection updated"
                );
                self.event_bus.publish(SelectionChanged {
                    space: self.space,
                    gesture: gesture.name(),
                    selected,
                    focus,
                });
                true
            }
            None => false,
        }
    }

    /// Reset selection and visibility, as when the views are mounted again
    pub fn remount(&self) -> bool {
        self.dispatch::<NoRecord>(Gesture::Remount, &[])
    }
}

/// Placeholder record type for gestures that do not look at records
enum NoRecord {}

impl SelectableRecord for NoRecord {
    fn record_id(&self) -> &str {
        match *self {}
    }

    fn condition(&self) -> crate::condition::Condition {
        match *self {}
    }

    fn measurement(&self, _axis: crate::selection::MeasurementAxis) -> Option<f64> {
        match *self {}
    }
}
