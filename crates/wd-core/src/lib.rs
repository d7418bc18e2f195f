//! Core functionality for the wing-disc morphometrics dashboard
//!
//! This crate provides the linked-selection protocol shared by all views,
//! the event bus, and the slots that background table loads fill in.

pub mod condition;
pub mod events;
pub mod selection;
pub mod state;
pub mod sync;

// Re-export commonly used types
pub use condition::Condition;
pub use data::TableSource;
pub use events::EventBus;
pub use selection::{
    AxisRange, DashboardState, Emphasis, EmphasisLevel, EmphasisStyle, Gesture, MeasurementAxis,
    RecordId, SelectableRecord, Selection, VisibilityToggles,
};
pub use state::{DatasetSlot, LoadState};
pub use sync::{IdentifierSpace, SelectionCoordinator};

pub mod data {
    /// A tabular source loaded once when the views mount
    #[async_trait::async_trait]
    pub trait TableSource: Send + Sync {
        /// In-memory form of the loaded table
        type Output: Send + Sync + 'static;

        /// Read and parse the whole table
        async fn load(&self) -> anyhow::Result<Self::Output>;

        /// Get the source name/path
        fn source_name(&self) -> &str;

        /// Number of records in a loaded table, for logging
        fn row_count(output: &Self::Output) -> usize;
    }
}
