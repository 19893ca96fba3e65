//! Core state for the places viewer
//!
//! This crate owns the domain model and the shared state machine that
//! coordinates the map and table views: the filter/sort engine, the
//! selection and viewport state, and the settings repository.

pub mod coordinator;
pub mod engine;
pub mod place;
pub mod settings;
pub mod viewport;

// Re-export commonly used types
pub use coordinator::Coordinator;
pub use engine::{derive, SortDirection, SortSpec};
pub use place::{Place, PlaceColumn};
pub use settings::{JsonFileSettings, MemorySettings, SettingsRepository};
pub use viewport::Viewport;
