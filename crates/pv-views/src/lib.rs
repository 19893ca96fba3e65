//! Views for the places viewer
//!
//! Two views share one [`Coordinator`]: the map renders every place and the
//! table renders the derived row sequence. Both read under a short-lived
//! lock, queue the commands the frame produced, and apply them after the
//! lock is released.

pub mod map;
pub mod tables;
mod view;
mod workspace;

pub use map::MapView;
pub use tables::TableView;
pub use view::{View, ViewId};
pub use workspace::Workspace;

use std::sync::Arc;

use parking_lot::RwLock;

use pv_core::{Coordinator, SettingsRepository};

/// Shared handles passed to every view on every frame.
#[derive(Clone)]
pub struct ViewerContext {
    /// Selection, filter, sort and camera state shared by all views
    pub coordinator: Arc<RwLock<Coordinator>>,

    /// Per-user preferences such as the table's column set
    pub settings: Arc<dyn SettingsRepository>,
}
