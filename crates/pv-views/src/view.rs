use egui::Ui;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a view instance
pub type ViewId = Uuid;

/// A dockable view.
///
/// Views hold only presentation state (scroll targets, menu toggles).
/// Everything that other views must observe lives in the coordinator.
pub trait View: Send + Sync {
    fn id(&self) -> ViewId;

    /// Tab title
    fn title(&self) -> &str;

    /// Draw the view into the given UI region.
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);
}
