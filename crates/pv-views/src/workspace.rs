//! Workspace - hosts the dockable views

use std::collections::HashMap;

use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};

use crate::{View, ViewId, ViewerContext};

/// Owns the dock layout and the views docked into it.
pub struct Workspace {
    dock_state: DockState<ViewId>,
    views: HashMap<ViewId, Box<dyn View>>,
}

impl Workspace {
    /// Two views side by side with an even split, `left` first.
    pub fn split_pair(left: Box<dyn View>, right: Box<dyn View>) -> Self {
        let left_id = left.id();
        let right_id = right.id();

        let mut views: HashMap<ViewId, Box<dyn View>> = HashMap::new();
        views.insert(left_id, left);
        views.insert(right_id, right);

        let mut dock_state = DockState::new(vec![left_id]);
        dock_state
            .main_surface_mut()
            .split_right(NodeIndex::root(), 0.5, vec![right_id]);

        Self { dock_state, views }
    }

    /// Draw the dock area and every visible view.
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        // The dock area should fill the available space in the UI
        let available_rect = ui.available_rect_before_wrap();

        ui.allocate_ui(available_rect.size(), |ui| {
            DockArea::new(&mut self.dock_state)
                .show_close_buttons(false)
                .draggable_tabs(true)
                .show_inside(
                    ui,
                    &mut WorkspaceTabViewer {
                        views: &mut self.views,
                        viewer_context,
                    },
                );
        });
    }
}

struct WorkspaceTabViewer<'a> {
    views: &'a mut HashMap<ViewId, Box<dyn View>>,
    viewer_context: &'a ViewerContext,
}

impl<'a> TabViewer for WorkspaceTabViewer<'a> {
    type Tab = ViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        match self.views.get(tab) {
            Some(view) => view.title().into(),
            None => "Unknown".into(),
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.views.get_mut(tab) {
            view.ui(self.viewer_context, ui);
        }
    }
}
