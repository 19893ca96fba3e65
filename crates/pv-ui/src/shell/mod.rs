use egui::{Context, TopBottomPanel, Ui};

/// Render the heading panel with the application title on the left and a
/// status line on the right.
pub fn heading_panel(ctx: &Context, status: &str) {
    TopBottomPanel::top("heading_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Places Map & Table");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(status);
            });
        });
    });
}

/// Full-panel screen shown while the dataset loads.
pub fn loading_screen(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.spinner();
        ui.add_space(20.0);
        ui.label("Loading data...");
    });
}

/// Full-panel screen shown when loading failed.
pub fn error_screen(ui: &mut Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);

        egui::Frame::none()
            .fill(crate::theme::error_color().linear_multiply(0.2))
            .stroke(egui::Stroke::new(1.0, crate::theme::error_color()))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("⚠").color(crate::theme::error_color()));
                    ui.label(format!("Error: {}", message));
                });
            });
    });
}
