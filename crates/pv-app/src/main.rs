//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use parking_lot::RwLock;
use tracing::info;

use pv_core::{Coordinator, JsonFileSettings, SettingsRepository};
use pv_data::{CsvSource, DatasetLoader, LoadState};
use pv_ui::Theme;
use pv_views::{MapView, TableView, ViewerContext, Workspace};

/// Dataset loaded on startup, relative to the working directory.
const DEFAULT_DATA_PATH: &str = "data/places.csv";

/// Per-user preferences such as the table's column set.
const SETTINGS_PATH: &str = "placeview-settings.json";

/// Main application state
struct PlaceViewerApp {
    /// The workspace managing both docked views
    workspace: Workspace,

    /// Shared handles passed to the views
    viewer_context: ViewerContext,

    /// Async dataset loading, last request wins
    loader: DatasetLoader,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Egui context
    egui_ctx: egui::Context,
}

impl PlaceViewerApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        pv_ui::apply_theme(&cc.egui_ctx, &Theme::default());

        // Initialize tokio runtime
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let settings: Arc<dyn SettingsRepository> =
            Arc::new(JsonFileSettings::load(PathBuf::from(SETTINGS_PATH)));

        let viewer_context = ViewerContext {
            coordinator: Arc::new(RwLock::new(Coordinator::new())),
            settings: settings.clone(),
        };

        let workspace = Workspace::split_pair(
            Box::new(MapView::new()),
            Box::new(TableView::new(settings.as_ref())),
        );

        let app = Self {
            workspace,
            viewer_context,
            loader: DatasetLoader::new(),
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
        };

        app.open_csv_file(PathBuf::from(DEFAULT_DATA_PATH));

        app
    }

    /// Load a CSV file in the background and repaint when it lands.
    fn open_csv_file(&self, path: PathBuf) {
        info!("Opening CSV file: {:?}", path);

        let ctx = self.egui_ctx.clone();
        self.loader.request(
            self.runtime.handle(),
            Box::new(CsvSource::new(path)),
            move || ctx.request_repaint(),
        );
    }

    /// Hand freshly loaded places to the coordinator.
    fn ingest_loaded_data(&self) {
        if self.loader.take_ready() {
            if let LoadState::Ready(table) = &*self.loader.state().read() {
                self.viewer_context
                    .coordinator
                    .write()
                    .set_places(table.places.clone());
            }
        }
    }

    /// Handle menu actions
    fn handle_menu(&mut self) {
        let ctx = self.egui_ctx.clone();
        egui::TopBottomPanel::top("menu_bar").show(&ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV Files", &["csv"])
                            .pick_file()
                        {
                            self.open_csv_file(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Exit").clicked() {
                        self.egui_ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    fn status_line(&self) -> String {
        match &*self.loader.state().read() {
            LoadState::Loading => "Loading...".to_string(),
            LoadState::Failed(_) => "Load failed".to_string(),
            LoadState::Ready(table) => {
                let coordinator = self.viewer_context.coordinator.read();
                let shown = coordinator.derived().len();
                let total = coordinator.places().len();

                if table.diagnostics.is_empty() {
                    format!("{} of {} places  |  {}", shown, total, table.source_name)
                } else {
                    format!(
                        "{} of {} places  |  {} rows skipped  |  {}",
                        shown,
                        total,
                        table.diagnostics.len(),
                        table.source_name
                    )
                }
            }
        }
    }
}

/// Screen chosen from the load state before the central panel is drawn,
/// so no loader lock is held while the views render.
enum Screen {
    Loading,
    Failed(String),
    Ready,
}

impl eframe::App for PlaceViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ingest_loaded_data();

        self.handle_menu();

        pv_ui::heading_panel(ctx, &self.status_line());

        let screen = match &*self.loader.state().read() {
            LoadState::Loading => Screen::Loading,
            LoadState::Failed(message) => Screen::Failed(message.clone()),
            LoadState::Ready(_) => Screen::Ready,
        };

        egui::CentralPanel::default().show(ctx, |ui| match &screen {
            Screen::Loading => pv_ui::loading_screen(ui),
            Screen::Failed(message) => pv_ui::error_screen(ui, message),
            Screen::Ready => self.workspace.ui(ui, &self.viewer_context),
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Places Map & Table viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Places Map & Table",
        options,
        Box::new(|cc| Box::new(PlaceViewerApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

// Windows-specific: Hide console window in release builds
#[cfg(all(windows, not(debug_assertions)))]
fn hide_console_window() {
    use winapi::um::wincon::GetConsoleWindow;
    use winapi::um::winuser::{ShowWindow, SW_HIDE};

    unsafe {
        let window = GetConsoleWindow();
        if !window.is_null() {
            ShowWindow(window, SW_HIDE);
        }
    }
}

#[cfg(all(windows, not(debug_assertions)))]
#[no_mangle]
pub extern "system" fn mainCRTStartup() {
    hide_console_window();
    std::process::exit(main().map(|_| 0).unwrap_or(1));
}
