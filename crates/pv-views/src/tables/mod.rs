//! Table view over the derived row sequence

use std::collections::HashMap;

use egui::Ui;
use egui_extras::{Column, TableBuilder};
use serde_json::{json, Value};
use uuid::Uuid;

use pv_core::{Coordinator, Place, PlaceColumn, SettingsRepository, SortDirection, SortSpec};

use crate::{View, ViewId, ViewerContext};

/// Storage key for the persisted column set. Kept byte-identical to the
/// key earlier releases wrote so existing preferences carry over.
pub const COLUMN_VISIBILITY_KEY: &str = "placesTableColumnVisibility";

/// Commands produced while the table is drawn. They are applied after the
/// coordinator read lock is released, never inside a cell closure.
enum TableAction {
    Select(Place),
    SortBy(PlaceColumn),
    SetFilter(String),
}

/// Virtualized table with filtering, header sorting, a selection highlight
/// and a persisted column set.
pub struct TableView {
    id: ViewId,
    title: String,

    // Column visibility, loaded once from settings and written back on change
    column_visibility: HashMap<PlaceColumn, bool>,

    // Selection observed last frame, used to detect changes made by the map
    last_selected_pid: Option<String>,
    scroll_to_row: Option<usize>,
}

impl TableView {
    pub fn new(settings: &dyn SettingsRepository) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Places".to_string(),
            column_visibility: load_column_visibility(settings),
            last_selected_pid: None,
            scroll_to_row: None,
        }
    }

    fn visible_columns(&self) -> Vec<PlaceColumn> {
        PlaceColumn::TABLE
            .iter()
            .copied()
            .filter(|column| self.column_visibility.get(column).copied().unwrap_or(true))
            .collect()
    }

    fn column_menu(&mut self, ui: &mut Ui, settings: &dyn SettingsRepository) {
        let mut changed = false;

        for column in PlaceColumn::TABLE {
            let is_visible = self.column_visibility.get(&column).copied().unwrap_or(true);

            if ui.checkbox(&mut is_visible.clone(), column.label()).clicked() {
                self.column_visibility.insert(column, !is_visible);
                changed = true;
            }
        }

        ui.separator();

        if ui.button("Show All").clicked() {
            self.column_visibility.clear();
            changed = true;
        }

        if ui.button("Hide All").clicked() {
            for column in PlaceColumn::TABLE {
                self.column_visibility.insert(column, false);
            }
            changed = true;
        }

        if changed {
            store_column_visibility(settings, &self.column_visibility);
        }
    }

    fn render_table(
        &mut self,
        ui: &mut Ui,
        coordinator: &Coordinator,
        visible: &[PlaceColumn],
        sort: SortSpec,
        actions: &mut Vec<TableAction>,
    ) {
        let places = coordinator.places();
        let derived = coordinator.derived();
        let selected_pid = coordinator.selection().map(|place| place.pid.clone());

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let selection_bg_fill = ui.style().visuals.selection.bg_fill;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(true);

        for column in visible {
            let sizing = if *column == PlaceColumn::Pid {
                Column::initial(60.0).at_least(40.0).clip(true)
            } else {
                Column::initial(150.0)
                    .at_least(80.0)
                    .at_most(400.0)
                    .clip(true)
            };
            builder = builder.column(sizing);
        }

        if let Some(row) = self.scroll_to_row.take() {
            builder = builder.scroll_to_row(row, Some(egui::Align::TOP));
        }

        builder
            .header(20.0, |mut header| {
                for &column in visible {
                    header.col(|ui| {
                        let marker = if sort.column == column {
                            match sort.direction {
                                SortDirection::Ascending => " ▲",
                                SortDirection::Descending => " ▼",
                            }
                        } else {
                            ""
                        };

                        let text =
                            egui::RichText::new(format!("{}{}", column.label(), marker)).strong();
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            actions.push(TableAction::SortBy(column));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, derived.len(), |row_index, mut row| {
                    let place = &places[derived[row_index]];
                    let is_selected = selected_pid.as_deref() == Some(place.pid.as_str());

                    for &column in visible {
                        row.col(|ui| {
                            let cell_rect = ui.available_rect_before_wrap();
                            if is_selected {
                                ui.painter().rect_filled(cell_rect, 0.0, selection_bg_fill);
                            }

                            ui.label(place.value_string(column));

                            let id = ui.id().with((row_index, column.key()));
                            if ui.interact(cell_rect, id, egui::Sense::click()).clicked() {
                                actions.push(TableAction::Select(place.clone()));
                            }
                        });
                    }
                });
            });
    }
}

impl View for TableView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let mut actions: Vec<TableAction> = Vec::new();

        {
            let coordinator = ctx.coordinator.read();

            // Selections made in other views scroll the matching row into
            // view. A selection with no derived row leaves the scroll alone.
            let selected_pid = coordinator.selection().map(|place| place.pid.clone());
            if selected_pid != self.last_selected_pid {
                self.last_selected_pid = selected_pid;
                self.scroll_to_row = coordinator.selected_row();
            }

            let mut filter_text = coordinator.filter().to_string();
            let shown = coordinator.derived().len();
            let total = coordinator.places().len();

            ui.horizontal(|ui| {
                ui.label("Filter:");
                if ui.text_edit_singleline(&mut filter_text).changed() {
                    actions.push(TableAction::SetFilter(filter_text.clone()));
                }
                if !filter_text.is_empty() && ui.button("Reset Filter").clicked() {
                    actions.push(TableAction::SetFilter(String::new()));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.menu_button("⚙ Columns", |ui| {
                        self.column_menu(ui, ctx.settings.as_ref());
                    });

                    ui.label(format!("{} of {} places", shown, total));
                });
            });

            ui.add_space(4.0);

            if shown == 0 && !coordinator.filter().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(format!(
                        "No places found matching your filter: \"{}\"",
                        coordinator.filter()
                    ));
                });
            } else {
                let visible = self.visible_columns();
                if visible.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.label("No columns visible");
                    });
                } else {
                    let sort = coordinator.sort();
                    self.render_table(ui, &coordinator, &visible, sort, &mut actions);
                }
            }
        }

        if !actions.is_empty() {
            let mut coordinator = ctx.coordinator.write();
            for action in actions {
                match action {
                    TableAction::Select(place) => coordinator.select(place),
                    TableAction::SortBy(column) => coordinator.sort_by(column),
                    TableAction::SetFilter(filter) => coordinator.set_filter(filter),
                }
            }
        }
    }
}

/// Read the persisted column set: a JSON array of visible column keys.
/// Absent or malformed values mean every column is shown.
fn load_column_visibility(settings: &dyn SettingsRepository) -> HashMap<PlaceColumn, bool> {
    match settings.get(COLUMN_VISIBILITY_KEY) {
        Some(Value::Array(keys)) => {
            let stored: Vec<&str> = keys.iter().filter_map(|key| key.as_str()).collect();
            PlaceColumn::TABLE
                .iter()
                .map(|&column| (column, stored.contains(&column.key())))
                .collect()
        }
        _ => HashMap::new(),
    }
}

fn store_column_visibility(
    settings: &dyn SettingsRepository,
    column_visibility: &HashMap<PlaceColumn, bool>,
) {
    let keys: Vec<&str> = PlaceColumn::TABLE
        .iter()
        .filter(|column| column_visibility.get(column).copied().unwrap_or(true))
        .map(|column| column.key())
        .collect();

    settings.set(COLUMN_VISIBILITY_KEY, json!(keys));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pv_core::MemorySettings;

    #[test]
    fn test_visibility_defaults_to_all_columns() {
        let settings = MemorySettings::default();
        let visibility = load_column_visibility(&settings);

        assert!(visibility.is_empty());
        for column in PlaceColumn::TABLE {
            assert!(visibility.get(&column).copied().unwrap_or(true));
        }
    }

    #[test]
    fn test_visibility_roundtrips_through_settings() {
        let settings = MemorySettings::default();

        let mut visibility = HashMap::new();
        visibility.insert(PlaceColumn::PostalCode, false);
        visibility.insert(PlaceColumn::City, false);
        store_column_visibility(&settings, &visibility);

        let loaded = load_column_visibility(&settings);
        assert_eq!(loaded.get(&PlaceColumn::PostalCode), Some(&false));
        assert_eq!(loaded.get(&PlaceColumn::City), Some(&false));
        assert_eq!(loaded.get(&PlaceColumn::Name), Some(&true));
        assert_eq!(loaded.get(&PlaceColumn::Pid), Some(&true));
    }

    #[test]
    fn test_stored_shape_is_an_array_of_keys() {
        let settings = MemorySettings::default();

        let mut visibility = HashMap::new();
        for column in PlaceColumn::TABLE {
            visibility.insert(column, false);
        }
        visibility.insert(PlaceColumn::Name, true);
        store_column_visibility(&settings, &visibility);

        let stored = settings.get(COLUMN_VISIBILITY_KEY);
        assert_eq!(stored, Some(json!(["name"])));
    }

    #[test]
    fn test_malformed_stored_value_shows_everything() {
        let settings = MemorySettings::default();
        settings.set(COLUMN_VISIBILITY_KEY, json!({"name": true}));

        let visibility = load_column_visibility(&settings);
        assert!(visibility.is_empty());
    }

    #[test]
    fn test_empty_stored_array_hides_everything() {
        let settings = MemorySettings::default();
        settings.set(COLUMN_VISIBILITY_KEY, json!([]));

        let visibility = load_column_visibility(&settings);
        for column in PlaceColumn::TABLE {
            assert_eq!(visibility.get(&column), Some(&false));
        }
    }
}
