//! Left hand panel: one dropdown per column plus the active filter summary.
use egui::{Button, Layout, RichText, ScrollArea, TextEdit, Ui};
use emath::Align;

use crate::SystemState;
use crate::dataset::ColumnKey;
use crate::filter;
use crate::message::Message;
use crate::state::DashboardAction;

/// Dropdown bodies taller than this scroll.
const MAX_DROPDOWN_HEIGHT: f32 = 180.;

impl SystemState {
    pub fn draw_filter_panel(&self, ui: &mut Ui, msgs: &mut Vec<Message>) {
        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
            ui.heading("Filters");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_enabled(
                    filter::has_active_filters(self.dashboard.filters()),
                    Button::new("Clear all"),
                )
                .on_hover_text("Remove every selected value")
                .clicked()
                .then(|| msgs.push(DashboardAction::ClearAllFilters.into()));
            });
        });

        let summary = self
            .dashboard
            .filter_summary()
            .unwrap_or_else(|| "No active filters".to_string());
        ui.label(RichText::new(summary).italics());
        ui.separator();

        ScrollArea::vertical()
            .id_salt("column filters")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for column in self.dashboard.dataset().columns() {
                    self.draw_column_dropdown(ui, column, msgs);
                }
            });
    }

    fn draw_column_dropdown(&self, ui: &mut Ui, column: &ColumnKey, msgs: &mut Vec<Message>) {
        let open = self.dashboard.is_dropdown_open(column);
        let selected = self
            .dashboard
            .filters()
            .get(column)
            .map_or(0, |values| values.len());

        ui.horizontal(|ui| {
            let arrow = if open { "⏷" } else { "⏵" };
            let label = if selected == 0 {
                format!("{arrow} {column}")
            } else {
                format!("{arrow} {column} ({selected} selected)")
            };
            ui.add(Button::new(label).frame(false))
                .clicked()
                .then(|| msgs.push(DashboardAction::ToggleDropdown(column.clone()).into()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_enabled(selected > 0, Button::new("Clear"))
                    .on_hover_text(format!("Remove the filter on {column}"))
                    .clicked()
                    .then(|| msgs.push(DashboardAction::ClearColumnFilter(column.clone()).into()));
            });
        });

        if !open {
            return;
        }

        ui.indent(("dropdown", column.as_str()), |ui| {
            let mut search = self.dashboard.search_text(column).to_string();
            let response = ui.add(TextEdit::singleline(&mut search).hint_text("Search"));
            if response.changed() {
                msgs.push(
                    DashboardAction::SetSearch {
                        column: column.clone(),
                        text: search,
                    }
                    .into(),
                );
            }

            let offered = self.dashboard.offered_values(column);
            if offered.is_empty() {
                ui.label(RichText::new("No matching values").weak());
                return;
            }
            ScrollArea::vertical()
                .id_salt(("dropdown values", column.as_str()))
                .max_height(MAX_DROPDOWN_HEIGHT)
                .show(ui, |ui| {
                    for value in offered {
                        let mut checked = self.dashboard.is_selected(column, value);
                        if ui.checkbox(&mut checked, value.to_string()).changed() {
                            msgs.push(
                                DashboardAction::ToggleFilterValue {
                                    column: column.clone(),
                                    value,
                                }
                                .into(),
                            );
                        }
                    }
                });
        });
        ui.add_space(3.0);
    }
}
