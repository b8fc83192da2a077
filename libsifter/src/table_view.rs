use egui::{Button, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use emath::Align;

use crate::SystemState;
use crate::message::Message;
use crate::pagination::PageView;
use crate::state::DashboardAction;

const ROW_HEIGHT: f32 = 18.;
const HEADER_HEIGHT: f32 = 20.;

impl SystemState {
    /// Navigation controls above the rows of the current window.
    pub fn draw_table(&self, ui: &mut Ui, msgs: &mut Vec<Message>) {
        let rows = self.dashboard.filtered_rows();
        let paging = self.dashboard.paging();
        let state = self.dashboard.page();
        let view = paging.view(state, rows.len());

        ui.horizontal(|ui| {
            let nav = |ui: &mut Ui, enabled: bool, text: &str, hover: &str| {
                ui.add_enabled(enabled, Button::new(text))
                    .on_hover_text(hover)
                    .clicked()
            };
            nav(
                ui,
                paging.can_go_previous_page(state),
                "Previous",
                "Previous page",
            )
            .then(|| msgs.push(DashboardAction::PreviousPage.into()));
            nav(
                ui,
                paging.can_go_next_page(state, rows.len()),
                "Next",
                "Next page",
            )
            .then(|| msgs.push(DashboardAction::NextPage.into()));
            ui.separator();
            nav(ui, paging.can_scroll_up(state), "▲", "Scroll up one row")
                .then(|| msgs.push(DashboardAction::ScrollUp.into()));
            nav(
                ui,
                paging.can_scroll_down(state, rows.len()),
                "▼",
                "Scroll down one row",
            )
            .then(|| msgs.push(DashboardAction::ScrollDown.into()));
            ui.separator();
            ui.label(page_label(&view));
            ui.separator();
            ui.label(rows_label(&view));
        });
        ui.separator();

        if view.total_rows == 0 {
            ui.label(RichText::new("No rows match the active filters").italics());
            return;
        }

        let visible = &rows[view.window_rows.clone()];
        let columns = self.dashboard.dataset().columns();
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::right_to_left(Align::Center))
            .column(Column::auto())
            .columns(Column::auto().at_least(60.).resizable(true), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for column in columns {
                    header.col(|ui| {
                        ui.strong(column.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let index = row.index();
                    row.col(|ui| {
                        ui.label(
                            RichText::new((view.window_rows.start + index + 1).to_string()).weak(),
                        );
                    });
                    for value in visible[index].values() {
                        row.col(|ui| {
                            ui.label(RichText::new(value.to_string()).monospace());
                        });
                    }
                });
            });
    }
}

fn page_label(view: &PageView) -> String {
    format!("Page {} of {}", view.page, view.total_pages.max(1))
}

fn rows_label(view: &PageView) -> String {
    if view.window_rows.is_empty() {
        format!("Rows 0 of {}", view.total_rows)
    } else {
        format!(
            "Rows {}–{} of {}",
            view.window_rows.start + 1,
            view.window_rows.end,
            view.total_rows
        )
    }
}
