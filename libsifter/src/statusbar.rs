use egui::{Button, Color32, Context, Frame, Layout, Margin, TopBottomPanel, Ui};
use emath::Align;
use web_time::Duration;

use crate::{SystemState, message::Message};

/// Loads finishing faster than this never show the loading label.
const PROGRESS_DEBOUNCE: Duration = Duration::from_millis(100);

impl SystemState {
    pub fn add_statusbar_panel(&self, ctx: &Context, msgs: &mut Vec<Message>) {
        TopBottomPanel::bottom("statusbar")
            .frame(Frame {
                inner_margin: Margin {
                    left: 5,
                    right: 5,
                    top: 0,
                    bottom: 5,
                },
                ..Default::default()
            })
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::RIGHT), |ui| {
                    self.draw_statusbar_left(ui);
                    self.draw_statusbar_right(ui, msgs);
                });
            });
    }

    /// Source of the data and its size
    fn draw_statusbar_left(&self, ui: &mut Ui) {
        let dataset = self.dashboard.dataset();
        ui.label(dataset.source().to_string());
        ui.separator();
        ui.label(format!(
            "{} rows, {} columns",
            dataset.len(),
            dataset.columns().len()
        ));
        if let Some(report) = self.last_report
            && report.coerced_fields > 0
        {
            ui.separator();
            ui.label(format!("{} fields read as 0", report.coerced_fields))
                .on_hover_text("Missing or non-numeric fields are treated as 0");
        }

        if let Some(pending) = &self.pending_load
            && pending.started.elapsed() > PROGRESS_DEBOUNCE
        {
            ui.separator();
            ui.spinner();
            ui.label(format!("Loading {}", pending.source));
        }
    }

    /// The last load error, if any, with a button to dismiss it
    fn draw_statusbar_right(&self, ui: &mut Ui, msgs: &mut Vec<Message>) {
        let Some(error) = &self.last_error else {
            return;
        };
        ui.with_layout(Layout::right_to_left(Align::RIGHT), |ui| {
            ui.add(Button::new("✕").frame(false))
                .on_hover_text("Dismiss")
                .clicked()
                .then(|| msgs.push(Message::DismissError));
            ui.colored_label(Color32::RED, error);
        });
    }
}
