use egui::{
    Align2, CentralPanel, Color32, Context, FontId, Frame, Id, LayerId, Margin, Order, SidePanel,
    TopBottomPanel, Ui,
};
use tracing::info;

use crate::SystemState;
use crate::message::Message;

impl eframe::App for SystemState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.context.is_none() {
            self.context = Some(ctx.clone());
        }

        let msgs = self.draw(ctx);
        for msg in msgs {
            self.update(msg);
        }
        self.handle_async_messages();

        // Keep polling the channel while a background load is running
        if self.pending_load.is_some() {
            ctx.request_repaint();
        }
    }
}

impl SystemState {
    pub(crate) fn draw(&self, ctx: &Context) -> Vec<Message> {
        let max_width = ctx.available_rect().width();
        let mut msgs = vec![];

        if self.show_logs {
            self.draw_log_window(ctx, &mut msgs);
        }

        self.add_menu_panel(ctx, &mut msgs);

        if self.show_statusbar() {
            self.add_statusbar_panel(ctx, &mut msgs);
        }

        SidePanel::left("filter panel")
            .default_width(260.)
            .width_range(160.0..=max_width)
            .frame(Frame::new().inner_margin(Margin::same(5)))
            .show(ctx, |ui| {
                self.draw_filter_panel(ui, &mut msgs);
            });

        CentralPanel::default()
            .frame(Frame::new().inner_margin(Margin::same(5)))
            .show(ctx, |ui| {
                self.draw_table(ui, &mut msgs);
            });

        draw_drop_preview(ctx);
        ctx.input(|i| {
            i.raw.dropped_files.iter().for_each(|file| {
                info!("Got dropped file");
                msgs.push(Message::FileDropped(file.clone()));
            });
        });

        msgs
    }

    fn add_menu_panel(&self, ctx: &Context, msgs: &mut Vec<Message>) {
        TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                self.draw_menu(ui, msgs);
            });
        });
    }

    fn draw_menu(&self, ui: &mut Ui, msgs: &mut Vec<Message>) {
        ui.menu_button("File", |ui| {
            ui.button("Open…")
                .on_hover_text("Load a delimited table with a header row")
                .clicked()
                .then(|| {
                    ui.close_menu();
                    msgs.push(Message::OpenFileDialog);
                });
            ui.button("Load sample").clicked().then(|| {
                ui.close_menu();
                msgs.push(Message::LoadSample);
            });
        });
        ui.menu_button("View", |ui| {
            let mut show_logs = self.show_logs;
            if ui.checkbox(&mut show_logs, "Logs").clicked() {
                ui.close_menu();
                msgs.push(Message::SetLogsVisible(show_logs));
            }
        });
    }
}

/// Darkens the window and names the hovered files while something is dragged over it.
fn draw_drop_preview(ctx: &Context) {
    let hovered = ctx.input(|i| {
        i.raw
            .hovered_files
            .iter()
            .map(|file| {
                file.path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .or_else(|| (!file.mime.is_empty()).then(|| file.mime.clone()))
                    .unwrap_or_else(|| "table".to_string())
            })
            .collect::<Vec<_>>()
    });
    if hovered.is_empty() {
        return;
    }

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file drop")));
    let screen_rect = ctx.input(|i| i.viewport_rect());
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        format!("Drop to load {}", hovered.join(", ")),
        FontId::proportional(20.),
        Color32::WHITE,
    );
}
