use std::{
    collections::{BTreeMap, VecDeque},
    sync::Mutex,
};

use egui::{Color32, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder, TableRow};
use eyre::Result;
use tracing::{
    Level,
    field::{Field, Visit},
};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt};

use crate::{SystemState, message::Message};

/// Oldest entries are dropped once the window holds this many.
const MAX_RECORDS: usize = 5000;

static RECORD_MUTEX: Mutex<VecDeque<LogMessage>> = Mutex::new(VecDeque::new());

#[macro_export]
macro_rules! try_log_error {
    ($expr:expr, $what:expr $(,)?) => {
        if let Err(e) = $expr {
            tracing::error!("{}: {}", $what, e)
        }
    };
}

#[derive(Clone)]
pub struct LogMessage {
    pub name: String,
    pub msg: String,
    pub level: Level,
}

/// Keeps every event in memory so the log window can show it.
struct EguiLogger {}

struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S> Layer<S> for EguiLogger
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let Ok(mut records) = RECORD_MUTEX.lock() else {
            return;
        };
        push_capped(
            &mut records,
            LogMessage {
                name: event.metadata().module_path().unwrap_or("-").to_string(),
                msg: fields.remove("message").unwrap_or_else(|| "-".to_string()),
                level: *event.metadata().level(),
            },
            MAX_RECORDS,
        );
    }
}

fn push_capped(records: &mut VecDeque<LogMessage>, message: LogMessage, cap: usize) {
    while records.len() >= cap {
        records.pop_front();
    }
    records.push_back(message);
}

/// Snapshot of everything logged so far.
pub fn recorded_messages() -> Vec<LogMessage> {
    RECORD_MUTEX
        .lock()
        .map(|records| records.iter().cloned().collect())
        .unwrap_or_default()
}

fn level_label(level: Level) -> (Color32, &'static str) {
    match level {
        Level::ERROR => (Color32::RED, "Error"),
        Level::WARN => (Color32::YELLOW, "Warn"),
        Level::INFO => (Color32::GREEN, "Info"),
        Level::DEBUG => (Color32::LIGHT_BLUE, "Debug"),
        Level::TRACE => (Color32::GRAY, "Trace"),
    }
}

impl SystemState {
    pub fn draw_log_window(&self, ctx: &egui::Context, msgs: &mut Vec<Message>) {
        let mut open = true;
        egui::Window::new("Logs")
            .open(&mut open)
            .collapsible(true)
            .resizable(true)
            .show(ctx, |ui| {
                ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                let records = recorded_messages();

                egui::ScrollArea::new([true, false]).show(ui, |ui| {
                    TableBuilder::new(ui)
                        .column(Column::auto().resizable(true))
                        .column(Column::auto().resizable(true))
                        .column(Column::remainder())
                        .vscroll(true)
                        .stick_to_bottom(true)
                        .header(20.0, |mut header| {
                            header.col(|ui| {
                                ui.heading("Level");
                            });
                            header.col(|ui| {
                                ui.heading("Source");
                            });
                            header.col(|ui| {
                                ui.heading("Message");
                            });
                        })
                        .body(|body| {
                            let heights = records
                                .iter()
                                .map(|record| record.msg.lines().count().max(1) as f32 * 15.);

                            body.heterogeneous_rows(heights, |mut row: TableRow| {
                                let record = &records[row.index()];
                                row.col(|ui| {
                                    let (color, text) = level_label(record.level);
                                    ui.colored_label(color, text);
                                });
                                row.col(|ui| {
                                    ui.label(
                                        RichText::new(&record.name)
                                            .color(Color32::GRAY)
                                            .monospace(),
                                    );
                                });
                                row.col(|ui| {
                                    ui.label(RichText::new(&record.msg).monospace());
                                });
                            });
                        });
                })
            });
        if !open {
            msgs.push(Message::SetLogsVisible(false));
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

/// Installs the global subscriber: stdout plus the in-app log window.
/// `RUST_LOG` overrides the default `info` level.
#[cfg(not(target_arch = "wasm32"))]
pub fn start_logging() -> Result<()> {
    use std::io::stdout;

    use tracing_subscriber::fmt;

    let filter = env_filter();
    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .without_time()
                .with_writer(stdout)
                .with_filter(filter.clone()),
        )
        .with(EguiLogger {}.with_filter(filter));

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// The browser has no stdout, so only the in-app log window is fed.
#[cfg(target_arch = "wasm32")]
pub fn start_logging() -> Result<()> {
    let subscriber = Registry::default().with(EguiLogger {}.with_filter(env_filter()));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_the_log_window() {
        let subscriber = Registry::default().with(EguiLogger {});
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("column 'mod7' is unknown");
        });
        let records = recorded_messages();
        let record = records
            .iter()
            .rev()
            .find(|r| r.msg == "column 'mod7' is unknown")
            .expect("recorded");
        assert_eq!(record.level, Level::WARN);
        assert!(record.name.contains("logs"));
    }

    #[test]
    fn oldest_events_are_dropped_when_full() {
        let mut records = VecDeque::new();
        for i in 0..5 {
            push_capped(
                &mut records,
                LogMessage {
                    name: "sifter".to_string(),
                    msg: format!("load {i} finished"),
                    level: Level::INFO,
                },
                3,
            );
        }
        let kept: Vec<_> = records.iter().map(|r| r.msg.as_str()).collect();
        assert_eq!(kept, ["load 2 finished", "load 3 finished", "load 4 finished"]);
    }

    #[test]
    fn levels_have_distinct_labels() {
        let labels = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ]
        .map(|level| level_label(level).1);
        assert_eq!(labels, ["Error", "Warn", "Info", "Debug", "Trace"]);
    }
}
