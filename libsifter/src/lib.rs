#![deny(unused_crate_dependencies)]

pub mod async_util;
pub mod config;
pub mod dataset;
pub mod file_dialog;
pub mod filter;
pub mod filter_panel;
pub mod ingest;
pub mod logs;
pub mod message;
pub mod pagination;
pub mod state;
pub mod statusbar;
pub mod table_view;
#[cfg(test)]
pub mod tests;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};

use camino::Utf8PathBuf;
use eframe::{App, CreationContext};
use eyre::Result;
use tracing::{error, info, trace, warn};
use web_time::Instant;

use crate::async_util::perform_work;
use crate::config::SifterConfig;
use crate::dataset::{DataSource, Dataset};
use crate::ingest::{IngestError, IngestReport, Ingested};
use crate::message::Message;
use crate::state::{DashboardAction, DashboardState};

/// What to do right after the window opens.
#[derive(Debug, Default)]
pub struct StartupParams {
    pub data_file: Option<Utf8PathBuf>,
}

impl StartupParams {
    pub fn empty() -> Self {
        Self::default()
    }
}

pub fn run_egui(cc: &CreationContext, mut state: SystemState) -> Result<Box<dyn App>> {
    state.context = Some(cc.egui_ctx.clone());
    Ok(Box::new(state))
}

pub struct Channels {
    pub msg_sender: Sender<Message>,
    pub msg_receiver: Receiver<Message>,
}

impl Channels {
    fn new() -> Self {
        let (msg_sender, msg_receiver) = mpsc::channel();
        Self {
            msg_sender,
            msg_receiver,
        }
    }
}

/// A load that has been started but whose result has not arrived yet.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub source: String,
    pub started: Instant,
}

pub struct SystemState {
    pub config: SifterConfig,
    pub dashboard: DashboardState,
    pub channels: Channels,
    pub show_logs: bool,
    /// Message of the most recent failed load, shown until dismissed.
    pub last_error: Option<String>,
    /// Diagnostics of the most recent successful load. `None` for the built-in sample.
    pub last_report: Option<IngestReport>,
    pub pending_load: Option<PendingLoad>,
    pub context: Option<egui::Context>,
}

impl SystemState {
    pub fn new() -> Result<Self> {
        Self::new_inner(false)
    }

    /// Ignores user config files and environment overrides.
    pub fn new_default_config() -> Result<Self> {
        Self::new_inner(true)
    }

    fn new_inner(force_default_config: bool) -> Result<Self> {
        Ok(Self::from_config(SifterConfig::new(force_default_config)?))
    }

    #[must_use]
    pub fn from_config(config: SifterConfig) -> Self {
        let dashboard = DashboardState::new(Dataset::sample(), config.paging());
        Self {
            config,
            dashboard,
            channels: Channels::new(),
            show_logs: false,
            last_error: None,
            last_report: None,
            pending_load: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_params(self, params: StartupParams) -> Self {
        if let Some(path) = params.data_file {
            try_log_error!(
                self.channels.msg_sender.send(Message::LoadFile(path)),
                "Failed to queue startup file"
            );
        }
        self
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Dashboard(action) => {
                self.dashboard = mem::replace(&mut self.dashboard, DashboardState::placeholder())
                    .reduce(action);
            }
            Message::OpenFileDialog => self.open_file_dialog(),
            Message::LoadSample => {
                info!("Loading the built-in sample");
                self.pending_load = None;
                self.last_error = None;
                self.last_report = None;
                self.update(DashboardAction::ReplaceDataset(Dataset::sample()).into());
            }
            Message::LoadFile(path) => self.load_from_file(path),
            Message::LoadFromData { name, data } => self.load_from_data(name, &data),
            Message::FileDropped(file) => self.load_from_dropped(file),
            Message::DatasetLoaded(result) => self.dataset_loaded(result),
            Message::SetLogsVisible(visible) => self.show_logs = visible,
            Message::DismissError => self.last_error = None,
        }
    }

    fn start_load(&mut self, source: String) {
        self.pending_load = Some(PendingLoad {
            source,
            started: Instant::now(),
        });
    }

    fn load_from_file(&mut self, path: Utf8PathBuf) {
        info!("Loading table from {path}");
        self.start_load(path.to_string());
        let options = self.config.ingest_options();
        let sender = self.channels.msg_sender.clone();
        let ctx = self.context.clone();
        perform_work(move || {
            let result = ingest::read_file(&path, options);
            try_log_error!(
                sender.send(Message::DatasetLoaded(result)),
                "Failed to send loaded table"
            );
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    fn load_from_data(&mut self, name: String, data: &[u8]) {
        info!("Parsing {} bytes from {name}", data.len());
        self.start_load(name.clone());
        let result =
            ingest::parse_delimited(data, self.config.ingest_options(), DataSource::Upload(name));
        self.dataset_loaded(result);
    }

    fn load_from_dropped(&mut self, file: egui::DroppedFile) {
        info!("Got a dropped file");
        let path = file.path.and_then(|p| Utf8PathBuf::try_from(p).ok());

        if let Some(bytes) = file.bytes {
            let name = path.map_or(file.name, |p| p.to_string());
            self.load_from_data(name, &bytes);
        } else if let Some(path) = path {
            self.load_from_file(path);
        } else {
            self.dataset_loaded(Err(IngestError::EmptyDrop));
        }
    }

    fn dataset_loaded(&mut self, result: Result<Ingested, IngestError>) {
        let elapsed = self
            .pending_load
            .take()
            .map(|pending| format!(" in {:.2?}", pending.started.elapsed()))
            .unwrap_or_default();
        match result {
            Ok(Ingested { dataset, report }) => {
                info!(
                    "Loaded {} rows and {} columns from {}{elapsed}",
                    report.rows,
                    report.columns,
                    dataset.source()
                );
                if report.coerced_fields > 0 {
                    warn!(
                        "{} missing or non-numeric fields were read as 0",
                        report.coerced_fields
                    );
                }
                self.last_error = None;
                self.last_report = Some(report);
                self.update(DashboardAction::ReplaceDataset(dataset).into());
            }
            Err(e) => {
                error!("Failed to load table: {e}");
                self.last_error = Some(e.to_string());
                if self.config.behavior.show_logs_on_error {
                    self.show_logs = true;
                }
            }
        }
    }

    pub(crate) fn handle_async_messages(&mut self) {
        let mut msgs = vec![];
        loop {
            match self.channels.msg_receiver.try_recv() {
                Ok(msg) => msgs.push(msg),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    trace!("Message sender disconnected");
                    break;
                }
            }
        }

        for msg in msgs {
            self.update(msg);
        }
    }

    #[must_use]
    pub fn show_statusbar(&self) -> bool {
        self.config.layout.show_statusbar
    }
}
