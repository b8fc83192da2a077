use camino::Utf8PathBuf;
use derive_more::Debug;

use crate::ingest::{IngestError, Ingested};
use crate::state::DashboardAction;

/// Everything the UI, background tasks and startup code ask [`crate::SystemState`] to do.
#[derive(Debug)]
pub enum Message {
    /// A pure state transition of the dashboard.
    Dashboard(DashboardAction),
    OpenFileDialog,
    LoadSample,
    /// Read and parse a file on a background task.
    LoadFile(Utf8PathBuf),
    /// Parse bytes the browser (or a drop) already handed us.
    LoadFromData {
        name: String,
        #[debug(skip)]
        data: Vec<u8>,
    },
    FileDropped(egui::DroppedFile),
    /// Result of a `LoadFile` task.
    DatasetLoaded(Result<Ingested, IngestError>),
    SetLogsVisible(bool),
    DismissError,
}

impl From<DashboardAction> for Message {
    fn from(action: DashboardAction) -> Self {
        Message::Dashboard(action)
    }
}
