#[cfg(not(target_arch = "wasm32"))]
use camino::Utf8PathBuf;
use rfd::{AsyncFileDialog, FileHandle};
use tracing::{error, info};

use crate::SystemState;
use crate::async_util::perform_async_work;
use crate::message::Message;

const TABLE_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

impl SystemState {
    /// Lets the user pick a table. On native the file is read by a `LoadFile` task,
    /// in the browser the picked bytes are handed over directly.
    pub fn open_file_dialog(&mut self) {
        let sender = self.channels.msg_sender.clone();
        let ctx = self.context.clone();

        perform_async_work(async move {
            let Some(file) = create_file_dialog("Open table").pick_file().await else {
                info!("File dialog closed without a selection");
                return;
            };
            let message = picked_file_message(file).await;
            if let Err(e) = sender.send(message) {
                error!("Failed to send message: {e}");
            }
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn picked_file_message(file: FileHandle) -> Message {
    let path = file.path().to_path_buf();
    match Utf8PathBuf::from_path_buf(path) {
        Ok(path) => Message::LoadFile(path),
        // Not UTF-8 representable, read it here instead of by path.
        Err(path) => Message::LoadFromData {
            name: path.to_string_lossy().into_owned(),
            data: file.read().await,
        },
    }
}

#[cfg(target_arch = "wasm32")]
async fn picked_file_message(file: FileHandle) -> Message {
    Message::LoadFromData {
        name: file.file_name(),
        data: file.read().await,
    }
}

/// Only delimited text can be picked.
fn create_file_dialog(title: &'static str) -> AsyncFileDialog {
    AsyncFileDialog::new()
        .set_title(title)
        .add_filter(filter_label(), &TABLE_EXTENSIONS)
}

fn filter_label() -> String {
    format!(
        "Delimited text ({})",
        TABLE_EXTENSIONS.map(|ext| format!("*.{ext}")).join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_offers_only_delimited_text() {
        assert_eq!(TABLE_EXTENSIONS, ["csv", "tsv", "txt"]);
        assert!(TABLE_EXTENSIONS.iter().all(|ext| !ext.contains('*')));
        assert_eq!(filter_label(), "Delimited text (*.csv, *.tsv, *.txt)");
    }
}
