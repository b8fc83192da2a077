mod dashboard_flows;
#[cfg(not(target_arch = "wasm32"))]
mod loading;

use crate::SystemState;
use crate::dataset::ColumnKey;
use crate::message::Message;
use crate::state::DashboardAction;

pub(crate) fn key(name: &str) -> ColumnKey {
    ColumnKey::new(name).unwrap()
}

pub(crate) fn toggle(column: &str, value: i64) -> Message {
    DashboardAction::ToggleFilterValue {
        column: key(column),
        value,
    }
    .into()
}

pub(crate) fn upload(name: &str, text: &str) -> Message {
    Message::LoadFromData {
        name: name.to_string(),
        data: text.as_bytes().to_vec(),
    }
}

pub(crate) fn fresh_state() -> SystemState {
    SystemState::new_default_config().expect("default config loads")
}

/// First column of every row that passes the filters.
pub(crate) fn visible_numbers(state: &SystemState) -> Vec<i64> {
    state
        .dashboard
        .filtered_rows()
        .iter()
        .map(|r| r.value(0))
        .collect()
}
