use std::fmt::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use test_log::test;

use super::{fresh_state, key, toggle, upload, visible_numbers};
use crate::StartupParams;
use crate::dataset::DataSource;
use crate::message::Message;
use crate::pagination::PageState;
use crate::state::DashboardAction;

#[test]
fn sample_is_shown_at_startup() {
    let state = fresh_state();
    assert_eq!(state.dashboard.dataset().source(), &DataSource::Sample);
    assert_eq!(state.dashboard.dataset().len(), 11);
    assert!(state.last_error.is_none());
    assert!(state.last_report.is_none());
}

#[test]
fn selecting_mod3_zero_on_the_sample() {
    let mut state = fresh_state();
    state.update(toggle("mod3", 0));

    assert_eq!(visible_numbers(&state), [12, 24, 36, 48, 60, 888, 5664]);
    assert_eq!(state.dashboard.page_view().total_pages, 1);
    assert_eq!(
        state.dashboard.offered_values(&key("mod6")),
        [0],
        "only multiples of six remain reachable"
    );
}

#[test]
fn reachable_mod5_values_without_filters() {
    let state = fresh_state();
    assert_eq!(
        state.dashboard.offered_values(&key("mod5")),
        [0, 1, 2, 3, 4]
    );
}

#[test]
fn single_row_upload_replaces_dataset_and_resets_filters() {
    let mut state = fresh_state();
    state.update(toggle("mod3", 0));
    state.update(DashboardAction::ToggleDropdown(key("mod3")).into());

    state.update(upload(
        "one.csv",
        "number,mod3,mod4,mod5,mod6\n7,1,3,2,1\n",
    ));

    let dataset = state.dashboard.dataset();
    assert_eq!(dataset.source(), &DataSource::Upload("one.csv".to_string()));
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records()[0].values(), [7, 1, 3, 2, 1]);
    assert!(state.dashboard.filter_summary().is_none());
    assert!(!state.dashboard.is_dropdown_open(&key("mod3")));
    assert_eq!(state.last_report.map(|r| r.rows), Some(1));
    assert!(state.pending_load.is_none());
}

#[test]
fn malformed_upload_keeps_dataset_and_filters() {
    let mut state = fresh_state();
    state.update(toggle("mod3", 0));
    let before = state.dashboard.clone();

    state.update(upload("bad.csv", "a,b,a\n1,2,3\n"));

    assert_eq!(state.dashboard, before);
    let error = state.last_error.clone().expect("error is recorded");
    assert!(error.contains("'a'"), "unexpected error text: {error}");
    assert!(state.show_logs, "logs open on error by default");

    state.update(Message::DismissError);
    assert!(state.last_error.is_none());
}

#[test]
fn successful_load_clears_previous_error() {
    let mut state = fresh_state();
    state.update(upload("empty.csv", ""));
    assert!(state.last_error.is_some());

    state.update(upload("ok.csv", "x\n1\n"));
    assert!(state.last_error.is_none());
    assert_eq!(state.dashboard.dataset().len(), 1);
}

#[test]
fn coerced_fields_are_reported() {
    let mut state = fresh_state();
    state.update(upload("gaps.csv", "a,b\n1,x\n2\n"));

    assert_eq!(state.last_report.map(|r| r.coerced_fields), Some(2));
    assert_eq!(visible_numbers(&state), [1, 2]);
}

#[test]
fn toggle_resets_pagination_from_second_page() {
    let mut text = "n,parity\n".to_string();
    for n in 0..250 {
        writeln!(text, "{n},{}", n % 2).unwrap();
    }
    let mut state = fresh_state();
    state.update(upload("counting.csv", &text));
    state.update(toggle("parity", 0));
    state.update(toggle("parity", 1));
    state.update(DashboardAction::NextPage.into());
    state.update(DashboardAction::ScrollDown.into());
    assert_eq!(
        state.dashboard.page(),
        PageState {
            page: 2,
            scroll_index: 1
        }
    );

    state.update(toggle("parity", 1));

    assert!(!state.dashboard.is_selected(&key("parity"), 1));
    assert_eq!(state.dashboard.page(), PageState::default());
    assert_eq!(state.dashboard.filtered_rows().len(), 125);
}

#[test]
fn load_sample_restores_initial_dataset() {
    let mut state = fresh_state();
    state.update(upload("one.csv", "x\n1\n"));
    state.update(Message::LoadSample);

    assert_eq!(state.dashboard.dataset().source(), &DataSource::Sample);
    assert!(state.last_report.is_none());
}

#[test]
fn dropped_bytes_are_loaded() {
    let mut state = fresh_state();
    state.update(Message::FileDropped(egui::DroppedFile {
        name: "dropped.csv".to_string(),
        bytes: Some(Arc::from(b"p,q\n3,4\n5,6\n".as_slice())),
        ..Default::default()
    }));

    assert_eq!(
        state.dashboard.dataset().source(),
        &DataSource::Upload("dropped.csv".to_string())
    );
    assert_eq!(visible_numbers(&state), [3, 5]);
}

#[test]
fn drop_without_content_is_an_error() {
    let mut state = fresh_state();
    state.update(Message::FileDropped(egui::DroppedFile::default()));

    assert!(state.last_error.is_some());
    assert_eq!(state.dashboard.dataset().source(), &DataSource::Sample);
}

#[test]
fn startup_file_is_queued() {
    let path = Utf8PathBuf::from("tables/startup.csv");
    let state = fresh_state().with_params(StartupParams {
        data_file: Some(path.clone()),
    });

    match state.channels.msg_receiver.try_recv() {
        Ok(Message::LoadFile(queued)) => assert_eq!(queued, path),
        other => panic!("expected a queued LoadFile, got {other:?}"),
    }
}

#[test]
fn logs_visibility_follows_messages() {
    let mut state = fresh_state();
    state.update(Message::SetLogsVisible(true));
    assert!(state.show_logs);
    state.update(Message::SetLogsVisible(false));
    assert!(!state.show_logs);
}
