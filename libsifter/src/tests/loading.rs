use std::io::Write;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use test_log::test;

use super::{fresh_state, visible_numbers};
use crate::dataset::DataSource;
use crate::{StartupParams, SystemState};

/// Drains the channel until the background load has reported back.
fn wait_for_load(state: &mut SystemState) {
    let start = Instant::now();
    loop {
        state.handle_async_messages();
        let finished = state.last_report.is_some() || state.last_error.is_some();
        if state.pending_load.is_none() && finished {
            break;
        }
        if start.elapsed() > Duration::from_secs(10) {
            panic!("Timeout loading table");
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn with_runtime(body: impl FnOnce()) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let _enter = runtime.enter();

    std::thread::spawn(move || {
        runtime.block_on(async {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
            }
        });
    });

    body();
}

#[test]
fn startup_file_is_loaded_in_the_background() {
    with_runtime(|| {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "number,mod3\n9,0\n10,1\n11,2").unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let mut state = fresh_state().with_params(StartupParams {
            data_file: Some(path.clone()),
        });
        wait_for_load(&mut state);

        assert!(state.last_error.is_none());
        assert_eq!(state.dashboard.dataset().source(), &DataSource::File(path));
        assert_eq!(visible_numbers(&state), [9, 10, 11]);
    });
}

#[test]
fn unreadable_file_keeps_the_sample() {
    with_runtime(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.csv")).unwrap();

        let mut state = fresh_state().with_params(StartupParams {
            data_file: Some(path),
        });
        wait_for_load(&mut state);

        let error = state.last_error.clone().expect("read failure is recorded");
        assert!(error.contains("absent.csv"));
        assert_eq!(state.dashboard.dataset().source(), &DataSource::Sample);
    });
}
