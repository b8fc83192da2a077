#![cfg_attr(not(target_arch = "wasm32"), deny(unused_crate_dependencies))]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(not(target_arch = "wasm32"))]
const GIT_DESCRIBE: &str = match option_env!("VERGEN_GIT_DESCRIBE") {
    Some(describe) => describe,
    None => "unknown",
};

#[cfg(not(target_arch = "wasm32"))]
mod main_impl {
    use camino::Utf8PathBuf;
    use clap::Parser;
    use emath::Vec2;
    use eyre::Result;
    use libsifter::{StartupParams, SystemState, logs, run_egui};
    use tracing::info;

    use crate::GIT_DESCRIBE;

    #[derive(clap::Parser)]
    #[command(version, about)]
    struct Args {
        /// Delimited text file with a header row. Shows the built-in sample when omitted.
        data_file: Option<Utf8PathBuf>,

        /// Ignore user and local config files as well as SIFTER_* environment variables
        #[clap(long, action)]
        default_config: bool,
    }

    fn startup_params_from_args(args: &Args) -> StartupParams {
        StartupParams {
            data_file: args.data_file.clone(),
        }
    }

    pub(crate) fn main() -> Result<()> {
        simple_eyre::install()?;

        logs::start_logging()?;

        std::panic::set_hook(Box::new(panic_handler));

        // The gui runs on the main thread while file loading happens on tokio tasks. The
        // runtime is kept alive on a helper thread for the lifetime of the program.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let args = Args::parse();
        info!(
            "Starting sifter {} (git: {GIT_DESCRIBE})",
            env!("CARGO_PKG_VERSION")
        );

        let _enter = runtime.enter();

        std::thread::spawn(move || {
            runtime.block_on(async {
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
                }
            });
        });

        let state = if args.default_config {
            SystemState::new_default_config()?
        } else {
            SystemState::new()?
        }
        .with_params(startup_params_from_args(&args));

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_app_id("org.sifter.sifter")
                .with_title("Sifter")
                .with_inner_size(Vec2::new(
                    state.config.layout.window_width as f32,
                    state.config.layout.window_height as f32,
                )),
            ..Default::default()
        };

        eframe::run_native("Sifter", options, Box::new(|cc| Ok(run_egui(cc, state)?)))
            .map_err(|e| eyre::eyre!("Failed to run the window: {e}"))?;

        Ok(())
    }

    fn panic_handler(info: &std::panic::PanicHookInfo) {
        let backtrace = std::backtrace::Backtrace::force_capture();

        eprintln!();
        eprintln!("Sifter crashed due to a panic");
        eprintln!("Please include the information below when reporting the issue");
        eprintln!();

        let msg = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.clone()
        } else {
            "<panic message not a string>".to_owned()
        };

        eprintln!(
            "Sifter version: {} (git: {GIT_DESCRIBE})",
            env!("CARGO_PKG_VERSION"),
        );
        match info.location() {
            Some(location) => eprintln!(
                "thread '{}' panicked at {}:{}:{}",
                std::thread::current().name().unwrap_or("unknown"),
                location.file(),
                location.line(),
                location.column(),
            ),
            None => eprintln!(
                "thread '{}' panicked",
                std::thread::current().name().unwrap_or("unknown"),
            ),
        }
        eprintln!("  {msg}");
        eprintln!();
        eprintln!("backtrace:");
        eprintln!("{backtrace}");
    }

}

#[cfg(target_arch = "wasm32")]
mod main_impl {
    use eframe::wasm_bindgen::JsCast;
    use eframe::web_sys;
    use libsifter::wasm_api::WebHandle;

    // The page normally starts sifter through `wasm_api::WebHandle`; this covers pages
    // that only provide a canvas.
    pub(crate) fn main() -> eyre::Result<()> {
        simple_eyre::install()?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| eyre::eyre!("No document"))?;
        let canvas = document
            .get_element_by_id("the_canvas_id")
            .ok_or_else(|| eyre::eyre!("Failed to find the_canvas_id"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| eyre::eyre!("the_canvas_id was not a HtmlCanvasElement"))?;

        wasm_bindgen_futures::spawn_local(async move {
            let wh = WebHandle::new();
            if let Err(e) = wh.start(canvas).await {
                tracing::error!("Failed to start sifter: {e:?}");
            }
        });

        Ok(())
    }
}

fn main() -> eyre::Result<()> {
    main_impl::main()
}
