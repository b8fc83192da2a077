//! Background work on both native (tokio) and wasm32 (browser event loop).
use futures_core::Future;
use tracing::debug;

use crate::spawn;

// Futures must be Send on native because tokio may move them between threads.
#[cfg(target_arch = "wasm32")]
pub trait SpawnableFuture: Future<Output = ()> + 'static {}
#[cfg(target_arch = "wasm32")]
impl<F> SpawnableFuture for F where F: Future<Output = ()> + 'static {}

#[cfg(not(target_arch = "wasm32"))]
pub trait SpawnableFuture: Future<Output = ()> + Send + 'static {}
#[cfg(not(target_arch = "wasm32"))]
impl<F> SpawnableFuture for F where F: Future<Output = ()> + Send + 'static {}

/// Runs blocking work off the UI thread where threads exist, and on the next tick of the
/// browser event loop where they do not.
pub fn perform_work<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    spawn! {async {
        debug!("Starting background task");
        f();
    }}
}

pub fn perform_async_work<F>(f: F)
where
    F: SpawnableFuture,
{
    spawn!(f);
}

#[macro_export]
macro_rules! spawn {
    ($task:expr) => {
        #[cfg(not(target_arch = "wasm32"))]
        tokio::spawn($task);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local($task);
    };
}
