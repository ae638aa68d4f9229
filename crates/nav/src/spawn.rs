use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

const FALLBACK_WORKERS: usize = 2;
const FALLBACK_THREAD_NAME: &str = "wayfarer-nav";

/// Spawns request and lifecycle work on the ambient runtime, or on a shared
/// fallback runtime when the caller is not inside tokio.
pub(crate) fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => fallback_runtime().spawn(fut),
	}
}

/// Navigation tasks only ever wait on timers and channels, so the fallback
/// runtime enables the time driver and nothing else.
fn fallback_runtime() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		Builder::new_multi_thread()
			.worker_threads(FALLBACK_WORKERS)
			.thread_name(FALLBACK_THREAD_NAME)
			.enable_time()
			.build()
			.expect("failed to build fallback navigation runtime")
	})
}
