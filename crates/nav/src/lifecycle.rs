use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use crate::path::RegionName;
use crate::spawn;
use crate::target::RegionTarget;

/// Per-name attachment watches that drive automatic unregistration.
///
/// A target's attachment signal may flip transiently while the adapter
/// reshuffles its tree, so a watch never acts on the signal alone: it
/// re-confirms `is_attached()` before invoking the unload callback. This
/// keeps the registry itself free of liveness policy.
#[derive(Default)]
pub(crate) struct LifecycleManager {
	watches: Mutex<FxHashMap<RegionName, CancellationToken>>,
}

impl LifecycleManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Watches `target`'s attachment signal and calls `on_detach` exactly
	/// once when the target is confirmed gone. Replaces (and cancels) any
	/// existing watch for the same name.
	pub fn manage(
		&self,
		region: RegionName,
		target: Arc<dyn RegionTarget>,
		on_detach: Box<dyn FnOnce() + Send + 'static>,
	) {
		let token = CancellationToken::new();
		if let Some(old) = self.watches.lock().insert(region.clone(), token.clone()) {
			old.cancel();
		}

		let mut on_detach = Some(on_detach);
		spawn::spawn(async move {
			let mut attachment = target.attachment();
			loop {
				tokio::select! {
					_ = token.cancelled() => return,
					changed = attachment.wait_for(|attached| !*attached) => {
						match changed {
							// Transient detach during a structural swap.
							Ok(_) if target.is_attached() => continue,
							Ok(_) => {}
							// Signal source gone; trust the authoritative check.
							Err(_) if target.is_attached() => return,
							Err(_) => {}
						}
						tracing::debug!(region = %region, "lifecycle.detach");
						if let Some(unload) = on_detach.take() {
							unload();
						}
						return;
					}
				}
			}
		});
	}

	/// Cancels and removes the watch for `region`. No-op when absent.
	pub fn stop_managing(&self, region: &RegionName) {
		if let Some(token) = self.watches.lock().remove(region) {
			token.cancel();
		}
	}
}

impl Drop for LifecycleManager {
	fn drop(&mut self) {
		for (_, token) in self.watches.lock().drain() {
			token.cancel();
		}
	}
}
