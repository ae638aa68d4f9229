//! In-memory adapter stubs for unit tests.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::dispatch::{Dispatch, InlineDispatch};
use crate::target::{Payload, RegionTarget};

struct StubInner {
	payload: Mutex<Option<Payload>>,
	payload_tx: watch::Sender<()>,
	attach_tx: watch::Sender<bool>,
	dispatch: Arc<dyn Dispatch>,
}

impl RegionTarget for StubInner {
	fn payload(&self) -> Option<Payload> {
		self.payload.lock().clone()
	}

	fn payload_events(&self) -> watch::Receiver<()> {
		self.payload_tx.subscribe()
	}

	fn dispatcher(&self) -> Arc<dyn Dispatch> {
		Arc::clone(&self.dispatch)
	}

	fn is_attached(&self) -> bool {
		*self.attach_tx.borrow()
	}

	fn attachment(&self) -> watch::Receiver<bool> {
		self.attach_tx.subscribe()
	}

	fn same_target(&self, other: &Arc<dyn RegionTarget>) -> bool {
		std::ptr::eq(self as *const Self as *const (), Arc::as_ptr(other) as *const ())
	}
}

/// Scriptable region target for tests.
#[derive(Clone)]
pub(crate) struct StubTarget {
	inner: Arc<StubInner>,
}

impl StubTarget {
	pub fn attached() -> Self {
		Self::with_dispatch(Arc::new(InlineDispatch))
	}

	pub fn with_dispatch(dispatch: Arc<dyn Dispatch>) -> Self {
		Self {
			inner: Arc::new(StubInner {
				payload: Mutex::new(None),
				payload_tx: watch::Sender::new(()),
				attach_tx: watch::Sender::new(true),
				dispatch,
			}),
		}
	}

	/// Handle to hand to the registry.
	pub fn clone_handle(&self) -> Arc<dyn RegionTarget> {
		Arc::clone(&self.inner) as Arc<dyn RegionTarget>
	}

	pub fn is_same(&self, other: &Arc<dyn RegionTarget>) -> bool {
		self.inner.same_target(other)
	}

	pub fn set_payload(&self, payload: Payload) {
		*self.inner.payload.lock() = Some(payload);
		self.inner.payload_tx.send_replace(());
	}

	pub fn set_attached(&self, attached: bool) {
		self.inner.attach_tx.send_replace(attached);
	}

	/// Live subscriptions to this target's payload-change signal.
	pub fn payload_watcher_count(&self) -> usize {
		self.inner.payload_tx.receiver_count()
	}
}
