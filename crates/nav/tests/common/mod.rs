//! In-memory adapter used by the integration tests: a scriptable target
//! plus payloads that record handler invocations.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tokio::sync::watch;

use wayfarer::{
	Dispatch, HandlerError, InlineDispatch, NavigationContext, NavigationHandler, Payload,
	RegionPayload, RegionTarget,
};

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

pub struct StubTarget {
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

	pub fn clone_handle(&self) -> Arc<dyn RegionTarget> {
		Arc::clone(&self.inner) as Arc<dyn RegionTarget>
	}

	pub fn set_payload(&self, payload: Payload) {
		*self.inner.payload.lock() = Some(payload);
		self.inner.payload_tx.send_replace(());
	}

	/// Live subscriptions to this target's payload-change signal.
	pub fn payload_watcher_count(&self) -> usize {
		self.inner.payload_tx.receiver_count()
	}
}

/// One recorded handler invocation.
#[derive(Debug, Clone)]
pub struct Call {
	pub region: String,
	pub index: usize,
	pub is_last: bool,
	pub saw_parameter: bool,
	pub thread: ThreadId,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn call_log() -> CallLog {
	Arc::new(Mutex::new(Vec::new()))
}

/// Payload that records every invocation, optionally failing.
pub struct RecordingPayload {
	log: CallLog,
	fail_with: Option<&'static str>,
}

impl RecordingPayload {
	pub fn ok(log: &CallLog) -> Arc<Self> {
		Arc::new(Self {
			log: Arc::clone(log),
			fail_with: None,
		})
	}

	pub fn failing(log: &CallLog, message: &'static str) -> Arc<Self> {
		Arc::new(Self {
			log: Arc::clone(log),
			fail_with: Some(message),
		})
	}
}

impl RegionPayload for RecordingPayload {
	fn as_navigation_handler(self: Arc<Self>) -> Option<Arc<dyn NavigationHandler>> {
		Some(self)
	}
}

impl NavigationHandler for RecordingPayload {
	fn on_navigation(&self, ctx: &NavigationContext) -> Result<(), HandlerError> {
		self.log.lock().push(Call {
			region: ctx.region().as_str().to_string(),
			index: ctx.index(),
			is_last: ctx.is_last(),
			saw_parameter: ctx.parameter().is_some(),
			thread: thread::current().id(),
		});
		match self.fail_with {
			Some(message) => Err(HandlerError::msg(message)),
			None => Ok(()),
		}
	}
}

/// Payload without the navigation handler capability.
pub struct OpaquePayload;

impl RegionPayload for OpaquePayload {}
