use std::sync::Arc;

use tokio::sync::watch;

use crate::dispatch::Dispatch;
use crate::handler::NavigationHandler;

/// Payload handle associated with a registered target.
pub type Payload = Arc<dyn RegionPayload>;

/// Data object attached to a region target.
///
/// The capability query replaces a dynamic "is this a handler" check:
/// payloads that participate in navigation return themselves.
pub trait RegionPayload: Send + Sync + 'static {
	/// Returns the payload's navigation handler view, if it has one.
	fn as_navigation_handler(self: Arc<Self>) -> Option<Arc<dyn NavigationHandler>> {
		None
	}
}

/// Capability surface a UI adapter supplies per registered region.
///
/// The coordinator only consumes this interface; target lifetime stays with
/// the adapter that created it.
pub trait RegionTarget: Send + Sync + 'static {
	/// Current payload, if one has been attached yet.
	fn payload(&self) -> Option<Payload>;

	/// Change signal bumped whenever [`Self::payload`] changes.
	///
	/// Waiters must re-check `payload()` after subscribing; the signal
	/// carries no data of its own.
	fn payload_events(&self) -> watch::Receiver<()>;

	/// Execution context navigation handlers must run on.
	fn dispatcher(&self) -> Arc<dyn Dispatch>;

	/// True while the target is still part of the adapter's tree.
	///
	/// Authoritative answer; the [`Self::attachment`] signal may lag or
	/// fire transiently during structural reshuffling.
	fn is_attached(&self) -> bool;

	/// Attachment signal: `false` means the target left the tree.
	fn attachment(&self) -> watch::Receiver<bool>;

	/// True when `other` is the same underlying resource as `self`.
	///
	/// Adapters typically compare the identity of their inner state, not
	/// handle allocations.
	fn same_target(&self, other: &Arc<dyn RegionTarget>) -> bool;
}
