use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::context::{NavigationContext, Parameter};
use crate::dispatch::Dispatch;
use crate::error::NavigationError;
use crate::handler::NavigationHandler;
use crate::path::{NavigationPath, RegionName};
use crate::registry::{RegionRegistry, RegistryEvent};
use crate::result::NavigationResult;
use crate::spawn;
use crate::target::{Payload, RegionTarget};

/// Default per-segment wait timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coordinator tunables.
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
	/// Per-segment wait budget used when a request does not override it.
	pub default_timeout: Duration,
}

impl Default for NavigatorConfig {
	fn default() -> Self {
		Self {
			default_timeout: DEFAULT_TIMEOUT,
		}
	}
}

/// Completion callback delivering the terminal [`NavigationResult`].
pub type CompletionCallback = Box<dyn FnOnce(NavigationResult) + Send + 'static>;

/// Per-request knobs for [`Navigator::request_navigate`].
#[derive(Default)]
pub struct NavigateOptions {
	/// Opaque value handed to every segment's handler.
	pub parameter: Option<Parameter>,
	/// Invoked exactly once with the terminal result. Without one the
	/// request is fire-and-forget but still runs to completion.
	pub on_complete: Option<CompletionCallback>,
	/// Per-segment wait budget override.
	pub timeout: Option<Duration>,
}

impl NavigateOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn parameter(mut self, parameter: Parameter) -> Self {
		self.parameter = Some(parameter);
		self
	}

	pub fn on_complete(mut self, callback: impl FnOnce(NavigationResult) + Send + 'static) -> Self {
		self.on_complete = Some(Box::new(callback));
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}
}

impl std::fmt::Debug for NavigateOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigateOptions")
			.field("has_parameter", &self.parameter.is_some())
			.field("has_on_complete", &self.on_complete.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Sequential, non-blocking path resolver.
///
/// Walks the segments of a path in order, waiting (bounded by the timeout)
/// for each region to be registered and for its payload to appear, then
/// invokes the payload's handler on the target's dispatch context. Requests
/// never block the calling thread and never attempt segment `i + 1` before
/// segment `i`'s handler has returned Ok.
#[derive(Clone)]
pub struct Navigator {
	registry: RegionRegistry,
	config: NavigatorConfig,
}

impl Navigator {
	/// Creates a navigator over `registry` with default tunables.
	pub fn new(registry: RegionRegistry) -> Self {
		Self::with_config(registry, NavigatorConfig::default())
	}

	/// Creates a navigator with explicit tunables.
	pub fn with_config(registry: RegionRegistry, config: NavigatorConfig) -> Self {
		Self { registry, config }
	}

	/// The registry this navigator resolves against.
	pub fn registry(&self) -> &RegionRegistry {
		&self.registry
	}

	/// Starts resolving `path` and returns immediately.
	///
	/// Path validation is the only synchronous failure: a malformed path
	/// reports through the callback on the calling thread before any timer
	/// or registry work. Everything after that is delivered from the drive
	/// task, exactly once.
	pub fn request_navigate(&self, path: &str, options: NavigateOptions) {
		let NavigateOptions {
			parameter,
			on_complete,
			timeout,
		} = options;
		let timeout = timeout.unwrap_or(self.config.default_timeout);

		let parsed = match NavigationPath::parse(path) {
			Ok(parsed) => parsed,
			Err(err) => {
				tracing::debug!(path, error = %err, "nav.invalid_path");
				deliver(on_complete, NavigationResult::failed(NavigationError::InvalidPath(err)));
				return;
			}
		};

		tracing::debug!(path = parsed.as_str(), ?timeout, "nav.request");
		let registry = self.registry.clone();
		spawn::spawn(async move {
			let result = drive(&registry, &Arc::new(parsed), parameter, timeout).await;
			deliver(on_complete, result);
		});
	}
}

/// Hands the terminal result to the callback, containing any panic it
/// raises so coordinator state and the delivering thread stay intact.
fn deliver(on_complete: Option<CompletionCallback>, result: NavigationResult) {
	tracing::debug!(success = result.is_success(), "nav.complete");
	let Some(callback) = on_complete else {
		return;
	};
	if panic::catch_unwind(AssertUnwindSafe(|| callback(result))).is_err() {
		tracing::error!("nav.complete.callback_panicked");
	}
}

async fn drive(
	registry: &RegionRegistry,
	path: &Arc<NavigationPath>,
	parameter: Option<Parameter>,
	timeout: Duration,
) -> NavigationResult {
	for index in 0..path.segments().len() {
		let region = &path.segments()[index];
		tracing::trace!(path = path.as_str(), region = %region, index, "nav.segment");

		let target = match wait_for_target(registry, region, timeout).await {
			Ok(target) => target,
			Err(err) => return NavigationResult::failed(err),
		};
		let payload = match wait_for_payload(target.as_ref(), region, timeout).await {
			Ok(payload) => payload,
			Err(err) => return NavigationResult::failed(err),
		};
		let Some(handler) = payload.as_navigation_handler() else {
			return NavigationResult::failed(NavigationError::UnsupportedPayload {
				region: region.clone(),
			});
		};

		let ctx = NavigationContext::new(Arc::clone(path), index, parameter.clone());
		if let Err(err) = invoke(&target.dispatcher(), handler, ctx, region).await {
			return NavigationResult::failed(err);
		}
	}
	NavigationResult::succeeded()
}

/// Resolves the target for `region`, waiting for registration if needed.
///
/// Subscribe-then-recheck: the entry may land between the initial miss and
/// the subscription, and the event for it would be lost. The timeout and
/// the event stream race inside one future per iteration, so exactly one
/// side acts.
async fn wait_for_target(
	registry: &RegionRegistry,
	region: &RegionName,
	timeout: Duration,
) -> Result<Arc<dyn RegionTarget>, NavigationError> {
	if let Some(target) = registry.try_get_name(region) {
		return Ok(target);
	}
	let mut events = registry.subscribe();
	if let Some(target) = registry.try_get_name(region) {
		return Ok(target);
	}

	let deadline = Instant::now() + timeout;
	loop {
		let remaining = deadline.saturating_duration_since(Instant::now());
		match tokio::time::timeout(remaining, events.recv()).await {
			Ok(Ok(RegistryEvent::Registered { region: name, target })) if name == *region => {
				return Ok(target);
			}
			Ok(Ok(_)) => {}
			Ok(Err(RecvError::Lagged(skipped))) => {
				tracing::trace!(region = %region, skipped, "nav.wait_target.lagged");
				if let Some(target) = registry.try_get_name(region) {
					return Ok(target);
				}
			}
			Ok(Err(RecvError::Closed)) | Err(_) => {
				return Err(NavigationError::TargetNotFound {
					region: region.clone(),
					timeout,
				});
			}
		}
	}
}

/// Resolves the payload for `target`, waiting for it to appear if needed.
/// Same subscribe-then-recheck discipline as [`wait_for_target`].
async fn wait_for_payload(
	target: &dyn RegionTarget,
	region: &RegionName,
	timeout: Duration,
) -> Result<Payload, NavigationError> {
	if let Some(payload) = target.payload() {
		return Ok(payload);
	}
	let mut changes = target.payload_events();
	if let Some(payload) = target.payload() {
		return Ok(payload);
	}

	let deadline = Instant::now() + timeout;
	loop {
		let remaining = deadline.saturating_duration_since(Instant::now());
		match tokio::time::timeout(remaining, changes.changed()).await {
			Ok(Ok(())) => {
				if let Some(payload) = target.payload() {
					return Ok(payload);
				}
			}
			Ok(Err(_)) => {
				// Change source gone; the payload can no longer appear.
				return match target.payload() {
					Some(payload) => Ok(payload),
					None => Err(NavigationError::PayloadNotReady {
						region: region.clone(),
						timeout,
					}),
				};
			}
			Err(_) => {
				return Err(NavigationError::PayloadNotReady {
					region: region.clone(),
					timeout,
				});
			}
		}
	}
}

/// Runs the handler on the target's dispatch context: synchronously when
/// already there, otherwise marshaled with a oneshot reply.
async fn invoke(
	dispatch: &Arc<dyn Dispatch>,
	handler: Arc<dyn NavigationHandler>,
	ctx: NavigationContext,
	region: &RegionName,
) -> Result<(), NavigationError> {
	if dispatch.is_current() {
		return handler.on_navigation(&ctx).map_err(|source| NavigationError::Handler {
			region: region.clone(),
			source,
		});
	}

	let (tx, rx) = oneshot::channel();
	dispatch.run(Box::new(move || {
		let _ = tx.send(handler.on_navigation(&ctx));
	}));
	match rx.await {
		Ok(Ok(())) => Ok(()),
		Ok(Err(source)) => Err(NavigationError::Handler {
			region: region.clone(),
			source,
		}),
		Err(_) => Err(NavigationError::DispatchGone {
			region: region.clone(),
		}),
	}
}
