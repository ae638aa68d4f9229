//! Region registry and asynchronous navigation coordination.
//!
//! Resolves a slash-delimited path such as `"Shell/Level1/Level2"` into a
//! sequence of named regions and drives a per-segment handler on each one
//! in order, tolerating regions that do not exist yet and payloads that
//! arrive late. "Go to this place" semantics for deep, lazily-built UI
//! trees, without blocking and without the caller knowing whether the
//! destination currently exists.
//!
//! # Pieces
//!
//! - [`RegionRegistry`] - thread-safe name → target table with change
//!   events, idempotent re-registration, and detach-driven cleanup
//! - [`Navigator`] - sequential, timeout-bounded coordinator walking the
//!   path segments
//! - [`RegionTarget`] / [`RegionPayload`] / [`Dispatch`] - the capability
//!   surface a UI adapter implements per region
//! - [`NavigationHandler`] - the per-segment contract payloads implement
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfarer::{NavigateOptions, Navigator, RegionRegistry};
//!
//! let registry = RegionRegistry::new();
//! let navigator = Navigator::new(registry.clone());
//! // Adapter layers register targets as their views attach:
//! // registry.register("Shell", target)?;
//! navigator.request_navigate(
//! 	"Shell/Settings/Network",
//! 	NavigateOptions::new().on_complete(|result| {
//! 		if let Some(err) = result.error() {
//! 			eprintln!("navigation failed: {err}");
//! 		}
//! 	}),
//! );
//! ```

pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
mod lifecycle;
pub mod navigator;
pub mod path;
pub mod registry;
pub mod result;
mod spawn;
pub mod target;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{NavigationContext, Parameter};
pub use dispatch::{Dispatch, DispatchQueue, DispatchRunner, InlineDispatch, Job};
pub use error::{NavigationError, RegistryError};
pub use handler::{HandlerError, NavigationHandler};
pub use navigator::{DEFAULT_TIMEOUT, NavigateOptions, Navigator, NavigatorConfig};
pub use path::{NavigationPath, PathError, RegionName};
pub use registry::{RegionGuard, RegionRegistry, RegistryEvent};
pub use result::NavigationResult;
pub use target::{Payload, RegionPayload, RegionTarget};
