use std::time::Duration;

use crate::handler::HandlerError;
use crate::path::{PathError, RegionName};

/// Terminal navigation failures, carried by [`NavigationResult`].
///
/// Once a request starts waiting asynchronously, every failure is reported
/// through the completion callback as one of these; nothing escapes as a
/// panic.
///
/// [`NavigationResult`]: crate::result::NavigationResult
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
	/// The path string failed validation before any asynchronous work.
	#[error("invalid navigation path: {0}")]
	InvalidPath(#[from] PathError),

	/// No target was registered under the segment name within the timeout.
	#[error("region {region} was not registered within {timeout:?}")]
	TargetNotFound { region: RegionName, timeout: Duration },

	/// The target existed but never acquired a payload within the timeout.
	#[error("region {region} had no payload within {timeout:?}")]
	PayloadNotReady { region: RegionName, timeout: Duration },

	/// The payload exists but does not implement the navigation handler.
	#[error("payload for region {region} does not handle navigation")]
	UnsupportedPayload { region: RegionName },

	/// The handler ran and returned a fault.
	#[error("navigation handler for region {region} failed")]
	Handler {
		region: RegionName,
		#[source]
		source: HandlerError,
	},

	/// The target's dispatch context dropped the handler job before it ran.
	#[error("dispatch context for region {region} went away before the handler ran")]
	DispatchGone { region: RegionName },
}

impl NavigationError {
	/// Segment the failure is attributed to; `None` for path validation.
	pub fn region(&self) -> Option<&RegionName> {
		match self {
			Self::InvalidPath(_) => None,
			Self::TargetNotFound { region, .. }
			| Self::PayloadNotReady { region, .. }
			| Self::UnsupportedPayload { region }
			| Self::Handler { region, .. }
			| Self::DispatchGone { region } => Some(region),
		}
	}
}

/// Registry operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The name is not a valid region name.
	#[error("invalid region name: {0}")]
	InvalidName(#[source] PathError),
}
