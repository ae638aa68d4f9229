use crate::error::NavigationError;
use crate::path::RegionName;

/// Terminal outcome of one navigation request.
///
/// Exactly one result is produced per request and delivered exactly once
/// through the completion callback.
#[derive(Debug)]
pub struct NavigationResult {
	error: Option<NavigationError>,
}

impl NavigationResult {
	pub(crate) fn succeeded() -> Self {
		Self { error: None }
	}

	pub(crate) fn failed(error: NavigationError) -> Self {
		Self { error: Some(error) }
	}

	/// True when every segment's handler ran and returned Ok.
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}

	/// The failure, if any.
	pub fn error(&self) -> Option<&NavigationError> {
		self.error.as_ref()
	}

	/// Segment the failure is attributed to, when one is known.
	pub fn failed_region(&self) -> Option<&RegionName> {
		self.error.as_ref().and_then(NavigationError::region)
	}

	/// Consumes the result, yielding the failure if there was one.
	pub fn into_error(self) -> Option<NavigationError> {
		self.error
	}
}
