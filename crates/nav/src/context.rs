use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::path::{NavigationPath, RegionName};

/// Opaque caller-supplied navigation parameter.
pub type Parameter = Arc<dyn Any + Send + Sync>;

/// Immutable per-segment view handed to a [`NavigationHandler`].
///
/// One context is built per segment per request and dropped after the
/// handler returns.
///
/// [`NavigationHandler`]: crate::handler::NavigationHandler
#[derive(Clone)]
pub struct NavigationContext {
	path: Arc<NavigationPath>,
	index: usize,
	parameter: Option<Parameter>,
}

impl NavigationContext {
	pub(crate) fn new(path: Arc<NavigationPath>, index: usize, parameter: Option<Parameter>) -> Self {
		debug_assert!(index < path.segments().len());
		Self { path, index, parameter }
	}

	/// Full path string as originally requested.
	pub fn path(&self) -> &str {
		self.path.as_str()
	}

	/// All segments of the path, in order.
	pub fn segments(&self) -> &[RegionName] {
		self.path.segments()
	}

	/// Zero-based position of the current segment.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Name of the segment being navigated.
	pub fn region(&self) -> &RegionName {
		&self.path.segments()[self.index]
	}

	/// True when this is the final segment of the path.
	pub fn is_last(&self) -> bool {
		self.index + 1 == self.path.segments().len()
	}

	/// Caller-supplied parameter, if any.
	pub fn parameter(&self) -> Option<&Parameter> {
		self.parameter.as_ref()
	}

	/// Downcasts the parameter to a concrete type.
	pub fn param<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.parameter.as_ref()?.downcast_ref()
	}
}

impl fmt::Debug for NavigationContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationContext")
			.field("path", &self.path.as_str())
			.field("index", &self.index)
			.field("region", &self.region().as_str())
			.field("is_last", &self.is_last())
			.field("has_parameter", &self.parameter.is_some())
			.finish()
	}
}
