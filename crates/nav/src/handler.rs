use crate::context::NavigationContext;

/// Fault raised by a navigation handler.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
	message: String,
	#[source]
	source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HandlerError {
	/// Creates a fault from a message alone.
	pub fn msg(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			source: None,
		}
	}

	/// Creates a fault wrapping an underlying error.
	pub fn with_source(
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self {
			message: message.into(),
			source: Some(Box::new(source)),
		}
	}

	/// Returns the fault message.
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Per-segment navigation contract implemented by region payloads.
///
/// Invoked on the owning target's dispatch context, once per segment, in
/// path order. Returning an error aborts the walk at this segment.
pub trait NavigationHandler: Send + Sync + 'static {
	fn on_navigation(&self, ctx: &NavigationContext) -> Result<(), HandlerError>;
}
