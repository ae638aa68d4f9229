use std::fmt;
use std::hash::{Hash, Hasher};

/// Path parsing and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	/// Input contained no usable segments.
	#[error("navigation path has no segments")]
	Empty,
	/// A segment contained characters outside `[A-Za-z0-9_-]`.
	#[error("invalid path segment {0:?}")]
	InvalidSegment(String),
}

/// Validated region name: `[A-Za-z0-9_-]+`.
///
/// Preserves the original spelling for display while comparing and hashing
/// ASCII-case-insensitively, so `"Shell"` and `"shell"` key the same region.
#[derive(Debug, Clone)]
pub struct RegionName {
	raw: Box<str>,
	key: Box<str>,
}

impl RegionName {
	/// Validates `raw` as a region name.
	pub fn parse(raw: &str) -> Result<Self, PathError> {
		if raw.is_empty() || !raw.chars().all(is_name_char) {
			return Err(PathError::InvalidSegment(raw.to_string()));
		}
		Ok(Self {
			raw: Box::from(raw),
			key: raw.to_ascii_lowercase().into_boxed_str(),
		})
	}

	/// Returns the name as originally spelled.
	pub fn as_str(&self) -> &str {
		&self.raw
	}
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl PartialEq for RegionName {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for RegionName {}

impl PartialEq<&str> for RegionName {
	fn eq(&self, other: &&str) -> bool {
		self.raw.eq_ignore_ascii_case(other)
	}
}

impl Hash for RegionName {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl fmt::Display for RegionName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

/// Validated slash-delimited navigation path with at least one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPath {
	raw: Box<str>,
	segments: Vec<RegionName>,
}

impl NavigationPath {
	/// Splits `raw` on `/`, discarding empty pieces, and validates every
	/// segment. Leading, trailing, and doubled slashes are tolerated.
	pub fn parse(raw: &str) -> Result<Self, PathError> {
		let segments = raw
			.split('/')
			.filter(|piece| !piece.is_empty())
			.map(RegionName::parse)
			.collect::<Result<Vec<_>, _>>()?;
		if segments.is_empty() {
			return Err(PathError::Empty);
		}
		Ok(Self {
			raw: Box::from(raw),
			segments,
		})
	}

	/// Returns the path as originally written.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Returns the validated segments in order.
	pub fn segments(&self) -> &[RegionName] {
		&self.segments
	}
}

impl fmt::Display for NavigationPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}
