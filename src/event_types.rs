use crate::Error;
use core::slice;

/// One or more event type names, like `"click"` or `"keydown keyup"`.
///
/// Strings are split on whitespace. Lists are taken as given and checked in [`EventTypes::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTypes(Vec<String>);
impl EventTypes {
	/// # Errors
	///
	/// - [`Error::NoEventTypes`] if there are no names at all.
	/// - [`Error::InvalidEventType`] for empty names or names containing whitespace.
	pub fn validate<E>(&self) -> Result<&Self, Error<E>> {
		if self.0.is_empty() {
			return Err(Error::NoEventTypes);
		}
		if let Some(invalid) = self.0.iter().find(|name| name.is_empty() || name.contains(char::is_whitespace)) {
			return Err(Error::InvalidEventType(invalid.clone()));
		}
		Ok(self)
	}

	pub fn iter(&self) -> slice::Iter<'_, String> {
		self.0.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<'a> IntoIterator for &'a EventTypes {
	type Item = &'a String;
	type IntoIter = slice::Iter<'a, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl From<&str> for EventTypes {
	fn from(types: &str) -> Self {
		Self(types.split_whitespace().map(ToOwned::to_owned).collect())
	}
}

impl From<&String> for EventTypes {
	fn from(types: &String) -> Self {
		types.as_str().into()
	}
}

impl From<String> for EventTypes {
	fn from(types: String) -> Self {
		types.as_str().into()
	}
}

impl From<&[&str]> for EventTypes {
	fn from(types: &[&str]) -> Self {
		Self(types.iter().map(|&name| name.to_owned()).collect())
	}
}

impl<const N: usize> From<[&str; N]> for EventTypes {
	fn from(types: [&str; N]) -> Self {
		Self(types.iter().map(|&name| name.to_owned()).collect())
	}
}

impl From<Vec<String>> for EventTypes {
	fn from(types: Vec<String>) -> Self {
		Self(types)
	}
}
