//! Accumulating validation results

use thiserror::Error;

/// A non-empty, ordered list of human-readable validation messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("\n"))]
pub struct ParseErrors(pub(crate) Vec<String>);

/// Either a parsed value or every problem found while parsing it
pub type Validated<T> = std::result::Result<T, ParseErrors>;

impl ParseErrors {
    /// A single error
    pub fn one(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    /// Wrap a list of messages, returning `None` when it is empty
    pub fn from_vec(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self(messages))
        }
    }

    /// Append another set of errors after these ones
    pub fn extend(&mut self, other: ParseErrors) {
        self.0.extend(other.0);
    }

    /// The messages, in the order they were found
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for ParseErrors {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Turn collected messages into a result carrying `value` when there are none
pub fn check<T>(messages: Vec<String>, value: T) -> Validated<T> {
    match ParseErrors::from_vec(messages) {
        Some(errors) => Err(errors),
        None => Ok(value),
    }
}

/// Merge messages found so far with the outcome of a child parse.
///
/// Errors from `result` follow `messages`, and the value only survives when
/// neither side reported anything.
pub fn merge<T>(messages: Vec<String>, result: Validated<T>) -> Validated<T> {
    match (ParseErrors::from_vec(messages), result) {
        (None, result) => result,
        (Some(errors), Ok(_)) => Err(errors),
        (Some(mut errors), Err(child)) => {
            errors.extend(child);
            Err(errors)
        }
    }
}

/// Combine several results, keeping every error from every failed one
pub fn combine<T>(results: impl IntoIterator<Item = Validated<T>>) -> Validated<Vec<T>> {
    let mut values = Vec::new();
    let mut errors: Option<ParseErrors> = None;

    for result in results {
        match (result, errors.as_mut()) {
            (Ok(value), None) => values.push(value),
            (Ok(_), Some(_)) => {}
            (Err(e), None) => errors = Some(e),
            (Err(e), Some(acc)) => acc.extend(e),
        }
    }

    match errors {
        Some(errors) => Err(errors),
        None => Ok(values),
    }
}
