// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The result for fallible operations in this crate that use the [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while declaring, binding or calling.
///
/// The two failure classes the resolution engine itself produces are
/// dependency cycles (detected while binding) and missing arguments
/// (surfacing when a partially bound callable is invoked without its open
/// arguments). Provider functions can fail with their own errors, carried
/// through [`Error::other`].
///
/// # Examples
///
/// ```
/// use weave::{Args, Error};
///
/// let args = Args::new();
/// let error = args.get::<String>("missing").unwrap_err();
/// assert!(error.is_missing_argument());
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("dependency cycle between the following callables: {}", .participants.join(", "))]
    DependencyCycle { participants: Vec<String> },

    #[error("missing argument `{name}`")]
    MissingArgument { name: &'static str },

    #[error("argument `{name}` is not of the expected type `{expected}`")]
    ArgumentType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    pub(crate) fn dependency_cycle(participants: Vec<String>) -> Self {
        Self::from_kind(ErrorKind::DependencyCycle { participants })
    }

    pub(crate) fn missing_argument(name: &'static str) -> Self {
        Self::from_kind(ErrorKind::MissingArgument { name })
    }

    pub(crate) fn argument_type(name: &'static str, expected: &'static str) -> Self {
        Self::from_kind(ErrorKind::ArgumentType { name, expected })
    }

    const fn from_kind(kind: ErrorKind) -> Self {
        Self(kind)
    }

    /// Wraps an arbitrary error, typically one produced inside a provider
    /// function.
    pub fn other(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::from_kind(ErrorKind::Other(Box::new(error)))
    }

    /// Returns `true` if this error reports a dependency cycle.
    #[must_use]
    pub const fn is_dependency_cycle(&self) -> bool {
        matches!(self.0, ErrorKind::DependencyCycle { .. })
    }

    /// Returns `true` if this error reports an argument that was neither
    /// captured during binding nor supplied by the caller.
    #[must_use]
    pub const fn is_missing_argument(&self) -> bool {
        matches!(self.0, ErrorKind::MissingArgument { .. })
    }

    /// The callables implicated in a dependency cycle, in the order the
    /// resolution engine encountered them. `None` for other errors.
    #[must_use]
    pub fn cycle_participants(&self) -> Option<&[String]> {
        match &self.0 {
            ErrorKind::DependencyCycle { participants } => Some(participants),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_cycle_should_name_participants_in_order() {
        let error = Error::dependency_cycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(
            error.to_string(),
            "dependency cycle between the following callables: a, b, a"
        );
        assert_eq!(
            error.cycle_participants(),
            Some(&["a".to_string(), "b".to_string(), "a".to_string()][..])
        );
    }

    #[test]
    fn missing_argument_should_name_the_argument() {
        let error = Error::missing_argument("audience");
        assert!(error.is_missing_argument());
        assert_eq!(error.to_string(), "missing argument `audience`");
    }

    #[test]
    fn predicates_should_not_cross_match() {
        let error = Error::missing_argument("x");
        assert!(!error.is_dependency_cycle());
        assert!(error.cycle_participants().is_none());
    }
}
