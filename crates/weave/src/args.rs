// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::{self, Any};
use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A dynamically typed, shareable implementation value.
///
/// Providers produce values and bound callables consume them; neither side
/// knows the other's concrete types at compile time, so values travel as
/// cheaply clonable type-erased handles and are downcast at the point of use.
///
/// # Examples
///
/// ```
/// use weave::Value;
///
/// let value = Value::new("hello".to_string());
/// assert_eq!(value.downcast_ref::<String>(), Some(&"hello".to_string()));
/// assert_eq!(value.downcast_ref::<u32>(), None);
/// ```
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrows the contained value as `T`, or `None` if it holds a different
    /// type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").finish_non_exhaustive()
    }
}

/// Named arguments for a [`Callable`][crate::Callable].
///
/// Binding captures resolved arguments into an `Args`, and calling a bound
/// artifact merges the caller's arguments over the captured ones, so a
/// caller-supplied value takes precedence over a captured one of the same
/// name.
///
/// # Examples
///
/// ```
/// use weave::{Args, Value};
///
/// let args = Args::new().with("audience", Value::new("world".to_string()));
/// assert_eq!(args.get::<String>("audience")?, "world");
/// assert!(args.get::<String>("greeting").unwrap_err().is_missing_argument());
/// # Ok::<(), weave::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Args {
    values: HashMap<&'static str, Value>,
}

impl Args {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, replacing any previous value of the same name.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: Value) -> Self {
        self.values.insert(name, value);
        self
    }

    /// Inserts an argument, returning the previous value of the same name if
    /// there was one.
    pub fn insert(&mut self, name: &'static str, value: Value) -> Option<Value> {
        self.values.insert(name, value)
    }

    /// Borrows the argument `name` as `T`.
    ///
    /// Fails with a missing-argument error when the argument is absent, and
    /// with an argument-type error when it holds a different type.
    pub fn get<T: Any>(&self, name: &'static str) -> Result<&T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| Error::missing_argument(name))?;
        value
            .downcast_ref()
            .ok_or_else(|| Error::argument_type(name, any::type_name::<T>()))
    }

    /// The raw argument `name`, or `None` if absent.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns `true` if an argument with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the arguments, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// A copy of `self` with `overrides` layered on top.
    pub(crate) fn merged_with(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.values.insert(name, value.clone());
        }
        merged
    }
}
