// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use crate::interface::Interface;

/// A dependency spec: parameter names mapped to the interfaces that satisfy
/// them.
///
/// Specs are declared against a callable through an
/// [`Application`][crate::Application] and resolved during binding. Sibling
/// parameters are resolved independently; no ordering is guaranteed between
/// them.
///
/// # Examples
///
/// ```
/// use weave::{Dependencies, Interface};
///
/// let greeting = Interface::new("greeting");
/// let audience = Interface::new("audience");
///
/// let deps = Dependencies::new()
///     .with("greeting", &greeting)
///     .with("audience", &audience);
/// assert_eq!(deps.len(), 2);
/// assert_eq!(deps.get("greeting"), Some(&greeting));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    map: HashMap<&'static str, Interface>,
}

impl Dependencies {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous interface of the same name.
    #[must_use]
    pub fn with(mut self, name: &'static str, interface: &Interface) -> Self {
        self.map.insert(name, interface.clone());
        self
    }

    /// Inserts a parameter, returning the previously mapped interface if
    /// there was one.
    pub fn insert(&mut self, name: &'static str, interface: &Interface) -> Option<Interface> {
        self.map.insert(name, interface.clone())
    }

    /// The interface mapped to `name`, or `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.map.get(name)
    }

    /// Iterates over the parameters, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Interface)> {
        self.map.iter().map(|(name, interface)| (*name, interface))
    }

    /// The number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the spec has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
