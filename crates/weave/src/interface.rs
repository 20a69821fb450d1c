// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt::{self, Display};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::ident::Token;

/// A type tag shared by a family of related [`Interface`] identities.
///
/// A provider registered against a kind satisfies every member of the family
/// whose exact identity has no dedicated provider of its own. Two kinds
/// created independently are never equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Kind(Token);

impl Kind {
    fn next() -> Self {
        Self(Token::next())
    }
}

/// An opaque identity representing an abstract capability.
///
/// Interfaces carry no behavior. They exist only to be distinct: an interface
/// is equal to itself and to its clones, and to nothing else, ever. Equality
/// and hashing ignore the display name, which exists purely for diagnostics.
///
/// A one-off interface made with [`Interface::new`] owns a fresh [`Kind`]
/// that no other interface shares. Interfaces that belong to a family are
/// made through [`InterfaceGroup`] instead, so that one provider can cover
/// the whole family.
///
/// # Examples
///
/// ```
/// use weave::Interface;
///
/// let storage = Interface::new("storage");
/// let cache = Interface::new("cache");
///
/// assert_ne!(storage, cache);
/// assert_ne!(storage.kind(), cache.kind());
/// assert_eq!(storage, storage.clone());
/// ```
#[derive(Clone, Debug)]
pub struct Interface {
    id: Token,
    kind: Kind,
    name: Cow<'static, str>,
}

impl Interface {
    /// Creates a one-off interface, distinct in both identity and kind from
    /// every interface created before it.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: Token::next(),
            kind: Kind::next(),
            name: name.into(),
        }
    }

    fn with_kind(name: Cow<'static, str>, kind: Kind) -> Self {
        Self {
            id: Token::next(),
            kind,
            name,
        }
    }

    /// The kind this interface belongs to.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// The display name given at creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Interface {}

impl core::hash::Hash for Interface {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A fixed family of interfaces sharing one [`Kind`].
///
/// The common case for grouped interfaces is a set of capabilities that are
/// all variants of the same thing, such as one interface per backend service
/// a generated proxy can reach. Registering a single provider against the
/// group's kind satisfies every member at once, while any member can still be
/// overridden with a dedicated exact provider.
///
/// Member lookup is idempotent: looking up the same name twice returns the
/// same identity both times.
///
/// # Examples
///
/// ```
/// use weave::InterfaceGroup;
///
/// let backends = InterfaceGroup::new(["billing", "shipping", "identity"]);
///
/// assert_eq!(backends.len(), 3);
/// assert_eq!(backends.member("billing"), backends.member("billing"));
/// assert_ne!(backends.member("billing"), backends.member("shipping"));
/// assert_eq!(
///     backends.member("billing").kind(),
///     backends.member("shipping").kind(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct InterfaceGroup {
    kind: Kind,
    members: HashMap<Cow<'static, str>, Interface>,
}

impl InterfaceGroup {
    /// Creates a group with one member interface per given name, all sharing
    /// a freshly minted kind.
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        let kind = Kind::next();
        let members = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let interface = Interface::with_kind(name.clone(), kind);
                (name, interface)
            })
            .collect();
        Self { kind, members }
    }

    /// The kind shared by every member of this group.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// The member interface with the given name.
    ///
    /// # Panics
    ///
    /// Panics if the group has no member with that name. Use
    /// [`InterfaceGroup::get`] for a fallible lookup.
    #[must_use]
    pub fn member(&self, name: &str) -> &Interface {
        self.get(name)
            .expect("interface group has no member with the given name")
    }

    /// The member interface with the given name, or `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.members.get(name)
    }

    /// Iterates over the member interfaces, in no particular order.
    pub fn members(&self) -> impl Iterator<Item = &Interface> {
        self.members.values()
    }

    /// The number of members in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
