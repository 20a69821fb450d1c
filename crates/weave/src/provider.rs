// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use crate::args::{Args, Value};
use crate::dependencies::Dependencies;
use crate::error::Result;
use crate::ident::Token;
use crate::interface::{Interface, Kind};

type ProvideFn = Box<dyn Fn(&Interface, &Args) -> Result<Value> + Send + Sync>;

/// A function that resolves an interface into a concrete implementation.
///
/// A provider receives the interface being resolved (a kind-level provider
/// serves many interfaces and may want to know which one) and its own
/// resolved dependencies. Providers are themselves eligible for injection:
/// declare a spec for one with
/// [`Application::declare_provider`][crate::Application::declare_provider]
/// and the engine resolves those dependencies before the provider runs —
/// including a request for the current injector.
///
/// Like [`Callable`][crate::Callable], a provider is a cheaply clonable
/// handle and clones share one identity.
///
/// # Examples
///
/// ```
/// use weave::{Args, Interface, Provider, Value};
///
/// let provider = Provider::new("greeting", |_iface: &Interface, _deps: &Args| {
///     Ok(Value::new("hello".to_string()))
/// });
/// ```
#[derive(Clone)]
pub struct Provider(Arc<ProviderInner>);

struct ProviderInner {
    id: Token,
    name: Cow<'static, str>,
    provide: ProvideFn,
}

impl Provider {
    /// Creates a provider backed by `provide`.
    #[must_use]
    pub fn new<F>(name: impl Into<Cow<'static, str>>, provide: F) -> Self
    where
        F: Fn(&Interface, &Args) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(ProviderInner {
            id: Token::next(),
            name: name.into(),
            provide: Box::new(provide),
        }))
    }

    /// Creates a provider that resolves to clones of a pre-built value,
    /// whatever the interface. Useful for supplying a handful of local
    /// values without writing provider functions.
    #[must_use]
    pub fn constant(name: impl Into<Cow<'static, str>>, value: Value) -> Self {
        Self::new(name, move |_interface: &Interface, _deps: &Args| {
            Ok(value.clone())
        })
    }

    /// The display name given at creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub(crate) fn name_cow(&self) -> Cow<'static, str> {
        self.0.name.clone()
    }

    pub(crate) fn id(&self) -> Token {
        self.0.id
    }

    pub(crate) fn provide(&self, interface: &Interface, deps: &Args) -> Result<Value> {
        (self.0.provide)(interface, deps)
    }
}

impl PartialEq for Provider {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Provider {}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.0.name)
            .finish_non_exhaustive()
    }
}

/// What a provider table entry is keyed by: an exact interface identity or a
/// whole kind.
///
/// Exact entries take precedence over kind entries when both match an
/// interface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    /// Satisfies one specific interface.
    Interface(Interface),
    /// Satisfies every interface of a kind that has no exact entry.
    Kind(Kind),
}

impl From<&Interface> for ProviderKey {
    fn from(interface: &Interface) -> Self {
        Self::Interface(interface.clone())
    }
}

impl From<Interface> for ProviderKey {
    fn from(interface: Interface) -> Self {
        Self::Interface(interface)
    }
}

impl From<Kind> for ProviderKey {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

/// One provider plus the keys it satisfies and its own dependency spec.
///
/// Provider sets supply these records in bulk; the
/// [`InjectorBuilder`][crate::InjectorBuilder] declares each record's spec in
/// the application's registry and inserts the provider once per key.
///
/// # Examples
///
/// ```
/// use weave::{Args, Interface, Provider, ProviderRecord, Value};
///
/// let greeting = Interface::new("greeting");
/// let record = ProviderRecord::new(Provider::new(
///     "greeting",
///     |_iface: &Interface, _deps: &Args| Ok(Value::new("hello".to_string())),
/// ))
/// .provides(&greeting);
/// ```
#[derive(Clone, Debug)]
pub struct ProviderRecord {
    pub(crate) provider: Provider,
    pub(crate) keys: Vec<ProviderKey>,
    pub(crate) dependencies: Dependencies,
}

impl ProviderRecord {
    /// Creates a record for `provider` with no keys and an empty spec.
    #[must_use]
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            keys: Vec::new(),
            dependencies: Dependencies::new(),
        }
    }

    /// Adds a key this record's provider satisfies.
    #[must_use]
    pub fn provides(mut self, key: impl Into<ProviderKey>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Sets the provider's own dependency spec.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// A source of provider records, typically one per subsystem.
///
/// A set derived from a base set includes the base's records plus its own by
/// explicit concatenation; the injector builder deduplicates records by
/// provider identity, so listing an inherited record twice is harmless.
///
/// # Examples
///
/// ```
/// use weave::{Args, Interface, Provider, ProviderRecord, ProviderSet, Value};
///
/// struct CoreProviders {
///     greeting: Interface,
/// }
///
/// impl ProviderSet for CoreProviders {
///     fn records(&self) -> Vec<ProviderRecord> {
///         vec![
///             ProviderRecord::new(Provider::new(
///                 "greeting",
///                 |_iface: &Interface, _deps: &Args| Ok(Value::new("hello".to_string())),
///             ))
///             .provides(&self.greeting),
///         ]
///     }
/// }
/// ```
pub trait ProviderSet {
    /// The records this set supplies.
    fn records(&self) -> Vec<ProviderRecord>;
}
