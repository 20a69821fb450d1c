// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::callable::Callable;
use crate::dependencies::Dependencies;
use crate::ident::Token;
use crate::injector::InjectorBuilder;
use crate::provider::Provider;

/// The owner of the dependency registry and the factory for injectors.
///
/// Dependency declarations accumulate here, independent of any injector:
/// declaring which interfaces a callable needs and building an injector that
/// can satisfy them are separate steps, usually performed by different parts
/// of a program. An `Application` is a cheaply clonable handle; clones share
/// one registry.
///
/// Registry entries are retained for the life of the `Application`. A
/// program that churns through short-lived callables can release their
/// entries with [`Application::forget`].
///
/// # Examples
///
/// ```
/// use weave::{Application, Args, Callable, Dependencies, Interface, Value};
///
/// let app = Application::new();
/// let greeting = Interface::new("greeting");
///
/// let announce = Callable::new("announce", |args: &Args| {
///     let greeting: &String = args.get("greeting")?;
///     Ok(Value::new(greeting.clone()))
/// });
/// app.declare(&announce, Dependencies::new().with("greeting", &greeting));
///
/// assert_eq!(app.dependencies_of(&announce).len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Application(Arc<AppInner>);

#[derive(Default)]
struct AppInner {
    registry: RwLock<HashMap<Token, Dependencies>>,
}

impl Application {
    /// Creates an application with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `dependencies` for `target`, replacing any previous spec.
    ///
    /// The spec is keyed by the callable's lookup identity, so every
    /// receiver-bound form made with
    /// [`Callable::for_receiver`] shares the declaration.
    pub fn declare(&self, target: &Callable, dependencies: Dependencies) {
        self.declare_id(target.lookup_id(), dependencies);
    }

    /// Declares `dependencies` for a provider, replacing any previous spec.
    /// The engine resolves these before the provider runs.
    pub fn declare_provider(&self, provider: &Provider, dependencies: Dependencies) {
        self.declare_id(provider.id(), dependencies);
    }

    /// Begins a deferred declaration, for registering at the point where the
    /// callable is constructed rather than where the spec is written.
    ///
    /// # Examples
    ///
    /// ```
    /// use weave::{Application, Args, Callable, Dependencies, Interface, Value};
    ///
    /// let app = Application::new();
    /// let greeting = Interface::new("greeting");
    ///
    /// let announce = app
    ///     .declaration(Dependencies::new().with("greeting", &greeting))
    ///     .apply(Callable::new("announce", |args: &Args| {
    ///         let greeting: &String = args.get("greeting")?;
    ///         Ok(Value::new(greeting.clone()))
    ///     }));
    ///
    /// assert_eq!(app.dependencies_of(&announce).len(), 1);
    /// ```
    #[must_use]
    pub fn declaration(&self, dependencies: Dependencies) -> Declaration {
        Declaration {
            app: self.clone(),
            dependencies,
        }
    }

    /// The declared spec for `target`, empty if none was declared.
    #[must_use]
    pub fn dependencies_of(&self, target: &Callable) -> Dependencies {
        self.spec_for(target.lookup_id())
    }

    /// Removes any declared spec for `target`.
    pub fn forget(&self, target: &Callable) {
        self.0.registry.write().remove(&target.lookup_id());
    }

    /// Begins building an injector over this application's registry.
    #[must_use]
    pub fn injector(&self) -> InjectorBuilder {
        InjectorBuilder::new(self.clone())
    }

    pub(crate) fn declare_id(&self, id: Token, dependencies: Dependencies) {
        self.0.registry.write().insert(id, dependencies);
    }

    pub(crate) fn spec_for(&self, id: Token) -> Dependencies {
        self.0.registry.read().get(&id).cloned().unwrap_or_default()
    }
}

impl PartialEq for Application {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Application {}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("declarations", &self.0.registry.read().len())
            .finish()
    }
}

/// A deferred declaration produced by [`Application::declaration`].
///
/// Consumed by [`Declaration::apply`], which registers the spec against
/// exactly one callable and hands the callable back unchanged.
#[derive(Clone, Debug)]
pub struct Declaration {
    app: Application,
    dependencies: Dependencies,
}

impl Declaration {
    /// Registers the held spec for `target` and returns `target` unchanged.
    #[must_use]
    pub fn apply(self, target: Callable) -> Callable {
        self.app.declare(&target, self.dependencies);
        target
    }
}
