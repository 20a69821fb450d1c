// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::application::Application;
use crate::args::{Args, Value};
use crate::callable::Callable;
use crate::dependencies::Dependencies;
use crate::error::{Error, Result};
use crate::ident::Token;
use crate::interface::{Interface, Kind};
use crate::provider::{Provider, ProviderKey, ProviderRecord, ProviderSet};

/// The resolution engine: a snapshot of providers plus a binding memo.
///
/// An injector is built from an [`Application`] through
/// [`Application::injector`], or derived from an existing injector through
/// [`Injector::specialize`]. Its provider table is fixed at construction;
/// layering more providers on top means deriving a new injector, never
/// mutating this one.
///
/// # Binding
///
/// [`Injector::bind`] looks up the callable's declared dependency spec and
/// resolves each parameter against the provider table: the exact interface
/// identity first, then the interface's [`Kind`]. Found providers are
/// recursively bound (a provider's own declared dependencies are resolved the
/// same way) and invoked; parameters with no matching provider are left open
/// rather than failing, producing a partially bound artifact that a later
/// bind against a more specialized injector can complete.
///
/// Binding the same callable handle twice returns the identical artifact,
/// not merely an equal one. Artifacts capture resolved *callables*; resolved
/// values are never cached, so a provider runs again on each independent
/// resolution of its interface.
///
/// # Requesting the current injector
///
/// Every injector's table carries an entry for [`Injector::interface`]
/// resolving to the injector itself, so a provider can declare a dependency
/// on it and receive whichever injector is performing the bind — a
/// specialized injector hands out itself, not its parent.
///
/// # Thread safety
///
/// `Injector` is `Send + Sync`. One bind call runs under the injector's
/// internal lock, making binding atomic per injector; a provider function
/// must therefore not call [`Injector::bind`] on the injector it is resolving
/// under from inside resolution. Store the injector and bind after resolution
/// completes instead.
///
/// # Examples
///
/// ```
/// use weave::{Application, Args, Callable, Dependencies, Interface, Provider, Value};
///
/// # fn main() -> weave::Result<()> {
/// let app = Application::new();
/// let greeting = Interface::new("greeting");
///
/// let announce = Callable::new("announce", |args: &Args| {
///     let greeting: &String = args.get("greeting")?;
///     Ok(Value::new(format!("{greeting}!")))
/// });
/// app.declare(&announce, Dependencies::new().with("greeting", &greeting));
///
/// let injector = app
///     .injector()
///     .provide(
///         &greeting,
///         Provider::new("greeting", |_iface: &Interface, _deps: &Args| {
///             Ok(Value::new("hello".to_string()))
///         }),
///     )
///     .build();
///
/// let bound = injector.bind(&announce)?;
/// let out = bound.call(&Args::new())?;
/// assert_eq!(out.downcast_ref::<String>(), Some(&"hello!".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Injector(Arc<InjectorInner>);

struct InjectorInner {
    app: Application,
    exact: HashMap<Interface, Provider>,
    kinds: HashMap<Kind, Provider>,
    state: Mutex<BindState>,
}

#[derive(Default)]
struct BindState {
    resolving: Vec<(Token, Cow<'static, str>)>,
    artifacts: HashMap<Token, Callable>,
    provider_deps: HashMap<Token, Args>,
}

impl BindState {
    fn begin(&mut self, id: Token, name: Cow<'static, str>) -> Result<()> {
        if let Some(position) = self.resolving.iter().position(|(entry, _)| *entry == id) {
            let mut participants: Vec<String> = self.resolving[position..]
                .iter()
                .map(|(_, entry_name)| entry_name.to_string())
                .collect();
            participants.push(name.to_string());
            return Err(Error::dependency_cycle(participants));
        }
        self.resolving.push((id, name));
        Ok(())
    }

    fn finish(&mut self, id: Token) {
        if let Some(position) = self.resolving.iter().position(|(entry, _)| *entry == id) {
            self.resolving.remove(position);
        }
    }
}

struct Resolution {
    resolved: Args,
    open: Dependencies,
}

impl Injector {
    /// The distinguished interface under which every injector provides
    /// itself. Declare a dependency on it to receive the injector performing
    /// the current bind.
    ///
    /// # Examples
    ///
    /// ```
    /// use weave::{Application, Args, Dependencies, Injector, Interface, Provider, Value};
    ///
    /// # fn main() -> weave::Result<()> {
    /// let app = Application::new();
    /// let config = Interface::new("config");
    ///
    /// let provider = Provider::new("config", |_iface: &Interface, deps: &Args| {
    ///     let injector: &Injector = deps.get("injector")?;
    ///     // The provider can stash the injector for binding more callables
    ///     // later, after this resolution completes.
    ///     Ok(Value::new(injector.clone()))
    /// });
    /// app.declare_provider(
    ///     &provider,
    ///     Dependencies::new().with("injector", Injector::interface()),
    /// );
    /// # let _ = app.injector().provide(&config, provider).build();
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn interface() -> &'static Interface {
        static INTERFACE: OnceLock<Interface> = OnceLock::new();
        INTERFACE.get_or_init(|| Interface::new("injector"))
    }

    /// The application whose registry this injector resolves against.
    #[must_use]
    pub fn app(&self) -> &Application {
        &self.0.app
    }

    /// Binds dependencies to a callable.
    ///
    /// Returns a new callable accepting the same arguments as the original,
    /// except that parameters whose interfaces resolved against the provider
    /// table are pre-filled. Parameters with no matching provider stay open:
    /// supply them when calling the artifact, or bind the artifact again on a
    /// more specialized injector to fill the gap (the open parameters are
    /// re-declared against the artifact itself for exactly that purpose).
    ///
    /// Binding is memoized per callable handle: a second `bind` of the same
    /// handle on this injector returns the identical artifact.
    ///
    /// # Errors
    ///
    /// Fails with a dependency-cycle error when a provider chain depends on
    /// itself; the error names the callables in the cycle. A failed bind
    /// leaves the injector fully usable.
    pub fn bind(&self, callable: &Callable) -> Result<Callable> {
        let mut state = self.0.state.lock();
        self.bind_callable(&mut state, callable)
    }

    /// Begins deriving a new injector layered over this one.
    ///
    /// The builder starts from a copy of this injector's provider table;
    /// added providers overlay the copy, replacing entries for keys they
    /// share. The built injector has a fresh binding memo and provides
    /// *itself* for [`Injector::interface`]. The parent is never affected.
    ///
    /// The usual shape: build an application-wide injector at startup, then
    /// specialize a short-lived injector per unit of work with the providers
    /// only that unit knows, and use a second bind to complete any partially
    /// bound callables.
    #[must_use]
    pub fn specialize(&self) -> InjectorBuilder {
        #[cfg(feature = "logs")]
        tracing::debug!(
            providers = self.0.exact.len() + self.0.kinds.len(),
            "specializing injector"
        );
        InjectorBuilder {
            app: self.0.app.clone(),
            exact: self.0.exact.clone(),
            kinds: self.0.kinds.clone(),
        }
    }

    fn provider_for(&self, interface: &Interface) -> Option<&Provider> {
        self.0
            .exact
            .get(interface)
            .or_else(|| self.0.kinds.get(&interface.kind()))
    }

    fn bind_callable(&self, state: &mut BindState, callable: &Callable) -> Result<Callable> {
        // Memoized by the handle's own identity, not its lookup identity:
        // each receiver-bound form of a method gets its own artifact.
        if let Some(bound) = state.artifacts.get(&callable.id()) {
            #[cfg(feature = "logs")]
            tracing::trace!(callable = callable.name(), "returning memoized artifact");
            return Ok(bound.clone());
        }

        state.begin(callable.lookup_id(), callable.name_cow())?;
        let outcome = self.resolve_dependencies(state, &self.0.app.spec_for(callable.lookup_id()));
        state.finish(callable.lookup_id());
        let resolution = outcome?;

        #[cfg(feature = "logs")]
        tracing::trace!(
            callable = callable.name(),
            resolved = resolution.resolved.len(),
            open = resolution.open.len(),
            "callable bound"
        );

        let bound = callable.capture(resolution.resolved);
        if !resolution.open.is_empty() {
            #[cfg(feature = "logs")]
            tracing::debug!(
                callable = callable.name(),
                open = resolution.open.len(),
                "dependencies left open for a later bind"
            );
            self.0.app.declare_id(bound.lookup_id(), resolution.open);
        }
        state.artifacts.insert(callable.id(), bound.clone());
        Ok(bound)
    }

    fn bind_provider(&self, state: &mut BindState, provider: &Provider) -> Result<Args> {
        if let Some(deps) = state.provider_deps.get(&provider.id()) {
            return Ok(deps.clone());
        }

        state.begin(provider.id(), provider.name_cow())?;
        let outcome = self.resolve_dependencies(state, &self.0.app.spec_for(provider.id()));
        state.finish(provider.id());
        // A provider's open dependencies stay open; the provider surfaces a
        // missing-argument error if it reads one.
        let resolution = outcome?;

        state
            .provider_deps
            .insert(provider.id(), resolution.resolved.clone());
        Ok(resolution.resolved)
    }

    fn resolve_dependencies(&self, state: &mut BindState, spec: &Dependencies) -> Result<Resolution> {
        let mut resolved = Args::new();
        let mut open = Dependencies::new();

        for (name, interface) in spec.iter() {
            let Some(provider) = self.provider_for(interface) else {
                #[cfg(feature = "logs")]
                tracing::trace!(argument = name, interface = %interface, "no provider; deferring");
                open.insert(name, interface);
                continue;
            };

            let provider = provider.clone();
            let deps = self.bind_provider(state, &provider)?;
            let value = provider.provide(interface, &deps)?;
            resolved.insert(name, value);
        }

        Ok(Resolution { resolved, open })
    }
}

impl PartialEq for Injector {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Injector {}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("exact", &self.0.exact.len())
            .field("kinds", &self.0.kinds.len())
            .finish_non_exhaustive()
    }
}

/// Builds an [`Injector`], created by [`Application::injector`] or
/// [`Injector::specialize`].
///
/// Providers arrive from two sources: [`ProviderSet`]s, whose records also
/// carry dependency specs to declare, and individual entries added with
/// [`InjectorBuilder::provide`] / [`InjectorBuilder::provide_kind`]. Later
/// additions replace earlier entries for the same key, which is what makes a
/// specialized injector's overrides win over its parent's table.
#[derive(Debug)]
pub struct InjectorBuilder {
    app: Application,
    exact: HashMap<Interface, Provider>,
    kinds: HashMap<Kind, Provider>,
}

impl InjectorBuilder {
    pub(crate) fn new(app: Application) -> Self {
        Self {
            app,
            exact: HashMap::new(),
            kinds: HashMap::new(),
        }
    }

    /// Seeds the table from a provider set.
    ///
    /// Each record's dependency spec is declared in the application's
    /// registry and its provider inserted once per key it satisfies. Records
    /// are deduplicated by provider identity, so a derived set that re-lists
    /// its base's records contributes each provider once.
    #[must_use]
    pub fn provider_set<S>(mut self, set: &S) -> Self
    where
        S: ProviderSet + ?Sized,
    {
        let mut seen = HashSet::new();
        for record in set.records() {
            let ProviderRecord {
                provider,
                keys,
                dependencies,
            } = record;
            if !seen.insert(provider.id()) {
                continue;
            }
            self.app.declare_id(provider.id(), dependencies);
            for key in keys {
                match key {
                    ProviderKey::Interface(interface) => {
                        self.exact.insert(interface, provider.clone());
                    }
                    ProviderKey::Kind(kind) => {
                        self.kinds.insert(kind, provider.clone());
                    }
                }
            }
        }
        self
    }

    /// Adds a provider for one specific interface, replacing any previous
    /// entry for it.
    #[must_use]
    pub fn provide(mut self, interface: &Interface, provider: Provider) -> Self {
        self.exact.insert(interface.clone(), provider);
        self
    }

    /// Adds a provider for every interface of a kind, replacing any previous
    /// entry for it. Exact entries still win for their own interfaces.
    #[must_use]
    pub fn provide_kind(mut self, kind: Kind, provider: Provider) -> Self {
        self.kinds.insert(kind, provider);
        self
    }

    /// Builds the injector.
    #[must_use]
    pub fn build(self) -> Injector {
        let Self {
            app,
            mut exact,
            kinds,
        } = self;

        let inner = Arc::new_cyclic(|weak: &Weak<InjectorInner>| {
            let weak = Weak::clone(weak);
            let own = Provider::new("injector", move |_interface: &Interface, _deps: &Args| {
                let inner = weak.upgrade().expect("injector dropped while resolving");
                Ok(Value::new(Injector(inner)))
            });
            exact.insert(Injector::interface().clone(), own);

            InjectorInner {
                app,
                exact,
                kinds,
                state: Mutex::new(BindState::default()),
            }
        });

        Injector(inner)
    }
}
