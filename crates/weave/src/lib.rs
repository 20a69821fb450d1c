// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Runtime dependency injection with recursive provider resolution and
//! partial binding.
//!
//! This crate wires callables to the capabilities they need without the
//! callables knowing where those capabilities come from:
//!
//! - [`Interface`]. An opaque identity representing an abstract capability,
//!   optionally grouped with related identities under a shared [`Kind`]
//!   via [`InterfaceGroup`].
//! - [`Application`]. The registry of dependency declarations: which named
//!   parameters of which [`Callable`] are satisfied by which interface.
//! - [`Provider`]. A function that resolves an interface into a concrete
//!   implementation [`Value`], itself eligible for injection.
//! - [`Injector`]. The resolution engine: binds a callable by resolving its
//!   declared dependencies against a provider table, recursing into the
//!   providers' own dependencies, detecting cycles and memoizing artifacts.
//! - [`InjectorBuilder`]. Assembles a provider table from [`ProviderSet`]s
//!   and individual entries; also the vehicle for
//!   [`Injector::specialize`], which layers overrides over a snapshot of an
//!   existing table.
//!
//! Interfaces with no matching provider do not fail the bind. They stay
//! open — supplied by the eventual caller, or filled in by binding the
//! artifact again on a more specialized injector. This *partial binding* is
//! what lets an application resolve everything it can at startup and defer
//! the rest to per-request injectors.
//!
//! # Examples
//!
//! Declare a callable's dependencies, provide one of them, and let the
//! caller supply the other:
//!
//! ```
//! use weave::{Application, Args, Callable, Dependencies, Interface, Provider, Value};
//!
//! # fn main() -> weave::Result<()> {
//! let app = Application::new();
//! let greeting = Interface::new("greeting");
//! let audience = Interface::new("audience");
//!
//! let announce = Callable::new("announce", |args: &Args| {
//!     let greeting: &String = args.get("greeting")?;
//!     let audience: &String = args.get("audience")?;
//!     Ok(Value::new(format!("{greeting}, {audience}!")))
//! });
//! app.declare(
//!     &announce,
//!     Dependencies::new()
//!         .with("greeting", &greeting)
//!         .with("audience", &audience),
//! );
//!
//! let injector = app
//!     .injector()
//!     .provide(
//!         &greeting,
//!         Provider::new("greeting", |_iface: &Interface, _deps: &Args| {
//!             Ok(Value::new("hello".to_string()))
//!         }),
//!     )
//!     .build();
//!
//! // `greeting` is pre-filled; `audience` has no provider and stays open.
//! let bound = injector.bind(&announce)?;
//! let out = bound.call(&Args::new().with("audience", Value::new("world".to_string())))?;
//! assert_eq!(out.downcast_ref::<String>(), Some(&"hello, world!".to_string()));
//!
//! // A specialized injector can close the gap instead of the caller.
//! let per_request = injector
//!     .specialize()
//!     .provide(
//!         &audience,
//!         Provider::constant("audience", Value::new("world".to_string())),
//!     )
//!     .build();
//! let completed = per_request.bind(&bound)?;
//! let out = completed.call(&Args::new())?;
//! assert_eq!(out.downcast_ref::<String>(), Some(&"hello, world!".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! A single provider registered for a [`Kind`] covers a whole family of
//! interfaces, with exact entries still winning for their own members:
//!
//! ```
//! use weave::{Application, Args, Callable, Dependencies, Interface, InterfaceGroup, Provider, Value};
//!
//! # fn main() -> weave::Result<()> {
//! let app = Application::new();
//! let backends = InterfaceGroup::new(["billing", "shipping"]);
//!
//! let injector = app
//!     .injector()
//!     .provide_kind(
//!         backends.kind(),
//!         Provider::new("proxy", |iface: &Interface, _deps: &Args| {
//!             Ok(Value::new(format!("proxy for {iface}")))
//!         }),
//!     )
//!     .build();
//!
//! let report = Callable::new("report", |args: &Args| {
//!     let billing: &String = args.get("billing")?;
//!     Ok(Value::new(billing.clone()))
//! });
//! app.declare(
//!     &report,
//!     Dependencies::new().with("billing", backends.member("billing")),
//! );
//!
//! let out = injector.bind(&report)?.call(&Args::new())?;
//! assert_eq!(out.downcast_ref::<String>(), Some(&"proxy for billing".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `logs`: emits structured [tracing] events while binding and resolving.
//!
//! [tracing]: https://crates.io/crates/tracing
//!
//! # Thread safety
//!
//! All public types are `Send + Sync`. Declarations are serialized against
//! lookups, and one bind call runs atomically per injector; see
//! [`Injector`] for the one re-entrancy caveat this implies for provider
//! functions.

mod application;
mod args;
mod callable;
mod dependencies;
mod error;
mod ident;
mod injector;
mod interface;
mod provider;

pub use application::{Application, Declaration};
pub use args::{Args, Value};
pub use callable::Callable;
pub use dependencies::Dependencies;
pub use error::{Error, Result};
pub use injector::{Injector, InjectorBuilder};
pub use interface::{Interface, InterfaceGroup, Kind};
pub use provider::{Provider, ProviderKey, ProviderRecord, ProviderSet};
