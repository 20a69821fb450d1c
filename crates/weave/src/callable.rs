// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use crate::args::{Args, Value};
use crate::error::Result;
use crate::ident::Token;

type CallFn = Box<dyn Fn(&Args) -> Result<Value> + Send + Sync>;

/// A function taking named arguments, eligible for dependency binding.
///
/// A callable is a cheaply clonable handle; clones share one identity, so
/// binding a clone and binding the original yield the same artifact. Two
/// identities are involved:
///
/// - the *binding identity*, unique to each handle, under which an injector
///   memoizes the bound artifact;
/// - the *lookup identity*, under which the dependency registry stores the
///   declared dependency spec. [`Callable::for_receiver`] derives a handle
///   with a fresh binding identity but the same lookup identity, which is how
///   one declared method yields a distinct bound artifact per receiver while
///   resolving a single shared spec.
///
/// # Examples
///
/// ```
/// use weave::{Args, Callable, Value};
///
/// let double = Callable::new("double", |args: &Args| {
///     let n: &u32 = args.get("n")?;
///     Ok(Value::new(n * 2))
/// });
///
/// let out = double.call(&Args::new().with("n", Value::new(21u32)))?;
/// assert_eq!(out.downcast_ref::<u32>(), Some(&42));
/// # Ok::<(), weave::Error>(())
/// ```
#[derive(Clone)]
pub struct Callable(Arc<CallableInner>);

struct CallableInner {
    id: Token,
    lookup: Token,
    name: Cow<'static, str>,
    call: CallFn,
}

impl Callable {
    /// Creates a callable backed by `call`. The handle's binding and lookup
    /// identities start out identical.
    #[must_use]
    pub fn new<F>(name: impl Into<Cow<'static, str>>, call: F) -> Self
    where
        F: Fn(&Args) -> Result<Value> + Send + Sync + 'static,
    {
        let id = Token::next();
        Self(Arc::new(CallableInner {
            id,
            lookup: id,
            name: name.into(),
            call: Box::new(call),
        }))
    }

    /// Derives a receiver-bound form of this callable.
    ///
    /// The returned handle invokes `call` (typically a closure over some
    /// receiver instance) but shares this callable's lookup identity, so a
    /// dependency spec declared once against the canonical definition applies
    /// to every receiver-bound form. Each form binds independently: an
    /// injector produces one artifact per form, not one per definition.
    #[must_use]
    pub fn for_receiver<F>(&self, call: F) -> Self
    where
        F: Fn(&Args) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(CallableInner {
            id: Token::next(),
            lookup: self.0.lookup,
            name: self.0.name.clone(),
            call: Box::new(call),
        }))
    }

    /// Invokes the callable with the given arguments.
    pub fn call(&self, args: &Args) -> Result<Value> {
        (self.0.call)(args)
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

    pub(crate) fn lookup_id(&self) -> Token {
        self.0.lookup
    }

    /// Wraps this callable with captured arguments, producing a bound
    /// artifact. Caller-supplied arguments take precedence over captured
    /// ones of the same name.
    pub(crate) fn capture(&self, captured: Args) -> Self {
        let original = self.clone();
        Self::new(self.0.name.clone(), move |caller: &Args| {
            original.call(&captured.merged_with(caller))
        })
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Callable {}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.0.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_should_share_identity() {
        let f = Callable::new("f", |_: &Args| Ok(Value::new(())));
        let g = f.clone();
        assert_eq!(f, g);
        assert_eq!(f.id(), g.id());
    }

    #[test]
    fn for_receiver_should_share_lookup_but_not_binding_identity() {
        let def = Callable::new("method", |_: &Args| Ok(Value::new(())));
        let one = def.for_receiver(|_: &Args| Ok(Value::new(1u32)));
        let two = def.for_receiver(|_: &Args| Ok(Value::new(2u32)));

        assert_eq!(one.lookup_id(), def.lookup_id());
        assert_eq!(two.lookup_id(), def.lookup_id());
        assert_ne!(one.id(), two.id());
        assert_ne!(one, two);
    }

    #[test]
    fn capture_should_merge_caller_over_captured() -> crate::Result<()> {
        let concat = Callable::new("concat", |args: &Args| {
            let a: &String = args.get("a")?;
            let b: &String = args.get("b")?;
            Ok(Value::new(format!("{a}{b}")))
        });

        let bound = concat.capture(Args::new().with("a", Value::new("x".to_string())));
        let out = bound.call(&Args::new().with("b", Value::new("y".to_string())))?;
        assert_eq!(out.downcast_ref::<String>(), Some(&"xy".to_string()));

        let out = bound.call(
            &Args::new()
                .with("a", Value::new("z".to_string()))
                .with("b", Value::new("y".to_string())),
        )?;
        assert_eq!(out.downcast_ref::<String>(), Some(&"zy".to_string()));
        Ok(())
    }
}
