// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![expect(missing_docs, reason = "Test code")]

use weave::{
    Application, Args, Callable, Dependencies, Injector, Interface, Provider, ProviderRecord,
    ProviderSet, Value,
};

/// A set whose providers use the owning instance's state.
struct CoreSet {
    greeting: Interface,
    salutation: String,
}

impl ProviderSet for CoreSet {
    fn records(&self) -> Vec<ProviderRecord> {
        let salutation = self.salutation.clone();
        vec![
            ProviderRecord::new(Provider::new("greeting", move |_: &Interface, _: &Args| {
                Ok(Value::new(salutation.clone()))
            }))
            .provides(&self.greeting),
        ]
    }
}

/// A derived set: the base's records plus its own, by explicit concatenation.
struct ExtendedSet {
    base: CoreSet,
    audience: Interface,
}

impl ProviderSet for ExtendedSet {
    fn records(&self) -> Vec<ProviderRecord> {
        let mut records = self.base.records();
        records.push(
            ProviderRecord::new(Provider::new("audience", |_: &Interface, _: &Args| {
                Ok(Value::new("world".to_string()))
            }))
            .provides(&self.audience),
        );
        records
    }
}

struct EmptySet;

impl ProviderSet for EmptySet {
    fn records(&self) -> Vec<ProviderRecord> {
        Vec::new()
    }
}

fn announce() -> Callable {
    Callable::new("announce", |args: &Args| {
        let greeting: &String = args.get("greeting")?;
        let audience: &String = args.get("audience")?;
        Ok(Value::new(format!("{greeting}, {audience}!")))
    })
}

#[test]
fn set_should_seed_providers_using_instance_state() -> weave::Result<()> {
    let app = Application::new();
    let greeting = Interface::new("greeting");

    let set = CoreSet {
        greeting: greeting.clone(),
        salutation: "hello".to_string(),
    };

    let f = Callable::new("greet", |args: &Args| {
        let greeting: &String = args.get("greeting")?;
        Ok(Value::new(greeting.clone()))
    });
    app.declare(&f, Dependencies::new().with("greeting", &greeting));

    let injector = app.injector().provider_set(&set).build();
    let out = injector.bind(&f)?.call(&Args::new())?;
    assert_eq!(out.downcast_ref::<String>(), Some(&"hello".to_string()));
    Ok(())
}

#[test]
fn derived_set_should_include_base_records() -> weave::Result<()> {
    let app = Application::new();
    let greeting = Interface::new("greeting");
    let audience = Interface::new("audience");

    let set = ExtendedSet {
        base: CoreSet {
            greeting: greeting.clone(),
            salutation: "hello".to_string(),
        },
        audience: audience.clone(),
    };

    let f = announce();
    app.declare(
        &f,
        Dependencies::new()
            .with("greeting", &greeting)
            .with("audience", &audience),
    );

    let injector = app.injector().provider_set(&set).build();
    let out = injector.bind(&f)?.call(&Args::new())?;
    assert_eq!(
        out.downcast_ref::<String>(),
        Some(&"hello, world!".to_string())
    );
    Ok(())
}

#[test]
fn record_should_satisfy_several_interfaces_with_one_provider() -> weave::Result<()> {
    struct ProxySet {
        billing: Interface,
        shipping: Interface,
    }

    impl ProviderSet for ProxySet {
        fn records(&self) -> Vec<ProviderRecord> {
            vec![
                ProviderRecord::new(Provider::new("proxy", |iface: &Interface, _: &Args| {
                    Ok(Value::new(format!("proxy for {iface}")))
                }))
                .provides(&self.billing)
                .provides(&self.shipping),
            ]
        }
    }

    let app = Application::new();
    let billing = Interface::new("billing");
    let shipping = Interface::new("shipping");
    let set = ProxySet {
        billing: billing.clone(),
        shipping: shipping.clone(),
    };

    let f = Callable::new("route", |args: &Args| {
        let billing: &String = args.get("billing")?;
        let shipping: &String = args.get("shipping")?;
        Ok(Value::new(format!("{billing} / {shipping}")))
    });
    app.declare(
        &f,
        Dependencies::new()
            .with("billing", &billing)
            .with("shipping", &shipping),
    );

    let injector = app.injector().provider_set(&set).build();
    let out = injector.bind(&f)?.call(&Args::new())?;
    assert_eq!(
        out.downcast_ref::<String>(),
        Some(&"proxy for billing / proxy for shipping".to_string())
    );
    Ok(())
}

#[test]
fn record_dependencies_should_be_declared_during_seeding() -> weave::Result<()> {
    struct InjectorAwareSet {
        tagged: Interface,
    }

    impl ProviderSet for InjectorAwareSet {
        fn records(&self) -> Vec<ProviderRecord> {
            vec![
                ProviderRecord::new(Provider::new("tagged", |_: &Interface, deps: &Args| {
                    let injector: &Injector = deps.get("injector")?;
                    Ok(Value::new(injector.clone()))
                }))
                .provides(&self.tagged)
                .with_dependencies(
                    Dependencies::new().with("injector", Injector::interface()),
                ),
            ]
        }
    }

    let app = Application::new();
    let tagged = Interface::new("tagged");
    let set = InjectorAwareSet {
        tagged: tagged.clone(),
    };

    let f = Callable::new("observe", |args: &Args| {
        let seen: &Injector = args.get("tagged")?;
        Ok(Value::new(seen.clone()))
    });
    app.declare(&f, Dependencies::new().with("tagged", &tagged));

    let injector = app.injector().provider_set(&set).build();
    let out = injector.bind(&f)?.call(&Args::new())?;
    assert_eq!(out.downcast_ref::<Injector>(), Some(&injector));
    Ok(())
}

#[test]
fn empty_set_should_yield_a_usable_injector() -> weave::Result<()> {
    let app = Application::new();
    let greeting = Interface::new("greeting");

    let f = Callable::new("greet", |args: &Args| {
        let greeting: &String = args.get("greeting")?;
        Ok(Value::new(greeting.clone()))
    });
    app.declare(&f, Dependencies::new().with("greeting", &greeting));

    let injector = app.injector().provider_set(&EmptySet).build();

    // Nothing resolves, but binding succeeds and the caller can still
    // supply the open argument.
    let bound = injector.bind(&f)?;
    let out = bound.call(&Args::new().with("greeting", Value::new("hi".to_string())))?;
    assert_eq!(out.downcast_ref::<String>(), Some(&"hi".to_string()));
    Ok(())
}

#[test]
fn relisted_base_records_should_not_duplicate_entries() -> weave::Result<()> {
    // A derived set that lists the same record objects twice; the builder
    // deduplicates by provider identity.
    struct DoubledSet {
        greeting: Interface,
    }

    impl ProviderSet for DoubledSet {
        fn records(&self) -> Vec<ProviderRecord> {
            let record = ProviderRecord::new(Provider::new(
                "greeting",
                |_: &Interface, _: &Args| Ok(Value::new("hello".to_string())),
            ))
            .provides(&self.greeting);
            vec![record.clone(), record]
        }
    }

    let app = Application::new();
    let greeting = Interface::new("greeting");
    let set = DoubledSet {
        greeting: greeting.clone(),
    };

    let f = Callable::new("greet", |args: &Args| {
        let greeting: &String = args.get("greeting")?;
        Ok(Value::new(greeting.clone()))
    });
    app.declare(&f, Dependencies::new().with("greeting", &greeting));

    let injector = app.injector().provider_set(&set).build();
    let out = injector.bind(&f)?.call(&Args::new())?;
    assert_eq!(out.downcast_ref::<String>(), Some(&"hello".to_string()));
    Ok(())
}
