// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Application-wide and request-scoped injection, combined through
//! specialization and partial binding.

use weave::{Application, Args, Callable, Dependencies, Interface, Provider, Value};

fn main() -> weave::Result<()> {
    let app = Application::new();

    let database = Interface::new("database");
    let current_user = Interface::new("current-user");

    let show_profile = Callable::new("show_profile", |args: &Args| {
        let database: &String = args.get("database")?;
        let user: &String = args.get("user")?;
        Ok(Value::new(format!("profile of {user} via {database}")))
    });
    app.declare(
        &show_profile,
        Dependencies::new()
            .with("database", &database)
            .with("user", &current_user),
    );

    // At startup, provide what lives for the whole application. The current
    // user is unknown here, so that parameter stays open.
    let app_injector = app
        .injector()
        .provide(
            &database,
            Provider::constant("database", Value::new("postgres://main".to_string())),
        )
        .build();
    let partially_bound = app_injector.bind(&show_profile)?;

    // Per request, layer the request-specific provider over a snapshot of
    // the application table and finish the binding.
    for name in ["ada", "grace"] {
        let request_injector = app_injector
            .specialize()
            .provide(
                &current_user,
                Provider::constant("user", Value::new(name.to_string())),
            )
            .build();

        let bound = request_injector.bind(&partially_bound)?;
        let out = bound.call(&Args::new())?;
        println!(
            "{}",
            out.downcast_ref::<String>()
                .expect("handler returns a string")
        );
    }

    Ok(())
}
