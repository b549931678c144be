//! Basic introduction to whence.
//!
//! **Run this example:** `cargo run --example basic`
//!
//! This example demonstrates the fundamental concepts:
//! 1. Creating errors with `Error::new` and `error!()`
//! 2. Wrapping errors with `.wrap()` and `wrap!()`
//! 3. Rendering the same chain for users and for logs

use std::fs;

use whence::{Verb, prelude::*};

/// Foreign errors are wrapped as they are; their `Display` becomes the leaf
/// of the chain.
fn read_config_file(path: &str) -> whence::Result<String> {
    let data = fs::read_to_string(path).wrap_with(|| format!("cannot read {path}"))?;
    Ok(data)
}

/// Each function adds its own context, recorded where it was added.
fn load_user_config() -> whence::Result<String> {
    read_config_file("/nonexistent/config.toml").wrap("cannot load user configuration")
}

fn parse_port(text: &str) -> whence::Result<u16> {
    match text.parse() {
        Ok(port) => Ok(port),
        Err(error) => Err(wrap!(error, "invalid port {text:?}")),
    }
}

fn startup() -> whence::Result<()> {
    let _config = load_user_config().wrap("startup failed")?;
    Ok(())
}

fn main() {
    println!("=== Basic Error Handling ===\n");

    let Err(error) = startup() else {
        return;
    };

    println!("Message only ({{}}):");
    println!("  {error}\n");

    println!("All messages ({{:+}}):");
    println!("  {error:+}\n");

    println!("With locations ({{:+?}}):");
    println!("  {error:+?}\n");

    println!("One node per line, module paths ({{:-#?}}):");
    println!("{error:-#?}\n");

    println!("Function names, padded to 30, one per line ({{:>-30}} on display(Verb::Function)):");
    println!("{:>-30}\n", error.display(Verb::Function));

    if let Err(error) = parse_port("http") {
        println!("Macro-created error ({{:+?}}):");
        println!("  {error:+?}");
        println!("  created in {}", error.call_site().function());
    }

    let root = whence::root_cause(&error);
    println!("\nRoot cause: {root}");
}
