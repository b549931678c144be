//! Request validation with located errors.
//!
//! **Run this example:** `cargo run --example validations`
//!
//! A handler parses JSON request bodies, validates them, and reports
//! failures twice:
//!
//! 1. **To the log** with `{:+?}` - every reason, each with its location
//! 2. **To the caller** with `{:+}` - every reason, no locations
//!
//! Body parsing errors come from `serde_json` and are wrapped in a small
//! derive_more enum, so they show up in the chain as foreign errors.

use derive_more::{Display, Error, From};
use serde_json::Value;
use whence::prelude::*;

#[derive(Error, Debug, Display, From)]
enum BodyError {
    #[display("malformed JSON body")]
    Json(serde_json::Error),
    #[display("request body must be a JSON object")]
    NotAnObject,
}

fn parse_body(body: &str) -> Result<serde_json::Map<String, Value>, BodyError> {
    match serde_json::from_str(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(BodyError::NotAnObject),
    }
}

fn field<'a>(body: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Accepts `CCYY-MM-DD` only.
fn validate_date(field_name: &str, value: &str) -> whence::Result<()> {
    let parts: Vec<&str> = value.split('-').collect();
    let well_formed = matches!(parts.as_slice(), [year, month, day]
        if year.len() == 4 && month.len() == 2 && day.len() == 2
            && parts.iter().all(|part| part.bytes().all(|b| b.is_ascii_digit())));
    if !well_formed {
        bail!("{field_name}:{value:?} not formatted as CCYY-MM-DD");
    }
    Ok(())
}

fn validate_address(address: &Value) -> whence::Result<()> {
    let Value::Object(address) = address else {
        bail!("address must be an object");
    };
    if field(address, "street").is_none() {
        bail!("missing street");
    }
    if field(address, "country").is_none() {
        bail!("missing country");
    }
    Ok(())
}

fn validate_add_user(body: &str) -> whence::Result<()> {
    let body = parse_body(body).wrap("cannot parse add-user request")?;
    if field(&body, "name").is_none() {
        bail!("missing name");
    }
    match field(&body, "date-of-birth") {
        Some(dob) => validate_date("date-of-birth", dob),
        None => bail!("missing date-of-birth"),
    }
}

fn validate_update_user(body: &str) -> whence::Result<()> {
    let body = parse_body(body).wrap("cannot parse update-user request")?;
    let dob = field(&body, "date-of-birth");
    let address = body.get("address");
    if dob.is_none() && address.is_none() {
        bail!("missing both date-of-birth and address");
    }
    if let Some(dob) = dob {
        validate_date("date-of-birth", dob)?;
    }
    if let Some(address) = address {
        validate_address(address).wrap("invalid address")?;
    }
    Ok(())
}

/// Logs the full chain with locations and returns what the caller sees.
fn handle(name: &str, body: &str, validate: fn(&str) -> whence::Result<()>) -> String {
    match validate(body).wrap("invalid request") {
        Ok(()) => "ok".to_owned(),
        Err(error) => {
            eprintln!("[{name}] {error:+?}");
            format!("{error:+}")
        }
    }
}

fn main() {
    println!("=== Add user ===\n");
    for body in [
        r#"{"name": "Ada", "date-of-birth": "1815-12-10"}"#,
        r#"{"date-of-birth": "1815-12-10"}"#,
        r#"{"name": "Ada"}"#,
        r#"{"name": "Ada", "date-of-birth": "10/12/1815"}"#,
        r#"{"name": "Ada", "#,
        r#"["Ada"]"#,
    ] {
        println!("{body}\n  -> {}", handle("add-user", body, validate_add_user));
    }

    println!("\n=== Update user ===\n");
    for body in [
        r#"{"date-of-birth": "1815-12-10"}"#,
        r#"{}"#,
        r#"{"address": {"street": "12 St James's Square"}}"#,
        r#"{"address": {"street": "12 St James's Square", "country": "UK"}}"#,
    ] {
        println!(
            "{body}\n  -> {}",
            handle("update-user", body, validate_update_user)
        );
    }
}
