//! Run command handler
//!
//! Builds params from the command line, runs the named service and prints
//! its result or failure.

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use servitor_core::{Params, ServiceFailure};
use servitor_domains::{Catalog, Registry};
use std::sync::Arc;

use crate::config::Config;

/// Parse a single key=value pair
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret a command-line value as JSON, falling back to a plain string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Merge `--json` and `-p` pairs into params
pub fn build_params(pairs: Vec<(String, String)>, json: Option<&str>) -> Result<Params> {
    let base = match json {
        Some(source) => Params::from_json_str(source).context("Invalid --json params")?,
        None => Params::new(),
    };

    Ok(pairs
        .into_iter()
        .fold(base, |params, (key, raw)| params.with(key, parse_value(&raw))))
}

/// Run a catalog service
pub fn run_service(
    config: &Config,
    service: &str,
    pairs: Vec<(String, String)>,
    json: Option<&str>,
) -> Result<()> {
    let catalog: Catalog = service.parse()?;
    let params = build_params(pairs, json)?;
    let registry = config.open_registry()?;

    tracing::info!("Running {} with {} param(s)", catalog, params.len());

    let shared: Arc<dyn Registry> = Arc::new(registry.clone());
    match catalog.run(shared, params) {
        Ok(result) => {
            config.save_registry(&registry)?;
            print_success(catalog, result.as_ref())
        }
        Err(failure) => {
            print_failure(catalog, &failure)?;
            anyhow::bail!("{} failed", catalog)
        }
    }
}

fn print_success(catalog: Catalog, result: Option<&Value>) -> Result<()> {
    println!("{}", format!("✓ {} succeeded", catalog).green().bold());

    match result {
        Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
        None => println!("{}", "(no result)".dimmed()),
    }

    Ok(())
}

fn print_failure(catalog: Catalog, failure: &ServiceFailure) -> Result<()> {
    eprintln!(
        "{} {}",
        format!("✗ {} failed:", catalog).red().bold(),
        failure.kind().name().yellow()
    );
    eprintln!("{}", serde_json::to_string_pretty(failure.errors())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("fqdn=example.com").unwrap(),
            ("fqdn".to_string(), "example.com".to_string())
        );
        assert_eq!(
            parse_key_val("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("fqdn").is_err());
    }

    #[test]
    fn test_values_parse_as_json_when_possible() {
        assert_eq!(parse_value("2"), json!(2));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("example.com"), json!("example.com"));
        assert_eq!(parse_value("\"42\""), json!("42"));
    }

    #[test]
    fn test_pairs_override_json() {
        let params = build_params(
            vec![("years".to_string(), "3".to_string())],
            Some(r#"{"fqdn": "example.com", "years": 1}"#),
        )
        .unwrap();

        assert_eq!(params.get_str("fqdn"), Some("example.com"));
        assert_eq!(params.get_i64("years"), Some(3));
    }

    #[test]
    fn test_json_must_be_object() {
        assert!(build_params(vec![], Some("[1, 2]")).is_err());
    }

    #[test]
    fn test_unknown_service() {
        let result = run_service(&Config::default(), "delete-domain", vec![], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_reports_failure() {
        let result = run_service(&Config::default(), "check-availability", vec![], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_succeeds() {
        let result = run_service(
            &Config::default(),
            "register-domain",
            vec![
                ("fqdn".to_string(), "example.com".to_string()),
                ("owner".to_string(), "alice".to_string()),
            ],
            None,
        );
        assert!(result.is_ok());
    }
}
