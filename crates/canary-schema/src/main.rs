//! Schema binary for the Canary Checker data layer.
//!
//! Loads the store configuration, resolves the dialect, and prints the
//! `CREATE TABLE` statement for the component table together with the
//! declared type of every registered JSON column.
//!
//! # Usage
//!
//! ```text
//! canary-schema [--config <path>] [--dialect <name>]
//! ```
//!
//! Without `--config`, `canary-db.yaml` is read if it exists. `--dialect`
//! overrides both the file and `DATABASE_DIALECT`.

mod error;

use std::path::{Path, PathBuf};

use canary_db::component_store::create_table_sql;
use canary_db::{Dialect, SHAPES, StoreConfig, declared_type};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::SchemaError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "canary-db.yaml";

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    config: Option<PathBuf>,
    dialect: Option<String>,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the command line or the configuration is invalid.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    let mut config = load_config(options.config.as_deref())?;
    if let Some(dialect) = options.dialect {
        config.dialect = dialect;
    }

    let dialect = config.dialect();
    info!(configured = %config.dialect, resolved = %dialect, "Dialect resolved");

    print!("{}", render(dialect));
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, SchemaError> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => "config",
            "--dialect" => "dialect",
            other => {
                return Err(SchemaError::Usage {
                    message: format!("unexpected argument `{other}`"),
                });
            }
        };
        let value = args.next().ok_or_else(|| SchemaError::Usage {
            message: format!("--{slot} needs a value"),
        })?;
        if slot == "config" {
            options.config = Some(PathBuf::from(value));
        } else {
            options.dialect = Some(value);
        }
    }

    Ok(options)
}

fn load_config(path: Option<&Path>) -> Result<StoreConfig, SchemaError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    if path.exists() {
        info!(path = %path.display(), "Loading configuration");
        Ok(StoreConfig::from_file(path)?)
    } else {
        info!("Config file not found, using defaults");
        let mut config = StoreConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// DDL and column listing for `dialect`.
fn render(dialect: Dialect) -> String {
    let mut lines = vec![format!("-- dialect: {dialect}")];
    lines.extend(SHAPES.iter().map(|entry| {
        format!(
            "-- {}: {} ({})",
            entry.column,
            declared_type(dialect, entry.kind),
            entry.name
        )
    }));
    lines.push(format!("{};", create_table_sql(dialect)));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn parses_both_flags() {
        let options = parse_args(args(&["--dialect", "sqlite", "--config", "db.yaml"])).unwrap();
        assert_eq!(options.dialect.as_deref(), Some("sqlite"));
        assert_eq!(options.config, Some(PathBuf::from("db.yaml")));
    }

    #[test]
    fn no_flags_is_default() {
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn missing_value_is_usage_error() {
        let err = parse_args(args(&["--dialect"])).unwrap_err();
        assert!(matches!(err, SchemaError::Usage { .. }));
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        assert!(parse_args(args(&["--verbose"])).is_err());
    }

    #[test]
    fn renders_sqlite_schema() {
        let out = render(Dialect::Sqlite);
        assert!(out.starts_with("-- dialect: sqlite\n"));
        assert!(out.contains("-- selectors: json (resourceSelectors)"));
        assert!(out.contains("-- summary: TEXT (summary)"));
        assert!(out.contains("CREATE TABLE IF NOT EXISTS components"));
        assert!(out.trim_end().ends_with(");"));
    }

    #[test]
    fn render_emits_one_line_per_column() {
        let out = render(Dialect::Postgres);
        let comments = out.lines().filter(|l| l.starts_with("-- ")).count();
        assert_eq!(comments, SHAPES.len() + 1);
        assert!(out.contains("-- checks: JSONB (componentChecks)"));
        assert!(out.ends_with(");\n"));
    }

    #[test]
    fn renders_fallback_schema() {
        let out = render(Dialect::from_name("cockroachdb"));
        assert!(out.contains("-- dialect: other"));
        assert!(out.contains("-- log_selectors: TEXT (logSelectors)"));
    }
}
