use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::warn;

use triage_core::registry::StoreFactory;
use triage_core::storage::{LogStore, SqliteLogStore};
use triage_core::{EnvironmentConfig, SessionRegistry};

use crate::cli::args::ServeArgs;

/// Line-delimited JSON driver: one `{"session_key": ..., "action": ...}`
/// request per line in, one `{"status": ..., ...}` response per line out.
/// This is the in-process stand-in for whatever HTTP front door a deployment
/// puts in front of the registry.
pub fn run(args: ServeArgs) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let registry = build_registry(config, args.db_dir)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_lines(registry, stdin.lock(), stdout.lock())?;
    Ok(0)
}

fn load_config(path: Option<&Path>) -> Result<EnvironmentConfig> {
    match path {
        None => Ok(EnvironmentConfig::default()),
        Some(p) => {
            let raw = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config {}", p.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", p.display()))
        }
    }
}

fn build_registry(config: EnvironmentConfig, db_dir: Option<PathBuf>) -> Result<SessionRegistry> {
    let factory: StoreFactory = match db_dir {
        None => Box::new(|_key| Ok(Box::new(SqliteLogStore::open_in_memory()?) as Box<dyn LogStore>)),
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create db dir {}", dir.display()))?;
            Box::new(move |key| {
                let file = dir.join(format!("{}.db", sanitize_key(key)));
                Ok(Box::new(SqliteLogStore::open(&file)?) as Box<dyn LogStore>)
            })
        }
    };
    Ok(SessionRegistry::new(config, factory))
}

/// Session keys are opaque caller strings; keep the filenames boring.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn serve_lines<R: BufRead, W: Write>(
    mut registry: SessionRegistry,
    reader: R,
    mut writer: W,
) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = respond(&mut registry, &line);
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

fn respond(registry: &mut SessionRegistry, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "rejecting unparseable request line");
            return json!({ "status": 400, "error": format!("Invalid JSON: {}", e) });
        }
    };
    let Some(key) = request.get("session_key").and_then(Value::as_str) else {
        return json!({ "status": 400, "error": "Missing session_key" });
    };
    let key = key.to_owned();
    match registry.handle(&key, &request) {
        Ok(body) => json!({ "status": 200, "body": body }),
        Err(e) => json!({ "status": e.status(), "error": e.to_string() }),
    }
}
