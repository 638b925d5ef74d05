//! Static table backend - serves a key/value file.
//!
//! This example demonstrates:
//! - Binding all four operations
//! - Reloading data on UPDATE
//! - Logging to stderr while fd 0 carries the protocol
//!
//! The file holds one `key value` pair per line; `#` starts a comment.
//! FETCH cycles through the values.
//!
//! # Running under the host
//!
//! ```text
//! table mytable proc:/path/to/static_table /etc/mail/mytable
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use table_api::handler::{ERROR, FOUND, NOT_FOUND};
use table_api::TableApi;
use tracing_subscriber::EnvFilter;

/// Parsed table contents.
#[derive(Default)]
struct Table {
    entries: BTreeMap<String, String>,
    cursor: usize,
}

impl Table {
    fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key.to_string(), value.trim().to_string()),
                None => (line.to_string(), String::new()),
            })
            .collect();
        Ok(Self { entries, cursor: 0 })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TABLE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            tracing::error!("usage: static_table <file>");
            std::process::exit(1);
        }
    };

    let table = match Table::load(&path) {
        Ok(table) => Arc::new(Mutex::new(table)),
        Err(e) => {
            tracing::error!("{}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let update_table = table.clone();
    let check_table = table.clone();
    let lookup_table = table.clone();
    let fetch_table = table;

    let end = TableApi::new()
        .on_update(move || match Table::load(&path) {
            Ok(fresh) => {
                if let Ok(mut table) = update_table.lock() {
                    *table = fresh;
                }
                FOUND
            }
            Err(e) => {
                tracing::warn!("reload failed: {}", e);
                ERROR
            }
        })
        .on_check(move |_kind, key| {
            let Ok(table) = check_table.lock() else {
                return ERROR;
            };
            match key.to_str() {
                Ok(key) if table.entries.contains_key(key) => FOUND,
                _ => NOT_FOUND,
            }
        })
        .on_lookup(move |_kind, key, value| {
            let Ok(table) = lookup_table.lock() else {
                return ERROR;
            };
            let Some(found) = key.to_str().ok().and_then(|k| table.entries.get(k)) else {
                return NOT_FOUND;
            };
            value.set(found).map_or(ERROR, |_| FOUND)
        })
        .on_fetch(move |_kind, value| {
            let Ok(mut table) = fetch_table.lock() else {
                return ERROR;
            };
            if table.entries.is_empty() {
                return NOT_FOUND;
            }
            let index = table.cursor % table.entries.len();
            table.cursor = index + 1;
            match table.entries.values().nth(index) {
                Some(found) => value.set(found).map_or(ERROR, |_| FOUND),
                None => NOT_FOUND,
            }
        })
        .dispatch_stdio_or_exit()
        .await;

    tracing::info!(?end, "table process exiting");
}
