//! Command handler modules for psr.

pub mod replicate;

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read event input from `path`, or stdin when `None`.
pub fn read_event_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => {
            fs::read_to_string(p).with_context(|| format!("read events file {}", p.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read events from stdin")?;
            Ok(buf)
        }
    }
}

/// Split input into event documents.
///
/// Accepts one JSON document (possibly pretty-printed) or a stream of
/// documents separated by whitespace, which covers newline-delimited JSON.
pub fn parse_event_stream(input: &str) -> Result<Vec<Value>> {
    serde_json::Deserializer::from_str(input)
        .into_iter::<Value>()
        .enumerate()
        .map(|(i, v)| v.with_context(|| format!("event #{} is not valid JSON", i + 1)))
        .collect()
}
