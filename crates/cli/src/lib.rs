//! # RiptideKV wire protocol
//!
//! The line-oriented TCP protocol spoken between `riptidekv-cli` and
//! `riptidekv-server`. Kept in the library half of this crate (rather than
//! duplicated between the two `src/bin` binaries) so the server can dispatch
//! a request and the test suite can exercise dispatch without opening a real
//! socket.
//!
//! A request is one line, `<COMMAND> [args...]\n`. A reply is one line back.
//! Neither side frames anything beyond the trailing newline.

use std::sync::Mutex;

use engine::Engine;
use humansize::{format_size, BINARY};

/// Parses one request line and dispatches it against `engine`, returning the
/// reply line (without a trailing newline — callers add their own framing).
///
/// A request with the wrong number of arguments for its command is rejected
/// here, before the engine is ever invoked: arg-count validation belongs to
/// the wire layer, not the engine.
pub fn dispatch(engine: &Mutex<Engine>, line: &str) -> String {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return "Unknown command".to_string();
    };
    let args: Vec<&str> = parts.collect();

    match command.to_uppercase().as_str() {
        "PING" => match args.as_slice() {
            [] => "Pong!".to_string(),
            _ => malformed("PING"),
        },
        "GET" => match args.as_slice() {
            [key] => match lock(engine).get(key) {
                Ok(Some(value)) => value,
                Ok(None) => format!("ERROR: Key {key} does not exist!"),
                Err(e) => format!("Error while getting key: {e}"),
            },
            _ => malformed("GET <key>"),
        },
        "SET" => match args.as_slice() {
            [key, value] => match lock(engine).set(key, value) {
                Ok(()) => format!("Wrote {key}={value}"),
                Err(e) => format!("Error while setting key: {e}"),
            },
            _ => malformed("SET <key> <value>"),
        },
        "FLUSH" => match args.as_slice() {
            [] => match lock(engine).flush() {
                Ok(()) => "Done flushing".to_string(),
                Err(e) => format!("Error while flushing: {e}"),
            },
            _ => malformed("FLUSH"),
        },
        "COMPACT" => match args.as_slice() {
            [] => match lock(engine).compact() {
                Ok(()) => "Done compacting".to_string(),
                Err(e) => format!("Error while compacting: {e}"),
            },
            _ => malformed("COMPACT"),
        },
        "DISKUSAGE" => match args.as_slice() {
            [] => match lock(engine).disk_usage() {
                Ok(bytes) => format_size(bytes, BINARY),
                Err(e) => format!("Error while computing disk usage: {e}"),
            },
            _ => malformed("DISKUSAGE"),
        },
        _ => "Unknown command".to_string(),
    }
}

fn lock(engine: &Mutex<Engine>) -> std::sync::MutexGuard<'_, Engine> {
    engine.lock().unwrap_or_else(|e| e.into_inner())
}

fn malformed(usage: &str) -> String {
    format!("ERROR: wrong number of arguments, usage: {usage}")
}
