//! # riptidekv-server
//!
//! The TCP front end for the storage engine: one OS thread per connection,
//! a shared `Engine` behind a `Mutex`, and the line protocol from
//! `cli::dispatch`. Blocking `std::thread` I/O, no async runtime.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use cli::dispatch;
use config::Config;
use engine::Engine;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = Config::from_env();

    let engine = match Engine::new(
        &cfg.segments_dir,
        &cfg.wal_path,
        "segment",
        cfg.threshold,
        cfg.sparsity_factor,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            // Corruption (an unreadable metadata snapshot or segment) is not
            // recoverable automatically: log and refuse to start rather than
            // silently dropping data.
            tracing::error!("refusing to start: {e}");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind((cfg.address.as_str(), cfg.port)) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}:{}: {e}", cfg.address, cfg.port);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "RiptideKV listening on {}:{} (segments_dir={}, threshold={})",
        cfg.address,
        cfg.port,
        cfg.segments_dir,
        cfg.threshold
    );

    let engine = Arc::new(Mutex::new(engine));

    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("failed to accept connection: {e}");
                continue;
            }
        };
        let engine = Arc::clone(&engine);
        thread::spawn(move || handle_connection(stream, &engine));
    }
}

/// Services one client connection: reads request lines until EOF or a
/// read/write error, dispatching each through the shared engine.
fn handle_connection(stream: TcpStream, engine: &Mutex<Engine>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    tracing::debug!("connection from {peer}");

    let mut writer = match stream.try_clone() {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!("failed to clone stream for {peer}: {e}");
            return;
        }
    };
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("read error from {peer}: {e}");
                break;
            }
        };
        if line.is_empty() {
            continue;
        }
        let reply = dispatch(engine, &line);
        if let Err(e) = writeln!(writer, "{reply}") {
            tracing::warn!("write error to {peer}: {e}");
            break;
        }
    }
    tracing::debug!("connection from {peer} closed");
}
