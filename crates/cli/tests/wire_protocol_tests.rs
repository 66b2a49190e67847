//! End-to-end test of the wire protocol over a real TCP socket: a listener
//! thread dispatches through `cli::dispatch` exactly the way
//! `riptidekv-server` does, and a plain `TcpStream` plays the client.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use cli::dispatch;
use engine::Engine;
use tempfile::TempDir;

fn spawn_server() -> (std::net::SocketAddr, TempDir) {
    let dir = TempDir::new().unwrap();
    let engine = Engine::new(
        dir.path().join("segments"),
        dir.path().join("wal.log"),
        "segment",
        3000,
        100,
    )
    .unwrap();
    let engine = Arc::new(Mutex::new(engine));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for incoming in listener.incoming() {
            let Ok(stream) = incoming else { continue };
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut writer = stream.try_clone().unwrap();
                let reader = BufReader::new(stream);
                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    if line.is_empty() {
                        continue;
                    }
                    let reply = dispatch(&engine, &line);
                    if writeln!(writer, "{reply}").is_err() {
                        break;
                    }
                }
            });
        }
    });

    (addr, dir)
}

fn roundtrip(stream: &mut TcpStream, request: &str) -> String {
    writeln!(stream, "{request}").unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut reply = String::new();
    reader.read_line(&mut reply).unwrap();
    reply.trim_end().to_string()
}

#[test]
fn ping_over_a_real_socket() {
    let (addr, _dir) = spawn_server();
    let mut stream = TcpStream::connect(addr).unwrap();
    assert_eq!(roundtrip(&mut stream, "PING"), "Pong!");
}

#[test]
fn set_get_flush_compact_diskusage_over_a_real_socket() {
    let (addr, _dir) = spawn_server();
    let mut stream = TcpStream::connect(addr).unwrap();

    assert_eq!(roundtrip(&mut stream, "SET chris lessard"), "Wrote chris=lessard");
    assert_eq!(roundtrip(&mut stream, "GET chris"), "lessard");
    assert_eq!(roundtrip(&mut stream, "FLUSH"), "Done flushing");
    assert_eq!(roundtrip(&mut stream, "GET chris"), "lessard");
    assert_eq!(roundtrip(&mut stream, "SET chris martinez"), "Wrote chris=martinez");
    assert_eq!(roundtrip(&mut stream, "COMPACT"), "Done compacting");
    assert_eq!(roundtrip(&mut stream, "GET chris"), "martinez");

    let usage = roundtrip(&mut stream, "DISKUSAGE");
    assert!(!usage.is_empty());
    assert!(!usage.starts_with("Error"));
}

#[test]
fn two_clients_share_one_engine() {
    let (addr, _dir) = spawn_server();
    let mut a = TcpStream::connect(addr).unwrap();
    let mut b = TcpStream::connect(addr).unwrap();

    assert_eq!(roundtrip(&mut a, "SET shared value-from-a"), "Wrote shared=value-from-a");
    assert_eq!(roundtrip(&mut b, "GET shared"), "value-from-a");
}

#[test]
fn get_of_an_unknown_key_is_an_error_line_not_a_connection_drop() {
    let (addr, _dir) = spawn_server();
    let mut stream = TcpStream::connect(addr).unwrap();
    assert_eq!(
        roundtrip(&mut stream, "GET nope"),
        "ERROR: Key nope does not exist!"
    );
    // the connection is still alive afterwards
    assert_eq!(roundtrip(&mut stream, "PING"), "Pong!");
}
