//! # riptidekv-cli
//!
//! An interactive line client for `riptidekv-server`: connect once, then
//! read commands from stdin and print whatever the server sends back.
//!
//! ```text
//! $ riptidekv-cli --address 127.0.0.1 --port 8080
//! Welcome to RiptideKV. Connected to 127.0.0.1:8080
//! > SET name chris
//! Wrote name=chris
//! > GET name
//! chris
//! ```
//!
//! `--address`/`-a` and `--port`/`-p` are parsed by hand from `env::args()`
//! rather than via `clap`.

use std::env;
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::process::ExitCode;

struct Args {
    address: String,
    port: u16,
}

fn parse_args() -> Args {
    let mut address = "127.0.0.1".to_string();
    let mut port: u16 = 8080;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--address" | "-a" => {
                if let Some(v) = args.next() {
                    address = v;
                }
            }
            "--port" | "-p" => {
                if let Some(v) = args.next() {
                    if let Ok(p) = v.parse() {
                        port = p;
                    }
                }
            }
            other => {
                eprintln!("unrecognized argument: {other}");
            }
        }
    }

    Args { address, port }
}

fn main() -> ExitCode {
    let args = parse_args();

    let stream = match TcpStream::connect((args.address.as_str(), args.port)) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("could not connect to {}:{}: {e}", args.address, args.port);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Welcome to RiptideKV. Connected to {}:{}",
        args.address, args.port
    );

    let mut writer = match stream.try_clone() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("could not clone connection: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut reader = BufReader::new(stream);

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush().ok();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            print!("> ");
            io::stdout().flush().ok();
            continue;
        }

        if let Err(e) = writeln!(writer, "{line}") {
            eprintln!("connection write failed: {e}");
            return ExitCode::FAILURE;
        }

        let mut reply = String::new();
        match reader.read_line(&mut reply) {
            Ok(0) => {
                println!("server closed the connection");
                break;
            }
            Ok(_) => print!("{reply}"),
            Err(e) => {
                eprintln!("connection read failed: {e}");
                return ExitCode::FAILURE;
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    ExitCode::SUCCESS
}
