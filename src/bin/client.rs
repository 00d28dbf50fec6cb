//! RAX Chat Client - interactive terminal client
//!
//! Connects to a chat server and runs two loops: a dedicated reader task
//! prints server messages as they arrive, while the main loop forwards
//! stdin lines to the server, so incoming messages never block user input.

use std::env;
use std::process;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

const CLIENT_VERSION: &str = "RAX Chat Client v0.1";

fn print_commands() {
    println!("You can use the commands:");
    println!("  JOIN <name> : join the chat with display name <name>");
    println!("  WHO         : list the chat participants");
    println!("  LEAVE       : leave the chat");
    println!("  VERSION     : ask the server for its version");
    println!("  HELP        : print this list");
    println!();
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <host> <port>", args[0]);
        process::exit(1);
    }

    let host = &args[1];
    let port: u16 = match args[2].parse() {
        Ok(port) => port,
        Err(_) => {
            eprintln!("invalid port: {}", args[2]);
            process::exit(1);
        }
    };

    let stream = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Connection to <{}, {}> failed: {}", host, port, e);
            process::exit(1);
        }
    };

    println!("{}", CLIENT_VERSION);
    println!("Connected. Use 'JOIN <name>' to join the chat.");
    println!();
    print_commands();

    let (read_half, mut write_half) = stream.into_split();

    // The server sends at any time; print its lines from their own task.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => println!("{}", line),
                Ok(None) => {
                    println!("Connection closed by server");
                    process::exit(0);
                }
                Err(e) => {
                    eprintln!("Error reading from server: {}", e);
                    process::exit(1);
                }
            }
        }
    });

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match input.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        };

        if line.starts_with("HELP") {
            print_commands();
            continue;
        }

        if let Err(e) = write_half.write_all(format!("{}\n", line).as_bytes()).await {
            eprintln!("Error sending to server: {}", e);
            break;
        }

        if line.starts_with("LEAVE") {
            break;
        }
    }
}
