//! gatekv CLI Client
//!
//! Command-line interface for interacting with gatekv.

use std::io::{self, BufRead};
use std::thread;

use clap::Parser;
use gatekv::network::Client;
use gatekv::protocol::read_line;

/// gatekv CLI
#[derive(Parser, Debug)]
#[command(name = "gatekv-cli")]
#[command(about = "CLI for the gatekv key-value server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5678")]
    server: String,

    /// Keep printing pushed lines after the response (useful with SUB)
    #[arg(short, long)]
    follow: bool,

    /// Request to send, e.g. `PUT a 1`. Omit for an interactive session.
    command: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let result = if args.command.is_empty() {
        interactive(client)
    } else {
        one_shot(client, &args.command.join(" "), args.follow)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Send one request and print what comes back
fn one_shot(mut client: Client, line: &str, follow: bool) -> gatekv::Result<()> {
    client.send(line)?;

    while let Some(reply) = client.read_line()? {
        println!("{}", reply);
        if !follow {
            break;
        }
    }

    Ok(())
}

/// Forward stdin lines and print every line the server sends
fn interactive(mut client: Client) -> gatekv::Result<()> {
    let mut incoming = client.try_clone_reader()?;

    let printer = thread::spawn(move || loop {
        match read_line(&mut incoming) {
            Ok(Some(line)) => println!("{}", line),
            Ok(None) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    });

    let mut quit = false;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        client.send(&line)?;
        if line.trim().eq_ignore_ascii_case("QUIT") {
            quit = true;
            break;
        }
    }

    // stdin closed: leave cleanly so the printer sees EOF
    if !quit {
        client.send("QUIT")?;
    }

    let _ = printer.join();
    Ok(())
}
