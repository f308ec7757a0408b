//! raikv CLI Client
//!
//! Interactive shell for a raikv server.

use std::io::{self, BufRead, Write};

use clap::Parser;
use raikv::protocol::{Codec, DEFAULT_MAX_FRAME_SIZE};
use raikv::shell::{self, ShellCommand, CLEAR_SCREEN, HELP};
use raikv::Client;

/// raikv CLI
#[derive(Parser, Debug)]
#[command(name = "raikv-cli")]
#[command(about = "Interactive shell for the raikv key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3232")]
    server: String,

    /// Largest response accepted; replies can run past the server's read buffer
    #[arg(long, default_value_t = 4 * DEFAULT_MAX_FRAME_SIZE)]
    max_frame_size: usize,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect_with(&args.server, Codec::new(args.max_frame_size)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error connecting to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    println!("Connected to {}. Type `help` for commands.", args.server);

    if let Err(e) = repl(&mut client) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn repl(client: &mut Client) -> raikv::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Request(request)) => {
                let response = client.request(&request)?;
                println!("{}", shell::render(&response));
            }
            Ok(ShellCommand::Help) => println!("{}", HELP),
            Ok(ShellCommand::Clear) => print!("{}", CLEAR_SCREEN),
            Ok(ShellCommand::Exit) => {
                println!("Exiting client...");
                return Ok(());
            }
            Ok(ShellCommand::Empty) => {}
            Err(e) => println!("{}", e),
        }
    }
}
