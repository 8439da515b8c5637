//! clipway-ctl — command-line interface for the clipway daemon.

use anyhow::{Context, Result};

mod cmd;

const DEFAULT_PORT: u16 = 5051;

fn print_usage() {
    println!("Usage: clipway-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                        Daemon, relay, and discovery overview");
    println!("  servers                       List discovered clipway servers");
    println!("  settings                      Show runtime settings");
    println!("  settings discoverable on|off  Toggle announcements");
    println!("  copy <text>                   Copy text to the clipboard");
    println!("  respond <content>             Deliver content to the waiting device");
    println!("  respond-file <path>           Deliver a file to the waiting device");
    println!("  send <ip> <port> <content>    Send content to another server");
    println!("  confirm <id> accept|decline   Resolve a pending confirmation");
    println!("  logs [<limit>]                Show the content log");
    println!("  logs clear                    Clear the content log");
    println!();
    println!("Options:");
    println!("  --port <port>   Control surface port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --port option
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--port" {
            i += 1;
            port = args
                .get(i)
                .context("--port requires a value")?
                .parse()
                .context("--port must be a number")?;
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["status"] | []                     => cmd::status::run(port).await,
        ["servers"]                         => cmd::servers::run(port).await,
        ["settings"]                        => cmd::settings::show(port).await,
        ["settings", "discoverable", v]     => cmd::settings::set_discoverable(port, v).await,
        ["copy", text]                      => cmd::relay::copy(port, text).await,
        ["respond", content]                => cmd::relay::respond_content(port, content).await,
        ["respond-file", path]              => cmd::relay::respond_file(port, path).await,
        ["send", ip, peer_port, content]    => cmd::send::run(port, ip, peer_port, content).await,
        ["confirm", id, decision]           => cmd::relay::confirm(port, id, decision).await,
        ["logs"]                            => cmd::logs::list(port, None).await,
        ["logs", "clear"]                   => cmd::logs::clear(port).await,
        ["logs", limit]                     => {
            let limit = limit.parse().context("limit must be a number")?;
            cmd::logs::list(port, Some(limit)).await
        }
        ["help"] | ["--help"] | ["-h"]      => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
