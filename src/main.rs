use anyhow::Result;
use clap::Parser;
use partychess::core::{init_logging, ClientSettings};
use partychess::networking::{ClientContext, Reaction, TransportEvent, TransportLink, UserIntent};
use partychess::ui::{Command, Terminal, HELP};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Terminal client for party chess
#[derive(Parser, Debug)]
#[command(name = "partychess", version)]
struct Cli {
    /// Lobby server websocket url
    #[arg(long, env = "PARTYCHESS_SERVER")]
    server: Option<String>,

    /// Log filter, e.g. `debug` or `partychess=trace`
    #[arg(long, env = "PARTYCHESS_LOG")]
    log: Option<String>,

    /// Store the effective server and log filter as defaults
    #[arg(long)]
    save_settings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = ClientSettings::load();
    if let Some(server) = cli.server {
        settings.server_url = server;
    }
    if let Some(log) = cli.log {
        settings.log_filter = log;
    }
    init_logging(&settings.log_filter)?;
    if cli.save_settings {
        let path = settings.save()?;
        info!("[SETTINGS] Defaults written to {:?}", path);
    }

    let mut link = TransportLink::connect(settings.server_url.clone());
    let mut ctx = ClientContext::new();
    let mut terminal = Terminal::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Connecting to {}", settings.server_url);
    println!("{}", HELP);

    loop {
        tokio::select! {
            event = link.next_event() => {
                let Some(event) = event else {
                    break;
                };
                let opened = event == TransportEvent::Opened;
                let closed = event == TransportEvent::Closed;

                let reaction = ctx.handle(event.into());
                show(&link, &mut terminal, &ctx, reaction);
                if opened {
                    let reaction = ctx.handle(UserIntent::ShowParties.into());
                    show(&link, &mut terminal, &ctx, reaction);
                }
                if closed {
                    println!("Connection closed.");
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", HELP),
                    Ok(command) => match terminal.intent_for(command, &ctx) {
                        Some(intent) => {
                            let reaction = ctx.handle(intent.into());
                            show(&link, &mut terminal, &ctx, reaction);
                        }
                        None => println!("{}", terminal.render(&ctx)),
                    },
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    Ok(())
}

/// Send what the reaction produced and redraw if anything changed
fn show(link: &TransportLink, terminal: &mut Terminal, ctx: &ClientContext, reaction: Reaction) {
    link.send_all(reaction.outbound);
    terminal.on_changes(&reaction.changes);
    if !reaction.changes.is_empty() {
        println!("{}", terminal.render(ctx));
    }
}
