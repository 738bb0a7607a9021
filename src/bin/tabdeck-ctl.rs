use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use tabdeck::{config, store};
use tabdeck::events::Command;
use tabdeck::sys::server::SOCKET_PATH;

#[derive(Parser, Debug)]
#[command(name = "tabdeck-ctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Advance the cursor by one
    Next,
    /// Move the cursor back by one
    Prev,
    /// Jump to an index, wrapping around the active list
    #[command(allow_negative_numbers = true)]
    Goto { index: isize },
    /// Jump to the first item of a page
    Page { page: usize },
    /// Select a category: next, prev, first, an index or a name
    Category {
        #[arg(required = true, num_args = 1..)]
        selector: Vec<String>,
    },
    /// Set the layout: grid, carousel or toggle
    Layout { mode: String },
    /// Report a new viewport width in pixels
    Resize { width: u32 },
    /// Feed a wheel delta
    #[command(allow_negative_numbers = true)]
    Wheel { delta: f64 },
    /// Feed a complete swipe gesture
    #[command(allow_negative_numbers = true)]
    Swipe { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Press a key: left, right, up, down or esc
    Key { key: String },
    /// Print the daemon's state as JSON
    Status,
    /// Write the default config file if none exists
    InitConfig,
    /// Write the builtin shortcuts file if none exists
    InitStore,
}

impl Commands {
    fn to_line(&self) -> Option<String> {
        let line = match self {
            Self::Next => "next".to_string(),
            Self::Prev => "prev".to_string(),
            Self::Goto { index } => format!("goto {}", index),
            Self::Page { page } => format!("page {}", page),
            Self::Category { selector } => format!("category {}", selector.join(" ")),
            Self::Layout { mode } => format!("layout {}", mode),
            Self::Resize { width } => format!("resize {}", width),
            Self::Wheel { delta } => format!("wheel {}", delta),
            Self::Swipe { x0, y0, x1, y1 } => format!("swipe {} {} {} {}", x0, y0, x1, y1),
            Self::Key { key } => format!("key {}", key),
            Self::Status => "status".to_string(),
            Self::InitConfig | Self::InitStore => return None,
        };
        Some(line)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::InitStore = cli.command {
        let path = store::write_default_store().context("Failed to write default shortcuts")?;
        println!("{}", path.display());
        return Ok(());
    }

    match cli.command.to_line() {
        Some(line) => {
            // Reject locally what the daemon would reject anyway
            line.parse::<Command>()?;
            let reply = send_command(&line)?;
            match reply.strip_prefix("error: ") {
                Some(message) => anyhow::bail!("tabdeck rejected '{}': {}", line, message),
                None => println!("{}", reply),
            }
            Ok(())
        }
        None => {
            let path = config::write_default_config().context("Failed to write default config")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn send_command(line: &str) -> anyhow::Result<String> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to tabdeck daemon at {}: {}. Is tabdeck running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", line)?;
    stream.shutdown(Shutdown::Write)?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    Ok(reply.trim_end().to_string())
}
