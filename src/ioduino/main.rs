use clap::{Parser, Subcommand};
use commands::{
    ConnectionOptions, DemoCommand, PinCommand, handle_demo, handle_pin, handle_status,
};
use ioduino::error::IoduinoResult;

mod commands;
mod util;

#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionOptions,

    /// Log every exchange with the board
    #[clap(short, long, default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Connect and report which port the board answered on
    Status,

    /// Single pin operation
    #[command(flatten)]
    Pin(PinCommand),

    /// Repeating demonstrations
    #[command(flatten)]
    Demo(DemoCommand),
}

fn main() -> IoduinoResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut ioduino = cli.connection.connect()?;

    match cli.command {
        Command::Status => handle_status(&ioduino),
        Command::Pin(cmd) => handle_pin(&mut ioduino, cmd)?,
        Command::Demo(cmd) => handle_demo(&mut ioduino, cmd)?,
    }

    Ok(())
}
