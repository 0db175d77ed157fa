use crate::commands::{run_demo, run_list, run_new_bill, DemoArgs, ListArgs, NewBillArgs};
use billed::config::AppConfig;
use billed::error::AppError;
use billed::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Billed employee",
    about = "Submit expense bills and review your bill list from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Work with the signed-in employee's bills
    Bills {
        #[command(subcommand)]
        command: BillsCommand,
    },
    /// Walk through listing, previewing, and submitting a bill end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BillsCommand {
    /// Render the bill list page (default command)
    List(ListArgs),
    /// Upload a receipt and submit a new bill
    New(NewBillArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli.command.unwrap_or(Command::Bills {
        command: BillsCommand::List(ListArgs::default()),
    });

    match command {
        Command::Bills {
            command: BillsCommand::List(args),
        } => run_list(&config, args).await,
        Command::Bills {
            command: BillsCommand::New(args),
        } => run_new_bill(&config, args).await,
        Command::Demo(args) => run_demo(&config, args).await,
    }
}
