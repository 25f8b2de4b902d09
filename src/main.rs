use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use webbank::config::{Command, Config};
use webbank::error::BankError;
use webbank::processor::{Bank, Response, process_csv_stream};
use webbank::store::AccountStore;

fn main() -> ExitCode {
    let config = Config::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every request succeeded.
fn run(config: &Config) -> Result<bool, BankError> {
    let store = AccountStore::new(&config.accounts);
    if config.init && store.init()? {
        info!("Created {}", store.path().display());
    }

    let bank = Bank::new(store);

    match &config.command {
        Command::Batch { file } => {
            let reader = match File::open(file) {
                Ok(f) => BufReader::new(f),
                Err(e) => {
                    eprintln!("Failed to open {}: {}", file.display(), e);
                    return Ok(false);
                }
            };
            let responses = process_csv_stream(&bank, reader);
            Ok(responses
                .into_iter()
                .map(print_response)
                .fold(true, |all, ok| all && ok))
        }
        Command::Report => {
            print!("{}", bank.store().load()?);
            Ok(true)
        }
        command @ (Command::Balance { .. }
        | Command::Deposit { .. }
        | Command::Withdraw { .. }
        | Command::Open { .. }) => {
            let Some(entry) = command.to_entry() else {
                unreachable!("single-request commands always map to an entry");
            };
            Ok(print_response(bank.respond(entry)))
        }
    }
}

fn print_response(response: Response) -> bool {
    match &response {
        Response::Success(_) => println!("{}", response),
        Response::Failure(_) => eprintln!("{}", response),
    }
    response.is_success()
}
