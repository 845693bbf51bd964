// Path: crates/cli/src/commands/recorder.rs

use crate::util::parse_account;
use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook_execution::LedgerMachine;
use gradebook_types::app::{AccountId, RecorderId};

#[derive(Parser, Debug)]
pub struct RecorderArgs {
    #[clap(subcommand)]
    pub command: RecorderCommands,
}

#[derive(Subcommand, Debug)]
pub enum RecorderCommands {
    /// Print the recorder ID of an identity (0 if it never recorded).
    Id {
        #[clap(value_parser = parse_account)]
        account: AccountId,
    },
    /// Print the identity behind a recorder ID.
    Address { id: u64 },
    /// Print the number of recorders.
    Count,
}

pub fn run(args: RecorderArgs, ledger: &LedgerMachine) -> Result<()> {
    let reader = ledger.reader()?;
    match args.command {
        RecorderCommands::Id { account } => println!("{}", reader.recorder_id(&account)?),
        RecorderCommands::Address { id } => {
            println!("{}", reader.recorder_address(RecorderId(id))?)
        }
        RecorderCommands::Count => println!("{}", reader.recorder_count()?),
    }
    Ok(())
}
