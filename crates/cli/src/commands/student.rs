// Path: crates/cli/src/commands/student.rs

use crate::util::{parse_account, print_events};
use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook_execution::LedgerMachine;
use gradebook_types::app::{AccountId, LedgerEvent, StudentId, StudentText};
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
pub struct StudentArgs {
    #[clap(subcommand)]
    pub command: StudentCommands,
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// Register a new student. Fails if the text is already registered.
    Add {
        text: StudentText,
        /// The caller identity (hex). Defaults to the zero account.
        #[clap(long, value_parser = parse_account)]
        signer: Option<AccountId>,
    },
    /// Print the ID bound to a text identifier (0 if none).
    Id { text: StudentText },
    /// Print the text identifier bound to an ID.
    Text { id: u64 },
    /// Print the number of registered students.
    Count,
}

pub fn run(
    args: StudentArgs,
    ledger: &LedgerMachine,
    events: &mut broadcast::Receiver<LedgerEvent>,
) -> Result<()> {
    match args.command {
        StudentCommands::Add { text, signer } => {
            let id = ledger.make_student_id(signer.unwrap_or_default(), &text)?;
            println!("{}", id);
            print_events(events)
        }
        StudentCommands::Id { text } => {
            println!("{}", ledger.reader()?.student_id(&text)?);
            Ok(())
        }
        StudentCommands::Text { id } => {
            println!("{}", ledger.reader()?.student_text(StudentId(id))?);
            Ok(())
        }
        StudentCommands::Count => {
            println!("{}", ledger.reader()?.student_count()?);
            Ok(())
        }
    }
}
