// Path: crates/cli/src/commands/query.rs

use crate::util::print_json;
use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook_execution::LedgerMachine;
use gradebook_types::app::{EvaluationId, RecorderId, StudentId};

#[derive(Parser, Debug)]
pub struct QueryArgs {
    #[clap(subcommand)]
    pub command: QueryCommands,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// Print an evaluation by its global ID.
    Evaluation { id: u64 },
    /// Print the INDEX-th evaluation submitted by a recorder.
    ByRecorder { recorder: u64, index: u64 },
    /// Print the INDEX-th evaluation of a student.
    ByStudent { student: u64, index: u64 },
    /// Print the number of evaluations, optionally for one recorder or student.
    Count {
        #[clap(long, conflicts_with = "student")]
        recorder: Option<u64>,
        #[clap(long)]
        student: Option<u64>,
    },
}

pub fn run(args: QueryArgs, ledger: &LedgerMachine) -> Result<()> {
    let reader = ledger.reader()?;
    match args.command {
        QueryCommands::Evaluation { id } => print_json(&reader.evaluation(EvaluationId(id))?),
        QueryCommands::ByRecorder { recorder, index } => {
            print_json(&reader.evaluation_by_recorder(RecorderId(recorder), index)?)
        }
        QueryCommands::ByStudent { student, index } => {
            print_json(&reader.evaluation_by_student(StudentId(student), index)?)
        }
        QueryCommands::Count { recorder, student } => {
            let count = match (recorder, student) {
                (Some(r), _) => reader.evaluation_count_by_recorder(RecorderId(r))?,
                (None, Some(s)) => reader.evaluation_count_by_student(StudentId(s))?,
                (None, None) => reader.evaluation_count()?,
            };
            println!("{}", count);
            Ok(())
        }
    }
}
