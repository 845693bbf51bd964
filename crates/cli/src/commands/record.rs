// Path: crates/cli/src/commands/record.rs

use crate::util::{parse_account, print_events};
use anyhow::{bail, Result};
use clap::Parser;
use gradebook_execution::LedgerMachine;
use gradebook_types::app::{AccountId, LedgerEvent, ScoreInput, StudentId, StudentText};
use tokio::sync::broadcast;

/// Scores are decimal grades (e.g. `7.4`), stored scaled by ten.
#[derive(Parser, Debug)]
pub struct RecordArgs {
    /// The recorder's identity (hex).
    #[clap(long, value_parser = parse_account)]
    pub signer: AccountId,

    /// An already registered student.
    #[clap(long, conflicts_with = "student_text")]
    pub student_id: Option<u64>,

    /// A student text identifier; registered on first use.
    #[clap(long)]
    pub student_text: Option<StudentText>,

    #[clap(long)]
    pub activity: u64,

    #[clap(long, allow_negative_numbers = true)]
    pub complexity: f64,
    #[clap(long, allow_negative_numbers = true)]
    pub effort: f64,
    #[clap(long, allow_negative_numbers = true)]
    pub weight: f64,
    #[clap(long, allow_negative_numbers = true)]
    pub points: f64,
    #[clap(long, allow_negative_numbers = true)]
    pub weighted_points: f64,
}

impl RecordArgs {
    fn scores(&self) -> ScoreInput {
        ScoreInput::from_decimals([
            self.complexity,
            self.effort,
            self.weight,
            self.points,
            self.weighted_points,
        ])
    }
}

pub fn run(
    args: RecordArgs,
    ledger: &LedgerMachine,
    events: &mut broadcast::Receiver<LedgerEvent>,
) -> Result<()> {
    let scores = args.scores();
    let id = match (args.student_id, args.student_text) {
        (Some(student_id), None) => {
            ledger.record_evaluation(args.signer, StudentId(student_id), args.activity, &scores)?
        }
        (None, Some(text)) => ledger.record_evaluation_for_student_text(
            args.signer,
            &text,
            args.activity,
            &scores,
        )?,
        _ => bail!("exactly one of --student-id or --student-text is required"),
    };
    println!("{}", id);
    print_events(events)
}
