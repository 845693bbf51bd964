// Path: crates/cli/src/commands/import.rs

use crate::util::{parse_account, print_events};
use anyhow::{Context, Result};
use clap::Parser;
use gradebook_execution::LedgerMachine;
use gradebook_types::app::{AccountId, LedgerEvent, ScoreInput, StudentText};
use gradebook_types::error::TransactionError;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// A JSON array of evaluation rows.
    pub file: PathBuf,

    /// The recorder's identity (hex).
    #[clap(long, value_parser = parse_account)]
    pub signer: AccountId,
}

/// One row of a grade sheet export. Scores are decimal grades.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub id_alumno: String,
    pub id_oa: u64,
    pub complejidad_oa: f64,
    pub esfuerzo_oa: f64,
    pub peso_oa: f64,
    pub puntos: f64,
    pub puntos_pond: f64,
}

impl ImportRow {
    fn student_text(&self) -> Result<StudentText, TransactionError> {
        StudentText::from_bytes(self.id_alumno.as_bytes()).map_err(TransactionError::InvalidInput)
    }

    fn scores(&self) -> ScoreInput {
        ScoreInput::from_decimals([
            self.complejidad_oa,
            self.esfuerzo_oa,
            self.peso_oa,
            self.puntos,
            self.puntos_pond,
        ])
    }
}

pub fn parse_rows(raw: &str) -> Result<Vec<ImportRow>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn run(
    args: ImportArgs,
    ledger: &LedgerMachine,
    events: &mut broadcast::Receiver<LedgerEvent>,
) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let rows = parse_rows(&raw).with_context(|| format!("invalid rows in {}", args.file.display()))?;

    for (i, row) in rows.iter().enumerate() {
        let text = row.student_text().with_context(|| format!("row {}", i))?;
        ledger
            .record_evaluation_for_student_text(args.signer, &text, row.id_oa, &row.scores())
            .with_context(|| format!("row {} ({})", i, row.id_alumno))?;
        print_events(events)?;
    }
    tracing::info!(target: "cli", rows = rows.len(), "import complete");
    Ok(())
}
