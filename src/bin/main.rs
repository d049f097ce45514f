// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use point_ledger_rs::{BalanceStore, Ledger, MemoryStore, UserId};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Point Ledger - Process operation CSV files
///
/// Reads charge/use operations from a CSV file and outputs final balances
/// to stdout.
#[derive(Parser, Debug)]
#[command(name = "point-ledger-rs")]
#[command(about = "A point ledger that processes operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,user,amount
    /// Example: cargo run -- operations.csv > balances.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::new(Arc::clone(&store));

    if let Err(e) = process_operations(BufReader::new(file), &ledger) {
        eprintln!("Error processing operations: {}", e);
        process::exit(1);
    }

    if let Err(e) = write_balances(&store, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, user, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    user: i64,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<i64>,
}

/// Process operations from a CSV reader.
///
/// Streaming: rows are applied one at a time, so arbitrarily large files
/// never load fully into memory. Malformed rows and rejected operations
/// are skipped; processing continues with the next row.
///
/// # CSV Format
///
/// Expected columns: `op, user, amount`
/// - `op`: `charge` or `use`
/// - `user`: user id (positive integer)
/// - `amount`: points (non-negative integer)
///
/// # Errors
///
/// Returns a CSV error if the reader itself fails. Individual operation
/// errors are logged and do not stop processing.
pub fn process_operations<R: Read>(
    reader: R,
    ledger: &Ledger<impl BalanceStore>,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed row");
                continue;
            }
        };

        let user_id = UserId(record.user);
        let Some(amount) = record.amount else {
            tracing::warn!(user = %user_id, "skipping row without amount");
            continue;
        };

        let outcome = match record.op.to_lowercase().as_str() {
            "charge" => ledger.charge(user_id, amount),
            "use" => ledger.use_points(user_id, amount),
            other => {
                tracing::warn!(op = other, "skipping unknown operation");
                continue;
            }
        };

        if let Err(e) = outcome {
            tracing::warn!(user = %user_id, op = %record.op, amount, error = %e, "operation rejected");
        }
    }

    Ok(())
}

/// Write final balances to a CSV writer.
///
/// Columns: `user_id, balance, updated_at`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_balances<W: Write>(store: &MemoryStore, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for balance in store.balances() {
        wtr.serialize(balance)?;
    }

    wtr.flush()?;
    Ok(())
}
