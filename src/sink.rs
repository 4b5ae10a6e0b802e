//! CSV output sink
//!
//! One timestamp-named file per run, one line per qualifying upset. Text
//! fields are double-quoted with embedded quotes doubled; numeric fields are
//! written bare. Field order is the output contract: winner name, winner
//! pronouns, winner seed, opponent name, opponent pronouns, opponent seed,
//! factor, tournament name, event name, start time in milliseconds.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::AppError;
use crate::upsets::UpsetRecord;

pub struct CsvSink {
    file: File,
    path: PathBuf,
}

impl CsvSink {
    /// Creates the output directory if needed and opens a new file named
    /// after the current time in milliseconds.
    pub async fn create(output_dir: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(output_dir).await?;
        let path = output_dir.join(format!("{}.csv", chrono::Utc::now().timestamp_millis()));
        let file = File::create(&path).await?;
        info!("Writing upset records to {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_record(&mut self, record: &UpsetRecord) -> Result<(), AppError> {
        self.file
            .write_all(format_record(record).as_bytes())
            .await?;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), AppError> {
        self.file.flush().await?;
        Ok(())
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Formats one record as a CSV line, newline included.
pub fn format_record(record: &UpsetRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{}\n",
        quote(&record.winner_name),
        quote(&record.winner_pronouns),
        record.winner_seed,
        quote(&record.opponent_name),
        quote(&record.opponent_pronouns),
        record.opponent_seed,
        record.factor,
        quote(&record.tournament_name),
        quote(&record.event_name),
        record.start_at_ms,
    )
}
