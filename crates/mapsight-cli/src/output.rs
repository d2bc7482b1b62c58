use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use mapsight::{GameData, SnapshotSummary};
use owo_colors::OwoColorize;

/// Where ready frames go: JSON lines to a file and/or stdout.
pub struct SnapshotSink {
    file: Option<BufWriter<File>>,
    stdout: bool,
}

impl SnapshotSink {
    pub fn new(path: Option<&Path>, stdout: bool) -> Result<Self> {
        let file = path
            .map(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map(BufWriter::new)
                    .with_context(|| format!("Failed to open {}", path.display()))
            })
            .transpose()?;
        Ok(Self { file, stdout })
    }

    pub fn is_active(&self) -> bool {
        self.file.is_some() || self.stdout
    }

    pub fn write(&mut self, data: &GameData, now: Instant) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        let line = serde_json::to_string(&data.summary(now))?;
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
            file.flush()?;
        }
        if self.stdout {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

/// One-line human readable status of a frame.
pub fn status_line(summary: &SnapshotSummary) -> String {
    let life = match summary.life_percent {
        Some(p) if p < 35.0 => format!("{:.0}%", p).red().to_string(),
        Some(p) => format!("{:.0}%", p).green().to_string(),
        None => "-".dimmed().to_string(),
    };
    format!(
        "{} [{}] {} ({}) life {} | {} monsters, {} items, {} logged",
        summary.player_name.bold(),
        summary.process_id,
        summary.area.cyan(),
        summary.difficulty,
        life,
        summary.monsters,
        summary.ground_items,
        summary.item_log,
    )
}
