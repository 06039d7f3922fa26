use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use srm_dat::{Catalog, ChecksumIndex, DatError, MatchOutcome, RomMatch, hash_file_with_progress};

use super::resolve_dat;
use crate::error::CliError;

/// Files at least this large get a progress bar while hashing.
const PROGRESS_THRESHOLD: u64 = 16 * 1024 * 1024; // 16 MB

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    candidates: Vec<Candidate<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Candidate<'a> {
    game: &'a str,
    rom: &'a str,
    size: u64,
}

impl<'a> FileReport<'a> {
    fn new(path: &Path, result: &Result<MatchOutcome<'a>, DatError>) -> Self {
        let (candidates, error) = match result {
            Ok(outcome) => (outcome.candidates().into_iter().map(Candidate::from).collect(), None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };
        Self {
            path: path.display().to_string(),
            status: status_label(result),
            candidates,
            error,
        }
    }
}

impl<'a> From<RomMatch<'a>> for Candidate<'a> {
    fn from(m: RomMatch<'a>) -> Self {
        Self {
            game: &m.game.name,
            rom: &m.rom.name,
            size: m.rom.size,
        }
    }
}

fn status_label(result: &Result<MatchOutcome<'_>, DatError>) -> &'static str {
    match result {
        Ok(MatchOutcome::Unique(_)) => "matched",
        Ok(MatchOutcome::Ambiguous(_)) => "ambiguous",
        Ok(MatchOutcome::Unmatched) => "unmatched",
        Err(DatError::InconsistentMatch { .. }) => "inconsistent",
        Err(_) => "error",
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    matched: usize,
    ambiguous: usize,
    unmatched: usize,
    errors: usize,
}

impl Tally {
    fn record(&mut self, result: &Result<MatchOutcome<'_>, DatError>) {
        match result {
            Ok(MatchOutcome::Unique(_)) => self.matched += 1,
            Ok(MatchOutcome::Ambiguous(_)) => self.ambiguous += 1,
            Ok(MatchOutcome::Unmatched) => self.unmatched += 1,
            Err(_) => self.errors += 1,
        }
    }
}

/// Classify each file against the DAT. Never modifies the files.
pub(crate) fn run_status(
    dat: Option<PathBuf>,
    files: &[PathBuf],
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let dat_path = resolve_dat(dat)?;
    let catalog = Catalog::load(&dat_path)?;
    for problem in &catalog.problems {
        log::debug!("Skipped DAT record: {problem}");
    }
    let index = ChecksumIndex::from_catalog(catalog);
    log::debug!(
        "Indexed {} games, {} ROMs ({} CRC32, {} MD5)",
        index.game_count(),
        index.rom_count(),
        index.crc_count(),
        index.md5_count(),
    );

    let mut tally = Tally::default();
    for file in files {
        let result = check_file(&index, file, quiet || json);
        tally.record(&result);
        if json {
            println!("{}", serde_json::to_string(&FileReport::new(file, &result))?);
        } else {
            print_result(file, &result);
        }
    }

    if !json && files.len() > 1 {
        crate::log_blank();
        log::info!(
            "{} matched, {} ambiguous, {} unmatched, {} errors",
            tally.matched.if_supports_color(Stdout, |t| t.green()),
            tally.ambiguous.if_supports_color(Stdout, |t| t.yellow()),
            tally.unmatched,
            tally.errors.if_supports_color(Stdout, |t| t.red()),
        );
    }
    Ok(())
}

fn check_file<'a>(
    index: &'a ChecksumIndex,
    path: &Path,
    hide_progress: bool,
) -> Result<MatchOutcome<'a>, DatError> {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if hide_progress || size < PROGRESS_THRESHOLD {
        return index.match_file(path);
    }

    let pb = ProgressBar::new(size);
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
            .expect("static pattern")
            .progress_chars("=> "),
    );
    pb.set_message(file_name(path));
    let hashes = hash_file_with_progress(path, None, &|done, _| pb.set_position(done));
    pb.finish_and_clear();
    index.classify(&hashes?)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_result(path: &Path, result: &Result<MatchOutcome<'_>, DatError>) {
    let shown = path.display();
    match result {
        Ok(MatchOutcome::Unique(m)) => log::info!(
            "{} {}: {} / {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            shown,
            m.game.name.if_supports_color(Stdout, |t| t.bold()),
            m.rom.name,
        ),
        Ok(MatchOutcome::Ambiguous(candidates)) => {
            log::info!(
                "{} {}: {} candidates",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                shown,
                candidates.len(),
            );
            for m in candidates {
                log::info!(
                    "    {} / {}",
                    m.game.name.if_supports_color(Stdout, |t| t.bold()),
                    m.rom.name
                );
            }
        }
        Ok(MatchOutcome::Unmatched) => log::info!(
            "{} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            shown,
            "no match".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        Err(e) => log::warn!(
            "{} {}: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            shown,
            e,
        ),
    }
}

#[cfg(test)]
#[path = "../tests/status_tests.rs"]
mod tests;
