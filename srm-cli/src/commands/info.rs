use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use srm_dat::{Catalog, Header};

use super::resolve_dat;
use crate::error::CliError;

#[derive(Serialize)]
struct CatalogSummary<'a> {
    header: &'a Header,
    games: usize,
    roms: usize,
    clones: usize,
    bios: usize,
    broken_parent_refs: Vec<ParentRef<'a>>,
    problems: Vec<String>,
}

#[derive(Serialize)]
struct ParentRef<'a> {
    game: &'a str,
    parent: &'a str,
}

impl<'a> CatalogSummary<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            header: &catalog.header,
            games: catalog.games.len(),
            roms: catalog.rom_count(),
            clones: catalog.games.iter().filter(|g| g.is_clone()).count(),
            bios: catalog.games.iter().filter(|g| g.isbios).count(),
            broken_parent_refs: catalog
                .broken_parent_refs()
                .into_iter()
                .map(|(game, parent)| ParentRef {
                    game: &game.name,
                    parent,
                })
                .collect(),
            problems: catalog.problems.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Show a DAT file's header and a summary of its contents.
pub(crate) fn run_info(dat: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let path = resolve_dat(dat)?;
    let catalog = Catalog::load(&path)?;
    let summary = CatalogSummary::new(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let header = summary.header;
    log::info!("{}", header.name.if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  File:        {}",
        path.display().if_supports_color(Stdout, |t| t.cyan())
    );
    log::info!("  Description: {}", header.description);
    log::info!("  Version:     {}", header.version);
    log::info!("  Author:      {}", header.author);
    for (label, value) in [
        ("Date", &header.date),
        ("Homepage", &header.homepage),
        ("URL", &header.url),
    ] {
        if !value.is_empty() {
            log::info!("  {:<12} {}", format!("{label}:"), value);
        }
    }
    crate::log_blank();

    log::info!("  Games:  {}", summary.games);
    log::info!("  ROMs:   {}", summary.roms);
    log::info!("  Clones: {}", summary.clones);
    log::info!("  BIOS:   {}", summary.bios);

    if !summary.broken_parent_refs.is_empty() || !summary.problems.is_empty() {
        crate::log_blank();
    }
    for r in &summary.broken_parent_refs {
        log::warn!(
            "{} '{}' refers to missing parent '{}'",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            r.game,
            r.parent,
        );
    }
    for problem in &summary.problems {
        log::warn!(
            "{} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            problem,
        );
    }

    Ok(())
}
