use std::path::{Path, PathBuf};

use eqchannel_core::context::{AppConfig, resolve_log_path};
use eqchannel_core::enrichment::enrich_records;
use eqchannel_core::game_data::{SpellLevelResolver, SpellTable, WikiCache};
use eqchannel_core::models::Model;
use eqchannel_core::report::{HitBreakdown, HitTally, MaxHitsReport, ModelComparison};
use eqchannel_core::storage::{read_raw_records, read_records, write_enriched_file, write_raw_file};
use eqchannel_core::{
    CastAttemptRecord, EnrichedRecord, FileOutcome, ProcessOptions, process_directory,
    process_file, scan_directory,
};

fn log_dir(config: &AppConfig, dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| PathBuf::from(&config.log_directory))
}

fn write_records(path: &Path, records: &[CastAttemptRecord], summary: bool) -> Result<(), String> {
    write_raw_file(path, records).map_err(|e| e.to_string())?;
    println!("Wrote {} records to {}", records.len(), path.display());
    if summary {
        print!("{}", HitTally::from_records(records).render());
    }
    Ok(())
}

pub fn parse_directory(
    config: &AppConfig,
    dir: Option<PathBuf>,
    out: Option<PathBuf>,
    sequential: bool,
    summary: bool,
) -> Result<(), String> {
    let dir = log_dir(config, dir);
    let mut options = ProcessOptions::from_config(config);
    if sequential {
        options.parallel = false;
    }

    let output = process_directory(&dir, &options).map_err(|e| e.to_string())?;
    let stats = output.summary;
    println!(
        "Files: {} parsed, {} rejected, {} unreadable",
        stats.files_parsed, stats.files_rejected, stats.files_unreadable
    );
    for outcome in &output.outcomes {
        match outcome {
            FileOutcome::Rejected { reason, .. } => {
                println!("  skipped {}: {reason}", outcome.path().display());
            }
            FileOutcome::Unreadable { error, .. } => {
                println!("  unreadable {}: {error}", outcome.path().display());
            }
            FileOutcome::Parsed { .. } => {}
        }
    }

    let out = out.unwrap_or_else(|| PathBuf::from(&config.raw_output));
    write_records(&out, &output.into_records(), summary)
}

pub fn parse_file(
    config: &AppConfig,
    file: &Path,
    out: Option<PathBuf>,
    summary: bool,
) -> Result<(), String> {
    let path = resolve_log_path(config, file);
    let options = ProcessOptions::from_config(config);

    let records = match process_file(&path, &options) {
        FileOutcome::Parsed { records, .. } => records,
        FileOutcome::Rejected { reason, .. } => {
            return Err(format!("{}: {reason}", path.display()));
        }
        FileOutcome::Unreadable { error, .. } => {
            return Err(format!("{}: {error}", path.display()));
        }
    };

    let out = out.unwrap_or_else(|| PathBuf::from(&config.raw_output));
    write_records(&out, &records, summary)
}

pub fn enrich(
    config: &AppConfig,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
    spell_table: Option<PathBuf>,
    wiki_cache: Option<PathBuf>,
) -> Result<(), String> {
    let input = input.unwrap_or_else(|| PathBuf::from(&config.raw_output));
    let out = out.unwrap_or_else(|| PathBuf::from(&config.enriched_output));

    let mut resolver = SpellLevelResolver::new();
    if let Some(path) = spell_table.or_else(|| config.spell_table_path()) {
        let table = SpellTable::load(&path).map_err(|e| e.to_string())?;
        tracing::info!(path = %path.display(), spells = table.len(), "Loaded spell table");
        resolver.add_source(Box::new(table));
    }
    if let Some(dir) = wiki_cache.or_else(|| config.wiki_cache_dir.clone()) {
        resolver.add_source(Box::new(WikiCache::new(dir)));
    }

    let (records, stats) = read_raw_records(&input).map_err(|e| e.to_string())?;
    let (enriched, summary) = enrich_records(records, &mut resolver);
    write_enriched_file(&out, &enriched).map_err(|e| e.to_string())?;

    println!(
        "Enriched {} records ({} rows skipped) into {}",
        summary.records,
        stats.skipped,
        out.display()
    );
    for (spell, class) in &summary.unknown_spells {
        println!("  unknown spell level: {spell} ({class})");
    }
    Ok(())
}

fn load_enriched(config: &AppConfig, input: Option<PathBuf>) -> Result<Vec<EnrichedRecord>, String> {
    let input = input.unwrap_or_else(|| PathBuf::from(&config.enriched_output));
    println!("Reading data from {}...", input.display());
    println!();
    let (records, _) = read_records(&input).map_err(|e| e.to_string())?;
    Ok(records)
}

pub fn compare(config: &AppConfig, input: Option<PathBuf>) -> Result<(), String> {
    let records = load_enriched(config, input)?;
    let comparison = ModelComparison::from_records(&records, &Model::ALL);
    print!("{}", comparison.render(config.number_format));
    Ok(())
}

pub fn validate(config: &AppConfig, input: Option<PathBuf>) -> Result<(), String> {
    let records = load_enriched(config, input)?;
    let comparison = ModelComparison::from_records(&records, &[Model::Exponential]);
    println!("=== Model Validation Report ===");
    print!("{}", comparison.render(config.number_format));
    Ok(())
}

pub fn by_hits(config: &AppConfig, input: Option<PathBuf>) -> Result<(), String> {
    let records = load_enriched(config, input)?;
    print!("{}", HitBreakdown::from_records(&records).render(config.number_format));
    Ok(())
}

pub fn max_hits(config: &AppConfig, dir: Option<PathBuf>) -> Result<(), String> {
    let dir = log_dir(config, dir);
    // Every log counts here, including ones the parse pass would reject
    let records = scan_directory(&dir, &ProcessOptions::from_config(config))
        .map_err(|e| e.to_string())?;
    print!("{}", MaxHitsReport::from_records(&records).render());
    Ok(())
}

pub fn show_config(config: &AppConfig, path: Option<&Path>) -> Result<(), String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_path().map_err(|e| e.to_string())?,
    };
    println!("Config file: {}", path.display());
    println!("log_directory: {}", config.log_directory);
    println!("raw_output: {}", config.raw_output);
    println!("enriched_output: {}", config.enriched_output);
    println!(
        "infrastructure_tokens: {}",
        config.infrastructure_tokens.join(", ")
    );
    println!(
        "spell_table: {}",
        config
            .spell_table_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "wiki_cache_dir: {}",
        config
            .wiki_cache_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("parallel: {}", config.parallel);
    println!("number_format: {:?}", config.number_format);
    Ok(())
}

pub fn set_directory(mut config: AppConfig, path: String, config_path: Option<&Path>) -> Result<(), String> {
    if !Path::new(&path).is_dir() {
        tracing::warn!(path = %path, "Log directory does not exist yet");
    }
    config.log_directory = path;
    config.store(config_path).map_err(|e| e.to_string())?;
    println!("Log directory set to {}", config.log_directory);
    Ok(())
}
