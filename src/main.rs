// Wed Mar 11 2026 - Alex

use clap::Parser;
use colored::Colorize;
use cpp_type_importer::{
    config::{load_skip_list, ImportConfig},
    dump::{RecordInfo, TypeDump},
    importer::{ImportStats, Importer},
    logging,
    registry::InMemoryRegistry,
    snapshot::SnapshotStore,
};
use itertools::Itertools;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Imports C++ type dumps into a type database", long_about = None)]
struct Args {
    /// JSON type dump produced by the dumper frontend.
    dump: PathBuf,

    /// Previous-snapshot cache (defaults to <dump>.imported).
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Skip list, one record name per line (defaults to <dump>.skip).
    #[arg(long)]
    skip: Option<PathBuf>,

    /// Names to import; repeat for multiple. Imports everything if omitted.
    #[arg(short, long)]
    select: Vec<String>,

    /// Write the resulting registry as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    logging::init_logger(args.verbose);

    let mut config = ImportConfig::new(args.dump).with_selection(args.select);
    if let Some(cache) = args.cache {
        config = config.with_cache_path(cache);
    }
    if let Some(skip) = args.skip {
        config = config.with_skip_path(skip);
    }
    config.output_path = args.output;
    config.verbose = args.verbose;

    if let Err(e) = config.validate() {
        eprintln!("{} Invalid configuration: {}", "[!]".red(), e);
        std::process::exit(1);
    }

    let start_time = Instant::now();

    println!("{} Loading type dump: {}", "[*]".blue(), config.dump_path.display());

    let dump = match TypeDump::load(&config.dump_path) {
        Ok(dump) => dump,
        Err(e) => {
            eprintln!("{} Failed to load type dump: {}", "[!]".red(), e);
            std::process::exit(1);
        }
    };

    println!(
        "{} Dump contains {} enums and {} records",
        "[+]".green(),
        dump.enums.len(),
        dump.records.len()
    );

    let mut snapshots = SnapshotStore::load(config.cache_file());
    if !snapshots.is_empty() {
        println!(
            "{} Loaded {} previous snapshots from {}",
            "[+]".green(),
            snapshots.len(),
            config.cache_file().display()
        );
    }

    let skip = load_skip_list(&config.skip_file());
    if !skip.is_empty() {
        println!("{} {} records on the skip list", "[*]".blue(), skip.len());
    }

    let selection: Option<HashSet<String>> = if config.selection.is_empty() {
        None
    } else {
        log::debug!("selection: {}", config.selection.iter().sorted().join(", "));
        Some(config.selection.iter().cloned().collect())
    };

    let mut registry = InMemoryRegistry::new();
    let mut importer = Importer::new(&dump, &mut registry)
        .with_previous(snapshots.records().clone())
        .with_skip_list(skip);

    println!("{} Starting import...", "[*]".blue());

    let stats = match importer.run(selection.as_ref()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("{} Import failed: {}", "[!]".red(), e);
            std::process::exit(1);
        }
    };

    // Refresh the snapshot cache from the current dump for every record
    // that landed in this run's imported set.
    let refreshed: Vec<(String, RecordInfo)> = dump
        .records
        .iter()
        .filter(|record| importer.was_imported(&record.name))
        .filter_map(|record| {
            importer
                .record(&record.name)
                .map(|authoritative| (record.name.clone(), authoritative.clone()))
        })
        .collect();
    drop(importer);

    for (name, record) in refreshed {
        snapshots.absorb(name, record);
    }
    if let Err(e) = snapshots.save() {
        eprintln!("{} Failed to save snapshot cache: {}", "[!]".red(), e);
    } else {
        println!(
            "{} Snapshot cache saved to: {}",
            "[+]".green(),
            config.cache_file().display()
        );
    }

    if let Some(output) = &config.output_path {
        match serde_json::to_string_pretty(registry.types()) {
            Ok(json) => {
                if let Err(e) = fs::write(output, json) {
                    eprintln!("{} Failed to write registry export: {}", "[!]".red(), e);
                } else {
                    println!("{} Registry exported to: {}", "[+]".green(), output.display());
                }
            }
            Err(e) => eprintln!("{} Failed to serialize registry: {}", "[!]".red(), e),
        }
    }

    print_summary(&stats, registry.len(), start_time.elapsed().as_secs_f64());
}

fn print_summary(stats: &ImportStats, registry_entries: usize, elapsed: f64) {
    println!();
    println!("{}", "Import Summary".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    println!("  Enums imported: {}", stats.enums.to_string().green());
    println!("  Records committed: {}", stats.committed.to_string().green());
    println!("  Up to date: {}", stats.up_to_date.to_string().green());
    println!("  Skipped: {}", stats.skipped.to_string().yellow());
    println!("  Placeholders created: {}", stats.placeholders.to_string().green());
    println!("  Registry entries: {}", registry_entries.to_string().green());
    println!();
    println!("{} Import complete in {:.2}s", "[+]".green(), elapsed);
}
