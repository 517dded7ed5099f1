//! jobsearch: fuzzy search over job board listings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobboard_cli::output::{format_count, format_duration, format_score, highlight, Status};
use jobboard_cli::progress;
use jobboard_core::config::Config;
use jobboard_core::error::{exit_codes, Error, ErrorCode};
use jobboard_search::{normalize_jobs, MatchOptions, MetroTable, RawJob, SearchIndex};
use jobboard_telemetry::{metrics, TelemetryConfig, Timer};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jobsearch")]
#[command(author, version, about = "Fuzzy search over job board listings", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a job list
    Search {
        /// Search query (typos are tolerated)
        query: String,
        /// JSON file with an array of jobs ("-" for stdin)
        #[arg(short, long)]
        jobs: PathBuf,
        /// Maximum results to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print timing metrics to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Show the metro bucket for one or more locations
    Location {
        /// Location strings
        #[arg(required = true)]
        locations: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print jobs with their normalized search fields as JSON
    Project {
        /// JSON file with an array of jobs ("-" for stdin)
        #[arg(short, long)]
        jobs: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref().and_then(Path::to_str)) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    jobboard_telemetry::init_with_config(TelemetryConfig::from_logging(
        &config.schema.logging,
        cli.verbose,
    ))?;

    let metros = match MetroTable::from_rules(&config.schema.metros) {
        Ok(table) => table,
        Err(e) => {
            Status::error(&Error::from(e).to_string());
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let exit_code = match cli.command {
        Commands::Search {
            query,
            jobs,
            limit,
            json,
            stats,
        } => run_search(&query, &jobs, limit, json, stats, &config, &metros),
        Commands::Location { locations, json } => run_location(&locations, json, &metros),
        Commands::Project { jobs } => run_project(&jobs, &metros),
        Commands::Config => run_config(&config),
    };

    std::process::exit(exit_code);
}

fn run_search(
    query: &str,
    jobs_path: &Path,
    limit: Option<usize>,
    json: bool,
    stats: bool,
    config: &Config,
    metros: &MetroTable,
) -> i32 {
    let spinner = if json {
        progress::hidden()
    } else {
        progress::spinner("Indexing jobs...")
    };

    let jobs = match load_jobs(jobs_path) {
        Ok(jobs) => jobs,
        Err(e) => {
            progress::finish_error(&spinner, "Failed to load jobs");
            report_error(&e, json);
            return exit_code_for(&e);
        }
    };

    let build = Timer::start("index_build_ms");
    let options = MatchOptions::from(&config.schema.search);
    let index = match SearchIndex::from_jobs(&jobs, metros, options) {
        Ok(index) => index,
        Err(e) => {
            progress::finish_error(&spinner, "Failed to build index");
            report_error(&Error::from(e), json);
            return exit_codes::CONFIG_ERROR;
        }
    };
    let build_time = build.stop();
    spinner.finish_and_clear();

    let timer = Timer::start("search_ms");
    let results = match limit {
        Some(limit) => index.search_with_limit(query, limit),
        None => index.search(query),
    };
    let search_time = timer.stop();
    metrics().increment("searches");
    metrics().increment_by("results", results.len() as u64);

    tracing::info!(
        query,
        jobs = index.len(),
        results = results.len(),
        "Search finished"
    );

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                Status::error(&format!("Failed to serialize results: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else if results.is_empty() {
        Status::info(&format!("No jobs matched \"{}\"", query));
    } else {
        Status::header(&format!(
            "{} for \"{}\"",
            format_count(results.len(), "match", "matches"),
            query
        ));
        for (rank, result) in results.iter().enumerate() {
            let job = &result.item.job;
            println!(
                "{:>3}. {} {} {} {}",
                rank + 1,
                job.position.bold(),
                "·".dimmed(),
                job.company,
                format!("[{}]", format_score(result.score)).dimmed()
            );
            if let Some(location) = job.location.as_deref() {
                println!("     {} ({})", location, result.item.location_n.dimmed());
            }
            for hit in &result.matches {
                println!(
                    "     {} {}",
                    format!("{}:", hit.field.key()).dimmed(),
                    highlight(result.item.field(hit.field), &hit.indices)
                );
            }
        }
        println!();
        Status::success(&format!(
            "Searched {} in {} (index built in {})",
            format_count(index.len(), "job", "jobs"),
            format_duration(search_time),
            format_duration(build_time)
        ));
    }

    if stats {
        eprintln!("{}", metrics().export_json());
    }

    exit_codes::SUCCESS
}

fn run_location(locations: &[String], json: bool, metros: &MetroTable) -> i32 {
    let pairs: Vec<(&str, String)> = locations
        .iter()
        .map(|raw| (raw.as_str(), metros.canonicalize(Some(raw))))
        .collect();

    if json {
        let values: Vec<_> = pairs
            .iter()
            .map(|(raw, bucket)| serde_json::json!({ "location": raw, "locationN": bucket }))
            .collect();
        println!("{}", serde_json::Value::Array(values));
    } else {
        for (raw, bucket) in &pairs {
            println!("{} {} {}", raw, "→".dimmed(), bucket.bold());
        }
    }

    exit_codes::SUCCESS
}

fn run_project(jobs_path: &Path, metros: &MetroTable) -> i32 {
    let jobs = match load_jobs(jobs_path) {
        Ok(jobs) => jobs,
        Err(e) => {
            report_error(&e, true);
            return exit_code_for(&e);
        }
    };

    let projected = normalize_jobs(&jobs, metros);
    match serde_json::to_string_pretty(&projected) {
        Ok(out) => {
            println!("{}", out);
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Failed to serialize jobs: {}", e));
            exit_codes::FAILURE
        }
    }
}

fn run_config(config: &Config) -> i32 {
    match &config.path {
        Some(path) => tracing::info!(path = %path.display(), "Using configuration file"),
        None => tracing::info!("No configuration file found, using defaults"),
    }

    match toml::to_string_pretty(&config.schema) {
        Ok(out) => {
            print!("{}", out);
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Failed to render configuration: {}", e));
            exit_codes::FAILURE
        }
    }
}

/// Read a JSON array of jobs from a file, or from stdin when the path is `-`.
fn load_jobs(path: &Path) -> jobboard_core::Result<Vec<RawJob>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::file_not_found(path),
            _ => Error::from(e),
        })?
    };

    let jobs: Vec<RawJob> =
        serde_json::from_str(&content).map_err(|e| Error::invalid_job_data(path, e))?;

    tracing::debug!(path = %path.display(), jobs = jobs.len(), "Jobs loaded");
    Ok(jobs)
}

/// Print an error, as a JSON report on stdout when the command emits JSON.
fn report_error(err: &Error, json: bool) {
    if json {
        println!("{}", error_json(err));
    } else {
        Status::error(&err.to_string());
    }
}

fn error_json(err: &Error) -> String {
    serde_json::to_string_pretty(&err.to_report()).unwrap_or_else(|_| err.to_string())
}

fn exit_code_for(err: &Error) -> i32 {
    match err.code {
        ErrorCode::InvalidJobData | ErrorCode::InvalidFormat => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn jobs_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_jobs() {
        let file = jobs_file(
            r#"[
                {"id": 1, "position": "Engineer", "company": "Acme", "location": "NYC"},
                {"id": 2, "position": "Designer", "company": "Globex", "location": null}
            ]"#,
        );
        let jobs = load_jobs(file.path()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].extra["id"], 1);
        assert!(jobs[1].location.is_none());
    }

    #[test]
    fn test_load_jobs_invalid_json() {
        let file = jobs_file(r#"{"position": "not an array"}"#);
        let err = load_jobs(file.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJobData);
        assert_eq!(exit_code_for(&err), exit_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_error_json_report() {
        let file = jobs_file("not json");
        let err = load_jobs(file.path()).unwrap_err();
        let report: serde_json::Value = serde_json::from_str(&error_json(&err)).unwrap();
        assert_eq!(report["code"], "INVALID_JOB_DATA");
        assert_eq!(report["code_str"], "E9003");
        assert_eq!(report["category"], "Search");
        assert!(report["suggestion"].is_string());
        assert!(report.get("context").is_none());
    }

    #[test]
    fn test_load_jobs_missing_file() {
        let err = load_jobs(Path::new("/no/such/jobs.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "jobsearch", "search", "softwre enginer", "--jobs", "jobs.json", "--limit", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { query, limit, json, .. } => {
                assert_eq!(query, "softwre enginer");
                assert_eq!(limit, Some(5));
                assert!(!json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_location_requires_argument() {
        assert!(Cli::try_parse_from(["jobsearch", "location"]).is_err());
    }
}
