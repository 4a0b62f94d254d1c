//! Key Findings cache CLI — 缓存批量清除、统计与指纹调试的命令行工具
//!
//! Usage:
//!   key-findings-cli clear [--db <path>]                 Delete every cached report
//!   key-findings-cli stats [--db <path>]                 Show cache statistics
//!   key-findings-cli fingerprint <tool> --sources <a,b>  Print a scenario's cache keys

use key_findings::store::{FileReportStore, ReportStore};
use key_findings::{DateRange, Language, Scenario, SourceRef, SourceRegistry};
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "clear" => cmd_clear(&args[2..]),
        "stats" => cmd_stats(&args[2..]),
        "fingerprint" => cmd_fingerprint(&args[2..]),
        "version" | "--version" | "-V" => cmd_version(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"key-findings-cli — Key Findings 缓存命令行工具

USAGE:
    key-findings-cli <COMMAND> [OPTIONS]

COMMANDS:
    clear [--db <path>]                       Delete every cached report (bulk invalidation)
    stats [--db <path>]                       Show report-cache statistics
    fingerprint <tool> --sources <a,b,...>    Print the fingerprint and combination key
                [--language es|en]            for a scenario (sources accept numeric IDs
                [--from YYYY-MM-DD]           or any name variant)
                [--to YYYY-MM-DD]
    version                                   Show version information
    help                                      Show this help message

ENVIRONMENT:
    KEY_FINDINGS_DB                           Default report-store path"#
    );
}

fn cmd_version() {
    println!("key-findings-cli {}", env!("CARGO_PKG_VERSION"));
}

fn resolve_db_path(args: &[String]) -> PathBuf {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--db" {
            if let Some(path) = args.get(i + 1) {
                return PathBuf::from(path);
            }
        }
    }
    if let Ok(path) = std::env::var("KEY_FINDINGS_DB") {
        return PathBuf::from(path);
    }
    PathBuf::from("key_findings.json")
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[tokio::main]
async fn cmd_clear(args: &[String]) {
    let path = resolve_db_path(args);
    let store = match FileReportStore::open(&path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open report store at {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match store.delete_all().await {
        Ok(count) => println!("Deleted {count} cached report(s) from {}", path.display()),
        Err(e) => {
            eprintln!("Cache clear failed: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn cmd_stats(args: &[String]) {
    let path = resolve_db_path(args);
    let store = match FileReportStore::open(&path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open report store at {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match store.len().await {
        Ok(count) => {
            println!("Report store: {}", path.display());
            println!("Cached reports: {count}");
        }
        Err(e) => {
            eprintln!("Stats failed: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_fingerprint(args: &[String]) {
    let Some(tool) = args.first().filter(|a| !a.starts_with("--")) else {
        eprintln!("fingerprint requires a tool name");
        std::process::exit(1);
    };

    let Some(sources_arg) = flag_value(args, "--sources") else {
        eprintln!("fingerprint requires --sources <a,b,...>");
        std::process::exit(1);
    };
    let sources: Vec<SourceRef> = sources_arg
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| match token.parse::<u32>() {
            Ok(id) => SourceRef::Id(id),
            Err(_) => SourceRef::from(token),
        })
        .collect();

    let language = match flag_value(args, "--language") {
        Some(code) => match code.parse::<Language>() {
            Ok(language) => language,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => Language::Es,
    };

    let mut scenario = Scenario::new(tool.as_str(), sources, language);
    if let (Some(from), Some(to)) = (flag_value(args, "--from"), flag_value(args, "--to")) {
        match DateRange::new(from, to) {
            Ok(range) => scenario = scenario.with_date_range(range),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    match scenario.normalize(SourceRegistry::builtin()) {
        Ok(canonical) => {
            println!("tool:            {}", canonical.tool_name());
            println!("sources:         {}", canonical.sources().join(", "));
            println!("language:        {}", canonical.language());
            println!("fingerprint:     {}", canonical.fingerprint());
            println!("combination key: {}", canonical.combination_key().encode());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
