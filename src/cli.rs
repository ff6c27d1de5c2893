use std::env;
use std::path::Path;
use std::sync::Arc;

use crate::content::file_store::{load_libraries, FileStore};
use crate::content::store::ContentStore;
use crate::convert::icons::IconConfig;
use crate::import::batch::{ImportOptions, Importer};
use crate::import::report::write_report_csv;
use crate::schema::source::load_source_npcs;
use crate::server;
use crate::validate::validate_npc_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Import,
    Validate,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("import") => Some(Command::Import),
        Some("validate") => Some(Command::Validate),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Import) => handle_import(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Serve) => handle_serve(),
        None => {
            eprintln!("usage: konoha <import|validate|serve>");
            2
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn handle_import(args: &[String]) -> i32 {
    let Some(path) = args.get(2).filter(|arg| !arg.starts_with("--")) else {
        eprintln!(
            "usage: konoha import <npcs.json> [data_dir] [--include-existing] [--report-csv <path>]"
        );
        return 2;
    };
    let data_dir = args
        .get(3)
        .filter(|arg| !arg.starts_with("--"))
        .cloned()
        .or_else(|| env::var("KONOHA_DATA").ok())
        .unwrap_or_else(|| "data".to_string());
    let include_existing = args.iter().any(|arg| arg == "--include-existing");
    let report_csv = flag_value(args, "--report-csv");

    let npcs = match load_source_npcs(path) {
        Ok(npcs) => npcs,
        Err(err) => {
            eprintln!("import failed: {err}");
            return 1;
        }
    };

    let icons = IconConfig::load(Path::new(&data_dir).join("icons.yaml")).unwrap_or_default();
    let store = Arc::new(FileStore::new(&data_dir)) as Arc<dyn ContentStore>;
    let libraries = load_libraries(&data_dir);
    let importer = Importer::new(store, libraries, icons);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("import failed: could not start runtime: {err}");
            return 1;
        }
    };

    let progress = |current: usize, total: usize, name: &str| {
        println!("importing {current}/{total}: {name}");
    };
    let options = ImportOptions {
        skip_existing: !include_existing,
        progress: Some(&progress),
    };
    let batch = runtime.block_on(importer.import_batch(&npcs, &options));

    for name in &batch.skipped {
        println!("  skipped {name} (already exists)");
    }
    for failure in &batch.failed {
        eprintln!("  failed {}: {}", failure.name, failure.error);
    }
    for imported in &batch.success {
        let created = imported
            .report
            .iter()
            .filter(|entry| entry.origin == "created")
            .count();
        let reused = imported.report.len().saturating_sub(created);
        println!(
            "  imported {} ({} items: {created} created, {reused} reused)",
            imported.name,
            imported.report.len()
        );
    }
    println!("import complete: {}", batch.summary());

    if let Some(report_path) = report_csv {
        if let Err(err) = write_report_csv(report_path, &batch) {
            eprintln!("failed to write report csv '{report_path}': {err}");
            return 1;
        }
        println!("report written to {report_path}");
    }

    0
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: konoha validate <npcs.json>");
        return 2;
    };
    match validate_npc_file(path) {
        Ok(report) => {
            for diag in &report.diagnostics {
                println!("{}: {} - {}", diag.severity, diag.context, diag.message);
            }
            if report.has_errors() {
                let errors = report
                    .diagnostics
                    .iter()
                    .filter(|d| d.severity == crate::validate::ValidationSeverity::Error)
                    .count();
                eprintln!("validation failed: {errors} error(s)");
                1
            } else {
                println!("validation passed ({} diagnostics)", report.diagnostics.len());
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("KONOHA_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command(&args(&["konoha", "import"])), Some(Command::Import));
        assert_eq!(
            parse_command(&args(&["konoha", "validate"])),
            Some(Command::Validate)
        );
        assert_eq!(parse_command(&args(&["konoha", "serve"])), Some(Command::Serve));
    }

    #[test]
    fn unknown_or_missing_command_is_none() {
        assert_eq!(parse_command(&args(&["konoha"])), None);
        assert_eq!(parse_command(&args(&["konoha", "export"])), None);
    }
}
