//! # libscan - Main Entry Point
//!
//! Audits every running process (or the ones selected on the command line)
//! and prints which of them still map a library that no longer matches the
//! expected build-id manifest.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::io::{self, Write};
use std::time::Duration;

use libscan::audit::audit;
use libscan::cli::Args;
use libscan::compliance::{ComplianceReport, FileManifest, HttpManifest, ManifestSource};
use libscan::domain::Pid;
use libscan::fingerprint::ElfFingerprinter;
use libscan::preflight::{check_process_exists, run_preflight_checks};
use libscan::procfs::ProcFs;
use libscan::scan::ScanOptions;

// Exit codes (2 is clap's usage error)
const EXIT_SUCCESS: i32 = 0;
const EXIT_OUTDATED: i32 = 1;
const EXIT_ERROR: i32 = 3;

fn main() {
    let args = Args::parse();
    init_logging(args.quiet);

    std::process::exit(match run(&args) {
        Ok(report) => exit_code_for(&report, args.report_only),
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// `LOGLEVEL` wins over `RUST_LOG`
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let env = if std::env::var_os("LOGLEVEL").is_some() {
        Env::new().filter("LOGLEVEL")
    } else {
        Env::default().default_filter_or(default_level)
    };
    env_logger::Builder::from_env(env).format_timestamp(None).init();
}

fn exit_code_for(report: &ComplianceReport, report_only: bool) -> i32 {
    if report.is_compliant() || report_only {
        EXIT_SUCCESS
    } else {
        EXIT_OUTDATED
    }
}

fn manifest_source(args: &Args) -> Box<dyn ManifestSource> {
    match &args.manifest_file {
        Some(path) => Box::new(FileManifest { path: path.clone() }),
        None => Box::new(HttpManifest::new(&args.manifest_url, Duration::from_secs(args.timeout))),
    }
}

fn run(args: &Args) -> Result<ComplianceReport> {
    run_preflight_checks(args.quiet)?;

    let pids: Vec<Pid> = args.pids.iter().copied().map(Pid).collect();
    for &pid in &pids {
        check_process_exists(pid)?;
    }

    let options = ScanOptions {
        pids,
        process_name: args.process.clone(),
        shared_objects_only: args.shared_objects_only,
    };

    if !args.quiet {
        eprintln!("libscan v{}", env!("CARGO_PKG_VERSION"));
    }

    let source = manifest_source(args);
    let report = audit(&ProcFs, ElfFingerprinter, source.as_ref(), &options)
        .context("Audit did not complete")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        report.write_json(&mut out).context("Failed to write JSON report")?;
    } else {
        report.write_text(&mut out).context("Failed to write report")?;
    }
    out.flush()?;

    if !args.quiet {
        eprintln!("{}", report.summary());
    }

    Ok(report)
}
