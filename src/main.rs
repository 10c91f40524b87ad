// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! AutoCSP CLI
//!
//! Generate a Content-Security-Policy for a live page, score a policy, or
//! diff two policies.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autocsp::{
    assess_policy, diff_policies, AnalysisReport, Analyzer, AnalyzerConfig, PolicyDiff,
    RiskAssessment, WaitUntil,
};

#[derive(Parser, Debug)]
#[command(name = "autocsp", version, about = "Content-Security-Policy generator")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(short, long, global = true, help = "Debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a page and propose a policy
    Scan {
        url: String,
        #[arg(long, help = "Make the strict variant the proposed policy")]
        strict: bool,
        #[arg(long, help = "Also load the page in a headless browser")]
        runtime: bool,
        #[arg(long, help = "Crawl same-origin links up to this depth (max 3)")]
        depth: Option<u32>,
        #[arg(long, help = "Per-attempt fetch timeout in milliseconds (3000-45000)")]
        timeout: Option<u64>,
        #[arg(long, help = "Retries after a transport failure")]
        retries: Option<u32>,
        #[arg(long, help = "Pause between crawl requests in milliseconds")]
        crawl_delay: Option<u64>,
        #[arg(long, help = "Runtime wait condition: load, domcontentloaded, networkidle")]
        wait_until: Option<WaitUntil>,
    },
    /// Score a serialized policy
    Assess { policy: String },
    /// Diff two serialized policies
    Diff { old: String, new: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_directive = if cli.verbose { "autocsp=debug" } else { "autocsp=info" };
    let filter = match default_directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let result = match cli.command {
        Commands::Scan {
            url,
            strict,
            runtime,
            depth,
            timeout,
            retries,
            crawl_delay,
            wait_until,
        } => {
            let mut config = AnalyzerConfig::from_env().strict(strict);
            if runtime {
                config = config.runtime(true);
            }
            if let Some(depth) = depth {
                config = config.depth(depth);
            }
            if let Some(ms) = timeout {
                config = config.timeout(Duration::from_millis(ms));
            }
            if let Some(retries) = retries {
                config = config.max_retries(retries);
            }
            if let Some(ms) = crawl_delay {
                config = config.crawl_delay(Duration::from_millis(ms));
            }
            if let Some(wait_until) = wait_until {
                config = config.wait_until(wait_until);
            }
            scan(&url, config, json).await
        }
        Commands::Assess { policy } => print_assessment(&assess_policy(&policy), json),
        Commands::Diff { old, new } => print_diff(&diff_policies(&old, &new), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<autocsp::Error>().and_then(|err| err.kind()) {
                Some(kind) => eprintln!("Failed ({}): {:#}", kind, e),
                None => eprintln!("Failed: {:#}", e),
            }
            ExitCode::from(1)
        }
    }
}

async fn scan(url: &str, config: AnalyzerConfig, json: bool) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(config)?;
    let report = analyzer.analyze(url).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("\nProposed Content-Security-Policy ({}):\n", report.active_mode);
    println!("{}\n", report.policy);

    if let Some(ref existing) = report.existing {
        println!("Existing CSP Detected:");
        println!("{}\n", existing);
    }

    if let Some(diff) = report.active().diff_existing.as_ref().filter(|d| !d.is_empty()) {
        println!("Diff vs existing:");
        print_clauses(diff);
        println!();
    }

    if report.crawl.count > 1 {
        println!("Pages analyzed ({}):", report.crawl.count);
        for page in &report.crawl.pages {
            println!("  - {}", page);
        }
        println!();
    }

    if report.runtime {
        println!("Runtime collection: {}\n", report.runtime_status);
    }

    let risk = &report.risk.active;
    println!("Risk: {} ({})", risk.score, risk.level);
    for issue in &risk.issues {
        println!("  - [-{}] {}", issue.weight, issue.message);
    }

    if !report.notes.is_empty() {
        println!("\nNotes:");
        for note in &report.notes {
            println!("  - {}", note);
        }
    }

    println!("\nRecommended headers:");
    for header in &report.headers {
        println!("  {}: {}", header.name, header.value);
    }
}

fn print_assessment(assessment: &RiskAssessment, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(assessment)?);
        return Ok(());
    }

    println!("Score: {} ({})", assessment.score, assessment.level);
    for issue in &assessment.issues {
        println!("  - {} [-{}]: {}", issue.id, issue.weight, issue.message);
    }
    Ok(())
}

fn print_diff(diff: &PolicyDiff, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diff)?);
        return Ok(());
    }

    if diff.is_empty() {
        println!("Policies are identical");
    } else {
        print_clauses(diff);
    }
    Ok(())
}

fn print_clauses(diff: &PolicyDiff) {
    for clause in &diff.added {
        println!("  + {}", clause);
    }
    for clause in &diff.removed {
        println!("  - {}", clause);
    }
}
