use leadsweep::sweep::{
    run_sweep, ConfirmationPort, ExecutionReport, Summary, SweepMode, SweepOutcome,
};
use leadsweep::{LeadsweepConfig, RestClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct StdinConfirmation;

impl ConfirmationPort for StdinConfirmation {
    fn confirm(&self, summary: &Summary) -> bool {
        println!();
        println!(
            "⚠️  About to permanently delete {} records. Type 'yes' to continue:",
            summary.total
        );

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        line.trim().eq_ignore_ascii_case("yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = LeadsweepConfig::from_env();
    let mut dry_run = false;
    let mut force = false;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    config.url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--key" | "-k" => {
                if i + 1 < args.len() {
                    config.service_key = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--age-days" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(days) => config.rules.age_threshold_days = days,
                        Err(_) => {
                            eprintln!("❌ --age-days expects a number, got '{}'", args[i + 1]);
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                }
            }
            "--dry-run" => dry_run = true,
            "--force" | "-f" => force = true,
            "--json" => json = true,
            "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("❌ Unknown argument: {}", other);
                eprintln!("   Try: leadsweep --help");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn").add_directive("leadsweep=info".parse().unwrap()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Dry-run wins over force: an operator combining both gets the safe one.
    let mode = if dry_run {
        SweepMode::DryRun
    } else if force {
        SweepMode::Force
    } else {
        SweepMode::Confirm
    };

    if !json {
        println!("🧹 Leadsweep");
        println!("   Target: {}", config.url);
        println!();
    }

    let client = match RestClient::new(&config.url, config.service_key.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Invalid datastore configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.health_check().await {
        eprintln!("❌ Datastore unreachable at {}: {}", client.base_url(), e);
        std::process::exit(1);
    }

    let outcome = match run_sweep(&client, &config.rules, mode, &StdinConfirmation).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ Sweep failed: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        print_json(&outcome)?;
        return Ok(());
    }

    print_summary(outcome.summary());

    match &outcome {
        SweepOutcome::Clean(_) => {
            println!("✨ No test data found, nothing to do.");
        }
        SweepOutcome::DryRun(_) => {
            println!("💡 Dry run: no records were deleted.");
        }
        SweepOutcome::Declined(_) => {
            println!("🚫 Aborted by operator: nothing was deleted.");
        }
        SweepOutcome::Completed { report, .. } => {
            print_report(report);
        }
    }

    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("📋 Deletion plan ({} records):", summary.total);
    for kind in &summary.kinds {
        if kind.count == 0 {
            continue;
        }
        let mut line = format!("   {}s: {}", kind.kind, kind.count);
        if !kind.examples.is_empty() {
            line.push_str(&format!(" ({}", kind.examples.join(", ")));
            if kind.more > 0 {
                line.push_str(&format!(" ... and {} more", kind.more));
            }
            line.push(')');
        }
        println!("{}", line);
    }
    println!();
}

fn print_report(report: &ExecutionReport) {
    println!("🗑️  Results:");
    for batch in &report.batches {
        match &batch.error {
            None => println!("   ✅ {}: {} deleted", batch.table, batch.deleted),
            Some(error) => println!("   ❌ {}: failed: {}", batch.table, error),
        }
    }
    println!();
    if report.is_clean() {
        println!("🎉 Cleanup complete: {} records deleted.", report.deleted_total());
    } else {
        println!(
            "⚠️  Cleanup finished with errors: {} deleted, {} batches failed.",
            report.deleted_total(),
            report.failures().len()
        );
    }
}

fn print_json(outcome: &SweepOutcome) -> anyhow::Result<()> {
    let value = match outcome {
        SweepOutcome::DryRun(summary) => {
            serde_json::json!({"outcome": "dry_run", "summary": summary})
        }
        SweepOutcome::Clean(summary) => {
            serde_json::json!({"outcome": "clean", "summary": summary})
        }
        SweepOutcome::Declined(summary) => {
            serde_json::json!({"outcome": "declined", "summary": summary})
        }
        SweepOutcome::Completed { summary, report } => {
            serde_json::json!({"outcome": "completed", "summary": summary, "report": report})
        }
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_help() {
    println!(
        r#"
Leadsweep: test-data cleanup for the CRM datastore

USAGE:
    leadsweep [OPTIONS]

OPTIONS:
    -u, --url <URL>       Datastore base URL (default: http://localhost:54321)
    -k, --key <KEY>       Service key for the datastore API
    --age-days <N>        Stale-record age threshold in days (default: 30)
    --dry-run             Compute and print the plan, delete nothing
    -f, --force           Skip the confirmation prompt
    --json                Print the plan and results as JSON
    --help                Print this help

EXAMPLES:
    # See what would be deleted
    leadsweep --dry-run

    # Interactive cleanup against a remote datastore
    leadsweep --url https://crm.example.io --key $SERVICE_KEY

    # Unattended cleanup (cron)
    leadsweep --force --json

ENVIRONMENT:
    LEADSWEEP_URL           Override default datastore URL
    LEADSWEEP_SERVICE_KEY   Service key
    LEADSWEEP_AGE_DAYS      Stale-record age threshold
"#
    );
}
