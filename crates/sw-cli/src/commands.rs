use colored::Colorize;
use sw_crypto::{fingerprint_of_file, CycleDigest};
use sw_monitor::{CycleSummary, ItemOutcome, Monitor, MonitorConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Watch(args) => cmd_watch(config, args, &cli.format).await,
        Command::Check(_) => cmd_check(config, &cli.format).await,
        Command::Baseline(_) => cmd_baseline(config).await,
        Command::Fingerprint(args) => cmd_fingerprint(args, &cli.format),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &cli.dir {
        config.watch_dir = dir.clone();
    }
    Ok(config)
}

async fn cmd_watch(
    mut config: MonitorConfig,
    args: WatchArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    if let Some(minutes) = args.interval {
        config.interval_minutes = minutes;
    }
    let monitor = Monitor::new(config)?;
    if args.baseline {
        let saved = monitor.fetch_baselines().await?;
        println!("{} Saved {} baselines", "✓".green().bold(), saved);
    }

    loop {
        match monitor.run_cycle().await {
            Ok(summary) => print_summary(&summary, format)?,
            Err(e) => tracing::error!(error = %e, "cycle failed"),
        }
        tokio::time::sleep(monitor.config().interval()).await;
    }
}

async fn cmd_check(config: MonitorConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let monitor = Monitor::new(config)?;
    let summary = monitor.run_cycle().await?;
    print_summary(&summary, format)
}

async fn cmd_baseline(config: MonitorConfig) -> anyhow::Result<()> {
    let monitor = Monitor::new(config)?;
    let saved = monitor.fetch_baselines().await?;
    println!("{} Saved {} baselines", "✓".green().bold(), saved);
    Ok(())
}

fn cmd_fingerprint(args: FingerprintArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut digest = CycleDigest::new();
    let mut rows = Vec::new();
    for path in &args.paths {
        match fingerprint_of_file(path) {
            Ok(fp) => {
                digest.push(&fp);
                rows.push((path.display().to_string(), fp));
            }
            Err(e) => eprintln!("{} {}: {}", "✗".red(), path.display(), e),
        }
    }
    let unified = digest.finish();

    match format {
        OutputFormat::Json => {
            let files: Vec<_> = rows
                .iter()
                .map(|(path, fp)| serde_json::json!({ "path": path, "fingerprint": fp }))
                .collect();
            let out = serde_json::json!({ "files": files, "unified": unified });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for (path, fp) in &rows {
                println!("{}  {}", fp.to_hex().dimmed(), path);
            }
            println!("Unified Hash: {}", format!("0x{unified}").cyan());
        }
    }
    Ok(())
}

/// The whole stdout payload for `--format json`: one JSON document.
fn summary_json(summary: &CycleSummary) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

fn print_summary(summary: &CycleSummary, format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", summary_json(summary)?);
        return Ok(());
    }

    println!("[{}] Cycle complete for {} files", summary.timestamp, summary.items.len());
    for record in &summary.items {
        let status = match &record.outcome {
            ItemOutcome::Unchanged { fingerprint } => {
                format!("no change (hash: {})", fingerprint.short()).green()
            }
            ItemOutcome::Shifted { .. } => "SHIFT DETECTED".red().bold(),
            ItemOutcome::Unavailable { status } => {
                format!("SHIFT DETECTED: remote unavailable (HTTP {status})").red().bold()
            }
            ItemOutcome::TransportFailed { error } => format!("fetch failed: {error}").yellow(),
            ItemOutcome::LocalReadFailed { error } => {
                format!("local read failed: {error}").yellow()
            }
        };
        println!("  {} {}", record.name.bold(), status);
    }
    if summary.shift_count() > 0 {
        println!("  {} shifts logged", summary.shift_count().to_string().red().bold());
    }
    if let Some(e) = &summary.log_error {
        println!("  {} shift log not written: {}", "✗".red(), e);
    }
    println!("Unified Hash: {}", format!("0x{}", summary.unified).cyan());
    Ok(())
}
