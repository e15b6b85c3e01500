//! Binary entry point for the Coati command-line tool.
#![forbid(unsafe_code)]

#[path = "cli/config.rs"]
mod config;
#[path = "cli/ui.rs"]
mod ui;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use coati::{
    admin::{self, AdminOpenOptions},
    cli::export::export_violations,
    validate::{CancelToken, FailureReport, Report, ValidateOptions},
};
use tokio::task;
use tracing_subscriber::EnvFilter;

use config::{CliConfig, Profile, ProfileUpdate};
use ui::{format_duration, Theme, Tone, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "coati",
    version,
    about = "Integrity checks for requirement knowledge graphs",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "COATI_CONFIG",
        value_name = "FILE",
        help = "Path to the CLI config file"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Config profile to apply")]
    profile: Option<String>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(long, global = true, value_enum, default_value_t = Theme::Auto, help = "Colour theme")]
    theme: Theme,

    #[arg(long, global = true, help = "Plain output without decorations or progress")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[arg(
        value_name = "SNAPSHOT",
        help = "Snapshot directory or JSON file (defaults to the profile's snapshot)"
    )]
    path: Option<PathBuf>,

    #[arg(long, help = "Treat a missing snapshot as an empty graph")]
    empty_if_missing: bool,
}

#[derive(Args, Debug)]
struct ValidateCmd {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[arg(long, value_name = "HOPS", help = "Revision traversal depth bound")]
    max_revision_depth: Option<u32>,

    #[arg(long, help = "Run checks in parallel")]
    parallel: bool,

    #[arg(long, value_name = "N", help = "Worker threads for parallel runs (implies --parallel)")]
    threads: Option<usize>,

    #[arg(long, value_name = "FILE", help = "Also write violations to a CSV file")]
    export_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Run the integrity checks against a snapshot")]
    Validate(ValidateCmd),
    #[command(about = "Print collection statistics")]
    Stats(SnapshotArgs),
    #[command(about = "List collections with their kind and size")]
    Collections(SnapshotArgs),
    #[command(subcommand, about = "Inspect or edit CLI profiles")]
    Config(ConfigCmd),
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    #[command(about = "Show the config file and its profiles")]
    Show,
    #[command(about = "Create or update a profile")]
    Set(SetProfileCmd),
    #[command(about = "Delete a profile")]
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
    #[command(about = "Set or clear the default profile")]
    Default {
        #[arg(value_name = "NAME", required_unless_present = "clear")]
        name: Option<String>,
        #[arg(long, conflicts_with = "name")]
        clear: bool,
    },
}

#[derive(Args, Debug)]
struct SetProfileCmd {
    #[arg(value_name = "NAME")]
    name: String,
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    #[arg(long, value_name = "HOPS")]
    max_revision_depth: Option<u32>,
    #[arg(long, value_name = "CHARS")]
    preview_chars: Option<usize>,
    #[arg(long, value_name = "BOOL")]
    parallel: Option<bool>,
    #[arg(long, value_name = "N")]
    threads: Option<usize>,
    #[arg(long, value_name = "COLLECTION", help = "Name of the unit collection")]
    units: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    init_tracing();
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COATI_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> Result<i32, Box<dyn Error>> {
    let cli = Cli::parse();
    let ui = Ui::new(cli.theme, cli.quiet || cli.format == OutputFormat::Json);
    let mut config = CliConfig::load(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => run_config(cmd, &mut config, &ui)?,
        Command::Validate(cmd) => {
            let profile = config.active_profile(cli.profile.as_deref())?;
            let path = resolve_snapshot(&cmd.snapshot, profile, &config)?;
            let open_opts = build_open_options(&cmd.snapshot, profile);
            let validate_opts = build_validate_options(&cmd, profile, &open_opts);
            let (report, elapsed) =
                match run_validate(path.clone(), open_opts, validate_opts, &ui).await {
                    Ok(outcome) => outcome,
                    Err(err) if cli.format == OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&FailureReport::now(&err))?);
                        return Ok(1);
                    }
                    Err(err) => return Err(err),
                };
            if let Some(csv_path) = &cmd.export_csv {
                let rows = export_violations(&report, csv_path)?;
                tracing::info!(rows, path = %csv_path.display(), "validate.exported");
                if cli.format == OutputFormat::Text {
                    ui.notice(
                        Tone::Note,
                        &format!("wrote {rows} violation(s) to {}", csv_path.display()),
                    );
                }
            }
            emit(cli.format, &report, || ui.report(&path, &report, elapsed))?;
            if !report.ok {
                return Ok(2);
            }
        }
        Command::Stats(args) => {
            let profile = config.active_profile(cli.profile.as_deref())?;
            let path = resolve_snapshot(&args, profile, &config)?;
            let open_opts = build_open_options(&args, profile);
            let report = task::spawn_blocking(move || admin::stats(path, &open_opts)).await??;
            emit(cli.format, &report, || ui.stats(&report))?;
        }
        Command::Collections(args) => {
            let profile = config.active_profile(cli.profile.as_deref())?;
            let path = resolve_snapshot(&args, profile, &config)?;
            let open_opts = build_open_options(&args, profile);
            let collections =
                task::spawn_blocking(move || admin::collections(path, &open_opts)).await??;
            emit(cli.format, &collections, || ui.collections(&collections))?;
        }
    }
    Ok(0)
}

async fn run_validate(
    path: PathBuf,
    open_opts: AdminOpenOptions,
    validate_opts: ValidateOptions,
    ui: &Ui,
) -> Result<(Report, Duration), Box<dyn Error>> {
    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    let signal = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("validate.interrupted");
                signal_token.cancel();
            }
            Err(err) => tracing::error!(?err, "failed to listen for interrupt signal"),
        }
    });

    let spinner = ui.spinner(format!("Validating {}", path.display()));
    let outcome = task::spawn_blocking(move || {
        admin::validate_with_cancel(&path, &open_opts, &validate_opts, &cancel)
    })
    .await;
    signal.abort();
    let report = outcome??;
    let elapsed = spinner.finish();
    tracing::debug!(elapsed = %format_duration(elapsed), "validate.rendered");
    Ok((report, elapsed))
}

fn run_config(cmd: ConfigCmd, config: &mut CliConfig, ui: &Ui) -> Result<(), Box<dyn Error>> {
    match cmd {
        ConfigCmd::Show => {
            let location = config
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into());
            ui.settings(
                "Config",
                &[
                    ("path", location),
                    (
                        "default profile",
                        config.default_profile_name().unwrap_or("<none>").to_string(),
                    ),
                    (
                        "default snapshot",
                        config
                            .default_snapshot()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".into()),
                    ),
                ],
            );
            for profile in config.profiles() {
                println!();
                ui.settings(&format!("Profile {}", profile.name), &profile_rows(profile));
            }
        }
        ConfigCmd::Set(cmd) => {
            let update = ProfileUpdate {
                snapshot: cmd.snapshot,
                max_revision_depth: cmd.max_revision_depth,
                preview_chars: cmd.preview_chars,
                parallel: cmd.parallel,
                threads: cmd.threads,
                units: cmd.units,
            };
            config.upsert_profile(&cmd.name, update)?;
            let target = config.persist()?;
            ui.notice(Tone::Done, &format!("saved profile '{}' to {}", cmd.name, target.display()));
        }
        ConfigCmd::Delete { name } => {
            config.delete_profile(&name)?;
            let target = config.persist()?;
            ui.notice(Tone::Done, &format!("deleted profile '{name}' from {}", target.display()));
        }
        ConfigCmd::Default { name, clear } => {
            let name = if clear { None } else { name };
            config.set_default_profile(name.as_deref())?;
            let target = config.persist()?;
            match name {
                Some(name) => ui.notice(Tone::Done, &format!("default profile set to '{name}'")),
                None => ui.notice(Tone::Done, "default profile cleared"),
            }
            ui.notice(Tone::Note, &format!("config written to {}", target.display()));
        }
    }
    Ok(())
}

fn profile_rows(profile: &Profile) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(snapshot) = &profile.snapshot {
        rows.push(("snapshot", snapshot.display().to_string()));
    }
    if let Some(depth) = profile.max_revision_depth {
        rows.push(("max_revision_depth", depth.to_string()));
    }
    if let Some(chars) = profile.preview_chars {
        rows.push(("preview_chars", chars.to_string()));
    }
    if let Some(parallel) = profile.parallel {
        rows.push(("parallel", parallel.to_string()));
    }
    if let Some(threads) = profile.threads {
        rows.push(("threads", threads.to_string()));
    }
    if let Some(layout) = &profile.layout {
        rows.push(("units", layout.units.clone()));
    }
    if rows.is_empty() {
        rows.push(("settings", "<defaults>".to_string()));
    }
    rows
}

fn resolve_snapshot(
    args: &SnapshotArgs,
    profile: Option<&Profile>,
    config: &CliConfig,
) -> Result<PathBuf, Box<dyn Error>> {
    args.path
        .clone()
        .or_else(|| profile.and_then(|p| p.snapshot.clone()))
        .or_else(|| config.default_snapshot().cloned())
        .ok_or_else(|| "no snapshot given; pass a path or configure a profile snapshot".into())
}

fn build_open_options(args: &SnapshotArgs, profile: Option<&Profile>) -> AdminOpenOptions {
    let mut opts = AdminOpenOptions::default();
    if let Some(layout) = profile.and_then(|p| p.layout.clone()) {
        opts.layout = layout;
    }
    opts.empty_if_missing = args.empty_if_missing;
    opts
}

fn build_validate_options(
    cmd: &ValidateCmd,
    profile: Option<&Profile>,
    open_opts: &AdminOpenOptions,
) -> ValidateOptions {
    let mut opts = ValidateOptions {
        layout: open_opts.layout.clone(),
        ..ValidateOptions::default()
    };
    if let Some(profile) = profile {
        if let Some(depth) = profile.max_revision_depth {
            opts.rules.max_revision_depth = depth;
        }
        if let Some(chars) = profile.preview_chars {
            opts.rules.preview_chars = chars;
        }
        opts.parallel = profile.parallel.unwrap_or(false);
        opts.threads = profile.threads;
    }
    if let Some(depth) = cmd.max_revision_depth {
        opts.rules.max_revision_depth = depth;
    }
    if cmd.parallel {
        opts.parallel = true;
    }
    if let Some(threads) = cmd.threads {
        opts.parallel = true;
        opts.threads = Some(threads);
    }
    opts
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: serde::Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}
