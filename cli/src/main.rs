//! CLI entrypoint for triage
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use triage_application::config::DEFAULT_ACTIVITY_WINDOW;
use triage_application::{
    AssessBatchUseCase, BatchProgressNotifier, ComplianceAgent, CustomerDirectory, EmptyDirectory,
    EventNotifier, FraudAgent, InsightsAgent, KbAgent, NoProgress, Orchestrator, SummaryAgent,
};
use triage_domain::{HeuristicRiskModel, OutputFormat, PlanRequest, Transaction};
use triage_infrastructure::{
    CompositeNotifier, ConfigLoader, FileConfig, InMemoryCustomerDirectory, InMemoryOtpQuota,
    JsonlEventNotifier, KnowledgeBaseLoader,
};
use triage_presentation::{
    BatchProgressReporter, Cli, Command, ConsoleFormatter, SimpleBatchProgress, set_color_enabled,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for source in ConfigLoader::sources(cli.config.as_deref()) {
            let mark = if source.found { "FOUND" } else { "     " };
            println!("  [{}] {:<8} {}", mark, format!("{}:", source.label), source.location);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, config.logging.log_file.as_deref())?;
    info!("Starting triage");

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s); see the log above", errors);
    }

    if !config.output.color {
        set_color_enabled(false);
    }
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    let formatter = ConsoleFormatter::new(config.output.redact);

    let Some(command) = cli.command else {
        bail!("No command given. Run `triage --help` for usage.");
    };

    // Ctrl-C abandons in-flight work without tripping breakers
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling");
            on_interrupt.cancel();
        }
    });

    match command {
        Command::Plan { query } => {
            // Customer is irrelevant to planning
            let plan = build_orchestrator(&config)?.plan(&PlanRequest::new(query.as_str(), ""));
            let output = match format {
                OutputFormat::Json => formatter.format_json(&serde_json::json!({
                    "query": query,
                    "plan": plan,
                })),
                OutputFormat::Text => ConsoleFormatter::format_plan(&query, &plan),
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }

        Command::Run {
            query,
            customer,
            transaction,
            steps,
        } => {
            let mut request = PlanRequest::new(query, customer);
            if let Some(path) = transaction {
                request = request.with_transaction(read_json::<Transaction>(&path)?);
            }
            if !steps.is_empty() {
                request = request.with_plan(steps);
            }

            let orchestrator = build_orchestrator(&config)?;
            let outcome = orchestrator.run_with_cancel(request, &cancel).await;

            let output = match format {
                OutputFormat::Json => formatter.format_json(&outcome),
                OutputFormat::Text => formatter.format_outcome(&outcome),
            };
            println!("{}", output);
            Ok(exit_code(outcome.success))
        }

        Command::Batch { file } => {
            let requests: Vec<PlanRequest> = read_json(&file)?;
            let orchestrator = Arc::new(build_orchestrator(&config)?);
            let use_case =
                AssessBatchUseCase::from_config(orchestrator, &config.to_orchestrator_config());

            let progress: Box<dyn BatchProgressNotifier> = if cli.quiet {
                Box::new(NoProgress)
            } else if std::io::stderr().is_terminal() {
                Box::new(BatchProgressReporter::new())
            } else {
                Box::new(SimpleBatchProgress)
            };

            let report = use_case
                .execute_with_progress(requests, progress.as_ref(), &cancel)
                .await?;

            let output = match format {
                OutputFormat::Json => formatter.format_json(&report),
                OutputFormat::Text => formatter.format_batch(&report),
            };
            println!("{}", output);
            Ok(exit_code(report.failed == 0))
        }

        Command::Status => {
            let orchestrator = build_orchestrator(&config)?;
            let status = orchestrator.status();
            let output = match format {
                OutputFormat::Json => formatter.format_json(&status),
                OutputFormat::Text => ConsoleFormatter::format_status(&status),
            };
            println!("{}", output);
            Ok(exit_code(status.operational))
        }
    }
}

/// Stderr logging filtered by `-v` (or `RUST_LOG`), plus an optional file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log_file has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Wire adapters into an orchestrator with the built-in agents
fn build_orchestrator(config: &FileConfig) -> Result<Orchestrator> {
    let kb = KnowledgeBaseLoader::load(config.data.knowledge_base.as_deref())?;

    let directory: Arc<dyn CustomerDirectory> = match &config.data.customers {
        Some(path) => Arc::new(InMemoryCustomerDirectory::from_file(path)?),
        None => {
            info!("No customer data configured; profiles and history will be empty");
            Arc::new(EmptyDirectory)
        }
    };

    let (otp_window, _) = config.data.otp_window();
    let quota = Arc::new(InMemoryOtpQuota::new(config.data.otp_max_requests, otp_window));

    let mut notifier = CompositeNotifier::new();
    if let Some(path) = &config.logging.event_log {
        notifier = notifier.with(Arc::new(JsonlEventNotifier::new(path)?));
    }
    let notifier: Arc<dyn EventNotifier> = Arc::new(notifier);

    let window = DEFAULT_ACTIVITY_WINDOW;
    let orchestrator = Orchestrator::builder(config.to_orchestrator_config())
        .with_notifier(notifier)
        .with_agent(Arc::new(FraudAgent::new(
            Arc::clone(&directory),
            Arc::new(HeuristicRiskModel::default()),
            window,
        )))
        .with_agent(Arc::new(InsightsAgent::new(directory, window)))
        .with_agent(Arc::new(KbAgent::new(Arc::new(kb))))
        .with_agent(Arc::new(ComplianceAgent::new(quota)))
        .with_agent(Arc::new(SummaryAgent::new()))
        .build()?;

    info!("Agents ready: {}", orchestrator.agent_names().join(", "));
    Ok(orchestrator)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
