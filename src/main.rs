// Command-line entry point for ThrowTrace.

use anyhow::Result;
use clap::Parser;
use throwtrace::application::AnalyzeUsecase;
use throwtrace::domain::config::AnalysisConfig;
use throwtrace::infrastructure::concurrency::init_thread_pool;
use throwtrace::infrastructure::{
    JsonChainExporter, ProjectLoader, SledSnapshotStore, TextChainExporter,
};
use throwtrace::ports::ChainExporter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project facts JSON emitted by the parsing front-end
    #[arg(short, long)]
    input: String,

    /// Output file path
    #[arg(short, long)]
    output: String,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Platform package prefix for exception-source detection (repeatable)
    #[arg(long = "platform-prefix")]
    platform_prefix: Vec<String>,

    /// Treat exceptions with unknown classes as unhandled instead of handled
    #[arg(long)]
    unknown_unhandled: bool,

    /// Directory of a sled store to persist the built graph into
    #[arg(long)]
    snapshot: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_thread_pool()?;

    let mut config = AnalysisConfig::default();
    if !cli.platform_prefix.is_empty() {
        config.platform_package_prefixes = cli.platform_prefix.clone();
    }
    if cli.unknown_unhandled {
        config.unknown_class_handled = false;
    }

    let database = ProjectLoader::load_file(&cli.input, config)?;
    println!(
        "[throwtrace] Loaded {} methods, {} classes from {}",
        database.method_to_info.len(),
        database.class_to_binding.len(),
        cli.input
    );

    if let Some(dir) = &cli.snapshot {
        let store = SledSnapshotStore::open(dir)?;
        store.save(&cli.input, &database)?;
        println!("[throwtrace] Snapshot saved to {}", dir);
    }

    let exporter: Box<dyn ChainExporter> = match cli.format.as_str() {
        "text" => Box::new(TextChainExporter),
        _ => Box::new(JsonChainExporter),
    };
    let usecase = AnalyzeUsecase {
        exporter: exporter.as_ref(),
    };
    let chains = usecase.run(&database, &cli.output)?;

    println!(
        "[throwtrace] Wrote {} chains to {} (format: {})",
        chains.len(),
        cli.output,
        cli.format
    );
    Ok(())
}
