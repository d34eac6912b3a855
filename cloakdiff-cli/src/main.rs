//! cloakdiff CLI - side-by-side review of original and masked documents
//!
//! This is the main entry point for the cloakdiff command-line tool, which provides:
//! - An interactive dual-pane viewer (`view`, `sample`)
//! - Non-interactive rendering of a single artifact (`render`)
//! - Standalone HTML export of a comparison (`export`)
//! - Configuration management (`config`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cloakdiff_core::loader::{load_artifact, load_pair, ArtifactRequest, Loader, Location};
use cloakdiff_core::{
    export_html, render, ComparisonSession, ContentKind, CopyAcknowledgment, FileLayoutStore,
    LayoutStore, SampleCatalog, Side, SplitLayout, ViewerConfig,
};
use tracing::info;

mod clipboard;
mod config;
mod tracing_setup;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "cloakdiff",
    author,
    version,
    about = "Compare original and masked documents side by side",
    long_about = "Review the output of a redaction or masking pipeline: the original artifact \
                  on the left, its masked counterpart on the right, rendered as markdown, \
                  pretty-printed JSON or plain text."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.cloakdiff/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "CLOAKDIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open two artifacts in the dual-pane viewer
    View(ViewArgs),
    /// Open a built-in sample scenario in the viewer
    Sample(SampleArgs),
    /// Print one artifact's rendered projection as plain text
    Render(RenderArgs),
    /// Write a comparison as a standalone HTML page
    Export(ExportArgs),
    /// Manage cloakdiff configuration (init, show, validate, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
struct PairArgs {
    /// Original artifact: file path, http(s) URL or sample:<scenario>/<side>
    left: String,

    /// Masked artifact: file path, http(s) URL or sample:<scenario>/<side>
    right: String,

    /// Label shown above the left pane (default: file name)
    #[arg(long)]
    left_label: Option<String>,

    /// Label shown above the right pane (default: file name)
    #[arg(long)]
    right_label: Option<String>,

    /// Render both panes as this kind instead of classifying the left label
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
}

impl PairArgs {
    fn requests(&self) -> Result<(ArtifactRequest, ArtifactRequest)> {
        let kind = self.kind.map(ContentKind::from);
        let build = |side: Side, location: &str, label: &Option<String>| -> Result<ArtifactRequest> {
            let location = Location::parse(location)
                .with_context(|| format!("Invalid {side} location '{location}'"))?;
            let mut request = ArtifactRequest::new(side, location).with_kind(kind);
            request.label = label.clone();
            Ok(request)
        };
        Ok((
            build(Side::Left, &self.left, &self.left_label)?,
            build(Side::Right, &self.right, &self.right_label)?,
        ))
    }
}

#[derive(Parser, Debug)]
struct ViewArgs {
    #[command(flatten)]
    pair: PairArgs,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Scenario to open
    #[arg(default_value = "markdown")]
    name: String,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// File path, http(s) URL or sample:<scenario>/<side>
    location: String,

    /// Label used for classification (default: file name)
    #[arg(long)]
    label: Option<String>,

    /// Render as this kind instead of classifying the label
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Output HTML file
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Left pane share of the width (default: configured default ratio)
    #[arg(long)]
    ratio: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum KindArg {
    /// Markdown document
    Markdown,
    /// JSON structured data
    Json,
    /// Plain text
    Text,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Markdown => ContentKind::Document,
            KindArg::Json => ContentKind::StructuredData,
            KindArg::Text => ContentKind::PlainText,
        }
    }
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Commands::View(_) | Commands::Sample(SampleArgs { list: false, .. }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(ViewerConfig::config_path);

    // `config` must work even when the file is broken
    if let Commands::Config(args) = cli.command {
        tracing_setup::init(&tracing_setup::TracingConfig {
            debug: cli.debug,
            ..Default::default()
        })
        .ok();
        return config::run_config(args, &config_path);
    }

    let config = ViewerConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        level: config.logging.level.clone(),
        log_file: cli
            .command
            .is_interactive()
            .then(|| config.log_file_path()),
    })
    .ok();

    match cli.command {
        Commands::View(args) => run_view(args, &config)?,
        Commands::Sample(args) => run_sample(args, &config)?,
        Commands::Render(args) => run_render(args, &config).await?,
        Commands::Export(args) => run_export(args, &config).await?,
        Commands::Completions(args) => run_completions(args)?,
        Commands::Config(_) => {}
    }
    Ok(())
}

fn sample_catalog(config: &ViewerConfig) -> Result<SampleCatalog> {
    let catalog = SampleCatalog::builtin();
    match &config.samples.dir {
        Some(dir) => catalog
            .with_dir(dir)
            .with_context(|| format!("Failed to read samples from {}", dir.display())),
        None => Ok(catalog),
    }
}

fn app_settings(config: &ViewerConfig, kind: Option<ContentKind>) -> Result<tui::AppSettings> {
    let store: Option<Box<dyn LayoutStore>> = config
        .layout
        .persist
        .then(|| Box::new(FileLayoutStore::new(config.layout_store_path())) as Box<dyn LayoutStore>);

    let layout = match &store {
        Some(store) => SplitLayout::restored(
            config.layout.default_ratio,
            config.layout.min_pane_fraction,
            store.as_ref(),
            &config.layout.key,
        ),
        None => SplitLayout::new(config.layout.default_ratio, config.layout.min_pane_fraction),
    };

    Ok(tui::AppSettings {
        kind,
        layout,
        ack: CopyAcknowledgment::new(config.clipboard.ack_timeout()),
        store,
        layout_key: config.layout.key.clone(),
        clipboard: Box::new(clipboard::SystemClipboard),
        catalog: sample_catalog(config)?,
    })
}

fn run_view(args: ViewArgs, config: &ViewerConfig) -> Result<()> {
    let (left, right) = args.pair.requests()?;
    info!(left = %left.location, right = %right.location, "opening comparison");

    let settings = app_settings(config, args.pair.kind.map(ContentKind::from))?;
    let loader = Loader::new(settings.catalog.clone());
    tui::run(tui::LoadTarget::Pair { left, right }, settings, loader)
}

fn run_sample(args: SampleArgs, config: &ViewerConfig) -> Result<()> {
    let catalog = sample_catalog(config)?;

    if args.list {
        for scenario in catalog.scenarios() {
            println!(
                "{:<12} {} ↔ {}",
                scenario.name, scenario.left.label, scenario.right.label
            );
        }
        return Ok(());
    }

    catalog.get(&args.name)?;
    info!(scenario = %args.name, "opening sample scenario");

    let settings = app_settings(config, None)?;
    let loader = Loader::new(catalog);
    tui::run(tui::LoadTarget::Scenario(args.name), settings, loader)
}

async fn run_render(args: RenderArgs, config: &ViewerConfig) -> Result<()> {
    let location = Location::parse(&args.location)?;
    let mut request =
        ArtifactRequest::new(Side::Left, location).with_kind(args.kind.map(ContentKind::from));
    request.label = args.label;

    let loader = Loader::new(sample_catalog(config)?);
    let artifact = load_artifact(&loader, &request)
        .await
        .context("failed to load artifact")?;

    let kind = artifact.resolved_kind();
    info!(label = %artifact.label, kind = %kind, "rendering artifact");

    let text = render(kind, &artifact.raw).to_text();
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
    Ok(())
}

async fn run_export(args: ExportArgs, config: &ViewerConfig) -> Result<()> {
    let (left, right) = args.pair.requests()?;
    let loader = Loader::new(sample_catalog(config)?);
    let (left, right) = load_pair(&loader, &left, &right)
        .await
        .context("failed to load comparison")?;

    let mut layout = SplitLayout::new(config.layout.default_ratio, config.layout.min_pane_fraction);
    if let Some(ratio) = args.ratio {
        layout.set_ratio(ratio);
    }

    let session = ComparisonSession::with_parts(
        left,
        right,
        args.pair.kind.map(ContentKind::from),
        layout,
        CopyAcknowledgment::new(config.clipboard.ack_timeout()),
    );

    let html = export_html(&session);
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&args.output, html)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        ratio = session.layout().ratio(),
        "exported comparison"
    );
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
