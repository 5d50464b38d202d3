//! eidos-apidoc: generate API reference pages for the EidosUI Python package.
//!
//! - `eidos-apidoc list` prints the modules that can be documented
//! - `eidos-apidoc extract eidos.tags` prints one module's descriptor as JSON
//! - `eidos-apidoc render eidos.tags -f markdown` prints one rendered page
//! - `eidos-apidoc build -o site/api` writes every page plus an index

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use eidos_apidoc::config::Config;
use eidos_apidoc::extract::resolve::is_valid_module_name;
use eidos_apidoc::extract::Extractor;
use eidos_apidoc::model::ModuleDescriptor;
use eidos_apidoc::render::{self, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "eidos-apidoc",
    about = "Generate API reference documentation for EidosUI Python modules"
)]
struct Cli {
    /// Config file (default: eidos-apidoc.toml in the working directory, if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Source root to resolve modules against. Repeatable; replaces configured roots.
    #[arg(short = 'r', long = "root", global = true)]
    roots: Vec<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List modules available for documentation
    List,

    /// Print a module's extracted API as JSON
    Extract {
        /// Dotted module name, e.g. eidos.components.table
        module: String,
    },

    /// Render one module page to stdout
    Render {
        module: String,

        /// Output format: html, json, markdown
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Omit "View source" links
        #[arg(long)]
        no_source_links: bool,
    },

    /// Render modules into an output directory
    Build {
        /// Modules to render (default: every available module)
        modules: Vec<String>,

        /// Output directory
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Output format: html, json, markdown
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Omit "View source" links
        #[arg(long)]
        no_source_links: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if !cli.roots.is_empty() {
        config.roots = cli.roots.clone();
    }
    tracing::debug!(roots = ?config.roots, "source roots");
    let extractor = Extractor::from_config(&config);

    match cli.command {
        Command::List => {
            for module in extractor.list_available_modules() {
                println!("{}", module);
            }
        }
        Command::Extract { module } => {
            let descriptor = extractor.extract_module_api(&module);
            let json = serde_json::to_string_pretty(&descriptor)
                .with_context(|| format!("failed to serialize {}", module))?;
            println!("{}", json);
        }
        Command::Render {
            module,
            format,
            no_source_links,
        } => {
            let format = format.unwrap_or_else(|| config.format.clone());
            let mut options = render_options(&config, no_source_links);
            options.navigation = extractor.list_available_modules();
            let renderer = render::create_renderer(&format, options)?;
            let descriptor = extractor.extract_module_api(&module);
            warn_if_failed(&descriptor);
            print!("{}", renderer.render(&descriptor));
        }
        Command::Build {
            modules,
            output,
            format,
            no_source_links,
        } => {
            let format = format.unwrap_or_else(|| config.format.clone());
            let options = render_options(&config, no_source_links);
            build(&extractor, modules, &output, &format, options)?;
        }
    }

    Ok(())
}

/// Render every requested module into `output_dir`, mirroring the dotted
/// names as directories, then write the index page if the format has one.
/// Names that are not dotted identifiers are skipped: they have no page
/// path inside `output_dir`.
fn build(
    extractor: &Extractor,
    modules: Vec<String>,
    output_dir: &Path,
    format: &str,
    mut options: RenderOptions,
) -> Result<()> {
    let modules: Vec<String> = if modules.is_empty() {
        extractor.list_available_modules()
    } else {
        modules
            .into_iter()
            .filter(|module| {
                let valid = is_valid_module_name(module);
                if !valid {
                    tracing::warn!(module = %module, "skipping invalid module name");
                }
                valid
            })
            .collect()
    };
    options.navigation = modules.clone();

    let renderer = render::create_renderer(format, options)?;
    let ext = renderer.file_extension().to_string();

    if modules.is_empty() {
        tracing::warn!("no modules available under {:?}", extractor.resolver().roots());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for module in &modules {
        let descriptor = extractor.extract_module_api(module);
        warn_if_failed(&descriptor);

        let out_path = output_dir.join(render::module_page_path(module, &ext));
        write_page(&out_path, &renderer.render(&descriptor))?;
    }

    if let Some(index) = renderer.render_index(&modules) {
        write_page(&output_dir.join(format!("index.{}", ext)), &index)?;
    }

    tracing::info!(count = modules.len(), dir = %output_dir.display(), "build complete");
    Ok(())
}

fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote page");
    Ok(())
}

fn warn_if_failed(descriptor: &ModuleDescriptor) {
    if let Some(error) = descriptor.error() {
        tracing::warn!(module = descriptor.module_name(), "{}", error);
    }
}

fn render_options(config: &Config, no_source_links: bool) -> RenderOptions {
    RenderOptions {
        source_url: config.source_url.clone(),
        source_links: config.source_links && !no_source_links,
        navigation: Vec::new(),
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so stdout stays clean for rendered output.
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) -> Result<()> {
    let level = log_level(verbose);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("eidos_apidoc={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
