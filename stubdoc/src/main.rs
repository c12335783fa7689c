//! stubdoc: attach localized manual pages to PHP stub declarations.
//!
//! Two stages, runnable separately or together:
//!
//! 1. **extract**: reduce manual HTML pages to single-line comment fragments
//! 2. **annotate**: inject those fragments as docblocks above matching
//!    declarations in a tree of stub files
//!
//! `stubdoc run -i raw -d fragments -s stubs -o out` does both.

mod annotate;
mod config;
mod error;
mod extract;
mod logger;
mod pipeline;
mod walk;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{AnnotateConfig, ExtractConfig, DEFAULT_SITE_URL, DEFAULT_SOURCE_EXTENSION};
use pipeline::Pipeline;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stubdoc",
    about = "Inject localized manual pages as doc comments into PHP stub files"
)]
struct Cli {
    /// Debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract comment fragments from manual HTML pages
    Extract {
        /// Directory of raw manual pages
        #[arg(short = 'i', long = "input")]
        raw_dir: PathBuf,

        /// Fragment directory to write
        #[arg(short = 'd', long = "fragments")]
        fragment_dir: PathBuf,

        #[command(flatten)]
        extract_args: ExtractArgs,
    },
    /// Inject fragments into stub files
    Annotate {
        /// Fragment directory produced by `extract`
        #[arg(short = 'd', long = "fragments")]
        fragment_dir: PathBuf,

        /// Stub source tree
        #[arg(short = 's', long = "stubs")]
        stubs_dir: PathBuf,

        /// Output tree (mirrors the stub tree)
        #[arg(short = 'o', long = "output")]
        output_dir: PathBuf,

        /// Stub source extension
        #[arg(long = "ext", default_value = DEFAULT_SOURCE_EXTENSION)]
        extension: String,

        #[command(flatten)]
        annotate_args: AnnotateArgs,
    },
    /// Rebuild fragments, then the annotated stub tree
    Run {
        #[arg(short = 'i', long = "input")]
        raw_dir: PathBuf,

        #[arg(short = 'd', long = "fragments")]
        fragment_dir: PathBuf,

        #[arg(short = 's', long = "stubs")]
        stubs_dir: PathBuf,

        #[arg(short = 'o', long = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        extract_args: ExtractArgs,

        #[command(flatten)]
        annotate_args: AnnotateArgs,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Base URL for rewritten manual links
    #[arg(long, default_value = DEFAULT_SITE_URL)]
    site_url: String,

    /// Stub source extension (also used for rewritten links)
    #[arg(long = "ext", default_value = DEFAULT_SOURCE_EXTENSION)]
    extension: String,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Manual URL part replaced in comments that are kept
    #[arg(long, default_value = "//php.net/manual/en")]
    manual_from: String,

    /// Replacement for --manual-from
    #[arg(long, default_value = "//php.net/manual/zh")]
    manual_to: String,
}

impl ExtractArgs {
    fn to_config(&self) -> ExtractConfig {
        ExtractConfig {
            site_url: self.site_url.clone(),
            source_extension: self.extension.clone(),
        }
    }
}

impl AnnotateArgs {
    fn to_config(&self, extension: &str) -> AnnotateConfig {
        AnnotateConfig {
            source_extension: extension.to_string(),
            manual_from: self.manual_from.clone(),
            manual_to: self.manual_to.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Command::Extract {
            raw_dir,
            fragment_dir,
            extract_args,
        } => {
            extract::extract_all(&raw_dir, &fragment_dir, &extract_args.to_config())
                .with_context(|| format!("failed to extract {}", raw_dir.display()))?;
        }
        Command::Annotate {
            fragment_dir,
            stubs_dir,
            output_dir,
            extension,
            annotate_args,
        } => {
            let config = annotate_args.to_config(&extension);
            annotate::annotate_all(&fragment_dir, &stubs_dir, &output_dir, &config)
                .with_context(|| format!("failed to annotate {}", stubs_dir.display()))?;
        }
        Command::Run {
            raw_dir,
            fragment_dir,
            stubs_dir,
            output_dir,
            extract_args,
            annotate_args,
        } => {
            let pipeline = Pipeline {
                raw_dir,
                fragment_dir,
                stubs_dir,
                output_dir,
            };
            let annotate_config = annotate_args.to_config(&extract_args.extension);
            pipeline
                .run(&extract_args.to_config(), &annotate_config)
                .context("pipeline failed")?;
        }
    }

    Ok(())
}
