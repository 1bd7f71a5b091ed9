use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

mod build;
mod config;

#[derive(Parser)]
#[command(name = "mdsite", version, about = "Static site generator for Markdown content trees")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    Html,
    Json,
    Page,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site: copy static files and render every Markdown page
    Build {
        /// Site root holding mdsite.json (default: current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Directory copied verbatim into the output
        #[arg(long = "static")]
        static_dir: Option<PathBuf>,

        /// Directory of Markdown pages
        #[arg(long)]
        content: Option<PathBuf>,

        /// HTML template with {{ Title }} and {{ Content }} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// URL prefix the site is served under
        #[arg(long)]
        basepath: Option<String>,

        /// Delete the output directory before building
        #[arg(long)]
        clean: bool,

        /// Watch for changes and rebuild
        #[arg(long)]
        watch: bool,
    },

    /// Render a single Markdown file to stdout
    Render {
        /// Path to the .md file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: RenderFormat,

        /// Site root holding mdsite.json, used by `--format page`
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Template used by `--format page` (default: from mdsite.json)
        #[arg(long)]
        template: Option<PathBuf>,

        /// URL prefix applied by `--format page` (default: from mdsite.json)
        #[arg(long)]
        basepath: Option<String>,
    },

    /// Print the title (first `# ` heading) of a Markdown file
    Title {
        /// Path to the .md file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    // RUST_LOG, when set, takes precedence over the flag.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            root,
            static_dir,
            content,
            template,
            out,
            basepath,
            clean,
            watch,
        } => {
            let overrides = config::Overrides {
                static_dir,
                content_dir: content,
                template,
                out_dir: out,
                basepath,
            };
            let site = config::load_config(&root)?.resolve(&root, overrides);
            let opts = build::BuildOpts {
                clean,
                quiet: cli.quiet,
            };

            let report = build::run_build(&site, &opts)?;
            if !cli.quiet {
                report.print_summary(&site.out_dir);
            }
            if watch {
                build::watch_and_rebuild(&site, &opts)?;
            }
        }
        Commands::Render {
            file,
            format,
            root,
            template,
            basepath,
        } => {
            let overrides = config::Overrides {
                template,
                basepath,
                ..Default::default()
            };
            handle_render(&file, format, &root, overrides)?;
        }
        Commands::Title { file } => {
            let markdown = read_markdown(&file)?;
            let title = mdsite_parse::extract_title(&markdown)
                .with_context(|| format!("No title in '{}'", file.display()))?;
            println!("{title}");
        }
    }

    Ok(())
}

fn read_markdown(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read '{}'", file.display()))
}

fn handle_render(file: &Path, format: RenderFormat, root: &Path, overrides: config::Overrides) -> Result<()> {
    let markdown = read_markdown(file)?;
    let node = mdsite_parse::markdown_to_html_node(&markdown)
        .with_context(|| format!("Failed to convert '{}'", file.display()))?;

    let output = match format {
        RenderFormat::Html => node.to_html()?,
        RenderFormat::Json => serde_json::to_string_pretty(&node)?,
        RenderFormat::Page => {
            let site = config::load_config(root)?.resolve(root, overrides);
            let raw = std::fs::read_to_string(&site.template)
                .with_context(|| format!("Failed to read template '{}'", site.template.display()))?;
            let title = mdsite_parse::extract_title(&markdown)?;
            mdsite_parse::Template::new(raw)
                .with_basepath(site.basepath)
                .render(&title, &node.to_html()?)
        }
    };

    println!("{output}");
    Ok(())
}
