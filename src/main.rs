use clap::{Parser, Subcommand};
use hubsite::{config, content, generate, geo, output, schema};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that talk to the network.
#[derive(clap::Args, Clone)]
struct NetworkArgs {
    /// Skip all network calls; render from the snapshot only
    #[arg(long)]
    offline: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "hubsite")]
#[command(about = "Static site renderer for the Flyball Hub marketing site")]
#[command(long_about = "\
Static site renderer for the Flyball Hub marketing site

The CMS is the data source: editors compose pages from typed content
blocks, and hubsite renders a content snapshot into the deployed site.

Pipeline:

  fetch      content API + team directory  →  snapshot.json
  check      snapshot  →  schema validation report
  generate   snapshot  →  dist/ (HTML, sitemap.xml, robots.txt, _redirects)
  build      fetch + generate

Snapshots are plain JSON — commit one as a fixture, diff two fetches, or
build fully offline with --offline and a local export directory.

Run 'hubsite gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Content snapshot path
    #[arg(long, default_value = "snapshot.json", global = true)]
    snapshot: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch content and teams into a snapshot
    Fetch {
        /// Load from a local export directory instead of the content API
        #[arg(long)]
        from_dir: Option<PathBuf>,
    },
    /// Validate a snapshot against the content schema registry
    Check,
    /// Render the HTML site from a snapshot
    Generate {
        #[command(flatten)]
        network: NetworkArgs,
        /// Preview the team finder sorted around this location
        #[arg(long)]
        finder_query: Option<String>,
    },
    /// Run the full pipeline: fetch → generate
    Build {
        #[command(flatten)]
        network: NetworkArgs,
        /// Load from a local export directory instead of the content API
        #[arg(long)]
        from_dir: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config_dir)?;

    match cli.command {
        Command::Fetch { from_dir } => {
            let snapshot = fetch(&config, from_dir.as_deref())?;
            report_write(content::write_snapshot(&cli.snapshot, &snapshot)?);
            output::print_snapshot(&snapshot);
        }
        Command::Check => {
            let snapshot = content::load_snapshot(&cli.snapshot)?;
            let mut findings = Vec::new();
            for page in &snapshot.pages {
                findings.extend(schema::validate_document(&page.id, &page.blocks));
            }
            output::print_findings(&findings);
            if findings
                .iter()
                .any(|f| f.severity == schema::Severity::Error)
            {
                std::process::exit(1);
            }
        }
        Command::Generate {
            network,
            finder_query,
        } => {
            init_thread_pool(&config.processing);
            let options = generate::GenerateOptions {
                offline: network.offline,
                finder_query,
            };
            let summary = generate::generate(&cli.snapshot, &cli.output, &config, &options)?;
            output::print_generate(&summary);
            println!("Site generated at {}", cli.output.display());
        }
        Command::Build { network, from_dir } => {
            init_thread_pool(&config.processing);

            println!("==> Stage 1: Fetching content");
            let snapshot = if network.offline && from_dir.is_none() {
                content::load_snapshot(&cli.snapshot)?
            } else {
                fetch(&config, from_dir.as_deref())?
            };
            report_write(content::write_snapshot(&cli.snapshot, &snapshot)?);
            output::print_snapshot(&snapshot);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let options = generate::GenerateOptions {
                offline: network.offline,
                finder_query: None,
            };
            let summary =
                generate::generate_from_snapshot(&snapshot, &cli.output, &config, &options)?;
            output::print_generate(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn fetch(
    config: &config::SiteConfig,
    from_dir: Option<&std::path::Path>,
) -> Result<hubsite::types::Snapshot, content::FetchError> {
    match from_dir {
        Some(dir) => content::load_export_dir(dir),
        None => {
            let agent = geo::default_agent();
            content::fetch_snapshot(&agent, &config.content)
        }
    }
}

fn report_write(result: content::SnapshotWrite) {
    match result {
        content::SnapshotWrite::Written => println!("Snapshot updated"),
        content::SnapshotWrite::Unchanged => println!("Snapshot unchanged"),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down,
/// not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
