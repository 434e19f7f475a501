use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use featuremap::{generate_diagram, read_feature, tree_render, DiagramConfig};

#[derive(Parser)]
#[command(name = "fmap")]
#[command(about = "Turn Gherkin feature files into Visio diagrams")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a .vsdx diagram from a feature file
    Diagram {
        /// Feature file to read
        input: PathBuf,

        /// Output path (defaults to the input with a .vsdx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a diagram for every .feature file in a directory
    Batch {
        /// Directory holding .feature files
        dir: PathBuf,

        /// Where to put the diagrams (defaults to DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print a feature file as an ASCII tree
    Tree {
        input: PathBuf,
    },
    /// Print the parsed feature tree as JSON
    Parse {
        input: PathBuf,
    },
}

/// Initialize tracing on stderr so stdout only carries command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "featuremap=info,fmap=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DiagramConfig> {
    match path {
        Some(path) => DiagramConfig::load_from(path),
        None => Ok(DiagramConfig::load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Diagram { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("vsdx"));
            let summary = generate_diagram(&input, &output, &config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Batch { dir, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| dir.clone());
            run_batch(&dir, &out_dir, config).await?;
        }
        Commands::Tree { input } => {
            let feature = read_feature(&input)?;
            print!("{}", tree_render::render_feature(&feature));
        }
        Commands::Parse { input } => {
            let feature = read_feature(&input)?;
            println!("{}", serde_json::to_string_pretty(&feature)?);
        }
    }

    Ok(())
}

/// Build every feature file in `dir` in parallel, one blocking task per file.
/// Each task writes its own destination, so the builds never share state.
async fn run_batch(dir: &Path, out_dir: &Path, config: DiagramConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "feature"))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        tracing::warn!("No .feature files found in {}", dir.display());
        return Ok(());
    }

    let mut tasks = JoinSet::new();
    for input in inputs {
        let config = config.clone();
        let output = out_dir.join(input.with_extension("vsdx").file_name().unwrap_or_default());
        tasks.spawn_blocking(move || {
            let result = generate_diagram(&input, &output, &config);
            (input, result)
        });
    }

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        let (input, result) = joined?;
        match result {
            Ok(summary) => println!("{}", serde_json::to_string(&summary)?),
            Err(e) => {
                failures += 1;
                tracing::error!("Failed to build {}: {}", input.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} feature file(s) failed to build", failures);
    }
    Ok(())
}
