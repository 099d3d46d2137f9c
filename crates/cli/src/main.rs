//! authormaps - co-author networks from PubMed
//!
//! ```bash
//! authormaps pubmed-ids Srinivasan Sanjana
//! authormaps create Sanjana Srinivasan graph.svg --dpi 100 --label
//! authormaps compile Sanjana Srinivasan --author1 "Alessandro Carugo" --author2 "Durga N Tripathi"
//! ```

use anyhow::{Context, Result};
use authormaps_common::{
    config::AppConfig, telemetry, AppError, PubMedSource, PublicationSource,
};
use authormaps_network::{
    aggregator::PairwiseAggregator, name::capitalize, resolve_and_build_graph, write_image,
    AuthorName, CoauthorResolver, RenderOptions, SharedWork,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// CLI Definition
// ============================================================================

/// Co-author networks from PubMed
#[derive(Parser, Debug)]
#[command(name = "authormaps", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/ and APP__ environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the PubMed ids of an author's publications
    PubmedIds { last_name: String, first_name: String },

    /// Print the author list of a publication of the given author
    Coauthors {
        last_name: String,
        first_name: String,
        pubmed_id: String,
    },

    /// Print the co-authors of publications listing the author exactly
    Filtered { last_name: String, first_name: String },

    /// Print every co-author pair with the publications they share
    Connections { last_name: String, first_name: String },

    /// Render the co-author graph to an image file
    Create {
        first_name: String,
        last_name: String,
        /// Output path, `.svg`
        output: PathBuf,

        #[arg(long, default_value = "72")]
        dpi: u32,

        /// Draw the shared publication count on each edge
        #[arg(long)]
        label: bool,
    },

    /// Build the graph, then look up a pair and/or export node-link JSON
    Compile {
        first_name: String,
        last_name: String,

        /// First co-author, `First Last`
        #[arg(long, requires = "author2")]
        author1: Option<String>,

        /// Second co-author, `First Last`
        #[arg(long, requires = "author1")]
        author2: Option<String>,

        /// Node-link JSON output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    match cli.verbose {
        0 => {}
        1 => config.observability.log_level = "debug".to_string(),
        _ => config.observability.log_level = "trace".to_string(),
    }
    let _telemetry = telemetry::init(&config.observability)?;

    debug!(command = ?cli.command, "authormaps v{}", authormaps_common::VERSION);
    let source = PubMedSource::from_config(&config)?;

    match cli.command {
        Commands::PubmedIds { last_name, first_name } => {
            pubmed_ids(&source, &last_name, &first_name).await
        }
        Commands::Coauthors {
            last_name,
            first_name,
            pubmed_id,
        } => coauthors(&source, &last_name, &first_name, &pubmed_id).await,
        Commands::Filtered { last_name, first_name } => {
            filtered(&source, &config, &first_name, &last_name).await
        }
        Commands::Connections { last_name, first_name } => {
            connections(&source, &config, &first_name, &last_name).await
        }
        Commands::Create {
            first_name,
            last_name,
            output,
            dpi,
            label,
        } => {
            let map = resolve_and_build_graph(&source, &config.network, &first_name, &last_name).await?;
            warn_similar(map.similar_authors());

            let options = RenderOptions {
                dpi,
                with_edge_labels: label,
                highlight: Some(map.target.display_name()),
            };
            write_image(&map.graph, &output, &options)?;
            println!("Graph image written to {}", output.display());
            Ok(())
        }
        Commands::Compile {
            first_name,
            last_name,
            author1,
            author2,
            output,
        } => {
            let map = resolve_and_build_graph(&source, &config.network, &first_name, &last_name).await?;
            warn_similar(map.similar_authors());
            info!(nodes = map.graph.node_count(), edges = map.graph.edge_count(), "Graph compiled");

            if let (Some(a), Some(b)) = (&author1, &author2) {
                println!("{}", map.shared_publications(a, b));
            }
            if let Some(path) = &output {
                map.export_node_link(path)?;
                println!("Graph written to {}", path.display());
            }
            if author1.is_none() && output.is_none() {
                for name in map.coauthor_names() {
                    println!("{}", name);
                }
            }
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn pubmed_ids(source: &impl PublicationSource, last_name: &str, first_name: &str) -> Result<()> {
    match source
        .publication_ids(&capitalize(last_name), &capitalize(first_name))
        .await?
    {
        Some(ids) => ids.iter().for_each(|id| println!("{}", id)),
        None => println!("No publications found for author"),
    }
    Ok(())
}

async fn coauthors(
    source: &impl PublicationSource,
    last_name: &str,
    first_name: &str,
    pubmed_id: &str,
) -> Result<()> {
    let needle = format!("{} {}", capitalize(last_name), capitalize(first_name)).to_lowercase();

    match source.authors(pubmed_id).await {
        Ok(authors) if authors.iter().any(|a| a.to_lowercase() == needle) => {
            authors.iter().for_each(|a| println!("{}", a));
        }
        Ok(_) | Err(AppError::MissingField { .. }) => println!("Author not found"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn filtered(
    source: &impl PublicationSource,
    config: &AppConfig,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    let target = AuthorName::new(first_name, last_name)?;
    let resolution = CoauthorResolver::new(source, &config.network).resolve(&target).await?;

    for name in &resolution.coauthors {
        println!("{}", name);
    }
    if let Err(e) = resolution.status() {
        eprintln!("{}", e);
    }
    Ok(())
}

async fn connections(
    source: &impl PublicationSource,
    config: &AppConfig,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    let target = AuthorName::new(first_name, last_name)?;
    let resolution = CoauthorResolver::new(source, &config.network).resolve(&target).await?;
    resolution.status()?;

    let shared: SharedWork = PairwiseAggregator::new(source)
        .aggregate(&resolution.coauthors)
        .await?;

    for ((a, b), ids) in shared.pairs() {
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        println!("{} - {}: {}", a, b, ids.join(", "));
    }
    Ok(())
}

fn warn_similar(similar: Option<&[String]>) {
    if let Some(names) = similar {
        eprintln!("Several authors share this surname, the graph may mix them up:");
        for name in names {
            eprintln!("  {}", name);
        }
    }
}
