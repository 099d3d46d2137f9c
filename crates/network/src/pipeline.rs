//! End-to-end co-author map construction
//!
//! Idle -> ResolvingTarget -> ResolvingCoauthors -> AggregatingPairs ->
//! GraphReady, with Failed reachable from every working stage.

use crate::aggregator::{PairwiseAggregator, SharedWork};
use crate::graph::CoauthorGraph;
use crate::name::AuthorName;
use crate::resolver::{CoauthorResolver, Resolution, ResolutionStatus};
use authormaps_common::config::NetworkConfig;
use authormaps_common::errors::{AppError, Result};
use authormaps_common::{metrics, PublicationSource};
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ResolvingTarget,
    ResolvingCoauthors,
    AggregatingPairs,
    GraphReady,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ResolvingTarget => "resolving_target",
            Stage::ResolvingCoauthors => "resolving_coauthors",
            Stage::AggregatingPairs => "aggregating_pairs",
            Stage::GraphReady => "graph_ready",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

struct StageTracker {
    stage: Stage,
    started: Instant,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: Stage::Idle,
            started: Instant::now(),
        }
    }

    fn enter(&mut self, next: Stage) {
        info!(from = %self.stage, to = %next, elapsed_ms = self.started.elapsed().as_millis() as u64, "Pipeline stage");
        self.stage = next;
    }

    fn fail(&mut self, err: &AppError) {
        warn!(stage = %self.stage, code = ?err.code(), error = %err, "Pipeline failed");
        self.stage = Stage::Failed;
        metrics::record_pipeline(self.started.elapsed().as_secs_f64(), &format!("{:?}", err.code()));
    }

    fn finish(&mut self) {
        self.enter(Stage::GraphReady);
        metrics::record_pipeline(self.started.elapsed().as_secs_f64(), "graph_ready");
    }
}

/// Everything learned about one target author
#[derive(Debug, Clone)]
pub struct AuthorMap {
    pub target: AuthorName,
    pub resolution: Resolution,
    pub status: ResolutionStatus,
    pub shared_work: SharedWork,
    pub graph: CoauthorGraph,
}

impl AuthorMap {
    /// Shared publications of two co-authors by display or record name
    pub fn shared_publications(&self, a: &str, b: &str) -> u32 {
        self.graph.shared_publications(a, b)
    }

    /// Display names of the graph's authors, sorted
    pub fn coauthor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.graph.nodes().map(|n| n.label.clone()).collect();
        names.sort();
        names
    }

    /// Candidate names when the target surname is ambiguous
    pub fn similar_authors(&self) -> Option<&[String]> {
        match &self.status {
            ResolutionStatus::SimilarAuthorsFound(names) => Some(names),
            ResolutionStatus::Done => None,
        }
    }

    pub fn export_node_link(&self, path: impl AsRef<Path>) -> Result<()> {
        self.graph.export_node_link(path)
    }
}

/// Validate the name and build the co-author map
pub async fn resolve_and_build_graph<S>(
    source: &S,
    config: &NetworkConfig,
    first_name: &str,
    last_name: &str,
) -> Result<AuthorMap>
where
    S: PublicationSource + ?Sized,
{
    let target = AuthorName::new(first_name, last_name)?;
    build_author_map(source, config, &target).await
}

/// Build the co-author map of an already validated target
#[instrument(skip(source, config, target), fields(author = %target))]
pub async fn build_author_map<S>(source: &S, config: &NetworkConfig, target: &AuthorName) -> Result<AuthorMap>
where
    S: PublicationSource + ?Sized,
{
    let mut tracker = StageTracker::new();
    match run(source, config, target, &mut tracker).await {
        Ok(map) => {
            tracker.finish();
            metrics::record_graph(map.graph.node_count(), map.graph.edge_count());
            info!(
                nodes = map.graph.node_count(),
                edges = map.graph.edge_count(),
                similar = map.similar_authors().map_or(0, <[String]>::len),
                "Co-author map ready"
            );
            Ok(map)
        }
        Err(e) => {
            tracker.fail(&e);
            Err(e)
        }
    }
}

async fn run<S>(
    source: &S,
    config: &NetworkConfig,
    target: &AuthorName,
    tracker: &mut StageTracker,
) -> Result<AuthorMap>
where
    S: PublicationSource + ?Sized,
{
    tracker.enter(Stage::ResolvingTarget);
    let resolution = CoauthorResolver::new(source, config).resolve(target).await?;
    let status = resolution.status()?;

    tracker.enter(Stage::ResolvingCoauthors);
    let aggregator = PairwiseAggregator::new(source);
    let lists = aggregator.collect_publications(&resolution.coauthors).await?;

    tracker.enter(Stage::AggregatingPairs);
    let shared_work = SharedWork::from_publications(&lists);
    let graph = CoauthorGraph::build(&resolution.coauthors, &shared_work.weights());

    Ok(AuthorMap {
        target: target.clone(),
        resolution,
        status,
        shared_work,
        graph,
    })
}
