//! Co-author map handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use authormaps_common::errors::Result;
use authormaps_network::{
    build_author_map, render_svg, AuthorMap, AuthorName, NodeLinkData, RenderOptions,
    ResolutionStatus,
};

/// Search box request
#[derive(Debug, Deserialize)]
pub struct AuthorMapRequest {
    /// `First [Middle…] Last`
    pub search: String,
}

#[derive(Serialize)]
pub struct AuthorMapResponse {
    pub first_name: String,
    pub last_name: String,
    /// `done` or `similar_authors_found`
    pub status: String,
    pub similar_authors: Vec<String>,
    pub publications: usize,
    pub coauthors: Vec<String>,
    pub graph: NodeLinkData,
}

#[derive(Debug, Deserialize)]
pub struct SharedPublicationsQuery {
    pub first_name: String,
    pub last_name: String,
    pub author1: String,
    pub author2: String,
}

#[derive(Serialize)]
pub struct SharedPublicationsResponse {
    pub num_shared_pub: u32,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub edge_labels: bool,
    pub dpi: Option<u32>,
}

async fn author_map(state: &AppState, target: &AuthorName) -> Result<AuthorMap> {
    build_author_map(state.source.as_ref(), &state.config.network, target).await
}

/// Build the co-author map of a searched name
pub async fn create_map(
    State(state): State<AppState>,
    Json(request): Json<AuthorMapRequest>,
) -> Result<Json<AuthorMapResponse>> {
    let target = AuthorName::parse_query(&request.search)?;
    let map = author_map(&state, &target).await?;

    let (status, similar_authors) = match &map.status {
        ResolutionStatus::Done => ("done", Vec::new()),
        ResolutionStatus::SimilarAuthorsFound(names) => ("similar_authors_found", names.clone()),
    };

    info!(
        author = %target,
        nodes = map.graph.node_count(),
        edges = map.graph.edge_count(),
        status,
        "Co-author map served"
    );

    Ok(Json(AuthorMapResponse {
        first_name: target.first().to_string(),
        last_name: target.last().to_string(),
        status: status.to_string(),
        similar_authors,
        publications: map.resolution.publication_ids.len(),
        coauthors: map.coauthor_names(),
        graph: map.graph.to_node_link(),
    }))
}

/// Number of publications two co-authors of the target share
pub async fn shared_publications(
    State(state): State<AppState>,
    Query(query): Query<SharedPublicationsQuery>,
) -> Result<Json<SharedPublicationsResponse>> {
    let target = AuthorName::new(&query.first_name, &query.last_name)?;
    let map = author_map(&state, &target).await?;

    Ok(Json(SharedPublicationsResponse {
        num_shared_pub: map.shared_publications(&query.author1, &query.author2),
    }))
}

/// Render the target's co-author graph as SVG
pub async fn map_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response> {
    let target = AuthorName::new(&query.first_name, &query.last_name)?;
    let map = author_map(&state, &target).await?;

    let options = RenderOptions {
        dpi: query.dpi.unwrap_or(RenderOptions::default().dpi),
        with_edge_labels: query.edge_labels,
        highlight: Some(target.display_name()),
    };
    let svg = render_svg(&map.graph, &options);

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
