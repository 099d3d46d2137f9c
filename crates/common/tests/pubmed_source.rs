//! PubMed client and flat-file cache against a local stand-in for E-utilities

use authormaps_common::config::PubMedConfig;
use authormaps_common::{AppError, FileCache, PubMedClient, PubMedSource, PublicationSource};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const ESEARCH_HITS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><Count>2</Count><RetMax>2</RetMax><RetStart>0</RetStart>
<IdList>
<Id>34754938</Id>
<Id>34062049</Id>
</IdList>
</eSearchResult>"#;

const ESEARCH_EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><Count>0</Count><RetMax>0</RetMax><RetStart>0</RetStart><IdList/></eSearchResult>"#;

const MEDLINE: &str = "PMID- 34754938
OWN - NLM
FAU - Srinivasan, Sanjana
AU  - Srinivasan S
FAU - Carugo, Alessandro
AU  - Carugo A
FAU - Tripathi, Durga N
AU  - Tripathi DN
";

#[derive(Clone, Default)]
struct Hits {
    esearch: Arc<AtomicUsize>,
    efetch: Arc<AtomicUsize>,
}

async fn esearch(State(hits): State<Hits>, Query(params): Query<HashMap<String, String>>) -> Response {
    hits.esearch.fetch_add(1, Ordering::SeqCst);
    match params.get("term").map(String::as_str) {
        Some("Srinivasan Sanjana[author]") => ESEARCH_HITS.into_response(),
        Some("Odd Name[author]") => StatusCode::BAD_REQUEST.into_response(),
        Some("Broken Server[author]") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => ESEARCH_EMPTY.into_response(),
    }
}

async fn efetch(State(hits): State<Hits>, Query(params): Query<HashMap<String, String>>) -> Response {
    hits.efetch.fetch_add(1, Ordering::SeqCst);
    assert_eq!(params.get("rettype").map(String::as_str), Some("medline"));
    match params.get("id").map(String::as_str) {
        Some("34754938") => MEDLINE.into_response(),
        _ => "\n".into_response(),
    }
}

async fn spawn_eutils() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/esearch.fcgi", get(esearch))
        .route("/efetch.fcgi", get(efetch))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}

fn source_for(base_url: &str, cache_dir: &std::path::Path) -> PubMedSource {
    paced_source_for(base_url, cache_dir, 0)
}

fn paced_source_for(base_url: &str, cache_dir: &std::path::Path, request_delay_ms: u64) -> PubMedSource {
    let config = PubMedConfig {
        base_url: base_url.to_string(),
        request_delay_ms,
        ..PubMedConfig::default()
    };
    PubMedSource::new(
        PubMedClient::new(config).unwrap(),
        FileCache::new(cache_dir).unwrap(),
    )
}

#[tokio::test]
async fn author_search_is_fetched_once_then_served_from_cache() {
    let (base_url, hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let source = source_for(&base_url, tmp.path());

    for _ in 0..2 {
        let ids = source.publication_ids("Srinivasan", "Sanjana").await.unwrap();
        assert_eq!(ids.unwrap(), vec!["34754938", "34062049"]);
    }

    assert_eq!(hits.esearch.load(Ordering::SeqCst), 1);
    assert!(tmp.path().join("SanjanaSrinivasan.xml").exists());
}

#[tokio::test]
async fn empty_search_is_not_found_and_not_cached() {
    let (base_url, hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let source = source_for(&base_url, tmp.path());

    let ids = source.publication_ids("Solanki", "Dhwani").await.unwrap();
    assert!(ids.is_none());
    assert!(!tmp.path().join("DhwaniSolanki.xml").exists());

    source.publication_ids("Solanki", "Dhwani").await.unwrap();
    assert_eq!(hits.esearch.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rejected_and_failed_searches_are_typed() {
    let (base_url, _hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let source = source_for(&base_url, tmp.path());

    let err = source.publication_ids("Odd", "Name").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));

    let err = source.publication_ids("Broken", "Server").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 503, .. }));
    assert!(err.is_server_error());
}

#[tokio::test]
async fn publication_authors_are_cached_as_json() {
    let (base_url, hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let source = source_for(&base_url, tmp.path());

    for _ in 0..2 {
        let authors = source.authors("34754938").await.unwrap();
        assert_eq!(
            authors,
            vec!["Srinivasan Sanjana", "Carugo Alessandro", "Tripathi Durga N"]
        );
    }

    assert_eq!(hits.efetch.load(Ordering::SeqCst), 1);
    let cached = std::fs::read_to_string(tmp.path().join("34754938.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&cached).unwrap();
    assert_eq!(json["FAU"][0], "Srinivasan, Sanjana");
}

#[tokio::test]
async fn record_without_authors_is_missing_field() {
    let (base_url, _hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let source = source_for(&base_url, tmp.path());

    let err = source.authors("99999999").await.unwrap_err();
    assert!(matches!(err, AppError::MissingField { ref pmid, .. } if pmid == "99999999"));
    assert!(!tmp.path().join("99999999.json").exists());
}

#[tokio::test]
async fn seeded_cache_needs_no_remote() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("BruceSchultz.xml"), ESEARCH_HITS).unwrap();
    std::fs::write(
        tmp.path().join("34062049.json"),
        r#"{"FAU": ["Schultz, Bruce", "Hoeng, Julia"]}"#,
    )
    .unwrap();

    // nothing listens on the discard port, any remote call would fail
    let source = source_for("http://127.0.0.1:9", tmp.path());

    let ids = source.publication_ids("Schultz", "Bruce").await.unwrap().unwrap();
    assert_eq!(ids.len(), 2);
    let authors = source.authors("34062049").await.unwrap();
    assert_eq!(authors, vec!["Schultz Bruce", "Hoeng Julia"]);
}

#[tokio::test]
async fn remote_fetches_are_paced_but_cache_hits_are_not() {
    let (base_url, hits) = spawn_eutils().await;
    let tmp = tempfile::tempdir().unwrap();
    let delay = Duration::from_millis(300);
    let source = paced_source_for(&base_url, tmp.path(), delay.as_millis() as u64);

    let started = Instant::now();
    source.publication_ids("Srinivasan", "Sanjana").await.unwrap();
    assert!(started.elapsed() >= delay, "remote fetch returned after {:?}", started.elapsed());

    let started = Instant::now();
    source.publication_ids("Srinivasan", "Sanjana").await.unwrap();
    assert!(started.elapsed() < delay, "cache hit took {:?}", started.elapsed());
    assert_eq!(hits.esearch.load(Ordering::SeqCst), 1);

    let started = Instant::now();
    source.authors("34754938").await.unwrap();
    assert!(started.elapsed() >= delay);

    let started = Instant::now();
    source.authors("34754938").await.unwrap();
    assert!(started.elapsed() < delay);
    assert_eq!(hits.efetch.load(Ordering::SeqCst), 1);

    let started = Instant::now();
    let err = source.publication_ids("Odd", "Name").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
    assert!(started.elapsed() < delay, "rejected search was paced");
}
