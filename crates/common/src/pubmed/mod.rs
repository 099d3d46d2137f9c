//! Publication source abstraction
//!
//! Provides a unified interface for the two lookups the co-author network needs:
//! - PubMed, read through the flat-file cache
//! - An in-memory source for tests and offline fixtures

mod client;
pub mod parse;

pub use client::PubMedClient;
pub use parse::{authors_from_record, parse_esearch, parse_medline, MedlineRecord, AUTHOR_FIELD};

use crate::cache::{keys, FileCache};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Trait for bibliographic lookups
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Publication ids of an author; `None` when the search matched nothing
    async fn publication_ids(&self, last_name: &str, first_name: &str) -> Result<Option<Vec<String>>>;

    /// Author list of one publication as "Last First Middle" entries
    async fn authors(&self, pmid: &str) -> Result<Vec<String>>;
}

/// PubMed behind the flat-file cache
pub struct PubMedSource {
    client: PubMedClient,
    cache: FileCache,
}

impl PubMedSource {
    pub fn new(client: PubMedClient, cache: FileCache) -> Self {
        Self { client, cache }
    }

    /// Build client and cache from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = PubMedClient::new(config.pubmed.clone())?;
        let cache = FileCache::new(&config.cache.dir)?;
        Ok(Self::new(client, cache))
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }
}

#[async_trait]
impl PublicationSource for PubMedSource {
    async fn publication_ids(&self, last_name: &str, first_name: &str) -> Result<Option<Vec<String>>> {
        let key = keys::author_ids(first_name, last_name);

        let xml = self
            .cache
            .get_or_fetch(&key, || async {
                let xml = self.client.search_author(last_name, first_name).await?;
                // only searches with hits are worth keeping
                Ok::<_, AppError>(parse_esearch(&xml)?.map(|_| xml))
            })
            .await?;

        match xml {
            Some(xml) => parse_esearch(&xml),
            None => {
                debug!(author = %format!("{} {}", first_name, last_name), "No publications listed");
                Ok(None)
            }
        }
    }

    async fn authors(&self, pmid: &str) -> Result<Vec<String>> {
        let key = keys::publication(pmid);

        let json = self
            .cache
            .get_or_fetch(&key, || async {
                let text = self.client.fetch_medline(pmid).await?;
                let record = parse_medline(&text);
                if !record.contains(AUTHOR_FIELD) {
                    return Err(AppError::MissingField {
                        pmid: pmid.to_string(),
                        field: AUTHOR_FIELD.to_string(),
                    });
                }
                Ok::<_, AppError>(Some(serde_json::to_string(&record)?))
            })
            .await?;

        match json {
            Some(json) => authors_from_record(pmid, &json),
            None => Err(AppError::MissingField {
                pmid: pmid.to_string(),
                field: AUTHOR_FIELD.to_string(),
            }),
        }
    }
}

/// In-memory source for testing and fixtures
///
/// Author keys are matched case-insensitively on "last first".
#[derive(Default)]
pub struct MemorySource {
    ids: HashMap<String, Vec<String>>,
    authors: HashMap<String, Vec<String>>,
    bad_requests: Vec<String>,
    id_lookups: AtomicUsize,
    author_lookups: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(last_name: &str, first_name: &str) -> String {
        format!("{} {}", last_name, first_name).to_lowercase()
    }

    /// Register the publication ids returned for an author search
    pub fn with_author<I, S>(mut self, last_name: &str, first_name: &str, pmids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.insert(
            Self::key(last_name, first_name),
            pmids.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Register the author list ("Last First") of a publication
    pub fn with_publication<I, S>(mut self, pmid: &str, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors
            .insert(pmid.to_string(), authors.into_iter().map(Into::into).collect());
        self
    }

    /// Make the search for an author fail like a rejected E-utilities query
    pub fn with_bad_request(mut self, last_name: &str, first_name: &str) -> Self {
        self.bad_requests.push(Self::key(last_name, first_name));
        self
    }

    /// Author searches served so far
    pub fn id_lookups(&self) -> usize {
        self.id_lookups.load(Ordering::SeqCst)
    }

    /// Publication fetches served so far
    pub fn author_lookups(&self) -> usize {
        self.author_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PublicationSource for MemorySource {
    async fn publication_ids(&self, last_name: &str, first_name: &str) -> Result<Option<Vec<String>>> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        let key = Self::key(last_name, first_name);

        if self.bad_requests.contains(&key) {
            return Err(AppError::BadRequest { query: key });
        }

        Ok(self.ids.get(&key).filter(|ids| !ids.is_empty()).cloned())
    }

    async fn authors(&self, pmid: &str) -> Result<Vec<String>> {
        self.author_lookups.fetch_add(1, Ordering::SeqCst);

        self.authors
            .get(pmid)
            .cloned()
            .ok_or_else(|| AppError::MissingField {
                pmid: pmid.to_string(),
                field: AUTHOR_FIELD.to_string(),
            })
    }
}
