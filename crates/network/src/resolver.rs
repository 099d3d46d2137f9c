//! Co-author resolution for one target author
//!
//! Fetches every publication of the target, keeps those with a plausible
//! author count and splits the co-authors into the exact-match set and
//! the unfiltered set used for name-collision diagnostics.

use crate::name::{display_name, AuthorName};
use authormaps_common::config::NetworkConfig;
use authormaps_common::errors::{AppError, Result};
use authormaps_common::PublicationSource;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Outcome of the name-collision check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "candidates", rename_all = "snake_case")]
pub enum ResolutionStatus {
    Done,
    /// Several listed names contain the target surname (display form)
    SimilarAuthorsFound(Vec<String>),
}

/// Co-authors of one target, in record form (`Last First Middle`)
#[derive(Debug, Clone)]
pub struct Resolution {
    pub target: AuthorName,
    pub publication_ids: Vec<String>,
    /// Authors of publications that list the target exactly, target included
    pub coauthors: BTreeSet<String>,
    /// Authors of every publication that passed the author-count filter
    pub unfiltered: BTreeSet<String>,
    /// Publications without an author list
    pub skipped: Vec<String>,
    /// Publications outside the author-count bounds
    pub filtered_out: usize,
}

impl Resolution {
    /// Collision diagnostic, or the reason no graph can be built
    pub fn status(&self) -> Result<ResolutionStatus> {
        let surname = self.target.last();

        if !self.coauthors.is_empty() && !self.unfiltered.is_empty() {
            let collisions: Vec<String> = self
                .unfiltered
                .iter()
                .filter(|name| name.contains(surname))
                .map(|name| display_name(name))
                .collect();

            return Ok(if collisions.len() > 1 {
                ResolutionStatus::SimilarAuthorsFound(collisions)
            } else {
                ResolutionStatus::Done
            });
        }

        if !self.unfiltered.is_empty() {
            let needle = surname.to_lowercase();
            let similar = self
                .unfiltered
                .iter()
                .filter(|name| name.to_lowercase().contains(&needle))
                .map(|name| display_name(name))
                .collect();

            return Err(AppError::AuthorNotFound {
                name: self.target.display_name(),
                similar,
            });
        }

        Err(AppError::NoPublicationsFound {
            name: self.target.display_name(),
        })
    }
}

/// Resolves the co-authors of a target against a publication source
pub struct CoauthorResolver<'a, S: ?Sized> {
    source: &'a S,
    config: &'a NetworkConfig,
}

impl<'a, S: PublicationSource + ?Sized> CoauthorResolver<'a, S> {
    pub fn new(source: &'a S, config: &'a NetworkConfig) -> Self {
        Self { source, config }
    }

    /// Publication ids of the target, bounded by the configured cap
    #[instrument(skip(self, author), fields(author = %author))]
    pub async fn publication_ids(&self, author: &AuthorName) -> Result<Vec<String>> {
        let ids = self
            .source
            .publication_ids(author.last(), author.first())
            .await?
            .ok_or_else(|| AppError::NoPublicationsFound {
                name: author.display_name(),
            })?;

        if ids.len() > self.config.max_publications {
            warn!(count = ids.len(), limit = self.config.max_publications, "Too many publications");
            return Err(AppError::TooManyPublications {
                name: author.display_name(),
                count: ids.len(),
                limit: self.config.max_publications,
            });
        }

        Ok(ids)
    }

    /// Fetch all publications of the target and collect both co-author sets
    #[instrument(skip(self, target), fields(author = %target))]
    pub async fn resolve(&self, target: &AuthorName) -> Result<Resolution> {
        let publication_ids = self.publication_ids(target).await?;
        let needle = target.record_name().to_lowercase();
        let bounds = self.config.min_authors..=self.config.max_authors;

        let mut resolution = Resolution {
            target: target.clone(),
            publication_ids: Vec::with_capacity(publication_ids.len()),
            coauthors: BTreeSet::new(),
            unfiltered: BTreeSet::new(),
            skipped: Vec::new(),
            filtered_out: 0,
        };

        let total = publication_ids.len();
        for (i, pmid) in publication_ids.into_iter().enumerate() {
            debug!(pmid = %pmid, progress = %format!("{}/{}", i + 1, total), "Fetching authors");

            let authors = match self.source.authors(&pmid).await {
                Ok(authors) => authors,
                Err(AppError::MissingField { field, .. }) => {
                    debug!(pmid = %pmid, field = %field, "Publication skipped");
                    resolution.skipped.push(pmid);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !bounds.contains(&authors.len()) {
                resolution.filtered_out += 1;
                resolution.publication_ids.push(pmid);
                continue;
            }

            if authors.iter().any(|a| a.to_lowercase() == needle) {
                resolution.coauthors.extend(authors.iter().cloned());
            }
            resolution.unfiltered.extend(authors);
            resolution.publication_ids.push(pmid);
        }

        info!(
            publications = resolution.publication_ids.len(),
            coauthors = resolution.coauthors.len(),
            unfiltered = resolution.unfiltered.len(),
            skipped = resolution.skipped.len(),
            filtered_out = resolution.filtered_out,
            "Co-authors resolved"
        );

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authormaps_common::MemorySource;

    fn crowd(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{} Alex", prefix, i)).collect()
    }

    fn target() -> AuthorName {
        AuthorName::new("Sanjana", "Srinivasan").unwrap()
    }

    #[tokio::test]
    async fn test_filters_by_author_count() {
        let mut big = crowd("Big", 50);
        big.push("Srinivasan Sanjana".to_string());

        let source = MemorySource::new()
            .with_author("Srinivasan", "Sanjana", ["1", "2", "3", "4"])
            .with_publication("1", ["Srinivasan Sanjana", "Carugo Alessandro"])
            .with_publication("2", ["Srinivasan Sanjana"])
            .with_publication("3", big)
            .with_publication("4", ["Tripathi Durga N", "Carugo Alessandro"]);
        let config = NetworkConfig::default();

        let resolution = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap();

        assert_eq!(resolution.filtered_out, 2);
        assert_eq!(
            resolution.coauthors.iter().collect::<Vec<_>>(),
            vec!["Carugo Alessandro", "Srinivasan Sanjana"]
        );
        assert!(resolution.unfiltered.contains("Tripathi Durga N"));
        assert!(!resolution.coauthors.contains("Tripathi Durga N"));
        assert_eq!(resolution.status().unwrap(), ResolutionStatus::Done);
    }

    #[tokio::test]
    async fn test_missing_author_list_is_skipped() {
        let source = MemorySource::new()
            .with_author("Srinivasan", "Sanjana", ["1", "2"])
            .with_publication("1", ["Srinivasan Sanjana", "Carugo Alessandro"]);
        let config = NetworkConfig::default();

        let resolution = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap();

        assert_eq!(resolution.skipped, vec!["2"]);
        assert_eq!(resolution.coauthors.len(), 2);
    }

    #[tokio::test]
    async fn test_cap_is_checked_before_fetching() {
        let ids: Vec<String> = (0..1001).map(|i| i.to_string()).collect();
        let source = MemorySource::new().with_author("Srinivasan", "Sanjana", ids);
        let config = NetworkConfig::default();

        let err = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TooManyPublications { count: 1001, limit: 1000, .. }));
        assert_eq!(source.author_lookups(), 0);
    }

    #[tokio::test]
    async fn test_exactly_at_cap_is_accepted() {
        let ids: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        let source = MemorySource::new().with_author("Srinivasan", "Sanjana", ids);
        let config = NetworkConfig {
            max_publications: 3,
            ..NetworkConfig::default()
        };

        let resolution = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap();
        assert_eq!(resolution.skipped.len(), 3);
    }

    #[tokio::test]
    async fn test_no_publications() {
        let source = MemorySource::new();
        let config = NetworkConfig::default();

        let err = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoPublicationsFound { .. }));
    }

    #[tokio::test]
    async fn test_similar_authors_reported() {
        let source = MemorySource::new()
            .with_author("Srinivasan", "Sanjana", ["1", "2"])
            .with_publication("1", ["Srinivasan Sanjana", "Carugo Alessandro"])
            .with_publication("2", ["Srinivasan Sanjana S", "Carugo Alessandro"]);
        let config = NetworkConfig::default();

        let resolution = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap();

        assert_eq!(
            resolution.status().unwrap(),
            ResolutionStatus::SimilarAuthorsFound(vec![
                "Sanjana Srinivasan".to_string(),
                "Sanjana S Srinivasan".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_author_not_found_lists_candidates() {
        let source = MemorySource::new()
            .with_author("Srinivasan", "Sanjana", ["1"])
            .with_publication("1", ["SRINIVASAN Sanjana S", "Carugo Alessandro"]);
        let config = NetworkConfig::default();

        let resolution = CoauthorResolver::new(&source, &config)
            .resolve(&target())
            .await
            .unwrap();

        assert!(resolution.coauthors.is_empty());
        match resolution.status() {
            Err(AppError::AuthorNotFound { similar, .. }) => {
                assert_eq!(similar, vec!["Sanjana S SRINIVASAN"]);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }
}
