//! Pairwise shared publications between co-authors
//!
//! Each co-author's own publication list is fetched once; every unordered
//! pair of co-authors is then intersected. Pairs are kept under their full
//! record names and folded onto canonical short-id pairs for the graph.

use crate::name::{short_id, AuthorName};
use authormaps_common::errors::{AppError, Result};
use authormaps_common::PublicationSource;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Publication ids per co-author, keyed by record name
pub type PublicationLists = BTreeMap<String, BTreeSet<String>>;

/// Ordered short-id pair -> number of shared publications
pub type PairWeights = BTreeMap<(String, String), u32>;

/// Order a pair so (a, b) and (b, a) share one key
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Shared publications of every co-author pair with at least one in common
#[derive(Debug, Clone, Default, Serialize)]
pub struct SharedWork {
    pairs: BTreeMap<(String, String), BTreeSet<String>>,
}

impl SharedWork {
    /// Intersect every unordered pair of publication lists
    pub fn from_publications(lists: &PublicationLists) -> Self {
        let entries: Vec<(&String, &BTreeSet<String>)> = lists.iter().collect();
        let mut pairs = BTreeMap::new();

        for (i, (a, a_ids)) in entries.iter().enumerate() {
            for (b, b_ids) in &entries[i + 1..] {
                let shared: BTreeSet<String> = a_ids.intersection(b_ids).cloned().collect();
                if !shared.is_empty() {
                    pairs.insert(canonical_pair(a, b), shared);
                }
            }
        }

        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Full-name pairs and their shared publication ids
    pub fn pairs(&self) -> impl Iterator<Item = (&(String, String), &BTreeSet<String>)> {
        self.pairs.iter()
    }

    /// Shared ids of two record names, in either order
    pub fn shared(&self, a: &str, b: &str) -> Option<&BTreeSet<String>> {
        self.pairs.get(&canonical_pair(a, b))
    }

    /// Fold the full-name pairs onto short-id pairs.
    ///
    /// Pairs collapsing onto one short id are dropped; distinct pairs
    /// sharing a short-id pair count the union of their publications.
    pub fn weights(&self) -> PairWeights {
        let mut merged: BTreeMap<(String, String), BTreeSet<&str>> = BTreeMap::new();

        for ((a, b), ids) in &self.pairs {
            let (sa, sb) = (short_id(a), short_id(b));
            if sa == sb {
                debug!(a = %a, b = %b, short_id = %sa, "Pair collapses onto one node");
                continue;
            }
            merged
                .entry(canonical_pair(&sa, &sb))
                .or_default()
                .extend(ids.iter().map(String::as_str));
        }

        merged
            .into_iter()
            .map(|(pair, ids)| (pair, ids.len() as u32))
            .collect()
    }
}

/// Fetches each co-author's publication list
pub struct PairwiseAggregator<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: PublicationSource + ?Sized> PairwiseAggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// One search per co-author; rejected or empty searches give an empty list
    #[instrument(skip(self, coauthors), fields(coauthors = coauthors.len()))]
    pub async fn collect_publications(&self, coauthors: &BTreeSet<String>) -> Result<PublicationLists> {
        let mut lists = PublicationLists::new();
        let total = coauthors.len();

        for (i, record_name) in coauthors.iter().enumerate() {
            let name = AuthorName::from_record(record_name);
            debug!(author = %name, progress = %format!("{}/{}", i + 1, total), "Fetching co-author publications");

            let ids = match self.source.publication_ids(name.last(), name.first()).await {
                Ok(Some(ids)) => ids.into_iter().collect(),
                Ok(None) => BTreeSet::new(),
                Err(AppError::BadRequest { query }) => {
                    warn!(author = %record_name, query = %query, "Co-author search rejected, no publications counted");
                    BTreeSet::new()
                }
                Err(e) => return Err(e),
            };

            lists.insert(record_name.clone(), ids);
        }

        Ok(lists)
    }

    /// Fetch publication lists and intersect all pairs
    pub async fn aggregate(&self, coauthors: &BTreeSet<String>) -> Result<SharedWork> {
        let lists = self.collect_publications(coauthors).await?;
        let shared = SharedWork::from_publications(&lists);
        info!(coauthors = lists.len(), pairs = shared.len(), "Shared publications aggregated");
        Ok(shared)
    }
}
