//! In-process [`Catalog`] over a fixed item list.
//!
//! Reproduces the upstream quirks the resolver has to cope with: provider-id
//! search is substring-based (so it over-returns), the season filter can be
//! switched off, and any operation can be made to fail. Every call is
//! counted so tests can tell "nothing found" from "never asked".

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use stremfin_core::model::MediaItem;
use stremfin_core::types::{ItemKind, Scheme};

use crate::JellyfinError;
use crate::catalog::{Catalog, ItemQuery};

/// Catalog operations, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    GetItem,
    SeasonEpisodes,
    AllEpisodes,
    List,
}

impl Operation {
    const ALL: [Operation; 5] = [
        Self::Search,
        Self::GetItem,
        Self::SeasonEpisodes,
        Self::AllEpisodes,
        Self::List,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    items: Vec<MediaItem>,
    scripted_search: Option<Vec<MediaItem>>,
    broken_season_filter: bool,
    failing: Mutex<Vec<Operation>>,
    calls: [AtomicUsize; Operation::ALL.len()],
}

impl InMemoryCatalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Answer every provider-id search with `results`, whatever was asked.
    pub fn with_search_results(mut self, results: Vec<MediaItem>) -> Self {
        self.scripted_search = Some(results);
        self
    }

    /// Season-filtered episode queries come back empty.
    pub fn with_broken_season_filter(mut self) -> Self {
        self.broken_season_filter = true;
        self
    }

    /// Make `op` return a network error from now on.
    pub fn fail(&self, op: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(op);
        }
    }

    /// Number of times `op` was invoked.
    pub fn calls(&self, op: Operation) -> usize {
        self.calls[op.slot()].load(Ordering::SeqCst)
    }

    fn enter(&self, op: Operation) -> Result<(), JellyfinError> {
        self.calls[op.slot()].fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing
            .lock()
            .map(|f| f.contains(&op))
            .unwrap_or(false);
        if failing {
            return Err(JellyfinError::Network(format!("{op:?}: connection refused")));
        }
        Ok(())
    }

    fn episodes_of<'a>(&'a self, series_id: &'a str) -> impl Iterator<Item = &'a MediaItem> {
        self.items.iter().filter(move |i| {
            i.kind == ItemKind::Episode && i.series_id.as_deref() == Some(series_id)
        })
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    async fn search_by_provider_id(
        &self,
        scheme: Scheme,
        value: &str,
        kind: Option<ItemKind>,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        self.enter(Operation::Search)?;
        if let Some(ref scripted) = self.scripted_search {
            return Ok(scripted.clone());
        }
        let Some(key) = scheme.provider_key() else {
            return Ok(Vec::new());
        };
        let needle = value.to_ascii_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|i| kind.is_none_or(|k| i.kind == k))
            .filter(|i| {
                i.provider_ids.iter().any(|(k, v)| {
                    k.eq_ignore_ascii_case(key) && v.to_ascii_lowercase().contains(&needle)
                })
            })
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<MediaItem>, JellyfinError> {
        self.enter(Operation::GetItem)?;
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    async fn get_episodes(
        &self,
        series_id: &str,
        season: Option<u32>,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        match season {
            Some(season) => {
                self.enter(Operation::SeasonEpisodes)?;
                if self.broken_season_filter {
                    return Ok(Vec::new());
                }
                Ok(self
                    .episodes_of(series_id)
                    .filter(|i| i.parent_index_number == Some(season))
                    .cloned()
                    .collect())
            }
            None => {
                self.enter(Operation::AllEpisodes)?;
                Ok(self.episodes_of(series_id).cloned().collect())
            }
        }
    }

    async fn list_items(
        &self,
        kind: ItemKind,
        query: &ItemQuery,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        self.enter(Operation::List)?;
        let mut matching: Vec<&MediaItem> = self
            .items
            .iter()
            .filter(|i| i.kind == kind)
            .filter(|i| {
                query.search.as_deref().is_none_or(|term| {
                    i.name.to_lowercase().contains(&term.to_lowercase())
                })
            })
            .filter(|i| {
                query
                    .genre
                    .as_deref()
                    .is_none_or(|g| i.genres.iter().any(|x| x.eq_ignore_ascii_case(g)))
            })
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}
