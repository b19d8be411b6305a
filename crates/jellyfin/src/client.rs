//! Jellyfin HTTP client.
//!
//! Uses the Jellyfin REST API: https://api.jellyfin.org

use std::time::Duration;

use stremfin_core::model::{ItemsResponse, MediaItem};
use stremfin_core::types::{ItemKind, Scheme};
use tracing::debug;

use crate::JellyfinError;
use crate::catalog::{Catalog, ItemQuery};
use crate::urls::Endpoints;

const X_EMBY_TOKEN: &str = "X-Emby-Token";

/// Fields requested on every item query; Jellyfin omits anything not listed.
const ITEM_FIELDS: &str = "ProviderIds,MediaSources,MediaStreams,Overview,Genres,ProductionYear,PremiereDate";

type Params = Vec<(&'static str, String)>;

pub struct JellyfinClient {
    endpoints: Endpoints,
    user_id: Option<String>,
    client: reqwest::Client,
}

impl JellyfinClient {
    /// `timeout` bounds every upstream call; a timed-out call surfaces as
    /// [`JellyfinError::Network`].
    pub fn new(
        endpoints: Endpoints,
        user_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, JellyfinError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| JellyfinError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            endpoints,
            user_id,
            client,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_items(
        &self,
        segments: &[&str],
        mut params: Params,
    ) -> Result<ItemsResponse, JellyfinError> {
        if let Some(ref user_id) = self.user_id {
            params.push(("UserId", user_id.clone()));
        }

        let url = self.endpoints.api_url(segments);
        debug!(url = %url, ?params, "Jellyfin request");

        let resp = self
            .client
            .get(url.clone())
            .header(X_EMBY_TOKEN, self.endpoints.api_key())
            .query(&params)
            .send()
            .await
            .map_err(|e| JellyfinError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(JellyfinError::Http {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        resp.json()
            .await
            .map_err(|e| JellyfinError::Parse(format!("items JSON: {e}")))
    }
}

fn provider_search_params(provider_key: &str, value: &str, kind: Option<ItemKind>) -> Params {
    let mut params = vec![
        ("Recursive", "true".to_string()),
        (
            "AnyProviderIdEquals",
            format!("{}.{value}", provider_key.to_ascii_lowercase()),
        ),
        ("Fields", ITEM_FIELDS.to_string()),
    ];
    if let Some(kind) = kind {
        params.push(("IncludeItemTypes", kind.as_str().to_string()));
    }
    params
}

fn episode_params(season: Option<u32>) -> Params {
    let mut params = vec![("Fields", ITEM_FIELDS.to_string())];
    if let Some(season) = season {
        params.push(("Season", season.to_string()));
    }
    params
}

fn listing_params(kind: ItemKind, query: &ItemQuery) -> Params {
    let mut params = vec![
        ("Recursive", "true".to_string()),
        ("IncludeItemTypes", kind.as_str().to_string()),
        ("SortBy", "SortName".to_string()),
        ("SortOrder", "Ascending".to_string()),
        ("StartIndex", query.skip.to_string()),
        ("Limit", query.limit.to_string()),
        ("Fields", ITEM_FIELDS.to_string()),
    ];
    if let Some(ref term) = query.search {
        params.push(("SearchTerm", term.clone()));
    }
    if let Some(ref genre) = query.genre {
        params.push(("Genres", genre.clone()));
    }
    params
}

#[async_trait::async_trait]
impl Catalog for JellyfinClient {
    async fn search_by_provider_id(
        &self,
        scheme: Scheme,
        value: &str,
        kind: Option<ItemKind>,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        let Some(key) = scheme.provider_key() else {
            return Ok(Vec::new());
        };
        let resp = self
            .get_items(&["Items"], provider_search_params(key, value, kind))
            .await?;
        Ok(resp.items)
    }

    async fn get_item(&self, id: &str) -> Result<Option<MediaItem>, JellyfinError> {
        let params = vec![
            ("Ids", id.to_string()),
            ("Fields", ITEM_FIELDS.to_string()),
        ];
        let resp = self.get_items(&["Items"], params).await?;
        Ok(resp.items.into_iter().next())
    }

    async fn get_episodes(
        &self,
        series_id: &str,
        season: Option<u32>,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        let resp = self
            .get_items(&["Shows", series_id, "Episodes"], episode_params(season))
            .await?;
        Ok(resp.items)
    }

    async fn list_items(
        &self,
        kind: ItemKind,
        query: &ItemQuery,
    ) -> Result<Vec<MediaItem>, JellyfinError> {
        let resp = self
            .get_items(&["Items"], listing_params(kind, query))
            .await?;
        Ok(resp.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn provider_search_uses_lowercase_key() {
        let params = provider_search_params("Imdb", "tt0903747", Some(ItemKind::Series));
        assert_eq!(param(&params, "AnyProviderIdEquals"), Some("imdb.tt0903747"));
        assert_eq!(param(&params, "IncludeItemTypes"), Some("Series"));
        assert_eq!(param(&params, "Recursive"), Some("true"));
    }

    #[test]
    fn provider_search_without_kind_is_unfiltered() {
        let params = provider_search_params("Tmdb", "1396", None);
        assert_eq!(param(&params, "IncludeItemTypes"), None);
    }

    #[test]
    fn episode_season_filter_is_optional() {
        assert_eq!(param(&episode_params(Some(2)), "Season"), Some("2"));
        assert_eq!(param(&episode_params(None), "Season"), None);
    }

    #[test]
    fn listing_carries_paging_and_search() {
        let query = ItemQuery {
            search: Some("bad".into()),
            genre: Some("Drama".into()),
            skip: 100,
            limit: 50,
        };
        let params = listing_params(ItemKind::Movie, &query);
        assert_eq!(param(&params, "StartIndex"), Some("100"));
        assert_eq!(param(&params, "Limit"), Some("50"));
        assert_eq!(param(&params, "SearchTerm"), Some("bad"));
        assert_eq!(param(&params, "Genres"), Some("Drama"));
        assert_eq!(param(&params, "IncludeItemTypes"), Some("Movie"));
    }

    #[test]
    fn items_response_tolerates_nulls() {
        let json = serde_json::json!({
            "Items": [
                { "Id": "a", "Name": "A", "Type": "Movie", "MediaSources": null }
            ],
            "TotalRecordCount": 1
        });
        let resp: ItemsResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert!(resp.items[0].media_sources.is_empty());
    }
}
