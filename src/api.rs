//! News API interaction.
//!
//! Two endpoints are used depending on whether the step has a search query:
//!
//! | Query | Endpoint | `q` parameter |
//! |-------|----------|---------------|
//! | non-empty | `v2/everything` | query with `,`/`、` rewritten to ` OR ` |
//! | empty | `v2/top-headlines` | omitted |
//!
//! Both requests always carry `apiKey`, `language`, `pageSize` and
//! `sortBy=publishedAt`. Every call is a single round-trip: no retry, no cache.
//!
//! # Architecture
//!
//! - [`ArticleSource`]: the seam the execute callback fetches through
//! - [`NewsRequest`]: pure request construction, testable without a network
//! - [`NewsApiClient`]: the `reqwest` implementation of [`ArticleSource`]

use crate::error::FetchError;
use crate::models::{Article, ArticleQuery, NewsApiResponse};
use crate::utils::truncate_for_log;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Separators accepted between keywords of a search query.
const QUERY_SEPARATORS: [char; 2] = [',', '、'];

/// Anything that can produce articles for a query.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    /// Fetch up to `query.num_articles` articles, most recently published first.
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Full-text keyword search across all articles.
    Everything,
    /// Curated top stories, no keyword filter.
    TopHeadlines,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Everything => "v2/everything",
            Endpoint::TopHeadlines => "v2/top-headlines",
        }
    }
}

/// A fully built News API request: endpoint plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl NewsRequest {
    pub fn build(api_key: &str, query: &ArticleQuery) -> Self {
        let mut params = vec![
            ("apiKey", api_key.to_string()),
            ("language", query.language.to_string()),
        ];

        let endpoint = if query.query.is_empty() {
            Endpoint::TopHeadlines
        } else {
            params.push(("q", rewrite_query(&query.query)));
            Endpoint::Everything
        };

        params.push(("pageSize", query.num_articles.to_string()));
        params.push(("sortBy", "publishedAt".to_string()));

        Self { endpoint, params }
    }

    /// Value of the parameter `name`, if sent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Turn `a,b` / `a、b` into the API's "any of" syntax `a OR b`.
pub fn rewrite_query(query: &str) -> String {
    query.replace(QUERY_SEPARATORS, " OR ")
}

/// Map a decoded response body to articles.
pub fn articles_from_response(body: NewsApiResponse) -> Result<Vec<Article>, FetchError> {
    match body.articles {
        Some(raw) => raw.into_iter().map(Article::try_from).collect(),
        None if body.status.as_deref() == Some("error") => Err(FetchError::Api {
            code: body.code.unwrap_or_default(),
            message: body.message.unwrap_or_default(),
        }),
        None => Err(FetchError::MalformedResponse),
    }
}

/// `reqwest`-backed News API client.
pub struct NewsApiClient {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl NewsApiClient {
    /// Create a client for the API rooted at `base_url` (e.g. `https://newsapi.org`).
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: directory_url(base_url)?,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        })
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ArticleSource for NewsApiClient {
    /// Query `everything` (keywords given) or `top-headlines` (no keywords).
    ///
    /// # Arguments
    ///
    /// * `query` - Keywords, page size and language of the request
    ///
    /// # Returns
    ///
    /// The articles in the order News API returned them, at most
    /// `query.num_articles` long.
    ///
    /// # Errors
    ///
    /// [`FetchError::Api`] when News API answers `status: "error"`, and the
    /// transport, decode or timestamp variants otherwise.
    #[instrument(
        level = "info",
        skip_all,
        fields(query = %query.query, page_size = query.num_articles, language = %query.language)
    )]
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, FetchError> {
        let request = NewsRequest::build(&self.api_key, query);
        let url = self.base_url.join(request.endpoint.path())?;
        debug!(endpoint = ?request.endpoint, %url, "Requesting articles");

        let t0 = Instant::now();
        let response = self.client.get(url).query(&request.params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        let body: NewsApiResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    %status,
                    elapsed_ms,
                    error = %e,
                    body_preview = %truncate_for_log(&text, 300),
                    "News API returned non-JSON body"
                );
                return Err(e.into());
            }
        };

        match articles_from_response(body) {
            Ok(articles) => {
                info!(%status, elapsed_ms, count = articles.len(), "Fetched articles");
                Ok(articles)
            }
            Err(e) => {
                warn!(%status, elapsed_ms, error = %e, "News API response rejected");
                Err(e)
            }
        }
    }
}

/// Parse `base` and make sure relative joins append to its path.
pub(crate) fn directory_url(base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use mockito::Matcher;

    fn query(q: &str) -> ArticleQuery {
        ArticleQuery {
            query: q.to_string(),
            num_articles: 3,
            language: Language::Jp,
        }
    }

    const TWO_ARTICLES: &str = r#"{
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": "nhk", "name": "NHK"},
                "author": "Reporter",
                "title": "東証 続伸",
                "description": "株価が上昇",
                "url": "https://example.com/1",
                "urlToImage": "https://example.com/1.jpg",
                "publishedAt": "2020-05-13T01:02:03Z",
                "content": "本文"
            },
            {
                "source": {"id": null, "name": "Example"},
                "author": null,
                "title": "テレワーク拡大",
                "description": "在宅勤務",
                "url": "https://example.com/2",
                "urlToImage": null,
                "publishedAt": "2020-05-12T20:00:00Z",
                "content": null
            }
        ]
    }"#;

    #[test]
    fn test_rewrite_query_separators() {
        assert_eq!(rewrite_query("東証、テレワーク"), "東証 OR テレワーク");
        assert_eq!(rewrite_query("rust,go"), "rust OR go");
        assert_eq!(rewrite_query("a、b,c"), "a OR b OR c");
        assert_eq!(rewrite_query("single"), "single");
    }

    #[test]
    fn test_build_search_request() {
        let request = NewsRequest::build("key", &query("東証、テレワーク"));
        assert_eq!(request.endpoint, Endpoint::Everything);
        assert_eq!(request.param("q"), Some("東証 OR テレワーク"));
        assert_eq!(request.param("apiKey"), Some("key"));
        assert_eq!(request.param("language"), Some("jp"));
        assert_eq!(request.param("pageSize"), Some("3"));
        assert_eq!(request.param("sortBy"), Some("publishedAt"));
    }

    #[test]
    fn test_build_top_headlines_request_has_no_q() {
        let request = NewsRequest::build("key", &query(""));
        assert_eq!(request.endpoint, Endpoint::TopHeadlines);
        assert!(request.params.iter().all(|(name, _)| *name != "q"));
        assert_eq!(request.params.len(), 4);
    }

    #[test]
    fn test_missing_articles_is_malformed() {
        let body: NewsApiResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(matches!(
            articles_from_response(body),
            Err(FetchError::MalformedResponse)
        ));
    }

    #[test]
    fn test_error_body_is_api_error() {
        let body: NewsApiResponse = serde_json::from_str(
            r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#,
        )
        .unwrap();
        match articles_from_response(body) {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, "apiKeyInvalid");
                assert_eq!(message, "Your API key is invalid.");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_directory_url_appends_slash() {
        assert_eq!(
            directory_url("https://newsapi.org").unwrap().as_str(),
            "https://newsapi.org/"
        );
        assert_eq!(
            directory_url("http://proxy.local/news").unwrap().join("v2/everything").unwrap().as_str(),
            "http://proxy.local/news/v2/everything"
        );
    }

    #[tokio::test]
    async fn test_fetch_everything_with_mock() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "東証 OR テレワーク".into()),
                Matcher::UrlEncoded("apiKey".into(), "secret".into()),
                Matcher::UrlEncoded("language".into(), "jp".into()),
                Matcher::UrlEncoded("pageSize".into(), "3".into()),
                Matcher::UrlEncoded("sortBy".into(), "publishedAt".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_ARTICLES)
            .create_async()
            .await;

        let client = NewsApiClient::new(&server.url(), "secret").unwrap();
        let articles = client
            .fetch_articles(&query("東証、テレワーク"))
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "東証 続伸");
        assert_eq!(articles[0].source.id, "nhk");
        assert_eq!(articles[0].image_url, "https://example.com/1.jpg");
        assert_eq!(
            articles[0].published_at.to_rfc3339(),
            "2020-05-13T01:02:03+00:00"
        );
        assert_eq!(articles[1].image_url, "");
        assert_eq!(articles[1].author, "");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_top_headlines_with_mock() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/top-headlines")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("language".into(), "en".into()),
                Matcher::UrlEncoded("pageSize".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ok", "totalResults": 0, "articles": []}"#)
            .create_async()
            .await;

        let client = NewsApiClient::new(&server.url(), "secret").unwrap();
        let articles = client
            .fetch_articles(&ArticleQuery {
                query: String::new(),
                num_articles: 1,
                language: Language::En,
            })
            .await
            .unwrap();

        assert!(articles.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "error", "code": "apiKeyInvalid", "message": "bad key"}"#)
            .create_async()
            .await;

        let client = NewsApiClient::new(&server.url(), "wrong").unwrap();
        let err = client.fetch_articles(&query("rust")).await.unwrap_err();
        assert_eq!(err.to_string(), "News API error apiKeyInvalid: bad key");
    }

    #[tokio::test]
    async fn test_fetch_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = NewsApiClient::new(&server.url(), "secret").unwrap();
        let err = client.fetch_articles(&query("rust")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_invalid_base_url_is_url_error() {
        let err = NewsApiClient::new("not a url", "secret").unwrap_err();
        assert!(matches!(err, FetchError::Url(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = NewsApiClient::new("https://newsapi.org", "top-secret").unwrap();
        assert!(!format!("{client:?}").contains("top-secret"));
    }
}
