//! Hacker News front page via the Algolia search API.
//!
//! One `GET {endpoint}?tags=front_page&hitsPerPage={hits}` per fetch.  The
//! response is `{ "hits": [ ... ] }`; each hit is decoded on its own so that
//! one malformed record costs one story, not the whole batch.
//!
//! ## Field degradation
//!
//! | field          | when missing, null or of the wrong type             |
//! |----------------|-----------------------------------------------------|
//! | `objectID`     | record rejected, counted in [`Batch::rejected`]     |
//! | `title`        | `story_title`, else empty                           |
//! | `url`          | `None`                                              |
//! | `points`       | 0                                                   |
//! | `num_comments` | 0                                                   |
//! | `author`       | empty                                               |
//! | `created_at`   | `created_at_i` (unix seconds), else `None`          |

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::{Batch, FetchError, Story, StorySource};

/// Public Algolia endpoint for Hacker News search.
pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";

/// How many front-page stories one fetch asks for.
pub const DEFAULT_HITS: u32 = 100;

/// Connection settings for [`AlgoliaSource`].
#[derive(Debug, Clone)]
pub struct AlgoliaSettings {
    pub endpoint: String,
    pub hits: u32,
    pub timeout: Duration,
}

impl Default for AlgoliaSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            hits: DEFAULT_HITS,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Fetches the front page from an Algolia-compatible search endpoint.
pub struct AlgoliaSource {
    client: reqwest::Client,
    settings: AlgoliaSettings,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<serde_json::Value>,
}

/// Only `objectID` is mandatory; every other field that is missing or of
/// the wrong JSON type decodes as `None` and degrades on its own.
#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    story_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    points: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    created_at_i: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    num_comments: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Non-negative integer, accepting whole-valued floats such as `12.0`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    }))
}

impl From<Hit> for Story {
    fn from(hit: Hit) -> Self {
        let created_at = hit
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| hit.created_at_i.and_then(|secs| DateTime::from_timestamp(secs, 0)));

        Story {
            id: hit.object_id,
            title: hit.title.or(hit.story_title).unwrap_or_default(),
            url: hit.url.filter(|u| !u.trim().is_empty()),
            points: hit.points.unwrap_or(0),
            author: hit.author.unwrap_or_default(),
            created_at,
            num_comments: hit.num_comments.unwrap_or(0),
        }
    }
}

impl AlgoliaSource {
    pub fn new(settings: AlgoliaSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Decode a response body into a [`Batch`].
    ///
    /// Pure (no I/O) so tests can exercise decoding without a server.
    pub fn parse_body(body: &[u8]) -> Result<Batch, FetchError> {
        let response: SearchResponse = serde_json::from_slice(body)?;

        let mut batch = Batch::default();
        for (index, raw) in response.hits.into_iter().enumerate() {
            match serde_json::from_value::<Hit>(raw) {
                Ok(hit) => batch.stories.push(hit.into()),
                Err(err) => {
                    log::warn!("skipping hit #{index}: {err}");
                    batch.rejected += 1;
                }
            }
        }
        Ok(batch)
    }
}

#[async_trait]
impl StorySource for AlgoliaSource {
    fn name(&self) -> &str {
        "Hacker News"
    }

    async fn fetch(&self) -> Result<Batch, FetchError> {
        let hits = self.settings.hits.to_string();
        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[("tags", "front_page"), ("hitsPerPage", hits.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let batch = Self::parse_body(&body)?;
        if batch.is_empty() {
            log::warn!("upstream returned no usable stories");
        }
        log::info!(
            "fetched {} stories ({} rejected) from {}",
            batch.len(),
            batch.rejected,
            self.settings.endpoint
        );
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"{
      "hits": [
        {
          "objectID": "101",
          "title": "Show HN: A thing",
          "url": "https://example.com/thing",
          "points": 250,
          "author": "alice",
          "created_at": "2025-03-01T10:00:00.000Z",
          "created_at_i": 1740823200,
          "num_comments": 42
        },
        {
          "objectID": "102",
          "title": "Ask HN: Why?",
          "url": null,
          "points": 12,
          "author": "bob",
          "created_at": "2025-03-01T09:00:00.000Z",
          "num_comments": 3
        }
      ],
      "nbHits": 2
    }"#;

    fn settings_for(server: &MockServer) -> AlgoliaSettings {
        AlgoliaSettings {
            endpoint: format!("{}/api/v1/search", server.uri()),
            hits: 100,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn parse_body_extracts_stories() {
        let batch = AlgoliaSource::parse_body(BODY.as_bytes()).unwrap();

        assert_eq!(batch.rejected, 0);
        assert_eq!(
            batch.stories[0],
            Story {
                id: "101".into(),
                title: "Show HN: A thing".into(),
                url: Some("https://example.com/thing".into()),
                points: 250,
                author: "alice".into(),
                created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()),
                num_comments: 42,
            }
        );
        assert_eq!(batch.stories[1].id, "102");
        assert!(batch.stories[1].url.is_none(), "null url degrades to None");
    }

    #[test]
    fn missing_fields_degrade_per_field() {
        let body = r#"{"hits": [{"objectID": "7", "story_title": "Fallback", "url": "  "}]}"#;
        let batch = AlgoliaSource::parse_body(body.as_bytes()).unwrap();
        let story = &batch.stories[0];

        assert_eq!(story.title, "Fallback");
        assert!(story.url.is_none());
        assert_eq!(story.points, 0);
        assert_eq!(story.num_comments, 0);
        assert_eq!(story.author, "");
        assert!(story.created_at.is_none());
    }

    #[test]
    fn invalid_created_at_falls_back_to_unix_seconds() {
        let body = r#"{"hits": [
            {"objectID": "1", "title": "a", "created_at": "yesterday", "created_at_i": 1700000000},
            {"objectID": "2", "title": "b", "created_at": "yesterday"}
        ]}"#;
        let batch = AlgoliaSource::parse_body(body.as_bytes()).unwrap();

        assert_eq!(batch.stories[0].created_at, DateTime::from_timestamp(1_700_000_000, 0));
        assert!(batch.stories[1].created_at.is_none());
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        let body = r#"{"hits": [{"objectID": "1", "title": "a", "points": -3, "num_comments": -1}]}"#;
        let batch = AlgoliaSource::parse_body(body.as_bytes()).unwrap();
        assert_eq!(batch.stories[0].points, 0);
        assert_eq!(batch.stories[0].num_comments, 0);
    }

    #[test]
    fn malformed_hits_are_counted_not_fatal() {
        let body = r#"{"hits": [
            {"objectID": "1", "title": "kept"},
            {"title": "no id"},
            {"objectID": 3, "title": "numeric id"},
            "not an object",
            {"objectID": "4", "title": "also kept"}
        ]}"#;
        let batch = AlgoliaSource::parse_body(body.as_bytes()).unwrap();

        let ids: Vec<&str> = batch.stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(batch.rejected, 3);
    }

    #[test]
    fn mistyped_fields_degrade_without_dropping_the_story() {
        let body = r#"{"hits": [
            {"objectID": "1", "title": "numeric date", "created_at": 1700000000, "created_at_i": 1700000000},
            {"objectID": "2", "title": "float points", "points": 12.0, "num_comments": 2.5},
            {"objectID": "3", "title": ["odd"], "story_title": "from story_title", "url": 42, "author": false},
            {"objectID": "4", "title": "text points", "points": "many"}
        ]}"#;
        let batch = AlgoliaSource::parse_body(body.as_bytes()).unwrap();

        assert_eq!(batch.rejected, 0);
        assert_eq!(batch.len(), 4);

        let [date, points, shape, text] = &batch.stories[..] else {
            panic!("expected four stories");
        };
        assert_eq!(date.created_at, DateTime::from_timestamp(1_700_000_000, 0));
        assert_eq!(points.points, 12);
        assert_eq!(points.num_comments, 0, "fractional counts are not counts");
        assert_eq!(shape.title, "from story_title");
        assert!(shape.url.is_none());
        assert_eq!(shape.author, "");
        assert_eq!(text.points, 0);
        assert_eq!(text.title, "text points");
    }

    #[test]
    fn body_without_hits_is_a_parse_error() {
        let err = AlgoliaSource::parse_body(br#"{"message": "nope"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_requests_front_page_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/search"))
            .and(query_param("tags", "front_page"))
            .and(query_param("hitsPerPage", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let source = AlgoliaSource::new(settings_for(&server)).unwrap();
        let batch = source.fetch().await.expect("fetch ok");

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.stories[0].points, 250);
    }

    #[tokio::test]
    async fn fetch_fails_on_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = AlgoliaSource::new(settings_for(&server)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 503 });
    }

    #[tokio::test]
    async fn fetch_times_out_on_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(300))
                    .set_body_raw(BODY, "application/json"),
            )
            .mount(&server)
            .await;

        let settings = AlgoliaSettings {
            timeout: Duration::from_millis(50),
            ..settings_for(&server)
        };
        let source = AlgoliaSource::new(settings).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn fetch_reports_unreachable_host_as_network_error() {
        let settings = AlgoliaSettings {
            endpoint: "http://127.0.0.1:1/api/v1/search".into(),
            ..AlgoliaSettings::default()
        };
        let source = AlgoliaSource::new(settings).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[test]
    fn name_is_hacker_news() {
        let source = AlgoliaSource::new(AlgoliaSettings::default()).unwrap();
        assert_eq!(source.name(), "Hacker News");
    }
}
