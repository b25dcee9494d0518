//! Domain types for place search and enrichment

use crate::core::error::{PlaceError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A place returned by keyword search, before enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Place name, also the query key for enrichment
    #[serde(rename = "place_name", default)]
    pub name: String,

    #[serde(rename = "address_name", default)]
    pub address: String,

    #[serde(rename = "category_name", default)]
    pub category: String,

    #[serde(rename = "place_url", default)]
    pub url: String,

    #[serde(default)]
    pub phone: String,
}

/// A web document describing a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDocument {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub contents: String,
}

/// Representative image for a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub image_url: String,
}

/// A candidate with its comments and image attached
///
/// Serialized flat, with the candidate fields first, followed by
/// `image_url` (empty string when no image was found) and `comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedPlace {
    #[serde(flatten)]
    pub place: PlaceCandidate,

    #[serde(serialize_with = "serialize_optional_url")]
    pub image_url: Option<String>,

    pub comments: Vec<CommentDocument>,
}

impl EnrichedPlace {
    pub fn new(
        place: PlaceCandidate,
        comments: Vec<CommentDocument>,
        image: Option<ImageResult>,
    ) -> Self {
        let image_url = image
            .map(|img| img.image_url)
            .filter(|url| !url.is_empty());

        Self {
            place,
            image_url,
            comments,
        }
    }

    pub fn name(&self) -> &str {
        &self.place.name
    }

    /// Compact JSON payload delivered to the caller
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn serialize_optional_url<S>(url: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(url.as_deref().unwrap_or(""))
}

/// `{documents: [...]}` envelope shared by all upstream endpoints
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DocumentsResponse<T> {
    #[serde(default)]
    pub documents: Vec<T>,
}

/// Input of the place recommender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Trimmed query, or `InvalidQuery` if it is blank or longer than `max_length`
    pub fn validated_query(&self, max_length: Option<usize>) -> Result<&str> {
        let query = self.query.trim();

        if query.is_empty() {
            return Err(PlaceError::InvalidQuery("Query is empty".to_string()));
        }

        if let Some(max_length) = max_length {
            let length = query.chars().count();
            if length > max_length {
                return Err(PlaceError::InvalidQuery(format!(
                    "Query is {length} characters long (maximum {max_length})"
                )));
            }
        }

        Ok(query)
    }
}

/// Opaque correlation token tying progress messages to one invocation
///
/// `Null` means the caller did not ask for progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressToken(pub Value);

impl ProgressToken {
    pub fn is_none(&self) -> bool {
        self.0.is_null()
    }
}

impl From<&str> for ProgressToken {
    fn from(token: &str) -> Self {
        Self(Value::String(token.to_string()))
    }
}

impl From<i64> for ProgressToken {
    fn from(token: i64) -> Self {
        Self(Value::from(token))
    }
}

impl std::fmt::Display for ProgressToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Outcome of a completed recommendation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Candidates returned by place search
    pub candidates: usize,
    /// Enriched places delivered to the caller
    pub delivered: usize,
    /// Candidates dropped after a failed enrichment
    pub dropped: usize,
}
