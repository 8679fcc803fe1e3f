//! Rating records as they are persisted

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thumb rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Up,
    Down,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Up => "up",
            Rating::Down => "down",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Rating::Up)
    }

    /// Word used in confirmations ("positive" / "negative")
    pub fn sentiment(&self) -> &'static str {
        match self {
            Rating::Up => "positive",
            Rating::Down => "negative",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Rating::Up),
            "down" | "d" => Ok(Rating::Down),
            other => Err(format!("unknown rating '{}', expected up or down", other)),
        }
    }
}

/// A single page rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub page_id: String,
    pub rating: Rating,
    /// Selected quality pills, in vocabulary order
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn new(page_id: impl Into<String>, rating: Rating) -> Self {
        Self {
            page_id: page_id.into(),
            rating,
            qualities: Vec::new(),
            comment: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_qualities<I, S>(mut self, qualities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualities = qualities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Per-page part of a wizard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRating {
    pub rating: Rating,
    #[serde(default)]
    pub qualities: Vec<String>,
}

/// One completed wizard session: overall verdict plus optional per-page ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallRatingRecord {
    pub id: Uuid,
    pub rating: Rating,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub per_page: BTreeMap<String, PageRating>,
    #[serde(default)]
    pub page_comment: String,
    pub created_at: DateTime<Utc>,
}

impl OverallRatingRecord {
    pub fn new(rating: Rating) -> Self {
        Self {
            id: Uuid::new_v4(),
            rating,
            qualities: Vec::new(),
            comment: String::new(),
            per_page: BTreeMap::new(),
            page_comment: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_serializes_lowercase() {
        let record = RatingRecord::new("3", Rating::Up)
            .with_qualities(["Clear insights"])
            .with_comment("great chart");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["pageId"], "3");
        assert_eq!(json["rating"], "up");
        assert_eq!(json["qualities"][0], "Clear insights");
        assert_eq!(json["comment"], "great chart");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let json = r#"{"pageId":"2","rating":"down","createdAt":"2025-01-01T00:00:00Z"}"#;
        let record: RatingRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.rating, Rating::Down);
        assert!(record.qualities.is_empty());
        assert!(record.comment.is_empty());
    }

    #[test]
    fn test_rating_from_str() {
        assert_eq!("UP".parse::<Rating>().unwrap(), Rating::Up);
        assert_eq!("d".parse::<Rating>().unwrap(), Rating::Down);
        assert!("sideways".parse::<Rating>().is_err());
    }
}
