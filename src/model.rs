use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub community_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// The `communities(name)` projection embedded by the store's join.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommunityName {
    pub name: String,
}

/// A post as returned by the community posts query, with its owning
/// community's name joined in by the store.
///
/// The embedded name is trusted as-is; nothing here checks it against
/// the community record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostWithCommunity {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub communities: Option<CommunityName>,
}

impl PostWithCommunity {
    pub fn community_name(&self) -> Option<&str> {
        self.communities.as_ref().map(|c| c.name.as_str())
    }
}

/// Parse a timestamp in any of the shapes a Postgres-backed store hands
/// out: RFC 3339, `timestamptz` text (`2024-01-01 12:00:00+00`), a
/// `timestamp` without zone (taken as UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    if let Ok(value) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(value.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|value| value.and_utc())
}

// A null timestamp decodes like a missing one.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(DateTime::<Utc>::default()),
        Some(raw) => parse_timestamp(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognised timestamp {raw:?}"))
        }),
    }
}
