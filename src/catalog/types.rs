use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// A channel number as catalogs publish it: sometimes a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CatalogNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CatalogNumber {
    /// Numeric value, parsing the text form if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical string form used for string comparisons. Whole floats print
    /// without a fractional part.
    pub fn to_key(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Float(n) if n.is_finite() && n.fract() == 0.0 => format!("{}", *n as i64),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Entry of the primary channel catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    #[serde(rename = "channel_number", default)]
    pub number: Option<CatalogNumber>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "url")]
    pub stream_url: String,
    #[serde(default)]
    pub stream_path: Option<String>,
}

/// Primary channel catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Playlist {
    #[serde(default, deserialize_with = "lenient_list")]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BdixChannel {
    #[serde(default)]
    pub number: Option<CatalogNumber>,
    #[serde(default)]
    pub name: Option<String>,
    pub m3u8_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BdixCatalog {
    #[serde(default, deserialize_with = "lenient_list")]
    pub channels: Vec<BdixChannel>,
}

/// A non-array value yields an empty list and malformed entries are skipped,
/// so one bad record does not take the whole catalog down.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping malformed catalog entry: {}", e);
                None
            }
        })
        .collect())
}
