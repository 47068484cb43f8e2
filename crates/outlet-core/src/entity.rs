//! Outlet records as served by the upstream data service.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable outlet identifier. The upstream uses strings, but integer ids are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Key used for lookups from untyped input such as a URL path segment.
    ///
    /// `Number(7)` and `Text("7")` share the key `"7"`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Text(value)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A single outlet (point of interest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_degrees")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_degrees")]
    pub longitude: Option<f64>,
    /// Navigation link; the upstream names it `waze_link`.
    #[serde(
        default,
        alias = "waze_link",
        alias = "externalLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_link: Option<String>,
    #[serde(default, deserialize_with = "nullable_features")]
    pub features: BTreeSet<String>,
}

impl Outlet {
    /// Builds an outlet with only identity and position set.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            latitude: Some(lat),
            longitude: Some(lon),
            external_link: None,
            features: BTreeSet::new(),
        }
    }

    /// The outlet's position, or `None` when it is missing or out of range.
    ///
    /// Outlets without a valid coordinate never take part in proximity checks.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.latitude?, self.longitude?);
        coordinate.is_valid().then_some(coordinate)
    }
}

/// Accepts a JSON number or a numeric string; anything else becomes `None`.
fn lenient_degrees<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn nullable_features<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}
