use serde::Deserialize;
use serde_json::Value;
use std::fmt::{self, Display};

/// Anything bigger than this is almost certainly a bad value, not a screenshot.
pub static MAX_PIXELS: f64 = 100_000.0;

/// A CSS length for a screenshot edge.
///
/// Numbers are taken as pixels; strings are passed through untouched, so
/// the server can send `"50%"` or `"20em"` if it wants to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(f64),
    Css(String),
}

impl Dimension {
    pub fn is_reasonable(&self) -> bool {
        match self {
            Self::Pixels(px) => px.is_finite() && (0.0..=MAX_PIXELS).contains(px),
            Self::Css(_) => true,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{}px", px),
            Self::Css(css) => write!(f, "{}", css),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Screenshot {
    pub width: Dimension,
    pub height: Dimension,
    pub src: String,
}

/// One downloadable client variant, as listed by the server.
///
/// Only eligible entries are ever decoded into this, so the eligibility
/// flags themselves aren't kept.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClientEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub known_bugs: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    #[serde(default)]
    pub downloads: Vec<String>,
}

impl ClientEntry {
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// The bug notes, if there's anything worth warning about.
    pub fn known_bugs(&self) -> Option<&str> {
        self.known_bugs.as_deref().filter(|bugs| !bugs.is_empty())
    }

    pub fn first_screenshot(&self) -> Option<&Screenshot> {
        self.screenshots.first()
    }

    pub fn first_download(&self) -> Option<&str> {
        self.downloads.first().map(String::as_str)
    }
}

// Absent, `null` and non-boolean flags are all just "no".
fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Only entries that are both supported and recommended get a card.
///
/// Nothing else about the entry is looked at, so a skipped entry can be as
/// malformed as it likes.
pub fn is_eligible(value: &Value) -> bool {
    flag(value, "supported") && flag(value, "recommended")
}

/// The full list of clients, in the order the server sent them.
///
/// Entries are kept undecoded until something asks for an eligible one.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Manifest(Vec<Value>);

impl Manifest {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn entries(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Eligible entries with their index in the manifest, decoded.
    pub fn eligible(
        &self,
    ) -> impl Iterator<Item = (usize, serde_json::Result<ClientEntry>)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, value)| is_eligible(value))
            .map(|(index, value)| (index, ClientEntry::from_value(value)))
    }
}
