use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on how many versions per component a run may keep
pub const MAX_KEEP: u32 = 10;

/// A component as listed by the repository manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Opaque identifier used for deletion
    pub id: String,
    /// Logical component name (image name for docker repositories)
    pub name: String,
    /// Version string; docker listings carry the tag here
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `{id, version}` pair kept inside a component group
    pub fn to_version(&self) -> ComponentVersion {
        ComponentVersion {
            id: self.id.clone(),
            version: self.version.clone(),
        }
    }
}

/// One entry of a component group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub id: String,
    pub version: String,
}

impl ComponentVersion {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// Repository entry from the repositories listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub format: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Scheduled maintenance task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// Cursor for the next page; an empty token counts as absent
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Declared format of a repository
///
/// Only `docker` and `maven2` are cleaned; every other tag is carried through
/// so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryFormat {
    Image,
    Maven,
    Unsupported(String),
}

impl RepositoryFormat {
    /// Map a repository manager format tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "docker" => RepositoryFormat::Image,
            "maven2" => RepositoryFormat::Maven,
            other => RepositoryFormat::Unsupported(other.to_string()),
        }
    }

    /// Format tag as the repository manager spells it
    pub fn as_str(&self) -> &str {
        match self {
            RepositoryFormat::Image => "docker",
            RepositoryFormat::Maven => "maven2",
            RepositoryFormat::Unsupported(tag) => tag,
        }
    }
}

impl FromStr for RepositoryFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for RepositoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many versions of each component survive a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    keep: u32,
}

impl RetentionPolicy {
    /// Create a policy, clamping `keep` to [`MAX_KEEP`]
    pub fn new(keep: u32) -> Self {
        Self {
            keep: keep.min(MAX_KEEP),
        }
    }

    pub fn keep(&self) -> u32 {
        self.keep
    }

    pub fn keep_usize(&self) -> usize {
        self.keep as usize
    }
}
