use serde::{Deserialize, Deserializer, Serialize};

/// Category the server attaches to items the user has already read.
pub const READ_MARKER: &str = "user/-/state/com.google/read";

/// Prefix shared by the server's internal state categories (read, starred, ...).
pub const STATE_PREFIX: &str = "user/-/state/com.google";

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "null_as_default")]
    pub href: String,
}

/// One entry of the reading-list stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate: Vec<Link>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

impl FeedItem {
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_link(mut self, href: &str) -> Self {
        self.alternate.push(Link {
            href: href.to_string(),
        });
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn is_read(&self) -> bool {
        self.categories.iter().any(|c| c == READ_MARKER)
    }

    /// The first alternate link, or an empty string when the item has none.
    pub fn primary_link(&self) -> &str {
        self.alternate
            .first()
            .map(|link| link.href.trim())
            .unwrap_or("")
    }

    /// First category that is not one of the server's internal state markers.
    pub fn display_category(&self) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| !c.starts_with(STATE_PREFIX))
            .map(String::as_str)
    }
}
