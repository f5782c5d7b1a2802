//! Keyword-based transaction categorization
//!
//! Categories are scanned in declaration order and the first one with a
//! keyword contained in the lower-cased description wins, so earlier
//! categories take priority over broader ones declared later. Descriptions
//! that match nothing fall through to "Other".

use serde::{Deserialize, Serialize};

use crate::models::OTHER_CATEGORY;

/// Built-in taxonomy, in match priority order
const DEFAULT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &["restaurant", "cafe", "food", "grocery", "supermarket", "dining"],
    ),
    (
        "Transportation",
        &["uber", "lyft", "taxi", "gas", "fuel", "transport", "bus", "train"],
    ),
    (
        "Entertainment",
        &["movie", "netflix", "spotify", "concert", "game", "entertainment"],
    ),
    (
        "Utilities",
        &["electric", "water", "gas", "internet", "phone", "utility"],
    ),
    (
        "Shopping",
        &["amazon", "walmart", "target", "mall", "shopping", "store"],
    ),
    (
        "Healthcare",
        &["hospital", "doctor", "pharmacy", "medical", "health"],
    ),
    (
        "Education",
        &["school", "university", "course", "book", "education"],
    ),
    ("Salary", &["salary", "paycheck", "income", "payment"]),
    ("Investment", &["stock", "investment", "dividend", "interest"]),
    (OTHER_CATEGORY, &[]),
];

/// One category and the substrings that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryKeywords {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered category → keyword table
///
/// Keywords are lower-cased and blank keywords dropped on construction, since
/// an empty keyword would match every description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeywordMap {
    entries: Vec<CategoryKeywords>,
}

impl CategoryKeywordMap {
    pub fn new(entries: impl IntoIterator<Item = CategoryKeywords>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| CategoryKeywords {
                name: entry.name.trim().to_string(),
                keywords: entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// The default taxonomy
    pub fn builtin() -> Self {
        Self::new(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(name, keywords)| CategoryKeywords::new(*name, keywords.iter().copied())),
        )
    }

    pub fn entries(&self) -> &[CategoryKeywords] {
        &self.entries
    }

    /// Category names in declaration order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryKeywordMap {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Maps transaction descriptions to categories
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier {
    map: CategoryKeywordMap,
}

impl CategoryClassifier {
    pub fn new(map: CategoryKeywordMap) -> Self {
        Self { map }
    }

    /// Category for a description, or "Other" when nothing matches
    pub fn classify(&self, description: &str) -> &str {
        let description = description.to_lowercase();

        self.map
            .entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| description.contains(k.as_str())))
            .map(|entry| entry.name.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    pub fn keyword_map(&self) -> &CategoryKeywordMap {
        &self.map
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.map.categories()
    }
}
