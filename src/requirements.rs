//! Requirement extraction from conversation text
//!
//! `extract` is a total, deterministic function from accumulated text to a
//! structured requirements set. Each predicate is independent and
//! order-insensitive; tech preferences are evaluated separately from the
//! feature vocabulary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Closed feature vocabulary the downstream synthesizers understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Authentication,
    DragAndDrop,
    DarkMode,
    Dashboard,
    Charts,
    Forms,
    DataDisplay,
    SearchFilter,
    Notifications,
    ApiBackend,
    Crud,
    Responsive,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Authentication => "authentication",
            Feature::DragAndDrop => "drag-and-drop",
            Feature::DarkMode => "dark-mode",
            Feature::Dashboard => "dashboard",
            Feature::Charts => "charts",
            Feature::Forms => "forms",
            Feature::DataDisplay => "data-display",
            Feature::SearchFilter => "search-filter",
            Feature::Notifications => "notifications",
            Feature::ApiBackend => "api-backend",
            Feature::Crud => "crud",
            Feature::Responsive => "responsive",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured requirements derived from conversation text
///
/// Never empty: when no feature predicate fires, the set is seeded with
/// `{crud, data-display, forms}` so generation always has something to build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsSet {
    pub features: BTreeSet<Feature>,
    pub tech_preferences: BTreeSet<String>,
}

impl RequirementsSet {
    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// All tags (features first, then tech preferences) as plain strings,
    /// matching the persisted `requirements` field on the project record.
    pub fn tags(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|f| f.as_str().to_string())
            .chain(self.tech_preferences.iter().cloned())
            .collect()
    }
}

/// Feature predicates: any word in the list fires the feature
const FEATURE_KEYWORDS: &[(Feature, &str)] = &[
    (
        Feature::Authentication,
        r"\b(auth|authentication|login|log in|signup|sign up|oauth|user account)\b",
    ),
    (
        Feature::DarkMode,
        r"\b(dark[ -]?mode|dark theme|light and dark)\b",
    ),
    (Feature::Dashboard, r"\b(dashboard|admin panel)\b"),
    (
        Feature::Charts,
        r"\b(chart|charts|graph|graphs|analytics|visualization)\b",
    ),
    (Feature::Forms, r"\b(form|forms|survey|questionnaire)\b"),
    (
        Feature::DataDisplay,
        r"\b(list|lists|table|tables|grid|catalog|feed)\b",
    ),
    (Feature::SearchFilter, r"\b(search|filter|filtering)\b"),
    (
        Feature::Notifications,
        r"\b(notification|notifications|toast|reminder|reminders)\b",
    ),
    (
        Feature::ApiBackend,
        r"\b(api|backend|server|rest|graphql|endpoint)\b",
    ),
    (
        Feature::Crud,
        r"\b(crud|todo|task|tasks|note|notes|manage|create|edit|delete)\b",
    ),
    (Feature::Responsive, r"\b(responsive|mobile|tablet)\b"),
];

/// Tech-preference predicates, evaluated independently of features
const TECH_KEYWORDS: &[(&str, &str)] = &[
    ("tailwindcss", r"\btailwind(css)?\b"),
    ("typescript", r"\btypescript\b"),
    ("nextjs", r"\bnext\.?js\b"),
    ("react", r"\breact\b"),
    ("vue", r"\bvue\b"),
    ("vite", r"\bvite\b"),
    ("redux", r"\bredux\b"),
    ("postgresql", r"\b(postgres|postgresql)\b"),
    ("mongodb", r"\b(mongo|mongodb)\b"),
    ("docker", r"\bdocker\b"),
    ("graphql", r"\bgraphql\b"),
];

/// Extract a requirements set from a project description plus the
/// accumulated conversation messages.
///
/// Total over any input, including empty text, and has no side effects.
pub fn extract(description: &str, messages: &[String]) -> RequirementsSet {
    let mut combined = String::with_capacity(
        description.len() + messages.iter().map(|m| m.len() + 1).sum::<usize>(),
    );
    combined.push_str(description);
    for message in messages {
        combined.push('\n');
        combined.push_str(message);
    }
    let text = combined.to_lowercase();

    let mut set = RequirementsSet::default();

    for (feature, pattern) in FEATURE_KEYWORDS {
        let re = Regex::new(pattern).expect("valid feature keyword regex");
        if re.is_match(&text) {
            set.features.insert(*feature);
        }
    }

    // Drag-and-drop needs both verbs present, not a single keyword
    let drag = Regex::new(r"\bdrag\b").expect("valid regex");
    let drop = Regex::new(r"\bdrop\b").expect("valid regex");
    if (drag.is_match(&text) && drop.is_match(&text))
        || text.contains("drag-and-drop")
        || text.contains("drag and drop")
    {
        set.features.insert(Feature::DragAndDrop);
    }

    // A CRUD app always carries a data list and an entry form
    if set.features.contains(&Feature::Crud) {
        set.features.insert(Feature::DataDisplay);
        set.features.insert(Feature::Forms);
    }

    // Fallback invariant: generation must never see an empty feature set
    if set.features.is_empty() {
        set.features.insert(Feature::Crud);
        set.features.insert(Feature::DataDisplay);
        set.features.insert(Feature::Forms);
    }

    for (tag, pattern) in TECH_KEYWORDS {
        let re = Regex::new(pattern).expect("valid tech keyword regex");
        if re.is_match(&text) {
            set.tech_preferences.insert((*tag).to_string());
        }
    }

    set
}
