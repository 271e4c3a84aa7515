//! Keyword-based niche classification.
//!
//! Tables are ordered slices, not maps: the first category with any keyword
//! substring match wins, so declaration order decides ambiguous text.

use crate::metrics::Niche;

/// Ordered `(category, keywords)` pairs. Keywords must be lower-case.
pub type NicheTable = [(Niche, &'static [&'static str])];

/// Fallback when no keyword matches.
pub const DEFAULT_NICHE: Niche = Niche::Entertainment;

/// Table used for the primary analytics service and the local cache.
pub const DEFAULT_NICHE_KEYWORDS: &NicheTable = &[
    (
        Niche::Crypto,
        &["crypto", "bitcoin", "blockchain", "defi", "nft", "trading", "altcoin"],
    ),
    (
        Niche::Tech,
        &["tech", "technology", "programming", "ai", "software", "developer"],
    ),
    (
        Niche::Business,
        &["business", "entrepreneur", "startup", "marketing", "sales"],
    ),
    (
        Niche::Finance,
        &["finance", "investment", "stock", "forex", "money"],
    ),
    (Niche::News, &["news", "breaking", "daily", "update", "current"]),
    (Niche::Gaming, &["gaming", "game", "esports", "gamer"]),
    (
        Niche::Education,
        &["education", "learning", "course", "tutorial"],
    ),
    (
        Niche::Entertainment,
        &["entertainment", "fun", "meme", "funny"],
    ),
];

/// Table used for the public aggregator, whose catalogue skews towards
/// ticker-style crypto channels.
pub const AGGREGATOR_NICHE_KEYWORDS: &NicheTable = &[
    (
        Niche::Crypto,
        &["crypto", "bitcoin", "blockchain", "defi", "nft", "trading", "btc", "eth"],
    ),
    (
        Niche::Tech,
        &["tech", "technology", "programming", "ai", "software"],
    ),
    (
        Niche::Business,
        &["business", "entrepreneur", "startup", "marketing"],
    ),
    (
        Niche::Finance,
        &["finance", "investment", "stock", "forex", "money"],
    ),
    (Niche::News, &["news", "breaking", "daily", "update"]),
    (Niche::Gaming, &["gaming", "game", "esports", "gamer"]),
    (
        Niche::Education,
        &["education", "learning", "course", "tutorial"],
    ),
    (
        Niche::Entertainment,
        &["entertainment", "fun", "meme", "funny"],
    ),
];

/// Classifies with [`DEFAULT_NICHE_KEYWORDS`].
#[must_use]
pub fn classify_niche(title: &str, description: &str) -> Niche {
    classify_niche_with(DEFAULT_NICHE_KEYWORDS, title, description)
}

/// Returns the first category in `table` whose keyword set has a substring
/// match in the lower-cased `title + " " + description`, or
/// [`DEFAULT_NICHE`] when nothing matches.
#[must_use]
pub fn classify_niche_with(table: &NicheTable, title: &str, description: &str) -> Niche {
    let text = format!("{title} {description}").to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map_or(DEFAULT_NICHE, |(niche, _)| *niche)
}
