// src/extract/resolver.rs
use tracing::trace;

use crate::browser::DomNode;

/// Rendered glyphs that separate fields on a card and must never count as data.
const PLACEHOLDERS: [&str; 3] = ["", " ", "·"];

pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text.trim())
}

/// First accepted text found by trying `selectors` in order, else `default`.
///
/// For each selector only the first matching descendant is considered. A
/// selector that errors (malformed, or the node went stale) counts as a miss.
pub async fn resolve_text<N: DomNode>(node: &N, selectors: &[String], default: &str) -> String {
    for selector in selectors {
        let elements = match node.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                trace!("Selector '{}' failed: {:#}", selector, e);
                continue;
            }
        };

        let Some(first) = elements.first() else {
            continue;
        };

        match first.text().await {
            Ok(text) => {
                let text = text.trim();
                if !is_placeholder(text) {
                    return text.to_string();
                }
            }
            Err(e) => trace!("Reading text for '{}' failed: {:#}", selector, e),
        }
    }

    default.to_string()
}

/// First non-empty value of `attribute` on the first element matched by any selector.
pub async fn resolve_attribute<N: DomNode>(
    node: &N,
    selectors: &[String],
    attribute: &str,
) -> anyhow::Result<Option<String>> {
    for selector in selectors {
        let elements = match node.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                trace!("Selector '{}' failed: {:#}", selector, e);
                continue;
            }
        };

        if let Some(first) = elements.first() {
            // The first anchor decides: a card whose link element has no href is unusable.
            return Ok(first
                .attribute(attribute)
                .await?
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()));
        }
    }

    Ok(None)
}
