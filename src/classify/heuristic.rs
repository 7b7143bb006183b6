use crate::item::models::ItemKind;

/// Cheap local stand-in for the classifier: a single URL token is a LINK,
/// everything else is TEXT. Never produces FILE or CODE and never a summary.
pub fn detect_kind(text: &str) -> ItemKind {
    let trimmed = text.trim();

    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));

    match rest {
        Some(rest)
            if !rest.is_empty()
                && !rest.contains(char::is_whitespace)
                && !rest.contains('"') =>
        {
            ItemKind::Link
        }
        _ => ItemKind::Text,
    }
}
