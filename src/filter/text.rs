use crate::property::Property;

/// Free-text suggestions over the whole source, independent of any selection.
///
/// Case-insensitive substring match against the record's title, address,
/// category and subcategory. Blank input yields nothing. Returns source
/// indices, in source order, at most `limit` of them.
pub fn search_suggestions(source: &[Property], text: &str, limit: usize) -> Vec<usize> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    source.iter().enumerate()
        .filter(|(_, p)| {
            let fields = [p.title(), p.text("address"), p.text("category"), p.text("subcategory")];
            fields.into_iter().flatten().any(|field| field.to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .take(limit)
        .collect()
}

/// One-line label for a suggestion: `special code - title (address)`.
pub fn suggestion_label(property: &Property) -> String {
    let code = property.text("special_co").unwrap_or_default();
    let title = property.title().unwrap_or_else(|| "Untitled".to_string());
    match property.trimmed("address") {
        Some(address) => format!("{code} - {title} ({address})"),
        None => format!("{code} - {title}"),
    }
}
