/// Case-insensitive substring match. A missing or blank query matches everything.
pub fn matches_search(text: &str, query: Option<&str>) -> bool {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        None => true,
        Some(q) => text.to_lowercase().contains(&q.to_lowercase()),
    }
}

/// Keep only the items whose owner equals `identity`.
pub fn owned_by<T, F>(items: Vec<T>, identity: &str, owner: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    items.into_iter().filter(|item| owner(item) == identity).collect()
}
