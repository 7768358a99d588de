/// Split comma-separated tag input into trimmed, non-empty tags.
///
/// Order is kept; duplicates are not removed.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}
