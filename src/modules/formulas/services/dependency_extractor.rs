//! Locates references to known field ids inside formula text.

/// One occurrence of a field id in a formula, as a byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldReference<'a> {
    pub field_id: &'a str,
    pub start: usize,
    pub end: usize,
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// An occurrence only counts when it is not glued to a neighbouring identifier
fn is_whole_token(formula: &str, field_id: &str, start: usize, end: usize) -> bool {
    let leading_ok = match field_id.chars().next() {
        Some(first) if is_identifier_char(first) => formula[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c)),
        _ => true,
    };

    let trailing_ok = match field_id.chars().next_back() {
        Some(last) if is_identifier_char(last) => formula[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c)),
        _ => true,
    };

    leading_ok && trailing_ok
}

/// Find every whole-token occurrence of a known field id in `formula`.
///
/// Ids are tried longest first and each match claims its span, so an id that
/// is a substring of a longer id can never match inside it. References are
/// returned in the order they appear in the formula.
pub fn find_references<'a, I>(formula: &str, known_field_ids: I) -> Vec<FieldReference<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&'a str> = known_field_ids
        .into_iter()
        .filter(|id| !id.is_empty())
        .collect();
    ids.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    ids.dedup();

    let mut claimed = vec![false; formula.len()];
    let mut references = Vec::new();

    for field_id in ids {
        for (start, _) in formula.match_indices(field_id) {
            let end = start + field_id.len();

            if claimed[start..end].iter().any(|taken| *taken) {
                continue;
            }
            if !is_whole_token(formula, field_id, start, end) {
                continue;
            }

            claimed[start..end].iter_mut().for_each(|taken| *taken = true);
            references.push(FieldReference {
                field_id,
                start,
                end,
            });
        }
    }

    references.sort_by_key(|reference| reference.start);
    references
}

/// Field ids referenced by `formula`, restricted to `known_field_ids`.
///
/// Each id appears once, in order of first occurrence.
pub fn extract_dependencies<'a, I>(formula: &str, known_field_ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut dependencies: Vec<String> = Vec::new();

    for reference in find_references(formula, known_field_ids) {
        if !dependencies.iter().any(|id| id == reference.field_id) {
            dependencies.push(reference.field_id.to_string());
        }
    }

    dependencies
}
