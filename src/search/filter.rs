use crate::dom::{Document, ElementId, ElementSpec};

pub const NO_RESULTS_CLASS: &str = "no-results";

/// Normalized search text: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring test. An empty query matches everything.
pub fn text_matches(query: &str, text: &str) -> bool {
    let query = normalize_query(query);
    query.is_empty() || text.to_lowercase().contains(&query)
}

/// Indices of `texts` that match `query`, in their original order.
pub fn filter<'a>(query: &str, texts: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let query = normalize_query(query);
    texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| query.is_empty() || text.to_lowercase().contains(&query))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub matched: Vec<ElementId>,
}

impl SearchState {
    /// A non-empty query that matched nothing.
    pub fn is_empty_result(&self) -> bool {
        !self.query.is_empty() && self.matched.is_empty()
    }
}

/// Shows matching cards, hides the rest and keeps `indicator` holding either
/// nothing or a single no-results message. Cards are never moved or removed.
pub fn apply_filter(
    doc: &mut dyn Document,
    query: &str,
    cards: &[ElementId],
    indicator: Option<ElementId>,
    no_results_message: &str,
) -> SearchState {
    let live: Vec<ElementId> = cards.iter().copied().filter(|card| doc.exists(*card)).collect();
    let texts: Vec<String> = live.iter().map(|card| doc.text_content(*card)).collect();
    let hits = filter(query, texts.iter().map(String::as_str));

    let mut matched = Vec::with_capacity(hits.len());
    let mut next_hit = hits.iter().peekable();
    for (index, card) in live.iter().enumerate() {
        let visible = next_hit.next_if(|hit| **hit == index).is_some();
        doc.set_hidden(*card, !visible);
        if visible {
            matched.push(*card);
        }
    }

    let state = SearchState {
        query: normalize_query(query),
        matched,
    };
    if let Some(indicator) = indicator {
        for child in doc.children(indicator) {
            doc.remove(child);
        }
        if state.is_empty_result() {
            doc.append_child(
                indicator,
                ElementSpec::new("div")
                    .class(NO_RESULTS_CLASS)
                    .text(no_results_message),
            );
        }
    }
    state
}
