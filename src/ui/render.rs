//! Plain-text and JSON views of session state.

use serde_json::{Value, json};

use crate::model::types::{Corpus, Facet};
use crate::search::query::ResultSet;
use crate::session::{SearchSession, SessionStatus};

pub const SEARCHING: &str = "searching…";
pub const NO_RESULTS: &str = "No results found.";
pub const NO_RESULTS_HINT: &str = "Try a different keyword.";

/// "N results for 「Q」", or `None` when there is no query text.
pub fn summary_line(query: &str, count: usize) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let noun = if count == 1 { "result" } else { "results" };
    Some(format!("{count} {noun} for 「{query}」"))
}

pub fn format_results(corpus: &Corpus, query: &str, results: &ResultSet) -> String {
    let mut out = String::new();
    if let Some(line) = summary_line(query, results.len()) {
        out.push_str(&line);
        out.push('\n');
    }
    for record in results.iter(corpus) {
        out.push_str(&format!(
            "[{}] {}  <{}>  {}\n    {}\n",
            record.id, record.title, record.category, record.date, record.content
        ));
    }
    if results.is_empty() && !query.is_empty() {
        out.push_str(NO_RESULTS);
        out.push(' ');
        out.push_str(NO_RESULTS_HINT);
        out.push('\n');
    }
    out
}

/// Render whatever the session currently shows.
pub fn format_session(session: &SearchSession) -> String {
    if session.status() == SessionStatus::Pending {
        return format!("{SEARCHING}\n");
    }
    format_results(session.corpus(), &session.query().text, session.results())
}

pub fn results_json(corpus: &Corpus, query: &str, facet: &Facet, results: &ResultSet) -> Value {
    let hits: Vec<Value> = results
        .iter(corpus)
        .map(|r| serde_json::to_value(r).unwrap_or(Value::Null))
        .collect();
    json!({
        "query": query,
        "facet": facet.label(),
        "count": hits.len(),
        "results": hits,
    })
}

pub fn format_history(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No recent searches.\n".to_string();
    }
    let mut out = String::from("Recent searches:\n");
    for (idx, entry) in entries.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", idx + 1, entry));
    }
    out
}

pub fn history_json(entries: &[String]) -> Value {
    json!({ "history": entries })
}

/// One facet per line; the selected one is marked.
pub fn format_facets(corpus: &Corpus, selected: &Facet) -> String {
    corpus
        .facets()
        .iter()
        .map(|facet| {
            let marker = if facet == selected { "*" } else { " " };
            format!("{marker} {facet}\n")
        })
        .collect()
}

pub fn facets_json(corpus: &Corpus) -> Value {
    let labels: Vec<&str> = std::iter::once(crate::model::types::ALL_FACET)
        .chain(corpus.categories().iter().map(String::as_str))
        .collect();
    json!({ "facets": labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::evaluate;

    #[test]
    fn summary_only_when_query_present() {
        assert_eq!(summary_line("", 8), None);
        assert_eq!(
            summary_line("React", 1).as_deref(),
            Some("1 result for 「React」")
        );
        assert_eq!(
            summary_line("web", 3).as_deref(),
            Some("3 results for 「web」")
        );
    }

    #[test]
    fn empty_results_show_hint() {
        let corpus = Corpus::sample().unwrap();
        let results = evaluate(&corpus, "design", &Facet::All);
        let out = format_results(&corpus, "design", &results);
        assert!(out.starts_with("0 results for 「design」"));
        assert!(out.contains(NO_RESULTS));
    }

    #[test]
    fn records_render_with_category_and_date() {
        let corpus = Corpus::sample().unwrap();
        let results = evaluate(&corpus, "React", &Facet::All);
        let out = format_results(&corpus, "React", &results);
        assert!(out.contains("[1] React入門ガイド  <プログラミング>  2024-01-15"));
        assert!(!out.contains(NO_RESULTS));
    }

    #[test]
    fn json_carries_count_and_iso_dates() {
        let corpus = Corpus::sample().unwrap();
        let facet = Facet::Category("データベース".into());
        let results = evaluate(&corpus, "", &facet);
        let v = results_json(&corpus, "", &facet, &results);
        assert_eq!(v["count"], 1);
        assert_eq!(v["facet"], "データベース");
        assert_eq!(v["results"][0]["date"], "2024-01-30");
    }

    #[test]
    fn facets_mark_selection() {
        let corpus = Corpus::sample().unwrap();
        let out = format_facets(&corpus, &Facet::All);
        assert!(out.starts_with("* all\n"));
        assert!(out.contains("  デザイン\n"));
        assert_eq!(facets_json(&corpus)["facets"][0], "all");
    }

    #[test]
    fn history_lists_are_numbered() {
        let entries = vec!["b".to_string(), "a".to_string()];
        assert_eq!(format_history(&entries), "Recent searches:\n  1. b\n  2. a\n");
        assert_eq!(format_history(&[]), "No recent searches.\n");
    }
}
