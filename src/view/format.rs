use super::markdown::{escape_md_link, single_line, truncate_chars};
use super::{ExpandedSet, Panel};
use crate::search::Filters;
use crate::service::{ResultMeta, SearchResult};

/// Characters of abstract shown on a collapsed card.
pub const ABSTRACT_PREVIEW_CHARS: usize = 280;

/// Everything the presentation needs, borrowed from the controller.
pub struct RenderContext<'a> {
    pub panel: Panel<'a>,
    pub meta: &'a ResultMeta,
    pub filters: &'a Filters,
    pub expanded: &'a ExpandedSet,
}

/// Render the visible panel as Markdown. `Idle` renders an empty string.
pub fn render(ctx: &RenderContext<'_>) -> String {
    match ctx.panel {
        Panel::Idle => String::new(),
        Panel::Loading { query } => {
            format!("Searching PubMed for \"{}\"...\n", single_line(query))
        }
        Panel::NoResults { query } => format_no_results(query),
        Panel::Results(results) => {
            let mut out = format_header(results.len(), ctx.meta, ctx.filters);
            for result in results {
                out.push_str(&format_card(result, ctx.expanded.contains(result.id)));
            }
            out
        }
    }
}

fn format_no_results(query: &str) -> String {
    format!(
        "No results found for \"{}\".\n\n\
         - Try broader or fewer terms\n\
         - Switch to `broad` mode\n\
         - Toggle MeSH expansion\n",
        single_line(query)
    )
}

fn format_header(shown: usize, meta: &ResultMeta, filters: &Filters) -> String {
    let mut out = match (meta.results_range.as_deref(), meta.total_results) {
        (Some(range), Some(total)) => format!("Showing {range} of {total} results"),
        (None, Some(total)) => format!("Showing {shown} of {total} results"),
        (Some(range), None) => format!("Showing {range}"),
        (None, None) if shown == 1 => "1 result".to_string(),
        (None, None) => format!("{shown} results"),
    };
    if let Some(desc) = filters.describe() {
        out.push_str(&format!(" (filters: {desc})"));
    }
    out.push_str("\n\n");
    out
}

fn format_card(result: &SearchResult, expanded: bool) -> String {
    let title = if result.title.is_empty() {
        "(untitled)".to_string()
    } else {
        single_line(&result.title)
    };
    let mut out = format!(
        "{}. **{}** ({:.2})\n",
        result.id, title, result.relevance_score
    );

    if !result.authors.is_empty() {
        out.push_str(&format!("   {}\n", single_line(&result.authors)));
    }

    let source = match (result.journal.is_empty(), result.year) {
        (false, Some(year)) => Some(format!("{} · {year}", single_line(&result.journal))),
        (false, None) => Some(single_line(&result.journal)),
        (true, Some(year)) => Some(year.to_string()),
        (true, None) => None,
    };
    if let Some(source) = source {
        out.push_str(&format!("   _{source}_\n"));
    }

    if !result.abstract_text.is_empty() {
        let text = single_line(&result.abstract_text);
        let shown = if expanded {
            text
        } else {
            truncate_chars(&text, ABSTRACT_PREVIEW_CHARS)
        };
        out.push_str(&format!("   {shown}\n"));
    }

    if !result.mesh_terms.is_empty() {
        out.push_str(&format!("   MeSH: {}\n", result.mesh_terms.join(", ")));
    }

    let mut links = Vec::new();
    if let Some(ref url) = result.url_pubmed {
        links.push(format!("[PubMed]({})", escape_md_link(url)));
    }
    if let Some(ref url) = result.url_full_text
        && result.url_pubmed.as_ref() != Some(url)
    {
        links.push(format!("[Full text]({})", escape_md_link(url)));
    }
    if !links.is_empty() {
        out.push_str(&format!("   {}\n", links.join(" | ")));
    }

    out.push('\n');
    out
}
