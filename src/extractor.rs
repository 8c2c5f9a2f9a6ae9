use crate::fetcher::FetchPage;
use crate::table::{self, TableCell};
use crate::types::{Event, Result};
use crate::utils::html;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

/// Genre terms matched against the tags column when no explicit keywords are
/// configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["hardstyle", "hardcore", "uptempo", "frenchcore"];

/// Minimum cells a listing row must have to be considered an event row.
/// Shorter rows are decorative or malformed and are skipped silently.
const MIN_CELLS: usize = 7;

/// Fetches a location's event-listing page and turns it into a filtered,
/// typed sequence of events.
pub struct EventExtractor {
    fetcher: Arc<dyn FetchPage>,
    keywords: Vec<String>,
}

impl EventExtractor {
    pub fn new(fetcher: Arc<dyn FetchPage>) -> Self {
        Self::with_keywords(fetcher, DEFAULT_KEYWORDS.iter().map(|kw| kw.to_string()))
    }

    pub fn with_keywords(
        fetcher: Arc<dyn FetchPage>,
        keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            fetcher,
            keywords: keywords.into_iter().map(|kw| kw.to_lowercase()).collect(),
        }
    }

    /// Fetch the listing page and extract matching events. A fetch failure
    /// propagates so the caller can abort this location while continuing
    /// with others.
    pub async fn extract(&self, url: &str, today: NaiveDate) -> Result<Vec<Event>> {
        let page = self.fetcher.fetch_page(url).await?;
        let events = self.select_events(&page, today);
        info!("Found {} matching events at {}", events.len(), url);
        Ok(events)
    }

    /// Select events from raw listing HTML: rows with at least seven cells,
    /// a parseable sortable date in the rolling week window, and a tags cell
    /// containing one of the keywords as a case-insensitive substring.
    /// Source row order is preserved; unusable rows are skipped, never
    /// reported.
    pub fn select_events(&self, page: &str, today: NaiveDate) -> Vec<Event> {
        // Both window edges are inclusive: an event dated exactly today or
        // exactly seven days out is still delivered.
        let horizon = today + Duration::days(7);
        let mut matches = Vec::new();

        for row in table::parse_rows(page) {
            if row.cells.len() < MIN_CELLS {
                continue;
            }

            let date_sortable = row.cells[6].text.clone();
            let event_date = match NaiveDate::parse_from_str(&date_sortable, "%Y/%m/%d") {
                Ok(date) => date,
                Err(_) => {
                    debug!("Skipping row with unparseable date: {:?}", date_sortable);
                    continue;
                }
            };

            if event_date < today || event_date > horizon {
                continue;
            }

            let tags = row.cells[2].text.clone();
            let tags_lower = tags.to_lowercase();
            if !self.keywords.iter().any(|kw| tags_lower.contains(kw)) {
                continue;
            }

            matches.push(Event {
                date_time: row.cells[0].text.clone(),
                title: row.cells[1].text.clone(),
                tags,
                price_age: row.cells[3].text.clone(),
                organizers: row.cells[4].text.clone(),
                links: rebuild_links(&row.cells[5]),
                date_sortable,
            });
        }

        matches
    }
}

/// Rebuild a links cell as minimal escaped `<a>` fragments joined by single
/// spaces. An anchor with empty visible text falls back to its href; an
/// anchor without an href contributes its bare text; a cell with no anchors
/// at all contributes its escaped plain text.
fn rebuild_links(cell: &TableCell) -> String {
    if cell.anchors.is_empty() {
        return html::escape(&cell.text);
    }

    let fragments: Vec<String> = cell
        .anchors
        .iter()
        .filter_map(|anchor| match &anchor.href {
            Some(href) => {
                let text = if anchor.text.is_empty() {
                    href.as_str()
                } else {
                    anchor.text.as_str()
                };
                Some(format!(
                    "<a href=\"{}\">{}</a>",
                    html::escape_attribute(href),
                    html::escape(text)
                ))
            }
            None if anchor.text.is_empty() => None,
            None => Some(html::escape(&anchor.text)),
        })
        .collect();

    if fragments.is_empty() {
        html::escape(&cell.text)
    } else {
        fragments.join(" ")
    }
}
