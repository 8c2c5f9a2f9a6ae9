//! Narrow interface over the third-party page's markup: raw HTML in, rows of
//! cells out. All selection and filtering logic lives in the extractor, so
//! this module is the only place that knows the page is an HTML table.

use scraper::{Html, Selector};

/// A hyperlink found inside a cell. `href` is absent for anchors without one;
/// those contribute their visible text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Whitespace-trimmed plain text of the cell.
    pub text: String,
    pub anchors: Vec<Anchor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Parse every `<tr>` in the document into its `<td>` cells, in source order.
/// Malformed markup degrades to whatever the parser recovers; rows are never
/// rejected here.
pub fn parse_rows(html: &str) -> Vec<TableRow> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tr").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");
    let anchor_selector = Selector::parse("a").expect("static selector");

    document
        .select(&row_selector)
        .map(|row| {
            let cells = row
                .select(&cell_selector)
                .map(|cell| {
                    let text = collapse_whitespace(&cell.text().collect::<String>());
                    let anchors = cell
                        .select(&anchor_selector)
                        .map(|anchor| Anchor {
                            href: anchor
                                .value()
                                .attr("href")
                                .map(|href| href.trim().to_string()),
                            text: collapse_whitespace(&anchor.text().collect::<String>()),
                        })
                        .collect();

                    TableCell { text, anchors }
                })
                .collect();

            TableRow { cells }
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
