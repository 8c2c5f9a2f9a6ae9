use crate::signer::TokenSigner;
use crate::types::Event;
use crate::utils::html;
use chrono::NaiveDate;

/// The three independent representations of one digest email.
#[derive(Debug, Clone)]
pub struct RenderedDigest {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders a list of events plus addressing context into one email. Pure
/// function of its inputs; the only derived value is the per-recipient
/// unsubscribe page URL obtained through the signer.
#[derive(Clone)]
pub struct DigestRenderer {
    signer: TokenSigner,
    domain: String,
}

impl DigestRenderer {
    pub fn new(signer: TokenSigner, domain: impl Into<String>) -> Self {
        Self {
            signer,
            domain: domain.into(),
        }
    }

    pub fn render(
        &self,
        events: &[Event],
        location_name: &str,
        category_name: &str,
        subscription_id: &str,
        today: NaiveDate,
    ) -> RenderedDigest {
        let links = self.signer.unsubscribe_links(subscription_id, &self.domain);

        RenderedDigest {
            subject: subject_line(events.len(), location_name, category_name, today),
            html: render_html(events, location_name, category_name, &links.page_url, today),
            text: render_text(events, location_name, category_name, &links.page_url, today),
        }
    }
}

/// Subject line with event count and today's date; singular wording when the
/// count is exactly one. Zero matches still get a subject (and an email), so
/// recipients can tell the service is alive.
pub fn subject_line(
    count: usize,
    location_name: &str,
    category_name: &str,
    today: NaiveDate,
) -> String {
    let date = today.format("%Y-%m-%d");

    if count == 0 {
        return format!(
            "No {} events this week in {} ({})",
            category_name, location_name, date
        );
    }

    format!(
        "{} {} event{} this week in {}! ({})",
        count,
        category_name,
        if count == 1 { "" } else { "s" },
        location_name,
        date
    )
}

const CELL_STYLE: &str = "padding: 8px; border: 1px solid #ddd;";
const HEADER_CELL_STYLE: &str =
    "padding: 12px 8px; text-align: left; font-weight: 600; border: 1px solid #b71c1c;";

fn render_html(
    events: &[Event],
    location_name: &str,
    category_name: &str,
    unsubscribe_url: &str,
    today: NaiveDate,
) -> String {
    let date = today.format("%Y-%m-%d");
    let location = html::escape(location_name);
    let category = html::escape(category_name);

    let mut rows = String::new();
    if events.is_empty() {
        rows.push_str(&format!(
            "<tr><td colspan=\"7\" style=\"padding: 20px; text-align: center; color: #666;\">\
             No {} events found in {} for the upcoming week.</td></tr>\n",
            category, location
        ));
    } else {
        for event in events {
            rows.push_str("<tr>");
            rows.push_str(&cell(&html::escape(&event.date_time)));
            rows.push_str(&cell(&html::escape(&event.title)));
            rows.push_str(&cell(&html::escape(&event.tags)));
            rows.push_str(&cell(&html::escape(&event.price_age)));
            rows.push_str(&cell(&html::escape(&event.organizers)));
            // The links field already carries markup rebuilt from escaped
            // parts by the extractor; inserted as-is.
            rows.push_str(&cell(&event.links));
            rows.push_str(&cell(&html::escape(&event.date_sortable)));
            rows.push_str("</tr>\n");
        }
    }

    let intro = if events.is_empty() {
        format!(
            "No {} events found for this week. Check back next week!",
            category
        )
    } else {
        format!(
            "Found <strong>{}</strong> {} event{} happening in the next week!",
            events.len(),
            category,
            if events.len() == 1 { "" } else { "s" }
        )
    };

    let mut header_cells = String::new();
    for label in [
        "Date/Time",
        "Event @ Venue",
        "Tags",
        "Price | Age",
        "Organizers",
        "Links",
        "Date",
    ] {
        header_cells.push_str(&format!(
            "<th style=\"{}\">{}</th>",
            HEADER_CELL_STYLE, label
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Weekly {category} Events - {location}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px;">
  <div style="background: linear-gradient(135deg, #b71c1c 0%, #e53935 100%); padding: 30px; border-radius: 10px 10px 0 0; color: white;">
    <h1 style="margin: 0 0 10px 0; font-size: 28px;">Weekly {category} Events</h1>
    <p style="margin: 0; opacity: 0.95; font-size: 16px;">{location} - Week of {date}</p>
  </div>
  <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
    <p style="font-size: 16px; margin-bottom: 20px;">{intro}</p>
    <table style="width: 100%; border-collapse: collapse; background: white;">
      <thead>
        <tr style="background: #e53935; color: white;">{header_cells}</tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
    <div style="margin-top: 30px; padding-top: 20px; border-top: 2px solid #e0e0e0; font-size: 14px; color: #666;">
      <p style="margin: 5px 0;">Your weekly {category} event digest for {location}</p>
      <p style="margin: 5px 0;">Event data sourced from <a href="https://19hz.info/" style="color: #b71c1c; text-decoration: none;">19hz.info</a></p>
      <p style="margin: 15px 0 5px 0;">
        <a href="{unsubscribe_url}" style="color: #b71c1c; text-decoration: underline; font-size: 12px;">Unsubscribe from these emails</a>
      </p>
    </div>
  </div>
</body>
</html>"#,
        category = category,
        location = location,
        date = date,
        intro = intro,
        header_cells = header_cells,
        rows = rows,
        unsubscribe_url = unsubscribe_url,
    )
}

fn cell(content: &str) -> String {
    format!("<td style=\"{}\">{}</td>", CELL_STYLE, content)
}

fn render_text(
    events: &[Event],
    location_name: &str,
    category_name: &str,
    unsubscribe_url: &str,
    today: NaiveDate,
) -> String {
    let date = today.format("%Y-%m-%d");

    let intro = if events.is_empty() {
        "No events found for this week. Check back next week!".to_string()
    } else {
        format!(
            "Found {} {} event{} happening in the next week!",
            events.len(),
            category_name,
            if events.len() == 1 { "" } else { "s" }
        )
    };

    let event_text = if events.is_empty() {
        format!(
            "No {} events found in {} for the upcoming week.",
            category_name, location_name
        )
    } else {
        events
            .iter()
            .map(|event| {
                format!(
                    "{} | {} | {} | {} | {} | {} | {}",
                    event.date_time,
                    event.title,
                    event.tags,
                    event.price_age,
                    event.organizers,
                    event.links,
                    event.date_sortable
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "Weekly {category} Events - {location}\nWeek of {date}\n\n{intro}\n\n{events}\n\n---\n\
         Your weekly {category} event digest for {location}\n\
         Event data sourced from https://19hz.info/\n\n\
         Unsubscribe: {unsubscribe}",
        category = category_name,
        location = location_name,
        date = date,
        intro = intro,
        events = event_text,
        unsubscribe = unsubscribe_url,
    )
}
