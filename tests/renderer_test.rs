use chrono::NaiveDate;
use event_digest::renderer::subject_line;
use event_digest::{DigestRenderer, Event, TokenSigner};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn renderer() -> DigestRenderer {
    DigestRenderer::new(TokenSigner::new("test-hmac-secret"), "digest.test")
}

fn event(title: &str) -> Event {
    Event {
        date_time: "Fri Jun 6".to_string(),
        title: title.to_string(),
        tags: "Hardstyle, Rawstyle".to_string(),
        price_age: "$30 | 18+".to_string(),
        organizers: "Gearbox".to_string(),
        links: r#"<a href="https://tickets.test/e1">Tickets</a>"#.to_string(),
        date_sortable: "2025/06/06".to_string(),
    }
}

const SUB_ID: &str = "a3bb189e-8bf9-3888-9912-ace4e6543002";

#[test]
fn subject_uses_singular_for_one_event() {
    assert_eq!(
        subject_line(1, "Bay Area", "hardstyle", today()),
        "1 hardstyle event this week in Bay Area! (2025-06-01)"
    );
}

#[test]
fn subject_uses_plural_for_many_events() {
    assert_eq!(
        subject_line(3, "Bay Area", "hardstyle", today()),
        "3 hardstyle events this week in Bay Area! (2025-06-01)"
    );
}

#[test]
fn subject_has_distinct_zero_event_wording() {
    assert_eq!(
        subject_line(0, "Bay Area", "hardstyle", today()),
        "No hardstyle events this week in Bay Area (2025-06-01)"
    );
}

#[test]
fn zero_events_still_renders_a_full_digest() {
    let digest = renderer().render(&[], "Bay Area", "hardstyle", SUB_ID, today());

    assert!(digest.subject.starts_with("No hardstyle events"));
    assert!(digest
        .html
        .contains("No hardstyle events found in Bay Area for the upcoming week."));
    assert!(digest
        .text
        .contains("No hardstyle events found in Bay Area for the upcoming week."));
    // No event rows besides the header and the placeholder.
    assert_eq!(digest.html.matches("<tr").count(), 2);
}

#[test]
fn rendered_digest_lists_each_event() {
    let events = vec![event("Gearbox Night"), event("Uptempo Madness")];
    let digest = renderer().render(&events, "Bay Area", "hardstyle", SUB_ID, today());

    assert!(digest.subject.starts_with("2 hardstyle events"));
    assert!(digest.html.contains("Gearbox Night"));
    assert!(digest.html.contains("Uptempo Madness"));
    assert!(digest.text.contains("Gearbox Night"));
    assert!(digest.text.contains("Uptempo Madness"));
}

#[test]
fn all_bodies_embed_the_unsubscribe_page_url() {
    let signer = TokenSigner::new("test-hmac-secret");
    let expected = signer.unsubscribe_links(SUB_ID, "digest.test").page_url;

    let digest = renderer().render(&[event("Gearbox Night")], "Bay Area", "hardstyle", SUB_ID, today());

    assert!(digest.html.contains(&expected));
    assert!(digest.text.contains(&expected));
}

#[test]
fn untrusted_event_fields_are_escaped_in_html() {
    let mut tricky = event("<script>alert('x')</script>");
    tricky.organizers = "Dj Ampersand & Friends".to_string();
    let digest = renderer().render(&[tricky], "Bay Area", "hardstyle", SUB_ID, today());

    assert!(!digest.html.contains("<script>"));
    assert!(digest
        .html
        .contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    assert!(digest.html.contains("Dj Ampersand &amp; Friends"));
}

#[test]
fn links_markup_passes_through_unescaped() {
    let digest = renderer().render(&[event("Linked")], "Bay Area", "hardstyle", SUB_ID, today());

    assert!(digest
        .html
        .contains(r#"<a href="https://tickets.test/e1">Tickets</a>"#));
}

#[test]
fn location_and_category_names_are_escaped() {
    let digest = renderer().render(&[], "Bay <Area>", "hard&style", SUB_ID, today());

    assert!(digest.html.contains("Bay &lt;Area&gt;"));
    assert!(digest.html.contains("hard&amp;style"));
}
