//! Fulfillment payload construction for the dialog platform.
//!
//! The wire shape follows the Dialogflow CX webhook contract: an ordered
//! list of messages, each either plain text or a `richContent` payload of
//! card rows. Every card field is backfilled so the agent never renders an
//! empty title, image, or link.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::matcher::MatchSet;

pub const FALLBACK_TITLE: &str = "Gemstone product";
pub const PROMPT_TEXT: &str = "Please provide a stone name.";
pub const TAG_MISMATCH_TEXT: &str = "This webhook cannot handle that request.";
pub const INTERNAL_ERROR_TEXT: &str = "Sorry, there was an error processing your request.";

/// Display cap for the bounded carousel.
const CAROUSEL_CAP: usize = 5;

/// Presentation policy for matched products. The three variants are
/// mutually exclusive; exactly one is active per deployment, selected
/// through configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStrategy {
    /// One image+info row per matched record, unconditionally.
    Grid,
    /// One info card per matched record, unconditionally.
    FlatList,
    /// Cap the carousel and append a "view all" card when truncated.
    #[default]
    BoundedCarousel,
}

/// Settings the formatter needs beyond the match set itself.
#[derive(Clone, Debug)]
pub struct FormatterSettings {
    pub strategy: DisplayStrategy,
    pub site_base_url: String,
    pub placeholder_image: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReply {
    pub fulfillment_response: FulfillmentResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentResponse {
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text { text: TextContent },
    Rich { payload: RichPayload },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichPayload {
    #[serde(rename = "richContent")]
    pub rich_content: Vec<Vec<Card>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    #[serde(rename = "image", rename_all = "camelCase")]
    Image { raw_url: String, accessibility_text: String },
    #[serde(rename = "info", rename_all = "camelCase")]
    Info { title: String, subtitle: String, action_link: String },
}

// ---------------------------------------------------------------------------
// Canned replies
// ---------------------------------------------------------------------------

fn text_reply(line: String) -> WebhookReply {
    WebhookReply {
        fulfillment_response: FulfillmentResponse {
            messages: vec![Message::Text { text: TextContent { text: vec![line] } }],
        },
    }
}

/// Reply for a missing or empty query; no matching was attempted.
pub fn prompt_reply() -> WebhookReply {
    text_reply(PROMPT_TEXT.to_string())
}

/// Reply for an absent or unexpected routing tag.
pub fn tag_mismatch_reply() -> WebhookReply {
    text_reply(TAG_MISMATCH_TEXT.to_string())
}

/// Fixed apology surfaced alongside HTTP 500 on internal failure.
pub fn internal_error_reply() -> WebhookReply {
    text_reply(INTERNAL_ERROR_TEXT.to_string())
}

/// Reply when both match passes came back empty. Suggests a few known
/// categories when any are available.
pub fn not_found_reply(query: &str, suggestions: &[String]) -> WebhookReply {
    let mut line = format!("No products found for {query}.");
    if !suggestions.is_empty() {
        line.push_str(&format!(" Try one of: {}.", suggestions.join(", ")));
    }
    text_reply(line)
}

// ---------------------------------------------------------------------------
// Matched-set formatting
// ---------------------------------------------------------------------------

/// Build the presentation payload for a non-empty match set.
pub fn matched_reply(
    settings: &FormatterSettings,
    query: &str,
    matches: &MatchSet<'_>,
) -> WebhookReply {
    debug_assert!(!matches.is_empty(), "caller must handle the empty set");

    let (summary, rows) = match settings.strategy {
        DisplayStrategy::Grid => grid_rows(settings, query, &matches.products),
        DisplayStrategy::FlatList => flat_list_rows(settings, query, &matches.products),
        DisplayStrategy::BoundedCarousel => carousel_rows(settings, query, &matches.products),
    };

    WebhookReply {
        fulfillment_response: FulfillmentResponse {
            messages: vec![
                Message::Text { text: TextContent { text: vec![summary] } },
                Message::Rich { payload: RichPayload { rich_content: rows } },
            ],
        },
    }
}

fn grid_rows(
    settings: &FormatterSettings,
    query: &str,
    products: &[&Product],
) -> (String, Vec<Vec<Card>>) {
    let rows = products
        .iter()
        .map(|product| vec![image_card(settings, product), info_card(settings, product)])
        .collect();
    (found_summary(query, products.len()), rows)
}

fn flat_list_rows(
    settings: &FormatterSettings,
    query: &str,
    products: &[&Product],
) -> (String, Vec<Vec<Card>>) {
    let rows = products.iter().map(|product| vec![info_card(settings, product)]).collect();
    (found_summary(query, products.len()), rows)
}

fn carousel_rows(
    settings: &FormatterSettings,
    query: &str,
    products: &[&Product],
) -> (String, Vec<Vec<Card>>) {
    let total = products.len();
    let shown = if total == 1 { 1 } else { CAROUSEL_CAP.min(2.max(total)) };

    let mut row: Vec<Card> =
        products.iter().take(shown).map(|product| info_card(settings, product)).collect();

    let summary = if total > shown {
        row.push(view_all_card(settings, query, total - shown));
        format!("Showing {shown} of {total} {query} products.")
    } else {
        found_summary(query, total)
    };

    (summary, vec![row])
}

fn found_summary(query: &str, count: usize) -> String {
    if count == 1 {
        format!("Found 1 {query} product.")
    } else {
        format!("Found {count} {query} products.")
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

fn display_title(product: &Product) -> String {
    product
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string()
}

fn sizes_subtitle(product: &Product) -> String {
    match product.sizes.as_deref() {
        Some(sizes) if !sizes.is_empty() => format!("Available sizes: {}", sizes.join(", ")),
        _ => "Sizes available on request".to_string(),
    }
}

fn image_card(settings: &FormatterSettings, product: &Product) -> Card {
    Card::Image {
        raw_url: product
            .main_image
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| settings.placeholder_image.clone()),
        accessibility_text: display_title(product),
    }
}

fn info_card(settings: &FormatterSettings, product: &Product) -> Card {
    Card::Info {
        title: display_title(product),
        subtitle: sizes_subtitle(product),
        action_link: product
            .product_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| settings.site_base_url.clone()),
    }
}

fn view_all_card(settings: &FormatterSettings, query: &str, hidden: usize) -> Card {
    let subtitle = if hidden == 1 {
        "1 more item available".to_string()
    } else {
        format!("{hidden} more items available")
    };
    Card::Info {
        title: format!("View all {query} products"),
        subtitle,
        action_link: collection_url(&settings.site_base_url, query),
    }
}

/// Derived collection link used by the "view all" card.
pub fn collection_url(base: &str, query: &str) -> String {
    format!("{}/collections/{query}-gemstone-beads", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use crate::catalog::Product;
    use crate::matcher::{MatchQuality, MatchSet};

    use super::*;

    fn settings(strategy: DisplayStrategy) -> FormatterSettings {
        FormatterSettings {
            strategy,
            site_base_url: "https://rezagemcollection.ca".to_string(),
            placeholder_image: "https://rezagemcollection.ca/img/placeholder.png".to_string(),
        }
    }

    fn product(title: Option<&str>) -> Product {
        Product {
            title: title.map(str::to_string),
            stone_type: "agate".to_string(),
            sizes: Some(vec!["6mm".to_string(), "8mm".to_string()]),
            main_image: Some("https://cdn.example.com/agate.jpg".to_string()),
            product_url: Some("https://shop.example.com/products/agate".to_string()),
        }
    }

    fn bare_product() -> Product {
        Product {
            title: None,
            stone_type: "agate".to_string(),
            sizes: None,
            main_image: None,
            product_url: None,
        }
    }

    fn match_set(products: &[Product]) -> MatchSet<'_> {
        MatchSet { quality: MatchQuality::Exact, products: products.iter().collect() }
    }

    fn rich_rows(reply: &WebhookReply) -> &Vec<Vec<Card>> {
        let rich = reply
            .fulfillment_response
            .messages
            .iter()
            .find_map(|message| match message {
                Message::Rich { payload } => Some(&payload.rich_content),
                Message::Text { .. } => None,
            })
            .expect("reply should carry rich content");
        rich
    }

    fn summary_text(reply: &WebhookReply) -> &str {
        match &reply.fulfillment_response.messages[0] {
            Message::Text { text } => &text.text[0],
            Message::Rich { .. } => panic!("first message should be text"),
        }
    }

    #[test]
    fn carousel_caps_seven_matches_at_five_plus_view_all() {
        let products: Vec<Product> = (0..7).map(|i| product(Some(&format!("p{i}")))).collect();
        let reply =
            matched_reply(&settings(DisplayStrategy::BoundedCarousel), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6, "five products plus the view-all card");
        assert_eq!(summary_text(&reply), "Showing 5 of 7 agate products.");

        match &rows[0][5] {
            Card::Info { title, subtitle, action_link } => {
                assert_eq!(title, "View all agate products");
                assert_eq!(subtitle, "2 more items available");
                assert_eq!(
                    action_link,
                    "https://rezagemcollection.ca/collections/agate-gemstone-beads"
                );
            }
            Card::Image { .. } => panic!("view-all card should be an info card"),
        }
    }

    #[test]
    fn carousel_single_match_shows_one_item_and_no_view_all() {
        let products = vec![product(Some("solo"))];
        let reply =
            matched_reply(&settings(DisplayStrategy::BoundedCarousel), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(summary_text(&reply), "Found 1 agate product.");
    }

    #[test]
    fn carousel_two_matches_shows_both_and_no_view_all() {
        let products = vec![product(Some("a")), product(Some("b"))];
        let reply =
            matched_reply(&settings(DisplayStrategy::BoundedCarousel), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(summary_text(&reply), "Found 2 agate products.");
    }

    #[test]
    fn grid_emits_image_and_info_pair_per_record() {
        let products = vec![product(Some("a")), product(Some("b")), product(Some("c"))];
        let reply = matched_reply(&settings(DisplayStrategy::Grid), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.len(), 2);
            assert!(matches!(row[0], Card::Image { .. }));
            assert!(matches!(row[1], Card::Info { .. }));
        }
    }

    #[test]
    fn flat_list_emits_one_info_card_per_record() {
        let products = vec![product(Some("a")), product(Some("b"))];
        let reply =
            matched_reply(&settings(DisplayStrategy::FlatList), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| matches!(row[..], [Card::Info { .. }])));
    }

    #[test]
    fn missing_optional_fields_fall_back_on_every_card() {
        let products = vec![bare_product()];
        let reply = matched_reply(&settings(DisplayStrategy::Grid), "agate", &match_set(&products));

        let rows = rich_rows(&reply);
        match &rows[0][0] {
            Card::Image { raw_url, accessibility_text } => {
                assert_eq!(raw_url, "https://rezagemcollection.ca/img/placeholder.png");
                assert_eq!(accessibility_text, FALLBACK_TITLE);
            }
            Card::Info { .. } => panic!("expected image card"),
        }
        match &rows[0][1] {
            Card::Info { title, subtitle, action_link } => {
                assert_eq!(title, FALLBACK_TITLE);
                assert_eq!(subtitle, "Sizes available on request");
                assert_eq!(action_link, "https://rezagemcollection.ca");
            }
            Card::Image { .. } => panic!("expected info card"),
        }
    }

    #[test]
    fn not_found_reply_has_no_rich_content() {
        let reply = not_found_reply("obsidian", &["agate".to_string(), "jade".to_string()]);

        assert_eq!(reply.fulfillment_response.messages.len(), 1);
        assert_eq!(
            summary_text(&reply),
            "No products found for obsidian. Try one of: agate, jade."
        );
    }

    #[test]
    fn not_found_reply_without_suggestions_is_plain() {
        let reply = not_found_reply("obsidian", &[]);
        assert_eq!(summary_text(&reply), "No products found for obsidian.");
    }

    #[test]
    fn wire_shape_matches_the_dialog_platform_contract() {
        let products = vec![product(Some("a"))];
        let reply = matched_reply(&settings(DisplayStrategy::Grid), "agate", &match_set(&products));
        let value = serde_json::to_value(&reply).expect("serialize");

        let messages = &value["fulfillment_response"]["messages"];
        assert_eq!(messages[0]["text"]["text"][0], "Found 1 agate product.");

        let card = &messages[1]["payload"]["richContent"][0][0];
        assert_eq!(card["type"], "image");
        assert_eq!(card["rawUrl"], "https://cdn.example.com/agate.jpg");
        assert_eq!(card["accessibilityText"], "a");

        let info = &messages[1]["payload"]["richContent"][0][1];
        assert_eq!(info["type"], "info");
        assert_eq!(info["actionLink"], "https://shop.example.com/products/agate");
    }

    #[test]
    fn collection_url_trims_trailing_slash() {
        assert_eq!(
            collection_url("https://example.com/", "jade"),
            "https://example.com/collections/jade-gemstone-beads"
        );
    }
}
