//! Landing page: a grid of link tiles built from the `landingPage` block

use std::fmt::Write;

use super::html::escape;
use crate::catalog::model::{Card, CardKind, Category, LandingPageConfig};

const DEFAULT_TITLE: &str = "Venue Maps";

/// Used when a card's target cannot be resolved
pub const PLACEHOLDER_LINK: &str = "#";

const LANDING_STYLE: &str = r#"
        * { box-sizing: border-box; }
        body {
            font-family: system-ui, -apple-system, sans-serif;
            margin: 0;
            background: #f4f6f8;
            color: #1d2733;
        }
        .landing-header {
            padding: 32px 20px 8px;
            text-align: center;
        }
        .landing-grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
            gap: 16px;
            max-width: 1100px;
            margin: 0 auto;
            padding: 20px;
        }
        .landing-card {
            display: flex;
            flex-direction: column;
            gap: 6px;
            padding: 20px;
            border-radius: 8px;
            background: #ffffff;
            box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12);
            color: inherit;
            text-decoration: none;
        }
        .landing-card:hover { box-shadow: 0 4px 12px rgba(0, 0, 0, 0.18); }
        .landing-card-icon { font-size: 2rem; }
        .landing-card-title { font-weight: 600; font-size: 1.1rem; }
        .landing-card-description { color: #5a6675; font-size: 0.9rem; }
"#;

/// Cards to show: visible ones, stable-sorted by `order`
pub fn visible_cards(config: &LandingPageConfig) -> Vec<&Card> {
    let mut cards: Vec<&Card> = config.cards.iter().filter(|c| c.is_visible()).collect();
    cards.sort_by_key(|c| c.order);
    cards
}

/// Link target of a card
pub fn card_href(card: &Card, categories: &[Category]) -> String {
    match card.kind {
        CardKind::CustomLink => match card.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() && !is_script_url(url) => url.to_string(),
            _ => PLACEHOLDER_LINK.to_string(),
        },
        CardKind::CategoryLink => card
            .category_id
            .as_deref()
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .filter(|c| !c.slug.is_empty())
            .map(|c| format!("{}.html", c.slug))
            .unwrap_or_else(|| PLACEHOLDER_LINK.to_string()),
    }
}

fn is_script_url(url: &str) -> bool {
    url.get(..11)
        .map(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
        .unwrap_or(false)
}

/// Tile title; category cards without one borrow the category's name
fn card_title<'a>(card: &'a Card, categories: &'a [Category]) -> &'a str {
    if !card.title.is_empty() {
        return &card.title;
    }
    card.category_id
        .as_deref()
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("")
}

/// Self-contained landing document, or `None` when the config has no cards
pub fn render_landing(config: &LandingPageConfig, categories: &[Category]) -> Option<String> {
    if config.cards.is_empty() {
        return None;
    }

    let title = if config.title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        config.title.as_str()
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>{title}</title>\n    <style>{style}    </style>\n</head>\n<body>\n    <header class=\"landing-header\">\n        <h1>{title}</h1>\n    </header>\n    <main class=\"landing-grid\">\n",
        title = escape(title),
        style = LANDING_STYLE,
    );

    for card in visible_cards(config) {
        let kind = match card.kind {
            CardKind::CategoryLink => "category",
            CardKind::CustomLink => "custom",
        };
        let _ = writeln!(
            html,
            "        <a class=\"landing-card landing-card--{}\" href=\"{}\">",
            kind,
            escape(&card_href(card, categories))
        );
        if let Some(icon) = card.icon.as_deref().filter(|i| !i.is_empty()) {
            let _ = writeln!(html, "            <span class=\"landing-card-icon\">{}</span>", escape(icon));
        }
        let _ = writeln!(
            html,
            "            <span class=\"landing-card-title\">{}</span>",
            escape(card_title(card, categories))
        );
        if !card.description.is_empty() {
            let _ = writeln!(
                html,
                "            <span class=\"landing-card-description\">{}</span>",
                escape(&card.description)
            );
        }
        html.push_str("        </a>\n");
    }

    html.push_str("    </main>\n</body>\n</html>\n");
    Some(html)
}
