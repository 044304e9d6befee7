//! Category page markup: venue sections with map tabs, panels and markers

use std::fmt::Write;

use super::html::escape;
use super::{CATEGORY_NAME_PLACEHOLDER, VENUES_CONTENT_PLACEHOLDER};
use crate::catalog::model::{Category, Location, Map, Position, Venue};

/// Venues of `category` in document order (legacy `category` fallback applied)
pub fn venues_in<'a>(category: &Category, venues: &'a [Venue]) -> Vec<&'a Venue> {
    venues.iter().filter(|v| v.belongs_to(&category.id)).collect()
}

/// Substitute both placeholders in a single left-to-right pass, so text in
/// one substituted value is never mistaken for the other placeholder
pub fn fill_template(template: &str, category_name: &str, content: &str) -> String {
    let substitutions = [
        (CATEGORY_NAME_PLACEHOLDER, category_name),
        (VENUES_CONTENT_PLACEHOLDER, content),
    ];
    let mut out = String::with_capacity(template.len() + content.len());
    let mut rest = template;

    loop {
        let next = substitutions
            .iter()
            .filter_map(|(placeholder, value)| rest.find(placeholder).map(|at| (at, *placeholder, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, placeholder, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Full category document from the page template
pub fn render_category_page(template: &str, category: &Category, venues: &[&Venue]) -> String {
    fill_template(template, &escape(&category.name), &render_venues(venues))
}

/// Markup for a list of venues, one `<section>` each
pub fn render_venues(venues: &[&Venue]) -> String {
    venues
        .iter()
        .map(|venue| render_venue(venue))
        .collect::<Vec<_>>()
        .join("\n")
}

fn active_class(index: usize) -> &'static str {
    if index == 0 {
        " active"
    } else {
        ""
    }
}

fn render_venue(venue: &Venue) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<section class=\"venue\" id=\"{}\">\n  <h2 class=\"venue-title\">{}</h2>\n  <div class=\"map-tabs\">\n",
        escape(&venue.id),
        escape(&venue.name)
    );
    for (i, map) in venue.maps.iter().enumerate() {
        let _ = writeln!(
            html,
            "    <button class=\"map-tab{}\" data-map=\"{}\">{}</button>",
            active_class(i),
            escape(&map.id),
            escape(&map.label)
        );
    }
    html.push_str("  </div>\n  <div class=\"maps-container\">\n");

    for (i, map) in venue.maps.iter().enumerate() {
        render_map_panel(&mut html, venue, map, i);
    }

    html.push_str("  </div>\n</section>");
    html
}

fn render_map_panel(html: &mut String, venue: &Venue, map: &Map, index: usize) {
    let _ = write!(
        html,
        "    <div class=\"map-panel{}\" id=\"{}\">\n      <div class=\"map-container\">\n        <img src=\"{}\" alt=\"{}\" class=\"map-image\">\n",
        active_class(index),
        escape(&map.id),
        escape(&map.image),
        escape(&map.label)
    );
    for location in &map.locations {
        render_marker(html, venue, map, location);
    }
    html.push_str("      </div>\n    </div>\n");
}

fn render_marker(html: &mut String, venue: &Venue, map: &Map, location: &Location) {
    let position = location.position.clone().unwrap_or_default();
    let Position { top, left } = position;
    let number = location.number.map(|n| n.to_string()).unwrap_or_default();

    let _ = write!(
        html,
        concat!(
            "        <div class=\"location-marker\" style=\"top: {top}; left: {left};\"",
            " data-location=\"{id}\" data-number=\"{number}\" data-name=\"{name}\"",
            " data-description=\"{description}\" data-fiber=\"{fiber}\" data-image=\"{image}\"",
            " data-venue=\"{venue}\" data-map=\"{map}\">\n",
            "          <span class=\"marker-number\">{number}</span>\n",
            "        </div>\n"
        ),
        top = escape(&top.to_string()),
        left = escape(&left.to_string()),
        id = escape(&location.id),
        number = number,
        name = escape(&location.name),
        description = escape(&location.description),
        fiber = escape(&location.fiber),
        image = escape(&location.image),
        venue = escape(&venue.name),
        map = escape(&map.label),
    );
}
