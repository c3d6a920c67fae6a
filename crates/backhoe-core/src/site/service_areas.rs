//! The service-areas directory and the per-state city lists.

use std::fmt::Write as _;

use crate::content::SERVICE_AREAS_HEADING;
use crate::html::{escape, fill};
use crate::service_areas::{ServiceArea, ServiceAreaDirectory};
use crate::site::layout::{PageContext, render_page};

/// The directory page: every state, dealt into four columns.
#[must_use]
pub fn render_directory(ctx: &PageContext<'_>, directory: &ServiceAreaDirectory) -> String {
    let mut columns = String::new();
    for column in directory.columns() {
        columns.push_str(r#"<div class="area-column">"#);
        for area in column {
            let _ = write!(
                columns,
                r#"<div class="area-link"><a href="/service-areas/{}/">{} <span class="area-count">({})</span></a></div>"#,
                escape(&area.slug),
                escape(&area.state),
                area.city_count()
            );
        }
        columns.push_str("</div>");
    }

    let main = fill(
        DIRECTORY_MAIN,
        &[
            ("CRUMB", "USA"),
            ("HEADING", &SERVICE_AREAS_HEADING.join("<br/>")),
            ("BODY", &format!(r#"<div class="area-grid">{columns}</div>"#)),
        ],
    );
    render_page(&ctx.titled("Service Areas"), &main)
}

/// One state's page listing the cities served there.
#[must_use]
pub fn render_state(ctx: &PageContext<'_>, area: &ServiceArea) -> String {
    let state = escape(&area.state);
    let mut cities = String::from(r#"<ul class="city-list">"#);
    for city in &area.cities {
        let _ = write!(cities, "<li>{}</li>", escape(city));
    }
    cities.push_str("</ul>");
    let body = format!(
        r#"<p class="area-back"><a href="/service-areas/">&larr; All service areas</a></p>{cities}"#
    );

    let main = fill(
        DIRECTORY_MAIN,
        &[
            ("CRUMB", &format!("USA / {state}")),
            ("HEADING", &format!("Equipment Rental in {state}")),
            ("BODY", &body),
        ],
    );
    render_page(&ctx.titled(&area.state), &main)
}

const DIRECTORY_MAIN: &str = r##"<main class="service-areas">
<section class="areas-hero"><div class="container">
<p class="areas-crumb">{{CRUMB}}</p>
<h1>{{HEADING}}</h1>
</div></section>
<section class="container"><div class="areas-card">{{BODY}}</div></section>
</main>
"##;
