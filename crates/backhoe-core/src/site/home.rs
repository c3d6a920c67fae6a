//! The home page.

use std::fmt::Write as _;

use crate::content::{CATEGORIES, HERO_SUBTITLE, HERO_TITLE, HOW_IT_WORKS, MAP_HEADING};
use crate::html::fill;
use crate::site::layout::{PageContext, render_page};

/// Render the home page around `map_markup`, which is either the rendered
/// map SVG or the loading placeholder.
#[must_use]
pub fn render_home(ctx: &PageContext<'_>, map_markup: &str) -> String {
    let main = fill(
        HOME_MAIN,
        &[
            ("HERO_TITLE", HERO_TITLE),
            ("HERO_SUBTITLE", HERO_SUBTITLE),
            ("CATEGORIES", &category_tiles()),
            ("STEPS", &steps()),
            ("MAP_HEADING", MAP_HEADING),
            ("MAP", map_markup),
        ],
    );
    render_page(&ctx.home(), &main)
}

fn category_tiles() -> String {
    let mut out = String::new();
    for category in CATEGORIES {
        let _ = write!(
            out,
            r#"<a class="category-tile" href="/?rent={id}" data-category="{id}"><img src="{image}" alt="{name}" loading="lazy"/><h3>{name}</h3></a>"#,
            id = category.id,
            image = category.image,
            name = category.name,
        );
    }
    out
}

// Odd steps put the text first, even steps the image first.
fn steps() -> String {
    let mut out = String::new();
    for step in HOW_IT_WORKS {
        let text = format!(
            r#"<div class="step-text"><div class="step-number">{}</div><div><h3>{}</h3><p>{}</p></div></div>"#,
            step.number, step.title, step.body
        );
        let image = format!(
            r#"<div class="step-image"><img src="{}" alt="{}" width="500" height="300"/></div>"#,
            step.image, step.title
        );
        let (first, second) = if step.number % 2 == 1 { (text, image) } else { (image, text) };
        let _ = write!(out, r#"<div class="step">{first}{second}</div>"#);
    }
    out
}

const HOME_MAIN: &str = r##"<main>
<section class="hero"><div class="container">
<h1>{{HERO_TITLE}}</h1>
<p>{{HERO_SUBTITLE}}</p>
</div></section>
<section class="categories"><div class="container">
<h2 class="section-title">CATEGORIES</h2>
<div class="category-grid">{{CATEGORIES}}</div>
</div></section>
<section class="how-it-works"><div class="container">
<h2 class="section-title">HOW DOES IT WORK</h2>
{{STEPS}}
</div></section>
<section class="map-section" id="map"><div class="container">
<h2>{{MAP_HEADING}}</h2>
<div class="map-frame">{{MAP}}</div>
</div></section>
</main>
"##;
