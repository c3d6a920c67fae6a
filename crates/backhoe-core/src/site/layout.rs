//! Page shell: head, header with navigation, footer, and the overlay slot.

use std::fmt::Write as _;

use crate::content::{
    BUSINESS_HOURS, COMPANY_ADDRESS, COMPANY_BLURB, COMPANY_EMAIL, COMPANY_NAME, COMPANY_PHONE,
    COMPANY_PHONE_INTL, COMPANY_TAGLINE, NAV_MENUS, SITE_DESCRIPTION, SITE_TITLE, TOP_BAR_CALL_TO_ACTION,
    TOP_BAR_PITCH,
};
use crate::html::{escape, fill};
use crate::site::{Overlay, STYLESHEET_PATH};

/// Per-page inputs to the shell.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Prefix for the `<title>`; `None` uses the bare site title.
    pub title: Option<&'a str>,
    /// The home page shows the top bar above the header.
    pub home: bool,
    /// Year printed in the footer copyright line.
    pub year: i32,
    pub overlay: Overlay<'a>,
}

impl<'a> PageContext<'a> {
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            title: None,
            home: false,
            year,
            overlay: Overlay::None,
        }
    }

    #[must_use]
    pub fn home(mut self) -> Self {
        self.home = true;
        self
    }

    #[must_use]
    pub fn titled(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: Overlay<'a>) -> Self {
        self.overlay = overlay;
        self
    }
}

/// Wrap `main` (already-rendered markup) in the full document.
#[must_use]
pub fn render_page(ctx: &PageContext<'_>, main: &str) -> String {
    let title = match ctx.title {
        Some(prefix) => format!("{} | {SITE_TITLE}", escape(prefix)),
        None => SITE_TITLE.to_owned(),
    };

    let company = escape(COMPANY_NAME);

    let mut html = String::with_capacity(16384 + main.len());
    html.push_str(&fill(
        PAGE_HEAD,
        &[
            ("TITLE", &title),
            ("DESCRIPTION", SITE_DESCRIPTION),
            ("STYLESHEET", STYLESHEET_PATH),
        ],
    ));
    if ctx.home {
        html.push_str(&fill(
            TOP_BAR,
            &[("PITCH", TOP_BAR_PITCH), ("CALL_TO_ACTION", TOP_BAR_CALL_TO_ACTION)],
        ));
    }
    html.push_str(&fill(
        HEADER,
        &[
            ("COMPANY", &company),
            ("TAGLINE", COMPANY_TAGLINE),
            ("MENUS", &nav_menus()),
            ("PHONE", COMPANY_PHONE_INTL),
            ("TEL", &tel_href(COMPANY_PHONE_INTL)),
        ],
    ));
    html.push_str(main);
    html.push_str(&fill(
        FOOTER,
        &[
            ("COMPANY", &company),
            ("BLURB", COMPANY_BLURB),
            ("PHONE", COMPANY_PHONE),
            ("EMAIL", COMPANY_EMAIL),
            ("ADDRESS", &COMPANY_ADDRESS.join("<br/>")),
            ("HOURS", &BUSINESS_HOURS.join("<br/>")),
            ("YEAR", &ctx.year.to_string()),
        ],
    ));
    html.push_str(&ctx.overlay.render());
    html.push_str("</body></html>\n");
    html
}

/// Digits of a phone number with a leading `+`, for `tel:` links.
pub(crate) fn tel_href(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("tel:+{digits}")
}

fn nav_menus() -> String {
    let mut out = String::new();
    for menu in NAV_MENUS {
        let _ = write!(
            out,
            r#"<div class="nav-menu"><button type="button" class="nav-menu-title">{}</button><ul class="nav-dropdown">"#,
            menu.title
        );
        for (label, href) in menu.items {
            let _ = write!(out, r#"<li><a href="{href}">{label}</a></li>"#);
        }
        out.push_str("</ul></div>");
    }
    out
}

// ── Templates ────────────────────────────────────────────────────────

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{{TITLE}}</title>
<meta name="description" content="{{DESCRIPTION}}"/>
<link rel="preconnect" href="https://fonts.googleapis.com"/>
<link href="https://fonts.googleapis.com/css2?family=Roboto:wght@400;500;700;900&display=swap" rel="stylesheet"/>
<link rel="stylesheet" href="{{STYLESHEET}}"/>
</head>
<body>
"##;

const TOP_BAR: &str = r##"<div class="top-bar"><div class="container top-bar-inner">
<div class="top-bar-left"><button type="button" class="top-bar-language">English</button></div>
<div class="top-bar-right">{{PITCH}} <span class="top-bar-highlight">{{CALL_TO_ACTION}}</span></div>
</div></div>
"##;

const HEADER: &str = r##"<header class="site-header"><div class="container header-inner">
<a class="brand" href="/"><span class="brand-name">{{COMPANY}}</span><span class="brand-tagline">{{TAGLINE}}</span></a>
<nav class="nav">{{MENUS}}<a class="nav-link" href="/service-areas/">Service Area</a></nav>
<div class="header-contact">
<div class="header-phone"><span class="header-phone-label">Call Us on Expert</span><a href="{{TEL}}">{{PHONE}}</a></div>
<a class="btn btn-primary" href="/?call=open">REQUEST A CALL</a>
</div>
</div></header>
"##;

const FOOTER: &str = r##"<footer class="site-footer"><div class="container footer-grid">
<div class="footer-about"><h3>{{COMPANY}}</h3><p>{{BLURB}}</p></div>
<div class="footer-contact"><h3>Contact Us</h3>
<ul>
<li class="footer-phone">{{PHONE}}</li>
<li class="footer-email">{{EMAIL}}</li>
<li class="footer-address">{{ADDRESS}}</li>
</ul>
<h3>Business Hours</h3><p>{{HOURS}}</p>
</div>
</div>
<div class="footer-bottom"><div class="container">&copy; {{YEAR}} {{COMPANY}}. All rights reserved.</div></div>
</footer>
"##;
