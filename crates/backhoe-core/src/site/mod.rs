//! HTML page renderers.
//!
//! Pages are assembled from `const` templates with `{{PLACEHOLDER}}`
//! markers, filled in one pass by [`crate::html::fill`]. Every value that
//! comes from a visitor or a data file is passed through
//! [`crate::html::escape`] before it is substituted.

pub mod home;
pub mod layout;
pub mod modal;
pub mod service_areas;

use crate::lead::{CallModal, LeadModal};

pub use home::render_home;
pub use layout::{PageContext, render_page};
pub use modal::{render_call_modal, render_lead_modal};
pub use service_areas::{render_directory, render_state};

/// The site stylesheet, served at [`STYLESHEET_PATH`].
pub const STYLESHEET: &str = include_str!("../../assets/site.css");

pub const STYLESHEET_PATH: &str = "/static/site.css";

/// A dialog drawn over the page.
#[derive(Debug, Clone, Copy, Default)]
pub enum Overlay<'a> {
    #[default]
    None,
    Rental(&'a LeadModal),
    Call(&'a CallModal),
}

impl Overlay<'_> {
    pub(crate) fn render(self) -> String {
        match self {
            Self::None => String::new(),
            Self::Rental(modal) => render_lead_modal(modal),
            Self::Call(modal) => render_call_modal(modal),
        }
    }
}
