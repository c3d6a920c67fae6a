//! Core library for Backhoe.
//!
//! Contains the static site content, the TopoJSON decoder, the Albers USA
//! projection, the choropleth map renderer with its hover and viewport state,
//! the lead-capture state machines and mail composition, the service-area
//! directory, and the HTML renderers for every page. This crate depends on
//! `backhoe-mail` for the transport trait and knows nothing about HTTP.

pub mod content;
pub mod error;
pub mod geometry;
pub mod hover;
pub mod html;
pub mod lead;
pub mod map;
pub mod projection;
pub mod service_areas;
pub mod site;
pub mod topology;
pub mod viewport;
