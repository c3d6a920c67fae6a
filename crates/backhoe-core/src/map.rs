//! Choropleth map of the United States, rendered to SVG.
//!
//! [`MapRenderer`] fits an [`AlbersUsa`] projection to the atlas for a given
//! width, fills each state by the color table, draws the interior border
//! mesh, links the serviced locations in a closed loop, and places a labeled
//! marker on each location. Each marker links to `/?active=<id>`, so the
//! hover state is reachable from a plain page. [`MapView`] mounts a renderer on a [`Viewport`]
//! so resize events refit it in place.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use geo::{Contains, Point};
use tracing::debug;

use crate::content::Location;
use crate::geometry::{Coord, LineString, MultiPolygon};
use crate::hover::HoverController;
use crate::html::escape;
use crate::projection::AlbersUsa;
use crate::topology::StateAtlas;
use crate::viewport::{ResizeListener, Viewport};

/// Tallest the map is ever drawn.
pub const MAX_HEIGHT: f64 = 550.0;

/// Height for a given width: 60% of the width, capped at [`MAX_HEIGHT`].
#[must_use]
pub fn map_height(width: u32) -> f64 {
    (f64::from(width) * 0.6).min(MAX_HEIGHT)
}

/// A filled state outline in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePath {
    pub name: String,
    pub abbreviation: Option<&'static str>,
    pub fill: &'static str,
    /// Projected, clipped rings.
    pub polygons: MultiPolygon,
}

/// A dashed segment between two consecutive locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: &'static str,
    pub to: &'static str,
    pub start: [f64; 2],
    pub end: [f64; 2],
}

/// A location marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: Location,
    /// Pixel position; `[0, 0]` when the location does not project.
    pub position: [f64; 2],
    /// False when the location does not project or lands off the canvas.
    pub visible: bool,
}

/// Stroke styling for connection lines.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ConnectionStyle {
    stroke: &'static str,
    width: f64,
    dasharray: &'static str,
    opacity: f64,
    animated: bool,
}

const INITIAL_CONNECTIONS: ConnectionStyle = ConnectionStyle {
    stroke: "#FFA726",
    width: 2.0,
    dasharray: "5,3",
    opacity: 0.8,
    animated: true,
};

/// Lines rebuilt after a resize are thinner and appear without a fade.
const RESIZED_CONNECTIONS: ConnectionStyle = ConnectionStyle {
    stroke: "#FF9800",
    width: 1.5,
    dasharray: "3,3",
    opacity: 0.7,
    animated: false,
};

/// Projects and draws the atlas at one width.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    atlas: Arc<StateAtlas>,
    outline: MultiPolygon,
    locations: Vec<Location>,
    projection: AlbersUsa,
    width: u32,
    height: f64,
    states: Vec<StatePath>,
    borders: Vec<LineString>,
    connections: Vec<Connection>,
    connection_style: ConnectionStyle,
    markers: Vec<Marker>,
}

impl MapRenderer {
    /// Fit the projection to `width` and draw everything.
    #[must_use]
    pub fn new(atlas: Arc<StateAtlas>, locations: Vec<Location>, width: u32) -> Self {
        let outline = atlas.outline();
        let markers = locations
            .iter()
            .map(|&location| Marker {
                location,
                position: [0.0, 0.0],
                visible: false,
            })
            .collect();

        let mut renderer = Self {
            atlas,
            outline,
            locations,
            projection: AlbersUsa::new(),
            width,
            height: map_height(width),
            states: Vec::new(),
            borders: Vec::new(),
            connections: Vec::new(),
            connection_style: INITIAL_CONNECTIONS,
            markers,
        };
        renderer.fit(width);
        renderer.draw_shapes();
        renderer.draw_connections();
        renderer.place_markers();
        renderer
    }

    /// Refit to a new width.
    ///
    /// State paths and the border mesh are redrawn, connection lines are
    /// removed and rebuilt, and existing markers are moved to their new
    /// positions.
    pub fn resize(&mut self, width: u32) {
        self.fit(width);
        self.draw_shapes();
        self.connection_style = RESIZED_CONNECTIONS;
        self.draw_connections();
        self.place_markers();
        debug!(width, height = self.height, "map resized");
    }

    fn fit(&mut self, width: u32) {
        self.width = width;
        self.height = map_height(width);
        self.projection
            .fit_size(f64::from(width), self.height, &self.outline);
    }

    fn draw_shapes(&mut self) {
        self.states = self
            .atlas
            .states
            .iter()
            .map(|state| StatePath {
                name: state.name.clone(),
                abbreviation: state.abbreviation,
                fill: state.fill(),
                polygons: self.projection.project_polygons(&state.polygons),
            })
            .collect();
        self.borders = self.projection.project_lines(&self.atlas.borders);
    }

    fn draw_connections(&mut self) {
        self.connections.clear();
        let n = self.locations.len();
        for i in 0..n {
            let from = &self.locations[i];
            let to = &self.locations[(i + 1) % n];
            if let (Some(start), Some(end)) = (
                self.projection.project(from.coordinates),
                self.projection.project(to.coordinates),
            ) {
                self.connections.push(Connection {
                    from: from.id,
                    to: to.id,
                    start,
                    end,
                });
            }
        }
    }

    fn place_markers(&mut self) {
        let (width, height) = (f64::from(self.width), self.height);
        for marker in &mut self.markers {
            match self.projection.project(marker.location.coordinates) {
                Some(p) => {
                    marker.position = p;
                    marker.visible = (0.0..=width).contains(&p[0]) && (0.0..=height).contains(&p[1]);
                }
                None => {
                    marker.position = [0.0, 0.0];
                    marker.visible = false;
                }
            }
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn states(&self) -> &[StatePath] {
        &self.states
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The state drawn under pixel `point`.
    #[must_use]
    pub fn state_at(&self, point: [f64; 2]) -> Option<&StatePath> {
        let point = Point::from(point);
        self.states.iter().find(|s| s.polygons.contains(&point))
    }

    /// Hover state with the pointer on the marker for `id`.
    ///
    /// `None` when no visible marker has that id.
    #[must_use]
    pub fn hover(&self, id: &str) -> Option<HoverController> {
        let marker = self
            .markers
            .iter()
            .find(|m| m.visible && m.location.id == id)?;
        let mut hover = HoverController::new();
        hover.enter(&marker.location, marker.position);
        Some(hover)
    }

    /// Serialize the map as a standalone SVG document.
    ///
    /// With a hover controller, the active marker gets a pulse ring, its
    /// state is highlighted, and the tooltip is drawn on top.
    #[must_use]
    pub fn render_svg(&self, hover: Option<&HoverController>) -> String {
        let (w, h) = (self.width, num(self.height));
        let highlighted = hover.and_then(HoverController::highlighted_state);
        let active = hover.and_then(HoverController::active);

        let mut svg = String::with_capacity(64 * 1024);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="usa-map" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="max-width: 100%; height: auto;">"#
        );
        let _ = write!(
            svg,
            r##"<rect class="map-background" width="{w}" height="{h}" fill="#f0f4f8" rx="8" ry="8"/>"##
        );
        svg.push_str(FILTER_DEFS);

        svg.push_str(r#"<g class="states">"#);
        for (i, state) in self.states.iter().enumerate() {
            let class = if state.abbreviation.is_some() && state.abbreviation == highlighted {
                "state state-highlighted"
            } else {
                "state"
            };
            svg.push_str("<path class=\"");
            svg.push_str(class);
            svg.push('"');
            if let Some(abbr) = state.abbreviation {
                let _ = write!(svg, r#" id="state-{abbr}""#);
            }
            let _ = write!(
                svg,
                r##" data-name="{}" d="{}" fill="{}" stroke="#8c9cb1" stroke-width="0.8" style="animation-delay: {}ms"/>"##,
                escape(&state.name),
                polygon_path(&state.polygons),
                state.fill,
                300 + i * 10,
            );
        }
        let _ = write!(
            svg,
            r##"<path class="state-borders" d="{}" fill="none" stroke="#5a6987" stroke-width="1" stroke-linejoin="round" style="animation-delay: 600ms"/>"##,
            line_path(&self.borders)
        );
        svg.push_str("</g>");

        svg.push_str(r#"<g class="connections">"#);
        let style = self.connection_style;
        for (i, c) in self.connections.iter().enumerate() {
            let class = if style.animated { "connection" } else { "connection connection-static" };
            let _ = write!(
                svg,
                r#"<path class="{class}" data-from="{}" data-to="{}" d="M{},{} L{},{}" stroke="{}" stroke-width="{}" stroke-dasharray="{}" fill="none" opacity="{}""#,
                c.from,
                c.to,
                num(c.start[0]),
                num(c.start[1]),
                num(c.end[0]),
                num(c.end[1]),
                style.stroke,
                num(style.width),
                style.dasharray,
                num(style.opacity),
            );
            if style.animated {
                let _ = write!(svg, r#" style="animation-delay: {}ms""#, 1000 + i * 200);
            }
            svg.push_str("/>");
        }
        svg.push_str("</g>");

        let pulsing = hover.is_some_and(|h| h.pulse().is_some_and(|t| h.pulse_finished(t).is_some()));
        svg.push_str(r#"<g class="markers">"#);
        for (i, marker) in self.markers.iter().enumerate() {
            let is_active = active == Some(marker.location.id);
            render_marker(&mut svg, marker, i, is_active, is_active && pulsing);
        }
        svg.push_str("</g>");

        if let Some(tooltip) = hover.and_then(HoverController::tooltip) {
            let content = escape(&tooltip.content);
            let _ = write!(
                svg,
                r##"<g class="map-tooltip" transform="translate({}, {})"><rect x="0" y="-16" width="{}" height="24" rx="4" ry="4" fill="#333" opacity="0.9"/><text x="8" y="0" fill="#fff" font-size="12px">{content}</text></g>"##,
                num(tooltip.position[0]),
                num(tooltip.position[1]),
                tooltip.content.chars().count() * 7 + 16,
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Draw one marker inside a link to the home page with that marker active.
/// The active marker links back to the plain home page instead.
fn render_marker(svg: &mut String, marker: &Marker, index: usize, active: bool, pulse: bool) {
    let loc = &marker.location;
    let (class, href) = if active {
        ("marker marker-active", "/#map".to_owned())
    } else {
        ("marker", format!("/?active={}#map", loc.id))
    };
    let _ = write!(svg, r#"<a class="marker-link" href="{href}">"#);
    let _ = write!(
        svg,
        r#"<g class="{class}" data-location="{}" data-state="{}" transform="translate({}, {})" style="animation-delay: {}ms""#,
        loc.id,
        loc.state,
        num(marker.position[0]),
        num(marker.position[1]),
        1500 + index * 150,
    );
    if !marker.visible {
        svg.push_str(r#" visibility="hidden""#);
    }
    svg.push('>');

    if pulse {
        svg.push_str(PULSE_RING);
    }
    let _ = write!(
        svg,
        r##"<ellipse cx="0" cy="2" rx="12" ry="3" fill="rgba(0,0,0,0.2)" filter="url(#drop-shadow)"/><circle r="10" fill="white" filter="url(#glow)"/><circle r="8" fill="#FF9800" stroke="white" stroke-width="2"/><rect x="12" y="-14" width="{}" height="24" fill="white" rx="4" ry="4" opacity="0.9" stroke="#FF9800" stroke-width="1.5" filter="url(#drop-shadow)"/><text x="16" y="2" fill="#333" font-weight="bold" font-size="12px">{}, {}</text></g></a>"##,
        loc.name.chars().count() * 7 + 30,
        escape(loc.name),
        loc.state,
    );
}

/// Expanding ring on the active marker. Drawn only while its pulse may
/// re-trigger, and then repeats for the document lifetime.
const PULSE_RING: &str = r##"<circle class="marker-pulse" r="10" fill="none" stroke="#FF9800" stroke-width="2"><animate attributeName="r" from="10" to="30" dur="1.5s" repeatCount="indefinite"/><animate attributeName="opacity" from="1" to="0" dur="1.5s" repeatCount="indefinite"/></circle>"##;

const FILTER_DEFS: &str = concat!(
    "<defs>",
    r#"<filter id="state-shadow" height="130%"><feGaussianBlur in="SourceAlpha" stdDeviation="3" result="blur"/><feOffset in="blur" dx="2" dy="2" result="offsetBlur"/><feComponentTransfer in="offsetBlur" result="offsetBlur"><feFuncA type="linear" slope="0.3"/></feComponentTransfer><feMerge><feMergeNode in="offsetBlur"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
    r#"<filter id="drop-shadow" height="130%"><feGaussianBlur in="SourceAlpha" stdDeviation="2" result="blur"/><feOffset in="blur" dx="1" dy="1" result="offsetBlur"/><feComponentTransfer in="offsetBlur" result="offsetBlur"><feFuncA type="linear" slope="0.2"/></feComponentTransfer><feMerge><feMergeNode in="offsetBlur"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
    r#"<filter id="glow"><feGaussianBlur stdDeviation="3.5" result="blur"/><feComposite in="SourceGraphic" in2="blur" operator="over"/></filter>"#,
    "</defs>",
);

/// Spinner shown while the atlas has not loaded.
pub const LOADING_SPINNER: &str = r#"<svg class="map-spinner" width="48" height="48" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><circle opacity="0.25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" fill="none"/><path opacity="0.75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"><animateTransform attributeName="transform" type="rotate" from="0 12 12" to="360 12 12" dur="1s" repeatCount="indefinite"/></path></svg>"#;

/// A standalone SVG of the given width with the spinner centered.
#[must_use]
pub fn placeholder_svg(width: u32) -> String {
    let h = map_height(width);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" class="usa-map usa-map-loading" width="{width}" height="{hh}" viewBox="0 0 {width} {hh}"><rect width="{width}" height="{hh}" fill="#f0f4f8" rx="8" ry="8"/><g transform="translate({x}, {y})" color="#f97316">{LOADING_SPINNER}</g></svg>"##,
        hh = num(h),
        x = num(f64::from(width) / 2.0 - 24.0),
        y = num(h / 2.0 - 24.0),
    )
}

/// Format a coordinate with at most three decimals.
fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0 + 0.0;
    format!("{rounded}")
}

fn push_points(d: &mut String, points: &[Coord]) {
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        let _ = write!(d, "{},{}", num(p.x), num(p.y));
    }
}

fn polygon_path(polygons: &MultiPolygon) -> String {
    let mut d = String::new();
    for polygon in polygons {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let open = match ring.0.as_slice() {
                [first, .., last] if first == last => &ring.0[..ring.0.len() - 1],
                all => all,
            };
            push_points(&mut d, open);
            if !open.is_empty() {
                d.push('Z');
            }
        }
    }
    d
}

fn line_path(lines: &[LineString]) -> String {
    let mut d = String::new();
    for line in lines {
        push_points(&mut d, &line.0);
    }
    d
}

/// A renderer mounted on a viewport.
///
/// Every resize event refits the renderer. Dropping the view unregisters
/// its listener.
#[derive(Debug)]
pub struct MapView {
    renderer: Arc<Mutex<MapRenderer>>,
    resizes: Arc<AtomicUsize>,
    _listener: ResizeListener,
}

impl MapView {
    /// Draw at the viewport's current width and follow its resizes.
    #[must_use]
    pub fn mount(viewport: &Arc<Viewport>, atlas: Arc<StateAtlas>, locations: Vec<Location>) -> Self {
        let renderer = Arc::new(Mutex::new(MapRenderer::new(
            atlas,
            locations,
            viewport.width(),
        )));
        let resizes = Arc::new(AtomicUsize::new(0));

        let listener = {
            let renderer = Arc::clone(&renderer);
            let resizes = Arc::clone(&resizes);
            viewport.subscribe(move |width| {
                renderer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .resize(width);
                resizes.fetch_add(1, Ordering::SeqCst);
            })
        };

        Self {
            renderer,
            resizes,
            _listener: listener,
        }
    }

    /// How many resize events this view has handled.
    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }

    /// Run `f` against the current renderer.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&MapRenderer) -> R) -> R {
        f(&self.renderer.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn render_svg(&self, hover: Option<&HoverController>) -> String {
        self.with_renderer(|r| r.render_svg(hover))
    }
}
