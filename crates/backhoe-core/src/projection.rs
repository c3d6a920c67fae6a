//! Albers USA composite projection.
//!
//! A conic equal-area projection for the lower 48 states with Alaska and
//! Hawaii drawn as scaled insets in the lower-left corner. Each inset has its
//! own clip box; a point is projected by the first inset whose box contains
//! it. Geometry is clipped against every inset box and the surviving pieces
//! are concatenated.
//!
//! The constants match the widely used d3 `geoAlbersUsa`, so a map fitted here
//! lines up with maps drawn from the same atlas elsewhere.

use std::f64::consts::{PI, TAU};

use geo::{BoundingRect, Intersects, MapCoords};

use crate::geometry::{self, Coord, LineString, MultiPolygon, Rect};

const EPSILON: f64 = 1e-6;
const DEFAULT_SCALE: f64 = 1070.0;
const DEFAULT_TRANSLATE: [f64; 2] = [480.0, 250.0];

/// Scale used while measuring bounds in [`AlbersUsa::fit_size`].
const MEASURE_SCALE: f64 = 150.0;

/// Raw conic equal-area projection for a pair of standard parallels, in radians.
#[derive(Debug, Clone, Copy)]
struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
    /// `cos(phi0)`, used when the parallels are symmetric about the equator.
    cylindrical: Option<f64>,
}

impl ConicEqualArea {
    fn new(phi0: f64, phi1: f64) -> Self {
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Self {
                n,
                c: 0.0,
                r0: 0.0,
                cylindrical: Some(phi0.cos()),
            };
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Self {
            n,
            c,
            r0: c.sqrt() / n,
            cylindrical: None,
        }
    }

    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        if let Some(cos_phi0) = self.cylindrical {
            return [lambda * cos_phi0, phi.sin() / cos_phi0];
        }
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let x = lambda * self.n;
        [r * x.sin(), self.r0 - r * x.cos()]
    }
}

/// One conic projection with rotation, centering, scale and translation.
#[derive(Debug, Clone, Copy)]
struct Conic {
    raw: ConicEqualArea,
    /// Longitude rotation, radians.
    rotate: f64,
    /// Raw-projected center point.
    center: [f64; 2],
    scale: f64,
    translate: [f64; 2],
}

impl Conic {
    /// Build from degrees: `rotate` is added to every longitude.
    fn new(parallels: [f64; 2], rotate: f64, center: [f64; 2]) -> Self {
        let raw = ConicEqualArea::new(parallels[0].to_radians(), parallels[1].to_radians());
        Self {
            raw,
            rotate: rotate.to_radians(),
            center: raw.project(center[0].to_radians(), center[1].to_radians()),
            scale: DEFAULT_SCALE,
            translate: DEFAULT_TRANSLATE,
        }
    }

    fn project(&self, [lon, lat]: [f64; 2]) -> [f64; 2] {
        let mut lambda = lon.to_radians() + self.rotate;
        if lambda.abs() > PI {
            lambda -= (lambda / TAU).round() * TAU;
        }
        let [px, py] = self.raw.project(lambda, lat.to_radians());
        let k = self.scale;
        [
            self.translate[0] - k * self.center[0] + k * px,
            self.translate[1] + k * self.center[1] - k * py,
        ]
    }
}

/// A conic projection plus the screen rectangle it may draw into.
#[derive(Debug, Clone, Copy)]
struct Inset {
    conic: Conic,
    clip: Rect,
}

impl Inset {
    fn project_point(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let q = self.conic.project(p);
        (q[0].is_finite() && q[1].is_finite() && self.clip.intersects(&Coord::from(q))).then_some(q)
    }

    fn project_coord(&self, c: Coord) -> Coord {
        Coord::from(self.conic.project([c.x, c.y]))
    }
}

/// The composite projection: lower 48, Alaska, Hawaii.
///
/// # Examples
///
/// ```
/// use backhoe_core::projection::AlbersUsa;
///
/// let projection = AlbersUsa::new();
/// let [x, y] = projection.project([-96.6, 38.7]).unwrap();
/// assert!((x - 480.0).abs() < 1e-9 && (y - 250.0).abs() < 1e-9);
/// assert!(projection.project([-0.1276, 51.5072]).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AlbersUsa {
    scale: f64,
    translate: [f64; 2],
    insets: [Inset; 3],
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new()
    }
}

impl AlbersUsa {
    /// Projection at the default scale (1070) and translation (480, 250).
    #[must_use]
    pub fn new() -> Self {
        let mut projection = Self {
            scale: DEFAULT_SCALE,
            translate: DEFAULT_TRANSLATE,
            insets: [Inset {
                conic: Conic::new([29.5, 45.5], 96.0, [-0.6, 38.7]),
                clip: Rect::new([0.0, 0.0], [0.0, 0.0]),
            }; 3],
        };
        projection.insets[1].conic = Conic::new([55.0, 65.0], 154.0, [-2.0, 58.5]);
        projection.insets[2].conic = Conic::new([8.0, 18.0], 157.0, [-3.0, 19.9]);
        projection.layout();
        projection
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    /// Set scale and translation together and recompute the insets.
    pub fn set_transform(&mut self, scale: f64, translate: [f64; 2]) {
        self.scale = scale;
        self.translate = translate;
        self.layout();
    }

    fn layout(&mut self) {
        let k = self.scale;
        let [x, y] = self.translate;
        let [lower48, alaska, hawaii] = &mut self.insets;

        lower48.conic.scale = k;
        lower48.conic.translate = [x, y];
        lower48.clip = Rect::new([x - 0.455 * k, y - 0.238 * k], [x + 0.455 * k, y + 0.238 * k]);

        alaska.conic.scale = k * 0.35;
        alaska.conic.translate = [x - 0.307 * k, y + 0.201 * k];
        alaska.clip = Rect::new(
            [x - 0.425 * k + EPSILON, y + 0.120 * k + EPSILON],
            [x - 0.214 * k - EPSILON, y + 0.234 * k - EPSILON],
        );

        hawaii.conic.scale = k;
        hawaii.conic.translate = [x - 0.205 * k, y + 0.212 * k];
        hawaii.clip = Rect::new(
            [x - 0.214 * k + EPSILON, y + 0.166 * k + EPSILON],
            [x - 0.115 * k - EPSILON, y + 0.234 * k - EPSILON],
        );
    }

    /// Project `[lon, lat]` in degrees to pixels.
    ///
    /// Returns `None` when the point falls outside all three inset boxes,
    /// which is the normal result for anywhere outside the United States.
    #[must_use]
    pub fn project(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        self.insets.iter().find_map(|inset| inset.project_point(point))
    }

    /// Project a polygon set through every inset and clip it to that inset's
    /// box.
    ///
    /// Polygons that fall outside a box are dropped for that inset, so each
    /// source polygon normally survives in exactly one inset.
    #[must_use]
    pub fn project_polygons(&self, polygons: &MultiPolygon) -> MultiPolygon {
        let mut out = Vec::new();
        for inset in &self.insets {
            for polygon in polygons {
                let projected = polygon.map_coords(|c| inset.project_coord(c));
                out.extend(geometry::clip_polygon(&projected, &inset.clip));
            }
        }
        MultiPolygon::new(out)
    }

    /// Project polylines, splitting them where they leave an inset box.
    #[must_use]
    pub fn project_lines(&self, lines: &[LineString]) -> Vec<LineString> {
        let mut out = Vec::new();
        for inset in &self.insets {
            for line in lines {
                let projected = line.map_coords(|c| inset.project_coord(c));
                out.extend(geometry::clip_line(&projected, &inset.clip));
            }
        }
        out
    }

    /// Pixel bounds of the clipped, projected polygons.
    #[must_use]
    pub fn bounds(&self, polygons: &MultiPolygon) -> Option<Rect> {
        self.project_polygons(polygons).bounding_rect()
    }

    /// Scale and translate so `polygons` fill a `width × height` box, centered.
    ///
    /// Leaves the projection untouched when the polygons project to nothing
    /// or to a degenerate box.
    pub fn fit_size(&mut self, width: f64, height: f64, polygons: &MultiPolygon) {
        let (old_scale, old_translate) = (self.scale, self.translate);
        self.set_transform(MEASURE_SCALE, [0.0, 0.0]);

        let fitted = self.bounds(polygons).and_then(|b| {
            let k = (width / b.width()).min(height / b.height());
            (k.is_finite() && k > 0.0).then(|| {
                let x = (width - k * (b.max().x + b.min().x)) / 2.0;
                let y = (height - k * (b.max().y + b.min().y)) / 2.0;
                (MEASURE_SCALE * k, [x, y])
            })
        });

        match fitted {
            Some((scale, translate)) => self.set_transform(scale, translate),
            None => self.set_transform(old_scale, old_translate),
        }
    }
}
