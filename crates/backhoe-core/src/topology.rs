//! TopoJSON decoding.
//!
//! A topology stores each shared boundary once as an *arc*; polygons refer to
//! arcs by index, with `~i` (a negative index) meaning arc `i` reversed.
//! Quantized topologies delta-encode arc positions as integers and carry a
//! `transform` to map them back to longitude/latitude.
//!
//! This module decodes the polygons of one named object into features, and
//! builds the interior-border mesh: every arc shared by two different
//! geometries, drawn once.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::content;
use crate::error::TopologyError;
use crate::geometry::{LineString, MultiPolygon, Polygon};

/// Object name holding the state polygons in the us-atlas files.
pub const STATES_OBJECT: &str = "states";

/// Public us-atlas topology with state boundaries at 1:10m.
pub const DEFAULT_TOPOLOGY_URL: &str = "https://cdn.jsdelivr.net/npm/us-atlas@3/states-10m.json";

/// Top-level TopoJSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: HashMap<String, TopoGeometry>,
}

/// Quantization transform.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// A geometry object. Only the members needed for polygons are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct TopoGeometry {
    /// `null` for features without geometry.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub arcs: Option<ArcRefs>,
    #[serde(default)]
    pub geometries: Vec<TopoGeometry>,
}

/// Arc index arrays, nested to the depth the geometry type needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArcRefs {
    /// `MultiPolygon`: polygons of rings of arcs.
    Polygons(Vec<Vec<Vec<i64>>>),
    /// `Polygon` or `MultiLineString`: rings or lines of arcs.
    Rings(Vec<Vec<i64>>),
    /// `LineString`.
    Line(Vec<i64>),
}

/// A decoded polygon feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    /// `properties.name`, if present.
    pub name: Option<String>,
    /// Polygons in longitude/latitude degrees.
    pub polygons: MultiPolygon,
}

/// One state as drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFeature {
    /// Name as it appears in the topology.
    pub name: String,
    /// Postal abbreviation, when the name is a known state.
    pub abbreviation: Option<&'static str>,
    pub polygons: MultiPolygon,
}

impl StateFeature {
    /// Fill color for this state.
    #[must_use]
    pub fn fill(&self) -> &'static str {
        content::fill_for_state(&self.name)
    }
}

/// Everything the map renderer needs from the topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateAtlas {
    pub states: Vec<StateFeature>,
    /// Interior borders, one polyline per shared arc.
    pub borders: Vec<LineString>,
}

impl StateAtlas {
    /// All state polygons as one set, for fitting the projection.
    #[must_use]
    pub fn outline(&self) -> MultiPolygon {
        MultiPolygon::new(
            self.states
                .iter()
                .flat_map(|s| s.polygons.iter().cloned())
                .collect(),
        )
    }

    /// The state with this abbreviation.
    #[must_use]
    pub fn state(&self, abbreviation: &str) -> Option<&StateFeature> {
        self.states
            .iter()
            .find(|s| s.abbreviation == Some(abbreviation))
    }
}

impl Topology {
    /// Parse a TopoJSON document.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Decode`] if the bytes are not a topology.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let topology: Self = serde_json::from_slice(bytes).map_err(|e| TopologyError::Decode {
            reason: e.to_string(),
        })?;
        if topology.kind != "Topology" {
            return Err(TopologyError::Decode {
                reason: format!("expected type 'Topology', found '{}'", topology.kind),
            });
        }
        Ok(topology)
    }

    fn object(&self, name: &str) -> Result<&TopoGeometry, TopologyError> {
        self.objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject {
                name: name.to_owned(),
            })
    }

    /// Decode arc `index`, reversed when negative.
    fn arc(&self, index: i64) -> Result<Vec<[f64; 2]>, TopologyError> {
        let (slot, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(TopologyError::InvalidArc {
                index,
                count: self.arcs.len(),
            })?;

        let mut points = Vec::with_capacity(arc.len());
        let (mut x, mut y) = (0.0, 0.0);
        for position in arc {
            let [px, py] = match position.as_slice() {
                [px, py, ..] => [*px, *py],
                _ => {
                    return Err(TopologyError::Decode {
                        reason: format!("arc {slot} has a position with fewer than two values"),
                    });
                }
            };
            points.push(match &self.transform {
                Some(t) => {
                    x += px;
                    y += py;
                    [x.mul_add(t.scale[0], t.translate[0]), y.mul_add(t.scale[1], t.translate[1])]
                }
                None => [px, py],
            });
        }
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Join arcs end to end, dropping the repeated junction point.
    fn line(&self, indices: &[i64]) -> Result<Vec<[f64; 2]>, TopologyError> {
        let mut points = Vec::new();
        for &index in indices {
            points.pop();
            points.extend(self.arc(index)?);
        }
        if points.len() == 1 {
            points.push(points[0]);
        }
        Ok(points)
    }

    fn ring(&self, indices: &[i64]) -> Result<LineString, TopologyError> {
        let mut points = self.line(indices)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(LineString::from(points))
    }

    /// `None` when the exterior ring has no points. Empty holes are dropped.
    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Option<Polygon>, TopologyError> {
        let rings: Vec<LineString> = rings.iter().map(|r| self.ring(r)).collect::<Result<_, _>>()?;
        let mut rings = rings.into_iter();
        Ok(match rings.next() {
            Some(exterior) if !exterior.0.is_empty() => Some(Polygon::new(
                exterior,
                rings.filter(|ring| !ring.0.is_empty()).collect(),
            )),
            _ => None,
        })
    }

    fn polygons_of(&self, geometry: &TopoGeometry) -> Result<MultiPolygon, TopologyError> {
        let polygons = match (geometry.kind.as_deref(), &geometry.arcs) {
            (Some("Polygon"), Some(ArcRefs::Rings(rings))) => vec![self.polygon(rings)?],
            (Some("MultiPolygon"), Some(ArcRefs::Polygons(polygons))) => polygons
                .iter()
                .map(|p| self.polygon(p))
                .collect::<Result<_, _>>()?,
            // `[]` and `[[]]` hold no arc indices, so their depth is unknown.
            (Some("Polygon" | "MultiPolygon"), Some(ArcRefs::Polygons(p)))
                if p.iter().all(Vec::is_empty) =>
            {
                Vec::new()
            }
            (Some(kind @ ("Polygon" | "MultiPolygon")), Some(_)) => {
                return Err(TopologyError::Decode {
                    reason: format!("{kind} has arcs nested to the wrong depth"),
                });
            }
            _ => Vec::new(),
        };
        Ok(MultiPolygon::new(polygons.into_iter().flatten().collect()))
    }

    /// Decode the polygon features of object `name`.
    ///
    /// A `GeometryCollection` yields one feature per member (nested
    /// collections are flattened); any other geometry yields itself. Members
    /// without polygons, or whose rings are all empty, produce features with
    /// no polygons.
    ///
    /// # Errors
    ///
    /// [`TopologyError::MissingObject`] if there is no such object, or a
    /// decode error for a malformed geometry.
    pub fn features(&self, name: &str) -> Result<Vec<Feature>, TopologyError> {
        let mut leaves = Vec::new();
        collect_leaves(self.object(name)?, &mut leaves);

        leaves
            .into_iter()
            .map(|g| {
                Ok(Feature {
                    id: g.id.as_ref().map(|id| match id {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    }),
                    name: g
                        .properties
                        .as_ref()
                        .and_then(|p| p.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    polygons: self.polygons_of(g)?,
                })
            })
            .collect()
    }

    /// Arcs of object `name` shared by two different geometries.
    ///
    /// Coastlines and outer boundaries belong to a single geometry and are
    /// left out. Each shared arc is returned once, in arc order.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::features`].
    pub fn interior_mesh(&self, name: &str) -> Result<Vec<LineString>, TopologyError> {
        let mut leaves = Vec::new();
        collect_leaves(self.object(name)?, &mut leaves);

        // arc slot -> (first reference, first geometry, last geometry)
        let mut refs: HashMap<usize, (i64, usize, usize)> = HashMap::new();
        for (geometry_index, leaf) in leaves.iter().enumerate() {
            let mut record = |index: i64| {
                let slot = if index < 0 { !index } else { index };
                if let Ok(slot) = usize::try_from(slot) {
                    refs.entry(slot)
                        .and_modify(|e| e.2 = geometry_index)
                        .or_insert((index, geometry_index, geometry_index));
                }
            };
            match &leaf.arcs {
                Some(ArcRefs::Polygons(polygons)) => {
                    polygons.iter().flatten().flatten().for_each(|&i| record(i));
                }
                Some(ArcRefs::Rings(rings)) => rings.iter().flatten().for_each(|&i| record(i)),
                Some(ArcRefs::Line(line)) => line.iter().for_each(|&i| record(i)),
                None => {}
            }
        }

        let mut shared: Vec<(usize, i64)> = refs
            .into_iter()
            .filter(|(_, (_, first, last))| first != last)
            .map(|(slot, (index, _, _))| (slot, index))
            .collect();
        shared.sort_unstable_by_key(|(slot, _)| *slot);

        shared
            .into_iter()
            .map(|(_, index)| self.arc(index).map(LineString::from))
            .collect()
    }

    /// Decode the state atlas from object `name`.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::features`].
    pub fn atlas(&self, name: &str) -> Result<StateAtlas, TopologyError> {
        let states: Vec<StateFeature> = self
            .features(name)?
            .into_iter()
            .map(|f| {
                let name = f.name.or(f.id).unwrap_or_default();
                StateFeature {
                    abbreviation: content::abbreviation_for(&name),
                    name,
                    polygons: f.polygons,
                }
            })
            .collect();
        let borders = self.interior_mesh(name)?;

        debug!(
            states = states.len(),
            borders = borders.len(),
            "decoded state atlas"
        );
        Ok(StateAtlas { states, borders })
    }
}

fn collect_leaves<'a>(geometry: &'a TopoGeometry, out: &mut Vec<&'a TopoGeometry>) {
    if geometry.kind.as_deref() == Some("GeometryCollection") {
        for member in &geometry.geometries {
            collect_leaves(member, out);
        }
    } else {
        out.push(geometry);
    }
}

/// Fetch and decode the state atlas over HTTP.
///
/// One request, no retry.
///
/// # Errors
///
/// [`TopologyError::Fetch`] for transport or HTTP status failures, otherwise
/// the decode errors of [`Topology::atlas`].
pub async fn fetch_atlas(client: &reqwest::Client, url: &str) -> Result<StateAtlas, TopologyError> {
    let fetch_err = |reason: String| TopologyError::Fetch {
        url: url.to_owned(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_err(format!("server returned {status}")));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;

    info!(url, bytes = body.len(), "fetched topology");
    Topology::from_slice(&body)?.atlas(STATES_OBJECT)
}

/// Read and decode the state atlas from a local file.
///
/// # Errors
///
/// [`TopologyError::Read`] if the file cannot be read, otherwise the decode
/// errors of [`Topology::atlas`].
pub async fn read_atlas(path: &Path) -> Result<StateAtlas, TopologyError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| TopologyError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Topology::from_slice(&body)?.atlas(STATES_OBJECT)
}

/// Where the state atlas comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologySource {
    Url(String),
    File(PathBuf),
}

impl Default for TopologySource {
    fn default() -> Self {
        Self::Url(DEFAULT_TOPOLOGY_URL.to_owned())
    }
}

impl fmt::Display for TopologySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl TopologySource {
    /// Load the atlas once from this source.
    ///
    /// # Errors
    ///
    /// As [`fetch_atlas`] or [`read_atlas`].
    pub async fn load(&self, client: &reqwest::Client) -> Result<StateAtlas, TopologyError> {
        match self {
            Self::Url(url) => fetch_atlas(client, url).await,
            Self::File(path) => read_atlas(path).await,
        }
    }
}
