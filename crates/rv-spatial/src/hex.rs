//! Lazily materialised hexagonal grid on a sphere.
//!
//! # Layout
//!
//! The grid is anchored at a start point and its primary axis points along
//! the initial bearing to the target.  Cells use axial coordinates; the six
//! directions are fixed angular offsets from each node's **local** bearing:
//!
//! ```text
//!   offset   0°  →  ( 0, -1)      (primary axis, toward the target)
//!   offset  60°  →  ( 1, -1)
//!   offset 120°  →  ( 1,  0)
//!   offset 180°  →  ( 0,  1)
//!   offset 240°  →  (-1,  1)
//!   offset 300°  →  (-1,  0)
//! ```
//!
//! Every node stores the bearing of the primary axis *at that node*, corrected
//! with the final bearing of the great circle that produced it, so the grid
//! follows the curvature of the body instead of a flat projection.
//!
//! # Storage
//!
//! Nodes live in an arena (`Vec<HexNode>`, indexed by [`HexId`]) and a hash
//! map resolves `GridCell → HexId`.  Nodes are immutable once created.
//!
//! # Determinism
//!
//! A cell is always projected from the same *canonical parent*: step along
//! the x axis toward 0 first, then along the primary axis toward the origin.
//! Its coordinates therefore depend only on `(x, y)` and never on the order in
//! which the search happened to expand cells.

use rustc_hash::FxHashMap;

use rv_core::geo::normalize_bearing;
use rv_core::{terrain_height, Body, GeoPoint, HexId};

// ── Grid coordinates ──────────────────────────────────────────────────────────

/// Axial coordinates of a hex cell relative to the grid origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const ORIGIN: GridCell = GridCell { x: 0, y: 0 };

    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One cell further along the primary axis (toward the target).
    #[inline]
    pub fn forward(self) -> GridCell {
        self.offset(DIRECTIONS[0])
    }

    /// One cell back along the primary axis.
    #[inline]
    pub fn backward(self) -> GridCell {
        self.offset(DIRECTIONS[3])
    }

    #[inline]
    fn offset(self, d: Direction) -> GridCell {
        GridCell::new(self.x + d.dx, self.y + d.dy)
    }

    /// The cell this one is projected from, and the direction of that step.
    /// `None` for the origin.
    fn canonical_parent(self) -> Option<(GridCell, Direction)> {
        if self.x > 0 {
            Some((GridCell::new(self.x - 1, self.y), DIRECTIONS[2]))
        } else if self.x < 0 {
            Some((GridCell::new(self.x + 1, self.y), DIRECTIONS[5]))
        } else if self.y < 0 {
            Some((GridCell::new(0, self.y + 1), DIRECTIONS[0]))
        } else if self.y > 0 {
            Some((GridCell::new(0, self.y - 1), DIRECTIONS[3]))
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Direction {
    offset_deg: f64,
    dx:         i32,
    dy:         i32,
}

const DIRECTIONS: [Direction; 6] = [
    Direction { offset_deg: 0.0,   dx: 0,  dy: -1 },
    Direction { offset_deg: 60.0,  dx: 1,  dy: -1 },
    Direction { offset_deg: 120.0, dx: 1,  dy: 0 },
    Direction { offset_deg: 180.0, dx: 0,  dy: 1 },
    Direction { offset_deg: 240.0, dx: -1, dy: 1 },
    Direction { offset_deg: 300.0, dx: -1, dy: 0 },
];

// ── HexNode ───────────────────────────────────────────────────────────────────

/// One materialised grid sample.  Frozen at creation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HexNode {
    pub cell:        GridCell,
    pub point:       GeoPoint,
    /// Terrain height sampled when the node was created.
    pub elevation_m: f64,
    /// Bearing of the primary axis at this node, degrees in `[0, 360)`.
    pub bearing:     f64,
}

/// Whether [`HexGraph::neighbors`] applies the terrain filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Passability {
    /// Return all six neighbours (used by the straight-line probe).
    Unfiltered,
    /// Drop submerged neighbours and those beyond the slope limit.
    Filtered,
}

// ── HexGraph ──────────────────────────────────────────────────────────────────

/// Arena-backed hex grid owned by one planning request.
pub struct HexGraph<'b> {
    body:   &'b dyn Body,
    step_m: f64,
    nodes:  Vec<HexNode>,
    index:  FxHashMap<GridCell, HexId>,
}

impl<'b> HexGraph<'b> {
    /// Create a grid with its origin node at `origin`, primary axis along
    /// `bearing_deg`, and edge length `step_m`.
    pub fn new(body: &'b dyn Body, origin: GeoPoint, bearing_deg: f64, step_m: f64) -> Self {
        let root = HexNode {
            cell:        GridCell::ORIGIN,
            point:       origin,
            elevation_m: terrain_height(origin, body),
            bearing:     normalize_bearing(bearing_deg),
        };
        let mut index = FxHashMap::default();
        index.insert(GridCell::ORIGIN, HexId(0));
        Self { body, step_m, nodes: vec![root], index }
    }

    /// The origin node, always `HexId(0)`.
    #[inline]
    pub fn origin(&self) -> HexId {
        HexId(0)
    }

    #[inline]
    pub fn node(&self, id: HexId) -> &HexNode {
        &self.nodes[id.index()]
    }

    /// Look up a cell without materialising it.
    #[inline]
    pub fn get(&self, cell: GridCell) -> Option<HexId> {
        self.index.get(&cell).copied()
    }

    /// Number of materialised nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    /// Return the node for `cell`, creating it (and any missing canonical
    /// ancestors) on first access.
    pub fn materialize(&mut self, cell: GridCell) -> HexId {
        if let Some(id) = self.get(cell) {
            return id;
        }

        // Walk toward the origin until an existing ancestor is found, then
        // create the missing chain outward.
        let mut pending = Vec::new();
        let mut cur = cell;
        let mut anchor = self.origin();
        while let Some((parent, dir)) = cur.canonical_parent() {
            pending.push((cur, dir));
            if let Some(id) = self.get(parent) {
                anchor = id;
                break;
            }
            cur = parent;
        }

        let mut last = anchor;
        while let Some((child, dir)) = pending.pop() {
            last = self.project(last, child, dir);
        }
        last
    }

    /// The neighbours of `id`, generated on demand.
    ///
    /// With [`Passability::Filtered`], neighbours below sea level (on a body
    /// with an ocean) or whose elevation differs from `id` by half a step or
    /// more are dropped.
    pub fn neighbors(&mut self, id: HexId, passability: Passability) -> Vec<HexId> {
        let here = *self.node(id);
        let limit = self.step_m / 2.0;
        let ocean = self.body.has_ocean();

        let mut out = Vec::with_capacity(DIRECTIONS.len());
        for dir in DIRECTIONS {
            let n = self.materialize(here.cell.offset(dir));
            if passability == Passability::Filtered {
                let node = self.node(n);
                if ocean && node.elevation_m < 0.0 {
                    continue;
                }
                let climb = node.elevation_m - here.elevation_m;
                if climb >= limit || climb <= -limit {
                    continue;
                }
            }
            out.push(n);
        }
        out
    }

    fn project(&mut self, parent: HexId, cell: GridCell, dir: Direction) -> HexId {
        let from = *self.node(parent);
        let point = from
            .point
            .destination(from.bearing + dir.offset_deg, self.step_m, self.body.radius_m());
        let bearing = normalize_bearing(from.point.final_bearing(point) - dir.offset_deg);

        let id = HexId(self.nodes.len() as u32);
        self.nodes.push(HexNode {
            cell,
            point,
            elevation_m: terrain_height(point, self.body),
            bearing,
        });
        self.index.insert(cell, id);
        id
    }
}
