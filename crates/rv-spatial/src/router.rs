//! Routing trait and default A* implementation over the lazy hex grid.
//!
//! # Pluggability
//!
//! `rv-transit` calls routing via the [`Router`] trait, so applications can
//! swap in a different planner without touching the transit core.  The
//! default [`AStarRouter`] builds a fresh [`PathFinder`] (and so a fresh
//! [`HexGraph`]) for every request; nothing is shared between requests.
//!
//! # Search
//!
//! 1. Requests shorter than one step need no grid: the route is the start
//!    point alone and the rover drives the direct segment.
//! 2. A straight probe along the primary axis anchors the goal to a concrete
//!    cell: the last cell short of the target distance.
//! 3. A* from the origin cell to that goal.  Every edge costs `step_m`; the
//!    heuristic is the great-circle distance to the literal target.
//!
//! # Cost units
//!
//! The open-set key is integer millimetres (`u64`) so the heap has a total
//! order.  Routes report metres as `f64`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use rv_core::{Body, GeoPoint, HexId, SimConfig};

use crate::hex::{GridCell, HexGraph, Passability};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Grid waypoints from the start to the goal cell, in travel order.
    /// Consecutive waypoints are one step apart.
    pub waypoints: Vec<GeoPoint>,
    /// Sum of edge costs along `waypoints`.
    pub path_cost_m: f64,
    /// `path_cost_m` plus the residual from the last waypoint to the exact
    /// target.  This is the distance a rover travels.
    pub total_distance_m: f64,
}

impl Route {
    /// A route with no grid edges: drive straight from `from` to `to`.
    pub fn direct(from: GeoPoint, to: GeoPoint, radius_m: f64) -> Self {
        Self {
            waypoints:        vec![from],
            path_cost_m:      0.0,
            total_distance_m: from.distance_m(to, radius_m),
        }
    }

    /// `true` if the route has no grid edges.
    pub fn is_trivial(&self) -> bool {
        self.waypoints.len() <= 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable route planner.
///
/// Implementations must be `Send + Sync` so a single router can serve every
/// rover in a fleet.
pub trait Router: Send + Sync {
    /// Plan a route from `from` to `to` on `body`.
    ///
    /// Returns [`SpatialError::NoPath`] or
    /// [`SpatialError::SearchBudgetExhausted`] if the terrain filter leaves
    /// no way through.
    fn route(&self, body: &dyn Body, from: GeoPoint, to: GeoPoint) -> SpatialResult<Route>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Default [`Router`]: A* over a [`HexGraph`].
#[derive(Clone, Debug)]
pub struct AStarRouter {
    pub step_m:         f64,
    pub max_expansions: usize,
}

impl AStarRouter {
    pub fn new(step_m: f64, max_expansions: usize) -> Self {
        Self { step_m, max_expansions }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.step_m, config.max_expansions)
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl Router for AStarRouter {
    fn route(&self, body: &dyn Body, from: GeoPoint, to: GeoPoint) -> SpatialResult<Route> {
        PathFinder::new(body, from, to, self.step_m, self.max_expansions).find_path()
    }
}

// ── PathFinder ────────────────────────────────────────────────────────────────

/// Lifecycle of one search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    NotStarted,
    Running,
    Found,
    NoPath,
}

/// A single planning request.  Owns its grid; use once.
pub struct PathFinder<'b> {
    body:           &'b dyn Body,
    start:          GeoPoint,
    target:         GeoPoint,
    step_m:         f64,
    max_expansions: usize,
    state:          SearchState,
    expansions:     usize,
    route:          Option<Route>,
}

impl<'b> PathFinder<'b> {
    pub fn new(
        body:           &'b dyn Body,
        start:          GeoPoint,
        target:         GeoPoint,
        step_m:         f64,
        max_expansions: usize,
    ) -> Self {
        Self {
            body,
            start,
            target,
            step_m,
            max_expansions,
            state: SearchState::NotStarted,
            expansions: 0,
            route: None,
        }
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Node expansions performed by the last search.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Total distance of the found route, or `0.0` if none was found.
    ///
    /// Zero means "not plannable", never "already arrived".
    pub fn distance_m(&self) -> f64 {
        self.route.as_ref().map_or(0.0, |r| r.total_distance_m)
    }

    /// Run the search.  Repeated calls return the cached result.
    pub fn find_path(&mut self) -> SpatialResult<Route> {
        match self.state {
            SearchState::Found => {
                if let Some(route) = &self.route {
                    return Ok(route.clone());
                }
            }
            SearchState::NoPath => {
                return Err(SpatialError::NoPath { from: self.start, to: self.target });
            }
            SearchState::NotStarted | SearchState::Running => {}
        }

        self.state = SearchState::Running;
        match self.search() {
            Ok(route) => {
                self.state = SearchState::Found;
                self.route = Some(route.clone());
                Ok(route)
            }
            Err(e) => {
                self.state = SearchState::NoPath;
                self.route = None;
                Err(e)
            }
        }
    }

    fn search(&mut self) -> SpatialResult<Route> {
        let radius = self.body.radius_m();
        let direct = self.start.distance_m(self.target, radius);
        if direct < self.step_m {
            debug!(%direct, "target within one step, using direct segment");
            return Ok(Route::direct(self.start, self.target, radius));
        }

        let bearing = self.start.initial_bearing(self.target);
        let mut graph = HexGraph::new(self.body, self.start, bearing, self.step_m);

        // ── Straight probe: anchor the goal cell ──────────────────────────
        let mut cell = GridCell::ORIGIN;
        let mut straight = 0.0;
        while straight < direct {
            let id = graph.materialize(cell);
            graph.neighbors(id, Passability::Unfiltered);
            cell = cell.forward();
            straight += self.step_m;
        }
        let goal = graph.materialize(cell.backward());

        debug!(
            from = %self.start,
            to = %self.target,
            %direct,
            goal_cell = ?graph.node(goal).cell,
            "starting A* search"
        );

        let route = self.astar(&mut graph, goal);
        debug!(
            expansions = self.expansions,
            nodes = graph.len(),
            found = route.is_ok(),
            "A* search finished"
        );
        route
    }

    fn astar(&mut self, graph: &mut HexGraph<'_>, goal: HexId) -> SpatialResult<Route> {
        let radius = self.body.radius_m();
        let target = self.target;
        let heuristic = |g: &HexGraph<'_>, id: HexId| g.node(id).point.distance_m(target, radius);

        let origin = graph.origin();
        // g_cost[v] = best known path cost to v; parent[v] = predecessor.
        let mut g_cost = vec![f64::INFINITY; graph.len()];
        let mut parent = vec![HexId::INVALID; graph.len()];
        let mut closed = vec![false; graph.len()];

        g_cost[origin.index()] = 0.0;

        // Min-heap keyed by f = g + h in millimetres; HexId breaks ties
        // deterministically.
        let mut open: BinaryHeap<Reverse<(u64, HexId)>> = BinaryHeap::new();
        open.push(Reverse((to_mm(heuristic(&*graph, origin)), origin)));

        self.expansions = 0;
        while let Some(Reverse((_, node))) = open.pop() {
            if closed[node.index()] {
                continue;
            }
            if node == goal {
                return Ok(self.reconstruct(graph, &parent, goal, g_cost[goal.index()]));
            }
            closed[node.index()] = true;

            self.expansions += 1;
            if self.expansions > self.max_expansions {
                return Err(SpatialError::SearchBudgetExhausted { expansions: self.max_expansions });
            }

            let neighbors = graph.neighbors(node, Passability::Filtered);
            if graph.len() > g_cost.len() {
                g_cost.resize(graph.len(), f64::INFINITY);
                parent.resize(graph.len(), HexId::INVALID);
                closed.resize(graph.len(), false);
            }

            let next_cost = g_cost[node.index()] + self.step_m;
            for n in neighbors {
                if closed[n.index()] || next_cost >= g_cost[n.index()] {
                    continue;
                }
                g_cost[n.index()] = next_cost;
                parent[n.index()] = node;
                open.push(Reverse((to_mm(next_cost + heuristic(&*graph, n)), n)));
            }
        }

        Err(SpatialError::NoPath { from: self.start, to: self.target })
    }

    fn reconstruct(&self, graph: &HexGraph<'_>, parent: &[HexId], goal: HexId, cost: f64) -> Route {
        let mut waypoints = Vec::new();
        let mut cur = goal;
        loop {
            waypoints.push(graph.node(cur).point);
            let p = parent[cur.index()];
            if p == HexId::INVALID {
                break;
            }
            cur = p;
        }
        waypoints.reverse();

        let last = waypoints.last().copied().unwrap_or(self.start);
        let residual = last.distance_m(self.target, self.body.radius_m());
        Route {
            waypoints,
            path_cost_m: cost,
            total_distance_m: cost + residual,
        }
    }
}

#[inline]
fn to_mm(metres: f64) -> u64 {
    (metres * 1000.0).round() as u64
}
