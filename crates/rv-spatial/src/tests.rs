//! Unit tests for rv-spatial.
//!
//! Terrain is built from closures so every test states its own landscape.

#[cfg(test)]
mod helpers {
    use rv_core::{GeoPoint, TerrainBody};

    /// Radius of the test moon.  One degree of arc ≈ 10.47 km.
    pub const R: f64 = 600_000.0;

    pub fn flat() -> TerrainBody<impl Fn(GeoPoint) -> f64 + Send + Sync> {
        TerrainBody::new(R, |_| 120.0)
    }

    /// Flat ground within `radius_m` of `centre`, a `height_m` plateau beyond.
    pub fn crater(
        centre:   GeoPoint,
        radius_m: f64,
        height_m: f64,
    ) -> TerrainBody<impl Fn(GeoPoint) -> f64 + Send + Sync> {
        TerrainBody::new(R, move |p| {
            if p.distance_m(centre, R) <= radius_m { 0.0 } else { height_m }
        })
    }
}

// ── Hex graph ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod hex_graph {
    use rv_core::{GeoPoint, SphereBody, TerrainBody};

    use super::helpers::{flat, R};
    use crate::{GridCell, HexGraph, Passability};

    #[test]
    fn origin_is_start_point() {
        let body = flat();
        let start = GeoPoint::new(1.0, 2.0);
        let g = HexGraph::new(&body, start, 45.0, 1_000.0);
        let o = g.node(g.origin());
        assert_eq!(o.point, start);
        assert_eq!(o.cell, GridCell::ORIGIN);
        assert_eq!(o.elevation_m, 120.0);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn six_neighbours_one_step_away() {
        let body = SphereBody::new(R);
        let mut g = HexGraph::new(&body, GeoPoint::new(0.0, 0.0), 30.0, 1_000.0);
        let origin = g.origin();
        let ns = g.neighbors(origin, Passability::Unfiltered);
        assert_eq!(ns.len(), 6);
        for n in ns {
            let d = g.node(origin).point.distance_m(g.node(n).point, R);
            assert!((d - 1_000.0).abs() < 1.0, "neighbour at {d} m");
        }
        assert_eq!(g.len(), 7);
    }

    #[test]
    fn forward_axis_follows_initial_bearing() {
        let body = SphereBody::new(R);
        let start = GeoPoint::new(10.0, 10.0);
        let mut g = HexGraph::new(&body, start, 90.0, 1_000.0);
        let far = g.materialize(GridCell::new(0, -20));
        let expected = start.destination(90.0, 20_000.0, R);
        assert!(g.node(far).point.distance_m(expected, R) < 1e-3);
    }

    #[test]
    fn cells_are_cached() {
        let body = flat();
        let mut g = HexGraph::new(&body, GeoPoint::new(0.0, 0.0), 0.0, 1_000.0);
        let a = g.materialize(GridCell::new(2, -3));
        let len = g.len();
        let b = g.materialize(GridCell::new(2, -3));
        assert_eq!(a, b);
        assert_eq!(g.len(), len);
    }

    #[test]
    fn generation_is_order_independent() {
        let body = flat();
        let start = GeoPoint::new(-5.0, 33.0);

        let mut direct = HexGraph::new(&body, start, 17.0, 1_000.0);
        let a = direct.materialize(GridCell::new(3, -2));

        let mut meandering = HexGraph::new(&body, start, 17.0, 1_000.0);
        let mut frontier = vec![meandering.origin()];
        for _ in 0..3 {
            let mut next = Vec::new();
            for id in frontier {
                next.extend(meandering.neighbors(id, Passability::Unfiltered));
            }
            frontier = next;
        }
        let b = meandering.get(GridCell::new(3, -2)).expect("ring 3 materialised");

        assert_eq!(direct.node(a).point, meandering.node(b).point);
        assert_eq!(direct.node(a).bearing, meandering.node(b).bearing);
    }

    #[test]
    fn slope_limit_filters_steep_neighbours() {
        // Everything east of the meridian is a 600 m cliff.
        let body = TerrainBody::new(R, |p: GeoPoint| if p.lon > 1e-6 { 600.0 } else { 0.0 });
        let mut g = HexGraph::new(&body, GeoPoint::new(0.0, 0.0), 0.0, 1_000.0);
        let origin = g.origin();
        assert_eq!(g.neighbors(origin, Passability::Unfiltered).len(), 6);
        // 60° and 120° land east of the meridian.
        assert_eq!(g.neighbors(origin, Passability::Filtered).len(), 4);
    }

    #[test]
    fn ocean_filters_submerged_neighbours() {
        let body = TerrainBody::new(R, |p: GeoPoint| if p.lat > 1e-6 { -10.0 } else { 5.0 })
            .with_ocean();
        let mut g = HexGraph::new(&body, GeoPoint::new(0.0, 0.0), 0.0, 1_000.0);
        let origin = g.origin();
        // 0°, 60° and 300° point north into the sea.
        assert_eq!(g.neighbors(origin, Passability::Filtered).len(), 3);
    }
}

// ── Path finding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod path_finder {
    use rv_core::{Body, GeoPoint, SphereBody, TerrainBody};

    use super::helpers::{crater, flat, R};
    use crate::{AStarRouter, PathFinder, Router, SearchState, SpatialError};

    #[test]
    fn flat_terrain_finds_near_direct_route() {
        let body = flat();
        let start = GeoPoint::new(0.0, 0.0);
        let target = start.destination(0.0, 5_000.0, R);

        let mut pf = PathFinder::new(&body, start, target, 1_000.0, 10_000);
        assert_eq!(pf.state(), SearchState::NotStarted);
        let route = pf.find_path().unwrap();

        assert_eq!(pf.state(), SearchState::Found);
        assert!((route.total_distance_m - 5_000.0).abs() <= 1_000.0);
        assert_eq!(pf.distance_m(), route.total_distance_m);
        assert_eq!(route.waypoints[0], start);
        for pair in route.waypoints.windows(2) {
            let d = pair[0].distance_m(pair[1], R);
            assert!((d - 1_000.0).abs() < 10.0, "waypoint gap {d}");
        }
        assert_eq!(
            route.path_cost_m,
            (route.waypoints.len() - 1) as f64 * 1_000.0
        );
    }

    #[test]
    fn east_bound_route_on_sphere_body() {
        let body = SphereBody::new(R);
        let start = GeoPoint::new(20.0, 40.0);
        let target = GeoPoint::new(20.0, 41.0);
        let direct = start.distance_m(target, R);
        let route = AStarRouter::new(1_000.0, 50_000).route(&body, start, target).unwrap();
        assert!((route.total_distance_m - direct).abs() <= 1_000.0);
        let last = *route.waypoints.last().unwrap();
        assert!(last.distance_m(target, R) <= 1_000.0 + 1e-6);
    }

    #[test]
    fn short_request_is_direct() {
        let body = flat();
        let start = GeoPoint::new(0.0, 0.0);
        let target = start.destination(200.0, 500.0, R);
        let mut pf = PathFinder::new(&body, start, target, 1_000.0, 10);
        let route = pf.find_path().unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.waypoints, vec![start]);
        assert!((route.total_distance_m - 500.0).abs() < 1e-6);
        assert_eq!(pf.expansions(), 0);
    }

    #[test]
    fn enclosing_cliff_means_no_path() {
        let start = GeoPoint::new(0.0, 0.0);
        let body = crater(start, 2_500.0, 2_000.0);
        let target = start.destination(0.0, 10_000.0, R);

        let mut pf = PathFinder::new(&body, start, target, 1_000.0, 100_000);
        let result = pf.find_path();

        assert!(matches!(result, Err(SpatialError::NoPath { .. })));
        assert_eq!(pf.state(), SearchState::NoPath);
        assert_eq!(pf.distance_m(), 0.0);
        // A finite basin: the open set drains long before the budget.
        assert!(pf.expansions() < 100);
    }

    #[test]
    fn island_on_ocean_body_has_no_path() {
        let start = GeoPoint::new(0.0, 0.0);
        let target = start.destination(90.0, 8_000.0, R);
        let island = move |p: GeoPoint| if p.distance_m(start, R) <= 3_000.0 { 10.0 } else { -50.0 };

        let wet = TerrainBody::new(R, island).with_ocean();
        assert!(AStarRouter::new(1_000.0, 10_000).route(&wet, start, target).is_err());

        // Same heights without an ocean: the 60 m step is drivable.
        let dry = TerrainBody::new(R, island);
        assert!(!dry.has_ocean());
        assert!(AStarRouter::new(1_000.0, 10_000).route(&dry, start, target).is_ok());
    }

    #[test]
    fn route_detours_around_a_wall() {
        // A 3 km high wall across the direct line, 6 km wide, 2 km thick.
        let in_wall = |p: GeoPoint| (0.4..=0.6).contains(&p.lat) && p.lon.abs() <= 0.3;
        let body = TerrainBody::new(R, move |p| if in_wall(p) { 3_000.0 } else { 0.0 });
        let start = GeoPoint::new(0.0, 0.0);
        let target = GeoPoint::new(1.0, 0.0);
        let direct = start.distance_m(target, R);

        let route = AStarRouter::new(1_000.0, 100_000).route(&body, start, target).unwrap();

        assert!(route.waypoints.iter().all(|&p| !in_wall(p)));
        assert!(route.total_distance_m > direct + 1_000.0);
    }

    #[test]
    fn budget_exhaustion_reports_no_path() {
        let body = flat();
        let start = GeoPoint::new(0.0, 0.0);
        let target = start.destination(45.0, 50_000.0, R);
        let mut pf = PathFinder::new(&body, start, target, 1_000.0, 5);
        let result = pf.find_path();
        assert!(matches!(
            result,
            Err(SpatialError::SearchBudgetExhausted { expansions: 5 })
        ));
        assert_eq!(pf.state(), SearchState::NoPath);
        assert_eq!(pf.distance_m(), 0.0);
    }

    #[test]
    fn repeated_find_path_returns_cached_route() {
        let body = flat();
        let start = GeoPoint::new(0.0, 0.0);
        let target = start.destination(0.0, 3_000.0, R);
        let mut pf = PathFinder::new(&body, start, target, 1_000.0, 10_000);
        let first = pf.find_path().unwrap();
        let expansions = pf.expansions();
        let second = pf.find_path().unwrap();
        assert_eq!(first, second);
        assert_eq!(pf.expansions(), expansions);
    }
}

// ── Route codec ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use rv_core::GeoPoint;

    use crate::{decode, decode_or_empty, encode, format_of, upgrade, CodecError, TokenFormat};

    #[test]
    fn legacy_plaintext_decodes_in_order() {
        let token = "10.5:20.25;11.0:21.0;";
        assert_eq!(format_of(token), TokenFormat::LegacyPlain);
        assert_eq!(
            decode(token).unwrap(),
            vec![GeoPoint::new(10.5, 20.25), GeoPoint::new(11.0, 21.0)]
        );
    }

    #[test]
    fn legacy_lzstring_decodes() {
        let token = lz_str::compress_to_base64("1.5:2.5;3.25:-4.75;");
        assert!(!token.contains(';'));
        assert_eq!(format_of(&token), TokenFormat::LegacyLzString);
        assert_eq!(
            decode(&token).unwrap(),
            vec![GeoPoint::new(1.5, 2.5), GeoPoint::new(3.25, -4.75)]
        );
    }

    #[test]
    fn empty_token_is_empty_route() {
        assert_eq!(format_of(""), TokenFormat::Empty);
        assert!(decode("").unwrap().is_empty());
        assert!(decode("   ").unwrap().is_empty());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn compact_tokens_are_tagged() {
        let token = encode(&[GeoPoint::new(0.1, 0.2)]);
        assert!(token.starts_with("v2."));
        assert_eq!(format_of(&token), TokenFormat::Compact);
        assert!(!token.contains(';'));
    }

    #[test]
    fn compact_payload_is_lat_lon_pairs() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let token = encode(&[GeoPoint::new(10.5, -20.25), GeoPoint::new(0.0, 1e-12)]);
        let packed = STANDARD.decode(token["v2.".len()..].replace('_', "/")).unwrap();
        let plain = lz4_flex::decompress_size_prepended(&packed).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "10.5:-20.25;0:0.000000000001;");
    }

    #[test]
    fn exact_float_roundtrip() {
        let points = vec![
            GeoPoint::new(0.1 + 0.2, -179.99999999999997),
            GeoPoint::new(-89.999999999, 1e-12),
            GeoPoint::new(45.123456789012345, 359.87654321),
        ];
        assert_eq!(decode(&encode(&points)).unwrap(), points);
    }

    #[test]
    fn malformed_waypoint_is_an_error() {
        assert!(matches!(decode("1.0:abc;"), Err(CodecError::Waypoint(_))));
        assert!(matches!(decode("1.0;2.0;"), Err(CodecError::Waypoint(_))));
        assert!(matches!(decode("95.0:2.0;"), Err(CodecError::Waypoint(_))));
    }

    #[test]
    fn corrupt_compact_token_is_an_error() {
        assert!(decode("v2.!!!!").is_err());
        assert!(decode("v2.AAAA").is_err());
    }

    #[test]
    fn garbage_recovers_to_empty() {
        assert!(decode("definitely not a route").is_err());
        assert!(decode_or_empty("definitely not a route").is_empty());
    }

    #[test]
    fn upgrade_rewrites_legacy_tokens() {
        let legacy = "10.5:20.25;11.0:21.0;";
        let current = upgrade(legacy).unwrap();
        assert_eq!(format_of(&current), TokenFormat::Compact);
        assert_eq!(decode(&current).unwrap(), decode(legacy).unwrap());
    }
}

#[cfg(test)]
mod codec_properties {
    use proptest::prelude::*;

    use rv_core::GeoPoint;

    use crate::{decode, encode};

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..360.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn roundtrip(points in prop::collection::vec(point(), 1..10_000)) {
            let token = encode(&points);
            prop_assert!(!token.contains("//"));
            prop_assert!(!token.contains('/'));
            prop_assert_eq!(decode(&token).unwrap(), points);
        }
    }
}
