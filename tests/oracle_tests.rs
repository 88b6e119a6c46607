//! Distance oracle tests: fallback correctness and cache consistency.

mod fixtures;

use rota_planner::haversine::haversine_km;
use rota_planner::oracle::DistanceOracle;
use rota_planner::ors::{OrsClient, OrsConfig};
use rota_planner::osrm::{OsrmClient, OsrmConfig};
use rota_planner::Point;

use fixtures::{CountingService, DownService, DEPOT, PONTA_NEGRA};

fn natal_pair() -> (Point, Point) {
    let beach = &PONTA_NEGRA[0];
    (DEPOT.into(), Point::new(beach.lat, beach.lng))
}

#[test]
fn failing_service_falls_back_to_haversine() {
    let (a, b) = natal_pair();
    let mut oracle = DistanceOracle::new(DownService::default()).with_failure_limit(0);

    let km = oracle.cost(a, b);
    assert!((km - haversine_km(a, b)).abs() < 1e-6);
    assert_eq!(oracle.stats().fallbacks, 1);
    assert_eq!(oracle.cached_pairs(), 0);
}

#[test]
fn fallbacks_are_not_cached() {
    let (a, b) = natal_pair();
    let service = DownService::default();
    let mut oracle = DistanceOracle::new(&service).with_failure_limit(0);

    oracle.cost(a, b);
    oracle.cost(a, b);
    assert_eq!(*service.calls.borrow(), 2);
    assert_eq!(oracle.stats().cache_hits, 0);
}

#[test]
fn failure_limit_stops_hammering_a_dead_service() {
    let service = DownService::default();
    let mut oracle = DistanceOracle::new(&service).with_failure_limit(3);
    let (a, _) = natal_pair();

    for i in 0..10 {
        oracle.cost(a, Point::new(-5.80, -35.20 + i as f64 * 0.01));
    }
    assert_eq!(*service.calls.borrow(), 3);
    assert_eq!(oracle.stats().fallbacks, 10);

    oracle.reset();
    oracle.cost(a, Point::new(-5.9, -35.1));
    assert_eq!(*service.calls.borrow(), 4);
}

#[test]
fn same_pair_hits_the_network_once() {
    let (a, b) = natal_pair();
    let service = CountingService::default();
    let mut oracle = DistanceOracle::new(&service);

    let first = oracle.cost(a, b);
    let second = oracle.cost(a, b);
    assert_eq!(first, second);
    assert_eq!(service.call_count(), 1);
    assert_eq!(oracle.stats().cache_hits, 1);
}

#[test]
fn jitter_below_five_decimals_shares_a_cache_entry() {
    let (a, b) = natal_pair();
    let service = CountingService::default();
    let mut oracle = DistanceOracle::new(&service);

    oracle.cost(a, b);
    oracle.cost(Point::new(a.lat + 1e-9, a.lng - 1e-9), b);
    assert_eq!(service.call_count(), 1);

    oracle.cost(Point::new(a.lat + 1e-4, a.lng), b);
    assert_eq!(service.call_count(), 2);
}

#[test]
fn reset_clears_the_cache() {
    let (a, b) = natal_pair();
    let service = CountingService::default();
    let mut oracle = DistanceOracle::new(&service);

    oracle.cost(a, b);
    oracle.reset();
    assert_eq!(oracle.cached_pairs(), 0);
    oracle.cost(a, b);
    assert_eq!(service.call_count(), 2);
}

#[test]
fn unreachable_openrouteservice_degrades_to_haversine() {
    let (a, b) = natal_pair();
    let client = OrsClient::new(OrsConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 2,
        ..OrsConfig::default()
    })
    .expect("build client");
    let mut oracle = DistanceOracle::new(client);

    let km = oracle.cost(a, b);
    assert!((km - haversine_km(a, b)).abs() < 1e-6);
    assert_eq!(oracle.stats().service_queries, 0);
}

#[test]
fn unreachable_osrm_degrades_to_haversine() {
    let (a, b) = natal_pair();
    let client = OsrmClient::new(OsrmConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..OsrmConfig::default()
    })
    .expect("build client");
    let mut oracle = DistanceOracle::new(client);

    let km = oracle.cost(a, b);
    assert!((km - haversine_km(a, b)).abs() < 1e-6);
}
