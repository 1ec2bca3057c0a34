//! Properties of the full report over synthetic snapshots.

use analytics::{AggregationEngine, EngineSettings, MetricValue, ReportMetrics};
use core_types::{AssetRecord, Direction, PercentWindow, Quote};
use std::collections::HashMap;

fn asset(name: &str, symbol: &str, price: f64, volume: f64, change_24h: f64) -> AssetRecord {
    AssetRecord {
        name: name.to_string(),
        symbol: symbol.to_string(),
        quote: HashMap::from([(
            "USD".to_string(),
            Quote {
                price: Some(price),
                volume_24h: Some(volume),
                percent_change_1h: Some(change_24h / 10.0),
                percent_change_24h: Some(change_24h),
                percent_change_7d: Some(-change_24h),
                market_cap: Some(price * volume),
            },
        )]),
        circulating_supply: Some(volume / 2.0),
        date_added: Some(format!("20{:02}-01-01T00:00:00.000Z", name.len())),
    }
}

fn snapshot() -> Vec<AssetRecord> {
    vec![
        asset("Bitcoin", "BTC", 64_000.0, 30_000_000_000.0, 1.2),
        asset("Ethereum", "ETH", 3_100.0, 15_000_000_000.0, -2.5),
        asset("Tether", "USDT", 1.0, 50_000_000_000.0, 0.01),
        asset("Solana", "SOL", 150.0, 2_500_000_000.0, 6.3),
        asset("Dogecoin", "DOGE", 0.15, 900_000_000.0, -4.1),
        asset("Tiny", "TNY", 0.002, 50_000.0, 12.0),
    ]
}

fn engine() -> AggregationEngine {
    AggregationEngine::new(EngineSettings {
        converter: "USD".to_string(),
        ranking_depth: 3,
        basket_depth: 4,
        volume_threshold: 76_000_000.0,
    })
}

#[test]
fn report_contains_every_documented_key() {
    let report = engine().build_report(&snapshot());

    let keys: Vec<&str> = report.keys().collect();
    assert_eq!(
        keys,
        vec![
            "max_volume_24h",
            "top_3_percentage_change_24h",
            "last_3_percentage_change_24h",
            "top_3_percentage_change_7d",
            "price_first_4",
            "price_first_30",
            "price_volume_greater_than_76000000_24h",
            "earn_percent",
            "circulating_supply_ranking",
            "market_cap_ranking",
            "date_added_ranking",
        ]
    );
    assert!(report.unavailable().is_empty());
    assert_eq!(
        report.get("max_volume_24h"),
        Some(&MetricValue::Text("Tether 50000000000$".to_string()))
    );
    assert_eq!(
        report
            .get("top_3_percentage_change_24h")
            .and_then(MetricValue::as_list)
            .map(|l| l.len()),
        Some(3)
    );
    assert_eq!(
        report
            .get("market_cap_ranking")
            .and_then(MetricValue::as_list)
            .map(|l| l.len()),
        Some(6)
    );
}

#[test]
fn best_and_worst_rankings_are_reverse_orderings() {
    let assets = snapshot();
    let engine = engine();
    let n = assets.len();

    let mut best = engine
        .percent_change_ranking(&assets, PercentWindow::OneHour, n, Direction::Best)
        .unwrap();
    let worst = engine
        .percent_change_ranking(&assets, PercentWindow::OneHour, n, Direction::Worst)
        .unwrap();

    best.reverse();
    assert_eq!(best, worst);
    assert!(worst[0].starts_with("Dogecoin DOGE: -0.4"));
}

#[test]
fn zero_depth_basket_equals_configured_depth() {
    let assets = snapshot();
    let engine = engine();
    assert_eq!(
        engine.basket_cost(&assets, 0).unwrap(),
        engine.basket_cost(&assets, 4).unwrap()
    );
    assert_eq!(engine.basket_cost(&assets, 0).unwrap(), 64_000.0 + 3_100.0 + 1.0 + 150.0);
}

#[test]
fn threshold_cost_never_increases_with_threshold() {
    let assets = snapshot();
    let engine = engine();
    let thresholds = [
        0.0,
        10_000.0,
        76_000_000.0,
        1_000_000_000.0,
        20_000_000_000.0,
        1e12,
    ];

    let costs: Vec<f64> = thresholds
        .iter()
        .map(|t| engine.threshold_basket_cost(&assets, *t).unwrap())
        .collect();
    assert!(costs.windows(2).all(|w| w[0] >= w[1]), "costs: {:?}", costs);
    assert_eq!(costs[costs.len() - 1], 0.0);
}

#[test]
fn investment_example_from_three_assets() {
    let assets = vec![
        asset("A", "A", 100.0, 1.0, 10.0),
        asset("B", "B", 50.0, 1.0, -20.0),
        asset("C", "C", 200.0, 1.0, 0.0),
    ];
    let earn = engine().investment_return(&assets, 3).unwrap();
    let purchase = 100.0 / 1.1 + 62.5 + 200.0;
    assert!((earn - (350.0 - purchase) / purchase * 100.0).abs() < 1e-12);
    assert!((earn + 0.965).abs() < 1e-3);
}

#[test]
fn empty_snapshot_yields_empty_lists_zero_costs_and_placeholders() {
    let report = engine().build_report(&[]);

    assert_eq!(report.len(), 11);
    for (key, value) in report.iter() {
        match key {
            "max_volume_24h" | "earn_percent" => assert!(value.is_unavailable(), "{key}"),
            k if k.starts_with("price_") => assert_eq!(value, &MetricValue::Number(0.0), "{key}"),
            _ => assert_eq!(value, &MetricValue::List(Vec::new()), "{key}"),
        }
    }
}

#[test]
fn build_report_is_idempotent() {
    let assets = snapshot();
    let engine = engine();
    assert_eq!(engine.build_report(&assets), engine.build_report(&assets));
}

#[test]
fn report_survives_json_round_trip() {
    let mut assets = snapshot();
    assets[3].circulating_supply = None;
    let report = engine().build_report(&assets);
    assert_eq!(report.unavailable(), vec!["circulating_supply_ranking"]);

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: ReportMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn engine_can_be_shared_between_threads() {
    let engine = std::sync::Arc::new(engine());
    let assets = std::sync::Arc::new(snapshot());
    let expected = engine.build_report(&assets);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            let assets = assets.clone();
            std::thread::spawn(move || engine.build_report(&assets))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
