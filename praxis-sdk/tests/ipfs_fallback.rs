//! Gateway fallback behavior of `IpfsFetcher` against local fake gateways.

mod common;

use std::time::Duration;

use common::{closed_base_url, spawn_gateway, FakeGateway, Gateway};
use praxis_sdk::{Error, GatewayFailure, IpfsFetcher};
use serde_json::json;

fn fetcher_over(gateways: &[&FakeGateway]) -> IpfsFetcher {
    IpfsFetcher::with_gateways(gateways.iter().map(|g| g.base.clone()))
        .attempt_timeout(Duration::from_millis(300))
}

#[tokio::test]
async fn first_json_wins_and_later_gateways_are_not_tried() {
    let g1 = spawn_gateway(Gateway::Status(500)).await;
    let g2 = spawn_gateway(Gateway::Status(404)).await;
    let g3 = spawn_gateway(Gateway::Json(json!({"a": 1}))).await;
    let g4 = spawn_gateway(Gateway::Json(json!({"a": 2}))).await;

    let value = fetcher_over(&[&g1, &g2, &g3, &g4])
        .fetch("ipfs://QmCard")
        .await
        .unwrap();

    assert_eq!(value, json!({"a": 1}));
    assert_eq!((g1.hits(), g2.hits(), g3.hits(), g4.hits()), (1, 1, 1, 0));
}

#[tokio::test]
async fn all_failing_reports_last_gateway_reason() {
    let g1 = spawn_gateway(Gateway::Status(500)).await;
    let g2 = spawn_gateway(Gateway::Status(502)).await;
    let g3 = spawn_gateway(Gateway::Status(404)).await;
    let g4 = spawn_gateway(Gateway::Status(503)).await;

    let err = fetcher_over(&[&g1, &g2, &g3, &g4])
        .fetch("ipfs://QmCard")
        .await
        .unwrap_err();

    match err {
        Error::AllGatewaysFailed { last_reason } => {
            assert_eq!(last_reason, GatewayFailure::Status(503))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!((g1.hits(), g2.hits(), g3.hits(), g4.hits()), (1, 1, 1, 1));
}

#[tokio::test]
async fn slow_gateway_times_out_and_next_is_tried() {
    let slow = spawn_gateway(Gateway::Slow(Duration::from_secs(3), json!({"slow": true}))).await;
    let fast = spawn_gateway(Gateway::Json(json!({"fast": true}))).await;

    let value = fetcher_over(&[&slow, &fast])
        .fetch("ipfs://QmCard")
        .await
        .unwrap();

    assert_eq!(value, json!({"fast": true}));
    assert_eq!(slow.hits(), 1);
}

#[tokio::test]
async fn timeout_as_last_failure_is_surfaced() {
    let g1 = spawn_gateway(Gateway::Status(500)).await;
    let slow = spawn_gateway(Gateway::Slow(Duration::from_secs(3), json!({}))).await;

    let err = fetcher_over(&[&g1, &slow])
        .fetch("ipfs://QmCard")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::AllGatewaysFailed {
            last_reason: GatewayFailure::Timeout(d)
        } if d == Duration::from_millis(300)
    ));
}

#[tokio::test]
async fn invalid_json_and_refused_connections_fall_through() {
    let garbage = spawn_gateway(Gateway::Text("<html>not json</html>")).await;
    let good = spawn_gateway(Gateway::Json(json!({"name": "Weather Bot"}))).await;
    let refused = closed_base_url().await;

    let fetcher = IpfsFetcher::with_gateways([
        format!("{}/ipfs/", refused),
        garbage.base.clone(),
        good.base.clone(),
    ])
    .attempt_timeout(Duration::from_secs(2));

    let value = fetcher.fetch("ipfs://bafy/agent.json").await.unwrap();
    assert_eq!(value["name"], "Weather Bot");
    assert_eq!(garbage.hits(), 1);
}

#[tokio::test]
async fn non_ipfs_uri_makes_no_requests() {
    let g1 = spawn_gateway(Gateway::Json(json!({"a": 1}))).await;

    let err = fetcher_over(&[&g1]).fetch("https://x").await.unwrap_err();

    assert!(matches!(err, Error::NotContentAddressed(_)));
    assert_eq!(g1.hits(), 0);
}
