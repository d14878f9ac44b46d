//! Session-layer behavior: multiplexing, routing, cancellation, shutdown.

mod common;

use std::time::Duration;

use betwatch_rs::{BetwatchClient, Error};
use common::MockServer;
use futures_util::StreamExt;
use serde_json::{json, Value};

fn client_for(server: &MockServer) -> BetwatchClient {
    BetwatchClient::with_config(common::test_config(&server.url()))
}

#[tokio::test]
async fn query_resolves_through_the_session() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let (result, _) = tokio::join!(
        client.query::<Value>("query Ping { ping }", json!({})),
        async {
            let subs = server.wait_for_subscribes(1).await;
            assert!(subs[0].query.contains("Ping"));
            server.send_next(subs[0].conn, &subs[0].id, json!({ "ping": "pong" }));
            server.send_complete(subs[0].conn, &subs[0].id);
        }
    );

    assert_eq!(result.unwrap(), json!({ "ping": "pong" }));
}

#[tokio::test]
async fn concurrent_queries_resolve_out_of_order() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let (first, second, _) = tokio::join!(
        client.query::<Value>("query First { a }", json!({})),
        client.query::<Value>("query Second { b }", json!({})),
        async {
            let subs = server.wait_for_subscribes(2).await;
            let first = subs.iter().find(|s| s.query.contains("First")).unwrap();
            let second = subs.iter().find(|s| s.query.contains("Second")).unwrap();
            assert_ne!(first.id, second.id);

            // Answer in reverse order of submission
            server.send_next(second.conn, &second.id, json!({ "b": 2 }));
            server.send_complete(second.conn, &second.id);
            server.send_next(first.conn, &first.id, json!({ "a": 1 }));
            server.send_complete(first.conn, &first.id);
        }
    );

    assert_eq!(first.unwrap(), json!({ "a": 1 }));
    assert_eq!(second.unwrap(), json!({ "b": 2 }));
}

#[tokio::test]
async fn subscription_delivers_in_order_and_ends_on_complete() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut stream = client
        .subscribe::<Value>("subscription Odds { odds }", json!({}))
        .await
        .unwrap();

    let subs = server.wait_for_subscribes(1).await;
    server.send_next(subs[0].conn, &subs[0].id, json!({ "odds": 1 }));
    server.send_next(subs[0].conn, &subs[0].id, json!({ "odds": 2 }));
    server.send_complete(subs[0].conn, &subs[0].id);

    assert_eq!(stream.next().await.unwrap().unwrap(), json!({ "odds": 1 }));
    assert_eq!(stream.next().await.unwrap().unwrap(), json!({ "odds": 2 }));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn server_error_surfaces_to_its_caller_only() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let (broken, healthy, _) = tokio::join!(
        client.query::<Value>("query Broken { x }", json!({})),
        client.query::<Value>("query Healthy { y }", json!({})),
        async {
            let subs = server.wait_for_subscribes(2).await;
            let broken = subs.iter().find(|s| s.query.contains("Broken")).unwrap();
            let healthy = subs.iter().find(|s| s.query.contains("Healthy")).unwrap();
            server.send_error(broken.conn, &broken.id, "no such field");
            server.send_next(healthy.conn, &healthy.id, json!({ "y": 1 }));
            server.send_complete(healthy.conn, &healthy.id);
        }
    );

    match broken {
        Err(Error::Remote(errors)) => assert_eq!(errors[0].message, "no such field"),
        other => panic!("expected a remote error, got {:?}", other),
    }
    assert_eq!(healthy.unwrap(), json!({ "y": 1 }));
}

#[tokio::test]
async fn cancelled_stream_drops_late_frames() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut stream = client
        .subscribe::<Value>("subscription Odds { odds }", json!({}))
        .await
        .unwrap();
    let subs = server.wait_for_subscribes(1).await;

    stream.stop().await;
    let completes = server.wait_for_completes(1).await;
    assert_eq!(completes[0].1, subs[0].id);

    // A late frame for the cancelled id must be dropped without fault and
    // without resurrecting the stream
    server.send_next(subs[0].conn, &subs[0].id, json!({ "odds": 99 }));
    assert!(stream.next().await.is_none());

    // The session keeps serving other operations
    let (result, _) = tokio::join!(
        client.query::<Value>("query Alive { ok }", json!({})),
        async {
            let subs = server.wait_for_subscribes(2).await;
            let call = subs.iter().find(|s| s.query.contains("Alive")).unwrap();
            server.send_next(call.conn, &call.id, json!({ "ok": true }));
            server.send_complete(call.conn, &call.id);
        }
    );
    assert_eq!(result.unwrap(), json!({ "ok": true }));
}

#[tokio::test]
async fn dropping_a_stream_notifies_the_server() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let stream = client
        .subscribe::<Value>("subscription Odds { odds }", json!({}))
        .await
        .unwrap();
    let subs = server.wait_for_subscribes(1).await;

    drop(stream);
    let completes = server.wait_for_completes(1).await;
    assert_eq!(completes[0].1, subs[0].id);
}

#[tokio::test]
async fn stalled_query_times_out_without_killing_the_session() {
    let server = MockServer::start().await;
    let mut config = common::test_config(&server.url());
    config.request_timeout = Duration::from_millis(200);
    let client = BetwatchClient::with_config(config);

    // The server records the subscribe but never answers
    let result = client.query::<Value>("query Slow { x }", json!({})).await;
    assert!(matches!(result, Err(Error::Timeout(_))));

    // The expired call released its registry entry
    server.wait_for_completes(1).await;

    // The same session still serves new calls
    let (result, _) = tokio::join!(
        client.query::<Value>("query Quick { y }", json!({})),
        async {
            let subs = server.wait_for_subscribes(2).await;
            let call = subs.iter().find(|s| s.query.contains("Quick")).unwrap();
            server.send_next(call.conn, &call.id, json!({ "y": 7 }));
            server.send_complete(call.conn, &call.id);
        }
    );
    assert_eq!(result.unwrap(), json!({ "y": 7 }));
    assert_eq!(server.connection_count(), 1);
}

#[tokio::test]
async fn close_cancels_pending_work() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut stream = client
        .subscribe::<Value>("subscription Odds { odds }", json!({}))
        .await
        .unwrap();
    server.wait_for_subscribes(1).await;

    client.close().await;

    match stream.next().await {
        Some(Err(Error::Cancelled)) => {}
        other => panic!("expected a final Cancelled item, got {:?}", other),
    }
    assert!(stream.next().await.is_none());

    // Operations after close fail fast
    let result = client.query::<Value>("query X { x }", json!({})).await;
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn malformed_frames_do_not_kill_the_session() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let (result, _) = tokio::join!(
        client.query::<Value>("query Ping { ping }", json!({})),
        async {
            let subs = server.wait_for_subscribes(1).await;
            server.send_frame(subs[0].conn, json!({ "type": "launch", "id": "bogus" }));
            server.send_next(subs[0].conn, &subs[0].id, json!({ "ping": "pong" }));
            server.send_complete(subs[0].conn, &subs[0].id);
        }
    );

    assert_eq!(result.unwrap(), json!({ "ping": "pong" }));
    assert_eq!(server.connection_count(), 1);
}
