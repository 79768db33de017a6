//! Integration tests for `EventbriteClient` using wiremock HTTP mocks.

use nearspot_events::{EventbriteClient, EventbriteSearchParams, EventsError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> EventbriteClient {
    EventbriteClient::with_base_url("eb-key", 30, "nearspot/0.1 (test)", 0, 0, base_url)
        .expect("client construction should not fail")
}

fn sample_event() -> serde_json::Value {
    serde_json::json!({
        "id": "eb-1",
        "name": { "text": "Jazz Night", "html": "<p>Jazz Night</p>" },
        "description": { "text": "An evening of jazz" },
        "start": { "timezone": "America/Chicago", "local": "2026-09-01T19:00:00" },
        "end": { "timezone": "America/Chicago", "local": "2026-09-01T22:00:00" },
        "url": "https://eb.example.com/e/jazz-night",
        "logo": { "url": "https://img.example.com/jazz.png" },
        "venue": {
            "id": "v-1",
            "name": "Elephant Room",
            "address": { "city": "Austin", "region": "TX" },
            "latitude": "30.2655",
            "longitude": "-97.7447"
        },
        "category": { "id": "103", "name": "Music", "short_name": "Music" },
        "is_free": false,
        "status": "live"
    })
}

#[tokio::test]
async fn search_events_sends_location_and_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/search/"))
        .and(header("authorization", "Bearer eb-key"))
        .and(query_param("expand", "venue,category"))
        .and(query_param("status", "live"))
        .and(query_param("location.latitude", "30.2672"))
        .and(query_param("location.within", "10km"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [sample_event()],
            "pagination": { "object_count": 1 }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let params = EventbriteSearchParams {
        location: Some((30.2672, -97.7431, 10)),
        ..EventbriteSearchParams::default()
    };
    let events = client.search_events(&params).await.expect("should parse");

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.id, "eb-1");
    assert_eq!(
        event.name.as_ref().and_then(|n| n.text.as_deref()),
        Some("Jazz Night")
    );
    assert_eq!(
        event.venue.as_ref().and_then(|v| v.latitude.as_deref()),
        Some("30.2655")
    );
    assert_eq!(event.is_free, Some(false));
}

#[tokio::test]
async fn free_only_filter_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/search/"))
        .and(query_param("q", "jazz"))
        .and(query_param("is_free", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "events": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let params = EventbriteSearchParams {
        query: Some("jazz".to_string()),
        free_only: true,
        ..EventbriteSearchParams::default()
    };
    let events = client.search_events(&params).await.expect("should parse");
    assert!(events.is_empty());
}

#[tokio::test]
async fn event_details_expands_organizer() {
    let server = MockServer::start().await;

    let mut event = sample_event();
    event["organizer"] = serde_json::json!({
        "id": "o-1",
        "name": "Austin Jazz Society",
        "website": "https://jazz.example.com"
    });

    Mock::given(method("GET"))
        .and(path("/events/eb-1/"))
        .and(query_param("expand", "venue,category,organizer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&event))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.event_details("eb-1").await.expect("should parse");
    assert_eq!(
        details.organizer.as_ref().and_then(|o| o.name.as_deref()),
        Some("Austin Jazz Society")
    );
}

#[tokio::test]
async fn ticket_classes_and_attendees_parse() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/eb-1/ticket_classes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ticket_classes": [
                {
                    "id": "t-1",
                    "name": "General Admission",
                    "cost": { "display": "$25.00" },
                    "quantity_total": 120,
                    "quantity_sold": 48,
                    "free": false
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/eb-1/attendees/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "attendees": [{ "id": "a-1" }, { "id": "a-2" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tickets = client.ticket_classes("eb-1").await.expect("should parse");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].quantity_sold, Some(48));

    let attendees = client.attendee_count("eb-1").await.expect("should parse");
    assert_eq!(attendees, 2);
}

#[tokio::test]
async fn missing_event_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status_code": 404,
            "error": "NOT_FOUND",
            "error_description": "The event you requested does not exist."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .event_details("missing")
        .await
        .expect_err("404 must error");
    assert!(matches!(err, EventsError::NotFound { .. }), "got: {err}");
}
