//! Integration tests for `YelpClient` using wiremock HTTP mocks.

use nearspot_places::{LatLng, YelpClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YelpClient {
    YelpClient::with_base_url("yelp-key", 30, "nearspot/0.1 (test)", 0, 0, base_url)
        .expect("client construction should not fail")
}

const DOWNTOWN: LatLng = LatLng {
    lat: 30.2672,
    lng: -97.7431,
};

#[tokio::test]
async fn business_search_sends_bearer_auth_and_parses() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "businesses": [
            {
                "id": "y-1",
                "name": "Taco Spot",
                "url": "https://yelp.example.com/biz/taco-spot",
                "phone": "+15125550100",
                "price": "$$",
                "rating": 4.5,
                "review_count": 321,
                "categories": [
                    { "alias": "mexican", "title": "Mexican" },
                    { "alias": "tacos", "title": "Tacos" }
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(header("authorization", "Bearer yelp-key"))
        .and(query_param("term", "Taco Spot"))
        .and(query_param("radius", "100"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let businesses = client
        .business_search("Taco Spot", DOWNTOWN, 100, 1)
        .await
        .expect("should parse businesses");

    assert_eq!(businesses.len(), 1);
    assert_eq!(businesses[0].id, "y-1");
    assert_eq!(businesses[0].price.as_deref(), Some("$$"));
    assert_eq!(businesses[0].categories[1].title, "Tacos");
}

#[tokio::test]
async fn best_match_returns_none_on_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "businesses": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let best = client
        .best_match("Nowhere Cafe", DOWNTOWN)
        .await
        .expect("empty result set is a success");
    assert!(best.is_none());
}

#[tokio::test]
async fn http_error_statuses_surface_as_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .business_search("Taco Spot", DOWNTOWN, 100, 1)
        .await
        .expect_err("401 must error");
    assert!(matches!(err, nearspot_places::PlacesError::Http(_)));
}
