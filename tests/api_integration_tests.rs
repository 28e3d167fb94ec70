use meal_mate::api_connection::{ApiConnectionError, DisplayValue, RecipeApiClient};
use meal_mate::ingredients::{IngredientSelector, RecipeSearchOutcome, SearchError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn client_for(server: &MockServer) -> RecipeApiClient {
    RecipeApiClient::new(&server.uri(), TIMEOUT).expect("mock server URI should be valid")
}

#[tokio::test]
async fn test_fetch_suggestions_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autocomplete"))
        .and(query_param("q", "green on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["green onion", "green olive", 3])))
        .expect(1)
        .mount(&server)
        .await;

    let suggestions = client_for(&server).fetch_suggestions("green on").await.unwrap();
    assert_eq!(suggestions, vec!["green onion", "green olive"]);
}

#[tokio::test]
async fn test_non_array_suggestions_become_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "oops" })))
        .mount(&server)
        .await;

    let suggestions = client_for(&server).fetch_suggestions("xy").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_search_posts_ingredients_and_decodes_legacy_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recipes-with-ingredients"))
        .and(body_json(json!({ "ingredients": ["tomato", "basil"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 101,
                "name": "Bruschetta",
                "servings": 4,
                "ingredients": "['tomato', 'basil', 'bread', 'garlic', 'olive oil', 'salt']",
                "nutrition": {
                    "calories": 210,
                    "totalFat": 9.5,
                    "saturatedFat": 1.5,
                    "sodium": 380,
                    "carbohydrate": 27,
                    "sugar": 4,
                    "protein": 6
                }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let recipes = client_for(&server)
        .fetch_recipes(&["tomato".to_string(), "basil".to_string()])
        .await
        .unwrap();

    assert_eq!(recipes.len(), 1);
    let recipe = &recipes[0];
    assert_eq!(recipe.name, "Bruschetta");
    assert_eq!(recipe.ingredients.len(), 6);
    assert_eq!(recipe.key_ingredients().last().map(String::as_str), Some("olive oil"));
    assert_eq!(recipe.nutrition.total_fat, DisplayValue::Amount(9.5));
    assert_eq!(recipe.detail_path(), "/recipe/101");
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recipes-with-ingredients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_recipes(&["egg".to_string()]).await;
    match result {
        Err(ApiConnectionError::ApiError { status, error_body }) => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error_body, "database unavailable");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_suggestions("ab").await;
    assert!(matches!(result, Err(ApiConnectionError::SerializationError(_))));
}

#[tokio::test]
async fn test_selector_burst_reaches_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autocomplete"))
        .and(query_param("q", "toma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["tomato", "tomatillo"])))
        .expect(1)
        .mount(&server)
        .await;

    let selector = IngredientSelector::new(Arc::new(client_for(&server)))
        .with_debounce(Duration::from_millis(50));
    let mut updates = selector.subscribe();

    for query in ["t", "to", "tom", "toma"] {
        selector.request_suggestions(query);
    }
    tokio::time::timeout(TIMEOUT, updates.changed())
        .await
        .expect("suggestions should arrive")
        .unwrap();

    assert_eq!(selector.suggestions(), vec!["tomato", "tomatillo"]);
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn test_selector_search_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recipes-with-ingredients"))
        .and(body_json(json!({ "ingredients": ["durian"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut selector = IngredientSelector::new(Arc::new(client_for(&server)));
    assert!(matches!(selector.search_recipes().await, Err(SearchError::NoIngredients)));

    selector.add("Durian");
    let outcome = selector.search_recipes().await.unwrap();
    assert_eq!(outcome, RecipeSearchOutcome::NoMatches);
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = RecipeApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let result = client.fetch_suggestions("rice").await;
    assert!(matches!(result, Err(ApiConnectionError::NetworkError(_))));
}
