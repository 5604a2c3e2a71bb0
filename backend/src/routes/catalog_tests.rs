//! HTTP tests for the catalog routes over the in-memory store

#[cfg(test)]
mod tests {
    use crate::auth::Principal;
    use crate::config::AppConfig;
    use crate::repositories::MemoryStore;
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestClient {
        app: Router,
        token: String,
    }

    impl TestClient {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let state = AppState::with_stores(store.clone(), store, AppConfig::default());
            let token = state
                .tokens()
                .issue(&Principal {
                    id: 1,
                    username: "admin".to_string(),
                })
                .unwrap();

            Self {
                app: create_router(state),
                token,
            }
        }

        async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder()
                .uri(uri)
                .method(method)
                .header("Authorization", format!("Bearer {}", self.token));

            let request = match body {
                Some(body) => builder
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };

            (status, value)
        }

        async fn create_category(&self, name: &str) -> Value {
            let (status, body) = self
                .send("POST", "/api/category", Some(json!({ "name": name })))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body
        }

        async fn create_link(&self, category_id: i64, body: Value) -> (StatusCode, Value) {
            self.send(
                "POST",
                &format!("/api/categories/{}/links", category_id),
                Some(body),
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let client = TestClient::new();

        let snacks = client.create_category("Snacks").await;
        let drinks = client.create_category("Drinks").await;
        assert_eq!(snacks["order"], 1);
        assert_eq!(drinks["order"], 2);

        let id = snacks["id"].as_i64().unwrap();
        let (status, updated) = client
            .send(
                "PATCH",
                &format!("/api/category/{}", id),
                Some(json!({ "name": "Treats", "order": 5 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Treats");
        assert_eq!(updated["order"], 5);

        let (status, listed) = client.send("GET", "/api/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Drinks", "Treats"]);

        let (status, body) = client
            .send("DELETE", &format!("/api/category/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Category deleted successfully");

        let (status, _) = client
            .send("GET", &format!("/api/category/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_category_without_name_returns_400() {
        let client = TestClient::new();
        let (status, body) = client
            .send("POST", "/api/category", Some(json!({ "order": 1 })))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Category name is required");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let client = TestClient::new();
        let (status, body) = client
            .send("POST", "/api/category", Some(json!({ "name": 42 })))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid input format");
    }

    #[tokio::test]
    async fn test_link_lifecycle() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await;
        let category_id = snacks["id"].as_i64().unwrap();

        let (status, chips) = client
            .create_link(
                category_id,
                json!({ "title": "Chips", "url": "http://x", "price": 12000, "price_str": "Rp 12.000" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(chips["order"], 1);
        assert_eq!(chips["is_active"], true);
        assert_eq!(chips["category_id"], category_id);

        let (_, second) = client
            .create_link(category_id, json!({ "title": "Pretzels", "url": "http://y" }))
            .await;
        assert_eq!(second["order"], 2);

        let (status, listed) = client
            .send("GET", &format!("/api/categories/{}/links", category_id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Chips", "Pretzels"]);

        let chips_id = chips["id"].as_i64().unwrap();
        let (status, updated) = client
            .send(
                "PATCH",
                &format!("/api/categories/{}/links/{}", category_id, chips_id),
                Some(json!({ "title": "Chips", "url": "http://x", "order": 3, "is_active": false })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["is_active"], false);

        let (status, fetched) = client
            .send("GET", &format!("/api/links/{}", chips_id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["category"]["name"], "Snacks");
        assert_eq!(fetched["order"], 3);

        let (status, body) = client
            .send(
                "DELETE",
                &format!("/api/categories/{}/links/{}", category_id, chips_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Link deleted successfully");

        let (status, _) = client
            .send("GET", &format!("/api/links/{}", chips_id), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_link_validation_and_missing_category() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await;
        let category_id = snacks["id"].as_i64().unwrap();

        let (status, body) = client
            .create_link(category_id, json!({ "title": "", "url": "http://x" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title, URL, and category are required");

        let (status, _) = client
            .create_link(999, json!({ "title": "Chips", "url": "http://x" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, links) = client.send("GET", "/api/links", None).await;
        assert!(links.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_link_in_wrong_category_returns_404() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await["id"].as_i64().unwrap();
        let drinks = client.create_category("Drinks").await["id"].as_i64().unwrap();
        let (_, chips) = client
            .create_link(snacks, json!({ "title": "Chips", "url": "http://x" }))
            .await;

        let (status, body) = client
            .send(
                "PATCH",
                &format!("/api/categories/{}/links/{}", drinks, chips["id"]),
                Some(json!({ "title": "Chips", "url": "http://x" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Link not found in this category");
    }

    #[tokio::test]
    async fn test_public_listing_and_include_empty() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await["id"].as_i64().unwrap();
        client.create_category("Empty").await;
        client
            .create_link(snacks, json!({ "title": "Chips", "url": "http://x" }))
            .await;
        client
            .create_link(
                snacks,
                json!({ "title": "Hidden", "url": "http://h", "is_active": false }),
            )
            .await;

        let (status, visible) = client
            .send("GET", "/api/categories-with-links", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let visible = visible.as_array().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["links"].as_array().unwrap().len(), 1);
        assert_eq!(visible[0]["links"][0]["title"], "Chips");

        let (_, all) = client
            .send("GET", "/api/categories-with-links?includeEmpty=true", None)
            .await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, not_literal) = client
            .send("GET", "/api/categories-with-links?includeEmpty=1", None)
            .await;
        assert_eq!(not_literal.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_links_all_includes_category() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await["id"].as_i64().unwrap();
        client
            .create_link(snacks, json!({ "title": "Chips", "url": "http://x" }))
            .await;

        let (status, links) = client.send("GET", "/api/links/all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(links[0]["title"], "Chips");
        assert_eq!(links[0]["category"]["name"], "Snacks");
    }

    #[tokio::test]
    async fn test_delete_category_cascades_over_http() {
        let client = TestClient::new();
        let snacks = client.create_category("Snacks").await["id"].as_i64().unwrap();
        client
            .create_link(snacks, json!({ "title": "Chips", "url": "http://x" }))
            .await;

        client
            .send("DELETE", &format!("/api/category/{}", snacks), None)
            .await;

        let (_, links) = client.send("GET", "/api/links", None).await;
        assert!(links.as_array().unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Non-numeric path ids are rejected before reaching the store
        #[test]
        fn prop_invalid_ids_return_400(id in "[a-zA-Z][a-zA-Z0-9]{0,10}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let client = TestClient::new();

                let (status, body) = client
                    .send("GET", &format!("/api/category/{}", id), None)
                    .await;
                prop_assert_eq!(status, StatusCode::BAD_REQUEST);
                prop_assert_eq!(&body["message"], "Invalid ID format");

                let (status, _) = client
                    .send("DELETE", &format!("/api/categories/1/links/{}", id), None)
                    .await;
                prop_assert_eq!(status, StatusCode::BAD_REQUEST);

                Ok(())
            })?;
        }
    }
}
