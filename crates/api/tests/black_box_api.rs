use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use bistro_api::app::{AppServices, build_app};
use bistro_core::{DocumentId, Role, User};
use bistro_infra::Stores;
use bistro_infra::external::{
    GatewayError, IntentRequest, PaymentGateway, PaymentIntent, UnconfiguredGateway,
};

const JWT_SECRET: &str = "test-secret";

/// Records every intent request and answers with a synthetic client secret.
#[derive(Default)]
struct RecordingGateway {
    requests: Mutex<Vec<IntentRequest>>,
}

impl RecordingGateway {
    fn requests(&self) -> Vec<IntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, GatewayError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);

        let id = format!("pi_test_{}", requests.len());
        Ok(PaymentIntent {
            client_secret: format!("{id}_secret_test"),
            id,
        })
    }
}

struct TestServer {
    base_url: String,
    stores: Stores,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_gateway(Arc::new(RecordingGateway::default())).await
    }

    async fn spawn_with_gateway(gateway: Arc<dyn PaymentGateway>) -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let stores = Stores::in_memory();
        let app = build_app(AppServices::new(stores.clone(), gateway, JWT_SECRET.as_bytes()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            stores,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.unwrap()
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.delete(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.unwrap()
    }

    async fn seed_user(&self, email: &str, role: Option<Role>) -> DocumentId {
        let mut user = User::new(email);
        user.role = role;
        self.stores.users.insert(user).await.unwrap().inserted_id.unwrap()
    }

    async fn seed_menu(&self, name: &str, category: &str, price: f64) -> String {
        let item = serde_json::from_value(json!({
            "name": name,
            "category": category,
            "price": price,
        }))
        .unwrap();
        let id = self.stores.menu.insert(item).await.unwrap().inserted_id.unwrap();
        id.to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt_with(secret: &str, email: &str, ttl: ChronoDuration) -> String {
    let now = Utc::now();
    let claims = json!({
        "email": email,
        "iat": now.timestamp(),
        "exp": (now + ttl).timestamp(),
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn mint_jwt(email: &str) -> String {
    mint_jwt_with(JWT_SECRET, email, ChronoDuration::minutes(10))
}

async fn body(res: reqwest::Response) -> Value {
    res.json().await.unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Bistro boss is running");
}

#[tokio::test]
async fn auth_required_for_gated_endpoints() {
    let srv = TestServer::spawn().await;

    for path in ["/users", "/users/admin/a@x.com", "/payments?email=a@x.com"] {
        let res = srv.get(path, None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body(res).await["message"], "forbidden access");
    }

    let res = srv.post("/menu", json!({ "name": "Soup" }), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_tokens_are_rejected() {
    let srv = TestServer::spawn().await;

    let wrong_secret = mint_jwt_with("other-secret", "a@x.com", ChronoDuration::minutes(10));
    let expired = mint_jwt_with(JWT_SECRET, "a@x.com", ChronoDuration::minutes(-1));

    for token in [wrong_secret.as_str(), expired.as_str(), "garbage"] {
        let res = srv.get("/payments?email=a@x.com", Some(token)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn issued_token_opens_token_routes() {
    let srv = TestServer::spawn().await;
    srv.seed_user("a@x.com", None).await;

    let res = srv
        .post("/jwt", json!({ "email": "a@x.com", "name": "Ann" }), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let token = body(res).await["token"].as_str().unwrap().to_string();

    let res = srv.get("/users/admin/a@x.com", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, json!({ "admin": false }));

    let res = srv.post("/jwt", json!({ "name": "no email" }), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_forbid_non_admins() {
    let srv = TestServer::spawn().await;

    // No user record at all.
    let stranger = mint_jwt("ghost@x.com");
    let res = srv.get("/users", Some(&stranger)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(res).await["message"], "forbidden access");

    // Registered, but not an admin.
    let user_id = srv.seed_user("user@x.com", None).await;
    let user = mint_jwt("user@x.com");
    let res = srv.get("/users", Some(&user)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .post("/menu", json!({ "name": "Soup", "category": "soup", "price": 4 }), Some(&user))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(srv.stores.menu.list().await.unwrap().is_empty());

    // Cannot promote itself or delete accounts.
    let res = srv
        .client
        .patch(srv.url(&format!("/users/admin/{user_id}")))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(res).await["message"], "forbidden access");

    let res = srv.delete(&format!("/users/{user_id}"), Some(&user)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let stored = srv.stores.users.find_by_email("user@x.com").await.unwrap().unwrap();
    assert!(!stored.is_admin());
}

#[tokio::test]
async fn admin_promotes_registered_user() {
    let srv = TestServer::spawn().await;
    srv.seed_user("boss@x.com", Some(Role::ADMIN)).await;
    let admin = mint_jwt("boss@x.com");

    // Self-registration cannot smuggle in a role.
    let res = srv
        .post("/users", json!({ "email": "new@x.com", "name": "New", "role": "admin" }), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let created = body(res).await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let res = srv.post("/users", json!({ "email": "new@x.com" }), None).await;
    assert_eq!(
        body(res).await,
        json!({ "message": "user already exists", "insertedId": null })
    );

    let newcomer = mint_jwt("new@x.com");
    let res = srv.get("/users/admin/new@x.com", Some(&newcomer)).await;
    assert_eq!(body(res).await["admin"], false);

    let res = srv
        .client
        .patch(srv.url(&format!("/users/admin/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let outcome = body(res).await;
    assert_eq!(outcome["matchedCount"], 1);
    assert_eq!(outcome["modifiedCount"], 1);

    let res = srv.get("/users/admin/new@x.com", Some(&newcomer)).await;
    assert_eq!(body(res).await["admin"], true);

    let res = srv.get("/users", Some(&admin)).await;
    assert_eq!(body(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn self_only_routes_reject_other_emails() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("a@x.com");

    for path in [
        "/payments?email=b@x.com",
        "/payments",
        "/users/admin/b@x.com",
    ] {
        let res = srv.get(path, Some(&token)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{path}");
        assert_eq!(body(res).await["message"], "unauthorized access");
    }

    let res = srv.get("/payments?email=a@x.com", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, json!([]));
}

#[tokio::test]
async fn deleting_missing_ids_reports_zero() {
    let srv = TestServer::spawn().await;
    srv.seed_user("boss@x.com", Some(Role::ADMIN)).await;
    let admin = mint_jwt("boss@x.com");
    let missing = DocumentId::new().to_string();

    let res = srv.delete(&format!("/carts/{missing}"), None).await;
    assert_eq!(body(res).await["deletedCount"], 0);

    let res = srv.delete(&format!("/menu/{missing}"), None).await;
    assert_eq!(body(res).await["deletedCount"], 0);

    let res = srv.delete(&format!("/users/{missing}"), Some(&admin)).await;
    assert_eq!(body(res).await["deletedCount"], 0);
}

#[tokio::test]
async fn malformed_path_ids_are_bad_requests() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/menu/not-an-id", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(res).await["error"], "invalid_id");

    let res = srv.delete("/carts/123", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn menu_lifecycle() {
    let srv = TestServer::spawn().await;
    srv.seed_user("boss@x.com", Some(Role::ADMIN)).await;
    let admin = mint_jwt("boss@x.com");

    let res = srv
        .post(
            "/menu",
            json!({ "name": "Caesar", "category": "salad", "price": 12, "recipe": "", "image": "" }),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let id = body(res).await["insertedId"].as_str().unwrap().to_string();

    let res = srv
        .client
        .patch(srv.url(&format!("/menu/{id}")))
        .json(&json!({ "price": 13.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(body(res).await["modifiedCount"], 1);

    let item = body(srv.get(&format!("/menu/{id}"), None).await).await;
    assert_eq!(item["_id"], id.as_str());
    assert_eq!(item["price"], 13.5);
    assert_eq!(item["name"], "Caesar");

    srv.delete(&format!("/menu/{id}"), None).await;
    let res = srv.get(&format!("/menu/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, Value::Null);
}

#[tokio::test]
async fn carts_and_reviews_filter_by_email() {
    let srv = TestServer::spawn().await;

    for (email, menu_id) in [("a@x.com", "m1"), ("a@x.com", "m2"), ("b@x.com", "m3")] {
        let res = srv
            .post("/carts", json!({ "email": email, "menuId": menu_id, "price": 5 }), None)
            .await;
        assert_eq!(body(res).await["acknowledged"], true);
    }
    srv.post("/reviews", json!({ "email": "a@x.com", "rating": 5, "details": "great" }), None)
        .await;

    let carts = body(srv.get("/carts?email=a@x.com", None).await).await;
    assert_eq!(carts.as_array().unwrap().len(), 2);
    let carts = body(srv.get("/carts", None).await).await;
    assert_eq!(carts.as_array().unwrap().len(), 3);

    let reviews = body(srv.get("/reviews?email=b@x.com", None).await).await;
    assert_eq!(reviews, json!([]));
    let reviews = body(srv.get("/reviews", None).await).await;
    assert_eq!(reviews[0]["details"], "great");
}

#[tokio::test]
async fn admin_stats_sum_revenue() {
    let srv = TestServer::spawn().await;

    let stats = body(srv.get("/admin-stats", None).await).await;
    assert_eq!(stats["revenue"], 0.0);
    assert_eq!(stats["orders"], 0);

    srv.seed_user("a@x.com", None).await;
    srv.seed_menu("Caesar", "salad", 5.0).await;
    for price in [10.0, 20.5, 0.0] {
        srv.post("/payments", json!({ "email": "a@x.com", "price": price }), None)
            .await;
    }

    let stats = body(srv.get("/admin-stats", None).await).await;
    assert_eq!(stats["revenue"], 30.5);
    assert_eq!(stats["orders"], 3);
    assert_eq!(stats["users"], 1);
    assert_eq!(stats["menuItems"], 1);
}

#[tokio::test]
async fn order_stats_roll_up_by_category() {
    let srv = TestServer::spawn().await;
    let salad_a = srv.seed_menu("Caesar", "Salad", 5.0).await;
    let salad_b = srv.seed_menu("Greek", "Salad", 5.0).await;
    let dessert = srv.seed_menu("Tart", "Dessert", 3.0).await;
    let missing = DocumentId::new().to_string();

    srv.post(
        "/payments",
        json!({
            "email": "a@x.com",
            "price": 13,
            "menuItemIds": [salad_a, salad_b, dessert, missing],
        }),
        None,
    )
    .await;

    let stats = body(srv.get("/order-stats", None).await).await;
    let mut rows = stats.as_array().unwrap().clone();
    rows.sort_by_key(|row| row["category"].as_str().unwrap().to_string());
    assert_eq!(
        rows,
        vec![
            json!({ "category": "Dessert", "quantity": 1, "revenue": 3.0 }),
            json!({ "category": "Salad", "quantity": 2, "revenue": 10.0 }),
        ]
    );
}

#[tokio::test]
async fn recording_payment_clears_its_carts() {
    let srv = TestServer::spawn().await;

    let mut cart_ids = Vec::new();
    for menu_id in ["m1", "m2"] {
        let res = srv
            .post("/carts", json!({ "email": "a@x.com", "menuId": menu_id }), None)
            .await;
        cart_ids.push(body(res).await["insertedId"].as_str().unwrap().to_string());
    }

    let res = srv
        .post(
            "/payments",
            json!({
                "email": "a@x.com",
                "price": 10,
                "transactionId": "pi_123",
                "date": "2024-05-01T12:00:00Z",
                "status": "pending",
                "cartIds": cart_ids,
                "menuItemIds": [],
            }),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let receipt = body(res).await;
    assert_eq!(receipt["paymentResult"]["acknowledged"], true);
    assert_eq!(receipt["deleteResult"]["deletedCount"], 2);

    let carts = body(srv.get("/carts?email=a@x.com", None).await).await;
    assert_eq!(carts, json!([]));

    let token = mint_jwt("a@x.com");
    let payments = body(srv.get("/payments?email=a@x.com", Some(&token)).await).await;
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["transactionId"], "pi_123");
}

#[tokio::test]
async fn payment_intent_charges_minor_units() {
    let gateway = Arc::new(RecordingGateway::default());
    let srv = TestServer::spawn_with_gateway(gateway.clone()).await;

    let res = srv
        .post("/create-payment-intent", json!({ "price": 12.5 }), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let intent = body(res).await;
    assert!(intent["clientSecret"].as_str().unwrap().contains("_secret_"));

    srv.post("/create-payment-intent", json!({ "price": 19.99 }), None)
        .await;

    let requests = gateway.requests();
    let amounts: Vec<i64> = requests.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![1250, 1998]);
    assert!(requests.iter().all(|r| r.currency == "usd"));
    assert!(requests.iter().all(|r| r.payment_method_types == ["card"]));
}

#[tokio::test]
async fn payment_intent_passes_unvalidated_prices_through() {
    let gateway = Arc::new(RecordingGateway::default());
    let srv = TestServer::spawn_with_gateway(gateway.clone()).await;

    for price in [json!({ "price": "12.5" }), json!({}), json!({ "price": "lots" })] {
        let res = srv.post("/create-payment-intent", price, None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let amounts: Vec<i64> = gateway.requests().iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![1250, 0, 0]);
}

#[tokio::test]
async fn payments_and_carts_without_email_are_stored() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/carts", json!({ "menuId": "m1" }), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cart_id = body(res).await["insertedId"].as_str().unwrap().to_string();

    let res = srv
        .post("/payments", json!({ "price": 4, "cartIds": [cart_id] }), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let receipt = body(res).await;
    assert_eq!(receipt["paymentResult"]["acknowledged"], true);
    assert_eq!(receipt["deleteResult"]["deletedCount"], 1);

    let stats = body(srv.get("/admin-stats", None).await).await;
    assert_eq!(stats["orders"], 1);
}

#[tokio::test]
async fn gateway_failures_are_internal_errors() {
    let srv = TestServer::spawn_with_gateway(Arc::new(UnconfiguredGateway)).await;

    let res = srv
        .post("/create-payment-intent", json!({ "price": 12.5 }), None)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(res).await["message"], "Internal Server Error");
}
