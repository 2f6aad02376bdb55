use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{CategoryKind, Engine, Money};
use migration::MigratorTrait;

struct Api {
    router: Router,
    account: String,
    food: String,
    salary: String,
}

async fn api() -> Api {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    engine.create_user("alice", "password").await.unwrap();
    engine.create_user("bob", "secret").await.unwrap();
    let account = engine
        .create_account("alice", "Checking", Money::new(500_00))
        .await
        .unwrap();
    let food = engine
        .add_category("Food", CategoryKind::Expense)
        .await
        .unwrap();
    let salary = engine
        .add_category("Salary", CategoryKind::Income)
        .await
        .unwrap();

    Api {
        router: server::router(engine),
        account: account.id.to_string(),
        food: food.id.to_string(),
        salary: salary.id.to_string(),
    }
}

fn basic(user: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {token}")
}

impl Api {
    async fn send_as(
        &self,
        credentials: Option<(&str, &str)>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, password)) = credentials {
            builder = builder.header(header::AUTHORIZATION, basic(user, password));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_as(Some(("alice", "password")), method, uri, body)
            .await
    }
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let api = api().await;

    let (status, _) = api.send_as(None, Method::GET, "/accounts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api
        .send_as(Some(("alice", "nope")), Method::GET, "/accounts", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = api.send(Method::GET, "/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"][0]["balance_minor"], 500_00);
}

#[tokio::test]
async fn create_split_and_list() {
    let api = api().await;

    let (status, body) = api
        .send(
            Method::POST,
            "/transactions",
            Some(json!({
                "account_id": api.account,
                "category_id": api.food,
                "amount": "100",
                "date": "2024-01-31",
                "description": "Sofa",
                "status": "paid",
                "installments": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ids"].as_array().unwrap().len(), 3);

    let (status, body) = api
        .send(Method::GET, "/transactions?year=2024&month=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["date"], "2024-02-29");
    assert_eq!(transactions[0]["amount_minor"], -33_33);
    assert_eq!(transactions[0]["description"], "Sofa (2/3)");
    assert_eq!(transactions[0]["status"], "pending");
    assert_eq!(transactions[0]["kind"], "expense");

    let (status, body) = api
        .send(
            Method::GET,
            "/transactions?year=2024&month=1&status=paid",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"][0]["amount_minor"], -33_34);
}

#[tokio::test]
async fn listing_without_a_month_is_unbounded() {
    let api = api().await;
    api.send(
        Method::POST,
        "/transactions",
        Some(json!({
            "account_id": api.account,
            "category_id": api.food,
            "amount": "90",
            "date": "2024-01-31",
            "description": "Desk",
            "installments": 3
        })),
    )
    .await;

    let (status, body) = api.send(Method::GET, "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("period").is_none());
    assert_eq!(body["transactions"].as_array().unwrap().len(), 3);

    let (status, body) = api.send(Method::GET, "/transactions?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["date"], "2024-03-31");
    assert_eq!(transactions[1]["date"], "2024-02-29");

    let (status, _) = api.send(Method::GET, "/transactions?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.send(Method::GET, "/transactions?month=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_errors_map_to_422() {
    let api = api().await;

    let (status, body) = api
        .send(
            Method::POST,
            "/transactions",
            Some(json!({
                "account_id": api.account,
                "category_id": api.food,
                "amount": "12.345",
                "date": "2024-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "amount");

    let (status, _) = api
        .send(
            Method::POST,
            "/transactions",
            Some(json!({
                "account_id": api.account,
                "category_id": api.salary,
                "amount": "-5",
                "date": "2024-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Bob cannot book on Alice's account.
    let (status, body) = api
        .send_as(
            Some(("bob", "secret")),
            Method::POST,
            "/transactions",
            Some(json!({
                "account_id": api.account,
                "category_id": api.food,
                "amount": "5",
                "date": "2024-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "account");

    let (status, _) = api
        .send(Method::GET, "/dashboard?year=2024&month=13", None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = api.send(Method::GET, "/dashboard?year=2024", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_edit_and_delete() {
    let api = api().await;
    let (_, body) = api
        .send(
            Method::POST,
            "/transactions",
            Some(json!({
                "account_id": api.account,
                "category_id": api.food,
                "amount": "10",
                "date": "2024-03-05"
            })),
        )
        .await;
    let id = body["ids"][0].as_str().unwrap().to_string();

    let (status, body) = api
        .send(Method::POST, &format!("/transactions/{id}/toggle"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");

    let (status, _) = api
        .send_as(
            Some(("bob", "secret")),
            Method::POST,
            &format!("/transactions/{id}/toggle"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = api
        .send(
            Method::PATCH,
            &format!("/transactions/{id}"),
            Some(json!({
                "account_id": api.account,
                "category_id": api.food,
                "amount": "12,50",
                "date": "2024-03-06",
                "description": "Lunch"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = api
        .send(Method::GET, "/transactions?year=2024&month=3", None)
        .await;
    let row = &body["transactions"][0];
    assert_eq!(row["amount_minor"], -12_50);
    assert_eq!(row["description"], "Lunch");
    assert_eq!(row["status"], "pending");

    let (status, _) = api
        .send(Method::DELETE, &format!("/transactions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = api
        .send(Method::DELETE, &format!("/transactions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixed_import_dashboard_and_sections() {
    let api = api().await;
    api.send(
        Method::POST,
        "/transactions",
        Some(json!({
            "account_id": api.account,
            "category_id": api.food,
            "amount": "40",
            "date": "2024-04-30",
            "description": "Gym",
            "is_fixed": true
        })),
    )
    .await;

    let import = json!({ "kind": "expense", "year": 2024, "month": 5 });
    let (status, body) = api
        .send(Method::POST, "/fixed/import", Some(import.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], 1);
    let (_, body) = api.send(Method::POST, "/fixed/import", Some(import)).await;
    assert_eq!(body["created"], 0);

    let (status, body) = api
        .send(Method::GET, "/dashboard?year=2024&month=5", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "2024-05");
    assert_eq!(body["summary"]["total_expenses_minor"], -40_00);
    assert_eq!(body["summary"]["total_expenses_paid_minor"], 0);
    assert_eq!(body["summary"]["expense_by_category"][0]["name"], "Food");
    assert_eq!(body["recent"][0]["date"], "2024-05-30");
    assert_eq!(body["balances"][0]["balance_minor"], 500_00 - 80_00);

    let (status, body) = api
        .send(Method::GET, "/sections/income?year=2024&month=5", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["category"]["name"], "Salary");
    assert_eq!(sections[0]["total_minor"], 0);
}

#[tokio::test]
async fn categories_are_get_or_create() {
    let api = api().await;

    let (status, first) = api
        .send(
            Method::POST,
            "/categories",
            Some(json!({ "name": "Travel", "kind": "expense" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = api
        .send(
            Method::POST,
            "/categories",
            Some(json!({ "name": " Travel ", "kind": "expense" })),
        )
        .await;
    assert_eq!(first["id"], second["id"]);

    let (status, _) = api
        .send(
            Method::POST,
            "/categories",
            Some(json!({ "name": "", "kind": "expense" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = api.send(Method::GET, "/categories?kind=expense", None).await;
    let names: Vec<_> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Food", "Travel"]);

    let (status, body) = api.send(Method::GET, "/categories/recent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["categories"].as_array().unwrap().is_empty());
}
