//! Admin page commands against a mocked backend.

use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use stockdesk_client::{ClientConfig, MemoryTokenStore};
use stockdesk_console_lib::commands::{auth, catalog, merchant, transaction, user, warehouse};
use stockdesk_console_lib::error::ErrorCode;
use stockdesk_console_lib::AppState;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> AppState {
    let mut config = ClientConfig::default();
    config.api.url = format!("{}/api", server.uri());
    AppState::with_tokens(config, Arc::new(MemoryTokenStore::new())).unwrap()
}

async fn sign_in_as(server: &MockServer, app: &AppState, user: serde_json::Value) -> String {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "1|admin",
            "token_type": "Bearer",
            "user": user
        })))
        .mount(server)
        .await;

    auth::initialize_session(&app.session).await;
    auth::login(
        &app.session,
        "someone@example.id",
        SecretString::from("rahasia".to_string()),
    )
    .await
    .unwrap()
    .redirect
}

fn admin_json() -> serde_json::Value {
    json!({"id": 1, "name": "Admin", "roles": [{"name": "admin"}]})
}

fn operator_json() -> serde_json::Value {
    json!({
        "id": 7,
        "name": "Sari",
        "roles": ["operator"],
        "merchant": {"id": 3, "name": "Toko Sari"}
    })
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer 1|admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_admin_reads_reference_pages() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/kategori",
        json!({"data": [{"id": 1, "nama": "Minuman"}]}),
    )
    .await;
    mount_get(
        &server,
        "/api/produk",
        json!({"data": [{"id": 11, "name": "Kopi Bubuk 250g", "price": 10000, "category_id": 1}]}),
    )
    .await;
    mount_get(
        &server,
        "/api/gudang",
        json!({"data": [{"id": 4, "name": "Gudang Utama", "phone": "0211234"}]}),
    )
    .await;
    mount_get(
        &server,
        "/api/gudang/4",
        json!({"data": {
            "id": 4,
            "name": "Gudang Utama",
            "products": [{"id": 11, "name": "Kopi Bubuk 250g", "price": "10000.00",
                          "pivot": {"stock": 120, "warehouse_id": 4}}]
        }}),
    )
    .await;
    mount_get(
        &server,
        "/api/toko",
        json!({"data": [{"id": 3, "name": "Toko Sari", "keeper": {"id": 7, "name": "Sari"}}]}),
    )
    .await;
    mount_get(
        &server,
        "/api/transaksi",
        json!({"data": {"current_page": 1, "data": [
            {"id": 42, "name": "Budi", "phone": "08123", "merchant_id": 3, "grand_total": "11000.00"}
        ]}}),
    )
    .await;

    let app = app_for(&server);
    assert_eq!(sign_in_as(&server, &app, admin_json()).await, "/dashboard");

    let categories = catalog::list_categories(&app.client, &app.session).await.unwrap();
    assert_eq!(categories[0].name, "Minuman");

    let products = catalog::list_products(&app.client, &app.session).await.unwrap();
    assert_eq!(products[0].listed_stock(), None);

    let warehouses = warehouse::list_warehouses(&app.client, &app.session).await.unwrap();
    assert_eq!(warehouses[0].phone.as_deref(), Some("0211234"));

    let stock = warehouse::get_warehouse_stock(&app.client, &app.session, 4)
        .await
        .unwrap();
    assert_eq!(stock.products[0].listed_stock(), Some(120));

    let merchants = merchant::list_merchants(&app.client, &app.session).await.unwrap();
    assert_eq!(merchants[0].keeper.as_ref().map(|k| k.id), Some(Some(7)));

    let all = transaction::list_all_transactions(&app.client, &app.session)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].merchant_id, Some(3));
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let server = MockServer::start().await;
    for route in ["/api/produk/99", "/api/toko/99", "/api/pengguna/99"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "No query results"})),
            )
            .mount(&server)
            .await;
    }

    let app = app_for(&server);
    sign_in_as(&server, &app, admin_json()).await;

    let err = catalog::get_product(&app.client, &app.session, 99).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Product not found: 99");

    let err = merchant::get_merchant_products(&app.client, &app.session, 99)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = user::get_user(&app.client, &app.session, 99).await.unwrap_err();
    assert_eq!(err.message, "User not found: 99");
}

#[tokio::test]
async fn test_operator_cannot_open_admin_pages() {
    let server = MockServer::start().await;

    let app = app_for(&server);
    assert_eq!(
        sign_in_as(&server, &app, operator_json()).await,
        "/overview-merchant"
    );

    let err = user::list_users(&app.client, &app.session).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
    let err = catalog::list_categories(&app.client, &app.session).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
    let err = transaction::list_all_transactions(&app.client, &app.session)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/api/login"));
}

#[tokio::test]
async fn test_operator_sees_own_merchant() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/my-toko",
        json!({"data": {"id": 3, "name": "Toko Sari", "products": []}}),
    )
    .await;

    let app = app_for(&server);
    sign_in_as(&server, &app, operator_json()).await;

    let mine = merchant::get_my_merchant(&app.client, &app.session).await.unwrap();
    assert_eq!(mine.id, 3);
    assert!(mine.products.is_empty());
}

#[tokio::test]
async fn test_operator_without_merchant_is_precondition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/my-toko"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Merchant not found"})),
        )
        .mount(&server)
        .await;

    let app = app_for(&server);
    sign_in_as(&server, &app, operator_json()).await;

    let err = merchant::get_my_merchant(&app.client, &app.session).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Precondition);
}

#[tokio::test]
async fn test_assign_role_validates_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pengguna/role"))
        .and(body_json(json!({"pengguna_id": 7, "role": "operator"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Role assigned"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/api/pengguna",
        json!([{"id": 7, "name": "Sari", "roles": ["operator"]}]),
    )
    .await;

    let app = app_for(&server);
    sign_in_as(&server, &app, admin_json()).await;

    let err = user::assign_role(&app.client, &app.session, 7, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(err.fields.as_ref().and_then(|f| f.get("role")).is_some());

    user::assign_role(&app.client, &app.session, 7, " operator ")
        .await
        .unwrap();

    let users = user::list_users(&app.client, &app.session).await.unwrap();
    assert_eq!(users[0].roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(), ["operator"]);
}

#[tokio::test]
async fn test_delete_user_refuses_own_account() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server);
    sign_in_as(&server, &app, admin_json()).await;

    let err = user::delete_user(&app.client, &app.session, 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);

    user::delete_user(&app.client, &app.session, 9).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/api/users/1"));
}
