//! Admin-side endpoints: merchants, users and role assignment.
//!
//! ```text
//!   GET    /toko            merchants with keeper
//!   GET    /toko/{id}       one merchant with its product listing
//!   GET    /pengguna        users with roles
//!   GET    /pengguna/{id}
//!   POST   /pengguna/role   { pengguna_id, role }
//!   DELETE /users/{id}
//! ```

use reqwest::Method;
use stockdesk_core::{AssignRoleRequest, Merchant, User};
use tracing::{info, instrument};

use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// `GET /toko`
    #[instrument(skip(self))]
    pub async fn merchants(&self) -> ClientResult<Vec<Merchant>> {
        self.get("toko").await
    }

    /// `GET /toko/{id}`
    #[instrument(skip(self))]
    pub async fn merchant(&self, id: i64) -> ClientResult<Merchant> {
        self.get(&format!("toko/{id}")).await
    }

    /// `GET /pengguna`
    #[instrument(skip(self))]
    pub async fn users(&self) -> ClientResult<Vec<User>> {
        self.get("pengguna").await
    }

    /// `GET /pengguna/{id}`
    #[instrument(skip(self))]
    pub async fn user(&self, id: i64) -> ClientResult<User> {
        self.get(&format!("pengguna/{id}")).await
    }

    /// `POST /pengguna/role`: gives a user a role.
    #[instrument(skip(self, request), fields(user_id = request.user_id, role = %request.role))]
    pub async fn assign_role(&self, request: &AssignRoleRequest) -> ClientResult<()> {
        let _: serde_json::Value = self.post("pengguna/role", request).await?;
        info!("Role assigned");
        Ok(())
    }

    /// `DELETE /users/{id}`
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, &format!("users/{id}"))?;
        let _: serde_json::Value = self.execute(builder).await?;
        info!("User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::token_store::MemoryTokenStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn admin_client(server: &MockServer) -> ApiClient {
        let mut config = ClientConfig::default();
        config.api.url = format!("{}/api", server.uri());
        ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("admin-tok"))).unwrap()
    }

    #[tokio::test]
    async fn test_merchant_with_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/toko/3"))
            .and(header("authorization", "Bearer admin-tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "id": 3,
                    "nama": "Toko Sari",
                    "keeper": {"id": 7, "name": "Sari"},
                    "products": [{
                        "id": 11,
                        "name": "Kopi Bubuk 250g",
                        "price": "10000.00",
                        "pivot": {"stock": 20, "warehouse_id": 4, "merchant_id": 3}
                    }]
                }
            })))
            .mount(&server)
            .await;

        let merchant = admin_client(&server).merchant(3).await.unwrap();
        assert_eq!(merchant.name, "Toko Sari");
        assert_eq!(merchant.keeper.map(|k| k.name), Some("Sari".to_string()));
        assert_eq!(merchant.products[0].listed_stock(), Some(20));
    }

    #[tokio::test]
    async fn test_users_accept_plain_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pengguna"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nama": "Admin", "roles": [{"name": "admin"}]},
                {"id": 7, "name": "Sari", "no_hp": "0812", "roles": ["operator"]}
            ])))
            .mount(&server)
            .await;

        let users = admin_client(&server).users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Admin");
        assert_eq!(users[1].phone.as_deref(), Some("0812"));
    }

    #[tokio::test]
    async fn test_assign_role_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pengguna/role"))
            .and(body_json(json!({"pengguna_id": 7, "role": "operator"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        admin_client(&server)
            .assign_role(&AssignRoleRequest {
                user_id: 7,
                role: "operator".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/10"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
            .mount(&server)
            .await;

        let client = admin_client(&server);
        client.delete_user(9).await.unwrap();
        assert!(matches!(
            client.delete_user(10).await,
            Err(ClientError::Api { status: 404, .. })
        ));
    }
}
