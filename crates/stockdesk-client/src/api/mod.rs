//! # Dashboard API Client
//!
//! Typed access to the dashboard REST backend.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Every Call Goes Through execute()                  │
//! │                                                                         │
//! │  endpoint method                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  attach "Authorization: Bearer <token>" (from TokenStore)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send ──► 2xx ──► strip {data} wrappers ──► deserialize T               │
//! │       │                                                                 │
//! │       ├─► 401 ──► clear token + publish anonymous session ──► Unauth.   │
//! │       ├─► 422 ──► Validation { message, fields }                        │
//! │       └─► other ─► Api { status, message }                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products, categories, warehouses and the merchant's transaction list are
//! cached for a short TTL. The cache is dropped whenever the session changes.
//! Admin endpoints for merchants and users live in `admin.rs`.

mod admin;
mod cache;
pub mod wire;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use stockdesk_core::{
    Category, CreateTransactionRequest, Merchant, Product, Session, Transaction, User, Warehouse,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, DEFAULT_LOGIN_ERROR};
use crate::token_store::TokenStore;
use cache::{CacheKey, CacheValue};
use wire::{unwrap_data, CreatedTransaction, ErrorBody, LoginResponse};

const MAX_CACHED_LISTS: u64 = 16;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the dashboard REST API.
///
/// Cheap to clone; clones share the HTTP pool, token store, cache and
/// session channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    session: watch::Sender<Session>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Builds a client from configuration and a token store.
    ///
    /// The session channel starts in the `loading` state.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("stockdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(MAX_CACHED_LISTS)
            .time_to_live(config.cache_ttl())
            .build();

        let (session, _) = watch::channel(Session::loading());

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url()?,
                tokens,
                session,
                cache,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Token persistence shared with the session store.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Observes every session change, including 401 invalidation.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    pub(crate) fn publish(&self, session: Session) {
        self.inner.session.send_replace(session);
    }

    // =========================================================================
    // Request Path
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        Ok(self
            .inner
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Attaches the stored bearer token.
    fn authorize(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.inner.tokens.load()?.ok_or(ClientError::NotSignedIn)?;
        Ok(builder.bearer_auth(token.expose_secret()))
    }

    /// Sends a request and returns the status with the raw body.
    async fn dispatch(&self, builder: RequestBuilder) -> ClientResult<(StatusCode, String)> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Response received");
        Ok((status, body))
    }

    /// The single path for authenticated calls.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let builder = self.authorize(builder)?;
        let (status, body) = self.dispatch(builder).await?;

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            return Err(error_for(status, &body));
        }

        parse_data(&body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path)?;
        self.execute(builder).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute(builder).await
    }

    /// Drops the persisted token and publishes an anonymous session.
    pub(crate) fn invalidate_session(&self) {
        warn!("Server rejected the session token, signing out");
        if let Err(e) = self.inner.tokens.clear() {
            warn!(?e, "Failed to clear stored token");
        }
        self.clear_cache();
        self.publish(Session::anonymous());
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchanges credentials for a bearer token and the user record.
    ///
    /// Nothing is persisted here; `SessionStore::login` stores the token.
    ///
    /// ## Errors
    /// - `InvalidCredentials` with the server's `message`, or
    ///   "Invalid credentials." when the server gives none
    /// - `Api` for 5xx answers
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> ClientResult<(SecretString, User)> {
        let payload = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let builder = self.request(Method::POST, "login")?.json(&payload);
        let (status, body) = self.dispatch(builder).await?;

        if status.is_success() {
            let login: LoginResponse = parse_data(&body)?;
            debug!(token_type = ?login.token_type, user_id = login.user.id, "Login accepted");
            return Ok((SecretString::from(login.access_token), login.user));
        }

        if status.is_server_error() {
            return Err(error_for(status, &body));
        }

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
        }

        let message = ErrorBody::parse(&body)
            .message()
            .unwrap_or(DEFAULT_LOGIN_ERROR)
            .to_string();
        Err(ClientError::InvalidCredentials(message))
    }

    /// `GET /me`
    #[instrument(skip(self))]
    pub async fn me(&self) -> ClientResult<User> {
        self.get("me").await
    }

    /// `POST /logout`
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ClientResult<()> {
        let _: serde_json::Value = self.post("logout", &serde_json::json!({})).await?;
        Ok(())
    }

    // =========================================================================
    // Reference Data
    // =========================================================================

    /// `GET /produk` (cached)
    #[instrument(skip(self))]
    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await {
            debug!(count = products.len(), "Products served from cache");
            return Ok(products);
        }

        let products: Vec<Product> = self.get("produk").await?;
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// `GET /produk/{id}`
    #[instrument(skip(self))]
    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        self.get(&format!("produk/{id}")).await
    }

    /// `GET /kategori` (cached)
    #[instrument(skip(self))]
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get("kategori").await?;
        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// `GET /gudang` (cached)
    #[instrument(skip(self))]
    pub async fn warehouses(&self) -> ClientResult<Vec<Warehouse>> {
        if let Some(CacheValue::Warehouses(warehouses)) =
            self.inner.cache.get(&CacheKey::Warehouses).await
        {
            return Ok(warehouses);
        }

        let warehouses: Vec<Warehouse> = self.get("gudang").await?;
        self.inner
            .cache
            .insert(CacheKey::Warehouses, CacheValue::Warehouses(warehouses.clone()))
            .await;
        Ok(warehouses)
    }

    /// `GET /gudang/{id}`
    #[instrument(skip(self))]
    pub async fn warehouse(&self, id: i64) -> ClientResult<Warehouse> {
        self.get(&format!("gudang/{id}")).await
    }

    // =========================================================================
    // Merchant & Transactions
    // =========================================================================

    /// `GET /my-toko`: the merchant kept by the signed-in operator.
    #[instrument(skip(self))]
    pub async fn my_merchant(&self) -> ClientResult<Merchant> {
        self.get("my-toko").await
    }

    /// `GET /my-toko/transaksi` (cached)
    #[instrument(skip(self))]
    pub async fn merchant_transactions(&self) -> ClientResult<Vec<Transaction>> {
        if let Some(CacheValue::Transactions(transactions)) =
            self.inner.cache.get(&CacheKey::MerchantTransactions).await
        {
            debug!(count = transactions.len(), "Transactions served from cache");
            return Ok(transactions);
        }

        let transactions: Vec<Transaction> = self.get("my-toko/transaksi").await?;
        self.inner
            .cache
            .insert(
                CacheKey::MerchantTransactions,
                CacheValue::Transactions(transactions.clone()),
            )
            .await;
        Ok(transactions)
    }

    /// `GET /transaksi`: every transaction (admin view).
    #[instrument(skip(self))]
    pub async fn transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.get("transaksi").await
    }

    /// `GET /transaksi/{id}`
    #[instrument(skip(self))]
    pub async fn transaction(&self, id: i64) -> ClientResult<Transaction> {
        self.get(&format!("transaksi/{id}")).await
    }

    /// `POST /transaksi`; returns the server-assigned id.
    #[instrument(skip(self, request), fields(merchant_id = request.merchant_id, lines = request.products.len()))]
    pub async fn create_transaction(&self, request: &CreateTransactionRequest) -> ClientResult<i64> {
        let created: CreatedTransaction = self.post("transaksi", request).await?;
        info!(transaction_id = created.id, "Transaction created");
        Ok(created.id)
    }

    /// Forgets the cached merchant transaction list.
    pub async fn invalidate_transactions(&self) {
        self.inner
            .cache
            .invalidate(&CacheKey::MerchantTransactions)
            .await;
    }

    /// Forgets every cached list.
    pub fn clear_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

fn parse_data<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let value = if body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(body)?
    };
    Ok(serde_json::from_value(unwrap_data(value))?)
}

fn error_for(status: StatusCode, body: &str) -> ClientError {
    let parsed = ErrorBody::parse(body);
    let message = parsed
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        return ClientError::Validation {
            message,
            fields: parsed.field_errors(),
        };
    }

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
