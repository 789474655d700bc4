#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use zeroize::Zeroizing;

use customer_order_api::{
    auth::{
        oidc::{IdentityClaims, IdentityProvider, OidcError},
        LoginPolicy, SessionClaims, TokenCodec,
    },
    error::{AppError, Result},
    models::{
        customer::{CreateCustomerRequest, Customer},
        order::{NewOrder, Order},
        page::{Page, PageRequest},
    },
    repositories::{CustomerRepository, OrderRepository},
    routes,
    sms::{SmsError, SmsSender},
    state::AppState,
};

pub const SECRET: &[u8] = b"integration-test-secret";

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    next_customer_id: i64,
    next_order_id: i64,
}

/// Customers and orders held in memory, with the same rules as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    customer_lookup_down: AtomicBool,
    order_insert_down: AtomicBool,
}

/// The error a Postgres repository returns once its pool is gone.
fn pool_closed() -> AppError {
    AppError::Pool(deadpool_postgres::PoolError::Closed)
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a customer with a fixed id.
    pub fn seed_customer(&self, id: i64, name: &str, phone: &str) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id,
            name: name.to_string(),
            code: format!("CUST{:03}", id),
            phone: phone.to_string(),
            email: None,
            created_at: now,
            updated_at: now,
        };
        let mut t = self.tables.lock().unwrap();
        t.next_customer_id = t.next_customer_id.max(id);
        t.customers.push(customer.clone());
        customer
    }

    /// Makes every customer lookup by id fail as if the database were down.
    pub fn fail_customer_lookups(&self) {
        self.customer_lookup_down.store(true, Ordering::SeqCst);
    }

    /// Makes every order insert fail as if the database were down.
    pub fn fail_order_inserts(&self) {
        self.order_insert_down.store(true, Ordering::SeqCst);
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }

    pub fn customer_count(&self) -> usize {
        self.tables.lock().unwrap().customers.len()
    }

    fn with_customer(t: &Tables, mut order: Order) -> Order {
        order.customer = t.customers.iter().find(|c| c.id == order.customer_id).cloned();
        order
    }
}

fn paginate<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    rows.iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn create(&self, new: CreateCustomerRequest) -> Result<Customer> {
        let mut t = self.tables.lock().unwrap();
        if t.customers.iter().any(|c| c.code == new.code) {
            return Err(AppError::CustomerExists);
        }
        t.next_customer_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: t.next_customer_id,
            name: new.name,
            code: new.code,
            phone: new.phone,
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        t.customers.push(customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        if self.customer_lookup_down.load(Ordering::SeqCst) {
            return Err(pool_closed());
        }
        let t = self.tables.lock().unwrap();
        Ok(t.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>> {
        let t = self.tables.lock().unwrap();
        Ok(t.customers.iter().find(|c| c.code == code).cloned())
    }

    async fn email_in_use(&self, email: &str, except_id: i64) -> Result<bool> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .customers
            .iter()
            .any(|c| c.id != except_id && c.email.as_deref() == Some(email)))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Customer>> {
        let t = self.tables.lock().unwrap();
        Ok(Page {
            items: paginate(&t.customers, page),
            total: t.customers.len() as i64,
        })
    }

    async fn update(&self, customer: &Customer) -> Result<Customer> {
        let mut t = self.tables.lock().unwrap();
        let stored = t
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(AppError::CustomerNotFound)?;
        stored.name = customer.name.clone();
        stored.phone = customer.phone.clone();
        stored.email = customer.email.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.customers.len();
        t.customers.retain(|c| c.id != id);
        let deleted = t.customers.len() < before;
        if deleted {
            t.orders.retain(|o| o.customer_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, new: NewOrder) -> Result<Order> {
        if self.order_insert_down.load(Ordering::SeqCst) {
            return Err(pool_closed());
        }
        let mut t = self.tables.lock().unwrap();
        t.next_order_id += 1;
        let now = Utc::now();
        let order = Order {
            id: t.next_order_id,
            item: new.item,
            amount: new.amount,
            time: new.time,
            customer_id: new.customer_id,
            customer: None,
            created_at: now,
            updated_at: now,
        };
        t.orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .map(|o| Self::with_customer(&t, o)))
    }

    async fn list(&self, page: PageRequest, customer_id: Option<i64>) -> Result<Page<Order>> {
        let t = self.tables.lock().unwrap();
        let matching: Vec<Order> = t
            .orders
            .iter()
            .filter(|o| customer_id.is_none_or(|id| o.customer_id == id))
            .cloned()
            .collect();
        Ok(Page {
            items: paginate(&matching, page)
                .into_iter()
                .map(|o| Self::with_customer(&t, o))
                .collect(),
            total: matching.len() as i64,
        })
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let mut t = self.tables.lock().unwrap();
        let stored = t
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(AppError::OrderNotFound)?;
        stored.item = order.item.clone();
        stored.amount = order.amount;
        stored.time = order.time;
        stored.updated_at = Utc::now();
        let updated = stored.clone();
        Ok(Self::with_customer(&t, updated))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.orders.len();
        t.orders.retain(|o| o.id != id);
        Ok(t.orders.len() < before)
    }
}

/// One attempted SMS.
#[derive(Debug, Clone, PartialEq)]
pub struct SentSms {
    pub to: String,
    pub text: String,
}

/// Reports every send attempt on a channel, then succeeds, fails or stalls.
pub struct RecordingSms {
    sent: mpsc::UnboundedSender<SentSms>,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingSms {
    pub fn ok() -> (Arc<Self>, mpsc::UnboundedReceiver<SentSms>) {
        Self::build(false, None)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<SentSms>) {
        Self::build(true, None)
    }

    /// Records the attempt only after `delay`.
    pub fn slow(delay: Duration) -> (Arc<Self>, mpsc::UnboundedReceiver<SentSms>) {
        Self::build(false, Some(delay))
    }

    fn build(fail: bool, delay: Option<Duration>) -> (Arc<Self>, mpsc::UnboundedReceiver<SentSms>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { sent: tx, fail, delay }), rx)
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, to: &str, message: &str) -> std::result::Result<(), SmsError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let _ = self.sent.send(SentSms {
            to: to.to_string(),
            text: message.to_string(),
        });
        if self.fail {
            return Err(SmsError::Rejected {
                status: "InsufficientBalance".to_string(),
                code: 405,
            });
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

/// Waits briefly for the next SMS attempt.
pub async fn next_sms(rx: &mut mpsc::UnboundedReceiver<SentSms>) -> Option<SentSms> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .ok()
        .flatten()
}

/// An identity provider that answers every exchange with a fixed result.
pub struct StubProvider {
    pub result: std::result::Result<IdentityClaims, &'static str>,
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://idp.example.com/authorize?client_id=orders&state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> std::result::Result<IdentityClaims, OidcError> {
        if code == "bad-signature" {
            return Err(OidcError::InvalidIdToken("signature mismatch".to_string()));
        }
        self.result
            .clone()
            .map_err(|e| OidcError::TokenExchange(e.to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn codec() -> TokenCodec {
    TokenCodec::new(Some(Zeroizing::new(SECRET.to_vec())))
}

pub fn test_app_with(sms: Arc<dyn SmsSender>, policy: LoginPolicy) -> TestApp {
    let store = MemoryStore::new();
    let state = AppState::from_parts(
        store.clone(),
        store.clone(),
        codec(),
        policy,
        chrono::Duration::hours(24),
        sms,
    );

    TestApp {
        router: routes::app(state.clone()),
        state,
        store,
    }
}

pub fn test_app(sms: Arc<dyn SmsSender>) -> TestApp {
    test_app_with(sms, LoginPolicy::Direct)
}

/// A valid bearer header value for `jane@example.com`.
pub fn bearer() -> String {
    let claims = SessionClaims::new(
        "jane@example.com",
        "jane@example.com",
        "jane",
        Utc::now(),
        chrono::Duration::hours(24),
    );
    format!("Bearer {}", codec().issue(&claims).unwrap())
}

pub fn request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `req` through the router and decodes the JSON body (`Null` when empty).
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
