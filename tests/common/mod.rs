#![allow(dead_code)]

use async_trait::async_trait;
use axum::routing::get;
use axum::{Router, middleware};
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use carrier_rates::AppError;
use carrier_rates::api;
use carrier_rates::api::handlers::health_handler;
use carrier_rates::api::middleware::auth;
use carrier_rates::application::services::auth_service::hash_token;
use carrier_rates::application::services::{AuthService, CarrierService, QuoteDefaults};
use carrier_rates::domain::entities::{Carrier, NewCarrier, UpdateCarrier};
use carrier_rates::domain::query::{
    CarrierField, CarrierQuery, FilterOp, FilterValue, Page, QueryParser, SortDirection,
};
use carrier_rates::domain::repositories::{ApiToken, CarrierRepository, TokenRepository};
use carrier_rates::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const TEST_TOKEN: &str = "test-token";

/// In-memory stand-in for the PostgreSQL carrier repository.
#[derive(Default)]
pub struct InMemoryCarrierRepository {
    carriers: Mutex<Vec<Carrier>>,
    next_id: Mutex<i64>,
    pub offline: bool,
}

impl InMemoryCarrierRepository {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.carriers.lock().unwrap().len()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }
}

fn field_value(carrier: &Carrier, field: CarrierField) -> FilterValue {
    match field {
        CarrierField::Id => FilterValue::Integer(carrier.id),
        CarrierField::Name => FilterValue::Text(carrier.name.clone()),
        CarrierField::Code => FilterValue::Text(carrier.code.clone()),
        CarrierField::BaseFeeCents => FilterValue::Integer(carrier.base_fee_cents),
        CarrierField::PerKgCents => FilterValue::Integer(carrier.per_kg_cents),
        CarrierField::DimDivisor => FilterValue::Integer(i64::from(carrier.dim_divisor)),
        CarrierField::Currency => FilterValue::Text(carrier.currency.clone()),
        CarrierField::TransitDays => FilterValue::Integer(i64::from(carrier.transit_days)),
        CarrierField::CreatedAt => FilterValue::Timestamp(carrier.created_at),
        CarrierField::UpdatedAt => FilterValue::Timestamp(carrier.updated_at),
    }
}

fn satisfies(actual: &FilterValue, op: FilterOp, expected: &FilterValue) -> bool {
    match (op, actual, expected) {
        (FilterOp::Like, FilterValue::Text(a), FilterValue::Text(e)) => {
            a.to_lowercase().contains(&e.to_lowercase())
        }
        (FilterOp::Eq, a, e) => a == e,
        (FilterOp::Ne, a, e) => a != e,
        (FilterOp::Lt, a, e) => a < e,
        (FilterOp::Lte, a, e) => a <= e,
        (FilterOp::Gt, a, e) => a > e,
        (FilterOp::Gte, a, e) => a >= e,
        _ => false,
    }
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({"constraint": constraint}),
    )
}

#[async_trait]
impl CarrierRepository for InMemoryCarrierRepository {
    async fn find_all_paginate(&self, query: &CarrierQuery) -> Result<Page<Carrier>, AppError> {
        self.check_online()?;
        let carriers = self.carriers.lock().unwrap();

        let mut selected: Vec<Carrier> = carriers
            .iter()
            .filter(|c| {
                query
                    .filters
                    .iter()
                    .all(|f| satisfies(&field_value(c, f.field), f.op, &f.value))
            })
            .cloned()
            .collect();

        selected.sort_by(|a, b| {
            for sort in &query.sort {
                let ordering = field_value(a, sort.field)
                    .partial_cmp(&field_value(b, sort.field))
                    .unwrap_or(Ordering::Equal);
                let ordering = match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });

        let total = selected.len() as i64;
        let items = selected
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();

        Ok(Page {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn all(&self) -> Result<Vec<Carrier>, AppError> {
        self.check_online()?;
        Ok(self.carriers.lock().unwrap().clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Carrier>, AppError> {
        self.check_online()?;
        Ok(self
            .carriers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Carrier>, AppError> {
        self.check_online()?;
        Ok(self
            .carriers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn create(&self, new_carrier: NewCarrier) -> Result<Carrier, AppError> {
        self.check_online()?;
        let mut carriers = self.carriers.lock().unwrap();

        if carriers.iter().any(|c| c.name == new_carrier.name) {
            return Err(unique_violation("carriers_name_key"));
        }
        if carriers.iter().any(|c| c.code == new_carrier.code) {
            return Err(unique_violation("carriers_code_key"));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();

        let carrier = Carrier {
            id: *next_id,
            name: new_carrier.name,
            code: new_carrier.code,
            base_fee_cents: new_carrier.base_fee_cents,
            per_kg_cents: new_carrier.per_kg_cents,
            dim_divisor: new_carrier.dim_divisor,
            currency: new_carrier.currency,
            transit_days: new_carrier.transit_days,
            tracking_url: new_carrier.tracking_url,
            created_at: now,
            updated_at: now,
        };
        carriers.push(carrier.clone());

        Ok(carrier)
    }

    async fn update(&self, id: i64, update: UpdateCarrier) -> Result<Carrier, AppError> {
        self.check_online()?;
        let mut carriers = self.carriers.lock().unwrap();

        if let Some(name) = &update.name
            && carriers.iter().any(|c| c.id != id && &c.name == name)
        {
            return Err(unique_violation("carriers_name_key"));
        }

        let carrier = carriers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Carrier not found", json!({"id": id})))?;

        if let Some(name) = update.name {
            carrier.name = name;
        }
        if let Some(code) = update.code {
            carrier.code = code;
        }
        if let Some(base_fee_cents) = update.base_fee_cents {
            carrier.base_fee_cents = base_fee_cents;
        }
        if let Some(per_kg_cents) = update.per_kg_cents {
            carrier.per_kg_cents = per_kg_cents;
        }
        if let Some(dim_divisor) = update.dim_divisor {
            carrier.dim_divisor = dim_divisor;
        }
        if let Some(currency) = update.currency {
            carrier.currency = currency;
        }
        if let Some(transit_days) = update.transit_days {
            carrier.transit_days = transit_days;
        }
        if let Some(tracking_url) = update.tracking_url {
            carrier.tracking_url = tracking_url;
        }
        carrier.updated_at = Utc::now();

        Ok(carrier.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.check_online()?;
        let mut carriers = self.carriers.lock().unwrap();
        let before = carriers.len();
        carriers.retain(|c| c.id != id);

        if carriers.len() == before {
            return Err(AppError::not_found("Carrier not found", json!({"id": id})));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}

/// In-memory token store keyed by token hash.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn with_token(name: &str, raw_token: &str) -> Self {
        let repo = Self::default();
        repo.tokens.lock().unwrap().push(ApiToken {
            id: 1,
            name: name.to_string(),
            token_hash: hash_token(SIGNING_SECRET, raw_token).unwrap(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        });
        repo
    }

    pub fn last_used(&self, name: &str) -> Option<chrono::DateTime<Utc>> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.last_used_at)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn is_active(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.token_hash == token_hash && !t.is_revoked()))
    }

    async fn touch(&self, token_hash: &str) -> Result<(), AppError> {
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.token_hash == token_hash {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke(&self, id: i64) -> Result<bool, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id && !t.is_revoked()) {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn create_test_state(
    carriers: Arc<InMemoryCarrierRepository>,
    tokens: Arc<InMemoryTokenRepository>,
) -> AppState {
    let carrier_service = Arc::new(CarrierService::new(
        carriers,
        QueryParser::new(10, 100),
        QuoteDefaults::default(),
    ));
    let auth_service = Arc::new(AuthService::new(tokens, SIGNING_SECRET.to_string()));

    AppState::new(carrier_service, auth_service)
}

/// The production route table without rate limiting, which needs a peer address.
pub fn create_test_app(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
}

/// Test server with an empty carrier store and a valid [`TEST_TOKEN`].
pub fn create_test_server() -> (TestServer, Arc<InMemoryCarrierRepository>) {
    let carriers = Arc::new(InMemoryCarrierRepository::default());
    let tokens = Arc::new(InMemoryTokenRepository::with_token("tests", TEST_TOKEN));
    let app = create_test_app(create_test_state(carriers.clone(), tokens));

    (TestServer::new(app).unwrap(), carriers)
}

pub fn new_carrier(name: &str, code: &str, base_fee_cents: i64, per_kg_cents: i64) -> NewCarrier {
    NewCarrier {
        name: name.to_string(),
        code: code.to_string(),
        base_fee_cents,
        per_kg_cents,
        dim_divisor: 5000,
        currency: "USD".to_string(),
        transit_days: 5,
        tracking_url: None,
    }
}

pub async fn seed(repo: &InMemoryCarrierRepository, carriers: Vec<NewCarrier>) -> Vec<Carrier> {
    let mut created = Vec::new();
    for carrier in carriers {
        created.push(repo.create(carrier).await.unwrap());
    }
    created
}

pub const AUTH_HEADER: &str = "Bearer test-token";
