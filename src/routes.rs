use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::IdStrategy,
    database::COUNTER_NAME,
    error::AppError,
    models::{
        CounterResponse, CreatePerson, CreatedResponse, LitCandleResponse, Person,
        PersonsResponse, UserIdResponse,
    },
    state::AppState,
};

pub const USER_COOKIE: &str = "userId";

pub async fn welcome_handler() -> &'static str {
    "Welcome to the Candle Service :)"
}

/// Issues an anonymous identity. Purely request-scoped: the id lives in the
/// `userId` cookie and is never stored server-side on its own.
pub async fn user_handler(jar: CookieJar) -> (CookieJar, Json<UserIdResponse>) {
    let (jar, user_id) = ensure_user_cookie(jar);

    (jar, Json(UserIdResponse { id: user_id }))
}

pub async fn persons_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PersonsResponse>, AppError> {
    // Newest first. ObjectIds embed the insertion time, and client-supplied
    // ids still get a descending `_id` sort for a stable insertion order.
    let persons = state
        .persons
        .find(doc! {})
        .sort(doc! { "_id": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(PersonsResponse { persons }))
}

pub async fn counter_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CounterResponse>, AppError> {
    let counter = state
        .counter
        .find_one(doc! { "name": COUNTER_NAME })
        .await?
        .ok_or(AppError::CounterMissing)?;

    Ok(Json(CounterResponse {
        counter_lit_candles: counter.counter,
    }))
}

pub async fn create_person_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePerson>,
) -> Result<Json<CreatedResponse>, AppError> {
    let person = Person {
        object_id: None,
        id: match state.config.id_strategy {
            IdStrategy::Client => payload.id,
            IdStrategy::Generated => None,
        },
        name: payload.name,
        age: payload.age,
        city: payload.city,
        users: Vec::new(),
    };

    let result = state.persons.insert_one(&person).await?;

    Ok(Json(CreatedResponse {
        inserted_id: result.inserted_id,
    }))
}

/// `PUT /persons/{personId}&{userId}` — client id strategy. Both identifiers
/// arrive in a single path segment, separated by `&`.
pub async fn light_candle_by_client_id_handler(
    State(state): State<Arc<AppState>>,
    Path(ids): Path<String>,
) -> Result<Json<LitCandleResponse>, AppError> {
    let (person_id, user_id) = split_person_and_user(&ids)?;

    let response = light_candle(&state, doc! { "id": person_id }, user_id).await?;

    Ok(Json(response))
}

/// `PUT /persons/{personId}` — generated id strategy. The user id comes from
/// the `userId` cookie, minting one on the fly for first-time visitors.
pub async fn light_candle_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(person_id): Path<String>,
) -> Result<(CookieJar, Json<LitCandleResponse>), AppError> {
    let object_id =
        ObjectId::parse_str(&person_id).map_err(|_| AppError::MalformedPersonId)?;
    let (jar, user_id) = ensure_user_cookie(jar);

    let response = light_candle(&state, doc! { "_id": object_id }, &user_id).await?;

    Ok((jar, Json(response)))
}

/// Two sequential writes with no transaction between them. A counter failure
/// after the person update leaves the collections out of sync; the error
/// response says so instead of rolling back or going silent.
async fn light_candle(
    state: &AppState,
    filter: Document,
    user_id: &str,
) -> Result<LitCandleResponse, AppError> {
    let updated_person = state
        .persons
        .find_one_and_update(filter, doc! { "$push": { "users": user_id } })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(AppError::PersonNotFound)?;

    let updated_counter = state
        .counter
        .find_one_and_update(
            doc! { "name": COUNTER_NAME },
            doc! { "$inc": { "counter": 1 } },
        )
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| {
            warn!("Counter increment failed after person update: {e}");
            AppError::CounterOutOfSync
        })?
        .ok_or_else(|| {
            warn!("Counter document missing after person update");
            AppError::CounterOutOfSync
        })?;

    Ok(LitCandleResponse {
        updated_person,
        updated_counter: updated_counter.counter,
    })
}

fn ensure_user_cookie(jar: CookieJar) -> (CookieJar, String) {
    let user_id = match jar.get(USER_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => Uuid::new_v4().to_string(),
    };
    let jar = jar.add(Cookie::new(USER_COOKIE, user_id.clone()));

    (jar, user_id)
}

fn split_person_and_user(ids: &str) -> Result<(&str, &str), AppError> {
    ids.split_once('&').ok_or(AppError::MalformedPersonId)
}
