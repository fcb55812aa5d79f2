use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Body of create and update requests. Any `id` in the payload is ignored;
/// the store assigns ids on create and the path decides them on update.
#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/search", get(search_users))
        .route("/api/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate(input: &UserInput) -> Result<(), (StatusCode, String)> {
    if input.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".to_string()));
    }
    if input.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "email is required".to_string()));
    }
    Ok(())
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn search_users(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<User>> {
    let needle = params.name.to_lowercase();
    let store = db.read().await;
    Json(
        store
            .users
            .values()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    validate(&input)?;
    let mut store = db.write().await;
    let user = User {
        id: store.allocate_id(),
        name: input.name,
        email: input.email,
    };
    store.users.insert(user.id, user.clone());
    info!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or_else(|| {
        debug!(id, "user not found");
        StatusCode::NOT_FOUND
    })
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, (StatusCode, String)> {
    let mut store = db.write().await;
    let user = store
        .users
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, format!("user {id} not found")))?;
    validate(&input)?;
    user.name = input.name;
    user.email = input.email;
    info!(id, "user replaced");
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| {
            info!(id, "user deleted");
            StatusCode::NO_CONTENT
        })
        .ok_or(StatusCode::NOT_FOUND)
}
