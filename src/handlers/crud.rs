//! Generic axum handlers parameterized by a catalog entry, and the router
//! builder that maps a resource's exposed operations onto its routes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json, Router,
};
use sea_orm::{EntityTrait, PrimaryKeyTrait};

use crate::errors::ApiError;
use crate::pagination::ListArgs;
use crate::resource::{self, ResourceContract};
use crate::AppState;

/// Which of the five operations a resource exposes. Unrouted methods fall
/// through to axum's 405 handling.
#[derive(Debug, Clone, Copy)]
pub struct Operations {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub replace: bool,
    pub delete: bool,
}

impl Operations {
    pub const ALL: Operations = Operations {
        list: true,
        get: true,
        create: true,
        replace: true,
        delete: true,
    };
}

pub(crate) fn next_header(args: &ListArgs, path: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&args.next_locator(path)) {
        headers.insert(HeaderName::from_static("x-next"), value);
    }
    headers
}

pub(crate) fn list_args(
    args: Result<Query<ListArgs>, QueryRejection>,
) -> Result<ListArgs, ApiError> {
    let Query(args) = args.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    args.checked()
}

fn body_or_reject<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(err)) => Err(ApiError::Validation(err.body_text())),
        Err(_) => Err(ApiError::BadRequest("No input data provided".to_string())),
    }
}

pub async fn list<R>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    args: Result<Query<ListArgs>, QueryRejection>,
) -> Result<Response, ApiError>
where
    R: ResourceContract,
{
    let args = list_args(args)?;
    let rows = resource::list::<R>(&state.db, &args).await?;
    Ok((StatusCode::OK, next_header(&args, uri.path()), Json(rows)).into_response())
}

pub async fn get_one<R>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let row = resource::get::<R>(&state.db, id).await?;
    Ok(Json(row).into_response())
}

pub async fn create<R>(
    State(state): State<AppState>,
    payload: Result<Json<R::Create>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ResourceContract,
{
    let payload = body_or_reject(payload)?;
    let id = resource::create::<R>(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(id)).into_response())
}

pub async fn replace<R>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<R::Update>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let payload = body_or_reject(payload)?;
    resource::replace::<R>(&state.db, id, payload).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn destroy<R>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    resource::delete::<R>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Build the routes for one resource from its operation flags.
pub fn routes<R>(ops: Operations) -> Router<AppState>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let mut collection: MethodRouter<AppState> = MethodRouter::new();
    if ops.list {
        collection = collection.get(list::<R>);
    }
    if ops.create {
        collection = collection.post(create::<R>);
    }

    let mut item: MethodRouter<AppState> = MethodRouter::new();
    if ops.get {
        item = item.get(get_one::<R>);
    }
    if ops.replace {
        item = item.put(replace::<R>);
    }
    if ops.delete {
        item = item.delete(destroy::<R>);
    }

    Router::new().route("/", collection).route("/:id", item)
}
