use std::num::NonZeroUsize;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use thermolog_core::{
    Location, LocationId, LocationStats, Reading, ServiceError, Thermometer, ThermometerId,
    ThermometerStats, ThermologService,
};

use crate::error::ApiError;
use crate::payload::{
    DEFAULT_READINGS_LIMIT, NewLocation, NewReading, NewThermometer, ReadingsWindow,
    ThermometerFilter,
};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

/// Build the HTTP surface over a service.
pub(crate) fn router(service: ThermologService) -> Router {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/{id}", get(get_location))
        .route(
            "/thermometers",
            get(list_thermometers).post(create_thermometer),
        )
        .route("/thermometers/{id}", get(get_thermometer))
        .route("/readings", post(add_reading))
        .route("/readings/latest", get(latest_readings))
        .route("/readings/{thermometer_id}", get(recent_readings))
        .route("/stats/thermometer/{id}", get(thermometer_stats))
        .route("/stats/location/{id}", get(location_stats))
        .route("/init-demo-data", post(init_demo_data))
        .with_state(service)
}

async fn list_locations(State(service): State<ThermologService>) -> ApiResult<Json<Vec<Location>>> {
    Ok(Json(service.list_locations().await?))
}

async fn get_location(
    State(service): State<ThermologService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Location>> {
    Ok(Json(service.get_location(LocationId(id)).await?))
}

async fn create_location(
    State(service): State<ThermologService>,
    payload: Result<Json<NewLocation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    let Json(payload) = payload?;
    let name = payload.validate()?;
    let location = service.create_location(&name).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn list_thermometers(
    State(service): State<ThermologService>,
    Query(filter): Query<ThermometerFilter>,
) -> ApiResult<Json<Vec<Thermometer>>> {
    let location_id = filter.location_id.map(LocationId);
    Ok(Json(service.list_thermometers(location_id).await?))
}

async fn get_thermometer(
    State(service): State<ThermologService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Thermometer>> {
    Ok(Json(service.get_thermometer(ThermometerId(id)).await?))
}

async fn create_thermometer(
    State(service): State<ThermologService>,
    payload: Result<Json<NewThermometer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Thermometer>)> {
    let Json(payload) = payload?;
    let (name, location_id) = payload.validate()?;
    let thermometer = service.create_thermometer(&name, location_id).await?;
    Ok((StatusCode::CREATED, Json(thermometer)))
}

async fn add_reading(
    State(service): State<ThermologService>,
    payload: Result<Json<NewReading>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reading>)> {
    let Json(payload) = payload?;
    let (thermometer_id, value) = payload.validate()?;
    let reading = service.add_reading(thermometer_id, value).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

async fn latest_readings(State(service): State<ThermologService>) -> ApiResult<Json<Vec<Reading>>> {
    Ok(Json(service.latest_readings().await?))
}

async fn recent_readings(
    State(service): State<ThermologService>,
    Path(thermometer_id): Path<i64>,
    Query(window): Query<ReadingsWindow>,
) -> ApiResult<Json<Vec<Reading>>> {
    let limit = NonZeroUsize::new(window.limit.unwrap_or(DEFAULT_READINGS_LIMIT))
        .ok_or_else(|| ServiceError::Validation("limit must be positive".to_owned()))?;
    Ok(Json(
        service
            .recent_readings(ThermometerId(thermometer_id), limit)
            .await?,
    ))
}

async fn thermometer_stats(
    State(service): State<ThermologService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ThermometerStats>> {
    Ok(Json(service.thermometer_stats(ThermometerId(id)).await?))
}

async fn location_stats(
    State(service): State<ThermologService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<LocationStats>> {
    Ok(Json(service.location_stats(LocationId(id)).await?))
}

async fn init_demo_data(
    State(service): State<ThermologService>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    service.init_demo_data().await?;
    Ok((
        StatusCode::CREATED,
        Json(Message {
            message: "Demo data created",
        }),
    ))
}
