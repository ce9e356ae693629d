use axum::{
    extract::{Multipart, Path, Query, State},
    response::Response,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::image::{image_response, read_image_upload};

use crate::models::{
    BookPackageRequest, BookingListQuery, CreateHealthPackageRequest, CreatePackageTestRequest, HealthPackageBooking,
    HealthPackageResponse, HealthPackageTest, HealthPackageWithTests, PackageBookingResponse, PackageFilter,
    UpdateBookingRequest, UpdateHealthPackageRequest, UpdatePackageTestRequest,
};
use crate::services::{HealthPackageService, PackageBookingService};

// ==============================================================================
// CATALOGUE
// ==============================================================================

#[axum::debug_handler]
pub async fn list_health_packages(
    State(state): State<AppState>,
    Query(filter): Query<PackageFilter>,
) -> Result<Json<Vec<HealthPackageResponse>>, AppError> {
    let packages = HealthPackageService::new(&state).list_active(&filter).await?;
    Ok(Json(packages))
}

#[axum::debug_handler]
pub async fn get_health_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<HealthPackageWithTests>, AppError> {
    let package = HealthPackageService::new(&state).get_package_with_tests(package_id).await?;
    Ok(Json(package))
}

#[axum::debug_handler]
pub async fn get_health_package_image(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Response, AppError> {
    let (data, content_type) = HealthPackageService::new(&state).get_image(package_id).await?;
    image_response(&data, &content_type)
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_health_package(
    State(state): State<AppState>,
    Json(request): Json<BookPackageRequest>,
) -> Result<Json<PackageBookingResponse>, AppError> {
    let booking = PackageBookingService::new(&state).book_package(request).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<HealthPackageBooking>>, AppError> {
    let bookings = PackageBookingService::new(&state).list_bookings(&query).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<HealthPackageBooking>, AppError> {
    let booking = PackageBookingService::new(&state).get_booking(booking_id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<HealthPackageBooking>, AppError> {
    let booking = PackageBookingService::new(&state).update_booking(booking_id, request).await?;
    Ok(Json(booking))
}

// ==============================================================================
// ADMIN
// ==============================================================================

#[axum::debug_handler]
pub async fn list_all_health_packages(
    State(state): State<AppState>,
) -> Result<Json<Vec<HealthPackageResponse>>, AppError> {
    let packages = HealthPackageService::new(&state).list_all().await?;
    Ok(Json(packages))
}

#[axum::debug_handler]
pub async fn get_health_package_admin(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<HealthPackageResponse>, AppError> {
    let package = HealthPackageService::new(&state).get_package(package_id).await?;
    Ok(Json(package.into()))
}

#[axum::debug_handler]
pub async fn create_health_package(
    State(state): State<AppState>,
    Json(request): Json<CreateHealthPackageRequest>,
) -> Result<Json<HealthPackageResponse>, AppError> {
    let package = HealthPackageService::new(&state).create_package(request).await?;
    Ok(Json(package))
}

#[axum::debug_handler]
pub async fn update_health_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    Json(request): Json<UpdateHealthPackageRequest>,
) -> Result<Json<HealthPackageResponse>, AppError> {
    let package = HealthPackageService::new(&state).update_package(package_id, request).await?;
    Ok(Json(package))
}

#[axum::debug_handler]
pub async fn delete_health_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    HealthPackageService::new(&state).delete_package(package_id).await?;
    Ok(Json(json!({ "message": "Health package deleted successfully" })))
}

#[axum::debug_handler]
pub async fn upload_health_package_image(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let upload = read_image_upload(multipart).await?;
    let image_url = HealthPackageService::new(&state).upload_image(package_id, upload).await?;

    Ok(Json(json!({
        "message": "Image uploaded successfully",
        "image_url": image_url
    })))
}

#[axum::debug_handler]
pub async fn list_package_tests(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<Vec<HealthPackageTest>>, AppError> {
    let tests = HealthPackageService::new(&state).list_tests(package_id).await?;
    Ok(Json(tests))
}

#[axum::debug_handler]
pub async fn create_package_test(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    Json(request): Json<CreatePackageTestRequest>,
) -> Result<Json<HealthPackageTest>, AppError> {
    let test = HealthPackageService::new(&state).create_test(package_id, request).await?;
    Ok(Json(test))
}

#[axum::debug_handler]
pub async fn update_package_test(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
    Json(request): Json<UpdatePackageTestRequest>,
) -> Result<Json<HealthPackageTest>, AppError> {
    let test = HealthPackageService::new(&state).update_test(test_id, request).await?;
    Ok(Json(test))
}

#[axum::debug_handler]
pub async fn delete_package_test(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    HealthPackageService::new(&state).delete_test(test_id).await?;
    Ok(Json(json!({ "message": "Health package test deleted successfully" })))
}
