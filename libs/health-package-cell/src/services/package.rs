use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_database::{AppState, SupabaseClient};
use shared_utils::image::ImageUpload;
use shared_utils::validation::require_non_blank;

use crate::models::{
    CreateHealthPackageRequest, CreatePackageTestRequest, HealthPackage, HealthPackageError, HealthPackageResponse,
    HealthPackageTest, HealthPackageWithTests, PackageFilter, StoredImage, UpdateHealthPackageRequest,
    UpdatePackageTestRequest, HEALTH_PACKAGE_COLUMNS,
};

pub struct HealthPackageService {
    supabase: Arc<SupabaseClient>,
}

impl HealthPackageService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    /// Active packages, cheapest first.
    pub async fn list_active(&self, filter: &PackageFilter) -> Result<Vec<HealthPackageResponse>, HealthPackageError> {
        let mut path = format!(
            "/rest/v1/health_packages?select={}&is_active=eq.true&order=price.asc",
            HEALTH_PACKAGE_COLUMNS
        );

        if let Some(age_group) = filter.age_group.as_deref().filter(|v| !v.is_empty()) {
            path.push_str(&format!("&age_group=eq.{}", urlencoding::encode(age_group)));
        }
        if let Some(gender) = filter.gender.as_deref().filter(|v| !v.is_empty()) {
            path.push_str(&format!(
                "&or=(gender_specific.eq.{},gender_specific.is.null)",
                urlencoding::encode(gender)
            ));
        }
        if let Some(max_price) = filter.max_price.filter(|price| *price > 0) {
            path.push_str(&format!("&price=lte.{}", max_price));
        }

        debug!("Listing health packages with {:?}", filter);
        let packages: Vec<HealthPackage> = self.supabase.select(&path).await?;
        Ok(packages.into_iter().map(HealthPackageResponse::from).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<HealthPackageResponse>, HealthPackageError> {
        let path = format!("/rest/v1/health_packages?select={}&order=price.asc", HEALTH_PACKAGE_COLUMNS);
        let packages: Vec<HealthPackage> = self.supabase.select(&path).await?;
        Ok(packages.into_iter().map(HealthPackageResponse::from).collect())
    }

    pub async fn get_package(&self, package_id: i64) -> Result<HealthPackage, HealthPackageError> {
        let path = format!("/rest/v1/health_packages?select={}&id=eq.{}", HEALTH_PACKAGE_COLUMNS, package_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(HealthPackageError::NotFound)
    }

    pub async fn get_active_package(&self, package_id: i64) -> Result<HealthPackage, HealthPackageError> {
        let path = format!(
            "/rest/v1/health_packages?select={}&id=eq.{}&is_active=eq.true",
            HEALTH_PACKAGE_COLUMNS, package_id
        );
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(HealthPackageError::NotFound)
    }

    pub async fn get_package_with_tests(&self, package_id: i64) -> Result<HealthPackageWithTests, HealthPackageError> {
        let package = self.get_active_package(package_id).await?;
        let tests = self.fetch_tests(package_id).await?;

        Ok(HealthPackageWithTests {
            package: package.into(),
            tests,
        })
    }

    pub async fn create_package(
        &self,
        request: CreateHealthPackageRequest,
    ) -> Result<HealthPackageResponse, HealthPackageError> {
        require_non_blank("Package name", &request.name).map_err(HealthPackageError::Validation)?;
        require_non_blank("Age group", &request.age_group).map_err(HealthPackageError::Validation)?;
        validate_pricing(request.price, request.original_price)?;

        let row = json!({
            "name": request.name.trim(),
            "description": request.description,
            "price": request.price,
            "original_price": request.original_price,
            "duration_hours": request.duration_hours,
            "age_group": request.age_group,
            "gender_specific": request.gender_specific,
            "fasting_required": request.fasting_required,
            "home_collection_available": request.home_collection_available,
            "lab_visit_required": request.lab_visit_required,
            "report_delivery_days": request.report_delivery_days,
            "is_active": request.is_active,
            "image_url": request.image_url,
        });

        let package: HealthPackage = self.supabase.insert("health_packages", row).await?;
        info!("Created health package {} ({})", package.id, package.name);
        Ok(package.into())
    }

    pub async fn update_package(
        &self,
        package_id: i64,
        request: UpdateHealthPackageRequest,
    ) -> Result<HealthPackageResponse, HealthPackageError> {
        let current = self.get_package(package_id).await?;

        if let Some(name) = &request.name {
            require_non_blank("Package name", name).map_err(HealthPackageError::Validation)?;
        }
        validate_pricing(
            request.price.unwrap_or(current.price),
            request.original_price.or(current.original_price),
        )?;

        let mut update_data = Map::new();
        let fields: [(&str, Option<Value>); 13] = [
            ("name", request.name.map(|v| json!(v.trim()))),
            ("description", request.description.map(|v| json!(v))),
            ("price", request.price.map(|v| json!(v))),
            ("original_price", request.original_price.map(|v| json!(v))),
            ("duration_hours", request.duration_hours.map(|v| json!(v))),
            ("age_group", request.age_group.map(|v| json!(v))),
            ("gender_specific", request.gender_specific.map(|v| json!(v))),
            ("fasting_required", request.fasting_required.map(|v| json!(v))),
            ("home_collection_available", request.home_collection_available.map(|v| json!(v))),
            ("lab_visit_required", request.lab_visit_required.map(|v| json!(v))),
            ("report_delivery_days", request.report_delivery_days.map(|v| json!(v))),
            ("is_active", request.is_active.map(|v| json!(v))),
            ("image_url", request.image_url.map(|v| json!(v))),
        ];
        for (column, value) in fields {
            if let Some(value) = value {
                update_data.insert(column.to_string(), value);
            }
        }

        if update_data.is_empty() {
            return Ok(current.into());
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/health_packages?id=eq.{}&select={}", package_id, HEALTH_PACKAGE_COLUMNS);
        let package: HealthPackage = self
            .supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(HealthPackageError::NotFound)?;

        info!("Updated health package {}", package_id);
        Ok(package.into())
    }

    /// Refuses while bookings reference the package.
    pub async fn delete_package(&self, package_id: i64) -> Result<(), HealthPackageError> {
        self.get_package(package_id).await?;

        let bookings = self
            .supabase
            .count(&format!("/rest/v1/health_package_bookings?select=id&package_id=eq.{}", package_id))
            .await?;
        if bookings > 0 {
            warn!("Refusing to delete package {} with {} bookings", package_id, bookings);
            return Err(HealthPackageError::HasBookings(bookings));
        }

        self.supabase
            .delete(&format!("/rest/v1/health_packages?id=eq.{}", package_id))
            .await?;
        info!("Deleted health package {}", package_id);
        Ok(())
    }

    pub async fn upload_image(&self, package_id: i64, upload: ImageUpload) -> Result<String, HealthPackageError> {
        let image_url = format!("/health-packages/{}/image", package_id);
        let update_data = json!({
            "image_data": upload.to_base64(),
            "image_content_type": upload.content_type,
            "image_url": image_url,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let path = format!("/rest/v1/health_packages?id=eq.{}&select=id", package_id);
        let updated: Option<Value> = self.supabase.update(&path, update_data).await?;
        if updated.is_none() {
            return Err(HealthPackageError::NotFound);
        }

        info!("Updated image for health package {}", package_id);
        Ok(image_url)
    }

    pub async fn get_image(&self, package_id: i64) -> Result<(String, String), HealthPackageError> {
        let path = format!(
            "/rest/v1/health_packages?select=image_data,image_content_type&id=eq.{}",
            package_id
        );
        let stored: StoredImage = self
            .supabase
            .select_one(&path)
            .await?
            .ok_or(HealthPackageError::NotFound)?;

        match stored.image_data {
            Some(data) if !data.is_empty() => Ok((
                data,
                stored.image_content_type.unwrap_or_else(|| "image/jpeg".to_string()),
            )),
            _ => Err(HealthPackageError::ImageNotFound),
        }
    }

    // ==============================================================================
    // PACKAGE TESTS
    // ==============================================================================

    async fn fetch_tests(&self, package_id: i64) -> Result<Vec<HealthPackageTest>, HealthPackageError> {
        let path = format!(
            "/rest/v1/health_package_tests?package_id=eq.{}&order=test_category.asc,test_name.asc",
            package_id
        );
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn list_tests(&self, package_id: i64) -> Result<Vec<HealthPackageTest>, HealthPackageError> {
        self.get_package(package_id).await?;
        self.fetch_tests(package_id).await
    }

    pub async fn create_test(
        &self,
        package_id: i64,
        request: CreatePackageTestRequest,
    ) -> Result<HealthPackageTest, HealthPackageError> {
        require_non_blank("Test name", &request.test_name).map_err(HealthPackageError::Validation)?;
        require_non_blank("Test category", &request.test_category).map_err(HealthPackageError::Validation)?;
        self.get_package(package_id).await?;

        let row = json!({
            "package_id": package_id,
            "test_name": request.test_name.trim(),
            "test_category": request.test_category.trim(),
            "test_description": request.test_description,
            "is_optional": request.is_optional,
        });

        let test: HealthPackageTest = self.supabase.insert("health_package_tests", row).await?;
        info!("Added test {} to health package {}", test.id, package_id);
        Ok(test)
    }

    pub async fn update_test(
        &self,
        test_id: i64,
        request: UpdatePackageTestRequest,
    ) -> Result<HealthPackageTest, HealthPackageError> {
        let mut update_data = Map::new();

        if let Some(test_name) = request.test_name {
            require_non_blank("Test name", &test_name).map_err(HealthPackageError::Validation)?;
            update_data.insert("test_name".to_string(), json!(test_name.trim()));
        }
        if let Some(test_category) = request.test_category {
            require_non_blank("Test category", &test_category).map_err(HealthPackageError::Validation)?;
            update_data.insert("test_category".to_string(), json!(test_category.trim()));
        }
        if let Some(test_description) = request.test_description {
            update_data.insert("test_description".to_string(), json!(test_description));
        }
        if let Some(is_optional) = request.is_optional {
            update_data.insert("is_optional".to_string(), json!(is_optional));
        }

        let path = format!("/rest/v1/health_package_tests?id=eq.{}", test_id);
        if update_data.is_empty() {
            return self
                .supabase
                .select_one(&path)
                .await?
                .ok_or(HealthPackageError::TestNotFound);
        }

        self.supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(HealthPackageError::TestNotFound)
    }

    pub async fn delete_test(&self, test_id: i64) -> Result<(), HealthPackageError> {
        let path = format!("/rest/v1/health_package_tests?id=eq.{}", test_id);
        if self.supabase.delete(&path).await? == 0 {
            return Err(HealthPackageError::TestNotFound);
        }
        info!("Deleted health package test {}", test_id);
        Ok(())
    }
}

pub fn validate_pricing(price: i64, original_price: Option<i64>) -> Result<(), HealthPackageError> {
    if price < 0 {
        return Err(HealthPackageError::Validation("Price cannot be negative".to_string()));
    }
    if let Some(original) = original_price {
        if original < price {
            return Err(HealthPackageError::Validation(
                "Original price cannot be lower than price".to_string(),
            ));
        }
    }
    Ok(())
}
