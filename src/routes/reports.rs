use crate::{catalog::ReportCatalog, errors::ApiError};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

pub async fn list_categories(
    catalog: web::Data<ReportCatalog>,
) -> Result<HttpResponse, ApiError> {
    let categories = catalog.list_categories().map_err(|e| {
        log::error!("error reading categories directory: {e}");
        ApiError::Internal("Unable to list categories".into())
    })?;
    Ok(HttpResponse::Ok().json(categories))
}

#[derive(Deserialize)]
pub struct ReportsQuery {
    pub category: Option<String>,
}

pub async fn list_reports(
    catalog: web::Data<ReportCatalog>,
    query: web::Query<ReportsQuery>,
) -> Result<HttpResponse, ApiError> {
    let category = match query.category.as_deref() {
        Some(c) if !c.is_empty() => c,
        _ => return Err(ApiError::BadRequest("Category is required.".into())),
    };
    let reports = catalog.list_reports(category)?;
    Ok(HttpResponse::Ok().json(reports))
}
