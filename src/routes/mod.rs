use actix_web::web;

pub mod contact;
pub mod health;
pub mod reports;

/// API routes, shared between the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/project-report-categories",
                web::get().to(reports::list_categories),
            )
            .route("/project-reports", web::get().to(reports::list_reports))
            .route("/contact", web::post().to(contact::submit_contact))
            .route("/health", web::get().to(health::health_check)),
    );
}
