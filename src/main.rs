use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;
use report_portal::catalog::ReportCatalog;
use report_portal::config::Config;
use report_portal::routes;
use report_portal::store::ContactStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::from_env_config();

    let catalog = Data::new(ReportCatalog::new(
        cfg.reports_dir.clone(),
        cfg.reports_public_prefix.clone(),
    ));
    let store = Data::new(ContactStore::new(cfg.contacts_file.clone()));
    let cfg_data = Data::new(cfg.clone());

    log::info!("Starting server at {}", cfg.listen);

    let listen_addr = cfg.listen.clone();
    let public_dir = cfg.public_dir.clone();
    HttpServer::new(move || {
        let cors = Cors::permissive()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(cfg_data.clone())
            .app_data(catalog.clone())
            .app_data(store.clone())
            .configure(routes::configure)
            .service(actix_files::Files::new("/", &public_dir).index_file("index.html"))
    })
    .bind(listen_addr)?
    .run()
    .await
}
