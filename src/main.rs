use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;
use sqlx::mysql::MySqlPoolOptions;
use std::env;

mod auth;
mod errors;
mod filters;
mod models;
mod ordering;
mod policy;
mod routes;
mod stats;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");

    let server_address = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    info!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("TaskFlow API") }))
            .configure(routes::auth_configure)
            .configure(routes::users_configure)
            .configure(routes::tasks_configure)
            .configure(routes::categories_configure)
            .configure(routes::comments_configure)
    })
    .bind(server_address.as_str())?
    .run()
    .await
}
