use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use safari_quote_api::db;
use safari_quote_api::db::mongo_store::MongoOfferStore;
use safari_quote_api::routes;
use safari_quote_api::routes::quote::DraftSessions;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    println!("Got MongoDB URI, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let store = web::Data::new(MongoOfferStore::new(client.clone()));
    let sessions = web::Data::new(DraftSessions::new());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(client.clone()))
            .app_data(store.clone())
            .app_data(sessions.clone())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/catalog")
                            .route("/parks", web::get().to(routes::catalog::get_parks))
                            .route(
                                "/park-products",
                                web::get().to(routes::catalog::get_park_products),
                            )
                            .route("/hotels", web::get().to(routes::catalog::get_hotels))
                            .route(
                                "/hotel-rates",
                                web::get().to(routes::catalog::get_hotel_rates),
                            )
                            .route(
                                "/child-policies",
                                web::get().to(routes::catalog::get_child_policies),
                            )
                            .route("/equipment", web::get().to(routes::catalog::get_equipment))
                            .route(
                                "/transport",
                                web::get().to(routes::catalog::get_transport_services),
                            )
                            .route("/countries", web::get().to(routes::catalog::get_countries))
                            .route(
                                "/age-groups",
                                web::get().to(routes::catalog::get_age_groups),
                            ),
                    )
                    .service(
                        web::scope("/quotes/drafts")
                            .route("", web::post().to(routes::quote::create_draft))
                            .route(
                                "/from-offer/{offer_id}",
                                web::post().to(routes::quote::draft_from_offer),
                            )
                            .route("/{id}", web::get().to(routes::quote::get_draft))
                            .route("/{id}", web::put().to(routes::quote::update_draft))
                            .route("/{id}/next", web::post().to(routes::quote::next_step))
                            .route(
                                "/{id}/previous",
                                web::post().to(routes::quote::previous_step),
                            )
                            .route(
                                "/{id}/goto/{step}",
                                web::post().to(routes::quote::goto_step),
                            )
                            .route("/{id}/totals", web::get().to(routes::quote::get_totals))
                            .route("/{id}/submit", web::post().to(routes::quote::submit_draft)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
