use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo_store::CATALOG_DB;
use crate::models::catalog::{
    AgeGroup, ChildPolicy, Country, EquipmentItem, Hotel, HotelRate, Park, ParkProduct,
    TransportService,
};
use crate::services::season::SeasonService;

/// Optional trip window for season filtering. Filtering only applies
/// when both dates are given.
#[derive(Debug, Deserialize)]
pub struct TripWindowQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/*
    /api/catalog/parks
*/
pub async fn get_parks(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Park> = client.database(CATALOG_DB).collection("Parks");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Park>>().await {
            Ok(parks) => HttpResponse::Ok().json(parks),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect parks.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find parks.")
        }
    }
}

/*
    /api/catalog/park-products?start=2025-07-01&end=2025-07-08
*/
pub async fn get_park_products(
    data: web::Data<Arc<Client>>,
    query: web::Query<TripWindowQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<ParkProduct> =
        client.database(CATALOG_DB).collection("ParkProducts");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<ParkProduct>>().await {
            Ok(products) => {
                let products = match (query.start, query.end) {
                    (Some(start), Some(end)) => {
                        SeasonService::filter_park_products(products, start, end)
                    }
                    _ => products,
                };
                HttpResponse::Ok().json(products)
            }
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect park products.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find park products.")
        }
    }
}

/*
    /api/catalog/hotels
*/
pub async fn get_hotels(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Hotel> = client.database(CATALOG_DB).collection("Hotels");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Hotel>>().await {
            Ok(hotels) => HttpResponse::Ok().json(hotels),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect hotels.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find hotels.")
        }
    }
}

/*
    /api/catalog/hotel-rates?start=2025-07-01&end=2025-07-08
*/
pub async fn get_hotel_rates(
    data: web::Data<Arc<Client>>,
    query: web::Query<TripWindowQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<HotelRate> =
        client.database(CATALOG_DB).collection("HotelRates");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<HotelRate>>().await {
            Ok(rates) => {
                let rates = match (query.start, query.end) {
                    (Some(start), Some(end)) => SeasonService::filter_hotel_rates(rates, start, end),
                    _ => rates,
                };
                HttpResponse::Ok().json(rates)
            }
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect hotel rates.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find hotel rates.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChildPolicyQuery {
    pub hotel_id: Option<String>,
}

/*
    /api/catalog/child-policies?hotel_id=...
*/
pub async fn get_child_policies(
    data: web::Data<Arc<Client>>,
    query: web::Query<ChildPolicyQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<ChildPolicy> =
        client.database(CATALOG_DB).collection("ChildPolicies");

    let filter = match &query.hotel_id {
        Some(raw) => match bson::oid::ObjectId::parse_str(raw) {
            Ok(id) => doc! { "hotel_id": id },
            Err(_) => return HttpResponse::BadRequest().body("Invalid hotel ID"),
        },
        None => doc! {},
    };

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<ChildPolicy>>().await {
            Ok(policies) => HttpResponse::Ok().json(policies),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect child policies.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find child policies.")
        }
    }
}

/*
    /api/catalog/equipment
*/
pub async fn get_equipment(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<EquipmentItem> =
        client.database(CATALOG_DB).collection("Equipment");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<EquipmentItem>>().await {
            Ok(items) => HttpResponse::Ok().json(items),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect equipment.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find equipment.")
        }
    }
}

/*
    /api/catalog/transport
*/
pub async fn get_transport_services(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<TransportService> =
        client.database(CATALOG_DB).collection("TransportServices");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<TransportService>>().await {
            Ok(services) => HttpResponse::Ok().json(services),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect transport services.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find transport services.")
        }
    }
}

/*
    /api/catalog/countries
*/
pub async fn get_countries(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Country> =
        client.database(CATALOG_DB).collection("Countries");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Country>>().await {
            Ok(countries) => HttpResponse::Ok().json(countries),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect countries.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find countries.")
        }
    }
}

/*
    /api/catalog/age-groups
*/
pub async fn get_age_groups(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<AgeGroup> =
        client.database(CATALOG_DB).collection("AgeGroups");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<AgeGroup>>().await {
            Ok(groups) => HttpResponse::Ok().json(groups),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect age groups.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find age groups.")
        }
    }
}
