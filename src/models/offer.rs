use bson::oid::ObjectId;
use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::line_items::Currency;

/// The persisted quote header. Item rows reference it by `offer_id` and
/// are replaced wholesale on every submission.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Offer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    pub name: String,
    pub client_id: Option<ObjectId>,
    pub client_name: String,
    pub client_country: String,
    pub client_email: Option<String>,
    pub trip_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adults: u32,
    pub child_ages: Vec<u8>,
    pub currency: Currency,
    pub total: f64,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfferParkItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub offer_id: ObjectId,
    pub park_id: ObjectId,
    pub park_name: String,
    pub category: String,
    pub entry_type: String,
    pub duration_days: u32,
    pub pax: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfferHotelItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub offer_id: ObjectId,
    pub hotel_id: ObjectId,
    pub hotel_name: String,
    pub room_type: String,
    pub meal_plan: String,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub adult_rate: f64,
    pub child_average_rate: f64,
    pub currency: Currency,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfferEquipmentItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub offer_id: ObjectId,
    pub equipment_id: ObjectId,
    /// The backing price row the selection resolved to at submission
    /// time (first match when several exist).
    pub price_id: Option<ObjectId>,
    pub name: String,
    pub quantity: u32,
    pub duration_days: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfferTransportItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub offer_id: ObjectId,
    pub service_id: ObjectId,
    pub rate_id: Option<ObjectId>,
    pub route: String,
    pub vehicle_type: String,
    pub travel_date: Option<NaiveDate>,
    pub pax: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfferAdditionalServiceItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub offer_id: ObjectId,
    pub name: String,
    pub price: f64,
    pub currency: Currency,
    pub description: String,
}
