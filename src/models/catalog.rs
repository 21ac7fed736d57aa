use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::line_items::Currency;

/// A named validity interval attached to a priced catalog entry. Both
/// endpoints are inclusive. A priced entry without a window is valid for
/// any trip date.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeasonWindow {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Park {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub region: String,
}

/// A priced park offering: one park, one visitor category and entry
/// type, one per-person per-day rate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParkProduct {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub park_id: ObjectId,
    pub park_name: String,
    pub category: String,
    pub entry_type: String,
    pub unit_price: f64,
    pub currency: Currency,
    pub season: Option<SeasonWindow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub area: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HotelRate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub hotel_id: ObjectId,
    pub hotel_name: String,
    pub room_type: String,
    pub meal_plan: String,
    pub adult_rate: f64,
    pub currency: Currency,
    pub season: Option<SeasonWindow>,
}

/// Per-hotel age-banded child pricing rule. A child whose age matches no
/// band for the hotel pays the full adult rate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChildPolicy {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub hotel_id: ObjectId,
    pub min_age: u8,
    pub max_age: u8,
    pub fee_percent: f64,
    pub shares_bed: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EquipmentItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EquipmentPrice {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub equipment_id: ObjectId,
    pub unit_price: f64,
    pub currency: Currency,
    pub season: Option<SeasonWindow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TransportService {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub route: String,
    pub vehicle_type: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TransportRate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub service_id: ObjectId,
    pub unit_price: f64,
    pub currency: Currency,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Country {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgeGroup {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub label: String,
    pub min_age: u8,
    pub max_age: u8,
}
