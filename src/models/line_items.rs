use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two currencies quotes can be priced in. No others are supported.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "TZS")]
    Tzs,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Tzs => write!(f, "TZS"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParkSelection {
    pub id: String,
    pub park_id: ObjectId,
    pub park_name: String,
    pub category: String,
    pub entry_type: String,
    pub duration_days: u32,
    pub pax: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HotelSelection {
    pub id: String,
    pub hotel_id: ObjectId,
    pub hotel_name: String,
    pub room_type: String,
    pub meal_plan: String,
    pub nights: u32,
    pub adult_rate: f64,
    /// Average per-child nightly rate, kept for display. 0 when the party
    /// has no children.
    pub child_average_rate: f64,
    pub currency: Currency,
    pub price: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EquipmentSelection {
    pub id: String,
    pub equipment_id: ObjectId,
    pub name: String,
    pub quantity: u32,
    pub duration_days: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TransportSelection {
    pub id: String,
    pub service_id: ObjectId,
    pub route: String,
    pub vehicle_type: String,
    pub travel_date: Option<NaiveDate>,
    /// Recorded from the form but not priced; transport is a flat charge
    /// per route/date.
    pub pax: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub price: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdditionalService {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: Currency,
}
