use bson::oid::ObjectId;

use crate::models::catalog::{ChildPolicy, EquipmentPrice, TransportRate};
use crate::models::offer::{
    Offer, OfferAdditionalServiceItem, OfferEquipmentItem, OfferHotelItem, OfferParkItem,
    OfferTransportItem,
};

#[derive(Debug)]
pub enum StoreError {
    Database(String),
    NotFound,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {}", err),
            StoreError::NotFound => write!(f, "Record not found"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The datastore seam the quote wizard writes through. The production
/// implementation is Mongo-backed; tests substitute an in-memory store.
pub trait OfferStore {
    async fn insert_offer(&self, offer: &Offer) -> Result<ObjectId, StoreError>;
    /// Overwrites the header's mutable fields (name, client, trip range,
    /// party, currency); code, total and created_at are left alone.
    async fn update_offer(&self, id: ObjectId, offer: &Offer) -> Result<(), StoreError>;
    async fn update_offer_total(&self, id: ObjectId, total: f64) -> Result<(), StoreError>;
    async fn find_offer(&self, id: ObjectId) -> Result<Option<Offer>, StoreError>;

    /// Deletes every item row for the offer, across all five category
    /// collections. First half of replace-all persistence.
    async fn clear_offer_items(&self, offer_id: ObjectId) -> Result<(), StoreError>;

    async fn insert_park_items(&self, items: &[OfferParkItem]) -> Result<(), StoreError>;
    async fn insert_hotel_items(&self, items: &[OfferHotelItem]) -> Result<(), StoreError>;
    async fn insert_equipment_items(&self, items: &[OfferEquipmentItem])
        -> Result<(), StoreError>;
    async fn insert_transport_items(&self, items: &[OfferTransportItem])
        -> Result<(), StoreError>;
    async fn insert_additional_service_items(
        &self,
        items: &[OfferAdditionalServiceItem],
    ) -> Result<(), StoreError>;

    async fn park_items(&self, offer_id: ObjectId) -> Result<Vec<OfferParkItem>, StoreError>;
    async fn hotel_items(&self, offer_id: ObjectId) -> Result<Vec<OfferHotelItem>, StoreError>;
    async fn equipment_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferEquipmentItem>, StoreError>;
    async fn transport_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferTransportItem>, StoreError>;
    async fn additional_service_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferAdditionalServiceItem>, StoreError>;

    /// Child pricing bands for one hotel, used when repricing hotel
    /// lines for the party's children.
    async fn child_policies_for(
        &self,
        hotel_id: ObjectId,
    ) -> Result<Vec<ChildPolicy>, StoreError>;

    /// First price row for the equipment item; when several exist the
    /// pick is unspecified.
    async fn equipment_price(
        &self,
        equipment_id: ObjectId,
    ) -> Result<Option<EquipmentPrice>, StoreError>;
    /// First rate row for the transport service; same first-match
    /// semantics as equipment.
    async fn transport_rate(
        &self,
        service_id: ObjectId,
    ) -> Result<Option<TransportRate>, StoreError>;
}
