use std::sync::Arc;

use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::interface::{OfferStore, StoreError};
use crate::models::catalog::{ChildPolicy, EquipmentPrice, TransportRate};
use crate::models::offer::{
    Offer, OfferAdditionalServiceItem, OfferEquipmentItem, OfferHotelItem, OfferParkItem,
    OfferTransportItem,
};

pub const QUOTES_DB: &str = "Quotes";
pub const CATALOG_DB: &str = "Catalog";

const OFFERS: &str = "Offers";
const PARK_ITEMS: &str = "ParkItems";
const HOTEL_ITEMS: &str = "HotelItems";
const EQUIPMENT_ITEMS: &str = "EquipmentItems";
const TRANSPORT_ITEMS: &str = "TransportItems";
const ADDITIONAL_SERVICE_ITEMS: &str = "AdditionalServiceItems";

/// Mongo-backed `OfferStore`. Collections stand in for the relational
/// join tables; every item row carries its `offer_id`.
#[derive(Clone)]
pub struct MongoOfferStore {
    client: Arc<Client>,
}

impl MongoOfferStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn quotes(&self) -> Database {
        self.client.database(QUOTES_DB)
    }

    fn offers(&self) -> Collection<Offer> {
        self.quotes().collection(OFFERS)
    }

    async fn insert_items<T: Serialize + Send + Sync>(
        &self,
        collection: &str,
        items: &[T],
    ) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }
        self.quotes()
            .collection::<T>(collection)
            .insert_many(items)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    async fn items_for<T: DeserializeOwned + Send + Sync>(
        &self,
        collection: &str,
        offer_id: ObjectId,
    ) -> Result<Vec<T>, StoreError> {
        let cursor = self
            .quotes()
            .collection::<T>(collection)
            .find(doc! { "offer_id": offer_id })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl OfferStore for MongoOfferStore {
    async fn insert_offer(&self, offer: &Offer) -> Result<ObjectId, StoreError> {
        let result = self
            .offers()
            .insert_one(offer)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("Inserted offer has no ObjectId".to_string()))
    }

    async fn update_offer(&self, id: ObjectId, offer: &Offer) -> Result<(), StoreError> {
        let mut fields = bson::to_document(offer)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        // The code, running total and creation time are not header edits.
        fields.remove("_id");
        fields.remove("code");
        fields.remove("total");
        fields.remove("created_at");
        fields.insert("updated_at", DateTime::now());

        let result = self
            .offers()
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_offer_total(&self, id: ObjectId, total: f64) -> Result<(), StoreError> {
        let result = self
            .offers()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "total": total, "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_offer(&self, id: ObjectId) -> Result<Option<Offer>, StoreError> {
        self.offers()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn clear_offer_items(&self, offer_id: ObjectId) -> Result<(), StoreError> {
        let filter = doc! { "offer_id": offer_id };
        for collection in [
            PARK_ITEMS,
            HOTEL_ITEMS,
            EQUIPMENT_ITEMS,
            TRANSPORT_ITEMS,
            ADDITIONAL_SERVICE_ITEMS,
        ] {
            self.quotes()
                .collection::<bson::Document>(collection)
                .delete_many(filter.clone())
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        Ok(())
    }

    async fn insert_park_items(&self, items: &[OfferParkItem]) -> Result<(), StoreError> {
        self.insert_items(PARK_ITEMS, items).await
    }

    async fn insert_hotel_items(&self, items: &[OfferHotelItem]) -> Result<(), StoreError> {
        self.insert_items(HOTEL_ITEMS, items).await
    }

    async fn insert_equipment_items(
        &self,
        items: &[OfferEquipmentItem],
    ) -> Result<(), StoreError> {
        self.insert_items(EQUIPMENT_ITEMS, items).await
    }

    async fn insert_transport_items(
        &self,
        items: &[OfferTransportItem],
    ) -> Result<(), StoreError> {
        self.insert_items(TRANSPORT_ITEMS, items).await
    }

    async fn insert_additional_service_items(
        &self,
        items: &[OfferAdditionalServiceItem],
    ) -> Result<(), StoreError> {
        self.insert_items(ADDITIONAL_SERVICE_ITEMS, items).await
    }

    async fn park_items(&self, offer_id: ObjectId) -> Result<Vec<OfferParkItem>, StoreError> {
        self.items_for(PARK_ITEMS, offer_id).await
    }

    async fn hotel_items(&self, offer_id: ObjectId) -> Result<Vec<OfferHotelItem>, StoreError> {
        self.items_for(HOTEL_ITEMS, offer_id).await
    }

    async fn equipment_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferEquipmentItem>, StoreError> {
        self.items_for(EQUIPMENT_ITEMS, offer_id).await
    }

    async fn transport_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferTransportItem>, StoreError> {
        self.items_for(TRANSPORT_ITEMS, offer_id).await
    }

    async fn additional_service_items(
        &self,
        offer_id: ObjectId,
    ) -> Result<Vec<OfferAdditionalServiceItem>, StoreError> {
        self.items_for(ADDITIONAL_SERVICE_ITEMS, offer_id).await
    }

    async fn child_policies_for(
        &self,
        hotel_id: ObjectId,
    ) -> Result<Vec<ChildPolicy>, StoreError> {
        let cursor = self
            .client
            .database(CATALOG_DB)
            .collection::<ChildPolicy>("ChildPolicies")
            .find(doc! { "hotel_id": hotel_id })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn equipment_price(
        &self,
        equipment_id: ObjectId,
    ) -> Result<Option<EquipmentPrice>, StoreError> {
        self.client
            .database(CATALOG_DB)
            .collection::<EquipmentPrice>("EquipmentPrices")
            .find_one(doc! { "equipment_id": equipment_id })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn transport_rate(
        &self,
        service_id: ObjectId,
    ) -> Result<Option<TransportRate>, StoreError> {
        self.client
            .database(CATALOG_DB)
            .collection::<TransportRate>("TransportRates")
            .find_one(doc! { "service_id": service_id })
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
