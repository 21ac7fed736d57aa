use std::collections::HashMap;

use mongodb::bson::DateTime;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::db::interface::{OfferStore, StoreError};
use crate::models::offer::{
    Offer, OfferAdditionalServiceItem, OfferEquipmentItem, OfferHotelItem, OfferParkItem,
    OfferTransportItem,
};
use crate::models::quote::{QuoteDraft, WizardStep};
use crate::services::pricing::{PricingService, QuoteTotals};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StepValidation {
    pub errors: HashMap<String, String>,
    pub is_valid: bool,
}

impl StepValidation {
    fn from_errors(errors: HashMap<String, String>) -> Self {
        let is_valid = errors.is_empty();
        StepValidation { errors, is_valid }
    }
}

#[derive(Debug)]
pub enum WizardError {
    Validation(StepValidation),
    IncompleteDraft(String),
    Store(StoreError),
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardError::Validation(v) => {
                write!(f, "Step validation failed: {} field(s)", v.errors.len())
            }
            WizardError::IncompleteDraft(msg) => write!(f, "Incomplete draft: {}", msg),
            WizardError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for WizardError {}

impl From<StoreError> for WizardError {
    fn from(err: StoreError) -> Self {
        WizardError::Store(err)
    }
}

/// The quote draft controller. Owns no state itself; every operation
/// takes the draft and (where persistence happens) the store.
pub struct QuoteWizard;

impl QuoteWizard {
    /// Step-specific gate for forward navigation. Backward moves and
    /// jumps never call this.
    pub fn validate_step(draft: &QuoteDraft, step: WizardStep) -> StepValidation {
        let mut errors = HashMap::new();
        match step {
            WizardStep::ClientTrip => {
                if draft.client_name.trim().is_empty() {
                    errors.insert(
                        "client_name".to_string(),
                        "Client name is required".to_string(),
                    );
                }
                if draft.start_date.is_none() {
                    errors.insert(
                        "start_date".to_string(),
                        "Start date is required".to_string(),
                    );
                }
                match (draft.start_date, draft.end_date) {
                    (_, None) => {
                        errors.insert(
                            "end_date".to_string(),
                            "End date is required".to_string(),
                        );
                    }
                    (Some(start), Some(end)) if end < start => {
                        errors.insert(
                            "end_date".to_string(),
                            "End date must not be before the start date".to_string(),
                        );
                    }
                    _ => {}
                }
                if draft.client_country.trim().is_empty() {
                    errors.insert(
                        "client_country".to_string(),
                        "Client country is required".to_string(),
                    );
                }
                if draft.adults < 1 {
                    errors.insert(
                        "adults".to_string(),
                        "At least one adult is required".to_string(),
                    );
                }
            }
            WizardStep::Parks => {
                if draft.parks.is_empty() {
                    errors.insert(
                        "parks".to_string(),
                        "Select at least one park".to_string(),
                    );
                }
            }
            // The remaining steps have no blocking validation.
            _ => {}
        }
        StepValidation::from_errors(errors)
    }

    pub fn generate_offer_code() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        format!("QT-{}", suffix)
    }

    pub fn compose_offer_name(draft: &QuoteDraft) -> String {
        let range = match (draft.start_date, draft.end_date) {
            (Some(start), Some(end)) => format!("{} to {}", start, end),
            _ => String::new(),
        };
        let trip_type = if draft.trip_type.trim().is_empty() {
            "Safari".to_string()
        } else {
            draft.trip_type.clone()
        };
        format!("{} - {} ({})", draft.client_name, trip_type, range)
    }

    /// Reprices every selection from its unit rate and the party
    /// composition; client-supplied price fields are never trusted.
    /// Hotel lines pull the hotel's child policy bands from the store.
    /// A park or equipment selection with no duration falls back to the
    /// trip length. Additional services keep their entered flat price.
    pub async fn reprice<S: OfferStore>(
        store: &S,
        draft: &mut QuoteDraft,
    ) -> Result<(), WizardError> {
        let pax = draft.pax();
        let trip_days = draft.trip_days();
        let adults = draft.adults;
        let child_ages = draft.child_ages.clone();

        for s in &mut draft.parks {
            if s.duration_days == 0 {
                s.duration_days = trip_days;
            }
            s.pax = pax;
            s.price = PricingService::park_line_total(s.unit_price, s.duration_days, s.pax);
        }

        for s in &mut draft.hotels {
            let policies = store.child_policies_for(s.hotel_id).await?;
            let priced = PricingService::hotel_line_total(
                s.adult_rate,
                adults,
                s.nights,
                &child_ages,
                s.hotel_id,
                &policies,
            );
            s.price = priced.total;
            s.child_average_rate = priced.child_average_rate;
        }

        for s in &mut draft.equipment {
            if s.duration_days == 0 {
                s.duration_days = trip_days;
            }
            s.price =
                PricingService::equipment_line_total(s.unit_price, s.quantity, s.duration_days);
        }

        for s in &mut draft.transport {
            s.price = PricingService::transport_line_total(s.unit_price);
        }

        Ok(())
    }

    /// Validates the current step and moves forward. Leaving the
    /// client/trip step persists the offer header: an insert the first
    /// time, an update of the same header on every later pass.
    pub async fn advance<S: OfferStore>(
        store: &S,
        draft: &mut QuoteDraft,
    ) -> Result<WizardStep, WizardError> {
        let current = draft.step;
        let validation = Self::validate_step(draft, current);
        if !validation.is_valid {
            return Err(WizardError::Validation(validation));
        }

        Self::reprice(store, draft).await?;

        let next = match current.next() {
            Some(step) => step,
            None => return Ok(current),
        };

        if current == WizardStep::ClientTrip {
            Self::save_offer_header(store, draft).await?;
        }

        draft.step = next;
        draft.updated_at = Some(DateTime::now());
        Ok(next)
    }

    /// Always allowed; no validation on the way back.
    pub fn go_back(draft: &mut QuoteDraft) -> WizardStep {
        if let Some(previous) = draft.step.previous() {
            draft.step = previous;
        }
        draft.step
    }

    /// Direct jump by index, also unvalidated.
    pub fn jump_to(draft: &mut QuoteDraft, index: usize) -> Option<WizardStep> {
        let step = WizardStep::from_index(index)?;
        draft.step = step;
        Some(step)
    }

    async fn save_offer_header<S: OfferStore>(
        store: &S,
        draft: &mut QuoteDraft,
    ) -> Result<(), WizardError> {
        let (start_date, end_date) = match (draft.start_date, draft.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(WizardError::IncompleteDraft(
                    "trip dates are not set".to_string(),
                ))
            }
        };

        let now = DateTime::now();
        let offer = Offer {
            id: draft.offer_id,
            code: Self::generate_offer_code(),
            name: Self::compose_offer_name(draft),
            client_id: draft.client_id,
            client_name: draft.client_name.clone(),
            client_country: draft.client_country.clone(),
            client_email: draft.client_email.clone(),
            trip_type: draft.trip_type.clone(),
            start_date,
            end_date,
            adults: draft.adults,
            child_ages: draft.child_ages.clone(),
            currency: draft.currency,
            total: 0.0,
            created_at: Some(now),
            updated_at: Some(now),
        };

        match draft.offer_id {
            Some(id) => {
                store.update_offer(id, &offer).await?;
            }
            None => {
                let id = store.insert_offer(&offer).await?;
                draft.offer_id = Some(id);
            }
        }
        Ok(())
    }

    /// Final submission, leaving the review step: refresh the header
    /// total, then replace every item row for the offer with the current
    /// in-memory selections. Categories are written one after another;
    /// an error aborts the fan-out without rolling back categories
    /// already written.
    pub async fn submit<S: OfferStore>(
        store: &S,
        draft: &mut QuoteDraft,
    ) -> Result<QuoteTotals, WizardError> {
        let offer_id = draft.offer_id.ok_or_else(|| {
            WizardError::IncompleteDraft("no persisted offer header for this draft".to_string())
        })?;

        Self::reprice(store, draft).await?;
        let totals = PricingService::totals(draft);
        store.update_offer_total(offer_id, totals.grand_total).await?;
        store.clear_offer_items(offer_id).await?;

        let park_items: Vec<OfferParkItem> = draft
            .parks
            .iter()
            .map(|s| OfferParkItem {
                id: None,
                offer_id,
                park_id: s.park_id,
                park_name: s.park_name.clone(),
                category: s.category.clone(),
                entry_type: s.entry_type.clone(),
                duration_days: s.duration_days,
                pax: s.pax,
                unit_price: s.unit_price,
                currency: s.currency,
                price: s.price,
                description: format!(
                    "{} - {} ({}) for {} days",
                    s.park_name, s.category, s.entry_type, s.duration_days
                ),
            })
            .collect();
        store.insert_park_items(&park_items).await?;

        let hotel_items: Vec<OfferHotelItem> = draft
            .hotels
            .iter()
            .map(|s| OfferHotelItem {
                id: None,
                offer_id,
                hotel_id: s.hotel_id,
                hotel_name: s.hotel_name.clone(),
                room_type: s.room_type.clone(),
                meal_plan: s.meal_plan.clone(),
                nights: s.nights,
                adults: draft.adults,
                children: draft.children(),
                adult_rate: s.adult_rate,
                child_average_rate: s.child_average_rate,
                currency: s.currency,
                price: s.price,
                description: format!(
                    "{} - {} ({}) for {} nights",
                    s.hotel_name, s.room_type, s.meal_plan, s.nights
                ),
            })
            .collect();
        store.insert_hotel_items(&hotel_items).await?;

        // Equipment and transport resolve their backing price/rate row
        // first; an unresolvable item is skipped, not fatal.
        let mut equipment_items = Vec::new();
        for s in &draft.equipment {
            match store.equipment_price(s.equipment_id).await? {
                Some(price_row) => equipment_items.push(OfferEquipmentItem {
                    id: None,
                    offer_id,
                    equipment_id: s.equipment_id,
                    price_id: price_row.id,
                    name: s.name.clone(),
                    quantity: s.quantity,
                    duration_days: s.duration_days,
                    unit_price: s.unit_price,
                    currency: s.currency,
                    price: s.price,
                    description: format!(
                        "{} x{} for {} days",
                        s.name, s.quantity, s.duration_days
                    ),
                }),
                None => {
                    println!(
                        "No price row for equipment {}, skipping item",
                        s.equipment_id
                    );
                }
            }
        }
        store.insert_equipment_items(&equipment_items).await?;

        let mut transport_items = Vec::new();
        for s in &draft.transport {
            match store.transport_rate(s.service_id).await? {
                Some(rate_row) => transport_items.push(OfferTransportItem {
                    id: None,
                    offer_id,
                    service_id: s.service_id,
                    rate_id: rate_row.id,
                    route: s.route.clone(),
                    vehicle_type: s.vehicle_type.clone(),
                    travel_date: s.travel_date,
                    pax: s.pax,
                    unit_price: s.unit_price,
                    currency: s.currency,
                    price: s.price,
                    description: match s.travel_date {
                        Some(date) => {
                            format!("{} ({}) on {}", s.route, s.vehicle_type, date)
                        }
                        None => format!("{} ({})", s.route, s.vehicle_type),
                    },
                }),
                None => {
                    println!(
                        "No rate row for transport service {}, skipping item",
                        s.service_id
                    );
                }
            }
        }
        store.insert_transport_items(&transport_items).await?;

        let additional_items: Vec<OfferAdditionalServiceItem> = draft
            .additional_services
            .iter()
            .map(|s| OfferAdditionalServiceItem {
                id: None,
                offer_id,
                name: s.name.clone(),
                price: s.price,
                currency: s.currency,
                description: format!("{} ({} {})", s.name, s.currency, s.price),
            })
            .collect();
        store
            .insert_additional_service_items(&additional_items)
            .await?;

        draft.updated_at = Some(DateTime::now());
        Ok(totals)
    }

    /// Rebuilds an editable draft from a persisted offer and its item
    /// rows, positioned on the review step.
    pub async fn hydrate_from_offer<S: OfferStore>(
        store: &S,
        offer_id: bson::oid::ObjectId,
    ) -> Result<QuoteDraft, WizardError> {
        let offer = store
            .find_offer(offer_id)
            .await?
            .ok_or(WizardError::Store(StoreError::NotFound))?;

        let mut draft = QuoteDraft::new();
        draft.client_id = offer.client_id;
        draft.client_name = offer.client_name;
        draft.client_country = offer.client_country;
        draft.client_email = offer.client_email;
        draft.trip_type = offer.trip_type;
        draft.start_date = Some(offer.start_date);
        draft.end_date = Some(offer.end_date);
        draft.adults = offer.adults;
        draft.child_ages = offer.child_ages;
        draft.currency = offer.currency;
        draft.offer_id = Some(offer_id);
        draft.created_at = offer.created_at;
        draft.step = WizardStep::Review;

        draft.parks = store
            .park_items(offer_id)
            .await?
            .into_iter()
            .map(|item| crate::models::line_items::ParkSelection {
                id: item.id.map(|i| i.to_hex()).unwrap_or_default(),
                park_id: item.park_id,
                park_name: item.park_name,
                category: item.category,
                entry_type: item.entry_type,
                duration_days: item.duration_days,
                pax: item.pax,
                unit_price: item.unit_price,
                currency: item.currency,
                price: item.price,
            })
            .collect();

        draft.hotels = store
            .hotel_items(offer_id)
            .await?
            .into_iter()
            .map(|item| crate::models::line_items::HotelSelection {
                id: item.id.map(|i| i.to_hex()).unwrap_or_default(),
                hotel_id: item.hotel_id,
                hotel_name: item.hotel_name,
                room_type: item.room_type,
                meal_plan: item.meal_plan,
                nights: item.nights,
                adult_rate: item.adult_rate,
                child_average_rate: item.child_average_rate,
                currency: item.currency,
                price: item.price,
            })
            .collect();

        draft.equipment = store
            .equipment_items(offer_id)
            .await?
            .into_iter()
            .map(|item| crate::models::line_items::EquipmentSelection {
                id: item.id.map(|i| i.to_hex()).unwrap_or_default(),
                equipment_id: item.equipment_id,
                name: item.name,
                quantity: item.quantity,
                duration_days: item.duration_days,
                unit_price: item.unit_price,
                currency: item.currency,
                price: item.price,
            })
            .collect();

        draft.transport = store
            .transport_items(offer_id)
            .await?
            .into_iter()
            .map(|item| crate::models::line_items::TransportSelection {
                id: item.id.map(|i| i.to_hex()).unwrap_or_default(),
                service_id: item.service_id,
                route: item.route,
                vehicle_type: item.vehicle_type,
                travel_date: item.travel_date,
                pax: item.pax,
                unit_price: item.unit_price,
                currency: item.currency,
                price: item.price,
            })
            .collect();

        draft.additional_services = store
            .additional_service_items(offer_id)
            .await?
            .into_iter()
            .map(|item| crate::models::line_items::AdditionalService {
                id: item.id.map(|i| i.to_hex()).unwrap_or_default(),
                name: item.name,
                price: item.price,
                currency: item.currency,
            })
            .collect();

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_client_trip_step_collects_all_field_errors() {
        let mut draft = QuoteDraft::new();
        draft.adults = 0;
        draft.client_country = "Germany".to_string();

        let validation = QuoteWizard::validate_step(&draft, WizardStep::ClientTrip);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 4);
        assert!(validation.errors.contains_key("client_name"));
        assert!(validation.errors.contains_key("start_date"));
        assert!(validation.errors.contains_key("end_date"));
        assert!(validation.errors.contains_key("adults"));
    }

    #[test]
    fn test_client_trip_step_passes_when_filled() {
        let mut draft = QuoteDraft::new();
        draft.client_name = "Jane Doe".to_string();
        draft.client_country = "Germany".to_string();
        draft.start_date = Some(date(2025, 7, 1));
        draft.end_date = Some(date(2025, 7, 8));
        draft.adults = 2;

        let validation = QuoteWizard::validate_step(&draft, WizardStep::ClientTrip);
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut draft = QuoteDraft::new();
        draft.client_name = "Jane Doe".to_string();
        draft.client_country = "Germany".to_string();
        draft.start_date = Some(date(2025, 7, 8));
        draft.end_date = Some(date(2025, 7, 1));

        let validation = QuoteWizard::validate_step(&draft, WizardStep::ClientTrip);
        assert!(!validation.is_valid);
        assert!(validation.errors.contains_key("end_date"));
    }

    #[test]
    fn test_parks_step_requires_a_selection() {
        let draft = QuoteDraft::new();
        let validation = QuoteWizard::validate_step(&draft, WizardStep::Parks);
        assert!(!validation.is_valid);
        assert!(validation.errors.contains_key("parks"));
    }

    #[test]
    fn test_later_steps_have_no_blocking_validation() {
        let draft = QuoteDraft::new();
        for step in [
            WizardStep::Accommodation,
            WizardStep::Equipment,
            WizardStep::Transport,
            WizardStep::AdditionalServices,
            WizardStep::Review,
        ] {
            assert!(QuoteWizard::validate_step(&draft, step).is_valid);
        }
    }

    #[test]
    fn test_navigation_back_and_jump_ignore_validation() {
        let mut draft = QuoteDraft::new();
        draft.step = WizardStep::Accommodation;
        assert_eq!(QuoteWizard::go_back(&mut draft), WizardStep::Parks);
        assert_eq!(
            QuoteWizard::jump_to(&mut draft, 6),
            Some(WizardStep::Review)
        );
        assert_eq!(QuoteWizard::jump_to(&mut draft, 7), None);
        assert_eq!(draft.step, WizardStep::Review);
    }

    #[test]
    fn test_offer_code_shape() {
        let code = QuoteWizard::generate_offer_code();
        assert!(code.starts_with("QT-"));
        assert_eq!(code.len(), 9);
        assert!(code[3..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_offer_name_composition() {
        let mut draft = QuoteDraft::new();
        draft.client_name = "Jane Doe".to_string();
        draft.trip_type = "Honeymoon".to_string();
        draft.start_date = Some(date(2025, 7, 1));
        draft.end_date = Some(date(2025, 7, 8));
        assert_eq!(
            QuoteWizard::compose_offer_name(&draft),
            "Jane Doe - Honeymoon (2025-07-01 to 2025-07-08)"
        );
    }
}
