use std::collections::HashMap;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::catalog::ChildPolicy;
use crate::models::line_items::Currency;
use crate::models::quote::QuoteDraft;

/// Per-category subtotals and the grand total for a draft.
///
/// The grand total sums every line's price regardless of its currency
/// tag; `by_currency` breaks the same lines down per currency so callers
/// can tell when a quote mixes USD and TZS. No conversion is applied.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteTotals {
    pub parks: f64,
    pub hotels: f64,
    pub equipment: f64,
    pub transport: f64,
    pub additional_services: f64,
    pub grand_total: f64,
    pub by_currency: HashMap<Currency, f64>,
}

/// Result of pricing one hotel stay for the whole party.
#[derive(Debug, Clone, Copy)]
pub struct HotelLinePrice {
    pub total: f64,
    /// Per-child nightly rate averaged over the party's children, for
    /// display. 0 when there are no children.
    pub child_average_rate: f64,
}

pub struct PricingService;

impl PricingService {
    /// Rate for one child at one hotel. The first policy band matching
    /// the hotel and age wins; a child with no matching band pays the
    /// full adult rate.
    pub fn child_rate(
        adult_rate: f64,
        child_age: u8,
        hotel_id: ObjectId,
        policies: &[ChildPolicy],
    ) -> f64 {
        policies
            .iter()
            .find(|p| {
                p.hotel_id == hotel_id && p.min_age <= child_age && child_age <= p.max_age
            })
            .map(|p| adult_rate * p.fee_percent / 100.0)
            .unwrap_or(adult_rate)
    }

    /// Park entry is per person per day; one rate covers adults and
    /// children alike.
    pub fn park_line_total(unit_price: f64, duration_days: u32, pax: u32) -> f64 {
        unit_price * duration_days as f64 * pax as f64
    }

    pub fn hotel_line_total(
        adult_rate: f64,
        adults: u32,
        nights: u32,
        child_ages: &[u8],
        hotel_id: ObjectId,
        policies: &[ChildPolicy],
    ) -> HotelLinePrice {
        let adult_total = adult_rate * adults as f64 * nights as f64;

        let child_nightly: f64 = child_ages
            .iter()
            .map(|&age| Self::child_rate(adult_rate, age, hotel_id, policies))
            .sum();
        let child_total = child_nightly * nights as f64;

        let child_average_rate = if child_ages.is_empty() {
            0.0
        } else {
            child_nightly / child_ages.len() as f64
        };

        HotelLinePrice {
            total: adult_total + child_total,
            child_average_rate,
        }
    }

    pub fn equipment_line_total(unit_price: f64, quantity: u32, duration_days: u32) -> f64 {
        unit_price * quantity as f64 * duration_days as f64
    }

    /// Transport is a flat charge per route/date; pax does not factor in.
    pub fn transport_line_total(unit_price: f64) -> f64 {
        unit_price
    }

    pub fn totals(draft: &QuoteDraft) -> QuoteTotals {
        let parks: f64 = draft.parks.iter().map(|s| s.price).sum();
        let hotels: f64 = draft.hotels.iter().map(|s| s.price).sum();
        let equipment: f64 = draft.equipment.iter().map(|s| s.price).sum();
        let transport: f64 = draft.transport.iter().map(|s| s.price).sum();
        let additional_services: f64 =
            draft.additional_services.iter().map(|s| s.price).sum();

        let mut by_currency: HashMap<Currency, f64> = HashMap::new();
        let tagged = draft
            .parks
            .iter()
            .map(|s| (s.currency, s.price))
            .chain(draft.hotels.iter().map(|s| (s.currency, s.price)))
            .chain(draft.equipment.iter().map(|s| (s.currency, s.price)))
            .chain(draft.transport.iter().map(|s| (s.currency, s.price)))
            .chain(
                draft
                    .additional_services
                    .iter()
                    .map(|s| (s.currency, s.price)),
            );
        for (currency, price) in tagged {
            *by_currency.entry(currency).or_insert(0.0) += price;
        }

        QuoteTotals {
            parks,
            hotels,
            equipment,
            transport,
            additional_services,
            grand_total: parks + hotels + equipment + transport + additional_services,
            by_currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line_items::{HotelSelection, ParkSelection};

    fn policy(hotel_id: ObjectId, min_age: u8, max_age: u8, fee_percent: f64) -> ChildPolicy {
        ChildPolicy {
            id: None,
            hotel_id,
            min_age,
            max_age,
            fee_percent,
            shares_bed: false,
        }
    }

    #[test]
    fn test_child_rate_without_policies_is_full_price() {
        let hotel = ObjectId::new();
        assert_eq!(PricingService::child_rate(100.0, 5, hotel, &[]), 100.0);
    }

    #[test]
    fn test_child_rate_with_matching_band() {
        let hotel = ObjectId::new();
        let policies = vec![policy(hotel, 0, 5, 50.0)];
        assert_eq!(PricingService::child_rate(100.0, 5, hotel, &policies), 50.0);
    }

    #[test]
    fn test_child_rate_ignores_other_hotels_bands() {
        let hotel = ObjectId::new();
        let other = ObjectId::new();
        let policies = vec![policy(other, 0, 12, 25.0)];
        assert_eq!(PricingService::child_rate(80.0, 6, hotel, &policies), 80.0);
    }

    #[test]
    fn test_child_rate_outside_band_falls_back_to_adult() {
        let hotel = ObjectId::new();
        let policies = vec![policy(hotel, 0, 5, 50.0)];
        assert_eq!(PricingService::child_rate(100.0, 9, hotel, &policies), 100.0);
    }

    #[test]
    fn test_park_line_total_ignores_adult_child_split() {
        // 4 pax for 2 days at 60: same figure whatever the split.
        assert_eq!(PricingService::park_line_total(60.0, 2, 4), 480.0);
    }

    #[test]
    fn test_hotel_line_total_with_child_discount() {
        let hotel = ObjectId::new();
        let policies = vec![policy(hotel, 0, 5, 50.0)];
        // 2 adults + 1 child (age 5, 50%) at 100/night for 3 nights.
        let price = PricingService::hotel_line_total(100.0, 2, 3, &[5], hotel, &policies);
        assert_eq!(price.total, 750.0);
        assert_eq!(price.child_average_rate, 50.0);
    }

    #[test]
    fn test_hotel_line_total_no_children_has_zero_average() {
        let hotel = ObjectId::new();
        let price = PricingService::hotel_line_total(100.0, 2, 3, &[], hotel, &[]);
        assert_eq!(price.total, 600.0);
        assert_eq!(price.child_average_rate, 0.0);
        assert!(!price.child_average_rate.is_nan());
    }

    #[test]
    fn test_equipment_and_transport_line_totals() {
        assert_eq!(PricingService::equipment_line_total(15.0, 2, 5), 150.0);
        assert_eq!(PricingService::transport_line_total(250.0), 250.0);
    }

    #[test]
    fn test_grand_total_sums_across_currencies() {
        let mut draft = QuoteDraft::new();
        draft.parks.push(ParkSelection {
            id: "p1".to_string(),
            park_id: ObjectId::new(),
            park_name: "Serengeti".to_string(),
            category: "National Park".to_string(),
            entry_type: "Non-Resident".to_string(),
            duration_days: 2,
            pax: 4,
            unit_price: 60.0,
            currency: Currency::Usd,
            price: 480.0,
        });
        draft.hotels.push(HotelSelection {
            id: "h1".to_string(),
            hotel_id: ObjectId::new(),
            hotel_name: "Mbali Mbali".to_string(),
            room_type: "Double".to_string(),
            meal_plan: "Full Board".to_string(),
            nights: 3,
            adult_rate: 150_000.0,
            child_average_rate: 0.0,
            currency: Currency::Tzs,
            price: 900_000.0,
        });

        let totals = PricingService::totals(&draft);
        assert_eq!(totals.parks, 480.0);
        assert_eq!(totals.hotels, 900_000.0);
        // Documented as-is behavior: no conversion before summing.
        assert_eq!(totals.grand_total, 900_480.0);
        assert_eq!(totals.by_currency[&Currency::Usd], 480.0);
        assert_eq!(totals.by_currency[&Currency::Tzs], 900_000.0);
    }
}
