use bson::oid::ObjectId;
use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::line_items::{
    AdditionalService, Currency, EquipmentSelection, HotelSelection, ParkSelection,
    TransportSelection,
};

/// The seven wizard steps, in order. Forward movement is gated by
/// per-step validation; backward movement and jumps are not.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ClientTrip,
    Parks,
    Accommodation,
    Equipment,
    Transport,
    AdditionalServices,
    Review,
}

impl WizardStep {
    pub const COUNT: usize = 7;

    pub fn index(&self) -> usize {
        match self {
            WizardStep::ClientTrip => 0,
            WizardStep::Parks => 1,
            WizardStep::Accommodation => 2,
            WizardStep::Equipment => 3,
            WizardStep::Transport => 4,
            WizardStep::AdditionalServices => 5,
            WizardStep::Review => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        match index {
            0 => Some(WizardStep::ClientTrip),
            1 => Some(WizardStep::Parks),
            2 => Some(WizardStep::Accommodation),
            3 => Some(WizardStep::Equipment),
            4 => Some(WizardStep::Transport),
            5 => Some(WizardStep::AdditionalServices),
            6 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(WizardStep::from_index)
    }
}

/// The in-progress quote. Owned by one draft session; selections are
/// never shared between drafts.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteDraft {
    pub client_id: Option<ObjectId>,
    pub client_name: String,
    pub client_country: String,
    pub client_email: Option<String>,
    pub trip_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub adults: u32,
    pub child_ages: Vec<u8>,
    pub parks: Vec<ParkSelection>,
    pub hotels: Vec<HotelSelection>,
    pub equipment: Vec<EquipmentSelection>,
    pub transport: Vec<TransportSelection>,
    pub additional_services: Vec<AdditionalService>,
    pub currency: Currency,
    /// Set once, on the first successful advance past the client/trip
    /// step, and reused for every later save of this draft.
    pub offer_id: Option<ObjectId>,
    pub step: WizardStep,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl QuoteDraft {
    pub fn new() -> Self {
        let now = DateTime::now();
        QuoteDraft {
            client_id: None,
            client_name: String::new(),
            client_country: String::new(),
            client_email: None,
            trip_type: String::new(),
            start_date: None,
            end_date: None,
            adults: 1,
            child_ages: Vec::new(),
            parks: Vec::new(),
            hotels: Vec::new(),
            equipment: Vec::new(),
            transport: Vec::new(),
            additional_services: Vec::new(),
            currency: Currency::Usd,
            offer_id: None,
            step: WizardStep::ClientTrip,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn children(&self) -> u32 {
        self.child_ages.len() as u32
    }

    pub fn pax(&self) -> u32 {
        self.adults + self.children()
    }

    /// Whole days between the trip dates, inclusive of the start day.
    /// 0 until both dates are set.
    pub fn trip_days(&self) -> u32 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => {
                (end - start).num_days() as u32 + 1
            }
            _ => 0,
        }
    }
}

impl Default for QuoteDraft {
    fn default() -> Self {
        QuoteDraft::new()
    }
}
