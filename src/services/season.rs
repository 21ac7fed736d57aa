use chrono::NaiveDate;

use crate::models::catalog::{HotelRate, ParkProduct, SeasonWindow};

pub struct SeasonService;

impl SeasonService {
    /// True when the trip window touches the season window. Three checks,
    /// all endpoints inclusive: trip start inside the window, trip end
    /// inside the window, or the trip spans the whole window.
    pub fn matches_trip_window(
        trip_start: NaiveDate,
        trip_end: NaiveDate,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> bool {
        (trip_start >= window_start && trip_start <= window_end)
            || (trip_end >= window_start && trip_end <= window_end)
            || (trip_start <= window_start && trip_end >= window_end)
    }

    /// A seasonless entry is never filtered out by date.
    pub fn season_in_range(
        season: Option<&SeasonWindow>,
        trip_start: NaiveDate,
        trip_end: NaiveDate,
    ) -> bool {
        match season {
            Some(window) => Self::matches_trip_window(
                trip_start,
                trip_end,
                window.start_date,
                window.end_date,
            ),
            None => true,
        }
    }

    pub fn filter_park_products(
        products: Vec<ParkProduct>,
        trip_start: NaiveDate,
        trip_end: NaiveDate,
    ) -> Vec<ParkProduct> {
        products
            .into_iter()
            .filter(|p| Self::season_in_range(p.season.as_ref(), trip_start, trip_end))
            .collect()
    }

    pub fn filter_hotel_rates(
        rates: Vec<HotelRate>,
        trip_start: NaiveDate,
        trip_end: NaiveDate,
    ) -> Vec<HotelRate> {
        rates
            .into_iter()
            .filter(|r| Self::season_in_range(r.season.as_ref(), trip_start, trip_end))
            .collect()
    }
}
