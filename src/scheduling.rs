//! Consultation slot grid: 30-minute slots between 09:00 and 17:00 business time.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

pub const SLOT_MINUTES: u32 = 30;
pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 17;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SlotAvailability {
    /// `HH:MM`, 24h business time.
    pub time_slot: String,
    /// Human label, e.g. `9:30 AM`.
    pub label: String,
    pub available: bool,
}

/// Every slot start of a business day, in order.
pub fn day_slots() -> Vec<NaiveTime> {
    let per_hour = 60 / SLOT_MINUTES;
    (OPENING_HOUR * per_hour..CLOSING_HOUR * per_hour)
        .filter_map(|i| NaiveTime::from_hms_opt(i / per_hour, (i % per_hour) * SLOT_MINUTES, 0))
        .collect()
}

/// Slots still bookable on `date` when the business clock reads `now`.
pub fn slots_for_date(date: NaiveDate, now: NaiveDateTime) -> Vec<NaiveTime> {
    let today = now.date();
    if date < today {
        return Vec::new();
    }
    let slots = day_slots();
    if date > today {
        return slots;
    }
    slots.into_iter().filter(|slot| *slot > now.time()).collect()
}

pub fn is_elapsed(date: NaiveDate, slot: NaiveTime, now: NaiveDateTime) -> bool {
    date.and_time(slot) <= now
}

/// Parse `HH:MM` (or `H:MM`) and require it to sit on the slot grid.
pub fn parse_slot(text: &str) -> Result<NaiveTime, AppError> {
    let slot = NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| AppError::BadRequest(format!("invalid time slot '{text}', expected HH:MM")))?;

    let on_grid = slot.second() == 0 && slot.minute() % SLOT_MINUTES == 0;
    let in_hours = slot.hour() >= OPENING_HOUR && slot.hour() < CLOSING_HOUR;
    if !on_grid || !in_hours {
        return Err(AppError::BadRequest(format!(
            "time slot {text} is outside the {OPENING_HOUR}:00-{CLOSING_HOUR}:00 schedule"
        )));
    }
    Ok(slot)
}

pub fn format_slot(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

pub fn slot_label(slot: NaiveTime) -> String {
    slot.format("%-I:%M %p").to_string()
}

pub fn slot_end(slot: NaiveTime) -> NaiveTime {
    slot + Duration::minutes(i64::from(SLOT_MINUTES))
}

/// The whole day grid annotated with availability; `booked` holds `HH:MM` strings.
pub fn availability(date: NaiveDate, now: NaiveDateTime, booked: &[String]) -> Vec<SlotAvailability> {
    day_slots()
        .into_iter()
        .map(|slot| {
            let time_slot = format_slot(slot);
            let taken = booked.iter().any(|b| b == &time_slot);
            SlotAvailability {
                label: slot_label(slot),
                available: !taken && !is_elapsed(date, slot, now),
                time_slot,
            }
        })
        .collect()
}

/// Reject dates in the past or beyond the booking horizon.
pub fn check_bookable_date(date: NaiveDate, now: NaiveDateTime, horizon_days: i64) -> Result<(), AppError> {
    let today = now.date();
    if date < today {
        return Err(AppError::BadRequest("booking date is in the past".into()));
    }
    let horizon = Duration::try_days(horizon_days.max(0)).and_then(|d| today.checked_add_signed(d));
    if horizon.is_some_and(|last| date > last) {
        return Err(AppError::BadRequest(format!(
            "bookings open at most {horizon_days} days ahead"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn business_day_has_sixteen_half_hour_slots() {
        let slots = day_slots();
        assert_eq!(slots.len(), 16);
        assert_eq!(format_slot(slots[0]), "09:00");
        assert_eq!(format_slot(slots[15]), "16:30");
        assert_eq!(slot_end(slots[15]), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn today_only_offers_slots_after_now() {
        let slots = slots_for_date(day(), at(day(), 11, 0));
        assert_eq!(format_slot(slots[0]), "11:30");
        assert_eq!(slots.len(), 11);

        let slots = slots_for_date(day(), at(day(), 11, 10));
        assert_eq!(format_slot(slots[0]), "11:30");
    }

    #[test]
    fn past_and_future_dates() {
        let now = at(day(), 12, 0);
        assert!(slots_for_date(day().pred_opt().unwrap(), now).is_empty());
        assert_eq!(slots_for_date(day().succ_opt().unwrap(), now).len(), 16);
        assert!(slots_for_date(day(), at(day(), 17, 0)).is_empty());
    }

    #[test]
    fn parse_slot_requires_grid_and_hours() {
        assert_eq!(format_slot(parse_slot("9:30").unwrap()), "09:30");
        assert!(parse_slot("09:15").is_err());
        assert!(parse_slot("08:30").is_err());
        assert!(parse_slot("17:00").is_err());
        assert!(parse_slot("noon").is_err());
    }

    #[test]
    fn availability_marks_booked_and_elapsed() {
        let booked = vec!["14:00".to_string()];
        let grid = availability(day(), at(day(), 10, 0), &booked);
        let find = |slot: &str| grid.iter().find(|s| s.time_slot == slot).unwrap().available;
        assert!(!find("09:30"));
        assert!(!find("10:00"));
        assert!(find("10:30"));
        assert!(!find("14:00"));
        assert_eq!(grid.iter().find(|s| s.time_slot == "14:00").unwrap().label, "2:00 PM");
    }

    #[test]
    fn horizon_and_past_dates_are_rejected() {
        let now = at(day(), 9, 0);
        assert!(check_bookable_date(day(), now, 30).is_ok());
        assert!(check_bookable_date(day().pred_opt().unwrap(), now, 30).is_err());
        assert!(check_bookable_date(day() + Duration::days(31), now, 30).is_err());
    }

    #[test]
    fn huge_horizon_does_not_overflow() {
        let now = at(day(), 9, 0);
        assert!(check_bookable_date(day() + Duration::days(400), now, i64::MAX).is_ok());
        assert!(check_bookable_date(day().pred_opt().unwrap(), now, i64::MAX).is_err());
    }
}
