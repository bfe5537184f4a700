//! Slot availability rules for a booking request.
//!
//! The checks run in a fixed order and the first failing one decides the outcome:
//! past date, past time today, doctor lookup (done by the caller), self-booking,
//! working hours, and finally spacing against the doctor's other appointments that day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::doctor::doctor_models::Doctor;

/// Minimum distance between two appointments of one doctor on one day.
pub const MIN_GAP_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRejection {
    PastDate,
    PastTime,
    SelfBooking,
    OutsideWorkingHours,
    TooClose,
}

impl SlotRejection {
    pub fn message(&self) -> &'static str {
        match self {
            SlotRejection::PastDate => "Cannot book appointments on previous dates",
            SlotRejection::PastTime => "Please select upcoming date for appointment",
            SlotRejection::SelfBooking => "Can't book appointment with yourself",
            SlotRejection::OutsideWorkingHours => {
                "Appointment time is outside of doctor's working hours"
            }
            SlotRejection::TooClose => "Appointment slot not available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Availability {
    pub available: bool,
    pub reason: String,
}

impl Availability {
    pub fn from_check(check: Result<(), SlotRejection>) -> Self {
        match check {
            Ok(()) => Self {
                available: true,
                reason: "Appointment slot available".to_string(),
            },
            Err(rejection) => Self {
                available: false,
                reason: rejection.message().to_string(),
            },
        }
    }
}

/// Rejects dates before today and times not after `now` on today.
pub fn check_requested_moment(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), SlotRejection> {
    let today = now.date();
    if date < today {
        return Err(SlotRejection::PastDate);
    }
    if date == today && time <= now.time() {
        return Err(SlotRejection::PastTime);
    }
    Ok(())
}

/// Checks the doctor-specific rules. `booked` holds the times of every appointment
/// the doctor already has on the requested date.
pub fn check_doctor_slot(
    doctor: &Doctor,
    requester: Uuid,
    time: NaiveTime,
    booked: &[NaiveTime],
) -> Result<(), SlotRejection> {
    if doctor.user_id == requester {
        return Err(SlotRejection::SelfBooking);
    }
    if !doctor.works_at(time) {
        return Err(SlotRejection::OutsideWorkingHours);
    }
    let clashes = booked
        .iter()
        .any(|existing| minutes_between(*existing, time) < MIN_GAP_MINUTES);
    if clashes {
        return Err(SlotRejection::TooClose);
    }
    Ok(())
}

fn minutes_between(a: NaiveTime, b: NaiveTime) -> i64 {
    a.signed_duration_since(b).num_minutes().abs()
}
