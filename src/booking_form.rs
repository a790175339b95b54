// Booking form: field validation and the create/edit submission workflow

use crate::api_client::{ApiError, VenueApi, GENERIC_FAILURE};
use crate::availability::Availability;
use crate::config::ClientConfig;
use crate::venue::{Booking, BookingPayload};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const BOOKING_CREATED: &str = "Booking created successfully";
pub const BOOKING_UPDATED: &str = "Booking updated successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookingField {
    DateFrom,
    DateTo,
    Guests,
    // The date range as a whole, for availability conflicts
    Dates,
}

impl BookingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::DateFrom => "dateFrom",
            BookingField::DateTo => "dateTo",
            BookingField::Guests => "guests",
            BookingField::Dates => "dates",
        }
    }
}

// One human-readable message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<BookingField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: BookingField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: BookingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: BookingField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookingField, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.as_str(), message)?;
            first = false;
        }
        Ok(())
    }
}

// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFormInput {
    pub date_from: String,
    pub date_to: String,
    pub guests: String,
}

impl BookingFormInput {
    pub fn new(date_from: &str, date_to: &str, guests: &str) -> Self {
        Self {
            date_from: date_from.to_string(),
            date_to: date_to.to_string(),
            guests: guests.to_string(),
        }
    }

    // Prefills the form from an existing booking (edit mode).
    pub fn from_booking(booking: &Booking) -> Self {
        let (from, to) = booking.date_range();
        Self {
            date_from: from.to_string(),
            date_to: to.to_string(),
            guests: booking.guests.to_string(),
        }
    }

    pub fn set(&mut self, field: BookingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            BookingField::DateFrom => self.date_from = value,
            BookingField::DateTo => self.date_to = value,
            BookingField::Guests => self.guests = value,
            BookingField::Dates => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormPolicy {
    pub enforce_availability_check: bool,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            enforce_availability_check: true,
        }
    }
}

impl From<&ClientConfig> for FormPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            enforce_availability_check: config.enforce_availability_check,
        }
    }
}

// Everything about the venue the validator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingContext {
    pub venue_id: String,
    pub max_guests: u32,
    pub availability: Availability,
    pub policy: FormPolicy,
}

enum Parsed<T> {
    Missing,
    Invalid,
    Value(T),
}

fn parse_date(raw: &str) -> Parsed<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::Missing;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Parsed::Value(date);
    }
    // Prefilled values may carry the API's full timestamp
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Parsed::Value(timestamp.with_timezone(&Utc).date_naive()),
        Err(_) => Parsed::Invalid,
    }
}

fn parse_guests(raw: &str) -> Parsed<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::Missing;
    }
    match raw.parse::<i64>() {
        Ok(guests) => Parsed::Value(guests),
        Err(_) => Parsed::Invalid,
    }
}

// Checks every rule independently and either returns the normalized payload
// or one message per failing field. `today` is the day of validation.
pub fn validate(
    input: &BookingFormInput,
    ctx: &BookingContext,
    today: NaiveDate,
) -> Result<BookingPayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let date_from = match parse_date(&input.date_from) {
        Parsed::Missing => {
            errors.insert(BookingField::DateFrom, "Start date is required");
            None
        }
        Parsed::Invalid => {
            errors.insert(BookingField::DateFrom, "Please enter a valid date");
            None
        }
        Parsed::Value(date) if date < today => {
            errors.insert(BookingField::DateFrom, "Date cannot be in the past");
            None
        }
        Parsed::Value(date) => Some(date),
    };

    let date_to = match parse_date(&input.date_to) {
        Parsed::Missing => {
            errors.insert(BookingField::DateTo, "End date is required");
            None
        }
        Parsed::Invalid => {
            errors.insert(BookingField::DateTo, "Please enter a valid date");
            None
        }
        Parsed::Value(date) => match parse_date(&input.date_from) {
            Parsed::Value(from) if date < from => {
                errors.insert(
                    BookingField::DateTo,
                    "End date cannot be earlier than start date",
                );
                None
            }
            _ => Some(date),
        },
    };

    let max_guests = ctx.max_guests.max(1);
    let guests = match parse_guests(&input.guests) {
        Parsed::Missing => {
            errors.insert(BookingField::Guests, "Number of guests is required");
            None
        }
        Parsed::Invalid => {
            errors.insert(BookingField::Guests, "Please enter a valid number");
            None
        }
        Parsed::Value(guests) if guests < 1 => {
            errors.insert(BookingField::Guests, "Minimum 1 guest required");
            None
        }
        Parsed::Value(guests) if guests > i64::from(max_guests) => {
            errors.insert(
                BookingField::Guests,
                format!("Maximum {max_guests} guests allowed"),
            );
            None
        }
        Parsed::Value(guests) => u32::try_from(guests).ok(),
    };

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if ctx.policy.enforce_availability_check && ctx.availability.overlaps(from, to) {
            errors.insert(
                BookingField::Dates,
                "The selected dates overlap an existing booking",
            );
        }
    }

    match (date_from, date_to, guests) {
        (Some(date_from), Some(date_to), Some(guests)) if errors.is_empty() => {
            Ok(BookingPayload {
                venue_id: Some(ctx.venue_id.clone()),
                date_from,
                date_to,
                guests,
            })
        }
        _ => Err(errors),
    }
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { booking_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Error(String),
    Success(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Invalid booking: {0}")]
    Invalid(FieldErrors),

    #[error("A booking request is already in progress")]
    InFlight,

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Failed(String),

    #[error("Booking not found")]
    NotFound,
}

impl From<ApiError> for SubmitError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Api { .. } => SubmitError::Rejected(error.display_message()),
            ApiError::NotFound(_) => SubmitError::NotFound,
            ApiError::Transport(_) | ApiError::Decode(_) => {
                SubmitError::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }
}

// Clears the in-flight flag however the submission ends
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingForm<A: VenueApi> {
    api: Arc<A>,
    mode: FormMode,
    input: Mutex<BookingFormInput>,
    message: Mutex<Option<FormMessage>>,
    submitting: AtomicBool,
}

impl<A: VenueApi> BookingForm<A> {
    pub fn create(api: Arc<A>) -> Self {
        Self::with_mode(api, FormMode::Create, BookingFormInput::default())
    }

    pub fn edit(api: Arc<A>, booking: &Booking) -> Self {
        Self::with_mode(
            api,
            FormMode::Edit {
                booking_id: booking.id.clone(),
            },
            BookingFormInput::from_booking(booking),
        )
    }

    fn with_mode(api: Arc<A>, mode: FormMode, input: BookingFormInput) -> Self {
        Self {
            api,
            mode,
            input: Mutex::new(input),
            message: Mutex::new(None),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn input(&self) -> BookingFormInput {
        self.input.lock().clone()
    }

    pub fn message(&self) -> Option<FormMessage> {
        self.message.lock().clone()
    }

    // True while a create/update request is outstanding; the host keeps the
    // submit button inert and shows a spinner.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    // Stores a field edit and returns the inline errors for the whole form.
    pub fn update_field(
        &self,
        field: BookingField,
        value: impl Into<String>,
        ctx: &BookingContext,
        today: NaiveDate,
    ) -> FieldErrors {
        let input = {
            let mut input = self.input.lock();
            input.set(field, value);
            input.clone()
        };
        validate(&input, ctx, today).err().unwrap_or_default()
    }

    pub async fn submit(&self, ctx: &BookingContext, today: NaiveDate) -> Result<Booking, SubmitError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Ignoring duplicate booking submission");
            return Err(SubmitError::InFlight);
        }
        let _guard = SubmittingGuard(&self.submitting);
        *self.message.lock() = None;

        let input = self.input();
        let payload = validate(&input, ctx, today).map_err(SubmitError::Invalid)?;

        let result = match &self.mode {
            FormMode::Create => self.api.create_booking(&payload).await,
            FormMode::Edit { booking_id } => self.api.update_booking(booking_id, &payload).await,
        };

        match result {
            Ok(booking) => {
                let success = match self.mode {
                    FormMode::Create => {
                        *self.input.lock() = BookingFormInput::default();
                        BOOKING_CREATED
                    }
                    FormMode::Edit { .. } => BOOKING_UPDATED,
                };
                info!("Booking {} saved for venue {}", booking.id, ctx.venue_id);
                *self.message.lock() = Some(FormMessage::Success(success.to_string()));
                Ok(booking)
            }
            Err(error) => {
                warn!("Booking submission failed: {}", error);
                let error = SubmitError::from(error);
                *self.message.lock() = Some(FormMessage::Error(error.to_string()));
                Err(error)
            }
        }
    }
}
