// Venue detail view: loads a venue with its bookings, derives availability
// and sets up the booking form in create or edit mode.

use crate::api_client::{ApiError, VenueApi};
use crate::availability::{Availability, CalendarEvent};
use crate::booking_form::{BookingContext, BookingForm, FormPolicy};
use crate::venue::{Booking, Venue};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetailsError {
    // The host redirects to its not-found view on this one
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to load details: {0}")]
    Failed(String),
}

pub struct VenueDetails<A: VenueApi> {
    api: Arc<A>,
    venue: Venue,
    availability: Availability,
    editing: Option<Booking>,
}

impl<A: VenueApi> VenueDetails<A> {
    // Fetches the venue (with bookings) and, for an edit, the booking
    // being changed.
    pub async fn load(
        api: Arc<A>,
        venue_id: &str,
        booking_id: Option<&str>,
    ) -> Result<Self, DetailsError> {
        let (venue, booking) = futures::join!(api.get_venue_by_id(venue_id, true), async {
            match booking_id {
                Some(id) => Some(api.get_booking_by_id(id).await),
                None => None,
            }
        });

        let venue = venue.map_err(|error| {
            warn!("Venue {} could not be loaded: {}", venue_id, error);
            DetailsError::NotFound(format!("venue {venue_id}"))
        })?;

        let editing = match booking {
            None => None,
            Some(Ok(booking)) => Some(booking),
            Some(Err(ApiError::NotFound(_))) => {
                return Err(DetailsError::NotFound(format!(
                    "booking {}",
                    booking_id.unwrap_or_default()
                )))
            }
            Some(Err(error)) => return Err(DetailsError::Failed(error.display_message())),
        };

        let availability = derive_availability(&venue, editing.as_ref());
        debug!(
            "Loaded venue {} with {} booked intervals",
            venue.id,
            availability.intervals().len()
        );
        Ok(Self {
            api,
            venue,
            availability,
            editing,
        })
    }

    // Refetches the venue so availability reflects the latest bookings.
    pub async fn refresh(&mut self) -> Result<(), DetailsError> {
        let venue = self
            .api
            .get_venue_by_id(&self.venue.id, true)
            .await
            .map_err(|error| match error {
                ApiError::NotFound(_) => DetailsError::NotFound(format!("venue {}", self.venue.id)),
                other => DetailsError::Failed(other.display_message()),
            })?;
        self.availability = derive_availability(&venue, self.editing.as_ref());
        self.venue = venue;
        Ok(())
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn editing_booking(&self) -> Option<&Booking> {
        self.editing.as_ref()
    }

    pub fn calendar_events(&self) -> impl Iterator<Item = CalendarEvent> + '_ {
        self.availability.to_calendar_events()
    }

    // Bookings with customer details, for the venue manager's overview.
    pub fn guest_list(&self) -> &[Booking] {
        self.venue.bookings()
    }

    pub fn booking_context(&self, policy: FormPolicy) -> BookingContext {
        BookingContext {
            venue_id: self.venue.id.clone(),
            max_guests: self.venue.capacity(),
            availability: self.availability.clone(),
            policy,
        }
    }

    pub fn booking_form(&self) -> BookingForm<A> {
        match &self.editing {
            Some(booking) => BookingForm::edit(Arc::clone(&self.api), booking),
            None => BookingForm::create(Arc::clone(&self.api)),
        }
    }
}

fn derive_availability(venue: &Venue, editing: Option<&Booking>) -> Availability {
    Availability::build_excluding(venue.bookings(), editing.map(|booking| booking.id.as_str()))
}
