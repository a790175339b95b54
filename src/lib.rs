// Main library file for the Holidaze venue booking client

pub mod api_client;
pub mod availability;
pub mod booking_form;
pub mod config;
pub mod debounce;
pub mod listing;
pub mod session;
pub mod venue;
pub mod venue_details;

// Re-export key types for convenience
pub use api_client::{ApiError, ApiResult, HttpVenueApi, VenueApi, VenuePage};
pub use availability::{Availability, CalendarEvent, DateInterval};
pub use booking_form::{
    validate, BookingContext, BookingField, BookingForm, BookingFormInput, FieldErrors,
    FormMessage, FormMode, FormPolicy, SubmitError,
};
pub use config::{ClientConfig, SortOrder};
pub use debounce::{debounced, Debouncer};
pub use listing::{FetchOutcome, ListingController, ListingOptions, ListingState, ScrollMetrics};
pub use session::Session;
pub use venue::{Booking, BookingPayload, ErrorDetail, Venue};
pub use venue_details::{DetailsError, VenueDetails};
