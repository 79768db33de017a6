//! HTTP clients for the event providers: the Ticketmaster Discovery API and
//! the Eventbrite API.
//!
//! Both clients take an injectable base URL so tests can point them at a
//! wiremock server.

mod error;
mod eventbrite;
mod retry;
mod ticketmaster;
mod types;

pub use error::EventsError;
pub use eventbrite::{EventbriteClient, EventbriteSearchParams};
pub use ticketmaster::{TicketmasterClient, TicketmasterSearchParams};
pub use types::{
    EbCategory, EbEvent, EbLogo, EbOrganizer, EbText, EbTicketClass, EbVenue, EbWhen, TmEvent,
    TmImage, TmVenue,
};
