//! HTTP clients for the place data providers: Google Places (nearby search,
//! place details, autocomplete, geocoding, directions) and Yelp Fusion
//! (business search, used to enrich Google results).
//!
//! Both clients take an injectable base URL so tests can point them at a
//! wiremock server.

mod error;
mod google;
mod retry;
mod types;
mod yelp;

pub use error::PlacesError;
pub use google::{GooglePlacesClient, NearbySearchParams};
pub use types::{
    DirectionsSummary, GeocodedLocation, GoogleGeometry, GoogleOpeningHours, GooglePhoto,
    GooglePlace, GooglePlaceDetails, GoogleReview, LatLng, PlacePrediction, YelpBusiness,
    YelpCategory,
};
pub use yelp::YelpClient;
