//! HTTP clients for the external data providers behind the tool adapters.
//!
//! | Provider | Capability |
//! |----------|------------|
//! | [`HttpFlightProvider`] | flight offers from the flight-search gateway |
//! | [`HttpWeatherProvider`] | current conditions from weatherapi.com |
//! | [`HttpSocialProvider`] | X (Twitter) timelines, search and trends |

pub mod error;
pub mod flights;
mod http;
pub mod oauth;
pub mod social;
pub mod weather;

pub use error::ProviderError;
pub use flights::{FlightOffer, FlightProvider, FlightQuery, FlightResults, HttpFlightProvider, Passengers};
pub use social::{
    HttpSocialProvider, Post, PostAuthor, SocialProvider, SortOrder, Trend, TrendList,
    UserProfile, UserTimeline,
};
pub use weather::{HttpWeatherProvider, WeatherProvider};
