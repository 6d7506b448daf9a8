//! Flight tool adapters.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::command::{FilterFlightsArgs, FlightFilters, FlightRouteArgs, SearchFlightsArgs};
use super::envelope::Envelope;
use crate::infrastructure::providers::{
    FlightOffer, FlightProvider, FlightQuery, FlightResults, Passengers,
};

const DEFAULT_MAX_RESULTS: usize = 10;
const NO_FLIGHTS: &str = "No flights found";

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static HOURS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*hr").expect("valid hours regex"));
static MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*min").expect("valid minutes regex"));

/// `"$1,234"` → 1234; anything unparseable → 0.
pub fn parse_price(price: &str) -> u32 {
    price
        .trim()
        .replace(['$', ','], "")
        .parse()
        .unwrap_or(0)
}

/// `"2 hr 15 min"` → 135; missing parts count as zero.
pub fn parse_duration(duration: &str) -> u32 {
    let capture = |re: &Regex| {
        re.captures(duration)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    capture(&HOURS) * 60 + capture(&MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
    pub average: f64,
}

pub fn price_range(flights: &[FlightOffer]) -> PriceRange {
    let prices: Vec<u32> = flights.iter().map(|f| parse_price(&f.price)).collect();
    PriceRange {
        min: prices.iter().copied().min().unwrap_or(0),
        max: prices.iter().copied().max().unwrap_or(0),
        average: average(&prices),
    }
}

fn average(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();
    round2(sum as f64 / values.len() as f64)
}

pub(super) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First offer with the lowest price
pub fn cheapest(flights: &[FlightOffer]) -> Option<&FlightOffer> {
    arg_min(flights, |f| parse_price(&f.price))
}

/// First offer with the shortest duration
pub fn fastest(flights: &[FlightOffer]) -> Option<&FlightOffer> {
    arg_min(flights, |f| parse_duration(&f.duration))
}

fn arg_min(flights: &[FlightOffer], key: impl Fn(&FlightOffer) -> u32) -> Option<&FlightOffer> {
    flights.iter().fold(None, |best: Option<&FlightOffer>, flight| match best {
        Some(current) if key(current) <= key(flight) => Some(current),
        _ => Some(flight),
    })
}

impl FlightFilters {
    pub fn matches(&self, flight: &FlightOffer) -> bool {
        let price_ok = self
            .max_price
            .is_none_or(|max| parse_price(&flight.price) <= max);
        let duration_ok = self
            .max_duration_minutes
            .is_none_or(|max| parse_duration(&flight.duration) <= max);
        let stops_ok = self
            .max_stops
            .is_none_or(|max| flight.stops.is_some_and(|stops| stops <= max));
        let direct_ok = !self.direct_only || flight.stops == Some(0);
        price_ok && duration_ok && stops_ok && direct_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEcho {
    pub date: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEcho {
    #[serde(flatten)]
    pub route: RouteEcho,
    pub passengers: Passengers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOffer {
    pub rank: usize,
    #[serde(flatten)]
    pub offer: FlightOffer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSearchReport {
    pub query: SearchEcho,
    pub current_price_indicator: Option<String>,
    pub price_range: PriceRange,
    pub total_flights: usize,
    pub flights_returned: usize,
    pub flights: Vec<RankedOffer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub current_price_indicator: Option<String>,
    pub price_range: PriceRange,
    pub cheapest_price: String,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestPriceReport {
    pub query: RouteEcho,
    pub cheapest_flight: FlightOffer,
    pub price_comparison: PriceComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastestFlightReport {
    pub query: RouteEcho,
    pub fastest_flight: FlightOffer,
    pub duration_minutes: u32,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightStatistics {
    pub total_flights: usize,
    pub direct_flights: usize,
    pub price_range: PriceRange,
    pub average_duration_minutes: f64,
    pub current_price_indicator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub query: RouteEcho,
    pub cheapest: FlightOffer,
    pub fastest: FlightOffer,
    pub best: Vec<FlightOffer>,
    pub statistics: FlightStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    pub query: RouteEcho,
    pub filters: FlightFilters,
    pub total_flights: usize,
    pub matching_flights: usize,
    pub flights: Vec<FlightOffer>,
}

enum Failure {
    InvalidDate(String),
    Provider(String),
}

impl Failure {
    fn message(self, context: &str) -> String {
        match self {
            Failure::InvalidDate(reason) => format!("Invalid date format. Use YYYY-MM-DD: {reason}"),
            Failure::Provider(reason) => format!("{context}: {reason}"),
        }
    }
}

fn validate_date(date: &str) -> Result<(), Failure> {
    let date = date.trim();
    if !DATE_SHAPE.is_match(date) {
        return Err(Failure::InvalidDate(format!(
            "'{date}' does not match YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|err| Failure::InvalidDate(format!("'{date}': {err}")))
}

impl FlightRouteArgs {
    fn to_query(&self) -> FlightQuery {
        FlightQuery {
            date: self.date.trim().to_string(),
            from_airport: self.from_airport.trim().to_uppercase(),
            to_airport: self.to_airport.trim().to_uppercase(),
            passengers: self.passengers(),
        }
    }
}

fn echo(query: &FlightQuery) -> RouteEcho {
    RouteEcho {
        date: query.date.clone(),
        from: query.from_airport.clone(),
        to: query.to_airport.clone(),
    }
}

async fn fetch(
    provider: &dyn FlightProvider,
    route: &FlightRouteArgs,
) -> Result<(FlightQuery, FlightResults), Failure> {
    validate_date(&route.date)?;
    let query = route.to_query();
    debug!(from = %query.from_airport, to = %query.to_airport, date = %query.date, "Running flight search");
    let results = provider
        .search(&query)
        .await
        .map_err(|err| Failure::Provider(err.to_string()))?;
    Ok((query, results))
}

pub async fn search_flights(
    provider: &dyn FlightProvider,
    args: &SearchFlightsArgs,
) -> Envelope<FlightSearchReport> {
    let (query, results) = match fetch(provider, &args.route).await {
        Ok(found) => found,
        Err(failure) => return Envelope::failure(failure.message("Flight search failed")),
    };

    let limit = args.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let flights: Vec<RankedOffer> = results
        .flights
        .iter()
        .take(limit)
        .cloned()
        .enumerate()
        .map(|(index, offer)| RankedOffer {
            rank: index + 1,
            offer,
        })
        .collect();

    Envelope::ok(FlightSearchReport {
        query: SearchEcho {
            route: echo(&query),
            passengers: query.passengers,
        },
        current_price_indicator: results.current_price.clone(),
        price_range: price_range(&results.flights),
        total_flights: results.flights.len(),
        flights_returned: flights.len(),
        flights,
    })
}

pub async fn find_best_price(
    provider: &dyn FlightProvider,
    args: &FlightRouteArgs,
) -> Envelope<BestPriceReport> {
    let (query, results) = match fetch(provider, args).await {
        Ok(found) => found,
        Err(failure) => return Envelope::failure(failure.message("Failed to find best price")),
    };
    let Some(cheapest_flight) = cheapest(&results.flights).cloned() else {
        return Envelope::failure(NO_FLIGHTS);
    };

    let range = price_range(&results.flights);
    Envelope::ok(BestPriceReport {
        query: echo(&query),
        price_comparison: PriceComparison {
            current_price_indicator: results.current_price.clone(),
            price_range: range,
            cheapest_price: cheapest_flight.price.clone(),
            average_price: range.average,
        },
        cheapest_flight,
    })
}

pub async fn find_fastest_flight(
    provider: &dyn FlightProvider,
    args: &FlightRouteArgs,
) -> Envelope<FastestFlightReport> {
    let (query, results) = match fetch(provider, args).await {
        Ok(found) => found,
        Err(failure) => return Envelope::failure(failure.message("Failed to find fastest flight")),
    };
    let Some(fastest_flight) = fastest(&results.flights).cloned() else {
        return Envelope::failure(NO_FLIGHTS);
    };

    Envelope::ok(FastestFlightReport {
        query: echo(&query),
        duration_minutes: parse_duration(&fastest_flight.duration),
        fastest_flight,
        price_range: price_range(&results.flights),
    })
}

pub async fn compare_flights(
    provider: &dyn FlightProvider,
    args: &FlightRouteArgs,
) -> Envelope<ComparisonReport> {
    let (query, results) = match fetch(provider, args).await {
        Ok(found) => found,
        Err(failure) => return Envelope::failure(failure.message("Failed to compare flights")),
    };
    let (Some(cheapest_flight), Some(fastest_flight)) =
        (cheapest(&results.flights), fastest(&results.flights))
    else {
        return Envelope::failure(NO_FLIGHTS);
    };

    let durations: Vec<u32> = results
        .flights
        .iter()
        .map(|f| parse_duration(&f.duration))
        .collect();

    Envelope::ok(ComparisonReport {
        query: echo(&query),
        cheapest: cheapest_flight.clone(),
        fastest: fastest_flight.clone(),
        best: results
            .flights
            .iter()
            .filter(|f| f.is_best)
            .cloned()
            .collect(),
        statistics: FlightStatistics {
            total_flights: results.flights.len(),
            direct_flights: results
                .flights
                .iter()
                .filter(|f| f.stops == Some(0))
                .count(),
            price_range: price_range(&results.flights),
            average_duration_minutes: average(&durations),
            current_price_indicator: results.current_price.clone(),
        },
    })
}

pub async fn filter_flights(
    provider: &dyn FlightProvider,
    args: &FilterFlightsArgs,
) -> Envelope<FilterReport> {
    let (query, results) = match fetch(provider, &args.route).await {
        Ok(found) => found,
        Err(failure) => return Envelope::failure(failure.message("Failed to filter flights")),
    };

    let flights: Vec<FlightOffer> = results
        .flights
        .iter()
        .filter(|f| args.filters.matches(f))
        .cloned()
        .collect();

    Envelope::ok(FilterReport {
        query: echo(&query),
        filters: args.filters.clone(),
        total_flights: results.flights.len(),
        matching_flights: flights.len(),
        flights,
    })
}
