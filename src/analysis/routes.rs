// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

use super::hours_between;
use crate::{
    gtfs::Gtfs,
    objects::{Date, StopTime, Time, Trip},
    Error, Result,
};
use anyhow::bail;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Figures of a route on a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Identifier of the route
    pub route_id: String,
    /// Number of trips of the route running on the date
    pub total_trips: usize,
    /// Earliest departure of these trips
    pub first_departure: Option<Time>,
    /// Latest arrival of these trips
    pub last_arrival: Option<Time>,
    /// Hours between `first_departure` and `last_arrival`
    pub service_time: f64,
    /// Minutes between two visits at the first stop of the first trip
    pub average_headway: Option<f64>,
}

/// One line of [`Gtfs::routes_summary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesSummaryRow {
    /// Identifier of the route
    pub route_id: String,
    /// Agency of the route
    pub agency_id: Option<String>,
    /// Short name of the route
    pub route_short_name: Option<String>,
    /// Long name of the route
    pub route_long_name: Option<String>,
    /// GTFS route type
    pub route_type: u16,
    /// Number of trips running on the date
    pub trips: usize,
    /// Earliest departure of these trips
    pub first_departure: Time,
    /// Latest arrival of these trips
    pub last_arrival: Time,
    /// Hours between `first_departure` and `last_arrival`
    pub service_time: f64,
    /// Minutes, `service_time` spread over the trips
    pub average_headway: f64,
}

/// Trips of a route in two feeds, matched on the route short name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteComparison {
    /// Identifier of the route in this feed
    pub this_route_id: String,
    /// Number of trips of the route in this feed
    pub this_trips: usize,
    /// Short name shared by both routes
    pub route_short_name: String,
    /// Identifier of the route in the other feed
    pub other_route_id: String,
    /// Number of trips of the route in the other feed
    pub other_trips: usize,
    /// `other_trips - this_trips`
    pub difference: i64,
    /// `difference` in percentage of `this_trips`
    pub pct_difference: f64,
}

fn min_departure(stop_times: &[&StopTime]) -> Option<Time> {
    stop_times.iter().filter_map(|st| st.departure_time).min()
}

fn max_arrival(stop_times: &[&StopTime]) -> Option<Time> {
    stop_times.iter().filter_map(|st| st.arrival_time).max()
}

fn trips_by_route(gtfs: &Gtfs) -> BTreeMap<&str, usize> {
    let mut trips: BTreeMap<&str, usize> = BTreeMap::new();
    for trip in &gtfs.trips {
        *trips.entry(trip.route_id.as_str()).or_default() += 1;
    }
    trips
}

/// Routes having trips and a short name, with their number of trips,
/// sorted by route identifier.
fn short_named_routes(gtfs: &Gtfs) -> Vec<(&str, usize, &str)> {
    let trips = trips_by_route(gtfs);
    let mut routes: Vec<(&str, usize, &str)> = gtfs
        .routes
        .iter()
        .filter_map(|route| {
            let short_name = route.short_name.as_deref()?;
            let count = trips.get(route.id.as_str())?;
            Some((route.id.as_str(), *count, short_name))
        })
        .collect();
    routes.sort();
    routes
}

impl Gtfs {
    /// Figures of the route `route_id` on `date`.
    ///
    /// The average headway is measured at the first stop of the first trip
    /// of the route running on the date.
    pub fn route_summary(&self, date: Date, route_id: &str) -> Result<RouteSummary> {
        if !self.routes.iter().any(|r| r.id == route_id) {
            bail!(Error::UnknownRoute(route_id.to_string()));
        }
        let trips: Vec<&Trip> = self
            .date_trips(date)?
            .into_iter()
            .filter(|t| t.route_id == route_id)
            .collect();
        let first_trip = match trips.first() {
            Some(trip) => *trip,
            None => bail!(Error::NoService {
                route_id: route_id.to_string(),
                date,
            }),
        };
        let trip_ids: HashSet<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        let stop_times_by_trip = self.stop_times_by_trip(&trip_ids);
        let stop_times: Vec<&StopTime> = stop_times_by_trip.values().flatten().copied().collect();

        let first_departure = min_departure(&stop_times);
        let last_arrival = max_arrival(&stop_times);
        let service_time = match (first_departure, last_arrival) {
            (Some(first), Some(last)) => hours_between(first, last),
            _ => 0.0,
        };

        let reference_stop = stop_times_by_trip
            .get(first_trip.id.as_str())
            .and_then(|sts| sts.first())
            .map(|st| st.stop_id.as_str());
        let average_headway = reference_stop.and_then(|stop_id| {
            let at_stop: Vec<&StopTime> = stop_times
                .iter()
                .copied()
                .filter(|st| st.stop_id == stop_id)
                .collect();
            let min_dep = min_departure(&at_stop)?;
            let max_arr = max_arrival(&at_stop)?;
            Some(60.0 * hours_between(min_dep, max_arr) / at_stop.len() as f64)
        });

        Ok(RouteSummary {
            route_id: route_id.to_string(),
            total_trips: trips.len(),
            first_departure,
            last_arrival,
            service_time,
            average_headway,
        })
    }

    /// Figures of every route running on `date`, in routes.txt order.
    ///
    /// When trips carry a direction, only the trips of direction 0 are
    /// considered.
    pub fn routes_summary(&self, date: Date) -> Result<Vec<RoutesSummaryRow>> {
        let has_direction = self.trips.iter().any(|t| t.direction_id.is_some());
        let trips: Vec<&Trip> = self
            .date_trips(date)?
            .into_iter()
            .filter(|t| !has_direction || t.direction_id == Some(0))
            .collect();
        let route_of_trip: HashMap<&str, &str> = trips
            .iter()
            .map(|t| (t.id.as_str(), t.route_id.as_str()))
            .collect();

        let mut trips_count: HashMap<&str, usize> = HashMap::new();
        for trip in &trips {
            *trips_count.entry(trip.route_id.as_str()).or_default() += 1;
        }
        let mut first_departures: HashMap<&str, Time> = HashMap::new();
        let mut last_arrivals: HashMap<&str, Time> = HashMap::new();
        for stop_time in &self.stop_times {
            let route_id = match route_of_trip.get(stop_time.trip_id.as_str()) {
                Some(route_id) => *route_id,
                None => continue,
            };
            if let Some(departure) = stop_time.departure_time {
                let first = first_departures.entry(route_id).or_insert(departure);
                *first = (*first).min(departure);
            }
            if let Some(arrival) = stop_time.arrival_time {
                let last = last_arrivals.entry(route_id).or_insert(arrival);
                *last = (*last).max(arrival);
            }
        }

        Ok(self
            .routes
            .iter()
            .filter_map(|route| {
                let route_id = route.id.as_str();
                let trips = *trips_count.get(route_id)?;
                let first_departure = *first_departures.get(route_id)?;
                let last_arrival = *last_arrivals.get(route_id)?;
                let service_time = hours_between(first_departure, last_arrival);
                Some(RoutesSummaryRow {
                    route_id: route.id.clone(),
                    agency_id: route.agency_id.clone(),
                    route_short_name: route.short_name.clone(),
                    route_long_name: route.long_name.clone(),
                    route_type: route.route_type,
                    trips,
                    first_departure,
                    last_arrival,
                    service_time,
                    average_headway: 60.0 * service_time / trips as f64,
                })
            })
            .collect())
    }

    /// Compares the number of trips per route with `other`, routes being
    /// matched on their short name.
    pub fn compare_by_route(&self, other: &Gtfs) -> Vec<RouteComparison> {
        let other_routes = short_named_routes(other);
        let mut comparisons = Vec::new();
        for (this_route_id, this_trips, short_name) in short_named_routes(self) {
            for (other_route_id, other_trips, _) in other_routes
                .iter()
                .filter(|(_, _, other_short_name)| *other_short_name == short_name)
            {
                let difference = *other_trips as i64 - this_trips as i64;
                comparisons.push(RouteComparison {
                    this_route_id: this_route_id.to_string(),
                    this_trips,
                    route_short_name: short_name.to_string(),
                    other_route_id: other_route_id.to_string(),
                    other_trips: *other_trips,
                    difference,
                    pct_difference: 100.0 * difference as f64 / this_trips as f64,
                });
            }
        }
        comparisons
    }
}
