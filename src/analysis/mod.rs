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
//! Read-only descriptive queries on a loaded [`Gtfs`].
//!
//! Every query scoped to a date first checks that the date is covered by
//! the feed and fails with [`Error::DateNotValid`] otherwise.

mod area;
mod references;
mod routes;
mod stops;

pub use self::routes::{RouteComparison, RouteSummary, RoutesSummaryRow};
pub use self::stops::StopSummary;

use crate::{
    calendars::{active_service_ids, validity_period},
    gtfs::Gtfs,
    objects::{Date, StopTime, Time, Trip},
    Error, Result,
};
use anyhow::bail;
use chrono::{Datelike, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Overall figures of a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSummary {
    /// Names of the agencies
    pub agencies: Vec<String>,
    /// Number of stops
    pub total_stops: usize,
    /// Number of routes
    pub total_routes: usize,
    /// Number of trips
    pub total_trips: usize,
    /// Number of stop_times rows
    pub total_stops_made: usize,
    /// First date covered by the feed
    pub first_date: Option<Date>,
    /// Last date covered by the feed
    pub last_date: Option<Date>,
    /// Number of distinct `shape_id`s (not of shape point rows), `None`
    /// without shapes.txt
    pub total_shapes: Option<usize>,
}

impl fmt::Display for FeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = |date: Option<Date>| {
            date.map_or_else(|| "-".to_string(), |d| d.format("%Y%m%d").to_string())
        };
        writeln!(f, "agencies:         {}", self.agencies.join(", "))?;
        writeln!(f, "total_stops:      {}", self.total_stops)?;
        writeln!(f, "total_routes:     {}", self.total_routes)?;
        writeln!(f, "total_trips:      {}", self.total_trips)?;
        writeln!(f, "total_stops_made: {}", self.total_stops_made)?;
        writeln!(f, "first_date:       {}", date(self.first_date))?;
        write!(f, "last_date:        {}", date(self.last_date))?;
        if let Some(total_shapes) = self.total_shapes {
            write!(f, "\ntotal_shapes:     {}", total_shapes)?;
        }
        Ok(())
    }
}

/// Number of trips running on each day of the week over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TripDistribution {
    /// Trips on Mondays
    pub monday: usize,
    /// Trips on Tuesdays
    pub tuesday: usize,
    /// Trips on Wednesdays
    pub wednesday: usize,
    /// Trips on Thursdays
    pub thursday: usize,
    /// Trips on Fridays
    pub friday: usize,
    /// Trips on Saturdays
    pub saturday: usize,
    /// Trips on Sundays
    pub sunday: usize,
}

impl TripDistribution {
    /// Number of trips counted for `weekday`
    pub fn get(&self, weekday: Weekday) -> usize {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    fn add(&mut self, weekday: Weekday, count: usize) {
        let counter = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *counter += count;
    }
}

/// Number of events of an object (route or stop) in a time bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    /// Identifier of the route or of the stop
    pub id: String,
    /// Beginning of the time bin
    pub bin_start: Time,
    /// Number of events in the bin
    pub count: usize,
}

pub(crate) fn hours_between(from: Time, to: Time) -> f64 {
    to.hours_f64() - from.hours_f64()
}

fn frequency_rows(counts: BTreeMap<(String, u32), usize>, bin_seconds: u32) -> Vec<FrequencyRow> {
    counts
        .into_iter()
        .map(|((id, bin), count)| FrequencyRow {
            id,
            bin_start: Time::from_seconds(bin * bin_seconds),
            count,
        })
        .collect()
}

fn interval_seconds(interval_minutes: u32) -> Result<u32> {
    if interval_minutes == 0 {
        bail!(Error::InvalidInterval);
    }
    Ok(interval_minutes.saturating_mul(60))
}

impl Gtfs {
    /// Overall figures of the feed.
    pub fn summary(&self) -> FeedSummary {
        let validity_period = validity_period(self);
        let total_shapes = if self.shapes.is_empty() {
            None
        } else {
            let shape_ids: HashSet<&str> = self.shapes.iter().map(|s| s.id.as_str()).collect();
            Some(shape_ids.len())
        };
        FeedSummary {
            agencies: self.agencies.iter().map(|a| a.name.clone()).collect(),
            total_stops: self.stops.len(),
            total_routes: self.routes.len(),
            total_trips: self.trips.len(),
            total_stops_made: self.stop_times.len(),
            first_date: validity_period.map(|vp| vp.start_date),
            last_date: validity_period.map(|vp| vp.end_date),
            total_shapes,
        }
    }

    /// Whether `date` is between the first and last dates of the feed.
    pub fn valid_date(&self, date: Date) -> bool {
        validity_period(self).map_or(false, |vp| vp.start_date <= date && date <= vp.end_date)
    }

    pub(crate) fn check_date(&self, date: Date) -> Result<()> {
        if !self.valid_date(date) {
            bail!(Error::DateNotValid(date));
        }
        Ok(())
    }

    /// The trips running on `date`, in trips.txt order.
    pub fn date_trips(&self, date: Date) -> Result<Vec<&Trip>> {
        self.check_date(date)?;
        let service_ids = active_service_ids(self, date);
        let trips: Vec<&Trip> = self
            .trips
            .iter()
            .filter(|t| service_ids.contains(&t.service_id))
            .collect();
        debug!(
            "{} trips running on {}",
            trips.len(),
            date.format("%Y%m%d")
        );
        Ok(trips)
    }

    pub(crate) fn date_trip_ids(&self, date: Date) -> Result<HashSet<&str>> {
        Ok(self
            .date_trips(date)?
            .into_iter()
            .map(|t| t.id.as_str())
            .collect())
    }

    /// The stop_times of each trip of `trip_ids`, sorted by stop_sequence.
    pub(crate) fn stop_times_by_trip<'a>(
        &'a self,
        trip_ids: &HashSet<&str>,
    ) -> HashMap<&'a str, Vec<&'a StopTime>> {
        let mut stop_times: HashMap<&str, Vec<&StopTime>> = HashMap::new();
        for stop_time in self
            .stop_times
            .iter()
            .filter(|st| trip_ids.contains(st.trip_id.as_str()))
        {
            stop_times
                .entry(stop_time.trip_id.as_str())
                .or_default()
                .push(stop_time);
        }
        for trip_stop_times in stop_times.values_mut() {
            trip_stop_times.sort_by_key(|st| st.stop_sequence);
        }
        stop_times
    }

    /// Total service time, in hours, between `start` and `end` on `date`.
    ///
    /// For each trip running on the date, only the stop_times arriving
    /// within `[start, end]` are kept and the trip contributes the time
    /// between its first and last kept arrivals.
    pub fn service_hours(&self, date: Date, start: Time, end: Time) -> Result<f64> {
        let trip_ids = self.date_trip_ids(date)?;
        let mut arrivals: HashMap<&str, (Time, Time)> = HashMap::new();
        for stop_time in self
            .stop_times
            .iter()
            .filter(|st| trip_ids.contains(st.trip_id.as_str()))
        {
            let arrival = match stop_time.arrival_time {
                Some(arrival) if start <= arrival && arrival <= end => arrival,
                _ => continue,
            };
            let bounds = arrivals
                .entry(stop_time.trip_id.as_str())
                .or_insert((arrival, arrival));
            bounds.0 = bounds.0.min(arrival);
            bounds.1 = bounds.1.max(arrival);
        }
        Ok(arrivals
            .values()
            .map(|(first, last)| hours_between(*first, *last))
            .sum())
    }

    /// Number of trips running on each weekday, summed over every date of
    /// `[start_date, end_date]`. Dates not covered by the feed count for 0.
    pub fn trip_distribution(&self, start_date: Date, end_date: Date) -> TripDistribution {
        let mut trips_by_service: HashMap<&str, usize> = HashMap::new();
        for trip in &self.trips {
            *trips_by_service.entry(trip.service_id.as_str()).or_default() += 1;
        }
        let mut distribution = TripDistribution::default();
        let validity_period = match validity_period(self) {
            Some(validity_period) => validity_period,
            None => return distribution,
        };
        let dates = start_date
            .max(validity_period.start_date)
            .iter_days()
            .take_while(|date| *date <= end_date.min(validity_period.end_date));
        for date in dates {
            let count: usize = active_service_ids(self, date)
                .iter()
                .filter_map(|service_id| trips_by_service.get(service_id.as_str()))
                .sum();
            distribution.add(date.weekday(), count);
        }
        distribution
    }

    /// For each route and each time bin of `interval_minutes`, the number of
    /// trips running on `date` whose first departure falls in the bin.
    ///
    /// Rows are sorted by route then by bin.
    pub fn route_frequency_matrix(
        &self,
        date: Date,
        interval_minutes: u32,
    ) -> Result<Vec<FrequencyRow>> {
        let bin_seconds = interval_seconds(interval_minutes)?;
        let trips = self.date_trips(date)?;
        let trip_ids: HashSet<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        let stop_times = self.stop_times_by_trip(&trip_ids);
        let mut counts: BTreeMap<(String, u32), usize> = BTreeMap::new();
        for trip in trips {
            let first_departure = stop_times
                .get(trip.id.as_str())
                .and_then(|sts| sts.first())
                .and_then(|st| st.departure_or_arrival());
            if let Some(departure) = first_departure {
                let bin = departure.total_seconds() / bin_seconds;
                *counts.entry((trip.route_id.clone(), bin)).or_default() += 1;
            }
        }
        Ok(frequency_rows(counts, bin_seconds))
    }

    /// For each stop and each time bin of `interval_minutes`, the number of
    /// departures on `date` in the bin.
    ///
    /// Rows are sorted by stop then by bin.
    pub fn stop_frequency_matrix(
        &self,
        date: Date,
        interval_minutes: u32,
    ) -> Result<Vec<FrequencyRow>> {
        let bin_seconds = interval_seconds(interval_minutes)?;
        let trip_ids = self.date_trip_ids(date)?;
        let mut counts: BTreeMap<(String, u32), usize> = BTreeMap::new();
        for stop_time in self
            .stop_times
            .iter()
            .filter(|st| trip_ids.contains(st.trip_id.as_str()))
        {
            if let Some(departure) = stop_time.departure_or_arrival() {
                let bin = departure.total_seconds() / bin_seconds;
                *counts.entry((stop_time.stop_id.clone(), bin)).or_default() += 1;
            }
        }
        Ok(frequency_rows(counts, bin_seconds))
    }

    /// Identifiers of the services defined in calendar.txt or
    /// calendar_dates.txt.
    pub(crate) fn service_ids(&self) -> BTreeSet<&str> {
        self.calendars
            .iter()
            .map(|c| c.service_id.as_str())
            .chain(self.calendar_dates.iter().map(|cd| cd.service_id.as_str()))
            .collect()
    }
}
