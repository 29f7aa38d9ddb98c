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
    objects::{Date, Stop, StopTime, Time},
    Error, Result,
};
use anyhow::bail;
use serde::Serialize;
use std::collections::HashSet;

/// Figures of a stop on a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSummary {
    /// The stops.txt row of the stop
    pub stop: Stop,
    /// Number of stop_times at the stop
    pub total_visits: usize,
    /// Earliest arrival at the stop
    pub first_arrival: Option<Time>,
    /// Latest departure from the stop
    pub last_departure: Option<Time>,
    /// Hours between `first_arrival` and `last_departure`
    pub service_time: f64,
    /// Minutes between two visits, `None` without visits
    pub average_headway: Option<f64>,
}

fn in_window(time: Option<Time>, start: Option<Time>, end: Option<Time>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    match time {
        Some(time) => start.map_or(true, |s| s <= time) && end.map_or(true, |e| time <= e),
        None => false,
    }
}

impl Gtfs {
    /// Figures of the stop `stop_id` on `date`.
    pub fn stop_summary(&self, date: Date, stop_id: &str) -> Result<StopSummary> {
        let stop = match self.stops.iter().find(|s| s.id == stop_id) {
            Some(stop) => stop,
            None => bail!(Error::UnknownStop(stop_id.to_string())),
        };
        let trip_ids = self.date_trip_ids(date)?;
        let visits: Vec<&StopTime> = self
            .stop_times
            .iter()
            .filter(|st| st.stop_id == stop_id && trip_ids.contains(st.trip_id.as_str()))
            .collect();

        let first_arrival = visits.iter().filter_map(|st| st.arrival_time).min();
        let last_departure = visits.iter().filter_map(|st| st.departure_time).max();
        let service_time = match (first_arrival, last_departure) {
            (Some(first), Some(last)) => hours_between(first, last),
            _ => 0.0,
        };
        let average_headway = if visits.is_empty() {
            None
        } else {
            Some(60.0 * service_time / visits.len() as f64)
        };

        Ok(StopSummary {
            stop: stop.clone(),
            total_visits: visits.len(),
            first_arrival,
            last_departure,
            service_time,
            average_headway,
        })
    }

    /// The stop_times at any of `stop_ids` of the trips running on `date`.
    ///
    /// With a window, only the stop_times whose departure (or arrival when
    /// the departure is not set) is within `[start, end]` are kept; either
    /// bound may be left open.
    pub fn trips_at_stops(
        &self,
        stop_ids: &[&str],
        date: Date,
        start: Option<Time>,
        end: Option<Time>,
    ) -> Result<Vec<&StopTime>> {
        let trip_ids = self.date_trip_ids(date)?;
        let stop_ids: HashSet<&str> = stop_ids.iter().copied().collect();
        Ok(self
            .stop_times
            .iter()
            .filter(|st| stop_ids.contains(st.stop_id.as_str()))
            .filter(|st| trip_ids.contains(st.trip_id.as_str()))
            .filter(|st| in_window(st.departure_or_arrival(), start, end))
            .collect())
    }

    /// Number of distinct trips of [`Gtfs::trips_at_stops`].
    pub fn unique_trip_count_at_stops(
        &self,
        stop_ids: &[&str],
        date: Date,
        start: Option<Time>,
        end: Option<Time>,
    ) -> Result<usize> {
        let trips: HashSet<&str> = self
            .trips_at_stops(stop_ids, date, start, end)?
            .into_iter()
            .map(|st| st.trip_id.as_str())
            .collect();
        Ok(trips.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_window() {
        let time = Some(Time::new(8, 0, 0));
        assert!(in_window(time, None, None));
        assert!(in_window(None, None, None));
        assert!(in_window(time, Some(Time::new(8, 0, 0)), None));
        assert!(in_window(time, None, Some(Time::new(8, 0, 0))));
        assert!(!in_window(time, Some(Time::new(8, 0, 1)), None));
        assert!(!in_window(None, Some(Time::new(7, 0, 0)), None));
    }
}
