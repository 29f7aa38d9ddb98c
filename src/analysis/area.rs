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

use crate::{
    gtfs::Gtfs,
    objects::{Date, Stop},
    Result,
};
use geo::{Contains, Polygon};
use std::collections::HashSet;

impl Gtfs {
    /// Stops strictly inside `area`, whose coordinates are (longitude,
    /// latitude). Stops without coordinates are never inside.
    pub fn stops_in_area(&self, area: &Polygon<f64>) -> Vec<&Stop> {
        self.stops
            .iter()
            .filter(|stop| stop.point().map_or(false, |point| area.contains(&point)))
            .collect()
    }

    /// Number of stops strictly inside `area`.
    pub fn stop_count_in_area(&self, area: &Polygon<f64>) -> usize {
        self.stops_in_area(area).len()
    }

    /// Number of distinct trips running on `date` and serving at least one
    /// stop inside `area`.
    pub fn unique_trip_count_in_area(&self, date: Date, area: &Polygon<f64>) -> Result<usize> {
        let trip_ids = self.date_trip_ids(date)?;
        let stop_ids: HashSet<&str> = self
            .stops_in_area(area)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        let trips: HashSet<&str> = self
            .stop_times
            .iter()
            .filter(|st| stop_ids.contains(st.stop_id.as_str()))
            .map(|st| st.trip_id.as_str())
            .filter(|trip_id| trip_ids.contains(trip_id))
            .collect();
        Ok(trips.len())
    }
}
