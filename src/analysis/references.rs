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
    report::{ReferenceReportCategory, Report},
};
use std::collections::HashSet;
use tracing::info;

impl Gtfs {
    /// Lists the references between tables that point to nothing.
    ///
    /// The feed is left untouched; every dangling reference is a warning of
    /// the returned report.
    pub fn check_references(&self) -> Report<ReferenceReportCategory> {
        let mut report = Report::default();
        let agency_ids: HashSet<&str> = self.agencies.iter().filter_map(|a| a.id.as_deref()).collect();
        let route_ids: HashSet<&str> = self.routes.iter().map(|r| r.id.as_str()).collect();
        let trip_ids: HashSet<&str> = self.trips.iter().map(|t| t.id.as_str()).collect();
        let stop_ids: HashSet<&str> = self.stops.iter().map(|s| s.id.as_str()).collect();
        let service_ids = self.service_ids();

        for route in &self.routes {
            if let Some(agency_id) = route.agency_id.as_deref() {
                if !agency_ids.contains(agency_id) {
                    report.add_warning(
                        format!("route '{}' references unknown agency '{}'", route.id, agency_id),
                        ReferenceReportCategory::UnknownAgency,
                    );
                }
            }
        }
        for trip in &self.trips {
            if !route_ids.contains(trip.route_id.as_str()) {
                report.add_warning(
                    format!("trip '{}' references unknown route '{}'", trip.id, trip.route_id),
                    ReferenceReportCategory::UnknownRoute,
                );
            }
            if !service_ids.contains(trip.service_id.as_str()) {
                report.add_warning(
                    format!(
                        "trip '{}' references unknown service '{}'",
                        trip.id, trip.service_id
                    ),
                    ReferenceReportCategory::UnknownService,
                );
            }
        }
        for stop_time in &self.stop_times {
            if !trip_ids.contains(stop_time.trip_id.as_str()) {
                report.add_warning(
                    format!("stop_time references unknown trip '{}'", stop_time.trip_id),
                    ReferenceReportCategory::UnknownTrip,
                );
            }
            if !stop_ids.contains(stop_time.stop_id.as_str()) {
                report.add_warning(
                    format!(
                        "stop_time of trip '{}' references unknown stop '{}'",
                        stop_time.trip_id, stop_time.stop_id
                    ),
                    ReferenceReportCategory::UnknownStop,
                );
            }
        }
        info!("{} dangling references found", report.warnings().len());
        report
    }
}
