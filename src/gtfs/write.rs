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

use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::path;
use tracing::info;

pub(crate) const AGENCY_COLUMNS: &[&str] = &[
    "agency_id",
    "agency_name",
    "agency_url",
    "agency_timezone",
    "agency_lang",
    "agency_phone",
    "agency_fare_url",
    "agency_email",
];
pub(crate) const STOP_COLUMNS: &[&str] = &[
    "stop_id",
    "stop_code",
    "stop_name",
    "stop_desc",
    "stop_lat",
    "stop_lon",
    "zone_id",
    "stop_url",
    "location_type",
    "parent_station",
    "stop_timezone",
    "wheelchair_boarding",
    "level_id",
    "platform_code",
];
pub(crate) const ROUTE_COLUMNS: &[&str] = &[
    "route_id",
    "agency_id",
    "route_short_name",
    "route_long_name",
    "route_desc",
    "route_type",
    "route_url",
    "route_color",
    "route_text_color",
    "route_sort_order",
    "continuous_pickup",
    "continuous_drop_off",
];
pub(crate) const TRIP_COLUMNS: &[&str] = &[
    "route_id",
    "service_id",
    "trip_id",
    "trip_headsign",
    "trip_short_name",
    "direction_id",
    "block_id",
    "shape_id",
    "wheelchair_accessible",
    "bikes_allowed",
];
pub(crate) const STOP_TIME_COLUMNS: &[&str] = &[
    "trip_id",
    "arrival_time",
    "departure_time",
    "stop_id",
    "stop_sequence",
    "stop_headsign",
    "pickup_type",
    "drop_off_type",
    "continuous_pickup",
    "continuous_drop_off",
    "shape_dist_traveled",
    "timepoint",
];

/// Write a required table. An empty table still gets its header line.
pub(crate) fn write_table<T: Serialize>(
    path: &path::Path,
    file: &str,
    columns: &[&str],
    objects: &[T],
) -> Result<()> {
    info!(file_name = %file, "Writing");
    let path = path.join(file);
    let mut wtr =
        csv::Writer::from_path(&path).with_context(|| format!("Error writing {:?}", path))?;
    if objects.is_empty() {
        wtr.write_record(columns)
            .with_context(|| format!("Error writing {:?}", path))?;
    }
    for object in objects {
        wtr.serialize(object)
            .with_context(|| format!("Error writing {:?}", path))?;
    }
    wtr.flush()
        .with_context(|| format!("Error writing {:?}", path))?;
    Ok(())
}

/// Write an optional table, nothing when it is empty.
pub(crate) fn write_opt_table<T: Serialize>(
    path: &path::Path,
    file: &str,
    objects: &[T],
) -> Result<()> {
    if objects.is_empty() {
        return Ok(());
    }
    write_table(path, file, &[], objects)
}
