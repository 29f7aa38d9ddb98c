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

use super::Gtfs;
use crate::{
    configuration::{Configuration, IgnoreOptionalFiles},
    file_handler::FileHandler,
    read_utils::{read_objects, read_objects_loose},
    Error, Result,
};
use anyhow::bail;
use tracing::info;

fn has_file<H>(file_handler: &mut H, file_name: &str) -> Result<bool>
where
    for<'a> &'a mut H: FileHandler,
{
    let (reader, _) = file_handler.get_file_if_exists(file_name)?;
    Ok(reader.is_some())
}

fn read_optional<H, O>(
    file_handler: &mut H,
    file_name: &str,
    ignore: IgnoreOptionalFiles,
) -> Result<Vec<O>>
where
    for<'a> &'a mut H: FileHandler,
    O: for<'de> serde::Deserialize<'de>,
{
    if ignore.skips(file_name) {
        info!("Ignoring {}", file_name);
        return Ok(vec![]);
    }
    read_objects(file_handler, file_name, false)
}

fn read_optional_loose<H, O>(
    file_handler: &mut H,
    file_name: &str,
    ignore: IgnoreOptionalFiles,
) -> Result<Vec<O>>
where
    for<'a> &'a mut H: FileHandler,
    O: for<'de> serde::Deserialize<'de>,
{
    if ignore.skips(file_name) {
        info!("Ignoring {}", file_name);
        return Ok(vec![]);
    }
    read_objects_loose(file_handler, file_name, false)
}

pub(crate) fn read_tables<H>(file_handler: &mut H, configuration: &Configuration) -> Result<Gtfs>
where
    for<'a> &'a mut H: FileHandler,
{
    let ignore = configuration.ignore_optional_files;
    if !ignore.skips("translations.txt")
        && has_file(file_handler, "translations.txt")?
        && !has_file(file_handler, "feed_info.txt")?
    {
        bail!(Error::FeedNotValid(
            "translations.txt is present but feed_info.txt is missing".to_string()
        ));
    }

    let calendars = read_objects(file_handler, "calendar.txt", false)?;
    let calendar_dates = read_objects(file_handler, "calendar_dates.txt", false)?;
    if calendars.is_empty() && calendar_dates.is_empty() {
        bail!(Error::FeedNotValid(
            "calendar.txt and calendar_dates.txt are both missing or empty".to_string()
        ));
    }

    Ok(Gtfs {
        agencies: read_objects(file_handler, "agency.txt", true)?,
        stops: read_objects(file_handler, "stops.txt", true)?,
        routes: read_objects(file_handler, "routes.txt", true)?,
        trips: read_objects(file_handler, "trips.txt", true)?,
        stop_times: read_objects(file_handler, "stop_times.txt", true)?,
        calendars,
        calendar_dates,
        fare_attributes: read_optional(file_handler, "fare_attributes.txt", ignore)?,
        fare_rules: read_optional(file_handler, "fare_rules.txt", ignore)?,
        shapes: read_optional(file_handler, "shapes.txt", ignore)?,
        frequencies: read_optional(file_handler, "frequencies.txt", ignore)?,
        transfers: read_optional(file_handler, "transfers.txt", ignore)?,
        pathways: read_optional(file_handler, "pathways.txt", ignore)?,
        levels: read_optional(file_handler, "levels.txt", ignore)?,
        translations: read_optional_loose(file_handler, "translations.txt", ignore)?,
        feed_info: read_optional_loose(file_handler, "feed_info.txt", ignore)?,
        attributions: read_optional_loose(file_handler, "attributions.txt", ignore)?,
    })
}
