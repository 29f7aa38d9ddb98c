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
//! Resolution of the services running on a date.
//!
//! calendar.txt gives weekly patterns over a date range and
//! calendar_dates.txt adds or removes single dates; both are combined here.

use crate::{
    gtfs::Gtfs,
    objects::{Date, ExceptionType, ValidityPeriod},
};
use std::collections::BTreeSet;

/// Identifiers of the services running on `date`.
///
/// A service runs if its calendar covers the date (weekday flag set and
/// date within `[start_date, end_date]`) or if calendar_dates adds the date,
/// unless calendar_dates removes it. Removals win over additions whatever
/// their order in calendar_dates.txt.
pub fn active_service_ids(gtfs: &Gtfs, date: Date) -> BTreeSet<String> {
    let mut service_ids: BTreeSet<String> = gtfs
        .calendars
        .iter()
        .filter(|c| c.covers(date))
        .map(|c| c.service_id.clone())
        .collect();
    let (added, removed): (Vec<_>, Vec<_>) = gtfs
        .calendar_dates
        .iter()
        .filter(|cd| cd.date == date)
        .partition(|cd| cd.exception_type == ExceptionType::Add);
    service_ids.extend(added.into_iter().map(|cd| cd.service_id.clone()));
    for calendar_date in removed {
        service_ids.remove(&calendar_date.service_id);
    }
    service_ids
}

/// First and last dates mentioned by calendar.txt and calendar_dates.txt.
pub fn validity_period(gtfs: &Gtfs) -> Option<ValidityPeriod> {
    let dates: BTreeSet<Date> = gtfs
        .calendars
        .iter()
        .flat_map(|c| vec![c.start_date, c.end_date])
        .chain(gtfs.calendar_dates.iter().map(|cd| cd.date))
        .collect();

    let start_date = *dates.iter().next()?;
    let end_date = *dates.iter().next_back()?;
    Some(ValidityPeriod {
        start_date,
        end_date,
    })
}
