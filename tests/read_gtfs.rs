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

use gtfs_lite::{
    gtfs::{self, Reader},
    objects::{ExceptionType, Time},
    test_utils::test_in_tmp_dir,
    utils::zip_to,
    Configuration, Gtfs, IgnoreOptionalFiles,
};
use pretty_assertions::assert_eq;

const FIXTURE: &str = "tests/fixtures/gtfs";

#[test]
fn simple_gtfs_reading() {
    let gtfs = gtfs::read(FIXTURE).unwrap();
    assert_eq!(2, gtfs.agencies.len());
    assert_eq!(6, gtfs.stops.len());
    assert_eq!(3, gtfs.routes.len());
    assert_eq!(8, gtfs.trips.len());
    assert_eq!(20, gtfs.stop_times.len());
    assert_eq!(2, gtfs.calendars.len());
    assert_eq!(3, gtfs.calendar_dates.len());
    assert_eq!(4, gtfs.shapes.len());
    assert!(gtfs.transfers.is_empty());
    assert!(gtfs.feed_info.is_empty());
}

#[test]
fn rows_keep_file_order_and_values() {
    let gtfs = gtfs::read(FIXTURE).unwrap();
    let ids: Vec<&str> = gtfs.routes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(vec!["R1", "R2", "R3"], ids);

    let depot = &gtfs.stops[5];
    assert_eq!("S6", depot.id);
    assert_eq!(None, depot.lat);
    assert_eq!(None, depot.point());

    let after_midnight = gtfs
        .stop_times
        .iter()
        .find(|st| st.trip_id == "T7" && st.stop_sequence == 2)
        .unwrap();
    assert_eq!(Some(Time::new(24, 15, 0)), after_midnight.arrival_time);

    let no_departure = gtfs
        .stop_times
        .iter()
        .find(|st| st.trip_id == "T5" && st.stop_sequence == 2)
        .unwrap();
    assert_eq!(None, no_departure.departure_time);

    assert_eq!(ExceptionType::Remove, gtfs.calendar_dates[0].exception_type);
    assert_eq!(Some(0), gtfs.trips[0].direction_id);
}

#[test]
fn zipped_gtfs_reading() {
    test_in_tmp_dir(|path| {
        let zip_path = path.join("gtfs.zip");
        zip_to(FIXTURE, &zip_path).unwrap();
        let from_zip = Gtfs::load_zip(&zip_path).unwrap();
        assert_eq!(gtfs::read(FIXTURE).unwrap(), from_zip);
        assert_eq!(from_zip, gtfs::read(&zip_path).unwrap());
    });
}

#[test]
fn gtfs_with_config_reading() {
    let configuration = Configuration {
        ignore_optional_files: IgnoreOptionalFiles::All,
    };
    let gtfs = Reader::new(configuration).parse(FIXTURE).unwrap();
    assert!(gtfs.shapes.is_empty());
    assert_eq!(3, gtfs.calendar_dates.len());
    assert_eq!(None, gtfs.summary().total_shapes);
}

#[test]
fn unexistent_file() {
    let err = gtfs::read("tests/fixtures/i_m_not_here").unwrap_err();
    assert_eq!(
        "file \"tests/fixtures/i_m_not_here\" is neither a file nor a directory, cannot read a gtfs from it",
        err.to_string()
    );
}

#[test]
fn file_not_a_gtfs() {
    // stops.txt is a file but not a zip archive
    let err = gtfs::read("tests/fixtures/gtfs/stops.txt").unwrap_err();
    assert_eq!(
        "impossible to read zipped gtfs \"tests/fixtures/gtfs/stops.txt\"",
        err.to_string()
    );
}

#[test]
fn unexistent_zip() {
    let err = gtfs::read_from_zip("tests/fixtures/i_m_not_here.zip", Configuration::default())
        .unwrap_err();
    assert_eq!(
        "Error reading \"tests/fixtures/i_m_not_here.zip\"",
        err.to_string()
    );
}
