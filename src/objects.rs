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

//! The rows of the GTFS tables.
//!
//! Each structure maps one line of a GTFS file; columns keep their GTFS names
//! on (de)serialization. Columns that the GTFS reference marks as optional are
//! `Option`s, an empty cell being read as `None`.

#![allow(missing_docs)]

use crate::serde_utils::*;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar date.
pub type Date = NaiveDate;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("'{0}' is not a time of the form HH:MM:SS")]
    WrongFormat(String),
    #[error("'{0}' has a component out of range")]
    WrongValue(String),
}

/// A GTFS time: the number of seconds since the beginning of the service
/// day. Hours may go beyond 23 for trips running after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(u32);

impl Time {
    /// Build a time from its components.
    ///
    /// # Panics
    /// If the total number of seconds does not fit in a `u32`. Use
    /// [`Time::checked_new`] for untrusted values.
    pub fn new(h: u32, m: u32, s: u32) -> Time {
        match Time::checked_new(h, m, s) {
            Some(time) => time,
            None => panic!("{}:{}:{} overflows a time", h, m, s),
        }
    }
    /// Build a time from its components, `None` on overflow.
    pub fn checked_new(h: u32, m: u32, s: u32) -> Option<Time> {
        h.checked_mul(3600)
            .and_then(|hours| m.checked_mul(60).and_then(|mins| hours.checked_add(mins)))
            .and_then(|total| total.checked_add(s))
            .map(Time)
    }
    pub fn from_seconds(seconds: u32) -> Time {
        Time(seconds)
    }
    pub fn hours(self) -> u32 {
        self.0 / 3600
    }
    pub fn minutes(self) -> u32 {
        self.0 / 60 % 60
    }
    pub fn seconds(self) -> u32 {
        self.0 % 60
    }
    pub fn total_seconds(self) -> u32 {
        self.0
    }
    /// The time as a fractional number of hours (`07:30:00` is `7.5`)
    pub fn hours_f64(self) -> f64 {
        f64::from(self.0) / 3600.0
    }
}

impl FromStr for Time {
    type Err = TimeError;
    fn from_str(time: &str) -> Result<Self, Self::Err> {
        let mut t = time.trim().split(':');
        let (hours, minutes, seconds) = match (t.next(), t.next(), t.next(), t.next()) {
            (Some(h), Some(m), Some(s), None) => (h, m, s),
            _ => return Err(TimeError::WrongFormat(time.to_string())),
        };
        let parse = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| TimeError::WrongFormat(time.to_string()))
        };
        let (hours, minutes, seconds) = (parse(hours)?, parse(minutes)?, parse(seconds)?);
        if minutes > 59 || seconds > 59 {
            return Err(TimeError::WrongValue(time.to_string()));
        }
        Time::checked_new(hours, minutes, seconds)
            .ok_or_else(|| TimeError::WrongValue(time.to_string()))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Time, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let time = String::deserialize(deserializer)?;
        time.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Agency {
    #[serde(rename = "agency_id")]
    pub id: Option<String>,
    #[serde(rename = "agency_name")]
    pub name: String,
    #[serde(rename = "agency_url")]
    pub url: String,
    #[serde(rename = "agency_timezone")]
    pub timezone: String,
    #[serde(rename = "agency_lang")]
    pub lang: Option<String>,
    #[serde(rename = "agency_phone")]
    pub phone: Option<String>,
    #[serde(rename = "agency_fare_url")]
    pub fare_url: Option<String>,
    #[serde(rename = "agency_email")]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stop {
    #[serde(rename = "stop_id")]
    pub id: String,
    #[serde(rename = "stop_code")]
    pub code: Option<String>,
    #[serde(rename = "stop_name")]
    pub name: Option<String>,
    #[serde(rename = "stop_desc")]
    pub desc: Option<String>,
    #[serde(rename = "stop_lat")]
    pub lat: Option<f64>,
    #[serde(rename = "stop_lon")]
    pub lon: Option<f64>,
    pub zone_id: Option<String>,
    #[serde(rename = "stop_url")]
    pub url: Option<String>,
    pub location_type: Option<u8>,
    pub parent_station: Option<String>,
    #[serde(rename = "stop_timezone")]
    pub timezone: Option<String>,
    pub wheelchair_boarding: Option<u8>,
    pub level_id: Option<String>,
    pub platform_code: Option<String>,
}

impl Stop {
    /// Position of the stop as a (longitude, latitude) point
    pub fn point(&self) -> Option<geo::Point<f64>> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some(geo::Point::new(lon, lat)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Route {
    #[serde(rename = "route_id")]
    pub id: String,
    pub agency_id: Option<String>,
    #[serde(rename = "route_short_name")]
    pub short_name: Option<String>,
    #[serde(rename = "route_long_name")]
    pub long_name: Option<String>,
    #[serde(rename = "route_desc")]
    pub desc: Option<String>,
    pub route_type: u16,
    #[serde(rename = "route_url")]
    pub url: Option<String>,
    #[serde(rename = "route_color")]
    pub color: Option<String>,
    #[serde(rename = "route_text_color")]
    pub text_color: Option<String>,
    #[serde(rename = "route_sort_order")]
    pub sort_order: Option<u32>,
    pub continuous_pickup: Option<u8>,
    pub continuous_drop_off: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    #[serde(rename = "trip_id")]
    pub id: String,
    #[serde(rename = "trip_headsign")]
    pub headsign: Option<String>,
    #[serde(rename = "trip_short_name")]
    pub short_name: Option<String>,
    pub direction_id: Option<u8>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
    pub wheelchair_accessible: Option<u8>,
    pub bikes_allowed: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: Option<Time>,
    pub departure_time: Option<Time>,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<u8>,
    pub drop_off_type: Option<u8>,
    pub continuous_pickup: Option<u8>,
    pub continuous_drop_off: Option<u8>,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Option<u8>,
}

impl StopTime {
    /// The departure time, or the arrival time when the departure is not set
    pub fn departure_or_arrival(&self) -> Option<Time> {
        self.departure_time.or(self.arrival_time)
    }
}

/// Structure to serialize/deserialize the file calendar.txt
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Calendar {
    /// Identifiers of the Service
    pub service_id: String,
    /// True if the Service is active on Mondays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub monday: bool,
    /// True if the Service is active on Tuesdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub tuesday: bool,
    /// True if the Service is active on Wednesdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub wednesday: bool,
    /// True if the Service is active on Thursdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub thursday: bool,
    /// True if the Service is active on Fridays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub friday: bool,
    /// True if the Service is active on Saturdays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub saturday: bool,
    /// True if the Service is active on Sundays
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub sunday: bool,
    /// The Service is active starting from this date
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    pub start_date: Date,
    /// The Service is active until this date
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    pub end_date: Date,
}

impl Calendar {
    /// Whether the weekly pattern includes this day of the week
    pub fn is_active_on(&self, weekday: Weekday) -> bool {
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

    /// Whether the service runs on `date` according to calendar.txt only
    pub fn covers(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date && self.is_active_on(date.weekday())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    #[serde(rename = "1")]
    Add,
    #[serde(rename = "2")]
    Remove,
}

/// Structure to serialize/deserialize the file calendar_dates.txt
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarDate {
    /// Identifiers of the Service
    pub service_id: String,
    /// Date at which the CalendarDate applies
    #[serde(
        deserialize_with = "de_from_date_string",
        serialize_with = "ser_from_naive_date"
    )]
    pub date: Date,
    /// Is the CalendarDate included or excluded
    pub exception_type: ExceptionType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FareAttribute {
    pub fare_id: String,
    pub price: f64,
    pub currency_type: String,
    pub payment_method: u8,
    // an empty cell means unlimited transfers
    pub transfers: Option<u8>,
    pub agency_id: Option<String>,
    pub transfer_duration: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FareRule {
    pub fare_id: String,
    pub route_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub contains_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Shape {
    #[serde(rename = "shape_id")]
    pub id: String,
    #[serde(rename = "shape_pt_lat")]
    pub lat: f64,
    #[serde(rename = "shape_pt_lon")]
    pub lon: f64,
    #[serde(rename = "shape_pt_sequence")]
    pub sequence: u32,
    pub shape_dist_traveled: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Frequency {
    pub trip_id: String,
    pub start_time: Time,
    pub end_time: Time,
    pub headway_secs: u32,
    pub exact_times: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from_stop_id: Option<String>,
    pub to_stop_id: Option<String>,
    pub from_route_id: Option<String>,
    pub to_route_id: Option<String>,
    pub from_trip_id: Option<String>,
    pub to_trip_id: Option<String>,
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub transfer_type: u8,
    pub min_transfer_time: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pathway {
    #[serde(rename = "pathway_id")]
    pub id: String,
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub pathway_mode: u8,
    #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
    pub is_bidirectional: bool,
    pub length: Option<f64>,
    pub traversal_time: Option<u32>,
    pub stair_count: Option<i32>,
    pub max_slope: Option<f64>,
    pub min_width: Option<f64>,
    pub signposted_as: Option<String>,
    pub reversed_signposted_as: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Level {
    #[serde(rename = "level_id")]
    pub id: String,
    #[serde(rename = "level_index")]
    pub index: f64,
    #[serde(rename = "level_name")]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Translation {
    pub table_name: String,
    pub field_name: String,
    pub language: String,
    pub translation: String,
    pub record_id: Option<String>,
    pub record_sub_id: Option<String>,
    pub field_value: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedInfo {
    pub feed_publisher_name: String,
    pub feed_publisher_url: String,
    pub feed_lang: String,
    pub default_lang: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_option_date",
        serialize_with = "ser_option_date"
    )]
    pub feed_start_date: Option<Date>,
    #[serde(
        default,
        deserialize_with = "de_option_date",
        serialize_with = "ser_option_date"
    )]
    pub feed_end_date: Option<Date>,
    pub feed_version: Option<String>,
    pub feed_contact_email: Option<String>,
    pub feed_contact_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Attribution {
    pub attribution_id: Option<String>,
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    pub trip_id: Option<String>,
    pub organization_name: String,
    pub is_producer: Option<u8>,
    pub is_operator: Option<u8>,
    pub is_authority: Option<u8>,
    pub attribution_url: Option<String>,
    pub attribution_email: Option<String>,
    pub attribution_phone: Option<String>,
}

/// The first and last dates covered by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityPeriod {
    pub start_date: Date,
    pub end_date: Date,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod time {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn parse_time() {
            let time: Time = "07:30:15".parse().unwrap();
            assert_eq!(Time::new(7, 30, 15), time);
            assert_eq!(27015, time.total_seconds());
        }

        #[test]
        fn parse_time_with_one_digit_hour() {
            let time: Time = " 9:05:00".parse().unwrap();
            assert_eq!(Time::new(9, 5, 0), time);
            assert!(time < "10:00:00".parse().unwrap());
        }

        #[test]
        fn parse_time_after_midnight() {
            let time: Time = "25:10:00".parse().unwrap();
            assert_eq!(25, time.hours());
            assert_eq!("25:10:00", time.to_string());
        }

        #[test]
        fn parse_invalid_time() {
            assert_eq!(
                Err(TimeError::WrongFormat("07:30".to_string())),
                "07:30".parse::<Time>()
            );
            assert_eq!(
                Err(TimeError::WrongFormat("ab:00:00".to_string())),
                "ab:00:00".parse::<Time>()
            );
            assert_eq!(
                Err(TimeError::WrongValue("07:61:00".to_string())),
                "07:61:00".parse::<Time>()
            );
        }

        #[test]
        fn parse_time_overflow() {
            assert_eq!(
                Err(TimeError::WrongValue("1200000:00:00".to_string())),
                "1200000:00:00".parse::<Time>()
            );
            assert_eq!(None, Time::checked_new(u32::MAX, 0, 0));
            assert_eq!(
                Some(Time::from_seconds(u32::MAX)),
                Time::checked_new(0, 0, u32::MAX)
            );
        }

        #[test]
        fn display_pads_with_zeros() {
            assert_eq!("08:05:09", Time::new(8, 5, 9).to_string());
        }

        #[test]
        fn fractional_hours() {
            assert_eq!(7.5, Time::new(7, 30, 0).hours_f64());
        }
    }

    mod calendar {
        use super::*;
        use pretty_assertions::assert_eq;

        fn weekdays_calendar() -> Calendar {
            Calendar {
                service_id: "weekdays".to_string(),
                monday: true,
                tuesday: true,
                wednesday: true,
                thursday: true,
                friday: true,
                saturday: false,
                sunday: false,
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            }
        }

        #[test]
        fn covers_weekday_in_range() {
            // 2020-07-02 is a Thursday
            let date = NaiveDate::from_ymd_opt(2020, 7, 2).unwrap();
            assert!(weekdays_calendar().covers(date));
        }

        #[test]
        fn does_not_cover_weekend() {
            let date = NaiveDate::from_ymd_opt(2020, 7, 4).unwrap();
            assert!(!weekdays_calendar().covers(date));
        }

        #[test]
        fn does_not_cover_out_of_range() {
            let date = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
            assert!(!weekdays_calendar().covers(date));
        }
    }

    #[test]
    fn stop_without_coordinates_has_no_point() {
        let stop = Stop {
            id: "SP1".to_string(),
            code: None,
            name: Some("Stop 1".to_string()),
            desc: None,
            lat: None,
            lon: Some(2.3),
            zone_id: None,
            url: None,
            location_type: None,
            parent_station: None,
            timezone: None,
            wheelchair_boarding: None,
            level_id: None,
            platform_code: None,
        };
        assert_eq!(None, stop.point());
    }
}
