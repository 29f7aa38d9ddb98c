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
//! Some utilities for serialize / deserialize GTFS rows.

use crate::objects::Date;
use chrono::NaiveDate;

const GTFS_DATE_FORMAT: &str = "%Y%m%d";

/// deserialize u8 as bool
/// returns an error if non boolean value
pub fn de_from_u8<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{
        de::{Error, Unexpected::Other},
        Deserialize,
    };
    let i = <u8 as Deserialize<'de>>::deserialize(deserializer)?;
    if i == 0 || i == 1 {
        Ok(i != 0)
    } else {
        Err(D::Error::invalid_value(
            Other(&format!("{} non boolean value", i)),
            &"boolean",
        ))
    }
}

/// serialize bool as u8
// The signature of the function must pass by reference for 'serde' to be able to use the function
pub fn ser_from_bool<S>(v: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u8(*v as u8)
}

/// deserialize date from String
pub fn de_from_date_string<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let s = String::deserialize(deserializer)?;

    NaiveDate::parse_from_str(s.trim(), GTFS_DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// serialize naive date to String
// The signature of the function must pass by reference for 'serde' to be able to use the function
pub fn ser_from_naive_date<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let s = format!("{}", date.format(GTFS_DATE_FORMAT));
    serializer.serialize_str(&s)
}

/// deserialize optional date from String
/// returns None if the cell is empty
pub fn de_option_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let option = de_option_empty_string(deserializer)?;
    option
        .map(|s| NaiveDate::parse_from_str(s.trim(), GTFS_DATE_FORMAT))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// serialize optional naive date to String
pub fn ser_option_date<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(date) => ser_from_naive_date(date, serializer),
        None => serializer.serialize_none(),
    }
}

/// deserialize type T or returns its default value
pub fn de_with_empty_default<'de, T: Default, D>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Option::<T>::deserialize(de).map(|opt| opt.unwrap_or_default())
}

/// deserialyse optional String
/// return None if empty String
pub fn de_option_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Deserialize;
    <Option<String> as Deserialize<'de>>::deserialize(deserializer)
        .map(|option| option.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod serde_bool {
        use super::*;
        use pretty_assertions::assert_eq;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Serialize, Deserialize)]
        struct WithBool {
            #[serde(deserialize_with = "de_from_u8", serialize_with = "ser_from_bool")]
            monday: bool,
        }

        #[test]
        fn from_0_and_1() {
            let object: WithBool = serde_json::from_str(r#"{"monday": 1}"#).unwrap();
            assert!(object.monday);
            let object: WithBool = serde_json::from_str(r#"{"monday": 0}"#).unwrap();
            assert!(!object.monday);
        }

        #[test]
        fn non_boolean_value() {
            let result: Result<WithBool, _> = serde_json::from_str(r#"{"monday": 2}"#);
            let err_msg = result.unwrap_err().to_string();
            assert!(err_msg.starts_with("invalid value: 2 non boolean value, expected boolean"));
        }

        #[test]
        fn to_u8() {
            let json = serde_json::to_string(&WithBool { monday: true }).unwrap();
            assert_eq!(r#"{"monday":1}"#, json);
        }
    }

    mod serde_date {
        use super::*;
        use pretty_assertions::assert_eq;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Serialize, Deserialize)]
        struct WithDates {
            #[serde(
                deserialize_with = "de_from_date_string",
                serialize_with = "ser_from_naive_date"
            )]
            start_date: Date,
            #[serde(
                default,
                deserialize_with = "de_option_date",
                serialize_with = "ser_option_date"
            )]
            end_date: Option<Date>,
        }

        #[test]
        fn gtfs_dates() {
            let json = r#"{"start_date": "20200702", "end_date": "20201231"}"#;
            let object: WithDates = serde_json::from_str(json).unwrap();
            assert_eq!(NaiveDate::from_ymd_opt(2020, 7, 2).unwrap(), object.start_date);
            assert_eq!(NaiveDate::from_ymd_opt(2020, 12, 31), object.end_date);
            assert_eq!(
                r#"{"start_date":"20200702","end_date":"20201231"}"#,
                serde_json::to_string(&object).unwrap()
            );
        }

        #[test]
        fn empty_optional_date() {
            let json = r#"{"start_date": "20200702", "end_date": ""}"#;
            let object: WithDates = serde_json::from_str(json).unwrap();
            assert_eq!(None, object.end_date);
        }

        #[test]
        fn invalid_date() {
            let json = r#"{"start_date": "2020-07-02"}"#;
            let result: Result<WithDates, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }
    }

    mod serde_option_string {
        use super::*;
        use pretty_assertions::assert_eq;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Serialize, Deserialize)]
        struct WithOption {
            #[serde(default, deserialize_with = "de_option_empty_string")]
            name: Option<String>,
        }

        #[test]
        fn with_string() {
            let json = r#"{"name": "baz"}"#;
            let object: WithOption = serde_json::from_str(json).unwrap();
            assert_eq!("baz", object.name.unwrap());
        }

        #[test]
        fn with_empty_string() {
            let json = r#"{"name": ""}"#;
            let object: WithOption = serde_json::from_str(json).unwrap();
            assert_eq!(None, object.name);
        }

        #[test]
        fn without_field() {
            let json = r#"{}"#;
            let object: WithOption = serde_json::from_str(json).unwrap();
            assert_eq!(None, object.name);
        }
    }
}
