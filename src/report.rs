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
//! Helpers to report the problems found in a feed without failing.
use serde::Serialize;

/// Each report record will be categorized with a type implementing this
/// `ReportCategory` trait.
pub trait ReportCategory: Serialize + PartialEq {}

/// Kind of dangling reference found between the tables of a feed
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum ReferenceReportCategory {
    /// A route references an agency absent from agency.txt
    UnknownAgency,
    /// A trip references a route absent from routes.txt
    UnknownRoute,
    /// A trip references a service defined in neither calendar table
    UnknownService,
    /// A stop_time references a trip absent from trips.txt
    UnknownTrip,
    /// A stop_time references a stop absent from stops.txt
    UnknownStop,
}

impl ReportCategory for ReferenceReportCategory {}

/// A report record.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportRow<R: ReportCategory> {
    /// Category of the record
    pub category: R,
    /// Human readable description
    pub message: String,
}

/// A report is a list of de-duplicated warning records.
#[derive(Debug, Serialize)]
pub struct Report<R: ReportCategory> {
    warnings: Vec<ReportRow<R>>,
}

impl<R: ReportCategory> Default for Report<R> {
    fn default() -> Self {
        Report {
            warnings: Vec::new(),
        }
    }
}

impl<R: ReportCategory> Report<R> {
    /// Add a warning report record.
    pub fn add_warning(&mut self, warning: String, warning_type: R) {
        let report_row = ReportRow {
            category: warning_type,
            message: warning,
        };
        if !self.warnings.contains(&report_row) {
            self.warnings.push(report_row);
        }
    }
    /// Recorded warnings, in insertion order
    pub fn warnings(&self) -> &[ReportRow<R>] {
        &self.warnings
    }
    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicated_warnings_are_recorded_once() {
        let mut report = Report::default();
        report.add_warning(
            "trip 'T1' references unknown route 'R9'".to_string(),
            ReferenceReportCategory::UnknownRoute,
        );
        report.add_warning(
            "trip 'T1' references unknown route 'R9'".to_string(),
            ReferenceReportCategory::UnknownRoute,
        );
        report.add_warning(
            "trip 'T1' references unknown service 'S9'".to_string(),
            ReferenceReportCategory::UnknownService,
        );
        assert_eq!(2, report.warnings().len());
        assert!(!report.is_empty());
    }

    #[test]
    fn serialize_to_json() {
        let mut report = Report::default();
        report.add_warning(
            "stop_time of trip 'T1' references unknown stop 'SP9'".to_string(),
            ReferenceReportCategory::UnknownStop,
        );
        assert_eq!(
            r#"{"warnings":[{"category":"UnknownStop","message":"stop_time of trip 'T1' references unknown stop 'SP9'"}]}"#,
            serde_json::to_string(&report).unwrap()
        );
    }
}
