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

use crate::objects::Date;
use thiserror::Error;

/// Errors specific to GTFS feeds.
///
/// They are returned wrapped in an `anyhow::Error`; use
/// `err.downcast_ref::<gtfs_lite::Error>()` to inspect them.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The requested date is outside of the feed's calendar coverage.
    #[error("date {} is not covered by the feed", .0.format("%Y%m%d"))]
    DateNotValid(Date),

    /// The feed breaks one of the structural rules needed to load it.
    #[error("feed is not valid: {0}")]
    FeedNotValid(String),

    /// No stop with this `stop_id`.
    #[error("unknown stop '{0}'")]
    UnknownStop(String),

    /// No route with this `route_id`.
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// The route exists but has no trip on the requested date.
    #[error("route '{route_id}' has no service on {}", .date.format("%Y%m%d"))]
    NoService {
        /// Identifier of the route
        route_id: String,
        /// Requested date
        date: Date,
    },

    /// Time bins must be at least one minute wide.
    #[error("interval must be strictly positive")]
    InvalidInterval,
}
