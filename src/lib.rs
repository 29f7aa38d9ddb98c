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

//! The `gtfs_lite` crate loads a static [GTFS](https://gtfs.org/) feed into
//! in-memory tables and computes simple descriptive summaries on it (trip
//! counts, date coverage, frequencies by time of day, route or stop, spatial
//! stop counts). The tables can be edited in place and written back to a zip
//! archive.
//!
//! ```no_run
//! use gtfs_lite::Gtfs;
//!
//! # fn main() -> gtfs_lite::Result<()> {
//! let feed = Gtfs::load_zip("feed.zip")?;
//! println!("{}", feed.summary());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod analysis;
pub mod calendars;
pub mod configuration;
mod error;
pub mod file_handler;
pub mod gtfs;
pub mod objects;
pub mod read_utils;
pub mod report;
pub mod serde_utils;
#[doc(hidden)]
pub mod test_utils;
pub mod utils;

pub use crate::configuration::{Configuration, IgnoreOptionalFiles};
pub use crate::error::Error;
pub use crate::gtfs::Gtfs;

/// The corresponding result type used by the crate.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
