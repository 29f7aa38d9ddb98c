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
//! Options changing how a feed is loaded.

use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use std::fs::File;
use std::path;
use tracing::info;

/// Which optional tables are skipped when loading a feed.
///
/// Skipping only concerns the purely optional tables: the calendar tables
/// are always read.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreOptionalFiles {
    /// Read every table present in the feed
    #[default]
    None,
    /// Skip every optional table
    All,
    /// Skip every optional table except shapes.txt
    KeepShapes,
}

impl IgnoreOptionalFiles {
    /// Whether the optional table `file_name` should be skipped
    pub fn skips(self, file_name: &str) -> bool {
        match self {
            IgnoreOptionalFiles::None => false,
            IgnoreOptionalFiles::All => true,
            IgnoreOptionalFiles::KeepShapes => file_name != "shapes.txt",
        }
    }
}

/// Parameters of the loading of a feed
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Optional tables to skip
    #[serde(default)]
    pub ignore_optional_files: IgnoreOptionalFiles,
}

/// Read a JSON configuration file.
///
/// Below is an example of this file
/// ```text
/// {
///     "ignore_optional_files": "keep_shapes"
/// }
/// ```
/// Without a path, the default configuration is returned.
pub fn read_config<P: AsRef<path::Path>>(config_path: Option<P>) -> Result<Configuration> {
    match config_path {
        Some(config_path) => {
            let config_path = config_path.as_ref();
            info!("Reading configuration from {:?}", config_path);
            let json_config_file = File::open(config_path)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            let config: Configuration = serde_json::from_reader(json_config_file)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            Ok(config)
        }
        None => Ok(Configuration::default()),
    }
}
