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

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gtfs_lite::{configuration::read_config, gtfs::Reader, objects::Time, Gtfs, Result};
use serde::Serialize;
use std::{io::Write, path::PathBuf};
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

fn parse_date(date: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, "%Y%m%d")
}

#[derive(Debug, Parser)]
#[clap(
    name = "gtfs-lite",
    about = "Summarize, compare and rewrite GTFS feeds.",
    version
)]
struct Opt {
    /// JSON file containing additional configuration.
    ///
    /// `{"ignore_optional_files": "all" | "keep_shapes" | "none"}`
    #[clap(short, long, global = true, parse(from_os_str))]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the overall figures of a feed.
    Summary {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,
    },
    /// Figures of every route running on a date, as CSV.
    Routes {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Date, formatted as YYYYMMDD.
        #[clap(short, long, parse(try_from_str = parse_date))]
        date: NaiveDate,

        /// Output CSV file, standard output if not set.
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Total service time, in hours, on a date and a time slice.
    ServiceHours {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Date, formatted as YYYYMMDD.
        #[clap(short, long, parse(try_from_str = parse_date))]
        date: NaiveDate,

        /// Beginning of the time slice (HH:MM:SS).
        #[clap(long, default_value = "00:00:00")]
        start: Time,

        /// End of the time slice (HH:MM:SS), may go beyond 24:00:00.
        #[clap(long, default_value = "47:59:59")]
        end: Time,
    },
    /// Compare the number of trips per route with another feed, as CSV.
    Compare {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Feed to compare with.
        #[clap(long, parse(from_os_str))]
        other: PathBuf,

        /// Output CSV file, standard output if not set.
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Print the dangling references of a feed as JSON.
    Check {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,
    },
    /// Load a feed and write it back to a zip archive.
    Rewrite {
        /// Input zip archive or directory.
        #[clap(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Output zip archive.
        #[clap(short, long, parse(from_os_str))]
        output: PathBuf,
    },
}

fn write_rows<W: Write, T: Serialize>(mut wtr: csv::Writer<W>, rows: &[T]) -> Result<()> {
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_csv<T: Serialize>(rows: &[T], output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing {:?}", path);
            let wtr = csv::Writer::from_path(&path)
                .with_context(|| format!("Error writing {:?}", path))?;
            write_rows(wtr, rows).with_context(|| format!("Error writing {:?}", path))
        }
        None => write_rows(csv::Writer::from_writer(std::io::stdout()), rows),
    }
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching gtfs-lite...");

    let configuration = read_config(opt.config)?;
    let load = |input: PathBuf| -> Result<Gtfs> { Reader::new(configuration.clone()).parse(input) };

    match opt.command {
        Command::Summary { input } => {
            let gtfs = load(input)?;
            println!("{}", gtfs.summary());
        }
        Command::Routes {
            input,
            date,
            output,
        } => {
            let gtfs = load(input)?;
            write_csv(&gtfs.routes_summary(date)?, output)?;
        }
        Command::ServiceHours {
            input,
            date,
            start,
            end,
        } => {
            let gtfs = load(input)?;
            println!("{:.2}", gtfs.service_hours(date, start, end)?);
        }
        Command::Compare {
            input,
            other,
            output,
        } => {
            let gtfs = load(input)?;
            let other = load(other)?;
            write_csv(&gtfs.compare_by_route(&other), output)?;
        }
        Command::Check { input } => {
            let gtfs = load(input)?;
            let report = gtfs.check_references();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Rewrite { input, output } => {
            let gtfs = load(input)?;
            gtfs.write_zip(output)?;
        }
    }
    Ok(())
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    // stdout carries the results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter_subscriber)
        .init();
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}
