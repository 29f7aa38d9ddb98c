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

//! [GTFS](https://gtfs.org/schedule/reference/) format management.
//!
//! A feed is loaded into a [`Gtfs`], whose public fields are the tables of
//! the feed, row by row and in file order.

mod read;
mod write;

use crate::{
    configuration::Configuration,
    file_handler::{PathFileHandler, ZipHandler},
    objects::*,
    utils::zip_to,
    Result,
};
use anyhow::{anyhow, Context};
use std::path::Path;
use tempfile::tempdir;
use tracing::info;

/// The tables of a GTFS feed.
///
/// Optional tables absent from the feed are empty.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gtfs {
    /// agency.txt
    pub agencies: Vec<Agency>,
    /// stops.txt
    pub stops: Vec<Stop>,
    /// routes.txt
    pub routes: Vec<Route>,
    /// trips.txt
    pub trips: Vec<Trip>,
    /// stop_times.txt
    pub stop_times: Vec<StopTime>,
    /// calendar.txt
    pub calendars: Vec<Calendar>,
    /// calendar_dates.txt
    pub calendar_dates: Vec<CalendarDate>,
    /// fare_attributes.txt
    pub fare_attributes: Vec<FareAttribute>,
    /// fare_rules.txt
    pub fare_rules: Vec<FareRule>,
    /// shapes.txt
    pub shapes: Vec<Shape>,
    /// frequencies.txt
    pub frequencies: Vec<Frequency>,
    /// transfers.txt
    pub transfers: Vec<Transfer>,
    /// pathways.txt
    pub pathways: Vec<Pathway>,
    /// levels.txt
    pub levels: Vec<Level>,
    /// translations.txt
    pub translations: Vec<Translation>,
    /// feed_info.txt
    pub feed_info: Vec<FeedInfo>,
    /// attributions.txt
    pub attributions: Vec<Attribution>,
}

impl Gtfs {
    /// Load a feed from a zip archive with the default configuration.
    pub fn load_zip<P: AsRef<Path>>(path: P) -> Result<Gtfs> {
        read_from_zip(path, Configuration::default())
    }

    /// Write the feed to a zip archive at `path`.
    pub fn write_zip<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_zip(self, path)
    }
}

/// Imports a [`Gtfs`] from the files of a directory.
pub fn read_from_path<P: AsRef<Path>>(p: P, configuration: Configuration) -> Result<Gtfs> {
    let p = p.as_ref();
    info!("Loading GTFS from {:?}", p);
    let mut file_handler = PathFileHandler::new(p.to_path_buf());
    let gtfs = read::read_tables(&mut file_handler, &configuration)?;
    info!("Loading GTFS done");
    Ok(gtfs)
}

/// Imports a [`Gtfs`] from a zip archive.
///
/// The files are looked up by their name, wherever they are in the archive.
pub fn read_from_zip<P: AsRef<Path>>(path: P, configuration: Configuration) -> Result<Gtfs> {
    let path = path.as_ref();
    info!("Loading zipped GTFS from {:?}", path);
    let reader = std::fs::File::open(path).with_context(|| format!("Error reading {:?}", path))?;
    let mut file_handler = ZipHandler::new(reader, path)
        .with_context(|| format!("impossible to read zipped gtfs {:?}", path))?;
    let gtfs = read::read_tables(&mut file_handler, &configuration)?;
    info!("Loading GTFS done");
    Ok(gtfs)
}

/// Loads feeds with a given [`Configuration`].
///
/// ```no_run
/// use gtfs_lite::{gtfs::Reader, Configuration, IgnoreOptionalFiles};
///
/// let configuration = Configuration {
///     ignore_optional_files: IgnoreOptionalFiles::KeepShapes,
/// };
/// let feed = Reader::new(configuration).parse("path/to/feed.zip")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Reader {
    configuration: Configuration,
}

impl Reader {
    /// Build a Reader with a custom configuration
    pub fn new(configuration: Configuration) -> Self {
        Reader { configuration }
    }

    /// Reads a feed from a zip archive or a directory, depending on what
    /// `path` points to.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<Gtfs> {
        let p = path.as_ref();
        if p.is_file() {
            read_from_zip(p, self.configuration)
        } else if p.is_dir() {
            read_from_path(p, self.configuration)
        } else {
            Err(anyhow!(
                "file {:?} is neither a file nor a directory, cannot read a gtfs from it",
                p
            ))
        }
    }
}

/// Reads a feed from a zip archive or a directory with the default
/// configuration.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Gtfs> {
    Reader::default().parse(path)
}

/// Exports a [`Gtfs`] to the files of the directory `path`.
///
/// Required tables are always written, optional ones only when they have
/// rows. Columns unknown to the row types are not written.
pub fn write<P: AsRef<Path>>(gtfs: &Gtfs, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Writing GTFS to {:?}", path);

    write::write_table(path, "agency.txt", write::AGENCY_COLUMNS, &gtfs.agencies)?;
    write::write_table(path, "stops.txt", write::STOP_COLUMNS, &gtfs.stops)?;
    write::write_table(path, "routes.txt", write::ROUTE_COLUMNS, &gtfs.routes)?;
    write::write_table(path, "trips.txt", write::TRIP_COLUMNS, &gtfs.trips)?;
    write::write_table(path, "stop_times.txt", write::STOP_TIME_COLUMNS, &gtfs.stop_times)?;
    write::write_opt_table(path, "calendar.txt", &gtfs.calendars)?;
    write::write_opt_table(path, "calendar_dates.txt", &gtfs.calendar_dates)?;
    write::write_opt_table(path, "fare_attributes.txt", &gtfs.fare_attributes)?;
    write::write_opt_table(path, "fare_rules.txt", &gtfs.fare_rules)?;
    write::write_opt_table(path, "shapes.txt", &gtfs.shapes)?;
    write::write_opt_table(path, "frequencies.txt", &gtfs.frequencies)?;
    write::write_opt_table(path, "transfers.txt", &gtfs.transfers)?;
    write::write_opt_table(path, "pathways.txt", &gtfs.pathways)?;
    write::write_opt_table(path, "levels.txt", &gtfs.levels)?;
    write::write_opt_table(path, "translations.txt", &gtfs.translations)?;
    write::write_opt_table(path, "feed_info.txt", &gtfs.feed_info)?;
    write::write_opt_table(path, "attributions.txt", &gtfs.attributions)?;

    Ok(())
}

/// Exports a [`Gtfs`] to a zip archive at the given full path.
pub fn write_to_zip<P: AsRef<Path>>(gtfs: &Gtfs, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Writing GTFS to ZIP File {:?}", path);
    let input_tmp_dir = tempdir()?;
    write(gtfs, input_tmp_dir.path())?;
    zip_to(input_tmp_dir.path(), path)?;
    input_tmp_dir.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::IgnoreOptionalFiles,
        test_utils::{create_file_with_content, test_in_tmp_dir, zip_files},
        Error,
    };
    use pretty_assertions::assert_eq;

    const AGENCY: &str = "agency_id,agency_name,agency_url,agency_timezone\n\
                          A1,My agency,http://my-agency.com,Europe/Paris\n";
    const STOPS: &str = "stop_id,stop_name,stop_lat,stop_lon\n\
                         SP1,Stop 1,48.85,2.35\n\
                         SP2,Stop 2,48.86,2.36\n";
    const ROUTES: &str = "route_id,agency_id,route_short_name,route_long_name,route_type\n\
                          R1,A1,1,Line 1,3\n";
    const TRIPS: &str = "route_id,service_id,trip_id,direction_id,shape_id\n\
                         R1,S1,T1,0,SH1\n";
    const STOP_TIMES: &str = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                              T1,08:00:00,08:00:00,SP1,1\n\
                              T1,08:10:00,,SP2,2\n";
    const CALENDAR: &str =
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
         S1,1,1,1,1,1,0,0,20200101,20201231\n";
    const SHAPES: &str = "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
                          SH1,48.85,2.35,1\n\
                          SH1,48.86,2.36,2\n";
    const LEVELS: &str = "level_id,level_index\nL0,0\n";

    fn create_minimal_feed(path: &Path) {
        create_file_with_content(path, "agency.txt", AGENCY);
        create_file_with_content(path, "stops.txt", STOPS);
        create_file_with_content(path, "routes.txt", ROUTES);
        create_file_with_content(path, "trips.txt", TRIPS);
        create_file_with_content(path, "stop_times.txt", STOP_TIMES);
        create_file_with_content(path, "calendar.txt", CALENDAR);
    }

    fn feed_error(err: &anyhow::Error) -> Option<&Error> {
        err.downcast_ref::<Error>()
    }

    #[test]
    fn read_directory() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            let gtfs = read(path).unwrap();
            assert_eq!(1, gtfs.agencies.len());
            assert_eq!(2, gtfs.stops.len());
            assert_eq!(2, gtfs.stop_times.len());
            assert_eq!(None, gtfs.stop_times[1].departure_time);
            assert_eq!(Some(Time::new(8, 10, 0)), gtfs.stop_times[1].arrival_time);
            assert!(gtfs.calendar_dates.is_empty());
            assert!(gtfs.shapes.is_empty());
        });
    }

    #[test]
    fn read_zip_with_enclosing_folder() {
        test_in_tmp_dir(|path| {
            let zip_path = path.join("feed.zip");
            zip_files(
                &zip_path,
                &[
                    ("feed/agency.txt", AGENCY),
                    ("feed/stops.txt", STOPS),
                    ("feed/routes.txt", ROUTES),
                    ("feed/trips.txt", TRIPS),
                    ("feed/stop_times.txt", STOP_TIMES),
                    ("feed/calendar.txt", CALENDAR),
                ],
            );
            let gtfs = Gtfs::load_zip(&zip_path).unwrap();
            assert_eq!("R1", gtfs.routes[0].id);
            assert_eq!(1, gtfs.calendars.len());
        });
    }

    #[test]
    fn read_neither_file_nor_directory() {
        test_in_tmp_dir(|path| {
            let p = path.join("no_such_feed");
            let err = read(&p).unwrap_err();
            assert_eq!(
                format!(
                    "file {:?} is neither a file nor a directory, cannot read a gtfs from it",
                    p
                ),
                err.to_string()
            );
        });
    }

    #[test]
    fn read_malformed_zip() {
        test_in_tmp_dir(|path| {
            create_file_with_content(path, "feed.zip", "this is not a zip archive");
            let zip_path = path.join("feed.zip");
            let err = read(&zip_path).unwrap_err();
            assert_eq!(
                format!("impossible to read zipped gtfs {:?}", zip_path),
                err.to_string()
            );
        });
    }

    #[test]
    fn missing_required_table() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            std::fs::remove_file(path.join("stop_times.txt")).unwrap();
            let err = read(path).unwrap_err();
            assert_eq!(
                format!("file {:?} not found", path.join("stop_times.txt")),
                err.to_string()
            );
        });
    }

    #[test]
    fn without_any_calendar() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            std::fs::remove_file(path.join("calendar.txt")).unwrap();
            create_file_with_content(
                path,
                "calendar_dates.txt",
                "service_id,date,exception_type\n",
            );
            let err = read(path).unwrap_err();
            assert!(matches!(feed_error(&err), Some(Error::FeedNotValid(_))));
        });
    }

    #[test]
    fn only_calendar_dates() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            std::fs::remove_file(path.join("calendar.txt")).unwrap();
            create_file_with_content(
                path,
                "calendar_dates.txt",
                "service_id,date,exception_type\nS1,20200702,1\n",
            );
            let gtfs = read(path).unwrap();
            assert_eq!(ExceptionType::Add, gtfs.calendar_dates[0].exception_type);
        });
    }

    #[test]
    fn translations_without_feed_info() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            create_file_with_content(
                path,
                "translations.txt",
                "table_name,field_name,language,translation,record_id\n\
                 stops,stop_name,fr,Arrêt 1,SP1\n",
            );
            let err = read(path).unwrap_err();
            assert_eq!(
                Some(&Error::FeedNotValid(
                    "translations.txt is present but feed_info.txt is missing".to_string()
                )),
                feed_error(&err)
            );
        });
    }

    #[test]
    fn translations_with_feed_info() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            create_file_with_content(
                path,
                "translations.txt",
                "table_name,field_name,language,translation,record_id\n\
                 stops,stop_name,fr,Arrêt 1,SP1\n",
            );
            create_file_with_content(
                path,
                "feed_info.txt",
                "feed_publisher_name,feed_publisher_url,feed_lang,feed_start_date\n\
                 Publisher,http://publisher.com,fr,20200101\n",
            );
            let gtfs = read(path).unwrap();
            assert_eq!(1, gtfs.translations.len());
            assert_eq!(
                chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
                gtfs.feed_info[0].feed_start_date
            );
            assert_eq!(None, gtfs.feed_info[0].feed_end_date);
        });
    }

    #[test]
    fn ignore_optional_files() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            create_file_with_content(path, "shapes.txt", SHAPES);
            create_file_with_content(path, "levels.txt", LEVELS);

            let all = Reader::new(Configuration {
                ignore_optional_files: IgnoreOptionalFiles::All,
            })
            .parse(path)
            .unwrap();
            assert!(all.shapes.is_empty());
            assert!(all.levels.is_empty());
            assert_eq!(1, all.calendars.len());

            let keep_shapes = Reader::new(Configuration {
                ignore_optional_files: IgnoreOptionalFiles::KeepShapes,
            })
            .parse(path)
            .unwrap();
            assert_eq!(2, keep_shapes.shapes.len());
            assert!(keep_shapes.levels.is_empty());

            let none = read(path).unwrap();
            assert_eq!(2, none.shapes.len());
            assert_eq!(1, none.levels.len());
        });
    }

    #[test]
    fn write_then_read_back() {
        test_in_tmp_dir(|path| {
            let input = path.join("input");
            std::fs::create_dir(&input).unwrap();
            create_minimal_feed(&input);
            create_file_with_content(&input, "shapes.txt", SHAPES);
            let gtfs = read(&input).unwrap();

            let output = path.join("output");
            std::fs::create_dir(&output).unwrap();
            write(&gtfs, &output).unwrap();
            assert!(output.join("shapes.txt").exists());
            assert!(!output.join("calendar_dates.txt").exists());
            assert!(!output.join("levels.txt").exists());

            assert_eq!(gtfs, read(&output).unwrap());
        });
    }

    #[test]
    fn write_required_table_headers() {
        test_in_tmp_dir(|path| {
            let input = path.join("input");
            std::fs::create_dir(&input).unwrap();
            create_minimal_feed(&input);
            let mut gtfs = read(&input).unwrap();

            let output = path.join("output");
            std::fs::create_dir(&output).unwrap();
            write(&gtfs, &output).unwrap();
            let header = |file: &str| {
                let content = std::fs::read_to_string(output.join(file)).unwrap();
                content.lines().next().unwrap_or_default().to_string()
            };
            assert_eq!(write::AGENCY_COLUMNS.join(","), header("agency.txt"));
            assert_eq!(write::STOP_COLUMNS.join(","), header("stops.txt"));
            assert_eq!(write::ROUTE_COLUMNS.join(","), header("routes.txt"));
            assert_eq!(write::TRIP_COLUMNS.join(","), header("trips.txt"));
            assert_eq!(write::STOP_TIME_COLUMNS.join(","), header("stop_times.txt"));

            gtfs.stop_times.clear();
            write(&gtfs, &output).unwrap();
            assert_eq!(
                format!("{}\n", write::STOP_TIME_COLUMNS.join(",")),
                std::fs::read_to_string(output.join("stop_times.txt")).unwrap()
            );
            assert!(read(&output).unwrap().stop_times.is_empty());
        });
    }

    #[test]
    fn write_zip_then_read_back() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            let gtfs = read(path).unwrap();
            let zip_path = path.join("output.zip");
            gtfs.write_zip(&zip_path).unwrap();
            assert_eq!(gtfs, Gtfs::load_zip(&zip_path).unwrap());
        });
    }
}
