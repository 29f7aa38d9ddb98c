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

//! Helpers shared by the unit and integration tests.
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Content of a file as a `String`
pub fn get_file_content<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let mut output_file = File::open(path).unwrap_or_else(|_| panic!("file {:?} not found", path));
    let mut output_contents = String::new();
    output_file.read_to_string(&mut output_contents).unwrap();
    output_contents
}

/// Create `file_name` in `path` with the given content
pub fn create_file_with_content(path: &Path, file_name: &str, content: &str) -> File {
    let file_path = path.join(file_name);
    let mut f = File::create(&file_path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    File::open(file_path).unwrap()
}

/// Build a zip archive at `zip_path` from `(name, content)` pairs
pub fn zip_files(zip_path: &Path, files: &[(&str, &str)]) {
    let file = File::create(zip_path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Run `func` with a fresh temporary directory, removed afterwards
pub fn test_in_tmp_dir<F>(func: F)
where
    F: FnOnce(&Path),
{
    let tmp_dir = TempDir::new().expect("create temp dir");
    {
        let path = tmp_dir.path();
        func(path);
    }
    tmp_dir.close().expect("delete temp dir");
}
