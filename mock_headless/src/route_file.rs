// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::coordinates::Coordinates;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    #[error("Failed to read route file {path}. Error: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Route file {0} contains no points")]
    Empty(String),
}

/// Reads route points from CSV data with a `latitude,longitude` header.
pub fn read_route<R: std::io::Read>(reader: R) -> Result<Vec<Coordinates>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize::<Coordinates>().collect()
}

/// Reads the route points stored in the CSV file at `path`.
pub fn read_route_file(path: &Path) -> Result<Vec<Coordinates>, RouteFileError> {
    let path_name = path.to_string_lossy().to_string();
    let file = std::fs::File::open(path).map_err(|e| RouteFileError::Csv {
        path: path_name.clone(),
        source: csv::Error::from(e),
    })?;
    let points = read_route(file).map_err(|source| RouteFileError::Csv {
        path: path_name.clone(),
        source,
    })?;
    if points.is_empty() {
        return Err(RouteFileError::Empty(path_name));
    }
    debug!("Read {} points from {}", points.len(), path_name);
    Ok(points)
}
