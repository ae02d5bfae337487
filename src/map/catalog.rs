use crate::map::models::{LatLng, Region};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationEntry {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub region: String,
}

impl LocationEntry {
    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<LocationEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<LocationEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LocationEntry> {
        self.entries.get(index)
    }

    /// Never returns an empty catalog.
    pub fn for_region(&self, region: Region) -> Result<Catalog, EmptyCatalogError> {
        let entries: Vec<LocationEntry> = self
            .entries
            .iter()
            .filter(|entry| region.includes(&entry.region))
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(EmptyCatalogError { region });
        }
        Ok(Catalog { entries })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCatalogError {
    pub region: Region,
}

impl fmt::Display for EmptyCatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no locations found for region `{}`", self.region)
    }
}

impl std::error::Error for EmptyCatalogError {}

#[derive(Debug)]
pub enum CatalogError {
    Load { path: PathBuf, source: io::Error },
    /// `row` is the 1-based line number of the offending row.
    Parse { row: u64, reason: ParseFailure },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    TooFewFields(usize),
    InvalidCoordinate(String),
    Malformed(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, source } => {
                write!(f, "could not load locations from {}: {source}", path.display())
            }
            Self::Parse { row, reason } => match reason {
                ParseFailure::TooFewFields(count) => {
                    write!(f, "row {row}: expected 4 fields, found {count}")
                }
                ParseFailure::InvalidCoordinate(raw) => {
                    write!(f, "row {row}: `{raw}` is not a valid coordinate")
                }
                ParseFailure::Malformed(details) => write!(f, "row {row}: {details}"),
            },
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse(file).map_err(|err| match err {
        CatalogError::Load { source, .. } => CatalogError::Load {
            path: path.to_path_buf(),
            source,
        },
        parse_err => parse_err,
    })?;
    tracing::info!(
        locations = catalog.len(),
        path = %path.display(),
        "Loaded the locations catalog."
    );
    Ok(catalog)
}

/// Parses `name,lat,lng,area` rows. The first row is a header and is skipped.
pub fn parse<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let fallback_row = index as u64 + 2;
        let record = record.map_err(|err| csv_error(err, fallback_row))?;
        let row = record
            .position()
            .map(|position| position.line())
            .unwrap_or(fallback_row);
        entries.push(parse_record(&record, row)?);
    }
    Ok(Catalog { entries })
}

fn parse_record(record: &StringRecord, row: u64) -> Result<LocationEntry, CatalogError> {
    if record.len() < 4 {
        return Err(CatalogError::Parse {
            row,
            reason: ParseFailure::TooFewFields(record.len()),
        });
    }
    Ok(LocationEntry {
        name: record[0].to_string(),
        lat: parse_coordinate(&record[1], row)?,
        lng: parse_coordinate(&record[2], row)?,
        region: record[3].to_string(),
    })
}

fn parse_coordinate(raw: &str, row: u64) -> Result<f64, CatalogError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CatalogError::Parse {
            row,
            reason: ParseFailure::InvalidCoordinate(raw.to_string()),
        }),
    }
}

fn csv_error(err: csv::Error, fallback_row: u64) -> CatalogError {
    let row = err
        .position()
        .map(|position| position.line())
        .unwrap_or(fallback_row);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => CatalogError::Load {
            path: PathBuf::new(),
            source,
        },
        _ => CatalogError::Parse {
            row,
            reason: ParseFailure::Malformed(message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "name,lat,lng,area\n\
        Perth, -31.95, 115.86, WA-S\n\
        Albany,-35.02,117.88,WA-S\n\
        Hobart,-42.88,147.33,TAS\n";

    #[test]
    fn parses_rows_and_trims_fields() {
        let catalog = parse(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.entries()[0],
            LocationEntry {
                name: String::from("Perth"),
                lat: -31.95,
                lng: 115.86,
                region: String::from("WA-S"),
            }
        );
    }

    #[test]
    fn header_only_yields_empty_catalog() {
        let catalog = parse("name,lat,lng,area\n".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn short_row_reports_its_line() {
        let data = "name,lat,lng,area\nPerth,-31.95,115.86,WA-S\nBroken,-1.0\n";
        match parse(data.as_bytes()) {
            Err(CatalogError::Parse { row, reason }) => {
                assert_eq!(row, 3);
                assert_eq!(reason, ParseFailure::TooFewFields(2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let data = "name,lat,lng,area\nPerth,south,115.86,WA-S\n";
        match parse(data.as_bytes()) {
            Err(CatalogError::Parse { row, reason }) => {
                assert_eq!(row, 2);
                assert_eq!(reason, ParseFailure::InvalidCoordinate(String::from("south")));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn infinite_coordinate_is_rejected() {
        let data = "name,lat,lng,area\nNowhere,inf,115.86,WA-S\n";
        assert!(matches!(
            parse(data.as_bytes()),
            Err(CatalogError::Parse { row: 2, .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_reported_readably() {
        let raw: &[u8] = b"name,lat,lng,area\nPerth,-31.95,115.86,WA-S\n\xff\xfe,1.0,2.0,SA\n";

        let err = parse(raw).unwrap_err();

        match err {
            CatalogError::Parse {
                row,
                reason: ParseFailure::Malformed(message),
            } => {
                assert_eq!(row, 3);
                assert!(message.contains("invalid utf-8"), "{message}");
                assert!(!message.contains("Utf8 {"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn region_filter_keeps_catalog_order() {
        let catalog = parse(CSV.as_bytes()).unwrap();
        let western = catalog.for_region(Region::WaSouth).unwrap();
        let names: Vec<&str> = western.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Perth", "Albany"]);
        assert_eq!(catalog.for_region(Region::AllRegions).unwrap().len(), 3);
    }

    #[test]
    fn empty_region_is_an_error() {
        let catalog = parse(CSV.as_bytes()).unwrap();
        assert_eq!(
            catalog.for_region(Region::Victoria),
            Err(EmptyCatalogError {
                region: Region::Victoria
            })
        );
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let catalog = load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = load(Path::new("/definitely/not/here/locations.csv"));
        assert!(matches!(result, Err(CatalogError::Load { .. })));
    }
}
