//! Competition standards from a spreadsheet export.
//!
//! Columns are found by case-insensitive substring of the header, so
//! "Qualifying Time" and "Age Group" both work. Rows that cannot be mapped
//! are counted and skipped.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use swim_core::models::{AgeGroup, Distance, EventKey, Sex, StandardsTable};
use swim_core::services::time_codec::parse_time;

use crate::error::{ImporterError, Result};
use crate::stroke_mapper::{SpreadsheetStrokeMapper, StrokeMapper};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    pub table: StandardsTable,
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    distance: usize,
    stroke: usize,
    age: usize,
    sex: usize,
    time: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |needle: &'static str| {
            headers
                .iter()
                .position(|header| header.trim().to_lowercase().contains(needle))
                .ok_or(ImporterError::MissingColumn(needle))
        };
        Ok(Self {
            distance: find("distance")?,
            stroke: find("stroke")?,
            age: find("age")?,
            sex: find("sex")?,
            time: find("time")?,
        })
    }
}

pub fn map_sex(raw: &str) -> Option<Sex> {
    let raw = raw.to_lowercase();
    if raw.contains("women") || raw.contains("female") {
        Some(Sex::F)
    } else if raw.contains("men") || raw.contains("open") || raw.contains("male") {
        Some(Sex::M)
    } else {
        None
    }
}

pub fn map_age_group(raw: &str) -> Option<AgeGroup> {
    match raw.trim() {
        "10/11" | "11-12" | "10 & 11" => Some(AgeGroup::TenAndEleven),
        "12" => Some(AgeGroup::Twelve),
        "13" => Some(AgeGroup::Thirteen),
        "14" => Some(AgeGroup::Fourteen),
        "15" => Some(AgeGroup::Fifteen),
        "16" => Some(AgeGroup::Sixteen),
        "17" => Some(AgeGroup::Seventeen),
        "18+" | "18/Over" | "17/Over" => Some(AgeGroup::EighteenAndOver),
        _ => None,
    }
}

/// "50", "50m" or "50 m".
pub fn map_distance(raw: &str) -> Option<Distance> {
    let meters = raw.trim().trim_end_matches('m').trim().parse::<u16>().ok()?;
    Distance::try_from(meters).ok()
}

/// Reads a whole standards table. A missing required column is an error;
/// unmappable rows are skipped.
pub fn read_standards<R: Read>(reader: R) -> Result<CsvImport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(csv_reader.headers()?)?;
    let mapper = SpreadsheetStrokeMapper;
    let mut import = CsvImport::default();

    for (line, row) in csv_reader.records().enumerate() {
        let row = row?;
        match map_row(&row, columns, &mapper) {
            Some((sex, group, event, time_ms)) => {
                import.table.set(sex, group, event, time_ms);
                import.imported += 1;
            }
            None => {
                debug!(line = line + 2, "Skipping unmappable row");
                import.skipped += 1;
            }
        }
    }

    info!(
        "Read {} qualifying times ({} rows skipped)",
        import.imported, import.skipped
    );
    Ok(import)
}

pub fn read_standards_file(path: impl AsRef<Path>) -> Result<CsvImport> {
    let file = std::fs::File::open(path.as_ref())?;
    read_standards(file)
}

fn map_row(
    row: &csv::StringRecord,
    columns: Columns,
    mapper: &impl StrokeMapper,
) -> Option<(Sex, AgeGroup, EventKey, i64)> {
    let sex = map_sex(row.get(columns.sex)?)?;
    let group = map_age_group(row.get(columns.age)?)?;
    let stroke = mapper.map_stroke(row.get(columns.stroke)?)?;
    let distance = map_distance(row.get(columns.distance)?)?;
    let time_ms = parse_time(row.get(columns.time)?).ok().filter(|ms| *ms > 0)?;
    Some((sex, group, EventKey::new(stroke, distance), time_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swim_core::models::Stroke;

    #[test]
    fn test_map_sex_checks_women_first() {
        assert_eq!(map_sex("Women"), Some(Sex::F));
        assert_eq!(map_sex("FEMALE"), Some(Sex::F));
        assert_eq!(map_sex("Men"), Some(Sex::M));
        assert_eq!(map_sex("Open"), Some(Sex::M));
        assert_eq!(map_sex("male"), Some(Sex::M));
        assert_eq!(map_sex("Mixed"), None);
    }

    #[test]
    fn test_map_age_group() {
        assert_eq!(map_age_group("10/11"), Some(AgeGroup::TenAndEleven));
        assert_eq!(map_age_group("11-12"), Some(AgeGroup::TenAndEleven));
        assert_eq!(map_age_group("14"), Some(AgeGroup::Fourteen));
        assert_eq!(map_age_group("17/Over"), Some(AgeGroup::EighteenAndOver));
        assert_eq!(map_age_group("18/Over"), Some(AgeGroup::EighteenAndOver));
        assert_eq!(map_age_group("9"), None);
    }

    #[test]
    fn test_map_distance() {
        assert_eq!(map_distance("50m"), Some(Distance::M50));
        assert_eq!(map_distance(" 1500 "), Some(Distance::M1500));
        assert_eq!(map_distance("60"), None);
    }

    #[test]
    fn test_read_standards() {
        let csv = "\
Distance,Stroke,Age Group,Sex,Qualifying Time
50m,Free,13,Men,30.50
100,Fly,10/11,Women,1:30.00
200,IM,18/Over,Open,2:20.00
50,Free,13,Mixed,30.00
50,Relay,13,Men,30.00
50,Back,13,Men,0
";
        let import = read_standards(csv.as_bytes()).unwrap();
        assert_eq!(import.imported, 3);
        assert_eq!(import.skipped, 3);
        assert_eq!(
            import.table.get(Sex::M, AgeGroup::Thirteen, EventKey::new(Stroke::Freestyle, Distance::M50)),
            Some(30_500)
        );
        assert_eq!(
            import.table.get(
                Sex::F,
                AgeGroup::TenAndEleven,
                EventKey::new(Stroke::Butterfly, Distance::M100)
            ),
            Some(90_000)
        );
        assert_eq!(
            import.table.get(
                Sex::M,
                AgeGroup::EighteenAndOver,
                EventKey::new(Stroke::IndividualMedley, Distance::M200)
            ),
            Some(140_000)
        );
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "Distance,Stroke,Sex,Time\n50,Free,Men,30.00\n";
        let err = read_standards(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImporterError::MissingColumn("age")));
    }

    #[test]
    fn test_short_rows_skipped() {
        let csv = "Distance,Stroke,Age,Sex,Time\n50,Free\n50,Free,12,Women,33.00\n";
        let import = read_standards(csv.as_bytes()).unwrap();
        assert_eq!(import.imported, 1);
        assert_eq!(import.skipped, 1);
    }
}
