//! Per-row decomposition of roster results into [`AppraiserRecord`]s.

use appraisers_core::{AppraiserRecord, Error};

use super::name::NameParser;
use super::reader::{Cell, Row};

const NAME_CELL: usize = 0;
const LICENSE_CELL: usize = 1;
const ADDRESS_CELL: usize = 2;

const NBSP: char = '\u{a0}';

/// Street address portion of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub company: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub zip4: String,
}

/// Parse one data row. `index` is the row's position in the table, used only in errors.
pub fn parse_row<N: NameParser + ?Sized>(index: usize, row: &Row, names: &N) -> Result<AppraiserRecord, Error> {
    let name_cell = cell(index, row, NAME_CELL)?;
    let license_cell = cell(index, row, LICENSE_CELL)?;
    let address_cell = cell(index, row, ADDRESS_CELL)?;

    let name = names.parse(run_text(index, name_cell, NAME_CELL, 0)?.trim());

    let license_number = run_text(index, license_cell, LICENSE_CELL, 0)?.trim().to_string();
    let license_type = run_text(index, license_cell, LICENSE_CELL, 1)?.trim().to_string();
    let expiration = run_text(index, license_cell, LICENSE_CELL, 2)?.trim().to_string();

    let segments = address_cell
        .run(0)
        .map(|run| run.lines.as_slice())
        .ok_or_else(|| shape(index, format!("cell {ADDRESS_CELL} has no text run")))?;
    let address = parse_address(segments).map_err(|reason| shape(index, reason))?;

    Ok(AppraiserRecord {
        firstname: name.first,
        middlename: name.initials,
        lastname: name.last,
        license_number,
        license_type,
        expiration,
        company: address.company,
        address: address.street,
        city: address.city,
        state: address.state,
        zip: address.zip,
        zip4: address.zip4,
    })
}

/// Classify address lines by count: `[company, street, city/state/zip]` or `[street, city/state/zip]`.
///
/// Blank lines are ignored. A company name that itself spans two lines is misread; the roster
/// offers nothing better to go on.
pub fn parse_address<S: AsRef<str>>(segments: &[S]) -> Result<Address, String> {
    let lines: Vec<&str> = segments.iter().map(|s| s.as_ref().trim()).filter(|s| !s.is_empty()).collect();

    let (company, street, locality) = match lines.as_slice() {
        [company, street, locality] => (Some((*company).to_string()), *street, *locality),
        [street, locality] => (None, *street, *locality),
        other => return Err(format!("address has {} segments, expected 2 or 3", other.len())),
    };

    let (city, state, zip) = split_city_state_zip(locality)?;
    let (zip, zip4) = split_zip(&zip);

    Ok(Address { company, street: street.to_string(), city, state, zip, zip4 })
}

/// Split `CITY,&nbsp;ST&nbsp;ZIP` on non-breaking spaces into exactly three parts.
pub fn split_city_state_zip(locality: &str) -> Result<(String, String, String), String> {
    let locality = locality.replace("&nbsp;", "\u{a0}");
    let parts: Vec<&str> = locality.split(NBSP).collect();

    let [city, state, zip] = parts.as_slice() else {
        return Err(format!("city/state/zip has {} parts, expected 3: {locality:?}", parts.len()));
    };

    let city = city.trim_end_matches(|c: char| c == ',' || c.is_whitespace()).trim();
    Ok((city.to_string(), state.trim().to_string(), zip.trim().to_string()))
}

/// `787014321` -> (`78701`, `4321`); anything else passes through with an empty extension.
pub fn split_zip(zip: &str) -> (String, String) {
    let zip = zip.trim();
    if zip.len() == 9 && zip.bytes().all(|b| b.is_ascii_digit()) {
        let (base, ext) = zip.split_at(5);
        (base.to_string(), ext.to_string())
    } else {
        (zip.to_string(), String::new())
    }
}

fn cell(index: usize, row: &Row, cell: usize) -> Result<&Cell, Error> {
    row.cell(cell)
        .ok_or_else(|| shape(index, format!("has {} cells, expected at least {}", row.cells.len(), cell + 1)))
}

fn run_text(index: usize, cell: &Cell, cell_index: usize, run: usize) -> Result<String, Error> {
    cell.run(run)
        .map(|r| r.text())
        .ok_or_else(|| shape(index, format!("cell {cell_index} is missing text run {run}")))
}

fn shape(index: usize, reason: impl std::fmt::Display) -> Error {
    Error::UnexpectedRowShape(format!("row {index}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::name::HumanNameParser;
    use crate::extract::reader::Run;

    fn row(name: &str, license: [&str; 3], address: &[&str]) -> Row {
        Row {
            cells: vec![
                Cell { runs: vec![Run::new([name])] },
                Cell { runs: license.iter().map(|l| Run::new([*l])).collect() },
                Cell { runs: vec![Run::new(address.iter().copied())] },
            ],
        }
    }

    #[test]
    fn test_address_with_company() {
        let address = parse_address(&["Acme Corp", "123 Main St", "Austin&nbsp;TX&nbsp;787014321"]).unwrap();
        assert_eq!(address.company.as_deref(), Some("Acme Corp"));
        assert_eq!(address.street, "123 Main St");
        assert_eq!(address.city, "Austin");
        assert_eq!(address.state, "TX");
        assert_eq!(address.zip, "78701");
        assert_eq!(address.zip4, "4321");
    }

    #[test]
    fn test_address_without_company() {
        let address = parse_address(&["123 Main St", "Austin,\u{a0}TX\u{a0}78701"]).unwrap();
        assert!(address.company.is_none());
        assert_eq!(address.street, "123 Main St");
        assert_eq!(address.city, "Austin");
        assert_eq!(address.zip, "78701");
        assert_eq!(address.zip4, "");
    }

    #[test]
    fn test_address_ignores_blank_lines() {
        let address = parse_address(&["  ", "9 Elm Rd", "Nome\u{a0}AK\u{a0}99762", ""]).unwrap();
        assert!(address.company.is_none());
        assert_eq!(address.street, "9 Elm Rd");
    }

    #[test]
    fn test_address_bad_segment_count() {
        assert!(parse_address(&["only one"]).is_err());
        assert!(parse_address(&["a", "b", "c", "Austin\u{a0}TX\u{a0}78701"]).is_err());
        assert!(parse_address::<&str>(&[]).is_err());
    }

    #[test]
    fn test_split_city_state_zip() {
        let (city, state, zip) = split_city_state_zip("SAN ANTONIO , \u{a0} TX \u{a0}78201 ").unwrap();
        assert_eq!(city, "SAN ANTONIO");
        assert_eq!(state, "TX");
        assert_eq!(zip, "78201");

        assert!(split_city_state_zip("Austin TX 78701").is_err());
        assert!(split_city_state_zip("Austin\u{a0}TX").is_err());
    }

    #[test]
    fn test_split_zip() {
        assert_eq!(split_zip("787014321"), ("78701".to_string(), "4321".to_string()));
        assert_eq!(split_zip(" 78701 "), ("78701".to_string(), String::new()));
        assert_eq!(split_zip("78701-4321"), ("78701-4321".to_string(), String::new()));
        assert_eq!(split_zip("7870143AB"), ("7870143AB".to_string(), String::new()));
    }

    #[test]
    fn test_parse_row() {
        let row = row(
            "PAUL M LEWIS MR",
            [" AK1234 ", "Certified Residential", "12/31/2026"],
            &["ACME APPRAISALS", "123 MAIN ST", "ANCHORAGE,\u{a0}AK\u{a0}995011234"],
        );
        let record = parse_row(1, &row, &HumanNameParser).unwrap();

        assert_eq!(record.firstname, "Paul");
        assert_eq!(record.middlename, "M");
        assert_eq!(record.lastname, "Lewis");
        assert_eq!(record.license_number, "AK1234");
        assert_eq!(record.license_type, "Certified Residential");
        assert_eq!(record.expiration, "12/31/2026");
        assert_eq!(record.company.as_deref(), Some("ACME APPRAISALS"));
        assert_eq!(record.address, "123 MAIN ST");
        assert_eq!(record.city, "ANCHORAGE");
        assert_eq!(record.state, "AK");
        assert_eq!(record.zip, "99501");
        assert_eq!(record.zip4, "1234");
    }

    #[test]
    fn test_parse_row_missing_cell() {
        let mut row = row("JAMES J MA", ["X1", "Licensed", "01/01/2027"], &["1 A St", "Juneau\u{a0}AK\u{a0}99801"]);
        row.cells.truncate(2);

        let err = parse_row(4, &row, &HumanNameParser).unwrap_err();
        assert!(matches!(err, Error::UnexpectedRowShape(ref msg) if msg.starts_with("row 4")));
    }

    #[test]
    fn test_parse_row_missing_license_run() {
        let mut row = row("JAMES J MA", ["X1", "Licensed", "01/01/2027"], &["1 A St", "Juneau\u{a0}AK\u{a0}99801"]);
        row.cells[1].runs.pop();

        assert!(matches!(parse_row(1, &row, &HumanNameParser), Err(Error::UnexpectedRowShape(_))));
    }

    #[test]
    fn test_parse_row_bad_address() {
        let row = row("JAMES J MA", ["X1", "Licensed", "01/01/2027"], &["Juneau AK 99801"]);
        assert!(matches!(parse_row(1, &row, &HumanNameParser), Err(Error::UnexpectedRowShape(_))));
    }
}
