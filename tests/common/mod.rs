use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str =
    "type,agreement,account_type,amount,number,to_agreement,to_account_type,commission";

/// Writes `rows` under the batch header into a temporary CSV file.
pub fn operations_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Two agreements with one primary account each.
pub const TWO_PARTIES: [&str; 4] = [
    "agreement,acme,,,,,,",
    "agreement,globex,,,,,,",
    "account,acme,0,100,A-1,,,",
    "account,globex,0,0,G-1,,,",
];
