//! where record lines come from
//!
//! the pipeline only needs a materialized list of lines

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Error;

const SAMPLE: &[&str] = &[
    "2025-03-28 08:00:00,TL1,5",
    "2025-03-28 08:01:00,TL2,3",
    "2025-03-28 08:02:00,TL1,7",
    "2025-03-28 08:03:00,TL3,4",
    "2025-03-28 08:04:00,TL2,6",
    "2025-03-28 08:05:00,TL1,2",
    "2025-03-28 08:06:00,TL3,8",
    "2025-03-28 08:07:00,TL2,5",
];

/// the built in demo data set
pub fn sample() -> Vec<String> {
    SAMPLE.iter().map(|s| s.to_string()).collect()
}

/// collect every non blank line of `reader`
pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<String>, Error> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}
