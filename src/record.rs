//! traffic sensor record and its line format
//!
//! a record line looks like `<timestamp>,<lightID>,<vehicleCount>`

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// One observation from a traffic light sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub timestamp: String,
    pub light_id: String,
    pub vehicle_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// the line did not split into exactly three fields
    FieldCount(usize),
    /// the light identifier field is blank
    EmptyLightId,
    /// the count is not a non-negative integer
    InvalidCount(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FieldCount(n) => write!(f, "expected 3 fields, found {}", n),
            ParseError::EmptyLightId => write!(f, "empty light id"),
            ParseError::InvalidCount(s) => write!(f, "invalid vehicle count {:?}", s),
        }
    }
}

impl Error for ParseError {}

impl Record {
    pub fn new(timestamp: &str, light_id: &str, vehicle_count: u64) -> Self {
        Record {
            timestamp: timestamp.to_owned(),
            light_id: light_id.to_owned(),
            vehicle_count,
        }
    }

    /// parse one comma separated line, surrounding whitespace of each field is ignored
    pub fn parse(line: &str) -> Result<Record, ParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let (timestamp, light_id, count) = match fields[..] {
            [timestamp, light_id, count] => (timestamp, light_id, count),
            _ => return Err(ParseError::FieldCount(fields.len())),
        };

        if light_id.is_empty() {
            return Err(ParseError::EmptyLightId);
        }

        let vehicle_count = count
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidCount(count.to_owned()))?;

        Ok(Record::new(timestamp, light_id, vehicle_count))
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Record::parse(s)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.timestamp, self.light_id, self.vehicle_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok() {
        let r: Record = "2025-03-28 08:00:00,TL1,5".parse().unwrap();
        assert_eq!(r, Record::new("2025-03-28 08:00:00", "TL1", 5));
        assert_eq!(r.to_string(), "2025-03-28 08:00:00,TL1,5");

        let r = Record::parse("t,TL1,18446744073709551615").unwrap();
        assert_eq!(r.vehicle_count, u64::MAX);
    }

    #[test]
    fn parse_trims_fields() {
        let r = Record::parse(" t , TL9 , 12\r").unwrap();
        assert_eq!(r.light_id, "TL9");
        assert_eq!(r.vehicle_count, 12);
    }

    #[test]
    fn zero_count_is_valid() {
        assert_eq!(Record::parse("t,TL1,0").unwrap().vehicle_count, 0);
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(Record::parse("t,TL1"), Err(ParseError::FieldCount(2)));
        assert_eq!(Record::parse("t,TL1,3,4"), Err(ParseError::FieldCount(4)));
        assert_eq!(Record::parse(""), Err(ParseError::FieldCount(1)));
    }

    #[test]
    fn bad_count() {
        assert_eq!(
            Record::parse("t,TL1,-3"),
            Err(ParseError::InvalidCount("-3".into()))
        );
        assert_eq!(
            Record::parse("t,TL1,lots"),
            Err(ParseError::InvalidCount("lots".into()))
        );
        // one past u64::MAX
        assert_eq!(
            Record::parse("t,TL1,18446744073709551616"),
            Err(ParseError::InvalidCount("18446744073709551616".into()))
        );
        assert_eq!(
            Record::parse("t,TL1,"),
            Err(ParseError::InvalidCount("".into()))
        );
        assert_eq!(
            Record::parse("t,TL1,2.5"),
            Err(ParseError::InvalidCount("2.5".into()))
        );
    }

    #[test]
    fn blank_light_id() {
        assert_eq!(Record::parse("t, ,3"), Err(ParseError::EmptyLightId));
    }
}
