//! State reports sent upstream after every init and command.
//!
//! Wire layout: `<name> <level>:<target_angle>:<duration>`, colon-delimited,
//! no escaping. Field order is significant.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateReport {
    pub name: String,
    pub level: i32,
    pub target_angle: i32,
    pub duration_s: i32,
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}:{}",
            self.name, self.level, self.target_angle, self.duration_s
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParseError(pub String);

impl fmt::Display for ReportParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed state report: {}", self.0)
    }
}

impl std::error::Error for ReportParseError {}

/// Strict inverse of `Display`, for upstream consumers that need the fields back.
impl FromStr for StateReport {
    type Err = ReportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ReportParseError(s.to_string());
        let (name, rest) = s.split_once(' ').ok_or_else(bad)?;
        let mut fields = rest.split(':');
        let mut next = || -> Result<i32, ReportParseError> {
            fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())
        };
        let level = next()?;
        let target_angle = next()?;
        let duration_s = next()?;
        if fields.next().is_some() || name.is_empty() {
            return Err(bad());
        }
        Ok(Self {
            name: name.to_string(),
            level,
            target_angle,
            duration_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_layout() {
        let r = StateReport {
            name: "servo1".into(),
            level: 100,
            target_angle: 180,
            duration_s: 2,
        };
        assert_eq!(r.to_string(), "servo1 100:180:2");
        assert_eq!("servo1 100:180:2".parse::<StateReport>().unwrap(), r);
    }

    #[test]
    fn negative_fields_survive() {
        let r: StateReport = "s -5:0:-1".parse().unwrap();
        assert_eq!((r.level, r.target_angle, r.duration_s), (-5, 0, -1));
    }

    #[test]
    fn rejects_malformed() {
        for s in ["", "servo1", "servo1 1:2", "servo1 1:2:3:4", "servo1 a:2:3", " 1:2:3"] {
            assert!(s.parse::<StateReport>().is_err(), "{s:?} should fail");
        }
    }
}
