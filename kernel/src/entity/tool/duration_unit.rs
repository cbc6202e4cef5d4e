use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Granularity a tool is priced in. Anything unrecognised is priced per day.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Day,
    Week,
    Month,
}

impl DurationUnit {
    pub fn parse_lossy(value: Option<&str>) -> Self {
        match value.map(|unit| unit.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => DurationUnit::Week,
            Some("month") => DurationUnit::Month,
            _ => DurationUnit::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
        }
    }
}

impl Display for DurationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::DurationUnit;

    #[test]
    fn unknown_units_fall_back_to_day() {
        assert_eq!(DurationUnit::parse_lossy(None), DurationUnit::Day);
        assert_eq!(DurationUnit::parse_lossy(Some("")), DurationUnit::Day);
        assert_eq!(DurationUnit::parse_lossy(Some("fortnight")), DurationUnit::Day);
        assert_eq!(DurationUnit::parse_lossy(Some("Week")), DurationUnit::Week);
        assert_eq!(DurationUnit::parse_lossy(Some(" month ")), DurationUnit::Month);
    }
}
