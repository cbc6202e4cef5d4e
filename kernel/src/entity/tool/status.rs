use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    Available,
    Rented,
    Unavailable,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Available => "AVAILABLE",
            ToolStatus::Rented => "RENTED",
            ToolStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl Display for ToolStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(ToolStatus::Available),
            "RENTED" => Ok(ToolStatus::Rented),
            "UNAVAILABLE" => Ok(ToolStatus::Unavailable),
            _ => Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("Unknown tool status `{s}`"))),
        }
    }
}
