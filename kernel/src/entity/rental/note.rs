use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct PickupNote(String);

impl PickupNote {
    pub fn new(note: impl Into<String>) -> Self {
        Self(note.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct CancellationReason(String);

impl CancellationReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ReturnCondition(String);

impl ReturnCondition {
    pub fn new(condition: impl Into<String>) -> Self {
        Self(condition.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct RentalNotes(String);

impl RentalNotes {
    pub fn new(notes: impl Into<String>) -> Self {
        Self(notes.into())
    }
}
