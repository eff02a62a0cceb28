use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One player's statistics as returned by SportsDataIO
///
/// The record keeps every field the API sent, in the order it was sent, so
/// the uploaded line is the API object verbatim. The accessors below cover
/// the columns the external table declares; none of them are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRecord(Map<String, Value>);

impl PlayerRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn player_id(&self) -> Option<i64> {
        self.0.get("PlayerID").and_then(Value::as_i64)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.str_field("FirstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.str_field("LastName")
    }

    pub fn team(&self) -> Option<&str> {
        self.str_field("Team")
    }

    pub fn position(&self) -> Option<&str> {
        self.str_field("Position")
    }

    pub fn points(&self) -> Option<i64> {
        self.0.get("Points").and_then(Value::as_i64)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

/// Player records fetched during one run, possibly empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<PlayerRecord>,
}

impl Dataset {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    /// Narrow to a dataset that is guaranteed to hold at least one record
    pub fn populated(self) -> Option<PopulatedDataset> {
        if self.records.is_empty() {
            None
        } else {
            Some(PopulatedDataset { records: self.records })
        }
    }
}

/// A dataset with at least one record; the only input the uploader accepts
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedDataset {
    records: Vec<PlayerRecord>,
}

impl PopulatedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }
}
