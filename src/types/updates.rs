use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selection's value for the `updateEventData` mutation, e.g. a rated
/// price keyed by runner id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionData {
    /// Id of the selection (runner) the value belongs to
    pub selection_id: String,
    /// The value to store; the API accepts strings and numbers
    pub value: Value,
}

impl SelectionData {
    pub fn new(selection_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            selection_id: selection_id.into(),
            value: value.into(),
        }
    }
}
