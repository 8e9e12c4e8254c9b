use super::{Assign, Fields, ModelNode, extra_key, set, string};
use crate::registry::{Node, Tagged};
use crate::sort::{Key, SortKey};
use crate::statics;
use serde::Serialize;

/// A named script the backend runs on request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Tagged for Action {
    const TAG: &'static str = "Action";
}

impl Assign for Action {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            statics::FIELD_ID => set(&mut self.id, value, Node::as_i64),
            statics::FIELD_NAME => set(&mut self.name, value, string),
            statics::FIELD_CODE => set(&mut self.code, value, string),
            _ => Err(value),
        };
        if let Err(value) = outcome {
            self.extra.insert(key, value);
        }
    }
}

impl Action {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::EN_UNNAMED)
    }
}

impl SortKey for Action {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match field {
            statics::FIELD_ID => self.id.map(Key::Int),
            statics::FIELD_NAME => self.name.as_deref().map(Key::Str),
            _ => extra_key(&self.extra, field),
        }
    }
}
