//! OODA planner: lays out observe/orient/decide/act steps for the problem.

use serde_json::{Map, Value};

use crate::io::prompt::Fields;

use super::decode_mapping;

/// The plan is derived from the conversation alone.
pub(super) fn fields() -> Fields {
    Fields::new()
}

/// The phased plan mapping, or empty when malformed.
pub(super) fn decode(completion: &str) -> Map<String, Value> {
    decode_mapping(completion)
}
