//! Context validator: judges whether the gathered context answers the query.

use serde_json::{Map, Value};

use crate::io::prompt::Fields;

use super::{context_query_fields, decode_mapping};

pub(super) fn fields(context: &str, query: &str) -> Fields {
    context_query_fields(context, query)
}

/// The verdict mapping as returned by the model, or empty when malformed.
pub(super) fn decode(completion: &str) -> Map<String, Value> {
    decode_mapping(completion)
}
