//! Metadata query port
//!
//! Carries a compiled query from the query creator to the query execution
//! nodes. The payload is a JSON object holding the descriptor under the
//! `query` flow variable.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::constants::FLOW_VARIABLE_QUERY;

use super::filters::QueryDescriptor;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("Invalid port payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Port payload has no '{0}' entry")]
    MissingQuery(&'static str),
}

/// Port object forwarding a metadata query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataQueryPort {
    query: QueryDescriptor,
}

impl MetadataQueryPort {
    pub fn new(query: QueryDescriptor) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// Payload as a JSON value
    pub fn to_value(&self) -> Result<Value, PortError> {
        let mut payload = Map::new();
        payload.insert(
            FLOW_VARIABLE_QUERY.to_string(),
            serde_json::to_value(&self.query)?,
        );
        Ok(Value::Object(payload))
    }

    pub fn serialize(&self) -> Result<Vec<u8>, PortError> {
        Ok(serde_json::to_vec(&self.to_value()?)?)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, PortError> {
        let mut payload: Map<String, Value> = serde_json::from_slice(data)?;
        let query = payload
            .remove(FLOW_VARIABLE_QUERY)
            .ok_or(PortError::MissingQuery(FLOW_VARIABLE_QUERY))?;
        Ok(Self {
            query: serde_json::from_value(query)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::{FilterDescriptor, ValueType};

    fn descriptor() -> QueryDescriptor {
        QueryDescriptor {
            filter_logic: "f0".to_string(),
            selected_tags: vec!["FileName".to_string()],
            limit: None,
            offset: 5,
            only_count: false,
            filters: vec![FilterDescriptor {
                tag: "FileModifyDate".to_string(),
                value_type: ValueType::Date,
                operation: "GREATER".to_string(),
                target: "2024-01-01 00:00:00".to_string(),
                timestamp: Some(1704067200),
            }],
        }
    }

    #[test]
    fn payload_is_keyed_by_query() {
        let port = MetadataQueryPort::new(descriptor());
        let value = port.to_value().unwrap();
        assert_eq!(value["query"]["filter_logic"], "f0");
        assert_eq!(value["query"]["limit"], Value::Null);
        assert_eq!(value["query"]["filters"][0]["value_type"], "DATE");
    }

    #[test]
    fn serialized_port_restores_descriptor() {
        let port = MetadataQueryPort::new(descriptor());
        let bytes = port.serialize().unwrap();
        let restored = MetadataQueryPort::deserialize(&bytes).unwrap();
        assert_eq!(restored, port);
    }

    #[test]
    fn deserialize_without_query() {
        let err = MetadataQueryPort::deserialize(br#"{"instance": "core"}"#).unwrap_err();
        assert!(matches!(err, PortError::MissingQuery("query")));
    }

    #[test]
    fn deserialize_invalid_json() {
        let err = MetadataQueryPort::deserialize(b"not json").unwrap_err();
        assert!(matches!(err, PortError::Json(_)));
    }
}
