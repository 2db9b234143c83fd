//! Persisted object state.
//!
//! This is the save/restore form of an object, as opposed to its wire form: it keeps
//! every attribute (unset ones included), the extras bag and internal bookkeeping, but
//! never the owner handle. Restoring is tolerant of the type having evolved since the
//! state was written:
//!
//! - attributes the type no longer declares are moved into the extras bag;
//! - attributes the type declares but the state lacks take their serde defaults
//!   (`None` for optional fields).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ObjectError, ObjectResult};
use crate::fields::KnownFields;
use crate::object::{ApiObject, ObjectMap, Structured};

/// Serializable snapshot of a [`Structured`] object, minus its owner handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub type_name: String,
    pub attributes: ObjectMap,
    #[serde(default)]
    pub extra: ObjectMap,
    #[serde(default)]
    pub internal: ObjectMap,
}

impl<T: ApiObject> Structured<T> {
    /// Snapshot the object for persistence.
    pub fn to_state(&self) -> ObjectResult<ObjectState> {
        let (data, extra, internal) = self.parts_for_state();
        let attributes = match serde_json::to_value(data)? {
            Value::Object(map) => map,
            other => return Err(ObjectError::not_an_object(T::TYPE_NAME, &other)),
        };
        Ok(ObjectState {
            type_name: T::TYPE_NAME.to_owned(),
            attributes,
            extra: extra.clone(),
            internal: internal.clone(),
        })
    }

    /// Restore an object from a snapshot. The restored object has no owner handle.
    pub fn from_state(state: ObjectState) -> ObjectResult<Self> {
        if state.type_name != T::TYPE_NAME {
            return Err(ObjectError::StateMismatch {
                expected: T::TYPE_NAME,
                found: state.type_name,
            });
        }

        let known = KnownFields::of::<T>();
        let mut attributes = ObjectMap::new();
        let mut extra = state.extra;
        let mut orphaned = Vec::new();

        for (key, value) in state.attributes {
            if known.accepts(&key) {
                attributes.insert(key, value);
            } else {
                orphaned.push(key.clone());
                if !value.is_null() && !extra.contains_key(&key) {
                    extra.insert(key, value);
                }
            }
        }

        if !orphaned.is_empty() {
            tracing::debug!(
                type_name = T::TYPE_NAME,
                fields = ?orphaned,
                "attributes no longer declared were moved to extras"
            );
        }

        let data: T = serde_json::from_value(Value::Object(attributes))
            .map_err(|source| ObjectError::construct(T::TYPE_NAME, source))?;
        Ok(Structured::from_parts(data, extra, state.internal))
    }
}
