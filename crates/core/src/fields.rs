//! Known-field introspection.
//!
//! Forward-compatible parsing needs the set of wire field names an entity's constructor
//! accepts, so that everything else can be diverted into the extras bag instead of being
//! silently dropped by serde. The names are read straight out of the serde derive: a
//! collecting [`Deserializer`] is handed to `T::deserialize`, records the `fields` list
//! passed to `deserialize_struct` and bails out. The result is cached per concrete type.
//!
//! The cache follows a compute-and-store pattern without holding the lock during
//! computation. Two threads racing on the same type compute the same `&'static` slice,
//! so whichever insert lands first wins and the other is discarded.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};

type FieldCache = RwLock<HashMap<TypeId, Option<&'static [&'static str]>>>;

static KNOWN_FIELDS: OnceLock<FieldCache> = OnceLock::new();

/// The wire names accepted by an entity's constructor.
#[derive(Debug, Copy, Clone)]
pub struct KnownFields {
    names: Option<&'static [&'static str]>,
}

impl KnownFields {
    /// Look up (computing once) the known fields of `T`.
    pub fn of<T: DeserializeOwned + 'static>() -> Self {
        let cache = KNOWN_FIELDS.get_or_init(Default::default);
        let key = TypeId::of::<T>();

        if let Ok(map) = cache.read() {
            if let Some(names) = map.get(&key) {
                return Self { names: *names };
            }
        }

        let names = introspect::<T>();
        tracing::trace!(
            type_name = std::any::type_name::<T>(),
            fields = ?names,
            "cached constructor field names"
        );

        if let Ok(mut map) = cache.write() {
            map.entry(key).or_insert(names);
        }

        Self { names }
    }

    /// Whether introspection produced a field list at all.
    ///
    /// Types that do not deserialize through `deserialize_struct` (maps, flattened
    /// structs) are opaque; every key is then treated as known.
    pub fn is_opaque(&self) -> bool {
        self.names.is_none()
    }

    pub fn accepts(&self, name: &str) -> bool {
        match self.names {
            Some(names) => names.contains(&name),
            None => true,
        }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names.unwrap_or(&[])
    }
}

fn introspect<T: DeserializeOwned>() -> Option<&'static [&'static str]> {
    let mut collector = FieldCollector { fields: None };
    // Always errors: the collector never produces a value.
    let _ = T::deserialize(&mut collector);
    collector.fields
}

struct FieldCollector {
    fields: Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for &mut FieldCollector {
    type Error = de::value::Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.fields = Some(fields);
        Err(de::Error::custom("field names collected"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
