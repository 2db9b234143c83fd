//! Structured object base.
//!
//! Every entity of the API is a plain serde struct implementing [`ApiObject`]. The base
//! behaviour (freezing, identity equality, forward-compatible JSON round-tripping, the
//! owner handle) lives in the [`Structured`] wrapper, so declaring an entity is only a
//! matter of declaring its fields.
//!
//! ## Lifecycle
//!
//! - [`Draft`]: under construction. Declared fields are mutable (`DerefMut`), undeclared
//!   data goes into the extras bag.
//! - [`Structured`]: frozen. Read access through `Deref`, no public setters. The only
//!   mutation path is [`Structured::unfrozen`], a scoped view that ends with the closure.
//!
//! Freezing is a property of the type, not a runtime flag, so there is nothing to
//! restore when a scoped mutation unwinds.
//!
//! ## Extras
//!
//! Fields present in input but not declared by the entity are kept, in order, in
//! [`Structured::extra_fields`] and are written back out, flattened, on serialization.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};
use std::any::Any;
use std::sync::{Arc, Weak};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::bot::Bot;
use crate::error::{ObjectError, ObjectResult};
use crate::fields::KnownFields;

/// Ordered string-keyed JSON mapping.
pub type ObjectMap = serde_json::Map<String, Value>;

/// Prefix marking internal bookkeeping attributes, settable regardless of freezing.
pub const INTERNAL_PREFIX: char = '_';

/// Declaration contract for an API entity.
///
/// Implementors are serde structs whose field names (after `rename`) are the wire
/// names. Everything else is provided by [`Structured`].
pub trait ApiObject: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Class name used in errors, the textual representation and hashing.
    const TYPE_NAME: &'static str;

    /// `(wire name, attribute name)` pairs for fields renamed to dodge reserved words,
    /// e.g. `("from", "from_user")`.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// `(field, value)` of the discriminator for union variants. The value is hardcoded:
    /// it is emitted on serialization and stripped from input.
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = None;

    /// Identity fields, compared for equality and fed to the hash.
    type Id: PartialEq + Eq + Hash + fmt::Debug;

    /// `None` when the type declares no identity fields.
    fn identity(&self) -> Option<Self::Id>;

    /// Forward the owner handle to nested objects.
    fn bind_children(&mut self, _bot: Option<&Arc<dyn Bot>>) {}
}

#[derive(Clone)]
struct Parts<T> {
    data: T,
    extra: ObjectMap,
    internal: ObjectMap,
    bot: Option<Weak<dyn Bot>>,
}

impl<T: ApiObject> Parts<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            extra: ObjectMap::new(),
            internal: ObjectMap::new(),
            bot: None,
        }
    }

    fn declared(&self) -> ObjectResult<ObjectMap> {
        match serde_json::to_value(&self.data)? {
            Value::Object(map) => Ok(map),
            other => Err(ObjectError::not_an_object(T::TYPE_NAME, &other)),
        }
    }

    fn rebuild(&mut self, declared: ObjectMap) -> ObjectResult<()> {
        self.data = serde_json::from_value(Value::Object(declared))
            .map_err(|source| ObjectError::construct(T::TYPE_NAME, source))?;
        Ok(())
    }

    fn set_attr(&mut self, name: &str, value: Value) -> ObjectResult<()> {
        if name.starts_with(INTERNAL_PREFIX) {
            self.internal.insert(name.to_owned(), value);
            return Ok(());
        }
        let wire = wire_name::<T>(name);
        if KnownFields::of::<T>().accepts(wire) {
            let mut declared = self.declared()?;
            declared.insert(wire.to_owned(), value);
            self.rebuild(declared)
        } else {
            self.extra.insert(name.to_owned(), value);
            Ok(())
        }
    }

    fn del_attr(&mut self, name: &str) -> ObjectResult<()> {
        if name.starts_with(INTERNAL_PREFIX) {
            self.internal = drop_key(std::mem::take(&mut self.internal), name);
            return Ok(());
        }
        let wire = wire_name::<T>(name);
        if KnownFields::of::<T>().accepts(wire) {
            let declared = drop_key(self.declared()?, wire);
            self.rebuild(declared)
        } else if self.extra.contains_key(name) {
            self.extra = drop_key(std::mem::take(&mut self.extra), name);
            Ok(())
        } else {
            Err(ObjectError::no_such_field(name, T::TYPE_NAME))
        }
    }

    /// Move extras naming a declared field that is still unset into that field.
    ///
    /// This is how values for a field that reached the object through the extras bag
    /// (hand-built objects, old persisted state) end up on the field itself.
    fn rescue_extras(&mut self) {
        let known = KnownFields::of::<T>();
        if known.is_opaque() || !self.extra.keys().any(|k| known.accepts(k)) {
            return;
        }
        let Ok(mut declared) = self.declared() else {
            return;
        };

        let mut moved = Vec::new();
        for (key, value) in &self.extra {
            let unset = declared.get(key).is_none_or(Value::is_null);
            if known.accepts(key) && unset {
                declared.insert(key.clone(), value.clone());
                moved.push(key.clone());
            }
        }
        if moved.is_empty() {
            return;
        }

        match serde_json::from_value::<T>(Value::Object(declared)) {
            Ok(data) => {
                tracing::debug!(type_name = T::TYPE_NAME, fields = ?moved, "moved extras onto declared fields");
                self.data = data;
                self.extra = std::mem::take(&mut self.extra)
                    .into_iter()
                    .filter(|(k, _)| !moved.contains(k))
                    .collect();
            }
            Err(error) => {
                tracing::debug!(type_name = T::TYPE_NAME, %error, "extras left in place");
            }
        }
    }
}

/// An object under construction.
pub struct Draft<T: ApiObject> {
    parts: Parts<T>,
}

impl<T: ApiObject> Draft<T> {
    pub fn new(data: T) -> Self {
        Self {
            parts: Parts::new(data),
        }
    }

    /// Attach an extras bag of undeclared data.
    pub fn with_extra(mut self, extra: ObjectMap) -> Self {
        self.parts.extra.extend(extra);
        self
    }

    pub fn extra_fields_mut(&mut self) -> &mut ObjectMap {
        &mut self.parts.extra
    }

    /// Set a field by name. Declared names go to the field (through serde), undeclared
    /// names to the extras bag, `_`-prefixed names to internal bookkeeping.
    pub fn set_attr(&mut self, name: &str, value: Value) -> ObjectResult<()> {
        self.parts.set_attr(name, value)
    }

    /// Unset a field by name. Removing a required field fails with the entity's own
    /// construction error and leaves the draft untouched.
    pub fn del_attr(&mut self, name: &str) -> ObjectResult<()> {
        self.parts.del_attr(name)
    }

    /// Finish construction.
    pub fn freeze(mut self) -> Structured<T> {
        self.parts.rescue_extras();
        Structured { parts: self.parts }
    }
}

impl<T: ApiObject> Deref for Draft<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.parts.data
    }
}

impl<T: ApiObject> DerefMut for Draft<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.parts.data
    }
}

/// Scoped mutable view handed out by [`Structured::unfrozen`].
pub struct Unfrozen<'a, T: ApiObject> {
    parts: &'a mut Parts<T>,
}

impl<T: ApiObject> Unfrozen<'_, T> {
    pub fn set_attr(&mut self, name: &str, value: Value) -> ObjectResult<()> {
        self.parts.set_attr(name, value)
    }

    pub fn del_attr(&mut self, name: &str) -> ObjectResult<()> {
        self.parts.del_attr(name)
    }

    pub fn extra_fields_mut(&mut self) -> &mut ObjectMap {
        &mut self.parts.extra
    }
}

impl<T: ApiObject> Deref for Unfrozen<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.parts.data
    }
}

impl<T: ApiObject> DerefMut for Unfrozen<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.parts.data
    }
}

/// A frozen API object.
///
/// `Clone` is a deep copy of the data and the extras bag; the owner handle is shared
/// between the original and the copy, since it stands for one external client.
pub struct Structured<T: ApiObject> {
    parts: Parts<T>,
}

impl<T: ApiObject> Structured<T> {
    /// Freeze an already complete value.
    pub fn new(data: T) -> Self {
        Draft::new(data).freeze()
    }

    pub fn with_extra(data: T, extra: ObjectMap) -> Self {
        Draft::new(data).with_extra(extra).freeze()
    }

    pub fn inner(&self) -> &T {
        &self.parts.data
    }

    pub fn into_inner(self) -> T {
        self.parts.data
    }

    /// Undeclared fields captured from input, in arrival order.
    pub fn extra_fields(&self) -> &ObjectMap {
        &self.parts.extra
    }

    /// Identity fields, or `None` when the type declares none.
    pub fn identity(&self) -> Option<T::Id> {
        self.parts.data.identity()
    }

    /// Mutate the object inside a scope.
    ///
    /// Meant for derived fields computed after construction. The object is frozen again
    /// as soon as the closure returns, including when it panics.
    pub fn unfrozen<R>(&mut self, f: impl FnOnce(&mut Unfrozen<'_, T>) -> R) -> R {
        let mut view = Unfrozen {
            parts: &mut self.parts,
        };
        f(&mut view)
    }

    /// Dynamic attribute assignment.
    ///
    /// `_`-prefixed names are internal bookkeeping and always accepted; any other name
    /// fails with [`ObjectError::Frozen`].
    pub fn set_attr(&mut self, name: &str, value: Value) -> ObjectResult<()> {
        if name.starts_with(INTERNAL_PREFIX) {
            self.parts.internal.insert(name.to_owned(), value);
            Ok(())
        } else {
            Err(ObjectError::frozen(name, T::TYPE_NAME))
        }
    }

    /// Dynamic attribute deletion, same rules as [`Structured::set_attr`].
    pub fn del_attr(&mut self, name: &str) -> ObjectResult<()> {
        if name.starts_with(INTERNAL_PREFIX) {
            self.parts.internal = drop_key(std::mem::take(&mut self.parts.internal), name);
            Ok(())
        } else {
            Err(ObjectError::frozen(name, T::TYPE_NAME))
        }
    }

    /// Internal bookkeeping value set through `set_attr("_name", ..)`.
    pub fn internal(&self, name: &str) -> Option<&Value> {
        self.parts.internal.get(name)
    }

    /// Subscript access by field name.
    ///
    /// Accepts wire names and attribute names (`from` and `from_user` alike). A declared
    /// field that is unset yields `Value::Null`; undeclared names are an error, extras
    /// included.
    pub fn get(&self, name: &str) -> ObjectResult<Value> {
        if let Some((field, value)) = T::DISCRIMINATOR {
            if name == field {
                return Ok(Value::String(value.to_owned()));
            }
        }
        let wire = wire_name::<T>(name);
        if !KnownFields::of::<T>().accepts(wire) {
            return Err(ObjectError::no_such_field(name, T::TYPE_NAME));
        }
        let declared = self.parts.declared()?;
        Ok(declared.get(wire).cloned().unwrap_or(Value::Null))
    }

    /// Attach (or detach) the owner handle, and forward it to nested objects.
    ///
    /// The handle is bookkeeping, not state, so this is allowed on frozen objects.
    pub fn set_bot(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.parts.bot = bot.map(Arc::downgrade);
        self.parts.data.bind_children(bot);
    }

    /// The client this object was produced by.
    pub fn get_bot(&self) -> ObjectResult<Arc<dyn Bot>> {
        let weak = self
            .parts
            .bot
            .as_ref()
            .ok_or(ObjectError::MissingBot { class: T::TYPE_NAME })?;
        weak.upgrade()
            .ok_or(ObjectError::BotDropped { class: T::TYPE_NAME })
    }

    pub fn bot_handle(&self) -> Option<&Weak<dyn Bot>> {
        self.parts.bot.as_ref()
    }

    /// Convert to a wire mapping.
    ///
    /// Unset fields and empty lists are omitted. Nested objects always serialize to
    /// mappings under their wire names; `recursive` controls whether renamed top-level
    /// fields go out under their wire name (`from`) or their attribute name
    /// (`from_user`). Extras are merged in at the top level; a declared field wins over
    /// an extra of the same name.
    pub fn to_mapping(&self, recursive: bool) -> ObjectResult<ObjectMap> {
        let mut out = ObjectMap::new();
        if let Some((field, value)) = T::DISCRIMINATOR {
            out.insert(field.to_owned(), Value::String(value.to_owned()));
        }

        for (key, value) in self.parts.declared()? {
            if is_blank(&value) {
                continue;
            }
            let key = if recursive {
                key
            } else {
                attribute_name::<T>(&key).map(str::to_owned).unwrap_or(key)
            };
            out.insert(key, value);
        }

        for (key, value) in &self.parts.extra {
            if out.contains_key(key) {
                tracing::warn!(
                    type_name = T::TYPE_NAME,
                    field = %key,
                    "extra field shadows a declared field and is dropped from output"
                );
                continue;
            }
            out.insert(key.clone(), value.clone());
        }

        Ok(out)
    }

    /// Wire mapping rendered as JSON text.
    pub fn to_json(&self) -> ObjectResult<String> {
        Ok(serde_json::to_string(&self.to_mapping(true)?)?)
    }

    /// Build from a wire mapping.
    ///
    /// Keys the entity does not declare are diverted into the extras bag rather than
    /// being handed to the constructor, so input carrying fields newer than this
    /// version still parses and re-serializes losslessly. Construction errors of the
    /// entity itself are returned as [`ObjectError::Construct`], as is a discriminator value
    /// other than the type's own.
    pub fn from_mapping(data: ObjectMap, bot: Option<&Arc<dyn Bot>>) -> ObjectResult<Self> {
        let known = KnownFields::of::<T>();
        let mut args = ObjectMap::new();
        let mut extra = ObjectMap::new();

        for (key, value) in data {
            if let Some((field, tag)) = T::DISCRIMINATOR {
                if key == field {
                    if value.as_str() == Some(tag) {
                        continue;
                    }
                    let source = <serde_json::Error as serde::de::Error>::custom(format!(
                        "`{field}` must be \"{tag}\", found {value}"
                    ));
                    return Err(ObjectError::construct(T::TYPE_NAME, source));
                }
            }
            let (key, attribute) = match T::ALIASES.iter().find(|(_, attr)| *attr == key) {
                Some((wire, _)) => ((*wire).to_owned(), Some(key)),
                None => (key, None),
            };
            if !known.accepts(&key) {
                extra.insert(key, value);
            } else if args.contains_key(&key) {
                // Sent under both its wire and attribute name: the wire name wins.
                tracing::debug!(
                    type_name = T::TYPE_NAME,
                    field = %key,
                    "field given under both names, attribute-name value kept as extra"
                );
                match attribute {
                    Some(attribute) => {
                        extra.insert(attribute, value);
                    }
                    None => {
                        let attribute = attribute_name::<T>(&key).unwrap_or(key.as_str()).to_owned();
                        if let Some(previous) = args.insert(key, value) {
                            extra.insert(attribute, previous);
                        }
                    }
                }
            } else {
                args.insert(key, value);
            }
        }

        if !extra.is_empty() {
            tracing::debug!(
                type_name = T::TYPE_NAME,
                fields = ?extra.keys().collect::<Vec<_>>(),
                "unknown fields kept as extras"
            );
        }

        let data: T = serde_json::from_value(Value::Object(args))
            .map_err(|source| ObjectError::construct(T::TYPE_NAME, source))?;

        let mut obj = Draft::new(data).with_extra(extra).freeze();
        if bot.is_some() {
            obj.set_bot(bot);
        }
        Ok(obj)
    }

    /// Build from any JSON value. `null` yields `None`.
    pub fn from_value(value: Value, bot: Option<&Arc<dyn Bot>>) -> ObjectResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Self::from_mapping(map, bot).map(Some),
            other => Err(ObjectError::not_an_object(T::TYPE_NAME, &other)),
        }
    }

    pub fn from_json(text: &str, bot: Option<&Arc<dyn Bot>>) -> ObjectResult<Option<Self>> {
        Self::from_value(serde_json::from_str(text)?, bot)
    }

    /// Build a list, dropping `null` placeholders.
    pub fn from_mapping_list(
        values: impl IntoIterator<Item = Value>,
        bot: Option<&Arc<dyn Bot>>,
    ) -> ObjectResult<Box<[Self]>> {
        let mut out = Vec::new();
        for value in values {
            if let Some(obj) = Self::from_value(value, bot)? {
                out.push(obj);
            }
        }
        Ok(out.into_boxed_slice())
    }

    pub(crate) fn parts_for_state(&self) -> (&T, &ObjectMap, &ObjectMap) {
        (&self.parts.data, &self.parts.extra, &self.parts.internal)
    }

    pub(crate) fn from_parts(data: T, extra: ObjectMap, internal: ObjectMap) -> Self {
        let mut draft = Draft::new(data).with_extra(extra);
        draft.parts.internal = internal;
        draft.freeze()
    }
}

/// Serde adapter for list fields of objects.
///
/// `#[serde(default, deserialize_with = "tgkit_core::object::list::deserialize")]`
///
/// Drops `null` placeholders, as [`Structured::from_mapping_list`] does, and reads a
/// `null` list as empty.
pub mod list {
    use serde::{Deserialize, Deserializer};

    use super::{ApiObject, Structured};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<Structured<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: ApiObject,
    {
        let items = Option::<Vec<Option<Structured<T>>>>::deserialize(deserializer)?;
        Ok(items.into_iter().flatten().flatten().collect())
    }
}

/// Bind a handle to every object of a list field.
pub fn bind_all<T: ApiObject>(items: &mut [Structured<T>], bot: Option<&Arc<dyn Bot>>) {
    for item in items {
        item.set_bot(bot);
    }
}

impl<T: ApiObject> Deref for Structured<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.parts.data
    }
}

impl<T: ApiObject> Clone for Structured<T> {
    fn clone(&self) -> Self {
        Self {
            parts: self.parts.clone(),
        }
    }
}

impl<T: ApiObject> PartialEq for Structured<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.identity(), other.identity());
        if a.is_none() || b.is_none() {
            tracing::warn!(
                type_name = T::TYPE_NAME,
                "objects of this type declare no identity fields and cannot be meaningfully compared"
            );
        }
        a == b
    }
}

impl<T: ApiObject> Eq for Structured<T> {}

impl<T: ApiObject> Hash for Structured<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        T::TYPE_NAME.hash(state);
        self.identity().hash(state);
    }
}

impl<T: ApiObject> fmt::Debug for Structured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(T::TYPE_NAME)
            .field("data", &self.parts.data)
            .field("extra", &self.parts.extra)
            .field("has_bot", &self.parts.bot.is_some())
            .finish()
    }
}

/// `TypeName(field=value, ..., api_kwargs={...})`, listing only set fields.
impl<T: ApiObject> fmt::Display for Structured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declared = self.parts.declared().map_err(|_| fmt::Error)?;
        write!(f, "{}(", T::TYPE_NAME)?;
        let mut first = true;
        for (key, value) in declared.iter().filter(|(_, v)| !is_blank(v)) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            let name = attribute_name::<T>(key).unwrap_or(key.as_str());
            write!(f, "{name}={value}")?;
        }
        if !self.parts.extra.is_empty() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "api_kwargs={}", Value::Object(self.parts.extra.clone()))?;
        }
        f.write_str(")")
    }
}

impl<T: ApiObject> Serialize for Structured<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping(true)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, T: ApiObject> Deserialize<'de> for Structured<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = ObjectMap::deserialize(deserializer)?;
        Self::from_mapping(map, None).map_err(serde::de::Error::custom)
    }
}

/// Type-erased object, for comparisons across concrete types.
pub trait AnyObject: Any + Send + Sync + fmt::Debug {
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Identity equality if `other` is the same concrete type, otherwise `false`.
    fn dyn_eq(&self, other: &dyn AnyObject) -> bool;

    fn to_mapping(&self, recursive: bool) -> ObjectResult<ObjectMap>;
}

impl<T: ApiObject> AnyObject for Structured<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn AnyObject) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    fn to_mapping(&self, recursive: bool) -> ObjectResult<ObjectMap> {
        Structured::to_mapping(self, recursive)
    }
}

fn wire_name<T: ApiObject>(name: &str) -> &str {
    T::ALIASES
        .iter()
        .find(|(_, attr)| *attr == name)
        .map(|(wire, _)| *wire)
        .unwrap_or(name)
}

fn attribute_name<T: ApiObject>(wire: &str) -> Option<&'static str> {
    T::ALIASES
        .iter()
        .find(|(w, _)| *w == wire)
        .map(|(_, attr)| *attr)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Remove a key without disturbing the order of the rest.
fn drop_key(map: ObjectMap, key: &str) -> ObjectMap {
    map.into_iter().filter(|(k, _)| k != key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Account {
        id: i64,
        name: String,
        #[serde(default)]
        nickname: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    }

    impl ApiObject for Account {
        const TYPE_NAME: &'static str = "Account";
        type Id = i64;

        fn identity(&self) -> Option<i64> {
            Some(self.id)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl ApiObject for Note {
        const TYPE_NAME: &'static str = "Note";
        type Id = ();

        fn identity(&self) -> Option<()> {
            None
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Post {
        post_id: i64,
        #[serde(rename = "from", default)]
        from_user: Option<Structured<Account>>,
        #[serde(default, deserialize_with = "list::deserialize")]
        likes: Vec<Structured<Account>>,
    }

    impl ApiObject for Post {
        const TYPE_NAME: &'static str = "Post";
        const ALIASES: &'static [(&'static str, &'static str)] = &[("from", "from_user")];
        type Id = i64;

        fn identity(&self) -> Option<i64> {
            Some(self.post_id)
        }

        fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
            if let Some(user) = &mut self.from_user {
                user.set_bot(bot);
            }
            bind_all(&mut self.likes, bot);
        }
    }

    struct NullBot;

    #[async_trait]
    impl Bot for NullBot {
        async fn call(&self, _method: &str, _params: ObjectMap) -> Result<Value, BotError> {
            Ok(Value::Bool(true))
        }
    }

    fn map(value: Value) -> ObjectMap {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn account(id: i64, nickname: Option<&str>) -> Structured<Account> {
        Structured::new(Account {
            id,
            name: "Ada".to_string(),
            nickname: nickname.map(str::to_string),
            tags: vec![],
        })
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn frozen_object_rejects_public_set_and_delete() {
        let mut acc = account(1, None);

        let err = acc.set_attr("name", json!("Grace")).unwrap_err();
        match err {
            ObjectError::Frozen { attribute, class } => {
                assert_eq!(attribute, "name");
                assert_eq!(class, "Account");
            }
            other => panic!("expected Frozen, got {other:?}"),
        }
        assert!(matches!(acc.del_attr("name"), Err(ObjectError::Frozen { .. })));
        assert!(matches!(acc.set_attr("brand_new", json!(1)), Err(ObjectError::Frozen { .. })));
        assert_eq!(acc.name, "Ada");
    }

    #[test]
    fn internal_attributes_are_always_settable() {
        let mut acc = account(1, None);
        acc.set_attr("_cache", json!(42)).unwrap();
        assert_eq!(acc.internal("_cache"), Some(&json!(42)));
        acc.del_attr("_cache").unwrap();
        assert_eq!(acc.internal("_cache"), None);
        acc.del_attr("_never_set").unwrap();
        // Bookkeeping never leaks into the wire form.
        acc.set_attr("_cache", json!(1)).unwrap();
        assert!(!acc.to_mapping(true).unwrap().contains_key("_cache"));
    }

    #[test]
    fn unfrozen_scope_allows_mutation_and_refreezes() {
        let mut acc = account(1, None);
        acc.unfrozen(|draft| {
            draft.nickname = Some("countess".to_string());
            draft.set_attr("tags", json!(["math"])).unwrap();
        });
        assert_eq!(acc.nickname.as_deref(), Some("countess"));
        assert_eq!(acc.tags, vec!["math".to_string()]);
        assert!(matches!(acc.set_attr("nickname", json!("x")), Err(ObjectError::Frozen { .. })));
    }

    #[test]
    fn unfrozen_scope_refreezes_after_panic() {
        let mut acc = account(1, None);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            acc.unfrozen(|draft| {
                draft.nickname = Some("half".to_string());
                panic!("boom");
            })
        }));
        assert!(result.is_err());
        assert!(matches!(acc.set_attr("nickname", json!("x")), Err(ObjectError::Frozen { .. })));
    }

    #[test]
    fn draft_routes_set_attr_by_name() {
        let mut draft = Draft::new(Account {
            id: 7,
            name: "Ada".to_string(),
            nickname: None,
            tags: vec![],
        });
        draft.set_attr("nickname", json!("a")).unwrap();
        draft.set_attr("shoe_size", json!(38)).unwrap();
        draft.set_attr("_seen", json!(true)).unwrap();
        assert!(draft.del_attr("name").is_err());
        assert!(matches!(draft.del_attr("missing"), Err(ObjectError::NoSuchField { .. })));

        let acc = draft.freeze();
        assert_eq!(acc.nickname.as_deref(), Some("a"));
        assert_eq!(acc.name, "Ada");
        assert_eq!(acc.extra_fields().get("shoe_size"), Some(&json!(38)));
        assert_eq!(acc.internal("_seen"), Some(&json!(true)));
    }

    #[test]
    fn freeze_rescues_extras_naming_unset_fields() {
        let acc = Structured::with_extra(
            Account {
                id: 1,
                name: "Ada".to_string(),
                nickname: None,
                tags: vec![],
            },
            map(json!({"nickname": "countess", "name": "ignored", "hobby": "looms"})),
        );
        assert_eq!(acc.nickname.as_deref(), Some("countess"));
        assert_eq!(acc.name, "Ada");
        assert!(!acc.extra_fields().contains_key("nickname"));
        assert_eq!(acc.extra_fields().get("hobby"), Some(&json!("looms")));
        assert_eq!(acc.extra_fields().get("name"), Some(&json!("ignored")));
    }

    #[test]
    fn equality_uses_identity_fields_only() {
        let a = account(42, Some("x"));
        let b = account(42, None);
        let c = account(43, Some("x"));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn objects_without_identity_compare_equal_degenerately() {
        let a = Structured::new(Note { text: "a".to_string() });
        let b = Structured::new(Note { text: "b".to_string() });
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn different_concrete_types_are_never_equal() {
        let acc = account(1, None);
        let post = Structured::new(Post {
            post_id: 1,
            from_user: None,
            likes: vec![],
        });
        let a: &dyn AnyObject = &acc;
        let b: &dyn AnyObject = &post;
        assert!(!a.dyn_eq(b));
        assert!(a.dyn_eq(&account(1, Some("other"))));
        assert_ne!(hash_of(&acc), hash_of(&post));
    }

    #[test]
    fn to_mapping_omits_unset_and_empty_and_merges_extras() {
        let acc = Structured::with_extra(
            Account {
                id: 1,
                name: "Ada".to_string(),
                nickname: None,
                tags: vec![],
            },
            map(json!({"hobby": "looms"})),
        );
        let out = acc.to_mapping(true).unwrap();
        assert_eq!(Value::Object(out), json!({"id": 1, "name": "Ada", "hobby": "looms"}));
    }

    #[test]
    fn declared_field_wins_over_colliding_extra() {
        let mut acc = account(1, None);
        acc.unfrozen(|draft| {
            draft.extra_fields_mut().insert("name".to_string(), json!("Shadow"));
        });
        let out = acc.to_mapping(true).unwrap();
        assert_eq!(out.get("name"), Some(&json!("Ada")));
    }

    #[test]
    fn from_mapping_keeps_unknown_fields() {
        let data = map(json!({"id": 5, "name": "Bo", "added_in_v9": {"deep": [1, 2]}}));
        let acc = Structured::<Account>::from_mapping(data.clone(), None).unwrap();
        assert_eq!(acc.id, 5);
        assert_eq!(
            acc.extra_fields().get("added_in_v9"),
            Some(&json!({"deep": [1, 2]}))
        );
        assert_eq!(acc.to_mapping(true).unwrap(), data);
    }

    #[test]
    fn from_mapping_propagates_construction_errors() {
        let err = Structured::<Account>::from_mapping(map(json!({"id": 5})), None).unwrap_err();
        assert!(matches!(err, ObjectError::Construct { class: "Account", .. }));
    }

    #[test]
    fn reserved_word_alias_round_trips() {
        let data = map(json!({"post_id": 3, "from": {"id": 1, "name": "Ada"}}));
        let post = Structured::<Post>::from_mapping(data.clone(), None).unwrap();
        assert_eq!(post.from_user.as_ref().map(|u| u.id), Some(1));

        assert_eq!(post.to_mapping(true).unwrap(), data);
        let shallow = post.to_mapping(false).unwrap();
        assert!(shallow.contains_key("from_user"));
        assert!(!shallow.contains_key("from"));

        // The attribute name is accepted on input too.
        let alt = map(json!({"post_id": 3, "from_user": {"id": 1, "name": "Ada"}}));
        let post = Structured::<Post>::from_mapping(alt, None).unwrap();
        assert!(post.extra_fields().is_empty());
        assert_eq!(post.get("from_user").unwrap(), json!({"id": 1, "name": "Ada"}));
        assert_eq!(post.get("from").unwrap(), json!({"id": 1, "name": "Ada"}));
    }

    #[test]
    fn nested_unknown_fields_survive_round_trip() {
        let data = map(json!({
            "post_id": 3,
            "likes": [{"id": 1, "name": "Ada", "aura": "blue"}, {"id": 2, "name": "Bo"}]
        }));
        let post = Structured::<Post>::from_mapping(data.clone(), None).unwrap();
        assert_eq!(post.likes[0].extra_fields().get("aura"), Some(&json!("blue")));
        let again = Structured::<Post>::from_mapping(post.to_mapping(true).unwrap(), None).unwrap();
        assert_eq!(again.to_mapping(true).unwrap(), data);
    }

    #[test]
    fn null_entries_of_nested_lists_are_dropped() {
        let data = map(json!({
            "post_id": 3,
            "likes": [null, {"id": 1, "name": "Ada"}, null]
        }));
        let post = Structured::<Post>::from_mapping(data, None).unwrap();
        assert_eq!(post.likes.len(), 1);
        assert_eq!(post.likes[0].id, 1);

        let post = Structured::<Post>::from_mapping(map(json!({"post_id": 4, "likes": null})), None)
            .unwrap();
        assert!(post.likes.is_empty());
    }

    #[test]
    fn wire_name_wins_when_alias_given_twice() {
        let data = map(json!({
            "post_id": 3,
            "from": {"id": 1, "name": "Ada"},
            "from_user": {"id": 2, "name": "Bo"}
        }));
        let post = Structured::<Post>::from_mapping(data.clone(), None).unwrap();
        assert_eq!(post.from_user.as_ref().map(|u| u.id), Some(1));
        assert_eq!(
            post.extra_fields().get("from_user"),
            Some(&json!({"id": 2, "name": "Bo"}))
        );
        assert_eq!(post.to_mapping(true).unwrap(), data);

        // Same outcome when the attribute name arrives first.
        let reversed = map(json!({
            "post_id": 3,
            "from_user": {"id": 2, "name": "Bo"},
            "from": {"id": 1, "name": "Ada"}
        }));
        let post = Structured::<Post>::from_mapping(reversed, None).unwrap();
        assert_eq!(post.from_user.as_ref().map(|u| u.id), Some(1));
        assert_eq!(
            post.extra_fields().get("from_user"),
            Some(&json!({"id": 2, "name": "Bo"}))
        );
    }

    #[test]
    fn subscript_lookup() {
        let acc = account(9, None);
        assert_eq!(acc.get("id").unwrap(), json!(9));
        assert_eq!(acc.get("nickname").unwrap(), Value::Null);
        assert!(matches!(acc.get("nope"), Err(ObjectError::NoSuchField { .. })));
    }

    #[test]
    fn from_value_and_lists() {
        assert!(Structured::<Account>::from_value(Value::Null, None).unwrap().is_none());
        assert!(matches!(
            Structured::<Account>::from_value(json!("x"), None),
            Err(ObjectError::NotAnObject { .. })
        ));

        let list = Structured::<Account>::from_mapping_list(
            vec![json!({"id": 1, "name": "a"}), Value::Null, json!({"id": 2, "name": "b"})],
            None,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn json_text_round_trip() {
        let acc = Structured::<Account>::from_json(r#"{"id":1,"name":"Ada","x":true}"#, None)
            .unwrap()
            .unwrap();
        let text = acc.to_json().unwrap();
        assert_eq!(text, r#"{"id":1,"name":"Ada","x":true}"#);
    }

    #[test]
    fn missing_bot_is_an_error() {
        let acc = account(1, None);
        assert!(matches!(acc.get_bot(), Err(ObjectError::MissingBot { class: "Account" })));
    }

    #[test]
    fn dropped_bot_is_reported() {
        let mut acc = account(1, None);
        {
            let bot: Arc<dyn Bot> = Arc::new(NullBot);
            acc.set_bot(Some(&bot));
            assert!(acc.get_bot().is_ok());
        }
        assert!(matches!(acc.get_bot(), Err(ObjectError::BotDropped { .. })));
    }

    #[test]
    fn bot_is_forwarded_to_nested_objects() {
        let bot: Arc<dyn Bot> = Arc::new(NullBot);
        let data = map(json!({
            "post_id": 3,
            "from": {"id": 1, "name": "Ada"},
            "likes": [{"id": 2, "name": "Bo"}]
        }));
        let post = Structured::<Post>::from_mapping(data, Some(&bot)).unwrap();
        assert!(post.get_bot().is_ok());
        assert!(post.from_user.as_ref().unwrap().get_bot().is_ok());
        assert!(post.likes[0].get_bot().is_ok());
    }

    #[test]
    fn clone_shares_bot_and_copies_data() {
        let bot: Arc<dyn Bot> = Arc::new(NullBot);
        let data = map(json!({"id": 1, "name": "Ada", "tags": ["a"]}));
        let original = Structured::<Account>::from_mapping(data, Some(&bot)).unwrap();
        let mut copy = original.clone();

        let (a, b) = (original.bot_handle().unwrap(), copy.bot_handle().unwrap());
        assert!(Weak::ptr_eq(a, b));

        copy.unfrozen(|draft| draft.tags.push("b".to_string()));
        assert_eq!(original.tags, vec!["a".to_string()]);
        assert_eq!(copy.tags.len(), 2);
    }

    #[test]
    fn display_lists_set_fields_and_extras() {
        let acc = Structured::with_extra(
            Account {
                id: 1,
                name: "Ada".to_string(),
                nickname: None,
                tags: vec![],
            },
            map(json!({"hobby": "looms"})),
        );
        assert_eq!(
            acc.to_string(),
            r#"Account(id=1, name="Ada", api_kwargs={"hobby":"looms"})"#
        );
    }
}
