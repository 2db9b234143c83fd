//! Discriminated unions.
//!
//! Several API types are a family of concrete objects selected by a discriminator field
//! (`type`, `status`, `source`, ...). Each family is an enum with one variant per
//! concrete type plus an `Unknown` fallback, generated by [`api_union!`]:
//!
//! ```ignore
//! api_union! {
//!     /// Reaction to a message.
//!     pub enum ReactionType: "type" {
//!         Emoji(ReactionTypeEmoji) = EMOJI => "emoji",
//!         CustomEmoji(ReactionTypeCustomEmoji) = CUSTOM_EMOJI => "custom_emoji",
//!     }
//! }
//!
//! assert_eq!(ReactionType::EMOJI, "emoji");
//! ```
//!
//! Parsing through the family dispatches on the discriminator and hands the rest of the
//! mapping to the concrete type; the concrete type hardcodes its own discriminator value
//! (`ApiObject::DISCRIMINATOR`) and writes it back on serialization. A discriminator this
//! version does not know keeps the whole mapping verbatim in `Unknown`.

use std::sync::Arc;

use serde_json::Value;

use crate::bot::Bot;
use crate::error::{ObjectError, ObjectResult};
use crate::object::ObjectMap;

/// Behaviour shared by every generated union enum.
pub trait ApiUnion: Sized + Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Name of the family, e.g. `ReactionType`.
    const TYPE_NAME: &'static str;

    /// Wire name of the discriminator field.
    const DISCRIMINATOR: &'static str;

    /// Discriminator value → concrete type name.
    const TYPES: &'static [(&'static str, &'static str)];

    /// Build the variant registered for `kind` from data with the discriminator removed.
    ///
    /// Only called with a `kind` listed in `TYPES`.
    fn dispatch(kind: &str, data: ObjectMap, bot: Option<&Arc<dyn Bot>>) -> ObjectResult<Self>;

    /// Fallback for a discriminator this version does not know.
    fn unknown(data: ObjectMap) -> Self;

    fn to_mapping(&self, recursive: bool) -> ObjectResult<ObjectMap>;

    /// Discriminator value of this instance.
    fn kind(&self) -> &str;

    fn set_bot(&mut self, bot: Option<&Arc<dyn Bot>>);
}

/// Parse a member of the family `U`, dispatching on its discriminator.
pub fn union_from_mapping<U: ApiUnion>(
    data: ObjectMap,
    bot: Option<&Arc<dyn Bot>>,
) -> ObjectResult<U> {
    let kind = data
        .get(U::DISCRIMINATOR)
        .and_then(Value::as_str)
        .filter(|kind| U::TYPES.iter().any(|(known, _)| known == kind))
        .map(str::to_owned);

    match kind {
        Some(kind) => {
            let rest = data
                .into_iter()
                .filter(|(k, _)| k != U::DISCRIMINATOR)
                .collect();
            U::dispatch(&kind, rest, bot)
        }
        None => {
            tracing::debug!(
                type_name = U::TYPE_NAME,
                kind = ?data.get(U::DISCRIMINATOR),
                "unrecognised discriminator kept as unknown variant"
            );
            Ok(U::unknown(data))
        }
    }
}

/// [`union_from_mapping`] for any JSON value; `null` yields `None`.
pub fn union_from_value<U: ApiUnion>(
    value: Value,
    bot: Option<&Arc<dyn Bot>>,
) -> ObjectResult<Option<U>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => union_from_mapping(map, bot).map(Some),
        other => Err(ObjectError::not_an_object(U::TYPE_NAME, &other)),
    }
}

/// Declare a discriminated union over [`ApiObject`](crate::ApiObject) types.
///
/// Generates the enum (variants wrap [`Structured`](crate::Structured) values, plus
/// `Unknown(ObjectMap)`), one `pub const` per discriminator value, the [`ApiUnion`]
/// impl, `PartialEq`/`Eq`/`Hash` (different variants are never equal) and serde impls
/// going through the wire mapping.
#[macro_export]
macro_rules! api_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $disc:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) = $konst:ident => $tag:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($crate::Structured<$ty>),
            )+
            /// Discriminator value unknown to this version, kept verbatim.
            Unknown($crate::ObjectMap),
        }

        impl $name {
            $(
                pub const $konst: &'static str = $tag;
            )+

            pub fn from_mapping(
                data: $crate::ObjectMap,
                bot: ::core::option::Option<&::std::sync::Arc<dyn $crate::Bot>>,
            ) -> $crate::ObjectResult<Self> {
                $crate::union::union_from_mapping(data, bot)
            }

            pub fn from_value(
                value: $crate::__private::serde_json::Value,
                bot: ::core::option::Option<&::std::sync::Arc<dyn $crate::Bot>>,
            ) -> $crate::ObjectResult<::core::option::Option<Self>> {
                $crate::union::union_from_value(value, bot)
            }

            pub fn to_mapping(&self, recursive: bool) -> $crate::ObjectResult<$crate::ObjectMap> {
                <Self as $crate::ApiUnion>::to_mapping(self, recursive)
            }

            pub fn kind(&self) -> &str {
                <Self as $crate::ApiUnion>::kind(self)
            }

            pub fn set_bot(&mut self, bot: ::core::option::Option<&::std::sync::Arc<dyn $crate::Bot>>) {
                <Self as $crate::ApiUnion>::set_bot(self, bot)
            }
        }

        impl $crate::ApiUnion for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const DISCRIMINATOR: &'static str = $disc;
            const TYPES: &'static [(&'static str, &'static str)] = &[
                $(($tag, <$ty as $crate::ApiObject>::TYPE_NAME),)+
            ];

            fn dispatch(
                kind: &str,
                mut data: $crate::ObjectMap,
                bot: ::core::option::Option<&::std::sync::Arc<dyn $crate::Bot>>,
            ) -> $crate::ObjectResult<Self> {
                match kind {
                    $(
                        $tag => $crate::Structured::<$ty>::from_mapping(data, bot).map(Self::$variant),
                    )+
                    other => {
                        data.insert($disc.to_owned(), $crate::__private::serde_json::Value::String(other.to_owned()));
                        Ok(Self::Unknown(data))
                    }
                }
            }

            fn unknown(data: $crate::ObjectMap) -> Self {
                Self::Unknown(data)
            }

            fn to_mapping(&self, recursive: bool) -> $crate::ObjectResult<$crate::ObjectMap> {
                match self {
                    $(
                        Self::$variant(inner) => inner.to_mapping(recursive),
                    )+
                    Self::Unknown(data) => Ok(data.clone()),
                }
            }

            fn kind(&self) -> &str {
                match self {
                    $(
                        Self::$variant(_) => $tag,
                    )+
                    Self::Unknown(data) => data
                        .get($disc)
                        .and_then($crate::__private::serde_json::Value::as_str)
                        .unwrap_or_default(),
                }
            }

            fn set_bot(&mut self, bot: ::core::option::Option<&::std::sync::Arc<dyn $crate::Bot>>) {
                match self {
                    $(
                        Self::$variant(inner) => inner.set_bot(bot),
                    )+
                    Self::Unknown(_) => {}
                }
            }
        }

        impl ::core::hash::Hash for $name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&::core::mem::discriminant(self), state);
                match self {
                    $(
                        Self::$variant(inner) => ::core::hash::Hash::hash(inner, state),
                    )+
                    // Map equality ignores key order; only the kind is hashed.
                    Self::Unknown(_) => ::core::hash::Hash::hash(
                        <Self as $crate::ApiUnion>::kind(self),
                        state,
                    ),
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S: $crate::__private::serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                let data = <Self as $crate::ApiUnion>::to_mapping(self, true)
                    .map_err($crate::__private::serde::ser::Error::custom)?;
                $crate::__private::serde::Serialize::serialize(&data, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__private::serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
                let data = <$crate::ObjectMap as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                $crate::union::union_from_mapping(data, None).map_err($crate::__private::serde::de::Error::custom)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    $(
                        Self::$variant(inner) => ::core::fmt::Display::fmt(inner, f),
                    )+
                    Self::Unknown(data) => write!(
                        f,
                        "{}({})",
                        stringify!($name),
                        $crate::__private::serde_json::Value::Object(data.clone())
                    ),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::error::ObjectError;
    use crate::object::{ApiObject, ObjectMap, Structured};
    use crate::union::ApiUnion;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ShapeA {
        v: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ShapeB {
        v: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ShapeC {
        v: i64,
        #[serde(default)]
        label: Option<String>,
    }

    macro_rules! shape {
        ($ty:ident, $tag:literal) => {
            impl ApiObject for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const DISCRIMINATOR: Option<(&'static str, &'static str)> = Some(("kind", $tag));
                type Id = i64;

                fn identity(&self) -> Option<i64> {
                    Some(self.v)
                }
            }
        };
    }

    shape!(ShapeA, "a");
    shape!(ShapeB, "b");
    shape!(ShapeC, "c");

    crate::api_union! {
        /// Test family keyed on `kind`.
        pub enum Shape: "kind" {
            A(ShapeA) = KIND_A => "a",
            B(ShapeB) = KIND_B => "b",
            C(ShapeC) = KIND_C => "c",
        }
    }

    fn map(value: serde_json::Value) -> ObjectMap {
        match value {
            serde_json::Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn dispatches_each_kind_to_its_variant() {
        let a = Shape::from_mapping(map(json!({"kind": "a", "v": 1})), None).unwrap();
        let b = Shape::from_mapping(map(json!({"kind": "b", "v": 2})), None).unwrap();
        let c = Shape::from_mapping(map(json!({"kind": "c", "v": 3})), None).unwrap();

        match (&a, &b, &c) {
            (Shape::A(a), Shape::B(b), Shape::C(c)) => {
                assert_eq!((a.v, b.v, c.v), (1, 2, 3));
                // The discriminator is consumed by dispatch, not misrouted into extras.
                assert!(a.extra_fields().is_empty());
                assert!(c.extra_fields().is_empty());
            }
            other => panic!("wrong variants: {other:?}"),
        }
        assert_eq!(a.kind(), Shape::KIND_A);
    }

    #[test]
    fn equality_holds_only_within_a_kind() {
        let a1 = Shape::from_mapping(map(json!({"kind": "a", "v": 1})), None).unwrap();
        let a1_again = Shape::from_mapping(map(json!({"kind": "a", "v": 1})), None).unwrap();
        let b1 = Shape::from_mapping(map(json!({"kind": "b", "v": 1})), None).unwrap();

        assert_eq!(a1, a1_again);
        assert_ne!(a1, b1);
    }

    #[test]
    fn variant_serializes_its_hardcoded_discriminator() {
        let c = Shape::from_mapping(map(json!({"kind": "c", "v": 3, "label": "x"})), None).unwrap();
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"kind": "c", "v": 3, "label": "x"})
        );

        let standalone = Structured::new(ShapeA { v: 9 });
        assert_eq!(
            serde_json::Value::Object(standalone.to_mapping(true).unwrap()),
            json!({"kind": "a", "v": 9})
        );
    }

    #[test]
    fn concrete_type_strips_its_own_discriminator() {
        let a = Structured::<ShapeA>::from_mapping(map(json!({"kind": "a", "v": 4})), None).unwrap();
        assert!(a.extra_fields().is_empty());
        assert_eq!(a.get("kind").unwrap(), json!("a"));
    }

    #[test]
    fn concrete_type_rejects_a_foreign_discriminator() {
        let err = Structured::<ShapeA>::from_mapping(map(json!({"kind": "b", "v": 4})), None)
            .unwrap_err();
        assert!(matches!(err, ObjectError::Construct { class: "ShapeA", .. }));
    }

    #[test]
    fn unknown_kind_is_preserved_verbatim() {
        let data = map(json!({"kind": "z", "v": 5, "new": true}));
        let z = Shape::from_mapping(data.clone(), None).unwrap();
        assert!(matches!(z, Shape::Unknown(_)));
        assert_eq!(z.kind(), "z");
        assert_eq!(z.to_mapping(true).unwrap(), data);
    }

    #[test]
    fn unknown_values_hash_consistently_with_equality() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(shape: &Shape) -> u64 {
            let mut h = DefaultHasher::new();
            shape.hash(&mut h);
            h.finish()
        }

        let ab = Shape::from_mapping(map(json!({"kind": "zz", "a": 1, "b": 2})), None).unwrap();
        let ba = Shape::from_mapping(map(json!({"kind": "zz", "b": 2, "a": 1})), None).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));

        let set: std::collections::HashSet<Shape> = [ab, ba].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn registry_lists_every_kind() {
        assert_eq!(Shape::TYPE_NAME, "Shape");
        assert_eq!(
            Shape::TYPES,
            &[("a", "ShapeA"), ("b", "ShapeB"), ("c", "ShapeC")]
        );
    }

    #[test]
    fn nested_in_serde_struct() {
        #[derive(Debug, Deserialize)]
        struct Holder {
            shapes: Vec<Shape>,
        }
        let holder: Holder =
            serde_json::from_value(json!({"shapes": [{"kind": "b", "v": 2}, {"kind": "q"}]})).unwrap();
        assert_eq!(holder.shapes[0].kind(), "b");
        assert_eq!(holder.shapes[1].kind(), "q");
    }
}
