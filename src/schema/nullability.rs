// Nullability adapter
//
// Adds or removes `null` from a fragment's type union. Single types become
// two-element unions and collapse back when null is removed again.

use serde_json::Value;

use crate::internal::error::{Error, Result};
use crate::schema::types::{SchemaFragment, TypeName};

/// Returns `fragment` with `null` admitted or rejected according to `allow_null`.
///
/// Fails with [`Error::MalformedFragment`] when the fragment has no `type`;
/// references and untyped fragments must not be passed here. A fragment typed
/// only as `null` cannot be made non-nullable and fails the same way. Enumerated
/// fragments get `null` added to or removed from their value list as well.
/// Applying the adapter twice with the same flag is the same as applying it once.
pub fn with_null(fragment: SchemaFragment, allow_null: bool) -> Result<SchemaFragment> {
    let mut fragment = fragment;

    let is_reference = fragment.is_reference();
    let types = fragment.schema_type.as_mut().ok_or_else(|| {
        Error::MalformedFragment(if is_reference {
            "cannot apply nullability to a $ref fragment".to_string()
        } else {
            "cannot apply nullability to a fragment without 'type'".to_string()
        })
    })?;

    if allow_null {
        types.insert(TypeName::Null);
        if let Some(values) = fragment.enum_values.as_mut() {
            if !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
        }
    } else {
        if !types.remove(TypeName::Null) && types.contains(TypeName::Null) {
            return Err(Error::MalformedFragment(
                "cannot reject null on a fragment whose only type is 'null'".to_string(),
            ));
        }
        if let Some(values) = fragment.enum_values.as_mut() {
            values.retain(|v| !v.is_null());
        }
    }

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::error::ErrorKind;
    use crate::schema::constants;
    use crate::schema::types::{Format, TypeSet};
    use proptest::prelude::*;
    use serde_json::json;

    fn type_name_strategy() -> impl Strategy<Value = TypeName> {
        prop_oneof![
            Just(TypeName::Object),
            Just(TypeName::Array),
            Just(TypeName::Boolean),
            Just(TypeName::Integer),
            Just(TypeName::Number),
            Just(TypeName::String),
        ]
    }

    fn fragment_strategy() -> impl Strategy<Value = SchemaFragment> {
        (prop::collection::vec(type_name_strategy(), 1..4), any::<bool>()).prop_map(|(names, enumerated)| {
            let mut fragment = SchemaFragment::of_types(TypeSet::from_names(names).unwrap());
            if enumerated {
                fragment.enum_values = Some(vec![json!("a"), json!("b")]);
            }
            fragment
        })
    }

    #[test]
    fn test_adds_null_to_scalar_type() {
        let fragment = with_null(SchemaFragment::of_type(TypeName::String), true).unwrap();
        assert_eq!(fragment.to_value().unwrap(), json!({ "type": ["string", "null"] }));
        assert!(fragment.allows_null());
    }

    #[test]
    fn test_removing_null_collapses_to_scalar() {
        let union = TypeSet::from_names([TypeName::Integer, TypeName::Null]).unwrap();
        let fragment = SchemaFragment::of_types(union).with_format(Format::Int32);
        let fragment = with_null(fragment, false).unwrap();
        assert_eq!(fragment.to_value().unwrap(), json!({ "type": "integer", "format": "int32" }));
    }

    #[test]
    fn test_union_gains_null_at_end() {
        let fragment = with_null(constants::any(), true).unwrap();
        assert_eq!(
            fragment.to_value().unwrap(),
            json!({ "type": ["object", "array", "boolean", "number", "string", "null"] })
        );
    }

    #[test]
    fn test_enum_values_track_null() {
        let fragment = SchemaFragment::of_type(TypeName::String).with_enum(vec![json!("on"), json!("off")]);
        let nullable = with_null(fragment.clone(), true).unwrap();
        assert_eq!(
            nullable.to_value().unwrap(),
            json!({ "type": ["string", "null"], "enum": ["on", "off", null] })
        );
        assert_eq!(with_null(nullable, false).unwrap(), fragment);
    }

    #[test]
    fn test_rejects_untyped_fragments() {
        let err = with_null(SchemaFragment::reference("Bar"), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = with_null(SchemaFragment::default(), false).unwrap_err();
        assert!(matches!(err, Error::MalformedFragment(_)));
    }

    #[test]
    fn test_null_only_fragment() {
        let null_only = SchemaFragment::of_type(TypeName::Null);
        assert_eq!(with_null(null_only.clone(), true).unwrap(), null_only);

        let err = with_null(null_only, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    proptest! {
        #[test]
        fn prop_idempotent(fragment in fragment_strategy(), allow_null in any::<bool>()) {
            let once = with_null(fragment, allow_null).unwrap();
            let twice = with_null(once.clone(), allow_null).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_round_trip_restores_original(fragment in fragment_strategy()) {
            let restored = with_null(with_null(fragment.clone(), true).unwrap(), false).unwrap();
            prop_assert_eq!(restored, fragment);
        }

        #[test]
        fn prop_null_flag_is_reflected(fragment in fragment_strategy(), allow_null in any::<bool>()) {
            let adapted = with_null(fragment, allow_null).unwrap();
            prop_assert_eq!(adapted.allows_null(), allow_null);
        }
    }
}
