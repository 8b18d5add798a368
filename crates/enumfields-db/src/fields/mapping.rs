//! The value-mapping table behind enum coercion.
//!
//! A [`ValueMap`] is built once per field. For every member it holds five
//! keys resolving to that member: the member itself, its value, the string
//! form of its value, the qualified form of the member (`Color.RED`), and its
//! display label (`Reddish`, or `Red` when no label is given). Lookup is a
//! direct lookup followed by a lookup of the input's string form.
//!
//! Keys are inserted in three tiers so that colliding representations resolve
//! predictably:
//!
//! 1. member identities and exact member values;
//! 2. string forms of values and members;
//! 3. labels.
//!
//! Within a tier the first declared member wins, and a key never displaces
//! one from an earlier tier. Bare member names are not keys.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use enumfields_core::enums::{EnumMember, EnumType, MemberValue};

use super::input::FieldValue;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LookupKey {
    Member(usize),
    Int(i64),
    Str(String),
}

impl From<&MemberValue> for LookupKey {
    fn from(value: &MemberValue) -> Self {
        match value {
            MemberValue::Int(i) => Self::Int(*i),
            MemberValue::Str(s) => Self::Str(s.clone()),
        }
    }
}

/// Precomputed lookup from every accepted raw representation to its member.
#[derive(Debug, Clone)]
pub struct ValueMap {
    enum_type: Arc<EnumType>,
    table: HashMap<LookupKey, usize>,
}

impl ValueMap {
    /// Builds the table for `enum_type`.
    pub fn new(enum_type: Arc<EnumType>) -> Self {
        let mut table = HashMap::with_capacity(enum_type.len() * 5);

        for member in enum_type.members() {
            insert_first(&mut table, LookupKey::Member(member.index()), member.index());
            insert_first(&mut table, LookupKey::from(member.value()), member.index());
        }
        for member in enum_type.members() {
            insert_first(
                &mut table,
                LookupKey::Str(member.value().to_string()),
                member.index(),
            );
            insert_first(&mut table, LookupKey::Str(member.to_string()), member.index());
        }
        for member in enum_type.members() {
            insert_first(
                &mut table,
                LookupKey::Str(member.label().into_owned()),
                member.index(),
            );
        }

        tracing::debug!(
            enum_name = %enum_type.qualified_name(),
            keys = table.len(),
            "Built enum value map"
        );

        Self { enum_type, table }
    }

    /// Returns the enum type this table resolves into.
    pub const fn enum_type(&self) -> &Arc<EnumType> {
        &self.enum_type
    }

    /// Returns the number of distinct keys in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolves `value` to a member of the bound type.
    ///
    /// Returns `None` when neither the value nor its string form is a key.
    /// Empty inputs are not special-cased here; callers treat `Null` and `""`
    /// as "no member" before looking up.
    pub fn lookup(&self, value: &FieldValue) -> Option<EnumMember> {
        let direct = match value {
            FieldValue::Member(m) if m.belongs_to(&self.enum_type) => {
                return self.enum_type.member_at(m.index());
            }
            FieldValue::Member(m) => LookupKey::from(m.value()),
            FieldValue::Raw(Value::String(s)) => LookupKey::Str(s.clone()),
            FieldValue::Raw(raw) => match raw.as_integral() {
                Some(i) => LookupKey::Int(i),
                None => LookupKey::Str(raw.to_string()),
            },
        };

        self.table
            .get(&direct)
            .or_else(|| self.table.get(&LookupKey::Str(value.to_string())))
            .and_then(|&index| self.enum_type.member_at(index))
    }
}

fn insert_first(table: &mut HashMap<LookupKey, usize>, key: LookupKey, index: usize) {
    if let Entry::Vacant(slot) = table.entry(key) {
        slot.insert(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Arc<EnumType> {
        EnumType::builder("tests.test_enums", "Color")
            .member("RED", "r")
            .member("GREEN", "g")
            .member("BLUE", "b")
            .build()
            .unwrap()
    }

    fn name_of(map: &ValueMap, value: impl Into<FieldValue>) -> Option<String> {
        map.lookup(&value.into()).map(|m| m.name().to_string())
    }

    #[test]
    fn test_five_keys_per_member() {
        let map = ValueMap::new(color());
        // a string value and its string form are the same key
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn test_labels_resolve() {
        let color = EnumType::builder("tests.test_enums", "Color")
            .labeled_member("RED", "r", "Reddish")
            .member("GREEN", "g")
            .labeled_member("BLUE", "b", "bluë")
            .build()
            .unwrap();
        let map = ValueMap::new(color);
        assert_eq!(name_of(&map, "Reddish").as_deref(), Some("RED"));
        assert_eq!(name_of(&map, "Green").as_deref(), Some("GREEN"));
        assert_eq!(name_of(&map, "bluë").as_deref(), Some("BLUE"));
        assert_eq!(name_of(&map, "Red"), None);
        assert_eq!(name_of(&map, "RED"), None);
        assert_eq!(name_of(&map, "GREEN"), None);
    }

    #[test]
    fn test_label_never_displaces_a_value() {
        // FIRST is labelled with SECOND's value.
        let clash = EnumType::builder("m", "Clash")
            .labeled_member("FIRST", "a", "b")
            .labeled_member("SECOND", "b", "Second")
            .labeled_member("THIRD", "c", "Second")
            .build()
            .unwrap();
        let map = ValueMap::new(clash);
        assert_eq!(name_of(&map, "b").as_deref(), Some("SECOND"));
        assert_eq!(name_of(&map, "Second").as_deref(), Some("SECOND"));
    }

    #[test]
    fn test_lookup_member_value_and_string_forms() {
        let color = color();
        let map = ValueMap::new(color.clone());
        for member in color.members() {
            assert_eq!(map.lookup(&(&member).into()), Some(member.clone()));
            assert_eq!(map.lookup(&member.value().clone().into()), Some(member.clone()));
            assert_eq!(
                map.lookup(&member.value().to_string().into()),
                Some(member.clone())
            );
            assert_eq!(map.lookup(&member.to_string().into()), Some(member.clone()));
        }
    }

    #[test]
    fn test_name_only_does_not_resolve() {
        let map = ValueMap::new(color());
        assert_eq!(name_of(&map, "RED"), None);
        assert_eq!(name_of(&map, "red"), None);
    }

    #[test]
    fn test_integer_values_accept_string_forms() {
        let priority = EnumType::builder("m", "Priority")
            .member("LOW", 1)
            .member("HIGH", 2)
            .build()
            .unwrap();
        let map = ValueMap::new(priority);
        assert_eq!(name_of(&map, 1_i64).as_deref(), Some("LOW"));
        assert_eq!(name_of(&map, "2").as_deref(), Some("HIGH"));
        assert_eq!(name_of(&map, 2.0_f64).as_deref(), Some("HIGH"));
        assert_eq!(name_of(&map, true).as_deref(), Some("LOW"));
        assert_eq!(name_of(&map, "Priority.HIGH").as_deref(), Some("HIGH"));
        assert_eq!(name_of(&map, 3_i64), None);
        assert_eq!(name_of(&map, " 2"), None);
    }

    #[test]
    fn test_foreign_member_resolves_through_value() {
        let map = ValueMap::new(color());
        let lookalike = color();
        let green = lookalike.member("GREEN").unwrap();
        assert_eq!(name_of(&map, &green).as_deref(), Some("GREEN"));
        assert!(!map.lookup(&green.into()).unwrap().belongs_to(&lookalike));
    }

    #[test]
    fn test_exact_value_beats_string_form_of_earlier_member() {
        // ONE's value stringifies to "1", which is TEXT_ONE's exact value.
        let mixed = EnumType::builder("m", "Mixed")
            .member("ONE", 1)
            .member("TEXT_ONE", "1")
            .build()
            .unwrap();
        let map = ValueMap::new(mixed);
        assert_eq!(name_of(&map, "1").as_deref(), Some("TEXT_ONE"));
        assert_eq!(name_of(&map, 1_i64).as_deref(), Some("ONE"));
    }

    #[test]
    fn test_exact_value_beats_member_string_form() {
        // ALIAS's value collides with the string form of TARGET.
        let tricky = EnumType::builder("m", "Tricky")
            .member("TARGET", "t")
            .member("ALIAS", "Tricky.TARGET")
            .build()
            .unwrap();
        let map = ValueMap::new(tricky);
        assert_eq!(name_of(&map, "Tricky.TARGET").as_deref(), Some("ALIAS"));
        assert_eq!(name_of(&map, "t").as_deref(), Some("TARGET"));
    }

    #[test]
    fn test_float_and_bool_inputs_use_numeric_equality() {
        let flags = EnumType::builder("m", "Flag")
            .member("OFF", 0)
            .member("ON", 1)
            .build()
            .unwrap();
        let map = ValueMap::new(flags);
        assert_eq!(name_of(&map, false).as_deref(), Some("OFF"));
        assert_eq!(name_of(&map, 1.0_f64).as_deref(), Some("ON"));
        assert_eq!(name_of(&map, 0.5_f64), None);
    }
}
