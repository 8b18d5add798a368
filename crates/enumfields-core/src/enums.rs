//! The runtime enum type model.
//!
//! An [`EnumType`] is a closed, ordered set of named members, each carrying an
//! immutable primitive [`MemberValue`] and an optional label override. Members
//! are handed out as [`EnumMember`] handles that share the type through an
//! [`Arc`], so they are cheap to clone and compare.
//!
//! Rust enums bridge into this model through the [`DjangoEnum`] trait, which
//! `#[derive(DjangoEnum)]` implements.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EnumFieldError, EnumFieldResult};
use crate::utils::text::prettify_name;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// The primitive value a member is stored as.
///
/// # Examples
///
/// ```
/// use enumfields_core::enums::MemberValue;
///
/// assert_eq!(MemberValue::from("r").to_string(), "r");
/// assert_eq!(MemberValue::from(3).to_string(), "3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberValue {
    /// An integer value.
    Int(i64),
    /// A string value.
    Str(String),
}

impl MemberValue {
    /// Returns the integer value, if this is an integer.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns `true` for integer values.
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for MemberValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MemberValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for MemberValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for MemberValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

#[derive(Debug, Clone)]
struct MemberDef {
    name: String,
    value: MemberValue,
    label: Option<String>,
}

/// A closed, ordered set of named members.
///
/// Every constructed `EnumType` has its own identity: two types built from the
/// same parts are structurally equal (see [`EnumType::same_members`]) but are
/// not the same type, and their members never compare equal.
///
/// # Examples
///
/// ```
/// use enumfields_core::enums::EnumType;
///
/// let color = EnumType::builder("tests.test_enums", "Color")
///     .labeled_member("RED", "r", "Reddish")
///     .member("GREEN", "g")
///     .member("BLUE", "b")
///     .build()
///     .unwrap();
///
/// let red = color.member("RED").unwrap();
/// assert_eq!(red.value().to_string(), "r");
/// assert_eq!(red.label(), "Reddish");
/// assert_eq!(color.member("GREEN").unwrap().label(), "Green");
/// assert_eq!(red.to_string(), "Color.RED");
/// ```
#[derive(Debug)]
pub struct EnumType {
    id: u64,
    module: String,
    name: String,
    members: Vec<MemberDef>,
    by_name: HashMap<String, usize>,
    by_value: HashMap<MemberValue, usize>,
}

impl EnumType {
    /// Starts building an enum type defined in `module` under `name`.
    pub fn builder(module: impl Into<String>, name: impl Into<String>) -> EnumTypeBuilder {
        EnumTypeBuilder {
            module: module.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Builds an enum type from ordered `(name, value)` pairs.
    pub fn from_parts(
        module: impl Into<String>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = (String, MemberValue)>,
    ) -> EnumFieldResult<Arc<Self>> {
        let mut builder = Self::builder(module, name);
        for (member_name, value) in members {
            builder = builder.member(member_name, value);
        }
        builder.build()
    }

    /// Returns the process-unique identity of this type.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the module path the type was defined in.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `module.name`, or just the name when the module is empty.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the type declares no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if every member value is an integer.
    pub fn is_integer_valued(&self) -> bool {
        self.members.iter().all(|m| m.value.is_int())
    }

    /// Iterates over the members in declaration order.
    pub fn members(self: &Arc<Self>) -> impl Iterator<Item = EnumMember> + '_ {
        (0..self.members.len()).map(move |index| EnumMember {
            enum_type: Arc::clone(self),
            index,
        })
    }

    /// Returns the ordered `(name, value)` pairs of this type.
    pub fn pairs(&self) -> Vec<(String, MemberValue)> {
        self.members
            .iter()
            .map(|m| (m.name.clone(), m.value.clone()))
            .collect()
    }

    /// Looks up a member by name.
    pub fn member(self: &Arc<Self>, name: &str) -> Option<EnumMember> {
        self.by_name.get(name).map(|&index| EnumMember {
            enum_type: Arc::clone(self),
            index,
        })
    }

    /// Looks up a member by its exact value, the way the enum constructor does.
    ///
    /// String forms are not accepted: an integer-valued member is not found by
    /// `MemberValue::Str("1")`.
    pub fn from_value(self: &Arc<Self>, value: &MemberValue) -> Option<EnumMember> {
        self.by_value.get(value).map(|&index| EnumMember {
            enum_type: Arc::clone(self),
            index,
        })
    }

    /// Returns the member at `index` in declaration order.
    pub fn member_at(self: &Arc<Self>, index: usize) -> Option<EnumMember> {
        (index < self.members.len()).then(|| EnumMember {
            enum_type: Arc::clone(self),
            index,
        })
    }

    /// Returns `true` if both handles refer to the same type.
    pub fn is_same(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// Returns `true` if both types declare identical ordered names and values.
    pub fn same_members(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(&other.members)
                .all(|(a, b)| a.name == b.name && a.value == b.value)
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// Builder for [`EnumType`].
#[derive(Debug, Clone)]
pub struct EnumTypeBuilder {
    module: String,
    name: String,
    members: Vec<MemberDef>,
}

impl EnumTypeBuilder {
    /// Appends a member whose label is derived from its name.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: impl Into<MemberValue>) -> Self {
        self.members.push(MemberDef {
            name: name.into(),
            value: value.into(),
            label: None,
        });
        self
    }

    /// Appends a member with an explicit label.
    #[must_use]
    pub fn labeled_member(
        mut self,
        name: impl Into<String>,
        value: impl Into<MemberValue>,
        label: impl Into<String>,
    ) -> Self {
        self.members.push(MemberDef {
            name: name.into(),
            value: value.into(),
            label: Some(label.into()),
        });
        self
    }

    /// Validates uniqueness and finishes the type.
    pub fn build(self) -> EnumFieldResult<Arc<EnumType>> {
        let qualified = if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        };

        let mut by_name = HashMap::with_capacity(self.members.len());
        let mut by_value = HashMap::with_capacity(self.members.len());
        for (index, member) in self.members.iter().enumerate() {
            if by_name.insert(member.name.clone(), index).is_some() {
                return Err(EnumFieldError::DuplicateMember {
                    enum_name: qualified,
                    member: member.name.clone(),
                });
            }
            if by_value.insert(member.value.clone(), index).is_some() {
                return Err(EnumFieldError::DuplicateMember {
                    enum_name: qualified,
                    member: member.value.to_string(),
                });
            }
        }

        tracing::debug!(
            enum_name = %qualified,
            members = self.members.len(),
            "Built enum type"
        );

        Ok(Arc::new(EnumType {
            id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            module: self.module,
            name: self.name,
            members: self.members,
            by_name,
            by_value,
        }))
    }
}

/// A handle to one member of an [`EnumType`].
///
/// Equality and hashing are by identity: the same type and the same member.
#[derive(Clone)]
pub struct EnumMember {
    enum_type: Arc<EnumType>,
    index: usize,
}

impl EnumMember {
    fn def(&self) -> &MemberDef {
        &self.enum_type.members[self.index]
    }

    /// Returns the member name.
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Returns the member's primitive value.
    pub fn value(&self) -> &MemberValue {
        &self.def().value
    }

    /// Returns the display label: the explicit override, or the prettified name.
    pub fn label(&self) -> Cow<'_, str> {
        let def = self.def();
        def.label
            .as_deref()
            .map_or_else(|| Cow::Owned(prettify_name(&def.name)), Cow::Borrowed)
    }

    /// Returns the position of this member in declaration order.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the type this member belongs to.
    pub const fn enum_type(&self) -> &Arc<EnumType> {
        &self.enum_type
    }

    /// Returns `true` if this member belongs to `enum_type`.
    pub fn belongs_to(&self, enum_type: &EnumType) -> bool {
        self.enum_type.is_same(enum_type)
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.enum_type.is_same(&other.enum_type) && self.index == other.index
    }
}

impl Eq for EnumMember {}

impl Hash for EnumMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.enum_type.id.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_type.name, self.name())
    }
}

impl fmt::Debug for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}: {:?}>", self.enum_type.name, self.name(), self.value())
    }
}

/// A Rust enum that maps onto a runtime [`EnumType`].
///
/// Usually implemented with `#[derive(DjangoEnum)]`.
pub trait DjangoEnum: Sized + Copy + 'static {
    /// Returns the shared runtime type, building and registering it on first use.
    fn enum_type() -> Arc<EnumType>;

    /// Converts this variant into its member handle.
    fn to_member(self) -> EnumMember;

    /// Converts a member handle back into a variant.
    ///
    /// Returns `None` for members of any other type.
    fn from_member(member: &EnumMember) -> Option<Self>;

    /// Returns the variant's primitive value.
    fn value(self) -> MemberValue {
        self.to_member().value().clone()
    }

    /// Returns the variant's display label.
    fn label(self) -> String {
        self.to_member().label().into_owned()
    }

    /// Returns `(value, label)` pairs for every variant in declaration order.
    fn choices() -> Vec<(MemberValue, String)> {
        Self::enum_type()
            .members()
            .map(|m| (m.value().clone(), m.label().into_owned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Arc<EnumType> {
        EnumType::builder("tests.test_enums", "Color")
            .labeled_member("RED", "r", "Reddish")
            .member("GREEN", "g")
            .labeled_member("BLUE", "b", "bluë")
            .build()
            .unwrap()
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let names: Vec<String> = color().members().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "BLUE"]);
    }

    #[test]
    fn test_labels() {
        let color = color();
        assert_eq!(color.member("RED").unwrap().label(), "Reddish");
        assert_eq!(color.member("GREEN").unwrap().label(), "Green");
        assert_eq!(color.member("BLUE").unwrap().label(), "bluë");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = EnumType::builder("m", "Dup")
            .member("A", 1)
            .member("A", 2)
            .build()
            .unwrap_err();
        assert!(matches!(err, EnumFieldError::DuplicateMember { member, .. } if member == "A"));
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let err = EnumType::builder("m", "Dup")
            .member("A", "x")
            .member("B", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, EnumFieldError::DuplicateMember { member, .. } if member == "x"));
    }

    #[test]
    fn test_int_and_str_values_are_distinct() {
        let mixed = EnumType::builder("m", "Mixed")
            .member("ONE", 1)
            .member("ONE_STR", "1")
            .build()
            .unwrap();
        assert_eq!(mixed.from_value(&MemberValue::Int(1)).unwrap().name(), "ONE");
        assert_eq!(
            mixed.from_value(&MemberValue::from("1")).unwrap().name(),
            "ONE_STR"
        );
    }

    #[test]
    fn test_from_value_is_exact() {
        let color = color();
        assert_eq!(color.from_value(&"g".into()).unwrap().name(), "GREEN");
        assert!(color.from_value(&"GREEN".into()).is_none());
    }

    #[test]
    fn test_identity_is_per_construction() {
        let a = color();
        let b = color();
        assert!(!a.is_same(&b));
        assert!(a.same_members(&b));
        assert_ne!(a.member("RED").unwrap(), b.member("RED").unwrap());
        assert_eq!(a.member("RED").unwrap(), a.member("RED").unwrap());
    }

    #[test]
    fn test_member_display_and_debug() {
        let red = color().member("RED").unwrap();
        assert_eq!(red.to_string(), "Color.RED");
        assert_eq!(format!("{red:?}"), "<Color.RED: Str(\"r\")>");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(color().qualified_name(), "tests.test_enums.Color");
        let bare = EnumType::builder("", "Bare").member("X", 1).build().unwrap();
        assert_eq!(bare.qualified_name(), "Bare");
    }

    #[test]
    fn test_member_value_serde_untagged() {
        let json = serde_json::to_string(&vec![MemberValue::Int(1), MemberValue::from("a")]).unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
        let back: Vec<MemberValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![MemberValue::Int(1), MemberValue::from("a")]);
    }

    #[test]
    fn test_member_at_bounds() {
        let color = color();
        assert_eq!(color.member_at(2).unwrap().name(), "BLUE");
        assert!(color.member_at(3).is_none());
    }
}
