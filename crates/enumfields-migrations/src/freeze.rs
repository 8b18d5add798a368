//! Freezing enum types for legacy migration files.
//!
//! A frozen enum is the portable tuple `(module, name, ((member, value), ...))`.
//! Migration files store it as literal text; unfreezing rebuilds an enum type
//! with the same ordered members. The rebuilt type is always a new type, never
//! the original.
//!
//! # Examples
//!
//! ```
//! use enumfields_core::enums::EnumType;
//! use enumfields_migrations::freeze::{freeze_to_text, unfreeze_text};
//!
//! let color = EnumType::builder("tests.test_enums", "Color")
//!     .member("RED", "r")
//!     .member("GREEN", "g")
//!     .build()
//!     .unwrap();
//!
//! let text = freeze_to_text(&color);
//! assert_eq!(text, "('tests.test_enums', 'Color', (('RED', 'r'), ('GREEN', 'g')))");
//!
//! let thawed = unfreeze_text(&text).unwrap();
//! assert!(thawed.same_members(&color));
//! assert!(!thawed.is_same(&color));
//! ```

use std::fmt;
use std::sync::Arc;

use enumfields_core::enums::{EnumType, MemberValue};
use enumfields_core::error::{EnumFieldError, EnumFieldResult};
use enumfields_db::fields::{EnumReference, EnumSource};
use serde::{Deserialize, Serialize};

use crate::literal::{self, Literal};

/// The portable form of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenEnum {
    /// Dotted module the type was defined in. May be empty.
    pub module: String,
    /// Type name.
    pub name: String,
    /// Ordered `(member name, value)` pairs.
    pub members: Vec<(String, MemberValue)>,
}

impl FrozenEnum {
    /// Converts this frozen enum into a literal tuple.
    pub fn to_literal(&self) -> Literal {
        let members = self
            .members
            .iter()
            .map(|(name, value)| {
                Literal::Tuple(vec![Literal::Str(name.clone()), value_literal(value)])
            })
            .collect();
        Literal::Tuple(vec![
            Literal::Str(self.module.clone()),
            Literal::Str(self.name.clone()),
            Literal::Tuple(members),
        ])
    }

    /// Reads a frozen enum from a literal, checking its shape.
    ///
    /// Tuples and lists are accepted interchangeably.
    ///
    /// # Errors
    ///
    /// Returns [`EnumFieldError::MalformedFreezeTuple`] describing the first
    /// shape problem found.
    pub fn from_literal(lit: &Literal) -> EnumFieldResult<Self> {
        let parts = lit
            .as_sequence()
            .ok_or_else(|| malformed(format!("expected a tuple, found {}", lit.kind())))?;
        let [module, name, members] = parts else {
            return Err(malformed(format!(
                "expected (module, name, members), found {} items",
                parts.len()
            )));
        };

        let module = module
            .as_str()
            .ok_or_else(|| malformed(format!("module must be a string, found {}", module.kind())))?;
        let name = name
            .as_str()
            .ok_or_else(|| malformed(format!("name must be a string, found {}", name.kind())))?;

        let members = members
            .as_sequence()
            .ok_or_else(|| malformed(format!("members must be a tuple, found {}", members.kind())))?
            .iter()
            .enumerate()
            .map(|(index, member)| member_pair(index, member))
            .collect::<EnumFieldResult<Vec<_>>>()?;

        Ok(Self {
            module: module.to_string(),
            name: name.to_string(),
            members,
        })
    }

    /// Builds a new enum type from this frozen form.
    ///
    /// Names are taken as they are: anything the builder accepted freezes and
    /// thaws back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EnumFieldError::DuplicateMember`] for repeated names or values.
    pub fn thaw(&self) -> EnumFieldResult<Arc<EnumType>> {
        EnumType::from_parts(
            self.module.clone(),
            self.name.clone(),
            self.members.iter().cloned(),
        )
    }
}

impl fmt::Display for FrozenEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

impl From<FrozenEnum> for EnumReference {
    fn from(frozen: FrozenEnum) -> Self {
        Self::Inline {
            module: frozen.module,
            name: frozen.name,
            members: frozen.members,
        }
    }
}

impl From<FrozenEnum> for EnumSource {
    fn from(frozen: FrozenEnum) -> Self {
        Self::Reference(frozen.into())
    }
}

/// Freezes `enum_type` into its portable form.
pub fn freeze(enum_type: &EnumType) -> FrozenEnum {
    FrozenEnum {
        module: enum_type.module().to_string(),
        name: enum_type.name().to_string(),
        members: enum_type.pairs(),
    }
}

/// Freezes `enum_type` into literal text.
pub fn freeze_to_text(enum_type: &EnumType) -> String {
    let text = freeze(enum_type).to_string();
    tracing::trace!(enum_name = %enum_type.qualified_name(), frozen = %text, "Froze enum");
    text
}

/// Rebuilds an enum type from its frozen form.
///
/// # Errors
///
/// See [`FrozenEnum::thaw`].
pub fn unfreeze(frozen: &FrozenEnum) -> EnumFieldResult<Arc<EnumType>> {
    frozen.thaw()
}

/// Rebuilds an enum type from frozen literal text.
///
/// # Errors
///
/// Returns [`EnumFieldError::LiteralSyntax`] if `text` is not a literal, and
/// [`EnumFieldError::MalformedFreezeTuple`] if it has the wrong shape.
pub fn unfreeze_text(text: &str) -> EnumFieldResult<Arc<EnumType>> {
    let lit = literal::parse(text)?;
    let enum_type = FrozenEnum::from_literal(&lit)?.thaw()?;
    tracing::debug!(enum_name = %enum_type.qualified_name(), "Unfroze enum");
    Ok(enum_type)
}

fn value_literal(value: &MemberValue) -> Literal {
    match value {
        MemberValue::Int(i) => Literal::Int(*i),
        MemberValue::Str(s) => Literal::Str(s.clone()),
    }
}

fn member_pair(index: usize, member: &Literal) -> EnumFieldResult<(String, MemberValue)> {
    let Some([name, value]) = member.as_sequence() else {
        return Err(malformed(format!(
            "member {index} must be a (name, value) pair"
        )));
    };
    let name = name.as_str().ok_or_else(|| {
        malformed(format!(
            "member {index} name must be a string, found {}",
            name.kind()
        ))
    })?;
    let value = match value {
        Literal::Int(i) => MemberValue::Int(*i),
        Literal::Str(s) => MemberValue::Str(s.clone()),
        other => {
            return Err(malformed(format!(
                "member {name} value must be an int or str, found {}",
                other.kind()
            )))
        }
    };
    Ok((name.to_string(), value))
}

fn malformed(message: String) -> EnumFieldError {
    EnumFieldError::MalformedFreezeTuple(message)
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

    fn is_malformed(result: EnumFieldResult<Arc<EnumType>>) -> bool {
        matches!(result, Err(EnumFieldError::MalformedFreezeTuple(_)))
    }

    #[test]
    fn test_freeze() {
        let frozen = freeze(&color());
        assert_eq!(frozen.module, "tests.test_enums");
        assert_eq!(frozen.name, "Color");
        assert_eq!(
            frozen.members,
            vec![
                ("RED".to_string(), MemberValue::from("r")),
                ("GREEN".to_string(), MemberValue::from("g")),
                ("BLUE".to_string(), MemberValue::from("b")),
            ]
        );
    }

    #[test]
    fn test_freeze_to_text() {
        assert_eq!(
            freeze_to_text(&color()),
            "('tests.test_enums', 'Color', (('RED', 'r'), ('GREEN', 'g'), ('BLUE', 'b')))"
        );
    }

    #[test]
    fn test_unfreeze_from_tuple() {
        let color = color();
        let thawed = unfreeze(&freeze(&color)).unwrap();
        assert_eq!(thawed.pairs(), color.pairs());
        assert!(!thawed.is_same(&color));
        assert_eq!(thawed.qualified_name(), "tests.test_enums.Color");
    }

    #[test]
    fn test_unfreeze_from_text() {
        let color = color();
        let thawed = unfreeze_text(&freeze_to_text(&color)).unwrap();
        for (original, rebuilt) in color.members().zip(thawed.members()) {
            assert_eq!(original.value(), rebuilt.value());
            assert_eq!(original.name(), rebuilt.name());
        }
    }

    #[test]
    fn test_unfreeze_integer_values_and_lists() {
        let thawed = unfreeze_text("['app.models', 'Priority', [['LOW', 1], ('HIGH', -2)]]").unwrap();
        assert!(thawed.is_integer_valued());
        assert_eq!(thawed.member("HIGH").unwrap().value(), &MemberValue::Int(-2));
    }

    #[test]
    fn test_unfreeze_unicode_prefixed_text() {
        let thawed = unfreeze_text("(u'tests', u'Color', ((u'BLUE', u'bluë'),))").unwrap();
        assert_eq!(thawed.member("BLUE").unwrap().value(), &MemberValue::from("bluë"));
    }

    #[test]
    fn test_unfreeze_empty_module_and_members() {
        let thawed = unfreeze_text("('', 'Nothing', ())").unwrap();
        assert!(thawed.is_empty());
        assert_eq!(thawed.qualified_name(), "Nothing");
    }

    #[test]
    fn test_malformed_shapes() {
        for text in [
            "'Color'",
            "('tests', 'Color')",
            "('tests', 'Color', (), 'extra')",
            "(1, 'Color', ())",
            "('tests', None, ())",
            "('tests', 'Color', 'RED')",
            "('tests', 'Color', (('RED',),))",
            "('tests', 'Color', (('RED', 'r', 'x'),))",
            "('tests', 'Color', ((1, 'r'),))",
            "('tests', 'Color', (('RED', 1.5),))",
            "('tests', 'Color', (('RED', None),))",
            "('tests', 'Color', (('RED', True),))",
        ] {
            assert!(is_malformed(unfreeze_text(text)), "{text:?} should be malformed");
        }
    }

    #[test]
    fn test_syntax_errors_are_not_shape_errors() {
        assert!(matches!(
            unfreeze_text("('tests', 'Color', (('RED', os.getcwd()),))"),
            Err(EnumFieldError::LiteralSyntax { .. })
        ));
    }

    #[test]
    fn test_duplicate_members_rejected() {
        assert!(matches!(
            unfreeze_text("('tests', 'Color', (('RED', 'r'), ('ROUGE', 'r')))"),
            Err(EnumFieldError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_round_trip_keeps_unusual_names() {
        let size = EnumType::builder("my-app.models", "Größe")
            .member("GRÖSSE", "g")
            .member("extra large", "xl")
            .build()
            .unwrap();
        let text = freeze_to_text(&size);
        assert_eq!(
            text,
            "('my-app.models', 'Größe', (('GRÖSSE', 'g'), ('extra large', 'xl')))"
        );

        let thawed = unfreeze_text(&text).unwrap();
        assert_eq!(thawed.pairs(), size.pairs());
        assert_eq!(thawed.qualified_name(), "my-app.models.Größe");
        assert_eq!(unfreeze(&freeze(&size)).unwrap().pairs(), size.pairs());
    }

    #[test]
    fn test_frozen_enum_as_reference() {
        let reference: EnumReference = freeze(&color()).into();
        let resolved = reference.resolve().unwrap();
        assert!(resolved.same_members(&color()));
    }
}
