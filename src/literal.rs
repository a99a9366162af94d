//! Command-line value literals
//!
//! `<tag>:<text>`, e.g. `int:42`, `byte:7`, `char:A`, `char:955`,
//! `bool:true`, `real:1.5`, `string:hello`, or plain `null`.

use brisk_runtime::factory;
use brisk_runtime::{BoxedValue, TypeTag};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("expected <tag>:<value>, got `{0}`")]
    MissingTag(String),
    #[error("unknown type tag `{0}`")]
    UnknownTag(String),
    #[error("`{text}` is not a valid {tag} literal")]
    BadValue { tag: TypeTag, text: String },
    #[error("{0} values cannot be written on the command line")]
    NotWritable(TypeTag),
}

/// Parse a literal into a boxed value.
///
/// Range preconditions are the factory's: `byte:300` is a fatal fault, not a
/// parse error.
pub fn parse(literal: &str) -> Result<BoxedValue, LiteralError> {
    if literal == "null" {
        return Ok(factory::box_null());
    }

    let (tag_name, text) = literal
        .split_once(':')
        .ok_or_else(|| LiteralError::MissingTag(literal.to_string()))?;
    let tag =
        TypeTag::from_name(tag_name).ok_or_else(|| LiteralError::UnknownTag(tag_name.to_string()))?;

    let bad_value = || LiteralError::BadValue {
        tag,
        text: text.to_string(),
    };

    match tag {
        TypeTag::Null => Ok(factory::box_null()),
        TypeTag::Int => text.parse().map(factory::box_int).map_err(|_| bad_value()),
        TypeTag::Byte => text.parse().map(factory::box_byte).map_err(|_| bad_value()),
        TypeTag::Bool => text.parse().map(factory::box_bool).map_err(|_| bad_value()),
        TypeTag::Real => text.parse().map(factory::box_real).map_err(|_| bad_value()),
        TypeTag::Str => Ok(factory::box_str(text)),
        TypeTag::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_ascii_digit() => Ok(factory::box_char(c as i64)),
                _ => text.parse().map(factory::box_char).map_err(|_| bad_value()),
            }
        }
        TypeTag::List | TypeTag::Record => Err(LiteralError::NotWritable(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brisk_runtime::fault::{catch, FaultKind};
    use brisk_runtime::Value;

    #[test]
    fn test_scalars() {
        assert_eq!(parse("int:-5").unwrap().value(), &Value::Int(-5));
        assert_eq!(parse("byte:7").unwrap().value(), &Value::Byte(7));
        assert_eq!(parse("char:A").unwrap().value(), &Value::Char('A'));
        assert_eq!(parse("char:955").unwrap().value(), &Value::Char('λ'));
        assert_eq!(parse("char:7").unwrap().value(), &Value::Char('\u{7}'));
        assert_eq!(parse("bool:true").unwrap().value(), &Value::Bool(true));
        assert_eq!(parse("string:a:b").unwrap().value(), &Value::Str("a:b".to_string()));
        assert_eq!(parse("null").unwrap().tag(), TypeTag::Null);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("42"), Err(LiteralError::MissingTag("42".to_string())));
        assert_eq!(
            parse("struct:1"),
            Err(LiteralError::UnknownTag("struct".to_string()))
        );
        assert_eq!(
            parse("int:forty"),
            Err(LiteralError::BadValue {
                tag: TypeTag::Int,
                text: "forty".to_string()
            })
        );
        assert_eq!(parse("list:1"), Err(LiteralError::NotWritable(TypeTag::List)));
    }

    #[test]
    fn test_byte_range_is_a_fault() {
        let fault = catch(|| parse("byte:300")).unwrap_err();
        assert_eq!(fault.kind, FaultKind::RangeViolation);
    }
}
