//! Value factory
//!
//! Constructors for every boxed kind. Constructors for representations
//! narrower than `i64` enforce their range here; a violation is a fatal
//! [`FaultKind::RangeViolation`](crate::fault::FaultKind::RangeViolation).

use std::collections::BTreeMap;

use crate::fault;
use crate::value::{BoxedValue, TypeTag, Value};

/// Build a scalar of kind `tag` from the machine-word payload `raw`.
///
/// - `Int`: any value
/// - `Byte`: `0..=255`
/// - `Char`: a Unicode scalar value
/// - `Bool`: `0` or `1`
/// - `Null`: `raw` is ignored
///
/// Non-scalar tags are a fatal unsupported-type fault.
pub fn make_scalar(tag: TypeTag, raw: i64) -> BoxedValue {
    match tag {
        TypeTag::Null => box_null(),
        TypeTag::Int => box_int(raw),
        TypeTag::Byte => box_byte(raw),
        TypeTag::Char => box_char(raw),
        TypeTag::Bool => match raw {
            0 => box_bool(false),
            1 => box_bool(true),
            _ => fault::range_violation("make_scalar", format!("{} is not a bool payload", raw)),
        },
        TypeTag::Real | TypeTag::Str | TypeTag::List | TypeTag::Record => {
            fault::unsupported_type("make_scalar", tag)
        }
    }
}

pub fn box_null() -> BoxedValue {
    BoxedValue::from_value(Value::Null)
}

pub fn box_bool(b: bool) -> BoxedValue {
    BoxedValue::from_value(Value::Bool(b))
}

pub fn box_int(i: i64) -> BoxedValue {
    BoxedValue::from_value(Value::Int(i))
}

pub fn box_byte(raw: i64) -> BoxedValue {
    match u8::try_from(raw) {
        Ok(b) => BoxedValue::from_value(Value::Byte(b)),
        Err(_) => fault::range_violation("box_byte", format!("{} is not in 0..=255", raw)),
    }
}

pub fn box_char(raw: i64) -> BoxedValue {
    match u32::try_from(raw).ok().and_then(char::from_u32) {
        Some(c) => BoxedValue::from_value(Value::Char(c)),
        None => fault::range_violation("box_char", format!("{} is not a unicode scalar value", raw)),
    }
}

pub fn box_real(r: f64) -> BoxedValue {
    BoxedValue::from_value(Value::Real(r))
}

pub fn box_str(s: impl Into<String>) -> BoxedValue {
    BoxedValue::from_value(Value::Str(s.into()))
}

pub fn box_list(items: Vec<BoxedValue>) -> BoxedValue {
    BoxedValue::from_value(Value::List(items))
}

pub fn box_record<K: Into<String>>(fields: impl IntoIterator<Item = (K, BoxedValue)>) -> BoxedValue {
    let fields: BTreeMap<String, BoxedValue> =
        fields.into_iter().map(|(name, value)| (name.into(), value)).collect();
    BoxedValue::from_value(Value::Record(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::{catch, FaultKind};

    #[test]
    fn test_byte_bounds() {
        assert_eq!(make_scalar(TypeTag::Byte, 0).value(), &Value::Byte(0));
        assert_eq!(make_scalar(TypeTag::Byte, 255).value(), &Value::Byte(255));

        for raw in [-1, 256, i64::MIN, i64::MAX] {
            let fault = catch(|| make_scalar(TypeTag::Byte, raw)).unwrap_err();
            assert_eq!(fault.kind, FaultKind::RangeViolation, "raw = {}", raw);
        }
    }

    #[test]
    fn test_int_passes_through() {
        for raw in [i64::MIN, -1, 0, 300, i64::MAX] {
            assert_eq!(make_scalar(TypeTag::Int, raw).as_scalar(), Some(raw));
        }
    }

    #[test]
    fn test_char_requires_scalar_value() {
        assert_eq!(make_scalar(TypeTag::Char, 'λ' as i64).value(), &Value::Char('λ'));

        for raw in [-1, 0xD800, 0x11_0000] {
            let fault = catch(|| make_scalar(TypeTag::Char, raw)).unwrap_err();
            assert_eq!(fault.kind, FaultKind::RangeViolation);
        }
    }

    #[test]
    fn test_bool_payload() {
        assert_eq!(make_scalar(TypeTag::Bool, 1).value(), &Value::Bool(true));
        assert_eq!(make_scalar(TypeTag::Bool, 0).value(), &Value::Bool(false));
        assert!(catch(|| make_scalar(TypeTag::Bool, 2)).is_err());
    }

    #[test]
    fn test_non_scalar_tags_are_unsupported() {
        for tag in [TypeTag::Real, TypeTag::Str, TypeTag::List, TypeTag::Record] {
            let fault = catch(|| make_scalar(tag, 0)).unwrap_err();
            assert_eq!(fault.kind, FaultKind::UnsupportedType);
            assert_eq!(fault.routine, "make_scalar");
        }
    }

    #[test]
    fn test_record_fields_are_sorted() {
        let record = box_record([("y", box_int(2)), ("x", box_int(1))]);
        assert_eq!(record.tag(), TypeTag::Record);
        assert_eq!(record.to_string(), "{x:1,y:2}");
    }
}
