//! Scalar conversion routines
//!
//! Every conversion follows the same steps:
//! 1. sanity-check the argument
//! 2. accept only the tags in the routine's whitelist
//! 3. read the payload as an `i64`
//! 4. check the destination's precondition, if it has one
//! 5. box the result with the destination tag
//!
//! Each routine is one row in [`CONVERSIONS`]. `toUnsignedInt` has no
//! precondition while `toUnsignedByte` requires `0..=255`; that asymmetry is
//! part of the runtime contract.

use std::fmt;

use brisk_plugin::{Initializer, Signature};

use crate::factory;
use crate::fault;
use crate::registry::{NativeFn, NativeRegistry};
use crate::sanity;
use crate::value::{BoxedValue, TypeTag};

/// Numeric precondition on the extracted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    None,
    Between(i64, i64),
    UnicodeScalar,
}

impl Precondition {
    fn holds(self, value: i64) -> bool {
        match self {
            Precondition::None => true,
            Precondition::Between(lo, hi) => (lo..=hi).contains(&value),
            Precondition::UnicodeScalar => u32::try_from(value).ok().and_then(char::from_u32).is_some(),
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::None => write!(f, "any value"),
            Precondition::Between(lo, hi) => write!(f, "{}..={}", lo, hi),
            Precondition::UnicodeScalar => write!(f, "a unicode scalar value"),
        }
    }
}

/// One type-dispatch conversion routine
pub struct Conversion {
    pub name: &'static str,
    pub signature: &'static str,
    pub accepts: &'static [TypeTag],
    pub precondition: Precondition,
    pub result: TypeTag,
    pub routine: NativeFn,
}

const INTEGRAL: &[TypeTag] = &[TypeTag::Int, TypeTag::Char, TypeTag::Byte];

pub const TO_UNSIGNED_BYTE: Conversion = Conversion {
    name: "toUnsignedByte",
    signature: "[^d,v,i]",
    accepts: INTEGRAL,
    precondition: Precondition::Between(0, 255),
    result: TypeTag::Byte,
    routine: to_unsigned_byte,
};

pub const TO_UNSIGNED_INT: Conversion = Conversion {
    name: "toUnsignedInt",
    signature: "[^i,v,d]",
    accepts: INTEGRAL,
    precondition: Precondition::None,
    result: TypeTag::Int,
    routine: to_unsigned_int,
};

pub const TO_CHAR: Conversion = Conversion {
    name: "toChar",
    signature: "[^c,v,i]",
    accepts: INTEGRAL,
    precondition: Precondition::UnicodeScalar,
    result: TypeTag::Char,
    routine: to_char,
};

pub const CONVERSIONS: &[&Conversion] = &[&TO_UNSIGNED_BYTE, &TO_UNSIGNED_INT, &TO_CHAR];

impl Conversion {
    pub fn apply(&self, value: &BoxedValue) -> BoxedValue {
        sanity::check(value, self.name);

        let tag = value.tag();
        if !self.accepts.contains(&tag) {
            fault::unsupported_type(self.name, tag);
        }

        let raw = match value.as_scalar() {
            Some(raw) => raw,
            None => fault::internal(self.name, format!("{} payload is not a scalar", tag)),
        };

        if !self.precondition.holds(raw) {
            fault::range_violation(
                self.name,
                format!("{} is not in {}", raw, self.precondition),
            );
        }

        factory::make_scalar(self.result, raw)
    }

    fn apply_args(&self, args: &[BoxedValue]) -> BoxedValue {
        sanity::check_arity(args, 1, self.name);
        self.apply(&args[0])
    }
}

/// Int, char or byte to a byte with the same value.
pub fn to_unsigned_byte(args: &[BoxedValue]) -> BoxedValue {
    TO_UNSIGNED_BYTE.apply_args(args)
}

/// Int, char or byte to an int with the same value.
pub fn to_unsigned_int(args: &[BoxedValue]) -> BoxedValue {
    TO_UNSIGNED_INT.apply_args(args)
}

pub fn to_char(args: &[BoxedValue]) -> BoxedValue {
    TO_CHAR.apply_args(args)
}

pub const MODULE: Initializer<NativeRegistry> = Initializer::new("convert", register, query);

fn register(registry: &mut NativeRegistry) {
    for conversion in CONVERSIONS {
        registry.register(
            conversion.name,
            Signature::new(conversion.signature),
            conversion.routine,
        );
    }
}

fn query(registry: &NativeRegistry) -> Result<(), String> {
    for conversion in CONVERSIONS {
        if !Signature::new(conversion.signature).is_well_formed() {
            return Err(format!(
                "{} has malformed signature {}",
                conversion.name, conversion.signature
            ));
        }
        if !registry.contains(conversion.name, conversion.signature) {
            return Err(format!("{} {} is not registered", conversion.name, conversion.signature));
        }
    }
    Ok(())
}
