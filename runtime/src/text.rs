//! String conversion for scalar values

use brisk_plugin::{Initializer, Signature};

use crate::factory;
use crate::fault;
use crate::registry::NativeRegistry;
use crate::sanity;
use crate::value::{BoxedValue, Value};

pub const TO_STRING: &str = "toString";
pub const TO_STRING_SIGNATURE: &str = "[^s,v,a]";

/// Render a scalar or string. Bytes use the binary literal form `00000111b`.
pub fn to_string(args: &[BoxedValue]) -> BoxedValue {
    sanity::check_arity(args, 1, TO_STRING);
    let value = &args[0];

    match value.value() {
        Value::Str(s) => factory::box_str(s.as_str()),
        Value::Null
        | Value::Bool(_)
        | Value::Byte(_)
        | Value::Char(_)
        | Value::Int(_)
        | Value::Real(_) => factory::box_str(value.to_string()),
        Value::List(_) | Value::Record(_) => fault::unsupported_type(TO_STRING, value.tag()),
    }
}

pub const MODULE: Initializer<NativeRegistry> = Initializer::new("text", register, query);

fn register(registry: &mut NativeRegistry) {
    registry.register(TO_STRING, Signature::new(TO_STRING_SIGNATURE), to_string);
}

fn query(registry: &NativeRegistry) -> Result<(), String> {
    if !registry.contains(TO_STRING, TO_STRING_SIGNATURE) {
        return Err(format!("{} {} is not registered", TO_STRING, TO_STRING_SIGNATURE));
    }
    Ok(())
}
