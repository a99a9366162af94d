//! Signature descriptors
//!
//! A descriptor encodes the argument and result type classes of a native
//! routine, e.g. `[^d,v,i]`. The registry only compares descriptors for
//! equality; the shape check below is used by module query passes to catch
//! typos in registration tables.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(Cow<'static, str>);

impl Signature {
    pub const fn new(descriptor: &'static str) -> Self {
        Signature(Cow::Borrowed(descriptor))
    }

    pub fn owned(descriptor: impl Into<String>) -> Self {
        Signature(Cow::Owned(descriptor.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `[` class (`,` class)* `]`, where each class is one or more ASCII
    /// letters optionally prefixed by `^`.
    pub fn is_well_formed(&self) -> bool {
        let Some(inner) = self
            .0
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return false;
        };

        !inner.is_empty()
            && inner.split(',').all(|class| {
                let class = class.strip_prefix('^').unwrap_or(class);
                !class.is_empty() && class.bytes().all(|b| b.is_ascii_alphabetic())
            })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Signature {
    fn from(descriptor: &'static str) -> Self {
        Signature::new(descriptor)
    }
}

impl From<String> for Signature {
    fn from(descriptor: String) -> Self {
        Signature::owned(descriptor)
    }
}
