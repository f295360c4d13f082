//! Nested objects and pre-encoded contextual fields

use super::entry::Entry;

/// Types that encode themselves as a JSON object.
///
/// The implementation appends its members to the entry it is given, using
/// the ordinary field methods, and returns that same entry. The caller
/// turns the members into an object, so the implementation must not write
/// braces itself.
///
/// ```
/// use zlog::core::{Entry, ObjectMarshaler};
///
/// struct User {
///     name: &'static str,
///     age: u8,
/// }
///
/// impl ObjectMarshaler for User {
///     fn marshal_object<'a>(&self, e: Entry<'a>) -> Entry<'a> {
///         e.str("name", self.name).uint8("age", self.age)
///     }
/// }
///
/// let ctx = Entry::new_context()
///     .object("user", &User { name: "ann", age: 30 })
///     .value();
/// assert_eq!(ctx.as_bytes(), br#","user":{"name":"ann","age":30}"#);
/// ```
pub trait ObjectMarshaler {
    fn marshal_object<'a>(&self, e: Entry<'a>) -> Entry<'a>;
}

impl<T: ObjectMarshaler + ?Sized> ObjectMarshaler for &T {
    fn marshal_object<'a>(&self, e: Entry<'a>) -> Entry<'a> {
        (**self).marshal_object(e)
    }
}

/// Encoded fields, each starting with a comma, ready to be spliced into a
/// record (see [`Entry::context`]) or wrapped as an object ([`Entry::dict`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context(Vec<u8>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Context(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields of both contexts, `self` first.
    #[must_use]
    pub fn merge(&self, other: &Context) -> Context {
        let mut bytes = Vec::with_capacity(self.0.len() + other.0.len());
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(&other.0);
        Context(bytes)
    }
}

impl AsRef<[u8]> for Context {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_order() {
        let a = Entry::new_context().str("a", "1").value();
        let b = Entry::new_context().int64("b", 2).value();
        assert_eq!(a.merge(&b).as_bytes(), br#","a":"1","b":2"#);
    }

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(Entry::new_context().value(), ctx);
    }
}
