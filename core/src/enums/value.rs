use std::{borrow::Cow, cmp::Ordering, collections::HashSet, fmt, sync::OnceLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::EnumError;

/// One enum member: an integer for storage and a string for display.
///
/// A `Value` compares equal to another `Value` when both halves match, to a
/// bare integer when the integer half matches and to a bare string when the
/// string half matches. Ordering is only defined against integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    int: i64,
    str: Cow<'static, str>,
}

impl Value {
    /// Creates a value through the process-wide [`Uniqueness`] scope.
    ///
    /// # Errors
    ///
    /// [`EnumError::DuplicateValue`] when checking is enabled and `int` has
    /// already been handed out by the global scope.
    pub fn new(int: i64, label: impl Into<Cow<'static, str>>) -> Result<Self, EnumError> {
        Uniqueness::global().value(int, label)
    }

    /// Creates a value outside of any uniqueness scope.
    pub const fn from_static(int: i64, label: &'static str) -> Self {
        Self {
            int,
            str: Cow::Borrowed(label),
        }
    }

    /// Like [`Value::from_static`] for runtime strings.
    pub fn new_unchecked(int: i64, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            int,
            str: label.into(),
        }
    }

    pub fn int(&self) -> i64 {
        self.int
    }

    pub fn as_str(&self) -> &str {
        &self.str
    }

    pub fn equals<'a>(&self, other: impl Into<Operand<'a>>) -> bool {
        match other.into() {
            Operand::Int(int) => self.int == int,
            Operand::Str(s) => self.str == s,
            Operand::Value(value) => self == value,
        }
    }

    /// Membership test, `1 in value` / `"a" in value` / `value in value`.
    pub fn contains<'a>(&self, other: impl Into<Operand<'a>>) -> bool {
        self.equals(other)
    }
}

/// The operand kinds a [`Value`] can be compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Int(i64),
    Str(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(s: &'a str) -> Self {
        Operand::Str(s)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(s: &'a String) -> Self {
        Operand::Str(s)
    }
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(value: &'a Value) -> Self {
        Operand::Value(value)
    }
}

macro_rules! int_ops {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Operand<'_> {
                fn from(int: $ty) -> Self {
                    Operand::Int(i64::from(int))
                }
            }

            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    self.int == i64::from(*other)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    i64::from(*self) == other.int
                }
            }

            impl PartialOrd<$ty> for Value {
                fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                    self.int.partial_cmp(&i64::from(*other))
                }
            }

            impl PartialOrd<Value> for $ty {
                fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
                    i64::from(*self).partial_cmp(&other.int)
                }
            }
        )*
    };
}

int_ops!(i32 i64);

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.str == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.str == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.str == other.as_str()
    }
}

impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str)
    }
}

impl From<&Value> for i64 {
    fn from(value: &Value) -> Self {
        value.int
    }
}

impl From<Value> for i64 {
    fn from(value: Value) -> Self {
        value.int
    }
}

impl From<&Value> for String {
    fn from(value: &Value) -> Self {
        value.str.to_string()
    }
}

impl From<Value> for String {
    fn from(value: Value) -> Self {
        value.str.into_owned()
    }
}

/// Tracks the integers handed out to values built in one scope.
///
/// Integers are recorded even while checking is disabled, so values seeded
/// with checking off still collide once it is turned back on.
#[derive(Debug)]
pub struct Uniqueness {
    state: Mutex<UniquenessState>,
}

#[derive(Debug)]
struct UniquenessState {
    enabled: bool,
    seen: HashSet<i64>,
}

impl Uniqueness {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(UniquenessState {
                enabled: true,
                seen: HashSet::new(),
            }),
        }
    }

    /// The scope [`Value::new`] goes through. Shared by every registry in
    /// the process.
    pub fn global() -> &'static Uniqueness {
        static GLOBAL: OnceLock<Uniqueness> = OnceLock::new();
        GLOBAL.get_or_init(Uniqueness::new)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    /// Forgets every recorded integer and turns checking back on.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.enabled = true;
        state.seen.clear();
    }

    pub fn value(&self, int: i64, label: impl Into<Cow<'static, str>>) -> Result<Value, EnumError> {
        let mut state = self.state.lock();
        if !state.seen.insert(int) && state.enabled {
            return Err(EnumError::DuplicateValue { int });
        }
        Ok(Value::new_unchecked(int, label))
    }
}

impl Default for Uniqueness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn a() -> Value {
        Value::from_static(1, "A")
    }

    #[test]
    fn test_unique_values() {
        let scope = Uniqueness::new();
        scope.set_enabled(false);
        scope.value(1, "A").unwrap();
        scope.value(1, "A").unwrap();

        scope.set_enabled(true);
        let err = scope.value(1, "A").unwrap_err();
        assert!(err.is_duplicate_value());
        assert!(scope.value(2, "A").is_ok());

        scope.reset();
        assert!(scope.value(1, "A").is_ok());
    }

    // The only test that touches the process-wide scope.
    #[test]
    fn test_global_scope() {
        let global = Uniqueness::global();
        assert!(global.is_enabled());
        let value = Value::new(-918_273, "global").unwrap();
        assert_eq!(value.int(), -918_273);
        assert_eq!(
            Value::new(-918_273, "again").unwrap_err(),
            EnumError::DuplicateValue { int: -918_273 }
        );

        global.set_enabled(false);
        Value::new(-918_274, "seeded").unwrap();
        Value::new(-918_274, "seeded").unwrap();
        global.set_enabled(true);
        assert_eq!(
            Value::new(-918_274, "seeded").unwrap_err(),
            EnumError::DuplicateValue { int: -918_274 }
        );
        assert!(global.is_enabled());
    }

    #[test]
    fn test_equal() {
        assert_eq!(a(), Value::from_static(1, "A"));
        assert_eq!(a(), "A");
        assert_eq!(a(), 1);
        assert_eq!(a(), String::from("A"));
        assert_eq!(1, a());
        assert_eq!("A", a());
        assert!(a().equals(1));
        assert!(a().equals("A"));
        assert!(a().equals(&a()));
    }

    #[test]
    fn test_not_equal() {
        assert_ne!(a(), Value::from_static(2, "B"));
        assert_ne!(a(), Value::from_static(1, "B"));
        assert_ne!(a(), Value::from_static(2, "A"));
        assert_ne!(a(), "B");
        assert_ne!(a(), 2);
        assert!(!a().equals(2i64));
    }

    #[test]
    fn test_ordering() {
        assert!(a() < 2);
        assert!(a() <= 1);
        assert!(a() >= 1);
        assert!(a() > 0);
        assert!(2 > a());
        assert!(1 >= a());
        assert!(0 < a());
        assert!(1 <= a());
        assert!(!(a() < 1));
        assert!(a() < 2i64);
    }

    #[test]
    fn test_contains() {
        assert!(a().contains(1));
        assert!(a().contains("A"));
        assert!(a().contains(&a()));
        assert!(a().contains(&String::from("A")));
        assert!(!a().contains(&Value::from_static(1, "B")));
        assert!(!a().contains("a"));
    }

    #[test]
    fn test_convert() {
        assert_eq!(i64::from(a()), 1);
        assert_eq!(i64::from(&a()), 1);
        assert_eq!(String::from(a()), "A");
        assert_eq!(a().to_string(), "A");
        assert_eq!(a().as_str(), "A");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_value(a()).unwrap();
        assert_eq!(json, serde_json::json!({"int": 1, "str": "A"}));
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, a());
    }
}
