use std::{borrow::Cow, collections::BTreeMap, ops::Index};

use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use super::{CastEnum, CastType, EnumError, Operand, Value};

/// Bidirectional int <-> str table over every member of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lookup {
    int_to_str: BTreeMap<i64, Cow<'static, str>>,
    str_to_int: BTreeMap<Cow<'static, str>, i64>,
}

impl Lookup {
    fn insert(&mut self, value: &Value) -> Result<(), EnumError> {
        if self.int_to_str.contains_key(&value.int()) {
            return Err(EnumError::DuplicateValue { int: value.int() });
        }
        if self.str_to_int.contains_key(value.as_str()) {
            return Err(EnumError::DuplicateLabel {
                label: value.as_str().to_string(),
            });
        }

        let label: Cow<'static, str> = Cow::Owned(value.as_str().to_string());
        self.int_to_str.insert(value.int(), label.clone());
        self.str_to_int.insert(label, value.int());
        Ok(())
    }

    pub fn str_of(&self, int: i64) -> Option<&str> {
        self.int_to_str.get(&int).map(|s| &**s)
    }

    pub fn int_of(&self, label: &str) -> Option<i64> {
        self.str_to_int.get(label).copied()
    }

    /// Pairs ordered by integer.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.int_to_str.iter().map(|(int, s)| (*int, &**s))
    }

    pub fn len(&self) -> usize {
        self.int_to_str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.int_to_str.is_empty()
    }
}

/// A named, immutable set of [`Value`] members.
///
/// Members keep their declaration order. Every integer and every string is
/// unique inside one registry so the [`Lookup`] is never ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    name: Cow<'static, str>,
    members: Vec<(Cow<'static, str>, Value)>,
    lookup: Lookup,
}

impl Enum {
    pub fn new<N, I>(name: impl Into<Cow<'static, str>>, members: I) -> Result<Self, EnumError>
    where
        N: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let name = name.into();
        let mut lookup = Lookup::default();
        let mut seen: Vec<(Cow<'static, str>, Value)> = Vec::new();

        for (member, value) in members {
            let member = member.into();
            if seen.iter().any(|(m, _)| *m == member) {
                return Err(EnumError::DuplicateMember {
                    name: member.into_owned(),
                });
            }
            lookup.insert(&value)?;
            seen.push((member, value));
        }

        debug!(registry = &*name, members = seen.len(), "built enum registry");
        Ok(Self {
            name,
            members: seen,
            lookup,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, member: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value)
    }

    pub fn member(&self, member: &str) -> Result<&Value, EnumError> {
        self.get(member).ok_or_else(|| EnumError::UnknownMember {
            name: member.to_string(),
        })
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Classifies a stored integer, string or value back to its member.
    pub fn find<'a>(&self, other: impl Into<Operand<'a>>) -> Option<(&str, &Value)> {
        let other = other.into();
        self.iter().find(|(_, value)| value.equals(other))
    }

    pub fn contains<'a>(&self, other: impl Into<Operand<'a>>) -> bool {
        self.find(other).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members
            .iter()
            .map(|(name, value)| (&**name, value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Projects every member to one representation.
    pub fn cast(&self, target: CastType) -> CastEnum {
        CastEnum::project(self, target)
    }
}

impl Index<&str> for Enum {
    type Output = Value;

    /// # Panics
    ///
    /// When `member` is not part of the registry.
    fn index(&self, member: &str) -> &Value {
        match self.get(member) {
            Some(value) => value,
            None => panic!("{} has no member named {member}", self.name),
        }
    }
}

impl Serialize for Enum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn work() -> Enum {
        Enum::new(
            "work",
            [
                ("PAUSED", Value::from_static(100, "paused")),
                ("QUEUED", Value::from_static(101, "queued")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_member_access() {
        let e = work();
        assert_eq!(e.name(), "work");
        assert_eq!(e["PAUSED"], "paused");
        assert_eq!(e["PAUSED"], 100);
        assert_eq!(e.get("QUEUED"), Some(&Value::from_static(101, "queued")));
        assert!(e.get("DONE").is_none());
        assert!(e.member("DONE").unwrap_err().is_unknown_member());
        assert_eq!(e.names().collect::<Vec<_>>(), ["PAUSED", "QUEUED"]);
    }

    #[test]
    #[should_panic(expected = "work has no member named DONE")]
    fn test_index_unknown() {
        let _ = &work()["DONE"];
    }

    #[test]
    fn test_lookup() {
        let e = work();
        let lookup = e.lookup();
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.str_of(100), Some("paused"));
        assert_eq!(lookup.int_of("queued"), Some(101));
        assert_eq!(lookup.int_of("PAUSED"), None);
        assert_eq!(
            lookup.iter().collect::<Vec<_>>(),
            [(100, "paused"), (101, "queued")]
        );
    }

    #[test]
    fn test_find() {
        let e = work();
        assert_eq!(e.find(101).map(|(name, _)| name), Some("QUEUED"));
        assert_eq!(e.find("paused").map(|(name, _)| name), Some("PAUSED"));
        assert!(e.contains(&Value::from_static(100, "paused")));
        assert!(!e.contains(&Value::from_static(100, "queued")));
        assert!(!e.contains(7));
    }

    #[test]
    fn test_rejects_conflicts() {
        let err = Enum::new(
            "dup",
            [
                ("A", Value::from_static(1, "a")),
                ("A", Value::from_static(2, "b")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, EnumError::DuplicateMember { name: "A".into() });

        let err = Enum::new(
            "dup",
            [
                ("A", Value::from_static(1, "a")),
                ("B", Value::from_static(1, "b")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, EnumError::DuplicateValue { int: 1 });

        let err = Enum::new(
            "dup",
            [
                ("A", Value::from_static(1, "a")),
                ("B", Value::from_static(2, "a")),
            ],
        )
        .unwrap_err();
        assert!(err.is_duplicate_label());
    }

    #[test]
    fn test_empty() {
        let e = Enum::new("empty", Vec::<(&str, Value)>::new()).unwrap();
        assert!(e.is_empty());
        assert!(e.lookup().is_empty());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&work()).unwrap();
        assert_eq!(
            json,
            r#"{"PAUSED":{"int":100,"str":"paused"},"QUEUED":{"int":101,"str":"queued"}}"#
        );
    }
}
