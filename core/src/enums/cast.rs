use std::{borrow::Cow, fmt, ops::Index, str::FromStr};

use derive_more::{Display, From, IsVariant};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::{Enum, EnumError, Lookup};

/// Which half of each [`Value`](super::Value) a [`CastEnum`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastType {
    #[display(fmt = "int")]
    Int,
    #[display(fmt = "str")]
    Str,
}

impl FromStr for CastType {
    type Err = EnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" | "integer" => Ok(CastType::Int),
            "str" | "string" => Ok(CastType::Str),
            other => Err(EnumError::InvalidCastType {
                target: other.to_string(),
            }),
        }
    }
}

impl TryFrom<&str> for CastType {
    type Error = EnumError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A single member as seen through a [`CastEnum`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, From, IsVariant, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Str(Cow<'static, str>),
}

impl Scalar {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(int) => Some(*int),
            Scalar::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Int(_) => None,
            Scalar::Str(s) => Some(&**s),
        }
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Scalar {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(i64::from(*other))
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(int) => write!(f, "{int}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// Single-representation view of an [`Enum`]: every member is either its
/// integer or its string. The lookup table of the source registry is kept
/// as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastEnum {
    name: Cow<'static, str>,
    target: CastType,
    members: Vec<(Cow<'static, str>, Scalar)>,
    lookup: Lookup,
}

impl CastEnum {
    pub(super) fn project(registry: &Enum, target: CastType) -> Self {
        let members = registry
            .iter()
            .map(|(name, value)| {
                let scalar = match target {
                    CastType::Int => Scalar::Int(value.int()),
                    CastType::Str => Scalar::Str(Cow::Owned(value.as_str().to_string())),
                };
                (Cow::Owned(name.to_string()), scalar)
            })
            .collect();

        Self {
            name: Cow::Owned(registry.name().to_string()),
            target,
            members,
            lookup: registry.lookup().clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> CastType {
        self.target
    }

    pub fn get(&self, member: &str) -> Option<&Scalar> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, scalar)| scalar)
    }

    pub fn member(&self, member: &str) -> Result<&Scalar, EnumError> {
        self.get(member).ok_or_else(|| EnumError::UnknownMember {
            name: member.to_string(),
        })
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.members
            .iter()
            .map(|(name, scalar)| (&**name, scalar))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Index<&str> for CastEnum {
    type Output = Scalar;

    fn index(&self, member: &str) -> &Scalar {
        match self.get(member) {
            Some(scalar) => scalar,
            None => panic!("{} has no member named {member}", self.name),
        }
    }
}

impl Serialize for CastEnum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, scalar) in self.iter() {
            map.serialize_entry(name, scalar)?;
        }
        map.end()
    }
}

/// Casts `registry` to the integer or string view named by `target`.
///
/// `target` is a [`CastType`] or a name such as `"int"` or `"str"`.
///
/// # Errors
///
/// [`EnumError::InvalidCastType`] when `target` names neither representation.
pub fn cast_enum<T>(registry: &Enum, target: T) -> Result<CastEnum, EnumError>
where
    T: TryInto<CastType>,
    EnumError: From<T::Error>,
{
    let target = target.try_into()?;
    Ok(registry.cast(target))
}
