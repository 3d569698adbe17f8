use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};
use bitflags::bitflags;
use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

// Universal Dependencies labels (plus the spaCy English v1 extras `dobj`, `dative`, `neg`)
pub const ROOT: &str = "root";
pub const NSUBJ: &str = "nsubj";
pub const OBJ: &str = "obj";
pub const DOBJ: &str = "dobj";
pub const IOBJ: &str = "iobj";
pub const DATIVE: &str = "dative";
pub const NEG: &str = "neg";
pub const CONJ: &str = "conj";
pub const CC: &str = "cc";
pub const CSUBJ: &str = "csubj";
pub const CCOMP: &str = "ccomp";
pub const XCOMP: &str = "xcomp";
pub const ADVCL: &str = "advcl";
pub const ACL: &str = "acl";

/// Labels that make a unit `compound`.
pub const COORDINATING_LABELS: [&str; 2] = [CONJ, CC];

/// Labels that introduce a subordinate clause and make a unit `complex`.
pub const SUBORDINATING_LABELS: [&str; 5] = [CSUBJ, CCOMP, XCOMP, ADVCL, ACL];

bitflags! {
    /// Grammatical classes a dependency label can belong to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct LabelClass: u8 {
        const ROOT = 1;
        const SUBJECT = 2;
        const OBJECT = 4;
        const INDIRECT_OBJECT = 8;
        const COORDINATING = 16;
        const SUBORDINATING = 32;
        const NEGATION = 64;
    }
}

impl LabelClass {
    /// Classify a raw arc label. Unknown labels yield the empty set.
    pub fn of(label: &str) -> Self {
        match label {
            ROOT => LabelClass::ROOT,
            NSUBJ => LabelClass::SUBJECT,
            OBJ | DOBJ => LabelClass::OBJECT,
            IOBJ | DATIVE => LabelClass::INDIRECT_OBJECT,
            CONJ | CC => LabelClass::COORDINATING,
            CSUBJ | CCOMP | XCOMP | ADVCL | ACL => LabelClass::SUBORDINATING,
            NEG => LabelClass::NEGATION,
            _ => LabelClass::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum ClauseType {
    Subject = 0,
    Relative = 1,
    Complement = 2,
    Adverbial = 3,
    Adjectival = 4,
    Matrix = 5,
}

impl ClauseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClauseType::Subject => "subject",
            ClauseType::Relative => "relative",
            ClauseType::Complement => "complement",
            ClauseType::Adverbial => "adverbial",
            ClauseType::Adjectival => "adjectival",
            ClauseType::Matrix => "matrix",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subject" => Ok(ClauseType::Subject),
            "relative" => Ok(ClauseType::Relative),
            "complement" => Ok(ClauseType::Complement),
            "adverbial" => Ok(ClauseType::Adverbial),
            "adjectival" => Ok(ClauseType::Adjectival),
            "matrix" => Ok(ClauseType::Matrix),
            other => Err(LabelError::UnknownClauseType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Transitivity {
    Intransitive = 0,
    Transitive = 1,
    Ditransitive = 2,
}

impl Transitivity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Transitivity::Intransitive => "intransitive",
            Transitivity::Transitive => "transitive",
            Transitivity::Ditransitive => "ditransitive",
        }
    }
}

impl fmt::Display for Transitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transitivity {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intransitive" => Ok(Transitivity::Intransitive),
            "transitive" => Ok(Transitivity::Transitive),
            "ditransitive" => Ok(Transitivity::Ditransitive),
            other => Err(LabelError::UnknownTransitivity(other.to_string())),
        }
    }
}

/// Grammatical roles filled from the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Subject,
    Object,
    IndirectObject,
}

/// One row of the role priority table.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: Role,
    pub label: &'static str,
    /// Labels to descend through when `label` is not a direct dependent.
    pub follow: &'static [&'static str],
}

/// Evaluated top to bottom; a later row may replace an earlier match for the same role.
pub const ROLE_TABLE: [RoleRule; 5] = [
    RoleRule { role: Role::Subject, label: NSUBJ, follow: &[] },
    RoleRule { role: Role::Object, label: OBJ, follow: &[] },
    RoleRule { role: Role::Object, label: DOBJ, follow: &[] },
    RoleRule { role: Role::IndirectObject, label: IOBJ, follow: &[] },
    RoleRule { role: Role::IndirectObject, label: DATIVE, follow: &[] },
];

/// Subordinate-clause labels in extraction priority order.
pub const CLAUSE_TABLE: [(&str, ClauseType); 5] = [
    (CSUBJ, ClauseType::Subject),
    (XCOMP, ClauseType::Relative),
    (CCOMP, ClauseType::Complement),
    (ADVCL, ClauseType::Adverbial),
    (ACL, ClauseType::Adjectival),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    UnknownClauseType(String),
    UnknownTransitivity(String),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::UnknownClauseType(s) => write!(f, "unknown clause type: {:?}", s),
            LabelError::UnknownTransitivity(s) => write!(f, "unknown transitivity: {:?}", s),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LabelError {}
