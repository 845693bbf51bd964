// Path: crates/types/src/app/identity.rs
//! Identifiers for students, recorders and evaluations, plus the opaque identity
//! tokens they map to and from.

use parity_scale_codec::{Decode, Encode};
use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u64(self.0)
            }
        }
    };
}

define_identifier!(
    /// The numeric identifier of a registered student. `0` means "no such student".
    StudentId
);
define_identifier!(
    /// The numeric identifier of a provisioned recorder. `0` means "no such recorder".
    RecorderId
);
define_identifier!(
    /// The global, 0-based position of an evaluation in the append-only log.
    EvaluationId
);

impl StudentId {
    /// The reserved sentinel returned by lookups that find no student.
    pub const NONE: StudentId = StudentId(0);

    /// True if this is the "no such student" sentinel.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl RecorderId {
    /// The reserved sentinel returned by lookups that find no recorder.
    pub const NONE: RecorderId = RecorderId(0);

    /// True if this is the "no such recorder" sentinel.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// An independent identifier sequence. Each namespace has its own counter.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IdNamespace {
    /// Student identifiers.
    Students,
    /// Recorder identifiers.
    Recorders,
    /// Evaluation log positions.
    Evaluations,
}

impl IdNamespace {
    /// The lowercase name used in state keys and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdNamespace::Students => "students",
            IdNamespace::Recorders => "recorders",
            IdNamespace::Evaluations => "evaluations",
        }
    }
}

impl fmt::Display for IdNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The opaque identity token of a caller (e.g. a public-key hash).
/// Every write is attributed to one of these.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Parses a 64-character hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| format!("invalid account hex: {}", e))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("account id must be 32 bytes, got {}", b.len()))?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The width in bytes of a student text identifier.
pub const STUDENT_TEXT_LEN: usize = 32;

/// A fixed-width, opaque student text identifier.
///
/// Shorter inputs are right-padded with zero bytes. Comparison is exact over all
/// 32 bytes, with no case folding or trimming.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StudentText(pub [u8; STUDENT_TEXT_LEN]);

impl StudentText {
    /// Builds a text identifier from raw bytes, failing if they exceed the fixed width.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() > STUDENT_TEXT_LEN {
            return Err(format!(
                "student text is {} bytes, the maximum is {}",
                bytes.len(),
                STUDENT_TEXT_LEN
            ));
        }
        let mut buf = [0u8; STUDENT_TEXT_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// The bytes up to (not including) the zero padding.
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        &self.0[..end]
    }
}

impl std::str::FromStr for StudentText {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl AsRef<[u8]> for StudentText {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for StudentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(self.trimmed()) {
            Ok(s) => f.write_str(s),
            Err(_) => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

impl fmt::Debug for StudentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StudentText({})", self)
    }
}

impl Serialize for StudentText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
