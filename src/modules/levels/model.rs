//! Education level codes and subject level labels.
//!
//! A student profile stores a machine-oriented [`EducationLevel`] code;
//! subjects are tagged with a display-oriented [`SubjectLevel`] label.
//! The two vocabularies are deliberately distinct (several maternelle
//! codes share one label) and [`EducationLevel::subject_level`] is the
//! single bridge between them. Every caller that needs the mapping goes
//! through that function; there is no second copy of the table anywhere.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Grade identifier stored on a student profile.
///
/// This is a closed vocabulary; the Postgres `education_level` enum and
/// the JSON wire strings both use the exact codes below.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "education_level")]
pub enum EducationLevel {
    #[serde(rename = "MATERNELLE_PETITE")]
    #[sqlx(rename = "MATERNELLE_PETITE")]
    MaternellePetite,
    #[serde(rename = "MATERNELLE_MOYENNE")]
    #[sqlx(rename = "MATERNELLE_MOYENNE")]
    MaternelleMoyenne,
    #[serde(rename = "MATERNELLE_GRANDE")]
    #[sqlx(rename = "MATERNELLE_GRANDE")]
    MaternelleGrande,
    #[serde(rename = "SIL")]
    #[sqlx(rename = "SIL")]
    Sil,
    #[serde(rename = "CP")]
    #[sqlx(rename = "CP")]
    Cp,
    #[serde(rename = "CE1")]
    #[sqlx(rename = "CE1")]
    Ce1,
    #[serde(rename = "CE2")]
    #[sqlx(rename = "CE2")]
    Ce2,
    #[serde(rename = "CM1")]
    #[sqlx(rename = "CM1")]
    Cm1,
    #[serde(rename = "CM2")]
    #[sqlx(rename = "CM2")]
    Cm2,
    #[serde(rename = "6EME")]
    #[sqlx(rename = "6EME")]
    Sixieme,
    #[serde(rename = "5EME")]
    #[sqlx(rename = "5EME")]
    Cinquieme,
    #[serde(rename = "4EME")]
    #[sqlx(rename = "4EME")]
    Quatrieme,
    #[serde(rename = "3EME")]
    #[sqlx(rename = "3EME")]
    Troisieme,
    #[serde(rename = "SECONDE")]
    #[sqlx(rename = "SECONDE")]
    Seconde,
    #[serde(rename = "PREMIERE")]
    #[sqlx(rename = "PREMIERE")]
    Premiere,
    #[serde(rename = "TERMINALE")]
    #[sqlx(rename = "TERMINALE")]
    Terminale,
}

impl EducationLevel {
    /// Every code, in curriculum order. Used by the mapping diagnostic
    /// endpoint and by tests that assert totality.
    pub const ALL: [EducationLevel; 16] = [
        EducationLevel::MaternellePetite,
        EducationLevel::MaternelleMoyenne,
        EducationLevel::MaternelleGrande,
        EducationLevel::Sil,
        EducationLevel::Cp,
        EducationLevel::Ce1,
        EducationLevel::Ce2,
        EducationLevel::Cm1,
        EducationLevel::Cm2,
        EducationLevel::Sixieme,
        EducationLevel::Cinquieme,
        EducationLevel::Quatrieme,
        EducationLevel::Troisieme,
        EducationLevel::Seconde,
        EducationLevel::Premiere,
        EducationLevel::Terminale,
    ];

    /// The stored code string.
    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::MaternellePetite => "MATERNELLE_PETITE",
            EducationLevel::MaternelleMoyenne => "MATERNELLE_MOYENNE",
            EducationLevel::MaternelleGrande => "MATERNELLE_GRANDE",
            EducationLevel::Sil => "SIL",
            EducationLevel::Cp => "CP",
            EducationLevel::Ce1 => "CE1",
            EducationLevel::Ce2 => "CE2",
            EducationLevel::Cm1 => "CM1",
            EducationLevel::Cm2 => "CM2",
            EducationLevel::Sixieme => "6EME",
            EducationLevel::Cinquieme => "5EME",
            EducationLevel::Quatrieme => "4EME",
            EducationLevel::Troisieme => "3EME",
            EducationLevel::Seconde => "SECONDE",
            EducationLevel::Premiere => "PREMIERE",
            EducationLevel::Terminale => "TERMINALE",
        }
    }

    /// Map a stored education level code to the label subjects carry.
    ///
    /// Total and exhaustive by construction: the match has no wildcard
    /// arm, so adding a code without a label is a compile error, never a
    /// runtime fallback.
    pub fn subject_level(self) -> SubjectLevel {
        match self {
            EducationLevel::MaternellePetite => SubjectLevel::Maternelle,
            EducationLevel::MaternelleMoyenne => SubjectLevel::Maternelle,
            EducationLevel::MaternelleGrande => SubjectLevel::Maternelle,
            EducationLevel::Sil => SubjectLevel::Sil,
            EducationLevel::Cp => SubjectLevel::Cp,
            EducationLevel::Ce1 => SubjectLevel::Ce1,
            EducationLevel::Ce2 => SubjectLevel::Ce2,
            EducationLevel::Cm1 => SubjectLevel::Cm1,
            EducationLevel::Cm2 => SubjectLevel::Cm2,
            EducationLevel::Sixieme => SubjectLevel::Sixieme,
            EducationLevel::Cinquieme => SubjectLevel::Cinquieme,
            EducationLevel::Quatrieme => SubjectLevel::Quatrieme,
            EducationLevel::Troisieme => SubjectLevel::Troisieme,
            EducationLevel::Seconde => SubjectLevel::Seconde,
            EducationLevel::Premiere => SubjectLevel::Premiere,
            EducationLevel::Terminale => SubjectLevel::Terminale,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for subject level parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubjectLevel(pub String);

impl std::error::Error for UnknownSubjectLevel {}

impl fmt::Display for UnknownSubjectLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a known subject level label", self.0)
    }
}

/// Display-oriented grade label attached to a subject.
///
/// Serialized and persisted as the display string itself (`"6ème"`,
/// `"Maternelle"`, ...); stored as TEXT rather than a Postgres enum so
/// the accented labels stay exactly as the interface renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectLevel {
    Maternelle,
    Sil,
    Cp,
    Ce1,
    Ce2,
    Cm1,
    Cm2,
    Sixieme,
    Cinquieme,
    Quatrieme,
    Troisieme,
    Seconde,
    Premiere,
    Terminale,
}

impl SubjectLevel {
    /// Every label, in curriculum order.
    pub const ALL: [SubjectLevel; 14] = [
        SubjectLevel::Maternelle,
        SubjectLevel::Sil,
        SubjectLevel::Cp,
        SubjectLevel::Ce1,
        SubjectLevel::Ce2,
        SubjectLevel::Cm1,
        SubjectLevel::Cm2,
        SubjectLevel::Sixieme,
        SubjectLevel::Cinquieme,
        SubjectLevel::Quatrieme,
        SubjectLevel::Troisieme,
        SubjectLevel::Seconde,
        SubjectLevel::Premiere,
        SubjectLevel::Terminale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubjectLevel::Maternelle => "Maternelle",
            SubjectLevel::Sil => "SIL",
            SubjectLevel::Cp => "CP",
            SubjectLevel::Ce1 => "CE1",
            SubjectLevel::Ce2 => "CE2",
            SubjectLevel::Cm1 => "CM1",
            SubjectLevel::Cm2 => "CM2",
            SubjectLevel::Sixieme => "6ème",
            SubjectLevel::Cinquieme => "5ème",
            SubjectLevel::Quatrieme => "4ème",
            SubjectLevel::Troisieme => "3ème",
            SubjectLevel::Seconde => "2nde",
            SubjectLevel::Premiere => "1ère",
            SubjectLevel::Terminale => "Tle",
        }
    }
}

impl fmt::Display for SubjectLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubjectLevel {
    type Err = UnknownSubjectLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownSubjectLevel(s.to_string()))
    }
}

impl Serialize for SubjectLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubjectLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// SQLx Type implementation: persisted as TEXT holding the display label.
impl Type<sqlx::Postgres> for SubjectLevel {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for SubjectLevel {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for SubjectLevel {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        // An unknown label in the database is a data defect, not a
        // normal input; fail the query instead of degrading.
        Ok(s.parse::<SubjectLevel>()?)
    }
}

impl PgHasArrayType for SubjectLevel {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

/// One row of the code-to-label table, as served by the mapping
/// diagnostic endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct MappingEntry {
    pub education_level: EducationLevel,
    #[schema(value_type = String, example = "6ème")]
    pub subject_level: SubjectLevel,
}
