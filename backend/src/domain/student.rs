//! Student records held by the hosted table service.
//!
//! Identifiers are assigned and ordered by the remote service; the types here
//! only guard the values the application itself reads from form input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors raised while building student values from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    /// Identifier was zero, negative, or not a number.
    #[error("student id must be a positive integer")]
    InvalidId,
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Age field was blank.
    #[error("age must not be empty")]
    EmptyAge,
    /// Age field did not hold a whole number.
    #[error("age must be a whole number")]
    InvalidAge,
}

/// Identifier assigned by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct StudentId(i64);

impl StudentId {
    /// Wrap a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use ledger::domain::StudentId;
    ///
    /// assert_eq!(StudentId::new(7).map(|id| id.get()), Ok(7));
    /// assert!(StudentId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, StudentValidationError> {
        if raw <= 0 {
            return Err(StudentValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for StudentId {
    type Error = StudentValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for i64 {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl FromStr for StudentId {
    type Err = StudentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| StudentValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Student name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    /// Validate and construct a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, StudentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a name already stored by the remote service, unchecked.
    ///
    /// Stored rows may predate the form rules; they must still list so they
    /// can be edited or deleted.
    pub fn from_remote(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StudentName {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentName> for String {
    fn from(value: StudentName) -> Self {
        value.0
    }
}

/// Age in whole years.
///
/// The application performs the numeric conversion only; range rules belong
/// to the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Age(i32);

impl Age {
    /// Wrap an already-numeric age.
    pub const fn new(years: i32) -> Self {
        Self(years)
    }

    /// Parse an age typed into a form field.
    ///
    /// # Examples
    /// ```
    /// use ledger::domain::{Age, StudentValidationError};
    ///
    /// assert_eq!(Age::parse(" 31 "), Ok(Age::new(31)));
    /// assert_eq!(Age::parse(""), Err(StudentValidationError::EmptyAge));
    /// assert_eq!(Age::parse("thirty"), Err(StudentValidationError::InvalidAge));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, StudentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StudentValidationError::EmptyAge);
        }
        trimmed
            .parse::<i32>()
            .map(Self)
            .map_err(|_| StudentValidationError::InvalidAge)
    }

    /// Raw number of years.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student row as returned by the remote `select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    name: StudentName,
    age: Option<Age>,
}

impl Student {
    /// Assemble a row from validated parts.
    pub fn new(id: StudentId, name: StudentName, age: Age) -> Self {
        Self {
            id,
            name,
            age: Some(age),
        }
    }

    /// Assemble a row as stored remotely, where `age` may be null.
    pub fn from_remote(id: StudentId, name: StudentName, age: Option<Age>) -> Self {
        Self { id, name, age }
    }

    /// Identifier assigned by the remote service.
    pub fn id(&self) -> StudentId {
        self.id
    }

    /// Student name.
    pub fn name(&self) -> &StudentName {
        &self.name
    }

    /// Student age; `None` when the stored row has none.
    pub fn age(&self) -> Option<Age> {
        self.age
    }
}

/// Insert payload: a student before the remote service assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    name: StudentName,
    age: Age,
}

impl NewStudent {
    /// Build an insert payload.
    pub fn new(name: StudentName, age: Age) -> Self {
        Self { name, age }
    }

    /// Validate the two raw form fields.
    ///
    /// Presence of both fields is checked before the age is converted, so a
    /// blank name is reported even when the age is also malformed.
    pub fn try_from_form(name: &str, age: &str) -> Result<Self, StudentValidationError> {
        let name = StudentName::new(name)?;
        let age = Age::parse(age)?;
        Ok(Self { name, age })
    }

    /// Name to insert.
    pub fn name(&self) -> &StudentName {
        &self.name
    }

    /// Age to insert.
    pub fn age(&self) -> Age {
        self.age
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", StudentValidationError::EmptyName)]
    #[case("   ", StudentValidationError::EmptyName)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: StudentValidationError) {
        assert_eq!(StudentName::new(raw), Err(expected));
    }

    #[rstest]
    fn names_are_trimmed() {
        let name = StudentName::new("  Ada  ").expect("valid name");
        assert_eq!(name.as_str(), "Ada");
    }

    #[rstest]
    #[case("30", Ok(Age::new(30)))]
    #[case(" -2 ", Ok(Age::new(-2)))]
    #[case("", Err(StudentValidationError::EmptyAge))]
    #[case("  ", Err(StudentValidationError::EmptyAge))]
    #[case("abc", Err(StudentValidationError::InvalidAge))]
    #[case("30.5", Err(StudentValidationError::InvalidAge))]
    #[case("99999999999", Err(StudentValidationError::InvalidAge))]
    fn ages_parse_whole_numbers_only(
        #[case] raw: &str,
        #[case] expected: Result<Age, StudentValidationError>,
    ) {
        assert_eq!(Age::parse(raw), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_ids_are_rejected(#[case] raw: i64) {
        assert_eq!(StudentId::new(raw), Err(StudentValidationError::InvalidId));
    }

    #[rstest]
    fn ids_parse_from_path_segments() {
        assert_eq!("12".parse::<StudentId>().map(StudentId::get), Ok(12));
        assert!("twelve".parse::<StudentId>().is_err());
    }

    #[rstest]
    fn form_validation_checks_name_before_age() {
        assert_eq!(
            NewStudent::try_from_form("", "not-a-number"),
            Err(StudentValidationError::EmptyName)
        );
    }

    #[rstest]
    fn rows_deserialise_from_remote_json() {
        let student: Student =
            serde_json::from_str(r#"{"id":3,"name":"Ada","age":30}"#).expect("row decodes");
        assert_eq!(student.id().get(), 3);
        assert_eq!(student.name().as_str(), "Ada");
        assert_eq!(student.age(), Some(Age::new(30)));
    }

    #[rstest]
    fn remote_names_skip_form_rules() {
        let name = StudentName::from_remote("  ");
        assert_eq!(name.as_str(), "  ");
        assert!(StudentName::new("  ").is_err());
    }
}
