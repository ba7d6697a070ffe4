//! Ledger view: local list state kept in step with the remote `students`
//! table.
//!
//! Every action makes at most one mutating call through [`StudentStore`] and,
//! when it succeeds, re-runs [`LedgerView::refresh`] so the rows shown are
//! always the authoritative remote list. There are no optimistic updates and
//! no partial refreshes. A failed call is logged and kept as the view's
//! [`Error`]; the rows held before the call are kept. Adapters decide how
//! much of that error a user may see.
//!
//! The blocking prompt and confirm dialogs of a browser UI are modelled as an
//! explicit [`LedgerDialog`], so callers can drive the whole flow without
//! a blocking call.

use std::fmt;

use serde_json::json;
use tracing::{error, info};

use super::ports::{StudentStore, StudentStoreError};
use super::{Age, Error, NewStudent, Student, StudentId, StudentValidationError};

/// Shown when either add field is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all fields";
/// Shown when an age cannot be read as a number.
pub const INVALID_AGE_MESSAGE: &str = "Invalid age";

/// Which dialog, if any, is open over the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LedgerDialog {
    /// No dialog open.
    #[default]
    Closed,
    /// Age prompt for one record, prefilled with `draft`.
    EditAge {
        /// Record being edited.
        id: StudentId,
        /// Text currently in the prompt.
        draft: String,
    },
    /// Delete confirmation for one record.
    ConfirmDelete {
        /// Record to delete once confirmed.
        id: StudentId,
    },
}

/// Local validation failure: the action stopped before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerRejection {
    /// Name or age was blank.
    MissingFields,
    /// Age was not a whole number.
    InvalidAge,
}

impl LedgerRejection {
    /// User-visible message.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingFields => MISSING_FIELDS_MESSAGE,
            Self::InvalidAge => INVALID_AGE_MESSAGE,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidAge => "invalid_age",
        }
    }
}

impl From<LedgerRejection> for Error {
    fn from(rejection: LedgerRejection) -> Self {
        Error::invalid_request(rejection.message())
            .with_details(json!({ "code": rejection.code() }))
    }
}

impl fmt::Display for LedgerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<StudentValidationError> for LedgerRejection {
    fn from(value: StudentValidationError) -> Self {
        match value {
            StudentValidationError::EmptyName | StudentValidationError::EmptyAge => {
                Self::MissingFields
            }
            StudentValidationError::InvalidAge | StudentValidationError::InvalidId => {
                Self::InvalidAge
            }
        }
    }
}

/// How a single ledger action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// The remote call(s) succeeded and the list was re-fetched.
    Completed,
    /// The user dismissed the prompt or declined the confirmation.
    Cancelled,
    /// Local validation failed; nothing was sent.
    Rejected(LedgerRejection),
    /// A remote call failed; prior rows are kept.
    Failed(StudentStoreError),
}

impl LedgerOutcome {
    /// Collapse into a domain result for adapters without view state.
    ///
    /// # Examples
    /// ```
    /// use ledger::domain::{ErrorCode, LedgerOutcome, LedgerRejection};
    ///
    /// assert!(LedgerOutcome::Completed.into_result().is_ok());
    /// let err = LedgerOutcome::Rejected(LedgerRejection::InvalidAge)
    ///     .into_result()
    ///     .unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    /// ```
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Completed | Self::Cancelled => Ok(()),
            Self::Rejected(rejection) => Err(rejection.into()),
            Self::Failed(error) => Err(error.into()),
        }
    }
}

/// List, create, update-age and delete view over the remote collection.
///
/// # Examples
/// ```
/// use ledger::domain::LedgerView;
/// use ledger::domain::ports::FixtureStudentStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = FixtureStudentStore::new();
/// let mut view = LedgerView::new();
/// view.set_inputs("Ada", "30");
/// view.submit_add(&store).await;
/// assert_eq!(view.students().len(), 1);
/// assert_eq!(view.name_input(), "");
/// # });
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerView {
    students: Vec<Student>,
    name_input: String,
    age_input: String,
    error: Option<Error>,
    dialog: LedgerDialog,
}

impl LedgerView {
    /// Empty view with no rows loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows from the most recent successful list.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Text in the name field.
    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    /// Text in the age field.
    pub fn age_input(&self) -> &str {
        &self.age_input
    }

    /// Error from the last rejected or failed action, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Currently open dialog.
    pub fn dialog(&self) -> &LedgerDialog {
        &self.dialog
    }

    /// Replace the add-form fields.
    pub fn set_inputs(&mut self, name: impl Into<String>, age: impl Into<String>) {
        self.name_input = name.into();
        self.age_input = age.into();
    }

    fn find(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id() == id)
    }

    fn reject(&mut self, rejection: LedgerRejection) -> LedgerOutcome {
        self.error = Some(rejection.into());
        LedgerOutcome::Rejected(rejection)
    }

    fn fail(&mut self, action: &'static str, err: StudentStoreError) -> LedgerOutcome {
        error!(action, error = %err, "student store call failed");
        self.error = Some(err.clone().into());
        LedgerOutcome::Failed(err)
    }

    /// List: fetch all records and replace local rows wholesale.
    pub async fn refresh(&mut self, store: &dyn StudentStore) -> LedgerOutcome {
        match store.list().await {
            Ok(rows) => {
                self.students = rows;
                LedgerOutcome::Completed
            }
            Err(err) => self.fail("list", err),
        }
    }

    /// Add: validate both fields, insert, clear the fields, then List.
    pub async fn submit_add(&mut self, store: &dyn StudentStore) -> LedgerOutcome {
        self.error = None;
        let student = match NewStudent::try_from_form(&self.name_input, &self.age_input) {
            Ok(student) => student,
            Err(err) => return self.reject(err.into()),
        };
        if let Err(err) = store.add(&student).await {
            return self.fail("add", err);
        }
        info!(name = %student.name(), "student added");
        self.name_input.clear();
        self.age_input.clear();
        self.refresh(store).await
    }

    /// Open the age prompt for `id`, prefilled with its current age.
    ///
    /// Returns `false`, leaving the dialog closed, when `id` is not among
    /// the loaded rows.
    pub fn begin_edit(&mut self, id: StudentId) -> bool {
        let Some(current) = self.find(id).map(Student::age) else {
            return false;
        };
        self.dialog = LedgerDialog::EditAge {
            id,
            draft: current.map(|age| age.to_string()).unwrap_or_default(),
        };
        true
    }

    /// Answer the age prompt for `id`.
    ///
    /// `None` means the prompt was dismissed: the dialog closes and nothing
    /// is sent. Input that is not a whole number keeps the prompt open with
    /// the typed text and sends nothing.
    pub async fn submit_edit(
        &mut self,
        store: &dyn StudentStore,
        id: StudentId,
        input: Option<&str>,
    ) -> LedgerOutcome {
        self.error = None;
        let Some(raw) = input else {
            self.dialog = LedgerDialog::Closed;
            return LedgerOutcome::Cancelled;
        };
        let age = match Age::parse(raw) {
            Ok(age) => age,
            Err(_) => {
                self.dialog = LedgerDialog::EditAge {
                    id,
                    draft: raw.to_owned(),
                };
                return self.reject(LedgerRejection::InvalidAge);
            }
        };
        self.dialog = LedgerDialog::Closed;
        if let Err(err) = store.update_age(id, age).await {
            return self.fail("update_age", err);
        }
        info!(student_id = %id, age = %age, "student age updated");
        self.refresh(store).await
    }

    /// Open the delete confirmation for `id`.
    pub fn request_delete(&mut self, id: StudentId) {
        self.dialog = LedgerDialog::ConfirmDelete { id };
    }

    /// Answer the delete confirmation for `id`; only `confirmed` deletes.
    pub async fn confirm_delete(
        &mut self,
        store: &dyn StudentStore,
        id: StudentId,
        confirmed: bool,
    ) -> LedgerOutcome {
        self.error = None;
        self.dialog = LedgerDialog::Closed;
        if !confirmed {
            return LedgerOutcome::Cancelled;
        }
        if let Err(err) = store.delete(id).await {
            return self.fail("delete", err);
        }
        info!(student_id = %id, "student deleted");
        self.refresh(store).await
    }

    /// Close any open dialog without side effects.
    pub fn cancel_dialog(&mut self) {
        self.dialog = LedgerDialog::Closed;
    }
}
