use tracing::{debug, info, warn};

use crate::{
    domain::{FieldPath, FieldValue, FormSchema, Record, RecordDocument, StableId},
    form::{
        CommandError, ErrorMap, FieldStore, FormCommand, InputError, StoreError,
    },
};

use super::{
    controller::{
        PendingSubmission, SubmissionController, SubmissionStatus, SubmitError, SubmitOutcome,
    },
    options::FormOptions,
    status::StatusLine,
    submitter::{SubmitFailure, SubmitResponse, Submitter},
    validation::{ValidationOutcome, validate_into, validate_with},
};

/// One form instance: its values, its errors and its submission lifecycle.
///
/// All reads are synchronous. The only suspension point is the collaborator
/// call inside [`FormEngine::submit`].
#[derive(Debug)]
pub struct FormEngine {
    schema: FormSchema,
    store: FieldStore,
    errors: ErrorMap,
    controller: SubmissionController,
    status: StatusLine,
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEngine {
    pub fn new() -> Self {
        Self::with_options(FormOptions::default())
    }

    pub fn with_options(options: FormOptions) -> Self {
        Self {
            schema: FormSchema::signup(),
            store: FieldStore::new(options.resolve_defaults()),
            errors: ErrorMap::new(),
            controller: SubmissionController::default(),
            status: StatusLine::new(),
        }
    }

    pub fn with_store(mut self, store: FieldStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_schema(mut self, schema: FormSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn record(&self) -> &Record {
        self.store.record()
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        self.controller.status()
    }

    pub fn status_message(&self) -> &str {
        self.status.message()
    }

    pub fn submit_label(&self) -> &'static str {
        self.status().submit_label()
    }

    pub fn succeeded_count(&self) -> u64 {
        self.controller.succeeded_count()
    }

    pub fn get(&self, path: FieldPath) -> Result<FieldValue, StoreError> {
        self.store.get(path)
    }

    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Result<(), CommandError> {
        self.ensure_editable()?;
        self.store.set(path, value)?;
        Ok(())
    }

    pub fn set_input(&mut self, path: FieldPath, raw: &str) -> Result<(), CommandError> {
        self.ensure_editable()?;
        self.store.set_input(path, raw)?;
        Ok(())
    }

    pub fn load_document(&mut self, document: RecordDocument) -> Result<(), CommandError> {
        self.ensure_editable()?;
        self.store.load_document(document).map_err(InputError::from)?;
        Ok(())
    }

    pub fn append_hobby(&mut self, name: impl Into<String>) -> Result<StableId, CommandError> {
        self.ensure_editable()?;
        Ok(self.store.append_hobby(name))
    }

    /// Removes a hobby row. Errors already reported for later rows move
    /// with their rows.
    pub fn remove_hobby(&mut self, id: StableId) -> Result<(), CommandError> {
        self.ensure_editable()?;
        let index = self.store.remove_hobby(id)?;
        self.errors.forget_hobby(index);
        Ok(())
    }

    pub fn can_remove_hobby(&self) -> bool {
        self.store.can_remove_hobby()
    }

    /// Replaces every hobby row. Row errors no longer refer to anything and
    /// are dropped.
    pub fn replace_hobbies<I, S>(&mut self, names: I) -> Result<(), CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_editable()?;
        self.store.replace_hobbies(names)?;
        self.errors.forget_hobby_rows();
        Ok(())
    }

    /// Back to the defaults. Refused while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), SubmitError> {
        if self.controller.is_busy() {
            return Err(SubmitError::Busy);
        }
        self.store.reset();
        self.errors = ErrorMap::new();
        self.controller.return_to_idle();
        self.status.ready();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), CommandError> {
        if self.controller.is_busy() {
            debug!("edit refused: a submission is in progress");
            return Err(CommandError::Busy);
        }
        Ok(())
    }

    pub fn is_visible(&self, path: FieldPath) -> bool {
        self.schema.is_visible(path, self.store.record())
    }

    pub fn is_required(&self, path: FieldPath) -> bool {
        self.schema.is_required(path, self.store.record())
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), CommandError> {
        match command {
            FormCommand::Input { path, raw } => self.set_input(path, &raw),
            FormCommand::Set { path, value } => self.set(path, value),
            FormCommand::AppendHobby { name } => self.append_hobby(name).map(|_| ()),
            FormCommand::RemoveHobby(id) => self.remove_hobby(id),
        }
    }

    /// Validates the current record without touching engine state.
    pub fn check(&self) -> ErrorMap {
        validate_with(&self.schema, self.store.record())
    }

    /// Validates the current record and replaces the error map with the
    /// result. Refused while a submission is in flight, since the map then
    /// belongs to the snapshot being submitted.
    pub fn validate(&mut self) -> Result<ValidationOutcome, SubmitError> {
        if self.controller.is_busy() {
            return Err(SubmitError::Busy);
        }
        Ok(self.run_validation())
    }

    fn run_validation(&mut self) -> ValidationOutcome {
        let outcome = validate_into(&self.schema, self.store.record(), &mut self.errors);
        match outcome {
            ValidationOutcome::Valid => self.status.validation_passed(),
            ValidationOutcome::Invalid { issues } => self.status.issues_remaining(issues),
        }
        outcome
    }

    /// Validates and, if valid, moves to `Submitting` and hands out the
    /// ticket for the call. Rejected with `Busy` while a submission is in
    /// progress; nothing changes in that case.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.controller.is_busy() {
            warn!("submit ignored: a submission is already in progress");
            return Err(SubmitError::Busy);
        }
        if let ValidationOutcome::Invalid { issues } = self.run_validation() {
            self.controller.return_to_idle();
            debug!(issues, "submit aborted by validation");
            return Err(SubmitError::Invalid { issues });
        }
        let pending = self.controller.begin(self.store.snapshot())?;
        self.status.submitting();
        info!(attempt = pending.attempt(), "submission started");
        Ok(pending)
    }

    /// Applies the collaborator's result to the submission in progress.
    pub fn settle(
        &mut self,
        pending: PendingSubmission,
        result: Result<SubmitResponse, SubmitFailure>,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.controller.settle(&pending, &result)?;
        match result {
            Ok(response) => {
                info!(attempt = pending.attempt(), response = %response.data, "submission succeeded");
                self.store.reset();
                self.errors = ErrorMap::new();
                self.status.submitted();
                self.controller.acknowledge();
                Ok(SubmitOutcome::Succeeded(response))
            }
            Err(failure) => {
                warn!(attempt = pending.attempt(), reason = %failure.message, "submission rejected");
                self.errors = ErrorMap::root(failure.message.clone());
                self.status.submission_failed(&failure.message);
                Ok(SubmitOutcome::Rejected(failure))
            }
        }
    }

    /// Validate → submit → settle. The collaborator is called at most once
    /// and only for a valid record.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmitOutcome, SubmitError>
    where
        S: Submitter + ?Sized,
    {
        let pending = self.begin_submit()?;
        let result = submitter.submit(pending.record()).await;
        self.settle(pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::StartDateDefault,
        domain::{Gender, RecordDocument},
        form::ListError,
    };

    fn engine() -> FormEngine {
        FormEngine::with_options(
            FormOptions::default().with_start_date(StartDateDefault::Fixed(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            )),
        )
    }

    fn fill_valid(engine: &mut FormEngine) {
        for (path, raw) in [
            (FieldPath::FirstName, "Ada"),
            (FieldPath::LastName, "Lovelace"),
            (FieldPath::Email, "ada@example.com"),
            (FieldPath::Age, "36"),
            (FieldPath::Gender, "female"),
            (FieldPath::AddressCity, "London"),
            (FieldPath::AddressState, "Greater London"),
            (FieldPath::HobbyName(0), "mathematics"),
        ] {
            engine.set_input(path, raw).unwrap();
        }
    }

    #[test]
    fn referral_is_visible_and_required_only_when_subscribed() {
        let mut engine = engine();
        assert!(!engine.is_visible(FieldPath::Referral));
        assert!(!engine.is_required(FieldPath::Referral));
        engine.set(FieldPath::Subscribe, FieldValue::Flag(true)).unwrap();
        assert!(engine.is_visible(FieldPath::Referral));
        assert!(engine.is_required(FieldPath::Referral));
        assert!(engine.is_required(FieldPath::HobbyName(0)));
        assert!(!engine.is_required(FieldPath::Subscribe));
    }

    #[test]
    fn check_does_not_write_errors() {
        let engine = engine();
        assert!(!engine.check().is_empty());
        assert!(engine.errors().is_empty());
    }

    #[test]
    fn validate_replaces_previous_errors() {
        let mut engine = engine();
        assert!(!engine.validate().unwrap().is_valid());
        assert!(engine.errors().contains("firstName"));
        fill_valid(&mut engine);
        assert_eq!(engine.validate(), Ok(ValidationOutcome::Valid));
        assert!(engine.errors().is_empty());
    }

    #[test]
    fn removing_a_row_moves_its_neighbours_errors() {
        let mut engine = engine();
        fill_valid(&mut engine);
        let middle = engine.append_hobby("").unwrap();
        engine.append_hobby("").unwrap();
        engine.validate().unwrap();
        assert!(engine.errors().contains("hobbies.1.name"));
        assert!(engine.errors().contains("hobbies.2.name"));
        engine.remove_hobby(middle).unwrap();
        assert!(engine.errors().contains("hobbies.1.name"));
        assert!(!engine.errors().contains("hobbies.2.name"));
        assert_eq!(engine.errors().len(), engine.check().len());
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut engine = engine();
        engine
            .dispatch(FormCommand::Input {
                path: FieldPath::Gender,
                raw: "male".into(),
            })
            .unwrap();
        assert_eq!(engine.record().gender, Some(Gender::Male));
        engine
            .dispatch(FormCommand::AppendHobby {
                name: "sailing".into(),
            })
            .unwrap();
        let only_first = engine.store().hobbies().ids()[0];
        engine
            .dispatch(FormCommand::RemoveHobby(only_first))
            .unwrap();
        let last = engine.store().hobbies().ids()[0];
        assert_eq!(
            engine.dispatch(FormCommand::RemoveHobby(last)),
            Err(CommandError::List(ListError::RemovalRejected(last)))
        );
    }

    #[test]
    fn replacing_hobbies_drops_row_errors_only() {
        let mut engine = engine();
        engine.append_hobby("").unwrap();
        engine.validate().unwrap();
        assert!(engine.errors().contains("hobbies.1.name"));
        engine.replace_hobbies(["chess"]).unwrap();
        assert!(!engine.errors().keys().any(|key| key.starts_with("hobbies.")));
        assert!(engine.errors().contains("firstName"));
        assert_eq!(
            engine.replace_hobbies(Vec::<String>::new()),
            Err(CommandError::List(ListError::EmptyList))
        );
    }

    #[test]
    fn reset_waits_for_the_submission_in_flight() {
        let mut engine = engine();
        fill_valid(&mut engine);
        let pending = engine.begin_submit().unwrap();
        assert_eq!(engine.reset(), Err(SubmitError::Busy));
        engine
            .settle(pending, Err(SubmitFailure::new("Network error")))
            .unwrap();
        engine.reset().unwrap();
        assert!(engine.store().is_pristine());
        assert!(engine.errors().is_empty());
        assert_eq!(engine.status(), &SubmissionStatus::Idle);
        assert_eq!(engine.status_message(), crate::app::READY_STATUS);
    }

    #[test]
    fn invalid_submit_from_failed_returns_to_idle() {
        let mut engine = engine();
        fill_valid(&mut engine);
        let pending = engine.begin_submit().unwrap();
        engine
            .settle(pending, Err(SubmitFailure::new("Network error")))
            .unwrap();
        assert!(matches!(engine.status(), SubmissionStatus::Failed(_)));
        engine.set_input(FieldPath::FirstName, "").unwrap();
        assert_eq!(
            engine.begin_submit().unwrap_err(),
            SubmitError::Invalid { issues: 1 }
        );
        assert_eq!(engine.status(), &SubmissionStatus::Idle);
        assert!(engine.errors().root_message().is_none());
    }

    #[test]
    fn edits_wait_for_the_submission_in_flight() {
        let mut engine = engine();
        fill_valid(&mut engine);
        let pending = engine.begin_submit().unwrap();
        let record = engine.record().clone();
        let first_row = engine.store().hobbies().ids()[0];

        assert_eq!(
            engine.set(FieldPath::FirstName, FieldValue::Text("Grace".into())),
            Err(CommandError::Busy)
        );
        assert_eq!(
            engine.set_input(FieldPath::Age, "40"),
            Err(CommandError::Busy)
        );
        assert_eq!(
            engine.load_document(RecordDocument::default()),
            Err(CommandError::Busy)
        );
        assert_eq!(engine.append_hobby("sailing"), Err(CommandError::Busy));
        assert_eq!(engine.remove_hobby(first_row), Err(CommandError::Busy));
        assert_eq!(
            engine.replace_hobbies(["chess"]),
            Err(CommandError::Busy)
        );
        assert_eq!(
            engine.dispatch(FormCommand::AppendHobby {
                name: "rowing".into(),
            }),
            Err(CommandError::Busy)
        );
        assert_eq!(engine.validate(), Err(SubmitError::Busy));

        assert_eq!(engine.record(), &record);
        assert!(engine.errors().is_empty());
        assert!(engine.status().is_submitting());
        assert_eq!(engine.status_message(), "Submitting…");

        engine
            .settle(pending, Ok(SubmitResponse::new(serde_json::json!({"ok": true}))))
            .unwrap();
        assert!(engine.store().is_pristine());
        engine.append_hobby("sailing").unwrap();
    }
}
