//! Session store - the logged-in user and its persisted snapshot
//!
//! Every mutating operation is two-phase:
//! 1. [`Session::prepare`] checks preconditions and resolves the [`ApiCall`]
//!    (username / device id come from the loaded user). No I/O.
//! 2. [`Session::commit`] receives the [`ApiReply`] and applies the local
//!    patch only on success, then rewrites the whole snapshot.
//!
//! Between the two phases the request is in flight and the user may change
//! underneath it (another reply, a logout). `commit` re-checks against the
//! current state, so concurrent calls resolve last-reply-wins.

use serde_json::Value;

use crate::error::SessionError;
use crate::models::{Baby, Responses, ScanStatus, SignupForm, User};
use crate::network::api::{ApiCall, ApiReply};
use crate::storage::SessionStorage;

/// A single field update, replacing free-form dotted paths
#[derive(Clone, Debug, PartialEq)]
pub enum UserUpdate {
    Name(String),
    Email(String),
    PhoneNumber(String),
    DeviceId(String),
    ScanningBaby(String),
    BabyAge { baby: String, age: String },
}

impl UserUpdate {
    /// `field_name` as the server expects it
    pub fn field_name(&self) -> String {
        match self {
            UserUpdate::Name(_) => "name".into(),
            UserUpdate::Email(_) => "email".into(),
            UserUpdate::PhoneNumber(_) => "phone_number".into(),
            UserUpdate::DeviceId(_) => "device_id".into(),
            UserUpdate::ScanningBaby(_) => "scanning_baby".into(),
            UserUpdate::BabyAge { baby, .. } => format!("baby.{}.age", baby),
        }
    }

    pub fn new_value(&self) -> Value {
        match self {
            UserUpdate::Name(v)
            | UserUpdate::Email(v)
            | UserUpdate::PhoneNumber(v)
            | UserUpdate::DeviceId(v)
            | UserUpdate::ScanningBaby(v) => Value::String(v.clone()),
            UserUpdate::BabyAge { age, .. } => Value::String(age.clone()),
        }
    }

    /// Apply to a user. Fails only when the addressed baby does not exist.
    fn apply(&self, user: &mut User) -> bool {
        match self {
            UserUpdate::Name(v) => user.name = v.clone(),
            UserUpdate::Email(v) => user.email = v.clone(),
            UserUpdate::PhoneNumber(v) => user.phone_number = v.clone(),
            UserUpdate::DeviceId(v) => user.device_id = v.clone(),
            UserUpdate::ScanningBaby(v) => user.scanning_baby = v.clone(),
            UserUpdate::BabyAge { baby, age } => match user.baby.get_mut(baby) {
                Some(record) => record.age = age.clone(),
                None => return false,
            },
        }
        true
    }
}

/// Every operation the session store offers
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Login { username: String, password: String },
    Signup(SignupForm),
    UpdateField(UserUpdate),
    AddBaby { name: String, age: String },
    AddResponses { baby: String, responses: Responses },
    RemoveResponses { baby: String, names: Vec<String> },
    StartScan,
    StopScan,
    ScanStatus,
    SendResponse { url: String },
}

/// What a committed action means to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Success,
    ScanStatus(ScanStatus),
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed)
    }
}

/// Holds the current user and mirrors it to [`SessionStorage`]
#[derive(Debug)]
pub struct Session {
    user: Option<User>,
    storage: SessionStorage,
}

impl Session {
    /// Empty session backed by `storage`; nothing is read
    pub fn new(storage: SessionStorage) -> Self {
        Session {
            user: None,
            storage,
        }
    }

    /// Load the persisted snapshot, if any. An unreadable snapshot is
    /// logged and treated as logged out.
    pub fn rehydrate(storage: SessionStorage) -> Self {
        let user = match storage.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, path = %storage.path().display(), "Failed to load user data");
                None
            }
        };
        if let Some(user) = &user {
            tracing::info!(username = %user.username, "Session restored");
        }
        Session { user, storage }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    /// Drop the user and erase the snapshot
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "Logged out");
        }
        if let Err(e) = self.storage.clear() {
            tracing::error!(error = %e, "Failed to erase stored user data");
        }
    }

    /// Phase one: resolve the request for `action`, or refuse it without I/O
    pub fn prepare(&self, action: &Action) -> Result<ApiCall, SessionError> {
        let call = match action {
            Action::Login { username, password } => ApiCall::Login {
                username: username.clone(),
                password: password.clone(),
            },
            Action::Signup(form) => ApiCall::Signup(form.clone()),
            Action::UpdateField(update) => ApiCall::UpdateUserField {
                username: self.username()?,
                field_name: update.field_name(),
                new_value: update.new_value(),
            },
            Action::AddBaby { name, age } => ApiCall::AddBaby {
                username: self.username()?,
                baby_name: name.clone(),
                baby_age: age.clone(),
            },
            Action::AddResponses { baby, responses } => ApiCall::AddBabyResponses {
                username: self.username()?,
                baby_name: baby.clone(),
                responses: responses.clone(),
            },
            Action::RemoveResponses { baby, names } => ApiCall::RemoveBabyResponses {
                username: self.username()?,
                baby_name: baby.clone(),
                response_names: names.clone(),
            },
            Action::StartScan => ApiCall::StartScan {
                device_id: self.device_id()?,
            },
            Action::StopScan => ApiCall::StopScan {
                device_id: self.device_id()?,
            },
            Action::ScanStatus => ApiCall::GetScanStatus {
                device_id: self.device_id()?,
            },
            Action::SendResponse { url } => ApiCall::SendResponse {
                device_id: self.device_id()?,
                youtube_url: url.clone(),
            },
        };
        Ok(call)
    }

    fn username(&self) -> Result<String, SessionError> {
        self.user
            .as_ref()
            .map(|user| user.username.clone())
            .ok_or(SessionError::NotLoggedIn)
    }

    fn device_id(&self) -> Result<String, SessionError> {
        let user = self.user.as_ref().ok_or(SessionError::NotLoggedIn)?;
        if !user.has_device() {
            return Err(SessionError::NoDevice);
        }
        Ok(user.device_id.clone())
    }

    /// Phase two: apply the local patch for `action` if `reply` succeeded
    pub fn commit(&mut self, action: &Action, reply: ApiReply) -> Outcome {
        let payload = match reply {
            ApiReply::Success { payload } => payload,
            ApiReply::Failure => return Outcome::Failed,
        };

        match action {
            Action::Login { username, .. } => {
                let user = payload.and_then(|data| match serde_json::from_value::<User>(data) {
                    Ok(user) => Some(user),
                    Err(e) => {
                        tracing::warn!(error = %e, "Login payload is not a user record");
                        None
                    }
                });
                match user {
                    Some(user) => {
                        tracing::info!(username = %username, "Logged in");
                        self.user = Some(user);
                        self.persist();
                        Outcome::Success
                    }
                    None => Outcome::Failed,
                }
            }
            Action::Signup(_)
            | Action::StartScan
            | Action::StopScan
            | Action::SendResponse { .. } => Outcome::Success,
            Action::ScanStatus => match payload {
                Some(data) => Outcome::ScanStatus(ScanStatus::from_payload(data)),
                None => Outcome::Failed,
            },
            Action::UpdateField(update) => self.mutate(|user| update.apply(user)),
            Action::AddBaby { name, age } => self.mutate(|user| {
                user.baby.insert(name.clone(), Baby::new(age.clone()));
                user.scanning_baby = name.clone();
                true
            }),
            Action::AddResponses { baby, responses } => self.mutate(|user| {
                match user.baby.get_mut(baby) {
                    Some(record) => {
                        record
                            .responses
                            .extend(responses.iter().map(|(k, v)| (k.clone(), v.clone())));
                        true
                    }
                    None => false,
                }
            }),
            Action::RemoveResponses { baby, names } => self.mutate(|user| {
                match user.baby.get_mut(baby) {
                    Some(record) => {
                        for name in names {
                            record.responses.remove(name);
                        }
                        true
                    }
                    None => false,
                }
            }),
        }
    }

    /// Apply `patch` to a copy of the user; keep and persist it only if the
    /// patch reports success
    fn mutate(&mut self, patch: impl FnOnce(&mut User) -> bool) -> Outcome {
        let Some(current) = self.user.as_ref() else {
            return Outcome::Failed;
        };
        let mut updated = current.clone();
        if !patch(&mut updated) {
            return Outcome::Failed;
        }
        self.user = Some(updated);
        self.persist();
        Outcome::Success
    }

    fn persist(&self) {
        if let Some(user) = &self.user {
            if let Err(e) = self.storage.save(user) {
                tracing::error!(error = %e, "Failed to persist user data");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn anna() -> User {
        User {
            username: "anna".into(),
            name: "Anna".into(),
            email: "anna@example.com".into(),
            phone_number: "555-0100".into(),
            device_id: "pi-42".into(),
            ..Default::default()
        }
    }

    fn logged_in() -> (TempDir, Session) {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        storage.save(&anna()).unwrap();
        (dir, Session::rehydrate(storage))
    }

    fn snapshot(session: &Session) -> Option<String> {
        fs::read_to_string(session.storage().path()).ok()
    }

    fn persisted(session: &Session) -> Option<User> {
        session.storage().load().unwrap()
    }

    fn run(session: &mut Session, action: Action) -> Outcome {
        session.prepare(&action).unwrap();
        session.commit(&action, ApiReply::ok())
    }

    #[test]
    fn test_rehydrate_empty_and_corrupt() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        assert!(!Session::rehydrate(storage.clone()).is_logged_in());

        fs::write(storage.path(), "garbage").unwrap();
        assert!(!Session::rehydrate(storage).is_logged_in());
    }

    #[test]
    fn test_login_success_replaces_and_persists() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(SessionStorage::new(dir.path()));
        let action = Action::Login {
            username: "anna".into(),
            password: "pw".into(),
        };
        assert_eq!(
            session.prepare(&action).unwrap(),
            ApiCall::Login {
                username: "anna".into(),
                password: "pw".into()
            }
        );

        let reply = ApiReply::with_payload(serde_json::to_value(anna()).unwrap());
        assert_eq!(session.commit(&action, reply), Outcome::Success);
        assert_eq!(session.user(), Some(&anna()));
        assert_eq!(persisted(&session), Some(anna()));
    }

    #[test]
    fn test_login_failure_leaves_prior_state() {
        let (_dir, mut session) = logged_in();
        let before = snapshot(&session);
        let action = Action::Login {
            username: "bob".into(),
            password: "wrong".into(),
        };

        assert_eq!(session.commit(&action, ApiReply::Failure), Outcome::Failed);
        // success without user_data is still a failure
        assert_eq!(session.commit(&action, ApiReply::ok()), Outcome::Failed);
        assert_eq!(session.user(), Some(&anna()));
        assert_eq!(snapshot(&session), before);
    }

    #[test]
    fn test_logout_clears_everything() {
        let (_dir, mut session) = logged_in();
        session.logout();
        assert!(session.user().is_none());
        assert!(!session.storage().path().exists());

        // and again from an already empty state
        session.logout();
        assert!(session.user().is_none());
        assert!(!session.storage().path().exists());
    }

    #[test]
    fn test_user_scoped_actions_need_a_user() {
        let dir = tempdir().unwrap();
        let session = Session::new(SessionStorage::new(dir.path()));
        for action in [
            Action::UpdateField(UserUpdate::Name("x".into())),
            Action::AddBaby {
                name: "Tommy".into(),
                age: "6 months".into(),
            },
            Action::StartScan,
            Action::ScanStatus,
        ] {
            assert_eq!(session.prepare(&action), Err(SessionError::NotLoggedIn));
        }
        assert!(session
            .prepare(&Action::Signup(SignupForm::default()))
            .is_ok());
    }

    #[test]
    fn test_device_actions_need_a_device() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        storage
            .save(&User {
                device_id: String::new(),
                ..anna()
            })
            .unwrap();
        let session = Session::rehydrate(storage);
        assert_eq!(session.prepare(&Action::StopScan), Err(SessionError::NoDevice));
        assert_eq!(
            session.prepare(&Action::SendResponse { url: "u".into() }),
            Err(SessionError::NoDevice)
        );
    }

    #[test]
    fn test_device_calls_keyed_by_device_id() {
        let (_dir, session) = logged_in();
        assert_eq!(
            session.prepare(&Action::ScanStatus).unwrap(),
            ApiCall::GetScanStatus {
                device_id: "pi-42".into()
            }
        );
        assert_eq!(
            session
                .prepare(&Action::SendResponse {
                    url: "https://youtu.be/x".into()
                })
                .unwrap(),
            ApiCall::SendResponse {
                device_id: "pi-42".into(),
                youtube_url: "https://youtu.be/x".into()
            }
        );
    }

    #[test]
    fn test_update_field_success_persists() {
        let (_dir, mut session) = logged_in();
        let outcome = run(
            &mut session,
            Action::UpdateField(UserUpdate::Email("new@example.com".into())),
        );
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(session.user().unwrap().email, "new@example.com");
        assert_eq!(persisted(&session).as_ref(), session.user());
    }

    #[test]
    fn test_update_field_failure_is_byte_identical() {
        let (_dir, mut session) = logged_in();
        let before = snapshot(&session);
        let action = Action::UpdateField(UserUpdate::Name("Zed".into()));
        assert_eq!(session.commit(&action, ApiReply::Failure), Outcome::Failed);
        assert_eq!(session.user().unwrap().name, "Anna");
        assert_eq!(snapshot(&session), before);
    }

    #[test]
    fn test_baby_age_update() {
        let (_dir, mut session) = logged_in();
        run(
            &mut session,
            Action::AddBaby {
                name: "Tommy".into(),
                age: "6 months".into(),
            },
        );

        let update = UserUpdate::BabyAge {
            baby: "Tommy".into(),
            age: "7 months".into(),
        };
        assert_eq!(update.field_name(), "baby.Tommy.age");
        assert_eq!(update.new_value(), json!("7 months"));

        assert_eq!(run(&mut session, Action::UpdateField(update)), Outcome::Success);
        assert_eq!(session.user().unwrap().baby["Tommy"].age, "7 months");
        assert_eq!(persisted(&session).as_ref(), session.user());
    }

    #[test]
    fn test_baby_age_update_on_unknown_baby_fails_locally() {
        let (_dir, mut session) = logged_in();
        let before = snapshot(&session);
        let action = Action::UpdateField(UserUpdate::BabyAge {
            baby: "Ghost".into(),
            age: "1 year".into(),
        });
        assert_eq!(run(&mut session, action), Outcome::Failed);
        assert!(session.user().unwrap().baby.is_empty());
        assert_eq!(snapshot(&session), before);
    }

    #[test]
    fn test_add_baby_selects_it() {
        let (_dir, mut session) = logged_in();
        let outcome = run(
            &mut session,
            Action::AddBaby {
                name: "Tommy".into(),
                age: "6 months".into(),
            },
        );
        assert_eq!(outcome, Outcome::Success);

        let user = session.user().unwrap();
        assert_eq!(user.scanning_baby, "Tommy");
        let tommy = &user.baby["Tommy"];
        assert_eq!(tommy.age, "6 months");
        assert!(tommy.responses.is_empty());
        assert!(tommy.rides.is_empty());
        assert_eq!(persisted(&session).as_ref(), session.user());
    }

    #[test]
    fn test_add_then_remove_response() {
        let (_dir, mut session) = logged_in();
        run(
            &mut session,
            Action::AddBaby {
                name: "Tommy".into(),
                age: "6 months".into(),
            },
        );
        run(
            &mut session,
            Action::AddResponses {
                baby: "Tommy".into(),
                responses: Responses::from([("Shush".into(), "https://youtu.be/s".into())]),
            },
        );

        let add = Action::AddResponses {
            baby: "Tommy".into(),
            responses: Responses::from([("Lullaby".into(), "https://youtu.be/x".into())]),
        };
        assert_eq!(run(&mut session, add), Outcome::Success);
        assert_eq!(session.user().unwrap().baby["Tommy"].responses.len(), 2);

        let remove = Action::RemoveResponses {
            baby: "Tommy".into(),
            names: vec!["Lullaby".into()],
        };
        assert_eq!(run(&mut session, remove), Outcome::Success);

        let responses = &session.user().unwrap().baby["Tommy"].responses;
        assert!(!responses.contains_key("Lullaby"));
        assert_eq!(responses.get("Shush").unwrap(), "https://youtu.be/s");
        assert_eq!(persisted(&session).as_ref(), session.user());
    }

    #[test]
    fn test_add_response_overwrites_same_name() {
        let (_dir, mut session) = logged_in();
        run(
            &mut session,
            Action::AddBaby {
                name: "Tommy".into(),
                age: "6 months".into(),
            },
        );
        for url in ["https://youtu.be/old", "https://youtu.be/new"] {
            run(
                &mut session,
                Action::AddResponses {
                    baby: "Tommy".into(),
                    responses: Responses::from([("Lullaby".into(), url.into())]),
                },
            );
        }
        let responses = &session.user().unwrap().baby["Tommy"].responses;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses["Lullaby"], "https://youtu.be/new");
    }

    #[test]
    fn test_responses_for_unknown_baby_fail() {
        let (_dir, mut session) = logged_in();
        let action = Action::AddResponses {
            baby: "Ghost".into(),
            responses: Responses::from([("Lullaby".into(), "https://youtu.be/x".into())]),
        };
        assert_eq!(session.commit(&action, ApiReply::ok()), Outcome::Failed);
    }

    #[test]
    fn test_reply_after_logout_is_dropped() {
        let (_dir, mut session) = logged_in();
        let action = Action::UpdateField(UserUpdate::Name("Late".into()));
        session.prepare(&action).unwrap();
        session.logout();

        assert_eq!(session.commit(&action, ApiReply::ok()), Outcome::Failed);
        assert!(!session.storage().path().exists());
    }

    #[test]
    fn test_scan_status_outcome() {
        let (_dir, mut session) = logged_in();
        let outcome = session.commit(
            &Action::ScanStatus,
            ApiReply::with_payload(json!({ "status": "idle" })),
        );
        match outcome {
            Outcome::ScanStatus(status) => {
                assert_eq!(status.status, crate::models::DeviceStatus::Idle)
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(
            session.commit(&Action::ScanStatus, ApiReply::ok()),
            Outcome::Failed
        );
    }

    #[test]
    fn test_pass_through_actions_leave_snapshot_alone() {
        let (_dir, mut session) = logged_in();
        let before = snapshot(&session);
        assert_eq!(session.commit(&Action::StartScan, ApiReply::ok()), Outcome::Success);
        assert_eq!(
            session.commit(&Action::SendResponse { url: "u".into() }, ApiReply::ok()),
            Outcome::Success
        );
        assert_eq!(snapshot(&session), before);
    }
}
