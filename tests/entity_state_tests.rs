use userstore::{
    ActiveFlag, Email, Entity, EntityState, Ip, PasswordHash, PersonName, Port, Request, Salt,
    Session, StoreError, Timestamp, User, Value,
};

const SAMPLE_DIGEST: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

fn sample_user(active: bool) -> User {
    User::new(
        PersonName::new("José Valter").unwrap(),
        Email::new("uefs@example.net").unwrap(),
        PasswordHash::new(SAMPLE_DIGEST).unwrap(),
        Salt::new("c1pyo375pqt").unwrap(),
        ActiveFlag::new(active),
    )
}

fn sample_request(created: &str) -> Request {
    Request::new(
        Ip::new("10.0.0.7").unwrap(),
        Port::new(51423).unwrap(),
        Timestamp::new(created).unwrap(),
    )
}

#[test]
fn fresh_entities_are_transient() {
    assert_eq!(sample_user(true).state(), EntityState::Transient);
    assert_eq!(
        sample_request("2026-08-06 10:00:00").state(),
        EntityState::Transient
    );
}

#[test]
fn setters_keep_a_transient_entity_transient() {
    let mut user = sample_user(true);
    user.set_name(PersonName::new("Someone Else").unwrap());
    user.set_active(false);
    assert_eq!(user.state(), EntityState::Transient);
}

#[test]
fn unsaved_entities_have_no_id_representation() {
    let user = sample_user(true);
    assert!(user.id().is_none());
    assert_eq!(user.id_value(), Value::Null);
}

#[test]
fn flattening_collapses_attributes_to_scalars() {
    let user = sample_user(true);
    let record = user.to_record();

    assert_eq!(record.require_text("email").unwrap(), "uefs@example.net");
    assert_eq!(record.require_text("salt").unwrap(), "c1pyo375pqt");
    assert!(record.require_bool("active").unwrap());
    assert!(record.get("user_id").unwrap().is_null());
}

#[test]
fn session_rejects_an_inactive_user() {
    let request = sample_request("2026-08-06 10:00:00");
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();

    let err = Session::new(Some(sample_user(false)), request, expires).unwrap_err();
    assert!(matches!(err, StoreError::Invariant(_)));
}

#[test]
fn session_accepts_active_or_anonymous_users() {
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();

    assert!(Session::new(None, sample_request("2026-08-06 10:00:00"), expires).is_ok());
    assert!(
        Session::new(
            Some(sample_user(true)),
            sample_request("2026-08-06 10:00:00"),
            expires,
        )
        .is_ok()
    );
}

#[test]
fn attaching_an_inactive_user_later_is_also_rejected() {
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();
    let mut session =
        Session::new(None, sample_request("2026-08-06 10:00:00"), expires).unwrap();

    assert!(session.set_user(Some(sample_user(false))).is_err());
    assert!(session.user().is_none());
    assert!(session.set_user(Some(sample_user(true))).is_ok());
}

#[test]
fn replacement_request_must_be_strictly_newer() {
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();
    let mut session =
        Session::new(None, sample_request("2026-08-06 10:00:00"), expires).unwrap();

    // Same timestamp is not newer.
    let same = sample_request("2026-08-06 10:00:00");
    assert!(matches!(
        session.set_request(same).unwrap_err(),
        StoreError::Invariant(_)
    ));

    let older = sample_request("2026-08-06 09:59:59");
    assert!(session.set_request(older).is_err());

    let newer = sample_request("2026-08-06 10:00:01");
    assert!(session.set_request(newer).is_ok());
}

#[test]
fn renewal_must_extend_the_expiry() {
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();
    let mut session =
        Session::new(None, sample_request("2026-08-06 10:00:00"), expires).unwrap();

    assert!(session.renew(Timestamp::new("2026-08-06 11:00:00").unwrap()).is_err());
    assert!(session.renew(Timestamp::new("2026-08-06 10:00:00").unwrap()).is_err());
    assert!(session.renew(Timestamp::new("2026-08-06 12:00:00").unwrap()).is_ok());
}

#[test]
fn expiry_comparison_is_strict() {
    let expires = Timestamp::new("2026-08-06 11:00:00").unwrap();
    let session =
        Session::new(None, sample_request("2026-08-06 10:00:00"), expires).unwrap();

    assert!(!session.is_expired(&Timestamp::new("2026-08-06 11:00:00").unwrap()));
    assert!(session.is_expired(&Timestamp::new("2026-08-06 11:00:01").unwrap()));
}

#[test]
fn password_setter_accepts_raw_and_digest_input() {
    let mut user = sample_user(true);

    user.set_password(SAMPLE_DIGEST).unwrap();
    let digest_record = user.to_record();
    assert_eq!(digest_record.require_text("hash").unwrap(), SAMPLE_DIGEST);

    assert!(user.set_password("").is_err());
}
