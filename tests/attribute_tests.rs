use userstore::{
    ActiveFlag, Attribute, Email, Ip, PasswordHash, PersonName, Port, PrimaryKey, Salt, Timestamp,
    Value,
};

// A well-formed digest (bcrypt test vector) for tests that only need the
// format probe, not an actual key derivation.
const SAMPLE_DIGEST: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

#[test]
fn email_accepts_valid_addresses_and_reconstructs_them() {
    for raw in [
        "uefs@example.net",
        "first.last@example.org",
        "user+tag@sub.domain.example.co",
        "x_1%y@host-name.io",
    ] {
        let email = Email::new(raw).unwrap();
        assert_eq!(
            format!("{}@{}", email.username(), email.domain()),
            raw,
            "reconstruction failed for {}",
            raw
        );
        assert_eq!(email.representation(), Value::Text(raw.to_string()));
    }
}

#[test]
fn email_rejects_malformed_addresses() {
    for raw in [
        "",
        "plainaddress",
        "missing-domain@",
        "@missing-local.org",
        "no-tld@host",
        "two@@example.net",
        "spaces in@example.net",
        "trailing-dot@example.",
    ] {
        assert!(Email::new(raw).is_err(), "accepted invalid email {:?}", raw);
        assert!(Email::parse(raw).is_none());
    }
}

#[test]
fn person_name_accepts_unicode_and_rejects_junk() {
    let name = PersonName::new("José Valter").unwrap();
    assert_eq!(name.as_str(), "José Valter");

    assert!(PersonName::new("Anne-Marie O'Neil").is_ok());
    assert!(PersonName::new("").is_err());
    assert!(PersonName::new("   ").is_err());
    assert!(PersonName::new("1337 h4x0r").is_err());
    assert!(PersonName::new("x; DROP TABLE users").is_err());
    assert!(PersonName::new(&"a".repeat(81)).is_err());
}

#[test]
fn password_hash_verifies_the_original_secret_only() {
    let hash = PasswordHash::new("correct horse").unwrap();
    assert!(hash.verify("correct horse"));
    assert!(!hash.verify("wrong pony"));
}

#[test]
fn password_hash_is_idempotent_for_digests() {
    // A value that already looks like a digest is stored unchanged.
    let first = PasswordHash::new(SAMPLE_DIGEST).unwrap();
    assert_eq!(first.digest(), SAMPLE_DIGEST);

    let second = PasswordHash::new(first.digest()).unwrap();
    assert_eq!(second.digest(), SAMPLE_DIGEST);
}

#[test]
fn password_hash_rehash_replaces_the_digest() {
    let mut hash = PasswordHash::new(SAMPLE_DIGEST).unwrap();
    hash.rehash("fresh secret").unwrap();
    assert_ne!(hash.digest(), SAMPLE_DIGEST);
    assert!(PasswordHash::is_digest(hash.digest()));
    assert!(hash.verify("fresh secret"));
}

#[test]
fn password_hash_rejects_empty_input() {
    assert!(PasswordHash::new("").is_err());
    assert!(PasswordHash::parse("").is_none());
}

#[test]
fn salt_validates_shape_and_generates_valid_values() {
    let salt = Salt::new("c1pyo375pqt").unwrap();
    assert_eq!(salt.as_str(), "c1pyo375pqt");

    assert!(Salt::new("short").is_err());
    assert!(Salt::new("UPPERCASE123").is_err());
    assert!(Salt::new("has spaces 12").is_err());

    let generated = Salt::generate();
    assert!(Salt::new(generated.as_str()).is_ok());
}

#[test]
fn ip_parses_v4_and_v6() {
    assert_eq!(
        Ip::new("192.168.0.1").unwrap().representation(),
        Value::Text("192.168.0.1".to_string())
    );
    assert!(Ip::new("::1").is_ok());
    assert!(Ip::new("999.1.1.1").is_err());
    assert!(Ip::new("not-an-ip").is_err());
    assert!(Ip::parse("300.300.300.300").is_none());
}

#[test]
fn port_bounds_are_enforced() {
    assert_eq!(Port::new(443).unwrap().number(), 443);
    assert_eq!(Port::new(65535).unwrap().representation(), Value::Integer(65535));
    assert!(Port::new(0).is_err());
    assert!(Port::new(-1).is_err());
    assert!(Port::new(65536).is_err());
}

#[test]
fn primary_key_must_be_positive() {
    assert_eq!(PrimaryKey::new(7).unwrap().value(), 7);
    assert!(PrimaryKey::new(0).is_err());
    assert!(PrimaryKey::new(-5).is_err());

    assert_eq!(
        PrimaryKey::from_value(&Value::Text("42".into())).unwrap().value(),
        42
    );
    assert!(PrimaryKey::from_value(&Value::Text("abc".into())).is_err());
    assert!(PrimaryKey::from_value(&Value::Null).is_err());
}

#[test]
fn active_flag_round_trips_through_storage_values() {
    assert!(ActiveFlag::new(true).is_set());
    assert!(!ActiveFlag::from_value(&Value::Integer(0)).unwrap().is_set());
    assert!(ActiveFlag::from_value(&Value::Boolean(true)).unwrap().is_set());
    assert!(ActiveFlag::from_value(&Value::Text("yes".into())).is_err());
}

#[test]
fn timestamp_orders_strictly_and_round_trips() {
    let earlier = Timestamp::new("2026-08-06 12:00:00").unwrap();
    let later = Timestamp::new("2026-08-06 12:00:01").unwrap();

    assert!(later.is_after(&earlier));
    assert!(!earlier.is_after(&later));
    assert!(!earlier.is_after(&earlier));

    assert_eq!(
        earlier.representation(),
        Value::Text("2026-08-06 12:00:00".to_string())
    );
    assert_eq!(Timestamp::new(&earlier.to_string()).unwrap(), earlier);

    let now = Timestamp::now();
    assert_eq!(Timestamp::new(&now.to_string()).unwrap(), now);

    assert!(Timestamp::new("not a date").is_err());
    assert!(Timestamp::parse("2026-13-40 99:00:00").is_none());
}
