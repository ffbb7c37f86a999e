use std::sync::Arc;

use userstore::{
    ActiveFlag, Email, Entity, EntityManager, EntityState, Ip, ManagerConfig, MemoryExecutor,
    PasswordHash, PersonName, Port, QueryExecutor, Request, Salt, Session, Timestamp, User,
};

const USERS_DDL: &str = "CREATE TABLE users (\
     user_id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY, \
     name TEXT NOT NULL, \
     email TEXT NOT NULL UNIQUE, \
     hash TEXT NOT NULL, \
     salt TEXT NOT NULL, \
     active BOOLEAN NOT NULL)";

const REQUESTS_DDL: &str = "CREATE TABLE requests (\
     request_id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY, \
     ip TEXT NOT NULL, \
     port INTEGER NOT NULL, \
     created_at TEXT NOT NULL)";

const SESSIONS_DDL: &str = "CREATE TABLE sessions (\
     session_id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY, \
     user_id INTEGER, \
     request_id INTEGER NOT NULL, \
     expires_at TEXT NOT NULL)";

const SAMPLE_DIGEST: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

async fn executor_with(tables: &[&str]) -> Arc<MemoryExecutor> {
    let executor = Arc::new(MemoryExecutor::new());
    for ddl in tables {
        executor.execute(ddl, &[]).await.unwrap();
    }
    executor
}

async fn full_manager() -> EntityManager {
    let executor = executor_with(&[USERS_DDL, REQUESTS_DDL, SESSIONS_DDL]).await;
    EntityManager::new(executor)
}

fn sample_user() -> User {
    User::new(
        PersonName::new("José Valter").unwrap(),
        Email::new("uefs@example.net").unwrap(),
        PasswordHash::new(SAMPLE_DIGEST).unwrap(),
        Salt::new("c1pyo375pqt").unwrap(),
        ActiveFlag::new(true),
    )
}

fn sample_request() -> Request {
    Request::new(
        Ip::new("10.0.0.7").unwrap(),
        Port::new(51423).unwrap(),
        Timestamp::new("2026-08-06 10:00:00").unwrap(),
    )
}

fn sample_expiry() -> Timestamp {
    Timestamp::new("2026-08-06 11:00:00").unwrap()
}

#[tokio::test]
async fn user_round_trips_through_storage() {
    let manager = full_manager().await;

    let mut user = sample_user();
    assert!(manager.save(&mut user).await);
    assert_eq!(user.state(), EntityState::Persistent);
    let id = user.id().expect("flush must populate the id").value();

    let reloaded: User = manager.find(id).await.expect("row must exist");
    assert_eq!(reloaded.state(), EntityState::Persistent);
    assert_eq!(reloaded.name().as_str(), "José Valter");
    assert_eq!(reloaded.email().address(), "uefs@example.net");
    assert_eq!(reloaded.salt().as_str(), "c1pyo375pqt");
    assert!(reloaded.is_active());
    assert_eq!(reloaded.to_record(), user.to_record());
}

#[tokio::test]
async fn user_is_found_by_email_as_alternate_key() {
    let manager = full_manager().await;

    let mut user = sample_user();
    assert!(manager.save(&mut user).await);

    let by_email: User = manager.find("uefs@example.net").await.unwrap();
    assert_eq!(by_email.id(), user.id());
}

#[tokio::test]
async fn find_returns_none_for_a_missing_key_without_failing() {
    let manager = full_manager().await;
    assert!(manager.find::<User>(4711i64).await.is_none());
    assert!(manager.find::<User>("ghost@example.net").await.is_none());
}

#[tokio::test]
async fn lifecycle_walks_transient_persistent_detached_persistent() {
    let manager = full_manager().await;

    let mut user = sample_user();
    assert_eq!(user.state(), EntityState::Transient);

    assert!(manager.save(&mut user).await);
    assert_eq!(user.state(), EntityState::Persistent);

    // A clean entity has nothing to synchronize.
    assert!(!manager.save(&mut user).await);
    assert_eq!(user.state(), EntityState::Persistent);

    user.set_email(Email::new("moved@example.org").unwrap());
    assert_eq!(user.state(), EntityState::Detached);

    assert!(manager.save(&mut user).await);
    assert_eq!(user.state(), EntityState::Persistent);

    let reloaded: User = manager.find("moved@example.org").await.unwrap();
    assert_eq!(reloaded.id(), user.id());
}

#[tokio::test]
async fn session_flush_persists_the_whole_graph() {
    let manager = full_manager().await;

    let mut session =
        Session::new(Some(sample_user()), sample_request(), sample_expiry()).unwrap();
    assert!(manager.save(&mut session).await);

    assert_eq!(session.state(), EntityState::Persistent);
    let nested_user = session.user().unwrap();
    assert_eq!(nested_user.state(), EntityState::Persistent);
    assert!(nested_user.id().is_some());
    assert_eq!(session.request().state(), EntityState::Persistent);
    assert!(session.request().id().is_some());

    let session_id = session.id().unwrap().value();
    let reloaded: Session = manager.find(session_id).await.unwrap();
    assert_eq!(reloaded.user().unwrap().email().address(), "uefs@example.net");
    assert_eq!(reloaded.request().ip().to_string(), "10.0.0.7");
    assert_eq!(reloaded.request().port().number(), 51423);
    assert_eq!(*reloaded.expires(), sample_expiry());
}

#[tokio::test]
async fn anonymous_sessions_hydrate_without_a_user() {
    let manager = full_manager().await;

    let mut session = Session::new(None, sample_request(), sample_expiry()).unwrap();
    assert!(manager.save(&mut session).await);

    let reloaded: Session = manager.find(session.id().unwrap().value()).await.unwrap();
    assert!(reloaded.user().is_none());
}

#[tokio::test]
async fn deleted_entities_become_removed_and_stay_removed() {
    let manager = full_manager().await;

    let mut user = sample_user();
    assert!(manager.save(&mut user).await);
    let id = user.id().unwrap().value();

    assert!(manager.remove(&mut user).await);
    assert_eq!(user.state(), EntityState::Removed);

    // The row is gone and the in-memory object is no longer writable.
    assert!(manager.find::<User>(id).await.is_none());
    assert!(!manager.remove(&mut user).await);
    assert!(!manager.save(&mut user).await);
    assert_eq!(user.state(), EntityState::Removed);
}

#[tokio::test]
async fn transient_entities_cannot_be_deleted() {
    let manager = full_manager().await;
    let mut user = sample_user();
    assert!(!manager.remove(&mut user).await);
    assert_eq!(user.state(), EntityState::Transient);
}

#[tokio::test]
async fn failed_graph_flush_rolls_back_every_write() {
    // No requests table: the nested request flush must fail after the nested
    // user flush already succeeded.
    let executor = executor_with(&[USERS_DDL, SESSIONS_DDL]).await;
    let manager = EntityManager::new(executor);

    let mut session =
        Session::new(Some(sample_user()), sample_request(), sample_expiry()).unwrap();
    assert!(!manager.save(&mut session).await);

    // The user insert was rolled back with the rest of the graph.
    assert!(manager.find::<User>("uefs@example.net").await.is_none());

    // The executor is out of the failed transaction; unrelated work proceeds.
    let mut user = sample_user();
    assert!(manager.save(&mut user).await);
}

#[tokio::test]
async fn legacy_mode_swallows_nested_flush_failures() {
    // No users table: the nested user flush fails, the session write still
    // goes through with an empty user reference.
    let executor = executor_with(&[REQUESTS_DDL, SESSIONS_DDL]).await;
    let manager =
        EntityManager::with_config(executor, ManagerConfig::new().transactional_flush(false));

    let mut session =
        Session::new(Some(sample_user()), sample_request(), sample_expiry()).unwrap();
    assert!(manager.save(&mut session).await);
    assert_eq!(session.state(), EntityState::Persistent);

    // The child was left behind, unsaved.
    assert_eq!(session.user().unwrap().state(), EntityState::Transient);

    let reloaded: Session = manager.find(session.id().unwrap().value()).await.unwrap();
    assert!(reloaded.user().is_none());
}

#[tokio::test]
async fn replacing_a_request_updates_the_stored_session() {
    let manager = full_manager().await;

    let mut session = Session::new(None, sample_request(), sample_expiry()).unwrap();
    assert!(manager.save(&mut session).await);
    let first_request_id = session.request().id().unwrap();

    let newer = Request::new(
        Ip::new("10.0.0.8").unwrap(),
        Port::new(51424).unwrap(),
        Timestamp::new("2026-08-06 10:05:00").unwrap(),
    );
    session.set_request(newer).unwrap();
    assert_eq!(session.state(), EntityState::Detached);

    assert!(manager.save(&mut session).await);

    let reloaded: Session = manager.find(session.id().unwrap().value()).await.unwrap();
    assert_ne!(reloaded.request().id().unwrap(), first_request_id);
    assert_eq!(reloaded.request().ip().to_string(), "10.0.0.8");
}
