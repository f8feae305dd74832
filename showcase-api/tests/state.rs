use std::fs;
use std::path::Path;

use axum::http::Method;
use showcase_api::AppState;
use showcase_core::{FormData, Location};
use showcase_store::Config;

fn write_config(dir: &Path, storage_dir: &Path) -> Config {
    write_config_with_ttl(dir, storage_dir, 3600)
}

fn write_config_with_ttl(dir: &Path, storage_dir: &Path, ttl_seconds: u64) -> Config {
    fs::write(
        dir.join("default.toml"),
        format!(
            r#"
                [server]
                port = 0

                [backend]
                mode = "memory"

                [store]
                base_url = "http://127.0.0.1:1"

                [auth]
                api_key = ""
                token_ttl_seconds = {}

                [storage]
                dir = "{}"
            "#,
            ttl_seconds,
            storage_dir.display()
        ),
    )
    .unwrap();
    Config::load_from(dir).expect("config should load")
}

#[tokio::test]
async fn test_sessions_are_written_per_frontend() {
    let config_dir = tempfile::tempdir().unwrap();
    let storage_dir = tempfile::tempdir().unwrap();
    let config = write_config(config_dir.path(), storage_dir.path());

    let state = AppState::from_config(&config).expect("state should build");
    let movies = state.frontend("movies").unwrap();
    let form: FormData = [
        ("email", "peter@abv.bg"),
        ("password", "123456"),
        ("repeatPassword", "123456"),
    ]
    .into_iter()
    .collect();
    movies.dispatch(Method::POST, Location::parse("register"), form).await;

    let saved = fs::read_to_string(storage_dir.path().join("movies.json")).unwrap();
    assert!(saved.contains("peter@abv.bg"));
    assert!(!storage_dir.path().join("destinations.json").exists());

    // Restarting with the same storage directory keeps the user signed in
    let restarted = AppState::from_config(&config).expect("state should build");
    let session = restarted
        .frontend("movies")
        .unwrap()
        .services()
        .sessions
        .load()
        .unwrap()
        .expect("session should survive a restart");
    assert_eq!(session.email, "peter@abv.bg");

    let other = restarted.frontend("destinations").unwrap().services().sessions.load().unwrap();
    assert!(other.is_none());
}

#[test]
fn test_all_frontends_are_mounted() {
    let config_dir = tempfile::tempdir().unwrap();
    let storage_dir = tempfile::tempdir().unwrap();
    let config = write_config(config_dir.path(), storage_dir.path());

    let state = AppState::from_config(&config).unwrap();
    for name in ["destinations", "movies", "shoeshelf"] {
        assert_eq!(state.frontend(name).unwrap().name(), name);
    }
    assert!(state.frontend("bookstore").is_none());
}

#[test]
fn test_out_of_range_token_ttl_fails_startup() {
    let config_dir = tempfile::tempdir().unwrap();
    let storage_dir = tempfile::tempdir().unwrap();
    let config = write_config_with_ttl(config_dir.path(), storage_dir.path(), i64::MAX as u64);

    let err = AppState::from_config(&config).err().expect("startup should fail");
    assert!(format!("{:#}", err).contains("token_ttl_seconds"), "{:#}", err);
}
