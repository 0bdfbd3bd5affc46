//! End-to-end sessions against the shipped menu definition.
//!
//! Each test opens a registry in a temp dir, loads `menu.json` from the
//! crate root and drives sessions through the engine the way a handset
//! would.

use std::path::Path;
use std::sync::Arc;

use family_profiles::engine::{Conversation, Engine, Screen};
use family_profiles::flows::{FlowContext, check_national_id};
use family_profiles::menu::{ItemCatalog, Step};
use family_profiles::profiles::ProfileRegistry;
use family_profiles::session::Session;
use family_profiles::types::NationalId;

const ID: &str = "1234567890123";

fn menu_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("menu.json")
}

fn catalog() -> Arc<ItemCatalog> {
    Arc::new(ItemCatalog::load(&menu_path()).unwrap())
}

fn engine_at(path: &Path) -> (Engine, Arc<ProfileRegistry>) {
    engine_with(path, catalog())
}

fn engine_with(path: &Path, catalog: Arc<ItemCatalog>) -> (Engine, Arc<ProfileRegistry>) {
    let registry = Arc::new(ProfileRegistry::open(path).unwrap());
    let engine = Engine::new(catalog, Arc::clone(&registry), "en");
    (engine, registry)
}

/// Start at the family menu and run `inputs`, returning the last screen.
fn run(engine: &Engine, msisdn: &str, inputs: &[&str]) -> (Conversation, Screen) {
    let (mut conv, mut screen) = engine.start(msisdn, "main").unwrap();
    assert!(screen.text().starts_with("Welcome"));
    screen = engine.reply(&mut conv, "1").unwrap();
    for input in inputs {
        screen = engine.reply(&mut conv, input).unwrap();
    }
    (conv, screen)
}

fn create(engine: &Engine, msisdn: &str, id: &str, surname: &str, name: &str) -> Screen {
    // Last option of the family menu is always "New profile ...".
    let (mut conv, menu) = run(engine, msisdn, &[]);
    let new_profile = menu.text().lines().count() - 1;
    let mut screen = engine.reply(&mut conv, &new_profile.to_string()).unwrap();
    for input in [id, surname, name, "1990-05-17", "M"] {
        screen = engine.reply(&mut conv, input).unwrap();
    }
    screen
}

#[test]
fn create_profile_on_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");
    let (engine, registry) = engine_at(&path);

    let screen = create(&engine, "+27001", ID, "Smith", "Jan");
    assert_eq!(
        screen,
        Screen::End("The profile has been created. Goodbye.".to_string())
    );

    // Survives a restart.
    let reloaded = ProfileRegistry::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    let stored = reloaded.lookup(&NationalId::parse(ID).unwrap()).unwrap();
    assert_eq!(stored.owner_msisdns, vec!["+27001".to_string()]);
    assert_eq!(stored.surname, "Smith");
    assert_eq!(stored.given_name, "Jan");
    assert_eq!(stored.date_of_birth.to_string(), "1990-05-17");
    assert_eq!(stored.gender, "M");
    assert_eq!(registry.len(), 1);
}

#[test]
fn owner_reentering_id_is_offered_their_profile() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");

    // Family menu now lists the profile first, "New profile" second.
    let (mut conv, screen) = run(&engine, "+27001", &["2", ID]);
    assert_eq!(
        screen,
        Screen::Menu(
            "ID 1234567890123 already exists\n1. Enter another ID\n2. Go to profile\n3. Ok"
                .to_string()
        )
    );
    let screen = engine.reply(&mut conv, "2").unwrap();
    assert_eq!(
        screen,
        Screen::End("Profile editing is not available yet.".to_string())
    );
}

#[test]
fn other_caller_entering_id_is_offered_invite() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");

    let (mut conv, screen) = run(&engine, "+27999", &["1", ID]);
    assert_eq!(
        screen,
        Screen::Menu(
            "ID 1234567890123 already exists\n1. Enter another ID\n2. Add this to your profile\n3. Ok"
                .to_string()
        )
    );
    assert!(!screen.text().contains("Go to profile"));

    let screen = engine.reply(&mut conv, "3").unwrap();
    assert_eq!(screen, Screen::End("Goodbye".to_string()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn short_id_is_rejected_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");
    let (engine, registry) = engine_at(&path);

    let (conv, screen) = run(&engine, "+27001", &["1", "123"]);
    assert_eq!(
        screen,
        Screen::Prompt("123 is not 13 digits.\nID number?".to_string())
    );
    assert!(conv.session().value("profile_new_natid").is_none());
    assert!(registry.is_empty());
    assert!(!path.exists());
}

#[test]
fn impossible_date_is_rejected_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");
    let (engine, registry) = engine_at(&path);

    let (mut conv, screen) = run(&engine, "+27001", &["1", ID, "Smith", "Jan", "1990-13-40"]);
    assert_eq!(
        screen,
        Screen::Prompt(
            "1990-13-40 is not a valid date.\nDate of birth (YYYY-MM-DD)?".to_string()
        )
    );
    assert!(registry.is_empty());

    // Re-entry recovers.
    engine.reply(&mut conv, "1990-05-17").unwrap();
    let screen = engine.reply(&mut conv, "M").unwrap();
    assert!(screen.is_end());
    assert_eq!(registry.len(), 1);
}

#[test]
fn enter_another_id_loops_until_a_free_id() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");
    create(&engine, "+27001", "2222222222222", "Smith", "Piet");

    // Own profiles sort as "Smith, Jan ..." then "Smith, Piet ...".
    let (mut conv, screen) = run(&engine, "+27001", &["3", ID]);
    assert!(screen.text().starts_with("ID 1234567890123 already exists"));

    // Another taken id shows the conflict menu again.
    engine.reply(&mut conv, "1").unwrap();
    let screen = engine.reply(&mut conv, "2222222222222").unwrap();
    assert!(screen.text().starts_with("ID 2222222222222 already exists"));

    // A free id resumes the creation sequence at the surname prompt.
    engine.reply(&mut conv, "1").unwrap();
    let screen = engine.reply(&mut conv, "3333333333333").unwrap();
    assert_eq!(screen, Screen::Prompt("Surname?".to_string()));
    for input in ["Smith", "Sarie", "2010-10-10"] {
        engine.reply(&mut conv, input).unwrap();
    }
    let screen = engine.reply(&mut conv, "F").unwrap();
    assert!(screen.is_end());

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.list_owned_by("+27001").len(), 3);
}

#[test]
fn selecting_a_profile_shows_it() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");

    let (_conv, screen) = run(&engine, "+27001", &["1"]);
    assert_eq!(
        screen,
        Screen::End(
            "Smith, Jan\nID: 1234567890123\nBorn: 1990-05-17\nGender: M".to_string()
        )
    );
}

#[test]
fn family_menu_is_scoped_to_caller() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");
    create(&engine, "+27999", "2222222222222", "Botha", "Anna");

    let (_conv, screen) = run(&engine, "+27999", &[]);
    assert_eq!(
        screen,
        Screen::Menu(
            "My Family\n1. Botha, Anna (2222222222222)\n2. New profile ...".to_string()
        )
    );
}

#[test]
fn concurrent_sessions_racing_on_one_id() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_at(&dir.path().join("profiles.json"));

    // Both sessions pass the duplicate check before either commits.
    let mut a = run(&engine, "+27001", &["1", ID, "Smith", "Jan", "1990-05-17"]).0;
    let mut b = run(&engine, "+27999", &["1", ID, "Botha", "Anna", "1991-01-01"]).0;

    let first = engine.reply(&mut a, "M").unwrap();
    assert!(first.is_end());

    let second = engine.reply(&mut b, "F").unwrap();
    assert!(second.text().starts_with("ID 1234567890123 already exists"));
    assert!(second.text().contains("Add this to your profile"));

    assert_eq!(registry.len(), 1);
    let stored = registry.lookup(&NationalId::parse(ID).unwrap()).unwrap();
    assert_eq!(stored.surname, "Smith");
}

#[test]
fn lost_race_then_another_id_creates_profile() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_at(&dir.path().join("profiles.json"));

    let mut a = run(&engine, "+27001", &["1", ID, "Smith", "Jan", "1990-05-17"]).0;
    let mut b = run(&engine, "+27999", &["1", ID, "Botha", "Anna", "1991-01-01"]).0;
    assert!(engine.reply(&mut a, "M").unwrap().is_end());
    let conflict = engine.reply(&mut b, "F").unwrap();
    assert!(conflict.text().starts_with("ID 1234567890123 already exists"));

    assert_eq!(
        engine.reply(&mut b, "1").unwrap(),
        Screen::Prompt("ID number?".to_string())
    );
    assert_eq!(
        engine.reply(&mut b, "5555555555555").unwrap(),
        Screen::Prompt("Surname?".to_string())
    );
    for input in ["Botha", "Anna", "1991-01-01"] {
        engine.reply(&mut b, input).unwrap();
    }
    assert_eq!(
        engine.reply(&mut b, "F").unwrap(),
        Screen::End("The profile has been created. Goodbye.".to_string())
    );

    let created = registry
        .lookup(&NationalId::parse("5555555555555").unwrap())
        .unwrap();
    assert_eq!(created.owner_msisdns, vec!["+27999".to_string()]);
    assert_eq!(created.surname, "Botha");
    assert_eq!(registry.len(), 2);
}

#[test]
fn go_to_profile_leaves_the_creation_sequence() {
    // Same menu, but profile_edit asks something instead of ending.
    let mut menu: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(menu_path()).unwrap()).unwrap();
    let edit = menu["items"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|item| item["id"] == "profile_edit")
        .unwrap();
    *edit = serde_json::json!({
        "id": "profile_edit",
        "type": "prompt",
        "name": "profile_edit_field",
        "caption": {"en": "Which field?"}
    });
    let catalog = Arc::new(ItemCatalog::from_json(&menu.to_string()).unwrap());

    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_with(&dir.path().join("profiles.json"), catalog);
    create(&engine, "+27001", ID, "Smith", "Jan");

    let (mut conv, screen) = run(&engine, "+27001", &["2", ID]);
    assert!(screen.text().contains("2. Go to profile"));
    assert_eq!(
        engine.reply(&mut conv, "2").unwrap(),
        Screen::Prompt("Which field?".to_string())
    );

    let screen = engine.reply(&mut conv, "surname").unwrap();
    assert!(screen.is_end(), "creation sequence resumed: {screen:?}");
    assert_eq!(registry.len(), 1);
}

#[test]
fn restored_session_resolves_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, registry) = engine_at(&dir.path().join("profiles.json"));
    create(&engine, "+27001", ID, "Smith", "Jan");

    let (conv, _) = run(&engine, "+27999", &["1", ID]);
    let json = conv.session().snapshot_json().unwrap();
    let restored = Session::restore_json(conv.session().id(), &json).unwrap();
    assert_eq!(restored.msisdn().unwrap(), "+27999");

    let catalog = catalog();
    let step = check_national_id(FlowContext::new(&registry, &catalog), &restored).unwrap();
    let menu = match step {
        Step::Menu(menu) => menu,
        other => panic!("expected conflict menu, got {other:?}"),
    };
    assert!(menu.option_running("invite_natid").is_some());
    assert_eq!(
        menu.title.render("en", &restored),
        "ID 1234567890123 already exists"
    );
}
