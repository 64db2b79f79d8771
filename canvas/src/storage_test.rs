use super::*;
use crate::templates;

fn identities() -> IdentityStore<MemoryStore> {
    IdentityStore::new(MemoryStore::new())
}

#[test]
fn anonymous_name_keeps_last_seven_digits() {
    assert_eq!(anonymous_name(1_700_000_123_456), "Anon-0123456");
    assert_eq!(anonymous_name(42), "Anon-0000042");
}

#[test]
fn first_load_generates_and_stores_a_name() {
    let mut ids = identities();

    let identity = ids.load("abc", 1_234_567_890).expect("load");

    assert_eq!(identity, Identity { name: "Anon-4567890".to_owned(), id: None, token: None });
    assert_eq!(ids.store().get("game-abc-name").as_deref(), Some("Anon-4567890"));
}

#[test]
fn generated_name_is_stable_across_loads() {
    let mut ids = identities();
    let first = ids.load("abc", 1).expect("load");
    let second = ids.load("abc", 999).expect("load");
    assert_eq!(first.name, second.name);
}

#[test]
fn saved_identity_round_trips() {
    let mut ids = identities();
    ids.save_name("g1", "ada").expect("name");
    ids.save_player_id("g1", 7).expect("id");
    ids.save_token("g1", "tok").expect("token");

    let identity = ids.load("g1", 0).expect("load");

    assert_eq!(identity, Identity { name: "ada".to_owned(), id: Some(7), token: Some("tok".to_owned()) });
    assert_eq!(ids.store().get("game-g1-id").as_deref(), Some("7"));
}

#[test]
fn identities_are_scoped_per_game() {
    let mut ids = identities();
    ids.save_player_id("g1", 7).expect("id");
    assert_eq!(ids.load("g2", 0).expect("load").id, None);
}

#[test]
fn garbage_id_is_ignored() {
    let mut store = MemoryStore::new();
    store.set("game-g1-id", "not-a-number").expect("set");
    let mut ids = IdentityStore::new(store);
    assert_eq!(ids.load("g1", 0).expect("load").id, None);
}

#[test]
fn forget_clears_identity() {
    let mut ids = identities();
    ids.save_player_id("g1", 7).expect("id");
    ids.save_token("g1", "tok").expect("token");
    ids.load("g1", 0).expect("load");

    ids.forget("g1").expect("forget");

    assert!(ids.store().is_empty());
}

#[test]
fn draft_round_trips_under_map_key() {
    let mut ids = identities();
    let mut map = GameMap::from_tiles(templates::bordered());
    map.name = "Loop".to_owned();

    ids.save_draft("m1", &map).expect("save");

    assert!(ids.store().get("gameMap-m1").is_some());
    assert_eq!(ids.load_draft("m1").expect("load"), Some(map));
    assert_eq!(ids.load_draft("m2").expect("load"), None);
}

#[test]
fn corrupt_draft_is_an_error() {
    let mut store = MemoryStore::new();
    store.set("gameMap-m1", "{not json").expect("set");
    let ids = IdentityStore::new(store);
    assert!(matches!(ids.load_draft("m1"), Err(StorageError::Corrupt(_))));
}

#[test]
fn remove_draft_deletes_key() {
    let mut ids = identities();
    ids.save_draft("m1", &GameMap::from_tiles(templates::empty())).expect("save");
    ids.remove_draft("m1").expect("remove");
    assert_eq!(ids.store().len(), 0);
}
