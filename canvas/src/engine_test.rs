use std::cell::RefCell;

use serde_json::json;

use super::*;
use crate::geometry::Point;
use crate::storage::MemoryStore;
use crate::templates;

#[derive(Debug, Default)]
struct Wire {
    sent: Vec<String>,
    closed_with: Option<u16>,
    open: bool,
}

/// In-memory transport; the test keeps a handle to what it saw.
#[derive(Debug, Clone)]
struct FakeTransport(Rc<RefCell<Wire>>);

impl FakeTransport {
    fn open() -> (Self, Rc<RefCell<Wire>>) {
        let wire = Rc::new(RefCell::new(Wire { open: true, ..Wire::default() }));
        (Self(Rc::clone(&wire)), wire)
    }
}

impl Transport for FakeTransport {
    fn is_open(&self) -> bool {
        self.0.borrow().open
    }

    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        let mut wire = self.0.borrow_mut();
        if !wire.open {
            return Err(TransportError::Closed);
        }
        wire.sent.push(text);
        Ok(())
    }

    fn close(&mut self, code: u16, _reason: &str) {
        let mut wire = self.0.borrow_mut();
        wire.open = false;
        wire.closed_with = Some(code);
    }
}

type Session = GameSession<FakeTransport, MemoryStore>;

fn session() -> Session {
    GameSession::new(
        "g1",
        Endpoint::from_location("http:", "localhost:3000"),
        IdentityStore::new(MemoryStore::new()),
    )
}

fn connected() -> (Session, Rc<RefCell<Wire>>) {
    let mut s = session();
    s.begin_connect(42).expect("connect");
    let (transport, wire) = FakeTransport::open();
    s.on_open(transport);
    (s, wire)
}

fn in_session(player_id: PlayerId) -> (Session, Rc<RefCell<Wire>>) {
    let (mut s, wire) = connected();
    s.handle_message(&init(player_id), 0.0);
    (s, wire)
}

fn init(player_id: PlayerId) -> String {
    json!({"type": "INIT", "playerId": player_id, "name": "ada", "token": "tok"}).to_string()
}

fn map_dto() -> serde_json::Value {
    let mut map = GameMap::from_tiles(templates::bordered());
    map.id = "m1".to_owned();
    serde_json::to_value(map.to_dto().expect("encode")).expect("json")
}

fn update(balls: &[(PlayerId, f64, f64)]) -> String {
    let states: Vec<_> = balls
        .iter()
        .map(|(id, x, y)| json!({"id": id, "x": x, "y": y, "name": format!("p{id}"), "shotCount": 0}))
        .collect();
    json!({"type": "UPDATE", "playerStates": states}).to_string()
}

fn sent(wire: &Rc<RefCell<Wire>>) -> Vec<serde_json::Value> {
    wire.borrow().sent.iter().map(|text| serde_json::from_str(text).expect("json")).collect()
}

fn give_turn(s: &mut Session, player_id: PlayerId) {
    s.handle_message(&update(&[(player_id, 1000.0, 1000.0)]), 0.0);
    s.handle_message(
        &json!({"type": "STATUS_CHANGE", "playerId": player_id, "status": "IS_PLAYER_TURN"}).to_string(),
        0.0,
    );
}

// =============================================================
// Connection lifecycle
// =============================================================

#[test]
fn connect_builds_url_from_stored_identity() {
    let mut s = session();
    assert_eq!(s.state(), SessionState::Disconnected);

    let url = s.begin_connect(1_234_567_890).expect("connect");

    assert_eq!(url, "ws://localhost:3000/ws/game/g1?name=Anon-4567890");
    assert_eq!(s.state(), SessionState::Connecting);
}

#[test]
fn reconnect_url_reuses_assigned_identity() {
    let (mut s, _wire) = in_session(7);
    s.on_close();

    let url = s.begin_connect(0).expect("reconnect");

    assert_eq!(url, "ws://localhost:3000/ws/game/g1?name=ada&id=7&token=tok");
}

#[test]
fn connect_is_only_valid_when_disconnected() {
    let mut s = session();
    s.begin_connect(0).expect("connect");
    assert_eq!(s.begin_connect(0), Err(SessionError::NotDisconnected(SessionState::Connecting)));
}

#[test]
fn socket_that_never_opens_reports_disconnect() {
    let mut s = session();
    s.begin_connect(0).expect("connect");

    assert_eq!(s.on_close(), vec![Notification::Disconnected]);
    assert_eq!(s.state(), SessionState::Disconnected);
    assert!(s.begin_connect(0).is_ok());
}

#[test]
fn open_then_init_enters_session() {
    let mut s = session();
    s.begin_connect(0).expect("connect");
    let (transport, _wire) = FakeTransport::open();

    assert_eq!(s.on_open(transport), vec![Notification::Connected]);
    assert_eq!(s.state(), SessionState::AwaitingInit);

    let out = s.handle_message(&init(7), 0.0);

    assert_eq!(out, vec![Notification::Initialized { player_id: 7 }]);
    assert_eq!(s.state(), SessionState::InSession);
    assert_eq!(s.identity().id, Some(7));
    assert_eq!(s.identity().token.as_deref(), Some("tok"));
    assert_eq!(s.identities().store().get("game-g1-id").as_deref(), Some("7"));
    assert_eq!(s.identities().store().get("game-g1-token").as_deref(), Some("tok"));
    assert_eq!(s.shot().heading(), Some(WAITING_HEADING));
}

#[test]
fn close_reports_disconnect_and_ends_turn() {
    let (mut s, _wire) = in_session(7);
    give_turn(&mut s, 7);

    assert_eq!(s.on_close(), vec![Notification::Disconnected]);
    assert_eq!(s.state(), SessionState::Disconnected);
    assert!(!s.shot().has_turn());
}

#[test]
fn destroy_closes_with_normal_code_and_is_idempotent() {
    let (mut s, wire) = in_session(7);

    s.destroy();
    s.destroy();

    assert_eq!(wire.borrow().closed_with, Some(NORMAL_CLOSURE));
    assert!(s.is_destroyed());
    assert!(s.on_close().is_empty());
    assert!(s.handle_message(&init(8), 0.0).is_empty());
    assert_eq!(s.begin_connect(0), Err(SessionError::Destroyed));
}

#[test]
fn destroy_before_connect_is_harmless() {
    let mut s = session();
    s.destroy();
    assert_eq!(s.state(), SessionState::Disconnected);
}

#[test]
fn late_open_after_destroy_is_closed() {
    let mut s = session();
    s.begin_connect(0).expect("connect");
    s.destroy();
    let (transport, wire) = FakeTransport::open();

    assert!(s.on_open(transport).is_empty());
    assert_eq!(wire.borrow().closed_with, Some(NORMAL_CLOSURE));
}

// =============================================================
// Server events
// =============================================================

#[test]
fn malformed_frames_are_dropped() {
    let (mut s, _wire) = in_session(7);
    assert!(s.handle_message("{not json", 0.0).is_empty());
    assert!(s.handle_message(r#"{"type":"UPDATE"}"#, 0.0).is_empty());
    assert!(s.handle_message(r#"{"type":"FIREWORKS","value":1}"#, 0.0).is_empty());
    assert_eq!(s.state(), SessionState::InSession);
}

#[test]
fn join_is_surfaced() {
    let (mut s, _wire) = in_session(7);
    let out = s.handle_message(&json!({"type": "JOIN", "playerId": 9, "name": "bob"}).to_string(), 0.0);
    assert_eq!(out, vec![Notification::Joined { player_id: 9, name: "bob".to_owned() }]);
}

#[test]
fn start_map_installs_map_on_both_layers() {
    let (mut s, _wire) = in_session(7);

    let out = s.handle_message(&json!({"type": "START_MAP", "gameMap": map_dto(), "isDemo": true}).to_string(), 0.0);

    assert_eq!(out, vec![Notification::MapStarted { is_demo: true }]);
    assert!(s.is_demo());
    let map = s.map().expect("map");
    assert_eq!(map.id, "m1");
    assert_eq!(map.tiles, templates::bordered());
    let ground = Rc::clone(s.ground_mut().game_map().expect("ground"));
    assert!(Rc::ptr_eq(&ground, s.structures_mut().game_map().expect("walls")));
    assert_eq!(s.shot().heading(), None);
}

#[test]
fn undecodable_map_keeps_previous_one() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(&json!({"type": "START_MAP", "gameMap": map_dto()}).to_string(), 0.0);

    let bad = json!({"id": "bad", "tiles": [["0,0,0"]]});
    let out = s.handle_message(&json!({"type": "START_MAP", "gameMap": bad}).to_string(), 0.0);

    assert!(out.is_empty());
    assert_eq!(s.map().expect("map").id, "m1");
}

#[test]
fn end_map_reports_scores_and_ends_turn() {
    let (mut s, _wire) = in_session(7);
    give_turn(&mut s, 7);

    let out = s.handle_message(
        &json!({"type": "END_MAP", "isGameOver": true, "scores": {"7": [3, 4]}}).to_string(),
        0.0,
    );

    let scores = BTreeMap::from([("7".to_owned(), vec![3, 4])]);
    assert_eq!(out, vec![Notification::MapEnded { is_game_over: true, scores }]);
    assert!(!s.shot().has_turn());
    assert_eq!(s.shot().heading(), Some(GAME_OVER_HEADING));
}

#[test]
fn turn_status_applies_only_to_local_player() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(&json!({"type": "STATUS_CHANGE", "playerId": 8, "status": "IS_PLAYER_TURN"}).to_string(), 0.0);
    assert!(!s.shot().has_turn());

    s.handle_message(&json!({"type": "STATUS_CHANGE", "playerId": 7, "status": "SPECTATING"}).to_string(), 0.0);
    assert!(!s.shot().has_turn());

    s.handle_message(&json!({"type": "TURN_BEGIN", "playerId": 7}).to_string(), 0.0);
    assert!(s.shot().has_turn());
}

#[test]
fn update_feeds_sorted_balls_to_shot_and_sprites() {
    let (mut s, _wire) = in_session(7);

    s.handle_message(&update(&[(9, 10.0, 10.0), (7, 500.0, 600.0), (2, 0.0, 0.0)]), 0.0);

    let ids: Vec<PlayerId> = s.sprites_mut().balls().iter().map(|ball| ball.id).collect();
    assert_eq!(ids, vec![2, 7, 9]);
    assert_eq!(s.shot().ball().map(|ball| ball.center()), Some(Point::new(500.0, 600.0)));
}

#[test]
fn hole_effect_starts_sprite_animation() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(&update(&[(7, 500.0, 600.0), (8, 0.0, 0.0)]), 0.0);

    s.handle_message(&json!({"type": "EFFECT", "value": "HOLE", "playerId": 8}).to_string(), 100.0);

    assert!(s.sprites_mut().is_sinking(8));
    assert_eq!(s.shot().effect(200.0), Some("HOLE"));
}

#[test]
fn hole_effect_without_player_targets_local_ball() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(&update(&[(7, 500.0, 600.0)]), 0.0);

    s.handle_message(&json!({"type": "EFFECT", "value": "HOLE"}).to_string(), 0.0);

    assert!(s.sprites_mut().is_sinking(7));
}

#[test]
fn other_effects_only_show_in_status() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(&update(&[(7, 500.0, 600.0)]), 0.0);

    s.handle_message(&json!({"type": "EFFECT", "value": "WATER"}).to_string(), 0.0);

    assert!(!s.sprites_mut().is_sinking(7));
    assert_eq!(s.shot().effect(10.0), Some("WATER"));
}

#[test]
fn reconnect_restores_map_turn_and_identity() {
    let (mut s, _wire) = connected();

    let out = s.handle_message(
        &json!({
            "type": "RECONNECT",
            "gameMap": map_dto(),
            "isDemo": false,
            "playerId": 7,
            "name": "ada",
            "isTurn": true
        })
        .to_string(),
        0.0,
    );

    assert_eq!(out, vec![Notification::Initialized { player_id: 7 }, Notification::MapStarted { is_demo: false }]);
    assert_eq!(s.state(), SessionState::InSession);
    assert!(s.shot().has_turn());
    assert_eq!(s.identity().name, "ada");
    assert!(s.map().is_some());
}

#[test]
fn save_demo_and_errors_are_surfaced() {
    let (mut s, _wire) = in_session(7);
    assert_eq!(
        s.handle_message(r#"{"type":"SAVE_DEMO_MAP","jwt":"j.w.t"}"#, 0.0),
        vec![Notification::SaveDemo { jwt: "j.w.t".to_owned() }]
    );
    assert_eq!(
        s.handle_message(r#"{"type":"ERROR","value":"full"}"#, 0.0),
        vec![Notification::ServerError { message: "full".to_owned() }]
    );
}

#[test]
fn each_save_demo_token_arrives_as_its_own_offer() {
    let (mut s, _wire) = in_session(7);
    s.handle_message(r#"{"type":"SAVE_DEMO_MAP","jwt":"first"}"#, 0.0);

    let out = s.handle_message(r#"{"type":"SAVE_DEMO_MAP","jwt":"second"}"#, 0.0);

    assert_eq!(out, vec![Notification::SaveDemo { jwt: "second".to_owned() }]);
}

// =============================================================
// Outgoing
// =============================================================

#[test]
fn shot_is_sent_once_per_turn() {
    let (mut s, wire) = in_session(7);
    give_turn(&mut s, 7);

    s.on_pointer_down(PointerInput::mouse(Point::new(1300.0, 1000.0)), 0.0);
    s.on_pointer_down(PointerInput::mouse(Point::new(1300.0, 1000.0)), 0.0);

    assert_eq!(sent(&wire), vec![json!({"type": "SHOT", "x": 300.0, "y": 0.0})]);
}

#[test]
fn touch_shot_is_sent_on_release() {
    let (mut s, wire) = in_session(7);
    give_turn(&mut s, 7);

    s.on_pointer_down(PointerInput::touch(Point::new(2000.0, 2000.0)), 0.0);
    s.on_pointer_move(PointerInput::touch(Point::new(2000.0, 1800.0)));
    assert!(sent(&wire).is_empty());
    s.on_pointer_up(PointerInput::touch(Point::new(2000.0, 1800.0)), 0.0);

    let out = sent(&wire);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["y"], 200.0);
}

#[test]
fn ready_sends_is_ready() {
    let (mut s, wire) = in_session(7);
    assert!(s.ready(true));
    assert_eq!(sent(&wire), vec![json!({"type": "IS_READY", "value": true})]);
}

#[test]
fn send_without_connection_is_dropped() {
    let mut s = session();
    assert!(!s.ready(true));

    let (mut s, wire) = in_session(7);
    wire.borrow_mut().open = false;
    assert!(!s.ready(true));
    assert!(wire.borrow().sent.is_empty());
}

#[test]
fn notifications_serialize_for_the_host() {
    let value = serde_json::to_value(Notification::MapEnded { is_game_over: false, scores: BTreeMap::new() })
        .expect("serialize");
    assert_eq!(value, json!({"type": "mapEnded", "isGameOver": false, "scores": {}}));
    assert_eq!(serde_json::to_value(Notification::Connected).expect("serialize"), json!({"type": "connected"}));
}
