use super::*;

fn anon() -> Identity {
    Identity { name: "Anon-0000042".to_owned(), id: None, token: None }
}

#[test]
fn location_protocol_selects_tls() {
    assert!(Endpoint::from_location("https:", "golf.example").secure);
    assert!(Endpoint::from_location("https", "golf.example").secure);
    assert!(!Endpoint::from_location("http:", "localhost:3000").secure);
}

#[test]
fn base_url_maps_scheme_and_strips_slash() {
    let plain = Endpoint::from_base_url("http://127.0.0.1:8080/").expect("http");
    assert_eq!(plain, Endpoint { secure: false, host: "127.0.0.1:8080".to_owned() });
    assert_eq!(plain.ws_scheme(), "ws");
    assert_eq!(plain.http_base(), "http://127.0.0.1:8080");

    let tls = Endpoint::from_base_url("https://golf.example").expect("https");
    assert_eq!(tls.ws_scheme(), "wss");
}

#[test]
fn base_url_rejects_other_schemes() {
    assert_eq!(
        Endpoint::from_base_url("ftp://golf.example"),
        Err(ConfigError::InvalidBaseUrl("ftp://golf.example".to_owned()))
    );
    assert!(Endpoint::from_base_url("https://").is_err());
}

#[test]
fn first_join_url_carries_only_name() {
    let endpoint = Endpoint::from_location("http:", "localhost:3000");
    assert_eq!(endpoint.game_url("g1", &anon()), "ws://localhost:3000/ws/game/g1?name=Anon-0000042");
}

#[test]
fn rejoin_url_carries_id_and_token() {
    let endpoint = Endpoint::from_location("https:", "golf.example");
    let identity = Identity { id: Some(7), token: Some("a.b.c".to_owned()), ..anon() };
    assert_eq!(
        endpoint.game_url("g1", &identity),
        "wss://golf.example/ws/game/g1?name=Anon-0000042&id=7&token=a.b.c"
    );
}

#[test]
fn query_values_are_percent_encoded() {
    let endpoint = Endpoint::from_location("http:", "h");
    let identity = Identity { name: "Ada & Bob?".to_owned(), id: None, token: Some("x=y".to_owned()) };
    assert_eq!(endpoint.game_url("a b", &identity), "ws://h/ws/game/a%20b?name=Ada%20%26%20Bob%3F&token=x%3Dy");
}
