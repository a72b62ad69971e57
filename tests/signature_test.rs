use std::collections::{BTreeMap, HashMap};

use lfmcli::lastfm::signature::sign;
use proptest::prelude::*;

#[test]
fn test_session_exchange_vector() {
    let params = [
        ("method", "auth.getSession"),
        ("api_key", "K"),
        ("token", "T"),
    ];
    assert_eq!(sign(params, "s3cr3t"), "13f0f76750633f3dabd062d2e8bdbc97");
}

#[test]
fn test_empty_params_and_secret() {
    let params: [(&str, &str); 0] = [];
    assert_eq!(sign(params, ""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(sign(params, "secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
}

#[test]
fn test_map_kind_does_not_matter() {
    let pairs = [
        ("user", "alice"),
        ("limit", "50"),
        ("sk", "SESS1"),
        ("method", "user.getrecenttracks"),
        ("api_key", "AK"),
    ];
    let hashed: HashMap<&str, &str> = pairs.into_iter().collect();
    let ordered: BTreeMap<&str, &str> = pairs.into_iter().collect();

    let expected = "a8c9e83feb3ee60bdcebb4f65880de7e";
    assert_eq!(sign(&hashed, "AS"), expected);
    assert_eq!(sign(&ordered, "AS"), expected);
    assert_eq!(sign(pairs, "AS"), expected);
}

#[test]
fn test_signing_is_deterministic() {
    let params = BTreeMap::from([
        ("method".to_string(), "auth.getToken".to_string()),
        ("api_key".to_string(), "AK".to_string()),
    ]);
    assert_eq!(sign(&params, "AS"), sign(&params, "AS"));
    assert_ne!(sign(&params, "AS"), sign(&params, "BS"));
}

fn params_and_shuffle() -> impl Strategy<Value = (Vec<(String, String)>, Vec<(String, String)>)> {
    prop::collection::btree_map("[a-z_]{1,10}", "[ -~]{0,16}", 1..8)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

proptest! {
    #[test]
    fn prop_order_of_params_is_irrelevant((sorted, shuffled) in params_and_shuffle(), secret in "[a-zA-Z0-9]{0,32}") {
        prop_assert_eq!(sign(sorted, &secret), sign(shuffled, &secret));
    }

    #[test]
    fn prop_signature_is_lowercase_hex(params in prop::collection::btree_map("[a-z]{1,8}", ".{0,12}", 0..6), secret in ".{0,16}") {
        let sig = sign(&params, &secret);
        prop_assert_eq!(sig.len(), 32);
        prop_assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
