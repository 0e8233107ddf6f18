//! Whitelist behaviour tests.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::*;

fn sample() -> WhiteList {
    WhiteList::from_entries([("A", "v1"), ("B", "v2")]).unwrap()
}

// ===== TEST GROUP 1: Lookup =====

#[test]
fn test_lookup_listed_and_missing() {
    let whitelist = sample();

    assert_eq!(whitelist.lookup("A").unwrap(), &IdentityValue::from("v1"));
    assert_eq!(whitelist.lookup("B").unwrap().as_bytes(), b"v2");
    assert_eq!(
        whitelist.lookup("C").unwrap_err(),
        WhiteListError::NotFound("C".to_string())
    );
}

#[test]
fn test_lookup_is_case_sensitive() {
    let whitelist = sample();
    assert!(whitelist.lookup("a").is_err());
}

// ===== TEST GROUP 2: Trust decisions =====

#[test]
fn test_decide_trusted_on_exact_match() {
    assert_eq!(sample().decide("A", b"v1"), TrustDecision::Trusted);
}

#[test]
fn test_decide_mismatch_is_untrusted() {
    assert_eq!(
        sample().decide("A", b"wrong"),
        TrustDecision::Untrusted(UntrustedReason::IdentityMismatch)
    );
}

#[test]
fn test_decide_other_component_value_is_untrusted() {
    assert!(!sample().decide("A", b"v2").is_trusted());
}

#[test]
fn test_decide_unknown_name_is_untrusted() {
    assert_eq!(
        sample().decide("C", b"v1"),
        TrustDecision::Untrusted(UntrustedReason::UnknownComponent)
    );
}

#[test]
fn test_decide_with_measurement_hashes() {
    let measurement = Sha256::digest(b"enclave image v3").to_vec();
    let whitelist = WhiteList::builder()
        .entry("KeyService", measurement.clone())
        .build()
        .unwrap();

    assert!(whitelist.decide("KeyService", &measurement).is_trusted());

    let mut tampered = measurement;
    tampered[0] ^= 0x01;
    assert!(!whitelist.decide("KeyService", &tampered).is_trusted());
}

// ===== TEST GROUP 3: Construction =====

#[test]
fn test_duplicate_name_fails_construction() {
    let result = WhiteList::from_entries([("A", "v1"), ("A", "v2")]);
    assert_eq!(
        result.unwrap_err(),
        WhiteListError::DuplicateName("A".to_string())
    );
}

#[test]
fn test_reserved_self_duplicate_fails() {
    let result = WhiteList::builder()
        .reserve_self()
        .entry(SELF_COMPONENT_LABEL, "x")
        .build();
    assert!(matches!(result, Err(WhiteListError::DuplicateName(_))));
}

#[test]
fn test_empty_whitelist_trusts_nobody() {
    let whitelist = WhiteList::builder().build().unwrap();
    assert!(whitelist.is_empty());
    assert!(!whitelist.decide("A", b"").is_trusted());
}

#[test]
fn test_names_sorted() {
    let whitelist = WhiteList::from_entries([("Zeta", "1"), ("Alpha", "2")]).unwrap();
    assert_eq!(whitelist.names(), vec!["Alpha", "Zeta"]);
    assert_eq!(whitelist.len(), 2);
}

// ===== TEST GROUP 4: Reserved self entry =====

#[test]
fn test_hard_coded_holds_unpopulated_self_entry() {
    let whitelist = WhiteList::hard_coded();
    assert!(whitelist.contains(SELF_COMPONENT_LABEL));
    assert!(!whitelist.is_populated());
    assert_eq!(
        whitelist.lookup(SELF_COMPONENT_LABEL).unwrap_err(),
        WhiteListError::Unpopulated(SELF_COMPONENT_LABEL.to_string())
    );
}

#[test]
fn test_consulting_unpopulated_entry_is_untrusted() {
    let whitelist = WhiteList::hard_coded();
    assert_eq!(
        whitelist.decide(SELF_COMPONENT_LABEL, b""),
        TrustDecision::Untrusted(UntrustedReason::Unpopulated)
    );
}

#[test]
fn test_populate_reserved_once() {
    let whitelist = WhiteList::builder()
        .reserve_self()
        .entry("A", "v1")
        .build()
        .unwrap()
        .populate_reserved("self-measurement")
        .unwrap();

    assert!(whitelist.is_populated());
    assert!(whitelist
        .decide(SELF_COMPONENT_LABEL, b"self-measurement")
        .is_trusted());

    assert_eq!(
        whitelist.populate_reserved("again").unwrap_err(),
        WhiteListError::AlreadyPopulated(SELF_COMPONENT_LABEL.to_string())
    );
}

#[test]
fn test_populate_without_reserved_entry() {
    assert_eq!(
        sample().populate_reserved("x").unwrap_err(),
        WhiteListError::NoReservedEntry(SELF_COMPONENT_LABEL.to_string())
    );
}

// ===== TEST GROUP 5: Concurrent readers =====

#[test]
fn test_shared_readers_see_full_table() {
    let whitelist = Arc::new(sample());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let whitelist = Arc::clone(&whitelist);
            std::thread::spawn(move || {
                let name = if i % 2 == 0 { "A" } else { "B" };
                let value: &[u8] = if i % 2 == 0 { b"v1" } else { b"v2" };
                (0..1000).all(|_| whitelist.decide(name, value).is_trusted())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
