//! Customer directory: search semantics and the two-phase creation commit.

use churn_core::directory::{Customer, CustomerDirectory};

fn sample() -> CustomerDirectory {
    CustomerDirectory::from_ids(["818770008", "713061558", "710930508", "ab12CD"])
}

fn ids(customers: &[Customer]) -> Vec<&str> {
    customers.iter().map(|c| c.id.as_str()).collect()
}

// ── Search ───────────────────────────────────────────────────────────────────

#[test]
fn empty_query_returns_everything_in_order() {
    let dir = sample();
    assert_eq!(ids(&dir.search("")), vec!["818770008", "713061558", "710930508", "ab12CD"]);
    assert_eq!(dir.search("   "), dir.to_vec());
}

#[test]
fn id_substring_matches_regardless_of_case() {
    let dir = sample();
    assert_eq!(ids(&dir.search("AB12cd")), vec!["ab12CD"]);
    assert_eq!(ids(&dir.search("0930")), vec!["710930508"]);
    assert_eq!(ids(&dir.search("71")), vec!["713061558", "710930508"]);
}

#[test]
fn whitespace_inside_a_query_is_significant() {
    let dir = CustomerDirectory::from_ids(["17", "71"]);
    // "Client 71" contains " 7", "Client 17" does not
    assert_eq!(ids(&dir.search(" 7")), vec!["71"]);
    assert_eq!(ids(&dir.search("7 ")), Vec::<&str>::new());
    assert_eq!(dir.search("  ").len(), 2);
}

#[test]
fn name_matches_too() {
    let dir = sample();
    assert_eq!(dir.search("client").len(), 4);
    assert_eq!(ids(&dir.search("CLIENT 8187")), vec!["818770008"]);
    assert!(dir.search("nobody").is_empty());
}

#[test]
fn entries_carry_derived_names() {
    let c = Customer::from_id("42");
    assert_eq!(c.name, "Client 42");
    assert_eq!(c.profile_id, "42");
}

#[test]
fn insert_rejects_duplicates() {
    let mut dir = sample();
    assert!(!dir.insert(Customer::from_id("713061558")));
    assert!(dir.insert(Customer::from_id("1")));
    assert_eq!(dir.len(), 5);
}

// ── Two-phase creation ───────────────────────────────────────────────────────

#[test]
fn commit_replaces_the_provisional_entry_in_place() {
    let mut dir = sample();
    let ticket = dir.begin_creation("555555555");
    assert_eq!(dir.pending_count(), 1);
    assert!(dir.contains("555555555"));

    let confirmed = dir.commit_creation(ticket, "900000001").unwrap();
    assert_eq!(confirmed.id, "900000001");
    assert_eq!(dir.pending_count(), 0);
    assert!(!dir.contains("555555555"));
    assert_eq!(dir.len(), 5);
    assert_eq!(dir.to_vec().last().unwrap().id, "900000001");
}

#[test]
fn commit_onto_an_existing_id_keeps_one_entry() {
    let mut dir = sample();
    let ticket = dir.begin_creation("555555555");
    dir.commit_creation(ticket, "713061558").unwrap();

    let matches = dir.customers().filter(|c| c.id == "713061558").count();
    assert_eq!(matches, 1);
    assert_eq!(dir.len(), 4);
}

#[test]
fn commit_is_keyed_by_ticket() {
    let mut dir = CustomerDirectory::new();
    let first = dir.begin_creation("111111111");
    let second = dir.begin_creation("222222222");

    dir.commit_creation(second, "2").unwrap();
    assert_eq!(
        dir.to_vec().iter().map(|c| c.id.clone()).collect::<Vec<_>>(),
        vec!["111111111".to_string(), "2".to_string()]
    );

    assert!(dir.abort_creation(first));
    assert!(!dir.abort_creation(first), "ticket already consumed");
    assert!(dir.commit_creation(first, "1").is_none());
    assert_eq!(dir.len(), 1);
}

#[test]
fn refresh_keeps_pending_creations() {
    let mut dir = sample();
    let ticket = dir.begin_creation("555555555");
    dir.replace_all(CustomerDirectory::from_ids(["1", "2"]));

    assert_eq!(ids(&dir.to_vec()), vec!["1", "2", "555555555"]);
    assert_eq!(dir.pending_count(), 1);
    dir.commit_creation(ticket, "3").unwrap();
    assert_eq!(ids(&dir.to_vec()), vec!["1", "2", "3"]);
}
