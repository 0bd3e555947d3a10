//! Integration tests for `rota schedule` and `rota sub`.

mod common;

use common::{TestEnv, WEDNESDAY, task_ids};
use predicates::prelude::*;

#[test]
fn test_schedule_set_and_show() {
    let env = TestEnv::init();

    let set = env.json(&["schedule", "set", "zootechnician", "3", "2", "5"]);
    assert_eq!(set["role"], "Zootehniķis");
    assert_eq!(set["task_ids"], serde_json::json!([5, 2]));

    let board = env.json(&["schedule", "show", "--weekday", "3"]);
    assert_eq!(board["weekday"], 3);
    assert_eq!(task_ids(&board["roles"]["Zootehniķis"]), vec![5, 2]);
    assert_eq!(board["roles"]["Entomologs"], serde_json::json!([]));
    assert!(board["roles"].get("Admin").is_none());
}

#[test]
fn test_schedule_show_by_date() {
    let env = TestEnv::init();
    env.json(&["schedule", "set", "keeper-1", "3", "4"]);

    let board = env.json(&["schedule", "show", "--date", WEDNESDAY]);
    assert_eq!(board["weekday_name"], "Wednesday");
    assert_eq!(task_ids(&board["roles"]["Vivāriju dzīvnieku kopējs I"]), vec![4]);
}

#[test]
fn test_schedule_set_is_idempotent_and_clears() {
    let env = TestEnv::init();
    env.json(&["schedule", "set", "entomologist", "5", "6"]);
    env.json(&["schedule", "set", "entomologist", "5", "6"]);

    let overview = env.json(&["schedule", "overview"]);
    assert_eq!(overview["roles"]["Entomologs"]["5"], serde_json::json!([6]));

    env.json(&["schedule", "set", "entomologist", "5"]);
    let overview = env.json(&["schedule", "overview"]);
    assert_eq!(overview["roles"]["Entomologs"]["5"], serde_json::json!([]));
}

#[test]
fn test_schedule_set_rejects_bad_weekday() {
    let env = TestEnv::init();

    env.rota()
        .args(["schedule", "set", "keeper-1", "8", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weekday must be 1-7"));
}

#[test]
fn test_schedule_weekday_out_of_byte_range_is_json_error() {
    let env = TestEnv::init();

    for day in ["300", "-1"] {
        let output = env
            .rota()
            .args(["schedule", "set", "keeper-1", day, "1"])
            .assert()
            .code(1)
            .get_output()
            .stderr
            .clone();
        let err: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            err["error"],
            format!("Invalid input: weekday must be 1-7, got {}", day)
        );
    }

    env.rota()
        .args(["schedule", "show", "--weekday", "1000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("weekday must be 1-7, got 1000"));
}

#[test]
fn test_schedule_set_rejects_supervisory_role() {
    let env = TestEnv::init();

    env.rota()
        .args(["schedule", "set", "zoologist", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_schedule_set_unknown_task_changes_nothing() {
    let env = TestEnv::init();
    env.json(&["schedule", "set", "keeper-2", "2", "1"]);

    env.rota()
        .args(["schedule", "set", "keeper-2", "2", "1", "77"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));

    let board = env.json(&["schedule", "show", "--weekday", "2"]);
    assert_eq!(task_ids(&board["roles"]["Vivāriju dzīvnieku kopējs II"]), vec![1]);
}

#[test]
fn test_sub_set_replaces_and_clear_removes() {
    let env = TestEnv::init();

    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);
    env.json(&["sub", "set", "veterinarian", "keeper-3", "--date", WEDNESDAY]);

    let list = env.json(&["sub", "list", "--date", WEDNESDAY]);
    let subs = list["substitutions"].as_array().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0]["substitute"], "Vivāriju dzīvnieku kopējs III");

    env.json(&["sub", "clear", "veterinarian", "--date", WEDNESDAY]);
    let list = env.json(&["sub", "list", "--date", WEDNESDAY]);
    assert_eq!(list["substitutions"], serde_json::json!([]));
}

#[test]
fn test_sub_is_day_scoped() {
    let env = TestEnv::init();
    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);

    let list = env.json(&["sub", "list", "--date", "2024-03-07"]);
    assert_eq!(list["substitutions"], serde_json::json!([]));
}

#[test]
fn test_sub_set_unknown_role_fails() {
    let env = TestEnv::init();

    env.rota()
        .args(["sub", "set", "janitor", "keeper-1", "--date", WEDNESDAY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role"));
}
