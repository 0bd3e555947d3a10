//! Integration tests for `rota today`: the daily resolver end to end.
//!
//! Board for Wednesday used throughout:
//! - Zootechnician: 2 (B2), 5 (A1)
//! - Veterinarian: 1 (C1), 3 (D4)

mod common;

use common::{TestEnv, WEDNESDAY, task_ids};
use predicates::prelude::*;

fn wednesday_board() -> TestEnv {
    let env = TestEnv::init();
    env.json(&["schedule", "set", "zootechnician", "3", "2", "5"]);
    env.json(&["schedule", "set", "veterinarian", "3", "1", "3"]);
    env
}

fn today(env: &TestEnv, role: &str) -> serde_json::Value {
    env.json(&["today", "--role", role, "--date", WEDNESDAY])
}

#[test]
fn test_own_tasks_sorted_by_cage() {
    let env = wednesday_board();

    let json = today(&env, "zootechnician");
    assert_eq!(json["view"], "personal");
    assert_eq!(task_ids(&json["tasks"]), vec![5, 2]);
    assert_eq!(json["substitute_label"], "");
}

#[test]
fn test_substitute_takes_over_covered_tasks() {
    let env = wednesday_board();
    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);

    let json = today(&env, "Zootehniķis");
    assert_eq!(json["substitute_label"], "Aizvieto: Veterinārārsts");
    assert_eq!(task_ids(&json["tasks"]), vec![1, 3, 5, 2]);
}

#[test]
fn test_covered_role_sees_substitute_label() {
    let env = wednesday_board();
    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);

    let json = today(&env, "veterinarian");
    assert_eq!(json["substitute_label"], "Aizvieto: Zootehniķis");
    assert_eq!(task_ids(&json["tasks"]), vec![5, 2, 1, 3]);
}

#[test]
fn test_shared_task_listed_once() {
    let env = wednesday_board();
    env.json(&["schedule", "set", "zootechnician", "3", "2", "5", "1"]);
    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);

    let json = today(&env, "zootechnician");
    assert_eq!(task_ids(&json["tasks"]), vec![1, 3, 5, 2]);
}

#[test]
fn test_supervisor_gets_full_board() {
    let env = wednesday_board();
    env.json(&["sub", "set", "veterinarian", "zootechnician", "--date", WEDNESDAY]);

    let json = today(&env, "zoologist");
    assert_eq!(json["view"], "admin");
    assert_eq!(task_ids(&json["board"]["roles"]["Zootehniķis"]), vec![5, 2]);
    assert_eq!(task_ids(&json["board"]["roles"]["Veterinārārsts"]), vec![1, 3]);
    assert_eq!(json["substitutes"]["Veterinārārsts"], "Zootehniķis");
}

#[test]
fn test_supervisor_on_mobile_gets_flat_list() {
    let env = wednesday_board();

    let json = env.json(&[
        "today", "--role", "admin", "--date", WEDNESDAY, "--surface", "mobile",
    ]);
    assert_eq!(json["view"], "personal");
    assert_eq!(json["substitute_label"], "Admin");
    assert_eq!(task_ids(&json["tasks"]), vec![5, 2, 1, 3]);
}

#[test]
fn test_empty_day_is_not_an_error() {
    let env = wednesday_board();

    let json = env.json(&["today", "--role", "keeper-1", "--date", "2024-03-10"]);
    assert_eq!(json["tasks"], serde_json::json!([]));
}

#[test]
fn test_today_human_marks_completed() {
    let env = wednesday_board();
    env.json(&["complete", "2", "--by", "alice", "--date", WEDNESDAY]);

    env.rota()
        .args(["-H", "today", "--role", "zootechnician", "--date", WEDNESDAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] [2] B2 - Gecko"))
        .stdout(predicate::str::contains("[ ] [5] A1 - Axolotl"));
}

#[test]
fn test_unknown_role_fails() {
    let env = wednesday_board();

    env.rota()
        .args(["today", "--role", "janitor", "--date", WEDNESDAY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role"));
}

#[test]
fn test_bad_date_fails() {
    let env = wednesday_board();

    env.rota()
        .args(["today", "--role", "keeper-1", "--date", "06.03.2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}
