use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_kestrel_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("kestrel")
}

#[test]
fn test_refresh_command_help() {
    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("refresh").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--login-url"))
        .stdout(predicate::str::contains("--scanner-api"))
        .stdout(predicate::str::contains("--context-id"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_refresh_patches_scanner_context() {
    let server = MockServer::start();

    let login = server.mock(|when, then| {
        when.method(POST).path("/rest/user/login").json_body(
            serde_json::json!({"email": "admin@juice-sh.op", "password": "admin123"}),
        );
        then.status(200)
            .json_body(serde_json::json!({"authentication": {"token": "abc123"}}));
    });
    let in_scope = server.mock(|when, then| {
        when.method(GET)
            .path("/JSON/context/action/setContextInScope/")
            .query_param("contextId", "0")
            .query_param("booleanInScope", "true");
        then.status(200).json_body(serde_json::json!({"Result": "OK"}));
    });
    let remove = server.mock(|when, then| {
        when.method(GET)
            .path("/JSON/context/action/removeContextData/")
            .query_param("category", "httpHeaders");
        then.status(200).json_body(serde_json::json!({"Result": "OK"}));
    });
    let add = server.mock(|when, then| {
        when.method(GET)
            .path("/JSON/context/action/addContextData/")
            .query_param("data", "Authorization: Bearer abc123");
        then.status(200).json_body(serde_json::json!({"Result": "OK"}));
    });

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("refresh")
        .arg("--login-url")
        .arg(server.url("/rest/user/login"))
        .arg("--scanner-api")
        .arg(server.base_url())
        .arg("--username")
        .arg("admin@juice-sh.op")
        .arg("--password")
        .arg("admin123")
        .arg("--settle-delay-ms")
        .arg("0")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("add_authorization_header"))
        .stdout(predicate::str::contains("\"error\": null"));

    login.assert();
    in_scope.assert();
    remove.assert();
    add.assert();
}

#[test]
fn test_rejected_login_exits_zero_by_default() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/user/login");
        then.status(401);
    });

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("refresh")
        .arg("--login-url")
        .arg(server.url("/rest/user/login"))
        .arg("--scanner-api")
        .arg(server.base_url())
        .arg("--username")
        .arg("admin@juice-sh.op")
        .arg("--password")
        .arg("wrong")
        .arg("--settle-delay-ms")
        .arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Authentication failed"));
}

#[test]
fn test_rejected_login_fails_in_strict_mode() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/user/login");
        then.status(401);
    });

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("refresh")
        .arg("--login-url")
        .arg(server.url("/rest/user/login"))
        .arg("--scanner-api")
        .arg(server.base_url())
        .arg("--username")
        .arg("admin@juice-sh.op")
        .arg("--password")
        .arg("wrong")
        .arg("--settle-delay-ms")
        .arg("0")
        .arg("--strict");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("session refresh failed"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_kestrel()"))
        .stdout(predicate::str::contains("complete -F _kestrel"));
}
