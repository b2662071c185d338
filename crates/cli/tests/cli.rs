use assert_cmd::Command;

fn inout() -> Command {
    let mut cmd = Command::cargo_bin("inout-cli").unwrap();
    cmd.env_remove("INOUT_ENV").env("INOUT_CONFIG_DIR", "does-not-exist");
    cmd
}

#[test]
fn openapi_lists_book_and_login_paths() {
    let output = inout().arg("openapi").output().unwrap();
    assert!(output.status.success());

    let spec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(spec["paths"]["/api/books"]["post"].is_object());
    assert!(spec["paths"]["/api/books/{id}"]["delete"].is_object());
    assert!(spec["paths"]["/api/login"]["post"].is_object());
}

#[test]
fn config_prints_defaults_without_password() {
    let output = inout().arg("config").output().unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "development");
    assert_eq!(settings["server"]["port"], 3000);
    assert!(settings["auth"].get("password").is_none());
}

#[test]
fn unknown_environment_fails() {
    inout().env("INOUT_ENV", "moon").arg("config").assert().failure();
}
