use super::*;

#[test]
fn test_cli_build() {
    let app = build_cli();
    assert_eq!(app.get_name(), "beacon");
}

#[test]
fn test_cli_requires_subcommand() {
    let app = build_cli();
    assert!(app.try_get_matches_from(vec!["beacon"]).is_err());
}

#[test]
fn test_cli_watch_command() {
    let app = build_cli();
    let matches = app.try_get_matches_from(vec!["beacon", "watch"]).unwrap();
    assert!(matches.subcommand_matches("watch").is_some());
}

#[test]
fn test_cli_list_limit_and_json() {
    let app = build_cli();
    let matches = app
        .try_get_matches_from(vec!["beacon", "list", "--limit", "20", "--json"])
        .unwrap();
    let list_matches = matches.subcommand_matches("list").unwrap();
    assert_eq!(list_matches.get_one::<usize>("limit"), Some(&20));
    assert!(list_matches.get_flag("json"));
}

#[test]
fn test_cli_list_rejects_non_numeric_limit() {
    let app = build_cli();
    let result = app.try_get_matches_from(vec!["beacon", "list", "--limit", "many"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_logs_requires_account() {
    let app = build_cli();
    assert!(
        app.try_get_matches_from(vec!["beacon", "logs", "dpl_123"])
            .is_err()
    );

    let app = build_cli();
    let matches = app
        .try_get_matches_from(vec!["beacon", "logs", "dpl_123", "--account", "personal"])
        .unwrap();
    let logs_matches = matches.subcommand_matches("logs").unwrap();
    assert_eq!(
        logs_matches.get_one::<String>("deployment").unwrap(),
        "dpl_123"
    );
    assert_eq!(
        logs_matches.get_one::<String>("account").unwrap(),
        "personal"
    );
}

#[test]
fn test_cli_accounts_json() {
    let app = build_cli();
    let matches = app
        .try_get_matches_from(vec!["beacon", "accounts", "--json"])
        .unwrap();
    assert!(
        matches
            .subcommand_matches("accounts")
            .unwrap()
            .get_flag("json")
    );
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let app = build_cli();
    let matches = app
        .try_get_matches_from(vec![
            "beacon",
            "list",
            "--no-color",
            "--verbose",
            "--config",
            "/tmp/beacon.toml",
        ])
        .unwrap();
    assert!(matches.get_flag("no-color"));
    assert!(matches.get_flag("verbose"));
    let list_matches = matches.subcommand_matches("list").unwrap();
    assert_eq!(
        list_matches.get_one::<String>("config").unwrap(),
        "/tmp/beacon.toml"
    );
}
