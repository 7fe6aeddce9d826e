use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["orderdesk-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_hash_password_with_argument() {
    let cli = Cli::try_parse_from(["orderdesk-cli", "hash-password", "hunter2"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::HashPassword { password: Some(ref p) }) if p == "hunter2"
    ));
}

#[test]
fn parses_hash_password_without_argument() {
    let cli = Cli::try_parse_from(["orderdesk-cli", "hash-password"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::HashPassword { password: None })
    ));
}

#[test]
fn parses_catalog_without_filter() {
    let cli = Cli::try_parse_from(["orderdesk-cli", "catalog"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog { department: None })
    ));
}

#[test]
fn parses_catalog_department_by_code() {
    let cli = Cli::try_parse_from(["orderdesk-cli", "catalog", "--department", "ops"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            department: Some(Department::Operations)
        })
    ));
}

#[test]
fn parses_order_number_with_date() {
    let cli = Cli::try_parse_from([
        "orderdesk-cli",
        "order-number",
        "--department",
        "Marketing",
        "--date",
        "2024-03-07",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::OrderNumber {
            department: Department::Marketing,
            date: Some(d)
        }) if d == NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    ));
}

#[test]
fn order_number_requires_department() {
    assert!(Cli::try_parse_from(["orderdesk-cli", "order-number"]).is_err());
}

#[test]
fn unknown_department_is_rejected() {
    assert!(Cli::try_parse_from(["orderdesk-cli", "catalog", "--department", "Legal"]).is_err());
}

#[test]
fn parses_check_config() {
    let cli = Cli::try_parse_from(["orderdesk-cli", "check-config"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::CheckConfig)));
}
