use super::*;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2024-03-04 20:00 UTC);

fn cli(data_file: &std::path::Path, args: &[&str]) -> Cli {
    let mut argv = vec!["heynom-cli", "--data-file", data_file.to_str().unwrap(), "--utc-offset", "+00:00"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn parses_global_flags_and_add() {
    let parsed = Cli::try_parse_from([
        "heynom-cli", "--store", "rest", "--api-url", "http://api", "--token", "abc", "add", "green", "curry", "--meal",
        "dinner", "--at", "19:30",
    ])
    .unwrap();
    assert_eq!(parsed.store, StoreKind::Rest);
    assert_eq!(parsed.api_url.as_deref(), Some("http://api"));
    assert_eq!(parsed.token, "abc");
    match parsed.command {
        Command::Add { text, meal, at } => {
            assert_eq!(text, ["green", "curry"]);
            assert_eq!(meal.as_deref(), Some("dinner"));
            assert_eq!(at.as_deref(), Some("19:30"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_bad_offset_and_missing_text() {
    assert!(Cli::try_parse_from(["heynom-cli", "--utc-offset", "soon", "list"]).is_err());
    assert!(Cli::try_parse_from(["heynom-cli", "add"]).is_err());
}

#[tokio::test]
async fn add_list_and_stats_against_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.json");

    let added = run(cli(&path, &["add", "toast", "with", "jam", "--at", "08:15"]), UtcOffset::UTC, NOW)
        .await
        .unwrap();
    assert!(added.starts_with("Logged  8:15 AM"));
    // Meal is guessed from the current hour, not from --at.
    assert!(added.contains("Dinner"));
    assert!(added.contains("toast with jam"));

    let listed = run(cli(&path, &["list"]), UtcOffset::UTC, NOW).await.unwrap();
    assert!(listed.starts_with("Today · 1 entry"));

    let stats = run(cli(&path, &["stats"]), UtcOffset::UTC, NOW).await.unwrap();
    assert_eq!(stats, "Today: 1\nDay streak: 1");
}

#[tokio::test]
async fn add_rejects_unknown_meal() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(cli(&dir.path().join("e.json"), &["add", "soup", "--meal", "brunch"]), UtcOffset::UTC, NOW)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Diary(DiaryError::UnknownMealType(meal)) if meal == "brunch"));
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    let err = run(cli(&dir.path().join("e.json"), &["delete", &id.to_string()]), UtcOffset::UTC, NOW)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn json_output_for_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("e.json");
    let text = run(cli(&path, &["--json", "calendar", "--month", "2024-02"]), UtcOffset::UTC, NOW)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["grid"]["year"], 2024);
    assert_eq!(value["selected"], "2024-03-04");
    assert_eq!(value["entries"], serde_json::json!([]));
}

#[tokio::test]
async fn ping_requires_api_url() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(cli(&dir.path().join("e.json"), &["ping"]), UtcOffset::UTC, NOW).await.unwrap_err();
    assert!(matches!(err, CliError::MissingApiUrl));
}
