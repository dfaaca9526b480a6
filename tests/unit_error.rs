use std::path::PathBuf;

use tenthousand::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::ConfigNotFound(PathBuf::from("/nope/config.toml"));
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let declined = Error::TaskCreationDeclined("situps".to_string());
    assert_eq!(declined.exit_code(), exit_codes::USER_ERROR);

    let io = Error::Io(std::io::Error::other("disk gone"));
    assert_eq!(io.exit_code(), exit_codes::OPERATION_FAILED);
    assert_ne!(io.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn task_not_found_keeps_suggestions_out_of_message() {
    let err = Error::TaskNotFound {
        name: "pushup".to_string(),
        suggestions: vec!["pushups".to_string()],
    };
    assert_eq!(err.to_string(), "Task not found: pushup");
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert_eq!(json.kind, "user_error");
    let details = json.details.expect("details");
    assert_eq!(details["task"], "pushup");
    assert_eq!(details["suggestions"][0], "pushups");
}

#[test]
fn json_error_includes_code() {
    let err = Error::MalformedTaskFile {
        path: PathBuf::from("/data/2026/dips.csv"),
        line: 4,
        reason: "bad count".to_string(),
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::OPERATION_FAILED);
    assert_eq!(json.kind, "operation_failed");
    assert!(json.message.contains("Malformed task file"));
    assert_eq!(json.details.expect("details")["line"], 4);
}

#[test]
fn total_overflow_is_a_user_error() {
    let err = Error::TotalOverflow("pushups".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains("pushups"));

    let body = serde_json::to_value(JsonError::from(&err)).expect("serialize");
    assert_eq!(body["kind"], "user_error");
    assert_eq!(body["code"], exit_codes::USER_ERROR);
    assert!(body.get("details").is_none());
}
