//! Tests for the error system.

use errlens::error::*;

#[test]
fn error_display_is_stable_for_major_variants() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases: Vec<(ErrlensError, &str)> = vec![
        (
            ErrlensError::InvalidArgument("bad-arg".to_string()),
            "Invalid argument: bad-arg",
        ),
        (ErrlensError::Io(io_error), "IO error: disk"),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }

    let err: ErrlensError = serde_error.into();
    assert!(matches!(err, ErrlensError::Serialization(_)));
}

#[test]
fn question_mark_converts_io_errors() {
    fn read_missing() -> Result<String> {
        Ok(std::fs::read_to_string("/definitely/not/here/errlens.toml")?)
    }
    assert!(matches!(read_missing(), Err(ErrlensError::Io(_))));
}
