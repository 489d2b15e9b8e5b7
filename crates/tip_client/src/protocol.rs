//! TIP line protocol.
//!
//! ```text
//! client → get/T\n
//! server → 0.0123456\n        (kelvin)
//! server → ERR sensor busy\n  (failure)
//! ```

use crate::error::{ClientError, Result};

/// Read the current temperature in kelvin.
pub const GET_TEMPERATURE: &str = "get/T";

const ERROR_PREFIX: &str = "ERR";

pub fn request_line(command: &str) -> String {
    format!("{command}\n")
}

/// Parse one response line into a float. The value is not range-checked.
pub fn parse_reading(line: &str) -> Result<f64> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(msg) = line.strip_prefix(ERROR_PREFIX) {
        return Err(ClientError::Remote(msg.trim().to_string()));
    }
    let value = line.trim();
    value
        .parse::<f64>()
        .map_err(|_| ClientError::Malformed(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_newline_terminated() {
        assert_eq!(request_line(GET_TEMPERATURE), "get/T\n");
    }

    #[test]
    fn parses_plain_and_crlf_lines() {
        assert_eq!(parse_reading("0.0123456\n").unwrap(), 0.0123456);
        assert_eq!(parse_reading(" 4.2\r\n").unwrap(), 4.2);
        assert_eq!(parse_reading("-0.001").unwrap(), -0.001);
    }

    #[test]
    fn error_line_becomes_remote_error() {
        match parse_reading("ERR sensor busy\n") {
            Err(ClientError::Remote(msg)) => assert_eq!(msg, "sensor busy"),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            parse_reading("hello\n"),
            Err(ClientError::Malformed(s)) if s == "hello"
        ));
        assert!(matches!(parse_reading("\n"), Err(ClientError::Malformed(_))));
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(parse_reading("NaN").unwrap().is_nan());
        assert!(parse_reading("inf").unwrap().is_infinite());
    }
}
