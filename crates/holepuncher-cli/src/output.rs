//! Stdout rendering helpers.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use serde::Serialize;

/// Write a value as indented JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn json_is_indented_with_trailing_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"id": 1})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"id\": 1\n}\n");
    }
}
