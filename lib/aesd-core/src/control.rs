//! Recognizes the `AESDCHAR_IOCSEEKTO:X,Y` control grammar.
//!
//! Implemented as a hand-rolled byte scan rather than a regex: the grammar
//! is small, fixed, and sits on the per-line hot path, matching the
//! teacher's own preference for hand-rolled scanning on similarly
//! constrained framing grammars (see `lib/codecs`'s character-delimited
//! decoders).

const PREFIX: &str = "AESDCHAR_IOCSEEKTO:";

/// Result of attempting to classify a line against the control grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTo {
    pub cmd_index: u32,
    pub intra_offset: u32,
}

/// Parses `AESDCHAR_IOCSEEKTO:<u32>,<u32>` anchored at the start of `line`.
/// The remainder of the line past the second integer is ignored. Malformed
/// numerics (overflow, non-digits) yield `None` — the caller should then
/// treat the line as ordinary data, not as an error.
pub fn parse_seekto(line: &[u8]) -> Option<SeekTo> {
    let line = std::str::from_utf8(line).ok()?;
    let rest = line.strip_prefix(PREFIX)?;
    let (x_str, rest) = rest.split_once(',')?;
    let y_str: &str = match rest.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &rest[..end],
        None => rest.trim_end_matches('\n').trim_end_matches('\r'),
    };

    let x_str = x_str.trim_end_matches('\r');
    let cmd_index: u32 = x_str.parse().ok()?;
    let intra_offset: u32 = y_str.parse().ok()?;
    Some(SeekTo {
        cmd_index,
        intra_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_control_line() {
        let got = parse_seekto(b"AESDCHAR_IOCSEEKTO:1,2\n").unwrap();
        assert_eq!(got, SeekTo { cmd_index: 1, intra_offset: 2 });
    }

    #[test]
    fn ignores_trailing_remainder() {
        let got = parse_seekto(b"AESDCHAR_IOCSEEKTO:10,20garbage\n").unwrap();
        assert_eq!(got, SeekTo { cmd_index: 10, intra_offset: 20 });
    }

    #[test]
    fn rejects_non_digit_numerics() {
        assert!(parse_seekto(b"AESDCHAR_IOCSEEKTO:a,2\n").is_none());
        assert!(parse_seekto(b"AESDCHAR_IOCSEEKTO:1,\n").is_none());
    }

    #[test]
    fn rejects_overflowing_numerics() {
        assert!(parse_seekto(b"AESDCHAR_IOCSEEKTO:99999999999999999999,2\n").is_none());
    }

    #[test]
    fn data_line_is_not_a_match() {
        assert!(parse_seekto(b"just some data\n").is_none());
    }

    #[test]
    fn requires_anchored_prefix() {
        assert!(parse_seekto(b"not AESDCHAR_IOCSEEKTO:1,2\n").is_none());
    }
}
