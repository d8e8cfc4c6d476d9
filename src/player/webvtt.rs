//! WebVTT parsing
//!
//! The content service converts its SRT files on the fly, so timestamps may
//! still carry a comma before the milliseconds. Blocks that do not parse are
//! skipped rather than failing the whole track.

use crate::error::{PlayerError, PlayerResult};

/// One timed caption
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn is_active_at(&self, position: f64) -> bool {
        self.start <= position && position < self.end
    }
}

/// Parse a WebVTT payload into cues, in file order.
pub fn parse(payload: &[u8]) -> PlayerResult<Vec<Cue>> {
    let text = String::from_utf8_lossy(payload);
    let text = text.trim_start_matches('\u{feff}').replace("\r\n", "\n").replace('\r', "\n");

    let mut blocks = text.split("\n\n").map(|b| b.trim_matches('\n'));

    let header = blocks.next().unwrap_or_default();
    if !header.starts_with("WEBVTT") {
        return Err(PlayerError::CaptionUnavailable("missing WEBVTT header".to_string()));
    }

    let mut cues = Vec::new();
    for block in blocks.filter(|b| !b.trim().is_empty()) {
        if block.starts_with("NOTE") || block.starts_with("STYLE") || block.starts_with("REGION") {
            continue;
        }
        match parse_block(block) {
            Some(cue) => cues.push(cue),
            None => tracing::debug!(block, "Skipping malformed caption block"),
        }
    }

    if cues.is_empty() {
        return Err(PlayerError::CaptionUnavailable("no cues in track".to_string()));
    }
    Ok(cues)
}

fn parse_block(block: &str) -> Option<Cue> {
    let mut lines = block.lines();
    let mut timing = lines.next()?;
    if !timing.contains("-->") {
        // Cue identifier line
        timing = lines.next()?;
    }

    let (start, rest) = timing.split_once("-->")?;
    // Anything after the end timestamp is cue settings
    let end = rest.split_whitespace().next()?;

    let start = parse_timestamp(start.trim())?;
    let end = parse_timestamp(end)?;
    if end <= start {
        return None;
    }

    let text = lines.collect::<Vec<_>>().join("\n");
    Some(Cue::new(start, end, text))
}

/// `hh:mm:ss.ttt` or `mm:ss.ttt`, with `,` accepted in place of `.`
fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.replace(',', ".");
    let parts: Vec<&str> = raw.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u64>().ok()?, m.parse::<u64>().ok()?, *s),
        [m, s] => (0, m.parse::<u64>().ok()?, *s),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    let seconds: f64 = seconds.parse().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let whole = hours.checked_mul(3600)?.checked_add(minutes * 60)?;
    Some(whole as f64 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_track() {
        let vtt = b"WEBVTT\n\n00:00:00.000 --> 00:00:02.000\na\n\n00:00:02.000 --> 00:00:05.000\nb\n";
        let cues = parse(vtt).unwrap();
        assert_eq!(cues, vec![Cue::new(0.0, 2.0, "a"), Cue::new(2.0, 5.0, "b")]);
    }

    #[test]
    fn test_accepts_srt_style_identifiers_and_commas() {
        let vtt = "WEBVTT\n\n1\n00:00:01,500 --> 00:00:03,250\nHello there\n\n2\n00:00:03,250 --> 00:01:00,000\nSecond\nline\n";
        let cues = parse(vtt.as_bytes()).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], Cue::new(1.5, 3.25, "Hello there"));
        assert_eq!(cues[1].text, "Second\nline");
        assert_eq!(cues[1].end, 60.0);
    }

    #[test]
    fn test_short_timestamps_and_settings() {
        let vtt = "WEBVTT - podcast\r\n\r\n01:02.000 --> 01:04.500 align:start position:10%\r\nhi\r\n";
        let cues = parse(vtt.as_bytes()).unwrap();
        assert_eq!(cues, vec![Cue::new(62.0, 64.5, "hi")]);
    }

    #[test]
    fn test_skips_cue_with_overflowing_hours() {
        let vtt = b"WEBVTT\n\n10000000000000000:00:00.000 --> 10000000000000000:00:01.000\nx\n\n00:00:01.000 --> 00:00:02.000\nok\n";
        let cues = parse(vtt).unwrap();
        assert_eq!(cues, vec![Cue::new(1.0, 2.0, "ok")]);
    }

    #[test]
    fn test_skips_notes_and_malformed_blocks() {
        let vtt = "WEBVTT\n\nNOTE generated\n\nbroken --> line\nx\n\n00:00:05.000 --> 00:00:04.000\nbackwards\n\n00:00:06.000 --> 00:00:07.000\nok\n";
        let cues = parse(vtt.as_bytes()).unwrap();
        assert_eq!(cues, vec![Cue::new(6.0, 7.0, "ok")]);
    }

    #[test]
    fn test_missing_header_is_unavailable() {
        let err = parse(b"1\n00:00:01,000 --> 00:00:02,000\nsrt\n").unwrap_err();
        assert!(matches!(err, PlayerError::CaptionUnavailable(_)));
    }

    #[test]
    fn test_header_only_is_unavailable() {
        assert!(parse(b"WEBVTT\n\n").is_err());
    }

    #[test]
    fn test_cue_interval_is_half_open() {
        let cue = Cue::new(2.0, 5.0, "b");
        assert!(cue.is_active_at(2.0));
        assert!(cue.is_active_at(4.999));
        assert!(!cue.is_active_at(5.0));
        assert!(!cue.is_active_at(1.999));
    }
}
