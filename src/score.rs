const MARKER: &str = "quality score";

/// Find the first "Quality Score: N" line in a report and return N when it lies in 0..=100.
///
/// The marker is matched case-insensitively. A `(0-100)` hint between marker and colon is
/// skipped, as is whitespace after the colon. Mentions of the marker that are not followed by
/// a score are passed over.
pub fn quality_score(report: &str) -> Option<u8> {
    let lower = report.to_ascii_lowercase();
    lower
        .match_indices(MARKER)
        .find_map(|(at, _)| score_after(&report[at + MARKER.len()..]))
}

fn score_after(rest: &str) -> Option<u8> {
    let colon = rest.find(':')?;
    // Only a short parenthesised hint may sit between the marker and the colon.
    if colon > 12 || rest[..colon].contains('\n') {
        return None;
    }

    let bytes = rest[colon + 1..].trim_start().as_bytes();
    let mut value: u32 = 0;
    let mut found_digit = false;
    for b in bytes {
        if !b.is_ascii_digit() {
            break;
        }
        found_digit = true;
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }

    if !found_digit || value > 100 {
        return None;
    }
    u8::try_from(value).ok()
}
