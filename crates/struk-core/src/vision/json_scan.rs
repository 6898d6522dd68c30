//! Balanced-brace scanning for JSON embedded in model replies.

/// Find the first balanced `{...}` region in `text`.
///
/// Model replies can wrap the JSON in prose or code fences, and may
/// contain several brace-like fragments; a greedy first-`{`-to-last-`}`
/// slice would be wrong there. This scan tracks brace depth and skips
/// braces inside string literals (honoring escapes).
pub fn find_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
