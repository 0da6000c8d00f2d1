//! Filesystem-safe download names.

/// Longest name most filesystems accept (bytes).
pub(crate) const NAME_MAX: usize = 255;

/// Makes a candidate download name safe to create in a single directory.
///
/// Path separators, NUL and control characters become `_` (runs collapsed);
/// leading and trailing dots, spaces and underscores are trimmed; the result
/// is cut to [`NAME_MAX`] bytes on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let c = if matches!(c, '/' | '\\' | '\0') || c.is_control() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| matches!(c, ' ' | '.' | '_'));
    truncate_bytes(trimmed, NAME_MAX).to_string()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub(crate) fn truncate_bytes(s: &str, max: usize) -> &str {
    let mut take = s.len().min(max);
    while !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
