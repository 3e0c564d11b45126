/// Redact user-provided scalars from `serde` / `serde_json` error display strings.
///
/// Error messages such as `invalid type: string "...", expected u16` or
/// `unknown field `...`` can echo launch arguments and environment values.
/// Every double-quoted substring (escaped quotes included) is replaced with
/// `<redacted>`, as is the first backticked segment. Line/column information
/// and the expected-value lists are kept.
#[must_use]
pub fn sanitize_json_error_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find('"') {
        out.push_str(&rest[..=start]);
        rest = &rest[start + 1..];

        let mut escaped = false;
        let end = rest.char_indices().find_map(|(idx, ch)| match ch {
            _ if escaped => {
                escaped = false;
                None
            }
            '\\' => {
                escaped = true;
                None
            }
            '"' => Some(idx),
            _ => None,
        });

        let Some(end) = end else {
            // Unterminated quote: keep the tail as-is.
            out.push_str(rest);
            return out;
        };
        out.push_str("<redacted>\"");
        rest = &rest[end + 1..];
    }
    out.push_str(rest);

    if let Some(start) = out.find('`') {
        if let Some(len) = out[start + 1..].find('`') {
            out.replace_range(start + 1..start + 1 + len, "<redacted>");
        }
    }

    out
}
