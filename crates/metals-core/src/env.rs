use std::collections::BTreeMap;

/// Parse `KEY=VALUE` assignments into an environment map.
///
/// The entry is split at the first `=`, so values may contain `=` themselves.
/// An entry without `=` sets `KEY` to the empty string; entries with an empty
/// key are dropped. Later assignments to the same key win.
pub fn parse_env_assignments<S: AsRef<str>>(assignments: &[S]) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (key, value) = assignment.split_once('=').unwrap_or((assignment, ""));
        if key.is_empty() {
            tracing::debug!(target: "metals.env", "skipping environment assignment without a key");
            continue;
        }
        env.insert(key.to_owned(), value.to_owned());
    }
    env
}
