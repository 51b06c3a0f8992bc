//! Email templates with `{{placeholder}}` substitution.

use std::path::Path;

/// Replaces every `{{key}}` in `text` with its value.
///
/// Values are inserted literally and never scanned again, so the result does
/// not depend on the order of `vars`. Placeholders without a matching key are
/// left untouched.
pub fn render<K, V>(text: &str, vars: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let value = candidate[2..].find("}}").and_then(|end| {
            let key = &candidate[2..2 + end];
            vars.iter()
                .find(|(k, _)| AsRef::<str>::as_ref(k) == key)
                .map(|(_, v)| (AsRef::<str>::as_ref(v), end + 4))
        });

        match value {
            Some((value, consumed)) => {
                result.push_str(value);
                rest = &candidate[consumed..];
            }
            None => {
                // Not a known placeholder, keep one brace and rescan
                result.push('{');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Reads `<dir>/<name>.html` and renders it with `vars`.
///
/// The file is read on every call. Returns `None` if it cannot be read.
pub async fn load_email_template<K, V>(
    dir: impl AsRef<Path>,
    name: &str,
    vars: &[(K, V)],
) -> Option<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let path = dir.as_ref().join(format!("{name}.html"));

    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => Some(render(&contents, vars)),
        Err(e) => {
            tracing::error!("Error loading template {} from {}: {e}", name, path.display());
            None
        }
    }
}
