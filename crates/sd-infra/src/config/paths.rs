use std::path::PathBuf;

/// Expands a leading `~` and any `$VAR` / `${VAR}` references.
///
/// `lookup` resolves variable names; `~` resolves through `HOME` (or
/// `USERPROFILE`). Unknown variables are left in place untouched.
pub fn expand_path<F>(raw: &str, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let with_home = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            match lookup("HOME").or_else(|| lookup("USERPROFILE")) {
                Some(home) => format!("{home}{rest}"),
                None => raw.to_string(),
            }
        }
        _ => raw.to_string(),
    };
    PathBuf::from(expand_vars(&with_home, &lookup))
}

fn expand_vars<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn expands_home_prefix() {
        let lookup = env(&[("HOME", "/home/ada")]);
        assert_eq!(expand_path("~/snips", &lookup), PathBuf::from("/home/ada/snips"));
        assert_eq!(expand_path("~", &lookup), PathBuf::from("/home/ada"));
        assert_eq!(expand_path("~bob/x", &lookup), PathBuf::from("~bob/x"));
    }

    #[test]
    fn expands_plain_and_braced_variables() {
        let lookup = env(&[("DATA", "/srv/data"), ("USER", "ada")]);
        assert_eq!(
            expand_path("$DATA/${USER}_snips", &lookup),
            PathBuf::from("/srv/data/ada_snips")
        );
    }

    #[test]
    fn leaves_unknown_and_malformed_references() {
        let lookup = env(&[]);
        assert_eq!(expand_path("$NOPE/x", &lookup), PathBuf::from("$NOPE/x"));
        assert_eq!(expand_path("${OPEN/x", &lookup), PathBuf::from("${OPEN/x"));
        assert_eq!(expand_path("cost$", &lookup), PathBuf::from("cost$"));
    }
}
