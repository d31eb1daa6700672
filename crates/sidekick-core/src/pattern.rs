// ── Path globs ──
//
// Views and plugins select resource paths with a tiny glob dialect:
// `**` matches anything, `*` matches anything except `/`. Every other
// character is literal.

use regex::Regex;

/// Compile a path glob into an anchored regex.
///
/// An empty glob behaves like `**`.
pub fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let glob = if glob.is_empty() { "**" } else { glob };

    let mut pattern = String::with_capacity(glob.len() * 2 + 2);
    pattern.push('^');
    let mut rest = glob;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("**") {
            pattern.push_str(".*");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            pattern.push_str("[^/]*");
            rest = tail;
        } else {
            let next = rest.find('*').unwrap_or(rest.len());
            let (literal, tail) = rest.split_at(next);
            pattern.push_str(&regex::escape(literal));
            rest = tail;
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
}

/// Match a path against a glob. Invalid globs never match.
pub fn glob_matches(glob: &str, path: &str) -> bool {
    glob_to_regex(glob).is_ok_and(|re| re.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_star_crosses_segments() {
        assert!(glob_matches("**.json", "/data/nested/query-index.json"));
        assert!(glob_matches("**.json", "/index.json"));
        assert!(!glob_matches("**.json", "/index.jsonp"));
    }

    #[test]
    fn single_star_stays_in_segment() {
        assert!(glob_matches("/blog/*", "/blog/hello"));
        assert!(!glob_matches("/blog/*", "/blog/2024/hello"));
    }

    #[test]
    fn literals_are_escaped() {
        assert!(glob_matches("/a.b", "/a.b"));
        assert!(!glob_matches("/a.b", "/axb"));
    }

    #[test]
    fn empty_glob_matches_everything() {
        assert!(glob_matches("", "/anything/at/all"));
    }
}
