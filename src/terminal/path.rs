//! Lexical path handling for backslash-separated drive paths.
//!
//! Nothing here touches the tree: `..` and `.` are collapsed textually and
//! existence is checked only when the result is looked up.

pub const SEPARATOR: char = '\\';

/// Splits a path on backslashes, dropping empty segments so repeated
/// separators collapse.
pub fn components(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// `X:\...` form, where the drive token is a single ASCII letter.
pub fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes[2] == SEPARATOR as u8
}

/// A bare drive token such as `C:`.
pub fn is_drive_token(path: &str) -> bool {
    path.ends_with(':')
}

pub fn is_drive_root(path: &str) -> bool {
    components(path).len() == 1
}

/// Renders components back into a path: `C:\` for a lone drive,
/// `C:\a\b` otherwise.
pub fn join_components(parts: &[&str]) -> String {
    match parts {
        [] => String::new(),
        [drive] => format!("{drive}{SEPARATOR}"),
        [drive, rest @ ..] => format!("{drive}{SEPARATOR}{}", rest.join("\\")),
    }
}

/// Rewrites an absolute path without redundant separators.
pub fn canonical(path: &str) -> String {
    join_components(&components(path))
}

/// Resolves `raw` against `cwd` into an absolute path.
///
/// * empty input is the cwd itself
/// * `X:` becomes `X:\`
/// * `X:\...` is returned unchanged
/// * `\...` is taken from the root of the cwd's drive
/// * anything else is appended to the cwd, collapsing `.` and `..`
pub fn normalize(raw: &str, cwd: &str) -> String {
    if raw.is_empty() {
        return cwd.to_string();
    }
    if is_drive_token(raw) {
        return format!("{raw}{SEPARATOR}");
    }
    if is_absolute(raw) {
        return raw.to_string();
    }

    let base = components(cwd);
    let mut parts: Vec<&str> = if raw.starts_with(SEPARATOR) {
        base.into_iter().take(1).collect()
    } else {
        base
    };

    for part in components(raw) {
        match part {
            "." => continue,
            ".." => {
                // the drive itself is never popped
                if parts.len() > 1 {
                    parts.pop();
                }
            }
            name => parts.push(name),
        }
    }

    join_components(&parts)
}

/// Textual parent; `None` for a drive root.
pub fn parent_path(path: &str) -> Option<String> {
    let parts = components(path);
    if parts.len() <= 1 {
        return None;
    }
    Some(join_components(&parts[..parts.len() - 1]))
}

/// Last component of a path below a drive root.
pub fn file_name(path: &str) -> Option<&str> {
    let parts = components(path);
    if parts.len() <= 1 {
        return None;
    }
    parts.last().copied()
}

/// `.` and `..` only ever navigate; they never name an entry.
pub fn is_navigation(name: &str) -> bool {
    name == "." || name == ".."
}
