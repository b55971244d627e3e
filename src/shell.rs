/// Quote a string so a shell-argument parser reads it back as exactly one word.
///
/// Strings made only of safe characters pass through untouched. Anything else
/// is wrapped in single quotes, with embedded single quotes written as `'\''`.
/// Openbox tokenizes `<command>` with `g_shell_parse_argv`, which honors this
/// form the same way a POSIX shell does.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(is_safe) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c)
}
