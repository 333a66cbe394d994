//! Rendering commands as bash command lines, for logging and for
//! showing what a dry run would execute.

use std::borrow::Cow;

use itertools::Itertools;

const CHARS_NOT_NEEDING_QUOTING: &str = "_:.-+,/=@[]^";

pub fn bash_string_literal(s: &str) -> Cow<'_, str> {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || CHARS_NOT_NEEDING_QUOTING.contains(c))
    {
        s.into()
    } else {
        let mut ss = String::with_capacity(s.len() + 2);
        ss.push('\'');
        for c in s.chars() {
            if c == '\'' {
                ss.push_str("'\\''");
            } else {
                ss.push(c);
            }
        }
        ss.push('\'');
        ss.into()
    }
}

/// `NAME=value ... program arg ...`, every part quoted as needed.
pub fn bash_command_line<'s>(
    env: impl IntoIterator<Item = (&'s str, &'s str)>,
    program: &str,
    args: impl IntoIterator<Item = impl AsRef<str>>,
) -> String {
    let assignments = env
        .into_iter()
        .map(|(name, val)| format!("{name}={}", bash_string_literal(val)));
    let command = std::iter::once(bash_string_literal(program).into_owned()).chain(
        args.into_iter()
            .map(|arg| bash_string_literal(arg.as_ref()).into_owned()),
    );
    assignments.chain(command).join(" ")
}
