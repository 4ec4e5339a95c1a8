//! Matching option tokens against the grammar.
//!
//! A fragment (the token without its `-` or `--` prefix) resolves to an
//! option by exact name first, then by the longest declared name it starts
//! with. The prefix form supports attached syntax: `--level=3`, `-c=EUR`,
//! and properties such as `-Dkey=value`.

use optline_core::OptionSpec;

/// An option matched by [`resolve_long`] or [`resolve_short`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// Index of the option in the grammar.
    pub index: usize,
    /// Byte length of the matched name within the fragment.
    pub name_len: usize,
    /// Value attached with `=`, for non-property options.
    pub attached: Option<String>,
}

/// Resolves the text after `--` against long names.
pub(crate) fn resolve_long(options: &[OptionSpec], fragment: &str) -> Option<Resolved> {
    resolve(options, fragment, |o| Some(o.name.clone()))
}

/// Resolves the text after `-` against short names.
pub(crate) fn resolve_short(options: &[OptionSpec], fragment: &str) -> Option<Resolved> {
    resolve(options, fragment, |o| o.short_name.map(String::from))
}

fn resolve(
    options: &[OptionSpec],
    fragment: &str,
    name_of: impl Fn(&OptionSpec) -> Option<String>,
) -> Option<Resolved> {
    if let Some(index) = options
        .iter()
        .position(|o| name_of(o).as_deref() == Some(fragment))
    {
        return Some(Resolved {
            index,
            name_len: fragment.len(),
            attached: None,
        });
    }

    let (index, name) = options
        .iter()
        .enumerate()
        .filter_map(|(index, o)| name_of(o).map(|name| (index, name)))
        .filter(|(_, name)| !name.is_empty() && fragment.starts_with(name.as_str()))
        .max_by_key(|(_, name)| name.len())?;

    // Properties carry `key=value` after the name; the scanner splits it.
    if options[index].is_property() {
        return Some(Resolved {
            index,
            name_len: name.len(),
            attached: None,
        });
    }

    match fragment[name.len()..].strip_prefix('=') {
        Some(value) if !value.is_empty() => Some(Resolved {
            index,
            name_len: name.len(),
            attached: Some(value.to_string()),
        }),
        _ => None,
    }
}
