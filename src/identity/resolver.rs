/// Display name resolution from heterogeneous OIDC claims
///
/// Identity providers fill the standard claims very differently (as of
/// 2024-09 Azure only sends `name` as "First Last" plus an email in
/// `preferred_username`). Each half of the display name is picked by an
/// ordered list of rules; the first rule that yields a value wins and the
/// last rule of each list always yields one.
use super::claims::ParsedClaims;
use tracing::trace;

/// Inputs shared by every rule
pub(crate) struct NameInput<'a> {
    /// The claim `sub` when present, otherwise the stored subject
    subject: &'a str,
    claims: &'a ParsedClaims,
    /// `name` split on single spaces, trailing empty parts dropped
    name_parts: Vec<&'a str>,
}

impl<'a> NameInput<'a> {
    pub(crate) fn new(subject: &'a str, claims: &'a ParsedClaims) -> Self {
        Self {
            subject: claims.sub.as_deref().unwrap_or(subject),
            claims,
            name_parts: claims.name.as_deref().map(split_name).unwrap_or_default(),
        }
    }

    /// Name parts, only when `name` holds at least two of them
    fn multi_part_name(&self) -> Option<&[&'a str]> {
        (self.name_parts.len() >= 2).then_some(self.name_parts.as_slice())
    }
}

type Extractor = for<'a, 'b> fn(&'b NameInput<'a>) -> Option<&'a str>;

/// One step of a fallback chain
pub(crate) struct NameRule {
    pub(crate) label: &'static str,
    extract: Extractor,
}

impl NameRule {
    pub(crate) fn apply<'a>(&self, input: &NameInput<'a>) -> Option<&'a str> {
        (self.extract)(input)
    }
}

pub(crate) const FIRST_NAME_RULES: &[NameRule] = &[
    NameRule { label: "given_name", extract: given_name },
    NameRule { label: "first_name_part", extract: first_name_part },
    NameRule { label: "nickname", extract: nickname },
    NameRule { label: "preferred_username", extract: preferred_username },
    NameRule { label: "single_name", extract: single_name },
    NameRule { label: "subject_initial", extract: subject_initial },
];

pub(crate) const LAST_NAME_RULES: &[NameRule] = &[
    NameRule { label: "family_name", extract: family_name },
    NameRule { label: "last_name_part", extract: last_name_part },
    NameRule { label: "middle_name", extract: middle_name },
    NameRule { label: "subject", extract: subject },
];

fn given_name<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.claims.given_name.as_deref()
}

fn first_name_part<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.multi_part_name().and_then(|parts| parts.first().copied())
}

fn nickname<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.claims.nickname.as_deref()
}

fn preferred_username<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.claims.preferred_username.as_deref()
}

// A name that is just a copy of the subject would render as "sub sub"
fn single_name<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input
        .claims
        .name
        .as_deref()
        .filter(|name| *name != input.subject)
}

fn subject_initial<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    let end = input.subject.chars().next().map_or(0, char::len_utf8);
    Some(&input.subject[..end])
}

fn family_name<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.claims.family_name.as_deref()
}

fn last_name_part<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.multi_part_name().and_then(|parts| parts.last().copied())
}

fn middle_name<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    input.claims.middle_name.as_deref()
}

fn subject<'a>(input: &NameInput<'a>) -> Option<&'a str> {
    Some(input.subject)
}

/// Split on every single space, keeping inner and leading empty parts
/// but dropping trailing ones.
///
/// `"a  b"` gives `["a", "", "b"]`, `" a"` gives `["", "a"]`, `"a "` gives `["a"]`.
fn split_name(name: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = name.split(' ').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}

fn first_match<'a>(rules: &[NameRule], input: &NameInput<'a>) -> &'a str {
    rules
        .iter()
        .find_map(|rule| {
            let value = rule.apply(input)?;
            trace!("Name part of {} taken from {}", input.subject, rule.label);
            Some(value)
        })
        .unwrap_or_default()
}

/// Resolve the (first name, last name) display pair.
///
/// A `sub` claim overrides `subject` for the fallbacks only.
pub fn resolve(subject: &str, claims: &ParsedClaims) -> (String, String) {
    let input = NameInput::new(subject, claims);
    let first_name = first_match(FIRST_NAME_RULES, &input);
    let last_name = first_match(LAST_NAME_RULES, &input);
    (first_name.to_string(), last_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(pairs: &[(&str, &str)]) -> ParsedClaims {
        let mut claims = ParsedClaims::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "sub" => claims.sub = value,
                "name" => claims.name = value,
                "given_name" => claims.given_name = value,
                "family_name" => claims.family_name = value,
                "middle_name" => claims.middle_name = value,
                "nickname" => claims.nickname = value,
                "preferred_username" => claims.preferred_username = value,
                other => panic!("unknown claim {}", other),
            }
        }
        claims
    }

    fn pair(first: &str, last: &str) -> (String, String) {
        (first.to_string(), last.to_string())
    }

    #[test]
    fn test_full_name_is_split() {
        let c = claims(&[("sub", "sub1"), ("name", "foo bar")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_given_and_family_names_win() {
        let c = claims(&[("sub", "sub1"), ("given_name", "foo"), ("family_name", "bar"), ("name", "no")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));

        let c = claims(&[("sub", "sub1"), ("given_name", "foo"), ("family_name", "bar"), ("name", "oof rab")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));

        let c = claims(&[
            ("sub", "sub1"),
            ("given_name", "foo"),
            ("nickname", "nope"),
            ("preferred_username", "no"),
            ("name", "nooo"),
            ("family_name", "bar"),
            ("middle_name", "nono"),
        ]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_nickname_and_middle_name() {
        let c = claims(&[
            ("sub", "sub1"),
            ("nickname", "foo"),
            ("preferred_username", "nope"),
            ("name", "no"),
            ("middle_name", "bar"),
        ]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_preferred_username() {
        let c = claims(&[("sub", "sub1"), ("preferred_username", "foo"), ("name", "no"), ("family_name", "bar")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_single_part_name() {
        let c = claims(&[("sub", "sub1"), ("name", "foo"), ("family_name", "bar")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_name_equal_to_subject_is_skipped() {
        let c = claims(&[("sub", "sub1"), ("name", "sub1"), ("family_name", "bar")]);
        assert_eq!(resolve("sub1", &c), pair("s", "bar"));
    }

    #[test]
    fn test_subject_fallbacks() {
        let c = claims(&[("sub", "sub1"), ("family_name", "bar")]);
        assert_eq!(resolve("sub1", &c), pair("s", "bar"));

        let c = claims(&[("sub", "sub1")]);
        assert_eq!(resolve("sub1", &c), pair("s", "sub1"));

        assert_eq!(resolve("sub1", &ParsedClaims::default()), pair("s", "sub1"));
    }

    #[test]
    fn test_token_sub_overrides_subject_for_fallbacks() {
        let c = claims(&[("sub", "other")]);
        assert_eq!(resolve("sub1", &c), pair("o", "other"));

        // name matches the stored subject but not the token sub
        let c = claims(&[("sub", "other"), ("name", "sub1")]);
        assert_eq!(resolve("sub1", &c), pair("sub1", "other"));
    }

    #[test]
    fn test_empty_subject() {
        assert_eq!(resolve("", &ParsedClaims::default()), pair("", ""));
    }

    #[test]
    fn test_multibyte_subject_initial() {
        assert_eq!(resolve("élodie", &ParsedClaims::default()), pair("é", "élodie"));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("foo bar"), vec!["foo", "bar"]);
        assert_eq!(split_name("foo  bar"), vec!["foo", "", "bar"]);
        assert_eq!(split_name(" foo"), vec!["", "foo"]);
        assert_eq!(split_name("foo "), vec!["foo"]);
        assert_eq!(split_name("   "), Vec::<&str>::new());
        assert_eq!(split_name(""), Vec::<&str>::new());
        assert_eq!(split_name("Jean Paul Sartre"), vec!["Jean", "Paul", "Sartre"]);
    }

    #[test]
    fn test_consecutive_spaces_yield_outer_parts() {
        let c = claims(&[("sub", "sub1"), ("name", "foo  bar")]);
        assert_eq!(resolve("sub1", &c), pair("foo", "bar"));
    }

    #[test]
    fn test_leading_space_gives_empty_first_name() {
        let c = claims(&[("sub", "sub1"), ("name", " foo")]);
        assert_eq!(resolve("sub1", &c), pair("", "foo"));
    }

    #[test]
    fn test_trailing_space_is_single_part() {
        let c = claims(&[("sub", "sub1"), ("name", "foo ")]);
        assert_eq!(resolve("sub1", &c), pair("foo ", "sub1"));
    }

    #[test]
    fn test_middle_parts_are_ignored() {
        let c = claims(&[("sub", "sub1"), ("name", "Jean Paul Sartre")]);
        assert_eq!(resolve("sub1", &c), pair("Jean", "Sartre"));
    }

    #[test]
    fn test_rules_in_isolation() {
        let c = claims(&[("sub", "sub1"), ("name", "sub1")]);
        let input = NameInput::new("sub1", &c);
        let applied: Vec<_> = FIRST_NAME_RULES
            .iter()
            .map(|rule| (rule.label, rule.apply(&input)))
            .collect();
        assert_eq!(
            applied,
            vec![
                ("given_name", None),
                ("first_name_part", None),
                ("nickname", None),
                ("preferred_username", None),
                ("single_name", None),
                ("subject_initial", Some("s")),
            ]
        );

        let c = claims(&[("name", "a b c"), ("middle_name", "m")]);
        let input = NameInput::new("sub1", &c);
        let applied: Vec<_> = LAST_NAME_RULES
            .iter()
            .map(|rule| (rule.label, rule.apply(&input)))
            .collect();
        assert_eq!(
            applied,
            vec![
                ("family_name", None),
                ("last_name_part", Some("c")),
                ("middle_name", Some("m")),
                ("subject", Some("sub1")),
            ]
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let c = claims(&[("sub", "sub1"), ("name", "foo bar"), ("nickname", "fb")]);
        let first = resolve("sub1", &c);
        for _ in 0..10 {
            assert_eq!(resolve("sub1", &c), first);
        }
    }
}
