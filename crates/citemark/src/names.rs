//! BibTeX author-field parsing.
//!
//! Supports the three BibTeX name forms, `First von Last`, `von Last, First`
//! and `von Last, Jr, First`, joined by `and`. Text inside braces is never
//! split, so `{Barnes and Noble}` is a single corporate name.

use crate::latex::to_unicode;

/// One parsed name. Every part is already decoded to Unicode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub first: Option<String>,
    pub von: Option<String>,
    pub last: Option<String>,
    pub jr: Option<String>,
}

impl Author {
    /// Surname with its particle, e.g. `von Beta`. Empty when there is no
    /// surname.
    pub fn last_name_with_von(&self) -> String {
        match (&self.von, &self.last) {
            (Some(von), Some(last)) => format!("{} {}", von, last),
            (Some(von), None) => von.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorList {
    authors: Vec<Author>,
}

impl AuthorList {
    pub fn parse(field: &str) -> AuthorList {
        let words = split_words(field);
        let authors = words
            .split(|w| w.eq_ignore_ascii_case("and"))
            .filter(|name| !name.is_empty())
            .map(parse_name)
            .collect();
        AuthorList { authors }
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Author> {
        self.authors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter()
    }
}

/// Split at whitespace outside braces. A comma outside braces is its own word.
fn split_words(field: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in field.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                words.push(",".to_string());
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// A word counts as lower case when its first letter outside braces is.
/// Words that start with a brace group are treated as upper case, except for
/// special characters like `{\"u}ber`.
fn is_von_word(word: &str) -> bool {
    if let Some(rest) = word.strip_prefix("{\\") {
        let decoded = to_unicode(&format!("{{\\{}", rest));
        return decoded.chars().next().is_some_and(|c| c.is_lowercase());
    }
    if word.starts_with('{') {
        return false;
    }
    word.chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(|c| c.is_lowercase())
}

fn join(words: &[String]) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    let decoded = to_unicode(&words.join(" "));
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_name(words: &[String]) -> Author {
    let parts: Vec<&[String]> = words.split(|w| w == ",").collect();
    match parts.as_slice() {
        [single] => parse_first_von_last(single),
        [von_last, first] => {
            let (von, last) = split_von_last(von_last);
            Author {
                first: join(first),
                von: join(von),
                last: join(last),
                jr: None,
            }
        }
        [von_last, jr, first, ..] => {
            let (von, last) = split_von_last(von_last);
            Author {
                first: join(first),
                von: join(von),
                last: join(last),
                jr: join(jr),
            }
        }
        [] => Author::default(),
    }
}

/// `First von Last`: the von part runs from the first to the last lower-case
/// word before the final word.
fn parse_first_von_last(words: &[String]) -> Author {
    let Some((last_word, rest)) = words.split_last() else {
        return Author::default();
    };
    let von_start = rest.iter().position(|w| is_von_word(w));
    match von_start {
        Some(start) => {
            let von_end = rest
                .iter()
                .rposition(|w| is_von_word(w))
                .map_or(start, |e| e + 1);
            Author {
                first: join(&rest[..start]),
                von: join(&rest[start..von_end]),
                last: join(&words[von_end..]),
                jr: None,
            }
        }
        None => Author {
            first: join(rest),
            von: None,
            last: join(std::slice::from_ref(last_word)),
            jr: None,
        },
    }
}

/// `von Last`: leading lower-case words, never including the final word.
fn split_von_last(words: &[String]) -> (&[String], &[String]) {
    if words.is_empty() {
        return (words, words);
    }
    let limit = words.len() - 1;
    let von_len = words[..limit]
        .iter()
        .rposition(|w| is_von_word(w))
        .map_or(0, |p| p + 1);
    words.split_at(von_len)
}
