//! Decoding of the LaTeX escapes commonly found in BibTeX fields.

/// (base letter, composed character) pairs for each accent command.
#[rustfmt::skip]
fn accent_table(accent: char) -> &'static [(char, char)] {
    match accent {
        '"' => &[
            ('a', 'ä'), ('e', 'ë'), ('i', 'ï'), ('o', 'ö'), ('u', 'ü'), ('y', 'ÿ'),
            ('A', 'Ä'), ('E', 'Ë'), ('I', 'Ï'), ('O', 'Ö'), ('U', 'Ü'), ('Y', 'Ÿ'),
        ],
        '\'' => &[
            ('a', 'á'), ('e', 'é'), ('i', 'í'), ('o', 'ó'), ('u', 'ú'), ('y', 'ý'),
            ('A', 'Á'), ('E', 'É'), ('I', 'Í'), ('O', 'Ó'), ('U', 'Ú'), ('Y', 'Ý'),
            ('c', 'ć'), ('C', 'Ć'), ('n', 'ń'), ('N', 'Ń'), ('s', 'ś'), ('S', 'Ś'),
            ('z', 'ź'), ('Z', 'Ź'),
        ],
        '`' => &[
            ('a', 'à'), ('e', 'è'), ('i', 'ì'), ('o', 'ò'), ('u', 'ù'),
            ('A', 'À'), ('E', 'È'), ('I', 'Ì'), ('O', 'Ò'), ('U', 'Ù'),
        ],
        '^' => &[
            ('a', 'â'), ('e', 'ê'), ('i', 'î'), ('o', 'ô'), ('u', 'û'),
            ('A', 'Â'), ('E', 'Ê'), ('I', 'Î'), ('O', 'Ô'), ('U', 'Û'),
        ],
        '~' => &[
            ('a', 'ã'), ('n', 'ñ'), ('o', 'õ'), ('A', 'Ã'), ('N', 'Ñ'), ('O', 'Õ'),
        ],
        '=' => &[
            ('a', 'ā'), ('e', 'ē'), ('i', 'ī'), ('o', 'ō'), ('u', 'ū'),
            ('A', 'Ā'), ('E', 'Ē'), ('I', 'Ī'), ('O', 'Ō'), ('U', 'Ū'),
        ],
        '.' => &[('z', 'ż'), ('Z', 'Ż'), ('e', 'ė'), ('E', 'Ė')],
        'c' => &[('c', 'ç'), ('C', 'Ç'), ('s', 'ş'), ('S', 'Ş')],
        'v' => &[
            ('c', 'č'), ('C', 'Č'), ('s', 'š'), ('S', 'Š'), ('z', 'ž'), ('Z', 'Ž'),
            ('r', 'ř'), ('R', 'Ř'), ('e', 'ě'), ('E', 'Ě'), ('n', 'ň'), ('N', 'Ň'),
        ],
        'u' => &[('a', 'ă'), ('A', 'Ă'), ('g', 'ğ'), ('G', 'Ğ')],
        'H' => &[('o', 'ő'), ('O', 'Ő'), ('u', 'ű'), ('U', 'Ű')],
        'k' => &[('a', 'ą'), ('A', 'Ą'), ('e', 'ę'), ('E', 'Ę')],
        'r' => &[('a', 'å'), ('A', 'Å'), ('u', 'ů'), ('U', 'Ů')],
        _ => &[],
    }
}

fn symbol(command: &str) -> Option<&'static str> {
    Some(match command {
        "ss" => "ß",
        "o" => "ø",
        "O" => "Ø",
        "aa" => "å",
        "AA" => "Å",
        "ae" => "æ",
        "AE" => "Æ",
        "oe" => "œ",
        "OE" => "Œ",
        "l" => "ł",
        "L" => "Ł",
        "i" => "ı",
        "j" => "ȷ",
        _ => return None,
    })
}

fn compose(accent: char, base: char) -> Option<char> {
    accent_table(accent)
        .iter()
        .find(|(b, _)| *b == base)
        .map(|(_, composed)| *composed)
}

/// Decode accent commands and special characters, and drop grouping braces.
///
/// ```
/// use citemark::latex::to_unicode;
///
/// assert_eq!(to_unicode(r#"Bostr\"{o}m"#), "Boström");
/// assert_eq!(to_unicode(r"{\'E}mile {NASA}"), "Émile NASA");
/// ```
pub fn to_unicode(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' | '}' => i += 1,
            '\\' => i = command(&chars, i + 1, &mut out),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Decode the command starting at `chars[i]` (just after the backslash) and
/// return the index after it.
fn command(chars: &[char], i: usize, out: &mut String) -> usize {
    let Some(&first) = chars.get(i) else {
        out.push('\\');
        return i;
    };

    if "\"'`^~=.".contains(first) {
        return accent(chars, first, i + 1, out);
    }

    if !first.is_ascii_alphabetic() {
        // \& \% \$ \_ \# \{ \} and friends
        out.push(first);
        return i + 1;
    }

    let end = chars[i..]
        .iter()
        .position(|c| !c.is_ascii_alphabetic())
        .map_or(chars.len(), |p| i + p);
    let name: String = chars[i..end].iter().collect();

    if name.len() == 1 && !accent_table(first).is_empty() {
        let mut next = end;
        while chars.get(next) == Some(&' ') {
            next += 1;
        }
        return accent(chars, first, next, out);
    }

    if let Some(s) = symbol(&name) {
        out.push_str(s);
        let mut next = end;
        if chars.get(next) == Some(&'{') && chars.get(next + 1) == Some(&'}') {
            next += 2;
        } else if chars.get(next) == Some(&' ') {
            next += 1;
        }
        return next;
    }

    // Unknown commands such as \emph vanish; their argument stays as text.
    if chars.get(end) == Some(&' ') {
        end + 1
    } else {
        end
    }
}

/// Apply `accent` to the argument at `chars[i]`: `{x}`, `{\i}` or `x`.
fn accent(chars: &[char], accent: char, i: usize, out: &mut String) -> usize {
    let (base, next) = match chars.get(i) {
        Some('{') => {
            let Some(close) = chars[i..].iter().position(|&c| c == '}') else {
                return i;
            };
            let inner: String = chars[i + 1..i + close].iter().collect();
            let base = match inner.trim() {
                "\\i" => Some('i'),
                "\\j" => Some('j'),
                s => {
                    let mut it = s.chars();
                    match (it.next(), it.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                }
            };
            match base {
                Some(b) => (b, i + close + 1),
                None => {
                    out.push_str(&to_unicode(&inner));
                    return i + close + 1;
                }
            }
        }
        Some('\\') if chars.get(i + 1) == Some(&'i') => ('i', i + 2),
        Some(&c) if c.is_alphabetic() => (c, i + 1),
        _ => return i,
    };
    match compose(accent, base) {
        Some(c) => out.push(c),
        None => out.push(base),
    }
    next
}
