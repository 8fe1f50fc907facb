//! Reference layout templates.
//!
//! A layout is the right-hand side of a `type=template` line in the `LAYOUT`
//! section, e.g.
//!
//! ```text
//! \author (\year). <i>\title</i>\begin{volume}, \volume\end{volume}.
//! ```
//!
//! The template is parsed into [`LayoutToken`]s once, at style load time.
//! Formatter names in `\format[..]{..}` are kept but not interpreted here;
//! a full renderer plugs in through [`LayoutRenderer`].

/// One piece of a parsed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutToken {
    /// Text copied to the output as-is, markup included.
    Literal(String),
    /// `\field` or `\format[A,B]{\field}`.
    Field {
        name: String,
        formatters: Vec<String>,
    },
    /// `\begin{field} ... \end{field}`: rendered only when `field` is non-empty.
    Group {
        field: String,
        children: Vec<LayoutToken>,
    },
    /// `\t`
    Tab,
}

/// A parsed layout together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTemplate {
    source: String,
    tokens: Vec<LayoutToken>,
}

/// Read access to the fields of one bibliographic record.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<String>;
}

/// Renders a layout for one record.
pub trait LayoutRenderer {
    fn render(&self, layout: &LayoutTemplate, fields: &dyn FieldSource) -> String;
}

/// Renderer that substitutes raw field values and ignores formatter chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl LayoutRenderer for PlainRenderer {
    fn render(&self, layout: &LayoutTemplate, fields: &dyn FieldSource) -> String {
        let mut out = String::new();
        render_tokens(&layout.tokens, fields, &mut out);
        out
    }
}

fn render_tokens(tokens: &[LayoutToken], fields: &dyn FieldSource, out: &mut String) {
    for token in tokens {
        match token {
            LayoutToken::Literal(text) => out.push_str(text),
            LayoutToken::Tab => out.push('\t'),
            LayoutToken::Field { name, .. } => {
                if let Some(value) = fields.field(name) {
                    out.push_str(&value);
                }
            }
            LayoutToken::Group { field, children } => {
                let present = fields.field(field).is_some_and(|v| !v.trim().is_empty());
                if present {
                    render_tokens(children, fields, out);
                }
            }
        }
    }
}

impl LayoutTemplate {
    /// Parse a layout. Parsing never fails: anything that is not a
    /// recognized command is literal text, and unclosed groups end at the
    /// end of the template.
    pub fn parse(source: &str) -> LayoutTemplate {
        LayoutTemplate {
            source: source.to_string(),
            tokens: TemplateParser::new(source).parse(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[LayoutToken] {
        &self.tokens
    }

    /// Names of every field referenced by this layout, in order of first use.
    pub fn field_names(&self) -> Vec<&str> {
        fn collect<'a>(tokens: &'a [LayoutToken], names: &mut Vec<&'a str>) {
            for token in tokens {
                match token {
                    LayoutToken::Field { name, .. } => {
                        if !names.contains(&name.as_str()) {
                            names.push(name);
                        }
                    }
                    LayoutToken::Group { field, children } => {
                        if !names.contains(&field.as_str()) {
                            names.push(field);
                        }
                        collect(children, names);
                    }
                    _ => {}
                }
            }
        }
        let mut names = Vec::new();
        collect(&self.tokens, &mut names);
        names
    }

    /// Render with [`PlainRenderer`].
    pub fn render(&self, fields: &dyn FieldSource) -> String {
        PlainRenderer.render(self, fields)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Frame {
    field: Option<String>,
    tokens: Vec<LayoutToken>,
}

struct TemplateParser<'a> {
    rest: &'a str,
    stack: Vec<Frame>,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str) -> Self {
        TemplateParser {
            rest: source,
            stack: vec![Frame {
                field: None,
                tokens: Vec::new(),
            }],
        }
    }

    fn parse(mut self) -> Vec<LayoutToken> {
        while let Some(c) = self.rest.chars().next() {
            if c == '\\' {
                self.rest = &self.rest[1..];
                self.command();
            } else {
                self.rest = &self.rest[c.len_utf8()..];
                self.push_char(c);
            }
        }
        while self.stack.len() > 1 {
            self.close_group();
        }
        self.stack.pop().map(|f| f.tokens).unwrap_or_default()
    }

    fn current(&mut self) -> &mut Vec<LayoutToken> {
        if self.stack.is_empty() {
            self.stack.push(Frame {
                field: None,
                tokens: Vec::new(),
            });
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last].tokens
    }

    fn push_char(&mut self, c: char) {
        let tokens = self.current();
        if let Some(LayoutToken::Literal(text)) = tokens.last_mut() {
            text.push(c);
        } else {
            tokens.push(LayoutToken::Literal(c.to_string()));
        }
    }

    fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push_char(c);
        }
    }

    fn take_name(&mut self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| !is_name_char(c))
            .unwrap_or(self.rest.len());
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        name
    }

    /// Consume `{name}` and return `name`, or leave input untouched.
    fn take_braced(&mut self) -> Option<&'a str> {
        let inner = self.rest.strip_prefix('{')?;
        let close = inner.find('}')?;
        self.rest = &inner[close + 1..];
        Some(inner[..close].trim())
    }

    fn command(&mut self) {
        if let Some(rest) = self.rest.strip_prefix('\\') {
            self.rest = rest;
            self.push_char('\\');
            return;
        }
        let name = self.take_name();
        match name {
            "" => self.push_char('\\'),
            "t" => self.current().push(LayoutToken::Tab),
            "begin" => match self.take_braced() {
                Some(field) => self.stack.push(Frame {
                    field: Some(field.to_lowercase()),
                    tokens: Vec::new(),
                }),
                None => self.push_str("\\begin"),
            },
            "end" => match self.take_braced() {
                Some(field) if self.open_group_is(field) => self.close_group(),
                Some(field) => self.push_str(&format!("\\end{{{}}}", field)),
                None => self.push_str("\\end"),
            },
            "format" => self.format_command(),
            field => self.current().push(LayoutToken::Field {
                name: field.to_lowercase(),
                formatters: Vec::new(),
            }),
        }
    }

    fn open_group_is(&self, field: &str) -> bool {
        self.stack.len() > 1
            && self
                .stack
                .last()
                .and_then(|f| f.field.as_deref())
                .is_some_and(|open| open.eq_ignore_ascii_case(field))
    }

    fn close_group(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let field = frame.field.unwrap_or_default();
            self.current().push(LayoutToken::Group {
                field,
                children: frame.tokens,
            });
        }
    }

    /// `\format[A,B]{\field}`; the bracket part is optional.
    fn format_command(&mut self) {
        let start = self.rest;
        let mut formatters = Vec::new();
        if let Some(inner) = self.rest.strip_prefix('[') {
            let Some(close) = inner.find(']') else {
                self.push_str("\\format");
                return;
            };
            formatters = split_formatters(&inner[..close]);
            self.rest = &inner[close + 1..];
        }
        match self.take_braced() {
            Some(arg) => {
                let name = arg.trim_start_matches('\\');
                if !name.is_empty() && name.chars().all(is_name_char) {
                    self.current().push(LayoutToken::Field {
                        name: name.to_lowercase(),
                        formatters,
                    });
                } else {
                    self.push_str(&format!("{{{}}}", arg));
                }
            }
            None => {
                self.rest = start;
                self.push_str("\\format");
            }
        }
    }
}

/// Split a formatter list at commas that are not inside parentheses.
fn split_formatters(list: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                names.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    names.push(current.trim().to_string());
    names.retain(|n| !n.is_empty());
    names
}
