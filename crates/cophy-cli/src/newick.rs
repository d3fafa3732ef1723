//! A small Newick parser and writer, extended with NHX-like bracketed
//! annotations (`[&key=value,...]`) carrying host/contents/sampling data.
//!
//! Grounded in `examples/original_source/src/superrec2/utils/newick.py`,
//! which this module keeps the shape of: a single recursive-descent pass
//! over the text producing a label/annotation tree, lowered afterward into
//! either a [`HostTree`] or an associate [`Node`] by the caller (the parser
//! itself doesn't know which kind of tree it's building).

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use cophy_core::event::{Associate, Contents};
use cophy_core::host::{Host, HostTree};
use cophy_core::tree::{Edge, Node};

/// One parsed Newick node before it is lowered into a host or associate
/// tree: a label, its bracketed annotations, and its children.
struct Parsed {
    label: Option<String>,
    annotations: BTreeMap<String, String>,
    children: Vec<Parsed>,
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn parse_tree(&mut self) -> Result<Parsed> {
        self.skip_whitespace();
        let root = self.parse_subtree()?;
        self.skip_whitespace();
        if self.chars.peek() == Some(&';') {
            self.chars.next();
        }
        Ok(root)
    }

    fn parse_subtree(&mut self) -> Result<Parsed> {
        self.skip_whitespace();
        let children = if self.chars.peek() == Some(&'(') {
            self.chars.next();
            let mut kids = vec![self.parse_subtree()?];
            self.skip_whitespace();
            while self.chars.peek() == Some(&',') {
                self.chars.next();
                kids.push(self.parse_subtree()?);
                self.skip_whitespace();
            }
            if self.chars.next() != Some(')') {
                bail!("expected ')' closing an internal node");
            }
            kids
        } else {
            Vec::new()
        };

        let label = self.parse_label();
        let annotations = self.parse_annotations()?;

        Ok(Parsed {
            label,
            annotations,
            children,
        })
    }

    fn parse_label(&mut self) -> Option<String> {
        self.skip_whitespace();
        let mut label = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '(' || c == ')' || c == ',' || c == ';' || c == '[' || c.is_whitespace() {
                break;
            }
            label.push(c);
            self.chars.next();
        }
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }

    fn parse_annotations(&mut self) -> Result<BTreeMap<String, String>> {
        self.skip_whitespace();
        let mut out = BTreeMap::new();
        if self.chars.peek() != Some(&'[') {
            return Ok(out);
        }
        self.chars.next();
        if self.chars.peek() == Some(&'&') {
            self.chars.next();
        }
        loop {
            let key = self.take_until(|c| c == '=' || c == ',' || c == ']');
            if self.chars.peek() == Some(&'=') {
                self.chars.next();
                let value = self.parse_annotation_value()?;
                out.insert(key, value);
            } else if !key.is_empty() {
                out.insert(key, String::new());
            }
            match self.chars.peek() {
                Some(',') => {
                    self.chars.next();
                }
                Some(']') => {
                    self.chars.next();
                    break;
                }
                _ => bail!("unterminated annotation block"),
            }
        }
        Ok(out)
    }

    /// A value is either `{...}` (unordered set), `(...)` (ordered tuple),
    /// or a bare token running up to the next `,` or `]`.
    fn parse_annotation_value(&mut self) -> Result<String> {
        match self.chars.peek() {
            Some('{') => self.take_balanced('{', '}'),
            Some('(') => self.take_balanced('(', ')'),
            _ => Ok(self.take_until(|c| c == ',' || c == ']')),
        }
    }

    fn take_balanced(&mut self, open: char, close: char) -> Result<String> {
        let mut depth = 0;
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == open => {
                    depth += 1;
                    out.push(c);
                }
                Some(c) if c == close => {
                    depth -= 1;
                    out.push(c);
                    if depth == 0 {
                        return Ok(out);
                    }
                }
                Some(c) => out.push(c),
                None => bail!("unterminated '{open}...{close}' value"),
            }
        }
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if stop(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }
}

/// Parse a Newick string into a [`HostTree`], interpreting the `sampled`
/// annotation (defaulting to `true`).
pub fn parse_host_tree(input: &str) -> Result<HostTree> {
    let parsed = Parser::new(input).parse_tree().context("parsing host_tree Newick")?;
    lower_host(&parsed)
}

fn lower_host(parsed: &Parsed) -> Result<HostTree> {
    let name = parsed
        .label
        .clone()
        .ok_or_else(|| anyhow::anyhow!("every host tree node must be named"))?;
    let mut host = if parsed.annotations.get("sampled").is_some_and(|v| v == "false") {
        Host::unsampled(name)
    } else {
        Host::new(name)
    };
    for (key, value) in &parsed.annotations {
        if key != "sampled" {
            host.props.insert(key.clone(), value.clone());
        }
    }

    let mut children = Vec::with_capacity(parsed.children.len());
    for child in &parsed.children {
        children.push(Edge {
            branch: (),
            node: lower_host(child)?,
        });
    }

    Ok(Arc::new(Node::with_children(host, children)))
}

/// Parse a Newick string into an associate tree, interpreting the `host`
/// and `contents` annotations on leaves.
pub fn parse_associate_tree(input: &str) -> Result<Node<Associate>> {
    let parsed = Parser::new(input).parse_tree().context("parsing associate_tree Newick")?;
    lower_associate(&parsed)
}

fn lower_associate(parsed: &Parsed) -> Result<Node<Associate>> {
    let name = parsed.label.clone().unwrap_or_default();

    if parsed.children.is_empty() {
        let host = parsed
            .annotations
            .get("host")
            .ok_or_else(|| anyhow::anyhow!("associate leaf '{name}' is missing a [&host=...] annotation"))?
            .clone();
        let contents = parsed
            .annotations
            .get("contents")
            .map(|raw| parse_contents(raw))
            .transpose()?
            .ok_or_else(|| anyhow::anyhow!("associate leaf '{name}' is missing a [&contents=...] annotation"))?;
        return Ok(Node::leaf(Associate::leaf(name, host, contents)));
    }

    let mut children = Vec::with_capacity(parsed.children.len());
    for child in &parsed.children {
        children.push(Edge {
            branch: (),
            node: Arc::new(lower_associate(child)?),
        });
    }
    Ok(Node::with_children(Associate::internal(name), children))
}

fn parse_contents(raw: &str) -> Result<Contents> {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Ok(Contents::Unordered(split_items(inner).into_iter().collect()))
    } else if let Some(inner) = trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Ok(Contents::Ordered(split_items(inner)))
    } else {
        bail!("contents annotation '{raw}' is neither '{{...}}' nor '(...)'")
    }
}

fn split_items(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
