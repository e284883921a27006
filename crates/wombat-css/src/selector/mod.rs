//! CSS selector parsing and matching.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! A selector is an ordered sequence of compound selectors joined by
//! combinators; matching walks right-to-left from the subject with
//! backtracking for the indefinite combinators (descendant and
//! subsequent-sibling).

use wombat_dom::{DomTree, ElementData, NodeId};

use crate::tokenizer::CssToken;

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// How an attribute selector compares its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatchKind {
    /// `[attr]` — "Represents an element with the att attribute."
    Exists,
    /// `[attr=v]` — "...whose value is exactly 'val'."
    Exact,
    /// `[attr^=v]` — "...whose value begins with the prefix 'val'."
    Prefix,
    /// `[attr$=v]` — "...whose value ends with the suffix 'val'."
    Suffix,
    /// `[attr*=v]` — "...containing at least one instance of 'val'."
    Contains,
    /// `[attr~=v]` — "...a whitespace-separated list of words, one of
    /// which is exactly 'val'."
    Word,
    /// `[attr|=v]` — "...either exactly 'val' or beginning with 'val'
    /// immediately followed by '-'."
    Hyphen,
}

/// A single attribute condition.
///
/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name (lowercased).
    pub name: String,
    /// Comparison kind.
    pub kind: AttrMatchKind,
    /// Comparison value (empty for `Exists`).
    pub value: String,
    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    /// "the identifier i... causes the value... to be matched
    /// ASCII-case-insensitively"
    pub case_insensitive: bool,
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// The structural pseudo-classes the engine evaluates. Interactive
/// pseudo-classes and pseudo-elements parse to [`PseudoClass::NeverMatch`]
/// so their presence does not drop the entire rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.1 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.1 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "represents an element that has no children at all"
    Empty,
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// `:hover`, `:focus`, `::before`, `:nth-child(...)`, etc. — parsed
    /// but never true during a static render.
    NeverMatch,
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleSelector {
    /// Type selector (lowercased), `None` for `*` or when absent.
    pub tag: Option<String>,
    /// ID selector value.
    pub id: Option<String>,
    /// Class selector values; all must be present on the element.
    pub classes: Vec<String>,
    /// Attribute conditions; all must hold.
    pub attributes: Vec<AttributeSelector>,
    /// Pseudo-class conditions; all must hold.
    pub pseudo_classes: Vec<PseudoClass>,
}

impl SimpleSelector {
    /// Whether this compound carries at least one condition, making it a
    /// valid simple selector. (`*` alone sets no fields but is flagged at
    /// parse time.)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "an element B that is an arbitrary descendant of some ancestor A"
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "an element B that is a direct child of element A"
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "an element B that immediately follows element A"
    NextSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "an element B that follows element A (not necessarily immediately)"
    SubsequentSibling,
}

/// A parsed complex selector: compound selectors in source order, each
/// paired with the combinator to its right (the last has none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// The `(compound, following-combinator)` sequence; never empty.
    pub parts: Vec<(SimpleSelector, Option<Combinator>)>,
    /// Cached specificity.
    pub specificity: Specificity,
}

/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "count the number of ID selectors (= A)... class selectors, attribute
/// selectors, and pseudo-classes (= B)... type selectors and
/// pseudo-elements (= C). Specificities are compared by comparing the
/// three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Selector {
    /// [§ 4.1 Match a selector against an element](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Matching walks the combinator chain right-to-left from the subject.
    /// Descendant and subsequent-sibling combinators try every candidate
    /// (full backtracking), so `a b c` matches even when the nearest `b`
    /// ancestor has no `a` above it but a farther one does.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let last = self.parts.len() - 1;
        self.matches_from(tree, node, last)
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !simple_matches(&self.parts[index].0, tree, node) {
            return false;
        }
        let Some(prev) = index.checked_sub(1) else {
            return true;
        };
        // The combinator between parts[prev] and parts[index] is stored on
        // parts[prev].
        let combinator = self.parts[prev].1.unwrap_or(Combinator::Descendant);
        match combinator {
            Combinator::Descendant => tree
                .ancestors(node)
                .any(|ancestor| self.matches_from(tree, ancestor, prev)),
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| self.matches_from(tree, parent, prev)),
            Combinator::NextSibling => previous_element_sibling(tree, node)
                .is_some_and(|sib| self.matches_from(tree, sib, prev)),
            Combinator::SubsequentSibling => tree
                .preceding_siblings(node)
                .filter(|&sib| tree.as_element(sib).is_some())
                .any(|sib| self.matches_from(tree, sib, prev)),
        }
    }
}

/// The nearest preceding sibling that is an element (text and comments
/// are invisible to sibling combinators).
fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node)
        .find(|&sib| tree.as_element(sib).is_some())
}

/// Test a compound selector against a single element.
fn simple_matches(simple: &SimpleSelector, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };

    if let Some(tag) = &simple.tag {
        if element.tag_name != *tag {
            return false;
        }
    }
    if let Some(id) = &simple.id {
        if element.id() != Some(id.as_str()) {
            return false;
        }
    }
    if !simple.classes.iter().all(|c| element.has_class(c)) {
        return false;
    }
    if !simple
        .attributes
        .iter()
        .all(|attr| attribute_matches(attr, element))
    {
        return false;
    }
    simple
        .pseudo_classes
        .iter()
        .all(|pseudo| pseudo_matches(pseudo, tree, node))
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    let Some(actual) = element.attr(&selector.name) else {
        return false;
    };
    if selector.kind == AttrMatchKind::Exists {
        return true;
    }

    let (actual, expected) = if selector.case_insensitive {
        (actual.to_ascii_lowercase(), selector.value.to_ascii_lowercase())
    } else {
        (actual.to_string(), selector.value.clone())
    };

    match selector.kind {
        AttrMatchKind::Exists => true,
        AttrMatchKind::Exact => actual == expected,
        // "if 'val' is the empty string... the selector does not represent
        // anything"
        AttrMatchKind::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttrMatchKind::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttrMatchKind::Contains => !expected.is_empty() && actual.contains(&expected),
        AttrMatchKind::Word => actual.split_ascii_whitespace().any(|w| w == expected),
        AttrMatchKind::Hyphen => {
            actual == expected
                || actual.strip_prefix(&expected).is_some_and(|rest| rest.starts_with('-'))
        }
    }
}

/// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
fn pseudo_matches(pseudo: &PseudoClass, tree: &DomTree, node: NodeId) -> bool {
    match pseudo {
        // "first among its inclusive siblings" — element siblings only.
        PseudoClass::FirstChild => previous_element_sibling(tree, node).is_none(),
        PseudoClass::LastChild => next_element_sibling(tree, node).is_none(),
        PseudoClass::OnlyChild => {
            previous_element_sibling(tree, node).is_none()
                && next_element_sibling(tree, node).is_none()
        }
        // "an element that has no children at all"
        PseudoClass::Empty => tree.children(node).is_empty(),
        PseudoClass::Root => tree.document_element() == Some(node),
        PseudoClass::NeverMatch => false,
    }
}

fn next_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.next_sibling(node);
    while let Some(id) = current {
        if tree.as_element(id).is_some() {
            return Some(id);
        }
        current = tree.next_sibling(id);
    }
    None
}

// ----------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------

/// Parse one complex selector from a token slice (the comma-separated
/// pieces of a rule prelude are handed here one at a time).
///
/// Returns `None` when the tokens do not form a valid selector; the caller
/// drops just that selector, not the whole rule.
#[must_use]
pub fn parse_selector(tokens: &[CssToken]) -> Option<Selector> {
    let mut parser = SelectorParser { tokens, pos: 0 };
    parser.parse()
}

struct SelectorParser<'a> {
    tokens: &'a [CssToken],
    pos: usize,
}

impl SelectorParser<'_> {
    fn peek(&self) -> Option<&CssToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&CssToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut saw = false;
        while matches!(self.peek(), Some(CssToken::Whitespace)) {
            saw = true;
            self.pos += 1;
        }
        saw
    }

    fn parse(&mut self) -> Option<Selector> {
        let _ = self.skip_whitespace();
        let mut parts: Vec<(SimpleSelector, Option<Combinator>)> = Vec::new();

        loop {
            let simple = self.parse_compound()?;
            parts.push((simple, None));

            // Combinator detection: explicit `>`/`+`/`~` (whitespace
            // around them is insignificant), or bare whitespace before
            // another compound (descendant).
            let saw_ws = self.skip_whitespace();
            let combinator = match self.peek() {
                Some(CssToken::Delim('>')) => {
                    let _ = self.next();
                    Some(Combinator::Child)
                }
                Some(CssToken::Delim('+')) => {
                    let _ = self.next();
                    Some(Combinator::NextSibling)
                }
                Some(CssToken::Delim('~')) => {
                    let _ = self.next();
                    Some(Combinator::SubsequentSibling)
                }
                Some(_) if saw_ws => Some(Combinator::Descendant),
                _ => None,
            };

            match combinator {
                Some(c) => {
                    let _ = self.skip_whitespace();
                    if self.peek().is_none() {
                        // Dangling combinator.
                        return None;
                    }
                    if let Some(last) = parts.last_mut() {
                        last.1 = Some(c);
                    }
                }
                None => break,
            }
        }

        if self.peek().is_some() {
            // Trailing garbage the compound parser could not consume.
            return None;
        }

        let specificity = compute_specificity(&parts);
        Some(Selector { parts, specificity })
    }

    /// `simple = ( '*' | ident )? ( '#' ident | '.' ident | '[' attr ']'
    /// | ':' pseudo )*` — at least one of the pieces must be present.
    fn parse_compound(&mut self) -> Option<SimpleSelector> {
        let mut simple = SimpleSelector::default();
        let mut any = false;

        // Optional leading type or universal selector.
        match self.peek() {
            Some(CssToken::Ident(name)) => {
                simple.tag = Some(name.to_ascii_lowercase());
                any = true;
                let _ = self.next();
            }
            Some(CssToken::Delim('*')) => {
                any = true;
                let _ = self.next();
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some(CssToken::Hash(value)) => {
                    simple.id = Some(value.clone());
                    any = true;
                    let _ = self.next();
                }
                Some(CssToken::Delim('.')) => {
                    let _ = self.next();
                    match self.next() {
                        Some(CssToken::Ident(name)) => {
                            simple.classes.push(name.clone());
                            any = true;
                        }
                        _ => return None,
                    }
                }
                Some(CssToken::LeftBracket) => {
                    let _ = self.next();
                    let attr = self.parse_attribute_selector()?;
                    simple.attributes.push(attr);
                    any = true;
                }
                Some(CssToken::Colon) => {
                    let _ = self.next();
                    let pseudo = self.parse_pseudo()?;
                    simple.pseudo_classes.push(pseudo);
                    any = true;
                }
                _ => break,
            }
        }

        if any { Some(simple) } else { None }
    }

    /// `attr-sel = name ( matcher value ( 'i' | 's' )? )? ']'`
    fn parse_attribute_selector(&mut self) -> Option<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = match self.next() {
            Some(CssToken::Ident(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };
        let _ = self.skip_whitespace();

        let kind = match self.peek() {
            Some(CssToken::RightBracket) => {
                let _ = self.next();
                return Some(AttributeSelector {
                    name,
                    kind: AttrMatchKind::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            Some(CssToken::Delim('=')) => {
                let _ = self.next();
                AttrMatchKind::Exact
            }
            Some(CssToken::Delim(c @ ('^' | '$' | '*' | '~' | '|'))) => {
                let kind = match c {
                    '^' => AttrMatchKind::Prefix,
                    '$' => AttrMatchKind::Suffix,
                    '*' => AttrMatchKind::Contains,
                    '~' => AttrMatchKind::Word,
                    _ => AttrMatchKind::Hyphen,
                };
                let _ = self.next();
                if !matches!(self.next(), Some(CssToken::Delim('='))) {
                    return None;
                }
                kind
            }
            _ => return None,
        };

        let _ = self.skip_whitespace();
        let value = match self.next() {
            Some(CssToken::Ident(v) | CssToken::String(v)) => v.clone(),
            Some(CssToken::Number(n)) => format_number(*n),
            _ => return None,
        };
        let _ = self.skip_whitespace();

        // Optional case-sensitivity flag.
        let mut case_insensitive = false;
        if let Some(CssToken::Ident(flag)) = self.peek() {
            if flag.eq_ignore_ascii_case("i") {
                case_insensitive = true;
                let _ = self.next();
            } else if flag.eq_ignore_ascii_case("s") {
                let _ = self.next();
            }
            let _ = self.skip_whitespace();
        }

        match self.next() {
            Some(CssToken::RightBracket) => Some(AttributeSelector {
                name,
                kind,
                value,
                case_insensitive,
            }),
            _ => None,
        }
    }

    /// `pseudo = ':'? ( ident | function ')' )` — the leading `:` was
    /// already consumed; a second `:` marks a pseudo-element.
    fn parse_pseudo(&mut self) -> Option<PseudoClass> {
        // Pseudo-element (`::before` etc.): consume and never match.
        if matches!(self.peek(), Some(CssToken::Colon)) {
            let _ = self.next();
            return match self.next() {
                Some(CssToken::Ident(_)) => Some(PseudoClass::NeverMatch),
                Some(CssToken::Function(_)) => {
                    self.skip_to_close_paren();
                    Some(PseudoClass::NeverMatch)
                }
                _ => None,
            };
        }

        match self.next() {
            Some(CssToken::Ident(name)) => Some(match name.to_ascii_lowercase().as_str() {
                "first-child" => PseudoClass::FirstChild,
                "last-child" => PseudoClass::LastChild,
                "only-child" => PseudoClass::OnlyChild,
                "empty" => PseudoClass::Empty,
                "root" => PseudoClass::Root,
                // :hover, :focus, :active, :visited, :link, ...
                _ => PseudoClass::NeverMatch,
            }),
            // Functional pseudo-classes (`:nth-child(2)`, `:not(.x)`):
            // skip the arguments, never match.
            Some(CssToken::Function(_)) => {
                self.skip_to_close_paren();
                Some(PseudoClass::NeverMatch)
            }
            _ => None,
        }
    }

    fn skip_to_close_paren(&mut self) {
        let mut depth = 1;
        while let Some(token) = self.next() {
            match token {
                CssToken::Function(_) | CssToken::LeftParen => depth += 1,
                CssToken::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
fn compute_specificity(parts: &[(SimpleSelector, Option<Combinator>)]) -> Specificity {
    let mut spec = Specificity(0, 0, 0);
    for (simple, _) in parts {
        if simple.id.is_some() {
            spec.0 += 1;
        }
        spec.1 += simple.classes.len() as u32;
        spec.1 += simple.attributes.len() as u32;
        spec.1 += simple.pseudo_classes.len() as u32;
        if simple.tag.is_some() {
            spec.2 += 1;
        }
    }
    spec
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
