//! Resolver for IconSmith `.ftr` rule files.
//!
//! A rule file groups icon definitions under `TYPE <name>` headers. Each
//! icon group is a brace-delimited block whose body is a tiny conditional
//! language over one boolean (`opened`) and `include("path")` actions
//! that name the `.fti` layers composing the icon.
//!
//! The body is compiled once into a [`RuleNode`] tree and evaluated by a
//! recursive walk; no part of the document is ever executed as code.
//!
//! Rule documents in the wild are frequently hand-edited and sloppy, so
//! the resolver is lenient throughout: unbalanced braces clamp instead
//! of failing, unknown identifiers evaluate false, and a document with
//! no icon groups resolves to an empty include list.

/// A boolean guard expression over the `opened` flag.
///
/// Grammar: identifiers, `!`, `&&`, `||` and parentheses, with the
/// usual precedence (`!` > `&&` > `||`).
#[derive(Debug, Clone, PartialEq)]
pub enum GuardExpr {
    Var(String),
    Not(Box<GuardExpr>),
    And(Box<GuardExpr>, Box<GuardExpr>),
    Or(Box<GuardExpr>, Box<GuardExpr>),
}

impl GuardExpr {
    /// Parse a guard expression. Returns `None` on malformed input.
    pub fn parse(input: &str) -> Option<Self> {
        let tokens = tokenize(input)?;
        let mut parser = ExprParser { tokens, pos: 0 };
        let expr = parser.or_expr()?;
        if parser.pos == parser.tokens.len() {
            Some(expr)
        } else {
            None
        }
    }

    /// Evaluate against the single free variable.
    ///
    /// `opened` is the only bound identifier; anything else is false.
    pub fn eval(&self, opened: bool) -> bool {
        match self {
            GuardExpr::Var(name) => name == "opened" && opened,
            GuardExpr::Not(inner) => !inner.eval(opened),
            GuardExpr::And(a, b) => a.eval(opened) && b.eval(opened),
            GuardExpr::Or(a, b) => a.eval(opened) || b.eval(opened),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' => {
                chars.next();
                if chars.next() != Some('&') {
                    return None;
                }
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                if chars.next() != Some('|') {
                    return None;
                }
                tokens.push(Token::Or);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn or_expr(&mut self) -> Option<GuardExpr> {
        let mut left = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.and_expr()?;
            left = GuardExpr::Or(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn and_expr(&mut self) -> Option<GuardExpr> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.unary()?;
            left = GuardExpr::And(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn unary(&mut self) -> Option<GuardExpr> {
        let token = self.peek()?.clone();
        match token {
            Token::Not => {
                self.pos += 1;
                Some(GuardExpr::Not(Box::new(self.unary()?)))
            }
            Token::LParen => {
                self.pos += 1;
                let expr = self.or_expr()?;
                if self.peek() == Some(&Token::RParen) {
                    self.pos += 1;
                    Some(expr)
                } else {
                    None
                }
            }
            Token::Ident(name) => {
                self.pos += 1;
                Some(GuardExpr::Var(name))
            }
            _ => None,
        }
    }
}

/// One node of a compiled icon-group body.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleNode {
    /// Record a vector-file reference when reached.
    Include(String),
    /// A conditional scope with optional else branch.
    Guard {
        expr: Option<GuardExpr>,
        then_branch: Vec<RuleNode>,
        else_branch: Vec<RuleNode>,
    },
}

/// Resolve the include list of a rule document.
///
/// `selector` picks the `TYPE` block to use; when it is `None` or does
/// not match any captured block, the first block in document order is
/// used instead. A document without icon groups yields an empty list.
pub fn resolve_ftr(text: &str, selector: Option<&str>, opened: bool) -> Vec<String> {
    let blocks = capture_blocks(text);

    let Some(lines) = pick_block(&blocks, selector) else {
        return Vec::new();
    };

    let program = compile_block(lines);
    let mut includes = Vec::new();
    evaluate(&program, opened, &mut includes);
    includes
}

/// Capture every `TYPE` block's icon-group body, in document order.
///
/// A capture starts at the `{` on a line mentioning `ICON` (a group
/// whose opening brace sits on a later line is not recognized, matching
/// the legacy tooling) and ends when the brace depth returns to zero.
/// When a type defines several groups, the last one wins but the block
/// keeps its original position.
fn capture_blocks(text: &str) -> Vec<(String, Vec<String>)> {
    let mut blocks: Vec<(String, Vec<String>)> = Vec::new();
    let mut current_type: Option<String> = None;
    let mut capturing = false;
    let mut brace_depth: i32 = 0;
    let mut buffer: Vec<String> = Vec::new();

    fn store(blocks: &mut Vec<(String, Vec<String>)>, name: &str, lines: Vec<String>) {
        if let Some(entry) = blocks.iter_mut().find(|(n, _)| n == name) {
            entry.1 = lines;
        } else {
            blocks.push((name.to_string(), lines));
        }
    }

    for raw in text.lines() {
        let stripped = raw.trim();

        if let Some(rest) = stripped.strip_prefix("TYPE ") {
            if let Some(name) = rest.split_whitespace().next() {
                current_type = Some(name.to_string());
            }
        }

        if stripped.contains("ICON") && current_type.is_some() {
            if let Some(start) = stripped.find('{') {
                capturing = true;
                brace_depth = 1;
                let residual = &stripped[start + 1..];
                if !residual.is_empty() {
                    buffer.push(residual.to_string());
                    brace_depth += residual.matches('{').count() as i32;
                    brace_depth -= residual.matches('}').count() as i32;
                }
                if brace_depth <= 0 {
                    let name = current_type.clone().unwrap_or_default();
                    store(&mut blocks, &name, std::mem::take(&mut buffer));
                    capturing = false;
                }
            }
            continue;
        }

        if capturing {
            brace_depth += stripped.matches('{').count() as i32;
            brace_depth -= stripped.matches('}').count() as i32;
            if !stripped.is_empty() {
                buffer.push(stripped.to_string());
            }
            if brace_depth <= 0 {
                let name = current_type.clone().unwrap_or_default();
                store(&mut blocks, &name, std::mem::take(&mut buffer));
                capturing = false;
            }
        }
    }

    blocks
}

fn pick_block<'a>(
    blocks: &'a [(String, Vec<String>)],
    selector: Option<&str>,
) -> Option<&'a Vec<String>> {
    if let Some(name) = selector {
        if let Some((_, lines)) = blocks.iter().find(|(n, _)| n == name) {
            return Some(lines);
        }
    }
    blocks.first().map(|(_, lines)| lines)
}

/// An in-progress conditional scope during compilation.
struct Frame {
    expr: Option<GuardExpr>,
    then_branch: Vec<RuleNode>,
    else_branch: Vec<RuleNode>,
    in_else: bool,
}

impl Frame {
    fn branch(&mut self) -> &mut Vec<RuleNode> {
        if self.in_else {
            &mut self.else_branch
        } else {
            &mut self.then_branch
        }
    }

    fn into_node(self) -> RuleNode {
        RuleNode::Guard {
            expr: self.expr,
            then_branch: self.then_branch,
            else_branch: self.else_branch,
        }
    }
}

/// Compile a captured block into a rule tree.
///
/// `} else` splits into a scope close plus an else introducer; a bare
/// `}` closes the innermost scope (extra closers are ignored rather
/// than failing, so damaged documents still yield partial results).
fn compile_block(lines: &[String]) -> Vec<RuleNode> {
    let mut expanded: Vec<String> = Vec::new();
    for raw in lines {
        let stripped = raw.trim();
        if stripped.starts_with("} else") {
            expanded.push("}".to_string());
            if let Some(idx) = stripped.find("else") {
                expanded.push(stripped[idx..].to_string());
            }
        } else {
            expanded.push(stripped.to_string());
        }
    }

    fn close_frame(frame: Frame, stack: &mut Vec<Frame>, root: &mut Vec<RuleNode>) {
        match stack.last_mut() {
            Some(parent) => parent.branch().push(frame.into_node()),
            None => root.push(frame.into_node()),
        }
    }

    fn flush(pending: &mut Option<Frame>, stack: &mut Vec<Frame>, root: &mut Vec<RuleNode>) {
        if let Some(frame) = pending.take() {
            close_frame(frame, stack, root);
        }
    }

    let mut root: Vec<RuleNode> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    // A scope that just closed, kept around in case an else reopens it.
    let mut pending: Option<Frame> = None;

    for line in &expanded {
        if line.is_empty() {
            continue;
        }

        if line.starts_with("if ") || line.starts_with("if(") {
            flush(&mut pending, &mut stack, &mut root);
            let expr = line
                .find('(')
                .and_then(|open| line.rfind(')').map(|close| (open, close)))
                .filter(|(open, close)| open < close)
                .and_then(|(open, close)| GuardExpr::parse(&line[open + 1..close]));
            stack.push(Frame {
                expr,
                then_branch: Vec::new(),
                else_branch: Vec::new(),
                in_else: false,
            });
            continue;
        }

        if line.starts_with("else") {
            if let Some(mut frame) = pending.take() {
                frame.in_else = true;
                stack.push(frame);
            } else if let Some(frame) = stack.last_mut() {
                frame.in_else = true;
            }
            continue;
        }

        if line.starts_with('}') {
            flush(&mut pending, &mut stack, &mut root);
            pending = stack.pop();
            continue;
        }

        if let Some(path) = include_path(line) {
            flush(&mut pending, &mut stack, &mut root);
            let target = match stack.last_mut() {
                Some(frame) => frame.branch(),
                None => &mut root,
            };
            target.push(RuleNode::Include(path));
        }
    }

    // Close whatever is still open at end of input.
    flush(&mut pending, &mut stack, &mut root);
    while let Some(frame) = stack.pop() {
        close_frame(frame, &mut stack, &mut root);
    }

    root
}

/// Extract the quoted path of an `include("...")` action.
fn include_path(line: &str) -> Option<String> {
    let idx = line.find("include(\"")?;
    let rest = &line[idx + "include(\"".len()..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Walk a compiled rule tree in document order.
fn evaluate(nodes: &[RuleNode], opened: bool, includes: &mut Vec<String>) {
    for node in nodes {
        match node {
            RuleNode::Include(path) => includes.push(path.clone()),
            RuleNode::Guard {
                expr,
                then_branch,
                else_branch,
            } => {
                let taken = expr.as_ref().map(|e| e.eval(opened)).unwrap_or(false);
                if taken {
                    evaluate(then_branch, opened, includes);
                } else {
                    evaluate(else_branch, opened, includes);
                }
            }
        }
    }
}
