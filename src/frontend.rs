//! A reference front end: a small hand-rolled tokenizer/parser plus a
//! text-based `TypeChecker`, covering the expression/statement subset
//! spec.md §8's concrete scenarios and this crate's illustrative rules
//! need (const/let declarations, ternaries, `as` casts, call
//! expressions, property access, identifiers).
//!
//! This is explicitly **not** a production TypeScript compiler front
//! end — it exists only so the rule tester (spec.md §4.6) has something
//! concrete to parse fixture code with. Swapping in a real compiler
//! means implementing `SourceFile`/`Node`/`TypeChecker` the same way
//! this module does (SPEC_FULL.md §7 "Reference front end").
//!
//! No teacher module plays this role directly — the teacher's front end
//! is tree-sitter, wired in by the host application rather than shipped
//! in the crate. Tokenizer/parser shape is this crate's own, scoped
//! tightly to what spec.md §8 and the illustrative rules exercise.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use crate::driver::FrontEnd;
use crate::source::{Range, SourceFile};
use crate::syntax::{Kind, Node, NodeId, SyntaxTree, SyntaxTreeBuilder};
use crate::types::{Param, Signature, Symbol, Type, TypeChecker, TypeFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Number,
    String,
    Const,
    Let,
    As,
    True,
    False,
    Null,
    Colon,
    Semi,
    Eq,
    Question,
    LParen,
    RParen,
    Comma,
    Dot,
    Eof,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    range: Range,
}

fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < bytes.len() && {
                let c = bytes[i] as char;
                c.is_alphanumeric() || c == '_' || c == '$'
            } {
                i += 1;
            }
            let kind = match &text[start..i] {
                "const" => TokenKind::Const,
                "let" => TokenKind::Let,
                "as" => TokenKind::As,
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                _ => TokenKind::Ident,
            };
            tokens.push(Token {
                kind,
                range: Range::new(start, i),
            });
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && {
                let c = bytes[i] as char;
                c.is_ascii_digit() || c == '.'
            } {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                range: Range::new(start, i),
            });
            continue;
        }
        if c == '"' || c == '\'' {
            let quote = c;
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i] as char != quote {
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            tokens.push(Token {
                kind: TokenKind::String,
                range: Range::new(start, i),
            });
            continue;
        }

        let start = i;
        let kind = match c {
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semi,
            '=' => TokenKind::Eq,
            '?' => TokenKind::Question,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            other => panic!("reference front end: unexpected character {other:?}"),
        };
        i += 1;
        tokens.push(Token {
            kind,
            range: Range::new(start, i),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        range: Range::new(text.len(), text.len()),
    });
    tokens
}

/// Recursive-descent parser over the token stream, building the
/// `SyntaxTree` bottom-up and recording, for every identifier reference
/// to a variable declared with a type annotation, which type text it
/// resolves to (consumed by `SimpleTypeChecker::type_at`).
struct Parser<'s> {
    text: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    builder: SyntaxTreeBuilder,
    scope: HashMap<String, String>,
    identifier_types: Vec<(NodeId, String)>,
}

impl<'s> Parser<'s> {
    fn new(text: &'s str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
            pos: 0,
            builder: SyntaxTreeBuilder::new(),
            scope: HashMap::new(),
            identifier_types: Vec::new(),
        }
    }

    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Token {
        let token = self.bump();
        assert!(
            token.kind == kind,
            "reference front end: expected {kind:?}, got {:?}",
            token.kind
        );
        token
    }

    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].range.end
    }

    fn text_of(&self, range: Range) -> &'s str {
        &self.text[range.start..range.end]
    }

    fn parse_program(mut self) -> (SyntaxTree, Vec<(NodeId, String)>) {
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement());
        }
        let root = self
            .builder
            .push(Kind::SourceFile, Range::new(0, self.text.len()), statements);
        (self.builder.finish(root), self.identifier_types)
    }

    fn parse_statement(&mut self) -> NodeId {
        if self.at(TokenKind::Const) || self.at(TokenKind::Let) {
            self.parse_variable_statement()
        } else {
            self.parse_expression_statement()
        }
    }

    fn parse_variable_statement(&mut self) -> NodeId {
        let start = self.peek().range.start;
        self.bump();

        let name_token = self.expect(TokenKind::Ident);
        let name_text = self.text_of(name_token.range).to_string();
        let name_node = self.builder.push(Kind::Identifier, name_token.range, vec![]);

        let mut fields = vec![("name", name_node)];
        let mut children = vec![name_node];
        let mut declared_type_text = None;

        if self.at(TokenKind::Colon) {
            self.bump();
            let (type_node, type_text) = self.parse_type();
            declared_type_text = Some(type_text);
            fields.push(("type", type_node));
            children.push(type_node);
        }

        self.expect(TokenKind::Eq);
        let init_node = self.parse_expression();
        fields.push(("initializer", init_node));
        children.push(init_node);

        if let Some(ty) = declared_type_text {
            self.scope.insert(name_text, ty);
        }

        let mut end = self.prev_end();
        if self.at(TokenKind::Semi) {
            self.bump();
            end = self.prev_end();
        }

        let declaration =
            self.builder
                .push_with_fields(Kind::VariableDeclaration, Range::new(start, end), children, fields);
        self.builder
            .push(Kind::VariableDeclarationList, Range::new(start, end), vec![declaration])
    }

    fn parse_expression_statement(&mut self) -> NodeId {
        let start = self.peek().range.start;
        let expr = self.parse_expression();
        let mut end = self.prev_end();
        if self.at(TokenKind::Semi) {
            self.bump();
            end = self.prev_end();
        }
        self.builder.push(Kind::ExpressionStatement, Range::new(start, end), vec![expr])
    }

    /// A type position accepts either a type name (`number`, `string`,
    /// a class name, ...) or a numeric/string literal (`3`, `"x"`) for
    /// literal types — either way it's just the next token's raw text.
    fn parse_type(&mut self) -> (NodeId, String) {
        let token = self.bump();
        let text = self.text_of(token.range).to_string();
        let node = self.builder.push(Kind::TypeReference, token.range, vec![]);
        (node, text)
    }

    fn parse_expression(&mut self) -> NodeId {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> NodeId {
        let start = self.peek().range.start;
        let condition = self.parse_as_expression();
        if !self.at(TokenKind::Question) {
            return condition;
        }
        self.bump();
        let when_true = self.parse_expression();
        self.expect(TokenKind::Colon);
        let when_false = self.parse_expression();
        let end = self.prev_end();
        self.builder.push_with_fields(
            Kind::ConditionalExpression,
            Range::new(start, end),
            vec![condition, when_true, when_false],
            vec![
                ("condition", condition),
                ("whenTrue", when_true),
                ("whenFalse", when_false),
            ],
        )
    }

    fn parse_as_expression(&mut self) -> NodeId {
        let start = self.peek().range.start;
        let mut expr = self.parse_postfix();
        while self.at(TokenKind::As) {
            self.bump();
            let (type_node, _type_text) = self.parse_type();
            let end = self.prev_end();
            expr = self.builder.push_with_fields(
                Kind::AsExpression,
                Range::new(start, end),
                vec![expr, type_node],
                vec![("expression", expr), ("type", type_node)],
            );
        }
        expr
    }

    fn parse_postfix(&mut self) -> NodeId {
        let start = self.peek().range.start;
        let mut expr = self.parse_primary();
        loop {
            if self.at(TokenKind::Dot) {
                self.bump();
                let name_token = self.expect(TokenKind::Ident);
                let name_node = self.builder.push(Kind::Identifier, name_token.range, vec![]);
                let end = self.prev_end();
                expr = self.builder.push_with_fields(
                    Kind::PropertyAccessExpression,
                    Range::new(start, end),
                    vec![expr, name_node],
                    vec![("expression", expr), ("name", name_node)],
                );
            } else if self.at(TokenKind::LParen) {
                self.bump();
                let mut args = Vec::new();
                if !self.at(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression());
                        if self.at(TokenKind::Comma) {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                }
                self.expect(TokenKind::RParen);
                let end = self.prev_end();
                let mut children = vec![expr];
                children.extend(args);
                expr = self.builder.push_with_fields(
                    Kind::CallExpression,
                    Range::new(start, end),
                    children,
                    vec![("expression", expr)],
                );
            } else {
                break;
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> NodeId {
        let token = self.bump();
        match token.kind {
            TokenKind::Number => self.builder.push(Kind::NumericLiteral, token.range, vec![]),
            TokenKind::String => self.builder.push(Kind::StringLiteral, token.range, vec![]),
            TokenKind::True | TokenKind::False => self.builder.push(Kind::BooleanLiteral, token.range, vec![]),
            TokenKind::Null => self.builder.push(Kind::NullLiteral, token.range, vec![]),
            TokenKind::Ident => {
                let name = self.text_of(token.range).to_string();
                let node = self.builder.push(Kind::Identifier, token.range, vec![]);
                if let Some(ty) = self.scope.get(&name).cloned() {
                    self.identifier_types.push((node, ty));
                }
                node
            }
            TokenKind::LParen => {
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen);
                let end = self.prev_end();
                self.builder
                    .push(Kind::ParenthesizedExpression, Range::new(token.range.start, end), vec![inner])
            }
            other => panic!("reference front end: unexpected token {other:?} in expression position"),
        }
    }
}

fn parse(text: &str) -> (SyntaxTree, Vec<(NodeId, String)>) {
    Parser::new(text).parse_program()
}

/// A `TypeChecker` that resolves types purely from type-annotation text:
/// "the type of `x`" is whatever string followed the `:` in its
/// declaration, interned into a `Type` handle. Good enough to make
/// spec.md §8 scenario 4 (`no-unnecessary-type-assertion`) meaningful
/// without a real type system.
pub struct SimpleTypeChecker {
    text: String,
    type_of_node: HashMap<NodeId, Type>,
    interned: RefCell<HashMap<String, Type>>,
    text_of_type: RefCell<HashMap<Type, String>>,
    next_id: Cell<u64>,
}

impl SimpleTypeChecker {
    fn new(text: String, identifier_types: Vec<(NodeId, String)>) -> Self {
        let checker = Self {
            text,
            type_of_node: HashMap::new(),
            interned: RefCell::new(HashMap::new()),
            text_of_type: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        };
        let mut type_of_node = HashMap::new();
        for (node, type_text) in identifier_types {
            type_of_node.insert(node, checker.intern(&type_text));
        }
        Self { type_of_node, ..checker }
    }

    fn intern(&self, text: &str) -> Type {
        if let Some(ty) = self.interned.borrow().get(text) {
            return *ty;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let ty = Type(id);
        self.interned.borrow_mut().insert(text.to_string(), ty);
        self.text_of_type.borrow_mut().insert(ty, text.to_string());
        ty
    }

    fn flags_for_text(text: &str) -> TypeFlags {
        match text {
            "string" => TypeFlags::STRING_LIKE,
            "number" => TypeFlags::NUMBER_LIKE,
            "boolean" => TypeFlags::BOOLEAN_LIKE,
            "void" => TypeFlags::VOID,
            "undefined" => TypeFlags::UNDEFINED,
            "null" => TypeFlags::NULL,
            "any" => TypeFlags::ANY,
            "unknown" => TypeFlags::UNKNOWN,
            "never" => TypeFlags::NEVER,
            other if other.parse::<f64>().is_ok() => TypeFlags::NUMBER_LIKE,
            other if other.starts_with('"') || other.starts_with('\'') => TypeFlags::STRING_LIKE,
            _ => TypeFlags::OBJECT,
        }
    }
}

impl TypeChecker for SimpleTypeChecker {
    fn type_at(&self, node: Node) -> Option<Type> {
        self.type_of_node.get(&node.id()).copied()
    }

    fn type_from_type_node(&self, node: Node) -> Option<Type> {
        let text = &self.text[node.range().start..node.range().end];
        Some(self.intern(text))
    }

    fn symbol_at(&self, _node: Node) -> Option<Symbol> {
        None
    }

    fn resolved_signature(&self, _call: Node) -> Option<Signature> {
        None
    }

    fn base_constraint_of(&self, _ty: Type) -> Option<Type> {
        None
    }

    fn is_assignable_to(&self, source: Type, target: Type) -> bool {
        self.is_identical_to(source, target)
    }

    fn is_identical_to(&self, a: Type, b: Type) -> bool {
        if a == b {
            return true;
        }
        let texts = self.text_of_type.borrow();
        texts.get(&a).is_some() && texts.get(&a) == texts.get(&b)
    }

    fn type_to_string(&self, ty: Type) -> String {
        self.text_of_type
            .borrow()
            .get(&ty)
            .cloned()
            .unwrap_or_else(|| format!("<type #{}>", ty.0))
    }

    fn flags_of(&self, ty: Type) -> TypeFlags {
        self.text_of_type
            .borrow()
            .get(&ty)
            .map(|text| Self::flags_for_text(text))
            .unwrap_or(TypeFlags::empty())
    }

    fn symbol_of_type(&self, _ty: Type) -> Option<Symbol> {
        None
    }

    fn call_signatures_of(&self, _ty: Type) -> Vec<Signature> {
        Vec::new()
    }

    fn property_of_type(&self, _ty: Type, _name: &str) -> Option<Symbol> {
        None
    }

    fn params_of_signature(&self, _signature: Signature) -> Vec<Param> {
        Vec::new()
    }

    fn type_params_of_signature(&self, _signature: Signature) -> Vec<Type> {
        Vec::new()
    }

    fn union_constituents(&self, _ty: Type) -> Vec<Type> {
        Vec::new()
    }

    fn intersection_constituents(&self, _ty: Type) -> Vec<Type> {
        Vec::new()
    }
}

/// The `FrontEnd` implementation wiring the tokenizer/parser and
/// `SimpleTypeChecker` together (SPEC_FULL.md §7).
pub struct ReferenceFrontEnd;

impl FrontEnd for ReferenceFrontEnd {
    fn parse(&self, path: &Path, text: &str) -> (SourceFile, SyntaxTree, Box<dyn TypeChecker>) {
        let (tree, identifier_types) = parse(text);
        let source_file = SourceFile::new(path.to_path_buf(), text.to_string());
        let checker = SimpleTypeChecker::new(text.to_string(), identifier_types);
        (source_file, tree, Box::new(checker))
    }
}
