//! Alias resolution
//!
//! Turns every token's raw value into a literal by following references,
//! evaluating arithmetic, and recombining composite values. Resolution is
//! dependency-driven and memoized; a per-chain stack catches cycles.

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::expr::{Expr, Segment, as_number, number_value, parse_expression, parse_template, to_text};
use crate::tree::{TokenNode, TokenTree};

/// Tokens with `resolved_value` filled in, in tree order
#[derive(Debug, Clone, Default)]
pub struct ResolvedTree {
    tokens: Vec<TokenNode>,
    index: HashMap<String, usize>,
}

impl ResolvedTree {
    /// Resolved tokens in tree order
    pub fn tokens(&self) -> &[TokenNode] {
        &self.tokens
    }

    /// Look up a resolved token by dotted path
    pub fn get(&self, path: &str) -> Option<&TokenNode> {
        self.index.get(path).map(|&i| &self.tokens[i])
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether there are no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Memoizing reference resolver over a loaded tree
pub struct Resolver<'a> {
    tree: &'a TokenTree,
    cache: HashMap<String, Value>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for `tree`
    pub fn new(tree: &'a TokenTree) -> Self {
        Self {
            tree,
            cache: HashMap::new(),
        }
    }

    /// Resolve a single token by dotted path
    pub fn resolve(&mut self, path: &str) -> Result<Value> {
        let mut stack = Vec::new();
        self.resolve_path(path, &mut stack, path)
    }

    /// Resolve every token in the tree
    pub fn resolve_all(mut self) -> Result<ResolvedTree> {
        let tree = self.tree;
        let mut tokens = Vec::with_capacity(tree.len());
        let mut index = HashMap::with_capacity(tree.len());

        for token in tree.tokens() {
            let id = token.id();
            let value = self.resolve(&id)?;
            index.insert(id, tokens.len());
            tokens.push(TokenNode {
                resolved_value: Some(value),
                ..token.clone()
            });
        }

        tracing::debug!("Resolved {} tokens", tokens.len());
        Ok(ResolvedTree { tokens, index })
    }

    fn resolve_path(
        &mut self,
        path: &str,
        stack: &mut Vec<String>,
        referenced_by: &str,
    ) -> Result<Value> {
        if let Some(value) = self.cache.get(path) {
            return Ok(value.clone());
        }

        if stack.iter().any(|p| p == path) {
            let mut chain = stack.clone();
            chain.push(path.to_string());
            return Err(Error::Cycle { chain });
        }

        let tree = self.tree;
        let token = tree
            .get(path)
            .ok_or_else(|| Error::UnresolvedReference {
                path: path.to_string(),
                referenced_by: referenced_by.to_string(),
            })?;

        stack.push(path.to_string());
        let value = self.resolve_value(&token.raw_value, path, stack)?;
        stack.pop();

        self.cache.insert(path.to_string(), value.clone());
        Ok(value)
    }

    fn resolve_value(&mut self, raw: &Value, token: &str, stack: &mut Vec<String>) -> Result<Value> {
        match raw {
            Value::Object(fields) => {
                let mut resolved = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    resolved.insert(key.clone(), self.resolve_value(field, token, stack)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, token, stack))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::String(text) => self.resolve_string(text, token, stack),
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&mut self, text: &str, token: &str, stack: &mut Vec<String>) -> Result<Value> {
        let template = parse_template(text);

        if let Some(path) = template.single_reference() {
            return self.resolve_path(path, stack, token);
        }

        if let Some(expr) = parse_expression(text).filter(Expr::has_operator) {
            let mut lookup = |path: &str| -> Result<f64> {
                let value = self.resolve_path(path, stack, token)?;
                as_number(&value).ok_or_else(|| Error::InvalidExpression {
                    token: token.to_string(),
                    message: format!("'{{{path}}}' resolves to non-numeric value {value}"),
                })
            };
            let result = expr.evaluate(token, &mut lookup)?;
            return Ok(number_value(result));
        }

        if !template.has_references() {
            return Ok(Value::String(text.to_string()));
        }

        let mut out = String::with_capacity(text.len());
        for segment in &template.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Ref(path) => {
                    let value = self.resolve_path(path, stack, token)?;
                    out.push_str(&to_text(&value));
                }
            }
        }
        Ok(Value::String(out))
    }
}

/// Resolve all tokens of a tree
pub fn resolve_tree(tree: &TokenTree) -> Result<ResolvedTree> {
    Resolver::new(tree).resolve_all()
}
