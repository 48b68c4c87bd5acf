//! Transform pipeline
//!
//! Applies one platform's transform group to a copy of every resolved token.
//! The resolved tree itself is never modified.

use std::collections::HashMap;

use crate::error::{Error, Result, Warning};
use crate::expr::to_text;
use crate::resolver::ResolvedTree;
use crate::transforms::{
    TransformContext, TransformDefinition, TransformFn, TransformRegistry, TransformedToken,
};

/// A platform's transformed tokens, in tree order
#[derive(Debug, Clone, Default)]
pub struct TransformedTokens {
    tokens: Vec<TransformedToken>,
    index: HashMap<String, usize>,
    warnings: Vec<Warning>,
}

impl TransformedTokens {
    /// Tokens in tree order
    pub fn tokens(&self) -> &[TransformedToken] {
        &self.tokens
    }

    /// Look up a token by dotted path
    pub fn get(&self, path: &str) -> Option<&TransformedToken> {
        self.index.get(path).map(|&i| &self.tokens[i])
    }

    /// Non-fatal problems met while transforming
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
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

/// The ordered transforms of one group, looked up once
#[derive(Debug, Clone)]
pub struct TransformPipeline<'r> {
    group: String,
    transforms: Vec<&'r TransformDefinition>,
}

impl<'r> TransformPipeline<'r> {
    /// Build the pipeline for a named group
    pub fn for_group(registry: &'r TransformRegistry, group: &str) -> Result<Self> {
        let definition = registry
            .group(group)
            .ok_or_else(|| Error::UnknownTransformGroup(group.to_string()))?;

        let transforms = definition
            .transforms
            .iter()
            .map(|name| {
                registry.get(name).ok_or_else(|| Error::UnknownTransform {
                    name: name.clone(),
                    group: group.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            group: group.to_string(),
            transforms,
        })
    }

    /// Group name
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Transform every resolved token
    pub fn apply(&self, resolved: &ResolvedTree, ctx: &TransformContext) -> TransformedTokens {
        let mut warnings = Vec::new();
        let mut tokens = Vec::with_capacity(resolved.len());
        let mut index = HashMap::with_capacity(resolved.len());

        for node in resolved.tokens() {
            let token = self.transform_token(TransformedToken::from_resolved(node), ctx, &mut warnings);
            index.insert(token.id(), tokens.len());
            tokens.push(token);
        }

        tracing::debug!(
            "Transformed {} tokens with group '{}' ({} warnings)",
            tokens.len(),
            self.group,
            warnings.len()
        );

        TransformedTokens {
            tokens,
            index,
            warnings,
        }
    }

    /// Run every matching transform over one token, in group order
    pub fn transform_token(
        &self,
        mut token: TransformedToken,
        ctx: &TransformContext,
        warnings: &mut Vec<Warning>,
    ) -> TransformedToken {
        for transform in &self.transforms {
            if !(transform.matcher)(&token.attributes) {
                continue;
            }
            match transform.apply {
                TransformFn::Attribute(apply) => token.attributes = apply(&token),
                TransformFn::Name(apply) => token.name = apply(&token, ctx),
                TransformFn::Value(apply) => match apply(&token) {
                    Some(value) => token.value = value,
                    None => {
                        let warning = Warning::UnsupportedTransformValue {
                            transform: transform.name.to_string(),
                            token: token.id(),
                            value: to_text(&token.value),
                        };
                        tracing::warn!("{}", warning);
                        warnings.push(warning);
                    }
                },
            }
        }
        token
    }
}
