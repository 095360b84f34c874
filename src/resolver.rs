//! Generation resolvers
//!
//! One [`GenerateResolver`] serves every type the capability is bound to. It
//! only ever sees flat key/value views of the source entity and the call's
//! arguments, so no type needs its own resolver code.

use crate::error::ApiError;
use crate::pipeline::GenerationPipeline;
use crate::schema::InjectionReport;
use crate::template::{CallArguments, PromptTemplate, SourceEntity, TemplateContext};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Operation name exposed for the capability on every bound type
pub const GENERATE_OPERATION: &str = "generate";

/// Argument carrying a caller-supplied prompt template
pub const PROMPT_ARGUMENT: &str = "prompt";

/// Argument selecting the backend model for one call
pub const MODEL_ARGUMENT: &str = "model";

/// Result of a capability invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResponse {
    pub text: String,
}

/// Where a resolver binding gets its prompt template
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Template owned by the binding
    Fixed(PromptTemplate),
    /// Template read from the named call argument
    Argument(String),
}

impl Default for TemplateSource {
    fn default() -> Self {
        TemplateSource::Argument(PROMPT_ARGUMENT.to_string())
    }
}

/// Shape-agnostic generation resolver
#[derive(Clone)]
pub struct GenerateResolver {
    pipeline: GenerationPipeline,
    template: TemplateSource,
    model_argument: String,
}

impl GenerateResolver {
    pub fn new(pipeline: GenerationPipeline, template: TemplateSource) -> Self {
        Self {
            pipeline,
            template,
            model_argument: MODEL_ARGUMENT.to_string(),
        }
    }

    /// Use a different argument name for per-call model selection
    pub fn with_model_argument(mut self, name: impl Into<String>) -> Self {
        self.model_argument = name.into();
        self
    }

    fn template_for(&self, args: &CallArguments) -> Result<PromptTemplate, ApiError> {
        match &self.template {
            TemplateSource::Fixed(template) => Ok(template.clone()),
            TemplateSource::Argument(name) => match args.get(name) {
                Some(serde_json::Value::String(text)) => Ok(PromptTemplate::parse(text)?),
                Some(_) => Err(ApiError::InvalidArgument {
                    name: name.clone(),
                    reason: "prompt template must be a string".to_string(),
                }),
                None => Err(ApiError::InvalidArgument {
                    name: name.clone(),
                    reason: "prompt template argument is required".to_string(),
                }),
            },
        }
    }

    fn model_for<'a>(&self, args: &'a CallArguments) -> Result<Option<&'a str>, ApiError> {
        match args.get(&self.model_argument) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(model)) => Ok(Some(model.as_str())),
            Some(_) => Err(ApiError::InvalidArgument {
                name: self.model_argument.clone(),
                reason: "model must be a string".to_string(),
            }),
        }
    }

    /// Resolve one call: template → context → pipeline → response
    #[instrument(skip_all, fields(source_keys = source.len(), arg_keys = args.len()))]
    pub async fn resolve(
        &self,
        source: &SourceEntity,
        args: &CallArguments,
    ) -> Result<GeneratedResponse, ApiError> {
        let template = self.template_for(args)?;
        let model = self.model_for(args)?;
        let context = TemplateContext::assemble(source, args);
        debug!(placeholders = ?template.placeholders(), "Context assembled");

        let text = self.pipeline.run(&template, &context, model).await?;
        Ok(GeneratedResponse { text })
    }

    /// [`resolve`](Self::resolve) bounded by `limit`; the in-flight backend
    /// request is dropped when the limit passes.
    pub async fn resolve_with_timeout(
        &self,
        source: &SourceEntity,
        args: &CallArguments,
        limit: Duration,
    ) -> Result<GeneratedResponse, ApiError> {
        match tokio::time::timeout(limit, self.resolve(source, args)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?limit, "Generation cancelled");
                Err(ApiError::Cancelled(limit))
            }
        }
    }
}

/// Operations a single type exposes for the capability
#[derive(Clone)]
pub struct TypeResolvers {
    generate: Arc<GenerateResolver>,
}

impl TypeResolvers {
    pub fn generate(&self) -> &GenerateResolver {
        &self.generate
    }
}

/// One call routed through a [`ResolverMap`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub type_name: String,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default)]
    pub source: SourceEntity,
    #[serde(default)]
    pub args: CallArguments,
}

fn default_operation() -> String {
    GENERATE_OPERATION.to_string()
}

/// Type name → capability operations, all sharing one resolver
#[derive(Clone, Default)]
pub struct ResolverMap {
    types: BTreeMap<String, TypeResolvers>,
}

impl ResolverMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `resolver` as the `generate` operation of every named type
    pub fn with_generate_resolver<I, S>(types: I, resolver: Arc<GenerateResolver>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for type_name in types {
            map.bind(type_name, Arc::clone(&resolver));
        }
        map
    }

    /// Bind every type that carries the capability after an injection pass
    pub fn from_report(report: &InjectionReport, resolver: Arc<GenerateResolver>) -> Self {
        Self::with_generate_resolver(report.capable_types(), resolver)
    }

    pub fn bind(&mut self, type_name: impl Into<String>, resolver: Arc<GenerateResolver>) {
        let type_name = type_name.into();
        if self.types.contains_key(&type_name) {
            debug!(type_name = %type_name, "Rebinding generate resolver");
        }
        self.types
            .insert(type_name, TypeResolvers { generate: resolver });
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeResolvers> {
        self.types.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Route a call to the resolver bound for `type_name.operation`
    pub async fn dispatch(
        &self,
        type_name: &str,
        operation: &str,
        source: &SourceEntity,
        args: &CallArguments,
    ) -> Result<GeneratedResponse, ApiError> {
        let resolvers = self
            .types
            .get(type_name)
            .filter(|_| operation == GENERATE_OPERATION)
            .ok_or_else(|| ApiError::UnknownBinding {
                type_name: type_name.to_string(),
                operation: operation.to_string(),
            })?;
        resolvers.generate.resolve(source, args).await
    }

    /// Resolve independent calls concurrently; results keep request order
    pub async fn dispatch_all(
        &self,
        requests: &[ResolveRequest],
    ) -> Vec<Result<GeneratedResponse, ApiError>> {
        info!(count = requests.len(), "Dispatching generate calls");
        join_all(requests.iter().map(|request| {
            self.dispatch(
                &request.type_name,
                &request.operation,
                &request.source,
                &request.args,
            )
        }))
        .await
    }
}
