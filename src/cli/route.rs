//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::output::parse_json_object;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_context_json, format_generated_json, format_injection_report_json,
    format_injection_report_text, format_validation_result,
};
use crate::cli::command_name;
use crate::config::{global_config_path, ConfigLoader, GraphgenConfig};
use crate::error::{ApiError, SchemaError};
use crate::provider::ModelProviderClient;
use crate::resolver::{ResolverMap, GENERATE_OPERATION};
use crate::schema::{
    load_schema, print_schema, schema_to_json, CapabilityInjector, Document, DuplicatePolicy,
    EligibilityPolicy, InjectionReport, SchemaNode,
};
use crate::template::TemplateContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// Runtime context for CLI execution: workspace, loaded configuration and
/// an optional backend override. Configuration is loaded once here and only
/// read afterwards.
pub struct RunContext {
    workspace_root: PathBuf,
    config: GraphgenConfig,
    client: Option<Arc<dyn ModelProviderClient>>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::from_config(workspace_root, config))
    }

    pub fn from_config(workspace_root: PathBuf, config: GraphgenConfig) -> Self {
        Self {
            workspace_root,
            config,
            client: None,
        }
    }

    /// Use `client` instead of the configured provider for generate calls
    pub fn with_client(mut self, client: Arc<dyn ModelProviderClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(&self) -> &GraphgenConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let span = info_span!("command", name = %name);
        let _guard = span.enter();
        let started = Instant::now();

        let result = match command {
            Commands::Inject {
                schema,
                json,
                interface,
                skip_existing,
                report,
            } => self.handle_inject(schema, *json, interface.as_deref(), *skip_existing, *report),
            Commands::Context { source, args } => self.handle_context(source, args),
            Commands::Generate {
                type_name,
                source,
                args,
                schema,
                timeout_secs,
            } => self.handle_generate(type_name, source, args, schema.as_deref(), *timeout_secs),
            Commands::Config { command } => self.handle_config(command),
        };

        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    fn read_schema(&self, path: &Path) -> Result<Document, ApiError> {
        let path = self.resolve_path(path);
        debug!(schema = %path.display(), "Reading schema");
        let text = std::fs::read_to_string(&path)?;
        Ok(load_schema(&text)?)
    }

    fn run_injection(
        &self,
        injector: &CapabilityInjector,
        document: Document,
    ) -> Result<(Document, InjectionReport), ApiError> {
        let (root, report) = injector.inject_with_report(document.into_node())?;
        match root {
            SchemaNode::Document(doc) => Ok((doc, report)),
            other => Err(SchemaError::Malformed {
                path: "$".to_string(),
                reason: format!("traversal returned a {} root", other.kind()),
            }
            .into()),
        }
    }

    fn handle_inject(
        &self,
        schema: &Path,
        json: bool,
        interface: Option<&str>,
        skip_existing: bool,
        report_only: bool,
    ) -> Result<String, ApiError> {
        self.config.ensure_valid()?;
        let mut injector_config = self.config.capability.injector_config();
        if let Some(interface) = interface {
            injector_config.eligibility = EligibilityPolicy::ImplementsInterface(interface.to_string());
        }
        if skip_existing {
            injector_config.duplicates = DuplicatePolicy::SkipExisting;
        }
        let injector = CapabilityInjector::new(injector_config)?;

        let document = self.read_schema(schema)?;
        let (document, report) = self.run_injection(&injector, document)?;

        match (report_only, json) {
            (true, true) => format_injection_report_json(&report),
            (true, false) => Ok(format_injection_report_text(&report)),
            (false, true) => Ok(schema_to_json(&document)?),
            (false, false) => Ok(print_schema(&document).trim_end().to_string()),
        }
    }

    fn handle_context(&self, source: &str, args: &str) -> Result<String, ApiError> {
        let source = parse_json_object("source", source)?;
        let args = parse_json_object("args", args)?;
        format_context_json(&TemplateContext::assemble(&source, &args))
    }

    /// Types the resolver is bound to for one generate call
    fn binding_types(
        &self,
        type_name: &str,
        schema: Option<&Path>,
    ) -> Result<Vec<String>, ApiError> {
        let configured = &self.config.capability.bind_types;
        let types = match schema {
            Some(schema) => {
                let injector = self.config.capability.injector()?;
                let (_, report) = self.run_injection(&injector, self.read_schema(schema)?)?;
                report
                    .capable_types()
                    .filter(|name| configured.is_empty() || configured.iter().any(|c| c == name))
                    .map(str::to_string)
                    .collect()
            }
            None if configured.is_empty() => vec![type_name.to_string()],
            None => configured.clone(),
        };
        Ok(types)
    }

    fn handle_generate(
        &self,
        type_name: &str,
        source: &str,
        args: &str,
        schema: Option<&Path>,
        timeout_secs: Option<u64>,
    ) -> Result<String, ApiError> {
        self.config.ensure_valid()?;
        let source = parse_json_object("source", source)?;
        let args = parse_json_object("args", args)?;

        let resolver = match &self.client {
            Some(client) => self.config.build_resolver(Arc::clone(client))?,
            None => self.config.build_provider_resolver()?,
        };
        let map = ResolverMap::with_generate_resolver(
            self.binding_types(type_name, schema)?,
            Arc::new(resolver),
        );
        let resolvers = map
            .get(type_name)
            .ok_or_else(|| ApiError::UnknownBinding {
                type_name: type_name.to_string(),
                operation: GENERATE_OPERATION.to_string(),
            })?;
        let limit = timeout_secs
            .map(Duration::from_secs)
            .or_else(|| self.config.capability.timeout());

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::GenerationFailed(format!("Failed to create runtime: {}", e)))?;
        let response = rt.block_on(async {
            match limit {
                Some(limit) => {
                    resolvers
                        .generate()
                        .resolve_with_timeout(&source, &args, limit)
                        .await
                }
                None => resolvers.generate().resolve(&source, &args).await,
            }
        })?;
        format_generated_json(&response)
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => toml::to_string_pretty(&self.config.redacted())
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
            ConfigCommands::Validate => {
                let result = self.config.validate();
                let text = format_validation_result(&result);
                match result {
                    Ok(()) => Ok(text),
                    Err(_) => Err(ApiError::ConfigError(text)),
                }
            }
            ConfigCommands::Path => global_config_path()
                .map(|path| path.display().to_string())
                .ok_or_else(|| {
                    ApiError::ConfigError("Neither XDG_CONFIG_HOME nor HOME is set".to_string())
                }),
        }
    }
}
