//! Integration tests for the shared generate resolver and resolver map

use super::test_utils::{ScriptedProvider, MOVIE_SCHEMA};
use graphgen::error::{ApiError, TemplateError};
use graphgen::pipeline::GenerationPipeline;
use graphgen::resolver::{
    GenerateResolver, ResolveRequest, ResolverMap, TemplateSource, GENERATE_OPERATION,
};
use graphgen::schema::{parse_schema, CapabilityInjector, DuplicatePolicy, InjectorConfig};
use graphgen::template::PromptTemplate;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn resolver(provider: Arc<ScriptedProvider>, template: TemplateSource) -> Arc<GenerateResolver> {
    Arc::new(GenerateResolver::new(GenerationPipeline::new(provider), template))
}

#[tokio::test]
async fn test_caller_template_is_filled_from_source_and_args() {
    let provider = ScriptedProvider::echo().shared();
    let resolver = resolver(provider.clone(), TemplateSource::default());

    let source = object(json!({ "name": "Actor X", "awards": ["Oscar", "Globe"] }));
    let args = object(json!({ "prompt": "Describe {name} who won {awards}" }));
    let response = resolver.resolve(&source, &args).await.unwrap();

    assert_eq!(
        response.text,
        r#"[scripted] Describe Actor X who won ["Oscar","Globe"]"#
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_missing_placeholder_never_reaches_backend() {
    let provider = ScriptedProvider::echo().shared();
    let template = PromptTemplate::parse("Who directed {title}? {director}").unwrap();
    let resolver = resolver(provider.clone(), TemplateSource::Fixed(template));

    let err = resolver
        .resolve(&object(json!({ "title": "Inception" })), &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Templating(TemplateError::MissingPlaceholder { ref name }) if name == "director"
    ));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_model_argument_overrides_backend_model() {
    let provider = ScriptedProvider::echo().shared();
    let resolver = resolver(provider, TemplateSource::default());
    let args = object(json!({ "prompt": "Summarize {title}", "model": "gpt-4o" }));
    let response = resolver
        .resolve(&object(json!({ "title": "Inception" })), &args)
        .await
        .unwrap();
    assert_eq!(response.text, "[gpt-4o] Summarize Inception");
}

#[tokio::test]
async fn test_backend_failure_propagates_unchanged() {
    let provider = ScriptedProvider::new(|_, _| {
        Err(ApiError::ProviderRateLimit("try later".to_string()))
    })
    .shared();
    let resolver = resolver(provider, TemplateSource::default());
    let err = resolver
        .resolve(&Map::new(), &object(json!({ "prompt": "Hello" })))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ProviderRateLimit(_)));
    assert!(err.is_backend());
}

#[tokio::test]
async fn test_concurrent_calls_are_isolated() {
    let provider = ScriptedProvider::echo()
        .with_delay(Duration::from_millis(20))
        .shared();
    let shared = resolver(provider.clone(), TemplateSource::default());
    let map = ResolverMap::with_generate_resolver(["Movie", "Actor"], shared);

    let requests = vec![
        ResolveRequest {
            type_name: "Movie".to_string(),
            operation: GENERATE_OPERATION.to_string(),
            source: object(json!({ "title": "Inception" })),
            args: object(json!({ "prompt": "Movie: {title}" })),
        },
        ResolveRequest {
            type_name: "Actor".to_string(),
            operation: GENERATE_OPERATION.to_string(),
            source: object(json!({ "title": "Actor X" })),
            args: object(json!({ "prompt": "Actor: {title}", "model": "small" })),
        },
    ];
    let results = map.dispatch_all(&requests).await;

    let texts: Vec<String> = results.into_iter().map(|r| r.unwrap().text).collect();
    assert_eq!(
        texts,
        vec!["[scripted] Movie: Inception", "[small] Actor: Actor X"]
    );
    let mut prompts = provider.prompts();
    prompts.sort();
    assert_eq!(prompts, vec!["Actor: Actor X", "Movie: Inception"]);
}

#[tokio::test]
async fn test_spawned_calls_share_one_resolver() {
    let provider = ScriptedProvider::echo()
        .with_delay(Duration::from_millis(5))
        .shared();
    let shared = resolver(provider, TemplateSource::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&shared);
            tokio::spawn(async move {
                let source = object(json!({ "id": i }));
                let args = object(json!({ "prompt": "item {id}" }));
                resolver.resolve(&source, &args).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.text, format!("[scripted] item {}", i));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_slow_backend() {
    let provider = ScriptedProvider::echo()
        .with_delay(Duration::from_secs(30))
        .shared();
    let resolver = resolver(provider, TemplateSource::default());

    let err = resolver
        .resolve_with_timeout(
            &Map::new(),
            &object(json!({ "prompt": "Hello" })),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Cancelled(limit) if limit == Duration::from_secs(1)));
}

#[tokio::test]
async fn test_map_from_injection_report_binds_augmented_types() {
    let (_, report) = CapabilityInjector::new(InjectorConfig::default())
        .unwrap()
        .inject_with_report(parse_schema(MOVIE_SCHEMA).unwrap().into_node())
        .unwrap();
    let provider = ScriptedProvider::echo().shared();
    let map = ResolverMap::from_report(&report, resolver(provider, TemplateSource::default()));

    assert_eq!(map.type_names().collect::<Vec<_>>(), vec!["Actor", "Movie", "Named"]);

    let args = object(json!({ "prompt": "Hi {name}" }));
    let source = object(json!({ "name": "Actor X" }));
    let ok = map
        .dispatch("Actor", GENERATE_OPERATION, &source, &args)
        .await
        .unwrap();
    assert_eq!(ok.text, "[scripted] Hi Actor X");

    let err = map
        .dispatch("Date", GENERATE_OPERATION, &source, &args)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnknownBinding { ref type_name, .. } if type_name == "Date"));

    let err = map
        .dispatch("Actor", "summarize", &source, &args)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnknownBinding { ref operation, .. } if operation == "summarize"));
}

#[tokio::test]
async fn test_rerun_with_skip_existing_still_binds_every_type() {
    let injector = CapabilityInjector::new(InjectorConfig {
        duplicates: DuplicatePolicy::SkipExisting,
        ..InjectorConfig::default()
    })
    .unwrap();
    let once = injector
        .inject_document(parse_schema(MOVIE_SCHEMA).unwrap())
        .unwrap();
    let (_, report) = injector.inject_with_report(once.into_node()).unwrap();
    assert!(report.augmented.is_empty());

    let provider = ScriptedProvider::echo().shared();
    let map = ResolverMap::from_report(&report, resolver(provider, TemplateSource::default()));
    assert_eq!(map.type_names().collect::<Vec<_>>(), vec!["Actor", "Movie", "Named"]);

    let response = map
        .dispatch(
            "Movie",
            GENERATE_OPERATION,
            &object(json!({ "title": "Inception" })),
            &object(json!({ "prompt": "Tagline for {title}" })),
        )
        .await
        .unwrap();
    assert_eq!(response.text, "[scripted] Tagline for Inception");
}
