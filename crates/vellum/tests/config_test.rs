//! Tests for configuration loading and engine wiring.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vellum::{
    AudioResponse, FileStore, GenerationService, ImageResponse, InputField, InputType,
    Localizable, MediaRequest, ObjectRequest, ObjectResponse, TextRequest, TextResponse,
    VellumConfig, VellumResult,
};

/// Records the model and prompt of each text request and echoes the prompt.
#[derive(Default)]
struct RecordingService {
    models: Mutex<Vec<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationService for RecordingService {
    async fn generate_text(&self, req: &TextRequest) -> VellumResult<TextResponse> {
        self.models.lock().unwrap().push(req.model.clone());
        self.prompts.lock().unwrap().push(req.prompt.clone());
        Ok(TextResponse {
            text: format!("echo: {}", req.prompt),
            path: None,
        })
    }

    async fn generate_object(&self, _req: &ObjectRequest) -> VellumResult<ObjectResponse> {
        Ok(ObjectResponse {
            object: serde_json::Value::Null,
            path: None,
        })
    }

    async fn generate_image(&self, _req: &MediaRequest) -> VellumResult<ImageResponse> {
        Ok(ImageResponse {
            images: Vec::new(),
            path: None,
        })
    }

    async fn generate_audio(&self, _req: &MediaRequest) -> VellumResult<AudioResponse> {
        Ok(AudioResponse {
            audios: Vec::new(),
            path: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

#[test]
fn test_bundled_defaults() {
    let config = VellumConfig::from_toml("").unwrap();

    assert_eq!(config.default_language(), "en-US");
    assert_eq!(config.storage().apps_prefix(), "apps");
    assert_eq!(config.storage().root().to_str(), Some("vellum-data"));
    assert_eq!(config.models().text, None);
}

#[test]
fn test_toml_overrides_defaults() {
    let config = VellumConfig::from_toml(
        r#"
        default_language = "pt-BR"

        [models]
        text = "fast-text"
        image = "sharp-image"
        "#,
    )
    .unwrap();

    assert_eq!(config.default_language(), "pt-BR");
    assert_eq!(config.models().text.as_deref(), Some("fast-text"));
    assert_eq!(config.models().image.as_deref(), Some("sharp-image"));
    // Untouched sections keep their defaults
    assert_eq!(config.storage().apps_prefix(), "apps");
}

#[test]
fn test_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vellum.toml");
    std::fs::write(
        &path,
        r#"
        default_language = "es-ES"

        [storage]
        root = "/srv/vellum"
        apps_prefix = "projects"
        "#,
    )
    .unwrap();

    let config = VellumConfig::from_file(&path).unwrap();

    assert_eq!(config.default_language(), "es-ES");
    assert_eq!(config.storage().root().to_str(), Some("/srv/vellum"));
    assert_eq!(config.storage().apps_prefix(), "projects");
}

#[test]
fn test_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = VellumConfig::from_file(temp_dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err.kind(), vellum::VellumErrorKind::Config(_)));
}

#[test]
fn test_empty_language_rejected() {
    assert!(VellumConfig::from_toml(r#"default_language = "  ""#).is_err());
}

#[test]
fn test_new_app_uses_default_language() {
    let config = VellumConfig::from_toml(r#"default_language = "fr-FR""#).unwrap();
    let app = config.new_app("Recettes");

    assert_eq!(app.selected_language, "fr-FR");
}

#[tokio::test]
async fn test_orchestrator_uses_configured_models_and_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let toml = format!(
        r#"
        [storage]
        root = "{}"
        apps_prefix = "projects/"

        [models]
        text = "fast-text"
        "#,
        temp_dir.path().join("data").display()
    );
    let config = VellumConfig::from_toml(&toml).unwrap();

    let files: Arc<dyn FileStore> = Arc::new(config.file_store().unwrap());
    let service = Arc::new(RecordingService::default());

    let mut app = config.new_app("Story maker");
    app.add_input(InputField::new("name.md", InputType::Text, "Name"))
        .unwrap();
    app.actions.push(
        vellum::ActionData::new(vellum::ActionType::GenerateText, "story.md")
            .with_prompt_text("Tell a story about @name.md"),
    );

    let mut orchestrator = config.orchestrator(app, service.clone(), files.clone());
    orchestrator.set_input_value("name.md", "Ana").unwrap();
    let report = orchestrator.run_all().await.unwrap();
    orchestrator.save().await.unwrap();

    assert!(report.is_success());
    assert_eq!(
        *service.models.lock().unwrap(),
        vec![Some("fast-text".to_string())]
    );

    let key = format!("projects/{}.json", orchestrator.app().id);
    assert!(files.exists(&key).await.unwrap());
    assert!(temp_dir.path().join("data").join(&key).is_file());
}

#[tokio::test]
async fn test_open_reads_configured_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let toml = format!(
        r#"
        [storage]
        root = "{}"
        apps_prefix = "projects"

        [models]
        text = "fast-text"
        "#,
        temp_dir.path().display()
    );
    let config = VellumConfig::from_toml(&toml).unwrap();
    let files: Arc<dyn FileStore> = Arc::new(config.file_store().unwrap());
    let service = Arc::new(RecordingService::default());

    let mut app = config.new_app("Story maker");
    app.add_input(InputField::new("name.md", InputType::Text, "Name"))
        .unwrap();
    app.actions.push(
        vellum::ActionData::new(vellum::ActionType::GenerateText, "story.md")
            .with_prompt_text("Tell a story about @name.md"),
    );
    let mut orchestrator = config.orchestrator(app, service.clone(), files.clone());
    orchestrator.set_input_value("name.md", "Ana").unwrap();
    orchestrator.save().await.unwrap();
    let id = orchestrator.app().id;

    let mut reopened = config.open(id, service.clone(), files.clone()).await.unwrap();
    assert_eq!(reopened.app(), orchestrator.app());

    // Reopened orchestrators keep the configured models and prefix
    reopened.run_all().await.unwrap();
    reopened.save().await.unwrap();
    assert_eq!(
        *service.models.lock().unwrap(),
        vec![Some("fast-text".to_string())]
    );
    assert!(files.exists(&format!("projects/{id}.json")).await.unwrap());
    assert!(!files.exists(&format!("apps/{id}.json")).await.unwrap());
}

#[tokio::test]
async fn test_orchestrator_falls_back_to_configured_language() {
    let config = VellumConfig::from_toml(r#"default_language = "pt-BR""#).unwrap();
    let files: Arc<dyn FileStore> = Arc::new(vellum::InMemoryFileStore::new());
    let service = Arc::new(RecordingService::default());

    let mut app = config.new_app("Historias");
    app.add_input(InputField::new("name.md", InputType::Text, "Name"))
        .unwrap();
    app.actions.push(
        vellum::ActionData::new(vellum::ActionType::GenerateText, "story.md").with_prompt(
            Localizable::from_iter([
                ("en-US", "Tell a story about @name.md".to_string()),
                ("pt-BR", "Conte uma historia sobre @name.md".to_string()),
            ]),
        ),
    );

    let mut orchestrator = config.orchestrator(app, service.clone(), files);
    assert_eq!(orchestrator.fallback_language(), "pt-BR");
    orchestrator.set_language("fr-FR");
    orchestrator.set_input_value("name.md", "Ana").unwrap();
    orchestrator.run_action(0).await.unwrap();

    assert_eq!(
        *service.prompts.lock().unwrap(),
        vec!["Conte uma historia sobre Ana".to_string()]
    );
}
