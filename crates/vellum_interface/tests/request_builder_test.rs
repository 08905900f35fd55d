use serde_json::json;
use vellum_error::{BuilderErrorKind, GenerationErrorKind, VellumErrorKind, VellumResult};
use vellum_interface::{
    AudioResponse, GenerationService, ImageResponse, MediaRequest, MediaResponse, ObjectRequest,
    ObjectResponse, TextRequest, TextResponse, VideoResponse,
};

#[test]
fn test_text_request_requires_prompt() {
    let err = TextRequest::builder().model("m").build().unwrap_err();
    assert!(matches!(err.kind(), BuilderErrorKind::MissingField(field) if field == "prompt"));
}

#[test]
fn test_object_request_carries_schema() {
    let request = ObjectRequest::builder()
        .prompt("List colors")
        .schema(json!({"type": "object"}))
        .build()
        .unwrap();
    assert_eq!(request.schema["type"], "object");
    assert_eq!(request.model, None);
}

#[test]
fn test_media_request_defaults_to_no_options() {
    let request = MediaRequest::builder().prompt("A cat").build().unwrap();
    assert!(request.options.is_empty());
}

#[test]
fn test_primary_file_prefers_stored_path() {
    let response = ImageResponse {
        images: vec!["https://cdn/1.png".to_string()],
        path: Some("images/1.png".to_string()),
    };
    assert_eq!(response.primary_file(), Some("images/1.png"));

    let response = AudioResponse {
        audios: vec!["https://cdn/1.mp3".to_string()],
        path: None,
    };
    assert_eq!(response.primary_file(), Some("https://cdn/1.mp3"));

    assert_eq!(VideoResponse::default().primary_file(), None);
}

struct TextOnly;

#[async_trait::async_trait]
impl GenerationService for TextOnly {
    async fn generate_text(&self, req: &TextRequest) -> VellumResult<TextResponse> {
        Ok(TextResponse {
            text: req.prompt.clone(),
            path: None,
        })
    }

    async fn generate_object(&self, _req: &ObjectRequest) -> VellumResult<ObjectResponse> {
        Ok(ObjectResponse::default())
    }

    async fn generate_image(&self, _req: &MediaRequest) -> VellumResult<ImageResponse> {
        Ok(ImageResponse::default())
    }

    async fn generate_audio(&self, _req: &MediaRequest) -> VellumResult<AudioResponse> {
        Ok(AudioResponse::default())
    }

    fn provider_name(&self) -> &'static str {
        "text-only"
    }
}

#[tokio::test]
async fn test_video_defaults_to_unavailable() {
    let request = MediaRequest::builder().prompt("clip").build().unwrap();
    let err = TextOnly.generate_video(&request).await.unwrap_err();
    match err.kind() {
        VellumErrorKind::Generation(e) => {
            assert!(matches!(
                &e.kind,
                GenerationErrorKind::Unavailable(msg) if msg.contains("text-only")
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}
