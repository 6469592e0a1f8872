use crate::e2e::helpers;

use booktape::error::AppError;
use helpers::fixtures::{azure_error_body, mock_audio_bytes, translator_body, SAMPLE_TEXT};
use helpers::{file_size, TestContext, TEST_REGION, TEST_RESOURCE_KEY};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use test_context::test_context;

const TTS_PATH: &str = "/cognitiveservices/v1";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_write_audio_for_plain_text(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_header("Ocp-Apim-Subscription-Key", TEST_RESOURCE_KEY)
        .match_header("X-Microsoft-OutputFormat", "audio-48khz-192kbitrate-mono-mp3")
        .match_body(Matcher::Regex("Call me Ishmael".to_string()))
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(mock_audio_bytes())
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "narrate",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-s",
        "en",
    ])
    .await
    .unwrap();

    tts.assert_async().await;
    assert!(file_size(&output) > 0);
    assert_eq!(std::fs::read(&output).unwrap(), mock_audio_bytes());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_detect_language_and_pick_default_voice(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_body(Matcher::Regex("en-US-JennyNeural".to_string()))
        .with_status(200)
        .with_body(mock_audio_bytes())
        .expect(1)
        .create_async()
        .await;

    ctx.run(&["narrate", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .await
        .unwrap();

    tts.assert_async().await;
    assert!(output.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_translated_text_when_target_given(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", "Call me Ishmael.").unwrap();
    let output = ctx.path("book_de.mp3");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api-version".to_string(), "3.0".to_string()),
            Matcher::UrlEncoded("from".to_string(), "en".to_string()),
            Matcher::UrlEncoded("to".to_string(), "de".to_string()),
        ]))
        .match_header("Ocp-Apim-Subscription-Key", TEST_RESOURCE_KEY)
        .match_header("Ocp-Apim-Subscription-Region", TEST_REGION)
        .match_body(Matcher::PartialJsonString(
            r#"[{"Text": "Call me Ishmael."}]"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(translator_body("en", &[("de", "Nennt mich Ismael.")]))
        .expect(1)
        .create_async()
        .await;

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Nennt mich Ismael".to_string()),
            Matcher::Regex("de-DE-KatjaNeural".to_string()),
        ]))
        .with_status(200)
        .with_body(mock_audio_bytes())
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "narrate",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-s",
        "en",
        "-t",
        "de",
    ])
    .await
    .unwrap();

    translator.assert_async().await;
    tts.assert_async().await;
    assert!(file_size(&output) > 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_before_any_request_without_resource_key(ctx: &mut TestContext) {
    ctx.without_resource_key();
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-t",
            "de",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Authentication(_)));
    assert!(err.to_string().contains("RESOURCE_KEY"));
    assert_eq!(err.exit_code(), 3);
    translator.assert_async().await;
    tts.assert_async().await;
    assert!(!output.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_leave_no_file_when_speech_quota_is_exceeded(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .with_status(429)
        .with_body("Too many requests")
        .expect(1)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "en",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::QuotaExceeded(_)));
    assert_eq!(err.exit_code(), 4);
    tts.assert_async().await;
    assert!(!output.exists());
    assert!(!ctx.path("book.mp3.part").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stop_before_synthesis_when_translation_quota_is_exceeded(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(azure_error_body(403001, "The operation is not allowed because the subscription has exceeded its free quota."))
        .expect(1)
        .create_async()
        .await;
    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-t",
            "fr",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::QuotaExceeded(_)));
    translator.assert_async().await;
    tts.assert_async().await;
    assert!(!output.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_rejected_key_as_authentication_error(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            ctx.path("book.mp3").to_str().unwrap(),
            "-s",
            "en",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Authentication(_)));
    tts.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_retry_transient_failures_up_to_three_attempts(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "en",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(err.exit_code(), 5);
    tts.assert_async().await;
    assert!(!output.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_input_without_calling_services(ctx: &mut TestContext) {
    let input = ctx.write_file("empty.txt", "   \n\t ").unwrap();

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "narrate",
            input.to_str().unwrap(),
            "-o",
            ctx.path("empty.mp3").to_str().unwrap(),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(err.exit_code(), 2);
    tts.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_input_file(ctx: &mut TestContext) {

    let err = ctx
        .run(&[
            "narrate",
            ctx.path("missing.txt").to_str().unwrap(),
            "-o",
            ctx.path("missing.mp3").to_str().unwrap(),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_narrate_every_text_file_in_a_directory(ctx: &mut TestContext) {
    ctx.write_file("book/chapter_1.txt", "Call me Ishmael.").unwrap();
    ctx.write_file("book/chapter_2.txt", "It was a dark night.").unwrap();
    ctx.write_file("book/cover.jpg", "not text").unwrap();
    let out_dir = ctx.path("audio");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_header("X-Microsoft-OutputFormat", "ogg-48khz-16bit-mono-opus")
        .with_status(200)
        .with_body(b"OggS-audio")
        .expect(2)
        .create_async()
        .await;

    ctx.run(&[
        "narrate",
        ctx.path("book").to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "-s",
        "en",
        "--format",
        "ogg",
    ])
    .await
    .unwrap();

    tts.assert_async().await;
    assert!(out_dir.join("chapter_1_voice_synthesis.ogg").exists());
    assert!(out_dir.join("chapter_2_voice_synthesis.ogg").exists());
    assert!(!out_dir.join("cover_voice_synthesis.ogg").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_voice_config_file(ctx: &mut TestContext) {
    let input = ctx.write_file("book.txt", SAMPLE_TEXT).unwrap();
    let voice_config = ctx
        .write_file(
            "voice.json",
            r#"{"voice": "en-GB-RyanNeural", "style": "cheerful", "rate": "+10%"}"#,
        )
        .unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("en-GB-RyanNeural".to_string()),
            Matcher::Regex(r#"style="cheerful""#.to_string()),
            Matcher::Regex(r#"rate="\+10%""#.to_string()),
        ]))
        .with_status(200)
        .with_body(mock_audio_bytes())
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "narrate",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--voice-config",
        voice_config.to_str().unwrap(),
    ])
    .await
    .unwrap();

    tts.assert_async().await;
    assert!(output.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_speak_text_with_line_breaks_and_urls_intact(ctx: &mut TestContext) {
    let text = "Chapter One\n\nSee https://example.com/map for the route.\nIt was cold.";
    let input = ctx.write_file("book.txt", &format!("\n{}\n\n", text)).unwrap();
    let output = ctx.path("book.mp3");

    let tts = ctx
        .server
        .mock("POST", TTS_PATH)
        .match_body(Matcher::Regex(regex::escape(text)))
        .with_status(200)
        .with_body(mock_audio_bytes())
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "narrate",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-s",
        "en",
    ])
    .await
    .unwrap();

    tts.assert_async().await;
    assert!(output.exists());
}
