use crate::e2e::helpers;

use booktape::error::AppError;
use helpers::fixtures::{azure_error_body, translator_body};
use helpers::TestContext;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_write_one_file_per_target_language(ctx: &mut TestContext) {
    let input = ctx.write_file("chapter_1.txt", "Good morning.").unwrap();
    let out_dir = ctx.path("translated");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("from".to_string(), "en".to_string()),
            Matcher::UrlEncoded("to".to_string(), "de".to_string()),
            Matcher::UrlEncoded("to".to_string(), "zh-Hans".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(translator_body(
            "en",
            &[("de", "Guten Morgen."), ("zh-Hans", "早上好。")],
        ))
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "translate",
        input.to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "-t",
        "de",
        "-t",
        "zh-Hans",
    ])
    .await
    .unwrap();

    translator.assert_async().await;
    assert_eq!(
        std::fs::read_to_string(out_dir.join("chapter_1_de.txt")).unwrap(),
        "Guten Morgen."
    );
    assert_eq!(
        std::fs::read_to_string(out_dir.join("chapter_1_zh-Hans.txt")).unwrap(),
        "早上好。"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_to_simplified_chinese(ctx: &mut TestContext) {
    let input = ctx.write_file("note.txt", "Hello.").unwrap();
    let out_dir = ctx.path("out");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::UrlEncoded("to".to_string(), "zh-Hans".to_string()))
        .with_status(200)
        .with_body(translator_body("en", &[("zh-Hans", "你好。")]))
        .expect(1)
        .create_async()
        .await;

    ctx.run(&["translate", input.to_str().unwrap(), "-o", out_dir.to_str().unwrap()])
        .await
        .unwrap();

    translator.assert_async().await;
    assert!(out_dir.join("note_zh-Hans.txt").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_translate_every_text_file_in_a_directory(ctx: &mut TestContext) {
    ctx.write_file("book/chapter_1.txt", "One.").unwrap();
    ctx.write_file("book/chapter_2.txt", "Two.").unwrap();
    let out_dir = ctx.path("out");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(translator_body("en", &[("fr", "Texte.")]))
        .expect(2)
        .create_async()
        .await;

    ctx.run(&[
        "translate",
        ctx.path("book").to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "-t",
        "fr",
    ])
    .await
    .unwrap();

    translator.assert_async().await;
    assert!(out_dir.join("chapter_1_fr.txt").exists());
    assert!(out_dir.join("chapter_2_fr.txt").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_write_nothing_when_quota_is_exceeded(ctx: &mut TestContext) {
    let input = ctx.write_file("chapter_1.txt", "Good morning.").unwrap();
    let out_dir = ctx.path("translated");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(azure_error_body(429001, "The server rejected the request because the client has exceeded request limits."))
        .expect(1)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "translate",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "-t",
            "de",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::QuotaExceeded(_)));
    translator.assert_async().await;
    assert!(!out_dir.exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_resource_key(ctx: &mut TestContext) {
    ctx.without_resource_key();
    let input = ctx.write_file("chapter_1.txt", "Good morning.").unwrap();

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = ctx
        .run(&["translate", input.to_str().unwrap(), "-o", ctx.path("out").to_str().unwrap()])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Authentication(_)));
    translator.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_bad_request_to_invalid_input(ctx: &mut TestContext) {
    let input = ctx.write_file("chapter_1.txt", "Good morning.").unwrap();

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(azure_error_body(400036, "The target language is not valid."))
        .expect(1)
        .create_async()
        .await;

    let err = ctx
        .run(&[
            "translate",
            input.to_str().unwrap(),
            "-o",
            ctx.path("out").to_str().unwrap(),
            "-t",
            "xx",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(err.to_string().contains("400036"));
    translator.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_and_write_text_with_line_breaks_intact(ctx: &mut TestContext) {
    let input = ctx
        .write_file("chapter_1.txt", "Moby Dick\n\nCall me Ishmael. See https://example.com.\n")
        .unwrap();
    let out_dir = ctx.path("out");

    let translator = ctx
        .server
        .mock("POST", "/translate")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(serde_json::json!([
            { "Text": "Moby Dick\n\nCall me Ishmael. See https://example.com." }
        ])))
        .with_status(200)
        .with_body(translator_body(
            "en",
            &[("de", "Moby Dick\n\nNennt mich Ismael. Siehe https://example.com.")],
        ))
        .expect(1)
        .create_async()
        .await;

    ctx.run(&[
        "translate",
        input.to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "-t",
        "de",
    ])
    .await
    .unwrap();

    translator.assert_async().await;
    assert_eq!(
        std::fs::read_to_string(out_dir.join("chapter_1_de.txt")).unwrap(),
        "Moby Dick\n\nNennt mich Ismael. Siehe https://example.com."
    );
}
