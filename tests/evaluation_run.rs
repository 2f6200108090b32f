use std::fs;
use std::sync::Arc;
use std::time::Duration;

use llm_eval::backends::{Anthropic, Grok, LocalInstance, OpenAI};
use llm_eval::report::{generate_report, load_results, save_results};
use llm_eval::{Backend, Catalog, EvaluationRunner};

fn local_and_stubs(base_url: String) -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(Anthropic::new(None)),
        Box::new(Grok::new()),
        Box::new(LocalInstance::new(base_url)),
    ]
}

#[tokio::test]
async fn debugging_run_round_trips_through_files() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(format!(r#"{{"response":"{}"}}"#, "x".repeat(600)))
        .expect(3)
        .create_async()
        .await;

    let mut runner = EvaluationRunner::new(
        Arc::new(Catalog::builtin()),
        local_and_stubs(server.url()),
    )
    .delay(Duration::ZERO);
    runner.run_category("debugging").await.unwrap();
    mock.assert_async().await;

    let dir = tempfile::tempdir().unwrap();
    let json_path = save_results(&runner.report(), None, dir.path()).unwrap();
    let loaded = load_results(&json_path).unwrap();

    assert_eq!(loaded.metadata.total_tests, loaded.results.len());
    assert_eq!(loaded.results.len(), 3);
    assert_eq!(
        loaded.metadata.systems,
        vec!["Claude Code", "Grok", "Local Instance"]
    );
    for result in &loaded.results {
        let names: Vec<&str> = result.responses.names().collect();
        assert_eq!(names, loaded.metadata.systems);
        assert!(result.responses.get("Claude Code").unwrap().is_skipped());
        assert!(result.responses.get("Grok").unwrap().is_skipped());
        assert_eq!(
            result.responses.get("Local Instance").unwrap().response.len(),
            600
        );
    }

    let md_path = generate_report(runner.results(), dir.path()).unwrap();
    let md = fs::read_to_string(md_path).unwrap();
    assert!(md.contains(&format!("{}...", "x".repeat(500))));
    assert!(!md.contains(&"x".repeat(501)));
    assert_eq!(md.matches("| Local Instance | - | - | - | - | - | - |").count(), 3);
    assert!(md.contains("⚠️ SKIPPED - No API key"));
}

#[tokio::test]
async fn failing_backend_does_not_stop_the_run() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .create_async()
        .await;
    let backends: Vec<Box<dyn Backend>> = vec![
        Box::new(OpenAI::new(Some("sk-test".to_string())).with_base_url(server.url())),
        Box::new(LocalInstance::new("http://127.0.0.1:1")),
    ];

    let mut runner =
        EvaluationRunner::new(Arc::new(Catalog::builtin()), backends).delay(Duration::ZERO);
    let ran = runner.run_category("nhs_specific").await.unwrap();

    assert_eq!(ran, 2);
    for result in runner.results() {
        assert_eq!(result.responses.get("ChatGPT").unwrap().response, "ERROR: HTTP 503");
        assert!(result
            .responses
            .get("Local Instance")
            .unwrap()
            .response
            .starts_with("ERROR:"));
    }
}

#[tokio::test]
async fn unknown_category_leaves_nothing_to_save() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let mut runner = EvaluationRunner::new(
        Arc::new(Catalog::builtin()),
        local_and_stubs(server.url()),
    )
    .delay(Duration::ZERO);
    assert!(runner.run_category("frontend").await.is_err());
    mock.assert_async().await;

    let report = runner.report();
    assert_eq!(report.metadata.total_tests, 0);
    assert!(report.results.is_empty());
}
