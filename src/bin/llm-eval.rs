#[path = "llm-eval/app/mod.rs"]
mod app;
#[path = "llm-eval/args.rs"]
mod args;
#[path = "llm-eval/config/mod.rs"]
mod config;
#[path = "llm-eval/logging.rs"]
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
