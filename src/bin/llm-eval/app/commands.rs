use llm_eval::{Backend, Catalog};

pub(super) fn list_categories(catalog: &Catalog) {
    println!("\n📋 Available test categories:");
    for category in catalog.categories() {
        println!("  - {}: {} tests", category.name, category.tests.len());
    }
}

/// Warns about backends whose answers will be recorded as skipped.
pub(super) fn report_unavailable(backends: &[Box<dyn Backend>]) {
    for backend in backends.iter().filter(|b| !b.is_available()) {
        println!("⚠️  {} not configured. Skipping.", backend.name());
    }
}

pub(super) fn print_next_steps() {
    println!("\n✅ Evaluation complete!");
    println!("\nNext steps:");
    println!("1. Open the generated Markdown report");
    println!("2. Manually score each response (1-5)");
    println!("3. Calculate total scores");
    println!("4. Identify areas for improvement");
}
