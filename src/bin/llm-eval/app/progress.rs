use llm_eval::RunEvent;

const RULE_WIDTH: usize = 80;
const PROMPT_PREVIEW: usize = 100;
const RESPONSE_PREVIEW: usize = 200;

/// Console progress lines for a running evaluation.
pub(super) fn print_event(event: RunEvent<'_>) {
    match event {
        RunEvent::CategoryStarted { name, tests } => {
            println!("\n🚀 Running {} tests ({tests})...", name.to_uppercase());
        }
        RunEvent::TestStarted { test } => {
            let rule = "=".repeat(RULE_WIDTH);
            println!("\n{rule}");
            println!("Test ID: {}", test.id);
            println!("Category: {}", test.category);
            println!("Prompt: {}...", head(&test.prompt, PROMPT_PREVIEW));
            println!("{rule}\n");
        }
        RunEvent::BackendStarted { backend } => {
            println!("🤖 Testing {backend}...");
        }
        RunEvent::BackendFinished { result, .. } => {
            let preview = head(&result.response, RESPONSE_PREVIEW).replace('\n', " ");
            println!("   Response: {preview}...");
            println!("   Time: {:.2}s\n", result.time);
        }
    }
}

fn head(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_cuts_on_char_boundary() {
        assert_eq!(head("héllo", 2), "hé");
        assert_eq!(head("hi", 100), "hi");
    }
}
