//! Canned/templated LLM completion provider for tests.

use std::sync::Mutex;

use engram_core::{CompletionOptions, EngramError, EngramResult, Llm};

/// Returns a caller-registered canned response for a prompt, or a generic
/// templated echo when nothing was registered. Records every prompt it
/// receives so tests can assert on what was asked.
pub struct FakeLlm {
    canned: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<String>>,
    fail: std::sync::atomic::AtomicBool,
}

impl FakeLlm {
    pub fn new() -> Self {
        Self {
            canned: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Register a canned response returned when `prompt` contains `contains`.
    pub fn when_contains(&self, contains: impl Into<String>, response: impl Into<String>) {
        self.canned
            .lock()
            .expect("canned lock")
            .push((contains.into(), response.into()));
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Default for FakeLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl Llm for FakeLlm {
    fn complete(&self, prompt: &str, _options: &CompletionOptions) -> EngramResult<String> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(EngramError::Unavailable {
                reason: "fake llm disabled".to_string(),
            });
        }
        self.calls.lock().expect("calls lock").push(prompt.to_string());
        let canned = self.canned.lock().expect("canned lock");
        for (needle, response) in canned.iter() {
            if prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(format!("summary: {}", prompt.chars().take(80).collect::<String>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_generic_completion_by_default() {
        let llm = FakeLlm::new();
        let out = llm.complete("describe X", &CompletionOptions::default()).unwrap();
        assert!(out.contains("describe X"));
    }

    #[test]
    fn returns_canned_response_on_match() {
        let llm = FakeLlm::new();
        llm.when_contains("deadline", "the deadline is April 15");
        let out = llm
            .complete("what is the deadline for the project?", &CompletionOptions::default())
            .unwrap();
        assert_eq!(out, "the deadline is April 15");
    }

    #[test]
    fn records_prompts() {
        let llm = FakeLlm::new();
        llm.complete("a", &CompletionOptions::default()).unwrap();
        llm.complete("b", &CompletionOptions::default()).unwrap();
        assert_eq!(llm.calls(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn can_be_forced_to_fail() {
        let llm = FakeLlm::new();
        llm.set_failing(true);
        assert!(llm.complete("x", &CompletionOptions::default()).is_err());
    }
}
