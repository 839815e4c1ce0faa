use super::PromptService;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockPromptService {
    responses: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    available: bool,
}

impl MockPromptService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            available: true,
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn next_response(&self, default: String) -> String {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            default
        } else {
            let index = (*count - 1) % responses.len();
            responses[index].clone()
        }
    }
}

impl Default for MockPromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptService for MockPromptService {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn enhance(
        &self,
        prompt: &str,
        style_preference: &str,
        _intensity_percent: u32,
    ) -> String {
        self.next_response(format!("{}, {}, highly detailed", prompt, style_preference))
    }

    async fn improve(
        &self,
        prompt: &str,
        _image_description: &str,
        _intensity_percent: u32,
    ) -> String {
        self.next_response(format!("{}, sharper focus, better lighting", prompt))
    }

    async fn generate_alternatives(&self, prompt: &str, variation_type: &str) -> String {
        self.next_response(format!("1. {} ({} take)", prompt, variation_type))
    }
}
