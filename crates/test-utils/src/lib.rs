//! # Test Utilities
//!
//! Fakes for the remote collaborators of `tenderlens` (the LLM and the
//! embedding service) plus helpers that build real PDF files for fixtures.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use tenderlens::{
    providers::db::sqlite::SqliteVectorStore, AiProvider, EmbeddingProvider, ProviderError,
};

// --- Test Setup ---

/// An isolated in-memory vector store wired to a [`MockEmbeddingProvider`].
pub struct TestSetup {
    pub store: SqliteVectorStore,
    pub embedder: MockEmbeddingProvider,
}

impl TestSetup {
    pub async fn new() -> Result<Self> {
        let embedder = MockEmbeddingProvider::new();
        let store = SqliteVectorStore::new(":memory:", Arc::new(embedder.clone())).await?;
        Ok(Self { store, embedder })
    }
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum MockReply {
    Respond(String),
    Fail(String),
}

/// An `AiProvider` that returns a canned reply and records every call.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    reply: MockReply,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn with_response(response: &str) -> Self {
        Self {
            reply: MockReply::Respond(response.to_string()),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails with an API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            reply: MockReply::Fail(message.to_string()),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleeps for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` pairs.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Respond(response) => Ok(response.clone()),
            MockReply::Fail(message) => Err(ProviderError::AiApi {
                status: 500,
                body: message.clone(),
            }),
        }
    }
}

// --- Mock Embedding Provider ---

pub const MOCK_EMBEDDING_DIMENSIONS: usize = 128;

/// A deterministic embedder based on hashed character trigrams.
///
/// Texts that share wording end up close together, which is enough for
/// similarity-search assertions without a real model.
#[derive(Clone, Debug, Default)]
pub struct MockEmbeddingProvider {
    fail: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Sleeps for `delay` before every embedding.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ProviderError::AiApi {
                status: 503,
                body: "mock embedding failure".to_string(),
            });
        }
        Ok(trigram_embedding(input, MOCK_EMBEDDING_DIMENSIONS))
    }
}

fn trigram_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0f32; dimensions.max(1)];
    let chars: Vec<char> = text.to_lowercase().chars().collect();

    for window in chars.windows(3) {
        let mut hash = 1469598103934665603u64;
        for byte in window.iter().collect::<String>().bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(1099511628211);
        }
        vector[(hash % vector.len() as u64) as usize] += 1.0;
    }

    // Keep very short inputs away from the zero vector.
    if vector.iter().all(|v| *v == 0.0) {
        vector[0] = 1.0;
    }

    let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    for value in &mut vector {
        *value /= magnitude;
    }
    vector
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use lopdf::{
        content::{Content, Operation},
        dictionary, Document, Object, Stream,
    };

    pub const TEST_PDF_CREATION_DATE: &str = "D:20240115093000Z";
    pub const TEST_PDF_AUTHOR: &str = "Procurement Office";

    /// Generates a single-page PDF containing `text`, with an optional title.
    pub fn generate_test_pdf(text: &str, title: Option<&str>) -> Result<Vec<u8>> {
        generate_multi_page_pdf(&[text], title)
    }

    /// Generates a one-page PDF with no text at all.
    pub fn generate_blank_pdf() -> Result<Vec<u8>> {
        generate_multi_page_pdf(&[""], None)
    }

    /// Generates a PDF with one page per entry of `pages`, in order.
    ///
    /// Lines of each page are drawn top to bottom in Courier. When `title` is
    /// given, an `Info` dictionary with title, author and creation date is added.
    pub fn generate_multi_page_pdf(pages: &[&str], title: Option<&str>) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page_text in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("TL", vec![14.into()]),
                Operation::new("Td", vec![50.into(), 780.into()]),
            ];
            for line in page_text.lines() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
                "Author" => Object::string_literal(TEST_PDF_AUTHOR),
                "CreationDate" => Object::string_literal(TEST_PDF_CREATION_DATE),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
