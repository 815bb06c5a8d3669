//! `demo` module: the reference implementation of the module contract.
//!
//! Six operations over text, local files, and remote references, each
//! writing its record into the shared storage areas. New module authors
//! should start here: every seam of the core — parsing, resolution,
//! blocking and suspendable handlers, context reading — is exercised.

use {
    chrono::{SecondsFormat, Utc},
    serde_json::json,
    tracing::debug,
};

use wharf_common::{StorageArea, file_path};

use crate::{
    context,
    context::Context,
    dispatch::{Dispatcher, Scheduler},
    envelope::ResponseEnvelope,
    error::Result,
    module::{Capabilities, Module, SupportedFiles},
    query::QueryParser,
    registry::{HandlerOutput, Invocable, OperationRegistry},
    resolve::NormalizedContent,
};

pub struct DemoModule {
    dispatcher: Dispatcher,
}

impl DemoModule {
    /// Build the module with its fixed operation set.
    ///
    /// A duplicate registration here is a programming error and the only
    /// failure that escapes module construction.
    pub fn new() -> Result<Self> {
        let mut registry = OperationRegistry::new();
        registry.register("process", Invocable::blocking(process_text))?;
        registry.register("analyze", Invocable::suspendable(analyze_data))?;
        registry.register("generate", Invocable::suspendable(generate_content))?;
        registry.register("save", Invocable::blocking(save_file))?;
        registry.register("download", Invocable::suspendable(download_content))?;
        registry.register("extract", Invocable::blocking(extract_info))?;
        Ok(Self {
            dispatcher: Dispatcher::new(QueryParser::default(), registry, Scheduler::new()),
        })
    }
}

impl Module for DemoModule {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            description: "Demonstrates the standard module structure: text processing, \
                          analysis, generation, and file handling over local and remote sources"
                .to_string(),
            capabilities: vec![
                "Process text from files or direct input".to_string(),
                "Analyze data from local or remote sources".to_string(),
                "Generate content based on input and context".to_string(),
                "Save files to common storage".to_string(),
                "Download and process remote content".to_string(),
                "Extract information from documents".to_string(),
            ],
            supported_operations: self.dispatcher.registry().operation_names().to_vec(),
            supported_files: Some(SupportedFiles {
                local: wharf_common::refs::LOCAL_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect(),
                remote: wharf_common::refs::REMOTE_SCHEMES
                    .iter()
                    .map(|scheme| format!("{scheme}://"))
                    .collect(),
                context: vec!["any".to_string()],
            }),
            example_queries: vec![
                "process: Hello World".to_string(),
                "analyze: data.txt".to_string(),
                "analyze: https://example.com/data.json".to_string(),
                "generate: content about harbors".to_string(),
                "save: example.txt:This is content to save".to_string(),
                "download: https://example.com/data.json".to_string(),
                "extract: what topics are in document.txt".to_string(),
            ],
        }
    }

    fn process(&self, query: &str, context: Option<&Context>) -> ResponseEnvelope {
        self.dispatcher.dispatch(query, context)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn source_of(content: &NormalizedContent) -> (String, bool) {
    match content.resource() {
        Some(resource) => (resource.file_ref.clone(), resource.is_url),
        None => ("direct_input".to_string(), false),
    }
}

/// `process`: record the text into the temp area.
fn process_text(content: NormalizedContent, context: Option<Context>) -> HandlerOutput {
    let text = content.query_text().to_string();
    let is_file = content.resource().is_some();
    let (source, _) = source_of(&content);

    let path = file_path("processed_text.txt", StorageArea::Temp)?;
    std::fs::write(
        &path,
        format!(
            "Processed at {}\nSource: {}\nContent: {}\n",
            timestamp(),
            source,
            text
        ),
    )?;
    debug!(path = %path.display(), "wrote processing record");

    Ok(json!({
        "output": format!(
            "Processed {} and saved to processed_text.txt",
            if is_file { "file" } else { "text" }
        ),
        "source": source,
        "length": text.len(),
        "temp_file": path,
        "context_used": context.is_some(),
    }))
}

/// `analyze`: record source, query, and context summary into the files
/// area. The referenced file does not have to exist.
async fn analyze_data(content: NormalizedContent, context: Option<Context>) -> HandlerOutput {
    let (source, is_remote) = source_of(&content);
    let query = content.query_text().to_string();
    let context_sources = summarize_context(context.as_ref());

    let path = file_path("analysis_results.txt", StorageArea::Files)?;
    std::fs::write(
        &path,
        format!(
            "Analysis Results\n---------------\nTime: {}\nSource: {} ({})\nQuery: {}\nContext Sources: {}\n",
            timestamp(),
            source,
            if is_remote { "remote" } else { "local" },
            query,
            if context_sources.is_empty() {
                "None".to_string()
            } else {
                context_sources.join(", ")
            },
        ),
    )?;

    Ok(json!({
        "output": format!(
            "Analyzed {} data and saved results",
            if is_remote { "remote" } else { "local" }
        ),
        "source": source,
        "query": query,
        "context_sources": context_sources,
        "results_file": path,
    }))
}

/// `generate`: write generated content, enriched by whatever context the
/// host passed along.
async fn generate_content(content: NormalizedContent, context: Option<Context>) -> HandlerOutput {
    let topic = content.query_text().to_string();
    let enhancements = summarize_context(context.as_ref());

    let name = format!("generated_{}.txt", Utc::now().timestamp());
    let path = file_path(&name, StorageArea::Files)?;
    std::fs::write(
        &path,
        format!(
            "Generated Content\n----------------\nTopic: {}\nTime: {}\nEnhancements: {}\n\nThis is an example of generated content about {}.\n",
            topic,
            timestamp(),
            if enhancements.is_empty() {
                "None".to_string()
            } else {
                enhancements.join(", ")
            },
            topic,
        ),
    )?;

    Ok(json!({
        "output": format!("Generated content about {topic}"),
        "topic": topic,
        "enhancements": enhancements,
        "output_file": path,
    }))
}

/// `save`: `save: name.txt:body` writes `body` into the files area.
fn save_file(content: NormalizedContent, _context: Option<Context>) -> HandlerOutput {
    let (name, body) = match &content {
        NormalizedContent::Text(text) => {
            let Some((name, body)) = text.split_once(':') else {
                anyhow::bail!("save requires the form filename:content");
            };
            (name.trim().to_string(), body.trim().to_string())
        },
        NormalizedContent::Resource(resource) => (
            resource.file_ref.clone(),
            resource.query.trim_start_matches(':').trim().to_string(),
        ),
    };
    if name.is_empty() || body.is_empty() {
        anyhow::bail!("both a file name and content are required");
    }

    let path = file_path(&name, StorageArea::Files)?;
    std::fs::write(&path, &body)?;
    debug!(path = %path.display(), size = body.len(), "saved file");

    Ok(json!({
        "output": format!("Saved content to {name}"),
        "file_path": path,
        "size": body.len(),
    }))
}

/// `download`: record a simulated retrieval into the downloads area.
/// Actually fetching the URL is a real module's business.
async fn download_content(content: NormalizedContent, _context: Option<Context>) -> HandlerOutput {
    let Some(resource) = content.resource().filter(|r| r.is_url) else {
        anyhow::bail!("a valid URL is required for the download operation");
    };
    let url = resource.file_ref.clone();

    let name = url
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("downloaded_content.txt");
    let path = file_path(name, StorageArea::Downloads)?;
    let record = format!(
        "Downloaded Content\n----------------\nSource: {}\nTime: {}\nStatus: simulated\nQuery: {}\n",
        url,
        timestamp(),
        resource.query,
    );
    std::fs::write(&path, &record)?;

    Ok(json!({
        "output": format!("Downloaded content from {url}"),
        "source": url,
        "download_path": path,
        "size": record.len(),
    }))
}

/// `extract`: like `analyze`, but also surfaces the conventional `answer`
/// context field.
fn extract_info(content: NormalizedContent, context: Option<Context>) -> HandlerOutput {
    let (source, is_remote) = source_of(&content);
    let query = content.query_text().to_string();

    let mut context_data = Vec::new();
    for field_name in ["content", "metadata", "answer"] {
        for module in context::modules_providing(context.as_ref(), field_name) {
            context_data.push(json!({"field": field_name, "module": module}));
        }
    }

    let name = format!("extracted_{}.txt", Utc::now().timestamp());
    let path = file_path(&name, StorageArea::Files)?;
    std::fs::write(
        &path,
        format!(
            "Extraction Results\n-----------------\nTime: {}\nSource: {} ({})\nQuery: {}\nContext Fields: {}\n",
            timestamp(),
            source,
            if is_remote { "remote" } else { "local" },
            query,
            context_data.len(),
        ),
    )?;

    Ok(json!({
        "output": format!("Extracted information from {source}"),
        "source": source,
        "query": query,
        "context_data": context_data,
        "output_file": path,
    }))
}

/// Which upstream modules offer the conventional fields, as display lines.
fn summarize_context(context: Option<&Context>) -> Vec<String> {
    let mut lines = Vec::new();
    for module in context::modules_providing(context, "content") {
        lines.push(format!("Content from {module}"));
    }
    for module in context::modules_providing(context, "metadata") {
        lines.push(format!("Metadata from {module}"));
    }
    lines
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::testutil::{self, ScopedDataDir};

    use super::*;

    fn scoped_module() -> (ScopedDataDir, DemoModule) {
        (testutil::scoped_data_dir(), DemoModule::new().unwrap())
    }

    fn context_with(module: &str, field: &str, value: &str) -> Context {
        match json!({module: {field: value}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn capabilities_list_all_operations_in_order() {
        let module = DemoModule::new().unwrap();
        let caps = module.capabilities();
        assert_eq!(
            caps.supported_operations,
            ["process", "analyze", "generate", "save", "download", "extract"]
        );
        assert!(!caps.example_queries.is_empty());
    }

    #[test]
    fn process_writes_record_to_temp_area() {
        let (scoped, module) = scoped_module();
        let response = module.process("process: Hello World", None);
        assert!(response.is_success(), "{}", response.message);

        let record =
            std::fs::read_to_string(scoped.path().join("temp/processed_text.txt")).unwrap();
        assert!(record.contains("Hello World"));
    }

    #[test]
    fn analyze_reaches_handler_for_missing_file() {
        // Resolution computes a path without checking existence; this
        // handler records the source rather than reading it.
        let (_scoped, module) = scoped_module();
        let response = module.process("analyze: data.txt", None);
        assert!(response.is_success(), "{}", response.message);

        let data = response.data.unwrap();
        assert_eq!(data["operation"], "analyze");
        assert_eq!(data["result"]["source"], "data.txt");
    }

    #[test]
    fn analyze_summarizes_remote_sources() {
        let (_scoped, module) = scoped_module();
        let response = module.process("analyze: https://example.com/data.json", None);
        let data = response.data.unwrap();
        assert_eq!(data["result"]["source"], "https://example.com/data.json");
        assert!(
            data["result"]["output"]
                .as_str()
                .unwrap()
                .contains("remote")
        );
    }

    #[test]
    fn handler_sees_cross_module_context() {
        let (_scoped, module) = scoped_module();
        let ctx = context_with("other_module", "content", "extra");
        let response = module.process("analyze: some text", Some(&ctx));
        let data = response.data.unwrap();
        assert_eq!(
            data["result"]["context_sources"],
            json!(["Content from other_module"])
        );
    }

    #[test]
    fn save_splits_name_from_body() {
        let (scoped, module) = scoped_module();
        let response = module.process("save: example.txt:This is content to save", None);
        assert!(response.is_success(), "{}", response.message);

        let saved = std::fs::read_to_string(scoped.path().join("files/example.txt")).unwrap();
        assert_eq!(saved, "This is content to save");
    }

    #[test]
    fn save_without_body_fails_cleanly() {
        let (_scoped, module) = scoped_module();
        let response = module.process("save: just words, no file name or colon", None);
        assert!(!response.is_success());
    }

    #[test]
    fn download_requires_a_url() {
        let (scoped, module) = scoped_module();
        let response = module.process("download: data.txt", None);
        assert!(!response.is_success());
        assert!(response.message.contains("URL"));

        let response = module.process("download: https://example.com/data.json", None);
        assert!(response.is_success(), "{}", response.message);
        let record =
            std::fs::read_to_string(scoped.path().join("downloads/data.json")).unwrap();
        assert!(record.contains("https://example.com/data.json"));
    }

    #[test]
    fn extract_collects_context_fields() {
        let (_scoped, module) = scoped_module();
        let ctx = context_with("research", "answer", "42");
        let response = module.process("extract: what topics are in document.txt", Some(&ctx));
        assert!(response.is_success(), "{}", response.message);
        let data = response.data.unwrap();
        assert_eq!(
            data["result"]["context_data"],
            json!([{"field": "answer", "module": "research"}])
        );
    }

    #[test]
    fn unknown_operation_is_reported() {
        let (_scoped, module) = scoped_module();
        let response = module.process("unknown: x", None);
        assert!(!response.is_success());
        assert!(response.message.contains("unknown"));
    }

    #[test]
    fn traversal_reference_is_refused() {
        let (_scoped, module) = scoped_module();
        let response = module.process("analyze: ../../outside.txt", None);
        assert!(!response.is_success());
        assert!(response.message.contains("invalid reference"));
    }
}
