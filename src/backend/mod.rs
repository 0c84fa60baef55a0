//! Capability interface for the tools whose processing is simulated: video
//! trim/compress/reverse, AI text generation and file conversion.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const SUPPORTED_CONVERSION_TARGETS: &[&str] = &["pdf", "docx", "txt", "png", "jpg", "zip"];

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("input file is empty")]
    EmptyInput,
    #[error("invalid trim range {start_secs}s..{end_secs}s")]
    InvalidTrimRange { start_secs: u32, end_secs: u32 },
    #[error("compression quality {0} is outside 1..=100")]
    InvalidQuality(u8),
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("unsupported conversion target `{0}`")]
    UnsupportedTarget(String),
    #[error("remote tool service is not available in this build (endpoint: {endpoint:?})")]
    RemoteServiceUnavailable { endpoint: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    LocalMock,
    RemoteService,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub mock_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolJob {
    TrimVideo { start_secs: u32, end_secs: u32 },
    CompressVideo { quality: u8 },
    ReverseVideo,
    GenerateText { prompt: String },
    ConvertFile { target: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub file_name: String,
    pub input: Vec<u8>,
    pub job: ToolJob,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait ToolBackend {
    fn kind(&self) -> BackendKind;
    fn process(&self, request: &ToolRequest) -> BackendResult<ToolOutput>;
}

/// Builds the backend selected in configuration.
pub fn backend_from_config(config: &BackendConfig) -> BackendResult<Box<dyn ToolBackend>> {
    match config.kind {
        BackendKind::LocalMock => {
            let delay = Duration::from_millis(config.mock_delay_ms.unwrap_or(0));
            Ok(Box::new(LocalMockBackend::with_delay(delay)))
        }
        BackendKind::RemoteService => Err(BackendError::RemoteServiceUnavailable {
            endpoint: config.endpoint.clone(),
        }),
    }
}

/// Validates requests like a real service would, then returns placeholder output
/// after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct LocalMockBackend {
    delay: Duration,
}

impl LocalMockBackend {
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn validate(request: &ToolRequest) -> BackendResult<()> {
        match &request.job {
            ToolJob::GenerateText { prompt } => {
                if prompt.trim().is_empty() {
                    return Err(BackendError::EmptyPrompt);
                }
                return Ok(());
            }
            ToolJob::TrimVideo {
                start_secs,
                end_secs,
            } if start_secs >= end_secs => {
                return Err(BackendError::InvalidTrimRange {
                    start_secs: *start_secs,
                    end_secs: *end_secs,
                });
            }
            ToolJob::CompressVideo { quality } if !(1..=100).contains(quality) => {
                return Err(BackendError::InvalidQuality(*quality));
            }
            ToolJob::ConvertFile { target }
                if !SUPPORTED_CONVERSION_TARGETS.contains(&target.to_ascii_lowercase().as_str()) =>
            {
                return Err(BackendError::UnsupportedTarget(target.clone()));
            }
            _ => {}
        }
        if request.input.is_empty() {
            return Err(BackendError::EmptyInput);
        }
        Ok(())
    }
}

impl ToolBackend for LocalMockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalMock
    }

    fn process(&self, request: &ToolRequest) -> BackendResult<ToolOutput> {
        Self::validate(request)?;
        tracing::debug!(job = ?request.job, file = %request.file_name, "simulating tool job");
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let output = match &request.job {
            ToolJob::TrimVideo { .. } => passthrough(request, "trimmed"),
            ToolJob::CompressVideo { .. } => passthrough(request, "compressed"),
            ToolJob::ReverseVideo => passthrough(request, "reversed"),
            ToolJob::GenerateText { prompt } => ToolOutput {
                file_name: "generated.txt".to_string(),
                mime_type: "text/plain",
                bytes: generated_text(prompt).into_bytes(),
            },
            ToolJob::ConvertFile { target } => {
                let target = target.to_ascii_lowercase();
                let mut bytes = format!("converted {} to {target}\n", request.file_name).into_bytes();
                bytes.extend_from_slice(&request.input);
                ToolOutput {
                    file_name: format!("{}.{target}", file_stem(&request.file_name)),
                    mime_type: mime_for_extension(&target),
                    bytes,
                }
            }
        };
        Ok(output)
    }
}

fn passthrough(request: &ToolRequest, prefix: &str) -> ToolOutput {
    ToolOutput {
        file_name: format!("{prefix}_{}", request.file_name),
        mime_type: "video/mp4",
        bytes: request.input.clone(),
    }
}

fn generated_text(prompt: &str) -> String {
    let prompt = prompt.trim();
    format!(
        "Here is a draft about \"{prompt}\".\n\n\
         {prompt} is a topic worth exploring in depth. Start with the key idea, \
         support it with a concrete example, and close with a clear takeaway for the reader."
    )
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(job: ToolJob) -> ToolRequest {
        ToolRequest {
            file_name: "clip.mp4".to_string(),
            input: vec![1, 2, 3],
            job,
        }
    }

    #[test]
    fn video_jobs_pass_input_through_under_derived_name() {
        let backend = LocalMockBackend::default();
        let output = backend
            .process(&request(ToolJob::TrimVideo {
                start_secs: 1,
                end_secs: 4,
            }))
            .expect("valid trim should succeed");
        assert_eq!(output.file_name, "trimmed_clip.mp4");
        assert_eq!(output.bytes, vec![1, 2, 3]);

        let output = backend
            .process(&request(ToolJob::ReverseVideo))
            .expect("reverse should succeed");
        assert_eq!(output.file_name, "reversed_clip.mp4");
    }

    #[test]
    fn invalid_requests_are_rejected_before_processing() {
        let backend = LocalMockBackend::default();
        let err = backend
            .process(&request(ToolJob::TrimVideo {
                start_secs: 5,
                end_secs: 5,
            }))
            .expect_err("empty trim range");
        assert!(matches!(err, BackendError::InvalidTrimRange { .. }));

        let err = backend
            .process(&request(ToolJob::CompressVideo { quality: 0 }))
            .expect_err("zero quality");
        assert_eq!(err, BackendError::InvalidQuality(0));

        let err = backend
            .process(&request(ToolJob::ConvertFile {
                target: "exe".to_string(),
            }))
            .expect_err("unsupported target");
        assert_eq!(err, BackendError::UnsupportedTarget("exe".to_string()));

        let mut empty = request(ToolJob::ReverseVideo);
        empty.input.clear();
        assert_eq!(backend.process(&empty), Err(BackendError::EmptyInput));
    }

    #[test]
    fn text_generation_needs_a_prompt_but_no_input() {
        let backend = LocalMockBackend::default();
        let mut job = request(ToolJob::GenerateText {
            prompt: "  ".to_string(),
        });
        job.input.clear();
        assert_eq!(backend.process(&job), Err(BackendError::EmptyPrompt));

        job.job = ToolJob::GenerateText {
            prompt: "rust ownership".to_string(),
        };
        let output = backend.process(&job).expect("prompted generation");
        let text = String::from_utf8(output.bytes).expect("generated text is utf-8");
        assert!(text.contains("rust ownership"));
        assert_eq!(output.mime_type, "text/plain");
    }

    #[test]
    fn conversion_renames_file_and_prefixes_placeholder_header() {
        let backend = LocalMockBackend::default();
        let output = backend
            .process(&request(ToolJob::ConvertFile {
                target: "PDF".to_string(),
            }))
            .expect("pdf conversion");
        assert_eq!(output.file_name, "clip.pdf");
        assert_eq!(output.mime_type, "application/pdf");
        assert!(output.bytes.starts_with(b"converted clip.mp4 to pdf\n"));
        assert!(output.bytes.ends_with(&[1, 2, 3]));
    }

    #[test]
    fn config_selects_backend_kind() {
        let backend = backend_from_config(&BackendConfig::default()).expect("mock backend");
        assert_eq!(backend.kind(), BackendKind::LocalMock);

        let config = BackendConfig {
            kind: BackendKind::RemoteService,
            endpoint: Some("https://tools.example".to_string()),
            mock_delay_ms: None,
        };
        let err = backend_from_config(&config)
            .err()
            .expect("remote backend has no transport");
        assert!(matches!(err, BackendError::RemoteServiceUnavailable { endpoint: Some(_) }));
    }
}
