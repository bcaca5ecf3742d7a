//! Profile analysis for osprey.
//!
//! Builds schema-bearing prompts from a [`osprey_core::Profile`], sends them
//! to an OpenAI-compatible chat-completions endpoint, parses the response
//! into the canonical [`types::AnalysisResult`] (total: failures become an
//! error-shaped report), and orchestrates the scrape → analyze → cache
//! pipeline.

pub mod llm;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use llm::{strip_code_fence, LlmClient, LlmError};
pub use parse::{error_analysis, parse_analysis, LLM_ERROR_PREFIX};
pub use pipeline::{AnalysisPipeline, PipelineError, PipelineSettings, ProfileReport};
pub use prompt::{build_prompt, comprehensive_analysis_prompt, PromptKind};
pub use types::{AnalysisResult, Confidence};
