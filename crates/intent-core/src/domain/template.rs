//! DeploymentTemplate - クイックスタート用テンプレート
//!
//! Each template carries a ready-made task description that can be fed
//! straight into spec generation.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemplateCategory {
    #[serde(rename = "LLM")]
    Llm,
    Image,
    Data,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplateCategory::Llm => "LLM",
            TemplateCategory::Image => "Image",
            TemplateCategory::Data => "Data",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Icon name understood by the presentation layer.
    pub icon: &'static str,
    pub prompt: &'static str,
    pub category: TemplateCategory,
}

const TEMPLATES: &[DeploymentTemplate] = &[
    DeploymentTemplate {
        id: "llama3-lora",
        name: "Fine-tune Llama 3",
        description: "LoRA fine-tuning of a 70B parameter language model on a custom dataset.",
        icon: "Brain",
        prompt: "I want to fine-tune Llama 3 70B using LoRA on a 50k example instruction dataset",
        category: TemplateCategory::Llm,
    },
    DeploymentTemplate {
        id: "sdxl-batch",
        name: "Batch Image Generation",
        description: "Render a large batch of images with Stable Diffusion XL.",
        icon: "Image",
        prompt: "Generate 10,000 1024x1024 images with Stable Diffusion XL for a product catalog",
        category: TemplateCategory::Image,
    },
    DeploymentTemplate {
        id: "whisper-transcribe",
        name: "Audio Transcription",
        description: "Transcribe a podcast archive with Whisper large-v3.",
        icon: "Mic",
        prompt: "Transcribe 500 hours of English podcast audio with Whisper large-v3",
        category: TemplateCategory::Data,
    },
];

/// 全テンプレート（表示順）
pub fn templates() -> &'static [DeploymentTemplate] {
    TEMPLATES
}

/// id でテンプレートを引く
pub fn template(id: &str) -> Option<&'static DeploymentTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
