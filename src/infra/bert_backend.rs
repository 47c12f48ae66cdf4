// ============================================================
// Layer 6 — ONNX Model Backend
// ============================================================
// ModelBackend implementation over ONNX Runtime. Loads a
// BERT-family extractive-QA export (start_logits / end_logits
// heads) either from a local directory or from the HuggingFace
// hub, quantized variant preferred when available.
//
// The session is the only piece of shared state; it is built
// once, then treated as read-only (ort requires &mut for run,
// hence the Mutex). All tensors for one batch live inside one
// `execute` call and are dropped as soon as the logits have
// been copied out.
//
// DistilBERT-style exports drop the token_type_ids input, so we
// inspect the graph's declared inputs at load time and feed
// segment ids only when the model asks for them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::domain::traits::{ModelBackend, ModelInputs, ModelOutputs};
use crate::infra::wordpiece::WordPieceTokenizer;

/// Default SQuAD export used when the caller does not name a model.
pub const DEFAULT_MODEL: &str = "onnx-community/distilbert-base-cased-distilled-squad-ONNX";

/// Configuration for the model-loading collaborator — not for the
/// core, which never sees where weights come from.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// HuggingFace repo id, or a local directory containing
    /// model.onnx and tokenizer.json
    pub model: String,

    /// Prefer an INT8 quantized export when the repo has one
    pub prefer_quantized: bool,

    /// Intra-op threads for the ONNX session (0 = runtime default)
    pub num_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model:            DEFAULT_MODEL.to_string(),
            prefer_quantized: true,
            num_threads:      0,
        }
    }
}

pub struct BertBackend {
    session:          Mutex<ort::session::Session>,
    feed_segment_ids: bool,
}

impl BertBackend {
    /// Resolve model + tokenizer files and build the session. Returns
    /// the tokenizer alongside the backend so both collaborators are
    /// guaranteed to share one vocabulary.
    pub fn load(config: &ModelConfig) -> Result<(Self, WordPieceTokenizer)> {
        let local = Path::new(&config.model);
        let (model_path, tokenizer_path) = if local.is_dir() {
            (local.join("model.onnx"), local.join("tokenizer.json"))
        } else {
            Self::fetch_from_hub(config)?
        };

        let backend   = Self::from_model_file(&model_path, config)?;
        let tokenizer = WordPieceTokenizer::from_file(&tokenizer_path)?;
        Ok((backend, tokenizer))
    }

    /// Download the export from the HuggingFace hub.
    fn fetch_from_hub(config: &ModelConfig) -> Result<(PathBuf, PathBuf)> {
        use hf_hub::api::sync::Api;

        let api = Api::new().context("cannot initialize HuggingFace hub API")?;
        let repo = api.model(config.model.clone());

        let model_path = if config.prefer_quantized {
            repo.get("onnx/model_quantized.onnx")
                .or_else(|_| repo.get("model_quantized.onnx"))
                .or_else(|_| repo.get("onnx/model.onnx"))
                .or_else(|_| repo.get("model.onnx"))
        } else {
            repo.get("onnx/model.onnx").or_else(|_| repo.get("model.onnx"))
        }
        .with_context(|| format!("cannot download an ONNX export from '{}'", config.model))?;

        let tokenizer_path = repo
            .get("tokenizer.json")
            .with_context(|| format!("cannot download tokenizer.json from '{}'", config.model))?;

        Ok((model_path, tokenizer_path))
    }

    /// Build the ONNX session from a model file on disk.
    pub fn from_model_file(model_path: &Path, config: &ModelConfig) -> Result<Self> {
        use ort::execution_providers::CPUExecutionProvider;
        use ort::session::builder::GraphOptimizationLevel;
        use ort::session::Session;

        let mut builder = Session::builder()
            .context("cannot create ONNX session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("cannot set optimization level")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("cannot set execution providers")?;

        if config.num_threads > 0 {
            builder = builder
                .with_intra_threads(config.num_threads)
                .context("cannot set intra-op threads")?;
        }

        let session = builder
            .commit_from_file(model_path)
            .with_context(|| format!("cannot load ONNX model '{}'", model_path.display()))?;

        let input_names: Vec<String> =
            session.inputs.iter().map(|i| i.name.clone()).collect();
        let feed_segment_ids = input_names.iter().any(|n| n == "token_type_ids");

        tracing::info!(
            "ONNX model loaded: inputs {:?}, token_type_ids {}",
            input_names,
            if feed_segment_ids { "fed" } else { "omitted" }
        );

        Ok(Self { session: Mutex::new(session), feed_segment_ids })
    }

    /// Pull one named logits row-matrix out of the session outputs.
    fn extract_logits(
        outputs: &ort::session::SessionOutputs,
        name:    &str,
        fallback_position: usize,
        batch:   usize,
    ) -> Result<Vec<Vec<f32>>> {
        let value = outputs
            .iter()
            .find(|(output_name, _)| *output_name == name)
            .map(|(_, v)| v)
            .or_else(|| {
                tracing::warn!(
                    "model has no '{name}' output, reading output #{fallback_position} instead"
                );
                outputs.iter().nth(fallback_position).map(|(_, v)| v)
            })
            .with_context(|| format!("model produced no '{name}' output"))?;

        let (_, data) = value
            .try_extract_tensor::<f32>()
            .with_context(|| format!("cannot extract '{name}' tensor"))?;

        if batch == 0 || data.len() % batch != 0 {
            anyhow::bail!(
                "'{name}' has {} values, not divisible into {batch} rows",
                data.len()
            );
        }
        let seq_len = data.len() / batch;
        Ok(data.chunks(seq_len).map(|row| row.to_vec()).collect())
    }
}

impl ModelBackend for BertBackend {
    async fn execute(&self, inputs: &ModelInputs) -> Result<ModelOutputs> {
        use ndarray::Array2;
        use ort::value::Tensor;

        let batch = inputs.batch_size();
        if batch == 0 {
            return Ok(ModelOutputs { start_logits: Vec::new(), end_logits: Vec::new() });
        }
        let seq_len = inputs.input_ids[0].len();

        let to_array = |rows: &Vec<Vec<u32>>| -> Result<Array2<i64>> {
            let flat: Vec<i64> = rows.iter().flatten().map(|&x| x as i64).collect();
            Array2::from_shape_vec((batch, seq_len), flat).context("bad input shape")
        };

        let ids_t = Tensor::from_array(to_array(&inputs.input_ids)?)
            .context("cannot build input_ids tensor")?;
        let mask_t = Tensor::from_array(to_array(&inputs.input_mask)?)
            .context("cannot build attention_mask tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

        let outputs = if self.feed_segment_ids {
            let seg_t = Tensor::from_array(to_array(&inputs.segment_ids)?)
                .context("cannot build token_type_ids tensor")?;
            session.run(ort::inputs![
                "input_ids" => ids_t.into_dyn(),
                "attention_mask" => mask_t.into_dyn(),
                "token_type_ids" => seg_t.into_dyn(),
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_t.into_dyn(),
                "attention_mask" => mask_t.into_dyn(),
            ])
        }
        .context("ONNX inference failed")?;

        let start_logits = Self::extract_logits(&outputs, "start_logits", 0, batch)?;
        let end_logits   = Self::extract_logits(&outputs, "end_logits", 1, batch)?;

        Ok(ModelOutputs { start_logits, end_logits })
    }
}
