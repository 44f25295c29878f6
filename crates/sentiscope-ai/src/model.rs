//! ONNX Runtime polarity model for sequence-classification transformers.
//!
//! Expects a sentiment model fine-tuned for two or three classes ordered from
//! negative to positive (e.g. distilbert-base-uncased-finetuned-sst-2). The
//! model directory must contain `model.onnx` and `tokenizer.json`.
//!
//! Polarity is `p(last class) - p(first class)` after a softmax over the logits.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::polarity::{Polarity, ScoringError};

/// Sentiment classifier exported to ONNX, exposed as a [`Polarity`] model.
pub struct OnnxPolarity {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    takes_token_types: bool,
    name: String,
}

impl OnnxPolarity {
    /// Load a model from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // BERT-style models take segment ids; DistilBERT does not.
        let takes_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: 512,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(model = %model_path.display(), takes_token_types, "loaded sentiment model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            takes_token_types,
            name,
        })
    }

    /// Polarity for each text, in input order.
    pub fn polarity_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<f64>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = texts.len();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Flat input tensors: [batch_size, seq_len].
        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        let mut token_type_ids = vec![0i64; batch_size * seq_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
            for (j, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + j] = tid as i64;
            }
        }

        let shape = [batch_size as i64, seq_len as i64];

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;

        let mut inputs = ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
        ];
        if self.takes_token_types {
            let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;
            inputs.push(("token_type_ids".into(), type_tensor.into()));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("onnx session lock poisoned"))?;
        let outputs = session.run(inputs)?;

        // Logits: [batch_size, num_labels].
        let (output_shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] as usize == batch_size && dims[1] >= 2,
            "unexpected output shape: {dims:?}, expected [{batch_size}, >=2]"
        );

        let num_labels = dims[1] as usize;
        Ok(logits
            .chunks(num_labels)
            .map(|row| {
                let probs = softmax(row);
                probs[num_labels - 1] - probs[0]
            })
            .collect())
    }
}

impl Polarity for OnnxPolarity {
    fn polarity(&self, text: &str) -> Result<f64, ScoringError> {
        self.polarity_batch(&[text])
            .map_err(|e| ScoringError::Unavailable(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| ScoringError::Unavailable("model returned no output".into()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&l| (l as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
