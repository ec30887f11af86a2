//! llama.cpp-backed text generation for GGUF models.

use super::TextGenerator;
use crate::{
    Error, Result,
    config::{F16_KV, InferenceConfig, N_BATCH},
};
use llama_cpp_2::{
    context::{LlamaContext, params::LlamaContextParams},
    llama_backend::LlamaBackend,
    llama_batch::LlamaBatch,
    model::{AddBos, LlamaModel, Special, params::LlamaModelParams},
    sampling::LlamaSampler,
    token::LlamaToken,
};
use std::num::NonZeroU32;
use tracing::{debug, info};

pub struct LlamaEngine {
    backend: LlamaBackend,
    model: LlamaModel,
    config: InferenceConfig,
    model_name: String,
}

impl LlamaEngine {
    /// Loads the model weights. Expensive: this reads the whole GGUF file and
    /// uploads the offloaded layers to the GPU.
    pub fn load(config: &InferenceConfig) -> Result<Self> {
        let model_name = config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        info!(
            "Loading llama.cpp model from {} (n_gpu_layers: {}, n_ctx: {}, n_batch: {}, f16_kv: {})",
            config.model_path.display(),
            config.n_gpu_layers,
            config.n_ctx,
            N_BATCH,
            F16_KV
        );

        let backend = LlamaBackend::init()
            .map_err(|e| Error::engine_not_loaded(format!("Failed to init backend: {}", e)))?;

        let model_params = LlamaModelParams::default().with_n_gpu_layers(gpu_layers(config.n_gpu_layers));
        let model = LlamaModel::load_from_file(&backend, &config.model_path, &model_params)
            .map_err(|e| Error::engine_not_loaded(format!("Failed to load model: {}", e)))?;

        Ok(Self {
            backend,
            model,
            config: config.clone(),
            model_name,
        })
    }

    fn new_context(&self) -> Result<LlamaContext<'_>> {
        let ctx_params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(self.config.n_ctx))
            .with_n_batch(N_BATCH);

        self.model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| Error::inference(format!("Failed to create context: {}", e)))
    }

    fn sampler(&self) -> LlamaSampler {
        if self.config.temperature <= 0.0 {
            return LlamaSampler::greedy();
        }
        LlamaSampler::chain_simple([
            LlamaSampler::top_k(self.config.top_k),
            LlamaSampler::top_p(self.config.top_p, 1),
            LlamaSampler::temp(self.config.temperature),
            LlamaSampler::dist(self.config.seed),
        ])
    }

    /// Feeds the prompt through the context in [`N_BATCH`] sized chunks, leaving
    /// logits on the final prompt token.
    fn decode_prompt(
        &self,
        ctx: &mut LlamaContext<'_>,
        batch: &mut LlamaBatch,
        tokens: &[LlamaToken],
    ) -> Result<()> {
        let chunk_size = N_BATCH as usize;
        let last_index = tokens.len() - 1;

        for (chunk_index, chunk) in tokens.chunks(chunk_size).enumerate() {
            batch.clear();
            for (offset, token) in chunk.iter().enumerate() {
                let pos = chunk_index * chunk_size + offset;
                batch
                    .add(*token, pos as i32, &[0], pos == last_index)
                    .map_err(|e| Error::inference(format!("Batch error: {}", e)))?;
            }
            ctx.decode(batch)
                .map_err(|e| Error::inference(format!("Decode error: {}", e)))?;
        }
        Ok(())
    }
}

impl TextGenerator for LlamaEngine {
    fn generate(&self, prompt: &str) -> Result<String> {
        let mut ctx = self.new_context()?;

        let tokens = self
            .model
            .str_to_token(prompt, AddBos::Always)
            .map_err(|e| Error::inference(format!("Tokenization error: {}", e)))?;

        if tokens.is_empty() {
            return Err(Error::inference("Prompt produced no tokens"));
        }

        let n_ctx = ctx.n_ctx() as usize;
        if tokens.len() >= n_ctx {
            return Err(Error::inference(format!(
                "Prompt is {} tokens but the context window holds {}",
                tokens.len(),
                n_ctx
            )));
        }

        let mut batch = LlamaBatch::new(N_BATCH as usize, 1);
        self.decode_prompt(&mut ctx, &mut batch, &tokens)?;

        let limit = (tokens.len() + self.config.max_tokens as usize).min(n_ctx);
        let mut sampler = self.sampler();
        let mut n_cur = tokens.len();
        let mut generated = Vec::new();

        while n_cur < limit {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }

            let bytes = self
                .model
                .token_to_bytes(token, Special::Tokenize)
                .map_err(|e| Error::inference(format!("Token to string error: {}", e)))?;
            generated.extend_from_slice(&bytes);

            batch.clear();
            batch
                .add(token, n_cur as i32, &[0], true)
                .map_err(|e| Error::inference(format!("Batch add error: {}", e)))?;
            ctx.decode(&mut batch)
                .map_err(|e| Error::inference(format!("Decode error: {}", e)))?;

            n_cur += 1;
        }

        debug!(
            "Generated {} tokens with {}",
            n_cur - tokens.len(),
            self.model_name
        );

        Ok(String::from_utf8_lossy(&generated).into_owned())
    }
}

/// llama.cpp offloads every layer when asked for more layers than the model has.
fn gpu_layers(n_gpu_layers: i32) -> u32 {
    if n_gpu_layers < 0 {
        u32::MAX
    } else {
        n_gpu_layers as u32
    }
}
