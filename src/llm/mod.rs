//! LLM 层：客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock），仅供 LLM 意图识别使用

pub mod deepseek;
pub mod message;
pub mod mock;
pub mod openai;
pub mod traits;

pub use deepseek::{create_deepseek_client, DEEPSEEK_BASE_URL, DEEPSEEK_CHAT};
pub use message::{Message, Role};
pub use mock::MockLlmClient;
pub use openai::{create_llm_from_config, OpenAiClient};
pub use traits::LlmClient;
