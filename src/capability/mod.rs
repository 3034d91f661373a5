//! 能力层：能力枚举、调用/结果类型、A2A 线协议、能力客户端与注册表

pub mod client;
pub mod registry;
pub mod types;
pub mod wire;

pub use client::CapabilityClient;
pub use registry::CapabilityRegistry;
pub use types::{Capability, CapabilityCall, CapabilityResult};
pub use wire::{A2aRequest, A2aResponse};
