pub mod config;
pub mod controller;
pub mod engine;
pub mod gateway;
pub mod llm_client;
pub mod llm_decode;
pub mod prompt_builder;
pub mod protocol;
