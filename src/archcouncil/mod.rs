// src/archcouncil/mod.rs

pub mod agent;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod council;
pub mod event;
pub mod group_chat;
pub mod llm_session;
pub mod participant;
pub mod sequencer;
pub mod transcript;

// Export LLMSession so it can be reached as archcouncil::archcouncil::LLMSession
// as well as archcouncil::LLMSession
pub use llm_session::LLMSession;
