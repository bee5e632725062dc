//! Outbound calls to the generative services: Gemini for text and image
//! description, Hugging Face inference for image generation, ImageKit for
//! hosting generated images.

pub mod config;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod huggingface;
pub mod imagekit;
pub mod models;

pub use config::GatewayConfig;
pub use error::GenerationError;
pub use gateway::{Gateway, GenerationRequest, Generator, ImageInput};
