// Text generation: trait-based abstraction over the model provider.
//
// The GenerationClient trait is the seam the pipeline depends on. GeminiClient
// implements it against Google's generateContent API; tests supply their own
// scripted implementations.

pub mod gemini;
pub mod prompt;
pub mod traits;
