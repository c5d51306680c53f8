/// Adds a `with_base_url` builder to a client wrapping a `GeminiHttpClient`
/// in a field named `http`.
macro_rules! impl_with_gemini_base_url {
    ($client:ty) => {
        impl $client {
            /// Point the client at another Gemini-compatible endpoint.
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

pub(crate) use impl_with_gemini_base_url;

pub mod chat;
pub mod client;
pub mod image;
pub mod types;

pub use chat::GeminiChatClient;
pub use client::GeminiHttpClient;
pub use image::GeminiImageClient;
