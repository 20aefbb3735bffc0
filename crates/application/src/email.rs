use async_trait::async_trait;
use registar_core::AppResult;

/// Outbound email port. Delivery details live in infrastructure.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email.
    async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()>;
}
