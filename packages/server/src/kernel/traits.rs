// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "send the welcome email on confirmation") lives in
// the routes/domains that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMailer)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Mailer Trait (Infrastructure - outbound email)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send an HTML email. Callers treat failure as non-fatal: they log and
    /// continue.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}
