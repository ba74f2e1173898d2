use crate::domain::{ReceiptExtraction, Transaction};

use super::{Assistant, AssistantError, AssistantResult};

/// Stand-in used when no assistant is configured. Every call reports
/// [`AssistantError::Disabled`], so callers fall back to their defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn extract_transaction(&self, _image: &[u8], _mime_type: &str) -> AssistantResult<ReceiptExtraction> {
        Err(AssistantError::Disabled)
    }

    fn suggest_category(&self, _merchant: &str, _description: Option<&str>) -> AssistantResult<String> {
        Err(AssistantError::Disabled)
    }

    fn generate_insights(&self, _transactions: &[Transaction]) -> AssistantResult<String> {
        Err(AssistantError::Disabled)
    }
}
