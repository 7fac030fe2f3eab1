/*!
 * Tests for error types and conversions
 */

use lingolink::app_controller::failure_message;
use lingolink::errors::{AppError, ProviderError, StoreError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_authenticationError_shouldDisplayCorrectly() {
    let error = ProviderError::AuthenticationError("Invalid API key".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Authentication error"));
    assert!(display.contains("Invalid API key"));
}

#[test]
fn test_storeError_notFound_shouldConvertToTranslationNotFound() {
    let error: TranslationError = StoreError::NotFound(7).into();
    match error {
        TranslationError::NotFound(message) => assert!(message.contains('7')),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_storeError_storage_shouldConvertToPersistence() {
    let error: TranslationError = StoreError::Storage("disk full".to_string()).into();
    assert!(matches!(error, TranslationError::Persistence(ref m) if m.contains("disk full")));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::ConnectionError("down".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::ConnectionError(_))));
}

#[test]
fn test_translationError_slotBusy_shouldNameRecordAndLocale() {
    let error = TranslationError::SlotBusy {
        record_id: 12,
        locale: "es".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("12"));
    assert!(display.contains("'es'"));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref m) if m == "boom"));
}

#[test]
fn test_failureMessage_shouldDescribeEachKind() {
    assert_eq!(failure_message(&AppError::Unauthorized), "Insufficient permissions.");
    assert_eq!(failure_message(&AppError::InvalidNonce), "Invalid or expired security token.");

    let provider = AppError::from(TranslationError::Provider(ProviderError::RateLimitExceeded("quota".into())));
    assert!(failure_message(&provider).starts_with("Translation failed:"));

    let persistence = AppError::from(TranslationError::Persistence("write failed".into()));
    assert!(failure_message(&persistence).starts_with("An unexpected error occurred:"));
}
