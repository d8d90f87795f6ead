//! Brazilian CPF handling for provider tax ids.

use crate::errors::ServiceError;

/// Strip punctuation and verify both CPF check digits.
///
/// Returns the bare 11-digit form used for storage and uniqueness.
pub fn normalize_cpf(raw: &str) -> Result<String, ServiceError> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '.' | '-' | ' ')).collect();
    if cleaned.len() != 11 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceError::InvalidTaxId("CPF must have 11 digits".into()));
    }
    let digits: Vec<u32> = cleaned.bytes().map(|b| u32::from(b - b'0')).collect();
    if digits.iter().all(|d| *d == digits[0]) {
        return Err(ServiceError::InvalidTaxId("CPF digits cannot all repeat".into()));
    }
    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return Err(ServiceError::InvalidTaxId("CPF check digits do not match".into()));
    }
    Ok(cleaned)
}

pub(crate) fn check_digit(prefix: &[u32]) -> u32 {
    let weight_start = prefix.len() as u32 + 1;
    let sum: u32 = prefix.iter().enumerate().map(|(i, d)| d * (weight_start - i as u32)).sum();
    let rem = (sum * 10) % 11;
    if rem == 10 { 0 } else { rem }
}
