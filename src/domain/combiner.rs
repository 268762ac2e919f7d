//! Rule set combiner: joins emitted fragments into one condition string.

use crate::domain::error::TranslateError;
use crate::domain::platform::Platform;

/// Join fragments with the platform's logical AND, in the given order.
pub fn combine<S: AsRef<str>>(fragments: &[S], platform: Platform) -> Result<String, TranslateError> {
    if fragments.is_empty() {
        return Err(TranslateError::EmptyRuleSet);
    }
    let separator = format!(" {} ", platform.and_token());
    Ok(fragments
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(&separator))
}
