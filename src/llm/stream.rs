//! Streamed completion fragments

use super::LlmError;
use futures::stream::BoxStream;
use futures::StreamExt;

/// Lazy, finite, non-restartable sequence of text fragments.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// Drain a fragment stream, handing every fragment to `on_fragment` as it
/// arrives and returning the concatenation.
///
/// The first error aborts the fold; fragments already displayed are not
/// salvaged into the result.
pub async fn fold_stream(
    mut stream: TextStream,
    on_fragment: &mut (dyn FnMut(&str) + Send),
) -> Result<String, LlmError> {
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        on_fragment(&fragment);
        text.push_str(&fragment);
    }
    Ok(text)
}
