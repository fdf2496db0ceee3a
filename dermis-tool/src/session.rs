//! The calls the front ends make into the core: analyze then record, and
//! compare two stored entries.

use std::future::Future;
use std::time::Duration;

use dermis_oracle::{AnalysisResult, ImagePayload, Oracle, SkinAnalyst};
use dermis_timeline::{TimelineBackend, TimelineEntry, TimelineStore};
use tracing::{info, warn};

use crate::error::DermError;
use crate::report::COMPARISON_FALLBACK;

/// Awaits an oracle call, giving up after `timeout` if one is set.
pub async fn bounded<T, E>(
    operation: &'static str,
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, DermError>
where
    DermError: From<E>,
{
    let Some(limit) = timeout else {
        return Ok(call.await?);
    };

    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(DermError::TimedOut {
            operation,
            secs: limit.as_secs(),
        }),
    }
}

pub async fn analyze_image<O: Oracle>(
    analyst: &SkinAnalyst<O>,
    image: ImagePayload,
    timeout: Option<Duration>,
) -> Result<AnalysisResult, DermError> {
    bounded("analysis", timeout, analyst.analyze_payload(image)).await
}

/// Analyzes a photo and appends it to the timeline.
///
/// Nothing is recorded when the analysis fails.
pub async fn analyze_and_record<'s, O, B>(
    analyst: &SkinAnalyst<O>,
    timeline: &'s mut TimelineStore<B>,
    image: ImagePayload,
    timeout: Option<Duration>,
) -> Result<&'s TimelineEntry, DermError>
where
    O: Oracle,
    B: TimelineBackend,
    DermError: From<B::Error>,
{
    let image_data = image.to_data_uri();
    let result = analyze_image(analyst, image, timeout).await?;

    let entry = timeline.record(image_data, result)?;
    info!(id = entry.id(), label = entry.label(), "Recorded analysis");

    Ok(entry)
}

/// The two timeline indices picked for a progress comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareSelection {
    pub baseline: usize,
    pub current: usize,
}

impl CompareSelection {
    /// Oldest against newest; `None` with fewer than two entries.
    pub fn spanning(len: usize) -> Option<Self> {
        (len >= 2).then(|| Self {
            baseline: 0,
            current: len - 1,
        })
    }

    /// Checks the selection against a timeline of `len` entries.
    pub fn pair(&self, len: usize) -> Result<(usize, usize), DermError> {
        for index in [self.baseline, self.current] {
            if index >= len {
                return Err(DermError::EntryNotFound { index, len });
            }
        }
        if self.baseline == self.current {
            return Err(DermError::SameEntry(self.baseline));
        }

        Ok((self.baseline, self.current))
    }
}

/// Compares two photos, falling back to a fixed narrative on failure.
pub async fn compare_images<O: Oracle>(
    analyst: &SkinAnalyst<O>,
    earlier: &str,
    later: &str,
    timeout: Option<Duration>,
) -> String {
    match bounded("comparison", timeout, analyst.compare(earlier, later)).await {
        Ok(narrative) => narrative,
        Err(e) => {
            warn!(error = %e, "Comparison failed, showing fallback");
            COMPARISON_FALLBACK.to_string()
        }
    }
}

/// Compares two stored entries in selection order.
///
/// An invalid selection is refused before the oracle is called.
pub async fn compare_entries<O, B>(
    analyst: &SkinAnalyst<O>,
    timeline: &TimelineStore<B>,
    selection: CompareSelection,
    timeout: Option<Duration>,
) -> Result<String, DermError>
where
    O: Oracle,
    B: TimelineBackend,
{
    let (baseline, current) = selection.pair(timeline.len())?;
    let entries = timeline.load_all();

    Ok(compare_images(
        analyst,
        entries[baseline].image_data(),
        entries[current].image_data(),
        timeout,
    )
    .await)
}
