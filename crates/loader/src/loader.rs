use backreel_core::gallery::DescriptionSink;
use backreel_core::session::SeriesToken;
use backreel_protocol::{DescriptionMap, DescriptionMode};
use tracing::{debug, warn};

use crate::client::DataSource;

/// How a description loading run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderOutcome {
    /// Every chunk was fetched and applied.
    Done,
    /// A transport error stopped the run. Chunks applied before the failure
    /// remain valid; the rest are simply absent.
    Failed,
    /// The series was switched while a fetch was in flight; the run stopped
    /// without applying anything for the superseded series.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderReport {
    pub outcome: LoaderOutcome,
    pub chunks_applied: usize,
}

/// Stream description chunks into `sink`, one at a time.
///
/// Chunks are never requested concurrently: request *n + 1* begins only
/// after chunk *n* has resolved and been fully applied. This bounds the load
/// on the data source and makes apply order deterministic. Before every
/// apply the series token is checked; a superseded token means the view
/// these descriptions were destined for is gone, so the chunk is discarded
/// and the run ends.
///
/// Hash-addressed mode walks the catalog's pre-known hash list to
/// exhaustion. Index-addressed mode fetches 0, 1, 2, … until a response
/// declares `done`.
pub async fn load_descriptions(
    source: &dyn DataSource,
    series: &str,
    mode: DescriptionMode,
    token: &SeriesToken,
    sink: &mut dyn DescriptionSink,
) -> LoaderReport {
    let report = match mode {
        DescriptionMode::Hashed(hashes) => load_hashed(source, series, &hashes, token, sink).await,
        DescriptionMode::Indexed => load_indexed(source, series, token, sink).await,
    };
    debug!(
        series,
        outcome = ?report.outcome,
        chunks = report.chunks_applied,
        "description loading finished"
    );
    report
}

async fn load_hashed(
    source: &dyn DataSource,
    series: &str,
    hashes: &[String],
    token: &SeriesToken,
    sink: &mut dyn DescriptionSink,
) -> LoaderReport {
    let mut applied = 0;
    for hash in hashes {
        let chunk = match source.fetch_hashed_chunk(series, hash).await {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(series, hash, error = %e, "description loading halted");
                return report(LoaderOutcome::Failed, applied);
            }
        };
        if !token.is_current() {
            return report(LoaderOutcome::Superseded, applied);
        }
        apply_chunk(sink, &chunk);
        applied += 1;
    }
    report(LoaderOutcome::Done, applied)
}

async fn load_indexed(
    source: &dyn DataSource,
    series: &str,
    token: &SeriesToken,
    sink: &mut dyn DescriptionSink,
) -> LoaderReport {
    let mut applied = 0;
    for index in 0.. {
        let chunk = match source.fetch_indexed_chunk(series, index).await {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(series, index, error = %e, "description loading halted");
                return report(LoaderOutcome::Failed, applied);
            }
        };
        if !token.is_current() {
            return report(LoaderOutcome::Superseded, applied);
        }
        apply_chunk(sink, &chunk.videos);
        applied += 1;
        if chunk.is_done() {
            break;
        }
    }
    report(LoaderOutcome::Done, applied)
}

fn apply_chunk(sink: &mut dyn DescriptionSink, chunk: &DescriptionMap) {
    for (video_id, text) in chunk {
        sink.apply_description(video_id, text);
    }
}

fn report(outcome: LoaderOutcome, chunks_applied: usize) -> LoaderReport {
    LoaderReport {
        outcome,
        chunks_applied,
    }
}
