// file: src/pipeline/evaluator.rs
// description: query phase turning a query batch into ordered run-file blocks
// reference: futures ordered buffering over tokio blocking tasks

use crate::engine::RankedRetriever;
use crate::error::{PipelineError, Result};
use crate::exporter::RunWriter;
use crate::models::{QueryRecord, ResultBlock};
use crate::pipeline::progress::ProgressTracker;
use crate::query::escape;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub queries_evaluated: u64,
    pub result_lines: u64,
    pub queries_without_results: Vec<u32>,
}

pub struct BatchEvaluator<R> {
    retriever: Arc<R>,
    result_depth: usize,
    parallel_workers: usize,
}

impl<R: RankedRetriever + 'static> BatchEvaluator<R> {
    pub fn new(retriever: Arc<R>, result_depth: usize, parallel_workers: usize) -> Self {
        Self {
            retriever,
            result_depth,
            parallel_workers: parallel_workers.max(1),
        }
    }

    /// Searches every query and writes its block to `writer`.
    ///
    /// Up to `parallel_workers` searches run at once; blocks are still written
    /// in the order the queries were read. The first failing query aborts the
    /// pass after every earlier block has been written.
    pub async fn evaluate<I, W>(
        &self,
        queries: I,
        writer: &mut RunWriter<W>,
        progress: &ProgressTracker,
    ) -> Result<EvaluationSummary>
    where
        I: IntoIterator<Item = Result<QueryRecord>>,
        W: Write,
    {
        let depth = self.result_depth;

        let mut blocks = pin!(
            stream::iter(queries)
                .map(|query| {
                    let retriever = Arc::clone(&self.retriever);
                    async move {
                        let query = query?;
                        search_one(retriever, query, depth).await
                    }
                })
                .buffered(self.parallel_workers)
        );

        let mut summary = EvaluationSummary::default();
        while let Some(block) = blocks.next().await {
            let block = block?;
            writer.write_block(&block)?;

            summary.queries_evaluated += 1;
            summary.result_lines += block.len() as u64;
            if block.is_empty() {
                warn!("Query {} returned no results", block.query_id);
                summary.queries_without_results.push(block.query_id);
            }
            progress.add_query_result(block.len() as u64);
        }

        writer.flush()?;
        Ok(summary)
    }
}

async fn search_one<R>(retriever: Arc<R>, query: QueryRecord, depth: usize) -> Result<ResultBlock>
where
    R: RankedRetriever + 'static,
{
    let escaped = escape(&query.text);
    debug!("Query {} (source label `{}`): {}", query.id, query.label, escaped);

    let query_id = query.id;
    let hits = tokio::task::spawn_blocking(move || retriever.search(&escaped, depth))
        .await
        .map_err(|e| {
            PipelineError::Query(format!("search task for query {query_id} failed: {e}"))
        })??;

    Ok(ResultBlock::from_hits(query_id, hits))
}
