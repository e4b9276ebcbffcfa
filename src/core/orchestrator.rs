use tracing::{debug, info};

use crate::config::AppConfig;
use crate::core::data_access::DataAccess;
use crate::error::MarketQueryError;
use crate::models::{PipelineResult, PricePoint, RetailQuote};
use crate::query;
use crate::response::ResponseSynthesizer;

/// Wires the whole pipeline end to end: analyze → fetch → render.
/// No retries happen at this layer; recovery lives inside the facade's
/// single fallback-to-synthetic transition.
pub struct QueryPipeline {
    data: DataAccess,
    synthesizer: ResponseSynthesizer,
}

impl QueryPipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            data: DataAccess::new(config),
            synthesizer: ResponseSynthesizer::new(config),
        }
    }

    /// Assemble from explicit parts (tests inject fakes this way).
    pub fn with_parts(data: DataAccess, synthesizer: ResponseSynthesizer) -> Self {
        Self { data, synthesizer }
    }

    /// Process one question from start to finish. Never fails: every
    /// internal error has a defined degraded answer.
    pub async fn process(&self, question: &str) -> PipelineResult {
        let analysis = query::analyze(question);
        debug!(
            intent = analysis.intent.as_str(),
            params = ?analysis.params,
            "query analyzed"
        );

        let response = match self.data.fetch(analysis.intent, &analysis.params).await {
            Ok(data) => self.synthesizer.render(&analysis, &data).await,
            Err(err) => {
                info!(intent = analysis.intent.as_str(), %err, "rendering degraded answer");
                self.synthesizer.render_failure(&err)
            }
        };

        PipelineResult {
            query: question.to_string(),
            analysis,
            response,
        }
    }

    /// Benchmark price for one date; thin pass-through to the facade.
    pub async fn price_on(&self, date: &str) -> Result<Option<PricePoint>, MarketQueryError> {
        self.data.price_on(date).await
    }

    /// Spot rate for one currency vs USD; thin pass-through to the facade.
    pub async fn rate_for(&self, symbol: &str) -> Option<f64> {
        self.data.rate_for(symbol).await
    }

    /// Current pump-price estimate for a country.
    pub async fn retail_fuel_price(
        &self,
        country: &str,
    ) -> Result<RetailQuote, MarketQueryError> {
        self.data.retail_fuel_price(country).await
    }
}
