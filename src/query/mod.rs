pub mod dates;
pub mod intent;
pub mod params;

use crate::models::QueryAnalysis;

/// Turn a free-text question into a structured intent + parameter record.
pub fn analyze(query: &str) -> QueryAnalysis {
    QueryAnalysis {
        intent: intent::classify(query),
        params: params::extract(query),
        original_query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;

    #[test]
    fn test_analyze_combines_intent_and_params() {
        let analysis = analyze("Show me oil prices for the last 30 days");
        assert_eq!(analysis.intent, Intent::OilPrice);
        assert!(analysis.params.start_date.is_some());
        assert!(analysis.params.end_date.is_some());
        assert_eq!(analysis.original_query, "Show me oil prices for the last 30 days");
    }
}
