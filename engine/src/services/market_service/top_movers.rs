// Handler for the top movers carousel
use shared::models::SymbolSeries;

use crate::config::settings::MoversSettings;
use crate::data::SeriesSource;
use crate::movers::TopMoversSelector;

pub async fn handle_top_movers(settings: &MoversSettings, source: &dyn SeriesSource) -> Vec<SymbolSeries> {
    tracing::debug!(candidates = ?settings.candidates, top_n = settings.top_n, "Handling top movers request");
    let selector = TopMoversSelector::new(settings.top_n, settings.fallback.clone());
    selector.select(&settings.candidates, source).await
}
