//! The dashboard: wires generators, filters and the notification sink.
//!
//! RULES:
//!   - All randomness flows through the RngBank, one stream per panel refresh.
//!   - "Now" comes only from the injected Clock.
//!   - Record collections are owned source data; views return filtered copies.
//!   - Only this layer notifies. Core components stay pure.

use crate::{
    activity::{ActivityBreakdown, ActivityPeriod},
    clock::Clock,
    config::DashboardConfig,
    error::DashResult,
    filter::{FilterCriteria, RecordFilter, SortSpec},
    fixtures,
    notification::{Notification, NotificationSink, Severity},
    record::Record,
    rng::{PanelSlot, RngBank},
    series::{GeneratedSeries, SeriesGenerator, Timeframe},
    types::RiskLevel,
};

pub struct Dashboard<C: Clock, S: NotificationSink> {
    pub config: DashboardConfig,
    rng_bank:   RngBank,
    clock:      C,
    sink:       S,
    risk_filter:  RecordFilter,
    event_filter: RecordFilter,
    risks:      Vec<Record>,
    events:     Vec<Record>,
    alerts:     Vec<Record>,
    /// Refresh counters per panel, so repeated refreshes draw fresh values.
    pattern_refreshes:    u64,
    statistics_refreshes: u64,
}

impl<C: Clock, S: NotificationSink> Dashboard<C, S> {
    /// Build a dashboard over the built-in mock collections.
    pub fn new(config: DashboardConfig, clock: C, sink: S) -> Self {
        Self {
            rng_bank:     RngBank::new(config.seed),
            risk_filter:  RecordFilter::new(config.risk_search_fields.iter().cloned()),
            event_filter: RecordFilter::new(config.event_search_fields.iter().cloned()),
            risks:        fixtures::risks(),
            events:       fixtures::timeline_events(),
            alerts:       fixtures::recent_alerts(),
            pattern_refreshes:    0,
            statistics_refreshes: 0,
            config,
            clock,
            sink,
        }
    }

    /// Replace the risk and event collections.
    pub fn with_records(mut self, risks: Vec<Record>, events: Vec<Record>) -> Self {
        self.risks = risks;
        self.events = events;
        self
    }

    pub fn risks(&self) -> &[Record] {
        &self.risks
    }

    pub fn events(&self) -> &[Record] {
        &self.events
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Regenerate the transaction pattern chart.
    ///
    /// Emits one success notification per refresh and one warning per
    /// flagged point. Invalid overrides are returned as errors and nothing
    /// is emitted.
    pub fn refresh_transaction_pattern(
        &mut self,
        timeframe: Option<Timeframe>,
        threshold: Option<f64>,
    ) -> DashResult<GeneratedSeries> {
        let timeframe = timeframe.unwrap_or(self.config.series.timeframe);
        let mut params = self.config.series.params(Some(timeframe));
        if let Some(t) = threshold {
            params = params.with_threshold(t);
        }
        let generator = SeriesGenerator::new(params)?;

        let mut rng = self
            .rng_bank
            .for_panel_at(PanelSlot::TransactionPattern, self.pattern_refreshes);
        self.pattern_refreshes += 1;

        let series = generator.generate(&mut rng, &self.clock);
        let now = self.clock.now();

        log::info!(
            "dashboard: refresh #{} of {} ({timeframe}) flagged {} of {} points",
            self.pattern_refreshes,
            rng.name,
            series.anomaly_indices.len(),
            series.len(),
        );

        self.sink.notify(
            Notification::new("Data loaded successfully!", Severity::Success)
                .from_source(PanelSlot::TransactionPattern.name())
                .with_category(timeframe.label())
                .at(now),
        );

        for point in series.anomalies() {
            let z = series.stats.z_score(point.value);
            let impact = if z >= 2.0 * series.threshold {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            };
            self.sink.notify(
                Notification::new(
                    format!("Anomaly detected at {}: {:.2} (z={z:.2})", point.label, point.value),
                    Severity::Warning,
                )
                .from_source(PanelSlot::TransactionPattern.name())
                .with_impact(impact)
                .with_category("transaction_volume")
                .with_action("Review transactions in this window")
                .related_to(format!("point-{}", point.index))
                .at(point.timestamp),
            );
        }

        Ok(series)
    }

    /// Regenerate the transaction statistics breakdown.
    pub fn activity(&mut self, period: ActivityPeriod) -> ActivityBreakdown {
        let mut rng = self
            .rng_bank
            .for_panel_at(PanelSlot::TransactionStatistics, self.statistics_refreshes);
        self.statistics_refreshes += 1;
        ActivityBreakdown::generate(period, &mut rng)
    }

    /// The risk register view. `sort` defaults to the configured order.
    pub fn risk_register(&self, criteria: &FilterCriteria, sort: Option<&SortSpec>) -> Vec<Record> {
        let sort = sort.unwrap_or(&self.config.default_sort);
        self.risk_filter.apply(&self.risks, criteria, sort)
    }

    /// The events timeline view, newest first unless told otherwise.
    pub fn event_timeline(&self, criteria: &FilterCriteria, sort: Option<&SortSpec>) -> Vec<Record> {
        let newest_first = SortSpec::desc("date");
        self.event_filter
            .apply(&self.events, criteria, sort.unwrap_or(&newest_first))
    }

    /// Push the overview's recent alerts through the sink. Returns how many were sent.
    pub fn replay_recent_alerts(&mut self) -> usize {
        for alert in &self.alerts {
            let severity = Severity::from_label(alert.text("type").unwrap_or_default());
            let mut n = Notification::new(alert.text("message").unwrap_or_default(), severity)
                .from_source("risk_overview")
                .related_to(alert.id.clone());
            if let Some(action) = alert.text("recommendedAction") {
                n = n.with_action(action);
            }
            if let Some(ts) = alert
                .text("timestamp")
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            {
                n = n.at(ts.with_timezone(&chrono::Utc));
            }
            self.sink.notify(n);
        }
        self.alerts.len()
    }
}
