/// Periodic fetch of the latest station reading
use log::{debug, error, info};
use time::OffsetDateTime;
use url::Url;

use crate::config::{BridgeConfig, Credentials};
use crate::error::PollError;
use crate::models::DispatchSummary;
use crate::pipeline::{dispatch, PipelineContext};
use crate::sink::ValueSink;
use crate::utils::format_datetime;
use crate::weather::{device_data_url, parse_latest_reading, redacted, WeatherSource};

/// Result of a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Credentials are missing; nothing was requested.
    NotConfigured,
    /// The tick was abandoned; nothing was pushed.
    Failed(PollError),
    Dispatched(DispatchSummary),
}

/// Drives fetch, discovery and dispatch once per tick.
///
/// Holds no timer of its own; the caller decides when `on_tick` runs and
/// must not run two ticks at once.
pub struct Poller<S, K> {
    source: S,
    sink: K,
    credentials: Option<Credentials>,
    endpoint: Url,
    context: PipelineContext,
    /// Consulted every tick while `credentials` is `None`.
    reload_credentials: Box<dyn Fn() -> Option<Credentials>>,
    announced_unconfigured: bool,
    last_update: Option<OffsetDateTime>,
}

impl<S: WeatherSource, K: ValueSink> Poller<S, K> {
    pub fn new(config: &BridgeConfig, source: S, mut sink: K) -> Self {
        let context = PipelineContext::new(config.indoor_enabled, config.trend_rule);
        for group in context.registry.iter() {
            sink.add_group(group);
        }

        Self {
            source,
            sink,
            credentials: config.credentials.clone(),
            endpoint: config.endpoint.clone(),
            context,
            reload_credentials: Box::new(|| None),
            announced_unconfigured: false,
            last_update: None,
        }
    }

    /// Source of credentials supplied after startup.
    pub fn with_credential_reload<F>(mut self, reload: F) -> Self
    where
        F: Fn() -> Option<Credentials> + 'static,
    {
        self.reload_credentials = Box::new(reload);
        self
    }

    pub async fn on_tick(&mut self, now: OffsetDateTime) -> TickOutcome {
        if self.credentials.is_none() {
            self.credentials = (self.reload_credentials)();
            if self.credentials.is_some() {
                info!("Ambient Weather credentials configured");
            }
        }

        let Some(credentials) = &self.credentials else {
            if !self.announced_unconfigured {
                info!("Waiting to be configured: set AMBIENT_API_KEY and AMBIENT_MAC_ADDRESS");
                self.announced_unconfigured = true;
            }
            return TickOutcome::NotConfigured;
        };

        let url = device_data_url(&self.endpoint, credentials);
        info!(
            "Connecting to Ambient Weather server at {}: {}",
            format_datetime(&now),
            redacted(&url)
        );

        match self.poll(&url).await {
            Ok(summary) => {
                self.last_update = Some(now);
                info!(
                    "Reading dispatched: {} values pushed, {} fields missing, {} new groups",
                    summary.pushed, summary.missing, summary.discovered
                );
                TickOutcome::Dispatched(summary)
            }
            Err(e) => {
                if e.is_transport() {
                    error!("Request to Ambient servers failed: {}", e);
                } else {
                    error!("Failed to get data from server: {}", e);
                }
                if let Some(last) = &self.last_update {
                    info!("Last successful update at {}", format_datetime(last));
                }
                TickOutcome::Failed(e)
            }
        }
    }

    async fn poll(&mut self, url: &Url) -> Result<DispatchSummary, PollError> {
        let body = self.source.fetch(url).await?;
        let reading = parse_latest_reading(&body)?;
        debug!("Latest reading: {:?}", reading);

        let discovered = self.context.registry.discover(&reading);
        for group in &discovered {
            self.sink.add_group(group);
        }

        let mut summary = dispatch(&mut self.context, &mut self.sink, &reading);
        summary.discovered = discovered.len();
        self.context.first_poll = false;

        Ok(summary)
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }
}
