//! Redraw lifecycle for a chart embedded in a host that resizes and swaps data.
//!
//! Nothing here sleeps or spawns: the host passes millisecond timestamps in and
//! calls [`ForcePlotChart::poll`] from its own timer or animation loop.

use crate::config::{Config, LayoutConfig, SchedulerConfig};
use crate::ir::ForcePlot;
use crate::layout::{ForcePlotLayout, compute_layout};
use crate::render::render_svg;
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawTrigger {
    Mount,
    Resize,
    DataChanged,
    ZeroWidthRetry,
}

/// Single pending deadline. A new request replaces the old one.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    config: SchedulerConfig,
    pending: Option<(u64, RedrawTrigger)>,
}

impl RedrawScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn delay_for(&self, trigger: RedrawTrigger) -> u64 {
        match trigger {
            RedrawTrigger::Mount => self.config.mount_delay_ms,
            RedrawTrigger::Resize | RedrawTrigger::DataChanged => self.config.resize_debounce_ms,
            RedrawTrigger::ZeroWidthRetry => self.config.zero_width_retry_ms,
        }
    }

    /// Schedules a redraw and returns its deadline.
    pub fn request(&mut self, trigger: RedrawTrigger, now: u64) -> u64 {
        let deadline = now.saturating_add(self.delay_for(trigger));
        self.pending = Some((deadline, trigger));
        deadline
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|(deadline, _)| deadline)
    }

    /// Clears and returns the pending trigger once its deadline has passed.
    pub fn take_due(&mut self, now: u64) -> Option<RedrawTrigger> {
        match self.pending {
            Some((deadline, trigger)) if deadline <= now => {
                self.pending = None;
                Some(trigger)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Per-chart state carried between redraws.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub plot: ForcePlot,
    pub theme: Theme,
    pub layout_config: LayoutConfig,
    pub last_layout: Option<ForcePlotLayout>,
    pub last_svg: Option<String>,
    pub redraw_count: u64,
}

impl RenderContext {
    pub fn new(plot: ForcePlot, theme: Theme, layout_config: LayoutConfig) -> Self {
        Self {
            plot,
            theme,
            layout_config,
            last_layout: None,
            last_svg: None,
            redraw_count: 0,
        }
    }

    /// Lays out and renders from scratch at `width`.
    pub fn draw(&mut self, width: f64, measurer: &dyn TextMeasure) -> &str {
        let layout = compute_layout(
            &self.plot,
            &self.theme,
            &self.layout_config,
            width,
            measurer,
        );
        let svg = render_svg(&layout, &self.theme);
        self.last_layout = Some(layout);
        self.redraw_count += 1;
        self.last_svg.insert(svg).as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Idle,
    Deferred { retry_at: u64 },
    Drawn,
}

pub struct ForcePlotChart<M: TextMeasure> {
    context: RenderContext,
    scheduler: RedrawScheduler,
    measurer: M,
    mounted: bool,
    detached: bool,
}

impl<M: TextMeasure> ForcePlotChart<M> {
    pub fn new(plot: ForcePlot, config: &Config, measurer: M) -> Self {
        Self {
            context: RenderContext::new(plot, config.theme.clone(), config.layout.clone()),
            scheduler: RedrawScheduler::new(config.scheduler),
            measurer,
            mounted: false,
            detached: false,
        }
    }

    pub fn mount(&mut self, now: u64) -> bool {
        if self.detached {
            return false;
        }
        self.mounted = true;
        self.scheduler.request(RedrawTrigger::Mount, now);
        true
    }

    pub fn resize(&mut self, now: u64) -> bool {
        if !self.mounted || self.detached {
            return false;
        }
        self.scheduler.request(RedrawTrigger::Resize, now);
        true
    }

    /// Replaces the data. Before mount the new data is simply used by the first draw.
    pub fn set_data(&mut self, plot: ForcePlot, now: u64) -> bool {
        if self.detached {
            return false;
        }
        self.context.plot = plot;
        if self.mounted {
            self.scheduler.request(RedrawTrigger::DataChanged, now);
        }
        true
    }

    /// Detaches from the host. Later events are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.detached = true;
        self.scheduler.cancel();
    }

    pub fn poll(&mut self, now: u64, container_width: f64) -> PollOutcome {
        if self.detached {
            return PollOutcome::Idle;
        }
        let Some(trigger) = self.scheduler.take_due(now) else {
            return PollOutcome::Idle;
        };
        if !(container_width > 0.0) || !container_width.is_finite() {
            let retry_at = self.scheduler.request(RedrawTrigger::ZeroWidthRetry, now);
            debug!(?trigger, retry_at, "container has no width yet, deferring draw");
            return PollOutcome::Deferred { retry_at };
        }
        self.context.draw(container_width, &self.measurer);
        debug!(?trigger, width = container_width, redraws = self.context.redraw_count, "redrew force plot");
        PollOutcome::Drawn
    }

    pub fn pending_deadline(&self) -> Option<u64> {
        self.scheduler.deadline()
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn svg(&self) -> Option<&str> {
        self.context.last_svg.as_deref()
    }

    pub fn layout(&self) -> Option<&ForcePlotLayout> {
        self.context.last_layout.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Feature;
    use crate::text_metrics::MonospaceMetrics;

    fn chart() -> ForcePlotChart<MonospaceMetrics> {
        let plot = ForcePlot::new(vec![Feature::new("0", 1.0), Feature::new("1", -0.5)]);
        ForcePlotChart::new(plot, &Config::default(), MonospaceMetrics::default())
    }

    #[test]
    fn mount_draws_after_short_delay() {
        let mut chart = chart();
        assert!(chart.mount(1_000));
        assert_eq!(chart.poll(1_049, 400.0), PollOutcome::Idle);
        assert_eq!(chart.poll(1_050, 400.0), PollOutcome::Drawn);
        assert_eq!(chart.context().redraw_count, 1);
        assert!(chart.svg().is_some_and(|svg| svg.starts_with("<svg")));
        assert_eq!(chart.poll(2_000, 400.0), PollOutcome::Idle);
    }

    #[test]
    fn resize_bursts_are_debounced() {
        let mut chart = chart();
        chart.mount(0);
        chart.poll(50, 400.0);
        assert!(chart.resize(100));
        assert!(chart.resize(150));
        assert!(chart.resize(250));
        assert_eq!(chart.pending_deadline(), Some(450));
        assert_eq!(chart.poll(400, 500.0), PollOutcome::Idle);
        assert_eq!(chart.poll(450, 500.0), PollOutcome::Drawn);
        assert_eq!(chart.context().redraw_count, 2);
        assert_eq!(chart.layout().map(|layout| layout.width), Some(500.0));
    }

    #[test]
    fn zero_width_defers_and_retries() {
        let mut chart = chart();
        chart.mount(0);
        assert_eq!(chart.poll(50, 0.0), PollOutcome::Deferred { retry_at: 550 });
        assert_eq!(chart.poll(300, 400.0), PollOutcome::Idle);
        assert_eq!(chart.poll(550, 0.0), PollOutcome::Deferred { retry_at: 1_050 });
        assert_eq!(chart.poll(1_050, 320.0), PollOutcome::Drawn);
        assert_eq!(chart.context().redraw_count, 1);
    }

    #[test]
    fn data_change_schedules_redraw() {
        let mut chart = chart();
        assert!(chart.set_data(ForcePlot::new(vec![Feature::new("x", 2.0)]), 0));
        assert_eq!(chart.pending_deadline(), None);
        chart.mount(10);
        chart.poll(60, 400.0);
        assert!(chart.set_data(ForcePlot::new(vec![Feature::new("y", -2.0)]), 100));
        assert_eq!(chart.pending_deadline(), Some(300));
        assert_eq!(chart.poll(300, 400.0), PollOutcome::Drawn);
        let keys: Vec<&str> = chart
            .layout()
            .map(|layout| layout.features.iter().map(|f| f.key.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["y"]);
    }

    #[test]
    fn unmount_detaches() {
        let mut chart = chart();
        chart.mount(0);
        chart.resize(20);
        chart.unmount();
        assert_eq!(chart.pending_deadline(), None);
        assert!(!chart.resize(30));
        assert!(!chart.mount(30));
        assert!(!chart.set_data(ForcePlot::default(), 30));
        assert_eq!(chart.poll(10_000, 400.0), PollOutcome::Idle);
        assert_eq!(chart.context().redraw_count, 0);
    }

    #[test]
    fn resize_before_mount_is_ignored() {
        let mut chart = chart();
        assert!(!chart.resize(0));
        assert_eq!(chart.pending_deadline(), None);
    }
}
