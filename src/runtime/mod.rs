use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use serde_json::json;

use crate::logging::{LogEvent, json_kv};
use crate::{
    AnsiRenderer, Frame, LayoutEngine, LogLevel, Logger, PanelRegistry, Region, Result,
    RuntimeMetrics, Size, Topology,
};

mod chrome;
pub mod diagnostics;
pub mod driver;
mod focus;
mod input;

pub use chrome::{ChromeConfig, ChromeInfo, MIN_TERMINAL};
pub use focus::{FocusCommand, FocusOutcome, FocusState};
pub use input::{Action, action_for_key, action_for_mouse};

const RUNTIME_TARGET: &str = "accordion::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<RuntimeMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    pub chrome: ChromeConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "accordion::runtime.metrics".to_string(),
            chrome: ChromeConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RuntimeMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RuntimeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Which family of layouts the host wants; the concrete topology also
/// depends on the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelMode {
    #[default]
    Dual,
    Three,
    Four,
}

impl PanelMode {
    pub fn next(self) -> Self {
        match self {
            PanelMode::Dual => PanelMode::Three,
            PanelMode::Three => PanelMode::Four,
            PanelMode::Four => PanelMode::Dual,
        }
    }

    pub fn preferred_topology(self) -> Topology {
        match self {
            PanelMode::Dual => Topology::DualPane,
            PanelMode::Three => Topology::ThreePanel,
            PanelMode::Four => Topology::FourPanel,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PanelMode::Dual => "dual",
            PanelMode::Three => "three",
            PanelMode::Four => "four",
        }
    }
}

/// High-level events delivered to plugins.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize(Size),
}

/// Control the propagation of an event across plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// Context passed to plugins so they can interact with the runtime safely.
///
/// Requests are queued and applied once the plugin returns.
pub struct RuntimeContext<'a> {
    frame: &'a Frame,
    focus: &'a FocusState,
    mode: PanelMode,
    panel_updates: Vec<(Region, Vec<String>)>,
    focus_commands: Vec<FocusCommand>,
    status: Option<String>,
    mode_request: Option<PanelMode>,
    redraw_requested: bool,
    exit_requested: bool,
}

impl<'a> RuntimeContext<'a> {
    fn new(frame: &'a Frame, focus: &'a FocusState, mode: PanelMode) -> Self {
        Self {
            frame,
            focus,
            mode,
            panel_updates: Vec::new(),
            focus_commands: Vec::new(),
            status: None,
            mode_request: None,
            redraw_requested: false,
            exit_requested: false,
        }
    }

    /// The frame that is currently on screen.
    pub fn frame(&self) -> &Frame {
        self.frame
    }

    pub fn focus_state(&self) -> &FocusState {
        self.focus
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Queue new content lines for a panel. Hidden panels keep the content
    /// until they become visible again.
    pub fn set_panel<I, S>(&mut self, region: Region, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.panel_updates.push((region, lines));
        self.redraw_requested = true;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
        self.redraw_requested = true;
    }

    /// Queue a focus transition, applied after the plugin returns.
    pub fn focus(&mut self, command: FocusCommand) {
        self.focus_commands.push(command);
    }

    pub fn set_mode(&mut self, mode: PanelMode) {
        self.mode_request = Some(mode);
    }

    /// Request that the renderer runs even if no panels changed.
    pub fn request_render(&mut self) {
        self.redraw_requested = true;
    }

    /// Signal to the runtime that execution should terminate at the end of the frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn into_outcome(self) -> ContextOutcome {
        ContextOutcome {
            panel_updates: self.panel_updates,
            focus_commands: self.focus_commands,
            status: self.status,
            mode_request: self.mode_request,
            redraw_requested: self.redraw_requested,
            exit_requested: self.exit_requested,
        }
    }
}

struct ContextOutcome {
    panel_updates: Vec<(Region, Vec<String>)>,
    focus_commands: Vec<FocusCommand>,
    status: Option<String>,
    mode_request: Option<PanelMode>,
    redraw_requested: bool,
    exit_requested: bool,
}

/// Behaviour injection point for the runtime.
pub trait PanelPlugin: Send {
    fn name(&self) -> &str {
        "panel_plugin"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Plugins see events before the built-in key map; returning
    /// [`EventFlow::Consumed`] skips later plugins and the built-ins.
    fn on_event(
        &mut self,
        _ctx: &mut RuntimeContext<'_>,
        _event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn before_render(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Single-threaded event loop owning focus, the composed frame and the
/// panel registry.
pub struct PanelRuntime {
    engine: LayoutEngine,
    mode: PanelMode,
    focus: FocusState,
    size: Size,
    frame: Frame,
    registry: PanelRegistry,
    renderer: AnsiRenderer,
    plugins: Vec<Box<dyn PanelPlugin>>,
    config: RuntimeConfig,
    status: String,
    mouse: Option<(u16, u16)>,
    should_exit: bool,
    redraw_requested: bool,
    full_redraw: bool,
    showing_fallback: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl PanelRuntime {
    pub fn new(
        engine: LayoutEngine,
        renderer: AnsiRenderer,
        mode: PanelMode,
        initial_size: Size,
    ) -> Result<Self> {
        let config = RuntimeConfig::default();
        let focus = FocusState::default();
        let area = config.chrome.content_area(initial_size);
        let topology = engine.fit_topology(mode.preferred_topology(), area.width);
        let frame = engine.compose_at(
            topology,
            area,
            focus.focused(),
            focus.accordion_enabled(),
        )?;
        let mut registry = PanelRegistry::new();
        registry.sync_frame(&frame, focus.focused());

        Ok(Self {
            engine,
            mode,
            focus,
            size: initial_size,
            frame,
            registry,
            renderer,
            plugins: Vec::new(),
            config,
            status: "Ready".to_string(),
            mouse: None,
            should_exit: false,
            redraw_requested: true,
            full_redraw: true,
            showing_fallback: false,
            start_instant: None,
            last_metrics_emit: None,
        })
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn register_plugin<P>(&mut self, plugin: P)
    where
        P: PanelPlugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn panel_content(&self, region: Region) -> &[String] {
        self.registry.content(region)
    }

    /// Replace the focus state wholesale, e.g. to start with accordion off.
    pub fn set_focus_state(&mut self, focus: FocusState) -> Result<()> {
        self.focus = focus;
        self.recompose()
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout)? {
                let crossterm_event = event::read()?;
                let runtime_event = self.map_event(crossterm_event)?;
                self.dispatch_event(runtime_event)?;
                self.render_if_needed(stdout)?;
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Drive the runtime from a fixed event list instead of the terminal.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events.into_iter() {
            if let RuntimeEvent::Resize(size) = event {
                self.resize(size)?;
            }
            self.dispatch_event(event)?;
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    /// Recompose for a new terminal size.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.full_redraw = true;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        self.recompose()
    }

    pub fn set_mode(&mut self, mode: PanelMode) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        let from = self.mode;
        self.mode = mode;
        self.full_redraw = true;
        self.recompose()?;
        self.status = format!("Layout: {}", self.frame.topology());
        self.log_runtime_event(
            LogLevel::Info,
            "mode_changed",
            [
                json_kv("from", json!(from.name())),
                json_kv("to", json!(mode.name())),
                json_kv("topology", json!(self.frame.topology().name())),
            ],
        );
        Ok(())
    }

    /// Apply a focus transition against the frame currently on screen.
    pub fn apply_focus(&mut self, command: FocusCommand) -> Result<FocusOutcome> {
        let topology = self.frame.topology();
        let outcome = self.focus.apply(topology, Some(&self.frame), command);

        match &outcome {
            FocusOutcome::Changed { from, to } => {
                self.record_focus_metric();
                self.log_runtime_event(
                    LogLevel::Info,
                    "focus_changed",
                    [
                        json_kv("from", json!(from.map(|r| r.name()))),
                        json_kv("to", json!(to.name())),
                    ],
                );
                self.recompose()?;
            }
            FocusOutcome::AccordionToggled(enabled) => {
                self.log_runtime_event(
                    LogLevel::Info,
                    "accordion_toggled",
                    [json_kv("enabled", json!(enabled))],
                );
                self.recompose()?;
            }
            FocusOutcome::Rejected(reason) => {
                self.log_runtime_event(
                    LogLevel::Info,
                    "focus_rejected",
                    [
                        json_kv("reason", json!(reason)),
                        json_kv("topology", json!(topology.name())),
                    ],
                );
            }
            FocusOutcome::Unchanged => {}
        }

        if let Some(status) = outcome.status() {
            self.status = status;
            self.redraw_requested = true;
        }
        Ok(outcome)
    }

    fn recompose(&mut self) -> Result<()> {
        let area = self.config.chrome.content_area(self.size);
        let topology = self
            .engine
            .fit_topology(self.mode.preferred_topology(), area.width);
        if self.focus.retarget(topology) {
            self.log_runtime_event(
                LogLevel::Debug,
                "focus_retargeted",
                [json_kv("topology", json!(topology.name()))],
            );
        }

        let frame = self.engine.compose_at(
            topology,
            area,
            self.focus.focused(),
            self.focus.accordion_enabled(),
        )?;
        if frame.topology() != self.frame.topology() {
            self.full_redraw = true;
        }
        self.frame = frame;
        self.registry.sync_frame(&self.frame, self.focus.focused());
        self.redraw_requested = true;

        self.record_compose_metric();
        self.log_runtime_event(
            LogLevel::Debug,
            "layout_composed",
            [
                json_kv("topology", json!(topology.name())),
                json_kv("width", json!(area.width)),
                json_kv("height", json!(area.height)),
                json_kv("focused", json!(self.focus.focused().map(|r| r.name()))),
            ],
        );
        Ok(())
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) -> Result<()> {
        let mut consumed = false;
        for idx in 0..self.plugins.len() {
            let (flow, outcome) = {
                let plugin = &mut self.plugins[idx];
                let mut ctx = RuntimeContext::new(&self.frame, &self.focus, self.mode);
                let flow = plugin.on_event(&mut ctx, &event)?;
                (flow, ctx.into_outcome())
            };
            self.apply_outcome(outcome)?;
            if matches!(flow, EventFlow::Consumed) {
                consumed = true;
                break;
            }
        }

        if !consumed {
            self.handle_builtin(&event)?;
        }

        self.record_event_metric();
        self.log_runtime_event(
            LogLevel::Trace,
            "event_dispatched",
            [
                json_kv("event", json!(Self::describe_event(&event))),
                json_kv("consumed", json!(consumed)),
            ],
        );
        self.maybe_emit_metrics();
        Ok(())
    }

    fn handle_builtin(&mut self, event: &RuntimeEvent) -> Result<()> {
        let action = match event {
            RuntimeEvent::Key(key) => action_for_key(key),
            RuntimeEvent::Mouse(mouse) => {
                self.mouse = Some((mouse.column, mouse.row));
                self.redraw_requested = true;
                if self.config.chrome.fits(self.size) {
                    action_for_mouse(mouse)
                } else {
                    None
                }
            }
            _ => None,
        };

        match action {
            Some(Action::Focus(command)) => {
                self.apply_focus(command)?;
            }
            Some(Action::CycleMode) => self.set_mode(self.mode.next())?,
            Some(Action::Quit) => self.request_exit(),
            None => {}
        }
        Ok(())
    }

    fn request_exit(&mut self) {
        if !self.should_exit {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }

        self.redraw_requested = false;

        for idx in 0..self.plugins.len() {
            let outcome = {
                let plugin = &mut self.plugins[idx];
                let mut ctx = RuntimeContext::new(&self.frame, &self.focus, self.mode);
                plugin.before_render(&mut ctx)?;
                ctx.into_outcome()
            };
            self.apply_outcome(outcome)?;
        }
        // Updates queued by before_render are drawn in this pass.
        self.redraw_requested = false;

        let chrome = &self.config.chrome;
        if !chrome.fits(self.size) {
            if !self.showing_fallback || self.full_redraw {
                self.renderer
                    .render_too_small(stdout, self.size, chrome.min_size)?;
                self.renderer.flush(stdout)?;
                self.record_render_metric(0);
            }
            self.showing_fallback = true;
            self.full_redraw = false;
            return Ok(());
        }

        if self.showing_fallback {
            self.showing_fallback = false;
            self.full_redraw = true;
        }
        if self.full_redraw {
            self.renderer.clear(stdout)?;
            self.registry.mark_all_dirty();
            self.full_redraw = false;
        }

        let dirty = self.registry.take_dirty();
        self.renderer.render_panels(stdout, &dirty)?;
        self.renderer.render_dividers(stdout, &self.frame)?;
        let lines = chrome.lines(&ChromeInfo {
            topology: self.frame.topology(),
            focus: &self.focus,
            status: &self.status,
            mouse: self.mouse,
            width: self.size.width,
        });
        self.renderer.render_chrome(stdout, self.size, &lines)?;
        self.renderer.flush(stdout)?;

        self.record_render_metric(dirty.len());
        self.log_runtime_event(
            LogLevel::Debug,
            "render_completed",
            [
                json_kv("dirty_panels", json!(dirty.len())),
                json_kv("topology", json!(self.frame.topology().name())),
            ],
        );
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: ContextOutcome) -> Result<()> {
        let ContextOutcome {
            panel_updates,
            focus_commands,
            status,
            mode_request,
            redraw_requested,
            exit_requested,
        } = outcome;

        for (region, lines) in panel_updates {
            self.registry.set_content(region, lines);
        }

        if let Some(mode) = mode_request {
            self.set_mode(mode)?;
        }

        for command in focus_commands {
            self.apply_focus(command)?;
        }

        if let Some(status) = status {
            self.status = status;
        }

        if redraw_requested || self.registry.has_dirty() {
            self.redraw_requested = true;
        }

        if exit_requested {
            self.request_exit();
        }

        Ok(())
    }

    fn map_event(&mut self, event: CrosstermEvent) -> Result<RuntimeEvent> {
        match event {
            CrosstermEvent::Key(key) => Ok(RuntimeEvent::Key(key)),
            CrosstermEvent::Mouse(mouse) => Ok(RuntimeEvent::Mouse(mouse)),
            CrosstermEvent::Paste(data) => Ok(RuntimeEvent::Paste(data)),
            CrosstermEvent::FocusGained => Ok(RuntimeEvent::FocusGained),
            CrosstermEvent::FocusLost => Ok(RuntimeEvent::FocusLost),
            CrosstermEvent::Resize(width, height) => {
                let size = Size::new(width, height);
                self.resize(size)?;
                Ok(RuntimeEvent::Resize(size))
            }
        }
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("plugins", json!(self.plugins.len())),
                json_kv("mode", json!(self.mode.name())),
                json_kv("width", json!(self.size.width)),
                json_kv("height", json!(self.size.height)),
            ],
        );

        // Chrome settings may have changed through config_mut since `new`.
        self.full_redraw = true;
        self.recompose()?;

        for idx in 0..self.plugins.len() {
            let outcome = {
                let plugin = &mut self.plugins[idx];
                let plugin_name = plugin.name().to_string();
                let mut ctx = RuntimeContext::new(&self.frame, &self.focus, self.mode);
                plugin.init(&mut ctx)?;
                self.log_runtime_event(
                    LogLevel::Debug,
                    "plugin_initialized",
                    [json_kv("plugin", json!(plugin_name))],
                );
                ctx.into_outcome()
            };
            self.apply_outcome(outcome)?;
        }

        self.render_if_needed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::from_millis(0)
        {
            self.config.enable_metrics();
        }
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = LogEvent::with_fields(level, RUNTIME_TARGET, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }

    fn with_metrics(&self, update: impl FnOnce(&mut RuntimeMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut *guard);
            }
        }
    }

    fn record_event_metric(&self) {
        self.with_metrics(RuntimeMetrics::record_event);
    }

    fn record_render_metric(&self, panel_count: usize) {
        self.with_metrics(|metrics| metrics.record_render(panel_count));
    }

    fn record_compose_metric(&self) {
        self.with_metrics(RuntimeMetrics::record_compose);
    }

    fn record_focus_metric(&self) {
        self.with_metrics(RuntimeMetrics::record_focus_change);
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() {
            return;
        }

        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let snapshot_event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }

    fn describe_event(event: &RuntimeEvent) -> &'static str {
        match event {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Mouse(_) => "mouse",
            RuntimeEvent::Paste(_) => "paste",
            RuntimeEvent::FocusGained => "focus_gained",
            RuntimeEvent::FocusLost => "focus_lost",
            RuntimeEvent::Resize(_) => "resize",
        }
    }
}
