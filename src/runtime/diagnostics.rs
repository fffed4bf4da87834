use serde_json::json;

use crate::Result;
use crate::logging::{LogEvent, LogLevel, Logger, json_kv};

use super::{EventFlow, PanelPlugin, RuntimeContext, RuntimeEvent};

const LIFECYCLE_TARGET: &str = "accordion::runtime.lifecycle";

/// Logs raw input and resize events as they arrive, before the key map sees them.
pub struct LifecycleLoggerPlugin {
    logger: Logger,
    level: LogLevel,
    log_keys: bool,
    log_mouse: bool,
    log_paste: bool,
    log_ticks: bool,
}

impl LifecycleLoggerPlugin {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_keys: true,
            log_mouse: true,
            log_paste: false,
            log_ticks: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn log_keys(mut self, enabled: bool) -> Self {
        self.log_keys = enabled;
        self
    }

    pub fn log_mouse(mut self, enabled: bool) -> Self {
        self.log_mouse = enabled;
        self
    }

    pub fn log_paste(mut self, enabled: bool) -> Self {
        self.log_paste = enabled;
        self
    }

    pub fn log_ticks(mut self, enabled: bool) -> Self {
        self.log_ticks = enabled;
        self
    }

    fn emit(&self, message: &str, fields: impl IntoIterator<Item = (String, serde_json::Value)>) {
        let event = LogEvent::with_fields(self.level, LIFECYCLE_TARGET, message, fields);
        let _ = self.logger.log_event(event);
    }
}

impl PanelPlugin for LifecycleLoggerPlugin {
    fn name(&self) -> &str {
        "diagnostics.lifecycle_logger"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.emit(
            "plugin_initialized",
            [
                json_kv("logger_level", json!(format!("{:?}", self.level))),
                json_kv("topology", json!(ctx.frame().topology().name())),
            ],
        );
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        match event {
            RuntimeEvent::Key(key) if self.log_keys => {
                self.emit(
                    "event.key",
                    [
                        json_kv("code", json!(format!("{:?}", key.code))),
                        json_kv("modifiers", json!(format!("{:?}", key.modifiers))),
                        json_kv("kind", json!(format!("{:?}", key.kind))),
                    ],
                );
            }
            RuntimeEvent::Mouse(mouse) if self.log_mouse => {
                let region = ctx.frame().region_at(mouse.column, mouse.row);
                self.emit(
                    "event.mouse",
                    [
                        json_kv("kind", json!(format!("{:?}", mouse.kind))),
                        json_kv("x", json!(mouse.column)),
                        json_kv("y", json!(mouse.row)),
                        json_kv("region", json!(region.map(|r| r.name()))),
                    ],
                );
            }
            RuntimeEvent::Paste(data) if self.log_paste => {
                self.emit(
                    "event.paste",
                    [json_kv("chars", json!(data.chars().count()))],
                );
            }
            RuntimeEvent::Tick { elapsed } if self.log_ticks => {
                self.emit(
                    "event.tick",
                    [json_kv("elapsed_ms", json!(elapsed.as_millis()))],
                );
            }
            RuntimeEvent::FocusGained => {
                self.emit("event.focus_gained", std::iter::empty());
            }
            RuntimeEvent::FocusLost => {
                self.emit("event.focus_lost", std::iter::empty());
            }
            RuntimeEvent::Resize(size) => {
                self.emit(
                    "event.resize",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                        json_kv("topology", json!(ctx.frame().topology().name())),
                    ],
                );
            }
            _ => {}
        }

        Ok(EventFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::{AnsiRenderer, LayoutEngine, PanelMode, PanelRuntime, Size};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn logs_keys_and_resizes() {
        let sink = MemorySink::new();
        let mut runtime = PanelRuntime::new(
            LayoutEngine::default(),
            AnsiRenderer::with_default(),
            PanelMode::Dual,
            Size::new(100, 30),
        )
        .unwrap();
        runtime.register_plugin(LifecycleLoggerPlugin::new(Logger::new(sink.clone())));

        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                [
                    RuntimeEvent::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE)),
                    RuntimeEvent::Resize(Size::new(60, 30)),
                ],
            )
            .unwrap();

        let events = sink.events();
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["plugin_initialized", "event.key", "event.resize"]);
        assert_eq!(events[2].field("topology"), Some(&json!("vertical-stack")));
        assert!(events.iter().all(|e| e.target == LIFECYCLE_TARGET));
    }
}
