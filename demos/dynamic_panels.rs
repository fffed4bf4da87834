//! Dynamic panels demo.
//!
//! Keys: 1-4 focus a panel, Tab/Shift+Tab cycle, arrows or hjkl move,
//! `a` toggles accordion mode, `m` cycles 2/3/4-panel layouts, `q` quits.
//! Clicking a panel focuses it. Set `ACCORDION_LOG` to a file path to get
//! JSON-lines runtime logs.

use std::time::Duration;

use accordion_room::logging::FileSink;
use accordion_room::{
    AnsiRenderer, CliDriver, EventFlow, LayoutEngine, LifecycleLoggerPlugin, LogLevel, Logger,
    PanelMode, PanelPlugin, PanelRuntime, Region, Result, RuntimeContext, RuntimeEvent, Size,
};

struct DemoContent {
    ticks: u64,
}

impl DemoContent {
    fn body(region: Region) -> Vec<String> {
        let intro: &[&str] = match region {
            Region::Left => &[
                "This is the left panel.",
                "",
                "When focused, it expands!",
                "Try clicking or pressing '1'",
            ],
            Region::Right => &[
                "This is the right panel.",
                "",
                "Press '2' to focus this panel",
                "When focused, it gets more space!",
            ],
            Region::Bottom => &[
                "This panel appears in 3-panel mode.",
                "Press 'm' to switch layouts",
                "Press '3' to focus this panel",
            ],
            Region::Header => &["Header row of the 4-panel layout.", "Press '4' to focus it"],
            Region::Footer => &["Footer row of the 4-panel layout.", "Press '3' to focus it"],
            Region::Top | Region::Middle => &[],
        };

        let mut lines: Vec<String> = intro.iter().map(|line| line.to_string()).collect();
        lines.push(String::new());
        lines.extend((lines.len() + 1..=20).map(|n| format!("Line {n}")));
        lines
    }
}

impl PanelPlugin for DemoContent {
    fn name(&self) -> &str {
        "demo.content"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        for region in [
            Region::Left,
            Region::Right,
            Region::Bottom,
            Region::Header,
            Region::Footer,
        ] {
            ctx.set_panel(region, DemoContent::body(region));
        }
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        if let RuntimeEvent::Tick { .. } = event {
            self.ticks += 1;
            // Refresh roughly once a second at the default tick rate.
            if self.ticks % 20 == 0 {
                let mut lines = DemoContent::body(Region::Header);
                lines.insert(0, format!("Uptime: {}s", self.ticks / 20));
                ctx.set_panel(Region::Header, lines);
            }
        }
        Ok(EventFlow::Continue)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut runtime = PanelRuntime::new(
        LayoutEngine::default(),
        AnsiRenderer::with_default(),
        PanelMode::Dual,
        Size::new(100, 30),
    )?;

    if let Ok(path) = std::env::var("ACCORDION_LOG") {
        let logger = Logger::new(FileSink::new(path, 1 << 20)?).with_min_level(LogLevel::Debug);
        let config = runtime.config_mut();
        config.logger = Some(logger.clone());
        config.metrics_interval = Duration::from_secs(5);
        runtime.register_plugin(LifecycleLoggerPlugin::new(logger));
    }
    runtime.register_plugin(DemoContent { ticks: 0 });

    CliDriver::new(runtime).run()?;
    Ok(())
}
