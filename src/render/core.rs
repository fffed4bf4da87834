use std::io::Write;

use crossterm::style::{Color, Stylize};

use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::layout::{Frame, Region};
use crate::registry::PanelState;
use crate::width::{fit_line, truncate};

/// Colors used by the panel and chrome renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub border: Color,
    pub focused_border: Color,
    pub title: Color,
    pub focused_title: Color,
    pub muted: Color,
    pub divider: Color,
    pub accent: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::AnsiValue(240),
            focused_border: Color::AnsiValue(39),
            title: Color::AnsiValue(252),
            focused_title: Color::AnsiValue(39),
            muted: Color::AnsiValue(245),
            divider: Color::AnsiValue(240),
            accent: Color::AnsiValue(213),
            error: Color::AnsiValue(196),
        }
    }
}

/// Everything a panel renderer needs to draw one block.
#[derive(Debug, Clone, Copy)]
pub struct PanelView<'a> {
    pub region: Region,
    pub rect: Rect,
    pub focused: bool,
    pub weight: u32,
    pub lines: &'a [String],
}

/// Turns a panel view into exactly `rect.height` lines of `rect.width` columns.
pub trait PanelRenderer: Send {
    fn render_panel(&self, view: &PanelView<'_>) -> Vec<String>;
}

/// Rounded bordered box with a title, a weight/size subtitle and content.
#[derive(Debug, Clone, Default)]
pub struct BoxRenderer {
    theme: Theme,
}

impl BoxRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn inner_lines(&self, view: &PanelView<'_>, text_width: usize, rows: usize) -> Vec<String> {
        let mut title = format!("{} PANEL", view.region.label());
        if view.focused {
            title.push_str(" ●");
        }
        let title_color = if view.focused {
            self.theme.focused_title
        } else {
            self.theme.title
        };
        let subtitle = format!(
            "Weight: {} | Size: {}x{}",
            view.weight, view.rect.width, view.rect.height
        );

        let mut lines = vec![
            format!("{}", truncate(&title, text_width).with(title_color).bold()),
            format!("{}", truncate(&subtitle, text_width).with(self.theme.muted)),
            String::new(),
        ];
        lines.extend(view.lines.iter().map(|line| truncate(line, text_width)));
        lines.truncate(rows);
        lines.resize(rows, String::new());
        lines
    }
}

impl PanelRenderer for BoxRenderer {
    fn render_panel(&self, view: &PanelView<'_>) -> Vec<String> {
        let width = view.rect.width as usize;
        let height = view.rect.height as usize;
        if width < 2 || height < 2 {
            return vec![" ".repeat(width); height];
        }

        let color = if view.focused {
            self.theme.focused_border
        } else {
            self.theme.border
        };
        let bar = "─".repeat(width - 2);
        let side = format!("{}", "│".with(color));

        let text_width = width.saturating_sub(4);
        let mut block = Vec::with_capacity(height);
        block.push(format!("{}", format!("╭{bar}╮").with(color)));
        for line in self.inner_lines(view, text_width, height - 2) {
            let inner = if width >= 4 {
                format!(" {} ", fit_line(&line, text_width))
            } else {
                fit_line("", width - 2)
            };
            block.push(format!("{side}{inner}{side}"));
        }
        block.push(format!("{}", format!("╰{bar}╯").with(color)));
        block
    }
}

/// Plain text for the title block and status bar; styling happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromeLines {
    /// Rows written from the top of the screen.
    pub title: Vec<String>,
    /// Written on the last screen row when present.
    pub status: Option<String>,
}

/// ANSI escape code renderer writing directly to a terminal handle.
pub struct AnsiRenderer {
    theme: Theme,
    panels: Box<dyn PanelRenderer>,
}

impl AnsiRenderer {
    pub fn new<P>(panels: P, theme: Theme) -> Self
    where
        P: PanelRenderer + 'static,
    {
        Self {
            theme,
            panels: Box::new(panels),
        }
    }

    pub fn with_default() -> Self {
        let theme = Theme::default();
        Self::new(BoxRenderer::new(theme), theme)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn clear(&self, writer: &mut impl Write) -> Result<()> {
        write!(writer, "\x1b[2J")?;
        Ok(())
    }

    pub fn render_panels(
        &self,
        writer: &mut impl Write,
        dirty: &[(Region, PanelState)],
    ) -> Result<()> {
        for (region, state) in dirty {
            let Some(rect) = state.rect else { continue };
            if rect.is_empty() {
                continue;
            }
            let view = PanelView {
                region: *region,
                rect,
                focused: state.focused,
                weight: state.weight,
                lines: &state.content,
            };
            let block = self.panels.render_panel(&view);
            write_block(writer, rect, &block)?;
        }
        Ok(())
    }

    pub fn render_dividers(&self, writer: &mut impl Write, frame: &Frame) -> Result<()> {
        for rect in frame.dividers() {
            let glyph = if rect.width < rect.height { "│" } else { "─" };
            let row = glyph.repeat(rect.width as usize);
            let styled = format!("{}", row.as_str().with(self.theme.divider));
            for offset in 0..rect.height {
                move_to(writer, rect.x, rect.y + offset)?;
                write!(writer, "{styled}")?;
            }
        }
        Ok(())
    }

    pub fn render_chrome(
        &self,
        writer: &mut impl Write,
        size: Size,
        chrome: &ChromeLines,
    ) -> Result<()> {
        let width = size.width as usize;
        for (idx, line) in chrome.title.iter().enumerate() {
            if idx >= size.height as usize {
                break;
            }
            let fitted = fit_line(line, width);
            let styled = match idx {
                0 => format!("{}", fitted.with(self.theme.accent).bold()),
                _ => format!("{}", fitted.with(self.theme.muted)),
            };
            move_to(writer, 0, idx as u16)?;
            write!(writer, "{styled}")?;
        }

        if let Some(status) = &chrome.status {
            if size.height > 0 {
                move_to(writer, 0, size.height - 1)?;
                write!(writer, "{}", fit_line(status, width).with(self.theme.title))?;
            }
        }
        Ok(())
    }

    /// Fallback shown instead of panels when the terminal is below `min`.
    pub fn render_too_small(&self, writer: &mut impl Write, size: Size, min: Size) -> Result<()> {
        self.clear(writer)?;
        let lines = [
            "Terminal too small!".to_string(),
            format!("Resize to at least {}x{}", min.width, min.height),
        ];
        for (idx, line) in lines.iter().enumerate() {
            if idx >= size.height as usize {
                break;
            }
            move_to(writer, 0, idx as u16)?;
            let fitted = truncate(line, size.width as usize);
            write!(writer, "{}", fitted.with(self.theme.error).bold())?;
        }
        Ok(())
    }

    pub fn flush(&self, writer: &mut impl Write) -> Result<()> {
        writer.flush()?;
        Ok(())
    }
}

fn move_to(writer: &mut impl Write, x: u16, y: u16) -> Result<()> {
    write!(writer, "\x1b[{};{}H", y + 1, x + 1)?;
    Ok(())
}

fn write_block(writer: &mut impl Write, rect: Rect, block: &[String]) -> Result<()> {
    for (offset, line) in block.iter().take(rect.height as usize).enumerate() {
        move_to(writer, rect.x, rect.y + offset as u16)?;
        write!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Topology, compose};
    use crate::registry::PanelRegistry;
    use crate::width::display_width;

    fn view<'a>(rect: Rect, focused: bool, lines: &'a [String]) -> PanelView<'a> {
        PanelView {
            region: Region::Left,
            rect,
            focused,
            weight: 2,
            lines,
        }
    }

    #[test]
    fn box_fills_its_rect_exactly() {
        let content = vec!["a fairly long line of panel content".to_string()];
        let renderer = BoxRenderer::default();
        let block = renderer.render_panel(&view(Rect::new(0, 0, 20, 6), true, &content));

        assert_eq!(block.len(), 6);
        for line in &block {
            assert_eq!(display_width(line), 20);
        }
        assert!(block[1].contains("LEFT PANEL"));
        assert!(block[2].contains("Weight: 2"));
    }

    #[test]
    fn box_truncates_overflowing_content_rows() {
        let content: Vec<String> = (0..50).map(|i| format!("Line {i}")).collect();
        let block = BoxRenderer::default().render_panel(&view(Rect::new(0, 0, 40, 8), false, &content));
        assert_eq!(block.len(), 8);
        assert!(block.iter().any(|l| l.contains("Line 2")));
        assert!(!block.iter().any(|l| l.contains("Line 3")));
    }

    #[test]
    fn tiny_box_degrades_to_blank_cells() {
        let block = BoxRenderer::default().render_panel(&view(Rect::new(0, 0, 1, 3), false, &[]));
        assert_eq!(block, vec![" ".to_string(); 3]);
    }

    #[test]
    fn renderer_writes_cursor_sequences() {
        let frame = compose(Topology::DualPane, 100, 10, Some(Region::Left), true).unwrap();
        let mut registry = PanelRegistry::new();
        registry.sync_frame(&frame, Some(Region::Left));
        let dirty = registry.take_dirty();

        let mut output = Vec::new();
        let renderer = AnsiRenderer::with_default();
        renderer.render_panels(&mut output, &dirty).unwrap();
        renderer.render_dividers(&mut output, &frame).unwrap();

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[1;1H"));
        assert!(rendered.contains("\u{1b}[1;68H"));
        assert!(rendered.contains("\u{1b}[10;67H"));
        assert!(rendered.contains("│"));
    }

    #[test]
    fn too_small_view_names_minimum() {
        let mut output = Vec::new();
        AnsiRenderer::with_default()
            .render_too_small(&mut output, Size::new(30, 5), Size::new(40, 10))
            .unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("Terminal too small!"));
        assert!(rendered.contains("Resize to at least 40x10"));
    }
}
