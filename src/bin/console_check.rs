//! Console self-test: draws every palette pair and echoes mouse and resize
//! events until a key is pressed.

use std::time::Duration;

use crossterm::event::KeyEvent;

use sokoban::console::{run_loop, Canvas, Console, EventHandler, Flow, Ink, MouseReport, Screen};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const MOUSE_ROW: u16 = 19;
const RESIZE_ROW: u16 = 20;

struct Echo;

impl EventHandler for Echo {
    fn on_key(&mut self, screen: &mut dyn Screen, _key: KeyEvent) -> anyhow::Result<Flow> {
        screen.beep()?;
        Ok(Flow::Stop)
    }

    fn on_mouse(&mut self, screen: &mut dyn Screen, report: MouseReport) -> anyhow::Result<Flow> {
        let line = format!(
            "Mouse activity: yx=({}, {}), buttons={}    ",
            report.row, report.col, report.buttons.bits()
        );
        screen.print(MOUSE_ROW, 0, &line)?;
        screen.refresh()?;
        Ok(Flow::Continue)
    }

    fn on_resize(&mut self, screen: &mut dyn Screen, rows: u16, cols: u16) -> anyhow::Result<Flow> {
        screen.print(RESIZE_ROW, 0, &format!("Screen size: height={rows} x width={cols}    "))?;
        screen.refresh()?;
        Ok(Flow::Continue)
    }
}

fn draw_palette(console: &mut Console) -> anyhow::Result<()> {
    for (x, &fg) in Ink::PALETTE.iter().enumerate() {
        for (y, &bg) in Ink::PALETTE.iter().enumerate() {
            console.draw_text(y as u16, x as u16, "$", fg, bg)?;
            let code = (y * 16 + x) as u32;
            let glyph = char::from_u32(code).filter(|c| !c.is_control()).unwrap_or(' ');
            console.draw_text(y as u16, x as u16 + 20, &glyph.to_string(), Ink::Black, Ink::White)?;
        }
    }
    let n = Ink::PALETTE.len() as u16;
    let stats = format!(
        "known colors={}, used color pairs={}",
        Ink::PALETTE.len(), console.color_pairs().len()
    );
    console.print(n, 0, &stats)?;
    console.print(n + 2, 0, "Press any key to exit...")?;
    console.refresh()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    colog::init();
    let mut console = Console::open(Ink::Default, Ink::Default, true)?;
    let result = draw_palette(&mut console)
        .and_then(|()| run_loop(&mut console, POLL_INTERVAL, &mut Echo));
    console.shutdown()?;
    result
}
