//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx、notice_rx 与键盘事件，把按键映射为 Command
//! 发送给运行时，每帧用 draw 渲染 UiState 与瞬时通知（约 1 秒后消失）。

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{broadcast, mpsc, watch};

use crate::core::{Command, UiState};
use crate::ui::render::draw;

/// 通知在屏幕上停留的时长
const NOTICE_TTL: Duration = Duration::from_millis(1000);

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    state_rx: watch::Receiver<UiState>,
    mut notice_rx: broadcast::Receiver<String>,
    cmd_tx: mpsc::UnboundedSender<Command>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = super::event::EventHandler::new(cmd_tx);
    let mut notice: Option<(String, Instant)> = None;

    loop {
        let state = state_rx.borrow().clone();

        // 通知只显示最新一条，过期即清
        while let Ok(text) = notice_rx.try_recv() {
            notice = Some((text, Instant::now()));
        }
        if let Some((_, since)) = &notice {
            if since.elapsed() >= NOTICE_TTL {
                notice = None;
            }
        }

        if let Ok(Some(ev)) = event_handler.poll() {
            if let super::event::AppEvent::Command(cmd) = ev {
                if matches!(cmd, Command::Quit) {
                    break;
                }
            }
        }

        terminal.draw(|f| {
            draw(f, &state, notice.as_ref().map(|(t, _)| t.as_str()));
        })?;

        tokio::task::yield_now().await;
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
