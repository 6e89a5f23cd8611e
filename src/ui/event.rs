//! 事件处理
//!
//! 轮询 crossterm 键盘事件：y/n/u 转 Classify，→/空格 转 Next，q 或 Ctrl+C 转 Quit，
//! 其余按键原样交回 run_app（当前无用途，保留扩展口）。

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::Command;
use crate::store::Classification;

/// 应用事件：映射出的 Command 或未映射的原始按键
#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    Key(KeyEvent),
}

/// 事件处理器：持有 cmd_tx，poll 时读键盘并把映射出的命令发给运行时
pub struct EventHandler {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl EventHandler {
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { cmd_tx }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(self.handle_key(key)));
                }
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent) -> AppEvent {
        let cmd = match key.code {
            KeyCode::Char('y') => Some(Command::Classify(Classification::Yes)),
            KeyCode::Char('n') => Some(Command::Classify(Classification::No)),
            KeyCode::Char('u') => Some(Command::Classify(Classification::Unknown)),
            KeyCode::Char(' ') | KeyCode::Right => Some(Command::Next),
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            _ => None,
        };
        match cmd {
            Some(cmd) => {
                let _ = self.cmd_tx.send(cmd.clone());
                AppEvent::Command(cmd)
            }
            None => AppEvent::Key(key),
        }
    }
}
