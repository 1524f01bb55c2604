use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// 打开笔记文件的方式
pub trait Opener {
    fn open(&self, path: &Path) -> Result<()>;
}

/// 通过外部编辑器打开文件
#[derive(Debug, Clone)]
pub struct EditorOpener {
    command: String,
}

impl EditorOpener {
    /// `command` 可带参数，例如 `"code --wait"`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn build_command(&self, path: &Path) -> Result<Command> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().context("编辑器命令为空")?;

        let mut command = Command::new(program);
        command.args(parts).arg(path);
        Ok(command)
    }
}

impl Opener for EditorOpener {
    fn open(&self, path: &Path) -> Result<()> {
        let status = self
            .build_command(path)?
            .status()
            .with_context(|| format!("无法启动编辑器: {}", self.command))?;

        if !status.success() {
            bail!("编辑器异常退出 ({}): {}", status, path.display());
        }
        Ok(())
    }
}
