use std::io::{BufRead, Write};

use anyhow::Result;

use crate::domain::MatchRecord;
use crate::infrastructure::Opener;
use crate::presentation::print_note;

pub const PROMPT: &str = "`open <id>` 用编辑器打开, `more <id>` 打印文件内容, `q` 退出";

/// 交互命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(usize),
    More(usize),
    Quit,
    Empty,
    /// 编号不是数字
    BadIndex(String),
    Unknown(String),
}

impl Command {
    /// 解析一行输入，例如 `open 3`、`more 0`、`q`
    pub fn parse(line: &str) -> Self {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => Command::Empty,
            ["q"] => Command::Quit,
            [verb @ ("open" | "more"), id] => match id.parse::<usize>() {
                Ok(idx) if *verb == "open" => Command::Open(idx),
                Ok(idx) => Command::More(idx),
                Err(_) => Command::BadIndex(id.to_string()),
            },
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}

/// 结果列表上的交互会话
pub struct Session<'a, R, W, O> {
    input: R,
    output: W,
    opener: &'a O,
}

impl<'a, R: BufRead, W: Write, O: Opener> Session<'a, R, W, O> {
    pub fn new(input: R, output: W, opener: &'a O) -> Self {
        Self {
            input,
            output,
            opener,
        }
    }

    /// 循环读取命令，直到输入 `q` 或输入结束
    pub fn run(&mut self, records: &[MatchRecord]) -> Result<()> {
        loop {
            writeln!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            match Command::parse(&line) {
                Command::Quit => return Ok(()),
                Command::Empty => {}
                Command::Open(idx) => match records.get(idx) {
                    Some(record) => {
                        if let Err(err) = self.opener.open(record.location()) {
                            writeln!(self.output, "打开文件失败: {:#}", err)?;
                        }
                    }
                    None => self.report_missing(idx, records.len())?,
                },
                Command::More(idx) => match records.get(idx) {
                    Some(record) => {
                        if let Err(err) = print_note(&mut self.output, record.location()) {
                            writeln!(self.output, "{:#}", err)?;
                        }
                    }
                    None => self.report_missing(idx, records.len())?,
                },
                Command::BadIndex(id) => {
                    writeln!(self.output, "无效的编号 `{}`，请输入数字", id)?;
                }
                Command::Unknown(input) => {
                    writeln!(self.output, "无法识别的命令: `{}`", input)?;
                }
            }
        }
    }

    fn report_missing(&mut self, idx: usize, total: usize) -> Result<()> {
        writeln!(self.output, "编号 {} 不存在，有效范围 0-{}", idx, total.saturating_sub(1))?;
        Ok(())
    }
}
