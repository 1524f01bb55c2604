use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bstr::ByteSlice;
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

/// 支持的笔记扩展名（含点号，区分大小写）
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".md", ".txt", ".org"];

/// 摘要最多读取的行数
pub const EXCERPT_LINES: usize = 2;

/// 搜索模式类型
#[derive(Debug, Clone)]
pub enum SearchPattern {
    /// 普通文本搜索（不区分大小写的子串匹配）
    Text(String),
    /// 正则表达式搜索（不区分大小写）
    Regex(RegexMatcher),
}

impl SearchPattern {
    /// 从输入字符串创建搜索模式
    pub fn from_input(input: &str, is_regex: bool) -> Result<Self> {
        if is_regex {
            let matcher = RegexMatcherBuilder::new()
                .case_insensitive(true)
                .build(input)
                .with_context(|| format!("无效的正则表达式: {}", input))?;
            Ok(SearchPattern::Regex(matcher))
        } else {
            Ok(SearchPattern::Text(input.to_lowercase()))
        }
    }

    /// 检查摘要是否匹配
    pub fn matches(&self, excerpt: &str) -> bool {
        match self {
            // 两侧都转小写后比较，空串总能匹配
            SearchPattern::Text(term) => excerpt.to_lowercase().contains(term.as_str()),
            // RegexMatcher 的错误类型是 NoError，is_match 不会返回 Err
            SearchPattern::Regex(matcher) => matcher.is_match(excerpt.as_bytes()).unwrap_or(false),
        }
    }
}

/// 一条命中记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    location: PathBuf,
    show_path: bool,
    excerpt_lines: Vec<String>,
}

impl MatchRecord {
    pub fn new(location: PathBuf, excerpt_lines: Vec<String>, show_path: bool) -> Self {
        Self {
            location,
            show_path,
            excerpt_lines,
        }
    }

    /// 对外展示的路径；未要求显示路径时为空
    pub fn path(&self) -> &Path {
        if self.show_path {
            &self.location
        } else {
            Path::new("")
        }
    }

    /// 文件的实际路径，供打开和查看使用
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// 用 "; " 连接摘要行并以换行结尾
    pub fn excerpt(&self) -> String {
        join_excerpt(&self.excerpt_lines)
    }
}

pub fn join_excerpt(lines: &[String]) -> String {
    let mut excerpt = lines.join("; ");
    excerpt.push('\n');
    excerpt
}

/// 检查文件扩展名是否受支持
///
/// 扩展名取文件名中最后一个点号及其后的部分，例如 `notes.md` 为 `.md`。
/// 以点号开头的文件名（如 `.md`）整体视为扩展名。
pub fn is_supported_extension(path: &Path) -> bool {
    // 按字节比较，文件名不是合法 UTF-8 时也能识别扩展名
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();

    match name.rfind_byte(b'.') {
        Some(idx) => SUPPORTED_EXTENSIONS
            .iter()
            .any(|ext| &name[idx..] == ext.as_bytes()),
        None => false,
    }
}

/// 检查路径是否被排除（路径中任意位置出现 ".git" 即排除）
pub fn is_excluded(path: &Path) -> bool {
    path.to_string_lossy().contains(".git")
}

/// 读取文件的前两行
///
/// 行数不足时返回已有的行；空文件返回空列表。只有底层 I/O 错误才会失败。
pub fn read_excerpt_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::with_capacity(EXCERPT_LINES);
    let mut buf = Vec::new();

    while lines.len() < EXCERPT_LINES {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        lines.push(line.to_str_lossy().into_owned());
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_text_pattern_case_insensitive() {
        let pattern = SearchPattern::from_input("HeLLo", false).unwrap();
        assert!(pattern.matches("hello world; second line\n"));
        assert!(pattern.matches("Say HELLO\n"));
        assert!(!pattern.matches("goodbye; foo\n"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let pattern = SearchPattern::from_input("", false).unwrap();
        assert!(pattern.matches("anything\n"));
        assert!(pattern.matches("\n"));
    }

    #[test]
    fn test_regex_pattern() {
        let pattern = SearchPattern::from_input("h.l+o", true).unwrap();
        assert!(pattern.matches("Hello world\n"));
        assert!(!pattern.matches("goodbye\n"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(SearchPattern::from_input("(unclosed", true).is_err());
    }

    #[test]
    fn test_excerpt_format() {
        let two = MatchRecord::new(
            PathBuf::from("a.md"),
            vec!["Hello world".to_string(), "second line".to_string()],
            false,
        );
        assert_eq!(two.excerpt(), "Hello world; second line\n");

        let one = MatchRecord::new(PathBuf::from("a.md"), vec!["only".to_string()], false);
        assert_eq!(one.excerpt(), "only\n");

        let none = MatchRecord::new(PathBuf::from("a.md"), vec![], false);
        assert_eq!(none.excerpt(), "\n");
    }

    #[test]
    fn test_path_visibility() {
        let hidden = MatchRecord::new(PathBuf::from("/notes/a.md"), vec![], false);
        assert_eq!(hidden.path(), Path::new(""));
        assert_eq!(hidden.location(), Path::new("/notes/a.md"));

        let shown = MatchRecord::new(PathBuf::from("/notes/a.md"), vec![], true);
        assert_eq!(shown.path(), Path::new("/notes/a.md"));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension(Path::new("notes/a.md")));
        assert!(is_supported_extension(Path::new("b.txt")));
        assert!(is_supported_extension(Path::new("c.org")));
        assert!(is_supported_extension(Path::new("archive.tar.md")));
        assert!(is_supported_extension(Path::new(".md")));
        assert!(!is_supported_extension(Path::new("c.png")));
        assert!(!is_supported_extension(Path::new("README.MD")));
        assert!(!is_supported_extension(Path::new("md")));
        assert!(!is_supported_extension(Path::new("notes.md.bak")));
    }

    #[cfg(unix)]
    #[test]
    fn test_supported_extension_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        assert!(is_supported_extension(Path::new(OsStr::from_bytes(b"caf\xe9.md"))));
        assert!(is_supported_extension(Path::new(OsStr::from_bytes(b"notes/\xff\xfe.org"))));
        assert!(!is_supported_extension(Path::new(OsStr::from_bytes(b"caf\xe9.png"))));
    }

    #[test]
    fn test_git_exclusion_is_substring() {
        assert!(is_excluded(Path::new("notes/.git/config.md")));
        assert!(is_excluded(Path::new("notes/.github/issue.md")));
        assert!(is_excluded(Path::new("notes/my.gitnotes.md")));
        assert!(!is_excluded(Path::new("notes/mygitfile.md")));
    }

    #[test]
    fn test_read_excerpt_lines() {
        let dir = tempdir().unwrap();

        let many = dir.path().join("many.md");
        fs::write(&many, "first\r\nsecond\nthird\n").unwrap();
        assert_eq!(read_excerpt_lines(&many).unwrap(), vec!["first", "second"]);

        let single = dir.path().join("single.md");
        fs::write(&single, "no newline").unwrap();
        assert_eq!(read_excerpt_lines(&single).unwrap(), vec!["no newline"]);

        let blank_second = dir.path().join("blank.md");
        fs::write(&blank_second, "first\n\nthird").unwrap();
        assert_eq!(read_excerpt_lines(&blank_second).unwrap(), vec!["first", ""]);

        let empty = dir.path().join("empty.md");
        fs::write(&empty, "").unwrap();
        assert!(read_excerpt_lines(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_read_excerpt_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9\nok\n").unwrap();

        let lines = read_excerpt_lines(&path).unwrap();
        assert_eq!(lines[0], "caf\u{FFFD}");
        assert_eq!(lines[1], "ok");
    }

    #[test]
    fn test_read_excerpt_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_excerpt_lines(&dir.path().join("gone.md")).is_err());
    }
}
