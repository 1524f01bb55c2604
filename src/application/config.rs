use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 笔记目录配置
    pub notes: NotesConfig,
    /// 编辑器配置
    pub editor: EditorConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// 默认搜索的笔记根目录
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// 打开笔记使用的编辑器命令，可带参数
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 结果中是否显示文件路径
    pub show_path: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// 调试日志写入的目录
    pub directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes: NotesConfig {
                directory: PathBuf::from("."),
            },
            editor: EditorConfig {
                command: default_editor(),
            },
            display: DisplayConfig { show_path: false },
            logging: LoggingConfig {
                enabled: false,
                directory: PathBuf::from("."),
            },
        }
    }
}

/// $EDITOR 优先，否则使用 vi
fn default_editor() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径（程序所在目录下的 config.toml）
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;

        let exe_dir = exe_path.parent().context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.notes.directory.as_os_str().is_empty() {
            anyhow::bail!("notes.directory 不能为空");
        }

        if self.editor.command.trim().is_empty() {
            anyhow::bail!("editor.command 不能为空");
        }

        if self.logging.directory.as_os_str().is_empty() {
            anyhow::bail!("logging.directory 不能为空");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.notes.directory, PathBuf::from("."));
        assert!(!config.editor.command.is_empty());
        assert!(!config.display.show_path);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.notes.directory, deserialized.notes.directory);
        assert_eq!(config.editor.command, deserialized.editor.command);
    }

    #[test]
    fn test_parse_hand_written_config() {
        let content = r#"
            [notes]
            directory = "/home/me/zettel"

            [editor]
            command = "code --wait"

            [display]
            show_path = true

            [logging]
            enabled = true
            directory = "/tmp"
        "#;
        let config: Config = toml::from_str(content).unwrap();

        assert_eq!(config.notes.directory, PathBuf::from("/home/me/zettel"));
        assert_eq!(config.editor.command, "code --wait");
        assert!(config.display.show_path);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(created.editor.command, loaded.editor.command);
        assert_eq!(created.notes.directory, loaded.notes.directory);
    }

    #[test]
    fn test_invalid_file_reports_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[notes]\ndirectory = 42\n").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.editor.command = "  ".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.notes.directory = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
