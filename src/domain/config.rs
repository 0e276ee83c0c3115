//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。
//!
//! プラグインは自前のエントリポイントを持たないため、設定ファイルは
//! 最初のエクスポート関数呼び出し時に一度だけ読み込まれる。
//! ファイルが存在しない場合はデフォルト値で動作する。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

/// 設定ファイルパスを上書きする環境変数
pub const CONFIG_PATH_ENV: &str = "COLOR_DETECTION_CONFIG";

/// デフォルトの設定ファイル名（カレントディレクトリ基準）
pub const DEFAULT_CONFIG_FILE: &str = "color_detection.toml";

/// プラグイン設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PluginConfig {
    /// ログ設定
    #[serde(default)]
    pub log: LogConfig,
    /// 画像処理設定
    #[serde(default)]
    pub process: ProcessConfig,
}

/// ログ設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogConfig {
    /// ログレベル（"info", "debug", "trace"等）
    ///
    /// デフォルト: "info"
    pub level: String,

    /// JSON形式で出力するか
    ///
    /// デフォルト: false
    pub json: bool,

    /// ログファイル出力先ディレクトリ（省略時は標準出力）
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

/// 処理設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessConfig {
    /// FFI入力の検証を有効にするか
    ///
    /// true: チャンネル数・バッファ長・HSVレンジ順序を検証し、不正入力は
    /// outCount = 0 で拒否する（デフォルト、推奨）。
    /// false: オリジナルのC++プラグイン同様に呼び出し側を信頼する。
    /// ただしnullポインタと非正の寸法は常に拒否される（Rustのスライス構築上
    /// 受け入れ不能なため）。
    pub validate_inputs: bool,

    /// k-meansの試行回数（sklearnのn_init相当）
    ///
    /// デフォルト: 10
    pub kmeans_attempts: u32,
}

impl ProcessConfig {
    /// デフォルトのk-means試行回数
    pub const DEFAULT_KMEANS_ATTEMPTS: u32 = 10;
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            validate_inputs: true,
            kmeans_attempts: Self::DEFAULT_KMEANS_ATTEMPTS,
        }
    }
}

impl PluginConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// 規定の探索順で設定を読み込む
    ///
    /// 1. 環境変数 `COLOR_DETECTION_CONFIG` が指すパス
    /// 2. カレントディレクトリの `color_detection.toml`
    /// 3. どちらも無ければデフォルト設定
    ///
    /// 読み込みに失敗した場合もデフォルト設定にフォールバックする
    /// （ホストプロセスを巻き込んで落とさないため）。
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!("Invalid config {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to load config {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        if self.process.kmeans_attempts == 0 {
            return Err(DomainError::Configuration(
                "kmeans_attempts must be greater than 0".to_string(),
            ));
        }
        if self.log.level.is_empty() {
            return Err(DomainError::Configuration(
                "log level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PluginConfig::default();
        assert!(config.process.validate_inputs);
        assert_eq!(config.process.kmeans_attempts, 10);
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
        assert!(config.log.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PluginConfig::default();
        assert!(config.validate().is_ok());

        config.process.kmeans_attempts = 0;
        assert!(config.validate().is_err());

        config.process.kmeans_attempts = 10;
        config.log.level = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [log]
            level = "debug"
            json = true

            [process]
            validate_inputs = false
            kmeans_attempts = 5
            "#
        )
        .unwrap();

        let config = PluginConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert!(!config.process.validate_inputs);
        assert_eq!(config.process.kmeans_attempts, 5);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [log]
            level = "trace"
            json = false
            "#
        )
        .unwrap();

        let config = PluginConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log.level, "trace");
        // [process]セクション省略時はデフォルト
        assert!(config.process.validate_inputs);
        assert_eq!(config.process.kmeans_attempts, 10);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = PluginConfig::from_file("does_not_exist.toml");
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_config_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml {{").unwrap();

        let result = PluginConfig::from_file(file.path());
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
