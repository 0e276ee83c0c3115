/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - C ABI境界では数値に潰される（outCountに0を書いてログ出力）ため、
///   ここでは人間が読める診断情報を保持する

use thiserror::Error;

/// Domain層の統一エラー型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 呼び出し側入力の検証エラー
    ///
    /// nullポインタ、非正の寸法、チャンネル数不一致、バッファ長不足、
    /// 上下逆のHSVレンジなど。
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 処理（画像処理）関連のエラー
    #[error("Process error: {0}")]
    Process(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;
