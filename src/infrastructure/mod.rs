//! Infrastructure層: 外部技術の統合
//!
//! Domain層のtraitを実装し、外部ライブラリ（OpenCV）と接続する。

pub mod color_process;
pub mod mock_process;

// デバッグ表示モジュール（opencv-debug-display feature有効時のみ）
#[cfg(feature = "opencv-debug-display")]
pub mod debug_display;
