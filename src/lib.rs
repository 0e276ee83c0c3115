//! color-detection - HSV色レンジ輪郭検知プラグイン
//!
//! ホストアプリケーション（ゲームエンジン等）からC ABI経由で呼び出される
//! ネイティブプラグイン。BGR画像バッファをHSVに変換し、指定レンジの
//! 2値化マスクから外部輪郭数を数える。
//!
//! エクスポート関数は[`ffi`]モジュールを参照。Rustホスト向けには
//! [`domain`]の型と[`infrastructure::color_process::ColorProcessAdapter`]が
//! 検証付きの安全なAPIとして公開されている。

pub mod domain;
pub mod ffi;
pub mod infrastructure;
pub mod logging;
