//! レガシー互換モード（validate_inputs = false）の統合テスト
//!
//! `COLOR_DETECTION_CONFIG` で指定した設定ファイルから検証無効の設定を
//! 読み込み、デフォルトでは拒否される入力がパイプラインに到達することを
//! 確認する。
//!
//! 設定はプロセスごとに一度だけ読み込まれるため、このテストは専用の
//! テストバイナリとして分離し、環境変数の設定から最初のエクスポート
//! 呼び出しまでを単一のテスト関数で行う。

use std::ffi::c_int;
use std::io::Write;

use color_detection::domain::config::CONFIG_PATH_ENV;
use color_detection::ffi::DetectColors;

#[test]
fn test_legacy_mode_skips_non_memory_safety_checks() {
    // 検証無効の設定ファイルを用意し、最初の呼び出しの前に環境変数で指す
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [process]
        validate_inputs = false
        kmeans_attempts = 10
        "#
    )
    .unwrap();
    std::env::set_var(CONFIG_PATH_ENV, file.path());

    // チャンネル数4はデフォルト設定では拒否され0になるが、レガシーモードでは
    // オリジナルのC++プラグイン同様そのまま処理される: バッファは
    // 8bit 3チャンネルBGRとして解釈され、全黒画像 + レンジ(0,0,0)-(10,10,10)
    // → 画像全体を覆う1輪郭
    let data = vec![0u8; 4 * 4 * 4];
    let lower = [0.0f32, 0.0, 0.0];
    let upper = [10.0f32, 10.0, 10.0];
    let mut count: c_int = -1;

    unsafe {
        DetectColors(
            data.as_ptr(),
            4,
            4,
            4,
            lower.as_ptr(),
            upper.as_ptr(),
            &mut count,
        );
    }
    assert_eq!(count, 1, "channels=4 must reach the pipeline in legacy mode");

    // 上下逆のHSVレンジも拒否されずパイプラインに到達する（空マスク → 0輪郭）
    let data3 = vec![0u8; 4 * 4 * 3];
    let mut count: c_int = -1;
    unsafe {
        DetectColors(
            data3.as_ptr(),
            4,
            4,
            3,
            upper.as_ptr(), // lower > upper
            lower.as_ptr(),
            &mut count,
        );
    }
    assert_eq!(count, 0);

    // nullポインタと非正の寸法はレガシーモードでも常に拒否される
    let mut count: c_int = -1;
    unsafe {
        DetectColors(
            std::ptr::null(),
            4,
            4,
            3,
            lower.as_ptr(),
            upper.as_ptr(),
            &mut count,
        );
    }
    assert_eq!(count, 0);

    let mut count: c_int = -1;
    unsafe {
        DetectColors(
            data3.as_ptr(),
            0,
            4,
            3,
            lower.as_ptr(),
            upper.as_ptr(),
            &mut count,
        );
    }
    assert_eq!(count, 0);
}
