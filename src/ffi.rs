//! C ABIエクスポート
//!
//! ホストアプリケーションが動的ライブラリとしてロードし、シンボル名で
//! バインドするフラットなC関数群。シグネチャはオリジナルのプラグインと
//! バイナリ互換（`DetectColors` / `DetectDominantColors`）。
//!
//! # 安全性
//! - 呼び出し側がバッファの所有権とライフタイムを保証する。関数は
//!   呼び出し中のみバッファを借用し、返却後に参照を保持しない。
//! - nullポインタと非正の寸法は常に拒否される（スライス構築不能のため）。
//!   その他の検証は `process.validate_inputs` 設定で無効化できる。
//! - パニックはC境界を越えない（捕捉してログ出力、出力値は0のまま）。

use std::ffi::{c_float, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::domain::{DominantColor, FrameView, HsvBounds, PluginConfig, ProcessPort};
use crate::infrastructure::color_process::ColorProcessAdapter;
use crate::measure_span;

/// プラグイン全体の設定（最初のエクスポート呼び出しで一度だけ読み込む）
fn plugin_config() -> &'static PluginConfig {
    static CONFIG: OnceLock<PluginConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let config = PluginConfig::load();
        // WorkerGuardはDLLアンロードまで生存させる必要がある
        let guard = crate::logging::init_logging(&config.log);
        std::mem::forget(guard);
        tracing::info!(
            "color-detection plugin initialized: validate_inputs={}, kmeans_attempts={}",
            config.process.validate_inputs,
            config.process.kmeans_attempts
        );
        config
    })
}

/// 生ポインタ引数からフレームビューを構築
///
/// nullポインタ・非正の寸法はNone。バッファ長は呼び出し側保証の
/// `width * height * channels` として解釈する。
///
/// # Safety
/// `input`が有効な`width * height * channels`バイトを指していること。
unsafe fn frame_from_raw<'a>(
    input: *const u8,
    width: c_int,
    height: c_int,
    channels: c_int,
) -> Option<FrameView<'a>> {
    if input.is_null() || width <= 0 || height <= 0 || channels <= 0 {
        return None;
    }

    let len = width as usize * height as usize * channels as usize;
    let data = std::slice::from_raw_parts(input, len);
    Some(FrameView::new(
        data,
        width as u32,
        height as u32,
        channels as u32,
    ))
}

/// 生ポインタ引数からHSVレンジを構築（各3要素のfloat配列）
///
/// # Safety
/// `lower` / `upper` が有効な3要素のfloat配列を指していること。
unsafe fn bounds_from_raw(lower: *const c_float, upper: *const c_float) -> Option<HsvBounds> {
    if lower.is_null() || upper.is_null() {
        return None;
    }

    let lower = std::slice::from_raw_parts(lower, 3);
    let upper = std::slice::from_raw_parts(upper, 3);
    Some(HsvBounds::new(
        [lower[0], lower[1], lower[2]],
        [upper[0], upper[1], upper[2]],
    ))
}

/// u32の輪郭数をC出力用のi32に変換（飽和）
fn count_to_c_int(count: u32) -> c_int {
    count.min(i32::MAX as u32) as c_int
}

/// 輪郭検知の共通処理（ポート実装に依存しない）
///
/// エラーとパニックはここで吸収され、出力は常に0以上になる。
fn run_count_contours<P: ProcessPort>(
    port: &P,
    frame: &FrameView<'_>,
    bounds: &HsvBounds,
) -> c_int {
    let result = catch_unwind(AssertUnwindSafe(|| port.count_contours(frame, bounds)));
    match result {
        Ok(Ok(n)) => count_to_c_int(n),
        Ok(Err(e)) => {
            tracing::error!("Contour counting failed: {}", e);
            0
        }
        Err(_) => {
            tracing::error!("Contour counting: panic caught at FFI boundary");
            0
        }
    }
}

/// 支配色検出の共通処理（ポート実装に依存しない）
///
/// エラーとパニックはここで吸収され、Noneを返す。
fn run_dominant_colors<P: ProcessPort>(
    port: &P,
    frame: &FrameView<'_>,
    clusters: usize,
) -> Option<Vec<DominantColor>> {
    let result = catch_unwind(AssertUnwindSafe(|| port.dominant_colors(frame, clusters)));
    match result {
        Ok(Ok(colors)) => Some(colors),
        Ok(Err(e)) => {
            tracing::error!("Dominant color detection failed: {}", e);
            None
        }
        Err(_) => {
            tracing::error!("Dominant color detection: panic caught at FFI boundary");
            None
        }
    }
}

/// HSV色レンジ輪郭検知
///
/// BGR画像をHSVに変換し、包含レンジ `[lowerHSV, upperHSV]` の2値化マスクから
/// 外部輪郭数を `numContours` に書き込む。成功時の出力は常に0以上。
/// 入力が拒否された場合やエラー時は0を書き込む（nullの場合は書き込まない）。
///
/// # Safety
/// - `input` は `width * height * channels` バイトの有効なバッファ
/// - `lower_hsv` / `upper_hsv` は各3要素の有効なfloat配列
/// - `num_contours` は有効な書き込み先（またはnull）
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn DetectColors(
    input: *const u8,
    width: c_int,
    height: c_int,
    channels: c_int,
    lower_hsv: *const c_float,
    upper_hsv: *const c_float,
    num_contours: *mut c_int,
) {
    if num_contours.is_null() {
        tracing::error!("DetectColors: null output pointer");
        return;
    }
    // どのパスでも出力値が未定義にならないよう先に0を書く
    *num_contours = 0;

    let config = plugin_config();

    let Some(frame) = frame_from_raw(input, width, height, channels) else {
        tracing::error!(
            "DetectColors rejected: null buffer or non-positive layout ({}x{}x{})",
            width,
            height,
            channels
        );
        return;
    };
    let Some(bounds) = bounds_from_raw(lower_hsv, upper_hsv) else {
        tracing::error!("DetectColors rejected: null HSV bounds");
        return;
    };

    if config.process.validate_inputs {
        if let Err(e) = frame.validate().and_then(|_| bounds.validate()) {
            tracing::error!("DetectColors rejected: {}", e);
            return;
        }
    }

    let mut count: c_int = 0;
    measure_span!("DetectColors", {
        let adapter = ColorProcessAdapter::from_config(&config.process);
        count = run_count_contours(&adapter, &frame, &bounds);
    });

    *num_contours = count;
}

/// k-means支配色検出
///
/// BGR画像をHSVに変換し、全ピクセルを`num_colors`個にクラスタリングして
/// クラスタ中心（HSV、所属ピクセル数の降順）を `out_colors` に
/// `num_colors * 3` 個のfloatとして書き込む。実際に書き込んだ色数を
/// `out_count` に書き込む。エラー時は0。
///
/// # Safety
/// - `input` は `width * height * channels` バイトの有効なバッファ
/// - `out_colors` は `num_colors * 3` 要素の有効なfloatバッファ
/// - `out_count` は有効な書き込み先（またはnull）
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn DetectDominantColors(
    input: *const u8,
    width: c_int,
    height: c_int,
    channels: c_int,
    num_colors: c_int,
    out_colors: *mut c_float,
    out_count: *mut c_int,
) {
    if out_count.is_null() {
        tracing::error!("DetectDominantColors: null output pointer");
        return;
    }
    *out_count = 0;

    let config = plugin_config();

    if out_colors.is_null() || num_colors <= 0 {
        tracing::error!(
            "DetectDominantColors rejected: null color buffer or non-positive k ({})",
            num_colors
        );
        return;
    }
    let Some(frame) = frame_from_raw(input, width, height, channels) else {
        tracing::error!(
            "DetectDominantColors rejected: null buffer or non-positive layout ({}x{}x{})",
            width,
            height,
            channels
        );
        return;
    };

    if config.process.validate_inputs {
        if let Err(e) = frame.validate() {
            tracing::error!("DetectDominantColors rejected: {}", e);
            return;
        }
    }

    let clusters = num_colors as usize;
    let mut colors: Option<Vec<DominantColor>> = None;
    measure_span!("DetectDominantColors", {
        let adapter = ColorProcessAdapter::from_config(&config.process);
        colors = run_dominant_colors(&adapter, &frame, clusters);
    });

    if let Some(colors) = colors {
        let out = std::slice::from_raw_parts_mut(out_colors, clusters * 3);
        for (i, color) in colors.iter().enumerate() {
            out[i * 3] = color.hsv[0];
            out[i * 3 + 1] = color.hsv[1];
            out[i * 3 + 2] = color.hsv[2];
        }
        *out_count = count_to_c_int(colors.len() as u32);
    }
}
