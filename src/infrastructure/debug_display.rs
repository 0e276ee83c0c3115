/// デバッグ表示モジュール
///
/// OpenCVを使用した視覚的デバッグ機能。
/// `opencv-debug-display` featureが有効な場合のみコンパイルされます。
///
/// HSVレンジの調整用に、入力画像と2値化マスクをウィンドウ表示する。
/// Release運用ビルドでは完全に除外される。

use crate::domain::{DomainError, DomainResult, HsvBounds};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui,
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::MatTraitConst,
};

/// デバッグ用：入力画像と2値化マスクを表示
///
/// # Arguments
/// - `bgr`: BGR形式の元画像
/// - `mask`: 2値化マスク画像
/// - `bounds`: 現在のHSV検出レンジ（ウィンドウに描画）
///
/// # 操作方法
/// - 任意のキー入力または約30ms経過で次のフレームへ
pub(crate) fn display_mask(bgr: &Mat, mask: &Mat, bounds: &HsvBounds) -> DomainResult<()> {
    let _ = highgui::named_window("Debug: BGR Input", highgui::WINDOW_AUTOSIZE);
    let _ = highgui::named_window("Debug: Mask", highgui::WINDOW_AUTOSIZE);

    let mut annotated = bgr
        .try_clone()
        .map_err(|e| DomainError::Process(format!("Failed to clone image: {:?}", e)))?;

    let text = format!(
        "H[{:.0}-{:.0}] S[{:.0}-{:.0}] V[{:.0}-{:.0}]",
        bounds.lower[0],
        bounds.upper[0],
        bounds.lower[1],
        bounds.upper[1],
        bounds.lower[2],
        bounds.upper[2]
    );
    imgproc::put_text(
        &mut annotated,
        &text,
        Point::new(10, 20),
        FONT_HERSHEY_SIMPLEX,
        0.5,
        Scalar::new(0.0, 255.0, 0.0, 0.0),
        1,
        LINE_8,
        false,
    )
    .map_err(|e| DomainError::Process(format!("Failed to draw text: {:?}", e)))?;

    highgui::imshow("Debug: BGR Input", &annotated)
        .map_err(|e| DomainError::Process(format!("Failed to show BGR image: {:?}", e)))?;
    highgui::imshow("Debug: Mask", mask)
        .map_err(|e| DomainError::Process(format!("Failed to show Mask image: {:?}", e)))?;

    const DEBUG_DISPLAY_WAIT_MS: i32 = 30;
    highgui::wait_key(DEBUG_DISPLAY_WAIT_MS)
        .map_err(|e| DomainError::Process(format!("Failed to wait for key: {:?}", e)))?;

    Ok(())
}
