/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、FFI層が利用する。

use crate::domain::{DominantColor, DomainResult, FrameView, HsvBounds};

/// 処理ポート: 画像処理（色レンジ検知）を抽象化
pub trait ProcessPort: Send + Sync {
    /// HSVレンジ内ピクセルの外部輪郭数を数える
    ///
    /// BGR画像をHSVに変換し、包含レンジでマスクを生成して
    /// 外部（最外周）輪郭のみを抽出する。入れ子の輪郭は数えない。
    ///
    /// # Arguments
    /// - `frame`: 処理対象のフレーム（BGR形式、検証済みを想定）
    /// - `bounds`: HSVの包含レンジ
    ///
    /// # Returns
    /// - `Ok(count)`: 外部輪郭数（常に >= 0）
    /// - `Err(DomainError)`: 処理エラー
    fn count_contours(&self, frame: &FrameView<'_>, bounds: &HsvBounds) -> DomainResult<u32>;

    /// k-meansによる支配色検出
    ///
    /// HSV空間の全ピクセルをk個にクラスタリングし、クラスタ中心を
    /// 所属ピクセル数の降順で返す。
    ///
    /// # Arguments
    /// - `frame`: 処理対象のフレーム（BGR形式、検証済みを想定）
    /// - `clusters`: クラスタ数k（1以上、ピクセル数以下）
    ///
    /// # Returns
    /// - `Ok(colors)`: 支配色リスト（長さk、weight降順）
    /// - `Err(DomainError)`: 処理エラー
    fn dominant_colors(
        &self,
        frame: &FrameView<'_>,
        clusters: usize,
    ) -> DomainResult<Vec<DominantColor>>;
}
