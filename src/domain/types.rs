/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// すべての処理で共有される不変の型。

use crate::domain::{DomainError, DomainResult};

/// 画像バッファのチャンネル数（BGR固定）
///
/// オリジナルのプラグイン契約に合わせてハードコード。
/// FFIシグネチャの`channels`引数はABI互換のために残っているが、
/// パイプラインは常に8bit 3チャンネルBGRとして解釈する。
pub const BGR_CHANNELS: u32 = 3;

/// 呼び出し側が所有する画像バッファへの借用ビュー
///
/// row-major・インターリーブのRGB系8bitサンプル列（BGR順を想定）。
/// 呼び出しの間だけ有効で、処理後に参照を保持してはならない。
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// 画像データ（width * height * channels バイト）
    pub data: &'a [u8],
    /// 画像の幅
    pub width: u32,
    /// 画像の高さ
    pub height: u32,
    /// チャンネル数（3を想定）
    pub channels: u32,
}

impl<'a> FrameView<'a> {
    /// 新しいフレームビューを作成
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: u32) -> Self {
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// レイアウトから期待されるバッファ長（バイト）
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// 総ピクセル数
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// レイアウトの妥当性を検証
    ///
    /// # Returns
    /// - `Ok(())`: 寸法が正、チャンネル数が3、バッファ長が十分
    /// - `Err(DomainError::InvalidInput)`: それ以外
    pub fn validate(&self) -> DomainResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DomainError::InvalidInput(format!(
                "Image dimensions must be positive: {}x{}",
                self.width, self.height
            )));
        }
        if self.channels != BGR_CHANNELS {
            return Err(DomainError::InvalidInput(format!(
                "Expected {} channels, got {}",
                BGR_CHANNELS, self.channels
            )));
        }
        if self.data.len() < self.expected_len() {
            return Err(DomainError::InvalidInput(format!(
                "Buffer too small: {} bytes for {}x{}x{} layout ({} required)",
                self.data.len(),
                self.width,
                self.height,
                self.channels,
                self.expected_len()
            )));
        }
        Ok(())
    }
}

/// HSV色空間の包含レンジ（OpenCV準拠: H[0-180], S[0-255], V[0-255]）
///
/// 各チャンネル独立の包含区間 [lower[i], upper[i]] でマスクを定義する。
/// オリジナルのC ABIに合わせて単精度浮動小数の3要素ペアを保持する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvBounds {
    pub lower: [f32; 3],
    pub upper: [f32; 3],
}

impl HsvBounds {
    /// 新しいHSVレンジを作成
    pub fn new(lower: [f32; 3], upper: [f32; 3]) -> Self {
        Self { lower, upper }
    }

    /// レンジの妥当性を検証（各チャンネルで lower <= upper）
    pub fn validate(&self) -> DomainResult<()> {
        for i in 0..3 {
            if self.lower[i] > self.upper[i] {
                return Err(DomainError::InvalidInput(format!(
                    "HSV bounds out of order on channel {}: {} > {}",
                    i, self.lower[i], self.upper[i]
                )));
            }
        }
        Ok(())
    }
}

/// k-meansで検出した支配色
///
/// `hsv`はOpenCVレンジのHSVクラスタ中心、`weight`はそのクラスタに
/// 属するピクセルの割合（0.0-1.0）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantColor {
    pub hsv: [f32; 3],
    pub weight: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_view_expected_len() {
        let data = vec![0u8; 4 * 4 * 3];
        let frame = FrameView::new(&data, 4, 4, 3);
        assert_eq!(frame.expected_len(), 48);
        assert_eq!(frame.pixel_count(), 16);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_frame_view_zero_dimensions() {
        let data = vec![0u8; 12];
        let frame = FrameView::new(&data, 0, 4, 3);
        assert!(matches!(
            frame.validate(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_frame_view_wrong_channels() {
        let data = vec![0u8; 4 * 4 * 4];
        let frame = FrameView::new(&data, 4, 4, 4);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn test_frame_view_short_buffer() {
        let data = vec![0u8; 10];
        let frame = FrameView::new(&data, 4, 4, 3);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn test_hsv_bounds_valid() {
        let bounds = HsvBounds::new([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        assert!(bounds.validate().is_ok());
    }

    #[test]
    fn test_hsv_bounds_equal_is_valid() {
        // 境界一致は包含（lower == upper のレンジは有効）
        let bounds = HsvBounds::new([30.0, 128.0, 128.0], [30.0, 128.0, 128.0]);
        assert!(bounds.validate().is_ok());
    }

    #[test]
    fn test_hsv_bounds_out_of_order() {
        let bounds = HsvBounds::new([50.0, 0.0, 0.0], [10.0, 255.0, 255.0]);
        assert!(matches!(
            bounds.validate(),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
