/// モック画像処理アダプタ
///
/// テスト・開発用の画像処理モック実装。
/// OpenCVに依存せず、固定の結果を返す。

use crate::domain::{DominantColor, DomainResult, FrameView, HsvBounds, ProcessPort};

/// モック画像処理アダプタ
pub struct MockProcessAdapter {
    contour_count: u32,
}

impl MockProcessAdapter {
    /// 新しいモック処理アダプタを作成
    ///
    /// # Arguments
    /// - `contour_count`: count_contoursが常に返す輪郭数
    pub fn new(contour_count: u32) -> Self {
        Self { contour_count }
    }
}

impl Default for MockProcessAdapter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ProcessPort for MockProcessAdapter {
    fn count_contours(&self, _frame: &FrameView<'_>, _bounds: &HsvBounds) -> DomainResult<u32> {
        Ok(self.contour_count)
    }

    fn dominant_colors(
        &self,
        frame: &FrameView<'_>,
        clusters: usize,
    ) -> DomainResult<Vec<DominantColor>> {
        // モック実装: 均等な重みのグレー系クラスタを返す
        let weight = 1.0 / clusters.max(1) as f32;
        let _ = frame;
        Ok((0..clusters)
            .map(|i| DominantColor {
                hsv: [0.0, 0.0, i as f32],
                weight,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_contour_count() {
        let adapter = MockProcessAdapter::new(3);
        let data = vec![0u8; 4 * 4 * 3];
        let frame = FrameView::new(&data, 4, 4, 3);
        let bounds = HsvBounds::new([0.0; 3], [255.0; 3]);

        assert_eq!(adapter.count_contours(&frame, &bounds).unwrap(), 3);
    }

    #[test]
    fn test_mock_as_trait_object() {
        // ProcessPortをtraitオブジェクトとして扱えることを確認
        let adapter: Box<dyn ProcessPort> = Box::new(MockProcessAdapter::default());
        let data = vec![0u8; 2 * 2 * 3];
        let frame = FrameView::new(&data, 2, 2, 3);

        let colors = adapter.dominant_colors(&frame, 2).unwrap();
        assert_eq!(colors.len(), 2);
        assert!((colors[0].weight - 0.5).abs() < f32::EPSILON);
    }
}
