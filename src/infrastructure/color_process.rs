/// 色検知処理アダプタ
///
/// OpenCVを使用したHSV色空間での色レンジ検知実装。
/// BGR→HSV変換、包含レンジの2値化マスク、外部輪郭抽出、
/// およびk-meansによる支配色検出を提供する。

use crate::domain::{
    DominantColor, DomainError, DomainResult, FrameView, HsvBounds, ProcessPort, ProcessConfig,
};
use crate::logging::SpanTimer;
use opencv::{
    core::{self, Mat, Point, Scalar, TermCriteria, TermCriteria_Type, Vector},
    imgproc,
    prelude::*,
};

/// 色検知処理アダプタ
///
/// 呼び出し間で状態を保持しない。Matは呼び出しごとに構築され、
/// フレームバッファへの参照は返却時に破棄される。
pub struct ColorProcessAdapter {
    kmeans_attempts: i32,
}

impl ColorProcessAdapter {
    /// 新しい色検知処理アダプタを作成
    ///
    /// # Arguments
    /// - `kmeans_attempts`: k-meansの試行回数（sklearnのn_init相当）
    pub fn new(kmeans_attempts: u32) -> Self {
        Self {
            kmeans_attempts: kmeans_attempts.max(1) as i32,
        }
    }

    /// 設定から作成
    pub fn from_config(config: &ProcessConfig) -> Self {
        Self::new(config.kmeans_attempts)
    }

    /// フレームデータをMatとして解釈（BGR 8UC3、ゼロコピー）
    ///
    /// 返されるMatは`frame.data`を借用しているため、frameより長生きさせないこと。
    /// 呼び出し側で即座に変換（cvt_color等）して所有Matに移すのが前提。
    fn frame_to_mat(&self, frame: &FrameView<'_>) -> DomainResult<Mat> {
        let rows = frame.height as i32;
        let cols = frame.width as i32;

        let bgr_mat = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                rows,
                cols,
                core::CV_8UC3, // BGR形式
                frame.data.as_ptr() as *mut std::ffi::c_void,
                core::Mat_AUTO_STEP,
            )
            .map_err(|e| DomainError::Process(format!("Failed to create Mat: {:?}", e)))?
        };

        Ok(bgr_mat)
    }

    /// BGR → HSV変換（所有Matを返す）
    fn to_hsv(&self, bgr: &Mat) -> DomainResult<Mat> {
        let mut hsv = Mat::default();
        imgproc::cvt_color(bgr, &mut hsv, imgproc::COLOR_BGR2HSV, 0)
            .map_err(|e| DomainError::Process(format!("Failed to convert BGR to HSV: {:?}", e)))?;
        Ok(hsv)
    }

    /// HSVレンジの2値化マスクを生成
    fn in_range_mask(&self, hsv: &Mat, bounds: &HsvBounds) -> DomainResult<Mat> {
        let lower = Scalar::new(
            bounds.lower[0] as f64,
            bounds.lower[1] as f64,
            bounds.lower[2] as f64,
            0.0,
        );
        let upper = Scalar::new(
            bounds.upper[0] as f64,
            bounds.upper[1] as f64,
            bounds.upper[2] as f64,
            0.0,
        );

        let mut mask = Mat::default();
        core::in_range(hsv, &lower, &upper, &mut mask)
            .map_err(|e| DomainError::Process(format!("Failed to create mask: {:?}", e)))?;

        Ok(mask)
    }

    /// マスクから外部輪郭を抽出して数える
    ///
    /// RETR_EXTERNAL: 最外周の輪郭のみ（入れ子は数えない）
    /// CHAIN_APPROX_SIMPLE: 共線点を圧縮した単純チェーン近似
    fn count_external_contours(&self, mask: &Mat) -> DomainResult<u32> {
        let mut contours: Vector<Vector<Point>> = Vector::new();
        imgproc::find_contours(
            mask,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_SIMPLE,
            Point::default(),
        )
        .map_err(|e| DomainError::Process(format!("Failed to find contours: {:?}", e)))?;

        Ok(contours.len() as u32)
    }

    /// HSVピクセル列をk-means入力用のfloatサンプル行列に変換（N行3列、CV_32F）
    fn hsv_samples(&self, hsv: &Mat, pixel_count: usize) -> DomainResult<(Mat, Vec<f32>)> {
        let bytes = hsv
            .data_bytes()
            .map_err(|e| DomainError::Process(format!("Failed to read HSV data: {:?}", e)))?;

        let flat: Vec<f32> = bytes.iter().map(|&b| b as f32).collect();

        let samples = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                pixel_count as i32,
                3,
                core::CV_32F,
                flat.as_ptr() as *mut std::ffi::c_void,
                core::Mat_AUTO_STEP,
            )
            .map_err(|e| DomainError::Process(format!("Failed to create samples Mat: {:?}", e)))?
        };

        // flatはsamplesが借用しているため、呼び出し側で生存を維持する
        Ok((samples, flat))
    }
}

impl ProcessPort for ColorProcessAdapter {
    fn count_contours(&self, frame: &FrameView<'_>, bounds: &HsvBounds) -> DomainResult<u32> {
        let _timer = SpanTimer::new("count_contours");

        let bgr = self.frame_to_mat(frame)?;
        let hsv = self.to_hsv(&bgr)?;
        let mask = self.in_range_mask(&hsv, bounds)?;

        #[cfg(feature = "opencv-debug-display")]
        crate::infrastructure::debug_display::display_mask(&bgr, &mask, bounds)?;

        self.count_external_contours(&mask)
    }

    fn dominant_colors(
        &self,
        frame: &FrameView<'_>,
        clusters: usize,
    ) -> DomainResult<Vec<DominantColor>> {
        let _timer = SpanTimer::new("dominant_colors");

        let pixel_count = frame.pixel_count();
        if clusters == 0 {
            return Err(DomainError::InvalidInput(
                "Cluster count must be greater than 0".to_string(),
            ));
        }
        if clusters > pixel_count {
            return Err(DomainError::InvalidInput(format!(
                "Cluster count {} exceeds pixel count {}",
                clusters, pixel_count
            )));
        }

        let bgr = self.frame_to_mat(frame)?;
        let hsv = self.to_hsv(&bgr)?;
        let (samples, _flat) = self.hsv_samples(&hsv, pixel_count)?;

        let criteria = TermCriteria::new(
            TermCriteria_Type::COUNT as i32 + TermCriteria_Type::EPS as i32,
            10,
            1.0,
        )
        .map_err(|e| DomainError::Process(format!("Failed to create TermCriteria: {:?}", e)))?;

        let k = clusters as i32;
        let mut labels = Mat::default();
        let mut centers = Mat::default();
        core::kmeans(
            &samples,
            k,
            &mut labels,
            criteria,
            self.kmeans_attempts,
            core::KMEANS_PP_CENTERS,
            &mut centers,
        )
        .map_err(|e| DomainError::Process(format!("Failed to run kmeans: {:?}", e)))?;

        // クラスタごとの所属ピクセル数を集計
        let mut counts = vec![0usize; clusters];
        for i in 0..pixel_count {
            let label = *labels
                .at::<i32>(i as i32)
                .map_err(|e| DomainError::Process(format!("Failed to read label: {:?}", e)))?;
            if let Some(count) = counts.get_mut(label as usize) {
                *count += 1;
            }
        }

        let mut colors = Vec::with_capacity(clusters);
        for (label, &count) in counts.iter().enumerate() {
            let mut center = [0.0f32; 3];
            for (ch, value) in center.iter_mut().enumerate() {
                *value = *centers
                    .at_2d::<f32>(label as i32, ch as i32)
                    .map_err(|e| {
                        DomainError::Process(format!("Failed to read cluster center: {:?}", e))
                    })?;
            }
            colors.push(DominantColor {
                hsv: center,
                weight: count as f32 / pixel_count as f32,
            });
        }

        // 所属ピクセル数の降順（支配的な色が先頭）
        colors.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));

        Ok(colors)
    }
}
