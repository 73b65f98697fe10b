use crate::{
    color::filter::ColorAdjustment,
    encode::ExportSpec,
    geometry::crop::CropRegion,
    render::overlay::{TextLayer, WatermarkLayer},
};

/// Frozen parameters for one export. Decoded pixels are shared through `Arc`s, so snapshots are
/// cheap to clone and can be sent to worker threads.
#[derive(Clone, Debug, Default)]
pub struct EditSnapshot {
    pub crop: Option<CropRegion>,
    pub color: ColorAdjustment,
    /// `None` when the text content is empty.
    pub text: Option<TextLayer>,
    pub watermark: WatermarkLayer,
    pub export: ExportSpec,
}

impl EditSnapshot {
    /// Whether anything is drawn on top of the filtered base.
    pub fn has_overlays(&self) -> bool {
        let text = self.text.as_ref().is_some_and(TextLayer::is_visible);
        let watermark = match &self.watermark {
            WatermarkLayer::None => false,
            WatermarkLayer::Text { text, .. } => !text.is_empty(),
            WatermarkLayer::Image { .. } => true,
        };
        text || watermark
    }
}
