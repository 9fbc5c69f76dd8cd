//! ONNX backend for YOLOv8-style bloom detectors, built on `tract`.

use super::{
    frame::Frame,
    postprocess::{self, HeadOutput},
    BloomModel, ModelLoader,
};
use crate::error::AquaforgeError;
use aquaforge_schemas::{bloom::BoundingBox, settings::ModelSettings};
use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;
use tracing::debug;

type Plan = TypedRunnableModel<TypedModel>;

#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ModelLoader for OnnxLoader {
    type Model = OnnxBloomModel;

    fn load(&self, settings: &ModelSettings) -> Result<OnnxBloomModel, AquaforgeError> {
        let plan = build_plan(settings)
            .map_err(|e| AquaforgeError::ModelLoad(settings.path.clone(), e.to_string()))?;
        Ok(OnnxBloomModel { plan, settings: settings.clone() })
    }
}

fn build_plan(settings: &ModelSettings) -> TractResult<Plan> {
    let side = settings.input_size as usize;
    tract_onnx::onnx()
        .model_for_path(&settings.path)?
        .with_input_fact(0, f32::fact([1, 3, side, side]).into())?
        .into_optimized()?
        .into_runnable()
}

pub struct OnnxBloomModel {
    plan: Plan,
    settings: ModelSettings,
}

impl OnnxBloomModel {
    fn run(&self, frame: &Frame) -> TractResult<Vec<BoundingBox>> {
        let side = self.settings.input_size;
        // Channels go to the network in whatever order the frame is already in.
        let resized = imageops::resize(frame.pixels(), side, side, FilterType::Triangle);
        let input: Tensor = tract_ndarray::Array4::from_shape_fn(
            (1, 3, side as usize, side as usize),
            |(_, c, y, x)| resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        )
        .into();

        let outputs = self.plan.run(tvec!(input.into()))?;
        let view = outputs[0].to_array_view::<f32>()?;
        let shape = view.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 {
            anyhow::bail!("unexpected detector output shape {:?}", shape);
        }
        let (channels, anchors) = (shape[1], shape[2]);
        debug!(channels, anchors, "decoding detector output");

        let data: Vec<f32> = view.iter().copied().collect();
        let head = HeadOutput::new(&data, channels, anchors)
            .ok_or_else(|| anyhow::anyhow!("detector output has no class scores ({:?})", shape))?;

        let scale = (
            frame.width() as f32 / side as f32,
            frame.height() as f32 / side as f32,
        );
        Ok(postprocess::decode(head, &self.settings, scale))
    }
}

impl BloomModel for OnnxBloomModel {
    fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>, AquaforgeError> {
        self.run(frame).map_err(|e| AquaforgeError::Inference(e.to_string()))
    }
}
