//! Binary field frame for streaming viewers
//!
//! Layout (little-endian):
//! - magic `FIELD\0\0\0`
//! - dataset count (u32)
//! - per dataset: kind (u8), rgb (3 × u8), sample count (u32),
//!   positions (3 × f32 per sample), vectors (3 × f32 per sample),
//!   magnitudes (f32 per sample)

use crate::pipeline::Visualization;

pub const FRAME_MAGIC: &[u8; 8] = b"FIELD\0\0\0";

impl Visualization {
    pub fn to_binary(&self) -> Vec<u8> {
        let samples = self.len();
        let mut data = Vec::with_capacity(12 + self.datasets.len() * 8 + samples * 28);

        data.extend_from_slice(FRAME_MAGIC);
        data.extend_from_slice(&(self.datasets.len() as u32).to_le_bytes());

        for dataset in &self.datasets {
            data.push(dataset.kind.id());
            data.extend_from_slice(&dataset.kind.rgb());
            data.extend_from_slice(&(dataset.len() as u32).to_le_bytes());

            for sample in dataset.samples() {
                for v in sample.position.iter() {
                    data.extend_from_slice(&(*v as f32).to_le_bytes());
                }
            }
            for sample in dataset.samples() {
                for v in sample.vector.iter() {
                    data.extend_from_slice(&(*v as f32).to_le_bytes());
                }
            }
            for sample in dataset.samples() {
                data.extend_from_slice(&(sample.vector.norm() as f32).to_le_bytes());
            }
        }

        data
    }
}
