/* ------------------------------------------------------------------ */
/* Checkpoint save / load for the linear model's weight matrix        */
/* ------------------------------------------------------------------ */
//
// File format (little-endian):
//   [0..8]   magic       b"BGRM0001"
//   [8..12]  vocab_size  u32
//   [12..16] iterations  u32   (training steps taken)
//   [16..20] final_loss  f32
//   [20..]   weights     vocab_size² f32, row-major (row = prev code)

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{BigramError, Result};
use crate::model::{LinearModel, ModelState};

const MAGIC: &[u8; 8] = b"BGRM0001";
const HEADER_LEN: usize = 20;

/// A restored model plus the bookkeeping stored alongside it.
pub struct Checkpoint {
    pub model:      LinearModel,
    pub iterations: usize,
    pub final_loss: f32,
}

/// Serialize the model's weights to an in-memory buffer. No disk I/O.
pub fn serialize_checkpoint(model: &LinearModel, final_loss: f32) -> Vec<u8> {
    let iterations = match model.state() {
        ModelState::Trained { steps } => steps,
        ModelState::Training { step } => step,
        ModelState::Initialized { .. } => 0,
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + model.weights().len() * 4);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(model.size as u32).to_le_bytes());
    buf.extend_from_slice(&(iterations as u32).to_le_bytes());
    buf.extend_from_slice(&final_loss.to_le_bytes());
    for &w in model.weights() {
        buf.extend_from_slice(&w.to_le_bytes());
    }
    buf
}

/// Atomically flush a checkpoint buffer to disk (write to .tmp then rename).
pub fn flush_checkpoint(path: impl AsRef<Path>, buf: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut f = File::create(&tmp).map_err(|e| BigramError::io(&tmp, e))?;
        f.write_all(buf).map_err(|e| BigramError::io(&tmp, e))?;
        f.flush().map_err(|e| BigramError::io(&tmp, e))?;
    }
    std::fs::rename(&tmp, path).map_err(|e| BigramError::io(path, e))?;
    log::info!("saved checkpoint {} ({} bytes)", path.display(), buf.len());
    Ok(())
}

pub fn save_checkpoint(path: impl AsRef<Path>, model: &LinearModel, final_loss: f32) -> Result<()> {
    flush_checkpoint(path, &serialize_checkpoint(model, final_loss))
}

/// Load a checkpoint. When `expected_size` is given (the vocabulary the
/// weights will be used with), the stored size must match it.
pub fn load_checkpoint(path: impl AsRef<Path>, expected_size: Option<usize>) -> Result<Checkpoint> {
    let path = path.as_ref();
    let mut raw = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut raw))
        .map_err(|e| BigramError::io(path, e))?;

    let bad = |reason: String| BigramError::Checkpoint { path: path.to_path_buf(), reason };

    if raw.len() < HEADER_LEN {
        return Err(bad(format!("file is {} bytes, shorter than the header", raw.len())));
    }
    if &raw[..8] != MAGIC {
        return Err(bad("bad magic bytes".to_string()));
    }

    let u32_at = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
    let size       = u32_at(8) as usize;
    let iterations = u32_at(12) as usize;
    let final_loss = f32::from_bits(u32_at(16));

    if let Some(expected) = expected_size {
        if expected != size {
            return Err(BigramError::ShapeMismatch {
                what: "checkpoint vocab_size",
                expected,
                actual: size,
            });
        }
    }

    let body = &raw[HEADER_LEN..];
    let weight_bytes = size
        .checked_mul(size)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| bad(format!("vocab_size {} is too large", size)))?;
    if body.len() != weight_bytes {
        return Err(bad(format!(
            "expected {} weight bytes for vocab_size {}, found {}",
            weight_bytes, size, body.len()
        )));
    }
    let weights: Vec<f32> = body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let model = LinearModel::from_weights(size, weights, iterations)?;
    log::info!("loaded checkpoint {} (vocab {}, {} iterations)", path.display(), size, iterations);
    Ok(Checkpoint { model, iterations, final_loss })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_preserves_weights_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let model = LinearModel::new(6, 42);
        save_checkpoint(&path, &model, 2.5).unwrap();

        let ckpt = load_checkpoint(&path, Some(6)).unwrap();
        assert_eq!(ckpt.model.weights(), model.weights());
        assert_eq!(ckpt.model.size, 6);
        assert_eq!(ckpt.final_loss, 2.5);
        assert_eq!(ckpt.iterations, 0);
        assert!(!dir.path().join("model.bin.tmp").exists());
    }

    #[test]
    fn header_layout_is_stable() {
        let model = LinearModel::from_weights(2, vec![1.0, 2.0, 3.0, 4.0], 7).unwrap();
        let buf = serialize_checkpoint(&model, 0.5);
        assert_eq!(&buf[..8], b"BGRM0001");
        assert_eq!(&buf[8..12], &2u32.to_le_bytes());
        assert_eq!(&buf[12..16], &7u32.to_le_bytes());
        assert_eq!(&buf[16..20], &0.5f32.to_le_bytes());
        assert_eq!(&buf[20..24], &1.0f32.to_le_bytes());
        assert_eq!(buf.len(), 20 + 16);
    }

    #[test]
    fn vocab_size_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save_checkpoint(&path, &LinearModel::new(4, 1), 0.0).unwrap();
        let err = load_checkpoint(&path, Some(5)).err().unwrap();
        assert!(matches!(err, BigramError::ShapeMismatch { expected: 5, actual: 4, .. }));
    }

    #[test]
    fn truncated_and_foreign_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let mut buf = serialize_checkpoint(&LinearModel::new(3, 1), 0.0);
        buf.pop();
        std::fs::write(&path, &buf).unwrap();
        assert!(matches!(load_checkpoint(&path, None).err().unwrap(), BigramError::Checkpoint { .. }));

        std::fs::write(&path, b"NOTMAGICxxxxxxxxxxxxxxxx").unwrap();
        assert!(matches!(load_checkpoint(&path, None).err().unwrap(), BigramError::Checkpoint { .. }));
    }

    #[test]
    fn oversized_vocab_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let mut buf = MAGIC.to_vec();
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0f32.to_le_bytes());
        std::fs::write(&path, &buf).unwrap();
        assert!(matches!(load_checkpoint(&path, None).err().unwrap(), BigramError::Checkpoint { .. }));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_checkpoint("/no/such/model.bin", None).err().unwrap();
        assert!(err.to_string().contains("/no/such/model.bin"));
    }
}
