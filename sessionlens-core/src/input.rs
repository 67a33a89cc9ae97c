use crate::error::{AnalyzerError, Result};
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Reads a log file as text, tolerating undecodable bytes.
pub fn read_log_source(path: &Path) -> Result<String> {
    info!("Reading log file: {}", path.display());

    // Read file as bytes first
    let data = match fs::read(path) {
        Ok(data) => {
            debug!("Read {} bytes from file {}", data.len(), path.display());
            data
        }
        Err(e) => {
            error!("Failed to read file {}: {}", path.display(), e);
            return Err(AnalyzerError::io(path, e));
        }
    };

    Ok(decode_lossy(&data))
}

/// Decodes as UTF-8 unless a UTF-8/UTF-16 BOM says otherwise. Malformed
/// sequences are dropped instead of failing the read.
pub fn decode_lossy(data: &[u8]) -> String {
    let (encoding, bom_len) = Encoding::for_bom(data).unwrap_or((UTF_8, 0));
    let body = &data[bom_len..];
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut text = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(body.len())
            .unwrap_or(body.len()),
    );

    let mut consumed = 0;
    let mut skipped = 0;
    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(&body[consumed..], &mut text, true);
        consumed += read;
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::Malformed(_, _) => skipped += 1,
            DecoderResult::OutputFull => {
                let remaining = body.len() - consumed;
                text.reserve(
                    decoder
                        .max_utf8_buffer_length_without_replacement(remaining)
                        .unwrap_or(remaining)
                        .max(16),
                );
            }
        }
    }

    debug!("Decoded {} bytes as {}", data.len(), encoding.name());
    if skipped > 0 {
        warn!("Dropped {} malformed {} sequences", skipped, encoding.name());
    }
    text
}
