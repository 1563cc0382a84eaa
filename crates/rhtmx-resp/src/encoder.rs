// crates/rhtmx-resp/src/encoder.rs — pluggable JSON encoding for the JSON and JSONP emitters
use serde::Serialize;
use serde_json::Value;

/// Custom JSON encoder. Writes the encoded document into `buf`, which is
/// always a scratch buffer, never the sink.
///
/// ```ignore
/// let compact = |buf: &mut Vec<u8>, value: &serde_json::Value| -> anyhow::Result<()> {
///     serde_json::to_writer(buf, value)?;
///     Ok(())
/// };
/// ResponseBuilder::new(sink).apply(apply_json_encoder(compact));
/// ```
pub trait JsonEncoder: Send + Sync {
    fn encode(&self, buf: &mut Vec<u8>, value: &Value) -> anyhow::Result<()>;
}

impl<F> JsonEncoder for F
where
    F: Fn(&mut Vec<u8>, &Value) -> anyhow::Result<()> + Send + Sync,
{
    fn encode(&self, buf: &mut Vec<u8>, value: &Value) -> anyhow::Result<()> {
        self(buf, value)
    }
}

/// Indented output, newline-terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonEncoder;

impl JsonEncoder for PrettyJsonEncoder {
    fn encode(&self, buf: &mut Vec<u8>, value: &Value) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *buf, value)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Compact encoding followed by a newline.
pub(crate) fn encode_default<T>(buf: &mut Vec<u8>, data: &T) -> serde_json::Result<()>
where
    T: Serialize + ?Sized,
{
    serde_json::to_writer(&mut *buf, data)?;
    buf.push(b'\n');
    Ok(())
}
