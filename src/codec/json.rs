use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{Codec, CodecError};

pub(crate) struct JsonCodec;

impl Codec for JsonCodec {
    type Document = Value;

    fn parse(bytes: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn into_model<T: DeserializeOwned>(document: Value) -> Result<T, CodecError> {
        Ok(serde_json::from_value(document)?)
    }

    fn encode<T: Serialize + ?Sized>(model: &T) -> Result<Vec<u8>, CodecError> {
        let mut output = serde_json::to_vec_pretty(model)?;
        output.push(b'\n');
        Ok(output)
    }
}
