use serde::{Serialize, de::DeserializeOwned};
use serde_yaml::Value;

use super::{Codec, CodecError};

pub(crate) struct YamlCodec;

impl Codec for YamlCodec {
    type Document = Value;

    // An empty or comment-only document parses to `Value::Null`.
    fn parse(bytes: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_yaml::from_slice(bytes)?)
    }

    fn into_model<T: DeserializeOwned>(document: Value) -> Result<T, CodecError> {
        Ok(serde_yaml::from_value(document)?)
    }

    fn encode<T: Serialize + ?Sized>(model: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(model)?.into_bytes())
    }
}
