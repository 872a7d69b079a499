//! Payload encoding shapes.
//!
//! Every message travels as exactly one string. How typed arguments map
//! onto that string is a strategy — the [`MessageShape`] trait — with
//! one implementation per supported shape:
//!
//! - [`Empty`] — no arguments, empty string.
//! - [`Text`] — a single plain string, transmitted as-is.
//! - [`Json`] — ordered positional values plus named values, limited to
//!   JSON-representable types, transmitted as a compact two-element
//!   array `[args, kwargs]`.
//!
//! Decoding trusts the sender's shape: there is no schema validation
//! beyond "is this syntactically the right shape". A payload that isn't
//! is a [`ProtocolError::Decode`] at the receiver, never a panic.

use serde_json::{Map, Value};

use crate::ProtocolError;

/// Strategy for converting message arguments to and from the wire
/// string.
///
/// Implemented by stateless marker types so the facade can be generic
/// over the shape and the compiler can enforce the matching call
/// signature for each of them.
pub trait MessageShape: 'static {
    /// The typed arguments this shape carries.
    type Args;

    /// Encodes arguments into the wire string. Total for every value
    /// representable in this shape.
    fn encode(args: &Self::Args) -> Result<String, ProtocolError>;

    /// Decodes the wire string back into arguments.
    fn decode(wire: &str) -> Result<Self::Args, ProtocolError>;
}

// ---------------------------------------------------------------------------
// Empty
// ---------------------------------------------------------------------------

/// No payload at all — the message's arrival is the whole message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl MessageShape for Empty {
    type Args = ();

    fn encode(_args: &()) -> Result<String, ProtocolError> {
        Ok(String::new())
    }

    fn decode(_wire: &str) -> Result<(), ProtocolError> {
        // Whatever the sender put there is irrelevant for this shape.
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A single plain string, transmitted without any framing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl MessageShape for Text {
    type Args = String;

    fn encode(args: &String) -> Result<String, ProtocolError> {
        Ok(args.clone())
    }

    fn decode(wire: &str) -> Result<String, ProtocolError> {
        Ok(wire.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Json
// ---------------------------------------------------------------------------

/// The argument set of a [`Json`] message: ordered positional values
/// plus named values.
///
/// This mirrors a dynamic-language call site — `args` are positional,
/// `kwargs` are keyword arguments. Key order of `kwargs` is not
/// preserved across the wire; values are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArgs {
    /// Positional values, in call order.
    pub args: Vec<Value>,
    /// Named values.
    pub kwargs: Map<String, Value>,
}

impl JsonArgs {
    /// An empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Inserts a named value.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

impl From<Vec<Value>> for JsonArgs {
    fn from(args: Vec<Value>) -> Self {
        Self {
            args,
            kwargs: Map::new(),
        }
    }
}

/// JSON-encoded structured arguments.
///
/// Wire form is the compact `[[positional...], {named...}]` — no
/// whitespace, since every byte counts against the channel's bandwidth
/// ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl MessageShape for Json {
    type Args = JsonArgs;

    fn encode(args: &JsonArgs) -> Result<String, ProtocolError> {
        serde_json::to_string(&(&args.args, &args.kwargs))
            .map_err(ProtocolError::Encode)
    }

    fn decode(wire: &str) -> Result<JsonArgs, ProtocolError> {
        // A 2-tuple only deserializes from an array of exactly two
        // elements, the first an array and the second an object — any
        // other shape is rejected here.
        let (args, kwargs): (Vec<Value>, Map<String, Value>) =
            serde_json::from_str(wire).map_err(ProtocolError::Decode)?;
        Ok(JsonArgs { args, kwargs })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // =====================================================================
    // Empty / Text
    // =====================================================================

    #[test]
    fn test_empty_encodes_to_empty_string() {
        assert_eq!(Empty::encode(&()).unwrap(), "");
    }

    #[test]
    fn test_empty_decode_ignores_content() {
        Empty::decode("").unwrap();
        Empty::decode("garbage").unwrap();
    }

    #[test]
    fn test_text_round_trips_exactly() {
        for msg in ["", "hello", "with \"quotes\" and \n newlines", "日本語"] {
            let wire = Text::encode(&msg.to_owned()).unwrap();
            assert_eq!(wire, msg);
            assert_eq!(Text::decode(&wire).unwrap(), msg);
        }
    }

    // =====================================================================
    // Json
    // =====================================================================

    #[test]
    fn test_json_wire_form_is_compact_pair() {
        let args = JsonArgs::new().arg(1).arg("x").kwarg("k", true);
        let wire = Json::encode(&args).unwrap();
        assert_eq!(wire, r#"[[1,"x"],{"k":true}]"#);
    }

    #[test]
    fn test_json_empty_args() {
        let wire = Json::encode(&JsonArgs::new()).unwrap();
        assert_eq!(wire, "[[],{}]");
        assert_eq!(Json::decode(&wire).unwrap(), JsonArgs::new());
    }

    #[test]
    fn test_json_round_trips_values() {
        let args = JsonArgs::new()
            .arg(json!(null))
            .arg(json!([1, 2, [3]]))
            .arg(json!({"nested": {"deep": -1.5}}))
            .kwarg("flag", false)
            .kwarg("name", "bob");
        let wire = Json::encode(&args).unwrap();
        assert_eq!(Json::decode(&wire).unwrap(), args);
    }

    #[test]
    fn test_json_decode_rejects_syntactically_invalid() {
        let err = Json::decode("[[,]").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_json_decode_rejects_wrong_shape() {
        // Valid JSON, but not an [args, kwargs] pair.
        for wire in [r#"{"a":1}"#, "[[]]", "[[],{},1]", r#"[{},[]]"#, "5"] {
            let err = Json::decode(wire).unwrap_err();
            assert!(matches!(err, ProtocolError::Decode(_)), "{wire}");
        }
    }
}
